//! # certforge - Certificates for IoT hub device management
//!
//! certforge builds the X.509 material an IoT hub certificate workflow needs,
//! using rustcrypto libraries only:
//!
//! - **Device identities**: an RSA-2048 key and a self-signed certificate whose
//!   common name is the device id, returned as PEM together with its SHA-1
//!   thumbprint and optionally written to disk.
//! - **Certificate upload**: reading `.pem`/`.cer` files, returning PEM text
//!   as-is and binary DER as base64.
//! - **Proof of possession**: a throwaway test CA, and a verification
//!   certificate naming the hub's nonce that is signed by that CA.
//!
//! All operations are synchronous and keep nothing in memory past the call.
//!
//! ## Quick Start
//!
//! ### Generating a device certificate
//!
//! ```rust,no_run
//! use certforge::device::generate_self_signed;
//!
//! # fn main() -> Result<(), certforge::error::CertForgeError> {
//! let bundle = generate_self_signed("thermostat-17", 365, None)?;
//! println!("{}", bundle.certificate);
//! println!("thumbprint: {}", bundle.thumbprint);
//! # Ok(())
//! # }
//! ```
//!
//! ### Answering a verification challenge
//!
//! ```rust,no_run
//! use certforge::fixture::{create_test_cert, create_verification_cert, random_serial_number};
//!
//! # fn main() -> Result<(), certforge::error::CertForgeError> {
//! create_test_cert("testcert.cer", "testkey.pvk", "TESTCERT123", 3, random_serial_number())?;
//! // ... upload testcert.cer, receive a nonce from the hub ...
//! create_verification_cert(
//!     "testcert.cer",
//!     "testkey.pvk",
//!     "verify.cer",
//!     "abc-nonce-001",
//!     3,
//!     random_serial_number(),
//! )?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Every fallible operation returns [`error::CertForgeError`]. Filesystem
//! failures surface untouched as [`error::CertForgeError::Io`]:
//!
//! ```rust
//! use certforge::{error::CertForgeError, loader::open_certificate};
//!
//! match open_certificate("/no/such/dir/cert.pem") {
//!     Ok(text) => println!("{text}"),
//!     Err(CertForgeError::Io(e)) => println!("could not read certificate: {e}"),
//!     Err(e) => println!("other error: {e}"),
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`device`]: Device identity certificates
//! - [`loader`]: Reading certificate files for upload
//! - [`fixture`]: Test CA, verification certificates and cleanup
//! - [`key`]: RSA key generation, import/export and signatures
//! - [`cert`]: Certificate model, parameters and extensions
//! - [`issuer`]: Certificate issuing, including self-signing
//! - [`tbs_certificate`]: Low-level certificate structure assembly
//! - [`config`]: Fixed generation parameters
//! - [`error`]: Error type

pub mod cert;
pub mod config;
pub mod device;
pub mod error;
pub mod fixture;
pub mod issuer;
pub mod key;
pub mod loader;
pub mod pem_utils;
pub mod tbs_certificate;

pub use device::{SerializedCertificateBundle, generate_self_signed};
pub use fixture::{create_test_cert, create_verification_cert, delete_test_cert};
pub use loader::{CertificateContent, open_certificate, read_certificate};
