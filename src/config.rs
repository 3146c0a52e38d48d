//! Fixed generation parameters.
//!
//! Device identity keys and test fixture keys intentionally differ in size:
//! fixtures use a 2046-bit modulus so their bit length matches the fixtures
//! the hub certificate tests were written against.

use crate::cert::SignatureAlgorithm;

/// Modulus size of the key pair behind a device identity certificate.
pub const DEVICE_KEY_BITS: usize = 2048;

/// Modulus size of test CA and verification certificate key pairs.
pub const FIXTURE_KEY_BITS: usize = 2046;

/// Every certificate produced by this crate is signed with this algorithm.
pub const SIGNATURE_ALGORITHM: SignatureAlgorithm = SignatureAlgorithm::Sha256WithRsa;

pub const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// How far a test CA's `notBefore` is moved into the past, to tolerate clock skew.
pub const FIXTURE_BACKDATE_DAYS: i64 = 1;

/// `pathlen` of the test CA's basicConstraints.
pub const FIXTURE_CA_PATH_LENGTH: u8 = 1;

pub const CERT_FILE_SUFFIX: &str = "-cert.pem";
pub const KEY_FILE_SUFFIX: &str = "-key.pem";

/// File name endings `open_certificate` is willing to read. Matching is case-sensitive.
pub const CERTIFICATE_FILE_EXTENSIONS: [&str; 2] = [".pem", ".cer"];
