//! Error type shared by every certforge operation.
//!
//! ```
//! use certforge::error::CertForgeError;
//!
//! let err = CertForgeError::InvalidInput("valid_days must be positive".to_string());
//! assert_eq!(err.to_string(), "Invalid input: valid_days must be positive");
//! ```

use thiserror::Error;

/// Represents errors that can occur while building, loading or persisting certificates.
#[derive(Debug, Error)]
pub enum CertForgeError {
    /// Error during data encoding.
    #[error("Failed to encode data: {0}")]
    EncodingError(String),

    /// Error during data decoding.
    #[error("Failed to decode data: {0}")]
    DecodingError(String),

    /// Error due to invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Error during key generation.
    #[error("Key generation error: {0}")]
    KeyGenerationError(String),

    /// Error while producing or checking a signature.
    #[error("Signature error: {0}")]
    SignatureError(String),

    /// Error from RSA operations.
    #[error("RSA error: {0}")]
    RsaError(String),

    /// Error from RSA PKCS1 operations.
    #[error("RSA PKCS1 error: {0}")]
    RsaPkcs1Error(String),

    /// Filesystem failure, passed through untouched.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CertForgeError>;

impl From<der::Error> for CertForgeError {
    /// Converts a `der::Error` into a `CertForgeError`.
    fn from(err: der::Error) -> Self {
        CertForgeError::DecodingError(err.to_string())
    }
}

impl From<rsa::Error> for CertForgeError {
    fn from(err: rsa::Error) -> Self {
        CertForgeError::RsaError(err.to_string())
    }
}

impl From<rsa::pkcs1::Error> for CertForgeError {
    fn from(err: rsa::pkcs1::Error) -> Self {
        CertForgeError::RsaPkcs1Error(err.to_string())
    }
}

impl From<pkcs8::Error> for CertForgeError {
    fn from(err: pkcs8::Error) -> Self {
        CertForgeError::DecodingError(err.to_string())
    }
}

impl From<spki::Error> for CertForgeError {
    fn from(err: spki::Error) -> Self {
        CertForgeError::EncodingError(err.to_string())
    }
}

impl From<pem::PemError> for CertForgeError {
    fn from(err: pem::PemError) -> Self {
        CertForgeError::DecodingError(err.to_string())
    }
}

impl From<rsa::signature::Error> for CertForgeError {
    fn from(err: rsa::signature::Error) -> Self {
        CertForgeError::SignatureError(err.to_string())
    }
}
