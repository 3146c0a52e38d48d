//! Reading certificate files for upload.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::config::CERTIFICATE_FILE_EXTENSIONS;
use crate::error::Result;
use crate::pem_utils;

/// What a certificate file turned out to contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CertificateContent {
    /// The file was valid UTF-8 and is returned verbatim (normally PEM).
    Text(String),
    /// The file was binary (normally DER) and is returned as bare base64.
    Base64Der(String),
}

impl CertificateContent {
    pub fn into_string(self) -> String {
        match self {
            CertificateContent::Text(text) | CertificateContent::Base64Der(text) => text,
        }
    }
}

/// Returns true when the path ends in one of the accepted certificate extensions.
pub fn has_certificate_extension(path: &Path) -> bool {
    let path = path.to_string_lossy();
    CERTIFICATE_FILE_EXTENSIONS
        .iter()
        .any(|extension| path.ends_with(extension))
}

/// Reads a `.pem` or `.cer` file.
///
/// Any other path yields `Ok(None)` without touching the filesystem. Read
/// failures are returned as [`CertForgeError::Io`](crate::error::CertForgeError::Io).
pub fn read_certificate(path: impl AsRef<Path>) -> Result<Option<CertificateContent>> {
    let path = path.as_ref();
    if !has_certificate_extension(path) {
        return Ok(None);
    }

    let bytes = std::fs::read(path)?;
    let content = match String::from_utf8(bytes) {
        Ok(text) => {
            if !pem_utils::looks_like_pem(&text) {
                tracing::debug!(path = %path.display(), "certificate file is text but not PEM");
            }
            CertificateContent::Text(text)
        }
        Err(err) => CertificateContent::Base64Der(STANDARD.encode(err.into_bytes())),
    };
    Ok(Some(content))
}

/// Loads a certificate for upload as a plain string.
///
/// Returns the file's text for UTF-8 content, the base64 of its raw bytes
/// for binary content, and an empty string for paths that do not end in
/// `.pem` or `.cer`. The two non-empty shapes are not distinguished; use
/// [`read_certificate`] to find out which one was produced.
pub fn open_certificate(path: impl AsRef<Path>) -> Result<String> {
    Ok(read_certificate(path)?
        .map(CertificateContent::into_string)
        .unwrap_or_default())
}
