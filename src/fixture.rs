//! Test CA fixtures for the hub's certificate verification challenge.
//!
//! The hub proves that an uploaded CA certificate is controlled by the caller
//! by issuing a nonce. The caller answers with a certificate whose subject is
//! the nonce, signed by the CA's private key. The key embedded in that answer
//! is throwaway: only the CA's signature over the nonce matters.

use std::io;
use std::path::Path;

use rand::Rng;
use x509_cert::Version;

use crate::cert::extensions::{BasicConstraints, SubjectKeyIdentifier};
use crate::cert::params::{CertificateParams, DistinguishedName, ExtensionParam, Validity};
use crate::cert::{Certificate, CertificateWithPrivateKey};
use crate::config::{FIXTURE_BACKDATE_DAYS, FIXTURE_CA_PATH_LENGTH, FIXTURE_KEY_BITS};
use crate::error::{CertForgeError, Result};
use crate::issuer::{Issuer, SelfIssuer};
use crate::key::{KeyPair, PublicKey};

/// A uniformly random serial number in `0..=i64::MAX`.
pub fn random_serial_number() -> i64 {
    rand::rng().random_range(0..=i64::MAX)
}

/// Creates a self-signed v3 test CA and writes its certificate and PKCS#1
/// private key as PEM to `cert_path` and `key_path`, overwriting both.
///
/// The CA is back-dated by a day and carries a critical `CA:TRUE, pathlen:1`
/// basicConstraints, a hashed subject key identifier and an authority key
/// identifier pointing back at itself.
pub fn create_test_cert(
    cert_path: impl AsRef<Path>,
    key_path: impl AsRef<Path>,
    subject: &str,
    valid_days: u32,
    serial_number: i64,
) -> Result<()> {
    check_inputs(valid_days, serial_number)?;
    let (cert_path, key_path) = (cert_path.as_ref(), key_path.as_ref());
    let validity = Validity::backdated(FIXTURE_BACKDATE_DAYS, valid_days)?;

    let key = KeyPair::generate_rsa(FIXTURE_KEY_BITS)?;
    let public_key = PublicKey::from_key_pair(&key);

    let basic_constraints = BasicConstraints {
        is_ca: true,
        max_path_length: Some(FIXTURE_CA_PATH_LENGTH),
    };
    let subject_key_id = SubjectKeyIdentifier::from_public_key(&public_key)?;
    let mut params = CertificateParams::builder()
        .subject(DistinguishedName::new(subject))
        .subject_public_key(public_key.clone())
        .serial_number(serial_number)
        .validity(validity)
        .version(Version::V3)
        .extensions(vec![
            ExtensionParam::from_extension(&basic_constraints, true)?,
            ExtensionParam::from_extension(&subject_key_id, false)?,
        ])
        .build();

    // The authority key identifier of a self-signed CA references its own
    // subject key identifier, so it can only be derived once that is in place.
    let authority_key_id = SelfIssuer::new(&params, &key).authority_key_identifier()?;
    params.extensions.push(authority_key_id);

    let cert = Certificate::new_self_signed(&params, &key)?;

    std::fs::write(cert_path, cert.to_pem()?)?;
    std::fs::write(key_path, key.to_pkcs1_pem()?)?;
    tracing::info!(
        cert = %cert_path.display(),
        key = %key_path.display(),
        subject,
        "wrote test CA"
    );
    Ok(())
}

/// Creates a verification certificate for `nonce`, signed by the CA stored at
/// `cert_path`/`key_path`, and writes it as PEM to `out_path`.
///
/// Does nothing if either CA file is missing.
pub fn create_verification_cert(
    cert_path: impl AsRef<Path>,
    key_path: impl AsRef<Path>,
    out_path: impl AsRef<Path>,
    nonce: &str,
    valid_days: u32,
    serial_number: i64,
) -> Result<()> {
    let (cert_path, key_path) = (cert_path.as_ref(), key_path.as_ref());
    let out_path = out_path.as_ref();
    if !cert_path.exists() || !key_path.exists() {
        tracing::debug!(
            cert = %cert_path.display(),
            key = %key_path.display(),
            "signing certificate or key missing, not creating verification certificate"
        );
        return Ok(());
    }
    check_inputs(valid_days, serial_number)?;
    let validity = Validity::for_days(valid_days)?;

    let throwaway = KeyPair::generate_rsa(FIXTURE_KEY_BITS)?;
    let signer = CertificateWithPrivateKey::load(cert_path, key_path)?;

    let params = CertificateParams::builder()
        .subject(DistinguishedName::new(nonce))
        .subject_public_key(PublicKey::from_key_pair(&throwaway))
        .serial_number(serial_number)
        .validity(validity)
        .version(Version::V3)
        .extensions(vec![signer.authority_key_identifier()?])
        .build();
    let cert = signer.issue(&params)?;

    std::fs::write(out_path, cert.to_pem()?)?;
    tracing::info!(out = %out_path.display(), nonce, "wrote verification certificate");
    Ok(())
}

/// Removes the CA certificate, CA key and verification certificate.
///
/// Files that are already gone are ignored. Every removal is attempted even
/// when an earlier one fails; the first failure is returned afterwards.
pub fn delete_test_cert(
    cert_path: impl AsRef<Path>,
    key_path: impl AsRef<Path>,
    verification_path: impl AsRef<Path>,
) -> Result<()> {
    let mut first_error = None;
    for path in [cert_path.as_ref(), key_path.as_ref(), verification_path.as_ref()] {
        match std::fs::remove_file(path) {
            Ok(()) => tracing::info!(path = %path.display(), "removed test certificate file"),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "failed to remove file");
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }
    }
    match first_error {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

fn check_inputs(valid_days: u32, serial_number: i64) -> Result<()> {
    if valid_days == 0 {
        return Err(CertForgeError::InvalidInput(
            "valid_days must be positive".to_string(),
        ));
    }
    if serial_number < 0 {
        return Err(CertForgeError::InvalidInput(format!(
            "Serial number must be non-negative, got {serial_number}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_serial_number_is_non_negative() {
        for _ in 0..64 {
            assert!(random_serial_number() >= 0);
        }
    }

    #[test]
    fn test_check_inputs() {
        assert!(check_inputs(3, 42).is_ok());
        assert!(check_inputs(0, 42).is_err());
        assert!(check_inputs(3, -1).is_err());
    }
}
