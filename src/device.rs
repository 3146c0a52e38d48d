//! Device identity certificates.
//!
//! A device registers with the hub using a self-signed certificate whose
//! common name is the device id. The hub only needs the certificate (or its
//! thumbprint); the private key stays with the device.

use std::path::Path;

use serde::Serialize;

use crate::cert::Certificate;
use crate::cert::params::{CertificateParams, DistinguishedName, Validity};
use crate::config::{CERT_FILE_SUFFIX, DEVICE_KEY_BITS, KEY_FILE_SUFFIX};
use crate::error::{CertForgeError, Result};
use crate::key::{KeyPair, PublicKey};

/// PEM certificate, PEM private key and SHA-1 thumbprint of a freshly generated identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedCertificateBundle {
    pub certificate: String,
    pub private_key: String,
    pub thumbprint: String,
}

/// Generates a 2048-bit RSA key and a self-signed v1 certificate for `device_id`.
///
/// When `output_dir` names an existing directory, `<device_id>-cert.pem` and
/// `<device_id>-key.pem` are written there, replacing any previous files. A
/// missing directory is skipped without error; the bundle is returned either way.
pub fn generate_self_signed(
    device_id: &str,
    valid_days: u32,
    output_dir: Option<&Path>,
) -> Result<SerializedCertificateBundle> {
    if valid_days == 0 {
        return Err(CertForgeError::InvalidInput(
            "valid_days must be positive".to_string(),
        ));
    }
    let validity = Validity::for_days(valid_days)?;

    let key = KeyPair::generate_rsa(DEVICE_KEY_BITS)?;
    let params = CertificateParams::builder()
        .subject(DistinguishedName::new(device_id))
        .subject_public_key(PublicKey::from_key_pair(&key))
        .validity(validity)
        .build();
    let cert = Certificate::new_self_signed(&params, &key)?;

    let bundle = SerializedCertificateBundle {
        certificate: cert.to_pem()?,
        private_key: key.to_pkcs1_pem()?,
        thumbprint: cert.thumbprint()?,
    };

    match output_dir {
        Some(dir) if dir.is_dir() => write_bundle(&bundle, device_id, dir)?,
        Some(dir) => tracing::debug!(
            dir = %dir.display(),
            "output directory does not exist, not writing device certificate"
        ),
        None => {}
    }

    Ok(bundle)
}

fn write_bundle(bundle: &SerializedCertificateBundle, device_id: &str, dir: &Path) -> Result<()> {
    let cert_path = dir.join(format!("{device_id}{CERT_FILE_SUFFIX}"));
    let key_path = dir.join(format!("{device_id}{KEY_FILE_SUFFIX}"));
    std::fs::write(&cert_path, &bundle.certificate)?;
    std::fs::write(&key_path, &bundle.private_key)?;
    tracing::info!(
        cert = %cert_path.display(),
        key = %key_path.display(),
        "wrote device certificate"
    );
    Ok(())
}
