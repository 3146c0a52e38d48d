pub mod extensions;
pub mod params;

use std::path::Path;

use der::{Decode, Encode, EncodePem};
use extensions::{SubjectKeyIdentifier, ToAndFromX509Extension};
use params::{CertificateParams, DistinguishedName, Validity};
use sha1::{Digest, Sha1};
use time::OffsetDateTime;
use x509_cert::Version;
use x509_cert::name::Name;
use x509_cert::time::Time;

use crate::error::{CertForgeError, Result};
use crate::issuer::{Issuer, SelfIssuer};
use crate::key::{KeyPair, PublicKey};
use crate::pem_utils;

/// Represents the supported signature algorithms for certificates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    /// SHA-256 with RSA encryption (PKCS#1 v1.5).
    Sha256WithRsa,
}

impl From<SignatureAlgorithm> for x509_cert::spki::AlgorithmIdentifierOwned {
    /// RFC 4055 requires an explicit NULL parameter for PKCS#1 v1.5 signatures.
    fn from(value: SignatureAlgorithm) -> Self {
        match value {
            SignatureAlgorithm::Sha256WithRsa => x509_cert::spki::AlgorithmIdentifierOwned {
                oid: const_oid::db::rfc5912::SHA_256_WITH_RSA_ENCRYPTION,
                parameters: Some(der::asn1::AnyRef::NULL.into()),
            },
        }
    }
}

/// Represents an X.509 certificate.
///
/// This struct provides methods to encode the certificate into DER or PEM formats
/// and to read back the handful of fields the hub workflow cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    /// The inner representation of the certificate.
    pub inner: x509_cert::Certificate,
}

impl Certificate {
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let inner = x509_cert::Certificate::from_der(der)?;
        Ok(Self { inner })
    }

    /// Parses the first `CERTIFICATE` block of a PEM document.
    pub fn from_pem(pem: &str) -> Result<Self> {
        let der = pem_utils::pem_to_der(pem, pem_utils::CERTIFICATE_LABEL)?;
        Self::from_der(&der)
    }

    /// Encodes the certificate into DER format.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        self.inner
            .to_der()
            .map_err(|e| CertForgeError::EncodingError(e.to_string()))
    }

    /// Encodes the certificate into PEM format with LF line endings.
    pub fn to_pem(&self) -> Result<String> {
        self.inner
            .to_pem(pkcs8::LineEnding::LF)
            .map_err(|e| CertForgeError::EncodingError(e.to_string()))
    }

    /// SHA-1 digest of the DER encoding, uppercase hex without separators.
    pub fn thumbprint(&self) -> Result<String> {
        let digest = Sha1::digest(self.to_der()?);
        Ok(hex::encode_upper(digest))
    }

    pub fn subject_name(&self) -> &Name {
        &self.inner.tbs_certificate.subject
    }

    pub fn issuer_name(&self) -> &Name {
        &self.inner.tbs_certificate.issuer
    }

    pub fn subject_common_name(&self) -> Result<String> {
        Ok(DistinguishedName::from_x509_name(self.subject_name())?.common_name)
    }

    pub fn issuer_common_name(&self) -> Result<String> {
        Ok(DistinguishedName::from_x509_name(self.issuer_name())?.common_name)
    }

    pub fn version(&self) -> Version {
        self.inner.tbs_certificate.version
    }

    /// The serial number as a signed 64-bit integer.
    pub fn serial_number(&self) -> Result<i64> {
        let bytes = self.inner.tbs_certificate.serial_number.as_bytes();
        let first = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
        let significant = &bytes[first..];
        if significant.len() > 8 {
            return Err(CertForgeError::DecodingError(
                "Serial number does not fit in 64 bits".to_string(),
            ));
        }
        let value = significant
            .iter()
            .fold(0u64, |acc, b| (acc << 8) | u64::from(*b));
        i64::try_from(value).map_err(|e| CertForgeError::DecodingError(e.to_string()))
    }

    pub fn validity(&self) -> Validity {
        let validity = &self.inner.tbs_certificate.validity;
        Validity {
            not_before: to_offset_date_time(&validity.not_before),
            not_after: to_offset_date_time(&validity.not_after),
        }
    }

    pub fn subject_public_key(&self) -> Result<PublicKey> {
        PublicKey::from_x509spki(&self.inner.tbs_certificate.subject_public_key_info)
    }

    /// Finds and decodes the extension of type `E`, returning it with its criticality.
    pub fn extension<E: ToAndFromX509Extension>(&self) -> Result<Option<(bool, E)>> {
        self.inner
            .tbs_certificate
            .extensions
            .iter()
            .flatten()
            .find(|ext| ext.extn_id == E::OID)
            .map(|ext| {
                E::from_x509_extension_value(ext.extn_value.as_bytes())
                    .map(|decoded| (ext.critical, decoded))
            })
            .transpose()
    }

    /// Checks that this certificate's signature was produced by the private half
    /// of `issuer_key`.
    pub fn verify_signed_by(&self, issuer_key: &PublicKey) -> Result<()> {
        let expected: x509_cert::spki::AlgorithmIdentifierOwned =
            crate::config::SIGNATURE_ALGORITHM.into();
        if self.inner.signature_algorithm.oid != expected.oid {
            return Err(CertForgeError::SignatureError(format!(
                "Unsupported signature algorithm {}",
                self.inner.signature_algorithm.oid
            )));
        }
        let signature = self.inner.signature.as_bytes().ok_or_else(|| {
            CertForgeError::SignatureError("Signature has unused bits".to_string())
        })?;
        let tbs_der = self.inner.tbs_certificate.to_der()?;
        issuer_key.verify(&tbs_der, signature)
    }

    /// Creates a new self-signed certificate.
    ///
    /// # Arguments
    /// * `params` - The certificate parameters; the subject doubles as issuer.
    /// * `key` - The key pair used to sign the certificate.
    pub fn new_self_signed(params: &CertificateParams, key: &KeyPair) -> Result<Self> {
        SelfIssuer::new(params, key).issue(params)
    }
}

fn to_offset_date_time(time: &Time) -> OffsetDateTime {
    match time {
        Time::UtcTime(ut) => OffsetDateTime::from(ut.to_system_time()),
        Time::GeneralTime(gt) => OffsetDateTime::from(gt.to_system_time()),
    }
}

/// A certificate together with the private key able to issue under it.
#[derive(Clone)]
pub struct CertificateWithPrivateKey {
    pub cert: Certificate,
    pub key: KeyPair,
}

impl CertificateWithPrivateKey {
    /// Loads a PEM certificate and its PEM private key from disk.
    pub fn load(cert_path: &Path, key_path: &Path) -> Result<Self> {
        let cert = Certificate::from_pem(&std::fs::read_to_string(cert_path)?)?;
        let key = KeyPair::import_from_pem(&std::fs::read_to_string(key_path)?)?;
        if cert.subject_public_key()? != key.public_key() {
            return Err(CertForgeError::InvalidInput(format!(
                "Private key {} does not belong to certificate {}",
                key_path.display(),
                cert_path.display()
            )));
        }
        Ok(Self { cert, key })
    }
}

impl Issuer for CertificateWithPrivateKey {
    fn issuer_name(&self) -> Result<Name> {
        // The name of the issuer is the subject of the certificate
        Ok(self.cert.subject_name().clone())
    }

    fn signing_key(&self) -> &KeyPair {
        &self.key
    }

    fn key_identifier(&self) -> Result<Vec<u8>> {
        match self.cert.extension::<SubjectKeyIdentifier>()? {
            Some((_, ski)) => Ok(ski.key_identifier),
            None => self.cert.subject_public_key()?.key_identifier(),
        }
    }
}
