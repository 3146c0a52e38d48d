use std::time::SystemTime;

use der::asn1::{GeneralizedTime, OctetString, UtcTime};
use x509_cert::Version;
use x509_cert::name::Name;
use x509_cert::serial_number::SerialNumber;
use x509_cert::time::Time;

use crate::cert::SignatureAlgorithm;
use crate::cert::params::{ExtensionParam, Validity};
use crate::error::{CertForgeError, Result};
use crate::key::PublicKey;

/// Represents the "To Be Signed" (TBS) portion of an X.509 certificate.
///
/// # Fields
/// * `version` - `V1` for bare certificates, `V3` once extensions are present.
/// * `serial_number` - Non-negative serial, encoded as a minimal positive INTEGER.
/// * `signature_algorithm` - The algorithm used to sign the certificate.
/// * `issuer` - The name of the certificate issuer, copied verbatim.
/// * `validity` - The certificate's validity window.
/// * `subject` - The name of the certificate subject.
/// * `subject_public_key` - The public key of the certificate subject.
/// * `extensions` - Additional X.509 extensions for the certificate.
pub struct TbsCertificate {
    pub version: Version,
    pub serial_number: i64,
    pub signature_algorithm: SignatureAlgorithm,
    pub issuer: Name,
    pub validity: Validity,
    pub subject: Name,
    pub subject_public_key: PublicKey,
    pub extensions: Vec<ExtensionParam>,
}

impl TbsCertificate {
    /// Converts the `TbsCertificate` into the `x509_cert` structure that gets signed.
    pub fn to_tbs_certificate_inner(&self) -> Result<x509_cert::TbsCertificate> {
        if self.version == Version::V1 && !self.extensions.is_empty() {
            return Err(CertForgeError::InvalidInput(
                "Version 1 certificates cannot carry extensions".to_string(),
            ));
        }

        let extensions = self
            .extensions
            .iter()
            .map(|ext| {
                Ok(x509_cert::ext::Extension {
                    extn_id: ext.oid,
                    critical: ext.critical,
                    extn_value: OctetString::new(ext.value.clone())?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let validity = x509_cert::time::Validity {
            not_before: to_x509_time(self.validity.not_before.into())?,
            not_after: to_x509_time(self.validity.not_after.into())?,
        };

        Ok(x509_cert::TbsCertificate {
            version: self.version,
            serial_number: serial_number_from(self.serial_number)?,
            signature: self.signature_algorithm.into(),
            issuer: self.issuer.clone(),
            validity,
            subject: self.subject.clone(),
            subject_public_key_info: self.subject_public_key.to_spki()?,
            issuer_unique_id: None,
            subject_unique_id: None,
            extensions: (!extensions.is_empty()).then_some(extensions),
        })
    }
}

/// UTCTime through 2049, GeneralizedTime afterwards (RFC 5280, section 4.1.2.5).
fn to_x509_time(time: SystemTime) -> Result<Time> {
    match UtcTime::from_system_time(time) {
        Ok(utc) => Ok(Time::UtcTime(utc)),
        Err(_) => Ok(Time::GeneralTime(GeneralizedTime::from_system_time(time)?)),
    }
}

fn serial_number_from(value: i64) -> Result<SerialNumber> {
    if value < 0 {
        return Err(CertForgeError::InvalidInput(format!(
            "Serial number must be non-negative, got {value}"
        )));
    }
    let bytes = value.to_be_bytes();
    let first = bytes
        .iter()
        .position(|b| *b != 0)
        .unwrap_or(bytes.len() - 1);
    let mut minimal = bytes[first..].to_vec();
    if minimal[0] & 0x80 != 0 {
        minimal.insert(0, 0);
    }
    Ok(SerialNumber::new(&minimal)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use der::Encode;
    use crate::cert::params::DistinguishedName;
    use crate::key::KeyPair;

    fn tbs(version: Version, extensions: Vec<ExtensionParam>) -> TbsCertificate {
        let key = KeyPair::generate_rsa(2048).unwrap();
        let name = DistinguishedName::new("tbs").as_x509_name().unwrap();
        TbsCertificate {
            version,
            serial_number: 42,
            signature_algorithm: SignatureAlgorithm::Sha256WithRsa,
            issuer: name.clone(),
            validity: Validity::for_days(1).unwrap(),
            subject: name,
            subject_public_key: key.public_key(),
            extensions,
        }
    }

    #[test]
    fn test_v1_rejects_extensions() {
        let ext = ExtensionParam {
            oid: const_oid::db::rfc5280::ID_CE_BASIC_CONSTRAINTS,
            critical: true,
            value: vec![0x30, 0x00],
        };
        assert!(tbs(Version::V1, vec![ext]).to_tbs_certificate_inner().is_err());
    }

    #[test]
    fn test_v1_without_extensions_omits_extension_field() {
        let inner = tbs(Version::V1, vec![]).to_tbs_certificate_inner().unwrap();
        assert!(inner.extensions.is_none());
        assert_eq!(inner.version, Version::V1);
    }

    #[test]
    fn test_serial_number_encoding() {
        let der = |value| serial_number_from(value).unwrap().to_der().unwrap();
        assert_eq!(der(0), vec![0x02, 0x01, 0x00]);
        assert_eq!(der(42), vec![0x02, 0x01, 0x2A]);
        assert_eq!(der(0x80), vec![0x02, 0x02, 0x00, 0x80]);
        assert!(serial_number_from(i64::MAX).is_ok());
        assert!(serial_number_from(-1).is_err());
    }

    #[test]
    fn test_far_future_uses_generalized_time() {
        let far = SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(4_102_444_800);
        assert!(matches!(to_x509_time(far).unwrap(), Time::GeneralTime(_)));
        assert!(matches!(
            to_x509_time(SystemTime::now()).unwrap(),
            Time::UtcTime(_)
        ));
    }
}
