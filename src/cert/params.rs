use bon::Builder;
use const_oid::ObjectIdentifier;
use der::Tag;
use der::asn1::{Any, SetOfVec};
use time::Duration;
use time::OffsetDateTime;
use x509_cert::Version;
use x509_cert::attr::AttributeTypeAndValue;
use x509_cert::name::{Name, RdnSequence, RelativeDistinguishedName};

use super::extensions::{SubjectKeyIdentifier, ToAndFromX509Extension};
use crate::config::SECONDS_PER_DAY;
use crate::error::{CertForgeError, Result};
use crate::key::PublicKey;

/// Parameters for building an X.509 certificate.
///
/// # Fields
/// * `subject` - The distinguished name of the certificate subject.
/// * `subject_public_key` - The public key of the certificate subject.
/// * `serial_number` - Caller supplied serial; must be non-negative.
/// * `validity` - The `notBefore`/`notAfter` window.
/// * `version` - `V1` unless the certificate carries extensions.
/// * `extensions` - X.509 extensions, encoded in insertion order.
#[derive(Clone, Debug, Builder)]
pub struct CertificateParams {
    pub subject: DistinguishedName,
    pub subject_public_key: PublicKey,
    #[builder(default)]
    pub serial_number: i64,
    pub validity: Validity,
    #[builder(default = Version::V1)]
    pub version: Version,
    #[builder(default)]
    pub extensions: Vec<ExtensionParam>,
}

impl CertificateParams {
    /// Finds and decodes the extension of type `E`, if present.
    pub fn extension<E: ToAndFromX509Extension>(&self) -> Result<Option<E>> {
        self.extensions
            .iter()
            .find(|ext| ext.oid == E::OID)
            .map(|ext| ext.to_extension())
            .transpose()
    }

    /// The subject key identifier already attached to these parameters.
    pub fn subject_key_identifier(&self) -> Result<Option<Vec<u8>>> {
        Ok(self
            .extension::<SubjectKeyIdentifier>()?
            .map(|ski| ski.key_identifier))
    }
}

/// Subject or issuer name. Only the common name is ever populated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DistinguishedName {
    pub common_name: String,
}

impl DistinguishedName {
    pub fn new(common_name: impl Into<String>) -> Self {
        Self {
            common_name: common_name.into(),
        }
    }

    /// Builds a single-RDN X.509 name holding `CN=<common_name>` as a UTF8String.
    pub fn as_x509_name(&self) -> Result<Name> {
        let cn = AttributeTypeAndValue {
            oid: const_oid::db::rfc4519::CN,
            value: Any::new(Tag::Utf8String, self.common_name.as_bytes())?,
        };
        let rdn = RelativeDistinguishedName(SetOfVec::try_from(vec![cn])?);
        Ok(RdnSequence(vec![rdn]))
    }

    /// Extracts the first common name of an X.509 name. Missing CN yields an empty name.
    pub fn from_x509_name(x509dn: &Name) -> Result<Self> {
        let common_name = x509dn
            .0
            .iter()
            .flat_map(|rdn| rdn.0.iter())
            .find(|attr| attr.oid == const_oid::db::rfc4519::CN)
            .map(|attr| {
                std::str::from_utf8(attr.value.value())
                    .map(str::to_string)
                    .map_err(|e| CertForgeError::DecodingError(e.to_string()))
            })
            .transpose()?
            .unwrap_or_default();
        Ok(Self { common_name })
    }
}

/// Certificate validity period.
///
/// # Fields
/// * `not_before` - The start of the validity period.
/// * `not_after` - The end of the validity period.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Validity {
    pub not_before: OffsetDateTime,
    pub not_after: OffsetDateTime,
}

impl Validity {
    /// Creates a validity period starting now for the given number of days.
    pub fn for_days(days: u32) -> Result<Self> {
        Self::backdated(0, days)
    }

    /// Creates a validity period that started `backdate_days` ago and ends
    /// `days` from now.
    ///
    /// Fails with [`CertForgeError::InvalidInput`] when either bound falls
    /// outside the representable date range (years 1 to 9999).
    pub fn backdated(backdate_days: i64, days: u32) -> Result<Self> {
        let now = OffsetDateTime::now_utc();
        let not_before = backdate_days
            .checked_mul(SECONDS_PER_DAY)
            .and_then(|secs| now.checked_sub(Duration::seconds(secs)))
            .ok_or_else(|| {
                CertForgeError::InvalidInput(format!(
                    "notBefore out of range for {backdate_days} days of backdating"
                ))
            })?;
        let not_after = now
            .checked_add(Duration::seconds(i64::from(days) * SECONDS_PER_DAY))
            .ok_or_else(|| {
                CertForgeError::InvalidInput(format!("notAfter out of range for {days} valid days"))
            })?;
        Ok(Self {
            not_before,
            not_after,
        })
    }
}

/// Represents an X.509 extension.
///
/// # Fields
/// * `oid` - The object identifier of the extension.
/// * `critical` - Indicates if the extension is critical.
/// * `value` - The DER-encoded value of the extension.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtensionParam {
    pub oid: ObjectIdentifier,
    pub critical: bool,
    /// DER-encoded extension value
    pub value: Vec<u8>,
}

impl ExtensionParam {
    /// Encodes `extension` into an `ExtensionParam`.
    pub fn from_extension<E: ToAndFromX509Extension>(
        extension: &E,
        critical: bool,
    ) -> Result<Self> {
        Ok(Self {
            oid: E::OID,
            critical,
            value: extension.to_x509_extension_value()?,
        })
    }

    /// Decodes an `ExtensionParam` into a specific extension.
    pub fn to_extension<E: ToAndFromX509Extension>(&self) -> Result<E> {
        E::from_x509_extension_value(&self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinguished_name_round_trip() {
        let dn = DistinguishedName::new("abc-nonce-001");
        let name = dn.as_x509_name().unwrap();
        assert_eq!(name.0.len(), 1);
        assert_eq!(DistinguishedName::from_x509_name(&name).unwrap(), dn);
    }

    #[test]
    fn test_common_name_with_special_characters() {
        let dn = DistinguishedName::new("device,with=odd+chars");
        let name = dn.as_x509_name().unwrap();
        assert_eq!(
            DistinguishedName::from_x509_name(&name).unwrap().common_name,
            "device,with=odd+chars"
        );
    }

    #[test]
    fn test_backdated_validity() {
        let validity = Validity::backdated(1, 3).unwrap();
        let span = validity.not_after - validity.not_before;
        assert_eq!(span, Duration::days(4));
        assert!(validity.not_before < OffsetDateTime::now_utc() - Duration::hours(23));
    }

    #[test]
    fn test_for_days_starts_now() {
        let before = OffsetDateTime::now_utc();
        let validity = Validity::for_days(10).unwrap();
        assert!(validity.not_before >= before);
        assert_eq!(validity.not_after - validity.not_before, Duration::days(10));
    }

    #[test]
    fn test_unrepresentable_validity_is_rejected() {
        let err = Validity::for_days(u32::MAX).unwrap_err();
        assert!(matches!(err, CertForgeError::InvalidInput(_)));
        assert!(Validity::backdated(i64::MAX, 1).is_err());
    }

    #[test]
    fn test_validity_past_2049_is_accepted() {
        // 40 years out lands past the UTCTime range but well inside year 9999.
        let validity = Validity::for_days(40 * 366).unwrap();
        assert!(validity.not_after.year() > 2050);
    }
}
