use der::Encode;
use x509_cert::name::Name;

use crate::cert::Certificate;
use crate::cert::extensions::AuthorityKeyIdentifier;
use crate::cert::params::{CertificateParams, ExtensionParam};
use crate::config::SIGNATURE_ALGORITHM;
use crate::error::Result;
use crate::key::KeyPair;
use crate::tbs_certificate::TbsCertificate;

/// Represents an entity capable of issuing certificates.
///
/// This trait provides methods to retrieve issuer details and issue certificates.
pub trait Issuer {
    /// Returns the name written into the `issuer` field of issued certificates.
    fn issuer_name(&self) -> Result<Name>;

    /// Returns the signing key of the issuer.
    fn signing_key(&self) -> &KeyPair;

    /// Returns the identifier of the issuer's public key, as referenced by the
    /// authority key identifier of issued certificates.
    fn key_identifier(&self) -> Result<Vec<u8>>;

    /// Builds an authority key identifier extension (`keyid:always`) pointing at this issuer.
    fn authority_key_identifier(&self) -> Result<ExtensionParam> {
        let aki = AuthorityKeyIdentifier {
            key_identifier: self.key_identifier()?,
        };
        ExtensionParam::from_extension(&aki, false)
    }

    /// Issues a certificate for `params`, signed with the issuer's key.
    ///
    /// Extensions are taken from `params` as-is; nothing is added implicitly.
    fn issue(&self, params: &CertificateParams) -> Result<Certificate> {
        let tbs_cert = TbsCertificate {
            version: params.version,
            serial_number: params.serial_number,
            signature_algorithm: SIGNATURE_ALGORITHM,
            issuer: self.issuer_name()?,
            validity: params.validity.clone(),
            subject: params.subject.as_x509_name()?,
            subject_public_key: params.subject_public_key.clone(),
            extensions: params.extensions.clone(),
        };

        let tbs_cert_inner = tbs_cert.to_tbs_certificate_inner()?;
        let signature = self.signing_key().sign_data(&tbs_cert_inner.to_der()?)?;

        tracing::debug!(
            subject = %params.subject.common_name,
            serial = params.serial_number,
            "issued certificate"
        );

        let inner = x509_cert::Certificate {
            tbs_certificate: tbs_cert_inner,
            signature_algorithm: SIGNATURE_ALGORITHM.into(),
            signature: der::asn1::BitString::from_bytes(&signature)?,
        };
        Ok(Certificate { inner })
    }
}

/// Issuer for a certificate that signs itself.
///
/// The certificate under construction is its own issuer, so its key identifier
/// is the subject key identifier already attached to `params`. When none is
/// attached yet the identifier is hashed from the key directly.
pub struct SelfIssuer<'a> {
    params: &'a CertificateParams,
    key: &'a KeyPair,
}

impl<'a> SelfIssuer<'a> {
    pub fn new(params: &'a CertificateParams, key: &'a KeyPair) -> Self {
        Self { params, key }
    }
}

impl Issuer for SelfIssuer<'_> {
    fn issuer_name(&self) -> Result<Name> {
        self.params.subject.as_x509_name()
    }

    fn signing_key(&self) -> &KeyPair {
        self.key
    }

    fn key_identifier(&self) -> Result<Vec<u8>> {
        match self.params.subject_key_identifier()? {
            Some(key_identifier) => Ok(key_identifier),
            None => self.key.public_key().key_identifier(),
        }
    }
}
