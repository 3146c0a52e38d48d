use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey, EncodeRsaPrivateKey};
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha1::{Digest, Sha1};
use sha2::Sha256;
use spki::SubjectPublicKeyInfoOwned;

use crate::error::{CertForgeError, Result};

/// An RSA key pair. Signatures are always RSASSA-PKCS1-v1_5 over SHA-256.
#[derive(Clone)]
pub struct KeyPair {
    private: Box<RsaPrivateKey>,
    public: RsaPublicKey,
}

impl KeyPair {
    /// Generate an RSA key pair with the specified number of bits.
    pub fn generate_rsa(bits: usize) -> Result<Self> {
        tracing::debug!(bits, "generating RSA key pair");
        let mut rng = rand_core::OsRng;
        let private = RsaPrivateKey::new(&mut rng, bits)
            .map_err(|e| CertForgeError::KeyGenerationError(e.to_string()))?;
        Ok(Self::from_private_key(private))
    }

    pub fn from_private_key(private: RsaPrivateKey) -> Self {
        let public = RsaPublicKey::from(&private);
        KeyPair {
            private: Box::new(private),
            public,
        }
    }

    /// Import a private key from PEM text, either PKCS#1 (`RSA PRIVATE KEY`)
    /// or PKCS#8 (`PRIVATE KEY`).
    pub fn import_from_pem(pem: &str) -> Result<Self> {
        let private = match RsaPrivateKey::from_pkcs1_pem(pem) {
            Ok(private) => private,
            Err(_) => <RsaPrivateKey as pkcs8::DecodePrivateKey>::from_pkcs8_pem(pem)?,
        };
        Ok(Self::from_private_key(private))
    }

    /// Export the private key as PKCS#1 PEM with LF line endings.
    pub fn to_pkcs1_pem(&self) -> Result<String> {
        let pem = self.private.to_pkcs1_pem(pkcs8::LineEnding::LF)?;
        Ok(pem.to_string())
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.public.clone())
    }

    /// Size of the modulus in bits.
    pub fn bits(&self) -> usize {
        self.public.n().bits()
    }

    /// Signs `data` with SHA-256 and PKCS#1 v1.5 padding.
    pub fn sign_data(&self, data: &[u8]) -> Result<Vec<u8>> {
        let signing_key: SigningKey<Sha256> = SigningKey::new((*self.private).clone());
        let signature = signing_key.try_sign(data)?;
        Ok(signature.to_vec())
    }
}

/// The public half of an RSA key pair, as embedded in a certificate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey(RsaPublicKey);

impl PublicKey {
    pub fn from_key_pair(key_pair: &KeyPair) -> Self {
        key_pair.public_key()
    }

    /// Extracts the RSA key from a certificate's SubjectPublicKeyInfo.
    pub fn from_x509spki(spki: &SubjectPublicKeyInfoOwned) -> Result<Self> {
        if spki.algorithm.oid != const_oid::db::rfc5912::RSA_ENCRYPTION {
            return Err(CertForgeError::DecodingError(format!(
                "Unsupported public key algorithm {}",
                spki.algorithm.oid
            )));
        }
        let public = RsaPublicKey::from_pkcs1_der(spki.subject_public_key.raw_bytes())?;
        Ok(PublicKey(public))
    }

    pub fn to_spki(&self) -> Result<SubjectPublicKeyInfoOwned> {
        Ok(SubjectPublicKeyInfoOwned::from_key(self.0.clone())?)
    }

    /// SHA-1 of the subjectPublicKey bit string (RFC 5280, section 4.2.1.2, method 1).
    pub fn key_identifier(&self) -> Result<Vec<u8>> {
        let spki = self.to_spki()?;
        Ok(Sha1::digest(spki.subject_public_key.raw_bytes()).to_vec())
    }

    pub fn bits(&self) -> usize {
        self.0.n().bits()
    }

    /// Checks a SHA-256 / PKCS#1 v1.5 `signature` over `data`.
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> Result<()> {
        let verifying_key: VerifyingKey<Sha256> = VerifyingKey::new(self.0.clone());
        let signature = Signature::try_from(signature)?;
        verifying_key.verify(data, &signature)?;
        Ok(())
    }
}
