use crate::error::{CertForgeError, Result};

pub const CERTIFICATE_LABEL: &str = "CERTIFICATE";

/// Convert a PEM‑encoded string to DER‑encoded bytes, checking its label.
pub fn pem_to_der(pem_str: &str, label: &str) -> Result<Vec<u8>> {
    let pem = pem::parse(pem_str)?;
    if pem.tag() != label {
        return Err(CertForgeError::DecodingError(format!(
            "Expected PEM label {label}, found {}",
            pem.tag()
        )));
    }
    Ok(pem.contents().to_vec())
}

/// Returns true when `text` holds at least one PEM block of any label.
pub fn looks_like_pem(text: &str) -> bool {
    pem::parse(text).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_mismatch_is_rejected() {
        let encoded = pem::encode(&pem::Pem::new("RSA PRIVATE KEY", vec![1, 2, 3]));
        assert!(pem_to_der(&encoded, CERTIFICATE_LABEL).is_err());
        assert!(looks_like_pem(&encoded));
    }

    #[test]
    fn test_certificate_label_accepted() {
        let encoded = pem::encode(&pem::Pem::new(CERTIFICATE_LABEL, vec![0x30, 0x00]));
        assert_eq!(pem_to_der(&encoded, CERTIFICATE_LABEL).unwrap(), vec![0x30, 0x00]);
        assert!(!looks_like_pem("plain text"));
    }
}
