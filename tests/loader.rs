mod util;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use certforge::cert::Certificate;
use certforge::fixture::create_test_cert;
use certforge::loader::{CertificateContent, open_certificate, read_certificate};

#[test]
fn test_der_certificate_is_returned_as_base64() {
    let fx = util::fixture();
    create_test_cert(&fx.cert, &fx.key, "TESTCERT-DER", 3, 9).unwrap();
    let pem = std::fs::read_to_string(&fx.cert).unwrap();
    let der = Certificate::from_pem(&pem).unwrap().to_der().unwrap();

    let der_path = fx.dir.path().join("binary.cer");
    std::fs::write(&der_path, &der).unwrap();

    let encoded = open_certificate(&der_path).unwrap();
    assert!(!encoded.is_empty());
    assert!(!encoded.contains("-----BEGIN"));
    assert_eq!(STANDARD.decode(&encoded).unwrap(), der);
    assert_eq!(
        read_certificate(&der_path).unwrap(),
        Some(CertificateContent::Base64Der(encoded))
    );
}

#[test]
fn test_pem_certificate_is_returned_verbatim() {
    let fx = util::fixture();
    create_test_cert(&fx.cert, &fx.key, "TESTCERT-PEM", 3, 9).unwrap();

    // The test CA is stored under a .cer name but holds PEM text.
    let text = open_certificate(&fx.cert).unwrap();
    assert_eq!(text, std::fs::read_to_string(&fx.cert).unwrap());
    assert!(text.starts_with("-----BEGIN CERTIFICATE-----"));
}

#[test]
fn test_key_file_extension_is_not_loaded() {
    let fx = util::fixture();
    create_test_cert(&fx.cert, &fx.key, "TESTCERT-PVK", 3, 9).unwrap();

    assert_eq!(open_certificate(&fx.key).unwrap(), "");
    assert_eq!(read_certificate(&fx.key).unwrap(), None);
}

#[test]
fn test_utf8_text_that_is_not_pem_is_still_text() {
    let fx = util::fixture();
    let path = fx.dir.path().join("notes.pem");
    std::fs::write(&path, "not really a certificate\n").unwrap();

    assert_eq!(
        read_certificate(&path).unwrap(),
        Some(CertificateContent::Text("not really a certificate\n".to_string()))
    );
}

#[test]
fn test_uppercase_extension_is_ignored() {
    let fx = util::fixture();
    let path = fx.dir.path().join("CERT.PEM");
    std::fs::write(&path, "-----BEGIN CERTIFICATE-----").unwrap();

    assert_eq!(open_certificate(&path).unwrap(), "");
}
