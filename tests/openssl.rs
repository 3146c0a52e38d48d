mod util;

use certforge::device::generate_self_signed;
use certforge::fixture::{create_test_cert, create_verification_cert};
use openssl::hash::MessageDigest;
use openssl::nid::Nid;
use openssl::pkey::PKey;
use openssl::x509::{X509, X509VerifyResult};

fn common_name(name: &openssl::x509::X509NameRef) -> String {
    name.entries_by_nid(Nid::COMMONNAME)
        .next()
        .unwrap()
        .data()
        .as_utf8()
        .unwrap()
        .to_string()
}

#[test]
fn test_openssl_crate_validate_device_cert() {
    util::init_tracing();
    let bundle = generate_self_signed("device-openssl", 30, None).unwrap();

    let x509 = X509::from_pem(bundle.certificate.as_bytes()).expect("Failed to parse PEM");
    assert_eq!(common_name(x509.subject_name()), "device-openssl");
    assert_eq!(common_name(x509.issuer_name()), "device-openssl");
    assert_eq!(x509.version(), 0, "Device certificates are X.509 v1");
    assert_eq!(
        x509.signature_algorithm().object().nid(),
        Nid::SHA256WITHRSAENCRYPTION
    );

    let key = PKey::private_key_from_pem(bundle.private_key.as_bytes()).unwrap();
    assert_eq!(key.bits(), 2048);
    assert!(x509.verify(&key).unwrap(), "Self signature does not verify");

    let digest = x509.digest(MessageDigest::sha1()).unwrap();
    assert_eq!(hex::encode_upper(&*digest), bundle.thumbprint);
}

#[test]
fn test_openssl_crate_validate_verification_chain() {
    let fx = util::fixture();
    create_test_cert(&fx.cert, &fx.key, "TESTCERT123", 3, 42).unwrap();
    create_verification_cert(&fx.cert, &fx.key, &fx.verification, "abc-nonce-001", 3, 43)
        .unwrap();

    let ca = X509::from_pem(&std::fs::read(&fx.cert).unwrap()).unwrap();
    let verification = X509::from_pem(&std::fs::read(&fx.verification).unwrap()).unwrap();

    assert_eq!(ca.version(), 2);
    assert_eq!(verification.version(), 2);
    assert_eq!(
        ca.serial_number().to_bn().unwrap().to_dec_str().unwrap().to_string(),
        "42"
    );
    assert_eq!(common_name(verification.subject_name()), "abc-nonce-001");
    assert_eq!(common_name(verification.issuer_name()), "TESTCERT123");

    let ca_key = ca.public_key().unwrap();
    assert_eq!(ca_key.bits(), 2046);
    assert!(ca.verify(&ca_key).unwrap());
    assert!(verification.verify(&ca_key).unwrap());
    assert_eq!(ca.issued(&verification), X509VerifyResult::OK);

    let ca_ski = ca.subject_key_id().unwrap().as_slice().to_vec();
    assert_eq!(ca.authority_key_id().unwrap().as_slice(), ca_ski.as_slice());
    assert_eq!(
        verification.authority_key_id().unwrap().as_slice(),
        ca_ski.as_slice()
    );
}
