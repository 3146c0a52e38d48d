#![allow(dead_code)]

use std::path::PathBuf;

use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

pub const CERT_FILE: &str = "testcert.cer";
pub const KEY_FILE: &str = "testkey.pvk";
pub const VERIFICATION_FILE: &str = "verify.cer";

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Scratch directory holding the CA, key and verification file paths of one test.
pub struct Fixture {
    pub dir: TempDir,
    pub cert: PathBuf,
    pub key: PathBuf,
    pub verification: PathBuf,
}

pub fn fixture() -> Fixture {
    init_tracing();
    let dir = TempDir::new().unwrap();
    Fixture {
        cert: dir.path().join(CERT_FILE),
        key: dir.path().join(KEY_FILE),
        verification: dir.path().join(VERIFICATION_FILE),
        dir,
    }
}
