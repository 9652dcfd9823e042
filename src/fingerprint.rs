//! File content fingerprinting.
//!
//! A fingerprint is the (size, SHA-256 digest) pair identifying one version of
//! a file's content. The digest is streamed over fixed-size blocks so a
//! byte-level change is detected even when the size happens to be unchanged.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};

const BLOCK_SIZE: usize = 64 * 1024;

/// Size and hex content digest identifying one version of a file's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint {
    /// File size in bytes.
    pub size: i64,
    /// Lowercase hex SHA-256 over the full content.
    pub digest: String,
}

/// Compute the fingerprint of a file by streaming its content.
///
/// Fails with the underlying I/O error if the path disappears between
/// discovery and read; the caller is expected to skip the file and continue.
pub fn fingerprint_file(path: &Path) -> std::io::Result<Fingerprint> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; BLOCK_SIZE];
    let mut size: u64 = 0;

    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        size += n as u64;
        hasher.update(&buf[..n]);
    }

    Ok(Fingerprint {
        size: size as i64,
        digest: hex::encode(hasher.finalize()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn digest_changes_with_content_of_same_size() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("a.txt");

        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"AAAA")
            .unwrap();
        let first = fingerprint_file(&path).unwrap();

        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"AAAB")
            .unwrap();
        let second = fingerprint_file(&path).unwrap();

        assert_eq!(first.size, second.size);
        assert_ne!(first.digest, second.digest);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(fingerprint_file(&dir.path().join("gone")).is_err());
    }

    #[test]
    fn known_digest() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("empty-ish.txt");
        std::fs::write(&path, "abc").unwrap();

        let fp = fingerprint_file(&path).unwrap();
        assert_eq!(fp.size, 3);
        assert_eq!(
            fp.digest,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
