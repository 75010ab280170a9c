//! Content hashing for immutable datasets.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

/// Length of the hash token embedded in public routes.
pub const TOKEN_LEN: usize = 7;

const HASH_BLOCK_SIZE: usize = 1024 * 1024;

/// SHA-256 of a file's bytes as lowercase hex, read in 1 MiB blocks.
pub fn hash_file(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; HASH_BLOCK_SIZE];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Truncate a content hash to its URL token.
///
/// Hashes shorter than [`TOKEN_LEN`] are used whole.
pub fn short_token(content_hash: &str) -> String {
    content_hash.chars().take(TOKEN_LEN).collect()
}

/// Token for the aggregate dataset.
///
/// Derived from the full constituent hashes (not their tokens) so any change
/// to a constituent changes the aggregate token.
pub fn aggregate_token<'a>(hashes: impl IntoIterator<Item = &'a str>) -> String {
    let joined = hashes.into_iter().collect::<Vec<_>>().join("\n");
    let digest = hex::encode(Sha256::digest(joined.as_bytes()));
    short_token(&digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_short_token() {
        assert_eq!(short_token("abcdef0123456789"), "abcdef0");
        assert_eq!(short_token("abc"), "abc");
    }

    #[test]
    fn test_hash_file_matches_digest() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"hello").unwrap();

        let hash = hash_file(file.path()).unwrap();
        assert_eq!(
            hash,
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_hash_file_missing() {
        assert!(hash_file(Path::new("/definitely/not/here.db")).is_err());
    }

    #[test]
    fn test_aggregate_token_tracks_full_hashes() {
        // Same 7-char prefixes, different full hashes.
        let a = aggregate_token(["abcdef0111", "1234567aaa"]);
        let b = aggregate_token(["abcdef0222", "1234567aaa"]);
        assert_eq!(a.len(), TOKEN_LEN);
        assert_ne!(a, b);
    }

    #[test]
    fn test_aggregate_token_is_order_sensitive() {
        let a = aggregate_token(["aaa", "bbb"]);
        let b = aggregate_token(["bbb", "aaa"]);
        assert_ne!(a, b);
        assert_eq!(a, aggregate_token(["aaa", "bbb"]));
    }
}
