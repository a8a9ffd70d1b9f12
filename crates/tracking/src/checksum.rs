use sha2::{Digest, Sha256};

/// Checksum of a piece of source text, used for text range and line hashes.
///
/// ASCII whitespace is stripped before hashing so that re-indenting or
/// re-wrapping the flagged code keeps the same checksum. Other Unicode spaces
/// are part of the content. The SHA-256 digest is folded to its first four
/// bytes.
#[must_use]
pub fn checksum(content: &str) -> i32 {
    let mut hasher = Sha256::new();
    for c in content.chars().filter(|c| !c.is_ascii_whitespace()) {
        let mut buf = [0u8; 4];
        hasher.update(c.encode_utf8(&mut buf).as_bytes());
    }
    let digest = hasher.finalize();
    i32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}
