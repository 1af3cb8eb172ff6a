//! Object id utilities
//!
//! Entity identifiers are 24-character lowercase hex strings: a 4-byte
//! big-endian unix timestamp followed by 8 random bytes. Path parameters
//! that fail `is_valid` are rejected before any database lookup.

use chrono::Utc;
use rand::Rng;

/// Generate a new 24-hex-character object id
pub fn generate() -> String {
    let mut buf = [0u8; 12];
    let ts = Utc::now().timestamp() as u32;
    buf[..4].copy_from_slice(&ts.to_be_bytes());
    rand::thread_rng().fill(&mut buf[4..]);

    let mut out = String::with_capacity(24);
    for byte in buf {
        out.push_str(&format!("{:02x}", byte));
    }
    out
}

/// Check that a path parameter has the object id shape
pub fn is_valid(s: &str) -> bool {
    s.len() == 24 && s.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_valid() {
        for _ in 0..100 {
            let id = generate();
            assert_eq!(id.len(), 24);
            assert!(is_valid(&id));
        }
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        let a = generate();
        let b = generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_rejects_malformed_ids() {
        assert!(!is_valid(""));
        assert!(!is_valid("123"));
        assert!(!is_valid("zzzzzzzzzzzzzzzzzzzzzzzz"));
        assert!(!is_valid("0123456789abcdef0123456789abcdef")); // 32 chars
        assert!(!is_valid("0123456789abcdef0123456")); // 23 chars
        assert!(is_valid("0123456789abcdef01234567"));
        assert!(is_valid("507F1F77BCF86CD799439011")); // uppercase hex accepted
    }
}
