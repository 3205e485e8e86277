use std::fmt;

use sha2::{Digest, Sha256};

/// Content fingerprint of a set of generated sources.
///
/// Two generations with byte-identical output produce equal signatures, which
/// lets the watch loop skip rewriting files when nothing changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature([u8; 32]);

impl Signature {
    /// Hash the given parts in order. Each part is length-prefixed so that
    /// `["ab", "c"]` and `["a", "bc"]` differ.
    pub fn of<'a>(parts: impl IntoIterator<Item = &'a str>) -> Self {
        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update((part.len() as u64).to_le_bytes());
            hasher.update(part.as_bytes());
        }
        Self(hasher.finalize().into())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0[..8] {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_is_stable() {
        assert_eq!(Signature::of(["a", "b"]), Signature::of(["a", "b"]));
    }

    #[test]
    fn test_signature_is_boundary_sensitive() {
        assert_ne!(Signature::of(["ab", "c"]), Signature::of(["a", "bc"]));
    }

    #[test]
    fn test_signature_display_is_short_hex() {
        let text = Signature::of(["mock"]).to_string();
        assert_eq!(text.len(), 16);
        assert!(text.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
