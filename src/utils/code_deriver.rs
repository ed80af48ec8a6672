//! Deterministic short-code derivation.
//!
//! A code is a pure function of `(canonical URL, tenant id, retry salt)`:
//! the inputs are hashed with SHA-256 and a slice of the digest is encoded
//! over a base-58 alphabet. The same URL in the same tenant always derives
//! the same code — there is no random generation anywhere in this engine.

use sha2::{Digest, Sha256};

/// Base-58 alphabet used for code encoding.
///
/// Excludes the visually ambiguous glyphs `0`, `O`, `I` and `l`. The ordering
/// is fixed; codes are only interoperable across systems that share it.
pub const CODE_ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Default target length of a derived code.
pub const DEFAULT_CODE_LENGTH: usize = 10;

/// Longest code the 128-bit digest slice can fill without padding tricks.
pub const MAX_CODE_LENGTH: usize = 22;

/// Separator between hash-input segments. Unescaped `|` does not survive
/// canonicalization, so it cannot collide with URL content.
const HASH_SEPARATOR: u8 = b'|';

/// Longest base-58 encoding of a 64-bit value.
const U64_ENCODED_MAX: usize = 11;

/// Errors produced by [`derive_code`] for unusable arguments.
#[derive(Debug, thiserror::Error)]
pub enum DeriveError {
    #[error("canonical URL must not be empty")]
    EmptyCanonicalUrl,

    #[error("tenant id must not be empty")]
    EmptyTenant,

    #[error("code length must be between 1 and {MAX_CODE_LENGTH}, got {0}")]
    InvalidLength(usize),
}

/// Derives the short code for a canonical URL within a tenant.
///
/// # Hash Input
///
/// `canonical_url | tenant_id` for the first attempt, and
/// `canonical_url | tenant_id | retry_salt` when `retry_salt > 0`. The salt
/// segment is omitted entirely at salt zero so that first-attempt codes
/// match the documented vectors.
///
/// # Encoding
///
/// The first 8 digest bytes are read as a big-endian `u64` and base-58
/// encoded; requested lengths beyond 11 characters switch to the first 16
/// bytes as a `u128`. The encoding is left-padded with `1` (the alphabet's
/// first character) or prefix-truncated to exactly `length` characters.
///
/// # Errors
///
/// Returns [`DeriveError`] when the canonical URL or tenant id is empty, or
/// `length` is zero or above [`MAX_CODE_LENGTH`].
///
/// # Examples
///
/// ```
/// use link_engine::utils::code_deriver::derive_code;
///
/// let code = derive_code("https://example.com/", "1", 0, 10).unwrap();
/// assert_eq!(code, "5iYuwgtuQo");
/// ```
pub fn derive_code(
    canonical_url: &str,
    tenant_id: &str,
    retry_salt: u32,
    length: usize,
) -> Result<String, DeriveError> {
    if canonical_url.is_empty() {
        return Err(DeriveError::EmptyCanonicalUrl);
    }
    if tenant_id.is_empty() {
        return Err(DeriveError::EmptyTenant);
    }
    if length == 0 || length > MAX_CODE_LENGTH {
        return Err(DeriveError::InvalidLength(length));
    }

    let mut hasher = Sha256::new();
    hasher.update(canonical_url.as_bytes());
    hasher.update([HASH_SEPARATOR]);
    hasher.update(tenant_id.as_bytes());
    if retry_salt > 0 {
        hasher.update([HASH_SEPARATOR]);
        hasher.update(retry_salt.to_string().as_bytes());
    }
    let digest = hasher.finalize();

    let value = if length <= U64_ENCODED_MAX {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(&digest[..8]);
        u64::from_be_bytes(buf) as u128
    } else {
        let mut buf = [0u8; 16];
        buf.copy_from_slice(&digest[..16]);
        u128::from_be_bytes(buf)
    };

    let mut encoded = encode_base58(value);
    if encoded.len() > length {
        encoded.truncate(length);
    }
    while encoded.len() < length {
        encoded.insert(0, CODE_ALPHABET[0] as char);
    }

    Ok(encoded)
}

/// Positional base-58 encoding, most significant digit first.
fn encode_base58(mut value: u128) -> String {
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(CODE_ALPHABET[(value % 58) as usize]);
        value /= 58;
    }
    digits.reverse();
    // A zero value encodes to no digits; padding in the caller fills it.
    String::from_utf8(digits).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_reference_vector() {
        let code = derive_code("https://example.com/", "1", 0, DEFAULT_CODE_LENGTH).unwrap();
        assert_eq!(code, "5iYuwgtuQo");
    }

    #[test]
    fn test_derive_is_deterministic() {
        let a = derive_code("https://example.com/", "1", 0, 10).unwrap();
        let b = derive_code("https://example.com/", "1", 0, 10).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_derive_tenant_isolation() {
        let t1 = derive_code("https://example.com/", "1", 0, 10).unwrap();
        let t2 = derive_code("https://example.com/", "2", 0, 10).unwrap();
        assert_ne!(t1, t2);
        assert_eq!(t2, "beB6ezFKE8");
    }

    #[test]
    fn test_derive_salt_changes_code() {
        let salt0 = derive_code("https://example.com/", "1", 0, 10).unwrap();
        let salt1 = derive_code("https://example.com/", "1", 1, 10).unwrap();
        assert_ne!(salt0, salt1);
        assert_eq!(salt1, "4fmnd22vUF");
    }

    #[test]
    fn test_derive_query_participates() {
        let code = derive_code("http://example.com/path?a=2&z=1", "42", 0, 10).unwrap();
        assert_eq!(code, "JW2DgLuWMP");
    }

    #[test]
    fn test_derive_has_requested_length() {
        for length in [1, 5, 10, 11, 16, 22] {
            let code = derive_code("https://example.com/", "1", 0, length).unwrap();
            assert_eq!(code.len(), length, "wrong length for {length}");
        }
    }

    #[test]
    fn test_derive_longer_length_uses_wider_digest_slice() {
        let code = derive_code("https://example.com/", "1", 0, 16).unwrap();
        assert_eq!(code, "4UxEdYdJekLyFMeH");
    }

    #[test]
    fn test_derive_alphabet_excludes_ambiguous_glyphs() {
        let code = derive_code("https://example.com/very/long/path?x=1", "7", 3, 22).unwrap();
        for c in code.chars() {
            assert!(!"0OIl".contains(c), "ambiguous glyph {c} in {code}");
        }
    }

    #[test]
    fn test_derive_empty_canonical_url() {
        let result = derive_code("", "1", 0, 10);
        assert!(matches!(result, Err(DeriveError::EmptyCanonicalUrl)));
    }

    #[test]
    fn test_derive_empty_tenant() {
        let result = derive_code("https://example.com/", "", 0, 10);
        assert!(matches!(result, Err(DeriveError::EmptyTenant)));
    }

    #[test]
    fn test_derive_zero_length() {
        let result = derive_code("https://example.com/", "1", 0, 0);
        assert!(matches!(result, Err(DeriveError::InvalidLength(0))));
    }

    #[test]
    fn test_derive_oversized_length() {
        let result = derive_code("https://example.com/", "1", 0, MAX_CODE_LENGTH + 1);
        assert!(matches!(result, Err(DeriveError::InvalidLength(_))));
    }

    #[test]
    fn test_alphabet_has_58_unique_characters() {
        use std::collections::HashSet;
        let unique: HashSet<u8> = CODE_ALPHABET.iter().copied().collect();
        assert_eq!(unique.len(), 58);
    }
}
