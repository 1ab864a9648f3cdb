//! Share identifier generation.
//!
//! Share ids are the only lookup key for read access to a character, so
//! they are long enough to be unguessable in practice and restricted to
//! URL-safe characters.

use rand::Rng;

/// Length of a generated share id.
pub const SHARE_ID_LENGTH: usize = 12;

/// Generate a new random alphanumeric share id.
///
/// Uniqueness against the store is checked by the caller.
pub fn generate_share_id() -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(SHARE_ID_LENGTH)
        .map(char::from)
        .collect()
}

/// `true` when `candidate` could have been produced by [`generate_share_id`]
/// or is a legacy id (alphanumeric plus `-`/`_`, 1 to 64 characters).
pub fn is_valid_share_id(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate.len() <= 64
        && candidate
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_have_expected_shape() {
        let id = generate_share_id();
        assert_eq!(id.len(), SHARE_ID_LENGTH);
        assert!(is_valid_share_id(&id));
    }

    #[test]
    fn generated_ids_differ() {
        assert_ne!(generate_share_id(), generate_share_id());
    }

    #[test]
    fn rejects_key_separators_and_globs() {
        assert!(!is_valid_share_id("a:b"));
        assert!(!is_valid_share_id("*"));
        assert!(!is_valid_share_id(""));
    }
}
