//! Administrative safeguards.

use crate::error::CoreError;

/// Confirmation token expected by destructive admin operations unless
/// overridden in configuration.
///
/// This is a guard against accidental deletes, not an authentication
/// mechanism.
pub const DEFAULT_ADMIN_CONFIRM_CODE: &str = "SUPPRIMER";

/// Check a client-supplied confirmation token against the expected one.
pub fn check_confirm_code(provided: Option<&str>, expected: &str) -> Result<(), CoreError> {
    match provided {
        Some(code) if code == expected => Ok(()),
        Some(_) => Err(CoreError::Forbidden("Invalid confirmation code".into())),
        None => Err(CoreError::Forbidden("Confirmation code is required".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn matching_code_passes() {
        assert!(check_confirm_code(Some("SUPPRIMER"), DEFAULT_ADMIN_CONFIRM_CODE).is_ok());
    }

    #[test]
    fn wrong_or_missing_code_is_forbidden() {
        assert_matches!(
            check_confirm_code(Some("supprimer"), DEFAULT_ADMIN_CONFIRM_CODE),
            Err(CoreError::Forbidden(_))
        );
        assert_matches!(
            check_confirm_code(None, DEFAULT_ADMIN_CONFIRM_CODE),
            Err(CoreError::Forbidden(_))
        );
    }
}
