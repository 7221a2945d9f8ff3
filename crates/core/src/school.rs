//! School registry validation.

use validator::ValidateEmail;

use crate::error::CoreError;

/// Maximum school name length.
pub const NAME_MAX_LEN: usize = 200;

/// Validate a new school registration.
pub fn validate_new_school(name: &str, contact_email: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("name must not be empty".into()));
    }
    if name.len() > NAME_MAX_LEN {
        return Err(CoreError::Validation(format!(
            "name must be at most {NAME_MAX_LEN} characters"
        )));
    }
    if !contact_email.validate_email() {
        return Err(CoreError::Validation(
            "contact_email must be a valid email address".into(),
        ));
    }
    Ok(())
}
