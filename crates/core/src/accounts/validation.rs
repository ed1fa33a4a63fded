//! Account field validation.

use super::error::AccountError;

/// Maximum length of an account code.
pub const MAX_CODE_LEN: usize = 20;

/// Trims and validates an account code.
///
/// # Errors
///
/// Returns `AccountError::InvalidCode` if the trimmed code is empty or longer
/// than [`MAX_CODE_LEN`] characters.
pub fn normalize_code(code: &str) -> Result<String, AccountError> {
    let trimmed = code.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_CODE_LEN {
        return Err(AccountError::InvalidCode(code.to_string()));
    }
    Ok(trimmed.to_string())
}

/// Maximum length of an account name.
pub const MAX_NAME_LEN: usize = 255;

/// Trims and validates an account name.
///
/// # Errors
///
/// Returns `AccountError::InvalidName` if the trimmed name is empty or longer
/// than [`MAX_NAME_LEN`] characters.
pub fn validate_name(name: &str) -> Result<String, AccountError> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_NAME_LEN {
        return Err(AccountError::InvalidName);
    }
    Ok(trimmed.to_string())
}
