//! Client-side form checks shared by the input records.
//!
//! These mirror the rules the portal's forms enforce before submitting.
//! Server-side rules such as ISBN uniqueness are left to the API.

use crate::error::{ClientError, Result};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;
pub const MIN_PASSWORD_LEN: usize = 6;

pub fn require_non_blank(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ClientError::invalid_input(format!("{field} is required")));
    }
    Ok(())
}

/// Accepts ISBN-10 (last char may be `X`) and ISBN-13, ignoring hyphens and
/// spaces.
pub fn validate_isbn(isbn: &str) -> Result<()> {
    require_non_blank("ISBN", isbn)?;
    let compact: Vec<char> = isbn
        .chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .collect();
    let valid = match compact.len() {
        13 => compact.iter().all(char::is_ascii_digit),
        10 => {
            compact[..9].iter().all(char::is_ascii_digit)
                && (compact[9].is_ascii_digit() || compact[9] == 'X' || compact[9] == 'x')
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(ClientError::invalid_input(
            "ISBN must contain 10 or 13 digits",
        ))
    }
}

pub fn validate_rating(rating: u8) -> Result<()> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(())
    } else {
        Err(ClientError::invalid_input(format!(
            "Rating must be between {MIN_RATING} and {MAX_RATING}"
        )))
    }
}

pub fn validate_email(email: &str) -> Result<()> {
    require_non_blank("Email", email)?;
    let trimmed = email.trim();
    match trimmed.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(ClientError::invalid_input("Email address is invalid")),
    }
}

pub fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ClientError::invalid_input(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isbn_variants() {
        assert!(validate_isbn("9780441013593").is_ok());
        assert!(validate_isbn("978 0 441 01359 3").is_ok());
        assert!(validate_isbn("0-306-40615-X").is_ok());
        assert!(validate_isbn("0306406152").is_ok());
        assert!(validate_isbn("97804410135").is_err());
        assert!(validate_isbn("978044101359A").is_err());
        assert!(validate_isbn("").is_err());
    }

    #[test]
    fn test_rating_bounds() {
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(5).is_ok());
        assert!(validate_rating(6).is_err());
    }

    #[test]
    fn test_email_and_password() {
        assert!(validate_email("reader@example.com").is_ok());
        assert!(validate_email("reader@localhost").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_password("secret").is_ok());
        assert!(validate_password("short").is_err());
    }
}
