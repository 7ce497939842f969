//! Validation helpers shared by account entities and request DTOs

use regex::Regex;
use validator::ValidationError;

lazy_static::lazy_static! {
    /// Optional leading `+`, optional `1`, then 9 to 15 digits
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^\+?1?\d{9,15}$").unwrap();

    /// Letters, digits and `@ . + - _`
    pub static ref USERNAME_REGEX: Regex = Regex::new(r"^[\w.@+-]+$").unwrap();
}

pub const MAX_BIO_LEN: usize = 500;
pub const MIN_PASSWORD_LEN: u64 = 8;

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_REGEX.is_match(phone)
}

/// `validator` adapter for phone fields
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if is_valid_phone(phone) {
        Ok(())
    } else {
        let mut err = ValidationError::new("phone");
        err.message = Some(
            "Phone number must be entered in the format: '+999999999'. Up to 15 digits allowed."
                .into(),
        );
        Err(err)
    }
}

/// `validator` adapter for usernames
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if USERNAME_REGEX.is_match(username) {
        Ok(())
    } else {
        let mut err = ValidationError::new("username");
        err.message =
            Some("Username may contain only letters, numbers, and @/./+/-/_ characters.".into());
        Err(err)
    }
}
