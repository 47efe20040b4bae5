//! Field format rules for the lead form

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    // Outward code, optional space, inward code. Case-insensitive.
    static ref UK_POSTCODE_REGEX: Regex = Regex::new(
        r"(?i)^[A-Z]{1,2}\d{1,2}[A-Z]?\s?\d[A-Z]{2}$"
    ).unwrap();

    // UK number with leading 0 or +44, checked after stripping whitespace.
    static ref UK_PHONE_REGEX: Regex = Regex::new(
        r"^(\+44|0)[0-9]{10}$"
    ).unwrap();

    // Minimal local@domain.tld shape.
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$"
    ).unwrap();
}

pub fn is_valid_postcode(postcode: &str) -> bool {
    UK_POSTCODE_REGEX.is_match(postcode.trim())
}

pub fn is_valid_phone(phone: &str) -> bool {
    let stripped: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    UK_PHONE_REGEX.is_match(&stripped)
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email.trim())
}

fn rule_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

pub fn validate_postcode(postcode: &str) -> Result<(), ValidationError> {
    if postcode.trim().is_empty() {
        return Err(rule_error("missing_field", "Postcode is required"));
    }
    if !is_valid_postcode(postcode) {
        return Err(rule_error(
            "invalid_format",
            "Please enter a valid UK postcode",
        ));
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.trim().is_empty() {
        return Err(rule_error("missing_field", "Phone number is required"));
    }
    if !is_valid_phone(phone) {
        return Err(rule_error(
            "invalid_format",
            "Please enter a valid UK phone number",
        ));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() {
        return Err(rule_error("missing_field", "Email address is required"));
    }
    if email.len() > 254 || !is_valid_email(email) {
        return Err(rule_error(
            "invalid_format",
            "Please enter a valid email address",
        ));
    }
    Ok(())
}
