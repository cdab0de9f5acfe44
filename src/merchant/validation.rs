//! Per-field validation rules for the merchant form.
//!
//! Every validator is independent and returns the message to show under
//! the field when the value is rejected.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::SheetRow;
use crate::models::sheet::{
    ADDRESS, MERCHANT_NAME, MERCHANT_RESPONSE, PHONE_NUMBER, PINCODE, STORE_NAME,
};

use super::form::{InterestOption, RESPONSE_INTERESTED, RESPONSE_NOT_INTERESTED};

static STORE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}\p{N}\s\-'&.]+$").unwrap());

static MERCHANT_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}\s.'\-]+$").unwrap());

static ADDRESS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}\p{N}\s,.\-/]+$").unwrap());

pub const STORE_NAME_MIN: usize = 2;
pub const STORE_NAME_MAX: usize = 100;
pub const MERCHANT_NAME_MIN: usize = 2;
pub const MERCHANT_NAME_MAX: usize = 80;
pub const PHONE_MIN_DIGITS: usize = 10;
pub const PHONE_MAX_DIGITS: usize = 15;
pub const ADDRESS_MIN: usize = 10;
pub const ADDRESS_MAX: usize = 500;
pub const PINCODE_LEN: usize = 6;

pub type FieldResult = Result<(), String>;

pub fn validate_store_name(value: &str) -> FieldResult {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("Merchant store name is required".to_string());
    }
    let len = trimmed.chars().count();
    if len < STORE_NAME_MIN {
        return Err(format!("Store name must be at least {STORE_NAME_MIN} characters"));
    }
    if len > STORE_NAME_MAX {
        return Err(format!("Store name must be at most {STORE_NAME_MAX} characters"));
    }
    if !STORE_NAME_RE.is_match(trimmed) {
        return Err("Use only letters, numbers, spaces, and - ' & .".to_string());
    }
    Ok(())
}

pub fn validate_merchant_name(value: &str) -> FieldResult {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("Merchant name is required".to_string());
    }
    let len = trimmed.chars().count();
    if len < MERCHANT_NAME_MIN {
        return Err(format!("Name must be at least {MERCHANT_NAME_MIN} characters"));
    }
    if len > MERCHANT_NAME_MAX {
        return Err(format!("Name must be at most {MERCHANT_NAME_MAX} characters"));
    }
    if !MERCHANT_NAME_RE.is_match(trimmed) {
        return Err("Use only letters, spaces, and . ' -".to_string());
    }
    Ok(())
}

/// Strip everything except ASCII digits.
pub fn phone_digits(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

pub fn validate_phone(value: &str) -> FieldResult {
    let digits = phone_digits(value);
    if digits.is_empty() {
        return Err("Phone number is required".to_string());
    }
    if !(PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits.len()) {
        return Err(format!(
            "Enter a valid {PHONE_MIN_DIGITS}–{PHONE_MAX_DIGITS} digit phone number"
        ));
    }
    Ok(())
}

pub fn validate_address(value: &str) -> FieldResult {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("Address is required".to_string());
    }
    let len = trimmed.chars().count();
    if len < ADDRESS_MIN {
        return Err(format!("Address must be at least {ADDRESS_MIN} characters"));
    }
    if len > ADDRESS_MAX {
        return Err(format!("Address must be at most {ADDRESS_MAX} characters"));
    }
    if !ADDRESS_RE.is_match(trimmed) {
        return Err("Use only letters, numbers, spaces, and , . - /".to_string());
    }
    Ok(())
}

pub fn validate_pin_code(value: &str) -> FieldResult {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("Pin code is required".to_string());
    }
    if trimmed.len() != PINCODE_LEN || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("Pin code must be exactly {PINCODE_LEN} digits"));
    }
    Ok(())
}

pub fn validate_location(latitude: Option<f64>, longitude: Option<f64>) -> FieldResult {
    match (latitude, longitude) {
        (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => Ok(()),
        _ => Err("Please allow location access to get your coordinates".to_string()),
    }
}

pub fn validate_interest(value: &str) -> FieldResult {
    InterestOption::parse(value)
        .map(|_| ())
        .ok_or_else(|| "Please select Interested or Not interested".to_string())
}

/// Check a row received by the write endpoint against the form rules.
/// Rows are stored regardless; the result only annotates them.
pub fn row_warnings(row: &SheetRow) -> Vec<String> {
    let checks = [
        (STORE_NAME, validate_store_name(&row.store_name)),
        (MERCHANT_NAME, validate_merchant_name(&row.merchant_name)),
        (PHONE_NUMBER, validate_phone(&row.phone_number)),
        (ADDRESS, validate_address(&row.address)),
        (PINCODE, validate_pin_code(&row.pincode)),
        (
            MERCHANT_RESPONSE,
            match row.merchant_response.trim() {
                RESPONSE_INTERESTED | RESPONSE_NOT_INTERESTED => Ok(()),
                _ => Err("Unknown merchant response".to_string()),
            },
        ),
    ];

    checks
        .into_iter()
        .filter_map(|(column, result)| result.err().map(|msg| format!("{column}: {msg}")))
        .collect()
}
