use std::collections::BTreeMap;

use serde::Deserialize;

use crate::models::SheetRow;

use super::validation;

pub const RESPONSE_INTERESTED: &str = "Interested";
pub const RESPONSE_NOT_INTERESTED: &str = "Not interested";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterestOption {
    Interested,
    NotInterested,
}

impl InterestOption {
    /// Parse the form value (`interested` / `not-interested`).
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "interested" => Some(InterestOption::Interested),
            "not-interested" => Some(InterestOption::NotInterested),
            _ => None,
        }
    }

    pub fn form_value(self) -> &'static str {
        match self {
            InterestOption::Interested => "interested",
            InterestOption::NotInterested => "not-interested",
        }
    }

    /// The `Merchant Response` value written to the sheet.
    pub fn label(self) -> &'static str {
        match self {
            InterestOption::Interested => RESPONSE_INTERESTED,
            InterestOption::NotInterested => RESPONSE_NOT_INTERESTED,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Field {
    StoreName,
    MerchantName,
    PhoneNumber,
    Address,
    PinCode,
    Location,
    Interest,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::StoreName => "store_name",
            Field::MerchantName => "merchant_name",
            Field::PhoneNumber => "phone_number",
            Field::Address => "address",
            Field::PinCode => "pin_code",
            Field::Location => "location",
            Field::Interest => "interest",
        }
    }
}

/// Failing fields and the message to show for each.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormErrors(BTreeMap<Field, String>);

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }

    fn check(&mut self, field: Field, result: validation::FieldResult) {
        if let Err(message) = result {
            self.0.insert(field, message);
        }
    }
}

/// Raw form post. Every input arrives as text; coordinates are filled in
/// by the browser's geolocation call and may be blank.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FormInput {
    pub store_name: String,
    pub merchant_name: String,
    pub phone_number: String,
    pub address: String,
    pub pin_code: String,
    pub latitude: String,
    pub longitude: String,
    pub interest: String,
    pub potential_problems: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MerchantForm {
    pub store_name: String,
    pub merchant_name: String,
    pub phone_number: String,
    pub address: String,
    pub pin_code: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub interest: String,
    pub potential_problems: String,
}

impl From<FormInput> for MerchantForm {
    fn from(input: FormInput) -> Self {
        MerchantForm {
            store_name: input.store_name,
            merchant_name: input.merchant_name,
            phone_number: input.phone_number,
            address: input.address,
            pin_code: input.pin_code,
            latitude: parse_coordinate(&input.latitude),
            longitude: parse_coordinate(&input.longitude),
            interest: input.interest,
            potential_problems: input.potential_problems,
        }
    }
}

fn parse_coordinate(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

impl MerchantForm {
    /// `"lat, lng"` once both coordinates are captured, empty otherwise.
    pub fn location(&self) -> String {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => format!("{lat}, {lng}"),
            _ => String::new(),
        }
    }

    pub fn interest_option(&self) -> Option<InterestOption> {
        InterestOption::parse(&self.interest)
    }

    /// Run every field validator and collect the failures.
    pub fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::default();
        errors.check(Field::StoreName, validation::validate_store_name(&self.store_name));
        errors.check(
            Field::MerchantName,
            validation::validate_merchant_name(&self.merchant_name),
        );
        errors.check(Field::PhoneNumber, validation::validate_phone(&self.phone_number));
        errors.check(Field::Address, validation::validate_address(&self.address));
        errors.check(Field::PinCode, validation::validate_pin_code(&self.pin_code));
        errors.check(
            Field::Location,
            validation::validate_location(self.latitude, self.longitude),
        );
        errors.check(Field::Interest, validation::validate_interest(&self.interest));
        errors
    }
}

/// Convert a form into the row shape sent to the write endpoint.
pub fn build_sheet_row(form: &MerchantForm) -> SheetRow {
    SheetRow {
        store_name: form.store_name.trim().to_string(),
        merchant_name: form.merchant_name.trim().to_string(),
        phone_number: validation::phone_digits(&form.phone_number),
        address: form.address.trim().to_string(),
        pincode: form.pin_code.trim().to_string(),
        location: form.location(),
        merchant_response: form
            .interest_option()
            .map(|i| i.label().to_string())
            .unwrap_or_default(),
        potential_problems: form.potential_problems.trim().to_string(),
    }
}
