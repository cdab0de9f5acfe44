pub mod aggregate;
pub mod form;
pub mod validation;

pub use form::{FormErrors, InterestOption, MerchantForm, build_sheet_row};
