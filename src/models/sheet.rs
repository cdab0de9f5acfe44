use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Cell;

pub const STORE_NAME: &str = "Merchant Store Name";
pub const MERCHANT_NAME: &str = "Merchant Name";
pub const PHONE_NUMBER: &str = "Phone Number";
pub const ADDRESS: &str = "Address";
pub const PINCODE: &str = "Pincode";
pub const LOCATION: &str = "Location";
pub const MERCHANT_RESPONSE: &str = "Merchant Response";
// Misspelled on purpose: existing sheets and clients use this header.
pub const POTENTIAL_PROBLEMS: &str = "Potenial Problems";
pub const SUBMITTED_AT: &str = "Submitted At";

/// Columns a client writes, in sheet order.
pub const WRITE_COLUMNS: [&str; 8] = [
    STORE_NAME,
    MERCHANT_NAME,
    PHONE_NUMBER,
    ADDRESS,
    PINCODE,
    LOCATION,
    MERCHANT_RESPONSE,
    POTENTIAL_PROBLEMS,
];

/// The full header row, including the server-stamped timestamp column.
pub const HEADER_ROW: [&str; 9] = [
    STORE_NAME,
    MERCHANT_NAME,
    PHONE_NUMBER,
    ADDRESS,
    PINCODE,
    LOCATION,
    MERCHANT_RESPONSE,
    POTENTIAL_PROBLEMS,
    SUBMITTED_AT,
];

/// Body of a write call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetRow {
    #[serde(rename = "Merchant Store Name")]
    pub store_name: String,
    #[serde(rename = "Merchant Name")]
    pub merchant_name: String,
    #[serde(rename = "Phone Number")]
    pub phone_number: String,
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "Pincode")]
    pub pincode: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Merchant Response")]
    pub merchant_response: String,
    #[serde(rename = "Potenial Problems")]
    pub potential_problems: String,
}

/// One data row as returned by the read call: header name -> rendered value.
pub type SheetRecord = BTreeMap<String, String>;

/// Body of a successful read call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SheetData {
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default)]
    pub rows: Vec<SheetRecord>,
}

impl SheetData {
    /// Turn raw sheet rows into headers plus keyed records.
    /// Row 0 is the header row; cells missing from short rows read as "".
    pub fn from_rows(rows: &[Vec<Cell>]) -> Self {
        let Some((header_row, data_rows)) = rows.split_first() else {
            return SheetData::default();
        };

        let headers: Vec<String> = header_row.iter().map(Cell::render).collect();

        let rows = data_rows
            .iter()
            .map(|row| {
                headers
                    .iter()
                    .enumerate()
                    .map(|(i, header)| {
                        let value = row.get(i).map(Cell::render).unwrap_or_default();
                        (header.clone(), value)
                    })
                    .collect()
            })
            .collect();

        SheetData { headers, rows }
    }
}

/// Response of a write call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppendResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
