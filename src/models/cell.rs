use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A single typed value in the sheet, as a spreadsheet cell holds it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Date(DateTime<Utc>),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// Render the cell the way the read endpoint serializes it.
    /// Dates become RFC 3339 timestamps, everything else trimmed text.
    pub fn render(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.trim().to_string(),
            Cell::Number(n) => render_number(*n),
            Cell::Date(d) => d.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

fn render_number(n: f64) -> String {
    // Integral values print without a trailing ".0"
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl From<&serde_json::Value> for Cell {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Cell::text(""),
            serde_json::Value::String(s) => Cell::text(s.clone()),
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(Cell::Number)
                .unwrap_or_else(|| Cell::text(n.to_string())),
            other => Cell::text(other.to_string()),
        }
    }
}
