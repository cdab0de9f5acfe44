use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::models::SheetRecord;
use crate::models::sheet::{MERCHANT_RESPONSE, SUBMITTED_AT};

use super::form::{RESPONSE_INTERESTED, RESPONSE_NOT_INTERESTED};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResponseCounts {
    pub total: usize,
    pub interested: usize,
    pub not_interested: usize,
}

impl ResponseCounts {
    pub fn tally(rows: &[SheetRecord]) -> Self {
        let mut counts = ResponseCounts {
            total: rows.len(),
            ..Default::default()
        };
        for row in rows {
            match row.get(MERCHANT_RESPONSE).map(|v| v.trim()) {
                Some(RESPONSE_INTERESTED) => counts.interested += 1,
                Some(RESPONSE_NOT_INTERESTED) => counts.not_interested += 1,
                _ => {}
            }
        }
        counts
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResponseSlice {
    pub name: &'static str,
    pub count: usize,
    pub percent: f64,
}

/// Pie chart input: categories with a non-zero count and their share of
/// the categorized rows.
pub fn response_slices(counts: &ResponseCounts) -> Vec<ResponseSlice> {
    let categorized = counts.interested + counts.not_interested;
    [
        (RESPONSE_INTERESTED, counts.interested),
        (RESPONSE_NOT_INTERESTED, counts.not_interested),
    ]
    .into_iter()
    .filter(|(_, count)| *count > 0)
    .map(|(name, count)| ResponseSlice {
        name,
        count,
        percent: count as f64 * 100.0 / categorized as f64,
    })
    .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateCount {
    pub date: String,
    pub count: usize,
}

/// Calendar date (UTC, `YYYY-MM-DD`) of a submission timestamp.
pub fn submission_date(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    let date = if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        dt.with_timezone(&Utc).date_naive()
    } else if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        dt.date()
    } else if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        dt.date()
    } else {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?
    };

    Some(date.format("%Y-%m-%d").to_string())
}

/// Count rows per submission date, ascending. Rows without a usable
/// timestamp are left out.
pub fn group_by_date(rows: &[SheetRecord]) -> Vec<DateCount> {
    let mut by_date: BTreeMap<String, usize> = BTreeMap::new();
    for row in rows {
        if let Some(date) = row.get(SUBMITTED_AT).and_then(|v| submission_date(v)) {
            *by_date.entry(date).or_default() += 1;
        }
    }
    by_date
        .into_iter()
        .map(|(date, count)| DateCount { date, count })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScaledBar {
    pub date: String,
    pub count: usize,
    pub height_percent: f64,
}

/// Bar chart input: each bucket's height relative to the busiest date.
pub fn scale_bars(buckets: &[DateCount]) -> Vec<ScaledBar> {
    let max = buckets.iter().map(|b| b.count).max().unwrap_or(0);
    buckets
        .iter()
        .map(|b| ScaledBar {
            date: b.date.clone(),
            count: b.count,
            height_percent: if max == 0 {
                0.0
            } else {
                b.count as f64 * 100.0 / max as f64
            },
        })
        .collect()
}

/// CSS `conic-gradient` drawing the response share as a donut.
pub fn conic_gradient(slices: &[ResponseSlice]) -> String {
    let mut stops = Vec::with_capacity(slices.len());
    let mut start = 0.0;
    for slice in slices {
        let end = start + slice.percent;
        stops.push(format!(
            "{} {:.2}% {:.2}%",
            slice_color(slice.name),
            start,
            end
        ));
        start = end;
    }
    format!("conic-gradient({})", stops.join(", "))
}

pub fn slice_color(name: &str) -> &'static str {
    if name == RESPONSE_INTERESTED {
        "var(--accent)"
    } else {
        "var(--text-muted)"
    }
}
