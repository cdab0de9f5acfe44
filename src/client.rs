//! HTTP client for the sheet endpoints, used by the form and dashboard views.
//!
//! The endpoints may be the ones served by this process or a remote
//! deployment; both speak the same JSON contract.

use std::net::IpAddr;
use std::time::Duration;

use crate::config::SheetUrls;
use crate::models::{AppendResponse, SheetData, SheetRow};

/// Outcome of a write the backend accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitReceipt {
    /// The backend answered `{"success": true}`.
    Confirmed,
    /// 2xx without a readable body; the row may or may not have been stored.
    Unconfirmed,
}

pub struct SheetClient {
    client: reqwest::Client,
    urls: SheetUrls,
}

impl SheetClient {
    pub fn new(urls: SheetUrls, timeout_secs: u64) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {e}"))?;
        Ok(Self { client, urls })
    }

    /// Write one row. `visitor` is the address of the person who filled in
    /// the form; it is sent as `X-Forwarded-For` so the write endpoint rate
    /// limits the visitor rather than this process.
    pub async fn submit(
        &self,
        row: &SheetRow,
        visitor: Option<IpAddr>,
    ) -> Result<SubmitReceipt, String> {
        let url = usable_url(self.urls.write_url.as_deref()).ok_or_else(|| {
            "Sheet URL is not configured. Set MERCHANTINFO_SHEET_WEB_APP_URL".to_string()
        })?;

        let mut req = self.client.post(url).json(row);
        if let Some(ip) = visitor {
            req = req.header("x-forwarded-for", ip.to_string());
        }

        let resp = req
            .send()
            .await
            .map_err(|e| format!("Network error: {e}"))?;

        let status = resp.status();
        let text = match resp.text().await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Failed to read sheet write response ({status}): {e}");
                String::new()
            }
        };

        match serde_json::from_str::<AppendResponse>(&text).ok() {
            Some(AppendResponse { success: true, .. }) if status.is_success() => {
                Ok(SubmitReceipt::Confirmed)
            }
            Some(AppendResponse {
                success: false,
                error: Some(error),
            }) => Err(error),
            Some(_) => Err(format!("Sheet returned {}", status.as_u16())),
            None if status.is_success() => {
                tracing::warn!("Sheet accepted the write without confirming it");
                Ok(SubmitReceipt::Unconfirmed)
            }
            None => Err(format!("Sheet returned {}", status.as_u16())),
        }
    }

    pub async fn fetch(&self) -> Result<SheetData, String> {
        let url = usable_url(self.urls.read_url.as_deref()).ok_or_else(|| {
            "Sheet URL not configured. Set MERCHANTINFO_SHEET_READ_URL or MERCHANTINFO_SHEET_WEB_APP_URL"
                .to_string()
        })?;

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| format!("Failed to load sheet data: {e}"))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| format!("Failed to load sheet data: {e}"))?;

        let body: Option<serde_json::Value> = serde_json::from_str(&text).ok();
        let error = body
            .as_ref()
            .and_then(|b| b.get("error"))
            .and_then(|e| e.as_str())
            .map(str::to_string);

        if !status.is_success() {
            return Err(error.unwrap_or_else(|| format!("Sheet returned {}", status.as_u16())));
        }
        if let Some(error) = error {
            return Err(error);
        }

        let body = body.ok_or_else(|| "Sheet returned invalid JSON".to_string())?;
        serde_json::from_value(body).map_err(|e| format!("Unexpected sheet data: {e}"))
    }
}

fn usable_url(url: Option<&str>) -> Option<&str> {
    url.map(str::trim)
        .filter(|u| u.starts_with("http://") || u.starts_with("https://"))
}
