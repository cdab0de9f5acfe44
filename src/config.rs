use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use ipnet::{IpNet, Ipv4Net, Ipv6Net};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub base_url: String,
    pub store: StoreBackend,
    pub sheet: SheetUrls,
    pub provision_header: bool,
    pub cors_origins: String,
    pub max_body_size: usize,
    pub rate_limit: u32,
    pub rate_limit_window_secs: u64,
    pub trusted_proxies: Vec<IpNet>,
    pub http_timeout_secs: u64,
    pub log_level: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoreBackend {
    Postgres { database_url: String },
    Memory,
}

/// Where the form and dashboard clients send their requests.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetUrls {
    pub write_url: Option<String>,
    pub read_url: Option<String>,
}

impl SheetUrls {
    /// Both clients talk to the endpoints hosted at `base_url`.
    pub fn local(base_url: &str) -> Self {
        let url = format!("{}/api/sheet", base_url.trim_end_matches('/'));
        SheetUrls {
            write_url: Some(url.clone()),
            read_url: Some(url),
        }
    }
}

impl Config {
    /// The form view writes through this service's own sheet endpoint over
    /// loopback, forwarding the visitor's address. Trust loopback for
    /// `X-Forwarded-For` in that setup so appends are limited per visitor.
    pub fn trust_loopback_for_local_sheet(&mut self) {
        if self.sheet.write_url != SheetUrls::local(&self.base_url).write_url {
            return;
        }
        for net in loopback_nets() {
            if !self.trusted_proxies.contains(&net) {
                self.trusted_proxies.push(net);
            }
        }
    }

    /// Value of `Access-Control-Allow-Origin` for a request from `origin`.
    /// `MERCHANTINFO_CORS_ORIGINS` is `*` or a comma-separated list; a listed
    /// origin is echoed back, an unlisted one gets no header.
    pub fn allowed_origin(&self, origin: Option<&str>) -> Option<String> {
        let mut allowed = self
            .cors_origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty());

        match origin {
            _ if self.cors_origins.trim() == "*" => Some("*".to_string()),
            Some(origin) => allowed.find(|o| *o == origin).map(str::to_string),
            None => allowed.next().map(str::to_string),
        }
    }

    pub fn from_env() -> Result<Self, String> {
        let host: IpAddr = env_or("MERCHANTINFO_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid MERCHANTINFO_HOST: {e}"))?;

        let port: u16 = env_or("MERCHANTINFO_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid MERCHANTINFO_PORT: {e}"))?;

        // base_url must be reachable by the sheet client
        let local_host = if host.is_unspecified() {
            IpAddr::from([127, 0, 0, 1])
        } else {
            host
        };
        let base_url = env_or("MERCHANTINFO_BASE_URL", &format!("http://{local_host}:{port}"));

        let store = match env_or("MERCHANTINFO_STORE", "postgres").as_str() {
            "postgres" => StoreBackend::Postgres {
                database_url: env_required("DATABASE_URL")?,
            },
            "memory" => StoreBackend::Memory,
            other => return Err(format!("Invalid MERCHANTINFO_STORE: {other}")),
        };

        let local = SheetUrls::local(&base_url);
        let write_url = env_optional("MERCHANTINFO_SHEET_WEB_APP_URL").or(local.write_url);
        let read_url = env_optional("MERCHANTINFO_SHEET_READ_URL").or_else(|| write_url.clone());

        let provision_header = parse_bool("MERCHANTINFO_PROVISION_HEADER", "true")?;

        let cors_origins = env_or("MERCHANTINFO_CORS_ORIGINS", "*");

        let max_body_size: usize = env_or("MERCHANTINFO_MAX_BODY_SIZE", "65536")
            .parse()
            .map_err(|e| format!("Invalid MERCHANTINFO_MAX_BODY_SIZE: {e}"))?;

        let rate_limit: u32 = env_or("MERCHANTINFO_RATE_LIMIT", "30")
            .parse()
            .map_err(|e| format!("Invalid MERCHANTINFO_RATE_LIMIT: {e}"))?;

        let rate_limit_window_secs: u64 = env_or("MERCHANTINFO_RATE_LIMIT_WINDOW_SECS", "60")
            .parse()
            .map_err(|e| format!("Invalid MERCHANTINFO_RATE_LIMIT_WINDOW_SECS: {e}"))?;

        let trusted_proxies: Vec<IpNet> = env_or("MERCHANTINFO_TRUSTED_PROXIES", "")
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(|s| {
                s.trim()
                    .parse()
                    .map_err(|e| format!("Invalid MERCHANTINFO_TRUSTED_PROXIES entry '{s}': {e}"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let http_timeout_secs: u64 = env_or("MERCHANTINFO_HTTP_TIMEOUT_SECS", "15")
            .parse()
            .map_err(|e| format!("Invalid MERCHANTINFO_HTTP_TIMEOUT_SECS: {e}"))?;

        let log_level = env_or("MERCHANTINFO_LOG_LEVEL", "info");

        Ok(Config {
            host,
            port,
            base_url,
            store,
            sheet: SheetUrls {
                write_url,
                read_url,
            },
            provision_header,
            cors_origins,
            max_body_size,
            rate_limit,
            rate_limit_window_secs,
            trusted_proxies,
            http_timeout_secs,
            log_level,
        })
    }
}

fn loopback_nets() -> impl Iterator<Item = IpNet> {
    [
        Ipv4Net::new(Ipv4Addr::LOCALHOST, 8).map(IpNet::V4),
        Ipv6Net::new(Ipv6Addr::LOCALHOST, 128).map(IpNet::V6),
    ]
    .into_iter()
    .filter_map(Result::ok)
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_bool(key: &str, default: &str) -> Result<bool, String> {
    match env_or(key, default).to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(format!("Invalid {key}: {other}")),
    }
}
