use std::{net::SocketAddr, time::Duration};

use anyhow::Context;
use findash_market_data::{CbrConfig, MoexConfig, DEFAULT_CBR_URL, DEFAULT_MOEX_URL};

const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub project_name: String,
    pub version: String,
    pub debug: bool,
    pub listen_addr: SocketAddr,
    /// Mount point of the data routes, e.g. `/api/v1`; empty mounts them at the root
    pub api_prefix: String,
    pub cors_allow: Vec<String>,
    pub cbr: CbrConfig,
    pub moex: MoexConfig,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Config {
    /// Loads `.env` (if present) and reads the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let listen_addr: SocketAddr = var("FD_LISTEN_ADDR", "0.0.0.0:8000")
            .parse()
            .context("Invalid FD_LISTEN_ADDR")?;
        let debug = parse_bool(lookup("FD_DEBUG"), true);
        let cors_allow = var("FD_CORS_ALLOW_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let log_format = if var("FD_LOG_FORMAT", "text").eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Text
        };

        Ok(Self {
            project_name: var("FD_PROJECT_NAME", "Financial Dashboard"),
            version: var("FD_VERSION", env!("CARGO_PKG_VERSION")),
            debug,
            listen_addr,
            api_prefix: normalize_prefix(&var("FD_API_PREFIX", "/api/v1")),
            cors_allow,
            cbr: CbrConfig {
                url: var("FD_CBR_API_URL", DEFAULT_CBR_URL),
                timeout: parse_secs(lookup("FD_CBR_REQUEST_TIMEOUT_SECS")),
            },
            moex: MoexConfig {
                base_url: var("FD_MOEX_API_URL", DEFAULT_MOEX_URL),
                timeout: parse_secs(lookup("FD_MOEX_REQUEST_TIMEOUT_SECS")),
            },
            log_level: var("FD_LOG_LEVEL", "info"),
            log_format,
        })
    }
}

fn parse_bool(raw: Option<String>, default: bool) -> bool {
    match raw.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        Some("1" | "true" | "yes" | "on") => true,
        Some("0" | "false" | "no" | "off") => false,
        _ => default,
    }
}

fn parse_secs(raw: Option<String>) -> Duration {
    let secs = raw
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_SECS);
    Duration::from_secs(secs)
}

/// `api/v1/` -> `/api/v1`, `/` -> ``
fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}
