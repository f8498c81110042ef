use crate::stats::DowntimePolicy;
use crate::storage::resolve_data_path;
use std::{env, path::PathBuf};
use tracing::warn;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    pub downtime_policy: DowntimePolicy,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let port = match env::var("PORT") {
            Ok(value) => value.parse::<u16>().unwrap_or_else(|_| {
                warn!("ignoring invalid PORT '{value}', using {DEFAULT_PORT}");
                DEFAULT_PORT
            }),
            Err(_) => DEFAULT_PORT,
        };

        let downtime_policy = match env::var("KPI_DOWNTIME_POLICY") {
            Ok(value) => value.parse()?,
            Err(_) => DowntimePolicy::default(),
        };

        Ok(Self {
            port,
            data_path: resolve_data_path(),
            downtime_policy,
        })
    }
}

pub fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|value| !value.trim().is_empty())
        .and_then(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_filter_keeps_debug_default_directive() {
        let filter = log_filter(Some("debug")).to_string();
        assert!(filter.contains("debug"), "{filter}");
        assert!(!filter.contains("info"), "{filter}");
    }

    #[test]
    fn log_filter_falls_back_to_info() {
        assert_eq!(log_filter(None).to_string(), "info");
        assert_eq!(log_filter(Some("  ")).to_string(), "info");
    }
}
