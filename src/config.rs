use dotenv::dotenv;
use std::env;
use std::time::Duration;

use crate::domain::models::types::DEFAULT_AUDIT_FLUSH_INTERVAL_MS;

const AUDIT_LOG_PATH: &str = "AUDIT_LOG_PATH";
const AUDIT_FLUSH_INTERVAL_MS: &str = "AUDIT_FLUSH_INTERVAL_MS";
const SYMBOLS: &str = "SYMBOLS";

#[derive(Debug, Clone)]
pub struct Config {
    pub audit_log_path: String,
    pub audit_flush_interval: Duration,
    /// Symbols to pre-create books for at startup. Purely a warm-start convenience — books are
    /// created lazily for any symbol seen in a NOS regardless.
    pub symbols: Vec<String>,
}

impl Config {
    /// Loads configuration from the environment (`.env` supported). `AUDIT_LOG_PATH` is
    /// required; an unset or unwritable audit log is a fatal startup condition.
    pub fn from_env() -> Config {
        dotenv().ok();

        let audit_log_path =
            env::var(AUDIT_LOG_PATH).expect("failed to load environment variable AUDIT_LOG_PATH");

        let audit_flush_interval = env::var(AUDIT_FLUSH_INTERVAL_MS)
            .ok()
            .map(|v| {
                v.parse::<u64>()
                    .unwrap_or_else(|_| panic!("failed to parse AUDIT_FLUSH_INTERVAL_MS: {v}"))
            })
            .map(Duration::from_millis)
            .unwrap_or_else(|| Duration::from_millis(DEFAULT_AUDIT_FLUSH_INTERVAL_MS));

        let symbols = env::var(SYMBOLS)
            .ok()
            .map(|v| v.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();

        Config {
            audit_log_path,
            audit_flush_interval,
            symbols,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_split_and_trim_commas() {
        let symbols: Vec<String> = " AAPL, MSFT ,GOOG"
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        assert_eq!(symbols, vec!["AAPL", "MSFT", "GOOG"]);
    }
}
