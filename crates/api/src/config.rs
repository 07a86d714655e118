//! Application configuration loaded from environment variables.

use std::time::Duration;

use orchestrator::ResilienceConfig;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `3000`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `CATALOG_URL` — base URL of the product catalog service
///   (default: `"http://localhost:8081"`)
/// - `CATALOG_MAX_RETRIES`, `CATALOG_BACKOFF_MS`, `CATALOG_TIMEOUT_MS`,
///   `CATALOG_OVERALL_TIMEOUT_MS`, `CATALOG_FAILURE_THRESHOLD`,
///   `CATALOG_OPEN_SECS`, `CATALOG_SUCCESS_THRESHOLD` — resilience
///   tuning, defaulting to the orchestrator's built-in values
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub catalog_url: String,
    pub resilience: ResilienceConfig,
}

fn env_parsed<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Loads configuration from environment variables, falling back to
    /// defaults.
    pub fn from_env() -> Self {
        let defaults = ResilienceConfig::default();
        let resilience = ResilienceConfig {
            max_retries: env_parsed("CATALOG_MAX_RETRIES", defaults.max_retries),
            backoff: Duration::from_millis(env_parsed(
                "CATALOG_BACKOFF_MS",
                defaults.backoff.as_millis() as u64,
            )),
            timeout: Duration::from_millis(env_parsed(
                "CATALOG_TIMEOUT_MS",
                defaults.timeout.as_millis() as u64,
            )),
            overall_timeout: Duration::from_millis(env_parsed(
                "CATALOG_OVERALL_TIMEOUT_MS",
                defaults.overall_timeout.as_millis() as u64,
            )),
            failure_threshold: env_parsed("CATALOG_FAILURE_THRESHOLD", defaults.failure_threshold),
            open_duration: Duration::from_secs(env_parsed(
                "CATALOG_OPEN_SECS",
                defaults.open_duration.as_secs(),
            )),
            success_threshold: env_parsed("CATALOG_SUCCESS_THRESHOLD", defaults.success_threshold),
        };

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env_parsed("PORT", 3000),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            catalog_url: std::env::var("CATALOG_URL")
                .unwrap_or_else(|_| "http://localhost:8081".to_string()),
            resilience,
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            catalog_url: "http://localhost:8081".to_string(),
            resilience: ResilienceConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = Config::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.catalog_url, "http://localhost:8081");
        assert_eq!(config.resilience.max_retries, 3);
    }

    #[test]
    fn addr_formatting() {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            ..Config::default()
        };
        assert_eq!(config.addr(), "127.0.0.1:8080");
    }
}
