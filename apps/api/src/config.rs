use anyhow::{Context, Result};

/// Service configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub groq_api_key: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub max_file_size_mb: u64,
    pub debug: bool,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            groq_api_key: require_env("GROQ_API_KEY")?,
            port: parse_env("PORT", "8000").context("PORT must be a valid port number")?,
            allowed_origins: split_origins(
                &std::env::var("ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            ),
            max_file_size_mb: parse_env("MAX_FILE_SIZE_MB", "5")
                .context("MAX_FILE_SIZE_MB must be a whole number of megabytes")?,
            debug: std::env::var("DEBUG")
                .map(|v| v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn max_file_size_bytes(&self) -> usize {
        (self.max_file_size_mb as usize).saturating_mul(1024 * 1024)
    }

    /// Tracing filter directives. `DEBUG=true` wins over `RUST_LOG`.
    pub fn log_filter(&self) -> String {
        if self.debug {
            "info,resume_analyzer=debug,analyzer_api=debug,tower_http=debug".to_string()
        } else {
            self.rust_log.clone()
        }
    }
}

/// Settings for talking to the analysis service from the client side.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".to_string(),
            timeout_secs: 120,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        Ok(ClientConfig {
            api_url: std::env::var("ANALYZER_API_URL").unwrap_or(defaults.api_url),
            timeout_secs: parse_env("ANALYZER_TIMEOUT_SECS", &defaults.timeout_secs.to_string())
                .context("ANALYZER_TIMEOUT_SECS must be a whole number of seconds")?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = std::env::var(key).unwrap_or_else(|_| default.to_string());
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("Invalid value for {key}: '{raw}'"))
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_origins_trims_and_skips_empty() {
        assert_eq!(
            split_origins("http://localhost:5173, https://app.example.com ,,"),
            vec!["http://localhost:5173", "https://app.example.com"]
        );
        assert!(split_origins("").is_empty());
    }

    #[test]
    fn test_max_file_size_bytes() {
        let config = Config {
            groq_api_key: "key".to_string(),
            port: 8000,
            allowed_origins: vec![],
            max_file_size_mb: 5,
            debug: false,
            rust_log: "info".to_string(),
        };
        assert_eq!(config.max_file_size_bytes(), 5 * 1024 * 1024);
        assert_eq!(config.log_filter(), "info");

        let debug = Config {
            debug: true,
            rust_log: "warn".to_string(),
            ..config
        };
        let filter = debug.log_filter();
        assert!(filter.contains("resume_analyzer=debug"));
        assert!(filter.contains("analyzer_api=debug"));
        assert!(!filter.contains("warn"));
    }

    #[test]
    fn test_client_config_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.api_url, "http://localhost:8000");
        assert_eq!(config.timeout_secs, 120);
    }

    #[test]
    fn test_client_config_reads_env_overrides() {
        // Only this test touches the ANALYZER_* variables.
        std::env::set_var("ANALYZER_API_URL", "http://analyzer.internal:9000");
        std::env::set_var("ANALYZER_TIMEOUT_SECS", " 15 ");
        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.api_url, "http://analyzer.internal:9000");
        assert_eq!(config.timeout_secs, 15);

        std::env::set_var("ANALYZER_TIMEOUT_SECS", "soon");
        let err = ClientConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("ANALYZER_TIMEOUT_SECS"));

        std::env::remove_var("ANALYZER_API_URL");
        std::env::remove_var("ANALYZER_TIMEOUT_SECS");
    }

    #[test]
    fn test_parse_env_uses_default_when_unset() {
        let value: u16 = parse_env("RESUME_ANALYZER_TEST_UNSET_PORT", "8123").unwrap();
        assert_eq!(value, 8123);
    }
}
