use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Every setting has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Root under which each request gets its own scratch directory.
    pub scratch_dir: PathBuf,
    /// Upper bound on request bodies.
    pub max_body_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Config {
            port: match lookup("PORT") {
                Some(port) => port
                    .parse::<u16>()
                    .context("PORT must be a valid port number")?,
                None => DEFAULT_PORT,
            },
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            scratch_dir: lookup("RENDER_SCRATCH_DIR")
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join("resume-renders")),
            max_body_bytes: match lookup("MAX_BODY_BYTES") {
                Some(limit) => limit
                    .parse::<usize>()
                    .with_context(|| format!("MAX_BODY_BYTES must be a byte count, got '{limit}'"))?,
                None => DEFAULT_MAX_BODY_BYTES,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.max_body_bytes, 50 * 1024 * 1024);
        assert!(config.scratch_dir.ends_with("resume-renders"));
    }

    #[test]
    fn test_explicit_values_override_defaults() {
        let config = config_from(&[
            ("PORT", "9000"),
            ("RENDER_SCRATCH_DIR", "/srv/renders"),
            ("MAX_BODY_BYTES", "1024"),
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.scratch_dir, PathBuf::from("/srv/renders"));
        assert_eq!(config.max_body_bytes, 1024);
    }

    #[test]
    fn test_malformed_values_fail() {
        assert!(config_from(&[("PORT", "eighty")]).is_err());
        assert!(config_from(&[("MAX_BODY_BYTES", "-1")]).is_err());
    }
}
