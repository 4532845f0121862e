use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Runtime settings, read once from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub database_url: String,
    pub data_dir: PathBuf,
    pub data_base_url: Option<String>,
    pub static_dir: PathBuf,
    pub load_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            bind_addr: "127.0.0.1:5000".to_string(),
            database_url: "site.db".to_string(),
            data_dir: PathBuf::from("static/data"),
            data_base_url: None,
            static_dir: PathBuf::from("static"),
            load_timeout: Duration::from_secs(10),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = AppConfig::default();
        let load_timeout = match lookup("LOAD_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    log::warn!("Ignoring invalid LOAD_TIMEOUT_SECS={:?}", raw);
                    defaults.load_timeout
                }
            },
            None => defaults.load_timeout,
        };

        AppConfig {
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            data_dir: lookup("DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
            data_base_url: lookup("DATA_BASE_URL").filter(|url| !url.trim().is_empty()),
            static_dir: lookup("STATIC_DIR").map(PathBuf::from).unwrap_or(defaults.static_dir),
            load_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]);
        assert_eq!(config.bind_addr, "127.0.0.1:5000");
        assert_eq!(config.data_dir, PathBuf::from("static/data"));
        assert_eq!(config.data_base_url, None);
        assert_eq!(config.load_timeout, Duration::from_secs(10));
    }

    #[test]
    fn overrides_are_read() {
        let config = config_from(&[
            ("BIND_ADDR", "0.0.0.0:8080"),
            ("DATA_BASE_URL", "https://cdn.example.com/data"),
            ("LOAD_TIMEOUT_SECS", "3"),
        ]);
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.data_base_url.as_deref(), Some("https://cdn.example.com/data"));
        assert_eq!(config.load_timeout, Duration::from_secs(3));
    }

    #[test]
    fn invalid_timeout_falls_back() {
        let config = config_from(&[("LOAD_TIMEOUT_SECS", "soon"), ("DATA_BASE_URL", " ")]);
        assert_eq!(config.load_timeout, Duration::from_secs(10));
        assert_eq!(config.data_base_url, None);
    }
}
