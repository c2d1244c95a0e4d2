//! Configuration file handling

use serde::Deserialize;

use super::paths::config_path;
use super::Result;

/// Default endpoint, matching the server's own default bind address.
pub const DEFAULT_URL: &str = "ws://127.0.0.1:8080/ws";

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Server endpoint settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Timeout settings
    #[serde(default)]
    pub timeouts: Timeouts,
}

/// Server endpoint settings
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// WebSocket endpoint of the book service
    #[serde(default = "default_url")]
    pub url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { url: default_url() }
    }
}

fn default_url() -> String {
    DEFAULT_URL.to_string()
}

/// Timeout settings in seconds
#[derive(Debug, Clone, Deserialize)]
pub struct Timeouts {
    /// Timeout for establishing the connection
    #[serde(default = "default_connect")]
    pub connect_secs: u64,

    /// Timeout for each response wait
    #[serde(default = "default_request")]
    pub request_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            connect_secs: default_connect(),
            request_secs: default_request(),
        }
    }
}

fn default_connect() -> u64 {
    10
}
fn default_request() -> u64 {
    30
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = config_path() {
            if path.exists() {
                let content = std::fs::read_to_string(&path).map_err(|e| {
                    super::Error::Config(format!(
                        "Failed to read config file '{}': {}",
                        path.display(),
                        e
                    ))
                })?;
                return toml::from_str(&content)
                    .map_err(|e| super::Error::ConfigParse(e.to_string()));
            }
        }
        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_sections() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.url, DEFAULT_URL);
        assert_eq!(config.timeouts.connect_secs, 10);
        assert_eq!(config.timeouts.request_secs, 30);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: Config = toml::from_str(
            r#"
[server]
url = "ws://books.internal:9000/ws"

[timeouts]
request_secs = 5
"#,
        )
        .unwrap();
        assert_eq!(config.server.url, "ws://books.internal:9000/ws");
        assert_eq!(config.timeouts.connect_secs, 10);
        assert_eq!(config.timeouts.request_secs, 5);
    }
}
