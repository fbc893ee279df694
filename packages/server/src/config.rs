//! Startup configuration read from environment variables.

use std::path::PathBuf;

/// Dataset path used when `DATA_PATH` is unset.
pub const DEFAULT_DATA_PATH: &str = "Road_Accidents_Lisbon.csv";
/// Bind address used when `BIND_ADDR` is unset.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1";
/// Port used when `PORT` is unset or invalid.
pub const DEFAULT_PORT: u16 = 8501;

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Path to the accident CSV (`DATA_PATH`).
    pub data_path: PathBuf,
    /// CSV field delimiter (`DATA_DELIMITER`, first byte).
    pub delimiter: u8,
    /// Address to bind (`BIND_ADDR`).
    pub bind_addr: String,
    /// Port to listen on (`PORT`).
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            delimiter: b',',
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// Reads configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, falling back to defaults for
    /// unset or unusable values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(p) => p.trim().parse().unwrap_or_else(|_| {
                log::warn!("Ignoring invalid PORT '{p}', using {DEFAULT_PORT}");
                DEFAULT_PORT
            }),
            None => defaults.port,
        };

        let delimiter = lookup("DATA_DELIMITER")
            .and_then(|d| d.as_bytes().first().copied())
            .unwrap_or(defaults.delimiter);

        Self {
            data_path: lookup("DATA_PATH").map_or(defaults.data_path, PathBuf::from),
            delimiter,
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port,
        }
    }
}
