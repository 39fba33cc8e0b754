use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::archive::DEFAULT_CACHE_DAYS;
use crate::decode::{BatchPolicy, DEFAULT_MAX_DEPTH, DecodeOptions};

// Default configuration constants
const DEFAULT_ARCHIVE_ROOT: &str = "./archive";
const DEFAULT_BATCH_POLICY: &str = "abort";
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub archive: ArchiveConfig,
    pub decode: DecodeConfig,
    pub connection: ConnectionConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArchiveConfig {
    /// Directory or `http(s)://` base URL of the exported archive
    pub root: String,
    /// Decoded days kept in memory, 0 disables the cache
    pub cache_days: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DecodeConfig {
    pub max_depth: usize,
    pub policy: BatchPolicy,
}

impl DecodeConfig {
    pub fn options(&self) -> DecodeOptions {
        DecodeOptions {
            max_depth: self.max_depth,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConnectionConfig {
    pub timeout_seconds: u64,
}

impl Config {
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut settings = config::Config::builder();

        // Default values
        settings = settings
            .set_default("archive.root", DEFAULT_ARCHIVE_ROOT)?
            .set_default("archive.cache_days", DEFAULT_CACHE_DAYS as u64)?
            .set_default("decode.max_depth", DEFAULT_MAX_DEPTH as u64)?
            .set_default("decode.policy", DEFAULT_BATCH_POLICY)?
            .set_default("connection.timeout_seconds", DEFAULT_TIMEOUT_SECONDS)?;

        // Load from config file if provided
        if let Some(path) = config_path
            && Path::new(path).exists()
        {
            settings = settings.add_source(config::File::with_name(path));
        }

        // Override with environment variables, e.g. ARCHIVE_DECODE__POLICY=skip
        settings = settings.add_source(
            config::Environment::with_prefix("ARCHIVE")
                .prefix_separator("_")
                .separator("__"),
        );

        let config: Config = settings.build()?.try_deserialize()?;
        if config.decode.max_depth == 0 {
            return Err(anyhow::anyhow!("decode.max_depth must be at least 1"));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    fn clear_env() {
        // SAFETY: tests touching the environment run serially
        unsafe {
            std::env::remove_var("ARCHIVE_ARCHIVE__ROOT");
            std::env::remove_var("ARCHIVE_ARCHIVE__CACHE_DAYS");
            std::env::remove_var("ARCHIVE_DECODE__POLICY");
            std::env::remove_var("ARCHIVE_DECODE__MAX_DEPTH");
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = Config::load(None).unwrap();

        assert_eq!(config.archive.root, "./archive");
        assert_eq!(config.archive.cache_days, 32);
        assert_eq!(config.decode.max_depth, 64);
        assert_eq!(config.decode.policy, BatchPolicy::Abort);
        assert_eq!(config.connection.timeout_seconds, 30);
    }

    #[test]
    #[serial]
    fn test_file_overrides_defaults() {
        clear_env();
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[archive]\nroot = \"https://archive.example.com\"\n\n[decode]\npolicy = \"skip\""
        )
        .unwrap();

        let path = file.path().to_str().unwrap();
        let config = Config::load(Some(path)).unwrap();

        assert_eq!(config.archive.root, "https://archive.example.com");
        assert_eq!(config.decode.policy, BatchPolicy::Skip);
        assert_eq!(config.decode.max_depth, 64);
    }

    #[test]
    #[serial]
    fn test_missing_file_is_ignored() {
        clear_env();
        let config = Config::load(Some("/nonexistent/archive.toml")).unwrap();
        assert_eq!(config.archive.root, "./archive");
    }

    #[test]
    #[serial]
    fn test_environment_overrides() {
        clear_env();
        unsafe {
            std::env::set_var("ARCHIVE_DECODE__POLICY", "skip");
            std::env::set_var("ARCHIVE_DECODE__MAX_DEPTH", "8");
            std::env::set_var("ARCHIVE_ARCHIVE__CACHE_DAYS", "0");
        }

        let config = Config::load(None);
        clear_env();
        let config = config.unwrap();

        assert_eq!(config.decode.policy, BatchPolicy::Skip);
        assert_eq!(config.decode.options().max_depth, 8);
        assert_eq!(config.archive.cache_days, 0);
    }

    #[test]
    #[serial]
    fn test_zero_depth_rejected() {
        clear_env();
        unsafe {
            std::env::set_var("ARCHIVE_DECODE__MAX_DEPTH", "0");
        }

        let result = Config::load(None);
        clear_env();
        assert!(result.is_err());
    }
}
