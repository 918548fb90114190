//! Server settings.
//!
//! Sources, lowest precedence first: built-in defaults, an optional
//! `quillpost.toml` in the working directory, then `QUILLPOST_*` environment
//! variables (a `.env` file is loaded into the environment by `main`).

use config::{Config, ConfigError, Environment, File};
use quillpost_core::db::DEFAULT_POOL_SIZE;
use quillpost_core::default_log_level;
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "quillpost";
pub const ENV_PREFIX: &str = "QUILLPOST";

/// Path value that selects a throwaway in-memory store.
pub const IN_MEMORY_DATABASE: &str = ":memory:";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Socket address the HTTP listener binds to.
    pub bind_addr: String,
    /// SQLite file path, or `:memory:`.
    pub database_path: String,
    /// Maximum pooled store connections. Ignored for `:memory:`.
    pub pool_size: u32,
    pub log_level: String,
    /// Absolute directory for rotated log files; stderr when unset.
    pub log_dir: Option<String>,
    /// Marks the session cookie `Secure`. Enable behind TLS.
    pub secure_cookies: bool,
}

impl Settings {
    /// Loads settings from the default file name and environment prefix.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_FILE, ENV_PREFIX)
    }

    /// Loads settings from an explicit config file and environment prefix.
    ///
    /// A missing config file is not an error.
    pub fn load_from(config_file: &str, env_prefix: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("bind_addr", "127.0.0.1:8000")?
            .set_default("database_path", "quillpost.sqlite3")?
            .set_default("pool_size", i64::from(DEFAULT_POOL_SIZE))?
            .set_default("log_level", default_log_level())?
            .set_default("secure_cookies", false)?
            .add_source(File::with_name(config_file).required(false))
            .add_source(Environment::with_prefix(env_prefix).try_parsing(true))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::Settings;
    use std::fs;

    #[test]
    fn defaults_apply_without_file_or_environment() {
        let settings =
            Settings::load_from("does-not-exist-quillpost", "QUILLPOST_TEST_DEFAULTS").unwrap();
        assert_eq!(settings.bind_addr, "127.0.0.1:8000");
        assert_eq!(settings.database_path, "quillpost.sqlite3");
        assert_eq!(settings.pool_size, 8);
        assert_eq!(settings.log_dir, None);
        assert!(!settings.secure_cookies);
    }

    #[test]
    fn environment_overrides_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quillpost.toml");
        fs::write(
            &path,
            "bind_addr = \"0.0.0.0:9000\"\ndatabase_path = \"from-file.sqlite3\"\n",
        )
        .unwrap();

        std::env::set_var("QUILLPOST_TEST_OVERRIDE_DATABASE_PATH", "from-env.sqlite3");
        std::env::set_var("QUILLPOST_TEST_OVERRIDE_SECURE_COOKIES", "true");
        let settings =
            Settings::load_from(path.to_str().unwrap(), "QUILLPOST_TEST_OVERRIDE").unwrap();

        assert_eq!(settings.bind_addr, "0.0.0.0:9000");
        assert_eq!(settings.database_path, "from-env.sqlite3");
        assert!(settings.secure_cookies);
    }
}
