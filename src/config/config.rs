// SPDX-License-Identifier: GPL-3.0-only
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

/// Directory name used under the platform data directory
pub const STORAGE_DIR_NAME: &str = "Mazes";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding one file per maze; resolved by [`Config::storage_dir`] when unset
    pub storage_dir: Option<PathBuf>,

    /// HTTP API bind address (e.g., "127.0.0.1:5000")
    pub api_bind: SocketAddr,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Emit logs as JSON lines
    pub log_json: bool,
}

impl Config {
    /// Load configuration from TOML file with environment variable overrides
    pub fn load() -> anyhow::Result<Self> {
        let config_path = std::env::var("MAZE_CONFIG")
            .unwrap_or_else(|_| "config.toml".to_string());

        let mut config: Config = if std::path::Path::new(&config_path).exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            toml::from_str(&contents)?
        } else {
            Config::default()
        };

        if let Ok(val) = std::env::var("MAZE_STORAGE_DIR") {
            config.storage_dir = Some(PathBuf::from(val));
        }
        if let Ok(val) = std::env::var("MAZE_API_BIND") {
            config.api_bind = SocketAddr::from_str(&val)?;
        }
        if let Ok(val) = std::env::var("MAZE_LOG_LEVEL") {
            config.log_level = val;
        }
        if let Ok(val) = std::env::var("MAZE_LOG_JSON") {
            config.log_json = val.parse()?;
        }

        Ok(config)
    }

    /// Directory the maze files live in
    ///
    /// The configured directory if any, otherwise `Mazes` under the platform
    /// data directory, otherwise `Mazes` under the working directory.
    pub fn storage_dir(&self) -> PathBuf {
        match &self.storage_dir {
            Some(dir) => dir.clone(),
            None => default_storage_dir(),
        }
    }
}

pub fn default_storage_dir() -> PathBuf {
    let base = dirs::data_dir()
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));
    base.join(STORAGE_DIR_NAME)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_dir: None,
            api_bind: SocketAddr::from(([127, 0, 0, 1], 5000)),
            log_level: String::from("info"),
            log_json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Tests below share the process environment
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const ENV_VARS: [&str; 5] = [
        "MAZE_CONFIG",
        "MAZE_STORAGE_DIR",
        "MAZE_API_BIND",
        "MAZE_LOG_LEVEL",
        "MAZE_LOG_JSON",
    ];

    // Helper functions to safely modify environment variables in tests
    fn set_env_var(key: &str, value: &str) {
        unsafe {
            std::env::set_var(key, value);
        }
    }

    fn remove_env_var(key: &str) {
        unsafe {
            std::env::remove_var(key);
        }
    }

    fn clear_env() {
        for key in ENV_VARS {
            remove_env_var(key);
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.storage_dir, None);
        assert_eq!(config.api_bind, SocketAddr::from_str("127.0.0.1:5000").unwrap());
        assert_eq!(config.log_level, "info");
        assert!(!config.log_json);
    }

    #[test]
    fn test_storage_dir_configured() {
        let config = Config {
            storage_dir: Some(PathBuf::from("/srv/mazes")),
            ..Config::default()
        };
        assert_eq!(config.storage_dir(), PathBuf::from("/srv/mazes"));
    }

    #[test]
    fn test_storage_dir_default() {
        let dir = Config::default().storage_dir();
        assert!(dir.ends_with(STORAGE_DIR_NAME));
    }

    #[test]
    fn test_load_missing_config_file() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        set_env_var("MAZE_CONFIG", "/nonexistent/maze-config.toml");

        let config = Config::load().unwrap();
        assert_eq!(config.storage_dir, None);
        assert_eq!(config.log_level, "info");

        clear_env();
    }

    #[test]
    fn test_load_from_toml() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();

        let temp_file = NamedTempFile::new().unwrap();
        let config_content = r#"
storage_dir = "/custom/mazes"
api_bind = "0.0.0.0:9000"
log_level = "debug"
log_json = true
"#;
        fs::write(temp_file.path(), config_content).unwrap();
        set_env_var("MAZE_CONFIG", temp_file.path().to_str().unwrap());

        let config = Config::load().unwrap();
        assert_eq!(config.storage_dir, Some(PathBuf::from("/custom/mazes")));
        assert_eq!(config.api_bind, SocketAddr::from_str("0.0.0.0:9000").unwrap());
        assert_eq!(config.log_level, "debug");
        assert!(config.log_json);

        clear_env();
    }

    #[test]
    fn test_load_partial_toml_uses_defaults() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();

        let temp_file = NamedTempFile::new().unwrap();
        fs::write(temp_file.path(), "log_level = \"warn\"\n").unwrap();
        set_env_var("MAZE_CONFIG", temp_file.path().to_str().unwrap());

        let config = Config::load().unwrap();
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.api_bind, Config::default().api_bind);
        assert_eq!(config.storage_dir, None);

        clear_env();
    }

    #[test]
    fn test_env_var_overrides() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        set_env_var("MAZE_CONFIG", "/nonexistent/maze-config.toml");
        set_env_var("MAZE_STORAGE_DIR", "/env/mazes");
        set_env_var("MAZE_API_BIND", "192.168.1.1:9090");
        set_env_var("MAZE_LOG_LEVEL", "trace");
        set_env_var("MAZE_LOG_JSON", "true");

        let config = Config::load().unwrap();
        assert_eq!(config.storage_dir(), PathBuf::from("/env/mazes"));
        assert_eq!(config.api_bind, SocketAddr::from_str("192.168.1.1:9090").unwrap());
        assert_eq!(config.log_level, "trace");
        assert!(config.log_json);

        clear_env();
    }

    #[test]
    fn test_env_var_invalid_bind() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        set_env_var("MAZE_CONFIG", "/nonexistent/maze-config.toml");
        set_env_var("MAZE_API_BIND", "not-an-address");

        assert!(Config::load().is_err());

        clear_env();
    }
}
