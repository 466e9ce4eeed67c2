use std::path::{Path, PathBuf};

use crate::error::ConfigError;

use super::types::{LoggingConfig, SignerConfig};

const CONFIG_PATH_ENV: &str = "HOURS_SIGNER_CONFIG";

/// Get the default hours-signer config directory: ~/.config/hours-signer
pub fn get_config_dir() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::NoConfigPath)?;
    Ok(home.join(".config").join("hours-signer"))
}

/// Resolve the config file path. `HOURS_SIGNER_CONFIG` overrides the default location.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    if let Ok(v) = std::env::var(CONFIG_PATH_ENV) {
        if !v.trim().is_empty() {
            return Ok(PathBuf::from(v));
        }
    }
    Ok(get_config_dir()?.join("config.json"))
}

pub fn config_exists(path: &Path) -> bool {
    path.is_file()
}

/// Load the config at `path`.
///
/// A missing file yields the defaults. So does malformed JSON: the defaults are returned
/// wholesale, never a partially decoded record.
pub fn load_from(path: &Path) -> SignerConfig {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %path.display(), error = %e, "config unreadable, using defaults");
            }
            return SignerConfig::default();
        }
    };
    match serde_json::from_str::<SignerConfig>(&data) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "config malformed, using defaults");
            SignerConfig::default()
        }
    }
}

pub fn load_default() -> Result<SignerConfig, ConfigError> {
    Ok(load_from(&config_path()?))
}

/// Overwrite the config at `path`, creating parent directories as needed.
pub fn save_to(path: &Path, cfg: &SignerConfig) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    let data = serde_json::to_string_pretty(cfg)?;
    std::fs::write(path, data).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}

/// Logging settings: defaults plus environment overrides.
pub fn logging_from_env() -> LoggingConfig {
    let mut cfg = LoggingConfig::default();

    if let Ok(v) = std::env::var("HOURS_SIGNER_LOG") {
        if !v.trim().is_empty() {
            cfg.level = v;
        }
    }
    if let Ok(v) = std::env::var("HOURS_SIGNER_LOG_DIR") {
        if !v.trim().is_empty() {
            cfg.directory = Some(v);
        }
    }
    if let Some(v) = env_flag("HOURS_SIGNER_LOG_CONSOLE") {
        cfg.console = v;
    }
    if let Some(v) = env_flag("HOURS_SIGNER_LOG_FILE") {
        cfg.file = v;
    }
    if !cfg.console && !cfg.file {
        cfg.enabled = false;
    }

    if cfg.directory.is_none() {
        cfg.directory = get_config_dir()
            .ok()
            .map(|d| d.join("logs").to_string_lossy().to_string());
    }

    cfg
}

fn env_flag(key: &str) -> Option<bool> {
    let v = std::env::var(key).ok()?;
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
