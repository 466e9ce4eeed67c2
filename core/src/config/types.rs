use serde::{Deserialize, Serialize};

pub const DEFAULT_EMPLOYEE_NAME: &str = "Joël Grimberg";
pub const DEFAULT_MANAGER_NAME: &str = "Rob van der Pouw Kraan";
pub const SIGNATURE_PLACEHOLDER: &str = "~/.config/hours-signer/signature.png";

/// Persisted signer settings.
///
/// An empty `signature_path` means "not configured yet"; signing refuses to run until it is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignerConfig {
    pub signature_path: String,
    pub employee_name: String,
    pub manager_name: String,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            signature_path: String::new(),
            employee_name: DEFAULT_EMPLOYEE_NAME.to_string(),
            manager_name: DEFAULT_MANAGER_NAME.to_string(),
        }
    }
}

impl SignerConfig {
    pub fn has_signature(&self) -> bool {
        !self.signature_path.trim().is_empty()
    }

    /// Copy of this config with the one-shot overrides applied.
    #[must_use]
    pub fn with_overrides(
        &self,
        employee_name: Option<&str>,
        manager_name: Option<&str>,
        signature_path: Option<&str>,
    ) -> Self {
        let mut cfg = self.clone();
        if let Some(v) = employee_name {
            cfg.employee_name = v.to_string();
        }
        if let Some(v) = manager_name {
            cfg.manager_name = v.to_string();
        }
        if let Some(v) = signature_path {
            cfg.signature_path = v.to_string();
        }
        cfg
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub enabled: bool,

    /// If true, log to stderr. Ignored by the interactive session.
    pub console: bool,

    /// If true, log to a file under `directory` (or `<config dir>/logs` if unset).
    pub file: bool,

    /// EnvFilter string, e.g. "info" or "hours_signer_core=debug".
    pub level: String,

    pub directory: Option<String>,
}

fn default_logging_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            console: true,
            file: true,
            level: default_logging_level(),
            directory: None,
        }
    }
}
