use std::path::{Path, PathBuf};

use hours_signer_core::api::{
    default_output_name, save_to, ConfigError, SignError, SignRequest, Signer, SignerConfig,
};

/// The two side effects a session may trigger.
pub trait SessionEffects {
    /// Where `persist` writes, shown on the welcome screen.
    fn config_location(&self) -> Option<&Path> {
        None
    }

    fn persist(&mut self, config: &SignerConfig) -> Result<(), ConfigError>;

    /// Sign `source` and return the path of the written document.
    fn sign(&mut self, source: &Path, config: &SignerConfig) -> Result<PathBuf, SignError>;
}

/// Writes the config to `config_path` and signed documents into `output_dir`.
pub struct LiveEffects {
    pub config_path: PathBuf,
    pub output_dir: PathBuf,
}

impl LiveEffects {
    pub fn new(config_path: PathBuf, output_dir: PathBuf) -> Self {
        Self {
            config_path,
            output_dir,
        }
    }
}

impl SessionEffects for LiveEffects {
    fn config_location(&self) -> Option<&Path> {
        Some(&self.config_path)
    }

    fn persist(&mut self, config: &SignerConfig) -> Result<(), ConfigError> {
        save_to(&self.config_path, config)
    }

    fn sign(&mut self, source: &Path, config: &SignerConfig) -> Result<PathBuf, SignError> {
        let today = chrono::Local::now().date_naive();
        let destination = self.output_dir.join(default_output_name(today));
        let report = Signer::with_lopdf().sign(&SignRequest {
            source,
            destination: &destination,
            employee_name: &config.employee_name,
            manager_name: &config.manager_name,
            signature_path: &config.signature_path,
        })?;
        Ok(report.destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hours_signer_core::api::load_from;
    use pretty_assertions::assert_eq;

    #[test]
    fn persist_writes_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hours-signer").join("config.json");
        let mut effects = LiveEffects::new(path.clone(), dir.path().to_path_buf());
        let cfg = SignerConfig {
            signature_path: "/sig.png".to_string(),
            ..SignerConfig::default()
        };

        effects.persist(&cfg).unwrap();

        assert_eq!(load_from(&path), cfg);
        assert_eq!(effects.config_location(), Some(path.as_path()));
    }

    #[test]
    fn sign_without_signature_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut effects = LiveEffects::new(dir.path().join("c.json"), dir.path().to_path_buf());

        let err = effects
            .sign(&dir.path().join("in.pdf"), &SignerConfig::default())
            .unwrap_err();

        assert!(matches!(err, SignError::MissingSignature));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
