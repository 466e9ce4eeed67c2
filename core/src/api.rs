//! Stable re-exports for the `cli` crate.
//!
//! Prefer importing from `hours_signer_core::api` instead of reaching into internal modules.

pub use crate::annotate::{
    default_output_name, default_output_path, sign, DocumentEngine, LopdfEngine, OverlaySpec,
    OverlayStep, SignReport, SignRequest, Signer,
};
pub use crate::config::{
    config_exists, config_path, get_config_dir, load_default, load_from, logging_from_env, save_to,
    LoggingConfig, SignerConfig, DEFAULT_EMPLOYEE_NAME, DEFAULT_MANAGER_NAME,
    SIGNATURE_PLACEHOLDER,
};
pub use crate::error::{CliError, ConfigError, EngineError, ErrorKind, SignError};
