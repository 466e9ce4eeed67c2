mod load;
mod types;

pub use load::{
    config_exists, config_path, get_config_dir, load_default, load_from, logging_from_env,
    save_to,
};
pub use types::{
    LoggingConfig, SignerConfig, DEFAULT_EMPLOYEE_NAME, DEFAULT_MANAGER_NAME,
    SIGNATURE_PLACEHOLDER,
};
