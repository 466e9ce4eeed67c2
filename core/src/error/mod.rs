#[allow(clippy::module_inception)]
pub mod error;
pub mod sign;

pub use error::{CliError, ConfigError, ErrorKind};
pub use sign::{EngineError, SignError};
