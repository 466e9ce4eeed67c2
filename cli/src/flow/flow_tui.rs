use std::path::Path;

use anyhow::Context;
use hours_signer_core::api::{config_exists, load_from, CliError};

use crate::tui::{check_tui_support, run_session, LiveEffects, SignerApp};

/// Interactive mode. Signed documents land in the current working directory.
pub async fn run_tui_flow(config_path: &Path) -> Result<i32, CliError> {
    check_tui_support().map_err(CliError::Terminal)?;

    let exists = config_exists(config_path);
    let cfg = load_from(config_path);
    let cwd = std::env::current_dir().context("failed to resolve the working directory")?;
    tracing::info!(config = %config_path.display(), first_run = !exists, "starting interactive session");

    let effects = LiveEffects::new(config_path.to_path_buf(), cwd.clone());
    let mut app = SignerApp::new(cfg, exists, cwd, Box::new(effects));
    run_session(&mut app).await?;
    Ok(0)
}
