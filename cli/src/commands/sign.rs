//! One-shot signing: `-input <pdf> [-output <pdf>] [-employee ..] [-manager ..] [-signature ..]`.
use std::io::Write;
use std::path::PathBuf;

use hours_signer_core::api::{default_output_path, sign, CliError, SignerConfig};

use super::cli::Args;

/// Sign `args.input` with `cfg` plus the per-run overrides from `args`.
pub fn handle_sign(args: &Args, cfg: &SignerConfig, out: &mut impl Write) -> Result<(), CliError> {
    let Some(input) = args.input.as_deref() else {
        return Err(CliError::Usage("-input is required".to_string()));
    };
    let cfg = cfg.with_overrides(
        args.employee.as_deref(),
        args.manager.as_deref(),
        args.signature.as_deref(),
    );
    let output: PathBuf = args.output.clone().unwrap_or_else(default_output_path);

    let report = sign(
        input,
        &output,
        &cfg.employee_name,
        &cfg.manager_name,
        &cfg.signature_path,
    )?;
    tracing::info!(output = %report.destination.display(), page = report.page, "one-shot sign done");

    writeln!(out, "✓ Created signed PDF: {}", output.display())?;
    writeln!(out, "  Employee: {}", cfg.employee_name)?;
    writeln!(out, "  Manager: {}", cfg.manager_name)?;
    Ok(())
}
