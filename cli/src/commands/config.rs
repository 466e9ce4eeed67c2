//! `-init` and `-show-config`.
use std::io::Write;
use std::path::Path;

use hours_signer_core::api::{save_to, CliError, SignerConfig};

/// Write the default configuration to `path`, overwriting any existing file.
pub fn handle_init(path: &Path, out: &mut impl Write) -> Result<(), CliError> {
    save_to(path, &SignerConfig::default())?;
    writeln!(out, "Config file created at: {}", path.display())?;
    Ok(())
}

pub fn handle_show_config(
    path: &Path,
    cfg: &SignerConfig,
    out: &mut impl Write,
) -> Result<(), CliError> {
    writeln!(out, "Config file: {}", path.display())?;
    writeln!(out, "Employee name: {}", cfg.employee_name)?;
    writeln!(out, "Manager name: {}", cfg.manager_name)?;
    if cfg.has_signature() {
        writeln!(out, "Signature path: {}", cfg.signature_path)?;
    } else {
        writeln!(out, "Signature: (not configured)")?;
    }
    Ok(())
}
