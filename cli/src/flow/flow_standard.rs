use std::io::Write;
use std::path::Path;

use hours_signer_core::api::{load_from, CliError};

use crate::commands::cli::Args;
use crate::commands::{config, sign};

/// One-shot mode: `-init`, `-show-config`, or sign `-input`.
#[tracing::instrument(name = "cli.standard_flow", skip(args, out))]
pub fn run_standard_flow(
    args: &Args,
    config_path: &Path,
    out: &mut impl Write,
) -> Result<i32, CliError> {
    if args.init {
        config::handle_init(config_path, out)?;
        return Ok(0);
    }

    let cfg = load_from(config_path);
    if args.show_config {
        config::handle_show_config(config_path, &cfg, out)?;
        return Ok(0);
    }

    sign::handle_sign(args, &cfg, out)?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hours_signer_core::api::SignerConfig;

    #[test]
    fn init_takes_precedence_over_show_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let args = Args {
            init: true,
            show_config: true,
            ..Args::default()
        };
        let mut out = Vec::new();

        assert_eq!(run_standard_flow(&args, &path, &mut out).unwrap(), 0);
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Config file created at:"));
        assert!(!text.contains("Employee name:"));
        assert_eq!(load_from(&path), SignerConfig::default());
    }

    #[test]
    fn show_config_reads_persisted_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"employee_name":"Alice"}"#).unwrap();
        let args = Args {
            show_config: true,
            ..Args::default()
        };
        let mut out = Vec::new();

        run_standard_flow(&args, &path, &mut out).unwrap();
        assert!(String::from_utf8(out)
            .unwrap()
            .contains("Employee name: Alice\n"));
    }
}
