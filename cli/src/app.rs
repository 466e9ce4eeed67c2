//! Mode selection: one-shot flags or the interactive session.
use hours_signer_core::api::{config_path, CliError};

use crate::commands::cli::{is_flag_mode, usage, Args};
use crate::flow::{run_standard_flow, run_tui_flow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    OneShot,
    Interactive,
}

impl Mode {
    pub fn detect(argv: &[String]) -> Self {
        if is_flag_mode(argv) {
            Mode::OneShot
        } else {
            Mode::Interactive
        }
    }
}

#[tracing::instrument(name = "cli.run_app", skip(argv))]
pub async fn run_app(mode: Mode, argv: Vec<String>) -> Result<i32, CliError> {
    let config_path = config_path()?;
    match mode {
        Mode::OneShot => {
            let args = match Args::try_parse_normalized(argv) {
                Ok(args) => args,
                Err(e) => {
                    let code = e.exit_code();
                    let _ = e.print();
                    return Ok(code);
                }
            };
            let mut stdout = std::io::stdout().lock();
            run_standard_flow(&args, &config_path, &mut stdout)
        }
        Mode::Interactive => run_tui_flow(&config_path).await,
    }
}

/// Process exit code for a failed run.
pub fn exit_code_for_error(e: &CliError) -> i32 {
    // 0: success
    // 1: any failure (usage, configuration, pipeline, terminal)
    tracing::debug!(kind = ?e.kind(), error = %e, "exiting with error");
    1
}

/// What a failed run writes to stderr. Usage errors are followed by the flag summary.
pub fn error_report(e: &CliError) -> String {
    let mut report = format!("Error: {e}");
    if matches!(e, CliError::Usage(_)) {
        report.push_str("\n\n");
        report.push_str(&usage());
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use hours_signer_core::api::SignError;

    #[test]
    fn every_failure_exits_with_one() {
        assert_eq!(exit_code_for_error(&CliError::Usage("-input is required".into())), 1);
        assert_eq!(exit_code_for_error(&CliError::Sign(SignError::MissingSignature)), 1);
        assert_eq!(exit_code_for_error(&CliError::Terminal("too small".into())), 1);
    }

    #[test]
    fn usage_errors_print_the_flag_summary() {
        let report = error_report(&CliError::Usage("-input is required".into()));
        assert!(report.starts_with("Error: "));
        assert!(report.contains("-input is required"));
        assert!(report.contains(&usage()));
    }

    #[test]
    fn other_errors_print_only_the_message() {
        let err = CliError::Sign(SignError::MissingSignature);
        assert_eq!(error_report(&err), format!("Error: {err}"));
    }

    #[test]
    fn flags_select_one_shot_mode() {
        let argv = |args: &[&str]| args.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(Mode::detect(&argv(&["hours-signer"])), Mode::Interactive);
        assert_eq!(
            Mode::detect(&argv(&["hours-signer", "-input", "in.pdf"])),
            Mode::OneShot
        );
    }
}
