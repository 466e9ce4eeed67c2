use std::time::Duration;

use hours_signer_core::api::CliError;

use super::app::{Action, SignerApp};
use super::events::{InputEvent, InputReader};
use super::terminal::{restore_terminal, setup_terminal, Term};
use super::ui;

const REDRAW_INTERVAL: Duration = Duration::from_millis(250);

/// Run the interactive session until the user quits. The terminal is restored on every path.
pub async fn run_session(app: &mut SignerApp) -> Result<(), CliError> {
    let mut terminal = setup_terminal().map_err(CliError::Terminal)?;
    let result = run_session_on_terminal(&mut terminal, app).await;
    restore_terminal(&mut terminal);
    result
}

pub async fn run_session_on_terminal(
    terminal: &mut Term,
    app: &mut SignerApp,
) -> Result<(), CliError> {
    tracing::debug!(screen = ?app.screen, "session loop starting");
    let (input_reader, mut input_rx) = InputReader::start();
    let mut tick = tokio::time::interval(REDRAW_INTERVAL);

    let result = loop {
        if let Err(e) = redraw(terminal, app) {
            break Err(e);
        }

        tokio::select! {
            event = input_rx.recv() => match event {
                Some(InputEvent::Key(key)) => match app.handle_key(key) {
                    Action::Quit => break Ok(()),
                    Action::StartSigning => {
                        // The pipeline blocks this task; show the Signing screen first.
                        if let Err(e) = redraw(terminal, app) {
                            break Err(e);
                        }
                        app.run_signing();
                    }
                    Action::None => {}
                },
                Some(InputEvent::Resize(width, height)) => {
                    tracing::trace!(width, height, "terminal resized");
                }
                None => break Err(CliError::Terminal("input reader stopped".to_string())),
            },
            _ = tick.tick() => {}
        }
    };

    input_reader.stop();
    tracing::debug!(ok = result.is_ok(), "session loop finished");
    result
}

fn redraw(terminal: &mut Term, app: &SignerApp) -> Result<(), CliError> {
    terminal
        .draw(|f| ui::draw(f, app))
        .map(|_| ())
        .map_err(|e| CliError::Terminal(e.to_string()))
}
