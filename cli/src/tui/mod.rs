//! Interactive session: screen state machine, file picker, renderer and event loop.

mod app;
mod effects;
mod events;
mod input;
mod loop_run;
mod picker;
mod terminal;
mod ui;

pub use app::{Action, Outcome, Screen, SignerApp, PICKER_EXTENSIONS};
pub use effects::{LiveEffects, SessionEffects};
pub use input::TextField;
pub use loop_run::{run_session, run_session_on_terminal};
pub use picker::{FilePicker, PickerEntry, PickerOutcome};
pub use terminal::{check_tui_support, restore_terminal, setup_terminal};
