use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use hours_signer_core::api::{
    SignerConfig, DEFAULT_EMPLOYEE_NAME, DEFAULT_MANAGER_NAME, SIGNATURE_PLACEHOLDER,
};

use super::effects::SessionEffects;
use super::input::TextField;
use super::picker::{FilePicker, PickerOutcome};

const SIGNATURE_FIELD: usize = 0;
const EMPLOYEE_FIELD: usize = 1;
const MANAGER_FIELD: usize = 2;

const SIGNATURE_CHAR_LIMIT: usize = 256;
const NAME_CHAR_LIMIT: usize = 100;

pub const PICKER_EXTENSIONS: &[&str] = &[".pdf"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    SetupWelcome,
    SetupSignature,
    SetupEmployee,
    SetupManager,
    SetupConfirm,
    Main,
    FilePicker,
    Signing,
    Result,
}

impl Screen {
    pub fn allows_quit(self) -> bool {
        matches!(self, Screen::Main | Screen::SetupWelcome | Screen::Result)
    }

    /// 1-based wizard step for the setup screens that edit a field.
    pub fn setup_step(self) -> Option<usize> {
        match self {
            Screen::SetupSignature => Some(1),
            Screen::SetupEmployee => Some(2),
            Screen::SetupManager => Some(3),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Signed(PathBuf),
    Failed(String),
}

/// What the event loop must do after a key was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    /// The `Signing` screen is active; draw it, then call [`SignerApp::run_signing`].
    StartSigning,
}

pub struct SignerApp {
    pub screen: Screen,
    /// The active, persisted configuration.
    pub config: SignerConfig,
    /// Edited by the setup wizard; becomes `config` once persisted.
    pub draft: SignerConfig,
    pub config_exists: bool,
    pub inputs: [TextField; 3],
    pub notice: Option<String>,
    pub picker: Option<FilePicker>,
    pub selected_file: Option<PathBuf>,
    pub outcome: Option<Outcome>,
    pub start_dir: PathBuf,
    effects: Box<dyn SessionEffects>,
}

impl SignerApp {
    pub fn new(
        config: SignerConfig,
        config_exists: bool,
        start_dir: PathBuf,
        effects: Box<dyn SessionEffects>,
    ) -> Self {
        let mut app = Self {
            screen: if config_exists {
                Screen::Main
            } else {
                Screen::SetupWelcome
            },
            draft: config.clone(),
            config,
            config_exists,
            inputs: [
                TextField::new(SIGNATURE_PLACEHOLDER, SIGNATURE_CHAR_LIMIT),
                TextField::new(DEFAULT_EMPLOYEE_NAME, NAME_CHAR_LIMIT),
                TextField::new(DEFAULT_MANAGER_NAME, NAME_CHAR_LIMIT),
            ],
            notice: None,
            picker: None,
            selected_file: None,
            outcome: None,
            start_dir,
            effects,
        };
        let config = app.config.clone();
        app.populate_fields(&config);
        app
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if is_quit_key(key) && self.screen.allows_quit() {
            tracing::debug!(screen = ?self.screen, "quit requested");
            return Action::Quit;
        }

        match self.screen {
            Screen::SetupWelcome => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                    self.enter_field(Screen::SetupSignature, SIGNATURE_FIELD);
                }
            }
            Screen::SetupSignature => {
                if key.code == KeyCode::Enter {
                    self.commit_signature();
                } else {
                    self.notice = None;
                    self.inputs[SIGNATURE_FIELD].handle_key(key);
                }
            }
            Screen::SetupEmployee => {
                if key.code == KeyCode::Enter {
                    self.draft.employee_name = self.inputs[EMPLOYEE_FIELD].value_or_placeholder();
                    self.enter_field(Screen::SetupManager, MANAGER_FIELD);
                } else {
                    self.inputs[EMPLOYEE_FIELD].handle_key(key);
                }
            }
            Screen::SetupManager => {
                if key.code == KeyCode::Enter {
                    self.draft.manager_name = self.inputs[MANAGER_FIELD].value_or_placeholder();
                    self.blur_all();
                    self.transition(Screen::SetupConfirm);
                } else {
                    self.inputs[MANAGER_FIELD].handle_key(key);
                }
            }
            Screen::SetupConfirm => match key.code {
                KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => self.confirm_setup(),
                KeyCode::Char('n') | KeyCode::Char('N') => {
                    let draft = self.draft.clone();
                    self.populate_fields(&draft);
                    self.enter_field(Screen::SetupSignature, SIGNATURE_FIELD);
                }
                _ => {}
            },
            Screen::Main => match key.code {
                KeyCode::Char('s') | KeyCode::Char('1') => {
                    self.picker = Some(FilePicker::new(self.start_dir.clone(), PICKER_EXTENSIONS));
                    self.transition(Screen::FilePicker);
                }
                KeyCode::Char('c') | KeyCode::Char('2') => {
                    self.draft = self.config.clone();
                    let config = self.config.clone();
                    self.populate_fields(&config);
                    self.enter_field(Screen::SetupSignature, SIGNATURE_FIELD);
                }
                _ => {}
            },
            Screen::FilePicker => {
                if key.code == KeyCode::Esc {
                    self.picker = None;
                    self.transition(Screen::Main);
                    return Action::None;
                }
                let Some(picker) = self.picker.as_mut() else {
                    self.transition(Screen::Main);
                    return Action::None;
                };
                if let PickerOutcome::Selected(path) = picker.handle_key(key) {
                    self.selected_file = Some(path);
                    self.picker = None;
                    self.transition(Screen::Signing);
                    return Action::StartSigning;
                }
            }
            Screen::Signing => {}
            Screen::Result => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                    self.outcome = None;
                    self.selected_file = None;
                    self.transition(Screen::Main);
                }
            }
        }
        Action::None
    }

    /// Run the pipeline on the selected file and move to `Result`.
    pub fn run_signing(&mut self) {
        if self.screen != Screen::Signing {
            return;
        }
        let Some(source) = self.selected_file.clone() else {
            self.transition(Screen::Main);
            return;
        };
        let outcome = match self.effects.sign(&source, &self.config) {
            Ok(path) => {
                tracing::info!(output = %path.display(), "signing finished");
                Outcome::Signed(path)
            }
            Err(e) => {
                tracing::warn!(source = %source.display(), error = %e, "signing failed");
                Outcome::Failed(e.to_string())
            }
        };
        self.outcome = Some(outcome);
        self.transition(Screen::Result);
    }

    pub fn config_location(&self) -> Option<&std::path::Path> {
        self.effects.config_location()
    }

    pub fn field(&self, screen: Screen) -> Option<&TextField> {
        match screen {
            Screen::SetupSignature => Some(&self.inputs[SIGNATURE_FIELD]),
            Screen::SetupEmployee => Some(&self.inputs[EMPLOYEE_FIELD]),
            Screen::SetupManager => Some(&self.inputs[MANAGER_FIELD]),
            _ => None,
        }
    }

    fn commit_signature(&mut self) {
        let value = self.inputs[SIGNATURE_FIELD].value().trim().to_string();
        if value.is_empty() {
            self.notice = Some("Signature path is required".to_string());
            return;
        }
        self.notice = None;
        self.draft.signature_path = value;
        self.enter_field(Screen::SetupEmployee, EMPLOYEE_FIELD);
    }

    fn confirm_setup(&mut self) {
        match self.effects.persist(&self.draft) {
            Ok(()) => {
                self.config = self.draft.clone();
                self.config_exists = true;
                tracing::info!("configuration saved");
                self.transition(Screen::Main);
            }
            Err(e) => {
                tracing::warn!(error = %e, "saving configuration failed");
                self.outcome = Some(Outcome::Failed(e.to_string()));
                self.transition(Screen::Result);
            }
        }
    }

    fn populate_fields(&mut self, config: &SignerConfig) {
        self.inputs[SIGNATURE_FIELD].set_value(&config.signature_path);
        self.inputs[EMPLOYEE_FIELD].set_value(&config.employee_name);
        self.inputs[MANAGER_FIELD].set_value(&config.manager_name);
    }

    fn enter_field(&mut self, screen: Screen, field: usize) {
        self.blur_all();
        self.inputs[field].focus();
        self.transition(screen);
    }

    fn blur_all(&mut self) {
        for input in &mut self.inputs {
            input.blur();
        }
    }

    fn transition(&mut self, next: Screen) {
        tracing::debug!(from = ?self.screen, to = ?next, "screen transition");
        self.screen = next;
    }
}

fn is_quit_key(key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        KeyCode::Char('q') => !key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}
