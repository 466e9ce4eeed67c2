use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerOutcome {
    None,
    Selected(PathBuf),
}

/// Directory browser that only offers files with one of `extensions`.
#[derive(Debug, Clone)]
pub struct FilePicker {
    pub current_dir: PathBuf,
    pub entries: Vec<PickerEntry>,
    pub selected: usize,
    pub extensions: Vec<String>,
    pub error: Option<String>,
}

impl FilePicker {
    pub fn new(dir: impl Into<PathBuf>, extensions: &[&str]) -> Self {
        let mut picker = Self {
            current_dir: dir.into(),
            entries: Vec::new(),
            selected: 0,
            extensions: extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            error: None,
        };
        let dir = picker.current_dir.clone();
        picker.open(&dir);
        picker
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PickerOutcome {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.entries.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Home | KeyCode::Char('g') => self.selected = 0,
            KeyCode::End | KeyCode::Char('G') => {
                self.selected = self.entries.len().saturating_sub(1);
            }
            KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
                let Some(entry) = self.entries.get(self.selected).cloned() else {
                    return PickerOutcome::None;
                };
                if entry.is_dir {
                    self.open(&entry.path);
                } else {
                    tracing::debug!(path = %entry.path.display(), "file selected");
                    return PickerOutcome::Selected(entry.path);
                }
            }
            KeyCode::Backspace | KeyCode::Left | KeyCode::Char('h') => {
                if let Some(parent) = self.current_dir.parent().map(Path::to_path_buf) {
                    self.open(&parent);
                }
            }
            _ => {}
        }
        PickerOutcome::None
    }

    /// List `dir`. On failure the previous listing is kept and the error shown inline.
    fn open(&mut self, dir: &Path) {
        match self.list(dir) {
            Ok(entries) => {
                self.current_dir = dir.to_path_buf();
                self.entries = entries;
                self.selected = 0;
                self.error = None;
            }
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "cannot list directory");
                self.error = Some(format!("{}: {e}", dir.display()));
            }
        }
    }

    fn list(&self, dir: &Path) -> std::io::Result<Vec<PickerEntry>> {
        let mut entries = Vec::new();
        for item in std::fs::read_dir(dir)? {
            let item = item?;
            let name = item.file_name().to_string_lossy().to_string();
            if name.starts_with('.') {
                continue;
            }
            let path = item.path();
            let is_dir = path.is_dir();
            if !is_dir && !self.accepts(&path) {
                continue;
            }
            entries.push(PickerEntry { name, path, is_dir });
        }
        entries.sort_by(|a, b| {
            b.is_dir
                .cmp(&a.is_dir)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });
        Ok(entries)
    }

    fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .is_some_and(|ext| self.extensions.iter().any(|allowed| *allowed == ext))
    }
}
