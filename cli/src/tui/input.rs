use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Single-line text input with a UTF-8 aware cursor and a placeholder shown while empty.
#[derive(Debug, Clone)]
pub struct TextField {
    value: String,
    cursor: usize,
    pub placeholder: String,
    pub char_limit: usize,
    pub focused: bool,
}

impl TextField {
    pub fn new(placeholder: impl Into<String>, char_limit: usize) -> Self {
        Self {
            value: String::new(),
            cursor: 0,
            placeholder: placeholder.into(),
            char_limit,
            focused: false,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replace the value, truncated to the char limit, with the cursor at the end.
    pub fn set_value(&mut self, value: &str) {
        self.value = value.chars().take(self.char_limit).collect();
        self.cursor = self.value.len();
    }

    /// The value, or the placeholder when the value is empty.
    pub fn value_or_placeholder(&self) -> String {
        if self.value.is_empty() {
            self.placeholder.clone()
        } else {
            self.value.clone()
        }
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    /// Apply an editing key. Returns true when the key was consumed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('a') => {
                    self.cursor = 0;
                    true
                }
                KeyCode::Char('e') => {
                    self.cursor = self.value.len();
                    true
                }
                KeyCode::Char('u') => {
                    self.value.replace_range(..self.cursor, "");
                    self.cursor = 0;
                    true
                }
                _ => false,
            };
        }

        match key.code {
            KeyCode::Char(ch) => {
                self.insert_char(ch);
                true
            }
            KeyCode::Backspace => {
                self.backspace();
                true
            }
            KeyCode::Delete => {
                self.delete();
                true
            }
            KeyCode::Left => {
                self.cursor = prev_char_boundary(&self.value, self.cursor);
                true
            }
            KeyCode::Right => {
                self.cursor = next_char_boundary(&self.value, self.cursor);
                true
            }
            KeyCode::Home => {
                self.cursor = 0;
                true
            }
            KeyCode::End => {
                self.cursor = self.value.len();
                true
            }
            _ => false,
        }
    }

    fn insert_char(&mut self, ch: char) {
        if self.value.chars().count() >= self.char_limit {
            return;
        }
        self.value.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let prev = prev_char_boundary(&self.value, self.cursor);
        self.value.replace_range(prev..self.cursor, "");
        self.cursor = prev;
    }

    fn delete(&mut self) {
        if self.cursor >= self.value.len() {
            return;
        }
        let next = next_char_boundary(&self.value, self.cursor);
        self.value.replace_range(self.cursor..next, "");
    }
}

fn prev_char_boundary(s: &str, idx: usize) -> usize {
    if idx == 0 {
        return 0;
    }
    let mut prev = 0;
    for (i, _) in s.char_indices() {
        if i >= idx {
            break;
        }
        prev = i;
    }
    prev
}

fn next_char_boundary(s: &str, idx: usize) -> usize {
    if idx >= s.len() {
        return s.len();
    }
    let mut iter = s[idx..].char_indices();
    let Some((_, ch)) = iter.next() else {
        return s.len();
    };
    idx + ch.len_utf8()
}
