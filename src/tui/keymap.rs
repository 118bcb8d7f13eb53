//! Key normalization and configurable bindings.
//!
//! Terminal key events are reduced to short names (`"q"`, `"ctrl+c"`,
//! `"enter"`, `" "`) so they can be compared with the strings from the
//! keymap config.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::config::KeymapConfig;

/// A single key press, independent of crossterm's event kind/state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyPress {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyPress {
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    pub fn with_modifiers(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn char(c: char) -> Self {
        Self::new(KeyCode::Char(c))
    }

    pub fn ctrl(c: char) -> Self {
        Self::with_modifiers(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    /// Normalized name used by the keymap. Empty for keys that cannot be bound.
    pub fn name(&self) -> String {
        let base = match self.code {
            KeyCode::Char(c) => c.to_lowercase().to_string(),
            KeyCode::Enter => "enter".to_string(),
            KeyCode::Esc => "esc".to_string(),
            KeyCode::Left => "left".to_string(),
            KeyCode::Right => "right".to_string(),
            KeyCode::Up => "up".to_string(),
            KeyCode::Down => "down".to_string(),
            KeyCode::Tab => "tab".to_string(),
            KeyCode::Backspace => "backspace".to_string(),
            KeyCode::Delete => "delete".to_string(),
            KeyCode::Home => "home".to_string(),
            KeyCode::End => "end".to_string(),
            _ => return String::new(),
        };

        if self.modifiers.contains(KeyModifiers::CONTROL) {
            format!("ctrl+{}", base)
        } else if self.modifiers.contains(KeyModifiers::ALT) {
            format!("alt+{}", base)
        } else if let KeyCode::Char(c) = self.code {
            // Shifted letters keep their case so "N" and "n" can differ.
            c.to_string()
        } else {
            base
        }
    }

    /// The printable character this key inserts into text, if any.
    pub fn printable(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c)
                if !self
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                Some(c)
            }
            _ => None,
        }
    }
}

impl From<KeyEvent> for KeyPress {
    fn from(event: KeyEvent) -> Self {
        Self::with_modifiers(event.code, event.modifiers)
    }
}

/// One logical action and the keys that trigger it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    keys: Vec<String>,
    description: &'static str,
}

impl Binding {
    pub fn new(keys: Vec<String>, description: &'static str) -> Self {
        Self { keys, description }
    }

    pub fn matches(&self, key: &KeyPress) -> bool {
        let name = key.name();
        !name.is_empty() && self.keys.iter().any(|k| *k == name)
    }

    /// Help entry like `"space/enter start/stop"`.
    pub fn help(&self) -> String {
        let keys: Vec<&str> = self.keys.iter().map(|k| display_key(k)).collect();
        format!("{} {}", keys.join("/"), self.description)
    }
}

fn display_key(key: &str) -> &str {
    match key {
        " " => "space",
        "left" => "←",
        "right" => "→",
        "up" => "↑",
        "down" => "↓",
        other => other,
    }
}

/// All bindings the state machine consults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keymap {
    pub start_stop: Binding,
    pub exit: Binding,
    pub go_left: Binding,
    pub go_right: Binding,
    pub delete_task: Binding,
    pub create_task: Binding,
    pub reset_timer: Binding,
    pub yes: Binding,
    pub no: Binding,
}

impl Keymap {
    pub fn from_config(config: &KeymapConfig) -> Self {
        Self {
            start_stop: Binding::new(config.start_stop_timer.clone(), "start/stop"),
            exit: Binding::new(config.exit.clone(), "quit"),
            go_left: Binding::new(config.go_left.clone(), "prev"),
            go_right: Binding::new(config.go_right.clone(), "next"),
            delete_task: Binding::new(config.delete_task.clone(), "delete task"),
            create_task: Binding::new(config.create_task.clone(), "new task"),
            reset_timer: Binding::new(config.reset_timer.clone(), "reset timer"),
            yes: Binding::new(config.yes.clone(), "yes"),
            no: Binding::new(config.no.clone(), "no"),
        }
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::from_config(&KeymapConfig::default())
    }
}
