use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    // Focus/tab navigation
    FocusNext,
    FocusPrev,
    // Modal dialogs
    DialogAccept,
    DialogCancel,
    // Combo box dropdown
    ComboNext,
    ComboPrev,
    ComboCommit,
    ComboDismiss,
    // Demo page
    EditFolders,
    EditExtensions,
    ShowAbout,
    ConfirmReset,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Quit => "Quit",
            Action::FocusNext => "Focus next (Tab)",
            Action::FocusPrev => "Focus previous (BackTab)",
            Action::DialogAccept => "Dialog OK",
            Action::DialogCancel => "Dialog cancel",
            Action::ComboNext => "Next suggestion",
            Action::ComboPrev => "Previous suggestion",
            Action::ComboCommit => "Accept suggestion",
            Action::ComboDismiss => "Close suggestions",
            Action::EditFolders => "Edit folders",
            Action::EditExtensions => "Edit extensions",
            Action::ShowAbout => "About",
            Action::ConfirmReset => "Clear search",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyCombo {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    /// Terminals disagree on whether BackTab carries the shift bit, so it
    /// matches either way.
    pub fn matches(&self, key: &KeyEvent) -> bool {
        if self.code == KeyCode::BackTab && key.code == KeyCode::BackTab {
            return key.modifiers.difference(KeyModifiers::SHIFT)
                == self.mods.difference(KeyModifiers::SHIFT);
        }
        key.code == self.code && key.modifiers == self.mods
    }

    pub fn display(&self) -> String {
        let mut parts = Vec::new();
        if self.mods.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".to_string());
        }
        if self.mods.contains(KeyModifiers::SHIFT) {
            parts.push("Shift".to_string());
        }
        if self.mods.contains(KeyModifiers::ALT) {
            parts.push("Alt".to_string());
        }
        let code = match self.code {
            KeyCode::Char(' ') => "Space".to_string(),
            KeyCode::Char(c) => c.to_ascii_uppercase().to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::BackTab => "Shift+Tab".to_string(),
            KeyCode::Backspace => "Backspace".to_string(),
            KeyCode::Up => "Up".to_string(),
            KeyCode::Down => "Down".to_string(),
            KeyCode::F(n) => format!("F{}", n),
            _ => format!("{:?}", self.code),
        };
        parts.push(code);
        parts.join("+")
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[derive(Debug, Clone)]
pub struct KeyBindings {
    map: HashMap<Action, Vec<KeyCombo>>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        use Action::*;
        let mut kb = Self::new();
        kb.add(
            Quit,
            KeyCombo::new(KeyCode::Char('q'), KeyModifiers::CONTROL),
        );
        // Focus/tab navigation
        kb.add(FocusNext, KeyCombo::new(KeyCode::Tab, KeyModifiers::NONE));
        kb.add(
            FocusPrev,
            KeyCombo::new(KeyCode::BackTab, KeyModifiers::NONE),
        );
        // Dialogs
        kb.add(
            DialogAccept,
            KeyCombo::new(KeyCode::Enter, KeyModifiers::NONE),
        );
        kb.add(
            DialogCancel,
            KeyCombo::new(KeyCode::Esc, KeyModifiers::NONE),
        );
        // Combo box
        kb.add(ComboNext, KeyCombo::new(KeyCode::Down, KeyModifiers::NONE));
        kb.add(ComboPrev, KeyCombo::new(KeyCode::Up, KeyModifiers::NONE));
        kb.add(
            ComboCommit,
            KeyCombo::new(KeyCode::Enter, KeyModifiers::NONE),
        );
        kb.add(ComboCommit, KeyCombo::new(KeyCode::Tab, KeyModifiers::NONE));
        kb.add(
            ComboCommit,
            KeyCombo::new(KeyCode::BackTab, KeyModifiers::NONE),
        );
        kb.add(
            ComboDismiss,
            KeyCombo::new(KeyCode::Esc, KeyModifiers::NONE),
        );
        // Demo page
        kb.add(
            EditFolders,
            KeyCombo::new(KeyCode::Char('f'), KeyModifiers::CONTROL),
        );
        kb.add(
            EditExtensions,
            KeyCombo::new(KeyCode::Char('e'), KeyModifiers::CONTROL),
        );
        kb.add(ShowAbout, KeyCombo::new(KeyCode::F(1), KeyModifiers::NONE));
        kb.add(
            ConfirmReset,
            KeyCombo::new(KeyCode::Char('r'), KeyModifiers::CONTROL),
        );
        kb
    }
}

impl KeyBindings {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn add(&mut self, action: Action, combo: KeyCombo) {
        self.map.entry(action).or_default().push(combo);
    }

    pub fn matches(&self, action: Action, key: &KeyEvent) -> bool {
        if let Some(list) = self.map.get(&action) {
            list.iter().any(|c| c.matches(key))
        } else {
            false
        }
    }

    /// First binding of `action`, as shown to the user.
    pub fn shortcut(&self, action: Action) -> Option<String> {
        self.map
            .get(&action)
            .and_then(|list| list.first())
            .map(KeyCombo::display)
    }

    /// One `<keys>  <action>` line per bound action, keys padded to a common
    /// width.
    pub fn help(&self, actions: &[Action]) -> String {
        let rows: Vec<(String, Action)> = actions
            .iter()
            .filter_map(|a| self.shortcut(*a).map(|k| (k, *a)))
            .collect();
        let width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        rows.iter()
            .map(|(keys, action)| format!("{keys:<width$}  {action}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Process-wide default bindings consulted by widgets.
pub fn defaults() -> &'static KeyBindings {
    static DEFAULTS: OnceLock<KeyBindings> = OnceLock::new();
    DEFAULTS.get_or_init(KeyBindings::default)
}
