use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};

/// Cleans raw terminal key events before they reach the document.
///
/// Shift+Tab arrives as `Tab` with SHIFT on some terminals and as `BackTab`
/// on others; both become `BackTab` without SHIFT. Releases are dropped and
/// auto-repeats are delivered as presses, so a held arrow key keeps moving
/// the combo box highlight.
#[derive(Debug, Default)]
pub struct KeyNormalizer {
    dropped_releases: u64,
}

impl KeyNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn normalize(&mut self, event: Event) -> Option<Event> {
        let Event::Key(mut key) = event else {
            return Some(event);
        };
        match key.kind {
            KeyEventKind::Release => {
                self.dropped_releases += 1;
                return None;
            }
            KeyEventKind::Repeat => key.kind = KeyEventKind::Press,
            KeyEventKind::Press => {}
        }
        if matches!(key.code, KeyCode::Tab | KeyCode::BackTab)
            && key.modifiers.contains(KeyModifiers::SHIFT)
        {
            key.code = KeyCode::BackTab;
            key.modifiers.remove(KeyModifiers::SHIFT);
        }
        Some(Event::Key(key))
    }

    pub fn dropped_releases(&self) -> u64 {
        self.dropped_releases
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;

    fn key(code: KeyCode, mods: KeyModifiers, kind: KeyEventKind) -> Event {
        let mut key = KeyEvent::new(code, mods);
        key.kind = kind;
        Event::Key(key)
    }

    #[test]
    fn shift_tab_becomes_backtab() {
        let mut norm = KeyNormalizer::new();
        let out = norm.normalize(key(KeyCode::Tab, KeyModifiers::SHIFT, KeyEventKind::Press));
        let Some(Event::Key(k)) = out else {
            panic!("expected key event");
        };
        assert_eq!(k.code, KeyCode::BackTab);
        assert!(!k.modifiers.contains(KeyModifiers::SHIFT));
    }

    #[test]
    fn releases_are_dropped_and_repeats_pressed() {
        let mut norm = KeyNormalizer::new();
        let release = key(KeyCode::Char('a'), KeyModifiers::NONE, KeyEventKind::Release);
        assert!(norm.normalize(release).is_none());
        assert_eq!(norm.dropped_releases(), 1);
        let repeat = key(KeyCode::Down, KeyModifiers::NONE, KeyEventKind::Repeat);
        let Some(Event::Key(k)) = norm.normalize(repeat) else {
            panic!("expected key event");
        };
        assert_eq!(k.kind, KeyEventKind::Press);
    }

    #[test]
    fn non_key_events_pass_through() {
        let mut norm = KeyNormalizer::new();
        assert_eq!(norm.normalize(Event::Resize(10, 20)), Some(Event::Resize(10, 20)));
    }
}
