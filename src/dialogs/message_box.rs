use std::cell::RefCell;
use std::rc::Rc;

use crate::builder::{Element, el};
use crate::dialogs::{DialogCore, DialogExt, DialogResult, ModalDialog};
use crate::dom::Dom;
use crate::error::DialogError;

#[derive(Debug, Clone)]
pub struct MessageBoxOptions {
    pub hide_cancel: bool,
    pub ok_label: String,
    pub cancel_label: String,
}

impl Default for MessageBoxOptions {
    fn default() -> Self {
        Self {
            hide_cancel: false,
            ok_label: "OK".to_string(),
            cancel_label: "Cancel".to_string(),
        }
    }
}

/// A message with OK and, optionally, Cancel buttons.
pub struct MessageBox {
    core: DialogCore<()>,
    message: String,
    options: MessageBoxOptions,
}

impl MessageBox {
    pub fn new(message: impl Into<String>, options: MessageBoxOptions) -> Self {
        Self {
            core: DialogCore::default(),
            message: message.into(),
            options,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    fn open(dom: &Dom, message: &str, options: MessageBoxOptions) -> Result<DialogResult<()>, DialogError> {
        Rc::new(RefCell::new(Self::new(message, options))).show_dialog(dom)
    }

    /// Plain message; only an OK button.
    pub fn show(dom: &Dom, message: &str) -> Result<DialogResult<()>, DialogError> {
        let options = MessageBoxOptions {
            hide_cancel: true,
            ..MessageBoxOptions::default()
        };
        Self::open(dom, message, options)
    }

    /// OK/Cancel confirmation.
    pub fn confirm(dom: &Dom, message: &str) -> Result<DialogResult<()>, DialogError> {
        Self::open(dom, message, MessageBoxOptions::default())
    }

    /// Yes/No question.
    pub fn ask(dom: &Dom, message: &str) -> Result<DialogResult<()>, DialogError> {
        let options = MessageBoxOptions {
            ok_label: "Yes".to_string(),
            cancel_label: "No".to_string(),
            ..MessageBoxOptions::default()
        };
        Self::open(dom, message, options)
    }
}

impl ModalDialog for MessageBox {
    type Output = ();

    fn core(&self) -> &DialogCore<()> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut DialogCore<()> {
        &mut self.core
    }

    fn render(&mut self, _dom: &Dom) -> Element {
        let cancel = (!self.options.hide_cancel).then(|| {
            el("button")
                .prop("type", "button")
                .class("cancel-button")
                .text(self.options.cancel_label.as_str())
        });
        el("div")
            .class("message-box")
            .child(el("div").class("message-box-message").text(self.message.as_str()))
            .child(
                el("div")
                    .class("dialog-button-panel")
                    .child(
                        el("button")
                            .prop("type", "button")
                            .class("ok-button default-button")
                            .text(self.options.ok_label.as_str()),
                    )
                    .child(cancel),
            )
    }

    fn on_ok(&mut self, _dom: &Dom) -> Option<()> {
        Some(())
    }

    /// Wide enough for the longest message line; one row per line plus the
    /// button row and the border.
    fn preferred_size(&self) -> Option<(f64, f64)> {
        let longest = self.message.lines().map(|l| l.chars().count()).max().unwrap_or(0);
        let lines = self.message.lines().count().max(1);
        Some(((longest + 4).max(30) as f64, (lines + 3) as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogs::DialogOutcome;
    use crate::dom::query_class;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn esc() -> KeyEvent {
        KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)
    }

    #[test]
    fn show_has_only_ok_and_ignores_escape() {
        let dom = Dom::new();
        let result = MessageBox::show(&dom, "Index rebuilt").unwrap();
        dom.run_due_timers();
        let body = dom.body();
        assert!(query_class(&dom, body, "cancel-button").is_none());
        let text = query_class(&dom, body, "message-box-message").unwrap();
        assert_eq!(dom.text_content(text), "Index rebuilt");
        dom.press_key(esc());
        assert!(!result.is_settled());
        dom.click(query_class(&dom, body, "ok-button").unwrap());
        assert_eq!(result.try_take(), Some(DialogOutcome::Ok(())));
    }

    #[test]
    fn ask_relabels_buttons_and_no_cancels() {
        let dom = Dom::new();
        let result = MessageBox::ask(&dom, "Delete index?").unwrap();
        let body = dom.body();
        let yes = query_class(&dom, body, "ok-button").unwrap();
        let no = query_class(&dom, body, "cancel-button").unwrap();
        assert_eq!(dom.text_content(yes), "Yes");
        assert_eq!(dom.text_content(no), "No");
        dom.click(no);
        assert_eq!(result.try_take(), Some(DialogOutcome::Cancelled));
        assert!(query_class(&dom, body, "dialog-mask").is_none());
    }

    #[test]
    fn confirm_escape_cancels() {
        let dom = Dom::new();
        let result = MessageBox::confirm(&dom, "Continue?").unwrap();
        dom.run_due_timers();
        dom.press_key(esc());
        assert_eq!(result.try_take(), Some(DialogOutcome::Cancelled));
    }
}
