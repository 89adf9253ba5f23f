//! Edit a list of strings as comma-separated text.

use std::cell::RefCell;
use std::rc::Rc;

use crate::builder::{Element, el};
use crate::dialogs::{DialogCore, DialogExt, DialogResult, ModalDialog, render_default_button_panel};
use crate::dom::{Dom, NodeId};
use crate::error::DialogError;

type Normalizer = fn(&str) -> String;

fn leading_slash(folder: &str) -> String {
    if folder.starts_with('/') {
        folder.to_string()
    } else {
        format!("/{folder}")
    }
}

fn split_items(text: &str, normalize: Option<Normalizer>) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| normalize.map_or_else(|| s.to_string(), |f| f(s)))
        .collect()
}

pub struct ListEditorDialog {
    core: DialogCore<Vec<String>>,
    class_name: &'static str,
    prompt: String,
    items: Vec<String>,
    normalize: Option<Normalizer>,
    allow_empty: bool,
    editor: NodeId,
}

impl ListEditorDialog {
    pub fn new(prompt: impl Into<String>, items: Vec<String>) -> Self {
        Self {
            core: DialogCore::default(),
            class_name: "list-editor-dialog",
            prompt: prompt.into(),
            items,
            normalize: None,
            allow_empty: true,
            editor: NodeId::default(),
        }
    }

    /// Folder list; every entry gets a leading `/`.
    pub fn folders(items: Vec<String>) -> Self {
        let mut dialog = Self::new("Enter folders separated by commas:", items);
        dialog.class_name = "folders-dialog";
        dialog.normalize = Some(leading_slash);
        dialog
    }

    /// File extension list. At least one extension is required.
    pub fn extensions(items: Vec<String>) -> Self {
        let mut dialog = Self::new("Enter file extensions separated by commas:", items);
        dialog.class_name = "extensions-dialog";
        dialog.allow_empty = false;
        dialog
    }

    pub fn with_normalizer(mut self, normalize: Normalizer) -> Self {
        self.normalize = Some(normalize);
        self
    }

    pub fn allow_empty(mut self, allow: bool) -> Self {
        self.allow_empty = allow;
        self
    }

    /// The textarea holding the list text.
    pub fn editor(&self) -> NodeId {
        self.editor
    }

    /// The items as last accepted.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn show(self, dom: &Dom) -> Result<DialogResult<Vec<String>>, DialogError> {
        Rc::new(RefCell::new(self)).show_dialog(dom)
    }
}

impl ModalDialog for ListEditorDialog {
    type Output = Vec<String>;

    fn core(&self) -> &DialogCore<Vec<String>> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut DialogCore<Vec<String>> {
        &mut self.core
    }

    fn render(&mut self, dom: &Dom) -> Element {
        // The textarea is built here so that `init` can reach it.
        self.editor = dom.create_element("textarea");
        dom.set_attribute(self.editor, "spellcheck", "false");
        el("div")
            .class(self.class_name)
            .child(el("div").class("list-editor-prompt").text(self.prompt.as_str()))
            .child(self.editor)
            .child(render_default_button_panel(None, None))
    }

    fn preferred_size(&self) -> Option<(f64, f64)> {
        Some((50.0, 8.0))
    }

    fn init(&mut self, dom: &Dom) {
        dom.set_input_value(self.editor, self.items.join(", "));
    }

    fn on_ok(&mut self, dom: &Dom) -> Option<Vec<String>> {
        let items = split_items(&dom.input_value(self.editor), self.normalize);
        if items.is_empty() && !self.allow_empty {
            tracing::debug!(dialog = self.class_name, "empty list rejected");
            dom.focus(self.editor);
            return None;
        }
        self.items = items.clone();
        Some(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogs::{DialogOutcome, DialogState};
    use crate::dom::query_class;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn split_trims_and_drops_empties() {
        assert_eq!(split_items(" a, ,b ,,", None), strings(&["a", "b"]));
        assert_eq!(split_items("src, /lib", Some(leading_slash)), strings(&["/src", "/lib"]));
    }

    #[test]
    fn folders_are_seeded_and_normalized() {
        let dom = Dom::new();
        let dialog = Rc::new(RefCell::new(ListEditorDialog::folders(strings(&["/src", "docs"]))));
        let result = dialog.show_dialog(&dom).unwrap();
        dom.run_due_timers();
        let editor = dialog.borrow().editor();
        assert_eq!(dom.input_value(editor), "/src, docs");
        assert_eq!(dom.active_element(), Some(editor));

        dom.press_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        assert!(!result.is_settled());
        assert_eq!(dom.input_value(editor), "/src, docs\n");

        dom.type_text(", tests");
        let ok = query_class(&dom, dom.body(), "ok-button").unwrap();
        dom.click(ok);
        assert_eq!(
            result.try_take(),
            Some(DialogOutcome::Ok(strings(&["/src", "/docs", "/tests"])))
        );
        assert_eq!(dialog.borrow().items(), strings(&["/src", "/docs", "/tests"]).as_slice());
    }

    #[test]
    fn empty_extensions_keep_dialog_open() {
        let dom = Dom::new();
        let dialog = Rc::new(RefCell::new(ListEditorDialog::extensions(Vec::new())));
        let result = dialog.show_dialog(&dom).unwrap();
        dom.run_due_timers();
        dialog.ok(&dom).unwrap();
        assert!(!result.is_settled());
        assert_eq!(dialog.state(), DialogState::Shown);

        let editor = dialog.borrow().editor();
        dom.set_input_value(editor, " .rs , .toml");
        dialog.ok(&dom).unwrap();
        assert_eq!(result.try_take(), Some(DialogOutcome::Ok(strings(&[".rs", ".toml"]))));
    }
}
