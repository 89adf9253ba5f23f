//! Modal dialogs.
//!
//! A dialog type implements [`ModalDialog`] and lives in an
//! `Rc<RefCell<..>>`; [`DialogExt`] drives its lifecycle:
//! `Unmounted -> Shown -> Closed`. Showing inserts a full-viewport mask with
//! the dialog inside, wires the OK, Cancel and Close buttons found by class
//! (`ok-button`, `cancel-button`, `close-button`), installs the key router
//! and focuses the first focusable element on the next timer turn. OK and
//! Cancel both leave through one close path that removes the mask and
//! settles the [`DialogResult`].

mod list_editor;
mod message_box;
mod result;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::builder::{Element, el};
use crate::dom::{Dom, Event, NodeId, focusable_children, handler, is_visible, query_class};
use crate::error::DialogError;
use crate::keybindings::{self, Action};

pub use list_editor::ListEditorDialog;
pub use message_box::{MessageBox, MessageBoxOptions};
pub use result::{DialogOutcome, DialogResult};
use result::{Settler, pending};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogState {
    #[default]
    Unmounted,
    Shown,
    Closed,
}

/// What a key hook asks the dialog to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogCommand {
    Ok,
    Cancel,
    Ignore,
}

/// Bookkeeping shared by every dialog.
pub struct DialogCore<T> {
    state: DialogState,
    mask: NodeId,
    root: NodeId,
    ok_button: Option<NodeId>,
    cancel_button: Option<NodeId>,
    close_button: Option<NodeId>,
    settler: Option<Settler<T>>,
}

impl<T> Default for DialogCore<T> {
    fn default() -> Self {
        Self {
            state: DialogState::Unmounted,
            mask: NodeId::default(),
            root: NodeId::default(),
            ok_button: None,
            cancel_button: None,
            close_button: None,
            settler: None,
        }
    }
}

impl<T> DialogCore<T> {
    pub fn state(&self) -> DialogState {
        self.state
    }

    /// The `dialog` element holding the rendered contents.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn mask(&self) -> NodeId {
        self.mask
    }

    pub fn ok_button(&self) -> Option<NodeId> {
        self.ok_button
    }

    pub fn cancel_button(&self) -> Option<NodeId> {
        self.cancel_button
    }
}

pub trait ModalDialog: 'static {
    type Output: 'static;

    fn core(&self) -> &DialogCore<Self::Output>;

    fn core_mut(&mut self) -> &mut DialogCore<Self::Output>;

    /// Describe the dialog contents.
    fn render(&mut self, dom: &Dom) -> Element;

    /// Called once the contents are built and wired.
    fn init(&mut self, _dom: &Dom) {}

    /// Collect the result. Returning `None` rejects the input and keeps the
    /// dialog open.
    fn on_ok(&mut self, dom: &Dom) -> Option<Self::Output>;

    fn on_enter_key(&mut self, _dom: &Dom) -> DialogCommand {
        DialogCommand::Ok
    }

    fn on_escape_key(&mut self, _dom: &Dom) -> DialogCommand {
        DialogCommand::Cancel
    }

    /// Size to give the dialog element, in layout units.
    fn preferred_size(&self) -> Option<(f64, f64)> {
        None
    }
}

/// Standard OK/Cancel button row.
pub fn render_default_button_panel(ok_label: Option<&str>, cancel_label: Option<&str>) -> Element {
    el("div")
        .class("dialog-button-panel")
        .child(
            el("button")
                .prop("type", "button")
                .class("ok-button default-button")
                .text(ok_label.unwrap_or("OK")),
        )
        .child(
            el("button")
                .prop("type", "button")
                .class("cancel-button")
                .text(cancel_label.unwrap_or("Cancel")),
        )
}

/// Lifecycle operations on a shared dialog instance.
pub trait DialogExt<D: ModalDialog> {
    /// Show the dialog and return its eventual outcome. Showing a dialog that
    /// is already shown rebuilds it and cancels the earlier result.
    fn show_dialog(&self, dom: &Dom) -> Result<DialogResult<D::Output>, DialogError>;

    /// Run the OK path as if the OK button was pressed.
    fn ok(&self, dom: &Dom) -> Result<(), DialogError>;

    /// Run the Cancel path.
    fn cancel(&self, dom: &Dom) -> Result<(), DialogError>;

    fn state(&self) -> DialogState;
}

impl<D: ModalDialog> DialogExt<D> for Rc<RefCell<D>> {
    fn show_dialog(&self, dom: &Dom) -> Result<DialogResult<D::Output>, DialogError> {
        if self.state() == DialogState::Shown {
            tracing::warn!("dialog shown again while open; cancelling earlier result");
            if let Some(settler) = close(self, dom) {
                settler.settle(DialogOutcome::Cancelled);
            }
        }

        dom.enter_modal();
        let mask = el("div").class("dialog-mask").build(dom)?;
        dom.append_child(dom.body(), mask);
        let root = el("div").class("dialog").build(dom)?;
        dom.append_child(mask, root);

        let contents = self.borrow_mut().render(dom);
        let contents = match contents.build(dom) {
            Ok(node) => node,
            Err(e) => {
                dom.discard(mask);
                dom.leave_modal();
                return Err(e.into());
            }
        };
        dom.append_child(root, contents);

        let (result, settler) = pending();
        {
            let mut this = self.borrow_mut();
            let size = this.preferred_size();
            let core = this.core_mut();
            core.state = DialogState::Shown;
            core.mask = mask;
            core.root = root;
            core.ok_button = query_class(dom, root, "ok-button");
            core.cancel_button = query_class(dom, root, "cancel-button");
            core.close_button = query_class(dom, root, "close-button");
            core.settler = Some(settler);
            if let Some((width, height)) = size {
                dom.set_style(root, "width", format!("{width}px"));
                dom.set_style(root, "height", format!("{height}px"));
            }
        }
        center(dom, root);
        wire(self, dom);
        self.borrow_mut().init(dom);
        dom.set_timeout(Duration::ZERO, move |dom| {
            if !dom.exists(root) {
                return;
            }
            // The first layout has run by now; an unsized dialog has a height.
            center(dom, root);
            if let Some(first) = focusable_children(dom, root).first() {
                dom.focus(*first);
            }
        });
        tracing::debug!(depth = dom.modal_depth(), "dialog shown");
        Ok(result)
    }

    fn ok(&self, dom: &Dom) -> Result<(), DialogError> {
        if self.state() != DialogState::Shown {
            return Err(DialogError::NotShown);
        }
        let Some(value) = self.borrow_mut().on_ok(dom) else {
            tracing::debug!("dialog input rejected; staying open");
            return Ok(());
        };
        if let Some(settler) = close(self, dom) {
            settler.settle(DialogOutcome::Ok(value));
        }
        Ok(())
    }

    fn cancel(&self, dom: &Dom) -> Result<(), DialogError> {
        if self.state() != DialogState::Shown {
            return Err(DialogError::NotShown);
        }
        if let Some(settler) = close(self, dom) {
            settler.settle(DialogOutcome::Cancelled);
        }
        Ok(())
    }

    fn state(&self) -> DialogState {
        self.borrow().core().state
    }
}

/// The single exit path: remove the mask (and the dialog inside it) and the
/// body's `no-scroll` marker. Returns the settler for the caller to settle
/// once the dialog borrow is released.
fn close<D: ModalDialog>(dialog: &Rc<RefCell<D>>, dom: &Dom) -> Option<Settler<D::Output>> {
    let (mask, settler) = {
        let mut this = dialog.borrow_mut();
        let core = this.core_mut();
        core.state = DialogState::Closed;
        core.ok_button = None;
        core.cancel_button = None;
        core.close_button = None;
        (core.mask, core.settler.take())
    };
    dom.discard(mask);
    dom.leave_modal();
    tracing::debug!(depth = dom.modal_depth(), "dialog closed");
    settler
}

/// Position the dialog a third of the way down and centred horizontally,
/// never above or left of the viewport. Without a `width` style the dialog
/// spans from its left edge to the viewport's, so it stays at column 0.
fn center(dom: &Dom, root: NodeId) {
    let (vw, vh) = dom.viewport();
    let top = ((vh - dom.offset_height(root)) / 3.0).floor().max(0.0);
    let left = if dom.style(root, "width").is_some() {
        ((vw - dom.offset_width(root)) / 2.0).floor().max(0.0)
    } else {
        0.0
    };
    dom.set_style(root, "top", format!("{top}px"));
    dom.set_style(root, "left", format!("{left}px"));
}

fn wire<D: ModalDialog>(dialog: &Rc<RefCell<D>>, dom: &Dom) {
    let (root, ok, cancel, close) = {
        let this = dialog.borrow();
        let core = this.core();
        (core.root, core.ok_button, core.cancel_button, core.close_button)
    };
    if let Some(ok) = ok {
        let me = dialog.clone();
        dom.add_listener(ok, "click", handler(move |dom, _| report(me.ok(dom))));
    }
    for button in [cancel, close].into_iter().flatten() {
        let me = dialog.clone();
        dom.add_listener(button, "click", handler(move |dom, _| report(me.cancel(dom))));
    }
    let me = dialog.clone();
    dom.add_listener(root, "keydown", handler(move |dom, ev| on_key_down(&me, dom, ev)));
}

fn report(result: Result<(), DialogError>) {
    if let Err(e) = result {
        tracing::warn!(error = %e, "dialog action ignored");
    }
}

fn run_command<D: ModalDialog>(dialog: &Rc<RefCell<D>>, dom: &Dom, command: DialogCommand) {
    match command {
        DialogCommand::Ok => report(dialog.ok(dom)),
        DialogCommand::Cancel => report(dialog.cancel(dom)),
        DialogCommand::Ignore => {}
    }
}

fn on_key_down<D: ModalDialog>(dialog: &Rc<RefCell<D>>, dom: &Dom, ev: &mut Event) {
    let Some(key) = ev.key_event().copied() else {
        return;
    };
    let bindings = keybindings::defaults();
    let target = ev.target();
    if bindings.matches(Action::DialogAccept, &key) {
        if target.and_then(|t| dom.tag(t)).as_deref() == Some("textarea") {
            return;
        }
        ev.prevent_default();
        let command = dialog.borrow_mut().on_enter_key(dom);
        run_command(dialog, dom, command);
    } else if bindings.matches(Action::DialogCancel, &key) {
        ev.prevent_default();
        let cancel_visible = dialog
            .borrow()
            .core()
            .cancel_button
            .is_some_and(|c| is_visible(dom, c));
        if cancel_visible {
            let command = dialog.borrow_mut().on_escape_key(dom);
            run_command(dialog, dom, command);
        }
    } else if bindings.matches(Action::FocusNext, &key) || bindings.matches(Action::FocusPrev, &key)
    {
        let root = dialog.borrow().core().root;
        let focusables = focusable_children(dom, root);
        if focusables.len() < 2 {
            return;
        }
        let (Some(first), Some(last)) = (focusables.first(), focusables.last()) else {
            return;
        };
        let backwards = ev.is_back_tab();
        if !backwards && target == Some(*last) {
            ev.prevent_default();
            dom.focus(*first);
        } else if backwards && target == Some(*first) {
            ev.prevent_default();
            dom.focus(*last);
        }
    }
}
