//! A code-search page assembled from the widgets: a search combo box, the
//! filter control, a results/preview splitter and a status line. Page
//! shortcuts open the folder and extension editors, an about box and a reset
//! confirmation.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use indoc::indoc;

use crate::builder::{Element, el};
use crate::components::{ComboBox, FilterControl, Slot, Splitter, slot};
use crate::dialogs::{DialogOutcome, ListEditorDialog, MessageBox};
use crate::dom::{Dom, Event, NodeId, Value, handler};
use crate::error::{BuildError, DialogError};
use crate::keybindings::{self, Action};

const ABOUT: &str = indoc! {"
    eureka-ui
    Code search front end.
"};

const PAGE_ACTIONS: [Action; 4] = [
    Action::EditFolders,
    Action::EditExtensions,
    Action::ShowAbout,
    Action::ConfirmReset,
];

fn about_text() -> String {
    let bindings = keybindings::defaults();
    let mut actions = PAGE_ACTIONS.to_vec();
    actions.push(Action::Quit);
    format!("{ABOUT}\n{}", bindings.help(&actions))
}

#[derive(Debug, Clone, Default)]
pub struct PageOptions {
    pub suggestions: Vec<String>,
    /// Accept search text that matches no suggestion.
    pub free_text: bool,
    pub extensions: Vec<String>,
}

pub struct SearchPage {
    root: NodeId,
    status: NodeId,
    results: NodeId,
    combo: Rc<RefCell<ComboBox>>,
    filter: Rc<RefCell<FilterControl>>,
    splitter: Rc<RefCell<Splitter>>,
    folders: Rc<RefCell<Vec<String>>>,
    extensions: Rc<RefCell<Vec<String>>>,
    split_done: Cell<bool>,
}

fn set_text(dom: &Dom, node: NodeId, text: &str) {
    dom.clear_children(node);
    let text = dom.create_text(text);
    dom.append_child(node, text);
}

fn mounted<C>(slot: &Slot<C>, name: &'static str) -> Result<Rc<RefCell<C>>, BuildError> {
    slot.borrow().clone().ok_or(BuildError::MissingProperty {
        component: name,
        property: "ref",
    })
}

impl SearchPage {
    /// Build the page into the document body.
    pub fn mount(dom: &Dom, options: PageOptions) -> Result<Rc<Self>, BuildError> {
        let status = dom.create_element("div");
        dom.add_class(status, "status-line");
        let results = el("div").class("results-pane").build(dom)?;
        let preview = el("div")
            .class("preview-pane")
            .text("Select a result to preview it.")
            .build(dom)?;

        let combo = slot::<ComboBox>();
        let filter = slot::<FilterControl>();
        let splitter = slot::<Splitter>();
        let on_status = move |prefix: &'static str| {
            move |dom: &Dom, ev: &mut Event| {
                let detail = match ev.detail() {
                    Value::Null => "none".to_string(),
                    other => other.to_string(),
                };
                set_text(dom, status, &format!("{prefix}{detail}"));
            }
        };

        let page = el("div")
            .class("search-page")
            .child(
                Element::component::<ComboBox>()
                    .prop("prompt", "Search:")
                    .prop("placeholder", "Type to search")
                    .prop("suggestions", options.suggestions.clone())
                    .prop("constrain", !options.free_text)
                    .on("onItemSelected", move |dom, ev| {
                        set_text(dom, results, &format!("Results for \"{}\"", ev.detail()));
                        on_status("Searching for: ")(dom, ev);
                    })
                    .mount_into(&combo),
            )
            .child(
                Element::component::<FilterControl>()
                    .prop("extensions", options.extensions.clone())
                    .on("onFilterChanged", on_status("Filter: "))
                    .mount_into(&filter),
            )
            .child(
                Element::component::<Splitter>()
                    .prop("firstChild", results)
                    .prop("secondChild", preview)
                    .on("onSplitterMoved", move |dom, _| set_text(dom, status, "Panes resized"))
                    .mount_into(&splitter),
            )
            .child(status)
            .build(dom)?;
        dom.append_child(dom.body(), page);
        set_text(dom, status, "Ready");

        let this = Rc::new(Self {
            root: page,
            status,
            results,
            combo: mounted(&combo, "ComboBox")?,
            filter: mounted(&filter, "FilterControl")?,
            splitter: mounted(&splitter, "Splitter")?,
            folders: Rc::default(),
            extensions: Rc::new(RefCell::new(options.extensions)),
            split_done: Cell::new(false),
        });
        let me = this.clone();
        dom.add_listener(
            dom.body(),
            "keydown",
            handler(move |dom, ev| me.on_key_down(dom, ev)),
        );
        tracing::debug!("search page mounted");
        Ok(this)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn status(&self, dom: &Dom) -> String {
        dom.text_content(self.status)
    }

    pub fn results(&self) -> NodeId {
        self.results
    }

    pub fn combo(&self) -> &Rc<RefCell<ComboBox>> {
        &self.combo
    }

    pub fn filter(&self) -> &Rc<RefCell<FilterControl>> {
        &self.filter
    }

    pub fn splitter(&self) -> &Rc<RefCell<Splitter>> {
        &self.splitter
    }

    pub fn folders(&self) -> Vec<String> {
        self.folders.borrow().clone()
    }

    pub fn extensions(&self) -> Vec<String> {
        self.extensions.borrow().clone()
    }

    /// Give the splitter the rows left below the controls. Call after the
    /// viewport changed and the document was laid out.
    pub fn fit(&self, dom: &Dom) {
        let (_, height) = dom.viewport();
        let mut splitter = self.splitter.borrow_mut();
        let root = splitter.root();
        let available = (height - dom.document_top(root) - 1.0).max(3.0);
        dom.set_style(root, "height", format!("{available}px"));
        if self.split_done.replace(true) {
            splitter.relayout(dom);
        } else {
            splitter.layout(dom);
        }
    }

    fn on_key_down(&self, dom: &Dom, ev: &mut Event) {
        if dom.modal_depth() > 0 {
            return;
        }
        let Some(key) = ev.key_event().copied() else {
            return;
        };
        let bindings = keybindings::defaults();
        let action = PAGE_ACTIONS
            .into_iter()
            .find(|a| bindings.matches(*a, &key));
        let Some(action) = action else {
            return;
        };
        ev.prevent_default();
        if let Err(e) = self.run(dom, action) {
            tracing::error!(error = %e, %action, "page action failed");
        }
    }

    fn run(&self, dom: &Dom, action: Action) -> Result<(), DialogError> {
        match action {
            Action::EditFolders => {
                let result = ListEditorDialog::folders(self.folders()).show(dom)?;
                let (dom, status) = (dom.clone(), self.status);
                let folders = self.folders.clone();
                result.on_settled(move |outcome| {
                    if let DialogOutcome::Ok(list) = outcome {
                        set_text(&dom, status, &format!("Folders: {}", list.join(", ")));
                        *folders.borrow_mut() = list.clone();
                    }
                });
            }
            Action::EditExtensions => {
                let result = ListEditorDialog::extensions(self.extensions()).show(dom)?;
                let (dom, status) = (dom.clone(), self.status);
                let extensions = self.extensions.clone();
                result.on_settled(move |outcome| {
                    if let DialogOutcome::Ok(list) = outcome {
                        set_text(&dom, status, &format!("Extensions: {}", list.join(", ")));
                        *extensions.borrow_mut() = list.clone();
                    }
                });
            }
            Action::ShowAbout => {
                MessageBox::show(dom, &about_text())?;
            }
            Action::ConfirmReset => {
                let result = MessageBox::confirm(dom, "Clear the search text?")?;
                let (dom, status) = (dom.clone(), self.status);
                let combo = self.combo.clone();
                result.on_settled(move |outcome| {
                    if !outcome.is_cancelled() {
                        combo.borrow_mut().set_text(&dom, "");
                        set_text(&dom, status, "Search reset");
                    }
                });
            }
            _ => {}
        }
        Ok(())
    }
}
