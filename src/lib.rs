//! Declarative element construction and stateful widgets (type-ahead combo
//! box, two-pane splitter, modal dialogs) over an in-memory document, with a
//! terminal host that paints the document and feeds it input.

pub mod builder;
pub mod component_context;
pub mod components;
pub mod constants;
pub mod demo;
pub mod dialogs;
pub mod dom;
pub mod drag;
pub mod drivers;
pub mod error;
pub mod event_loop;
pub mod host;
pub mod keybindings;
pub mod painter;
pub mod theme;
pub mod tracing_sub;
pub mod ui;

pub use builder::{Element, build, el};
pub use dom::Dom;
