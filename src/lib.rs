//! Deterministic modal and file-upload UI runtime for Rust tests.
//!
//! A [`Page`] is built from markup, a [`UiConfig`] describes the page's
//! selector and marker-class vocabulary, and [`Page::install_ui`] binds
//! the controller: modal triggers, modal dismissers, the document-level
//! Escape listener, and the upload file-name mirror. User actions
//! (`click`, `press_key`, `select_files`) dispatch synchronously and
//! run to completion: no browser, no script engine, no waiting.
//!
//! ```
//! use modal_harness::{Page, UiConfig};
//!
//! # fn main() -> modal_harness::Result<()> {
//! let mut page = Page::from_html(
//!     r#"
//!     <button class='open-info-modal' data-target='help'>?</button>
//!     <div id='help' class='modal'>
//!       <div class='modal-background'></div>
//!       <button class='modal-close'></button>
//!     </div>
//!     "#,
//! )?;
//! page.install_ui(UiConfig::default())?;
//!
//! page.click(".open-info-modal")?;
//! page.assert_has_class("#help", "is-active")?;
//!
//! page.press_key("Escape")?;
//! page.assert_not_class("#help", "is-active")?;
//! # Ok(())
//! # }
//! ```

use std::collections::{HashMap, HashSet};
use std::error::Error as StdError;
use std::fmt;

mod dom;
mod events;
mod html;
mod selector;
mod ui;

use dom::*;
use events::*;
use html::*;

pub use events::KeyInput;
pub use ui::UiConfig;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    HtmlParse(String),
    Runtime(String),
    SelectorNotFound(String),
    UnsupportedSelector(String),
    ElementNotFound(String),
    NotAModal(String),
    UnknownModalTarget {
        trigger: String,
        target: String,
    },
    DismisserOutsideModal(String),
    TypeMismatch {
        selector: String,
        expected: String,
        actual: String,
    },
    AssertionFailed {
        selector: String,
        expected: String,
        actual: String,
        dom_snippet: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HtmlParse(msg) => write!(f, "html parse error: {msg}"),
            Self::Runtime(msg) => write!(f, "ui runtime error: {msg}"),
            Self::SelectorNotFound(selector) => write!(f, "selector not found: {selector}"),
            Self::UnsupportedSelector(selector) => write!(f, "unsupported selector: {selector}"),
            Self::ElementNotFound(id) => write!(f, "element not found: #{id}"),
            Self::NotAModal(id) => write!(f, "element #{id} is not a modal"),
            Self::UnknownModalTarget { trigger, target } => {
                write!(f, "trigger {trigger} names unknown modal target '{target}'")
            }
            Self::DismisserOutsideModal(dismisser) => {
                write!(f, "dismisser {dismisser} has no enclosing modal")
            }
            Self::TypeMismatch {
                selector,
                expected,
                actual,
            } => write!(
                f,
                "type mismatch for {selector}: expected {expected}, actual {actual}"
            ),
            Self::AssertionFailed {
                selector,
                expected,
                actual,
                dom_snippet,
            } => write!(
                f,
                "assertion failed for {selector}: expected {expected}, actual {actual}, snippet {dom_snippet}"
            ),
        }
    }
}

impl StdError for Error {}

/// An in-memory page: the parsed markup plus whatever listeners the
/// controller has bound. All state lives here; two pages never share
/// anything.
#[derive(Debug)]
pub struct Page {
    dom: Dom,
    listeners: ListenerStore,
    ui: Option<ui::UiState>,
}

impl Page {
    pub fn from_html(html: &str) -> Result<Self> {
        let dom = parse_html(html)?;
        Ok(Self {
            dom,
            listeners: ListenerStore::default(),
            ui: None,
        })
    }

    /// Clicks the first element matching the selector. Clicks on
    /// disabled elements go nowhere, like in a real page.
    pub fn click(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.dom.disabled(target) {
            return Ok(());
        }
        self.dispatch_event(EventState::new("click", target))
    }

    /// Presses a named key ("Escape", "Enter", ...) at the document
    /// level.
    pub fn press_key(&mut self, key: &str) -> Result<()> {
        self.press(KeyInput::named(key))
    }

    /// Presses a key identified only by its legacy numeric code, the
    /// way older engines report it.
    pub fn press_key_code(&mut self, code: i64) -> Result<()> {
        self.press(KeyInput::legacy_code(code))
    }

    pub fn press(&mut self, key: KeyInput) -> Result<()> {
        let root = self.dom.root;
        self.dispatch_event(EventState::with_key("keydown", root, key))
    }

    /// Replaces the file selection of a file input and dispatches
    /// `change`, like picking files in the native dialog. An empty
    /// `names` models the user canceling the dialog.
    pub fn select_files(&mut self, selector: &str, names: &[&str]) -> Result<()> {
        let target = self.select_one(selector)?;
        let is_file_input = self
            .dom
            .tag_name(target)
            .map(|tag| tag.eq_ignore_ascii_case("input"))
            .unwrap_or(false)
            && self
                .dom
                .attr(target, "type")
                .map(|value| value.eq_ignore_ascii_case("file"))
                .unwrap_or(false);
        if !is_file_input {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "input[type=file]".to_string(),
                actual: self.dom.describe(target),
            });
        }

        self.dom.set_files(target, names)?;
        self.dispatch_event(EventState::new("change", target))
    }

    /// Dispatches an arbitrary event to the first element matching the
    /// selector.
    pub fn dispatch(&mut self, selector: &str, event: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.dispatch_event(EventState::new(event, target))
    }

    pub fn text(&self, selector: &str) -> Result<String> {
        let node = self.select_one(selector)?;
        Ok(self.dom.text_content(node))
    }

    pub fn has_class(&self, selector: &str, class_name: &str) -> Result<bool> {
        let node = self.select_one(selector)?;
        Ok(self.dom.class_contains(node, class_name))
    }

    pub fn is_disabled(&self, selector: &str) -> Result<bool> {
        let node = self.select_one(selector)?;
        Ok(self.dom.disabled(node))
    }

    /// Whether the modal with the given element id carries the active
    /// marker class.
    pub fn modal_is_active(&self, id: &str) -> Result<bool> {
        let node = self
            .dom
            .by_id(id)
            .ok_or_else(|| Error::ElementNotFound(id.to_string()))?;
        Ok(self
            .dom
            .class_contains(node, &self.ui_config().active_class))
    }

    pub fn assert_text(&self, selector: &str, expected: &str) -> Result<()> {
        let node = self.select_one(selector)?;
        let actual = self.dom.text_content(node);
        if actual != expected {
            return Err(self.assertion_failed(selector, node, expected, &actual));
        }
        Ok(())
    }

    pub fn assert_has_class(&self, selector: &str, class_name: &str) -> Result<()> {
        let node = self.select_one(selector)?;
        if !self.dom.class_contains(node, class_name) {
            let actual = self.dom.attr(node, "class").unwrap_or("").to_string();
            return Err(self.assertion_failed(
                selector,
                node,
                &format!("class '{class_name}'"),
                &actual,
            ));
        }
        Ok(())
    }

    pub fn assert_not_class(&self, selector: &str, class_name: &str) -> Result<()> {
        let node = self.select_one(selector)?;
        if self.dom.class_contains(node, class_name) {
            let actual = self.dom.attr(node, "class").unwrap_or("").to_string();
            return Err(self.assertion_failed(
                selector,
                node,
                &format!("no class '{class_name}'"),
                &actual,
            ));
        }
        Ok(())
    }

    pub fn assert_exists(&self, selector: &str) -> Result<()> {
        self.select_one(selector)?;
        Ok(())
    }

    /// Serializes the first element matching the selector back to
    /// markup, for debugging.
    pub fn dump_dom(&self, selector: &str) -> Result<String> {
        let node = self.select_one(selector)?;
        Ok(self.dom.dump_node(node))
    }

    fn select_one(&self, selector: &str) -> Result<NodeId> {
        self.dom
            .query_selector(selector)?
            .ok_or_else(|| Error::SelectorNotFound(selector.to_string()))
    }

    fn assertion_failed(
        &self,
        selector: &str,
        node: NodeId,
        expected: &str,
        actual: &str,
    ) -> Error {
        Error::AssertionFailed {
            selector: selector.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
            dom_snippet: truncate_chars(&self.dom.dump_node(node), 120),
        }
    }

    /// Synchronous dispatch: target phase, then bubble along the parent
    /// chain. Every handler runs to completion before the next starts.
    fn dispatch_event(&mut self, event: EventState) -> Result<()> {
        let mut path = vec![event.target];
        let mut cursor = self.dom.parent(event.target);
        while let Some(node) = cursor {
            path.push(node);
            cursor = self.dom.parent(node);
        }

        for node in path {
            for handler in self.listeners.get(node, &event.event_type) {
                self.execute_handler(&handler, &event)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
