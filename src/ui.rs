use super::*;

/// Selector and marker-class vocabulary for one page, plus the
/// cache-restore rebinding policy. The defaults match the Bulma-style
/// markup contract this controller grew up on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiConfig {
    /// File picker whose selection is mirrored into the label.
    pub upload_input_selector: String,
    /// Label that receives the selected file name.
    pub file_name_selector: String,
    /// Class naming the elements that open a modal on click.
    pub trigger_class: String,
    /// Attribute on a trigger naming the id of the modal it opens.
    pub target_attr: String,
    /// Elements that close their nearest enclosing modal on click.
    pub dismisser_selector: String,
    /// Class naming modal overlay elements.
    pub modal_class: String,
    /// Marker class for an open modal.
    pub active_class: String,
    /// Marker class for a busy button.
    pub loading_class: String,
    /// Marker class for a hidden element.
    pub hidden_class: String,
    /// Re-resolve and rebind the upload mirror on `page_show`, for
    /// pages restored from the back-forward cache.
    pub rebind_on_pageshow: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            upload_input_selector: "#file-upload input[type=file]".to_string(),
            file_name_selector: "#file-upload .file-name".to_string(),
            trigger_class: "open-info-modal".to_string(),
            target_attr: "data-target".to_string(),
            dismisser_selector:
                ".modal-background, .modal-close, .modal-card-head .delete, .modal-card-foot .button"
                    .to_string(),
            modal_class: "modal".to_string(),
            active_class: "is-active".to_string(),
            loading_class: "is-loading".to_string(),
            hidden_class: "hidden".to_string(),
            rebind_on_pageshow: false,
        }
    }
}

/// Element references the controller resolved at bind time. The upload
/// pair is optional (pages without an upload form are fine); the modal
/// set is captured exactly once.
#[derive(Debug, Clone)]
pub(crate) struct UiState {
    pub(crate) config: UiConfig,
    pub(crate) upload_input: Option<NodeId>,
    pub(crate) file_name_label: Option<NodeId>,
    pub(crate) modals: Vec<NodeId>,
}

impl Page {
    /// Binds the controller to the current markup: modal triggers,
    /// dismissers, the document-level Escape listener, and the upload
    /// name mirror. This is the DOM-ready moment; calling it again
    /// rebinds everything from scratch.
    ///
    /// A trigger whose target attribute is missing or names no element
    /// fails with [`Error::UnknownModalTarget`]; a dismisser outside
    /// any modal fails with [`Error::DismisserOutsideModal`].
    pub fn install_ui(&mut self, config: UiConfig) -> Result<()> {
        self.listeners = ListenerStore::default();
        self.ui = None;

        let modal_selector = class_selector(&config.modal_class);
        let modals = self.dom.query_selector_all(&modal_selector)?;

        for trigger in self
            .dom
            .query_selector_all(&class_selector(&config.trigger_class))?
        {
            let target = self
                .dom
                .attr(trigger, &config.target_attr)
                .map(ToOwned::to_owned)
                .unwrap_or_default();
            let Some(modal) = self.dom.by_id(&target).filter(|_| !target.is_empty()) else {
                return Err(Error::UnknownModalTarget {
                    trigger: self.dom.describe(trigger),
                    target,
                });
            };
            self.listeners
                .add(trigger, "click", Handler::OpenModal { modal });
        }

        for dismisser in self.dom.query_selector_all(&config.dismisser_selector)? {
            let Some(modal) = self.dom.closest(dismisser, &modal_selector)? else {
                return Err(Error::DismisserOutsideModal(self.dom.describe(dismisser)));
            };
            self.listeners
                .add(dismisser, "click", Handler::CloseModal { modal });
        }

        self.listeners
            .add(self.dom.root, "keydown", Handler::CloseAllModalsOnEscape);

        let mut ui = UiState {
            config,
            upload_input: None,
            file_name_label: None,
            modals,
        };
        self.resolve_upload_pair(&mut ui)?;
        self.ui = Some(ui);
        self.bind_upload_mirror()
    }

    /// The cache-restore moment. With `rebind_on_pageshow` set, the
    /// upload pair is re-resolved and the mirror rebound; otherwise
    /// nothing happens. Rebinding replaces the previous mirror, so
    /// calling this any number of times never stacks listeners.
    pub fn page_show(&mut self) -> Result<()> {
        let Some(mut ui) = self.ui.take() else {
            return Ok(());
        };
        if !ui.config.rebind_on_pageshow {
            self.ui = Some(ui);
            return Ok(());
        }
        self.resolve_upload_pair(&mut ui)?;
        self.ui = Some(ui);
        self.bind_upload_mirror()
    }

    fn resolve_upload_pair(&self, ui: &mut UiState) -> Result<()> {
        ui.upload_input = self.dom.query_selector(&ui.config.upload_input_selector)?;
        ui.file_name_label = self.dom.query_selector(&ui.config.file_name_selector)?;
        Ok(())
    }

    // Absence of either element is tolerated silently; the mirror is
    // simply not bound.
    fn bind_upload_mirror(&mut self) -> Result<()> {
        let Some(ui) = &self.ui else {
            return Ok(());
        };
        let (Some(input), Some(label)) = (ui.upload_input, ui.file_name_label) else {
            return Ok(());
        };

        self.listeners.remove_matching(input, "change", |handler| {
            matches!(handler, Handler::MirrorUploadName { .. })
        });
        self.listeners
            .add(input, "change", Handler::MirrorUploadName { input, label });
        Ok(())
    }

    pub(crate) fn execute_handler(&mut self, handler: &Handler, event: &EventState) -> Result<()> {
        match handler {
            Handler::OpenModal { modal } => {
                let class = self.active_class();
                self.dom.class_add(*modal, &class)
            }
            Handler::CloseModal { modal } => {
                let class = self.active_class();
                self.dom.class_remove(*modal, &class)
            }
            Handler::CloseAllModalsOnEscape => {
                let Some(key) = &event.key else {
                    return Ok(());
                };
                if !key.is_escape() {
                    return Ok(());
                }
                self.close_all_modals()
            }
            Handler::MirrorUploadName { input, label } => {
                let Some(name) = self
                    .dom
                    .element(*input)
                    .and_then(|element| element.files.first().cloned())
                else {
                    return Ok(());
                };
                self.dom.set_text_content(*label, &name)
            }
        }
    }

    /// Adds the active marker class to the modal with the given element
    /// id. Opening an already open modal is a no-op.
    pub fn open_modal(&mut self, id: &str) -> Result<()> {
        let node = self.modal_by_id(id)?;
        let class = self.active_class();
        self.dom.class_add(node, &class)
    }

    /// Removes the active marker class from the modal with the given
    /// element id. Closing an already closed modal is a no-op.
    pub fn close_modal(&mut self, id: &str) -> Result<()> {
        let node = self.modal_by_id(id)?;
        let class = self.active_class();
        self.dom.class_remove(node, &class)
    }

    /// Closes every modal regardless of current state: the bound set
    /// when the controller is installed, every element carrying the
    /// modal class otherwise. Idempotent.
    pub fn close_all_modals(&mut self) -> Result<()> {
        let modals = match &self.ui {
            Some(ui) => ui.modals.clone(),
            None => {
                let selector = class_selector(&self.ui_config().modal_class);
                self.dom.query_selector_all(&selector)?
            }
        };
        let class = self.active_class();
        for modal in modals {
            self.dom.class_remove(modal, &class)?;
        }
        Ok(())
    }

    /// Marks the button with the given element id busy.
    pub fn turn_button_to_loading_icon(&mut self, id: &str) -> Result<()> {
        let node = self.element_by_id(id)?;
        let class = self.ui_config().loading_class;
        self.dom.class_add(node, &class)
    }

    /// Sets the `disabled` attribute on each of the given element ids.
    pub fn disable_buttons(&mut self, ids: &[&str]) -> Result<()> {
        for id in ids {
            let node = self.element_by_id(id)?;
            self.dom.set_attr(node, "disabled", "")?;
        }
        Ok(())
    }

    /// Removes the hidden marker class from the element with that id.
    pub fn show_element(&mut self, id: &str) -> Result<()> {
        let node = self.element_by_id(id)?;
        let class = self.ui_config().hidden_class;
        self.dom.class_remove(node, &class)
    }

    /// Adds the hidden marker class to the element with that id.
    pub fn hide_element(&mut self, id: &str) -> Result<()> {
        let node = self.element_by_id(id)?;
        let class = self.ui_config().hidden_class;
        self.dom.class_add(node, &class)
    }

    pub(crate) fn ui_config(&self) -> UiConfig {
        self.ui
            .as_ref()
            .map(|ui| ui.config.clone())
            .unwrap_or_default()
    }

    fn active_class(&self) -> String {
        self.ui_config().active_class
    }

    fn element_by_id(&self, id: &str) -> Result<NodeId> {
        self.dom
            .by_id(id)
            .ok_or_else(|| Error::ElementNotFound(id.to_string()))
    }

    fn modal_by_id(&self, id: &str) -> Result<NodeId> {
        let node = self.element_by_id(id)?;
        if !self.dom.class_contains(node, &self.ui_config().modal_class) {
            return Err(Error::NotAModal(id.to_string()));
        }
        Ok(node)
    }
}

fn class_selector(class_name: &str) -> String {
    format!(".{class_name}")
}
