use super::*;

/// A pressed key as handlers observe it: a named key value plus the
/// legacy numeric code older engines report instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    pub key: String,
    pub code: Option<i64>,
}

impl KeyInput {
    pub fn named(key: &str) -> Self {
        Self {
            key: key.to_string(),
            code: None,
        }
    }

    pub fn legacy_code(code: i64) -> Self {
        Self {
            key: String::new(),
            code: Some(code),
        }
    }

    /// Cross-engine Escape recognition: the standard name, the IE/Edge
    /// legacy name, or keyCode 27.
    pub fn is_escape(&self) -> bool {
        self.key == "Escape" || self.key == "Esc" || self.code == Some(27)
    }
}

/// What a bound listener does when its event fires. References are
/// resolved once at bind time, never re-resolved per event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Handler {
    OpenModal { modal: NodeId },
    CloseModal { modal: NodeId },
    CloseAllModalsOnEscape,
    MirrorUploadName { input: NodeId, label: NodeId },
}

#[derive(Debug, Default, Clone)]
pub(crate) struct ListenerStore {
    map: HashMap<NodeId, HashMap<String, Vec<Handler>>>,
}

impl ListenerStore {
    pub(crate) fn add(&mut self, node_id: NodeId, event: &str, handler: Handler) {
        self.map
            .entry(node_id)
            .or_default()
            .entry(event.to_string())
            .or_default()
            .push(handler);
    }

    /// Drops every listener on `node_id` for `event` that the predicate
    /// accepts. Used for slot-style rebinding (one mirror per input).
    pub(crate) fn remove_matching<F>(&mut self, node_id: NodeId, event: &str, pred: F)
    where
        F: Fn(&Handler) -> bool,
    {
        let Some(events) = self.map.get_mut(&node_id) else {
            return;
        };
        let Some(handlers) = events.get_mut(event) else {
            return;
        };
        handlers.retain(|handler| !pred(handler));
        if handlers.is_empty() {
            events.remove(event);
        }
        if events.is_empty() {
            self.map.remove(&node_id);
        }
    }

    pub(crate) fn get(&self, node_id: NodeId, event: &str) -> Vec<Handler> {
        self.map
            .get(&node_id)
            .and_then(|events| events.get(event))
            .cloned()
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub(crate) struct EventState {
    pub(crate) event_type: String,
    pub(crate) target: NodeId,
    pub(crate) key: Option<KeyInput>,
}

impl EventState {
    pub(crate) fn new(event_type: &str, target: NodeId) -> Self {
        Self {
            event_type: event_type.to_string(),
            target,
            key: None,
        }
    }

    pub(crate) fn with_key(event_type: &str, target: NodeId, key: KeyInput) -> Self {
        Self {
            event_type: event_type.to_string(),
            target,
            key: Some(key),
        }
    }
}
