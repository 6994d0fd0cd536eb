use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Mutex;

/// Conversation scope with no document filter.
pub const GLOBAL_CONTEXT: &str = "global";

#[derive(Debug, Default)]
struct SelectionState {
    active_doc: Option<String>,
    selected: BTreeSet<String>,
}

/// Snapshot handed to the webview for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct ContextView {
    pub context_key: String,
    pub active_doc_id: Option<String>,
    pub selected_ids: Vec<String>,
}

/// Reconciles the single active document and the checkbox selection set into
/// one context key. At most one of the two is ever non-empty.
#[derive(Debug, Default)]
pub struct SelectionController {
    state: Mutex<SelectionState>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips membership of `id` in the selection set. Starting a multi-select
    /// drops any active document.
    pub fn toggle_select(&self, id: &str) {
        let mut state = self.state.lock().unwrap();
        if !state.selected.remove(id) {
            state.selected.insert(id.to_string());
        }
        state.active_doc = None;
    }

    pub fn select_all(&self, ids: &[String], flag: bool) {
        let mut state = self.state.lock().unwrap();
        if flag {
            state.selected = ids.iter().cloned().collect();
            state.active_doc = None;
        } else {
            state.selected.clear();
        }
    }

    /// Focuses a single document, dropping any multi-select.
    pub fn set_active(&self, id: &str) {
        let mut state = self.state.lock().unwrap();
        state.active_doc = Some(id.to_string());
        state.selected.clear();
    }

    /// Drops `id` from whichever slot holds it. Called after a delete so a
    /// removed document cannot linger as context.
    pub fn forget_document(&self, id: &str) {
        let mut state = self.state.lock().unwrap();
        if state.active_doc.as_deref() == Some(id) {
            state.active_doc = None;
        }
        state.selected.remove(id);
    }

    pub fn clear_selection(&self) {
        self.state.lock().unwrap().selected.clear();
    }

    pub fn selected_ids(&self) -> Vec<String> {
        self.state.lock().unwrap().selected.iter().cloned().collect()
    }

    /// Derives the context key from the current state. A non-empty selection
    /// wins over the active document; the `BTreeSet` keeps the ids sorted, so
    /// the same set always produces the same key.
    pub fn context_key(&self) -> String {
        let state = self.state.lock().unwrap();
        if !state.selected.is_empty() {
            let ids: Vec<&str> = state.selected.iter().map(String::as_str).collect();
            return format!("selected_{}", ids.join("_"));
        }
        match &state.active_doc {
            Some(id) => id.clone(),
            None => GLOBAL_CONTEXT.to_string(),
        }
    }

    /// `(active_doc_id, doc_ids)` for routing a question: a non-empty
    /// selection takes precedence, else the active document, else neither.
    pub fn document_filter(&self) -> (Option<String>, Option<Vec<String>>) {
        let state = self.state.lock().unwrap();
        if !state.selected.is_empty() {
            return (None, Some(state.selected.iter().cloned().collect()));
        }
        (state.active_doc.clone(), None)
    }

    pub fn view(&self) -> ContextView {
        ContextView {
            context_key: self.context_key(),
            active_doc_id: self.state.lock().unwrap().active_doc.clone(),
            selected_ids: self.selected_ids(),
        }
    }
}
