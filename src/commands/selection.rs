use crate::store::documents::DocumentStore;
use crate::store::selection::{ContextView, SelectionController};
use serde::Serialize;
use std::sync::Arc;
use tauri::{AppHandle, Emitter, State};

#[derive(Clone, Serialize)]
struct ContextChangedEvent {
    context_key: String,
    collapse_sidebar: bool,
}

fn emit_context_changed(app: &AppHandle, selection: &SelectionController, collapse_sidebar: bool) {
    let _ = app.emit(
        "context-changed",
        ContextChangedEvent {
            context_key: selection.context_key(),
            collapse_sidebar,
        },
    );
}

#[tauri::command]
pub fn toggle_select(
    app: AppHandle,
    selection: State<'_, SelectionController>,
    id: String,
) -> ContextView {
    selection.toggle_select(&id);
    emit_context_changed(&app, &selection, false);
    selection.view()
}

#[tauri::command]
pub fn select_all(
    app: AppHandle,
    selection: State<'_, SelectionController>,
    docs: State<'_, Arc<DocumentStore>>,
    flag: bool,
) -> ContextView {
    selection.select_all(&docs.document_ids(), flag);
    emit_context_changed(&app, &selection, false);
    selection.view()
}

/// Focusing one document also tells the webview to collapse the sidebar on
/// narrow viewports.
#[tauri::command]
pub fn set_active(
    app: AppHandle,
    selection: State<'_, SelectionController>,
    id: String,
) -> ContextView {
    selection.set_active(&id);
    emit_context_changed(&app, &selection, true);
    selection.view()
}

#[tauri::command]
pub fn context_state(selection: State<'_, SelectionController>) -> ContextView {
    selection.view()
}
