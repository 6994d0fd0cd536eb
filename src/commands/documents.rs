use crate::api::{ApiError, FileUpload};
use crate::store::documents::{DocumentStore, DocumentsView};
use crate::store::selection::SelectionController;
use std::path::Path;
use std::sync::Arc;
use tauri::State;

#[tauri::command]
pub fn list_documents(docs: State<'_, Arc<DocumentStore>>) -> DocumentsView {
    docs.view()
}

#[tauri::command]
pub async fn refresh_documents(
    docs: State<'_, Arc<DocumentStore>>,
    silent: Option<bool>,
) -> Result<DocumentsView, ApiError> {
    docs.fetch(silent.unwrap_or(false)).await;
    Ok(docs.view())
}

/// Uploads the picked files, one request each, then returns the silently
/// refreshed list.
#[tauri::command]
pub async fn upload_documents(
    docs: State<'_, Arc<DocumentStore>>,
    paths: Vec<String>,
) -> Result<DocumentsView, ApiError> {
    let mut files = Vec::with_capacity(paths.len());
    for path in &paths {
        let path = Path::new(path);
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();
        let bytes = std::fs::read(path)?;
        files.push(FileUpload { filename, bytes });
    }
    docs.upload(files).await?;
    Ok(docs.view())
}

/// The deleted document is forgotten as context before the request goes out,
/// so it never lingers as the active conversation target.
#[tauri::command]
pub async fn delete_document(
    docs: State<'_, Arc<DocumentStore>>,
    selection: State<'_, SelectionController>,
    id: String,
) -> Result<DocumentsView, ApiError> {
    selection.forget_document(&id);
    docs.delete(&id).await?;
    Ok(docs.view())
}

/// Bulk-deletes the current selection; the selection set is cleared once the
/// server has answered.
#[tauri::command]
pub async fn delete_selected(
    docs: State<'_, Arc<DocumentStore>>,
    selection: State<'_, SelectionController>,
) -> Result<u64, ApiError> {
    let ids = selection.selected_ids();
    if ids.is_empty() {
        return Ok(0);
    }
    let deleted = docs.bulk_delete(&ids).await?;
    selection.clear_selection();
    Ok(deleted)
}
