use crate::api::{ApiClient, ApiError, Document, FileUpload};
use serde::Serialize;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Substring in a summary marking server-side summarization as unfinished.
pub const PROCESSING_MARKER: &str = "processing";

const POLL_INTERVAL: Duration = Duration::from_secs(3);
const FETCH_ERROR: &str = "Failed to fetch documents";

#[derive(Debug, Default)]
struct DocumentsState {
    documents: Vec<Document>,
    is_loading: bool,
    error: Option<String>,
}

/// Snapshot handed to the webview for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentsView {
    pub documents: Vec<Document>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Server-backed document list with a loading flag, a user-visible error
/// slot, and a background refresh while any document is still summarizing.
pub struct DocumentStore {
    api: Arc<ApiClient>,
    me: Weak<DocumentStore>,
    state: Mutex<DocumentsState>,
    poll: Mutex<Option<JoinHandle<()>>>,
}

impl DocumentStore {
    pub fn new(api: Arc<ApiClient>) -> Arc<Self> {
        Arc::new_cyclic(|me| Self {
            api,
            me: me.clone(),
            state: Mutex::new(DocumentsState::default()),
            poll: Mutex::new(None),
        })
    }

    pub fn view(&self) -> DocumentsView {
        let state = self.state.lock().unwrap();
        DocumentsView {
            documents: state.documents.clone(),
            is_loading: state.is_loading,
            error: state.error.clone(),
        }
    }

    pub fn document_ids(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .documents
            .iter()
            .map(|d| d.id.clone())
            .collect()
    }

    /// Replaces the local list with the server's. A silent fetch leaves the
    /// loading flag alone (polling and post-mutation refreshes must not make
    /// the UI flicker). On failure the previous list stays and the error slot
    /// is set; nothing propagates to the caller.
    pub async fn fetch(&self, silent: bool) {
        if !silent {
            self.state.lock().unwrap().is_loading = true;
        }
        match self.api.fetch_documents().await {
            Ok(docs) => {
                let mut state = self.state.lock().unwrap();
                state.documents = docs;
                state.error = None;
            }
            Err(e) => {
                log::warn!("document fetch failed: {}", e);
                self.state.lock().unwrap().error = Some(FETCH_ERROR.to_string());
            }
        }
        if !silent {
            self.state.lock().unwrap().is_loading = false;
        }
        self.sync_polling();
    }

    /// One independent request per file, all awaited together; a failure
    /// propagates without undoing files the server already accepted. Success
    /// is followed by a silent refresh.
    pub async fn upload(&self, files: Vec<FileUpload>) -> Result<(), ApiError> {
        self.api.upload_files(files).await?;
        self.fetch(true).await;
        Ok(())
    }

    /// Optimistically removes the document, issues the delete, then refetches
    /// silently regardless of the outcome. The refresh reconciles with server
    /// truth either way, so a failed delete resurfaces the document.
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.state.lock().unwrap().documents.retain(|d| d.id != id);
        let result = self.api.delete_document(id).await;
        self.fetch(true).await;
        result
    }

    /// Bulk variant of `delete`; returns the server's deleted count.
    pub async fn bulk_delete(&self, ids: &[String]) -> Result<u64, ApiError> {
        self.state
            .lock()
            .unwrap()
            .documents
            .retain(|d| !ids.contains(&d.id));
        let result = self.api.bulk_delete(ids).await;
        self.fetch(true).await;
        Ok(result?.deleted)
    }

    fn needs_polling(&self) -> bool {
        self.state
            .lock()
            .unwrap()
            .documents
            .iter()
            .any(is_processing)
    }

    pub fn is_polling(&self) -> bool {
        self.poll
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }

    // Runs after every fetch: starts the refresh task when a document is
    // still summarizing, aborts the pending timer the moment none is.
    fn sync_polling(&self) {
        let needs = self.needs_polling();
        let mut poll = self.poll.lock().unwrap();
        if !needs {
            if let Some(handle) = poll.take() {
                handle.abort();
            }
            return;
        }
        if poll.as_ref().is_some_and(|h| !h.is_finished()) {
            return;
        }
        let me = self.me.clone();
        *poll = Some(tokio::spawn(async move {
            loop {
                tokio::time::sleep(POLL_INTERVAL).await;
                // Weak: the timer must not keep a dropped store alive.
                let Some(store) = me.upgrade() else { break };
                if !store.needs_polling() {
                    break;
                }
                store.fetch(true).await;
            }
        }));
    }
}

impl Drop for DocumentStore {
    fn drop(&mut self) {
        if let Some(handle) = self.poll.lock().unwrap().take() {
            handle.abort();
        }
    }
}

fn is_processing(doc: &Document) -> bool {
    doc.summary.to_lowercase().contains(PROCESSING_MARKER)
}
