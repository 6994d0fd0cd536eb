use crate::api::ApiClient;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Per-context message histories, keyed by context key. Histories are
/// session-only; nothing here touches disk.
pub struct ConversationStore {
    api: Arc<ApiClient>,
    conversations: Mutex<HashMap<String, Vec<Message>>>,
    processing: AtomicBool,
}

impl ConversationStore {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            conversations: Mutex::new(HashMap::new()),
            processing: AtomicBool::new(false),
        }
    }

    /// Ordered history for `context_key`; empty for keys never written to.
    pub fn get_messages(&self, context_key: &str) -> Vec<Message> {
        self.conversations
            .lock()
            .unwrap()
            .get(context_key)
            .cloned()
            .unwrap_or_default()
    }

    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::SeqCst)
    }

    /// Appends the user message immediately, asks the backend, then appends
    /// the answer, or an `Error: ...` bubble on failure. The transcript is
    /// the only error channel; this never returns an error.
    ///
    /// A non-empty `doc_ids` wins over `active_doc_id`; with neither set the
    /// question runs against all documents.
    pub async fn send_message(
        &self,
        question: &str,
        context_key: &str,
        active_doc_id: Option<String>,
        doc_ids: Option<Vec<String>>,
    ) {
        let question = question.trim();
        if question.is_empty() {
            return;
        }

        self.append(context_key, Message::user(question));
        self.processing.store(true, Ordering::SeqCst);

        let filter = match doc_ids {
            Some(ids) if !ids.is_empty() => Some(ids),
            _ => active_doc_id.map(|id| vec![id]),
        };

        let reply = match self.api.ask(question, filter).await {
            Ok(resp) => Message::assistant(resp.answer),
            Err(e) => {
                log::warn!("ask failed for context {}: {}", context_key, e);
                Message::assistant(format!("Error: {}", e))
            }
        };
        self.append(context_key, reply);

        self.processing.store(false, Ordering::SeqCst);
    }

    /// Removes the history for `context_key` entirely; the key is absent
    /// afterwards. Unused by the current UI but part of the store contract.
    pub fn clear_history(&self, context_key: &str) {
        self.conversations.lock().unwrap().remove(context_key);
    }

    // Locks the map fresh for every append so concurrent sends to the same
    // key always build on the latest history, not a pre-await snapshot.
    fn append(&self, context_key: &str, message: Message) {
        self.conversations
            .lock()
            .unwrap()
            .entry(context_key.to_string())
            .or_default()
            .push(message);
    }
}
