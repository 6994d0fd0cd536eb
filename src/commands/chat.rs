use crate::api::ApiError;
use crate::store::chat::{ConversationStore, Message};
use crate::store::selection::SelectionController;
use tauri::State;

#[tauri::command]
pub fn get_messages(chat: State<'_, ConversationStore>, context_key: String) -> Vec<Message> {
    chat.get_messages(&context_key)
}

#[tauri::command]
pub fn is_processing(chat: State<'_, ConversationStore>) -> bool {
    chat.is_processing()
}

/// Routes `question` to the thread for the current selection state and
/// returns the updated transcript. Errors surface inside the transcript as
/// assistant bubbles, never as a command failure.
#[tauri::command]
pub async fn send_message(
    chat: State<'_, ConversationStore>,
    selection: State<'_, SelectionController>,
    question: String,
) -> Result<Vec<Message>, ApiError> {
    let context_key = selection.context_key();
    let (active_doc_id, doc_ids) = selection.document_filter();
    chat.send_message(&question, &context_key, active_doc_id, doc_ids)
        .await;
    Ok(chat.get_messages(&context_key))
}

#[tauri::command]
pub fn clear_history(chat: State<'_, ConversationStore>, context_key: String) {
    chat.clear_history(&context_key);
}
