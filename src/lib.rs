pub mod api;
pub mod commands;
pub mod db;
pub mod device;
pub mod store;

use api::ApiClient;
use db::Database;
use std::sync::Arc;
use store::chat::ConversationStore;
use store::documents::DocumentStore;
use store::selection::SelectionController;
use tauri::Manager;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tauri::Builder::default()
        .plugin(
            tauri_plugin_log::Builder::new()
                .target(tauri_plugin_log::Target::new(
                    tauri_plugin_log::TargetKind::LogDir {
                        file_name: Some("marty".into()),
                    },
                ))
                .build(),
        )
        .plugin(tauri_plugin_dialog::init())
        .setup(|app| {
            let app_dir = app.path().app_data_dir()?;
            let database = Database::new(&app_dir).expect("Failed to initialize database");
            let device_id = device::get_or_create(&database)?;
            let base_url = database
                .get_setting("api_base_url")
                .ok()
                .flatten()
                .unwrap_or_else(|| api::DEFAULT_BASE_URL.to_string());
            log::info!("backend {} as device {}", base_url, device_id);

            let api = Arc::new(ApiClient::new(base_url, device_id));
            let documents = DocumentStore::new(Arc::clone(&api));
            app.manage(Arc::clone(&documents));
            app.manage(ConversationStore::new(api));
            app.manage(SelectionController::new());

            // Initial load; a failure lands in the store's error slot.
            tauri::async_runtime::spawn(async move {
                documents.fetch(false).await;
            });
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::documents::list_documents,
            commands::documents::refresh_documents,
            commands::documents::upload_documents,
            commands::documents::delete_document,
            commands::documents::delete_selected,
            commands::selection::toggle_select,
            commands::selection::select_all,
            commands::selection::set_active,
            commands::selection::context_state,
            commands::chat::get_messages,
            commands::chat::send_message,
            commands::chat::is_processing,
            commands::chat::clear_history,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
