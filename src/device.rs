use crate::db::Database;
use rusqlite::Result;

const DEVICE_ID_KEY: &str = "device_id";

/// Returns the stable per-installation identifier, generating and persisting
/// one on first use. The id is never rotated.
pub fn get_or_create(db: &Database) -> Result<String> {
    if let Some(id) = db.get_setting(DEVICE_ID_KEY)? {
        return Ok(id);
    }
    let id = uuid::Uuid::new_v4().to_string();
    db.set_setting(DEVICE_ID_KEY, &id)?;
    Ok(id)
}
