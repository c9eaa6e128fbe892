use crate::model::Session;
use crate::storage::{Storage, StorageError};
use tracing::{info, warn};

pub const SESSION_KEY: &str = "moviemind_user";

/// Last successful auth response, or `None` when logged out.
///
/// Content that does not parse as a session is treated as logged out.
pub fn load(storage: &Storage) -> Option<Session> {
    let raw = storage.get(SESSION_KEY)?;
    match serde_json::from_str::<Session>(raw) {
        Ok(session) => Some(session),
        Err(e) => {
            warn!(error = %e, "stored session is malformed, treating as logged out");
            None
        }
    }
}

/// Overwrite the stored session wholesale, or remove it with `None`.
pub fn save(storage: &mut Storage, user: Option<&Session>) -> Result<(), StorageError> {
    match user {
        Some(session) => {
            storage.set(SESSION_KEY, serde_json::to_string(session)?)?;
            info!(user_id = session.user_id, "session saved");
        }
        None => {
            storage.remove(SESSION_KEY)?;
            info!("session cleared");
        }
    }
    Ok(())
}
