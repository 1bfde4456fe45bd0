//! sled-backed persistence for announcement bars.
//!
//! Bars are stored as JSON values under `bar:{userId}:{barId}` keys, so one
//! prefix scan lists everything a user owns. This is the minimal collaborator
//! the config provider needs; there is deliberately no schema beyond the
//! serialized [`AnnouncementBar`].

use rand::Rng;
use sled::Db;

use crate::models::AnnouncementBar;

const KEY_PREFIX: &str = "bar";

fn bar_key(user_id: &str, bar_id: &str) -> String {
    format!("{}:{}:{}", KEY_PREFIX, user_id, bar_id)
}

fn user_prefix(user_id: &str) -> String {
    format!("{}:{}:", KEY_PREFIX, user_id)
}

/// Generate an opaque bar id. Alphanumeric so it is safe to embed in element
/// ids, query strings and sled keys without escaping.
pub fn generate_bar_id() -> String {
    rand::thread_rng()
        .sample_iter(&rand::distributions::Alphanumeric)
        .take(12)
        .map(char::from)
        .collect()
}

/// Insert or replace a bar record.
pub fn put_bar(db: &Db, bar: &AnnouncementBar) -> Result<(), String> {
    let value =
        serde_json::to_vec(bar).map_err(|e| format!("Cannot serialize bar: {}", e))?;
    db.insert(bar_key(&bar.user_id, &bar.id), value)
        .map_err(|e| format!("Storage write failed: {}", e))?;
    Ok(())
}

/// Look up one bar by owner and id.
pub fn get_bar(db: &Db, user_id: &str, bar_id: &str) -> Result<Option<AnnouncementBar>, String> {
    let raw = db
        .get(bar_key(user_id, bar_id))
        .map_err(|e| format!("Storage read failed: {}", e))?;
    match raw {
        Some(bytes) => serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| format!("Corrupt bar record: {}", e)),
        None => Ok(None),
    }
}

/// All bars owned by a user, newest first.
pub fn list_bars(db: &Db, user_id: &str) -> Result<Vec<AnnouncementBar>, String> {
    let mut bars = Vec::new();
    for entry in db.scan_prefix(user_prefix(user_id)) {
        let (_, bytes) = entry.map_err(|e| format!("Storage scan failed: {}", e))?;
        let bar: AnnouncementBar = serde_json::from_slice(&bytes)
            .map_err(|e| format!("Corrupt bar record: {}", e))?;
        bars.push(bar);
    }
    bars.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(bars)
}

/// Remove a bar. Returns whether anything was deleted.
pub fn delete_bar(db: &Db, user_id: &str, bar_id: &str) -> Result<bool, String> {
    db.remove(bar_key(user_id, bar_id))
        .map(|old| old.is_some())
        .map_err(|e| format!("Storage delete failed: {}", e))
}

// ============================================================================
// Tests
// ============================================================================
