use rusqlite::{Connection, OptionalExtension};
use std::path::PathBuf;
use thiserror::Error;

use crate::state::{self, AppState, Day};

/// Fixed key the whole application snapshot lives under.
const SNAPSHOT_KEY: &str = "domify_app_state";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),
    #[error("Failed to serialize snapshot: {0}")]
    SerializeError(#[from] serde_json::Error),
    #[error("Failed to create data directory: {0}")]
    DirectoryError(String),
}

/// Key-value snapshot store. The entire [`AppState`] is serialized as one
/// JSON blob under [`SNAPSHOT_KEY`]; there is no per-entity schema.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (or create) the store at the given path and initialize the
    /// snapshot table.
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let db_path = PathBuf::from(path);

        if let Some(parent) = db_path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StoreError::DirectoryError(e.to_string()))?;
            }
        }

        let conn = Connection::open(&db_path)?;
        let store = Store { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// In-memory store for tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Store { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&self) -> Result<(), StoreError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS snapshots (
                key             TEXT PRIMARY KEY,
                value           TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// Write the current state as the snapshot, replacing any prior value.
    /// Storage failures propagate to the caller; they are never swallowed.
    pub fn save(&self, state: &AppState) -> Result<(), StoreError> {
        let value = serde_json::to_string(state)?;
        self.conn.execute(
            "INSERT INTO snapshots (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            rusqlite::params![SNAPSHOT_KEY, value],
        )?;
        Ok(())
    }

    /// Read the persisted snapshot. Returns `None` when no snapshot exists
    /// or when the stored text does not parse; a corrupt snapshot behaves
    /// exactly like a missing one.
    pub fn load(&self) -> Result<Option<AppState>, StoreError> {
        let value: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM snapshots WHERE key = ?1",
                rusqlite::params![SNAPSHOT_KEY],
                |row| row.get(0),
            )
            .optional()?;
        let Some(value) = value else {
            return Ok(None);
        };
        match serde_json::from_str(&value) {
            Ok(state) => Ok(Some(state)),
            Err(_) => Ok(None),
        }
    }

    /// Load the snapshot (or the built-in defaults when absent) and run the
    /// migration pass so the result always matches the current schema.
    pub fn load_or_default(&self, today: Day) -> Result<AppState, StoreError> {
        let mut state = self.load()?.unwrap_or_default();
        state::migrate(&mut state, today);
        Ok(state)
    }

    #[cfg(test)]
    fn save_raw(&self, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO snapshots (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            rusqlite::params![SNAPSHOT_KEY, value],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Page;

    #[test]
    fn load_without_snapshot_returns_none() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn save_then_load_round_trips() {
        let store = Store::open_in_memory().unwrap();
        let mut state = AppState::default();
        state.add_grocery("Milk");
        state.current_page = Page::Grocery;
        store.save(&state).unwrap();
        let loaded = store.load().unwrap().expect("snapshot present");
        assert_eq!(loaded.grocery_list.len(), 1);
        assert_eq!(loaded.grocery_list[0].name, "Milk");
        assert_eq!(loaded.current_page, Page::Grocery);
    }

    #[test]
    fn save_overwrites_prior_snapshot() {
        let store = Store::open_in_memory().unwrap();
        let mut state = AppState::default();
        state.add_todo("first");
        store.save(&state).unwrap();
        state.add_todo("second");
        store.save(&state).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.todos.len(), 2);
    }

    #[test]
    fn malformed_snapshot_is_treated_as_absent() {
        let store = Store::open_in_memory().unwrap();
        store.save_raw("{not json at all").unwrap();
        assert!(store.load().unwrap().is_none());
        let state = store.load_or_default(Day::Monday).unwrap();
        assert_eq!(state.current_page, Page::Home);
    }

    #[test]
    fn load_or_default_migrates_partial_snapshot() {
        let store = Store::open_in_memory().unwrap();
        // Old snapshot: missing tag list, item without a tag, stale page.
        store
            .save_raw(
                r#"{"current_page":"attic",
                    "pantry":[{"id":1,"name":"Beans"}],
                    "meal_plan":{"selected_day":"friday",
                                 "monday":{"breakfast":"Oats"}}}"#,
            )
            .unwrap();
        let state = store.load_or_default(Day::Tuesday).unwrap();
        assert_eq!(state.current_page, Page::Home);
        assert_eq!(state.pantry[0].tag, "Uncategorized");
        assert_eq!(state.pantry_tags, crate::state::default_pantry_tags());
        assert_eq!(state.meal_plan.selected_day, Day::Tuesday);
        assert_eq!(state.meal_plan.monday.breakfast, "Oats");
        assert_eq!(state.meal_plan.monday.snacks, "");
    }
}
