pub mod queries;

use crate::validate::HabitName;
use chrono::NaiveDate;
use rusqlite::{Connection, params};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub id: i64,
    pub date: NaiveDate,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to open SQLite DB {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        source: rusqlite::Error,
    },
    #[error("Failed to create DB directory {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Sql(#[from] rusqlite::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Table-per-habit storage used by the menu actions.
///
/// Every method takes table names as [`HabitName`], so nothing that skipped the
/// identifier validator can reach a statement.
pub trait Store {
    fn list_tables(&self) -> StoreResult<Vec<String>>;
    fn create_table_if_absent(&self, habit: &HabitName) -> StoreResult<()>;
    fn drop_table_if_exists(&self, habit: &HabitName) -> StoreResult<()>;
    fn select_all(&self, habit: &HabitName) -> StoreResult<Vec<LogEntry>>;
    fn insert(&self, habit: &HabitName, date: NaiveDate) -> StoreResult<()>;
    fn update_by_id(&self, habit: &HabitName, id: i64, date: NaiveDate) -> StoreResult<usize>;
    fn delete_by_id(&self, habit: &HabitName, id: i64) -> StoreResult<usize>;
    fn delete_all(&self, habit: &HabitName) -> StoreResult<usize>;
}

/// SQLite store that opens a fresh connection for every statement.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // The connection is dropped by the caller's scope on every return path.
    fn connect(&self) -> StoreResult<Connection> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        Connection::open(&self.path).map_err(|source| StoreError::Open {
            path: self.path.clone(),
            source,
        })
    }
}

impl Store for SqliteStore {
    fn list_tables(&self) -> StoreResult<Vec<String>> {
        let conn = self.connect()?;
        let mut statement = conn.prepare(queries::LIST_HABIT_TABLES)?;

        let tables = statement
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = tables.len(), "listed habit tables");
        Ok(tables)
    }

    fn create_table_if_absent(&self, habit: &HabitName) -> StoreResult<()> {
        let conn = self.connect()?;
        conn.execute(&queries::create_habit_table(habit), [])?;

        info!(habit = %habit, "habit table ensured");
        Ok(())
    }

    fn drop_table_if_exists(&self, habit: &HabitName) -> StoreResult<()> {
        let conn = self.connect()?;
        conn.execute(&queries::drop_habit_table(habit), [])?;

        info!(habit = %habit, "habit table dropped");
        Ok(())
    }

    fn select_all(&self, habit: &HabitName) -> StoreResult<Vec<LogEntry>> {
        let conn = self.connect()?;
        let mut statement = conn.prepare(&queries::select_logs(habit))?;

        let rows = statement
            .query_map([], |row| {
                Ok(LogEntry {
                    id: row.get(0)?,
                    date: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        debug!(habit = %habit, count = rows.len(), "selected habit logs");
        Ok(rows)
    }

    fn insert(&self, habit: &HabitName, date: NaiveDate) -> StoreResult<()> {
        let conn = self.connect()?;
        conn.execute(&queries::insert_log(habit), params![date])?;

        debug!(habit = %habit, date = %date, "log inserted");
        Ok(())
    }

    fn update_by_id(&self, habit: &HabitName, id: i64, date: NaiveDate) -> StoreResult<usize> {
        let conn = self.connect()?;
        let affected = conn.execute(&queries::update_log(habit), params![date, id])?;

        debug!(habit = %habit, id, affected, "log update executed");
        Ok(affected)
    }

    fn delete_by_id(&self, habit: &HabitName, id: i64) -> StoreResult<usize> {
        let conn = self.connect()?;
        let affected = conn.execute(&queries::delete_log(habit), params![id])?;

        debug!(habit = %habit, id, affected, "log delete executed");
        Ok(affected)
    }

    fn delete_all(&self, habit: &HabitName) -> StoreResult<usize> {
        let conn = self.connect()?;
        let affected = conn.execute(&queries::delete_all_logs(habit), [])?;

        debug!(habit = %habit, affected, "habit logs cleared");
        Ok(affected)
    }
}

#[cfg(test)]
mod tests {
    use super::{LogEntry, SqliteStore, Store};
    use crate::validate::HabitName;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn habit(raw: &str) -> HabitName {
        HabitName::parse(raw).expect("valid habit name")
    }

    fn day(year: i32, month: u32, date: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, date).expect("valid date")
    }

    #[test]
    fn creating_twice_lists_habit_once() {
        let dir = tempdir().expect("tempdir");
        let store = SqliteStore::new(dir.path().join("db").join("habits.db"));

        store.create_table_if_absent(&habit("Running")).expect("create");
        store.create_table_if_absent(&habit("Running")).expect("create again");
        store.create_table_if_absent(&habit("Reading")).expect("create other");

        let tables = store.list_tables().expect("list");
        assert_eq!(tables, vec!["Reading".to_string(), "Running".to_string()]);
    }

    #[test]
    fn internal_sequence_table_is_hidden() {
        let dir = tempdir().expect("tempdir");
        let store = SqliteStore::new(dir.path().join("habits.db"));
        let running = habit("Running");

        store.create_table_if_absent(&running).expect("create");
        store.insert(&running, day(2024, 6, 1)).expect("insert");

        assert_eq!(store.list_tables().expect("list"), vec!["Running".to_string()]);
    }

    #[test]
    fn digit_leading_names_are_valid_tables() {
        let dir = tempdir().expect("tempdir");
        let store = SqliteStore::new(dir.path().join("habits.db"));

        store.create_table_if_absent(&habit("10k_steps")).expect("create");
        assert_eq!(store.list_tables().expect("list"), vec!["10k_steps".to_string()]);
    }

    #[test]
    fn insert_then_select_assigns_unique_ids() {
        let dir = tempdir().expect("tempdir");
        let store = SqliteStore::new(dir.path().join("habits.db"));
        let running = habit("Running");

        store.create_table_if_absent(&running).expect("create");
        store.insert(&running, day(2024, 6, 1)).expect("insert");
        store.insert(&running, day(2024, 6, 2)).expect("insert");

        let rows = store.select_all(&running).expect("select");
        assert_eq!(
            rows,
            vec![
                LogEntry {
                    id: 1,
                    date: day(2024, 6, 1),
                },
                LogEntry {
                    id: 2,
                    date: day(2024, 6, 2),
                },
            ]
        );
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let dir = tempdir().expect("tempdir");
        let store = SqliteStore::new(dir.path().join("habits.db"));
        let running = habit("Running");

        store.create_table_if_absent(&running).expect("create");
        store.insert(&running, day(2024, 6, 1)).expect("insert");
        store.insert(&running, day(2024, 6, 2)).expect("insert");
        assert_eq!(store.delete_by_id(&running, 2).expect("delete"), 1);
        store.insert(&running, day(2024, 6, 3)).expect("insert");

        let ids = store
            .select_all(&running)
            .expect("select")
            .into_iter()
            .map(|entry| entry.id)
            .collect::<Vec<_>>();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn update_missing_id_affects_nothing() {
        let dir = tempdir().expect("tempdir");
        let store = SqliteStore::new(dir.path().join("habits.db"));
        let running = habit("Running");

        store.create_table_if_absent(&running).expect("create");
        store.insert(&running, day(2024, 6, 1)).expect("insert");

        let missing = store.update_by_id(&running, 42, day(2024, 7, 1)).expect("update");
        assert_eq!(missing, 0);
        let found = store.update_by_id(&running, 1, day(2024, 7, 1)).expect("update");
        assert_eq!(found, 1);

        let rows = store.select_all(&running).expect("select");
        assert_eq!(
            rows,
            vec![LogEntry {
                id: 1,
                date: day(2024, 7, 1),
            }]
        );
    }

    #[test]
    fn delete_all_is_scoped_to_one_habit() {
        let dir = tempdir().expect("tempdir");
        let store = SqliteStore::new(dir.path().join("habits.db"));
        let running = habit("Running");
        let reading = habit("Reading");

        store.create_table_if_absent(&running).expect("create");
        store.create_table_if_absent(&reading).expect("create");
        store.insert(&running, day(2024, 6, 1)).expect("insert");
        store.insert(&running, day(2024, 6, 2)).expect("insert");
        store.insert(&reading, day(2024, 6, 3)).expect("insert");

        assert_eq!(store.delete_all(&running).expect("delete all"), 2);
        assert!(store.select_all(&running).expect("select").is_empty());
        assert_eq!(store.select_all(&reading).expect("select").len(), 1);
    }

    #[test]
    fn drop_removes_table_and_missing_table_is_an_error() {
        let dir = tempdir().expect("tempdir");
        let store = SqliteStore::new(dir.path().join("habits.db"));
        let running = habit("Running");

        store.create_table_if_absent(&running).expect("create");
        store.drop_table_if_exists(&running).expect("drop");
        store.drop_table_if_exists(&running).expect("drop again");

        assert!(store.list_tables().expect("list").is_empty());
        assert!(store.select_all(&running).is_err());
    }
}
