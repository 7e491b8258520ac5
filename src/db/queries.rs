use crate::validate::HabitName;

// Table names come from `HabitName`, whose alphabet has no quote character,
// so wrapping them in double quotes needs no escaping.

pub const LIST_HABIT_TABLES: &str = r#"
SELECT name
FROM sqlite_master
WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
ORDER BY name
"#;

pub fn create_habit_table(habit: &HabitName) -> String {
    format!(
        r#"
CREATE TABLE IF NOT EXISTS "{habit}" (
  Id   INTEGER PRIMARY KEY AUTOINCREMENT,
  Date TEXT NOT NULL
);
"#
    )
}

pub fn drop_habit_table(habit: &HabitName) -> String {
    format!(r#"DROP TABLE IF EXISTS "{habit}""#)
}

pub fn select_logs(habit: &HabitName) -> String {
    format!(r#"SELECT Id, Date FROM "{habit}""#)
}

pub fn insert_log(habit: &HabitName) -> String {
    format!(r#"INSERT INTO "{habit}" (Date) VALUES (?1)"#)
}

pub fn update_log(habit: &HabitName) -> String {
    format!(r#"UPDATE "{habit}" SET Date = ?1 WHERE Id = ?2"#)
}

pub fn delete_log(habit: &HabitName) -> String {
    format!(r#"DELETE FROM "{habit}" WHERE Id = ?1"#)
}

pub fn delete_all_logs(habit: &HabitName) -> String {
    format!(r#"DELETE FROM "{habit}""#)
}
