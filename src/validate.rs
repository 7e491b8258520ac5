use chrono::NaiveDate;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

/// Input that cancels the current prompt and returns to the menu.
pub const CANCEL_SENTINEL: &str = "e";

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y"];

static HABIT_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]{3,20}$").expect("static habit name pattern"));

pub fn earliest_log_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// A habit name that passed the identifier allowlist.
///
/// Habit names are interpolated into schema-level SQL as table names, so the
/// only way to build one is [`HabitName::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HabitName(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("Habit name cannot be empty")]
    Empty,
    #[error("Cancelled")]
    Cancelled,
    #[error(
        "Invalid habit name: {0}. Use 3-20 letters, digits or underscores (example: Drinking_Water)"
    )]
    Invalid(String),
}

impl HabitName {
    /// Checks the name exactly as entered; surrounding whitespace is invalid.
    pub fn parse(raw: &str) -> Result<Self, NameError> {
        if raw.is_empty() {
            return Err(NameError::Empty);
        }
        if raw == CANCEL_SENTINEL {
            return Err(NameError::Cancelled);
        }
        if !HABIT_NAME_PATTERN.is_match(raw) {
            return Err(NameError::Invalid(raw.to_string()));
        }

        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// SQLite compares table names case-insensitively.
    pub fn matches(&self, table: &str) -> bool {
        self.0.eq_ignore_ascii_case(table)
    }
}

impl fmt::Display for HabitName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("Invalid date format: {0}. Example: 2024-06-01")]
    Unparseable(String),
    #[error("Date {date} is before {earliest}, the earliest date a log can have")]
    BeforeEarliest { date: NaiveDate, earliest: NaiveDate },
    #[error("Date {date} is in the future (today is {today})")]
    InFuture { date: NaiveDate, today: NaiveDate },
}

pub fn parse_log_date(raw: &str, today: NaiveDate) -> Result<NaiveDate, DateError> {
    let trimmed = raw.trim();
    let date = DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| DateError::Unparseable(trimmed.to_string()))?;

    let earliest = earliest_log_date();
    if date < earliest {
        return Err(DateError::BeforeEarliest { date, earliest });
    }
    if date > today {
        return Err(DateError::InFuture { date, today });
    }

    Ok(date)
}

/// Any integer is accepted; whether the row exists is the Store's answer.
pub fn parse_log_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

pub fn is_cancel(raw: &str) -> bool {
    raw.trim() == CANCEL_SENTINEL
}

pub fn is_confirmed(raw: &str) -> bool {
    raw == "y"
}
