use super::console::Console;
use super::prompt;
use super::{Menu, Session};
use crate::db::{Store, StoreError};
use crate::validate::HabitName;
use anyhow::Result;
use std::io::{BufRead, Write};
use tracing::debug;

// Store failures are reported here and never leave the action.
fn report<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    doing: &str,
    error: &StoreError,
) -> Result<()> {
    debug!(error = %error, action = doing, "store operation failed");
    console.say(format!("An error occurred while {doing}:"))?;
    console.say(error.to_string())
}

fn fetch_habits<S: Store, R: BufRead, W: Write>(
    store: &S,
    console: &mut Console<R, W>,
) -> Result<Option<Vec<String>>> {
    match store.list_tables() {
        Ok(tables) => Ok(Some(tables)),
        Err(error) => {
            report(console, "reading the habit list", &error)?;
            Ok(None)
        }
    }
}

fn find_habit<'a>(tables: &'a [String], name: &HabitName) -> Option<&'a String> {
    tables.iter().find(|table| name.matches(table))
}

pub fn list_habits<S: Store, R: BufRead, W: Write>(
    store: &S,
    console: &mut Console<R, W>,
) -> Result<()> {
    let Some(habits) = fetch_habits(store, console)? else {
        return Ok(());
    };

    if habits.is_empty() {
        return console.say("No habits yet. Create one from the habit menu.");
    }

    console.say("Habits:")?;
    habits
        .iter()
        .try_for_each(|habit| console.say(format!("- {habit}")))
}

pub fn select_habit<S: Store, R: BufRead, W: Write>(
    store: &S,
    console: &mut Console<R, W>,
    session: &mut Session,
) -> Result<()> {
    let Some(name) = prompt::habit_name(console, "Enter the name of the habit to select")? else {
        return Ok(());
    };
    let Some(habits) = fetch_habits(store, console)? else {
        return Ok(());
    };

    match find_habit(&habits, &name) {
        Some(stored) => {
            let active = HabitName::parse(stored).unwrap_or(name);
            console.say(format!("Active habit set to {active}"))?;
            session.active_habit = Some(active);
        }
        None => console.say(format!(
            "Habit {name} does not exist. Create it first or pick one from the list."
        ))?,
    }

    Ok(())
}

pub fn create_habit<S: Store, R: BufRead, W: Write>(
    store: &S,
    console: &mut Console<R, W>,
) -> Result<()> {
    let Some(name) = prompt::habit_name(console, "Enter the name of the new habit")? else {
        return Ok(());
    };

    match store.create_table_if_absent(&name) {
        Ok(()) => console.say(format!("Habit {name} is ready")),
        Err(error) => report(console, "creating the habit", &error),
    }
}

pub fn delete_habit<S: Store, R: BufRead, W: Write>(
    store: &S,
    console: &mut Console<R, W>,
) -> Result<()> {
    let Some(name) = prompt::habit_name(console, "Enter the name of the habit to delete")? else {
        return Ok(());
    };
    let Some(habits) = fetch_habits(store, console)? else {
        return Ok(());
    };

    let Some(stored) = find_habit(&habits, &name) else {
        return console.say(format!("Habit {name} does not exist, nothing deleted"));
    };
    let target = HabitName::parse(stored).unwrap_or(name);

    match store.drop_table_if_exists(&target) {
        Ok(()) => console.say(format!("Habit {target} and all of its logs were deleted")),
        Err(error) => report(console, "deleting the habit", &error),
    }
}

pub fn open_log_menu<S: Store, R: BufRead, W: Write>(
    store: &S,
    console: &mut Console<R, W>,
    session: &mut Session,
) -> Result<()> {
    let Some(active) = session.active_habit.clone() else {
        return console.say("No active habit selected. Select a habit first.");
    };
    let Some(habits) = fetch_habits(store, console)? else {
        return Ok(());
    };

    if find_habit(&habits, &active).is_none() {
        return console.say(format!(
            "Habit {active} no longer exists. Select another habit first."
        ));
    }

    session.menu = Menu::Log;
    list_logs(store, console, &active)
}

pub fn return_to_habits(session: &mut Session) {
    session.menu = Menu::Habit;
}

pub fn list_logs<S: Store, R: BufRead, W: Write>(
    store: &S,
    console: &mut Console<R, W>,
    habit: &HabitName,
) -> Result<()> {
    let entries = match store.select_all(habit) {
        Ok(entries) => entries,
        Err(error) => return report(console, "reading the habit logs", &error),
    };

    if entries.is_empty() {
        return console.say(format!("No logs recorded for {habit}"));
    }

    console.say(format!("Logs for {habit}:"))?;
    entries
        .iter()
        .try_for_each(|entry| console.say(format!("Id: {} Date: {}", entry.id, entry.date)))
}

pub fn insert_log<S: Store, R: BufRead, W: Write>(
    store: &S,
    console: &mut Console<R, W>,
    habit: &HabitName,
) -> Result<()> {
    let Some(date) = prompt::log_date(console)? else {
        return Ok(());
    };

    match store.insert(habit, date) {
        Ok(()) => console.say(format!("Log for {date} added to {habit}")),
        Err(error) => report(console, "inserting the log", &error),
    }
}

pub fn update_log<S: Store, R: BufRead, W: Write>(
    store: &S,
    console: &mut Console<R, W>,
    habit: &HabitName,
) -> Result<()> {
    let Some(id) = prompt::log_id(console)? else {
        return Ok(());
    };
    let Some(date) = prompt::log_date(console)? else {
        return Ok(());
    };

    match store.update_by_id(habit, id, date) {
        Ok(0) => console.say(format!("Log {id} not found in {habit}, nothing updated")),
        Ok(_) => console.say(format!("Log {id} updated to {date}")),
        Err(error) => report(console, "updating the log", &error),
    }
}

pub fn delete_log<S: Store, R: BufRead, W: Write>(
    store: &S,
    console: &mut Console<R, W>,
    habit: &HabitName,
) -> Result<()> {
    let Some(id) = prompt::log_id(console)? else {
        return Ok(());
    };
    if !prompt::confirm(console, &format!("Delete log {id} from {habit}?"))? {
        return Ok(());
    }

    match store.delete_by_id(habit, id) {
        Ok(0) => console.say(format!("Log {id} not found in {habit}, nothing deleted")),
        Ok(_) => console.say(format!("Log {id} deleted")),
        Err(error) => report(console, "deleting the log", &error),
    }
}

pub fn delete_all_logs<S: Store, R: BufRead, W: Write>(
    store: &S,
    console: &mut Console<R, W>,
    habit: &HabitName,
) -> Result<()> {
    if !prompt::confirm(console, &format!("Delete ALL logs of {habit}?"))? {
        return Ok(());
    }

    match store.delete_all(habit) {
        Ok(removed) => console.say(format!("Deleted {removed} log(s) from {habit}")),
        Err(error) => report(console, "deleting all logs", &error),
    }
}
