use super::console::Console;
use crate::validate::{
    CANCEL_SENTINEL, HabitName, NameError, earliest_log_date, is_cancel, is_confirmed,
    parse_log_date, parse_log_id,
};
use anyhow::Result;
use chrono::{Local, NaiveDate};
use std::io::{BufRead, Write};

/// Reads a habit name once. Any failure is reported and yields `None`.
pub fn habit_name<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    message: &str,
) -> Result<Option<HabitName>> {
    let Some(raw) = console.prompt(format!("{message} ('{CANCEL_SENTINEL}' to cancel):"))? else {
        return Ok(None);
    };

    match HabitName::parse(&raw) {
        Ok(name) => Ok(Some(name)),
        Err(NameError::Cancelled) => {
            console.say("Cancelled, returning to menu")?;
            Ok(None)
        }
        Err(error) => {
            console.say(error.to_string())?;
            Ok(None)
        }
    }
}

/// Re-prompts until a date in range is entered or the user cancels.
pub fn log_date<R: BufRead, W: Write>(console: &mut Console<R, W>) -> Result<Option<NaiveDate>> {
    loop {
        let today = Local::now().date_naive();
        let Some(raw) = console.prompt(format!(
            "Enter the date (YYYY-MM-DD, {} to {today}, '{CANCEL_SENTINEL}' to cancel):",
            earliest_log_date()
        ))?
        else {
            return Ok(None);
        };

        if is_cancel(&raw) {
            console.say("Cancelled, returning to menu")?;
            return Ok(None);
        }

        match parse_log_date(&raw, today) {
            Ok(date) => return Ok(Some(date)),
            Err(error) => console.say(format!("{error}, please try again"))?,
        }
    }
}

/// Re-prompts until an integer is entered or the user cancels.
pub fn log_id<R: BufRead, W: Write>(console: &mut Console<R, W>) -> Result<Option<i64>> {
    loop {
        let Some(raw) =
            console.prompt(format!("Enter the log id ('{CANCEL_SENTINEL}' to cancel):"))?
        else {
            return Ok(None);
        };

        if is_cancel(&raw) {
            console.say("Cancelled, returning to menu")?;
            return Ok(None);
        }

        match parse_log_id(&raw) {
            Some(id) => return Ok(Some(id)),
            None => console.say(format!("Invalid id: {}, please enter a number", raw.trim()))?,
        }
    }
}

pub fn confirm<R: BufRead, W: Write>(console: &mut Console<R, W>, message: &str) -> Result<bool> {
    let answer = console.prompt(format!("{message} (y to confirm, anything else aborts):"))?;
    let confirmed = answer.as_deref().is_some_and(is_confirmed);

    if !confirmed {
        console.say("Aborted")?;
    }

    Ok(confirmed)
}

/// Prints the options and reads one selection in `0..=max_option`.
///
/// `Ok(None)` means input ended; bad selections re-prompt.
pub fn menu_choice<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    header: &str,
    options: &[&str],
) -> Result<Option<usize>> {
    let max_option = options.len().saturating_sub(1);

    loop {
        console.say(format!("\n{header}"))?;
        console.say("Press the number of the option you want")?;
        for (index, label) in options.iter().enumerate() {
            console.say(format!("{index} : {label}"))?;
        }

        let Some(raw) = console.read_line()? else {
            return Ok(None);
        };

        match raw.trim().parse::<i64>() {
            Ok(choice) if (0..=max_option as i64).contains(&choice) => {
                return Ok(Some(choice as usize));
            }
            Ok(_) => console.say(format!(
                "Input must be between 0-{max_option}, please try again"
            ))?,
            Err(_) => console.say("Invalid input, please try again")?,
        }
    }
}
