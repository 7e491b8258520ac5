pub mod actions;
pub mod console;
pub mod prompt;

use crate::db::Store;
use crate::validate::HabitName;
use anyhow::Result;
use self::console::Console;
use std::io::{BufRead, Write};
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Menu {
    #[default]
    Habit,
    Log,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Exit,
    ListHabits,
    SelectHabit,
    CreateHabit,
    DeleteHabit,
    OpenLogMenu,
    ListLogs,
    InsertLog,
    UpdateLog,
    DeleteLog,
    DeleteAllLogs,
    ReturnToHabits,
}

struct MenuItem {
    label: &'static str,
    action: Action,
}

const HABIT_MENU: [MenuItem; 6] = [
    MenuItem {
        label: "Exit program",
        action: Action::Exit,
    },
    MenuItem {
        label: "View habits",
        action: Action::ListHabits,
    },
    MenuItem {
        label: "Select active habit",
        action: Action::SelectHabit,
    },
    MenuItem {
        label: "Create habit",
        action: Action::CreateHabit,
    },
    MenuItem {
        label: "Delete habit",
        action: Action::DeleteHabit,
    },
    MenuItem {
        label: "Open log menu for active habit",
        action: Action::OpenLogMenu,
    },
];

const LOG_MENU: [MenuItem; 7] = [
    MenuItem {
        label: "Exit program",
        action: Action::Exit,
    },
    MenuItem {
        label: "View logs",
        action: Action::ListLogs,
    },
    MenuItem {
        label: "Insert log",
        action: Action::InsertLog,
    },
    MenuItem {
        label: "Update log",
        action: Action::UpdateLog,
    },
    MenuItem {
        label: "Delete log",
        action: Action::DeleteLog,
    },
    MenuItem {
        label: "Delete all logs",
        action: Action::DeleteAllLogs,
    },
    MenuItem {
        label: "Return to habit menu",
        action: Action::ReturnToHabits,
    },
];

impl Menu {
    fn items(self) -> &'static [MenuItem] {
        match self {
            Self::Habit => &HABIT_MENU,
            Self::Log => &LOG_MENU,
        }
    }

    pub fn labels(self) -> Vec<&'static str> {
        self.items().iter().map(|item| item.label).collect()
    }

    pub fn action_for(self, choice: usize) -> Option<Action> {
        self.items().get(choice).map(|item| item.action)
    }
}

/// Which menu is shown and which habit the log menu works on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub menu: Menu,
    pub active_habit: Option<HabitName>,
}

impl Session {
    fn header(&self) -> String {
        let active = self
            .active_habit
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "none".to_string());

        match self.menu {
            Menu::Habit => format!("== Habit menu (active habit: {active}) =="),
            Menu::Log => format!("== Log menu for {active} =="),
        }
    }
}

pub struct Controller<S, R, W> {
    store: S,
    console: Console<R, W>,
    session: Session,
}

impl<S: Store, R: BufRead, W: Write> Controller<S, R, W> {
    pub fn new(store: S, console: Console<R, W>) -> Self {
        Self {
            store,
            console,
            session: Session::default(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Runs until the exit option is chosen or input ends.
    pub fn run(&mut self) -> Result<()> {
        loop {
            let header = self.session.header();
            let labels = self.session.menu.labels();
            let Some(choice) = prompt::menu_choice(&mut self.console, &header, &labels)? else {
                debug!("console input closed");
                self.console.say("Exiting program")?;
                return Ok(());
            };

            let Some(action) = self.session.menu.action_for(choice) else {
                continue;
            };

            if action == Action::Exit {
                self.console.say("Exiting program")?;
                return Ok(());
            }

            self.dispatch(action)?;
        }
    }

    fn dispatch(&mut self, action: Action) -> Result<()> {
        debug!(?action, menu = ?self.session.menu, "dispatching menu action");
        let store = &self.store;
        let console = &mut self.console;

        match action {
            Action::Exit => Ok(()),
            Action::ListHabits => actions::list_habits(store, console),
            Action::SelectHabit => actions::select_habit(store, console, &mut self.session),
            Action::CreateHabit => actions::create_habit(store, console),
            Action::DeleteHabit => actions::delete_habit(store, console),
            Action::OpenLogMenu => actions::open_log_menu(store, console, &mut self.session),
            Action::ReturnToHabits => {
                actions::return_to_habits(&mut self.session);
                Ok(())
            }
            Action::ListLogs
            | Action::InsertLog
            | Action::UpdateLog
            | Action::DeleteLog
            | Action::DeleteAllLogs => {
                let Some(habit) = self.session.active_habit.clone() else {
                    actions::return_to_habits(&mut self.session);
                    return console.say("No active habit selected. Select a habit first.");
                };

                match action {
                    Action::ListLogs => actions::list_logs(store, console, &habit),
                    Action::InsertLog => actions::insert_log(store, console, &habit),
                    Action::UpdateLog => actions::update_log(store, console, &habit),
                    Action::DeleteLog => actions::delete_log(store, console, &habit),
                    _ => actions::delete_all_logs(store, console, &habit),
                }
            }
        }
    }
}
