use chrono::NaiveDate;

use crate::assistant::{DailyError, HandlerFailure};
use crate::clock::{date_string, parse_date, Clock};
use crate::command::{parse_habit, HabitCommand};
use crate::documents::HabitDocument;
use crate::store::{Category, JsonStore};

pub const EMPTY_MESSAGE: &str = "No habits being tracked";
pub const WINDOW_DAYS: i64 = 7;

pub fn handle(store: &JsonStore, clock: &dyn Clock, data: &str) -> Result<String, DailyError> {
    apply(store, clock, data).map_err(|failure| DailyError::in_category(Category::Habit, failure))
}

fn apply(store: &JsonStore, clock: &dyn Clock, data: &str) -> Result<String, HandlerFailure> {
    let mut habits: HabitDocument = store.load_typed(Category::Habit)?;
    let today = clock.today();
    match parse_habit(data)? {
        HabitCommand::Track { habit } => {
            // No dedup: tracking twice on one day counts twice in the weekly status.
            habits
                .tracking
                .entry(habit.clone())
                .or_default()
                .push(date_string(today));
            store.save_typed(Category::Habit, &habits)?;
            tracing::info!(habit = %habit, "habit tracked");
            Ok(format!("Habit '{habit}' tracked for today"))
        }
        HabitCommand::Add { name } => {
            habits.list.push(name.clone());
            store.save_typed(Category::Habit, &habits)?;
            tracing::info!(habit = %name, "habit added");
            Ok(format!("Habit '{name}' added to tracking list"))
        }
        HabitCommand::Show => render_status(&habits, today),
    }
}

/// Number of tracked dates at most seven calendar days before `today`.
/// Future dates count too.
pub fn recent_count(dates: &[String], today: NaiveDate) -> Result<usize, HandlerFailure> {
    let mut count = 0;
    for raw in dates {
        let date = parse_date(raw)
            .ok_or_else(|| HandlerFailure::Record(format!("invalid tracked date '{raw}'")))?;
        if (today - date).num_days() <= WINDOW_DAYS {
            count += 1;
        }
    }
    Ok(count)
}

/// Only habits with tracking entries are listed; `list` is not consulted.
pub fn render_status(habits: &HabitDocument, today: NaiveDate) -> Result<String, HandlerFailure> {
    if habits.tracking.is_empty() {
        return Ok(EMPTY_MESSAGE.to_string());
    }
    let mut lines = vec!["Habit Status (Last 7 days):".to_string()];
    for (habit, dates) in &habits.tracking {
        let streak = recent_count(dates, today)?;
        lines.push(format!("{habit}: {streak}/7 days"));
    }
    Ok(lines.join("\n"))
}

/// Habits whose tracking list contains `today` at least once.
pub fn done_on(habits: &HabitDocument, today: NaiveDate) -> usize {
    let today = date_string(today);
    habits
        .tracking
        .values()
        .filter(|dates| dates.iter().any(|date| *date == today))
        .count()
}
