use std::fmt;

use chrono::NaiveDate;

use crate::assistant::{DailyError, HandlerFailure};
use crate::clock::{date_string, Clock};
use crate::documents::{FocusDocument, HabitDocument, ScheduleDocument};
use crate::store::{Category, JsonStore};
use crate::{focus, habit, schedule};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub tasks_total: usize,
    pub tasks_completed: usize,
    pub focus_sessions: usize,
    pub focus_minutes: i64,
    /// Habits tracked at least once today; repeats on the same day count once.
    pub habits_done: usize,
}

pub fn handle(store: &JsonStore, clock: &dyn Clock) -> Result<String, DailyError> {
    summarize(store, clock.today())
        .map(|summary| summary.to_string())
        .map_err(DailyError::Summary)
}

/// Aggregate schedule, focus and habit documents for `today`. Any failure
/// aborts the whole summary.
pub fn summarize(store: &JsonStore, today: NaiveDate) -> Result<DailySummary, HandlerFailure> {
    let schedule_doc: ScheduleDocument = store.load_typed(Category::Schedule)?;
    let tasks = schedule::tasks_on(&schedule_doc, today);
    let tasks_completed = tasks.iter().filter(|task| task.completed).count();

    let focus_doc: FocusDocument = store.load_typed(Category::Focus)?;
    let sessions = focus::sessions_on(&focus_doc, today);

    let habit_doc: HabitDocument = store.load_typed(Category::Habit)?;

    Ok(DailySummary {
        date: today,
        tasks_total: tasks.len(),
        tasks_completed,
        focus_sessions: sessions.len(),
        focus_minutes: focus::total_minutes(&sessions),
        habits_done: habit::done_on(&habit_doc, today),
    })
}

impl fmt::Display for DailySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Daily Summary for {}", date_string(self.date))?;
        writeln!(f, "{}", "=".repeat(30))?;
        writeln!(f)?;
        writeln!(f, "Tasks: {}/{} completed", self.tasks_completed, self.tasks_total)?;
        writeln!(
            f,
            "Focus: {} sessions, {} minutes",
            self.focus_sessions, self.focus_minutes
        )?;
        writeln!(f, "Habits: {} completed today", self.habits_done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).expect("date")
    }

    #[test]
    fn empty_state_renders_zeroes() {
        let temp = TempDir::new().expect("tempdir");
        let store = JsonStore::new(temp.path());
        let report = handle(&store, &FixedClock::at(today(), 20, 0)).expect("summary");
        assert_eq!(
            report,
            "Daily Summary for 2026-10-18\n\
             ==============================\n\
             \n\
             Tasks: 0/0 completed\n\
             Focus: 0 sessions, 0 minutes\n\
             Habits: 0 completed today\n"
        );
    }

    #[test]
    fn aggregates_today_only() {
        let temp = TempDir::new().expect("tempdir");
        let store = JsonStore::new(temp.path());
        let clock = FixedClock::at(today(), 9, 0);
        for payload in [
            r#"{"action": "add", "title": "A", "time": "09:00"}"#,
            r#"{"action": "add", "title": "B", "time": "10:00"}"#,
            r#"{"action": "add", "title": "C", "time": "10:00", "date": "2026-10-17"}"#,
            r#"{"action": "complete", "id": "2"}"#,
        ] {
            schedule::handle(&store, &clock, payload).expect("schedule");
        }
        focus::handle(&store, &clock, r#"{"action": "start", "duration": 50}"#).expect("focus");
        focus::handle(&store, &clock, r#"{"action": "start", "duration": 15}"#).expect("focus");
        for payload in [
            r#"{"action": "track", "habit": "read"}"#,
            r#"{"action": "track", "habit": "read"}"#,
            r#"{"action": "track", "habit": "walk"}"#,
        ] {
            habit::handle(&store, &clock, payload).expect("habit");
        }

        let summary = summarize(&store, today()).expect("summary");
        assert_eq!(
            summary,
            DailySummary {
                date: today(),
                tasks_total: 2,
                tasks_completed: 1,
                focus_sessions: 2,
                focus_minutes: 65,
                habits_done: 2,
            }
        );
    }

    #[test]
    fn wrongly_shaped_document_aborts_the_summary() {
        let temp = TempDir::new().expect("tempdir");
        let store = JsonStore::new(temp.path());
        std::fs::write(store.path(Category::Focus), r#"{"sessions": {"bad": true}}"#)
            .expect("write");
        let err = handle(&store, &FixedClock::at(today(), 9, 0)).expect_err("error");
        assert!(err.to_string().starts_with("Summary error: "), "{err}");
    }
}
