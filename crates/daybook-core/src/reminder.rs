use crate::assistant::{DailyError, HandlerFailure};
use crate::clock::{iso_timestamp, Clock};
use crate::command::{parse_reminder, ReminderCommand};
use crate::documents::{Reminder, ReminderDocument};
use crate::store::{Category, JsonStore};

pub const EMPTY_MESSAGE: &str = "No active reminders";

pub fn handle(store: &JsonStore, clock: &dyn Clock, data: &str) -> Result<String, DailyError> {
    apply(store, clock, data).map_err(|failure| DailyError::in_category(Category::Reminder, failure))
}

fn apply(store: &JsonStore, clock: &dyn Clock, data: &str) -> Result<String, HandlerFailure> {
    let mut reminders: ReminderDocument = store.load_typed(Category::Reminder)?;
    match parse_reminder(data)? {
        ReminderCommand::Add { text, due } => {
            reminders.items.push(Reminder {
                text: Some(text.clone()),
                due: Some(due.unwrap_or_default()),
                created: Some(iso_timestamp(clock.now())),
                ..Default::default()
            });
            store.save_typed(Category::Reminder, &reminders)?;
            tracing::info!(count = reminders.items.len(), "reminder added");
            Ok(format!("Reminder set: {text}"))
        }
        ReminderCommand::Show => Ok(render(&reminders)),
    }
}

/// All reminders in insertion order; there is no date filtering.
pub fn render(reminders: &ReminderDocument) -> String {
    if reminders.items.is_empty() {
        return EMPTY_MESSAGE.to_string();
    }
    let mut lines = vec!["Active Reminders:".to_string()];
    for (index, reminder) in reminders.items.iter().enumerate() {
        lines.push(format!(
            "{}. {} (Due: {})",
            index + 1,
            reminder.text.as_deref().unwrap_or("No text"),
            reminder.due.as_deref().unwrap_or("No due date")
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn clock() -> FixedClock {
        FixedClock::at(NaiveDate::from_ymd_opt(2026, 10, 18).expect("date"), 7, 45)
    }

    #[test]
    fn add_stamps_created_and_lists_in_order() {
        let temp = TempDir::new().expect("tempdir");
        let store = JsonStore::new(temp.path());
        assert_eq!(handle(&store, &clock(), "").expect("show"), EMPTY_MESSAGE);

        let reply = handle(
            &store,
            &clock(),
            r#"{"action": "add", "text": "Pay rent", "due": "2026-11-01"}"#,
        )
        .expect("add");
        assert_eq!(reply, "Reminder set: Pay rent");
        handle(&store, &clock(), r#"{"action": "add", "text": "Call mom"}"#).expect("add");

        let reminders: ReminderDocument = store.load_typed(Category::Reminder).expect("load");
        assert_eq!(
            reminders.items[0].created.as_deref(),
            Some("2026-10-18T07:45:00.000000")
        );
        assert_eq!(
            handle(&store, &clock(), "").expect("show"),
            "Active Reminders:\n1. Pay rent (Due: 2026-11-01)\n2. Call mom (Due: )"
        );
    }

    #[test]
    fn hand_written_entries_without_due_use_placeholder() {
        let reminders: ReminderDocument =
            serde_json::from_value(serde_json::json!({"items": [{}]})).expect("parse");
        assert_eq!(render(&reminders), "Active Reminders:\n1. No text (Due: No due date)");
    }
}
