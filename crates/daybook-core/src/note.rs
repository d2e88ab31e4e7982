use crate::assistant::{DailyError, HandlerFailure};
use crate::clock::{iso_timestamp, parse_iso_timestamp, Clock};
use crate::command::{parse_note, NoteCommand};
use crate::documents::{Note, NoteDocument};
use crate::store::{Category, JsonStore};

pub const EMPTY_MESSAGE: &str = "No notes found";
pub const SAVED_MESSAGE: &str = "Note saved successfully";
const RECENT_LIMIT: usize = 5;
const PREVIEW_CHARS: usize = 50;

pub fn handle(store: &JsonStore, clock: &dyn Clock, data: &str) -> Result<String, DailyError> {
    apply(store, clock, data).map_err(|failure| DailyError::in_category(Category::Note, failure))
}

fn apply(store: &JsonStore, clock: &dyn Clock, data: &str) -> Result<String, HandlerFailure> {
    let mut notes: NoteDocument = store.load_typed(Category::Note)?;
    match parse_note(data)? {
        NoteCommand::Add { text, tags } => {
            notes.entries.push(Note {
                text: Some(text),
                timestamp: Some(iso_timestamp(clock.now())),
                tags,
                ..Default::default()
            });
            store.save_typed(Category::Note, &notes)?;
            tracing::info!(count = notes.entries.len(), "note saved");
            Ok(SAVED_MESSAGE.to_string())
        }
        NoteCommand::Show => render_recent(&notes),
    }
}

/// The last five notes, newest first.
pub fn render_recent(notes: &NoteDocument) -> Result<String, HandlerFailure> {
    let start = notes.entries.len().saturating_sub(RECENT_LIMIT);
    let recent = &notes.entries[start..];
    if recent.is_empty() {
        return Ok(EMPTY_MESSAGE.to_string());
    }
    let mut lines = vec!["Recent Notes:".to_string()];
    for note in recent.iter().rev() {
        let raw = note
            .timestamp
            .as_deref()
            .ok_or_else(|| HandlerFailure::Record("note entry has no timestamp".to_string()))?;
        let stamp = parse_iso_timestamp(raw)
            .ok_or_else(|| HandlerFailure::Record(format!("invalid note timestamp '{raw}'")))?;
        lines.push(format!(
            "[{}] {}",
            stamp.format("%m/%d %H:%M"),
            preview(note.text.as_deref().unwrap_or("No content"))
        ));
    }
    Ok(lines.join("\n"))
}

/// First 50 characters followed by "...", whether or not anything was cut.
pub fn preview(text: &str) -> String {
    let mut shown: String = text.chars().take(PREVIEW_CHARS).collect();
    shown.push_str("...");
    shown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn clock_at(minute: u32) -> FixedClock {
        FixedClock::at(NaiveDate::from_ymd_opt(2026, 10, 18).expect("date"), 21, minute)
    }

    #[test]
    fn preview_always_appends_ellipsis() {
        assert_eq!(preview("short"), "short...");
        let long = "x".repeat(60);
        assert_eq!(preview(&long), format!("{}...", "x".repeat(50)));
        assert_eq!(preview(&"é".repeat(51)).chars().count(), 53);
    }

    #[test]
    fn raw_text_and_json_notes_are_saved() {
        let temp = TempDir::new().expect("tempdir");
        let store = JsonStore::new(temp.path());
        assert_eq!(handle(&store, &clock_at(0), "").expect("show"), EMPTY_MESSAGE);
        assert_eq!(
            handle(&store, &clock_at(1), "remember the milk").expect("add"),
            SAVED_MESSAGE
        );
        handle(&store, &clock_at(2), r#"{"text": "standup notes", "tags": ["work"]}"#)
            .expect("add");

        let notes: NoteDocument = store.load_typed(Category::Note).expect("load");
        assert_eq!(notes.entries[0].text.as_deref(), Some("remember the milk"));
        assert!(notes.entries[0].tags.is_empty());
        assert_eq!(notes.entries[1].tags, vec!["work".to_string()]);
    }

    #[test]
    fn show_keeps_last_five_newest_first() {
        let temp = TempDir::new().expect("tempdir");
        let store = JsonStore::new(temp.path());
        for minute in 0..7 {
            handle(&store, &clock_at(minute), &format!("note {minute}")).expect("add");
        }
        let report = handle(&store, &clock_at(30), "").expect("show");
        assert_eq!(
            report,
            "Recent Notes:\n\
             [10/18 21:06] note 6...\n\
             [10/18 21:05] note 5...\n\
             [10/18 21:04] note 4...\n\
             [10/18 21:03] note 3...\n\
             [10/18 21:02] note 2..."
        );
    }

    #[test]
    fn missing_timestamp_is_a_note_error() {
        let temp = TempDir::new().expect("tempdir");
        let store = JsonStore::new(temp.path());
        std::fs::write(store.path(Category::Note), r#"{"entries": [{"text": "old"}]}"#)
            .expect("write");
        let err = handle(&store, &clock_at(0), "").expect_err("error");
        assert_eq!(err.to_string(), "Note error: note entry has no timestamp");
    }
}
