use chrono::{Duration, NaiveDate};

use crate::assistant::{DailyError, HandlerFailure};
use crate::clock::{date_string, display_timestamp, iso_timestamp, parse_iso_timestamp, Clock};
use crate::command::{parse_focus, FocusCommand};
use crate::documents::{FocusDocument, FocusSession};
use crate::store::{Category, JsonStore};

pub const EMPTY_MESSAGE: &str = "No focus sessions today";
const RECENT_LIMIT: usize = 3;

pub fn handle(store: &JsonStore, clock: &dyn Clock, data: &str) -> Result<String, DailyError> {
    apply(store, clock, data).map_err(|failure| DailyError::in_category(Category::Focus, failure))
}

fn apply(store: &JsonStore, clock: &dyn Clock, data: &str) -> Result<String, HandlerFailure> {
    let mut focus: FocusDocument = store.load_typed(Category::Focus)?;
    match parse_focus(data)? {
        FocusCommand::Start { task, duration } => {
            let length = Duration::minutes(i64::from(duration));
            let start = clock.now();
            focus.sessions.push(FocusSession {
                task: Some(task.clone()),
                duration: Some(i64::from(duration)),
                start_time: Some(iso_timestamp(start)),
                end_time: Some(iso_timestamp(start + length)),
                ..Default::default()
            });
            store.save_typed(Category::Focus, &focus)?;
            tracing::info!(task = %task, duration, "focus session started");
            // The readout takes its own clock reading, so it can trail the stored end_time slightly.
            let readout = display_timestamp(clock.now() + length);
            Ok(format!(
                "Focus session started: {task} ({duration} minutes)\nEnd time: {readout}"
            ))
        }
        FocusCommand::Show => render_today(&focus, clock.today()),
    }
}

/// Sessions whose `start_time` begins with today's date.
pub fn sessions_on(focus: &FocusDocument, today: NaiveDate) -> Vec<&FocusSession> {
    let prefix = date_string(today);
    focus
        .sessions
        .iter()
        .filter(|session| {
            session
                .start_time
                .as_deref()
                .is_some_and(|start| start.starts_with(&prefix))
        })
        .collect()
}

pub fn total_minutes(sessions: &[&FocusSession]) -> i64 {
    sessions.iter().map(|session| session.duration.unwrap_or(0)).sum()
}

pub fn render_today(focus: &FocusDocument, today: NaiveDate) -> Result<String, HandlerFailure> {
    let sessions = sessions_on(focus, today);
    if sessions.is_empty() {
        return Ok(EMPTY_MESSAGE.to_string());
    }
    let mut report = format!(
        "Today's Focus: {} sessions, {} minutes\n",
        sessions.len(),
        total_minutes(&sessions)
    );
    let start = sessions.len().saturating_sub(RECENT_LIMIT);
    for session in &sessions[start..] {
        let raw = session.start_time.as_deref().unwrap_or_default();
        let started = parse_iso_timestamp(raw)
            .ok_or_else(|| HandlerFailure::Record(format!("invalid session start time '{raw}'")))?;
        report.push_str(&format!(
            "\n[{}] {} ({}min)",
            started.format("%H:%M"),
            session.task.as_deref().unwrap_or("Unknown"),
            session.duration.unwrap_or(0)
        ));
    }
    Ok(report)
}
