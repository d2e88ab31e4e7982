//! Parsers that turn the free-form `data` payload into a typed command.
//!
//! An empty payload, or a JSON object without an `action`, is a request to
//! show the category. A known action becomes a mutation; an unknown one is
//! rejected with [`CommandParseError::UnknownAction`].

use serde_json::Value;
use thiserror::Error;

use crate::store::JsonMap;

pub const DEFAULT_FOCUS_MINUTES: u32 = 25;
pub const DEFAULT_FOCUS_TASK: &str = "Focus session";

#[derive(Debug, Error)]
pub enum CommandParseError {
    #[error("{0}")]
    Malformed(#[from] serde_json::Error),
    #[error("payload must be a JSON object")]
    NotAnObject,
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("field `{field}` must be {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },
    #[error("Unknown {category} action: {action}. Available: {available}")]
    UnknownAction {
        category: &'static str,
        action: String,
        available: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleCommand {
    Add {
        title: String,
        time: String,
        date: Option<String>,
    },
    Complete {
        id: String,
    },
    Show,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderCommand {
    Add { text: String, due: Option<String> },
    Show,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteCommand {
    Add { text: String, tags: Vec<String> },
    Show,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HabitCommand {
    Track { habit: String },
    Add { name: String },
    Show,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusCommand {
    Start { task: String, duration: u32 },
    Show,
}

pub fn parse_schedule(raw: &str) -> Result<ScheduleCommand, CommandParseError> {
    let Some(payload) = payload_object(raw)? else {
        return Ok(ScheduleCommand::Show);
    };
    match action(&payload)?.as_deref() {
        None | Some("show") => Ok(ScheduleCommand::Show),
        Some("add") => Ok(ScheduleCommand::Add {
            title: required_str(&payload, "title")?,
            time: required_str(&payload, "time")?,
            date: optional_str(&payload, "date")?,
        }),
        Some("complete") => Ok(ScheduleCommand::Complete {
            id: required_id(&payload, "id")?,
        }),
        Some(other) => Err(unknown_action("schedule", other, "add, complete, show")),
    }
}

pub fn parse_reminder(raw: &str) -> Result<ReminderCommand, CommandParseError> {
    let Some(payload) = payload_object(raw)? else {
        return Ok(ReminderCommand::Show);
    };
    match action(&payload)?.as_deref() {
        None | Some("show") => Ok(ReminderCommand::Show),
        Some("add") => Ok(ReminderCommand::Add {
            text: required_str(&payload, "text")?,
            due: optional_str(&payload, "due")?,
        }),
        Some(other) => Err(unknown_action("reminder", other, "add, show")),
    }
}

/// Any non-empty payload is a note. A JSON object supplies `text` and `tags`;
/// anything else is taken verbatim as the note text.
pub fn parse_note(raw: &str) -> Result<NoteCommand, CommandParseError> {
    if raw.trim().is_empty() {
        return Ok(NoteCommand::Show);
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(payload)) => Ok(NoteCommand::Add {
            text: optional_str(&payload, "text")?.unwrap_or_else(|| raw.to_string()),
            tags: string_list(&payload, "tags")?,
        }),
        _ => Ok(NoteCommand::Add {
            text: raw.to_string(),
            tags: Vec::new(),
        }),
    }
}

pub fn parse_habit(raw: &str) -> Result<HabitCommand, CommandParseError> {
    let Some(payload) = payload_object(raw)? else {
        return Ok(HabitCommand::Show);
    };
    match action(&payload)?.as_deref() {
        None | Some("show") => Ok(HabitCommand::Show),
        Some("track") => Ok(HabitCommand::Track {
            habit: required_str(&payload, "habit")?,
        }),
        Some("add") => Ok(HabitCommand::Add {
            name: required_str(&payload, "name")?,
        }),
        Some(other) => Err(unknown_action("habit", other, "track, add, show")),
    }
}

pub fn parse_focus(raw: &str) -> Result<FocusCommand, CommandParseError> {
    let Some(payload) = payload_object(raw)? else {
        return Ok(FocusCommand::Show);
    };
    match action(&payload)?.as_deref() {
        None | Some("show") => Ok(FocusCommand::Show),
        Some("start") => Ok(FocusCommand::Start {
            task: optional_str(&payload, "task")?
                .unwrap_or_else(|| DEFAULT_FOCUS_TASK.to_string()),
            duration: minutes(&payload, "duration")?.unwrap_or(DEFAULT_FOCUS_MINUTES),
        }),
        Some(other) => Err(unknown_action("focus", other, "start, show")),
    }
}

fn payload_object(raw: &str) -> Result<Option<JsonMap>, CommandParseError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    match serde_json::from_str::<Value>(raw)? {
        Value::Object(payload) => Ok(Some(payload)),
        _ => Err(CommandParseError::NotAnObject),
    }
}

fn action(payload: &JsonMap) -> Result<Option<String>, CommandParseError> {
    optional_str(payload, "action")
}

fn unknown_action(category: &'static str, action: &str, available: &'static str) -> CommandParseError {
    CommandParseError::UnknownAction {
        category,
        action: action.to_string(),
        available,
    }
}

/// `null` counts as absent.
fn optional_str(payload: &JsonMap, field: &'static str) -> Result<Option<String>, CommandParseError> {
    match payload.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(CommandParseError::InvalidField {
            field,
            expected: "a string",
        }),
    }
}

fn required_str(payload: &JsonMap, field: &'static str) -> Result<String, CommandParseError> {
    optional_str(payload, field)?.ok_or(CommandParseError::MissingField(field))
}

/// Task ids are stored as strings but callers often send numbers.
fn required_id(payload: &JsonMap, field: &'static str) -> Result<String, CommandParseError> {
    match payload.get(field) {
        Some(Value::Number(number)) => Ok(number.to_string()),
        _ => required_str(payload, field),
    }
}

fn string_list(payload: &JsonMap, field: &'static str) -> Result<Vec<String>, CommandParseError> {
    let invalid = CommandParseError::InvalidField {
        field,
        expected: "a list of strings",
    };
    match payload.get(field) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .ok_or(invalid),
        Some(_) => Err(invalid),
    }
}

fn minutes(payload: &JsonMap, field: &'static str) -> Result<Option<u32>, CommandParseError> {
    match payload.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_u64()
            .and_then(|value| u32::try_from(value).ok())
            .map(Some)
            .ok_or(CommandParseError::InvalidField {
                field,
                expected: "a non-negative whole number of minutes",
            }),
    }
}
