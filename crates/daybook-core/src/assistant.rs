use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

use crate::clock::{Clock, SystemClock};
use crate::command::CommandParseError;
use crate::store::{Category, JsonStore, StoreError};
use crate::{focus, habit, note, reminder, schedule, summary};

pub const AVAILABLE_TASK_TYPES: &str = "schedule, reminder, note, habit, focus, summary";

/// The message part of a category error.
#[derive(Debug, Error)]
pub enum HandlerFailure {
    #[error(transparent)]
    Command(#[from] CommandParseError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("{0}")]
    Record(String),
}

/// Every way a `daily_assistant` call can fail. `Display` gives the exact
/// text returned to the tool caller.
#[derive(Debug, Error)]
pub enum DailyError {
    #[error("{category} error: {failure}")]
    Category {
        category: Category,
        failure: HandlerFailure,
    },
    #[error("Summary error: {0}")]
    Summary(HandlerFailure),
    #[error("{0}")]
    UnknownAction(CommandParseError),
    #[error("Unknown task type: {0}. Available: {}", AVAILABLE_TASK_TYPES)]
    UnknownTaskType(String),
}

impl DailyError {
    /// Unknown actions are guidance for the caller, not a category error.
    pub fn in_category(category: Category, failure: impl Into<HandlerFailure>) -> Self {
        match failure.into() {
            HandlerFailure::Command(err @ CommandParseError::UnknownAction { .. }) => {
                DailyError::UnknownAction(err)
            }
            failure => DailyError::Category { category, failure },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskType {
    Schedule,
    Reminder,
    Note,
    Habit,
    Focus,
    Summary,
}

impl FromStr for TaskType {
    type Err = DailyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "schedule" => Ok(TaskType::Schedule),
            "reminder" => Ok(TaskType::Reminder),
            "note" => Ok(TaskType::Note),
            "habit" => Ok(TaskType::Habit),
            "focus" => Ok(TaskType::Focus),
            "summary" => Ok(TaskType::Summary),
            other => Err(DailyError::UnknownTaskType(other.to_string())),
        }
    }
}

/// Dispatches `daily_assistant` calls to the category handlers.
#[derive(Clone)]
pub struct DailyAssistant {
    store: JsonStore,
    clock: Arc<dyn Clock>,
}

impl DailyAssistant {
    pub fn new(store: JsonStore) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: JsonStore, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &JsonStore {
        &self.store
    }

    pub fn dispatch(&self, task_type: &str, data: &str) -> Result<String, DailyError> {
        let clock = self.clock.as_ref();
        match task_type.parse::<TaskType>()? {
            TaskType::Schedule => schedule::handle(&self.store, clock, data),
            TaskType::Reminder => reminder::handle(&self.store, clock, data),
            TaskType::Note => note::handle(&self.store, clock, data),
            TaskType::Habit => habit::handle(&self.store, clock, data),
            TaskType::Focus => focus::handle(&self.store, clock, data),
            TaskType::Summary => summary::handle(&self.store, clock),
        }
    }

    /// Flatten the result into the string handed back to the tool caller.
    pub fn run(&self, task_type: &str, data: &str) -> String {
        match self.dispatch(task_type, data) {
            Ok(reply) => reply,
            Err(err) => {
                tracing::debug!(task_type, error = %err, "daily_assistant call failed");
                err.to_string()
            }
        }
    }
}
