use chrono::NaiveDate;

use crate::assistant::{DailyError, HandlerFailure};
use crate::clock::{date_string, Clock};
use crate::command::{parse_schedule, ScheduleCommand};
use crate::documents::{ScheduleDocument, ScheduledTask};
use crate::store::{Category, JsonStore};

pub const EMPTY_MESSAGE: &str = "No tasks scheduled for today";

pub fn handle(store: &JsonStore, clock: &dyn Clock, data: &str) -> Result<String, DailyError> {
    apply(store, clock, data).map_err(|failure| DailyError::in_category(Category::Schedule, failure))
}

fn apply(store: &JsonStore, clock: &dyn Clock, data: &str) -> Result<String, HandlerFailure> {
    match parse_schedule(data)? {
        ScheduleCommand::Add { title, time, date } => {
            let mut schedule: ScheduleDocument = store.load_typed(Category::Schedule)?;
            let date = date.unwrap_or_else(|| date_string(clock.today()));
            // Sequential ids; nothing is ever deleted so count + 1 stays unique.
            let id = (schedule.tasks.len() + 1).to_string();
            schedule.tasks.push(ScheduledTask {
                id: Some(id.clone()),
                title: Some(title.clone()),
                time: Some(time.clone()),
                date: Some(date.clone()),
                completed: false,
                ..Default::default()
            });
            store.save_typed(Category::Schedule, &schedule)?;
            tracing::info!(id = %id, date = %date, "scheduled task");
            Ok(format!("Task '{title}' scheduled for {time} on {date}"))
        }
        ScheduleCommand::Complete { id } => {
            let mut schedule: ScheduleDocument = store.load_typed(Category::Schedule)?;
            let task = schedule
                .tasks
                .iter_mut()
                .find(|task| task.id.as_deref() == Some(id.as_str()))
                .ok_or_else(|| HandlerFailure::Record(format!("no task with id '{id}'")))?;
            task.completed = true;
            let title = task.title.clone().unwrap_or_else(|| "Untitled".to_string());
            store.save_typed(Category::Schedule, &schedule)?;
            tracing::info!(id = %id, "completed task");
            Ok(format!("Task '{title}' marked as completed"))
        }
        ScheduleCommand::Show => {
            let schedule: ScheduleDocument = store.load_typed(Category::Schedule)?;
            Ok(render_today(&schedule, clock.today()))
        }
    }
}

/// Tasks dated `today`, in insertion order.
pub fn tasks_on(schedule: &ScheduleDocument, today: NaiveDate) -> Vec<&ScheduledTask> {
    let today = date_string(today);
    schedule
        .tasks
        .iter()
        .filter(|task| task.date.as_deref() == Some(today.as_str()))
        .collect()
}

/// Today's tasks sorted by their `time` string. The sort is lexical, so
/// "9:00" lands after "10:00".
pub fn render_today(schedule: &ScheduleDocument, today: NaiveDate) -> String {
    let mut tasks = tasks_on(schedule, today);
    if tasks.is_empty() {
        return EMPTY_MESSAGE.to_string();
    }
    tasks.sort_by(|a, b| {
        let a = a.time.as_deref().unwrap_or_default();
        let b = b.time.as_deref().unwrap_or_default();
        a.cmp(b)
    });

    let mut lines = vec!["Today's Schedule:".to_string()];
    for task in tasks {
        let status = if task.completed { "✓" } else { "○" };
        lines.push(format!(
            "{status} {} - {}",
            task.time.as_deref().unwrap_or("No time"),
            task.title.as_deref().unwrap_or("Untitled")
        ));
    }
    lines.join("\n")
}
