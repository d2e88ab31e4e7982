//! Core operations for daybook: per-category JSON state, the daily assistant
//! handlers, the daily summary and the code fetcher behind `visualize_code`.

pub mod assistant;
pub mod clock;
pub mod command;
pub mod config;
pub mod documents;
pub mod fetch;
pub mod focus;
pub mod habit;
pub mod note;
pub mod reminder;
pub mod schedule;
pub mod store;
pub mod summary;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::version;

    #[test]
    fn version_is_not_empty() {
        assert!(!version().is_empty());
    }
}
