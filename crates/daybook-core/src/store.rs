use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

pub type JsonMap = Map<String, Value>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("{} has an unexpected shape: {source}", .path.display())]
    Shape {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("document for {0} did not serialize to a JSON object")]
    NotAnObject(Category),
}

/// One productivity domain, backed by one JSON document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Schedule,
    Reminder,
    Note,
    Habit,
    Focus,
}

impl Category {
    pub fn file_name(self) -> &'static str {
        match self {
            Category::Schedule => "schedule.json",
            Category::Reminder => "reminders.json",
            Category::Note => "notes.json",
            Category::Habit => "habits.json",
            Category::Focus => "focus.json",
        }
    }

    /// Capitalised name used as the prefix of user-facing error strings.
    pub fn label(self) -> &'static str {
        match self {
            Category::Schedule => "Schedule",
            Category::Reminder => "Reminder",
            Category::Note => "Note",
            Category::Habit => "Habit",
            Category::Focus => "Focus",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why a load fell back to the empty document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadDiagnostic {
    Missing,
    Unreadable(String),
    Corrupt(String),
    NotAnObject,
}

impl LoadDiagnostic {
    /// Anything other than a plain missing file means on-disk data was ignored.
    pub fn is_data_loss(&self) -> bool {
        !matches!(self, LoadDiagnostic::Missing)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDocument {
    pub document: JsonMap,
    pub diagnostic: Option<LoadDiagnostic>,
}

impl LoadedDocument {
    fn fallback(diagnostic: LoadDiagnostic) -> Self {
        Self {
            document: JsonMap::new(),
            diagnostic: Some(diagnostic),
        }
    }
}

/// Read the JSON object at `path`.
///
/// A missing, unreadable or unparseable file, or one holding something other
/// than an object, yields an empty mapping. The reason is reported through
/// `diagnostic` and never as an error.
pub fn load_document(path: &Path) -> LoadedDocument {
    if !path.exists() {
        return LoadedDocument::fallback(LoadDiagnostic::Missing);
    }
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) => return LoadedDocument::fallback(LoadDiagnostic::Unreadable(err.to_string())),
    };
    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(document)) => LoadedDocument {
            document,
            diagnostic: None,
        },
        Ok(_) => LoadedDocument::fallback(LoadDiagnostic::NotAnObject),
        Err(err) => LoadedDocument::fallback(LoadDiagnostic::Corrupt(err.to_string())),
    }
}

pub fn load(path: &Path) -> JsonMap {
    let loaded = load_document(path);
    if let Some(diagnostic) = loaded.diagnostic.as_ref().filter(|d| d.is_data_loss()) {
        tracing::warn!(path = %path.display(), ?diagnostic, "state file ignored; using empty document");
    }
    loaded.document
}

/// Overwrite `path` with the whole document as indented JSON.
///
/// No temp file or locking: a crash mid-write can leave a truncated file,
/// which the next load treats as empty.
pub fn save(path: &Path, document: &JsonMap) -> Result<(), StoreError> {
    let io_error = |source: std::io::Error| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    let raw = serde_json::to_string_pretty(document)?;
    fs::write(path, raw).map_err(io_error)?;
    Ok(())
}

/// The five category documents under one state directory.
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self, category: Category) -> PathBuf {
        self.dir.join(category.file_name())
    }

    /// Load one category's raw document along with why it fell back, if it did.
    pub fn load_document(&self, category: Category) -> LoadedDocument {
        load_document(&self.path(category))
    }

    pub fn load_typed<T: DeserializeOwned>(&self, category: Category) -> Result<T, StoreError> {
        let path = self.path(category);
        let document = load(&path);
        tracing::debug!(category = %category, keys = document.len(), "loaded document");
        serde_json::from_value(Value::Object(document))
            .map_err(|source| StoreError::Shape { path, source })
    }

    pub fn save_typed<T: Serialize>(&self, category: Category, value: &T) -> Result<(), StoreError> {
        match serde_json::to_value(value)? {
            Value::Object(document) => save(&self.path(category), &document),
            _ => Err(StoreError::NotAnObject(category)),
        }
    }
}
