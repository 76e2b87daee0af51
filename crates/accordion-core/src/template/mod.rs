//! The task template: the fixed, ordered workflow applied to every asset.
//!
//! The template is configuration, not per-asset state. The built-in
//! four-stage template lives in `template.toml` and is embedded at compile
//! time; a replacement can be loaded from disk.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single template row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskTemplateItem {
    /// Position of the task in the workflow; unique within a template.
    pub sequence_id: u32,
    /// Task name (e.g. "Content Creation").
    pub name: String,
    /// Team responsible for the task.
    pub team: String,
    /// Inclusive length of the task in days. Always at least 1.
    pub duration_days: u32,
    /// Days before the go-live date by which this task must end.
    #[serde(default)]
    pub lead_offset_days: u32,
}

impl TaskTemplateItem {
    /// Days of lead time this task needs before the go-live date.
    pub fn lead_requirement(&self) -> i64 {
        i64::from(self.lead_offset_days) + i64::from(self.duration_days)
    }
}

/// Upper bound, in days, for a task's duration and for its lead offset.
pub const MAX_TASK_SPAN_DAYS: u32 = 3650;

/// Errors that can occur while loading a template.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("failed to read template file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("template must contain at least one task")]
    NoTasks,

    #[error("duplicate sequence_id {0}")]
    DuplicateSequenceId(u32),

    #[error("task {0:?} has a duration of zero days")]
    ZeroDuration(String),

    #[error("task {task:?} has a duration of {days} days (maximum {MAX_TASK_SPAN_DAYS})")]
    DurationTooLong { task: String, days: u32 },

    #[error("task {task:?} has a lead offset of {days} days (maximum {MAX_TASK_SPAN_DAYS})")]
    LeadOffsetTooLong { task: String, days: u32 },
}

/// The validated, ordered task template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskTemplate {
    #[serde(rename = "tasks")]
    items: Vec<TaskTemplateItem>,
}

static TEMPLATE_TOML: &str = include_str!("template.toml");

impl TaskTemplate {
    /// Load the built-in four-stage template.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed.
    pub fn builtin() -> Self {
        Self::from_toml_str(TEMPLATE_TOML).expect("embedded template.toml is invalid")
    }

    /// Build a template from items, validating them.
    pub fn new(items: Vec<TaskTemplateItem>) -> Result<Self, TemplateError> {
        let template = Self { items };
        template.validate()?;
        Ok(template)
    }

    /// Parse and validate a template from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, TemplateError> {
        let template: TaskTemplate = toml::from_str(content)?;
        template.validate()?;
        Ok(template)
    }

    /// Read, parse and validate a template file.
    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        let content = std::fs::read_to_string(path).map_err(|source| TemplateError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    fn validate(&self) -> Result<(), TemplateError> {
        if self.items.is_empty() {
            return Err(TemplateError::NoTasks);
        }
        let mut seen = HashSet::new();
        for item in &self.items {
            if !seen.insert(item.sequence_id) {
                return Err(TemplateError::DuplicateSequenceId(item.sequence_id));
            }
            if item.duration_days == 0 {
                return Err(TemplateError::ZeroDuration(item.name.clone()));
            }
            if item.duration_days > MAX_TASK_SPAN_DAYS {
                return Err(TemplateError::DurationTooLong {
                    task: item.name.clone(),
                    days: item.duration_days,
                });
            }
            if item.lead_offset_days > MAX_TASK_SPAN_DAYS {
                return Err(TemplateError::LeadOffsetTooLong {
                    task: item.name.clone(),
                    days: item.lead_offset_days,
                });
            }
        }
        Ok(())
    }

    /// Template rows, in workflow order.
    pub fn items(&self) -> &[TaskTemplateItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TaskTemplateItem> {
        self.items.iter()
    }
}

impl Default for TaskTemplate {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<'a> IntoIterator for &'a TaskTemplate {
    type Item = &'a TaskTemplateItem;
    type IntoIter = std::slice::Iter<'a, TaskTemplateItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
