//! Schedule derivation and lead-time conflict detection.
//!
//! Given an asset's anchor date and the task template, [`compute_schedule`]
//! produces one [`ScheduledTask`] per template row (always in template
//! order) and at most one [`Conflict`]. Two anchor semantics exist:
//!
//! ```text
//! backward_offset   anchor = go-live date
//!                   end    = anchor - lead_offset
//!                   start  = end - duration + 1
//!                   conflict iff (anchor - today) < max(lead_offset + duration)
//!
//! forward_chaining  anchor = campaign start date
//!                   task 1 starts on the anchor
//!                   task n starts the day after task n-1 ends, moved off weekends
//!                   conflict iff anchor < today
//! ```
//!
//! An unset anchor yields no tasks and no conflict.

pub mod calendar;

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::template::{TaskTemplate, TaskTemplateItem};

use calendar::{add_days, days_between, inclusive_end, next_business_day};

// ---------------------------------------------------------------------------
// Anchor mode
// ---------------------------------------------------------------------------

/// How an asset's anchor date is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorMode {
    /// The anchor is a go-live date; tasks are placed backwards from it.
    BackwardOffset,
    /// The anchor is a start date; tasks chain forward, skipping weekends.
    #[default]
    ForwardChaining,
}

impl fmt::Display for AnchorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::BackwardOffset => "backward_offset",
            Self::ForwardChaining => "forward_chaining",
        };
        f.write_str(s)
    }
}

impl FromStr for AnchorMode {
    type Err = AnchorModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "backward_offset" => Ok(Self::BackwardOffset),
            "forward_chaining" => Ok(Self::ForwardChaining),
            other => Err(AnchorModeParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`AnchorMode`] string.
#[derive(Debug, Clone)]
pub struct AnchorModeParseError(pub String);

impl fmt::Display for AnchorModeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid anchor mode: {:?} (expected backward_offset or forward_chaining)",
            self.0
        )
    }
}

impl std::error::Error for AnchorModeParseError {}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// A template row placed on the calendar.
///
/// `start_date..=end_date` spans exactly `duration_days` days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTask {
    pub sequence_id: u32,
    pub name: String,
    pub team: String,
    pub duration_days: u32,
    pub lead_offset_days: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl ScheduledTask {
    fn place(item: &TaskTemplateItem, start_date: NaiveDate) -> Option<Self> {
        Some(Self {
            sequence_id: item.sequence_id,
            name: item.name.clone(),
            team: item.team.clone(),
            duration_days: item.duration_days,
            lead_offset_days: item.lead_offset_days,
            start_date,
            end_date: inclusive_end(start_date, item.duration_days)?,
        })
    }
}

/// A scheduling infeasibility for one asset. A warning, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pub asset_label: String,
    pub message: String,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.asset_label, self.message)
    }
}

/// Result of scheduling one asset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleOutcome {
    pub tasks: Vec<ScheduledTask>,
    pub conflict: Option<Conflict>,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Message used when a forward-chaining start date lies before today.
pub const PAST_START_MESSAGE: &str = "The selected start date is in the past.";

/// Message used when a task would fall outside the representable calendar.
pub const OUT_OF_RANGE_MESSAGE: &str = "The schedule falls outside the supported date range.";

/// Derive the task schedule for one asset.
///
/// `asset_label` names the asset in any conflict produced. The output task
/// list is empty when `anchor` is `None` or when a task date cannot be
/// represented (reported as a conflict), and otherwise has exactly one entry
/// per template row in template order.
pub fn compute_schedule(
    anchor: Option<NaiveDate>,
    template: &TaskTemplate,
    today: NaiveDate,
    mode: AnchorMode,
    asset_label: &str,
) -> ScheduleOutcome {
    let Some(anchor) = anchor else {
        return ScheduleOutcome::default();
    };

    let (tasks, message) = match mode {
        AnchorMode::BackwardOffset => (
            backward_tasks(anchor, template),
            backward_conflict(anchor, template, today),
        ),
        AnchorMode::ForwardChaining => (
            forward_tasks(anchor, template),
            (anchor < today).then(|| PAST_START_MESSAGE.to_owned()),
        ),
    };

    let (tasks, message) = match tasks {
        Some(tasks) => (tasks, message),
        None => (Vec::new(), Some(OUT_OF_RANGE_MESSAGE.to_owned())),
    };

    ScheduleOutcome {
        tasks,
        conflict: message.map(|message| Conflict {
            asset_label: asset_label.to_owned(),
            message,
        }),
    }
}

/// Lead time the template needs before a go-live date:
/// the maximum of `lead_offset_days + duration_days` over all rows.
pub fn required_lead_time(template: &TaskTemplate) -> i64 {
    template
        .iter()
        .map(TaskTemplateItem::lead_requirement)
        .max()
        .unwrap_or(0)
}

/// Whole days available between `today` and `anchor`.
pub fn available_lead_time(today: NaiveDate, anchor: NaiveDate) -> i64 {
    days_between(today, anchor)
}

fn backward_tasks(go_live: NaiveDate, template: &TaskTemplate) -> Option<Vec<ScheduledTask>> {
    template
        .iter()
        .map(|item| {
            let end = add_days(go_live, -i64::from(item.lead_offset_days))?;
            let start = add_days(end, 1 - i64::from(item.duration_days))?;
            ScheduledTask::place(item, start)
        })
        .collect()
}

fn backward_conflict(go_live: NaiveDate, template: &TaskTemplate, today: NaiveDate) -> Option<String> {
    let required = required_lead_time(template);
    let available = available_lead_time(today, go_live);
    (available < required).then(|| {
        format!(
            "Insufficient lead time: {required} days required, only {available} days available."
        )
    })
}

fn forward_tasks(start: NaiveDate, template: &TaskTemplate) -> Option<Vec<ScheduledTask>> {
    let mut tasks = Vec::with_capacity(template.len());
    let mut next_start = Some(start);
    for item in template {
        let task = ScheduledTask::place(item, next_start?)?;
        // The last task may end on the final representable day.
        next_start = add_days(task.end_date, 1).and_then(next_business_day);
        tasks.push(task);
    }
    Some(tasks)
}
