//! Deletion planning.
//!
//! Regular tasks are referenced by their completion history, so deleting one
//! from a viewing date bounds its active window instead of removing it.
//! Spontaneous tasks, and deletions without a viewing date, remove the
//! definition outright.

use chrono::NaiveDate;
use serde::Serialize;

use super::expand::{ActiveWindow, active_window};
use crate::models::{TaskDefinition, TaskKind};

/// The effect of deleting a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Remove the definition entirely.
    HardDelete,
    /// Bound the active window so nothing appears on or after `archived_on`.
    SetEndDate {
        end_date: NaiveDate,
        archived_on: NaiveDate,
    },
}

/// Plan the deletion of `definition` as seen from `context_date`.
///
/// The new end date is the day before `context_date`. An existing earlier end
/// date is kept, since moving it later would revive days that were already
/// closed. When `context_date` is on or before the anchor date the task ends
/// up active on no day.
pub fn plan_deletion(definition: &TaskDefinition, context_date: Option<NaiveDate>) -> Action {
    let context_date = match (definition.kind, context_date) {
        (TaskKind::Regular, Some(day)) => day,
        _ => return Action::HardDelete,
    };

    let Some(day_before) = context_date.pred_opt() else {
        return Action::HardDelete;
    };
    let current_end = match active_window(definition) {
        ActiveWindow::Days { end, .. } => end,
        ActiveWindow::Never => {
            if let (Some(end_date), Some(archived_on)) = (definition.end_date, definition.archived_on) {
                return Action::SetEndDate {
                    end_date,
                    archived_on,
                };
            }
            None
        }
    };
    let (end_date, archived_on) = match current_end {
        Some(existing) if existing < day_before => {
            (existing, definition.archived_on.unwrap_or(context_date))
        }
        _ => (day_before, context_date),
    };

    let action = Action::SetEndDate {
        end_date,
        archived_on,
    };
    debug_assert!(
        end_date >= definition.anchor_date
            || active_window(&archived(definition, action)) == ActiveWindow::Never,
        "archival produced a malformed window for {}",
        definition.id
    );
    action
}

/// Apply `action` to a copy of `definition`, as the store would.
///
/// Returns the definition unchanged for `HardDelete`.
pub fn archived(definition: &TaskDefinition, action: Action) -> TaskDefinition {
    let mut updated = definition.clone();
    if let Action::SetEndDate {
        end_date,
        archived_on,
    } = action
    {
        updated.end_date = Some(end_date);
        updated.archived_on = Some(archived_on);
    }
    updated
}
