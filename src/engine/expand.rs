//! Expansion of task definitions into per-day instances.
//!
//! A spontaneous task has exactly one instance, on its anchor date. A regular
//! task has one instance for every day inside its active window
//! `[anchor_date, end_date]` (open-ended when there is no end date).

use chrono::NaiveDate;

use super::completion::is_completed;
use crate::models::{DateRange, TaskDefinition, TaskInstance, TaskKind};

/// The days on which a definition is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveWindow {
    /// Active from `start` through `end` inclusive, or indefinitely when `end` is `None`.
    Days {
        start: NaiveDate,
        end: Option<NaiveDate>,
    },
    /// Archived on or before its first day.
    Never,
}

impl ActiveWindow {
    pub fn is_active_on(&self, day: NaiveDate) -> bool {
        match *self {
            ActiveWindow::Days { start, end } => start <= day && end.is_none_or(|end| day <= end),
            ActiveWindow::Never => false,
        }
    }

    /// The part of this window that falls inside `range`, if any.
    pub fn clip(&self, range: DateRange) -> Option<DateRange> {
        match *self {
            ActiveWindow::Days { start, end } => {
                let from = start.max(range.start());
                let to = end.map_or(range.end(), |end| end.min(range.end()));
                DateRange::new(from, to).ok()
            }
            ActiveWindow::Never => None,
        }
    }
}

/// Compute the active window of a definition.
///
/// A regular task whose `end_date` precedes its `anchor_date` is only
/// well-formed when archival put it there (`archived_on <= anchor_date`); it
/// is then active on no day. Any other such definition is malformed: it is
/// logged and treated as active on its anchor date alone, so its history
/// never silently disappears.
pub fn active_window(definition: &TaskDefinition) -> ActiveWindow {
    let anchor = definition.anchor_date;
    match definition.kind {
        TaskKind::Spontaneous => ActiveWindow::Days {
            start: anchor,
            end: Some(anchor),
        },
        TaskKind::Regular => match definition.end_date {
            None => ActiveWindow::Days {
                start: anchor,
                end: None,
            },
            Some(end) if end >= anchor => ActiveWindow::Days {
                start: anchor,
                end: Some(end),
            },
            Some(_) if definition.archived_on.is_some_and(|on| on <= anchor) => {
                ActiveWindow::Never
            }
            Some(end) => {
                debug_assert!(
                    definition.archived_on.is_none(),
                    "archival left end date {} before anchor date {} on {}",
                    end,
                    anchor,
                    definition.id
                );
                tracing::warn!(
                    task_id = %definition.id,
                    anchor_date = %anchor,
                    end_date = %end,
                    "malformed definition: end date before anchor date, treating as active on anchor date only"
                );
                ActiveWindow::Days {
                    start: anchor,
                    end: Some(anchor),
                }
            }
        },
    }
}

/// Expand definitions into the instances active within `range`.
///
/// Instances are grouped by definition in input order; use
/// [`sort_for_display`] for a calendar ordering.
pub fn expand(definitions: &[TaskDefinition], range: DateRange) -> Vec<TaskInstance> {
    let mut instances = Vec::new();

    for definition in definitions {
        let Some(days) = active_window(definition).clip(range) else {
            continue;
        };
        for day in days.days() {
            instances.push(instantiate(definition, day));
        }
    }

    instances
}

fn instantiate(definition: &TaskDefinition, day: NaiveDate) -> TaskInstance {
    TaskInstance {
        task_id: definition.id.clone(),
        kind: definition.kind,
        title: definition.title.clone(),
        category: definition.category.clone(),
        points: definition.points,
        is_important: definition.is_important,
        is_urgent: definition.is_urgent,
        date: day,
        completed: is_completed(definition, day),
    }
}

/// Order instances by day, then category, then title, then task id.
pub fn sort_for_display(instances: &mut [TaskInstance]) {
    instances.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.category.cmp(&b.category))
            .then_with(|| a.title.cmp(&b.title))
            .then_with(|| a.task_id.cmp(&b.task_id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Points, parse_day};

    fn day(s: &str) -> NaiveDate {
        parse_day(s).unwrap()
    }

    fn range(start: &str, end: &str) -> DateRange {
        DateRange::new(day(start), day(end)).unwrap()
    }

    fn regular(id: &str, anchor: &str) -> TaskDefinition {
        TaskDefinition::new(
            id.to_string(),
            "alice".to_string(),
            format!("Task {}", id),
            "Health".to_string(),
            TaskKind::Regular,
            day(anchor),
        )
    }

    fn spontaneous(id: &str, anchor: &str) -> TaskDefinition {
        TaskDefinition::new(
            id.to_string(),
            "alice".to_string(),
            format!("Task {}", id),
            "Errands".to_string(),
            TaskKind::Spontaneous,
            day(anchor),
        )
    }

    #[test]
    fn test_spontaneous_in_range_yields_one_instance() {
        let task = spontaneous("dt-000001", "2024-02-05");
        let instances = expand(&[task], range("2024-02-01", "2024-02-07"));
        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].date, day("2024-02-05"));
    }

    #[test]
    fn test_spontaneous_outside_range_yields_nothing() {
        let task = spontaneous("dt-000001", "2024-02-05");
        assert!(expand(&[task.clone()], range("2024-02-06", "2024-02-10")).is_empty());
        assert!(expand(&[task], range("2024-01-01", "2024-02-04")).is_empty());
    }

    #[test]
    fn test_open_ended_regular_covers_every_day() {
        let task = regular("dt-000001", "2024-01-01");
        for (start, end, expected) in [
            ("2024-01-01", "2024-01-01", 1),
            ("2024-01-01", "2024-01-31", 31),
            ("2024-03-10", "2024-04-09", 31),
            ("2025-12-25", "2026-01-05", 12),
        ] {
            let r = range(start, end);
            let instances = expand(std::slice::from_ref(&task), r);
            assert_eq!(instances.len(), expected, "range {}..{}", start, end);
            assert_eq!(instances.len() as u32, r.len_days());
        }
    }

    #[test]
    fn test_regular_starts_at_anchor() {
        let task = regular("dt-000001", "2024-01-03");
        let instances = expand(&[task], range("2024-01-01", "2024-01-05"));
        let days: Vec<NaiveDate> = instances.iter().map(|i| i.date).collect();
        assert_eq!(days, vec![day("2024-01-03"), day("2024-01-04"), day("2024-01-05")]);
    }

    #[test]
    fn test_regular_anchor_after_range_contributes_nothing() {
        let task = regular("dt-000001", "2024-02-01");
        assert!(expand(&[task], range("2024-01-01", "2024-01-31")).is_empty());
    }

    #[test]
    fn test_regular_end_date_inclusive() {
        let mut task = regular("dt-000001", "2024-01-01");
        task.end_date = Some(day("2024-01-02"));
        let instances = expand(&[task], range("2024-01-01", "2024-01-03"));
        assert_eq!(instances.len(), 2);
        assert_eq!(instances[1].date, day("2024-01-02"));
    }

    #[test]
    fn test_archived_before_first_day_is_never_active() {
        let mut task = regular("dt-000001", "2024-01-05");
        task.end_date = Some(day("2024-01-03"));
        task.archived_on = Some(day("2024-01-04"));
        assert_eq!(active_window(&task), ActiveWindow::Never);
        assert!(expand(&[task], range("2024-01-01", "2024-01-31")).is_empty());
    }

    #[test]
    fn test_malformed_window_falls_back_to_anchor_day() {
        let mut task = regular("dt-000001", "2024-01-05");
        task.end_date = Some(day("2024-01-01"));
        let instances = expand(&[task], range("2024-01-01", "2024-01-31"));
        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].date, day("2024-01-05"));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "archival left end date")]
    fn test_malformed_window_with_archival_marker_asserts() {
        let mut task = regular("dt-000001", "2024-01-05");
        task.end_date = Some(day("2024-01-01"));
        task.archived_on = Some(day("2024-01-08"));
        active_window(&task);
    }

    #[test]
    fn test_instances_copy_definition_fields() {
        let mut task = regular("dt-000001", "2024-01-01");
        task.points = Points::new(2).unwrap();
        task.is_important = true;
        task.completed_dates.insert(day("2024-01-02"));

        let instances = expand(&[task], range("2024-01-01", "2024-01-03"));
        assert_eq!(instances.len(), 3);
        assert!(instances.iter().all(|i| i.points.get() == 2 && i.is_important));
        let completed: Vec<bool> = instances.iter().map(|i| i.completed).collect();
        assert_eq!(completed, vec![false, true, false]);
    }

    #[test]
    fn test_sort_for_display() {
        let mut a = regular("dt-00000b", "2024-01-01");
        a.category = "Work".to_string();
        let b = spontaneous("dt-00000a", "2024-01-01");
        let mut instances = expand(&[a, b], range("2024-01-01", "2024-01-02"));
        sort_for_display(&mut instances);

        let order: Vec<(String, String)> = instances
            .iter()
            .map(|i| (i.date.to_string(), i.category.clone()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("2024-01-01".to_string(), "Errands".to_string()),
                ("2024-01-01".to_string(), "Work".to_string()),
                ("2024-01-02".to_string(), "Work".to_string()),
            ]
        );
    }
}
