//! Per-day completion resolution.

use chrono::NaiveDate;

use crate::models::{TaskDefinition, TaskKind};

/// Whether `definition` counts as completed on `day`.
///
/// Spontaneous tasks carry a single flag; regular tasks carry one entry per
/// completed day. The field belonging to the other kind is ignored.
pub fn is_completed(definition: &TaskDefinition, day: NaiveDate) -> bool {
    match definition.kind {
        TaskKind::Spontaneous => definition.is_completed,
        TaskKind::Regular => definition.completed_dates.contains(&day),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_day;

    fn day(s: &str) -> NaiveDate {
        parse_day(s).unwrap()
    }

    fn task(kind: TaskKind) -> TaskDefinition {
        TaskDefinition::new(
            "dt-000001".to_string(),
            "alice".to_string(),
            "Read".to_string(),
            "Learning".to_string(),
            kind,
            day("2024-01-01"),
        )
    }

    #[test]
    fn test_regular_uses_completed_dates() {
        let mut task = task(TaskKind::Regular);
        task.completed_dates.insert(day("2024-01-02"));
        // The spontaneous flag is ignored for regular tasks
        task.is_completed = true;

        assert!(!is_completed(&task, day("2024-01-01")));
        assert!(is_completed(&task, day("2024-01-02")));
        assert!(!is_completed(&task, day("2024-01-03")));
    }

    #[test]
    fn test_spontaneous_uses_flag() {
        let mut task = task(TaskKind::Spontaneous);
        // Completion log is ignored for spontaneous tasks
        task.completed_dates.insert(day("2024-01-01"));
        assert!(!is_completed(&task, day("2024-01-01")));

        task.is_completed = true;
        assert!(is_completed(&task, day("2024-01-01")));
    }

    #[test]
    fn test_resolution_is_repeatable() {
        let mut task = task(TaskKind::Regular);
        task.completed_dates.insert(day("2024-01-05"));
        let first = is_completed(&task, day("2024-01-05"));
        let second = is_completed(&task, day("2024-01-05"));
        assert_eq!(first, second);
    }
}
