//! The task store seam.
//!
//! Commands talk to persistence through [`TaskStore`] so the read and
//! mutation paths can run against any backend. [`Storage`](super::Storage)
//! is the SQLite implementation.

use chrono::NaiveDate;

use crate::Result;
use crate::models::{Category, DayNote, NoteKind, Points, RangeQuery, TaskDefinition};

/// Field changes for an existing task. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub category: Option<String>,
    pub points: Option<Points>,
    pub is_important: Option<bool>,
    pub is_urgent: Option<bool>,
}

impl TaskUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.category.is_none()
            && self.points.is_none()
            && self.is_important.is_none()
            && self.is_urgent.is_none()
    }

    /// Apply the changes to `task` in memory.
    pub fn apply_to(&self, task: &mut TaskDefinition) {
        if let Some(ref title) = self.title {
            task.title = title.trim().to_string();
        }
        if let Some(ref category) = self.category {
            task.category = category.trim().to_string();
        }
        if let Some(points) = self.points {
            task.points = points;
        }
        if let Some(important) = self.is_important {
            task.is_important = important;
        }
        if let Some(urgent) = self.is_urgent {
            task.is_urgent = urgent;
        }
    }
}

/// Persistence for task definitions, categories and day notes.
///
/// Every method is scoped by owner: a task that exists under another owner
/// is reported as not found, and notes of other owners are never returned.
pub trait TaskStore {
    /// Persist a new definition.
    fn create_task(&mut self, task: &TaskDefinition) -> Result<()>;

    /// Fetch one definition.
    fn get_task(&self, owner_id: &str, task_id: &str) -> Result<TaskDefinition>;

    /// Every definition that may have an instance inside the query range:
    /// regular tasks whose window intersects it and spontaneous tasks
    /// anchored in it.
    fn find_active_candidates(&self, query: &RangeQuery) -> Result<Vec<TaskDefinition>>;

    /// Mark a task completed or not on `day`.
    ///
    /// Regular tasks add or remove `day` from their completion set as a
    /// single atomic statement; spontaneous tasks overwrite their flag.
    /// Idempotent either way. Returns the updated definition.
    fn set_completion(
        &mut self,
        owner_id: &str,
        task_id: &str,
        day: NaiveDate,
        completed: bool,
    ) -> Result<TaskDefinition>;

    /// Bound a regular task's active window.
    fn set_end_date(
        &mut self,
        owner_id: &str,
        task_id: &str,
        end_date: NaiveDate,
        archived_on: NaiveDate,
    ) -> Result<TaskDefinition>;

    /// Remove a definition and its completion history.
    fn delete_task(&mut self, owner_id: &str, task_id: &str) -> Result<()>;

    /// Change display fields and weights of a definition.
    fn update_task(
        &mut self,
        owner_id: &str,
        task_id: &str,
        update: &TaskUpdate,
    ) -> Result<TaskDefinition>;

    /// Categories of an owner, sorted case-insensitively by name.
    fn list_categories(&self, owner_id: &str) -> Result<Vec<Category>>;

    /// Register a category, or return the existing one with the same name
    /// (compared case-insensitively). The flag is true when it was created.
    fn add_category(
        &mut self,
        owner_id: &str,
        name: &str,
        color: Option<&str>,
    ) -> Result<(Category, bool)>;

    /// Save the note of `kind` for `day`, replacing any existing content.
    fn set_note(
        &mut self,
        owner_id: &str,
        kind: NoteKind,
        day: NaiveDate,
        content: &str,
    ) -> Result<DayNote>;

    /// The saved note of `kind` for `day`, if any.
    fn get_note(&self, owner_id: &str, kind: NoteKind, day: NaiveDate) -> Result<Option<DayNote>>;

    /// Saved notes inside the query range, ordered by date then kind.
    /// `kind` of `None` returns both kinds.
    fn list_notes(&self, query: &RangeQuery, kind: Option<NoteKind>) -> Result<Vec<DayNote>>;
}
