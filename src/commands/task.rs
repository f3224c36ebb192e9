//! Task commands: creation, edits, completion toggles, archival and listing.

use chrono::NaiveDate;
use serde::Serialize;

use super::{Context, Output, check, flags, json, load_instances};
use crate::engine::{self, Action};
use crate::models::{
    DateRange, Points, RangeQuery, TaskDefinition, TaskInstance, TaskKind, format_day,
};
use crate::storage::{TaskStore, TaskUpdate, generate_id, validate_task_id};
use crate::{Error, Result};

/// Arguments of `dt task add`.
#[derive(Debug, Clone, Default)]
pub struct TaskNew {
    pub title: String,
    pub category: Option<String>,
    pub regular: bool,
    pub points: Option<u8>,
    pub important: bool,
    pub urgent: bool,
    pub date: Option<String>,
}

#[derive(Serialize)]
pub struct TaskAddResult {
    pub id: String,
    pub title: String,
    pub kind: TaskKind,
    pub anchor_date: NaiveDate,
}

impl Output for TaskAddResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        format!(
            "Created {} task {} \"{}\" starting {}",
            self.kind,
            self.id,
            self.title,
            format_day(self.anchor_date)
        )
    }
}

/// Create a task definition for the context owner.
pub fn task_add<S: TaskStore>(store: &mut S, ctx: &Context, new: TaskNew) -> Result<TaskAddResult> {
    let points = match new.points {
        Some(p) => Points::new(p)?,
        None => ctx.config.default_points(),
    };
    let category = new
        .category
        .unwrap_or_else(|| ctx.config.default_category().to_string());
    let kind = if new.regular {
        TaskKind::Regular
    } else {
        TaskKind::Spontaneous
    };
    let anchor_date = ctx.day(new.date.as_deref())?;

    let id = unique_id(store, ctx.owner(), &new.title)?;
    let mut task = TaskDefinition::new(
        id,
        ctx.owner().to_string(),
        new.title.trim().to_string(),
        category.trim().to_string(),
        kind,
        anchor_date,
    );
    task.points = points;
    task.is_important = new.important;
    task.is_urgent = new.urgent;

    store.create_task(&task)?;

    Ok(TaskAddResult {
        id: task.id,
        title: task.title,
        kind: task.kind,
        anchor_date: task.anchor_date,
    })
}

/// Generate an ID not yet used by this owner.
fn unique_id<S: TaskStore>(store: &S, owner_id: &str, seed: &str) -> Result<String> {
    let mut attempt = 0u32;
    loop {
        let id = generate_id("dt", &format!("{}:{}:{}", owner_id, seed, attempt));
        match store.get_task(owner_id, &id) {
            Err(Error::NotFound(_)) => return Ok(id),
            Ok(_) => attempt += 1,
            Err(e) => return Err(e),
        }
    }
}

#[derive(Serialize)]
pub struct TaskShowResult {
    #[serde(flatten)]
    pub task: TaskDefinition,
}

impl Output for TaskShowResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let t = &self.task;
        let mut lines = vec![
            format!("{} {}{}", t.id, t.title, flags(t.is_important, t.is_urgent)),
            format!("  Kind:     {}", t.kind),
            format!("  Category: {}", t.category),
            format!("  Points:   {}", t.points),
            format!("  Quadrant: {}", t.quadrant().label()),
        ];
        match t.kind {
            TaskKind::Spontaneous => {
                lines.push(format!("  Date:     {}", format_day(t.anchor_date)));
                lines.push(format!("  Done:     {}", if t.is_completed { "yes" } else { "no" }));
            }
            TaskKind::Regular => {
                let end = t.end_date.map(format_day).unwrap_or_else(|| "open".to_string());
                lines.push(format!("  Active:   {} .. {}", format_day(t.anchor_date), end));
                if let Some(archived_on) = t.archived_on {
                    lines.push(format!("  Archived: {}", format_day(archived_on)));
                }
                lines.push(format!("  Done on:  {} day(s)", t.completed_dates.len()));
            }
        }
        lines.join("\n")
    }
}

pub fn task_show<S: TaskStore>(store: &S, owner_id: &str, task_id: &str) -> Result<TaskShowResult> {
    validate_task_id(task_id)?;
    Ok(TaskShowResult {
        task: store.get_task(owner_id, task_id)?,
    })
}

pub fn task_update<S: TaskStore>(
    store: &mut S,
    owner_id: &str,
    task_id: &str,
    update: TaskUpdate,
) -> Result<TaskShowResult> {
    validate_task_id(task_id)?;
    if update.is_empty() {
        return Err(Error::InvalidInput(
            "nothing to update: pass --title, --category, --points, --important or --urgent"
                .to_string(),
        ));
    }
    Ok(TaskShowResult {
        task: store.update_task(owner_id, task_id, &update)?,
    })
}

#[derive(Serialize)]
pub struct CompletionResult {
    pub id: String,
    pub date: NaiveDate,
    pub completed: bool,
}

impl Output for CompletionResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let state = if self.completed { "done" } else { "not done" };
        format!("Marked {} {} on {}", self.id, state, format_day(self.date))
    }
}

/// Mark a task completed or not on `day`.
///
/// A regular task can only be completed on a day it is active.
pub fn task_set_completion<S: TaskStore>(
    store: &mut S,
    owner_id: &str,
    task_id: &str,
    day: NaiveDate,
    completed: bool,
) -> Result<CompletionResult> {
    validate_task_id(task_id)?;
    let task = store.get_task(owner_id, task_id)?;
    if completed && task.is_regular() && !engine::active_window(&task).is_active_on(day) {
        return Err(Error::InvalidInput(format!(
            "Task {} is not active on {}",
            task_id,
            format_day(day)
        )));
    }

    let updated = store.set_completion(owner_id, task_id, day, completed)?;
    Ok(CompletionResult {
        completed: engine::is_completed(&updated, day),
        id: updated.id,
        date: day,
    })
}

#[derive(Serialize)]
pub struct ArchiveResult {
    pub id: String,
    #[serde(flatten)]
    pub action: Action,
}

impl Output for ArchiveResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        match self.action {
            Action::HardDelete => format!("Deleted {}", self.id),
            Action::SetEndDate {
                end_date,
                archived_on,
            } => format!(
                "Archived {} from {} (last active day {})",
                self.id,
                format_day(archived_on),
                format_day(end_date)
            ),
        }
    }
}

/// Delete a task as seen from `context_date`.
///
/// Regular tasks with a context date keep their history and stop appearing
/// from that date on; everything else is removed.
pub fn archive_or_delete<S: TaskStore>(
    store: &mut S,
    owner_id: &str,
    task_id: &str,
    context_date: Option<NaiveDate>,
) -> Result<ArchiveResult> {
    validate_task_id(task_id)?;
    let task = store.get_task(owner_id, task_id)?;
    let action = engine::plan_deletion(&task, context_date);

    match action {
        Action::HardDelete => store.delete_task(owner_id, task_id)?,
        Action::SetEndDate {
            end_date,
            archived_on,
        } => {
            store.set_end_date(owner_id, task_id, end_date, archived_on)?;
        }
    }

    Ok(ArchiveResult {
        id: task.id,
        action,
    })
}

#[derive(Serialize)]
pub struct TaskListResult {
    pub range: DateRange,
    pub instances: Vec<TaskInstance>,
    pub count: usize,
}

impl Output for TaskListResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.instances.is_empty() {
            return "No tasks.".to_string();
        }
        let mut lines = Vec::new();
        let mut current: Option<NaiveDate> = None;
        for instance in &self.instances {
            if current != Some(instance.date) {
                current = Some(instance.date);
                lines.push(format!("{}:", format_day(instance.date)));
            }
            lines.push(format_instance(instance));
        }
        lines.join("\n")
    }
}

pub(crate) fn format_instance(instance: &TaskInstance) -> String {
    format!(
        "  {} {} {} ({}, {}p){}",
        check(instance.completed),
        instance.task_id,
        instance.title,
        instance.category,
        instance.points,
        flags(instance.is_important, instance.is_urgent)
    )
}

pub fn task_list<S: TaskStore>(store: &S, query: &RangeQuery) -> Result<TaskListResult> {
    let instances = load_instances(store, query)?;
    Ok(TaskListResult {
        range: query.range(),
        count: instances.len(),
        instances,
    })
}
