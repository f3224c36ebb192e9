//! Data models for Daytally entities.
//!
//! This module defines the core data structures:
//! - `TaskDefinition` - A stored task, either recurring (`Regular`) or one-off (`Spontaneous`)
//! - `TaskInstance` - One definition's presence on one calendar day (derived, never stored)
//! - `Category` - A named grouping for tasks
//! - `Quadrant` - Eisenhower priority bucket
//! - `DayNote` - A per-day journal or gratitude entry
//!
//! Calendar helpers (`DateRange`, `RangeQuery`, day parsing) live in [`dates`].

pub mod dates;

pub use dates::{DateRange, RangeQuery, format_day, parse_day};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::{Error, Result};

/// How a task recurs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Active every day from its anchor date until an optional end date.
    Regular,
    /// Exists on its anchor date only.
    #[default]
    Spontaneous,
}

impl TaskKind {
    /// Parse from string, case-insensitive.
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "regular" | "recurring" => Ok(TaskKind::Regular),
            "spontaneous" | "once" | "one-off" => Ok(TaskKind::Spontaneous),
            _ => Err(Error::InvalidInput(format!("Invalid task kind: {}", s))),
        }
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Regular => "regular",
            TaskKind::Spontaneous => "spontaneous",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Weight of a task in every aggregation (1, 2 or 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Points(u8);

impl Points {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 3;

    /// Create a point weight, rejecting values outside 1..=3.
    pub fn new(value: u8) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(Error::InvalidInput(format!(
                "points must be {}-{}, got {}",
                Self::MIN,
                Self::MAX,
                value
            )))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Points {
    fn default() -> Self {
        Self(1)
    }
}

impl TryFrom<u8> for Points {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Points> for u8 {
    fn from(points: Points) -> u8 {
        points.0
    }
}

impl fmt::Display for Points {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored task definition.
///
/// Only one of `completed_dates` / `is_completed` is meaningful, depending on
/// `kind`. The other field is carried but ignored by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDefinition {
    /// Unique identifier (e.g., "dt-a1b2c3")
    pub id: String,

    /// Owning user; every query and mutation is scoped by it
    pub owner_id: String,

    /// Display title
    pub title: String,

    /// Free-form grouping tag
    pub category: String,

    /// Recurrence kind
    pub kind: TaskKind,

    /// Aggregation weight
    #[serde(default)]
    pub points: Points,

    #[serde(default)]
    pub is_important: bool,

    #[serde(default)]
    pub is_urgent: bool,

    /// First active day (regular) or the only day (spontaneous)
    pub anchor_date: NaiveDate,

    /// Last active day, inclusive (regular only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,

    /// Context date of the archival that set `end_date` (regular only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived_on: Option<NaiveDate>,

    /// Days on which a regular task was completed
    #[serde(default)]
    pub completed_dates: BTreeSet<NaiveDate>,

    /// Completion flag for a spontaneous task
    #[serde(default)]
    pub is_completed: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl TaskDefinition {
    /// Create a new task definition with default points and flags.
    pub fn new(
        id: String,
        owner_id: String,
        title: String,
        category: String,
        kind: TaskKind,
        anchor_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            owner_id,
            title,
            category,
            kind,
            points: Points::default(),
            is_important: false,
            is_urgent: false,
            anchor_date,
            end_date: None,
            archived_on: None,
            completed_dates: BTreeSet::new(),
            is_completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_regular(&self) -> bool {
        self.kind == TaskKind::Regular
    }

    /// The priority quadrant this task falls into.
    pub fn quadrant(&self) -> Quadrant {
        Quadrant::classify(self.is_important, self.is_urgent)
    }

    /// Check the fields every stored definition must satisfy.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::InvalidInput("title must not be empty".to_string()));
        }
        if self.category.trim().is_empty() {
            return Err(Error::InvalidInput("category must not be empty".to_string()));
        }
        if self.owner_id.trim().is_empty() {
            return Err(Error::InvalidInput("owner must not be empty".to_string()));
        }
        Ok(())
    }
}

/// One task definition materialized on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskInstance {
    pub task_id: String,
    pub kind: TaskKind,
    pub title: String,
    pub category: String,
    pub points: Points,
    pub is_important: bool,
    pub is_urgent: bool,
    /// The day this instance represents
    pub date: NaiveDate,
    /// Completion resolved for `date`
    pub completed: bool,
}

impl TaskInstance {
    pub fn quadrant(&self) -> Quadrant {
        Quadrant::classify(self.is_important, self.is_urgent)
    }
}

/// Eisenhower priority bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quadrant {
    ImportantUrgent,
    ImportantNotUrgent,
    NotImportantUrgent,
    NotImportantNotUrgent,
}

impl Quadrant {
    /// All quadrants in display order.
    pub const ALL: [Quadrant; 4] = [
        Quadrant::ImportantUrgent,
        Quadrant::ImportantNotUrgent,
        Quadrant::NotImportantUrgent,
        Quadrant::NotImportantNotUrgent,
    ];

    pub fn classify(is_important: bool, is_urgent: bool) -> Self {
        match (is_important, is_urgent) {
            (true, true) => Quadrant::ImportantUrgent,
            (true, false) => Quadrant::ImportantNotUrgent,
            (false, true) => Quadrant::NotImportantUrgent,
            (false, false) => Quadrant::NotImportantNotUrgent,
        }
    }

    /// Parse from string, accepting `-` or `_` separators.
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "important_urgent" => Ok(Quadrant::ImportantUrgent),
            "important_not_urgent" => Ok(Quadrant::ImportantNotUrgent),
            "not_important_urgent" => Ok(Quadrant::NotImportantUrgent),
            "not_important_not_urgent" => Ok(Quadrant::NotImportantNotUrgent),
            _ => Err(Error::InvalidInput(format!("Invalid quadrant: {}", s))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Quadrant::ImportantUrgent => "important_urgent",
            Quadrant::ImportantNotUrgent => "important_not_urgent",
            Quadrant::NotImportantUrgent => "not_important_urgent",
            Quadrant::NotImportantNotUrgent => "not_important_not_urgent",
        }
    }

    /// Title used in human-readable output.
    pub fn label(&self) -> &'static str {
        match self {
            Quadrant::ImportantUrgent => "Important & Urgent",
            Quadrant::ImportantNotUrgent => "Important & Not Urgent",
            Quadrant::NotImportantUrgent => "Not Important & Urgent",
            Quadrant::NotImportantNotUrgent => "Not Important & Not Urgent",
        }
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named task category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    pub owner_id: String,

    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(owner_id: String, name: String, color: Option<String>) -> Self {
        Self {
            name,
            color,
            owner_id,
            created_at: Utc::now(),
        }
    }
}

/// Kind of free-text note kept once per day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteKind {
    Gratitude,
    Journal,
}

impl NoteKind {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "gratitude" => Ok(NoteKind::Gratitude),
            "journal" => Ok(NoteKind::Journal),
            _ => Err(Error::InvalidInput(format!("Invalid note kind: {}", s))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NoteKind::Gratitude => "gratitude",
            NoteKind::Journal => "journal",
        }
    }

    /// Title used in human-readable output.
    pub fn label(&self) -> &'static str {
        match self {
            NoteKind::Gratitude => "Gratitude",
            NoteKind::Journal => "Journal",
        }
    }
}

impl fmt::Display for NoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A journal or gratitude entry for one day.
///
/// There is at most one note per owner, kind and day. A day without a saved
/// note reads as an empty one with no `updated_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayNote {
    pub owner_id: String,
    pub kind: NoteKind,
    pub date: NaiveDate,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl DayNote {
    /// The placeholder returned for a day with no saved note.
    pub fn empty(owner_id: String, kind: NoteKind, date: NaiveDate) -> Self {
        Self {
            owner_id,
            kind,
            date,
            content: String::new(),
            updated_at: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}
