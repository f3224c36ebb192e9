//! Storage layer for Daytally data.
//!
//! Task definitions, their completion history and categories live in a single
//! SQLite database (`daytally.db`) inside the data directory:
//!
//! - `--data-dir` flag / `DT_DATA_DIR` environment variable, or
//! - `~/.local/share/daytally/` (platform data dir) by default.
//!
//! Journal and gratitude notes live in `day_notes`, one row per owner, kind
//! and day; saving one is a single upsert.
//!
//! Dates are stored as canonical `YYYY-MM-DD` text, so range predicates are
//! plain string comparisons. Regular-task completions are rows of
//! `task_completions` keyed by `(task_id, day)`; toggling one is a single
//! `INSERT OR IGNORE` or `DELETE`, never a rewrite of the whole set.
//!
//! The schema is versioned with `PRAGMA user_version` and upgraded by the
//! ordered steps in [`MIGRATIONS`].

pub mod backend;

pub use backend::{TaskStore, TaskUpdate};

use crate::models::{
    Category, DayNote, NoteKind, Points, RangeQuery, TaskDefinition, TaskKind, format_day,
    parse_day,
};
use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "DT_DATA_DIR";

/// Database file name inside the data directory.
pub const DB_FILE: &str = "daytally.db";

/// Schema upgrade steps. Step `i` moves the database to `user_version = i + 1`.
const MIGRATIONS: &[&str] = &[
    // 1: base schema
    r#"
    CREATE TABLE tasks (
        id TEXT PRIMARY KEY,
        owner_id TEXT NOT NULL,
        title TEXT NOT NULL,
        category TEXT NOT NULL,
        kind TEXT NOT NULL,
        points INTEGER NOT NULL DEFAULT 1,
        is_important INTEGER NOT NULL DEFAULT 0,
        is_urgent INTEGER NOT NULL DEFAULT 0,
        anchor_date TEXT NOT NULL,
        end_date TEXT,
        is_completed INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE TABLE task_completions (
        task_id TEXT NOT NULL,
        day TEXT NOT NULL,
        PRIMARY KEY (task_id, day),
        FOREIGN KEY (task_id) REFERENCES tasks(id) ON DELETE CASCADE
    );

    CREATE TABLE categories (
        owner_id TEXT NOT NULL,
        name TEXT NOT NULL COLLATE NOCASE,
        color TEXT,
        created_at TEXT NOT NULL,
        PRIMARY KEY (owner_id, name)
    );

    CREATE INDEX idx_tasks_owner_kind_anchor ON tasks(owner_id, kind, anchor_date);
    "#,
    // 2: archival marker for regular tasks
    "ALTER TABLE tasks ADD COLUMN archived_on TEXT;",
    // 3: journal and gratitude notes
    r#"
    CREATE TABLE day_notes (
        owner_id TEXT NOT NULL,
        kind TEXT NOT NULL,
        day TEXT NOT NULL,
        content TEXT NOT NULL DEFAULT '',
        updated_at TEXT NOT NULL,
        PRIMARY KEY (owner_id, kind, day)
    );
    "#,
];

const NOTE_COLUMNS: &str = "owner_id, kind, day, content, updated_at";

const TASK_COLUMNS: &str = "id, owner_id, title, category, kind, points, is_important, is_urgent, \
     anchor_date, end_date, archived_on, is_completed, created_at, updated_at";

/// SQLite-backed task store.
pub struct Storage {
    /// Data directory holding the database, or `None` for an in-memory store
    pub root: Option<PathBuf>,
    conn: Connection,
}

impl Storage {
    /// Open an existing store in `data_dir`.
    pub fn open(data_dir: &Path) -> Result<Self> {
        if !Self::exists(data_dir) {
            return Err(Error::NotInitialized);
        }
        let conn = Connection::open(data_dir.join(DB_FILE))?;
        Self::prepare(conn, Some(data_dir.to_path_buf()))
    }

    /// Create (or reopen) a store in `data_dir`.
    pub fn init(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir)?;
        let conn = Connection::open(data_dir.join(DB_FILE))?;
        Self::prepare(conn, Some(data_dir.to_path_buf()))
    }

    /// A throwaway store, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        Self::prepare(Connection::open_in_memory()?, None)
    }

    /// Check if a store exists in `data_dir`.
    pub fn exists(data_dir: &Path) -> bool {
        data_dir.join(DB_FILE).exists()
    }

    fn prepare(conn: Connection, root: Option<PathBuf>) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", true)?;
        let mut storage = Self { root, conn };
        storage.run_migrations()?;
        Ok(storage)
    }

    /// Bring the schema up to the latest version.
    fn run_migrations(&mut self) -> Result<()> {
        let current = self.schema_version()?;
        let tx = self.conn.transaction()?;
        for (index, step) in MIGRATIONS.iter().enumerate().skip(current as usize) {
            tx.execute_batch(step)?;
            tx.pragma_update(None, "user_version", (index + 1) as i64)?;
            tracing::debug!(version = index + 1, "applied schema migration");
        }
        tx.commit()?;
        Ok(())
    }

    /// Current schema version.
    pub fn schema_version(&self) -> Result<u32> {
        let version: i64 = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?;
        Ok(version as u32)
    }

    /// Latest schema version this build knows about.
    pub fn latest_schema_version() -> u32 {
        MIGRATIONS.len() as u32
    }

    /// Load the completion set of a regular task.
    fn completed_dates(&self, task_id: &str) -> Result<BTreeSet<NaiveDate>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT day FROM task_completions WHERE task_id = ?1 ORDER BY day")?;
        let days: Vec<String> = stmt
            .query_map([task_id], |row| row.get(0))?
            .collect::<rusqlite::Result<_>>()?;
        days.iter().map(|d| parse_day(d)).collect()
    }

    fn hydrate(&self, row: TaskRow) -> Result<TaskDefinition> {
        let mut task = row.into_definition()?;
        if task.is_regular() {
            task.completed_dates = self.completed_dates(&task.id)?;
        }
        Ok(task)
    }

    /// Check the task exists for this owner and return its kind.
    fn task_kind(&self, owner_id: &str, task_id: &str) -> Result<TaskKind> {
        let kind: Option<String> = self
            .conn
            .query_row(
                "SELECT kind FROM tasks WHERE id = ?1 AND owner_id = ?2",
                params![task_id, owner_id],
                |row| row.get(0),
            )
            .optional()?;
        match kind {
            Some(kind) => TaskKind::parse(&kind),
            None => Err(not_found(task_id)),
        }
    }

    fn touch(&self, task_id: &str) -> Result<()> {
        self.conn.execute(
            "UPDATE tasks SET updated_at = ?1 WHERE id = ?2",
            params![Utc::now().to_rfc3339(), task_id],
        )?;
        Ok(())
    }

    fn ensure_category(&self, owner_id: &str, name: &str, color: Option<&str>) -> Result<bool> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO categories (owner_id, name, color, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![owner_id, name, color, Utc::now().to_rfc3339()],
        )?;
        Ok(inserted > 0)
    }
}

impl TaskStore for Storage {
    fn create_task(&mut self, task: &TaskDefinition) -> Result<()> {
        task.validate()?;

        let tx = self.conn.transaction()?;
        tx.execute(
            &format!(
                "INSERT INTO tasks ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                TASK_COLUMNS
            ),
            params![
                task.id,
                task.owner_id,
                task.title,
                task.category,
                task.kind.as_str(),
                task.points.get(),
                task.is_important,
                task.is_urgent,
                format_day(task.anchor_date),
                task.end_date.map(format_day),
                task.archived_on.map(format_day),
                task.is_completed,
                task.created_at.to_rfc3339(),
                task.updated_at.to_rfc3339(),
            ],
        )?;
        if task.is_regular() {
            for day in &task.completed_dates {
                tx.execute(
                    "INSERT OR IGNORE INTO task_completions (task_id, day) VALUES (?1, ?2)",
                    params![task.id, format_day(*day)],
                )?;
            }
        }
        tx.execute(
            "INSERT OR IGNORE INTO categories (owner_id, name, created_at) VALUES (?1, ?2, ?3)",
            params![task.owner_id, task.category, Utc::now().to_rfc3339()],
        )?;
        tx.commit()?;

        tracing::debug!(task_id = %task.id, kind = %task.kind, "created task");
        Ok(())
    }

    fn get_task(&self, owner_id: &str, task_id: &str) -> Result<TaskDefinition> {
        let row = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM tasks WHERE id = ?1 AND owner_id = ?2",
                    TASK_COLUMNS
                ),
                params![task_id, owner_id],
                TaskRow::from_row,
            )
            .optional()?
            .ok_or_else(|| not_found(task_id))?;
        self.hydrate(row)
    }

    fn find_active_candidates(&self, query: &RangeQuery) -> Result<Vec<TaskDefinition>> {
        let range = query.range();
        // Regular tasks with an end before their anchor are included so the
        // expander can classify them instead of them vanishing here.
        let sql = format!(
            "SELECT {} FROM tasks
             WHERE owner_id = ?1
               AND ((kind = 'regular' AND anchor_date <= ?3
                     AND (end_date IS NULL OR end_date >= ?2 OR end_date < anchor_date))
                 OR (kind = 'spontaneous' AND anchor_date >= ?2 AND anchor_date <= ?3))
             ORDER BY created_at ASC, id ASC",
            TASK_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows: Vec<TaskRow> = stmt
            .query_map(
                params![
                    query.owner_id(),
                    format_day(range.start()),
                    format_day(range.end())
                ],
                TaskRow::from_row,
            )?
            .collect::<rusqlite::Result<_>>()?;

        rows.into_iter().map(|row| self.hydrate(row)).collect()
    }

    fn set_completion(
        &mut self,
        owner_id: &str,
        task_id: &str,
        day: NaiveDate,
        completed: bool,
    ) -> Result<TaskDefinition> {
        match self.task_kind(owner_id, task_id)? {
            TaskKind::Regular if completed => {
                self.conn.execute(
                    "INSERT OR IGNORE INTO task_completions (task_id, day) VALUES (?1, ?2)",
                    params![task_id, format_day(day)],
                )?;
            }
            TaskKind::Regular => {
                self.conn.execute(
                    "DELETE FROM task_completions WHERE task_id = ?1 AND day = ?2",
                    params![task_id, format_day(day)],
                )?;
            }
            TaskKind::Spontaneous => {
                self.conn.execute(
                    "UPDATE tasks SET is_completed = ?1 WHERE id = ?2 AND owner_id = ?3",
                    params![completed, task_id, owner_id],
                )?;
            }
        }
        self.touch(task_id)?;

        tracing::debug!(task_id, day = %day, completed, "set completion");
        self.get_task(owner_id, task_id)
    }

    fn set_end_date(
        &mut self,
        owner_id: &str,
        task_id: &str,
        end_date: NaiveDate,
        archived_on: NaiveDate,
    ) -> Result<TaskDefinition> {
        let updated = self.conn.execute(
            "UPDATE tasks SET end_date = ?1, archived_on = ?2, updated_at = ?3
             WHERE id = ?4 AND owner_id = ?5 AND kind = 'regular'",
            params![
                format_day(end_date),
                format_day(archived_on),
                Utc::now().to_rfc3339(),
                task_id,
                owner_id
            ],
        )?;
        if updated == 0 {
            return Err(not_found(task_id));
        }

        tracing::debug!(task_id, end_date = %end_date, "archived task");
        self.get_task(owner_id, task_id)
    }

    fn delete_task(&mut self, owner_id: &str, task_id: &str) -> Result<()> {
        let deleted = self.conn.execute(
            "DELETE FROM tasks WHERE id = ?1 AND owner_id = ?2",
            params![task_id, owner_id],
        )?;
        if deleted == 0 {
            return Err(not_found(task_id));
        }

        tracing::debug!(task_id, "deleted task");
        Ok(())
    }

    fn update_task(
        &mut self,
        owner_id: &str,
        task_id: &str,
        update: &TaskUpdate,
    ) -> Result<TaskDefinition> {
        let mut task = self.get_task(owner_id, task_id)?;
        if update.is_empty() {
            return Ok(task);
        }
        update.apply_to(&mut task);
        task.validate()?;
        task.updated_at = Utc::now();

        self.conn.execute(
            "UPDATE tasks SET title = ?1, category = ?2, points = ?3, is_important = ?4,
                              is_urgent = ?5, updated_at = ?6
             WHERE id = ?7 AND owner_id = ?8",
            params![
                task.title,
                task.category,
                task.points.get(),
                task.is_important,
                task.is_urgent,
                task.updated_at.to_rfc3339(),
                task.id,
                task.owner_id,
            ],
        )?;
        self.ensure_category(owner_id, &task.category, None)?;
        Ok(task)
    }

    fn list_categories(&self, owner_id: &str) -> Result<Vec<Category>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, color, owner_id, created_at FROM categories
             WHERE owner_id = ?1 ORDER BY name COLLATE NOCASE",
        )?;
        let rows: Vec<(String, Option<String>, String, String)> = stmt
            .query_map([owner_id], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
            })?
            .collect::<rusqlite::Result<_>>()?;

        rows.into_iter()
            .map(|(name, color, owner_id, created_at)| {
                Ok(Category {
                    name,
                    color,
                    owner_id,
                    created_at: parse_timestamp(&created_at)?,
                })
            })
            .collect()
    }

    fn add_category(
        &mut self,
        owner_id: &str,
        name: &str,
        color: Option<&str>,
    ) -> Result<(Category, bool)> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidInput("category name must not be empty".to_string()));
        }
        let created = self.ensure_category(owner_id, name, color)?;

        let (name, color, created_at): (String, Option<String>, String) = self.conn.query_row(
            "SELECT name, color, created_at FROM categories WHERE owner_id = ?1 AND name = ?2",
            params![owner_id, name],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;
        let mut category = Category::new(owner_id.to_string(), name, color);
        category.created_at = parse_timestamp(&created_at)?;
        Ok((category, created))
    }

    fn set_note(
        &mut self,
        owner_id: &str,
        kind: NoteKind,
        day: NaiveDate,
        content: &str,
    ) -> Result<DayNote> {
        if owner_id.trim().is_empty() {
            return Err(Error::InvalidInput("owner must not be empty".to_string()));
        }
        let now = Utc::now();
        let note = DayNote {
            owner_id: owner_id.to_string(),
            kind,
            date: day,
            content: content.trim().to_string(),
            updated_at: Some(now),
        };
        self.conn.execute(
            &format!(
                "INSERT INTO day_notes ({}) VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT (owner_id, kind, day)
                 DO UPDATE SET content = excluded.content, updated_at = excluded.updated_at",
                NOTE_COLUMNS
            ),
            params![
                note.owner_id,
                kind.as_str(),
                format_day(day),
                note.content,
                now.to_rfc3339(),
            ],
        )?;

        tracing::debug!(kind = %kind, day = %day, "saved note");
        Ok(note)
    }

    fn get_note(&self, owner_id: &str, kind: NoteKind, day: NaiveDate) -> Result<Option<DayNote>> {
        let row = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM day_notes WHERE owner_id = ?1 AND kind = ?2 AND day = ?3",
                    NOTE_COLUMNS
                ),
                params![owner_id, kind.as_str(), format_day(day)],
                NoteRow::from_row,
            )
            .optional()?;
        row.map(NoteRow::into_note).transpose()
    }

    fn list_notes(&self, query: &RangeQuery, kind: Option<NoteKind>) -> Result<Vec<DayNote>> {
        let range = query.range();
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM day_notes
             WHERE owner_id = ?1 AND day >= ?2 AND day <= ?3 AND (?4 IS NULL OR kind = ?4)
             ORDER BY day ASC, kind ASC",
            NOTE_COLUMNS
        ))?;
        let rows: Vec<NoteRow> = stmt
            .query_map(
                params![
                    query.owner_id(),
                    format_day(range.start()),
                    format_day(range.end()),
                    kind.map(|k| k.as_str()),
                ],
                NoteRow::from_row,
            )?
            .collect::<rusqlite::Result<_>>()?;

        rows.into_iter().map(NoteRow::into_note).collect()
    }
}

/// A `day_notes` row as stored, before parsing.
struct NoteRow {
    owner_id: String,
    kind: String,
    day: String,
    content: String,
    updated_at: String,
}

impl NoteRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            owner_id: row.get(0)?,
            kind: row.get(1)?,
            day: row.get(2)?,
            content: row.get(3)?,
            updated_at: row.get(4)?,
        })
    }

    fn into_note(self) -> Result<DayNote> {
        Ok(DayNote {
            kind: NoteKind::parse(&self.kind)?,
            date: parse_day(&self.day)?,
            updated_at: Some(parse_timestamp(&self.updated_at)?),
            owner_id: self.owner_id,
            content: self.content,
        })
    }
}

/// A `tasks` row as stored, before parsing.
struct TaskRow {
    id: String,
    owner_id: String,
    title: String,
    category: String,
    kind: String,
    points: u8,
    is_important: bool,
    is_urgent: bool,
    anchor_date: String,
    end_date: Option<String>,
    archived_on: Option<String>,
    is_completed: bool,
    created_at: String,
    updated_at: String,
}

impl TaskRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            owner_id: row.get(1)?,
            title: row.get(2)?,
            category: row.get(3)?,
            kind: row.get(4)?,
            points: row.get(5)?,
            is_important: row.get(6)?,
            is_urgent: row.get(7)?,
            anchor_date: row.get(8)?,
            end_date: row.get(9)?,
            archived_on: row.get(10)?,
            is_completed: row.get(11)?,
            created_at: row.get(12)?,
            updated_at: row.get(13)?,
        })
    }

    fn into_definition(self) -> Result<TaskDefinition> {
        Ok(TaskDefinition {
            kind: TaskKind::parse(&self.kind)?,
            points: Points::new(self.points)?,
            anchor_date: parse_day(&self.anchor_date)?,
            end_date: self.end_date.as_deref().map(parse_day).transpose()?,
            archived_on: self.archived_on.as_deref().map(parse_day).transpose()?,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
            completed_dates: BTreeSet::new(),
            id: self.id,
            owner_id: self.owner_id,
            title: self.title,
            category: self.category,
            is_important: self.is_important,
            is_urgent: self.is_urgent,
            is_completed: self.is_completed,
        })
    }
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Other(format!("Invalid stored timestamp {}: {}", s, e)))
}

fn not_found(task_id: &str) -> Error {
    Error::NotFound(format!("task {}", task_id))
}

/// Resolve the data directory.
///
/// Precedence: explicit path (flag or `DT_DATA_DIR`, both resolved by the
/// CLI) > platform data dir + `daytally`.
pub fn get_data_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    let data_dir = dirs::data_dir()
        .ok_or_else(|| Error::Other("Could not determine data directory".to_string()))?;
    Ok(data_dir.join("daytally"))
}

/// Generate a unique ID for a task.
///
/// Format: `<prefix>-<6 hex chars>`
pub fn generate_id(prefix: &str, seed: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(seed.as_bytes());
    hasher.update(
        chrono::Utc::now()
            .timestamp_nanos_opt()
            .unwrap_or(0)
            .to_le_bytes(),
    );
    let hash = hasher.finalize();
    let hash_hex = format!("{:x}", hash);
    format!("{}-{}", prefix, &hash_hex[..6])
}

/// Validate that an ID matches the expected format.
pub fn validate_id(id: &str, prefix: &str) -> Result<()> {
    if !id.starts_with(&format!("{}-", prefix)) {
        return Err(Error::InvalidId(format!(
            "ID must start with '{}-', got: {}",
            prefix, id
        )));
    }

    let suffix = &id[prefix.len() + 1..];
    if suffix.len() != 6 || !suffix.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::InvalidId(format!(
            "ID suffix must be 6 hex characters, got: {}",
            suffix
        )));
    }

    Ok(())
}

/// Validate a task ID (dt-xxxxxx format).
pub fn validate_task_id(id: &str) -> Result<()> {
    validate_id(id, "dt")
}
