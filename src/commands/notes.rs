//! Journal and gratitude notes, one of each per day.

use chrono::NaiveDate;
use serde::Serialize;

use super::{Output, json};
use crate::Result;
use crate::models::{DateRange, DayNote, NoteKind, RangeQuery, format_day};
use crate::storage::TaskStore;

#[derive(Serialize)]
pub struct NoteResult {
    #[serde(flatten)]
    pub note: DayNote,
}

impl Output for NoteResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let n = &self.note;
        if n.is_empty() {
            format!("No {} entry for {}.", n.kind, format_day(n.date))
        } else {
            format!("{} {}:\n{}", n.kind.label(), format_day(n.date), n.content)
        }
    }
}

/// Save the note of `kind` for `day`, replacing any earlier one.
pub fn note_set<S: TaskStore>(
    store: &mut S,
    owner_id: &str,
    kind: NoteKind,
    day: NaiveDate,
    content: &str,
) -> Result<NoteResult> {
    Ok(NoteResult {
        note: store.set_note(owner_id, kind, day, content)?,
    })
}

/// The note of `kind` for `day`; empty when none was saved.
pub fn note_show<S: TaskStore>(
    store: &S,
    owner_id: &str,
    kind: NoteKind,
    day: NaiveDate,
) -> Result<NoteResult> {
    let note = store
        .get_note(owner_id, kind, day)?
        .unwrap_or_else(|| DayNote::empty(owner_id.to_string(), kind, day));
    Ok(NoteResult { note })
}

#[derive(Serialize)]
pub struct NoteListResult {
    pub kind: NoteKind,
    pub range: DateRange,
    pub notes: Vec<DayNote>,
    pub count: usize,
}

impl Output for NoteListResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.notes.is_empty() {
            return format!(
                "No {} entries {} .. {}.",
                self.kind,
                format_day(self.range.start()),
                format_day(self.range.end())
            );
        }
        self.notes
            .iter()
            .map(|n| format!("{}:\n  {}", format_day(n.date), n.content.replace('\n', "\n  ")))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Saved notes of `kind` inside the query range.
pub fn note_list<S: TaskStore>(
    store: &S,
    query: &RangeQuery,
    kind: NoteKind,
) -> Result<NoteListResult> {
    let notes = store.list_notes(query, Some(kind))?;
    Ok(NoteListResult {
        kind,
        range: query.range(),
        count: notes.len(),
        notes,
    })
}
