//! Command implementations for the Daytally CLI.
//!
//! Each command returns a result struct implementing [`Output`], rendered as
//! JSON by default or as text with `-H`. Commands are grouped by area:
//! - `task` - task CRUD, completion toggles, archival and instance listing
//! - `stats` - the week view and every aggregation
//! - `notes` - journal and gratitude entries
//! - `system` - init/info, categories and configuration

pub mod notes;
pub mod stats;
pub mod system;
pub mod task;

pub use notes::{NoteListResult, NoteResult, note_list, note_set, note_show};
pub use stats::{
    CategoriesResult, DailyResult, QuadrantsResult, SummaryResult, TaskRatesResult, WeekResult,
    stats_categories, stats_daily, stats_quadrants, stats_summary, stats_tasks, week,
};
pub use system::{
    CategoryAddResult, CategoryListResult, ConfigSetResult, ConfigShowResult, InfoResult,
    InitResult, category_add, category_list, config_set, config_show, info, init,
};
pub use task::{
    ArchiveResult, CompletionResult, TaskAddResult, TaskListResult, TaskNew, TaskShowResult,
    archive_or_delete, task_add, task_list, task_set_completion, task_show, task_update,
};

use chrono::NaiveDate;
use serde::Serialize;
use std::path::PathBuf;

use crate::config::ResolvedConfig;
use crate::engine;
use crate::models::dates::parse_day_relative;
use crate::models::{DateRange, RangeQuery, TaskDefinition, TaskInstance};
use crate::storage::{Storage, TaskStore};
use crate::{Error, Result};

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

/// Serialize a result struct, falling back to an error object.
pub(crate) fn json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }).to_string())
}

/// Everything a command needs from the invocation.
#[derive(Debug, Clone)]
pub struct Context {
    pub data_dir: PathBuf,
    pub config: ResolvedConfig,
    /// The day relative dates are resolved against
    pub today: NaiveDate,
}

impl Context {
    pub fn new(data_dir: PathBuf, config: ResolvedConfig, today: NaiveDate) -> Self {
        Self {
            data_dir,
            config,
            today,
        }
    }

    pub fn owner(&self) -> &str {
        self.config.owner()
    }

    /// Open the store, failing with `NotInitialized` if `dt system init` never ran.
    pub fn open_storage(&self) -> Result<Storage> {
        Storage::open(&self.data_dir)
    }

    /// Resolve an optional date argument, defaulting to today.
    pub fn day(&self, arg: Option<&str>) -> Result<NaiveDate> {
        match arg {
            Some(s) => parse_day_relative(s, self.today),
            None => Ok(self.today),
        }
    }

    /// Resolve range arguments.
    ///
    /// `--from`/`--to` give an explicit range, `--days N` the N days ending
    /// today, and no arguments the Monday-Sunday week containing today.
    pub fn range(&self, from: Option<&str>, to: Option<&str>, days: Option<u32>) -> Result<DateRange> {
        match (from, to, days) {
            (Some(from), Some(to), None) => {
                DateRange::new(self.day(Some(from))?, self.day(Some(to))?)
            }
            (None, None, Some(days)) => DateRange::ending_on(self.today, days),
            (None, None, None) => Ok(DateRange::week_of(self.today)),
            _ => Err(Error::InvalidInput(
                "use either --from with --to, or --days".to_string(),
            )),
        }
    }

    pub fn query(&self, range: DateRange) -> Result<RangeQuery> {
        RangeQuery::new(self.owner(), range)
    }
}

/// Fetch, expand and order the instances of a range query.
///
/// The single read path behind listing, the week view and every stats view.
pub fn load_instances<S: TaskStore>(store: &S, query: &RangeQuery) -> Result<Vec<TaskInstance>> {
    let (_, instances) = load_range(store, query)?;
    Ok(instances)
}

/// Like [`load_instances`], also returning the candidate definitions.
pub fn load_range<S: TaskStore>(
    store: &S,
    query: &RangeQuery,
) -> Result<(Vec<TaskDefinition>, Vec<TaskInstance>)> {
    let definitions = store.find_active_candidates(query)?;
    let mut instances = engine::expand(&definitions, query.range());
    engine::sort_for_display(&mut instances);
    tracing::debug!(
        definitions = definitions.len(),
        instances = instances.len(),
        "expanded range"
    );
    Ok((definitions, instances))
}

/// Checkbox-style marker for human output.
pub(crate) fn check(completed: bool) -> &'static str {
    if completed { "[x]" } else { "[ ]" }
}

/// Priority flags for human output, e.g. " !important !urgent".
pub(crate) fn flags(is_important: bool, is_urgent: bool) -> String {
    let mut out = String::new();
    if is_important {
        out.push_str(" !important");
    }
    if is_urgent {
        out.push_str(" !urgent");
    }
    out
}
