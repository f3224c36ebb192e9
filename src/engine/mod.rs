//! Task instance expansion and analytics.
//!
//! Everything in this module is a pure function of its inputs:
//! - [`expand`] turns stored definitions into per-day instances for a range
//! - [`completion`] decides whether a definition counts as done on a day
//! - [`archival`] plans what deleting a task means
//! - [`stats`] aggregates instances into point-weighted statistics
//!
//! Storage I/O happens before or after these run, never during.

pub mod archival;
pub mod completion;
pub mod expand;
pub mod stats;

pub use archival::{Action, plan_deletion};
pub use completion::is_completed;
pub use expand::{ActiveWindow, active_window, expand, sort_for_display};
pub use stats::{
    BucketStats, CategoryStats, DailyPoint, ProgressBand, QuadrantStats, RangeSummary, TaskRate,
    TaskRates, category_stats, daily_points, percentage, quadrant_stats, range_summary, task_rates,
};
