//! Point-weighted completion statistics.
//!
//! Every aggregation here consumes the same per-day instances produced by
//! [`expand`](super::expand::expand), so a 3-point regular task active on 5
//! days weighs 15 points everywhere, never 3.
//!
//! All percentages go through [`percentage`] so that the daily series, the
//! quadrant grid and the summaries agree to the unit.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::models::{DateRange, Quadrant, TaskDefinition, TaskInstance, TaskKind};

/// `completed / total` as a whole percentage, rounded half up; 0 when `total` is 0.
pub fn percentage(completed: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let (completed, total) = (completed as u64, total as u64);
    ((200 * completed + total) / (2 * total)) as u32
}

/// Coarse progress classification used for colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressBand {
    /// Below 33%
    Low,
    /// 33% to 66%
    Medium,
    /// Above 66%
    High,
}

impl ProgressBand {
    pub fn from_percentage(pct: u32) -> Self {
        match pct {
            0..=32 => ProgressBand::Low,
            33..=66 => ProgressBand::Medium,
            _ => ProgressBand::High,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressBand::Low => "low",
            ProgressBand::Medium => "medium",
            ProgressBand::High => "high",
        }
    }
}

/// One day of the completion time series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub total_points: u32,
    pub completed_points: u32,
    pub percentage: u32,
    pub task_count: u32,
    pub completed_count: u32,
    pub band: ProgressBand,
}

/// Daily point totals for every day of `range`, in order.
///
/// Days without instances produce a zero row. Instances outside the range
/// are ignored.
pub fn daily_points(instances: &[TaskInstance], range: DateRange) -> Vec<DailyPoint> {
    let mut by_day: HashMap<NaiveDate, (u32, u32, u32, u32)> = HashMap::new();
    for instance in instances.iter().filter(|i| range.contains(i.date)) {
        let entry = by_day.entry(instance.date).or_default();
        let points = instance.points.get() as u32;
        entry.0 += points;
        entry.2 += 1;
        if instance.completed {
            entry.1 += points;
            entry.3 += 1;
        }
    }

    range
        .days()
        .map(|date| {
            let (total_points, completed_points, task_count, completed_count) =
                by_day.get(&date).copied().unwrap_or_default();
            let pct = percentage(completed_points, total_points);
            DailyPoint {
                date,
                total_points,
                completed_points,
                percentage: pct,
                task_count,
                completed_count,
                band: ProgressBand::from_percentage(pct),
            }
        })
        .collect()
}

/// Completion rate of one regular task over a range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskRate {
    pub task_id: String,
    pub title: String,
    pub category: String,
    pub possible_days: u32,
    pub completed_days: u32,
    pub rate: u32,
}

/// Per-task completion rates, ordered by rate descending then task id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskRates {
    pub tasks: Vec<TaskRate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_completed: Option<TaskRate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub least_completed: Option<TaskRate>,
}

/// Completion rate for every regular task in `definitions`.
///
/// `instances` must be the expansion of `definitions` over the range. A
/// regular task active on no day of the range still gets a row with zero
/// possible days; such rows are never picked as most or least completed.
/// Ties on rate are broken by task id ascending, both for the ordering and
/// for picking the most and least completed task.
pub fn task_rates(definitions: &[TaskDefinition], instances: &[TaskInstance]) -> TaskRates {
    let mut rates: BTreeMap<&str, TaskRate> = BTreeMap::new();
    for definition in definitions.iter().filter(|d| d.is_regular()) {
        rates.entry(definition.id.as_str()).or_insert_with(|| TaskRate {
            task_id: definition.id.clone(),
            title: definition.title.clone(),
            category: definition.category.clone(),
            possible_days: 0,
            completed_days: 0,
            rate: 0,
        });
    }
    for instance in instances.iter().filter(|i| i.kind == TaskKind::Regular) {
        let rate = rates.entry(instance.task_id.as_str()).or_insert_with(|| TaskRate {
            task_id: instance.task_id.clone(),
            title: instance.title.clone(),
            category: instance.category.clone(),
            possible_days: 0,
            completed_days: 0,
            rate: 0,
        });
        rate.possible_days += 1;
        if instance.completed {
            rate.completed_days += 1;
        }
    }

    let mut tasks: Vec<TaskRate> = rates
        .into_values()
        .map(|mut r| {
            r.rate = percentage(r.completed_days, r.possible_days);
            r
        })
        .collect();
    tasks.sort_by(|a, b| b.rate.cmp(&a.rate).then_with(|| a.task_id.cmp(&b.task_id)));

    let ranked = || tasks.iter().filter(|t| t.possible_days > 0);
    let most_completed = ranked().next().cloned();
    let least_completed = ranked()
        .min_by(|a, b| a.rate.cmp(&b.rate).then_with(|| a.task_id.cmp(&b.task_id)))
        .cloned();

    TaskRates {
        tasks,
        most_completed,
        least_completed,
    }
}

/// Point-weighted totals for a group of instances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BucketStats {
    /// Sum of points
    pub total: u32,
    /// Sum of points of completed instances
    pub completed: u32,
    /// Number of instances
    pub count: u32,
    pub rate: u32,
}

impl BucketStats {
    fn add(&mut self, instance: &TaskInstance) {
        let points = instance.points.get() as u32;
        self.total += points;
        self.count += 1;
        if instance.completed {
            self.completed += points;
        }
    }

    fn finish(mut self) -> Self {
        self.rate = percentage(self.completed, self.total);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuadrantStats {
    pub quadrant: Quadrant,
    #[serde(flatten)]
    pub stats: BucketStats,
}

/// Totals for all four priority quadrants, in [`Quadrant::ALL`] order.
pub fn quadrant_stats(instances: &[TaskInstance]) -> Vec<QuadrantStats> {
    let mut buckets: HashMap<Quadrant, BucketStats> = HashMap::new();
    for instance in instances {
        buckets.entry(instance.quadrant()).or_default().add(instance);
    }

    Quadrant::ALL
        .iter()
        .map(|&quadrant| QuadrantStats {
            quadrant,
            stats: buckets.get(&quadrant).copied().unwrap_or_default().finish(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryStats {
    pub category: String,
    #[serde(flatten)]
    pub stats: BucketStats,
}

/// Totals per category, sorted by category name.
pub fn category_stats(instances: &[TaskInstance]) -> Vec<CategoryStats> {
    let mut buckets: BTreeMap<&str, BucketStats> = BTreeMap::new();
    for instance in instances {
        buckets.entry(instance.category.as_str()).or_default().add(instance);
    }

    buckets
        .into_iter()
        .map(|(category, stats)| CategoryStats {
            category: category.to_string(),
            stats: stats.finish(),
        })
        .collect()
}

/// Whole-range totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeSummary {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: u32,
    pub total_points: u32,
    pub completed_points: u32,
    pub percentage: u32,
    pub instance_count: u32,
    pub completed_count: u32,
    /// Distinct task definitions with at least one instance
    pub task_count: u32,
}

pub fn range_summary(instances: &[TaskInstance], range: DateRange) -> RangeSummary {
    let mut bucket = BucketStats::default();
    let mut completed_count = 0;
    let mut tasks = BTreeSet::new();
    for instance in instances.iter().filter(|i| range.contains(i.date)) {
        bucket.add(instance);
        if instance.completed {
            completed_count += 1;
        }
        tasks.insert(instance.task_id.as_str());
    }
    let bucket = bucket.finish();

    RangeSummary {
        start: range.start(),
        end: range.end(),
        days: range.len_days(),
        total_points: bucket.total,
        completed_points: bucket.completed,
        percentage: bucket.rate,
        instance_count: bucket.count,
        completed_count,
        task_count: tasks.len() as u32,
    }
}
