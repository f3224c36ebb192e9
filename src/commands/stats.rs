//! The week view and the statistics commands.
//!
//! All of them load instances through [`load_instances`] and hand them to
//! the aggregations in [`crate::engine`].

use serde::Serialize;

use super::task::format_instance;
use super::{Output, json, load_instances, load_range};
use crate::Result;
use crate::engine::{
    self, CategoryStats, DailyPoint, QuadrantStats, RangeSummary, TaskRates,
};
use crate::models::{DateRange, DayNote, Quadrant, RangeQuery, TaskInstance, format_day};
use crate::storage::TaskStore;

fn format_daily(point: &DailyPoint) -> String {
    format!(
        "{} {}  {}/{} pts  {:>3}%  {}/{} tasks  [{}]",
        point.date.format("%a"),
        format_day(point.date),
        point.completed_points,
        point.total_points,
        point.percentage,
        point.completed_count,
        point.task_count,
        point.band.as_str()
    )
}

fn range_header(range: &DateRange) -> String {
    format!("{} .. {}", format_day(range.start()), format_day(range.end()))
}

#[derive(Serialize)]
pub struct WeekResult {
    pub range: DateRange,
    pub daily: Vec<DailyPoint>,
    pub summary: RangeSummary,
    pub instances: Vec<TaskInstance>,
    /// Saved journal and gratitude notes, by date then kind
    pub notes: Vec<DayNote>,
}

impl Output for WeekResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let mut lines = vec![format!(
            "Week {}: {}/{} pts ({}%)",
            range_header(&self.range),
            self.summary.completed_points,
            self.summary.total_points,
            self.summary.percentage
        )];
        for point in &self.daily {
            lines.push(String::new());
            lines.push(format_daily(point));
            lines.extend(
                self.instances
                    .iter()
                    .filter(|i| i.date == point.date)
                    .map(format_instance),
            );
            lines.extend(
                self.notes
                    .iter()
                    .filter(|n| n.date == point.date && !n.is_empty())
                    .map(|n| format!("  {}: {}", n.kind.label(), n.content.replace('\n', " "))),
            );
        }
        lines.join("\n")
    }
}

/// Instances, daily totals and notes for the Monday-Sunday week containing `day`.
pub fn week<S: TaskStore>(store: &S, owner_id: &str, day: chrono::NaiveDate) -> Result<WeekResult> {
    let range = DateRange::week_of(day);
    let query = RangeQuery::new(owner_id, range)?;
    let instances = load_instances(store, &query)?;
    Ok(WeekResult {
        range,
        daily: engine::daily_points(&instances, range),
        summary: engine::range_summary(&instances, range),
        instances,
        notes: store.list_notes(&query, None)?,
    })
}

#[derive(Serialize)]
pub struct DailyResult {
    pub range: DateRange,
    pub days: Vec<DailyPoint>,
}

impl Output for DailyResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let mut lines = vec![format!("Daily completion {}", range_header(&self.range))];
        lines.extend(self.days.iter().map(format_daily));
        lines.join("\n")
    }
}

pub fn stats_daily<S: TaskStore>(store: &S, query: &RangeQuery) -> Result<DailyResult> {
    let instances = load_instances(store, query)?;
    Ok(DailyResult {
        range: query.range(),
        days: engine::daily_points(&instances, query.range()),
    })
}

#[derive(Serialize)]
pub struct TaskRatesResult {
    pub range: DateRange,
    #[serde(flatten)]
    pub rates: TaskRates,
}

impl Output for TaskRatesResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let mut lines = vec![format!(
            "Regular task completion {}",
            range_header(&self.range)
        )];
        if self.rates.tasks.is_empty() {
            lines.push("No regular tasks in range.".to_string());
            return lines.join("\n");
        }
        for rate in &self.rates.tasks {
            lines.push(format!(
                "  {:>3}%  {}/{} days  {} {} ({})",
                rate.rate,
                rate.completed_days,
                rate.possible_days,
                rate.task_id,
                rate.title,
                rate.category
            ));
        }
        if let Some(ref most) = self.rates.most_completed {
            lines.push(format!("Most completed:  {} ({}%)", most.title, most.rate));
        }
        if let Some(ref least) = self.rates.least_completed {
            lines.push(format!("Least completed: {} ({}%)", least.title, least.rate));
        }
        lines.join("\n")
    }
}

pub fn stats_tasks<S: TaskStore>(store: &S, query: &RangeQuery) -> Result<TaskRatesResult> {
    let (definitions, instances) = load_range(store, query)?;
    Ok(TaskRatesResult {
        range: query.range(),
        rates: engine::task_rates(&definitions, &instances),
    })
}

#[derive(Serialize)]
pub struct QuadrantsResult {
    pub range: DateRange,
    pub quadrants: Vec<QuadrantStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<Quadrant>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instances: Option<Vec<TaskInstance>>,
}

impl Output for QuadrantsResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let mut lines = vec![format!("Priority quadrants {}", range_header(&self.range))];
        for q in &self.quadrants {
            lines.push(format!(
                "  {:<27} {}/{} pts  {:>3}%  ({} instances)",
                q.quadrant.label(),
                q.stats.completed,
                q.stats.total,
                q.stats.rate,
                q.stats.count
            ));
        }
        if let (Some(selected), Some(instances)) = (self.selected, &self.instances) {
            lines.push(String::new());
            lines.push(format!("{}:", selected.label()));
            if instances.is_empty() {
                lines.push("  (none)".to_string());
            }
            lines.extend(
                instances
                    .iter()
                    .map(|i| format!("{} {}", format_day(i.date), format_instance(i).trim_start())),
            );
        }
        lines.join("\n")
    }
}

/// Quadrant totals, optionally listing the instances of one quadrant.
pub fn stats_quadrants<S: TaskStore>(
    store: &S,
    query: &RangeQuery,
    select: Option<Quadrant>,
) -> Result<QuadrantsResult> {
    let instances = load_instances(store, query)?;
    let quadrants = engine::quadrant_stats(&instances);
    let selected_instances = select.map(|quadrant| {
        instances
            .iter()
            .filter(|i| i.quadrant() == quadrant)
            .cloned()
            .collect()
    });
    Ok(QuadrantsResult {
        range: query.range(),
        quadrants,
        selected: select,
        instances: selected_instances,
    })
}

#[derive(Serialize)]
pub struct CategoriesResult {
    pub range: DateRange,
    pub categories: Vec<CategoryStats>,
}

impl Output for CategoriesResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let mut lines = vec![format!("Categories {}", range_header(&self.range))];
        if self.categories.is_empty() {
            lines.push("No tasks in range.".to_string());
        }
        for c in &self.categories {
            lines.push(format!(
                "  {:<20} {}/{} pts  {:>3}%  ({} instances)",
                c.category, c.stats.completed, c.stats.total, c.stats.rate, c.stats.count
            ));
        }
        lines.join("\n")
    }
}

pub fn stats_categories<S: TaskStore>(store: &S, query: &RangeQuery) -> Result<CategoriesResult> {
    let instances = load_instances(store, query)?;
    Ok(CategoriesResult {
        range: query.range(),
        categories: engine::category_stats(&instances),
    })
}

#[derive(Serialize)]
pub struct SummaryResult {
    #[serde(flatten)]
    pub summary: RangeSummary,
}

impl Output for SummaryResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let s = &self.summary;
        format!(
            "{} .. {} ({} days)\n  Points:    {}/{} ({}%)\n  Instances: {}/{} completed\n  Tasks:     {}",
            format_day(s.start),
            format_day(s.end),
            s.days,
            s.completed_points,
            s.total_points,
            s.percentage,
            s.completed_count,
            s.instance_count,
            s.task_count
        )
    }
}

pub fn stats_summary<S: TaskStore>(store: &S, query: &RangeQuery) -> Result<SummaryResult> {
    let instances = load_instances(store, query)?;
    Ok(SummaryResult {
        summary: engine::range_summary(&instances, query.range()),
    })
}
