use crate::language::Category;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const SCHEMA_VERSION: u32 = 1;

/// One file touched by one commit, as reported by `--numstat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    /// Ordinal of the commit header this line belongs to. `None` for stat
    /// lines seen before any header.
    pub commit: Option<usize>,
    pub author: String,
    pub commit_date: Option<DateTime<FixedOffset>>,
    pub lines_added: u64,
    pub lines_deleted: u64,
    pub path: String,
}

impl ChangeRecord {
    pub fn category(&self) -> Category {
        Category::from_path(&self.path)
    }

    pub fn lines_changed(&self) -> u64 {
        self.lines_added + self.lines_deleted
    }

    pub fn day(&self) -> Option<NaiveDate> {
        self.commit_date.map(|d| d.date_naive())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub label: String,
    pub cutoff: Option<DateTime<Utc>>,
}

impl TimeWindow {
    pub fn new(label: impl Into<String>, cutoff: Option<DateTime<Utc>>) -> Self {
        Self {
            label: label.into(),
            cutoff,
        }
    }

    pub fn all_time(label: impl Into<String>) -> Self {
        Self::new(label, None)
    }

    pub fn is_unbounded(&self) -> bool {
        self.cutoff.is_none()
    }

    /// Unbounded windows hold every record. Bounded windows hold records
    /// dated at or after the cutoff; undated records are left out.
    pub fn contains(&self, record: &ChangeRecord) -> bool {
        match (self.cutoff, record.commit_date) {
            (None, _) => true,
            (Some(cutoff), Some(date)) => date.with_timezone(&Utc) >= cutoff,
            (Some(_), None) => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub commit_count: usize,
    pub lines_added_total: u64,
    pub lines_deleted_total: u64,
    pub per_category_total: BTreeMap<Category, u64>,
}

impl AggregateStats {
    pub fn is_empty(&self) -> bool {
        self.commit_count == 0 && self.lines_added_total == 0 && self.lines_deleted_total == 0
    }

    pub fn lines_total(&self) -> u64 {
        self.lines_added_total + self.lines_deleted_total
    }

    pub fn breakdown_total(&self) -> u64 {
        self.per_category_total.values().sum()
    }

    /// Categories ordered by volume, largest first. Equal volumes keep the
    /// category order.
    pub fn ranked_categories(&self) -> Vec<(Category, u64)> {
        let mut ranked: Vec<_> = self
            .per_category_total
            .iter()
            .map(|(c, v)| (*c, *v))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributorStats {
    pub author: String,
    pub stats: AggregateStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub commit_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowReport {
    pub window: TimeWindow,
    pub totals: AggregateStats,
    pub contributors: Vec<ContributorStats>,
    pub activity: Vec<DayBucket>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub repository_path: String,
    pub windows: Vec<WindowReport>,
}
