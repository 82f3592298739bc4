use crate::language::IgnoreSet;
use crate::model::{AggregateStats, ChangeRecord, ContributorStats, DayBucket, TimeWindow, WindowReport};
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

#[derive(Default)]
struct StatsAccum {
    stats: AggregateStats,
    commits: HashSet<usize>,
}

impl StatsAccum {
    fn add(&mut self, record: &ChangeRecord, ignore: &IgnoreSet) {
        if let Some(commit) = record.commit {
            if self.commits.insert(commit) {
                self.stats.commit_count += 1;
            }
        }
        self.stats.lines_added_total += record.lines_added;
        self.stats.lines_deleted_total += record.lines_deleted;

        let category = record.category();
        if !ignore.contains(category) {
            *self.stats.per_category_total.entry(category).or_insert(0) += record.lines_changed();
        }
    }
}

/// Folds every record inside `window` into one set of totals. Commits are
/// counted once each, however many files they touch.
pub fn aggregate(records: &[ChangeRecord], window: &TimeWindow, ignore: &IgnoreSet) -> AggregateStats {
    let mut accum = StatsAccum::default();
    for record in records.iter().filter(|r| window.contains(r)) {
        accum.add(record, ignore);
    }
    accum.stats
}

/// Same fold, split by author. Sorted by commit count, most active first;
/// ties keep first-seen order.
pub fn aggregate_by_author(
    records: &[ChangeRecord],
    window: &TimeWindow,
    ignore: &IgnoreSet,
) -> Vec<ContributorStats> {
    let mut order: Vec<String> = Vec::new();
    let mut by_author: HashMap<String, StatsAccum> = HashMap::new();

    for record in records.iter().filter(|r| window.contains(r)) {
        let accum = by_author.entry(record.author.clone()).or_insert_with(|| {
            order.push(record.author.clone());
            StatsAccum::default()
        });
        accum.add(record, ignore);
    }

    let mut contributors: Vec<ContributorStats> = order
        .into_iter()
        .filter_map(|author| {
            by_author.remove(&author).map(|accum| ContributorStats {
                author,
                stats: accum.stats,
            })
        })
        .collect();

    contributors.sort_by(|a, b| b.stats.commit_count.cmp(&a.stats.commit_count));
    contributors
}

/// Distinct commits per calendar day, oldest first, with every day between
/// the first and last active day present.
pub fn commits_per_day(records: &[ChangeRecord], window: &TimeWindow) -> Vec<DayBucket> {
    let mut days: BTreeMap<NaiveDate, HashSet<usize>> = BTreeMap::new();
    for record in records.iter().filter(|r| window.contains(r)) {
        if let (Some(day), Some(commit)) = (record.day(), record.commit) {
            days.entry(day).or_default().insert(commit);
        }
    }

    let (Some(first), Some(last)) = (days.keys().next().copied(), days.keys().next_back().copied()) else {
        return Vec::new();
    };

    first
        .iter_days()
        .take_while(|day| *day <= last)
        .map(|date| DayBucket {
            date,
            commit_count: days.get(&date).map_or(0, HashSet::len),
        })
        .collect()
}

pub fn window_report(records: &[ChangeRecord], window: &TimeWindow, ignore: &IgnoreSet) -> WindowReport {
    WindowReport {
        window: window.clone(),
        totals: aggregate(records, window, ignore),
        contributors: aggregate_by_author(records, window, ignore),
        activity: commits_per_day(records, window),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PulseStats {
    pub commit_count: usize,
    pub contributor_count: usize,
    pub lines_added_total: u64,
    pub lines_deleted_total: u64,
    pub first_commit: Option<DateTime<FixedOffset>>,
    pub last_commit: Option<DateTime<FixedOffset>>,
}

pub fn pulse(records: &[ChangeRecord]) -> PulseStats {
    let totals = aggregate(records, &TimeWindow::all_time("All Time"), &IgnoreSet::new());
    let contributors: HashSet<&str> = records
        .iter()
        .filter(|r| r.commit.is_some())
        .map(|r| r.author.as_str())
        .collect();
    let dates = records.iter().filter_map(|r| r.commit_date);

    PulseStats {
        commit_count: totals.commit_count,
        contributor_count: contributors.len(),
        lines_added_total: totals.lines_added_total,
        lines_deleted_total: totals.lines_deleted_total,
        first_commit: dates.clone().min(),
        last_commit: dates.max(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Category;
    use crate::parse::parse_log;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    const SCENARIO: &str = "Alice|2024-01-01\n10\t2\tsrc/main.py\nBob|2024-01-02\n-\t-\tassets/logo.png\n5\t0\tREADME.md\n";

    const HISTORY: &str = "\
Alice|2024-01-01T09:00:00+00:00
10\t2\tsrc/main.py
3\t1\tsrc/util.py
Bob|2024-01-03T10:00:00+00:00
5\t0\tREADME.md
Alice|2024-01-05T11:00:00+00:00
1\t1\tsrc/main.py
Carol|2024-01-05T12:00:00+00:00
2\t0\tdocs/guide.md
Bob|2024-01-06T08:00:00+00:00
7\t7\tapp.ts
";

    fn records(text: &str) -> Vec<ChangeRecord> {
        parse_log(text).collect()
    }

    fn since(y: i32, m: u32, d: u32, h: u32) -> TimeWindow {
        TimeWindow::new("since", Some(Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()))
    }

    #[test]
    fn scenario_all_time_totals() {
        let stats = aggregate(&records(SCENARIO), &TimeWindow::all_time("All Time"), &IgnoreSet::new());
        assert_eq!(stats.commit_count, 2);
        assert_eq!(stats.lines_added_total, 15);
        assert_eq!(stats.lines_deleted_total, 2);
        assert_eq!(
            stats.per_category_total,
            BTreeMap::from([(Category::Python, 12), (Category::Markdown, 5)])
        );
    }

    #[test]
    fn counts_distinct_commits_not_files() {
        let stats = aggregate(&records(HISTORY), &TimeWindow::all_time("All"), &IgnoreSet::new());
        assert_eq!(stats.commit_count, 5);
        assert_eq!(stats.lines_added_total, 28);
        assert_eq!(stats.lines_deleted_total, 11);
    }

    #[test]
    fn empty_input_yields_zeroed_stats() {
        let stats = aggregate(&[], &since(2024, 1, 1, 0), &IgnoreSet::new());
        assert_eq!(stats, AggregateStats::default());
        assert!(stats.is_empty());
        assert!(aggregate_by_author(&[], &TimeWindow::all_time("All"), &IgnoreSet::new()).is_empty());
        assert!(commits_per_day(&[], &TimeWindow::all_time("All")).is_empty());
    }

    #[test]
    fn narrower_windows_never_count_more_commits() {
        let all = records(HISTORY);
        let windows = [
            TimeWindow::all_time("All"),
            since(2024, 1, 2, 0),
            since(2024, 1, 5, 11),
            since(2024, 1, 5, 12),
            since(2024, 1, 7, 0),
        ];
        let counts: Vec<_> = windows
            .iter()
            .map(|w| aggregate(&all, w, &IgnoreSet::new()).commit_count)
            .collect();
        assert_eq!(counts, vec![5, 4, 3, 2, 0]);
        assert!(counts.windows(2).all(|pair| pair[0] >= pair[1]));
    }

    #[test]
    fn bare_dates_compare_as_start_of_day() {
        let all = records(SCENARIO);
        // Bob's 2024-01-02 is midnight: exactly at this cutoff, so included.
        assert_eq!(aggregate(&all, &since(2024, 1, 2, 0), &IgnoreSet::new()).commit_count, 1);
        // Later the same day excludes it.
        assert_eq!(aggregate(&all, &since(2024, 1, 2, 1), &IgnoreSet::new()).commit_count, 0);
    }

    #[test]
    fn ignored_categories_leave_gross_totals_alone() {
        let all = records(HISTORY);
        let ignore = IgnoreSet::new().with(Category::Markdown);
        let stats = aggregate(&all, &TimeWindow::all_time("All"), &ignore);

        assert!(!stats.per_category_total.contains_key(&Category::Markdown));
        assert_eq!(stats.lines_total(), 39);
        assert_eq!(stats.breakdown_total(), 39 - 7);
        assert!(stats.breakdown_total() <= stats.lines_total());
    }

    #[test]
    fn contributors_sorted_by_commits_with_stable_ties() {
        let contributors = aggregate_by_author(&records(HISTORY), &TimeWindow::all_time("All"), &IgnoreSet::new());
        let ranking: Vec<_> = contributors
            .iter()
            .map(|c| (c.author.as_str(), c.stats.commit_count))
            .collect();
        assert_eq!(ranking, vec![("Alice", 2), ("Bob", 2), ("Carol", 1)]);

        let alice = &contributors[0].stats;
        assert_eq!(alice.lines_added_total, 14);
        assert_eq!(alice.per_category_total.get(&Category::Python), Some(&18));
    }

    #[test]
    fn daily_activity_fills_gaps() {
        let activity = commits_per_day(&records(HISTORY), &TimeWindow::all_time("All"));
        let counts: Vec<_> = activity
            .iter()
            .map(|b| (b.date.format("%m-%d").to_string(), b.commit_count))
            .collect();
        assert_eq!(
            counts,
            vec![
                ("01-01".to_string(), 1),
                ("01-02".to_string(), 0),
                ("01-03".to_string(), 1),
                ("01-04".to_string(), 0),
                ("01-05".to_string(), 2),
                ("01-06".to_string(), 1),
            ]
        );
    }

    #[test]
    fn pulse_summarizes_all_history() {
        let pulse = pulse(&records(HISTORY));
        assert_eq!(pulse.commit_count, 5);
        assert_eq!(pulse.contributor_count, 3);
        assert_eq!(pulse.lines_added_total, 28);
        assert_eq!(pulse.first_commit.map(|d| d.date_naive().to_string()), Some("2024-01-01".to_string()));
        assert_eq!(pulse.last_commit.map(|d| d.date_naive().to_string()), Some("2024-01-06".to_string()));
    }
}
