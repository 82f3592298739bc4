use super::ChartRenderer;
use crate::aggregate::PulseStats;
use crate::config::ContributorsConfig;
use crate::model::{AggregateStats, ContributorStats, DayBucket, WindowReport};
use std::fmt::Write;

pub const NO_ACTIVITY: &str = "_No activity_";

const SPARKS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const TOP_LANGUAGES: usize = 3;
const SPARKLINE_DAYS: usize = 90;

pub fn escape_cell(text: &str) -> String {
    let text = text.replace('|', "\\|");
    if text.trim().is_empty() {
        "(unknown)".to_string()
    } else {
        text
    }
}

pub fn top_languages(stats: &AggregateStats, limit: usize) -> String {
    let ranked = stats.ranked_categories();
    if ranked.is_empty() {
        return "—".to_string();
    }
    ranked
        .iter()
        .take(limit)
        .map(|(category, lines)| format!("{category} ({lines})"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn window_heading(out: &mut String, label: &str) {
    let _ = writeln!(out, "### {label}\n");
}

fn contributor_table(out: &mut String, contributors: &[ContributorStats], max: usize) {
    out.push_str("| Contributor | Commits | +Add | -Del | Total | Top Languages |\n");
    out.push_str("|-------------|---------|------|------|-------|---------------|\n");
    for c in contributors.iter().take(max) {
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} | {} | {} |",
            escape_cell(&c.author),
            c.stats.commit_count,
            c.stats.lines_added_total,
            c.stats.lines_deleted_total,
            c.stats.lines_total(),
            top_languages(&c.stats, TOP_LANGUAGES)
        );
    }
    if contributors.len() > max {
        let _ = writeln!(out, "\n_…and {} more contributors_", contributors.len() - max);
    }
}

pub fn render_overview(reports: &[WindowReport], config: &ContributorsConfig) -> String {
    let mut out = String::from("## 📊 Repository Analytics Overview\n\n");
    for report in reports {
        window_heading(&mut out, &report.window.label);
        let totals = &report.totals;
        if totals.is_empty() {
            let _ = writeln!(out, "{NO_ACTIVITY}\n");
            continue;
        }
        if config.show {
            contributor_table(&mut out, &report.contributors, config.max);
        } else {
            let _ = writeln!(
                out,
                "**{} commits**, +{} / -{} lines",
                totals.commit_count, totals.lines_added_total, totals.lines_deleted_total
            );
        }
        out.push('\n');
    }
    out
}

pub fn render_summary(reports: &[WindowReport]) -> String {
    let mut out = String::from("## 📈 Repository Stats\n\n");
    out.push_str("| Period | Commits | Additions/Deletions | Total Lines | Languages |\n");
    out.push_str("|--------|---------|---------------------|-------------|-----------|\n");
    for report in reports {
        let t = &report.totals;
        let languages = if t.is_empty() {
            NO_ACTIVITY.to_string()
        } else {
            top_languages(t, usize::MAX)
        };
        let _ = writeln!(
            out,
            "| {} | {} | +{} / -{} | {} | {} |",
            escape_cell(&report.window.label),
            t.commit_count,
            t.lines_added_total,
            t.lines_deleted_total,
            t.lines_total(),
            languages
        );
    }
    out
}

/// One line per category: label, a `█` per 5% share, and the percentage.
pub fn language_bars(stats: &AggregateStats) -> String {
    let total = stats.breakdown_total();
    if total == 0 {
        return String::new();
    }
    stats
        .ranked_categories()
        .iter()
        .map(|(category, lines)| {
            let pct = *lines as f64 / total as f64 * 100.0;
            let filled = "█".repeat((pct / 5.0) as usize);
            format!("{:<10} {:<20} {:>5.1}%", category.label(), filled, pct)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_languages(reports: &[WindowReport], charts: &mut dyn ChartRenderer) -> String {
    let mut out = String::from("## 🧠 Language Breakdown\n\n");
    for report in reports {
        let label = &report.window.label;
        window_heading(&mut out, label);
        if report.totals.breakdown_total() == 0 {
            let _ = writeln!(out, "{NO_ACTIVITY}\n");
            continue;
        }
        if let Some(link) = charts.language_chart(label, &report.totals.ranked_categories()) {
            let _ = writeln!(out, "![{label} Language Breakdown]({link})\n");
        }
        let _ = writeln!(out, "```text\n{}\n```\n", language_bars(&report.totals));
    }
    out
}

/// Scales each day to one of eight bar heights; idle days are blank.
pub fn sparkline(activity: &[DayBucket]) -> String {
    let max = activity.iter().map(|b| b.commit_count).max().unwrap_or(0);
    if max == 0 {
        return String::new();
    }
    activity
        .iter()
        .map(|b| SPARKS[(b.commit_count * 8).div_ceil(max).min(8)])
        .collect()
}

pub fn render_commits(reports: &[WindowReport], charts: &mut dyn ChartRenderer) -> String {
    let mut out = String::from("## 📈 Commit Activity Trends\n\n");
    for report in reports {
        let label = &report.window.label;
        window_heading(&mut out, label);
        let (Some(first), Some(last)) = (report.activity.first(), report.activity.last()) else {
            let _ = writeln!(out, "{NO_ACTIVITY}\n");
            continue;
        };
        let _ = writeln!(
            out,
            "**{} commits** between {} and {}\n",
            report.totals.commit_count, first.date, last.date
        );
        match charts.activity_chart(label, &report.activity) {
            Some(link) => {
                let _ = writeln!(out, "![{label} Commit Activity]({link})\n");
            }
            None => {
                let shown = report.activity.len().min(SPARKLINE_DAYS);
                let recent = &report.activity[report.activity.len() - shown..];
                let _ = writeln!(out, "```text\n{}\n```\n", sparkline(recent));
                if shown < report.activity.len() {
                    let _ = writeln!(out, "_Last {shown} days shown, from {}_\n", recent[0].date);
                }
            }
        }
    }
    out
}

pub fn render_pulse(pulse: &PulseStats) -> String {
    let mut out = String::from("## ⚡ Repository Pulse\n\n");
    if pulse.commit_count == 0 && pulse.lines_added_total == 0 && pulse.lines_deleted_total == 0 {
        let _ = writeln!(out, "{NO_ACTIVITY}");
        return out;
    }
    let day = |d: Option<chrono::DateTime<chrono::FixedOffset>>| {
        d.map_or_else(|| "—".to_string(), |d| d.format("%Y-%m-%d").to_string())
    };
    let _ = writeln!(out, "- **Total Commits:** {}", pulse.commit_count);
    let _ = writeln!(out, "- **Contributors:** {}", pulse.contributor_count);
    let _ = writeln!(out, "- **Lines Added:** {}", pulse.lines_added_total);
    let _ = writeln!(out, "- **Lines Deleted:** {}", pulse.lines_deleted_total);
    let _ = writeln!(out, "- **First Commit Date:** {}", day(pulse.first_commit));
    let _ = writeln!(out, "- **Last Commit Date:** {}", day(pulse.last_commit));
    out
}

pub fn render_diff(range: Option<&str>, stats: &AggregateStats) -> String {
    let scope = range.unwrap_or("working tree");
    let mut out = format!("## 🔀 Pending Changes ({scope})\n\n");
    if stats.lines_total() == 0 {
        let _ = writeln!(out, "{NO_ACTIVITY}");
        return out;
    }
    let _ = writeln!(out, "- **Lines Added:** {}", stats.lines_added_total);
    let _ = writeln!(out, "- **Lines Deleted:** {}", stats.lines_deleted_total);
    let bars = language_bars(stats);
    if !bars.is_empty() {
        let _ = writeln!(out, "\n```text\n{bars}\n```");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{pulse, window_report};
    use crate::language::IgnoreSet;
    use crate::model::TimeWindow;
    use crate::parse::parse_log;
    use crate::render::NoCharts;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    const SCENARIO: &str = "Alice|2024-01-01\n10\t2\tsrc/main.py\nBob|2024-01-02\n-\t-\tassets/logo.png\n5\t0\tREADME.md\n";

    fn reports() -> Vec<WindowReport> {
        let records: Vec<_> = parse_log(SCENARIO).collect();
        let recent = TimeWindow::new("Last 24 Hours", Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()));
        vec![
            window_report(&records, &TimeWindow::all_time("All Time"), &IgnoreSet::new()),
            window_report(&records, &recent, &IgnoreSet::new()),
        ]
    }

    #[test]
    fn overview_lists_contributors_and_placeholders() {
        let out = render_overview(&reports(), &ContributorsConfig::default());
        assert_eq!(
            out,
            "## 📊 Repository Analytics Overview\n\n\
             ### All Time\n\n\
             | Contributor | Commits | +Add | -Del | Total | Top Languages |\n\
             |-------------|---------|------|------|-------|---------------|\n\
             | Alice | 1 | 10 | 2 | 12 | Python (12) |\n\
             | Bob | 1 | 5 | 0 | 5 | Markdown (5) |\n\n\
             ### Last 24 Hours\n\n\
             _No activity_\n\n"
        );
    }

    #[test]
    fn overview_honours_contributor_limit_and_toggle() {
        let limited = render_overview(&reports(), &ContributorsConfig { show: true, max: 1 });
        assert!(limited.contains("| Alice |"));
        assert!(!limited.contains("| Bob |"));
        assert!(limited.contains("_…and 1 more contributors_"));

        let hidden = render_overview(&reports(), &ContributorsConfig { show: false, max: 10 });
        assert!(hidden.contains("**2 commits**, +15 / -2 lines"));
        assert!(!hidden.contains("| Contributor |"));
    }

    #[test]
    fn summary_has_a_row_per_window() {
        let out = render_summary(&reports());
        assert!(out.contains("| All Time | 2 | +15 / -2 | 17 | Python (12), Markdown (5) |"));
        assert!(out.contains("| Last 24 Hours | 0 | +0 / -0 | 0 | _No activity_ |"));
    }

    #[test]
    fn language_bars_scale_to_five_percent_steps() {
        let reports = reports();
        let bars = language_bars(&reports[0].totals);
        let lines: Vec<_> = bars.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], format!("{:<10} {:<20} {:>5.1}%", "Python", "█".repeat(14), 70.6));
        assert_eq!(lines[1], format!("{:<10} {:<20} {:>5.1}%", "Markdown", "█".repeat(5), 29.4));
    }

    #[test]
    fn empty_windows_never_render_blank() {
        let reports = reports();
        let empty = &reports[1..];
        for out in [
            render_overview(empty, &ContributorsConfig::default()),
            render_languages(empty, &mut NoCharts),
            render_commits(empty, &mut NoCharts),
            render_pulse(&pulse(&[])),
            render_diff(None, &AggregateStats::default()),
        ] {
            assert!(out.contains(NO_ACTIVITY), "missing placeholder in {out:?}");
        }
    }

    #[test]
    fn commits_fall_back_to_sparkline_without_charts() {
        let out = render_commits(&reports()[..1], &mut NoCharts);
        assert!(out.contains("**2 commits** between 2024-01-01 and 2024-01-02"));
        assert!(out.contains("```text\n██\n```"));
    }

    #[test]
    fn long_histories_keep_the_sparkline_short() {
        let start = chrono::NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let activity: Vec<_> = start
            .iter_days()
            .take(1000)
            .map(|date| DayBucket { date, commit_count: 1 })
            .collect();
        let report = WindowReport {
            window: TimeWindow::all_time("All Time"),
            totals: AggregateStats {
                commit_count: 1000,
                ..AggregateStats::default()
            },
            contributors: Vec::new(),
            activity,
        };
        let out = render_commits(&[report], &mut NoCharts);
        let spark = out.lines().find(|l| l.starts_with('█')).unwrap();
        assert_eq!(spark.chars().count(), SPARKLINE_DAYS);
        assert!(out.contains("**1000 commits** between 2020-01-01 and 2022-09-26"));
        assert!(out.contains("_Last 90 days shown, from 2022-06-29_"));
    }

    #[test]
    fn sparkline_scales_counts() {
        let day = |d: u32, n: usize| DayBucket {
            date: chrono::NaiveDate::from_ymd_opt(2024, 1, d).unwrap(),
            commit_count: n,
        };
        assert_eq!(sparkline(&[day(1, 0), day(2, 1), day(3, 4), day(4, 8)]), " ▁▄█");
        assert_eq!(sparkline(&[]), "");
    }

    #[test]
    fn pulse_lists_totals_and_dates() {
        let records: Vec<_> = parse_log(SCENARIO).collect();
        let out = render_pulse(&pulse(&records));
        assert!(out.contains("- **Total Commits:** 2\n"));
        assert!(out.contains("- **Contributors:** 2\n"));
        assert!(out.contains("- **First Commit Date:** 2024-01-01\n"));
        assert!(out.contains("- **Last Commit Date:** 2024-01-02\n"));
    }

    #[test]
    fn cells_escape_pipes() {
        assert_eq!(escape_cell("Team | Ops"), "Team \\| Ops");
        assert_eq!(escape_cell(""), "(unknown)");
    }
}
