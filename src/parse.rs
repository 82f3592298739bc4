use crate::model::ChangeRecord;
use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use std::str::Lines;
use tracing::trace;

pub const HEADER_DELIMITER: char = '|';

/// Lazily turns `git log --numstat --pretty=format:%an|%ad` output into
/// change records, one per numeric stat line.
pub struct LogRecords<'a> {
    lines: Lines<'a>,
    author: String,
    date: Option<DateTime<FixedOffset>>,
    commit: Option<usize>,
    headers_seen: usize,
}

impl<'a> LogRecords<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines(),
            author: String::new(),
            date: None,
            commit: None,
            headers_seen: 0,
        }
    }

    fn apply_header(&mut self, line: &str) {
        let Some((author, date)) = line.rsplit_once(HEADER_DELIMITER) else {
            trace!(line, "ignoring line without header delimiter");
            return;
        };
        self.author = author.trim().to_string();
        self.date = parse_commit_date(date);
        self.commit = Some(self.headers_seen);
        self.headers_seen += 1;
    }
}

impl Iterator for LogRecords<'_> {
    type Item = ChangeRecord;

    fn next(&mut self) -> Option<ChangeRecord> {
        loop {
            let line = self.lines.next()?;
            if line.trim().is_empty() {
                continue;
            }
            if !line.contains('\t') {
                self.apply_header(line);
                continue;
            }
            if let Some(stat) = parse_stat_line(line) {
                return Some(ChangeRecord {
                    commit: self.commit,
                    author: self.author.clone(),
                    commit_date: self.date,
                    lines_added: stat.added,
                    lines_deleted: stat.deleted,
                    path: stat.path,
                });
            }
        }
    }
}

pub fn parse_log(text: &str) -> LogRecords<'_> {
    LogRecords::new(text)
}

/// Parses `git diff --numstat` output. Diff streams carry no headers, so
/// the records have no author, date or commit.
pub fn parse_diff(text: &str) -> impl Iterator<Item = ChangeRecord> + '_ {
    text.lines()
        .filter_map(parse_stat_line)
        .map(|stat| ChangeRecord {
            commit: None,
            author: String::new(),
            commit_date: None,
            lines_added: stat.added,
            lines_deleted: stat.deleted,
            path: stat.path,
        })
}

#[derive(Debug, PartialEq, Eq)]
struct StatLine {
    added: u64,
    deleted: u64,
    path: String,
}

fn parse_stat_line(line: &str) -> Option<StatLine> {
    let mut parts = line.splitn(3, '\t');
    let (added, deleted, path) = (parts.next()?, parts.next()?, parts.next()?);
    let (Ok(added), Ok(deleted)) = (added.trim().parse::<u64>(), deleted.trim().parse::<u64>()) else {
        trace!(line, "skipping stat line without numeric counts");
        return None;
    };
    Some(StatLine {
        added,
        deleted,
        path: resolve_rename(path.trim()),
    })
}

/// `--numstat` reports renames as `old => new` or `dir/{old => new}/file`.
/// Either form resolves to the destination path.
pub fn resolve_rename(path: &str) -> String {
    if let (Some(open), Some(close)) = (path.find('{'), path.rfind('}')) {
        if open < close {
            let inner = &path[open + 1..close];
            if let Some((_, to)) = inner.split_once(" => ") {
                let joined = format!("{}{}{}", &path[..open], to, &path[close + 1..]);
                return joined.replace("//", "/");
            }
        }
    }
    match path.split_once(" => ") {
        Some((_, to)) => to.to_string(),
        None => path.to_string(),
    }
}

/// Accepts RFC 3339 (`--date=iso-strict`), git's `--date=iso` form, and a
/// bare `YYYY-MM-DD` (`--date=short`). Bare dates are read as the start of
/// that day in UTC.
pub fn parse_commit_date(input: &str) -> Option<DateTime<FixedOffset>> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S %z") {
        return Some(dt);
    }
    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&midnight).fixed_offset())
}
