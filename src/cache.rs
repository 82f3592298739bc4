use crate::git::HistorySource;
use crate::model::ChangeRecord;
use crate::parse::{parse_diff, parse_log};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LogQuery {
    Log,
    Diff(Option<String>),
}

/// Memoizes parsed history per query so each git command runs at most once
/// per report, however many windows and blocks read it.
pub struct LogCache<S> {
    source: S,
    entries: HashMap<LogQuery, Vec<ChangeRecord>>,
}

impl<S: HistorySource> LogCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            entries: HashMap::new(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn records(&mut self, query: &LogQuery) -> &[ChangeRecord] {
        if !self.entries.contains_key(query) {
            let records: Vec<ChangeRecord> = match query {
                LogQuery::Log => parse_log(self.source.log().text()).collect(),
                LogQuery::Diff(range) => parse_diff(self.source.diff(range.as_deref()).text()).collect(),
            };
            debug!(?query, records = records.len(), "parsed history");
            self.entries.insert(query.clone(), records);
        }
        self.entries.get(query).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn log(&mut self) -> &[ChangeRecord] {
        self.records(&LogQuery::Log)
    }

    pub fn diff(&mut self, range: Option<&str>) -> &[ChangeRecord] {
        self.records(&LogQuery::Diff(range.map(str::to_string)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::LogOutput;
    use std::cell::Cell;

    struct CountingSource {
        log_calls: Cell<usize>,
        diff_calls: Cell<usize>,
    }

    impl HistorySource for CountingSource {
        fn log(&self) -> LogOutput {
            self.log_calls.set(self.log_calls.get() + 1);
            LogOutput::Text("A|2024-01-01\n1\t1\ta.py\n".to_string())
        }

        fn diff(&self, range: Option<&str>) -> LogOutput {
            self.diff_calls.set(self.diff_calls.get() + 1);
            match range {
                Some(_) => LogOutput::Text("3\t0\tb.md\n".to_string()),
                None => LogOutput::Unavailable("no work tree".to_string()),
            }
        }
    }

    #[test]
    fn each_query_hits_the_source_once() {
        let mut cache = LogCache::new(CountingSource {
            log_calls: Cell::new(0),
            diff_calls: Cell::new(0),
        });

        assert_eq!(cache.log().len(), 1);
        assert_eq!(cache.log().len(), 1);
        assert_eq!(cache.diff(Some("HEAD~1")).len(), 1);
        assert_eq!(cache.diff(Some("HEAD~1")).len(), 1);
        assert!(cache.diff(None).is_empty());

        assert_eq!(cache.source().log_calls.get(), 1);
        assert_eq!(cache.source().diff_calls.get(), 2);
    }
}
