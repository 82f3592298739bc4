use crate::aggregate::{aggregate, pulse, window_report};
use crate::cache::LogCache;
use crate::config::Config;
use crate::document::{update_block, BlockUpdate, MatchMode, MissingPolicy};
use crate::error::ReportError;
use crate::git::HistorySource;
use crate::language::IgnoreSet;
use crate::model::{TimeWindow, WindowReport};
use crate::render::{self, ChartRenderer};
use crate::window::resolve_windows;
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockType {
    Overview,
    Summary,
    Language,
    Commits,
    Pulse,
    Diff,
}

impl BlockType {
    pub const ALL: [BlockType; 6] = [
        BlockType::Overview,
        BlockType::Summary,
        BlockType::Language,
        BlockType::Commits,
        BlockType::Pulse,
        BlockType::Diff,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BlockType::Overview => "OVERVIEW",
            BlockType::Summary => "SUMMARY",
            BlockType::Language => "LANGUAGE",
            BlockType::Commits => "COMMITS",
            BlockType::Pulse => "PULSE",
            BlockType::Diff => "DIFF",
        }
    }

    /// Parses a list of block names, dropping (and reporting) unknown ones
    /// and duplicates.
    pub fn parse_list<S: AsRef<str>>(names: &[S]) -> Vec<BlockType> {
        let mut blocks = Vec::new();
        for name in names {
            match name.as_ref().parse::<BlockType>() {
                Ok(block) if !blocks.contains(&block) => blocks.push(block),
                Ok(_) => {}
                Err(e) => warn!(error = %e, "skipping block"),
            }
        }
        blocks
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BlockType {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockType::ALL
            .iter()
            .copied()
            .find(|b| b.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ReportError::UnknownBlock(s.to_string()))
    }
}

/// One report run: configuration and windows fixed up front, history read
/// lazily and shared by every block.
pub struct Report<'c, S> {
    config: &'c Config,
    cache: LogCache<S>,
    windows: Vec<TimeWindow>,
    ignore: IgnoreSet,
}

impl<'c, S: HistorySource> Report<'c, S> {
    pub fn new(source: S, config: &'c Config, now: DateTime<Utc>) -> Self {
        let (ignore, unknown) = IgnoreSet::from_keys(config.languages.ignore.iter().map(String::as_str));
        for key in unknown {
            warn!(key = %key, "unknown language in ignore list");
        }
        Self {
            config,
            cache: LogCache::new(source),
            windows: resolve_windows(&config.timeframes, now),
            ignore,
        }
    }

    pub fn windows(&self) -> &[TimeWindow] {
        &self.windows
    }

    pub fn source(&self) -> &S {
        self.cache.source()
    }

    pub fn configured_blocks(&self) -> Vec<BlockType> {
        BlockType::parse_list(&self.config.sections.include)
    }

    pub fn window_reports(&mut self) -> Vec<WindowReport> {
        let records = self.cache.log();
        self.windows
            .iter()
            .map(|window| window_report(records, window, &self.ignore))
            .collect()
    }

    /// Renders one block. `None` means the block is switched off and its
    /// region should be left as it is.
    pub fn render_block(&mut self, block: BlockType, charts: &mut dyn ChartRenderer) -> Option<String> {
        let content = match block {
            BlockType::Overview => render::render_overview(&self.window_reports(), &self.config.contributors),
            BlockType::Summary => render::render_summary(&self.window_reports()),
            BlockType::Language => {
                if !self.config.languages.show_breakdown {
                    info!("language breakdown disabled, leaving block untouched");
                    return None;
                }
                render::render_languages(&self.window_reports(), charts)
            }
            BlockType::Commits => render::render_commits(&self.window_reports(), charts),
            BlockType::Pulse => render::render_pulse(&pulse(self.cache.log())),
            BlockType::Diff => {
                let range = self.config.diff.range.as_deref();
                let records = self.cache.diff(range);
                let stats = aggregate(records, &TimeWindow::all_time("Diff"), &self.ignore);
                render::render_diff(range, &stats)
            }
        };
        Some(content)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockOutcome {
    Updated,
    Appended,
    Missing,
    Disabled,
}

/// Renders each block and splices it into `document`. Blocks whose
/// markers are absent are skipped or appended according to `missing`.
pub fn apply_blocks<S: HistorySource>(
    report: &mut Report<'_, S>,
    document: &str,
    blocks: &[BlockType],
    charts: &mut dyn ChartRenderer,
    missing: MissingPolicy,
) -> (String, Vec<(BlockType, BlockOutcome)>) {
    let mut current = document.to_string();
    let mut outcomes = Vec::with_capacity(blocks.len());

    for &block in blocks {
        let Some(content) = report.render_block(block, charts) else {
            outcomes.push((block, BlockOutcome::Disabled));
            continue;
        };
        let outcome = match update_block(&current, block.name(), &content, MatchMode::First, missing) {
            BlockUpdate::Replaced { document, .. } => {
                current = document;
                BlockOutcome::Updated
            }
            BlockUpdate::Appended(document) => {
                current = document;
                BlockOutcome::Appended
            }
            BlockUpdate::Missing => BlockOutcome::Missing,
        };
        outcomes.push((block, outcome));
    }
    (current, outcomes)
}
