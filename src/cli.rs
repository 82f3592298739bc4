use crate::git::GitRepo;
use crate::report::BlockType;
use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::warn;

#[derive(Parser)]
#[command(name = "repopulse")]
#[command(about = "Turns git history into activity reports embedded in a README")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone)]
pub struct CommonArgs {
    #[arg(long, global = true, help = "Path to git repository")]
    pub repo: Option<PathBuf>,

    #[arg(long, global = true, help = "Document holding the stats blocks (default: README.md in the repository root)")]
    pub readme: Option<PathBuf>,

    #[arg(long, global = true, help = "Include merge commits")]
    pub include_merges: bool,

    #[arg(long, global = true, value_parser = crate::util::parse_instant, help = "Reference time for relative windows (RFC3339)")]
    pub now: Option<DateTime<Utc>>,

    #[arg(short, long, global = true, action = clap::ArgAction::Count, help = "Increase log verbosity")]
    pub verbose: u8,
}

impl CommonArgs {
    /// Falls back to the given (or current) directory when discovery fails;
    /// git then reports no history and the report degrades to placeholders.
    pub fn open_repo(&self, progress: bool) -> GitRepo {
        let repo = match GitRepo::open(self.repo.as_ref()) {
            Ok(repo) => repo,
            Err(e) => {
                warn!(error = %e, "could not discover git repository");
                let path = self.repo.clone().unwrap_or_else(|| PathBuf::from("."));
                GitRepo::at(path)
            }
        };
        repo.with_merges(self.include_merges).with_progress(progress)
    }

    pub fn document_path(&self, repo: &GitRepo) -> PathBuf {
        self.readme
            .clone()
            .unwrap_or_else(|| repo.path().join("README.md"))
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now.unwrap_or_else(Utc::now)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Regenerate the stats blocks and rewrite the document
    Update {
        #[arg(long, help = "Write the result here instead of over the document")]
        output: Option<PathBuf>,

        #[arg(long, help = "Print a diff of the changes without writing")]
        dry_run: bool,

        #[arg(long, help = "Append blocks whose markers are missing")]
        append_missing: bool,

        #[arg(long, value_delimiter = ',', help = "Blocks to update (default: sections.include from the config)")]
        blocks: Vec<BlockType>,
    },
    /// Print one rendered block, or the aggregated statistics as JSON
    Render {
        #[arg(help = "Block type (OVERVIEW, SUMMARY, LANGUAGE, COMMITS, PULSE, DIFF)")]
        block: Option<BlockType>,

        #[arg(long, help = "Output per-window statistics as JSON")]
        json: bool,
    },
    /// Print the parsed change records of the full history
    Parse {
        #[arg(long, help = "Output as NDJSON")]
        ndjson: bool,
    },
}

impl Commands {
    /// Whether stdout carries JSON that must stay parseable.
    pub fn machine_readable(&self) -> bool {
        matches!(
            self,
            Commands::Render { json: true, .. } | Commands::Parse { ndjson: true }
        )
    }
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        crate::logging::setup_logger(self.common.verbose, self.command.machine_readable());
        match self.command {
            Commands::Update { output, dry_run, append_missing, blocks } => {
                crate::update::exec(self.common, output, dry_run, append_missing, blocks)
            }
            Commands::Render { block, json } => crate::show::exec(self.common, block, json),
            Commands::Parse { ndjson } => crate::history::exec(self.common, ndjson),
        }
    }
}
