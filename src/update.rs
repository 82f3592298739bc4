use crate::cli::CommonArgs;
use crate::config::Config;
use crate::document::MissingPolicy;
use crate::error::ReportError;
use crate::render::{ChartRenderer, NoCharts, PngCharts};
use crate::report::{apply_blocks, BlockOutcome, BlockType, Report};
use crate::util::document_dir;
use console::style;
use similar::{ChangeTag, TextDiff};
use std::fs;
use std::path::PathBuf;
use tracing::info;

pub fn exec(
    common: CommonArgs,
    output: Option<PathBuf>,
    dry_run: bool,
    append_missing: bool,
    blocks: Vec<BlockType>,
) -> anyhow::Result<()> {
    let repo = common.open_repo(true);
    let path = common.document_path(&repo);
    let document = fs::read_to_string(&path).map_err(|source| ReportError::DocumentRead {
        path: path.clone(),
        source,
    })?;

    let config = Config::from_document(&document);
    let mut report = Report::new(repo, &config, common.now());
    let blocks = if blocks.is_empty() {
        report.configured_blocks()
    } else {
        blocks
    };
    info!(blocks = ?blocks, windows = report.windows().len(), "updating document");

    let mut charts: Box<dyn ChartRenderer> = if config.graphs.show && !dry_run {
        Box::new(PngCharts::new(&document_dir(&path), &config.graphs))
    } else {
        Box::new(NoCharts)
    };
    let missing = if append_missing {
        MissingPolicy::Append
    } else {
        MissingPolicy::Skip
    };

    let (updated, outcomes) = apply_blocks(&mut report, &document, &blocks, charts.as_mut(), missing);
    print_outcomes(&outcomes);

    let target = output.unwrap_or_else(|| path.clone());
    if dry_run {
        print_diff(&document, &updated);
        return Ok(());
    }
    if updated == document && target == path {
        println!("{} {} is up to date", style("✔").green(), path.display());
        return Ok(());
    }
    fs::write(&target, &updated).map_err(|source| ReportError::DocumentWrite {
        path: target.clone(),
        source,
    })?;
    println!("{} wrote {}", style("✔").green(), target.display());
    Ok(())
}

fn print_outcomes(outcomes: &[(BlockType, BlockOutcome)]) {
    for (block, outcome) in outcomes {
        let status = match outcome {
            BlockOutcome::Updated => style("updated").green(),
            BlockOutcome::Appended => style("appended").cyan(),
            BlockOutcome::Missing => style("no markers, skipped").yellow(),
            BlockOutcome::Disabled => style("disabled").dim(),
        };
        println!("{:<10} {}", style(block.name()).bold(), status);
    }
}

fn print_diff(before: &str, after: &str) {
    if before == after {
        println!("No changes");
        return;
    }
    let diff = TextDiff::from_lines(before, after);
    for change in diff.iter_all_changes() {
        let line = change.to_string_lossy();
        match change.tag() {
            ChangeTag::Delete => print!("{}", style(format!("-{line}")).red()),
            ChangeTag::Insert => print!("{}", style(format!("+{line}")).green()),
            ChangeTag::Equal => {}
        }
        if change.missing_newline() {
            println!();
        }
    }
}
