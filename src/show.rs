use crate::cli::CommonArgs;
use crate::config::Config;
use crate::error::ReportError;
use crate::model::{ReportOutput, SCHEMA_VERSION};
use crate::render::NoCharts;
use crate::report::{BlockType, Report};
use anyhow::Context;
use chrono::Utc;
use std::fs;
use std::io::ErrorKind;
use tracing::info;

pub fn exec(common: CommonArgs, block: Option<BlockType>, json: bool) -> anyhow::Result<()> {
    let repo = common.open_repo(false);
    let path = common.document_path(&repo);
    let config = match fs::read_to_string(&path) {
        Ok(document) => Config::from_document(&document),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!(path = %path.display(), "document not found, using default config");
            Config::default()
        }
        Err(source) => return Err(ReportError::DocumentRead { path, source }.into()),
    };

    let repository_path = repo.path().to_string_lossy().to_string();
    let mut report = Report::new(repo, &config, common.now());

    if json {
        let output = ReportOutput {
            version: SCHEMA_VERSION,
            generated_at: Utc::now(),
            repository_path,
            windows: report.window_reports(),
        };
        let json = serde_json::to_string_pretty(&output).context("serializing report")?;
        println!("{json}");
        return Ok(());
    }

    let blocks = match block {
        Some(block) => vec![block],
        None => report.configured_blocks(),
    };
    for block in blocks {
        match report.render_block(block, &mut NoCharts) {
            Some(content) => println!("{}", content.trim_end()),
            None => println!("{block} is disabled in the config"),
        }
        println!();
    }
    Ok(())
}
