use crate::cache::LogCache;
use crate::cli::CommonArgs;
use crate::model::ChangeRecord;
use console::style;

const TABLE_LIMIT: usize = 50;

pub fn exec(common: CommonArgs, ndjson: bool) -> anyhow::Result<()> {
    let mut cache = LogCache::new(common.open_repo(!ndjson));
    let records = cache.log();

    if ndjson {
        output_ndjson(records)
    } else {
        output_table(records);
        Ok(())
    }
}

fn output_ndjson(records: &[ChangeRecord]) -> anyhow::Result<()> {
    for r in records {
        println!("{}", serde_json::to_string(r)?);
    }
    Ok(())
}

fn output_table(records: &[ChangeRecord]) {
    if records.is_empty() {
        println!("No history to display");
        return;
    }
    println!(
        "{:<24} {:<10} {:>7} {:>7} {:<10} {}",
        style("Author").bold(),
        style("Date").bold(),
        style("Added").bold(),
        style("Deleted").bold(),
        style("Language").bold(),
        style("Path").bold()
    );
    println!("{}", "─".repeat(80));
    for r in records.iter().take(TABLE_LIMIT) {
        let date = r
            .commit_date
            .map_or_else(|| "-".to_string(), |d| d.format("%Y-%m-%d").to_string());
        println!(
            "{:<24} {:<10} {:>7} {:>7} {:<10} {}",
            r.author,
            date,
            style(r.lines_added).green(),
            style(r.lines_deleted).red(),
            r.category(),
            r.path
        );
    }
    if records.len() > TABLE_LIMIT {
        println!("\n... and {} more records", records.len() - TABLE_LIMIT);
    }
}
