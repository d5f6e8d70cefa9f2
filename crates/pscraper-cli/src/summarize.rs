//! `pscraper summarize`: dealer and manufacturer statistics over a JSON Lines
//! master table, printed as pretty JSON.

use std::io::{self, Write};
use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;
use pscraper_core::{parse_master_table, Summary};

pub(crate) fn run_summarize(input: &Path, today: Option<NaiveDate>) -> anyhow::Result<()> {
    let today = today.unwrap_or_else(|| chrono::Local::now().date_naive());
    let summary = summarize_file(input, today)?;

    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &summary).context("failed to write summary")?;
    writeln!(stdout)?;
    Ok(())
}

pub(crate) fn summarize_file(input: &Path, today: NaiveDate) -> anyhow::Result<Summary> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let rows = parse_master_table(&text)?;
    tracing::info!(rows = rows.len(), %today, "master table loaded");
    Ok(Summary::build(&rows, today))
}
