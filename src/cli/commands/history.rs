//! Print the backend's accumulated historical price and mNAV rows.

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use owo_colors::OwoColorize;

use crate::api::{Backend, HttpBackend};
use crate::core::format;
use crate::data_paths::DataPaths;
use crate::logging::{init_logging, LogMode, LoggingConfig};

#[derive(Args, Clone)]
pub struct HistoryArgs {
    /// Maximum number of most recent rows to show
    #[arg(long, short = 'n', default_value = "20")]
    pub limit: usize,
}

pub struct HistoryCommand {
    args: HistoryArgs,
}

impl HistoryCommand {
    pub fn new(args: HistoryArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, server_url: &str, data_paths: DataPaths, verbose: bool) -> Result<()> {
        init_logging(
            LoggingConfig::new(LogMode::ConsoleAndFile, data_paths)
                .with_default_filter(if verbose { "debug" } else { "info" }),
        )?;

        let backend = HttpBackend::new(server_url);
        let rows = backend
            .historical_data()
            .await
            .context("failed to fetch historical data")?;

        if rows.is_empty() {
            println!("{}", "No historical data yet".bright_yellow());
            return Ok(());
        }

        let start = rows.len().saturating_sub(self.args.limit);
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                "Time",
                "SBET",
                "BMNR",
                "ETH",
                "SBET mNAV",
                "BMNR mNAV",
            ]);

        for row in &rows[start..] {
            table.add_row(vec![
                format::local_time(&row.0),
                format::price(row.1),
                format::price(row.2),
                format::price(row.3),
                format::ratio(row.4),
                format::ratio(row.5),
            ]);
        }
        println!("{table}");
        println!("{} of {} rows shown", rows.len() - start, rows.len());
        Ok(())
    }
}
