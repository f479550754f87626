//! One-shot snapshot: backend health plus the current prices, ratios and
//! configuration, printed as a table.

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use owo_colors::OwoColorize;

use crate::api::{Backend, HttpBackend, SnapshotData};
use crate::core::{format, Symbol};
use crate::data_paths::DataPaths;
use crate::logging::{init_logging, LogMode, LoggingConfig};

#[derive(Args, Clone)]
pub struct StatusArgs {
    /// Skip the backend health probe
    #[arg(long)]
    pub no_health: bool,
}

pub struct StatusCommand {
    args: StatusArgs,
}

impl StatusCommand {
    pub fn new(args: StatusArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, server_url: &str, data_paths: DataPaths, verbose: bool) -> Result<()> {
        init_logging(
            LoggingConfig::new(LogMode::ConsoleAndFile, data_paths)
                .with_default_filter(if verbose { "debug" } else { "info" }),
        )?;

        let backend = HttpBackend::new(server_url);

        if !self.args.no_health {
            match backend.health().await {
                Ok(health) => {
                    println!("Backend at {}: {}", backend.base_url(), health.status.bright_green());
                }
                Err(e) => {
                    println!(
                        "Backend at {}: {}",
                        backend.base_url(),
                        format!("unreachable ({e})").bright_red()
                    );
                }
            }
        }

        let snapshot = backend
            .fetch_data()
            .await
            .context("failed to fetch snapshot")?;
        print_snapshot(&snapshot);
        Ok(())
    }
}

fn price_for(snapshot: &SnapshotData, symbol: Symbol) -> Option<f64> {
    let row = snapshot.price_data.as_ref()?;
    match symbol {
        Symbol::Sbet => row.sbet(),
        Symbol::Bmnr => row.bmnr(),
    }
}

fn mnav_for(snapshot: &SnapshotData, symbol: Symbol) -> Option<f64> {
    let row = snapshot.mnav_data.as_ref()?;
    match symbol {
        Symbol::Sbet => row.sbet(),
        Symbol::Bmnr => row.bmnr(),
    }
}

/// Shared by the status and update commands.
pub(crate) fn print_snapshot(snapshot: &SnapshotData) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Symbol",
            "Price",
            "mNAV",
            "Shares outstanding",
            "ETH holdings",
        ]);

    for symbol in Symbol::ALL {
        let entry = snapshot.config_for(symbol);
        table.add_row(vec![
            symbol.as_str().to_string(),
            format::price(price_for(snapshot, symbol)),
            format::ratio(mnav_for(snapshot, symbol)),
            format::count_opt(entry.map(|e| e.shares_outstanding)),
            format::count_opt(entry.map(|e| e.eth_holdings)),
        ]);
    }
    println!("{table}");

    let eth = snapshot.price_data.as_ref().and_then(|row| row.eth());
    println!("ETH price: {}", format::price(eth).bright_cyan());

    if let Some(ts) = snapshot.price_data.as_ref().and_then(|row| row.timestamp()) {
        println!("As of:     {}", format::local_time(ts));
    }
}
