//! Validate and submit one symbol's configuration from the command line.
//! Same semantics as the dashboard form: strictly positive numbers only,
//! and a shadow copy is written after the server confirms.

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use clap::Args;
use owo_colors::OwoColorize;

use super::status::print_snapshot;
use crate::api::{Backend, ConfigUpdateRequest, HttpBackend};
use crate::core::{parse_positive_pair, Symbol};
use crate::data_paths::DataPaths;
use crate::logging::{init_logging, LogMode, LoggingConfig};
use crate::store::{ShadowConfig, ShadowStore};

#[derive(Args, Clone)]
pub struct SetConfigArgs {
    /// Ticker symbol (SBET or BMNR)
    pub symbol: String,

    /// New shares outstanding
    #[arg(long)]
    pub shares: String,

    /// New ETH holdings
    #[arg(long)]
    pub eth: String,
}

pub struct SetConfigCommand {
    args: SetConfigArgs,
}

impl SetConfigCommand {
    pub fn new(args: SetConfigArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, server_url: &str, data_paths: DataPaths, verbose: bool) -> Result<()> {
        init_logging(
            LoggingConfig::new(LogMode::ConsoleAndFile, data_paths.clone())
                .with_default_filter(if verbose { "debug" } else { "info" }),
        )?;

        let symbol: Symbol = self.args.symbol.parse().map_err(|e: String| anyhow!(e))?;
        // Validation failures never reach the network.
        let (shares, eth) =
            parse_positive_pair(&self.args.shares, &self.args.eth).map_err(|e| anyhow!(e))?;

        let backend = HttpBackend::new(server_url);
        let request = ConfigUpdateRequest {
            symbol,
            shares_outstanding: shares,
            eth_holdings: eth,
        };

        let ack = match backend.update_config(&request).await {
            Ok(ack) => ack,
            Err(e) => {
                if e.is_unknown_symbol() {
                    eprintln!(
                        "{}",
                        "Backend does not recognize this symbol; check the server configuration"
                            .bright_red()
                    );
                }
                return Err(e).context("config update failed");
            }
        };

        println!(
            "{}",
            format!("{symbol} configuration saved, mNAV recalculated").bright_green()
        );

        let store = ShadowStore::new(data_paths.cache())?;
        store.save(&ShadowConfig {
            symbol,
            shares_outstanding: shares,
            eth_holdings: eth,
            saved_at: Utc::now(),
        })?;

        if let Some(data) = ack.latest_data {
            print_snapshot(&data);
        }
        Ok(())
    }
}
