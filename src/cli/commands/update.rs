//! Trigger a server-side recomputation and print the refreshed snapshot.

use anyhow::{Context, Result};
use clap::Args;
use owo_colors::OwoColorize;

use super::status::print_snapshot;
use crate::api::{Backend, HttpBackend};
use crate::data_paths::DataPaths;
use crate::logging::{init_logging, LogMode, LoggingConfig};

#[derive(Args, Clone)]
pub struct UpdateArgs {}

pub struct UpdateCommand {
    _args: UpdateArgs,
}

impl UpdateCommand {
    pub fn new(args: UpdateArgs) -> Self {
        Self { _args: args }
    }

    pub async fn execute(&self, server_url: &str, data_paths: DataPaths, verbose: bool) -> Result<()> {
        init_logging(
            LoggingConfig::new(LogMode::ConsoleAndFile, data_paths)
                .with_default_filter(if verbose { "debug" } else { "info" }),
        )?;

        let backend = HttpBackend::new(server_url);

        println!("Triggering manual update...");
        backend
            .manual_update()
            .await
            .context("manual update failed")?;
        println!("{}", "Update complete".bright_green());

        let snapshot = backend
            .fetch_data()
            .await
            .context("failed to fetch snapshot after update")?;
        print_snapshot(&snapshot);
        Ok(())
    }
}
