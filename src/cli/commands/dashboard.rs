//! Run the interactive dashboard.

use anyhow::Result;
use clap::Args;
use std::sync::Arc;
use std::time::Duration;

use crate::api::HttpBackend;
use crate::data_paths::DataPaths;
use crate::logging::{init_logging, LogMode, LoggingConfig};
use crate::store::ShadowStore;
use crate::tui;

#[derive(Args, Clone)]
pub struct DashboardArgs {
    /// Auto-refresh interval in seconds
    #[arg(long, default_value = "300")]
    pub interval: u64,
}

pub struct DashboardCommand {
    args: DashboardArgs,
}

impl DashboardCommand {
    pub fn new(args: DashboardArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, server_url: &str, data_paths: DataPaths, verbose: bool) -> Result<()> {
        // The terminal belongs to ratatui; logs go to the session file.
        init_logging(
            LoggingConfig::new(LogMode::FileOnly, data_paths.clone())
                .with_default_filter(if verbose { "debug" } else { "info" }),
        )?;

        let backend = Arc::new(HttpBackend::new(server_url));
        let store = ShadowStore::new(data_paths.cache())?;

        tui::run(backend, store, Duration::from_secs(self.args.interval)).await
    }
}
