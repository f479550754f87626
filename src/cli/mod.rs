//! CLI module for mnav-watch
//!
//! Argument parsing via clap, with a structured command pattern: each
//! subcommand owns its args struct and an execute method.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

use crate::data_paths::{DataPaths, DEFAULT_DATA_DIR};
use commands::dashboard::{DashboardArgs, DashboardCommand};
use commands::history::{HistoryArgs, HistoryCommand};
use commands::set_config::{SetConfigArgs, SetConfigCommand};
use commands::status::{StatusArgs, StatusCommand};
use commands::update::{UpdateArgs, UpdateCommand};

/// Default backend base URL (a locally running tracker)
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

#[derive(Parser)]
#[command(name = "mnav-watch")]
#[command(version)]
#[command(about = "Terminal client for the SBET/BMNR mNAV tracker", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend base URL (falls back to MNAV_SERVER_URL, then the default)
    #[arg(long, global = true)]
    pub server_url: Option<String>,

    /// Data directory path (default: ./data)
    #[arg(long, global = true, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the interactive dashboard
    Dashboard(DashboardArgs),

    /// Print the current snapshot and backend health
    Status(StatusArgs),

    /// Trigger a server-side recomputation, then print the result
    Update(UpdateArgs),

    /// Validate and submit one symbol's configuration
    SetConfig(SetConfigArgs),

    /// Print historical price and mNAV rows
    History(HistoryArgs),
}

impl Cli {
    /// Resolve the backend URL: flag, then environment, then default
    pub fn resolve_server_url(&self) -> String {
        self.server_url
            .clone()
            .or_else(|| std::env::var("MNAV_SERVER_URL").ok())
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string())
    }

    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let server_url = self.resolve_server_url();
        let data_paths = DataPaths::new(&self.data_dir);

        // Ensure all directories exist
        data_paths.ensure_directories()?;

        let verbose = self.verbose > 0;
        match self.command {
            Commands::Dashboard(args) => {
                DashboardCommand::new(args)
                    .execute(&server_url, data_paths, verbose)
                    .await
            }
            Commands::Status(args) => {
                StatusCommand::new(args)
                    .execute(&server_url, data_paths, verbose)
                    .await
            }
            Commands::Update(args) => {
                UpdateCommand::new(args)
                    .execute(&server_url, data_paths, verbose)
                    .await
            }
            Commands::SetConfig(args) => {
                SetConfigCommand::new(args)
                    .execute(&server_url, data_paths, verbose)
                    .await
            }
            Commands::History(args) => {
                HistoryCommand::new(args)
                    .execute(&server_url, data_paths, verbose)
                    .await
            }
        }
    }
}
