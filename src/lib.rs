//! rTimesheet library root.
//! Exposes the HTTP API, the client-side cache, the CLI parser and the
//! high-level run() function.

pub mod api;
pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Serve { .. } => cli::commands::serve::handle(&cli.command, cfg),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
        Commands::Manager { .. } => cli::commands::manager::handle(&cli.command, cfg),
        Commands::Contractor { .. } => cli::commands::contractor::handle(&cli.command, cfg),
        Commands::Backup { .. } => cli::commands::backup::handle(&cli.command, cfg),
        Commands::Export { .. } => cli::commands::export::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // file + environment, then --db
    let mut cfg = Config::load()?;
    if let Some(custom_db) = &cli.db {
        cfg.database = Some(
            Config::resolve_database(custom_db)
                .to_string_lossy()
                .to_string(),
        );
    }

    dispatch(&cli, &cfg)
}
