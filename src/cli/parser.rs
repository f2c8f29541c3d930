use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface for rTimesheet
/// Contractor timesheet service over SQLite: HTTP API plus operator commands
#[derive(Parser)]
#[command(
    name = "rtimesheet",
    version = env!("CARGO_PKG_VERSION"),
    about = "Contractor timesheets: weekly hours, submission lifecycle and manager review",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the configuration file and the database schema
    Init,

    /// Run the HTTP API
    Serve {
        #[arg(long, value_name = "ADDR", help = "Listen address, e.g. 0.0.0.0:8787")]
        bind: Option<String>,
    },

    /// Show the effective configuration
    Config {
        #[arg(long = "print", help = "Print the effective configuration (secrets masked)")]
        print_config: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Manage managers
    Manager {
        #[command(subcommand)]
        action: ManagerAction,
    },

    /// Manage contractors
    Contractor {
        #[command(subcommand)]
        action: ContractorAction,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long)]
        compress: bool,
    },

    /// Export timesheet summaries
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE", help = "Absolute path of the output file")]
        file: String,

        #[arg(long, value_name = "ID", help = "Only timesheets of this contractor")]
        contractor: Option<i64>,

        #[arg(long, short = 'f')]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum ManagerAction {
    /// Register a manager by identity provider user id
    Add {
        #[arg(long = "clerk-id", value_name = "USER_ID")]
        clerk_id: String,
    },

    /// List managers
    List,
}

#[derive(Subcommand)]
pub enum ContractorAction {
    /// Register a contractor under a manager
    Add {
        #[arg(long = "clerk-id", value_name = "USER_ID")]
        clerk_id: String,

        #[arg(long, value_name = "MANAGER_ID")]
        manager: i64,

        #[arg(long, help = "Hourly rate")]
        rate: f64,

        #[arg(long = "approved-hours", help = "Approved hours per week")]
        approved_hours: i64,
    },

    /// Change rate and/or approved hours (existing timesheets are unaffected)
    Update {
        #[arg(long)]
        id: i64,

        #[arg(long)]
        rate: Option<f64>,

        #[arg(long = "approved-hours")]
        approved_hours: Option<i64>,
    },

    /// List contractors
    List {
        #[arg(long, value_name = "MANAGER_ID", help = "Only contractors of this manager")]
        manager: Option<i64>,
    },
}
