use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::log;
use crate::db::migrate::latest_version;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{detail, info, success, warning};

/// Handle the `init` command
///
/// Creates the config directory and file (skipped in test mode), the SQLite
/// database file and applies every pending migration.
pub fn handle(cli: &Cli) -> AppResult<()> {
    let db_path = Config::init_all(cli.db.clone(), cli.test)?;
    let db_path = db_path.to_string_lossy().to_string();

    info("Initializing rTimesheet…");
    detail("Config file", Config::config_file().display());
    detail("Database", &db_path);

    let pool = DbPool::new(&db_path)?;
    let applied = init_db(&pool.conn)?;
    for version in &applied {
        detail("Migration applied", version);
    }
    detail("Schema version", latest_version());

    if let Err(e) = log::ttlog(
        &pool.conn,
        "init",
        "Database initialized",
        &format!("Database initialized at {db_path}"),
    ) {
        warning(format!("Failed to write internal log: {e}"));
    }

    success(format!("Database initialized at {db_path}"));
    Ok(())
}
