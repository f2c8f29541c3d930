use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{detail, header, warning};

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config { print_config } = cmd {
        if !*print_config {
            warning("Nothing to do: pass --print");
            return Ok(());
        }

        let path = Config::config_file();
        header("Current configuration");
        detail("File", path.display());
        if !path.exists() {
            warning("Config file not found, showing defaults and environment");
        }
        println!();
        print!("{}", serde_yaml::to_string(&cfg.masked())?);
    }

    Ok(())
}
