use crate::cli::parser::{Commands, ContractorAction};
use crate::config::Config;
use crate::core::users::UserLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{header, info, success};
use crate::utils::formatting::{format_currency, format_hours, pad_left, pad_right};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Contractor { action } = cmd else {
        return Ok(());
    };
    let mut pool = DbPool::new(&cfg.database_path())?;

    match action {
        ContractorAction::Add {
            clerk_id,
            manager,
            rate,
            approved_hours,
        } => {
            let c = UserLogic::add_contractor(&mut pool, clerk_id, *manager, *rate, *approved_hours)?;
            success(format!(
                "Contractor {} created for {} (manager {})",
                c.id, c.clerk_id, c.manager_id
            ));
        }
        ContractorAction::Update {
            id,
            rate,
            approved_hours,
        } => {
            let c = UserLogic::update_contractor(&mut pool, *id, *rate, *approved_hours)?;
            success(format!(
                "Contractor {} updated: rate {}/h, {}h approved per week",
                c.id,
                format_currency(c.rate),
                c.approved_hours
            ));
        }
        ContractorAction::List { manager } => {
            let contractors = UserLogic::list_contractors(&mut pool, *manager)?;
            if contractors.is_empty() {
                info("No contractors registered.");
                return Ok(());
            }
            header("Contractors");
            println!(
                "{}  {}  {}  {}  {}",
                pad_left("ID", 4),
                pad_right("USER", 24),
                pad_left("MANAGER", 7),
                pad_left("RATE", 10),
                pad_left("HOURS", 6)
            );
            for c in contractors {
                println!(
                    "{}  {}  {}  {}  {}",
                    pad_left(&c.id.to_string(), 4),
                    pad_right(&c.clerk_id, 24),
                    pad_left(&c.manager_id.to_string(), 7),
                    pad_left(&format_currency(c.rate), 10),
                    pad_left(&format_hours(c.approved_hours as f64), 6)
                );
            }
        }
    }
    Ok(())
}
