use crate::cli::parser::{Commands, ManagerAction};
use crate::config::Config;
use crate::core::users::UserLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{header, info, success};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Manager { action } = cmd else {
        return Ok(());
    };
    let mut pool = DbPool::new(&cfg.database_path())?;

    match action {
        ManagerAction::Add { clerk_id } => {
            let m = UserLogic::add_manager(&mut pool, clerk_id)?;
            success(format!("Manager {} created for {}", m.id, m.clerk_id));
        }
        ManagerAction::List => {
            let managers = UserLogic::list_managers(&mut pool)?;
            if managers.is_empty() {
                info("No managers registered.");
                return Ok(());
            }
            header("Managers");
            for m in managers {
                println!("{:>4}  {}", m.id, m.clerk_id);
            }
        }
    }
    Ok(())
}
