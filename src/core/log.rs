use crate::db::log::{LogEntry, load_log};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use ansi_term::Colour;

const OP_WIDTH: usize = 48;

fn colour_for_operation(op: &str) -> Colour {
    match op {
        "init" => Colour::RGB(255, 153, 51),
        "migration_applied" => Colour::Purple,
        "backup" => Colour::Blue,
        "export" => Colour::Cyan,
        op if op.ends_with("_add") => Colour::Green,
        op if op.ends_with("_update") => Colour::Yellow,
        _ => Colour::White,
    }
}

/// `operation (target)`, cut to `OP_WIDTH` visible characters, operation coloured.
fn render_operation(entry: &LogEntry) -> String {
    let plain = if entry.target.is_empty() {
        entry.operation.clone()
    } else {
        format!("{} ({})", entry.operation, entry.target)
    };

    let visible = if plain.chars().count() > OP_WIDTH {
        let mut s: String = plain.chars().take(OP_WIDTH - 3).collect();
        s.push_str("...");
        s
    } else {
        plain
    };

    let colour = colour_for_operation(&entry.operation);
    let painted = match visible.split_once(' ') {
        Some((op, rest)) => format!("{} {}", colour.paint(op), rest),
        None => colour.paint(visible.as_str()).to_string(),
    };

    let pad = OP_WIDTH.saturating_sub(visible.chars().count());
    format!("{painted}{}", " ".repeat(pad))
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(pool: &mut DbPool) -> AppResult<usize> {
        let entries = load_log(&pool.conn)?;

        let id_w = entries
            .iter()
            .map(|e| e.id.to_string().len())
            .max()
            .unwrap_or(1);

        println!("📜 Internal log:\n");
        for e in &entries {
            let date = chrono::DateTime::parse_from_rfc3339(&e.date)
                .map(|dt| dt.format("%F %T%:z").to_string())
                .unwrap_or_else(|_| e.date.clone());
            println!(
                "{:>id_w$}: {} | {} => {}",
                e.id,
                date,
                render_operation(e),
                e.message,
                id_w = id_w
            );
        }
        Ok(entries.len())
    }
}
