//! Terminal output helpers for the operator CLI.
//! Colours are dropped when `NO_COLOR` is set.

use ansi_term::{Colour, Style};
use std::fmt;

const ICON_INFO: &str = "ℹ️";
const ICON_OK: &str = "✅";
const ICON_WARN: &str = "⚠️";
const ICON_ERR: &str = "❌";

fn colour_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

fn tag(colour: Colour, icon: &str) -> String {
    if colour_enabled() {
        colour.bold().paint(icon).to_string()
    } else {
        icon.to_string()
    }
}

pub fn info<T: fmt::Display>(msg: T) {
    println!("{} {}", tag(Colour::Blue, ICON_INFO), msg);
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{} {}", tag(Colour::Green, ICON_OK), msg);
}

pub fn warning<T: fmt::Display>(msg: T) {
    println!("{} {}", tag(Colour::Yellow, ICON_WARN), msg);
}

pub fn error<T: fmt::Display>(msg: T) {
    eprintln!("{} {}", tag(Colour::Red, ICON_ERR), msg);
}

/// Section title followed by a rule as wide as the title.
pub fn header<T: fmt::Display>(msg: T) {
    let title = msg.to_string();
    let rule = "─".repeat(title.chars().count().max(8));
    if colour_enabled() {
        let style = Style::new().bold();
        println!("{}\n{}", style.paint(title), rule);
    } else {
        println!("{title}\n{rule}");
    }
}

/// `label: value` line, label dimmed.
pub fn detail<T: fmt::Display>(label: &str, value: T) {
    if colour_enabled() {
        println!("  {} {}", Style::new().dimmed().paint(format!("{label}:")), value);
    } else {
        println!("  {label}: {value}");
    }
}
