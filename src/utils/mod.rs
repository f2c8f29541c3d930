pub mod date;
pub mod formatting;
pub mod slug;

pub use formatting::{format_currency, format_hours};
