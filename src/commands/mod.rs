use clap::ValueEnum;

mod config_cmd;
mod ingredient;
mod notification;
mod record;
mod reset;
mod summary;

pub use config_cmd::ConfigCommand;
pub use ingredient::IngredientCommand;
pub use notification::NotificationCommand;
pub use record::{AddArgs, DeleteArgs, ListArgs, ShowArgs, UpdateArgs};
pub use reset::ResetArgs;
pub use summary::SummaryArgs;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Truncates `s` to `width` characters, marking the cut with "...".
pub(crate) fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let kept: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        s.to_string()
    }
}
