//! Utility helpers shared by the Formwork crates: value presentation
//! (dates, numbers), terminal-safe text, and user configuration.

use std::path::PathBuf;

use dirs_next::home_dir;

pub mod config;
pub mod date_handling;
pub mod number_format;
pub mod text_processing;

pub use config::{ConfigError, Settings};
pub use text_processing::{sanitize_for_terminal, truncate_to_width};

/// Expands a leading `~` to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    let trimmed = path.trim();
    let home = || home_dir().unwrap_or_else(|| PathBuf::from("~"));
    if trimmed == "~" {
        return home();
    }
    match trimmed.strip_prefix("~/").or_else(|| trimmed.strip_prefix("~\\")) {
        Some(rest) => home().join(rest),
        None => PathBuf::from(trimmed),
    }
}
