//! Theme styling for the TUI.
//!
//! Components never hard-code colors; they ask the active [`Theme`] for a
//! semantic role or use one of the builders in [`theme_helpers`].

use std::env;

use tracing::debug;

pub mod nord;
pub mod roles;
pub mod theme_helpers;

pub use nord::{NordTheme, NordThemeHighContrast};
pub use roles::Theme;

/// Environment variable selecting the palette (`nord` or `nord-high-contrast`).
pub const THEME_ENV: &str = "FORMWORK_TUI_THEME";

/// Pick the theme named by [`THEME_ENV`], falling back to Nord.
pub fn load_from_env() -> Box<dyn Theme> {
    let requested = env::var(THEME_ENV).unwrap_or_default();
    by_name(requested.trim()).unwrap_or_else(|| {
        if !requested.trim().is_empty() {
            debug!(theme = %requested, "unknown theme; using nord");
        }
        Box::new(NordTheme::new())
    })
}

fn by_name(name: &str) -> Option<Box<dyn Theme>> {
    match name.to_ascii_lowercase().as_str() {
        "nord" => Some(Box::new(NordTheme::new())),
        "nord-high-contrast" | "nord_high_contrast" | "high-contrast" => Some(Box::new(NordThemeHighContrast::new())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_names_resolve_case_insensitively() {
        assert!(by_name("NORD").is_some());
        assert!(by_name("high-contrast").is_some());
        assert!(by_name("dracula").is_none());
    }
}
