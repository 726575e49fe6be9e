use std::fmt::Debug;

use formwork_engine::Tone;
use formwork_types::Severity;
use ratatui::style::{Color, Modifier, Style};

/// Semantic color roles for the record view.
#[derive(Debug, Clone)]
pub struct ThemeRoles {
    pub background: Color,
    pub surface: Color,
    pub surface_muted: Color,
    pub border: Color,
    pub divider: Color,

    pub text: Color,
    pub text_secondary: Color,
    pub text_muted: Color,

    pub accent: Color,
    /// Foreground of non-destructive buttons.
    pub action: Color,

    pub info: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,

    /// Keyboard cursor in tables and menus.
    pub cursor_bg: Color,
    pub cursor_fg: Color,
    pub focus: Color,
    /// Row whose record is open in the detail panel.
    pub open_record: Color,

    /// Glyph color for boolean `true`.
    pub affirmative: Color,
    /// Glyph color for boolean `false`.
    pub negative: Color,
    /// Absent values ("N/A", "—").
    pub placeholder: Color,

    /// Backdrop painted behind dialogs.
    pub modal_bg: Color,
    pub menu_bg: Color,

    pub row_even: Color,
    pub row_odd: Color,
}

pub trait Theme: Send + Sync + Debug {
    fn roles(&self) -> &ThemeRoles;

    fn text_primary_style(&self) -> Style {
        Style::default().fg(self.roles().text)
    }
    fn text_secondary_style(&self) -> Style {
        Style::default().fg(self.roles().text_secondary)
    }
    fn text_muted_style(&self) -> Style {
        Style::default().fg(self.roles().text_muted)
    }

    fn border_style(&self, focused: bool) -> Style {
        let color = if focused { self.roles().focus } else { self.roles().border };
        Style::default().fg(color)
    }

    fn cursor_style(&self) -> Style {
        Style::default().fg(self.roles().cursor_fg).bg(self.roles().cursor_bg)
    }

    /// Master-detail highlight for the record shown in the detail panel.
    fn open_record_style(&self) -> Style {
        Style::default().fg(self.roles().open_record).add_modifier(Modifier::BOLD)
    }

    fn modal_background_style(&self) -> Style {
        Style::default().bg(self.roles().modal_bg)
    }

    fn menu_style(&self) -> Style {
        Style::default().bg(self.roles().menu_bg).fg(self.roles().text)
    }

    fn status_info(&self) -> Style {
        Style::default().fg(self.roles().info)
    }
    fn status_success(&self) -> Style {
        Style::default().fg(self.roles().success)
    }
    fn status_warning(&self) -> Style {
        Style::default().fg(self.roles().warning)
    }
    fn status_error(&self) -> Style {
        Style::default().fg(self.roles().error)
    }

    fn severity_style(&self, severity: Severity) -> Style {
        match severity {
            Severity::Info => self.status_info(),
            Severity::Success => self.status_success(),
            Severity::Warning => self.status_warning(),
            Severity::Error => self.status_error(),
        }
    }

    /// Style for the ✓/✗ glyph in front of a boolean value.
    fn glyph_style(&self, tone: Tone) -> Style {
        match tone {
            Tone::Affirmative => Style::default().fg(self.roles().affirmative),
            Tone::Negative => Style::default().fg(self.roles().negative),
            Tone::Plain | Tone::Placeholder => self.text_primary_style(),
        }
    }

    /// Style for a formatted field value.
    fn value_style(&self, tone: Tone) -> Style {
        match tone {
            Tone::Placeholder => Style::default().fg(self.roles().placeholder),
            Tone::Plain | Tone::Affirmative | Tone::Negative => self.text_primary_style(),
        }
    }

    fn accent_emphasis_style(&self) -> Style {
        Style::default().fg(self.roles().accent).add_modifier(Modifier::BOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::theme::NordTheme;

    #[test]
    fn tones_map_to_their_roles() {
        let theme = NordTheme::new();
        let roles = theme.roles();
        assert_eq!(theme.glyph_style(Tone::Affirmative).fg, Some(roles.affirmative));
        assert_eq!(theme.glyph_style(Tone::Negative).fg, Some(roles.negative));
        assert_eq!(theme.value_style(Tone::Placeholder).fg, Some(roles.placeholder));
        assert_eq!(theme.value_style(Tone::Affirmative).fg, Some(roles.text));
    }
}
