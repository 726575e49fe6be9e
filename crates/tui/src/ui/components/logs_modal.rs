//! Scrollable view of the in-app log ring.

use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Clear, Paragraph},
};
use tracing::Level;

use super::component::Component;
use crate::app::{App, Effect};
use crate::ui::theme::{Theme, theme_helpers as th};

#[derive(Debug, Default)]
pub struct LogsModal {
    /// Lines scrolled up from the newest entry.
    from_bottom: usize,
}

fn level_style(theme: &dyn Theme, level: Level) -> ratatui::style::Style {
    match level {
        Level::ERROR => theme.status_error(),
        Level::WARN => theme.status_warning(),
        Level::INFO => theme.status_info(),
        _ => theme.text_muted_style(),
    }
}

impl Component for LogsModal {
    fn handle_key_events(&mut self, _app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('L') => return vec![Effect::CloseModal],
            KeyCode::Up | KeyCode::Char('k') => self.from_bottom = self.from_bottom.saturating_add(1),
            KeyCode::Down | KeyCode::Char('j') => self.from_bottom = self.from_bottom.saturating_sub(1),
            KeyCode::PageUp => self.from_bottom = self.from_bottom.saturating_add(10),
            KeyCode::PageDown => self.from_bottom = self.from_bottom.saturating_sub(10),
            KeyCode::End => self.from_bottom = 0,
            _ => {}
        }
        Vec::new()
    }

    fn handle_mouse_events(&mut self, _app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        match mouse.kind {
            MouseEventKind::ScrollUp => self.from_bottom = self.from_bottom.saturating_add(1),
            MouseEventKind::ScrollDown => self.from_bottom = self.from_bottom.saturating_sub(1),
            _ => {}
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let theme = &*app.theme;
        let title = format!(" Logs ({}) ", app.logs.len());
        let block = th::block(theme, Some(title.as_str()), true);
        let inner = block.inner(rect);
        frame.render_widget(Clear, rect);
        frame.render_widget(block, rect);

        let lines = app.logs.snapshot();
        if lines.is_empty() {
            frame.render_widget(Paragraph::new("No log entries yet.").style(theme.text_muted_style()), inner);
            return;
        }
        let height = usize::from(inner.height);
        self.from_bottom = self.from_bottom.min(lines.len().saturating_sub(height));
        let end = lines.len() - self.from_bottom;
        let start = end.saturating_sub(height);
        let rendered: Vec<Line> = lines[start..end]
            .iter()
            .map(|line| {
                Line::from(vec![
                    Span::styled(line.timestamp.format("%H:%M:%S ").to_string(), theme.text_muted_style()),
                    Span::styled(format!("{:<5} ", line.level), level_style(theme, line.level)),
                    Span::styled(
                        formwork_util::sanitize_for_terminal(&line.message).into_owned(),
                        theme.text_primary_style(),
                    ),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(rendered), inner);
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'static>> {
        th::build_hint_spans(&*app.theme, &[("↑/↓", " Scroll  "), ("End", " Newest  "), ("Esc", " Close")])
    }
}
