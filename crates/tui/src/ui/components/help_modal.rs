//! Key reference.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    text::Span,
    widgets::{Clear, Row, Table},
};

use super::component::Component;
use crate::app::{App, Effect};
use crate::ui::theme::theme_helpers as th;

const BINDINGS: &[(&str, &str)] = &[
    ("↑/↓ j/k", "Move between records"),
    ("Enter", "Show the record's details"),
    ("m / Space", "Open the row menu"),
    ("/", "Search all fields"),
    ("s", "Cycle the sort column"),
    ("n", "Create a record"),
    ("e", "Edit the highlighted record"),
    ("d", "Delete the highlighted record"),
    ("Tab", "Move between list and details"),
    ("←/→", "Switch detail tabs"),
    ("p", "Toggle draft/published layout"),
    ("o", "Next object"),
    ("r", "Reload records"),
    ("L", "Show logs"),
    ("q / Ctrl+C", "Quit"),
];

#[derive(Debug, Default)]
pub struct HelpModal;

impl Component for HelpModal {
    fn handle_key_events(&mut self, _app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Enter => vec![Effect::CloseModal],
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let theme = &*app.theme;
        let rows = BINDINGS.iter().map(|(keys, description)| {
            Row::new(vec![
                Span::styled(*keys, theme.accent_emphasis_style()),
                Span::styled(*description, theme.text_primary_style()),
            ])
        });
        let table = Table::new(rows, [Constraint::Length(14), Constraint::Fill(1)])
            .block(th::block(theme, Some(" Keys "), true))
            .column_spacing(2);
        frame.render_widget(Clear, rect);
        frame.render_widget(table, rect);
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'static>> {
        th::build_hint_spans(&*app.theme, &[("Esc", " Close")])
    }
}
