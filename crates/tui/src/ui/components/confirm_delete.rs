//! Delete confirmation dialog.

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use formwork_engine::record_title;
use formwork_types::Severity;
use formwork_util::sanitize_for_terminal;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    text::{Line, Span},
    widgets::{Clear, Paragraph, Wrap},
};

use super::component::Component;
use crate::app::{App, Effect};
use crate::ui::theme::theme_helpers::{block_with_severity, build_hint_spans, render_button};

const BUTTON_WIDTH: u16 = 12;
const BUTTON_GAP: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Choice {
    #[default]
    Cancel,
    Delete,
}

#[derive(Debug, Default, Clone)]
pub struct ConfirmDeleteModal {
    focused: Choice,
    button_areas: Vec<(Choice, Rect)>,
}

impl ConfirmDeleteModal {
    fn choose(app: &mut App, choice: Choice) -> Vec<Effect> {
        match choice {
            Choice::Delete => vec![Effect::CloseModal, Effect::ConfirmDelete],
            Choice::Cancel => {
                app.controller.cancel_delete();
                vec![Effect::CloseModal]
            }
        }
    }

    fn message(app: &App) -> String {
        let title = app
            .controller
            .session()
            .pending_delete()
            .and_then(|record_id| {
                let record = app.controller.record(record_id)?;
                let schema = app.controller.schema()?;
                Some(record_title(record, schema))
            })
            .unwrap_or_else(|| "this record".to_string());
        format!("Delete \"{}\"? This cannot be undone.", sanitize_for_terminal(&title))
    }
}

impl Component for ConfirmDeleteModal {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
                self.focused = match self.focused {
                    Choice::Cancel => Choice::Delete,
                    Choice::Delete => Choice::Cancel,
                };
                Vec::new()
            }
            KeyCode::Enter => Self::choose(app, self.focused),
            KeyCode::Char('y') => Self::choose(app, Choice::Delete),
            KeyCode::Esc | KeyCode::Char('n') => Self::choose(app, Choice::Cancel),
            _ => Vec::new(),
        }
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        let MouseEvent { kind, column, row, .. } = mouse;
        if kind == MouseEventKind::Down(MouseButton::Left) {
            let position = Position::new(column, row);
            if let Some((choice, _)) = self.button_areas.iter().find(|(_, area)| area.contains(position)) {
                return Self::choose(app, *choice);
            }
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let theme = &*app.theme;
        let block = block_with_severity(theme, Severity::Warning, Some(" Delete record "));
        let inner = block.inner(rect);
        frame.render_widget(Clear, rect);
        frame.render_widget(block, rect);

        let [message_area, _, button_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1), Constraint::Length(3)]).areas(inner);
        let message = Paragraph::new(Line::from(Span::styled(Self::message(app), theme.text_primary_style())))
            .wrap(Wrap { trim: false });
        frame.render_widget(message, message_area);

        self.button_areas.clear();
        for (index, (choice, label)) in [(Choice::Cancel, "Cancel"), (Choice::Delete, "Delete")].into_iter().enumerate() {
            let offset = index as u16 * (BUTTON_WIDTH + BUTTON_GAP);
            let area = Rect::new(button_area.x + offset, button_area.y, BUTTON_WIDTH, button_area.height).intersection(button_area);
            render_button(frame, area, label, choice == Choice::Delete, self.focused == choice, theme);
            self.button_areas.push((choice, area));
        }
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'static>> {
        build_hint_spans(
            &*app.theme,
            &[("Tab", " Switch  "), ("Enter", " Confirm  "), ("y/n", " Delete/Keep  "), ("Esc", " Cancel")],
        )
    }
}
