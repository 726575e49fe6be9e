//! Modal form for creating or editing a record.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use formwork_engine::{EditForm, FormInput};
use formwork_types::Severity;
use formwork_util::{sanitize_for_terminal, truncate_to_width};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Clear, Paragraph, Wrap},
};

use super::component::Component;
use crate::app::{App, Effect};
use crate::ui::theme::{Theme, theme_helpers as th};
use crate::ui::utils::contains;

/// Each field takes a label line and an input line.
const FIELD_HEIGHT: u16 = 2;
const BUTTON_WIDTH: u16 = 12;

#[derive(Debug, Default)]
pub struct EditFormComponent {
    offset: usize,
    field_areas: Vec<(usize, Rect)>,
    cancel_area: Rect,
    save_area: Rect,
}

impl EditFormComponent {
    fn cancel(app: &mut App) -> Vec<Effect> {
        app.controller.cancel_edit();
        vec![Effect::CloseModal]
    }

    fn focus_index(form: &mut EditForm, index: usize) {
        for _ in 0..form.fields().len() {
            if form.focused_index() == index {
                return;
            }
            form.focus_next();
        }
    }

    /// Keep the focused field inside the visible window.
    fn scroll_to_focus(&mut self, focused: usize, visible: usize) {
        if focused < self.offset {
            self.offset = focused;
        } else if visible > 0 && focused >= self.offset + visible {
            self.offset = focused + 1 - visible;
        }
    }

    fn field_lines(theme: &dyn Theme, form: &EditForm, index: usize, width: usize) -> [Line<'static>; 2] {
        let field = &form.fields()[index];
        let focused = form.focused_index() == index;
        let mut label = vec![Span::styled(
            sanitize_for_terminal(&field.label).into_owned(),
            theme.text_secondary_style().add_modifier(Modifier::BOLD),
        )];
        if field.required {
            label.push(Span::styled(" *", theme.status_error()));
        }
        if let Some(hint) = field.hint() {
            label.push(Span::styled(format!("  {hint}"), theme.text_muted_style()));
        }

        let marker = if focused { "› " } else { "  " };
        let value = truncate_to_width(&sanitize_for_terminal(field.input.display()), width.saturating_sub(6));
        let input_style = th::input_style(theme, true, focused);
        let input = match &field.input {
            FormInput::Text(_) => {
                let mut spans = vec![Span::styled(marker, theme.accent_emphasis_style()), Span::styled(value, input_style)];
                if focused {
                    spans.push(Span::styled("▏", theme.accent_emphasis_style()));
                }
                spans
            }
            FormInput::Choice { .. } => {
                let shown = if value.is_empty() { "(none)".to_string() } else { value };
                vec![
                    Span::styled(marker, theme.accent_emphasis_style()),
                    Span::styled("◀ ", theme.text_muted_style()),
                    Span::styled(shown, input_style),
                    Span::styled(" ▶", theme.text_muted_style()),
                ]
            }
        };
        [Line::from(label), Line::from(input)]
    }
}

impl Component for EditFormComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        if key.code == KeyCode::Esc {
            return Self::cancel(app);
        }
        let Some(form) = app.controller.form_mut() else {
            return vec![Effect::CloseModal];
        };
        if form.is_saving() {
            return Vec::new();
        }
        let choice = form
            .focused_field()
            .is_some_and(|field| matches!(field.input, FormInput::Choice { .. }));
        match key.code {
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => return vec![Effect::SubmitForm],
            KeyCode::Enter => return vec![Effect::SubmitForm],
            KeyCode::Tab | KeyCode::Down => form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
            KeyCode::Left if choice => form.cycle_choice(false),
            KeyCode::Right | KeyCode::Char(' ') if choice => form.cycle_choice(true),
            KeyCode::Backspace => form.pop_char(),
            KeyCode::Char(ch) if !choice => form.push_char(ch),
            _ => {}
        }
        Vec::new()
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        let MouseEvent { kind, column, row, .. } = mouse;
        if kind != MouseEventKind::Down(MouseButton::Left) {
            return Vec::new();
        }
        if contains(self.cancel_area, column, row) {
            return Self::cancel(app);
        }
        if contains(self.save_area, column, row) {
            return vec![Effect::SubmitForm];
        }
        let hit = self.field_areas.iter().find(|(_, area)| contains(*area, column, row)).map(|(index, _)| *index);
        if let (Some(index), Some(form)) = (hit, app.controller.form_mut()) {
            Self::focus_index(form, index);
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let theme = &*app.theme;
        let Some(form) = app.controller.form() else {
            return;
        };
        let title = if form.is_create() { " New record " } else { " Edit record " };
        let block = th::block(theme, Some(title), true);
        let inner = block.inner(rect);
        frame.render_widget(Clear, rect);
        frame.render_widget(block, rect);

        let [fields_area, error_area, buttons_area] =
            Layout::vertical([Constraint::Min(FIELD_HEIGHT), Constraint::Length(2), Constraint::Length(3)]).areas(inner);

        let visible = usize::from(fields_area.height / FIELD_HEIGHT);
        self.scroll_to_focus(form.focused_index(), visible);
        self.field_areas.clear();
        for (slot, index) in (self.offset..form.fields().len()).take(visible).enumerate() {
            let area = Rect::new(
                fields_area.x,
                fields_area.y + slot as u16 * FIELD_HEIGHT,
                fields_area.width,
                FIELD_HEIGHT,
            );
            let lines = Self::field_lines(theme, form, index, usize::from(area.width));
            frame.render_widget(Paragraph::new(lines.to_vec()), area);
            self.field_areas.push((index, area));
        }

        let status = match (form.is_saving(), form.error()) {
            (true, _) => Some(Line::from(Span::styled("Saving…", theme.status_info()))),
            (false, Some(error)) => Some(Line::from(Span::styled(
                sanitize_for_terminal(error).into_owned(),
                theme.severity_style(Severity::Error),
            ))),
            (false, None) => None,
        };
        if let Some(status) = status {
            frame.render_widget(Paragraph::new(status).wrap(Wrap { trim: true }), error_area);
        }

        let [cancel_area, _, save_area, _] = Layout::horizontal([
            Constraint::Length(BUTTON_WIDTH),
            Constraint::Length(2),
            Constraint::Length(BUTTON_WIDTH),
            Constraint::Min(0),
        ])
        .areas(buttons_area);
        th::render_button(frame, cancel_area, "Cancel", false, false, theme);
        th::render_button(frame, save_area, "Save", false, !form.is_saving(), theme);
        self.cancel_area = cancel_area;
        self.save_area = save_area;
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'static>> {
        th::build_hint_spans(
            &*app.theme,
            &[
                ("Tab/Shift+Tab", " Field  "),
                ("←/→", " Choose  "),
                ("Enter", " Save  "),
                ("Esc", " Cancel"),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::loaded_app;
    use formwork_types::RecordId;
    use ratatui::{Terminal, backend::TestBackend};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn typing_edits_the_focused_field() {
        let mut app = loaded_app().await;
        assert!(app.controller.begin_edit(&RecordId::new("c2")));
        let mut component = EditFormComponent::default();
        component.handle_key_events(&mut app, key(KeyCode::Backspace));
        component.handle_key_events(&mut app, key(KeyCode::Char('!')));
        let form = app.controller.form().expect("form open");
        assert_eq!(form.field("name").map(|field| field.input.display()), Some("Grac!"));
    }

    #[tokio::test]
    async fn choice_fields_cycle_instead_of_typing() {
        let mut app = loaded_app().await;
        assert!(app.controller.begin_edit(&RecordId::new("c1")));
        let mut component = EditFormComponent::default();
        component.handle_key_events(&mut app, key(KeyCode::Tab));
        component.handle_key_events(&mut app, key(KeyCode::Tab));
        component.handle_key_events(&mut app, key(KeyCode::Char('x')));
        component.handle_key_events(&mut app, key(KeyCode::Right));
        let form = app.controller.form().expect("form open");
        assert_eq!(form.field("active").map(|field| field.input.display()), Some("false"));
    }

    #[tokio::test]
    async fn enter_submits_and_escape_cancels() {
        let mut app = loaded_app().await;
        assert!(app.controller.begin_create());
        let mut component = EditFormComponent::default();
        assert_eq!(component.handle_key_events(&mut app, key(KeyCode::Enter)), vec![Effect::SubmitForm]);
        assert_eq!(component.handle_key_events(&mut app, key(KeyCode::Esc)), vec![Effect::CloseModal]);
        assert!(app.controller.form().is_none());
    }

    #[tokio::test]
    async fn renders_fields_and_error() {
        let mut app = loaded_app().await;
        assert!(app.controller.begin_edit(&RecordId::new("c1")));
        if let Some(form) = app.controller.form_mut() {
            form.set_error("Name is required");
        }
        let mut component = EditFormComponent::default();
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).expect("test terminal");
        terminal
            .draw(|frame| {
                let area = frame.area();
                component.render(frame, area, &mut app);
            })
            .expect("draw");
        let screen: String = terminal.backend().buffer().content().iter().map(|cell| cell.symbol()).collect();
        assert!(screen.contains("Edit record"));
        assert!(screen.contains("Ada"));
        assert!(screen.contains("Name is required"));
        assert_eq!(component.field_areas.len(), 3);
    }
}
