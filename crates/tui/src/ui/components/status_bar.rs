//! Bottom bar: latest notification (or the newest warning from the log
//! ring), key hints, and the view's stage and activity.

use formwork_types::LayoutStage;
use formwork_util::{sanitize_for_terminal, truncate_to_width};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::Paragraph,
};
use tracing::Level;

use crate::app::App;

const THROBBER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Draw the two-line status area. `hints` come from the active component.
pub fn render(frame: &mut Frame, rect: Rect, app: &App, hints: Vec<Span<'static>>) {
    let theme = &*app.theme;
    let [message_area, hint_area] = Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(rect);

    let stage_style = match app.controller.stage() {
        LayoutStage::Draft => theme.status_warning(),
        LayoutStage::Published => theme.status_success(),
    }
    .add_modifier(Modifier::BOLD);
    let mut badge = vec![Span::styled(format!(" {} ", app.controller.stage()), stage_style)];
    if let Some(object_id) = app.controller.object_id() {
        badge.insert(0, Span::styled(format!("{object_id} "), theme.text_secondary_style()));
    }
    if app.is_busy() {
        badge.insert(0, Span::styled(format!("{} ", THROBBER[app.throbber_idx % THROBBER.len()]), theme.accent_emphasis_style()));
    }
    let badge_width = badge.iter().map(Span::width).sum::<usize>() as u16;
    let [left, right] = Layout::horizontal([Constraint::Min(0), Constraint::Length(badge_width)]).areas(message_area);

    let width = usize::from(left.width);
    let message = if let Some(toast) = app.latest_toast() {
        Some(Span::styled(
            truncate_to_width(&sanitize_for_terminal(&toast.notification.message), width),
            theme.severity_style(toast.notification.severity),
        ))
    } else {
        app.logs
            .latest()
            .filter(|line| line.level <= Level::WARN)
            .map(|line| Span::styled(truncate_to_width(&line.display(), width), theme.text_muted_style()))
    };
    if let Some(message) = message {
        frame.render_widget(Paragraph::new(Line::from(message)), left);
    }
    frame.render_widget(Paragraph::new(Line::from(badge)).right_aligned(), right);
    frame.render_widget(Paragraph::new(Line::from(hints)), hint_area);
}
