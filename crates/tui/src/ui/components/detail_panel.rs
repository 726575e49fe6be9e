//! Detail panel for the selected record.
//!
//! Sections render top to bottom; in tabs mode only the active section is
//! drawn under a tab strip. Columns inside a section sit side by side, each
//! block wrapped to its column's width.

use formwork_engine::{BlockView, ColumnView, DetailBody, DetailView, SectionView};
use formwork_types::RecordId;
use formwork_util::{sanitize_for_terminal, truncate_to_width};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use unicode_width::UnicodeWidthStr;

use super::component::Component;
use crate::app::{App, Focus};
use crate::ui::theme::{Theme, theme_helpers as th};
use crate::ui::utils::contains;

const COLUMN_GAP: usize = 2;
const MIN_COLUMN_WIDTH: usize = 8;

#[derive(Debug, Default)]
pub struct DetailPanelComponent {
    scroll: u16,
    tab_areas: Vec<(String, Rect)>,
    shown_record: Option<RecordId>,
}

impl DetailPanelComponent {
    /// Activate the tab `delta` steps away from the current one, wrapping.
    pub fn step_tab(&mut self, app: &mut App, delta: isize) {
        let Some(view) = app.controller.detail_view() else {
            return;
        };
        let DetailBody::Tabbed { tabs, .. } = view.body else {
            return;
        };
        let current = tabs.iter().position(|tab| tab.active).unwrap_or(0) as isize;
        let next = (current + delta).rem_euclid(tabs.len() as isize) as usize;
        if app.controller.activate_section(&tabs[next].section_id) {
            self.scroll = 0;
        }
    }

    pub fn scroll_by(&mut self, delta: i32) {
        self.scroll = (i32::from(self.scroll) + delta).clamp(0, i32::from(u16::MAX)) as u16;
    }

    /// Handle a click inside the panel; only tabs react.
    pub fn click(&mut self, app: &mut App, column: u16, row: u16) {
        let hit = self
            .tab_areas
            .iter()
            .find(|(_, area)| contains(*area, column, row))
            .map(|(section_id, _)| section_id.clone());
        if let Some(section_id) = hit
            && app.controller.activate_section(&section_id)
        {
            self.scroll = 0;
        }
    }

    fn render_tabs(&mut self, frame: &mut Frame, area: Rect, theme: &dyn Theme, view: &DetailView) {
        self.tab_areas.clear();
        let DetailBody::Tabbed { tabs, .. } = &view.body else {
            return;
        };
        let titles: Vec<Span> = tabs
            .iter()
            .map(|tab| Span::raw(sanitize_for_terminal(&tab.title).into_owned()))
            .collect();
        let active = tabs.iter().position(|tab| tab.active).unwrap_or(0);
        frame.render_widget(th::tabs(theme, titles, active), area);

        // Tabs draws " title " separated by a one-cell divider.
        let mut x = area.x;
        for tab in tabs {
            let width = (sanitize_for_terminal(&tab.title).width() + 2) as u16;
            let tab_area = Rect::new(x, area.y, width, 1).intersection(area);
            self.tab_areas.push((tab.section_id.clone(), tab_area));
            x = x.saturating_add(width + 1);
        }
    }
}

fn section_lines(theme: &dyn Theme, section: &SectionView, width: usize, show_title: bool) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if show_title {
        lines.push(Line::from(Span::styled(
            truncate_to_width(&sanitize_for_terminal(&section.title), width),
            theme.accent_emphasis_style(),
        )));
    }
    let count = section.columns.len().max(1);
    let column_width = (width.saturating_sub(COLUMN_GAP * (count - 1)) / count).max(MIN_COLUMN_WIDTH);
    let columns: Vec<Vec<Line<'static>>> = section
        .columns
        .iter()
        .map(|column| column_lines(theme, column, column_width))
        .collect();
    let height = columns.iter().map(Vec::len).max().unwrap_or(0);
    for row in 0..height {
        let mut spans = Vec::new();
        for (index, column) in columns.iter().enumerate() {
            if index > 0 {
                spans.push(Span::raw(" ".repeat(COLUMN_GAP)));
            }
            let used = match column.get(row) {
                Some(line) => {
                    spans.extend(line.spans.iter().cloned());
                    line.width()
                }
                None => 0,
            };
            if index + 1 < columns.len() {
                spans.push(Span::raw(" ".repeat(column_width.saturating_sub(used))));
            }
        }
        lines.push(Line::from(spans));
    }
    lines.push(Line::default());
    lines
}

fn column_lines(theme: &dyn Theme, column: &ColumnView, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for block in &column.blocks {
        match block {
            BlockView::Field { label, value, tone, .. } => {
                lines.push(Line::from(Span::styled(
                    truncate_to_width(&sanitize_for_terminal(label), width),
                    theme.text_secondary_style().add_modifier(Modifier::BOLD),
                )));
                let value = sanitize_for_terminal(value);
                let prefix = tone.glyph().map(|glyph| Span::styled(format!("{glyph} "), theme.glyph_style(*tone)));
                let value_style = theme.value_style(*tone);
                let wrap_width = width.saturating_sub(if prefix.is_some() { 2 } else { 0 }).max(1);
                for (index, piece) in textwrap::wrap(&value, wrap_width).into_iter().enumerate() {
                    let mut spans = Vec::with_capacity(2);
                    if index == 0
                        && let Some(prefix) = prefix.clone()
                    {
                        spans.push(prefix);
                    }
                    spans.push(Span::styled(piece.into_owned(), value_style));
                    lines.push(Line::from(spans));
                }
            }
            BlockView::Header { label } => lines.push(Line::from(Span::styled(
                truncate_to_width(&sanitize_for_terminal(label), width),
                theme.accent_emphasis_style().add_modifier(Modifier::UNDERLINED),
            ))),
            BlockView::Divider => lines.push(Line::from(Span::styled(
                "─".repeat(width),
                Style::default().fg(theme.roles().divider),
            ))),
            BlockView::Button { label } => lines.push(Line::from(Span::styled(
                truncate_to_width(&format!("[ {} ]", sanitize_for_terminal(label)), width),
                th::button_style(theme, false, false),
            ))),
            BlockView::Placeholder(kind) => {
                let text = format!("{} (not yet implemented)", kind.label());
                for piece in textwrap::wrap(&text, width.max(1)) {
                    lines.push(Line::from(Span::styled(
                        piece.into_owned(),
                        theme.text_muted_style().add_modifier(Modifier::ITALIC),
                    )));
                }
            }
        }
    }
    lines
}

impl Component for DetailPanelComponent {
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let theme = &*app.theme;
        let focused = app.focus == Focus::Detail;
        let Some(view) = app.controller.detail_view() else {
            self.tab_areas.clear();
            frame.render_widget(th::block(theme, None, focused), rect);
            return;
        };
        if self.shown_record.as_ref() != Some(&view.record_id) {
            self.shown_record = Some(view.record_id.clone());
            self.scroll = 0;
        }

        let title = format!(" {} ", truncate_to_width(&sanitize_for_terminal(&view.title), usize::from(rect.width.saturating_sub(4))));
        let block = th::block(theme, Some(title.as_str()), focused);
        let inner = block.inner(rect);
        frame.render_widget(block, rect);

        let width = usize::from(inner.width);
        let (body_area, lines) = match &view.body {
            DetailBody::Stacked(sections) => {
                self.tab_areas.clear();
                let lines = sections
                    .iter()
                    .flat_map(|section| section_lines(theme, section, width, true))
                    .collect::<Vec<_>>();
                (inner, lines)
            }
            DetailBody::Tabbed { active, .. } => {
                let [tab_area, _, body_area] =
                    Layout::vertical([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)]).areas(inner);
                self.render_tabs(frame, tab_area, theme, &view);
                (body_area, section_lines(theme, active, width, false))
            }
        };

        let max_scroll = (lines.len() as u16).saturating_sub(body_area.height);
        self.scroll = self.scroll.min(max_scroll);
        frame.render_widget(Paragraph::new(lines).scroll((self.scroll, 0)), body_area);
    }
}
