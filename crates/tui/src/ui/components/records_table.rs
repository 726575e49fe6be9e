//! The record view: search line, record table, row menu popup, and the
//! detail panel either beside the table (master-detail layouts) or in place
//! of it.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use formwork_engine::{ListCell, ListColumn, ListRow, ListView, NO_RECORDS_MESSAGE, RowAction, Tone, ViewStatus, no_layout_message, place_menu};
use formwork_types::{LayoutStage, RecordId};
use formwork_util::sanitize_for_terminal;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState, Wrap},
};

use super::component::Component;
use super::detail_panel::DetailPanelComponent;
use crate::app::{App, Effect, Focus, Modal};
use crate::ui::theme::{Theme, theme_helpers as th};
use crate::ui::utils::{bounds_to_rect, contains, rect_to_bounds};

const MENU_WIDTH: u16 = 18;
const TRIGGER_WIDTH: u16 = 3;
const PAGE: isize = 10;

#[derive(Debug, Default)]
pub struct RecordsComponent {
    detail: DetailPanelComponent,
    table_state: TableState,
    search_area: Rect,
    table_area: Rect,
    row_areas: Vec<(RecordId, Rect)>,
    trigger_areas: Vec<(RecordId, Rect)>,
    menu_area: Option<(RecordId, Rect)>,
    detail_area: Option<Rect>,
}

impl RecordsComponent {
    fn toggle_menu(app: &mut App, record_id: &RecordId) {
        app.menu_cursor = 0;
        app.controller.toggle_row_menu(record_id);
    }

    /// Run a row action and open whatever dialog it needs.
    fn run_action(app: &mut App, record_id: &RecordId, action: RowAction) -> Vec<Effect> {
        if !app.controller.choose_action(record_id, action) {
            return Vec::new();
        }
        match action {
            RowAction::ViewDetail => {
                app.clamp_cursor();
                if !app.controller.layout().is_some_and(|layout| layout.is_master_detail()) {
                    app.focus = Focus::Detail;
                }
                Vec::new()
            }
            RowAction::Edit => vec![Effect::ShowModal(Modal::EditForm)],
            RowAction::Delete => vec![Effect::ShowModal(Modal::ConfirmDelete)],
        }
    }

    fn reload_or_refresh(app: &App) -> Vec<Effect> {
        match (app.controller.status(), app.controller.object_id()) {
            (ViewStatus::Failed(_) | ViewStatus::Missing, Some(object_id)) => vec![Effect::LoadObject(object_id.to_string())],
            _ => vec![Effect::Refresh],
        }
    }

    fn handle_menu_keys(app: &mut App, record_id: RecordId, key: KeyEvent) -> Vec<Effect> {
        let last = RowAction::ALL.len() - 1;
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => app.menu_cursor = app.menu_cursor.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => app.menu_cursor = (app.menu_cursor + 1).min(last),
            KeyCode::Enter => {
                let action = RowAction::ALL[app.menu_cursor.min(last)];
                return Self::run_action(app, &record_id, action);
            }
            KeyCode::Esc | KeyCode::Char('m') | KeyCode::Char(' ') => app.controller.close_row_menu(),
            _ => {}
        }
        Vec::new()
    }

    fn handle_list_keys(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        if let Some(record_id) = app.controller.session().open_row_menu().cloned() {
            return Self::handle_menu_keys(app, record_id, key);
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => app.move_cursor(-1),
            KeyCode::Down | KeyCode::Char('j') => app.move_cursor(1),
            KeyCode::PageUp => app.move_cursor(-PAGE),
            KeyCode::PageDown => app.move_cursor(PAGE),
            KeyCode::Home => app.cursor = 0,
            KeyCode::End => app.move_cursor(isize::MAX),
            KeyCode::Enter => {
                if let Some(record_id) = app.cursor_record() {
                    return Self::run_action(app, &record_id, RowAction::ViewDetail);
                }
            }
            KeyCode::Char(' ') | KeyCode::Char('m') => {
                if let Some(record_id) = app.cursor_record() {
                    Self::toggle_menu(app, &record_id);
                }
            }
            KeyCode::Char('/') => app.focus = Focus::Search,
            KeyCode::Char('s') => app.cycle_sort(),
            KeyCode::Char('n') => {
                if app.controller.begin_create() {
                    return vec![Effect::ShowModal(Modal::EditForm)];
                }
            }
            KeyCode::Char('e') => {
                if let Some(record_id) = app.cursor_record() {
                    return Self::run_action(app, &record_id, RowAction::Edit);
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(record_id) = app.cursor_record() {
                    return Self::run_action(app, &record_id, RowAction::Delete);
                }
            }
            KeyCode::Tab if app.controller.session().selected_record_id().is_some() => app.focus = Focus::Detail,
            KeyCode::Esc => {
                if app.controller.session().selected_record_id().is_some() {
                    app.controller.close_detail();
                } else if !app.controller.session().search_text().is_empty() {
                    app.controller.set_search_text("");
                    app.clamp_cursor();
                }
            }
            _ => return Self::handle_global_keys(app, key),
        }
        Vec::new()
    }

    fn handle_search_keys(app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let mut text = app.controller.session().search_text().to_string();
        match key.code {
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => text.clear(),
            KeyCode::Char(ch) => text.push(ch),
            KeyCode::Backspace => {
                text.pop();
            }
            KeyCode::Enter | KeyCode::Down | KeyCode::Tab => {
                app.focus = Focus::List;
                return Vec::new();
            }
            KeyCode::Esc => {
                text.clear();
                app.focus = Focus::List;
            }
            _ => return Vec::new(),
        }
        app.controller.set_search_text(text);
        app.cursor = 0;
        app.clamp_cursor();
        Vec::new()
    }

    fn handle_detail_keys(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('[') => self.detail.step_tab(app, -1),
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(']') => self.detail.step_tab(app, 1),
            KeyCode::Up | KeyCode::Char('k') => self.detail.scroll_by(-1),
            KeyCode::Down | KeyCode::Char('j') => self.detail.scroll_by(1),
            KeyCode::Tab | KeyCode::BackTab => app.focus = Focus::List,
            KeyCode::Esc => {
                app.controller.close_detail();
                app.focus = Focus::List;
            }
            KeyCode::Char('e') => {
                if let Some(record_id) = app.controller.session().selected_record_id().cloned() {
                    return Self::run_action(app, &record_id, RowAction::Edit);
                }
            }
            KeyCode::Char('d') => {
                if let Some(record_id) = app.controller.session().selected_record_id().cloned() {
                    return Self::run_action(app, &record_id, RowAction::Delete);
                }
            }
            _ => return Self::handle_global_keys(app, key),
        }
        Vec::new()
    }

    /// Keys that work from the list and the detail panel alike.
    fn handle_global_keys(app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Char('r') => Self::reload_or_refresh(app),
            KeyCode::Char('p') => {
                let stage = match app.controller.stage() {
                    LayoutStage::Published => LayoutStage::Draft,
                    LayoutStage::Draft => LayoutStage::Published,
                };
                vec![Effect::SetStage(stage)]
            }
            KeyCode::Char('o') => app.next_object().map(Effect::LoadObject).into_iter().collect(),
            KeyCode::Char('L') => vec![Effect::ShowModal(Modal::Logs)],
            KeyCode::Char('?') => vec![Effect::ShowModal(Modal::Help)],
            KeyCode::Char('q') => vec![Effect::Quit],
            _ => Vec::new(),
        }
    }

    fn render_search(&mut self, frame: &mut Frame, area: Rect, app: &App) {
        let theme = &*app.theme;
        let focused = app.focus == Focus::Search;
        let search = app.controller.session().search_text();
        let mut spans = vec![Span::styled("Search: ", theme.text_secondary_style())];
        if search.is_empty() && !focused {
            spans.push(Span::styled("press / to filter", theme.text_muted_style()));
        } else {
            spans.push(Span::styled(
                sanitize_for_terminal(search).into_owned(),
                th::input_style(theme, true, focused),
            ));
            if focused {
                spans.push(Span::styled("▏", theme.accent_emphasis_style()));
            }
        }
        if let Some(label) = app.sort_label() {
            spans.push(Span::styled(format!("   sorted by {label}"), theme.text_muted_style()));
        }
        frame.render_widget(
            Paragraph::new(Line::from(spans)).block(th::block(theme, None, focused)),
            area,
        );
        self.search_area = area;
    }

    fn render_table(&mut self, frame: &mut Frame, area: Rect, app: &App) {
        let theme = &*app.theme;
        self.table_area = area;
        self.row_areas.clear();
        self.trigger_areas.clear();

        let title = app
            .controller
            .schema()
            .map(|schema| format!(" {} ", schema.display_label()))
            .or_else(|| app.controller.object_id().map(|id| format!(" {id} ")));
        let block = th::block(theme, title.as_deref(), app.focus == Focus::List);
        let inner = block.inner(area);

        let message = |text: String, style: Style| Paragraph::new(text).style(style).wrap(Wrap { trim: true });
        let view = app.controller.list_view();
        match (app.controller.status(), view) {
            (ViewStatus::Missing, _) => {
                let object = app.controller.object_id().unwrap_or_default();
                frame.render_widget(block, area);
                frame.render_widget(message(format!("Object \"{object}\" was not found."), theme.status_warning()), inner);
            }
            (ViewStatus::Failed(error), _) => {
                frame.render_widget(block, area);
                frame.render_widget(
                    message(format!("{error}\nPress r to retry."), theme.status_error()),
                    inner,
                );
            }
            (_, None) => {
                frame.render_widget(block, area);
                frame.render_widget(message("Loading…".into(), theme.text_muted_style()), inner);
            }
            (_, Some(ListView::NoLayout)) => {
                frame.render_widget(block, area);
                frame.render_widget(
                    message(no_layout_message(app.controller.stage()), theme.text_muted_style()),
                    inner,
                );
            }
            (_, Some(ListView::NoRecords { columns })) => {
                let table = Table::new(Vec::<Row>::new(), column_widths(&columns))
                    .header(header_row(theme, &columns))
                    .block(block);
                frame.render_widget(table, area);
                let [_, body] = Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(inner);
                frame.render_widget(message(NO_RECORDS_MESSAGE.into(), theme.text_muted_style()), body);
            }
            (_, Some(ListView::Rows { columns, rows })) => {
                self.table_state.select(Some(app.cursor.min(rows.len().saturating_sub(1))));
                let body: Vec<Row> = rows
                    .iter()
                    .enumerate()
                    .map(|(index, row)| record_row(theme, &columns, row, index))
                    .collect();
                let table = Table::new(body, column_widths(&columns))
                    .header(header_row(theme, &columns))
                    .block(block)
                    .column_spacing(1)
                    .row_highlight_style(th::table_selected_style(theme))
                    .highlight_symbol("› ");
                frame.render_stateful_widget(table, area, &mut self.table_state);
                self.record_row_areas(inner, &rows);
            }
        }
    }

    /// Remember where each visible row and its menu trigger landed.
    fn record_row_areas(&mut self, inner: Rect, rows: &[ListRow]) {
        let offset = self.table_state.offset();
        let visible = usize::from(inner.height.saturating_sub(1));
        for (position, row) in rows.iter().enumerate().skip(offset).take(visible) {
            let y = inner.y + 1 + (position - offset) as u16;
            let row_rect = Rect::new(inner.x, y, inner.width, 1);
            let trigger = Rect::new(inner.right().saturating_sub(TRIGGER_WIDTH), y, TRIGGER_WIDTH, 1);
            self.row_areas.push((row.record_id.clone(), row_rect));
            self.trigger_areas.push((row.record_id.clone(), trigger));
        }
    }

    fn render_menu(&mut self, frame: &mut Frame, app: &App) {
        self.menu_area = None;
        let Some(open) = app.controller.session().open_row_menu() else {
            return;
        };
        let Some((_, trigger)) = self.trigger_areas.iter().find(|(id, _)| id == open) else {
            return;
        };
        let theme = &*app.theme;
        let height = RowAction::ALL.len() as i32 + 2;
        let viewport = frame.area();
        let placement = place_menu(rect_to_bounds(*trigger), i32::from(MENU_WIDTH), height, rect_to_bounds(viewport), 0);
        let area = bounds_to_rect(placement.bounds, viewport);

        let items: Vec<ListItem> = RowAction::ALL
            .iter()
            .map(|action| {
                let style = if action.is_destructive() {
                    theme.status_error()
                } else {
                    theme.text_primary_style()
                };
                ListItem::new(Span::styled(action.label(), style))
            })
            .collect();
        let mut state = ListState::default().with_selected(Some(app.menu_cursor.min(RowAction::ALL.len() - 1)));
        let list = List::new(items)
            .block(th::block(theme, None, true).style(theme.menu_style()))
            .highlight_style(theme.cursor_style());
        frame.render_widget(Clear, area);
        frame.render_stateful_widget(list, area, &mut state);
        self.menu_area = Some((open.clone(), area));
    }

    fn handle_left_click(&mut self, app: &mut App, column: u16, row: u16) -> Vec<Effect> {
        if let Some((record_id, area)) = self.menu_area.clone() {
            if contains(area, column, row) {
                let index = usize::from(row.saturating_sub(area.y + 1));
                return match RowAction::ALL.get(index) {
                    Some(action) => Self::run_action(app, &record_id, *action),
                    None => Vec::new(),
                };
            }
            app.controller.close_row_menu();
        }
        if let Some((record_id, _)) = self.trigger_areas.iter().find(|(_, area)| contains(*area, column, row)) {
            let record_id = record_id.clone();
            app.focus = Focus::List;
            Self::toggle_menu(app, &record_id);
            return Vec::new();
        }
        if let Some(index) = self.row_areas.iter().position(|(_, area)| contains(*area, column, row)) {
            let record_id = self.row_areas[index].0.clone();
            app.focus = Focus::List;
            app.cursor = self.table_state.offset() + index;
            return Self::run_action(app, &record_id, RowAction::ViewDetail);
        }
        if contains(self.search_area, column, row) {
            app.focus = Focus::Search;
        } else if self.detail_area.is_some_and(|area| contains(area, column, row)) {
            app.focus = Focus::Detail;
            self.detail.click(app, column, row);
        }
        Vec::new()
    }
}

fn column_widths(columns: &[ListColumn]) -> Vec<Constraint> {
    columns
        .iter()
        .map(|_| Constraint::Fill(1))
        .chain([Constraint::Length(TRIGGER_WIDTH)])
        .collect()
}

fn header_row<'a>(theme: &dyn Theme, columns: &'a [ListColumn]) -> Row<'a> {
    let mut cells: Vec<Cell> = columns
        .iter()
        .map(|column| Cell::from(Span::styled(column.label.as_str(), th::table_header_style(theme))))
        .collect();
    cells.push(Cell::from(""));
    Row::new(cells).style(th::table_header_row_style(theme))
}

fn record_row<'a>(theme: &dyn Theme, columns: &[ListColumn], row: &'a ListRow, index: usize) -> Row<'a> {
    let mut cells: Vec<Cell> = row.cells.iter().map(|cell| list_cell(theme, cell)).collect();
    cells.resize_with(columns.len(), || Cell::from(""));
    let trigger_style = if row.menu_open {
        theme.accent_emphasis_style()
    } else {
        theme.text_muted_style()
    };
    cells.push(Cell::from(Span::styled(" ⋯ ", trigger_style)));
    let mut style = th::table_row_style(theme, index);
    if row.selected {
        style = style.patch(theme.open_record_style());
    }
    Row::new(cells).style(style)
}

fn list_cell<'a>(theme: &dyn Theme, cell: &'a ListCell) -> Cell<'a> {
    let text = sanitize_for_terminal(&cell.text);
    match (cell.tone, cell.tone.glyph()) {
        (_, Some(glyph)) => Cell::from(Line::from(vec![
            Span::styled(glyph, theme.glyph_style(cell.tone)),
            Span::raw(format!(" {text}")),
        ])),
        (Tone::Placeholder, None) => Cell::from(Span::styled(text.into_owned(), theme.value_style(cell.tone))),
        _ => Cell::from(text.into_owned()),
    }
}

impl Component for RecordsComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match app.focus {
            Focus::Search => Self::handle_search_keys(app, key),
            Focus::Detail if app.controller.session().selected_record_id().is_some() => self.handle_detail_keys(app, key),
            Focus::Detail => {
                app.focus = Focus::List;
                self.handle_list_keys(app, key)
            }
            Focus::List => self.handle_list_keys(app, key),
        }
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        let MouseEvent { kind, column, row, .. } = mouse;
        match kind {
            MouseEventKind::Down(MouseButton::Left) => self.handle_left_click(app, column, row),
            MouseEventKind::ScrollUp if contains(self.table_area, column, row) => {
                app.move_cursor(-1);
                Vec::new()
            }
            MouseEventKind::ScrollDown if contains(self.table_area, column, row) => {
                app.move_cursor(1);
                Vec::new()
            }
            MouseEventKind::ScrollUp | MouseEventKind::ScrollDown
                if self.detail_area.is_some_and(|area| contains(area, column, row)) =>
            {
                self.detail.scroll_by(if kind == MouseEventKind::ScrollUp { -1 } else { 1 });
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let [search_area, body] = Layout::vertical([Constraint::Length(3), Constraint::Min(3)]).areas(rect);
        self.render_search(frame, search_area, app);

        let has_detail = app.controller.session().selected_record_id().is_some();
        let master_detail = app.controller.layout().is_some_and(|layout| layout.is_master_detail());
        self.detail_area = None;
        match (has_detail, master_detail) {
            (true, true) => {
                let [list_area, detail_area] =
                    Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)]).areas(body);
                self.render_table(frame, list_area, app);
                self.detail.render(frame, detail_area, app);
                self.detail_area = Some(detail_area);
            }
            (true, false) => {
                self.row_areas.clear();
                self.trigger_areas.clear();
                self.table_area = Rect::default();
                self.detail.render(frame, body, app);
                self.detail_area = Some(body);
            }
            (false, _) => self.render_table(frame, body, app),
        }
        self.render_menu(frame, app);
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'static>> {
        let theme = &*app.theme;
        if app.controller.session().open_row_menu().is_some() {
            return th::build_hint_spans(theme, &[("↑/↓", " Choose  "), ("Enter", " Run  "), ("Esc", " Close")]);
        }
        match app.focus {
            Focus::Search => th::build_hint_spans(theme, &[("Enter", " Done  "), ("Esc", " Clear  "), ("Ctrl+U", " Erase")]),
            Focus::Detail => th::build_hint_spans(
                theme,
                &[("←/→", " Tabs  "), ("e", " Edit  "), ("d", " Delete  "), ("Tab", " List  "), ("Esc", " Close")],
            ),
            Focus::List => th::build_hint_spans(
                theme,
                &[
                    ("Enter", " Open  "),
                    ("m", " Menu  "),
                    ("/", " Search  "),
                    ("s", " Sort  "),
                    ("n", " New  "),
                    ("p", " Draft/Published  "),
                    ("?", " Help"),
                ],
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::loaded_app;
    use ratatui::{Terminal, backend::TestBackend};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn draw(component: &mut RecordsComponent, app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).expect("test terminal");
        terminal
            .draw(|frame| {
                let area = frame.area();
                component.render(frame, area, app);
            })
            .expect("draw");
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[tokio::test]
    async fn table_shows_configured_columns_and_glyphs() {
        let mut app = loaded_app().await;
        let mut component = RecordsComponent::default();
        let screen = draw(&mut component, &mut app);
        assert!(screen.contains("Name"));
        assert!(screen.contains("Active"));
        assert!(!screen.contains("City"));
        assert!(screen.contains("✓ Yes"));
        assert!(screen.contains("✗ No"));
        assert!(screen.contains("N/A"));
        assert_eq!(component.row_areas.len(), 3);
    }

    #[tokio::test]
    async fn typing_in_search_filters_rows() {
        let mut app = loaded_app().await;
        let mut component = RecordsComponent::default();
        component.handle_key_events(&mut app, key(KeyCode::Char('/')));
        assert_eq!(app.focus, Focus::Search);
        for ch in "gra".chars() {
            component.handle_key_events(&mut app, key(KeyCode::Char(ch)));
        }
        assert_eq!(app.visible_row_ids(), vec![RecordId::new("c2")]);
        component.handle_key_events(&mut app, key(KeyCode::Esc));
        assert_eq!(app.focus, Focus::List);
        assert_eq!(app.visible_row_ids().len(), 3);
    }

    #[tokio::test]
    async fn menu_opens_on_trigger_click_and_runs_actions() {
        let mut app = loaded_app().await;
        let mut component = RecordsComponent::default();
        draw(&mut component, &mut app);
        let (_, trigger) = component.trigger_areas[1].clone();
        component.handle_mouse_events(&mut app, click(trigger.x + 1, trigger.y));
        assert_eq!(app.controller.session().open_row_menu(), Some(&RecordId::new("c2")));

        let screen = draw(&mut component, &mut app);
        assert!(screen.contains("View details"));
        let (_, menu) = component.menu_area.clone().expect("menu drawn");
        assert!(menu.x + menu.width <= 100 && menu.y + menu.height <= 24);

        let delete_row = menu.y + 1 + 2;
        let effects = component.handle_mouse_events(&mut app, click(menu.x + 2, delete_row));
        assert_eq!(effects, vec![Effect::ShowModal(Modal::ConfirmDelete)]);
        assert_eq!(app.controller.session().pending_delete(), Some(&RecordId::new("c2")));
        assert!(app.controller.session().open_row_menu().is_none());
    }

    #[tokio::test]
    async fn opening_another_menu_closes_the_first() {
        let mut app = loaded_app().await;
        let mut component = RecordsComponent::default();
        component.handle_key_events(&mut app, key(KeyCode::Char('m')));
        assert_eq!(app.controller.session().open_row_menu(), Some(&RecordId::new("c1")));
        component.handle_key_events(&mut app, key(KeyCode::Esc));
        app.move_cursor(1);
        component.handle_key_events(&mut app, key(KeyCode::Char('m')));
        assert_eq!(app.controller.session().open_row_menu(), Some(&RecordId::new("c2")));
    }

    #[tokio::test]
    async fn enter_opens_tabbed_detail_in_place_of_the_list() {
        let mut app = loaded_app().await;
        let mut component = RecordsComponent::default();
        component.handle_key_events(&mut app, key(KeyCode::Enter));
        assert_eq!(app.focus, Focus::Detail);
        let screen = draw(&mut component, &mut app);
        assert!(screen.contains("Main"));
        assert!(screen.contains("Where"));
        assert!(component.row_areas.is_empty());

        component.handle_key_events(&mut app, key(KeyCode::Right));
        assert_eq!(app.controller.session().active_section_id(), Some("where"));
        component.handle_key_events(&mut app, key(KeyCode::Esc));
        assert!(app.controller.session().selected_record_id().is_none());
    }

    #[tokio::test]
    async fn global_keys_map_to_effects() {
        let mut app = loaded_app().await;
        let mut component = RecordsComponent::default();
        assert_eq!(
            component.handle_key_events(&mut app, key(KeyCode::Char('p'))),
            vec![Effect::SetStage(LayoutStage::Draft)]
        );
        assert_eq!(component.handle_key_events(&mut app, key(KeyCode::Char('r'))), vec![Effect::Refresh]);
        assert_eq!(
            component.handle_key_events(&mut app, key(KeyCode::Char('n'))),
            vec![Effect::ShowModal(Modal::EditForm)]
        );
        assert_eq!(component.handle_key_events(&mut app, key(KeyCode::Char('q'))), vec![Effect::Quit]);
    }
}
