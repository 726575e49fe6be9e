use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{
    prelude::*,
    widgets::{Block, Paragraph},
};

use super::components::{
    Component, ConfirmDeleteModal, EditFormComponent, HelpModal, LogsModal, RecordsComponent, status_bar,
};
use super::theme::theme_helpers as th;
use super::utils::centered_rect;
use crate::app::{App, Effect, Modal, Msg};

type ModalView = (Box<dyn Component>, Modal);

/// Root view: the record view, the status area, and at most one modal.
#[derive(Default)]
pub(crate) struct MainView {
    pub content_view: RecordsComponent,
    pub modal_view: Option<ModalView>,
}

impl MainView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_modal(&self) -> Option<Modal> {
        self.modal_view.as_ref().map(|(_, modal)| *modal)
    }

    /// Replace the open modal. Use `Effect::ShowModal`/`Effect::CloseModal`
    /// instead of calling this directly.
    pub fn set_open_modal_kind(&mut self, app: &mut App, modal: Option<Modal>) {
        if let Some((_, previous)) = self.modal_view.take() {
            release_modal_state(app, previous);
        }
        self.modal_view = modal.and_then(|kind| {
            let mut view: Box<dyn Component> = match kind {
                Modal::EditForm => Box::new(EditFormComponent::default()),
                Modal::ConfirmDelete => Box::new(ConfirmDeleteModal::default()),
                Modal::Logs => Box::new(LogsModal::default()),
                Modal::Help => Box::new(HelpModal),
            };
            match view.init() {
                Ok(()) => Some((view, kind)),
                Err(error) => {
                    tracing::warn!(?kind, %error, "could not open modal");
                    None
                }
            }
        });
    }

    pub fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match self.modal_view.as_mut() {
            Some((view, _)) => view.handle_key_events(app, key),
            None => self.content_view.handle_key_events(app, key),
        }
    }

    pub fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        match self.modal_view.as_mut() {
            Some((view, _)) => view.handle_mouse_events(app, mouse),
            None => self.content_view.handle_mouse_events(app, mouse),
        }
    }

    pub fn handle_message(&mut self, app: &mut App, msg: Msg) -> Vec<Effect> {
        let mut effects = self.content_view.handle_message(app, msg);
        if let Some((view, _)) = self.modal_view.as_mut() {
            effects.extend(view.handle_message(app, msg));
        }
        if msg == Msg::Tick {
            app.tick();
        }
        if self.modal_is_stale(app) {
            effects.push(Effect::CloseModal);
        }
        effects
    }

    /// Dialogs backed by controller state close once that state is gone,
    /// e.g. after a successful save.
    fn modal_is_stale(&self, app: &App) -> bool {
        match self.open_modal() {
            Some(Modal::EditForm) => app.controller.form().is_none(),
            Some(Modal::ConfirmDelete) => app.controller.session().pending_delete().is_none(),
            _ => false,
        }
    }

    pub fn close_stale_modal(&mut self, app: &mut App) {
        if self.modal_is_stale(app) {
            self.set_open_modal_kind(app, None);
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        frame.render_widget(Block::default().style(Style::default().bg(app.theme.roles().background)), area);
        let [content_area, status_area] = Layout::vertical([Constraint::Min(5), Constraint::Length(2)]).areas(area);

        if content_area.width < 20 {
            frame.render_widget(
                Paragraph::new("Terminal too small").style(app.theme.text_muted_style()),
                content_area,
            );
        } else {
            self.content_view.render(frame, content_area, app);
        }

        let hints = match self.modal_view.as_ref() {
            Some((view, _)) => view.get_hint_spans(app),
            None => self.content_view.get_hint_spans(app),
        };
        status_area_render(frame, status_area, app, hints);

        if let Some((view, kind)) = self.modal_view.as_mut() {
            frame.render_widget(Block::default().style(app.theme.modal_background_style()), content_area);
            let modal_area = modal_layout(*kind, content_area);
            view.render(frame, modal_area, app);
        }
    }
}

fn status_area_render(frame: &mut Frame, area: Rect, app: &App, hints: Vec<Span<'static>>) {
    frame.render_widget(Block::default().style(th::panel_style(&*app.theme)), area);
    status_bar::render(frame, area, app, hints);
}

fn modal_layout(kind: Modal, area: Rect) -> Rect {
    match kind {
        Modal::EditForm => centered_rect(70, 80, area),
        Modal::ConfirmDelete => centered_rect(50, 40, area),
        Modal::Logs => centered_rect(90, 80, area),
        Modal::Help => centered_rect(60, 80, area),
    }
}

/// Drop an edit form whose dialog is closing. A pending delete is left alone:
/// the delete dialog closes before `Effect::ConfirmDelete` runs.
fn release_modal_state(app: &mut App, modal: Modal) {
    if modal == Modal::EditForm && app.controller.form().is_some() {
        app.controller.cancel_edit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::loaded_app;
    use formwork_types::RecordId;

    #[tokio::test]
    async fn modal_closes_when_its_state_is_gone() {
        let mut app = loaded_app().await;
        let mut main_view = MainView::new();
        assert!(app.controller.begin_edit(&RecordId::new("c1")));
        main_view.set_open_modal_kind(&mut app, Some(Modal::EditForm));
        assert!(main_view.handle_message(&mut app, Msg::TaskFinished).is_empty());

        app.controller.cancel_edit();
        assert_eq!(main_view.handle_message(&mut app, Msg::TaskFinished), vec![Effect::CloseModal]);
    }

    #[tokio::test]
    async fn closing_the_form_dialog_drops_the_form() {
        let mut app = loaded_app().await;
        let mut main_view = MainView::new();
        assert!(app.controller.begin_create());
        main_view.set_open_modal_kind(&mut app, Some(Modal::EditForm));
        main_view.set_open_modal_kind(&mut app, None);
        assert!(app.controller.form().is_none());
        assert_eq!(main_view.open_modal(), None);
    }

    #[tokio::test]
    async fn closing_the_delete_dialog_keeps_the_pending_delete() {
        let mut app = loaded_app().await;
        let mut main_view = MainView::new();
        assert!(app.controller.request_delete(&RecordId::new("c1")));
        main_view.set_open_modal_kind(&mut app, Some(Modal::ConfirmDelete));
        main_view.set_open_modal_kind(&mut app, None);
        assert_eq!(app.controller.session().pending_delete(), Some(&RecordId::new("c1")));
    }
}
