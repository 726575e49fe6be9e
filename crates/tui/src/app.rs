//! Application state shared by every component.
//!
//! `App` wraps the engine [`Controller`] (which owns records, layout and
//! interaction state) and adds what only the terminal front-end needs: the
//! row cursor, keyboard focus, toasts and the log ring.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use formwork_engine::{Controller, ListView, Outcome, Task, ViewStatus};
use formwork_types::{LayoutStage, Notification, RecordId};

use crate::logging::LogRing;
use crate::ui::theme::{self, Theme};

const TOAST_TTL: Duration = Duration::from_secs(4);
const MAX_TOASTS: usize = 3;

/// Messages delivered to components by the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Msg {
    /// Periodic tick; drives the throbber and toast expiry.
    Tick,
    /// Terminal resized to the given width and height.
    Resize(u16, u16),
    /// A backend task finished and its outcome was applied.
    TaskFinished,
}

/// Dialogs shown above the record view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    EditForm,
    ConfirmDelete,
    Logs,
    Help,
}

/// Side effects requested by components and carried out by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Switch the view to another object.
    LoadObject(String),
    /// Re-fetch the records of the current object.
    Refresh,
    /// Switch between the draft and published layout.
    SetStage(LayoutStage),
    /// Save the open edit form.
    SubmitForm,
    /// Delete the record awaiting confirmation.
    ConfirmDelete,
    ShowModal(Modal),
    CloseModal,
    Quit,
}

/// Where keyboard input goes when no modal is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    List,
    Search,
    Detail,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub notification: Notification,
    pub shown_at: Instant,
}

pub struct App {
    pub controller: Controller,
    pub theme: Box<dyn Theme>,
    /// Objects the user can cycle through.
    pub objects: Vec<String>,
    pub focus: Focus,
    /// Highlighted row among the currently visible rows.
    pub cursor: usize,
    /// Highlighted entry of the open row menu.
    pub menu_cursor: usize,
    pub toasts: VecDeque<Toast>,
    pub logs: LogRing,
    /// Backend tasks still running.
    pub in_flight: usize,
    pub throbber_idx: usize,
    pub should_quit: bool,
}

impl App {
    pub fn new(controller: Controller, objects: Vec<String>, logs: LogRing) -> Self {
        Self {
            controller,
            theme: theme::load_from_env(),
            objects,
            focus: Focus::default(),
            cursor: 0,
            menu_cursor: 0,
            toasts: VecDeque::new(),
            logs,
            in_flight: 0,
            throbber_idx: 0,
            should_quit: false,
        }
    }

    /// Feed a finished task back into the controller. Returns any follow-up
    /// tasks (a refresh after a mutation) for the runtime to spawn.
    pub fn apply_outcome(&mut self, outcome: Outcome) -> Vec<Task> {
        let follow_ups = self.controller.apply(outcome);
        self.clamp_cursor();
        self.collect_notifications();
        follow_ups
    }

    /// Move controller notifications into the toast queue.
    pub fn collect_notifications(&mut self) {
        for notification in self.controller.drain_notifications() {
            if self.toasts.len() == MAX_TOASTS {
                self.toasts.pop_front();
            }
            self.toasts.push_back(Toast {
                notification,
                shown_at: Instant::now(),
            });
        }
    }

    /// Advance animations and expire old toasts. Returns `true` when
    /// something visible changed.
    pub fn tick(&mut self) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|toast| toast.shown_at.elapsed() < TOAST_TTL);
        let mut changed = before != self.toasts.len();
        if self.is_busy() {
            self.throbber_idx = (self.throbber_idx + 1) % 10;
            changed = true;
        } else {
            self.throbber_idx = 0;
        }
        changed
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight > 0 || matches!(self.controller.status(), ViewStatus::Loading)
    }

    pub fn latest_toast(&self) -> Option<&Toast> {
        self.toasts.back()
    }

    /// Record ids of the rows currently on screen, in display order.
    pub fn visible_row_ids(&self) -> Vec<RecordId> {
        self.controller
            .list_view()
            .map(|view| view.rows().iter().map(|row| row.record_id.clone()).collect())
            .unwrap_or_default()
    }

    pub fn cursor_record(&self) -> Option<RecordId> {
        self.visible_row_ids().into_iter().nth(self.cursor)
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let count = self.visible_row_ids().len();
        if count == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = self.cursor.saturating_add_signed(delta).min(count - 1);
    }

    /// Keep the cursor on a visible row after the list changed.
    pub fn clamp_cursor(&mut self) {
        let rows = self.visible_row_ids();
        if let Some(selected) = self.controller.session().selected_record_id()
            && let Some(position) = rows.iter().position(|id| id == selected)
        {
            self.cursor = position;
            return;
        }
        self.cursor = self.cursor.min(rows.len().saturating_sub(1));
    }

    /// Object after the current one, wrapping around.
    pub fn next_object(&self) -> Option<String> {
        if self.objects.len() < 2 {
            return None;
        }
        let current = self.controller.object_id()?;
        let index = self.objects.iter().position(|id| id == current).unwrap_or(0);
        self.objects.get((index + 1) % self.objects.len()).cloned()
    }

    /// Step the sort field through the list columns, then back to store order.
    pub fn cycle_sort(&mut self) {
        let Some(view) = self.controller.list_view() else {
            return;
        };
        let names: Vec<String> = view.columns().iter().map(|column| column.name.clone()).collect();
        let next = match self.controller.session().sort_field() {
            None => names.first().cloned(),
            Some(current) => names
                .iter()
                .position(|name| name == current)
                .and_then(|index| names.get(index + 1))
                .cloned(),
        };
        self.controller.set_sort_field(next);
        self.clamp_cursor();
    }

    /// Label of the column currently sorted on, if any.
    pub fn sort_label(&self) -> Option<String> {
        let field = self.controller.session().sort_field()?;
        let label = self
            .controller
            .list_view()
            .and_then(|view| {
                view.columns()
                    .iter()
                    .find(|column| column.name == field)
                    .map(|column| column.label.clone())
            })
            .unwrap_or_else(|| field.to_string());
        Some(label)
    }

    pub fn has_rows(&self) -> bool {
        matches!(self.controller.list_view(), Some(ListView::Rows { .. }))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use formwork_api::{Fixture, FixtureLayouts, InMemoryBackend};
    use formwork_engine::Controller;
    use formwork_types::{
        Block, Column, Field, FieldType, Layout, LayoutMode, LayoutStage, ListConfig, ObjectSchema, Record, Section,
    };

    use super::App;
    use crate::logging::LogRing;

    pub fn contact_backend() -> InMemoryBackend {
        let schema = ObjectSchema {
            name: "contact".into(),
            label: "Contact".into(),
            fields: vec![
                Field::new("name", FieldType::Text).with_label("Name"),
                Field::new("city", FieldType::Text).with_label("City"),
                Field::new("active", FieldType::Boolean).with_label("Active"),
            ],
        };
        let section = |id: &str, title: &str, field: &str| Section {
            id: id.into(),
            title: title.into(),
            columns: vec![Column {
                blocks: vec![Block::field(field)],
            }],
        };
        let layout = Layout {
            layout_mode: Some(LayoutMode::Tabs),
            sections: vec![section("main", "Main", "name"), section("where", "Where", "city")],
            list_config: Some(ListConfig {
                columns: vec!["name".into(), "active".into()],
            }),
        };
        InMemoryBackend::with_fixture(Fixture {
            schema,
            layouts: FixtureLayouts {
                draft: None,
                published: Some(layout),
            },
            records: vec![
                Record::new("c1").with_value("name", "Ada").with_value("city", "London").with_value("active", true),
                Record::new("c2").with_value("name", "Grace").with_value("city", "Arlington"),
                Record::new("c3").with_value("name", "Linus").with_value("active", false),
            ],
        })
    }

    /// An app with the contact object already loaded.
    pub async fn loaded_app() -> App {
        let mut controller = Controller::new(Arc::new(contact_backend()), LayoutStage::Published);
        let task = controller.enter("contact");
        controller.drive(task).await;
        App::new(controller, vec!["contact".into()], LogRing::default())
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::loaded_app;
    use super::*;
    use formwork_types::Severity;

    #[tokio::test]
    async fn cursor_stays_within_visible_rows() {
        let mut app = loaded_app().await;
        app.move_cursor(10);
        assert_eq!(app.cursor, 2);
        app.move_cursor(-1);
        assert_eq!(app.cursor_record(), Some(RecordId::new("c2")));

        app.controller.set_search_text("ada");
        app.clamp_cursor();
        assert_eq!(app.cursor, 0);
    }

    #[tokio::test]
    async fn sort_cycles_through_columns_then_clears() {
        let mut app = loaded_app().await;
        app.cycle_sort();
        assert_eq!(app.controller.session().sort_field(), Some("name"));
        assert_eq!(app.sort_label().as_deref(), Some("Name"));
        app.cycle_sort();
        assert_eq!(app.controller.session().sort_field(), Some("active"));
        app.cycle_sort();
        assert_eq!(app.controller.session().sort_field(), None);
    }

    #[tokio::test]
    async fn toasts_are_bounded_and_keep_newest() {
        let mut app = loaded_app().await;
        for index in 0..5 {
            app.controller.notify(Notification::new(Severity::Info, format!("n{index}")));
        }
        app.collect_notifications();
        assert_eq!(app.toasts.len(), MAX_TOASTS);
        assert_eq!(app.latest_toast().map(|toast| toast.notification.message.as_str()), Some("n4"));
    }

    #[tokio::test]
    async fn next_object_wraps() {
        let mut app = loaded_app().await;
        assert_eq!(app.next_object(), None);
        app.objects = vec!["contact".into(), "invoice".into()];
        assert_eq!(app.next_object().as_deref(), Some("invoice"));
    }
}
