//! Interaction controller.
//!
//! The controller owns the view state of one object at a time: its schema,
//! resolved layout, the record store snapshot, and the [`SessionState`].
//! Operations that need the backend return a [`Task`]; the front-end awaits
//! it wherever it likes (a `FuturesUnordered`, a spawned tokio task, inline)
//! and hands the resulting [`Outcome`] back to [`Controller::apply`].
//!
//! Every task carries the [`Ticket`] of the generation it was issued in.
//! Entering another object, switching layout stage or leaving bumps the
//! generation, so responses that arrive afterwards are discarded instead of
//! being applied to the wrong view. Within a generation tickets are also
//! numbered in issue order: a record snapshot older than the last one applied
//! is dropped, and a save response only touches the form that sent it.
//!
//! ```ignore
//! let mut controller = Controller::new(backend, LayoutStage::Published);
//! let task = controller.enter("invoice");
//! controller.drive(task).await;
//! if let Some(view) = controller.list_view() { /* draw */ }
//! ```

use std::collections::VecDeque;
use std::sync::Arc;

use formwork_api::{ApiError, ObjectBackend, RecordPayload};
use formwork_types::{LayoutStage, Notification, ObjectSchema, Record, RecordId};
use futures_util::future::BoxFuture;
use tracing::{debug, info, warn};

use crate::detail::{DetailView, render_detail};
use crate::form::EditForm;
use crate::list::{ListQuery, ListView, render_list};
use crate::menu::RowAction;
use crate::resolver::{LayoutResolver, ResolvedLayout};
use crate::session::SessionState;

/// A pending backend call.
pub type Task = BoxFuture<'static, Outcome>;

/// Generation a task was issued in, and its place in issue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    sequence: u64,
}

/// Everything needed to show an object.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedObject {
    pub schema: ObjectSchema,
    pub layout: Option<ResolvedLayout>,
    pub records: Vec<Record>,
}

/// Result of a [`Task`].
#[derive(Debug)]
pub enum Outcome {
    ObjectLoaded {
        ticket: Ticket,
        result: Result<LoadedObject, ApiError>,
    },
    RecordsRefreshed {
        ticket: Ticket,
        result: Result<Vec<Record>, ApiError>,
    },
    RecordSaved {
        ticket: Ticket,
        /// `None` for a create.
        record_id: Option<RecordId>,
        result: Result<Record, ApiError>,
    },
    RecordDeleted {
        ticket: Ticket,
        record_id: RecordId,
        result: Result<(), ApiError>,
    },
}

impl Outcome {
    pub fn ticket(&self) -> Ticket {
        match self {
            Self::ObjectLoaded { ticket, .. }
            | Self::RecordsRefreshed { ticket, .. }
            | Self::RecordSaved { ticket, .. }
            | Self::RecordDeleted { ticket, .. } => *ticket,
        }
    }
}

/// Load status of the current object.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    /// The object does not exist.
    Missing,
    Failed(String),
}

pub struct Controller {
    backend: Arc<dyn ObjectBackend>,
    stage: LayoutStage,
    generation: u64,
    issued: u64,
    /// Sequence of the newest ticket whose result the records reflect.
    records_as_of: u64,
    object_id: Option<String>,
    schema: Option<ObjectSchema>,
    layout: Option<ResolvedLayout>,
    records: Vec<Record>,
    session: SessionState,
    status: ViewStatus,
    notifications: VecDeque<Notification>,
}

impl Controller {
    pub fn new(backend: Arc<dyn ObjectBackend>, stage: LayoutStage) -> Self {
        Self {
            backend,
            stage,
            generation: 0,
            issued: 0,
            records_as_of: 0,
            object_id: None,
            schema: None,
            layout: None,
            records: Vec::new(),
            session: SessionState::default(),
            status: ViewStatus::Idle,
            notifications: VecDeque::new(),
        }
    }

    pub fn stage(&self) -> LayoutStage {
        self.stage
    }

    pub fn object_id(&self) -> Option<&str> {
        self.object_id.as_deref()
    }

    pub fn schema(&self) -> Option<&ObjectSchema> {
        self.schema.as_ref()
    }

    pub fn layout(&self) -> Option<&ResolvedLayout> {
        self.layout.as_ref()
    }

    /// Record store snapshot, in store order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn record(&self, record_id: &RecordId) -> Option<&Record> {
        self.records.iter().find(|record| &record.id == record_id)
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn status(&self) -> &ViewStatus {
        &self.status
    }

    fn ticket(&mut self) -> Ticket {
        self.issued += 1;
        Ticket {
            generation: self.generation,
            sequence: self.issued,
        }
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        ticket.generation == self.generation
    }

    fn records_changed(&mut self, ticket: Ticket) {
        self.records_as_of = self.records_as_of.max(ticket.sequence);
    }

    /// Start viewing `object_id`. Any in-flight work for the previous view
    /// becomes stale.
    pub fn enter(&mut self, object_id: impl Into<String>) -> Task {
        let object_id = object_id.into();
        self.generation += 1;
        self.schema = None;
        self.layout = None;
        self.records.clear();
        self.session.reset();
        self.status = ViewStatus::Loading;
        self.object_id = Some(object_id.clone());
        info!(object_id = %object_id, stage = %self.stage, "loading object");
        self.load_task(object_id)
    }

    /// Stop viewing the current object.
    pub fn leave(&mut self) {
        self.generation += 1;
        self.object_id = None;
        self.schema = None;
        self.layout = None;
        self.records.clear();
        self.session.reset();
        self.status = ViewStatus::Idle;
    }

    /// Switch between the draft and published layout, reloading the current
    /// object when the stage changes.
    pub fn set_stage(&mut self, stage: LayoutStage) -> Option<Task> {
        if stage == self.stage {
            return None;
        }
        self.stage = stage;
        let object_id = self.object_id.clone()?;
        Some(self.enter(object_id))
    }

    /// Re-fetch records for the current object.
    pub fn refresh(&mut self) -> Option<Task> {
        let object_id = self.object_id.clone()?;
        if self.schema.is_none() {
            return None;
        }
        Some(self.refresh_task(object_id))
    }

    /// Apply a finished task. Returns follow-up tasks (the refresh after a
    /// mutation).
    pub fn apply(&mut self, outcome: Outcome) -> Vec<Task> {
        if !self.is_current(outcome.ticket()) {
            debug!(?outcome, "discarding stale response");
            return Vec::new();
        }

        match outcome {
            Outcome::ObjectLoaded { ticket, result } => {
                self.apply_loaded(ticket, result);
                Vec::new()
            }
            Outcome::RecordsRefreshed { ticket, result } => {
                if ticket.sequence < self.records_as_of {
                    debug!(sequence = ticket.sequence, newest = self.records_as_of, "discarding outdated refresh");
                    return Vec::new();
                }
                match result {
                    Ok(records) => {
                        self.records_changed(ticket);
                        self.records = records;
                        self.session.reconcile(&self.records, self.layout.as_ref());
                    }
                    Err(error) => {
                        warn!(%error, "record refresh failed");
                        self.notify(Notification::error(format!("Could not refresh records: {error}")));
                    }
                }
                Vec::new()
            }
            Outcome::RecordSaved {
                ticket,
                record_id,
                result,
            } => self.apply_saved(ticket, record_id, result),
            Outcome::RecordDeleted {
                ticket,
                record_id,
                result,
            } => self.apply_deleted(ticket, record_id, result),
        }
    }

    fn apply_loaded(&mut self, ticket: Ticket, result: Result<LoadedObject, ApiError>) {
        match result {
            Ok(loaded) => {
                if let Some(layout) = &loaded.layout {
                    let dangling = layout.dangling_list_columns(&loaded.schema);
                    if !dangling.is_empty() {
                        warn!(columns = ?dangling, "list columns reference unknown fields");
                    }
                }
                info!(
                    records = loaded.records.len(),
                    has_layout = loaded.layout.is_some(),
                    "object loaded"
                );
                self.schema = Some(loaded.schema);
                self.layout = loaded.layout;
                self.records = loaded.records;
                self.records_changed(ticket);
                self.session.reconcile(&self.records, self.layout.as_ref());
                self.status = ViewStatus::Ready;
            }
            Err(ApiError::NotFound { what }) => {
                info!(%what, "object not found");
                self.status = ViewStatus::Missing;
            }
            Err(error) => {
                warn!(%error, "object load failed");
                let object = self.object_id.as_deref().unwrap_or("object");
                let message = format!("Could not load {object}: {error}");
                self.notify(Notification::error(message.clone()));
                self.status = ViewStatus::Failed(message);
            }
        }
    }

    /// The open form, if it is the one that sent the save behind `ticket`.
    fn form_awaiting(&mut self, ticket: Ticket) -> Option<&mut EditForm> {
        self.session.editing_mut().filter(|form| form.awaits(ticket.sequence))
    }

    fn apply_saved(&mut self, ticket: Ticket, record_id: Option<RecordId>, result: Result<Record, ApiError>) -> Vec<Task> {
        let created = record_id.is_none();
        match result {
            Ok(record) => {
                info!(record_id = %record.id, created, "record saved");
                if self.form_awaiting(ticket).is_some() {
                    self.session.stop_editing();
                }
                self.records_changed(ticket);
                self.notify(Notification::success(if created { "Record created" } else { "Record updated" }));
                self.refresh().into_iter().collect()
            }
            Err(ApiError::ValidationRejected { message }) => {
                debug!(%message, "save rejected");
                if let Some(form) = self.form_awaiting(ticket) {
                    form.finish_saving();
                    form.set_error(message.clone());
                }
                self.notify(Notification::error(message));
                Vec::new()
            }
            Err(ApiError::NotFound { .. }) => {
                if let Some(record_id) = &record_id {
                    self.session.forget_record(record_id);
                }
                if self.form_awaiting(ticket).is_some() {
                    self.session.stop_editing();
                }
                self.records_changed(ticket);
                self.notify(Notification::error("This record no longer exists."));
                self.refresh().into_iter().collect()
            }
            Err(error) => {
                warn!(%error, "save failed");
                let message = format!("Could not save: {error}");
                if let Some(form) = self.form_awaiting(ticket) {
                    form.finish_saving();
                    form.set_error(message.clone());
                }
                self.notify(Notification::error(message));
                Vec::new()
            }
        }
    }

    fn apply_deleted(&mut self, ticket: Ticket, record_id: RecordId, result: Result<(), ApiError>) -> Vec<Task> {
        match result {
            Ok(()) => {
                info!(record_id = %record_id, "record deleted");
                self.forget(&record_id);
                self.records_changed(ticket);
                self.notify(Notification::success("Record deleted"));
                self.refresh().into_iter().collect()
            }
            Err(ApiError::NotFound { .. }) => {
                self.forget(&record_id);
                self.records_changed(ticket);
                self.notify(Notification::info("Record was already deleted"));
                self.refresh().into_iter().collect()
            }
            Err(error) => {
                warn!(%error, record_id = %record_id, "delete failed");
                self.notify(Notification::error(format!("Could not delete record: {error}")));
                Vec::new()
            }
        }
    }

    fn forget(&mut self, record_id: &RecordId) {
        self.session.forget_record(record_id);
        self.records.retain(|record| &record.id != record_id);
    }

    /// Show `record_id` in the detail view.
    pub fn select_record(&mut self, record_id: &RecordId) -> bool {
        if self.record(record_id).is_none() {
            return false;
        }
        self.session.select(record_id.clone(), self.layout.as_ref());
        true
    }

    pub fn close_detail(&mut self) {
        self.session.clear_selection();
    }

    pub fn activate_section(&mut self, section_id: &str) -> bool {
        match &self.layout {
            Some(layout) => self.session.activate_section(section_id, layout),
            None => false,
        }
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.session.set_search_text(text);
    }

    pub fn set_sort_field(&mut self, field: Option<String>) {
        self.session.set_sort_field(field);
    }

    pub fn toggle_row_menu(&mut self, record_id: &RecordId) {
        self.session.toggle_menu(record_id.clone());
    }

    pub fn open_row_menu(&mut self, record_id: &RecordId) {
        self.session.open_menu(record_id.clone());
    }

    pub fn close_row_menu(&mut self) {
        self.session.close_menu();
    }

    /// Run a row menu action. The menu closes whatever the action.
    pub fn choose_action(&mut self, record_id: &RecordId, action: RowAction) -> bool {
        self.session.close_menu();
        match action {
            RowAction::ViewDetail => self.select_record(record_id),
            RowAction::Edit => self.begin_edit(record_id),
            RowAction::Delete => self.request_delete(record_id),
        }
    }

    /// Open the edit form for an existing record.
    pub fn begin_edit(&mut self, record_id: &RecordId) -> bool {
        let (Some(schema), Some(record)) = (self.schema.as_ref(), self.record(record_id)) else {
            return false;
        };
        let form = EditForm::for_edit(schema, record);
        self.session.start_editing(form);
        true
    }

    /// Open a blank form for a new record.
    pub fn begin_create(&mut self) -> bool {
        let Some(schema) = self.schema.as_ref() else {
            return false;
        };
        let form = EditForm::for_create(schema);
        self.session.start_editing(form);
        true
    }

    pub fn form(&self) -> Option<&EditForm> {
        self.session.editing()
    }

    pub fn form_mut(&mut self) -> Option<&mut EditForm> {
        self.session.editing_mut()
    }

    pub fn cancel_edit(&mut self) {
        self.session.stop_editing();
    }

    /// Send the open form to the backend. `None` when there is no form, no
    /// object, or a save is already in flight.
    pub fn submit_form(&mut self) -> Option<Task> {
        let object_id = self.object_id.clone()?;
        if self.session.editing()?.is_saving() {
            return None;
        }
        let ticket = self.ticket();
        let backend = Arc::clone(&self.backend);
        let form = self.session.editing_mut()?;
        form.begin_saving(ticket.sequence);
        let record_id = form.record_id().cloned();
        let payload = form.to_payload();
        debug!(object_id = %object_id, record_id = ?record_id, "submitting form");
        Some(Box::pin(save_record(backend, ticket, object_id, record_id, payload)))
    }

    /// Ask for confirmation before deleting `record_id`.
    pub fn request_delete(&mut self, record_id: &RecordId) -> bool {
        if self.record(record_id).is_none() {
            return false;
        }
        self.session.request_delete(record_id.clone());
        true
    }

    pub fn cancel_delete(&mut self) {
        self.session.take_pending_delete();
    }

    /// Delete the record awaiting confirmation.
    pub fn confirm_delete(&mut self) -> Option<Task> {
        let object_id = self.object_id.clone()?;
        let record_id = self.session.take_pending_delete()?;
        let backend = Arc::clone(&self.backend);
        let ticket = self.ticket();
        Some(Box::pin(async move {
            let result = backend.delete_record(&object_id, &record_id).await;
            Outcome::RecordDeleted {
                ticket,
                record_id,
                result,
            }
        }))
    }

    /// The list as it should currently be drawn; `None` until the schema is
    /// known.
    pub fn list_view(&self) -> Option<ListView> {
        let schema = self.schema.as_ref()?;
        let query = ListQuery {
            search_text: self.session.search_text(),
            sort_field: self.session.sort_field(),
            selected: self.session.selected_record_id(),
            open_menu: self.session.open_row_menu(),
        };
        Some(render_list(&self.records, schema, self.layout.as_ref(), &query))
    }

    /// The detail view of the selected record, if any.
    pub fn detail_view(&self) -> Option<DetailView> {
        let schema = self.schema.as_ref()?;
        let layout = self.layout.as_ref()?;
        let record = self.record(self.session.selected_record_id()?)?;
        Some(render_detail(record, schema, layout, self.session.active_section_id()))
    }

    pub fn notify(&mut self, notification: Notification) {
        self.notifications.push_back(notification);
    }

    pub fn notifications(&self) -> impl Iterator<Item = &Notification> {
        self.notifications.iter()
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain(..).collect()
    }

    /// Await `task` and everything it triggers.
    pub async fn drive(&mut self, task: Task) {
        let mut pending = vec![task];
        while let Some(task) = pending.pop() {
            let outcome = task.await;
            pending.extend(self.apply(outcome));
        }
    }

    fn load_task(&mut self, object_id: String) -> Task {
        let backend = Arc::clone(&self.backend);
        let stage = self.stage;
        let ticket = self.ticket();
        Box::pin(async move {
            let result = load_object(backend, &object_id, stage).await;
            Outcome::ObjectLoaded { ticket, result }
        })
    }

    fn refresh_task(&mut self, object_id: String) -> Task {
        let backend = Arc::clone(&self.backend);
        let ticket = self.ticket();
        Box::pin(async move {
            let result = backend.records(&object_id).await;
            Outcome::RecordsRefreshed { ticket, result }
        })
    }
}

/// Schema, then layout, then records, in that order.
pub async fn load_object(
    backend: Arc<dyn ObjectBackend>,
    object_id: &str,
    stage: LayoutStage,
) -> Result<LoadedObject, ApiError> {
    let mut schema = backend.schema(object_id).await?;
    schema.dedup_fields();
    let layout = LayoutResolver::new(Arc::clone(&backend))
        .resolve(object_id, stage)
        .await?
        .into_layout();
    let records = backend.records(object_id).await?;
    Ok(LoadedObject {
        schema,
        layout,
        records,
    })
}

async fn save_record(
    backend: Arc<dyn ObjectBackend>,
    ticket: Ticket,
    object_id: String,
    record_id: Option<RecordId>,
    payload: RecordPayload,
) -> Outcome {
    let result = match &record_id {
        Some(record_id) => backend.update_record(&object_id, record_id, &payload).await,
        None => backend.create_record(&object_id, &payload).await,
    };
    Outcome::RecordSaved {
        ticket,
        record_id,
        result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwork_api::{Fixture, FixtureLayouts, InMemoryBackend};
    use formwork_types::{Field, FieldType, Layout, Severity};

    fn backend() -> Arc<InMemoryBackend> {
        Arc::new(InMemoryBackend::with_fixture(Fixture {
            schema: ObjectSchema {
                name: "contact".into(),
                label: "Contact".into(),
                fields: vec![Field::new("name", FieldType::Text).required()],
            },
            layouts: FixtureLayouts {
                draft: None,
                published: Some(Layout::default()),
            },
            records: vec![Record::new("1").with_value("name", "Ada")],
        }))
    }

    #[tokio::test]
    async fn stale_load_is_discarded_after_navigation() {
        let mut controller = Controller::new(backend(), LayoutStage::Published);
        let first = controller.enter("contact");
        let second = controller.enter("contact");
        let stale = first.await;
        assert!(controller.apply(stale).is_empty());
        assert_eq!(controller.status(), &ViewStatus::Loading);
        controller.drive(second).await;
        assert_eq!(controller.status(), &ViewStatus::Ready);
        assert_eq!(controller.records().len(), 1);
    }

    #[tokio::test]
    async fn missing_object_degrades_without_a_toast() {
        let mut controller = Controller::new(backend(), LayoutStage::Published);
        let task = controller.enter("nope");
        controller.drive(task).await;
        assert_eq!(controller.status(), &ViewStatus::Missing);
        assert!(controller.list_view().is_none());
        assert!(controller.drain_notifications().is_empty());
    }

    #[tokio::test]
    async fn offline_load_fails_with_notification() {
        let backend = backend();
        backend.set_offline(true);
        let mut controller = Controller::new(backend, LayoutStage::Published);
        let task = controller.enter("contact");
        controller.drive(task).await;
        assert!(matches!(controller.status(), ViewStatus::Failed(_)));
        let notifications = controller.drain_notifications();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].severity, Severity::Error);
    }

    #[tokio::test]
    async fn double_submit_is_ignored_while_saving() {
        let mut controller = Controller::new(backend(), LayoutStage::Published);
        let task = controller.enter("contact");
        controller.drive(task).await;
        assert!(controller.begin_create());
        let first = controller.submit_form();
        assert!(first.is_some());
        assert!(controller.submit_form().is_none());
    }
}
