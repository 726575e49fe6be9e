//! Per-view interaction state.
//!
//! Pure state plus the transitions the controller drives. Nothing here talks
//! to the backend.

use formwork_types::{Record, RecordId};

use crate::form::EditForm;
use crate::resolver::ResolvedLayout;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    selected_record_id: Option<RecordId>,
    active_section_id: Option<String>,
    search_text: String,
    sort_field: Option<String>,
    open_row_menu: Option<RecordId>,
    editing: Option<EditForm>,
    pending_delete: Option<RecordId>,
}

impl SessionState {
    pub fn selected_record_id(&self) -> Option<&RecordId> {
        self.selected_record_id.as_ref()
    }

    pub fn active_section_id(&self) -> Option<&str> {
        self.active_section_id.as_deref()
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn sort_field(&self) -> Option<&str> {
        self.sort_field.as_deref()
    }

    pub fn open_row_menu(&self) -> Option<&RecordId> {
        self.open_row_menu.as_ref()
    }

    pub fn editing(&self) -> Option<&EditForm> {
        self.editing.as_ref()
    }

    pub fn editing_mut(&mut self) -> Option<&mut EditForm> {
        self.editing.as_mut()
    }

    /// Record being edited; `None` for a create form or no form.
    pub fn editing_record_id(&self) -> Option<&RecordId> {
        self.editing.as_ref().and_then(EditForm::record_id)
    }

    pub fn pending_delete(&self) -> Option<&RecordId> {
        self.pending_delete.as_ref()
    }

    /// Select a record for the detail view; the first section becomes active.
    pub fn select(&mut self, record_id: RecordId, layout: Option<&ResolvedLayout>) {
        self.selected_record_id = Some(record_id);
        self.active_section_id = layout.and_then(ResolvedLayout::first_section_id).map(str::to_string);
        self.open_row_menu = None;
    }

    pub fn clear_selection(&mut self) {
        self.selected_record_id = None;
        self.active_section_id = None;
    }

    /// Activate a tab. Ids not present in `layout` are ignored.
    pub fn activate_section(&mut self, section_id: &str, layout: &ResolvedLayout) -> bool {
        if !layout.has_section(section_id) {
            return false;
        }
        self.active_section_id = Some(section_id.to_string());
        true
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
    }

    /// `None` or an empty name restores store order.
    pub fn set_sort_field(&mut self, field: Option<String>) {
        self.sort_field = field.filter(|name| !name.is_empty());
    }

    /// Open the menu of `record_id`, closing whichever menu was open.
    pub fn open_menu(&mut self, record_id: RecordId) {
        self.open_row_menu = Some(record_id);
    }

    /// Open the menu, or close it when it is already open for `record_id`.
    pub fn toggle_menu(&mut self, record_id: RecordId) {
        if self.open_row_menu.as_ref() == Some(&record_id) {
            self.open_row_menu = None;
        } else {
            self.open_row_menu = Some(record_id);
        }
    }

    pub fn close_menu(&mut self) {
        self.open_row_menu = None;
    }

    pub fn start_editing(&mut self, form: EditForm) {
        self.open_row_menu = None;
        self.editing = Some(form);
    }

    pub fn stop_editing(&mut self) -> Option<EditForm> {
        self.editing.take()
    }

    pub fn request_delete(&mut self, record_id: RecordId) {
        self.open_row_menu = None;
        self.pending_delete = Some(record_id);
    }

    pub fn take_pending_delete(&mut self) -> Option<RecordId> {
        self.pending_delete.take()
    }

    /// Record `record_id` no longer exists.
    pub fn forget_record(&mut self, record_id: &RecordId) {
        if self.selected_record_id.as_ref() == Some(record_id) {
            self.clear_selection();
        }
        if self.open_row_menu.as_ref() == Some(record_id) {
            self.open_row_menu = None;
        }
        if self.pending_delete.as_ref() == Some(record_id) {
            self.pending_delete = None;
        }
        if self.editing_record_id() == Some(record_id) {
            self.editing = None;
        }
    }

    /// Drop references to records missing from `records` and keep the active
    /// section valid for `layout`.
    pub fn reconcile(&mut self, records: &[Record], layout: Option<&ResolvedLayout>) {
        let exists = |id: &RecordId| records.iter().any(|record| &record.id == id);
        let stale: Vec<RecordId> = [
            self.selected_record_id.as_ref(),
            self.open_row_menu.as_ref(),
            self.pending_delete.as_ref(),
            self.editing_record_id(),
        ]
        .into_iter()
        .flatten()
        .filter(|id| !exists(id))
        .cloned()
        .collect();
        for id in &stale {
            self.forget_record(id);
        }

        if self.selected_record_id.is_some() {
            let valid = match (self.active_section_id.as_deref(), layout) {
                (Some(id), Some(layout)) => layout.has_section(id),
                (None, Some(layout)) => layout.first_section_id().is_none(),
                (_, None) => true,
            };
            if !valid {
                self.active_section_id = layout.and_then(ResolvedLayout::first_section_id).map(str::to_string);
            }
        }
    }

    /// Back to the initial state, as when entering a different object.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwork_types::{Layout, LayoutMode, LayoutStage, ObjectSchema, Section};

    fn layout(ids: &[&str]) -> ResolvedLayout {
        ResolvedLayout::new(
            Layout {
                layout_mode: Some(LayoutMode::Tabs),
                sections: ids
                    .iter()
                    .map(|id| Section {
                        id: id.to_string(),
                        ..Section::default()
                    })
                    .collect(),
                list_config: None,
            },
            LayoutStage::Published,
        )
    }

    #[test]
    fn only_one_menu_is_open_at_a_time() {
        let mut session = SessionState::default();
        session.open_menu(RecordId::new("a"));
        session.open_menu(RecordId::new("b"));
        assert_eq!(session.open_row_menu(), Some(&RecordId::new("b")));
        session.toggle_menu(RecordId::new("b"));
        assert_eq!(session.open_row_menu(), None);
        session.toggle_menu(RecordId::new("a"));
        assert_eq!(session.open_row_menu(), Some(&RecordId::new("a")));
    }

    #[test]
    fn selecting_activates_the_first_section() {
        let layout = layout(&["main", "billing"]);
        let mut session = SessionState::default();
        session.open_menu(RecordId::new("1"));
        session.select(RecordId::new("1"), Some(&layout));
        assert_eq!(session.active_section_id(), Some("main"));
        assert_eq!(session.open_row_menu(), None);
        assert!(session.activate_section("billing", &layout));
        assert!(!session.activate_section("nope", &layout));
        assert_eq!(session.active_section_id(), Some("billing"));
    }

    #[test]
    fn forgetting_the_selected_record_clears_the_detail() {
        let mut session = SessionState::default();
        session.select(RecordId::new("1"), None);
        session.request_delete(RecordId::new("1"));
        session.forget_record(&RecordId::new("1"));
        assert_eq!(session.selected_record_id(), None);
        assert_eq!(session.pending_delete(), None);
    }

    #[test]
    fn reconcile_drops_vanished_records_and_bad_sections() {
        let layout = layout(&["main", "billing"]);
        let schema = ObjectSchema::default();
        let mut session = SessionState::default();
        session.select(RecordId::new("1"), Some(&layout));
        session.start_editing(EditForm::for_edit(&schema, &Record::new("2")));
        session.open_menu(RecordId::new("3"));

        let survivors = vec![Record::new("1"), Record::new("3")];
        let relayout = self::layout(&["summary"]);
        session.reconcile(&survivors, Some(&relayout));

        assert_eq!(session.selected_record_id(), Some(&RecordId::new("1")));
        assert_eq!(session.active_section_id(), Some("summary"));
        assert!(session.editing().is_none());
        assert_eq!(session.open_row_menu(), Some(&RecordId::new("3")));

        session.reconcile(&[], Some(&relayout));
        assert_eq!(session.selected_record_id(), None);
        assert_eq!(session.open_row_menu(), None);
    }

    #[test]
    fn empty_sort_field_means_store_order() {
        let mut session = SessionState::default();
        session.set_sort_field(Some(String::new()));
        assert_eq!(session.sort_field(), None);
        session.set_sort_field(Some("name".into()));
        assert_eq!(session.sort_field(), Some("name"));
    }
}
