//! UI components.

pub mod component;
pub mod confirm_delete;
pub mod detail_panel;
pub mod edit_form;
pub mod help_modal;
pub mod logs_modal;
pub mod records_table;
pub mod status_bar;

pub(crate) use component::Component;
pub use confirm_delete::ConfirmDeleteModal;
pub use detail_panel::DetailPanelComponent;
pub use edit_form::EditFormComponent;
pub use help_modal::HelpModal;
pub use logs_modal::LogsModal;
pub use records_table::RecordsComponent;
