//! # Formwork Engine
//!
//! The Formwork Engine turns an object's schema, its authored layout and its
//! records into view models a front-end can draw: a filtered, sorted list and
//! a sectioned detail view. It also owns the interaction state around them
//! (selection, tabs, row menus, edit forms, delete confirmation) and the
//! backend calls those interactions trigger.
//!
//! ## Key Features
//!
//! - **Layout Resolution**: Fetches the draft or published layout and applies defaults
//! - **Value Formatting**: One set of type-directed rules for list cells and detail fields
//! - **List & Detail Rendering**: Pure functions from data and session state to view models
//! - **Interaction Control**: Selection, row menus, editing and deletion with stale-response protection
//! - **Markup**: Escaped HTML for embedding the views in a page
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use formwork_api::{Fixture, FixtureLayouts, InMemoryBackend};
//! use formwork_engine::{Controller, ListView};
//! use formwork_types::{Field, FieldType, Layout, LayoutStage, ObjectSchema, Record};
//!
//! # tokio_test_runtime(async {
//! let backend = InMemoryBackend::with_fixture(Fixture {
//!     schema: ObjectSchema {
//!         name: "invoice".into(),
//!         label: "Invoice".into(),
//!         fields: vec![Field::new("amount", FieldType::Number)],
//!     },
//!     layouts: FixtureLayouts { draft: None, published: Some(Layout::default()) },
//!     records: vec![Record::new("1").with_value("amount", 1200.5)],
//! });
//!
//! let mut controller = Controller::new(Arc::new(backend), LayoutStage::Published);
//! let task = controller.enter("invoice");
//! controller.drive(task).await;
//!
//! let Some(ListView::Rows { rows, .. }) = controller.list_view() else { unreachable!() };
//! assert_eq!(rows[0].cells[0].text, "1,200.5");
//! # });
//! # fn tokio_test_runtime(f: impl std::future::Future<Output = ()>) {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **`resolver`**: Layout fetching and normalization
//! - **`format`**: Value presentation and the plain string form used by search/sort
//! - **`list`** / **`detail`**: View-model renderers
//! - **`menu`**: Row actions and menu placement geometry
//! - **`session`** / **`form`**: Interaction state
//! - **`controller`**: Orchestrates the above against an `ObjectBackend`
//! - **`markup`**: HTML emitter

pub mod controller;
pub mod detail;
pub mod form;
pub mod format;
pub mod list;
pub mod markup;
pub mod menu;
pub mod resolver;
pub mod session;

// Re-export commonly used types for convenience
pub use controller::{Controller, LoadedObject, Outcome, Task, Ticket, ViewStatus, load_object};
pub use detail::{BlockView, ColumnView, DetailBody, DetailView, PlaceholderKind, SectionView, TabView, record_title, render_detail};
pub use form::{EditForm, FormField, FormInput};
pub use format::{FormatContext, Formatted, Tone, format_field, format_value, string_repr};
pub use list::{ListCell, ListColumn, ListQuery, ListRow, ListView, NO_RECORDS_MESSAGE, no_layout_message, render_list};
pub use markup::{escape_html, render_detail_html, render_list_html, render_page};
pub use menu::{Bounds, MenuPlacement, RowAction, place_menu};
pub use resolver::{LayoutResolver, Presentation, Resolution, ResolvedLayout};
pub use session::SessionState;
