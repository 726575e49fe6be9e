//! List rendering: columns from the layout, rows from the record store,
//! narrowed by search and ordered by the chosen sort field.

use formwork_types::{FieldType, LayoutStage, ObjectSchema, Record, RecordId};

use crate::format::{FormatContext, Formatted, Tone, format_field, string_repr};
use crate::resolver::ResolvedLayout;

/// The parts of session state the list depends on.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListQuery<'a> {
    pub search_text: &'a str,
    pub sort_field: Option<&'a str>,
    pub selected: Option<&'a RecordId>,
    pub open_menu: Option<&'a RecordId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListColumn {
    pub name: String,
    pub label: String,
    pub field_type: FieldType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListCell {
    pub text: String,
    pub tone: Tone,
}

impl From<Formatted> for ListCell {
    fn from(formatted: Formatted) -> Self {
        Self {
            text: formatted.text,
            tone: formatted.tone,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    pub record_id: RecordId,
    pub cells: Vec<ListCell>,
    pub selected: bool,
    pub menu_open: bool,
}

/// What the list area shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView {
    /// No layout exists for the active stage.
    NoLayout,
    /// A layout exists but no record survives the search (or none exist).
    NoRecords { columns: Vec<ListColumn> },
    Rows { columns: Vec<ListColumn>, rows: Vec<ListRow> },
}

impl ListView {
    pub fn columns(&self) -> &[ListColumn] {
        match self {
            Self::NoLayout => &[],
            Self::NoRecords { columns } | Self::Rows { columns, .. } => columns,
        }
    }

    pub fn rows(&self) -> &[ListRow] {
        match self {
            Self::Rows { rows, .. } => rows,
            Self::NoLayout | Self::NoRecords { .. } => &[],
        }
    }
}

/// Message shown in place of the list when no layout exists.
pub fn no_layout_message(stage: LayoutStage) -> String {
    match stage {
        LayoutStage::Published => "No published layout. Publish a layout to display records.".to_string(),
        LayoutStage::Draft => "No draft layout. Save a draft layout to preview records.".to_string(),
    }
}

pub const NO_RECORDS_MESSAGE: &str = "No records found.";

/// Render the list.
///
/// `records` is taken in store order. Filtering keeps a record when any schema
/// field's string form contains the search text, ignoring case; sorting is a
/// stable lexicographic comparison of the sort field's string form, with
/// absent values comparing as the empty string.
pub fn render_list(
    records: &[Record],
    schema: &ObjectSchema,
    layout: Option<&ResolvedLayout>,
    query: &ListQuery<'_>,
) -> ListView {
    let Some(layout) = layout else {
        return ListView::NoLayout;
    };

    let fields = layout.list_fields(schema);
    let columns: Vec<ListColumn> = fields
        .iter()
        .map(|field| ListColumn {
            name: field.name.clone(),
            label: field.display_label().to_string(),
            field_type: field.field_type,
        })
        .collect();

    let visible = visible_records(records, schema, query.search_text, query.sort_field);
    if visible.is_empty() {
        return ListView::NoRecords { columns };
    }

    let rows = visible
        .into_iter()
        .map(|record| ListRow {
            record_id: record.id.clone(),
            cells: columns
                .iter()
                .map(|column| format_field(record.value(&column.name), column.field_type, FormatContext::List).into())
                .collect(),
            selected: query.selected == Some(&record.id),
            menu_open: query.open_menu == Some(&record.id),
        })
        .collect();

    ListView::Rows { columns, rows }
}

/// Records that match `search_text`, ordered by `sort_field`.
pub fn visible_records<'r>(
    records: &'r [Record],
    schema: &ObjectSchema,
    search_text: &str,
    sort_field: Option<&str>,
) -> Vec<&'r Record> {
    let needle = search_text.to_lowercase();
    let mut visible: Vec<&Record> = records
        .iter()
        .filter(|record| matches_search(record, schema, &needle))
        .collect();

    if let Some(sort_field) = sort_field.filter(|name| !name.is_empty()) {
        visible.sort_by_cached_key(|record| string_repr(record.value(sort_field)).into_owned());
    }
    visible
}

/// `needle` must already be lower-cased.
fn matches_search(record: &Record, schema: &ObjectSchema, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    schema
        .fields
        .iter()
        .any(|field| string_repr(record.value(&field.name)).to_lowercase().contains(needle))
}
