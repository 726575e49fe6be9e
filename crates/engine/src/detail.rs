//! Detail rendering for one selected record.

use formwork_types::{Block, FieldType, ObjectSchema, Record, RecordId, Section};

use crate::format::{FormatContext, Tone, format_field, string_repr};
use crate::resolver::{Presentation, ResolvedLayout};

/// Blocks reserved for future use render as a labelled placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    Related,
    List,
    Form,
}

impl PlaceholderKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Related => "Related records",
            Self::List => "Embedded list",
            Self::Form => "Embedded form",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockView {
    Field {
        name: String,
        label: String,
        value: String,
        tone: Tone,
    },
    Header {
        label: String,
    },
    Divider,
    /// Inert in this version.
    Button {
        label: String,
    },
    Placeholder(PlaceholderKind),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnView {
    pub blocks: Vec<BlockView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionView {
    pub id: String,
    pub title: String,
    pub columns: Vec<ColumnView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabView {
    pub section_id: String,
    pub title: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailBody {
    Stacked(Vec<SectionView>),
    Tabbed { tabs: Vec<TabView>, active: SectionView },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub record_id: RecordId,
    pub title: String,
    pub body: DetailBody,
}

/// Title of the detail view: the first schema field's value, or the record
/// id when that value is absent.
pub fn record_title(record: &Record, schema: &ObjectSchema) -> String {
    schema
        .first_field()
        .map(|field| string_repr(record.value(&field.name)).into_owned())
        .filter(|title| !title.trim().is_empty())
        .unwrap_or_else(|| record.id.to_string())
}

/// Render `record` through `layout`.
///
/// In tabbed presentation only the section matching `active_section_id` is
/// rendered; an unknown or missing id falls back to the first section.
pub fn render_detail(
    record: &Record,
    schema: &ObjectSchema,
    layout: &ResolvedLayout,
    active_section_id: Option<&str>,
) -> DetailView {
    let body = match layout.presentation() {
        Presentation::Stacked => DetailBody::Stacked(
            layout
                .sections()
                .iter()
                .map(|section| render_section(section, record, schema))
                .collect(),
        ),
        Presentation::Tabbed => {
            let sections = layout.sections();
            let active_index = active_section_id
                .and_then(|id| sections.iter().position(|section| section.id == id))
                .unwrap_or(0);
            let tabs = sections
                .iter()
                .enumerate()
                .map(|(index, section)| TabView {
                    section_id: section.id.clone(),
                    title: section_title(section),
                    active: index == active_index,
                })
                .collect();
            DetailBody::Tabbed {
                tabs,
                active: render_section(&sections[active_index], record, schema),
            }
        }
    };

    DetailView {
        record_id: record.id.clone(),
        title: record_title(record, schema),
        body,
    }
}

fn section_title(section: &Section) -> String {
    if section.title.trim().is_empty() {
        section.id.clone()
    } else {
        section.title.clone()
    }
}

fn render_section(section: &Section, record: &Record, schema: &ObjectSchema) -> SectionView {
    SectionView {
        id: section.id.clone(),
        title: section_title(section),
        columns: section
            .columns
            .iter()
            .map(|column| ColumnView {
                blocks: column
                    .blocks
                    .iter()
                    .filter_map(|block| render_block(block, record, schema))
                    .collect(),
            })
            .collect(),
    }
}

/// `None` for blocks that render nothing.
fn render_block(block: &Block, record: &Record, schema: &ObjectSchema) -> Option<BlockView> {
    match block {
        Block::Field {
            field_name,
            field_label,
        } => {
            let field = schema.field(field_name);
            let field_type = field.map(|field| field.field_type).unwrap_or(FieldType::Text);
            let label = field_label
                .as_deref()
                .filter(|label| !label.trim().is_empty())
                .map(str::to_string)
                .or_else(|| field.map(|field| field.display_label().to_string()))
                .unwrap_or_else(|| field_name.clone());
            let formatted = format_field(record.value(field_name), field_type, FormatContext::Detail);
            Some(BlockView::Field {
                name: field_name.clone(),
                label,
                value: formatted.text,
                tone: formatted.tone,
            })
        }
        Block::Header { label } => Some(BlockView::Header {
            label: label.clone().unwrap_or_else(|| "Header".to_string()),
        }),
        Block::Divider => Some(BlockView::Divider),
        Block::Button { label } => Some(BlockView::Button {
            label: label.clone().unwrap_or_else(|| "Action".to_string()),
        }),
        Block::Related => Some(BlockView::Placeholder(PlaceholderKind::Related)),
        Block::List => Some(BlockView::Placeholder(PlaceholderKind::List)),
        Block::Form => Some(BlockView::Placeholder(PlaceholderKind::Form)),
        Block::Unknown => None,
    }
}
