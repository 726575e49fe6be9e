//! Layout resolution.
//!
//! Fetches the authored layout for an object and normalizes it into a
//! [`ResolvedLayout`] the renderers can rely on: the mode is always known,
//! every section has an id, and the tab/stacked decision is made in one place.

use std::sync::Arc;

use formwork_api::{ApiError, ObjectBackend};
use formwork_types::{Field, Layout, LayoutMode, LayoutStage, ObjectSchema, Section};
use tracing::debug;

/// How the detail view lays out sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    /// Every section rendered top to bottom.
    Stacked,
    /// A tab strip with exactly one section's content visible.
    Tabbed,
}

/// A layout with defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLayout {
    stage: LayoutStage,
    mode: LayoutMode,
    sections: Vec<Section>,
    list_columns: Vec<String>,
}

impl ResolvedLayout {
    /// Normalize an authored layout.
    ///
    /// - an absent mode becomes [`LayoutMode::MasterDetail`]
    /// - sections without an id get `section-<index>`
    /// - section/column/block order is kept as authored
    pub fn new(layout: Layout, stage: LayoutStage) -> Self {
        let sections = layout
            .sections
            .into_iter()
            .enumerate()
            .map(|(index, mut section)| {
                if section.id.trim().is_empty() {
                    section.id = format!("section-{index}");
                    debug!(section = %section.id, "assigned positional section id");
                }
                section
            })
            .collect();

        Self {
            stage,
            mode: layout.layout_mode.unwrap_or_default(),
            sections,
            list_columns: layout.list_config.map(|config| config.columns).unwrap_or_default(),
        }
    }

    pub fn stage(&self) -> LayoutStage {
        self.stage
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Tabs need at least two sections to be meaningful; anything else stacks.
    pub fn presentation(&self) -> Presentation {
        if self.mode == LayoutMode::Tabs && self.sections.len() >= 2 {
            Presentation::Tabbed
        } else {
            Presentation::Stacked
        }
    }

    /// Whether the list and the detail panel share the screen.
    pub fn is_master_detail(&self) -> bool {
        self.mode == LayoutMode::MasterDetail
    }

    pub fn first_section_id(&self) -> Option<&str> {
        self.sections.first().map(|section| section.id.as_str())
    }

    /// First section carrying `id`.
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.id == id)
    }

    pub fn has_section(&self, id: &str) -> bool {
        self.section(id).is_some()
    }

    /// Column names as authored in `listConfig`, before schema filtering.
    pub fn configured_list_columns(&self) -> &[String] {
        &self.list_columns
    }

    /// Fields shown as list columns.
    ///
    /// A non-empty `listConfig.columns` selects and orders the columns;
    /// names missing from the schema are dropped. Otherwise every schema
    /// field is shown in schema order.
    pub fn list_fields<'s>(&self, schema: &'s ObjectSchema) -> Vec<&'s Field> {
        if self.list_columns.is_empty() {
            return schema.fields.iter().collect();
        }
        self.list_columns.iter().filter_map(|name| schema.field(name)).collect()
    }

    /// `listConfig` names that no longer exist in the schema.
    pub fn dangling_list_columns<'a>(&'a self, schema: &ObjectSchema) -> Vec<&'a str> {
        self.list_columns
            .iter()
            .filter(|name| schema.field(name).is_none())
            .map(String::as_str)
            .collect()
    }
}

/// Result of asking for a layout.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Found(ResolvedLayout),
    /// Nothing authored for the requested stage.
    NotFound,
}

impl Resolution {
    pub fn into_layout(self) -> Option<ResolvedLayout> {
        match self {
            Self::Found(layout) => Some(layout),
            Self::NotFound => None,
        }
    }
}

/// Fetches layouts from the backend.
#[derive(Clone)]
pub struct LayoutResolver {
    backend: Arc<dyn ObjectBackend>,
}

impl LayoutResolver {
    pub fn new(backend: Arc<dyn ObjectBackend>) -> Self {
        Self { backend }
    }

    /// Resolve the `stage` layout of `object_id`.
    ///
    /// A missing layout (an explicit `null` or a 404) is `NotFound`, not an
    /// error; transport and decode failures are returned as errors.
    pub async fn resolve(&self, object_id: &str, stage: LayoutStage) -> Result<Resolution, ApiError> {
        match self.backend.layout(object_id, stage).await {
            Ok(Some(layout)) => Ok(Resolution::Found(ResolvedLayout::new(layout, stage))),
            Ok(None) | Err(ApiError::NotFound { .. }) => {
                debug!(object_id, %stage, "no layout authored");
                Ok(Resolution::NotFound)
            }
            Err(error) => Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwork_api::{Fixture, FixtureLayouts, InMemoryBackend};
    use formwork_types::{Column, FieldType, ListConfig};

    fn section(id: &str) -> Section {
        Section {
            id: id.to_string(),
            title: id.to_uppercase(),
            columns: vec![Column::default()],
        }
    }

    fn schema() -> ObjectSchema {
        ObjectSchema {
            name: "invoice".into(),
            label: "Invoice".into(),
            fields: vec![
                Field::new("amount", FieldType::Number),
                Field::new("paid", FieldType::Boolean),
            ],
        }
    }

    #[test]
    fn missing_mode_defaults_to_master_detail() {
        let resolved = ResolvedLayout::new(Layout::default(), LayoutStage::Published);
        assert_eq!(resolved.mode(), LayoutMode::MasterDetail);
        assert!(resolved.is_master_detail());
        assert_eq!(resolved.presentation(), Presentation::Stacked);
        assert_eq!(resolved.first_section_id(), None);
    }

    #[test]
    fn tabs_need_two_sections() {
        let one = Layout {
            layout_mode: Some(LayoutMode::Tabs),
            sections: vec![section("main")],
            list_config: None,
        };
        assert_eq!(ResolvedLayout::new(one, LayoutStage::Draft).presentation(), Presentation::Stacked);

        let two = Layout {
            layout_mode: Some(LayoutMode::Tabs),
            sections: vec![section("main"), section("billing")],
            list_config: None,
        };
        assert_eq!(ResolvedLayout::new(two, LayoutStage::Draft).presentation(), Presentation::Tabbed);
    }

    #[test]
    fn sections_without_ids_get_positional_ids() {
        let layout = Layout {
            layout_mode: None,
            sections: vec![section(""), section("named"), section("  ")],
            list_config: None,
        };
        let resolved = ResolvedLayout::new(layout, LayoutStage::Published);
        let ids: Vec<_> = resolved.sections().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["section-0", "named", "section-2"]);
        assert!(resolved.has_section("named"));
        assert!(!resolved.has_section("missing"));
    }

    #[test]
    fn list_fields_drop_unknown_names() {
        let layout = Layout {
            layout_mode: None,
            sections: vec![],
            list_config: Some(ListConfig {
                columns: vec!["paid".into(), "missingField".into()],
            }),
        };
        let resolved = ResolvedLayout::new(layout, LayoutStage::Published);
        let schema = schema();
        let names: Vec<_> = resolved.list_fields(&schema).iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["paid"]);
        assert_eq!(resolved.dangling_list_columns(&schema), ["missingField"]);
    }

    #[test]
    fn empty_list_config_shows_all_fields() {
        let layout = Layout {
            layout_mode: None,
            sections: vec![],
            list_config: Some(ListConfig { columns: vec![] }),
        };
        let resolved = ResolvedLayout::new(layout, LayoutStage::Published);
        let schema = schema();
        let names: Vec<_> = resolved.list_fields(&schema).iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["amount", "paid"]);
    }

    #[tokio::test]
    async fn resolver_distinguishes_stages() {
        let backend = InMemoryBackend::with_fixture(Fixture {
            schema: schema(),
            layouts: FixtureLayouts {
                draft: Some(Layout::default()),
                published: None,
            },
            records: vec![],
        });
        let resolver = LayoutResolver::new(Arc::new(backend));
        let draft = resolver.resolve("invoice", LayoutStage::Draft).await.expect("draft");
        assert!(matches!(draft, Resolution::Found(ref layout) if layout.stage() == LayoutStage::Draft));
        let published = resolver.resolve("invoice", LayoutStage::Published).await.expect("published");
        assert_eq!(published, Resolution::NotFound);
        let missing_object = resolver.resolve("nope", LayoutStage::Published).await.expect("missing object");
        assert_eq!(missing_object, Resolution::NotFound);
    }
}
