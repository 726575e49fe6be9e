//! Authored layouts: sections, columns and blocks for the detail view plus
//! the column selection for the list view.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// How a layout arranges the detail view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutMode {
    Single,
    TwoColumn,
    Tabs,
    /// List alongside a detail panel; the default when a layout omits its mode.
    #[default]
    MasterDetail,
}

impl LayoutMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::TwoColumn => "two-column",
            Self::Tabs => "tabs",
            Self::MasterDetail => "master-detail",
        }
    }

    fn parse_lenient(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "single" => Some(Self::Single),
            "two-column" | "twocolumn" => Some(Self::TwoColumn),
            "tabs" => Some(Self::Tabs),
            "master-detail" | "masterdetail" => Some(Self::MasterDetail),
            _ => None,
        }
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown mode strings load as "absent" so the resolver can apply its default.
fn deserialize_layout_mode<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<LayoutMode>, D::Error> {
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(LayoutMode::parse_lenient))
}

/// Which authored revision of a layout to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutStage {
    Draft,
    #[default]
    Published,
}

impl LayoutStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }
}

impl fmt::Display for LayoutStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseLayoutStageError;

impl fmt::Display for ParseLayoutStageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid layout stage; expected 'draft' or 'published'")
    }
}

impl std::error::Error for ParseLayoutStageError {}

impl FromStr for LayoutStage {
    type Err = ParseLayoutStageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            _ => Err(ParseLayoutStageError),
        }
    }
}

/// The smallest renderable unit of a layout.
///
/// Authors tag blocks with a `type` string. Types this engine does not know
/// deserialize to [`Block::Unknown`] and render nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Block {
    Field {
        #[serde(rename = "fieldName", default)]
        field_name: String,
        #[serde(rename = "fieldLabel", default, skip_serializing_if = "Option::is_none")]
        field_label: Option<String>,
    },
    Header {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
    Divider,
    Button {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
    Related,
    List,
    Form,
    #[serde(other)]
    Unknown,
}

impl Block {
    pub fn field(name: impl Into<String>) -> Self {
        Self::Field {
            field_name: name.into(),
            field_label: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Column {
    #[serde(default)]
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub columns: Vec<Column>,
}

/// Column selection for the list view.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ListConfig {
    #[serde(default)]
    pub columns: Vec<String>,
}

/// A finished layout as authored in the layout editor.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Layout {
    #[serde(
        rename = "layoutMode",
        default,
        deserialize_with = "deserialize_layout_mode",
        skip_serializing_if = "Option::is_none"
    )]
    pub layout_mode: Option<LayoutMode>,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(rename = "listConfig", default, skip_serializing_if = "Option::is_none")]
    pub list_config: Option<ListConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_deserialize_including_unknown_types() {
        let json = r#"{
            "layoutMode": "tabs",
            "sections": [{
                "id": "main",
                "title": "Main",
                "columns": [{"blocks": [
                    {"type": "field", "fieldName": "amount", "fieldLabel": "Total"},
                    {"type": "header", "label": "Billing"},
                    {"type": "divider"},
                    {"type": "button"},
                    {"type": "related", "id": "blk-7"},
                    {"type": "chart", "series": [1, 2]}
                ]}]
            }],
            "listConfig": {"columns": ["amount"]}
        }"#;
        let layout: Layout = serde_json::from_str(json).expect("deserialize layout");
        assert_eq!(layout.layout_mode, Some(LayoutMode::Tabs));
        let blocks = &layout.sections[0].columns[0].blocks;
        assert_eq!(
            blocks[0],
            Block::Field {
                field_name: "amount".into(),
                field_label: Some("Total".into())
            }
        );
        assert_eq!(blocks[1], Block::Header { label: Some("Billing".into()) });
        assert_eq!(blocks[2], Block::Divider);
        assert_eq!(blocks[3], Block::Button { label: None });
        assert_eq!(blocks[4], Block::Related);
        assert_eq!(blocks[5], Block::Unknown);
        assert_eq!(layout.list_config.map(|c| c.columns), Some(vec!["amount".to_string()]));
    }

    #[test]
    fn unknown_or_missing_layout_mode_loads_as_none() {
        let missing: Layout = serde_json::from_str(r#"{"sections": []}"#).expect("missing mode");
        assert_eq!(missing.layout_mode, None);
        let unknown: Layout = serde_json::from_str(r#"{"layoutMode": "carousel"}"#).expect("unknown mode");
        assert_eq!(unknown.layout_mode, None);
        let snake: Layout = serde_json::from_str(r#"{"layoutMode": "two_column"}"#).expect("snake mode");
        assert_eq!(snake.layout_mode, Some(LayoutMode::TwoColumn));
    }

    #[test]
    fn layout_stage_parses_case_insensitively() {
        assert_eq!("Draft".parse::<LayoutStage>(), Ok(LayoutStage::Draft));
        assert_eq!("published".parse::<LayoutStage>(), Ok(LayoutStage::Published));
        assert!("live".parse::<LayoutStage>().is_err());
    }
}
