//! In-process backend backed by fixture documents.
//!
//! Used for offline rendering (`--fixture`) and as the backend in tests. It
//! behaves like the real server where the UI can observe it: ids and
//! `created_at` are assigned on create, missing required fields and
//! non-numeric numbers are rejected with a validation message, and unknown
//! records answer `NotFound`.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use formwork_types::{FieldType, Layout, LayoutStage, ObjectSchema, Record, RecordId, is_present};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::ObjectBackend;
use crate::error::ApiError;

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to read fixture {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse JSON fixture: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to parse YAML fixture: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Draft and published revisions of an object's layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixtureLayouts {
    #[serde(default)]
    pub draft: Option<Layout>,
    #[serde(default)]
    pub published: Option<Layout>,
}

impl FixtureLayouts {
    pub fn get(&self, stage: LayoutStage) -> Option<&Layout> {
        match stage {
            LayoutStage::Draft => self.draft.as_ref(),
            LayoutStage::Published => self.published.as_ref(),
        }
    }
}

/// Everything the backend knows about a single object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixture {
    pub schema: ObjectSchema,
    #[serde(default)]
    pub layouts: FixtureLayouts,
    #[serde(default)]
    pub records: Vec<Record>,
}

impl Fixture {
    /// Parse a fixture document, choosing JSON or YAML by file extension
    /// (YAML when the extension is missing or unrecognized).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| FixtureError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(serde_yaml::from_str(&content)?)
        }
    }
}

#[derive(Debug, Default)]
pub struct InMemoryBackend {
    objects: Mutex<HashMap<String, Fixture>>,
    next_id: AtomicU64,
    offline: AtomicBool,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            ..Self::default()
        }
    }

    /// Backend holding one object, addressed by its schema name.
    pub fn with_fixture(fixture: Fixture) -> Self {
        let backend = Self::new();
        backend.insert_object(fixture.schema.name.clone(), fixture);
        backend
    }

    pub fn insert_object(&self, object_id: impl Into<String>, mut fixture: Fixture) {
        fixture.schema.dedup_fields();
        self.objects
            .lock()
            .expect("fixture lock poisoned")
            .insert(object_id.into(), fixture);
    }

    /// Object ids known to this backend, sorted.
    pub fn object_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.objects.lock().expect("fixture lock poisoned").keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Simulate a dropped connection: every call fails with `NetworkFailure`
    /// until switched back.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn ensure_online(&self) -> Result<(), ApiError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ApiError::network("connection refused"));
        }
        Ok(())
    }

    fn with_object<T>(&self, object_id: &str, f: impl FnOnce(&mut Fixture) -> Result<T, ApiError>) -> Result<T, ApiError> {
        self.ensure_online()?;
        let mut objects = self.objects.lock().expect("fixture lock poisoned");
        let fixture = objects
            .get_mut(object_id)
            .ok_or_else(|| ApiError::not_found(format!("object '{object_id}'")))?;
        f(fixture)
    }

    fn allocate_id(&self) -> RecordId {
        RecordId::new(format!("rec-{}", self.next_id.fetch_add(1, Ordering::SeqCst)))
    }
}

/// Server-side checks: required fields present, numbers numeric.
fn validate_payload(schema: &ObjectSchema, values: &Map<String, Value>) -> Result<(), ApiError> {
    for field in &schema.fields {
        let value = values.get(&field.name).filter(|value| is_present(value));
        match value {
            None if field.is_required => {
                return Err(ApiError::validation(format!("{} is required", field.display_label())));
            }
            Some(Value::String(text)) if field.field_type == FieldType::Number && text.trim().parse::<f64>().is_err() => {
                return Err(ApiError::validation(format!("{} must be a number", field.display_label())));
            }
            _ => {}
        }
    }
    Ok(())
}

fn apply_payload(schema: &ObjectSchema, record: &mut Record, values: &Map<String, Value>) {
    for field in &schema.fields {
        if let Some(value) = values.get(&field.name) {
            record.set_value(field.name.clone(), value.clone());
        }
    }
}

#[async_trait]
impl ObjectBackend for InMemoryBackend {
    async fn schema(&self, object_id: &str) -> Result<ObjectSchema, ApiError> {
        self.with_object(object_id, |fixture| Ok(fixture.schema.clone()))
    }

    async fn layout(&self, object_id: &str, stage: LayoutStage) -> Result<Option<Layout>, ApiError> {
        self.with_object(object_id, |fixture| Ok(fixture.layouts.get(stage).cloned()))
    }

    async fn records(&self, object_id: &str) -> Result<Vec<Record>, ApiError> {
        self.with_object(object_id, |fixture| Ok(fixture.records.clone()))
    }

    async fn create_record(&self, object_id: &str, values: &Map<String, Value>) -> Result<Record, ApiError> {
        let id = self.allocate_id();
        self.with_object(object_id, |fixture| {
            validate_payload(&fixture.schema, values)?;
            let mut record = Record::new(id);
            record.created_at = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
            apply_payload(&fixture.schema, &mut record, values);
            debug!(object_id, record_id = %record.id, "created record");
            fixture.records.push(record.clone());
            Ok(record)
        })
    }

    async fn update_record(&self, object_id: &str, record_id: &RecordId, values: &Map<String, Value>) -> Result<Record, ApiError> {
        self.with_object(object_id, |fixture| {
            validate_payload(&fixture.schema, values)?;
            let schema = fixture.schema.clone();
            let record = fixture
                .records
                .iter_mut()
                .find(|record| &record.id == record_id)
                .ok_or_else(|| ApiError::not_found(format!("record {record_id}")))?;
            apply_payload(&schema, record, values);
            Ok(record.clone())
        })
    }

    async fn delete_record(&self, object_id: &str, record_id: &RecordId) -> Result<(), ApiError> {
        self.with_object(object_id, |fixture| {
            let before = fixture.records.len();
            fixture.records.retain(|record| &record.id != record_id);
            if fixture.records.len() == before {
                return Err(ApiError::not_found(format!("record {record_id}")));
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwork_types::Field;
    use serde_json::json;

    fn fixture() -> Fixture {
        Fixture {
            schema: ObjectSchema {
                name: "invoice".into(),
                label: "Invoice".into(),
                fields: vec![
                    Field::new("title", FieldType::Text).required(),
                    Field::new("amount", FieldType::Number),
                ],
            },
            layouts: FixtureLayouts::default(),
            records: vec![Record::new("r1").with_value("title", "First")],
        }
    }

    fn payload(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[tokio::test]
    async fn create_assigns_id_and_rejects_missing_required() {
        let backend = InMemoryBackend::with_fixture(fixture());
        let created = backend
            .create_record("invoice", &payload(json!({"title": "Second", "amount": 3, "bogus": 1})))
            .await
            .expect("create");
        assert_eq!(created.id.as_str(), "rec-1");
        assert!(created.created_at.is_some());
        assert_eq!(created.value("bogus"), None);

        let rejected = backend.create_record("invoice", &payload(json!({"amount": 3}))).await;
        assert_eq!(rejected, Err(ApiError::validation("title is required")));

        let not_numeric = backend
            .create_record("invoice", &payload(json!({"title": "x", "amount": "lots"})))
            .await;
        assert_eq!(not_numeric, Err(ApiError::validation("amount must be a number")));

        assert_eq!(backend.records("invoice").await.expect("records").len(), 2);
    }

    #[tokio::test]
    async fn missing_things_are_not_found() {
        let backend = InMemoryBackend::with_fixture(fixture());
        assert!(backend.schema("nope").await.expect_err("missing object").is_not_found());
        assert_eq!(backend.layout("invoice", LayoutStage::Published).await, Ok(None));
        let missing = backend.delete_record("invoice", &RecordId::new("zzz")).await;
        assert!(missing.expect_err("missing record").is_not_found());
    }

    #[tokio::test]
    async fn offline_backend_fails_every_call() {
        let backend = InMemoryBackend::with_fixture(fixture());
        backend.set_offline(true);
        assert_eq!(backend.records("invoice").await, Err(ApiError::network("connection refused")));
        backend.set_offline(false);
        assert!(backend.records("invoice").await.is_ok());
    }

    #[test]
    fn fixture_loads_from_yaml_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("invoice.yaml");
        fs::write(
            &path,
            r#"
schema:
  name: invoice
  fields:
    - { name: title, type: text }
layouts:
  published:
    layoutMode: tabs
    sections: []
records:
  - { id: 1, title: Hello }
"#,
        )
        .expect("write fixture");
        let fixture = Fixture::from_file(&path).expect("load fixture");
        assert_eq!(fixture.schema.fields.len(), 1);
        assert!(fixture.layouts.draft.is_none());
        assert!(fixture.layouts.published.is_some());
        assert_eq!(fixture.records[0].id.as_str(), "1");
    }
}
