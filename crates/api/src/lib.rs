//! Backend boundary for Formwork.
//!
//! The rendering engine never talks HTTP directly; it consumes the
//! [`ObjectBackend`] trait. Two implementations ship here:
//!
//! - [`FormworkClient`]: the REST client used against a live server
//! - [`InMemoryBackend`]: a fixture-backed backend for offline rendering and tests
//!
//! # Example
//!
//! ```ignore
//! use formwork_api::{FormworkClient, ObjectBackend, DEFAULT_TIMEOUT};
//! use formwork_types::LayoutStage;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = FormworkClient::new("http://localhost:3000/api", DEFAULT_TIMEOUT)?;
//!     let schema = client.schema("invoice").await?;
//!     let layout = client.layout("invoice", LayoutStage::Published).await?;
//!     println!("{} fields, layout present: {}", schema.fields.len(), layout.is_some());
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use formwork_types::{Layout, LayoutStage, ObjectSchema, Record, RecordId};
use serde_json::{Map, Value};

pub mod client;
pub mod error;
pub mod memory;

pub use client::{DEFAULT_TIMEOUT, FormworkClient, object_path, validate_base_url};
pub use error::ApiError;
pub use memory::{Fixture, FixtureError, FixtureLayouts, InMemoryBackend};

/// Record payload sent on create/update: field name → value.
pub type RecordPayload = Map<String, Value>;

/// CRUD boundary for objects and their records.
///
/// Every call is independent; callers impose any ordering they need.
#[async_trait]
pub trait ObjectBackend: Send + Sync {
    /// Ordered field list of an object.
    async fn schema(&self, object_id: &str) -> Result<ObjectSchema, ApiError>;

    /// Authored layout for `stage`, `None` when nothing was authored.
    async fn layout(&self, object_id: &str, stage: LayoutStage) -> Result<Option<Layout>, ApiError>;

    async fn records(&self, object_id: &str) -> Result<Vec<Record>, ApiError>;

    async fn create_record(&self, object_id: &str, values: &RecordPayload) -> Result<Record, ApiError>;

    async fn update_record(&self, object_id: &str, record_id: &RecordId, values: &RecordPayload) -> Result<Record, ApiError>;

    async fn delete_record(&self, object_id: &str, record_id: &RecordId) -> Result<(), ApiError>;
}
