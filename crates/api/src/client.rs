//! HTTP client for the objects/records backend.
//!
//! [`FormworkClient`] wraps a configured `reqwest::Client` and implements
//! [`ObjectBackend`] against the REST endpoints:
//!
//! - `GET    {base}/objects/{object}/schema`
//! - `GET    {base}/objects/{object}/layout?mode=draft|published`
//! - `GET    {base}/objects/{object}/records`
//! - `POST   {base}/objects/{object}/records`
//! - `PUT    {base}/objects/{object}/records/{record}`
//! - `DELETE {base}/objects/{object}/records/{record}`

use std::env;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use formwork_types::{Layout, LayoutStage, ObjectSchema, Record, RecordId};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use reqwest::{Client, Method, RequestBuilder, Response, Url, header};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{ApiError, error_for_status};
use crate::ObjectBackend;

/// Hostnames allowed to use plain http.
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1", "::1", "[::1]"];

/// Characters escaped inside a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Thin wrapper around a configured `reqwest::Client` for the objects API.
#[derive(Debug, Clone)]
pub struct FormworkClient {
    base_url: String,
    http: Client,
    user_agent: String,
}

impl FormworkClient {
    /// Build a client for `base_url`.
    ///
    /// Non-localhost hosts must use https.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        validate_base_url(base_url)?;

        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(default_headers)
            .timeout(timeout)
            .build()
            .context("build http client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            user_agent: format!("formwork/{}; {}", env!("CARGO_PKG_VERSION"), env::consts::OS),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a request for an API-relative path.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "building request");

        self.http.request(method, url).header(header::USER_AGENT, &self.user_agent)
    }
}

/// Path for an object-scoped resource, with each segment percent-encoded.
pub fn object_path(object_id: &str, tail: &[&str]) -> String {
    let mut path = format!("/objects/{}", utf8_percent_encode(object_id, PATH_SEGMENT));
    for segment in tail {
        path.push('/');
        path.extend(utf8_percent_encode(segment, PATH_SEGMENT));
    }
    path
}

/// Validate that a base URL is acceptable for use by the client.
///
/// Rules:
/// - `localhost`/loopback: any scheme
/// - otherwise: https only
pub fn validate_base_url(base: &str) -> Result<()> {
    let parsed_base_url = Url::parse(base).map_err(|e| anyhow!("Invalid API base URL '{}': {}", base, e))?;

    let host_name = parsed_base_url
        .host_str()
        .ok_or_else(|| anyhow!("API base URL must include a host"))?;

    if LOCALHOST_DOMAINS
        .iter()
        .any(|&allowed| host_name.eq_ignore_ascii_case(allowed))
    {
        return Ok(());
    }

    if parsed_base_url.scheme() != "https" {
        return Err(anyhow!(
            "API base URL must use https for non-localhost hosts; got '{}://'",
            parsed_base_url.scheme()
        ));
    }

    Ok(())
}

#[derive(Deserialize)]
struct LayoutEnvelope {
    #[serde(default)]
    layout: Option<Layout>,
}

#[derive(Deserialize)]
struct RecordsEnvelope {
    #[serde(default)]
    records: Vec<Record>,
    #[serde(default)]
    count: Option<usize>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecordEnvelope {
    Wrapped { record: Record },
    Bare(Record),
}

impl RecordEnvelope {
    fn into_record(self) -> Record {
        match self {
            Self::Wrapped { record } | Self::Bare(record) => record,
        }
    }
}

async fn send(builder: RequestBuilder, what: &str) -> Result<Response, ApiError> {
    let response = builder.send().await?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    debug!(%status, what, "request rejected");
    Err(error_for_status(status, &body, what))
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|error| ApiError::decode(error.to_string()))
}

#[async_trait]
impl ObjectBackend for FormworkClient {
    async fn schema(&self, object_id: &str) -> Result<ObjectSchema, ApiError> {
        let request = self.request(Method::GET, &object_path(object_id, &["schema"]));
        let response = send(request, &format!("object '{object_id}'")).await?;
        let mut schema: ObjectSchema = read_json(response).await?;
        schema.dedup_fields();
        Ok(schema)
    }

    async fn layout(&self, object_id: &str, stage: LayoutStage) -> Result<Option<Layout>, ApiError> {
        let request = self
            .request(Method::GET, &object_path(object_id, &["layout"]))
            .query(&[("mode", stage.as_str())]);
        match send(request, &format!("{stage} layout")).await {
            Ok(response) => Ok(read_json::<LayoutEnvelope>(response).await?.layout),
            Err(ApiError::NotFound { .. }) => Ok(None),
            Err(error) => Err(error),
        }
    }

    async fn records(&self, object_id: &str) -> Result<Vec<Record>, ApiError> {
        let request = self.request(Method::GET, &object_path(object_id, &["records"]));
        let response = send(request, &format!("records of '{object_id}'")).await?;
        let envelope: RecordsEnvelope = read_json(response).await?;
        if let Some(count) = envelope.count
            && count != envelope.records.len()
        {
            debug!(count, received = envelope.records.len(), "record count differs from page size");
        }
        Ok(envelope.records)
    }

    async fn create_record(&self, object_id: &str, values: &Map<String, Value>) -> Result<Record, ApiError> {
        let request = self.request(Method::POST, &object_path(object_id, &["records"])).json(values);
        let response = send(request, "record").await?;
        Ok(read_json::<RecordEnvelope>(response).await?.into_record())
    }

    async fn update_record(&self, object_id: &str, record_id: &RecordId, values: &Map<String, Value>) -> Result<Record, ApiError> {
        let request = self
            .request(Method::PUT, &object_path(object_id, &["records", record_id.as_str()]))
            .json(values);
        let response = send(request, &format!("record {record_id}")).await?;
        Ok(read_json::<RecordEnvelope>(response).await?.into_record())
    }

    async fn delete_record(&self, object_id: &str, record_id: &RecordId) -> Result<(), ApiError> {
        let request = self.request(Method::DELETE, &object_path(object_id, &["records", record_id.as_str()]));
        send(request, &format!("record {record_id}")).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_rules() {
        assert!(validate_base_url("http://localhost:3000/api").is_ok());
        assert!(validate_base_url("http://127.0.0.1:8080").is_ok());
        assert!(validate_base_url("https://objects.example.com/api").is_ok());
        assert!(validate_base_url("http://objects.example.com/api").is_err());
        assert!(validate_base_url("not a url").is_err());
    }

    #[test]
    fn object_paths_encode_segments() {
        assert_eq!(object_path("invoice", &["schema"]), "/objects/invoice/schema");
        assert_eq!(object_path("my object", &["records", "a/b"]), "/objects/my%20object/records/a%2Fb");
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = FormworkClient::new("http://localhost:3000/api/", DEFAULT_TIMEOUT).expect("client");
        assert_eq!(client.base_url(), "http://localhost:3000/api");
    }

    #[test]
    fn record_envelope_accepts_wrapped_and_bare() {
        let wrapped: RecordEnvelope = serde_json::from_str(r#"{"record": {"id": "1", "name": "a"}}"#).expect("wrapped");
        assert_eq!(wrapped.into_record().id.as_str(), "1");
        let bare: RecordEnvelope = serde_json::from_str(r#"{"id": 2, "name": "b"}"#).expect("bare");
        assert_eq!(bare.into_record().id.as_str(), "2");
    }
}
