//! Reference data provider.
//!
//! The remote API exposes two shapes: `reference/{collection}?query=…` returns
//! a list of loosely matching records, and `pokemon/{id}` returns a single
//! record wrapped as `{ "pokemon": { … } }`. Either may instead answer with an
//! object carrying an `error` string, which is surfaced verbatim.

use std::future::Future;
use std::time::Duration;

use serde_json::{Map, Value};

use crate::category::{Category, Endpoint};
use crate::error::CardError;

/// Default API root.
pub const DEFAULT_API_BASE_URL: &str = "https://pokemon.maybreak.com/api/v1";

/// Maximum response body size (10 MB).
const MAX_RESPONSE_BYTES: usize = 10 * 1024 * 1024;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// One record returned by the provider. Always a JSON object.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Candidate(Map<String, Value>);

impl Candidate {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// The record's `name`, if it has a string one.
    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Candidate {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Source of candidate records for a category and lookup string.
pub trait ReferenceProvider: Send + Sync {
    fn fetch_candidates(
        &self,
        category: Category,
        query: &str,
    ) -> impl Future<Output = Result<Vec<Candidate>, CardError>> + Send;
}

// ---------------------------------------------------------------------------
// HTTP provider
// ---------------------------------------------------------------------------

/// Provider backed by the reference HTTP API.
#[derive(Debug, Clone)]
pub struct HttpReferenceProvider {
    client: reqwest::Client,
    base_url: url::Url,
}

impl HttpReferenceProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CardError> {
        let base_url = validate_base_url(base_url)?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| CardError::provider(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    fn endpoint_url(&self, segments: &[&str]) -> Result<url::Url, CardError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| CardError::provider(format!("API URL {} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) fn reference_url(&self, collection: &str, query: &str) -> Result<url::Url, CardError> {
        let mut url = self.endpoint_url(&["reference", collection])?;
        url.query_pairs_mut().append_pair("query", query);
        Ok(url)
    }

    pub(crate) fn pokemon_url(&self, id: &str) -> Result<url::Url, CardError> {
        self.endpoint_url(&["pokemon", id])
    }

    async fn get_json(&self, url: url::Url) -> Result<Value, CardError> {
        tracing::debug!(%url, "fetching reference data");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| CardError::provider(format!("Reference request failed: {e}")))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| CardError::provider(format!("Failed to read reference response: {e}")))?;

        if body.len() > MAX_RESPONSE_BYTES {
            return Err(CardError::provider(format!(
                "Reference response exceeds maximum size ({} bytes > {} bytes)",
                body.len(),
                MAX_RESPONSE_BYTES
            )));
        }

        // Error payloads come back with non-2xx statuses, so parse before
        // looking at the status.
        match serde_json::from_slice::<Value>(&body) {
            Ok(value) => Ok(value),
            Err(_) if !status.is_success() => Err(CardError::provider(format!(
                "Reference API returned HTTP {status}"
            ))),
            Err(e) => Err(CardError::provider(format!(
                "Failed to parse reference response JSON: {e}"
            ))),
        }
    }
}

impl ReferenceProvider for HttpReferenceProvider {
    async fn fetch_candidates(
        &self,
        category: Category,
        query: &str,
    ) -> Result<Vec<Candidate>, CardError> {
        match category.endpoint() {
            Endpoint::Reference(collection) => {
                let url = self.reference_url(collection, query)?;
                interpret_reference_response(self.get_json(url).await?)
            }
            Endpoint::Pokemon => {
                let url = self.pokemon_url(query)?;
                interpret_pokemon_response(self.get_json(url).await?)
            }
            Endpoint::Local => Err(CardError::provider(format!(
                "{} cards are not fetched from the reference API",
                category.label()
            ))),
        }
    }
}

/// Accept only http(s) API roots.
fn validate_base_url(raw: &str) -> Result<url::Url, CardError> {
    let parsed = url::Url::parse(raw)
        .map_err(|e| CardError::provider(format!("Invalid API URL: {e}")))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(CardError::provider(format!(
            "Scheme \"{scheme}\" is not allowed; use http or https"
        ))),
    }
}

/// Pull the provider's own error message out of an object payload.
fn provider_error(value: &Value) -> Option<String> {
    match value.get("error")? {
        Value::Null | Value::Bool(false) => None,
        Value::String(message) => Some(message.clone()),
        other => Some(other.to_string()),
    }
}

pub(crate) fn interpret_reference_response(value: Value) -> Result<Vec<Candidate>, CardError> {
    if let Some(message) = provider_error(&value) {
        return Err(CardError::Provider(message));
    }

    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(fields) => Ok(Candidate(fields)),
                other => Err(CardError::MalformedRecord {
                    what: "reference",
                    message: format!("expected an object, got {other}"),
                }),
            })
            .collect(),
        other => Err(CardError::MalformedRecord {
            what: "reference",
            message: format!("expected a list of records, got {other}"),
        }),
    }
}

pub(crate) fn interpret_pokemon_response(value: Value) -> Result<Vec<Candidate>, CardError> {
    if let Some(message) = provider_error(&value) {
        return Err(CardError::Provider(message));
    }

    match value {
        Value::Object(mut body) => match body.remove("pokemon") {
            Some(Value::Object(fields)) => Ok(vec![Candidate(fields)]),
            Some(Value::Null) | None => Ok(Vec::new()),
            Some(other) => Err(CardError::MalformedRecord {
                what: "pokemon",
                message: format!("expected an object, got {other}"),
            }),
        },
        other => Err(CardError::MalformedRecord {
            what: "pokemon",
            message: format!("expected an object, got {other}"),
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
