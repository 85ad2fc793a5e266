//! `PostgREST` record store.
//!
//! Maps [`Query`] onto the `PostgREST` URL grammar:
//!
//! ```text
//! GET /rest/v1/bookings?select=*,package:packages!package_id(*)&guest_id=eq.<id>&order=created_at.desc
//! ```
//!
//! Writes send `Prefer: return=representation` so the store answers with
//! the rows it wrote.

use crate::config::Config;
use crate::error::ConfigError;
use basecamp_core::providers::RecordStore;
use basecamp_core::query::{Direction, Order};
use basecamp_core::{AccessToken, Filter, Query, StoreError, Table};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

/// Postgres error code for a unique constraint violation.
const UNIQUE_VIOLATION: &str = "23505";

/// Error body returned by `PostgREST`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Record store backed by a hosted `PostgREST` endpoint.
///
/// Requests carry the project's public key; [`PostgrestStore::authenticated`]
/// adds a user's bearer token so row-level security applies to that user.
#[derive(Clone)]
pub struct PostgrestStore {
    client: Client,
    rest_url: String,
    api_key: String,
    bearer: Option<AccessToken>,
}

impl PostgrestStore {
    /// Build a store from `config`.
    ///
    /// # Errors
    ///
    /// `ConfigError::Client` if the HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self::with_client(config.http_client()?, config))
    }

    /// Build a store that shares `client`.
    #[must_use]
    pub fn with_client(client: Client, config: &Config) -> Self {
        Self {
            client,
            rest_url: config.rest_url(),
            api_key: config.anon_key.clone(),
            bearer: None,
        }
    }

    /// Act as the bearer of `token`.
    #[must_use]
    pub fn authenticated(mut self, token: &AccessToken) -> Self {
        self.bearer = Some(token.clone());
        self
    }

    fn request(&self, method: Method, table: Table) -> RequestBuilder {
        let bearer = self
            .bearer
            .as_ref()
            .map_or(self.api_key.as_str(), AccessToken::expose);
        self.client
            .request(method, format!("{}/{}", self.rest_url, table.name()))
            .header("apikey", &self.api_key)
            .bearer_auth(bearer)
    }

    fn write(&self, method: Method, table: Table) -> RequestBuilder {
        self.request(method, table)
            .header("Prefer", "return=representation")
    }
}

impl fmt::Debug for PostgrestStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgrestStore")
            .field("rest_url", &self.rest_url)
            .field("authenticated", &self.bearer.is_some())
            .finish_non_exhaustive()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Query encoding
// ═══════════════════════════════════════════════════════════════════════

fn literal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn quoted(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"")),
        other => other.to_string(),
    }
}

/// `select` parameter: every column plus one embedded resource per relation.
pub(crate) fn select_param(query: &Query) -> String {
    let mut select = String::from("*");
    for relation in &query.relations {
        select.push_str(&format!(
            ",{}:{}!{}(*)",
            relation.alias,
            relation.table.name(),
            relation.column
        ));
    }
    select
}

/// One `column=op.value` pair per filter.
pub(crate) fn filter_params(filters: &[Filter]) -> Vec<(String, String)> {
    filters
        .iter()
        .map(|filter| match filter {
            Filter::Eq(column, Value::Null) => ((*column).to_string(), "is.null".to_string()),
            Filter::Eq(column, value) => ((*column).to_string(), format!("eq.{}", literal(value))),
            Filter::In(column, values) => {
                let list: Vec<String> = values.iter().map(quoted).collect();
                ((*column).to_string(), format!("in.({})", list.join(",")))
            }
        })
        .collect()
}

pub(crate) fn order_param(order: Order) -> String {
    let direction = match order.direction {
        Direction::Ascending => "asc",
        Direction::Descending => "desc",
    };
    format!("{}.{direction}", order.column)
}

/// Full query string for a select.
pub(crate) fn select_params(query: &Query) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), select_param(query))];
    params.extend(filter_params(&query.filters));
    if let Some(order) = query.order {
        params.push(("order".to_string(), order_param(order)));
    }
    if let Some(limit) = query.limit {
        params.push(("limit".to_string(), limit.to_string()));
    }
    params
}

// ═══════════════════════════════════════════════════════════════════════
// Response handling
// ═══════════════════════════════════════════════════════════════════════

async fn send(request: RequestBuilder) -> Result<Response, StoreError> {
    let response = request
        .send()
        .await
        .map_err(|e| StoreError::RequestFailed(e.to_string()))?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let parsed = serde_json::from_str::<ErrorBody>(&body).ok();
    let message = parsed
        .as_ref()
        .and_then(|b| b.message.clone())
        .unwrap_or(body);

    if status == StatusCode::CONFLICT
        || parsed.and_then(|b| b.code).as_deref() == Some(UNIQUE_VIOLATION)
    {
        return Err(StoreError::UniqueViolation(message));
    }
    Err(StoreError::Status {
        status: status.as_u16(),
        message,
    })
}

async fn rows(table: Table, response: Response) -> Result<Vec<Value>, StoreError> {
    response.json::<Vec<Value>>().await.map_err(|e| StoreError::Decode {
        table: table.name().to_string(),
        reason: e.to_string(),
    })
}

fn require_filters(table: Table, filters: &[Filter], verb: &str) -> Result<(), StoreError> {
    if filters.is_empty() {
        Err(StoreError::Internal(format!("refusing to {verb} every row of {table}")))
    } else {
        Ok(())
    }
}

impl RecordStore for PostgrestStore {
    async fn select(&self, query: &Query) -> Result<Vec<Value>, StoreError> {
        let request = self
            .request(Method::GET, query.table)
            .query(&select_params(query));
        let response = send(request).await?;
        let rows = rows(query.table, response).await?;
        tracing::debug!(table = %query.table, rows = rows.len(), "select");
        Ok(rows)
    }

    async fn insert(&self, table: Table, row: Value) -> Result<Value, StoreError> {
        let request = self.write(Method::POST, table).json(&row);
        let response = send(request).await?;
        let inserted = rows(table, response).await?.into_iter().next().ok_or_else(|| {
            StoreError::Internal(format!("insert into {table} returned no row"))
        })?;
        tracing::debug!(table = %table, "insert");
        Ok(inserted)
    }

    async fn update(
        &self,
        table: Table,
        filters: &[Filter],
        patch: Value,
    ) -> Result<Vec<Value>, StoreError> {
        require_filters(table, filters, "update")?;
        let request = self
            .write(Method::PATCH, table)
            .query(&filter_params(filters))
            .json(&patch);
        let updated = rows(table, send(request).await?).await?;
        tracing::debug!(table = %table, rows = updated.len(), "update");
        Ok(updated)
    }

    async fn delete(&self, table: Table, filters: &[Filter]) -> Result<usize, StoreError> {
        require_filters(table, filters, "delete")?;
        let request = self
            .write(Method::DELETE, table)
            .query(&filter_params(filters));
        let removed = rows(table, send(request).await?).await?.len();
        tracing::debug!(table = %table, rows = removed, "delete");
        Ok(removed)
    }
}
