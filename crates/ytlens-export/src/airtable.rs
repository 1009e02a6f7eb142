//! Airtable upload client.
//!
//! Records are created through `POST {base_url}/{base_id}/{table}` in batches
//! of at most [`AIRTABLE_BATCH_SIZE`], which is the API's per-request limit.
//! `typecast` is enabled so Airtable coerces values into existing column
//! types instead of rejecting the batch.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use ytlens_core::{AirtableConfig, Comment};

use crate::error::ExportError;
use crate::record::CommentRecord;

pub const AIRTABLE_BATCH_SIZE: usize = 10;

#[derive(Serialize)]
struct CreateRecords {
    records: Vec<NewRecord>,
    typecast: bool,
}

#[derive(Serialize)]
struct NewRecord {
    fields: Map<String, Value>,
}

#[derive(Deserialize)]
struct CreatedRecords {
    #[serde(default)]
    records: Vec<Value>,
}

#[derive(Clone)]
pub struct AirtableClient {
    client: Client,
    api_key: String,
    table_url: Url,
}

impl AirtableClient {
    /// Creates a client for the configured base and table.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`ExportError::InvalidBaseUrl`] if the configured API root
    /// does not parse.
    pub fn new(config: &AirtableConfig, timeout_secs: u64) -> Result<Self, ExportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let invalid = |reason: &str| ExportError::InvalidBaseUrl {
            url: config.api_base_url.clone(),
            reason: reason.to_owned(),
        };
        let mut table_url = Url::parse(&format!("{}/", config.api_base_url.trim_end_matches('/')))
            .map_err(|e| invalid(&e.to_string()))?;
        table_url
            .path_segments_mut()
            .map_err(|()| invalid("URL cannot be a base"))?
            .pop_if_empty()
            .push(&config.base_id)
            .push(&config.table_name);

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            table_url,
        })
    }

    /// Builds a client from optional configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Unconfigured`] when `config` is `None`, plus
    /// the errors of [`Self::new`].
    pub fn from_optional(
        config: Option<&AirtableConfig>,
        timeout_secs: u64,
    ) -> Result<Self, ExportError> {
        let config = config.ok_or(ExportError::Unconfigured)?;
        Self::new(config, timeout_secs)
    }

    /// Endpoint records are posted to.
    #[must_use]
    pub fn table_url(&self) -> &Url {
        &self.table_url
    }

    /// Uploads every comment, returning how many records Airtable created.
    ///
    /// Batches are sent in order with `batch_delay_ms` between them. Upload
    /// stops at the first failed batch; earlier batches stay in the table.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Api`] for a non-2xx response and
    /// [`ExportError::Http`] on network failure.
    pub async fn upload_comments(
        &self,
        comments: &[Comment],
        batch_delay_ms: u64,
    ) -> Result<usize, ExportError> {
        let mut created = 0;
        for (index, batch) in comments.chunks(AIRTABLE_BATCH_SIZE).enumerate() {
            if index > 0 && batch_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(batch_delay_ms)).await;
            }
            let body = CreateRecords {
                records: batch.iter().map(to_new_record).collect(),
                typecast: true,
            };
            created += self.post_batch(&body).await?;
            tracing::debug!(batch = index + 1, created, "uploaded Airtable batch");
        }
        tracing::info!(created, table = %self.table_url, "Airtable upload complete");
        Ok(created)
    }

    async fn post_batch(&self, body: &CreateRecords) -> Result<usize, ExportError> {
        let response = self
            .client
            .post(self.table_url.clone())
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.ok();
            return Err(ExportError::Api {
                status: status.as_u16(),
                message: failure_message(status, body.as_deref()),
            });
        }

        let created: CreatedRecords = response.json().await?;
        Ok(created.records.len())
    }
}

/// Airtable cannot take JSON nulls for missing cells, so absent optional
/// fields are left out of the record.
fn to_new_record(comment: &Comment) -> NewRecord {
    let fields = match serde_json::to_value(CommentRecord::from(comment)) {
        Ok(Value::Object(map)) => map.into_iter().filter(|(_, v)| !v.is_null()).collect(),
        _ => Map::new(),
    };
    NewRecord { fields }
}

/// Message for a failed batch: the error body when there is one, otherwise
/// the status line's reason phrase.
fn failure_message(status: StatusCode, body: Option<&str>) -> String {
    match body.map(str::trim).filter(|b| !b.is_empty()) {
        Some(body) => error_message(body),
        None => status
            .canonical_reason()
            .map_or_else(|| format!("HTTP {}", status.as_u16()), str::to_owned),
    }
}

/// Pulls `error.message` (or `error` when it is a plain string) out of an
/// Airtable error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let error = parsed.as_ref().and_then(|v| v.get("error"));
    match error {
        Some(Value::String(kind)) => kind.clone(),
        Some(obj) => obj
            .get("message")
            .and_then(Value::as_str)
            .or_else(|| obj.get("type").and_then(Value::as_str))
            .map_or_else(|| body.to_owned(), str::to_owned),
        None => body.to_owned(),
    }
}
