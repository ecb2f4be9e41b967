use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::StoreCredentials;
use crate::error::{Result, ScoutError};
use crate::models::EventRecord;
use crate::store::EventStore;

/// Supabase table accessed through its PostgREST endpoint
pub struct SupabaseStore {
    client: Client,
    table_url: String,
}

impl SupabaseStore {
    /// Builds the client and probes the table. Failing here is fatal for a run.
    pub async fn connect(credentials: &StoreCredentials, table: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert("apikey", header_value(&credentials.key)?);
        headers.insert(
            AUTHORIZATION,
            header_value(&format!("Bearer {}", credentials.key))?,
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .default_headers(headers)
            .build()?;

        let store = Self {
            client,
            table_url: format!(
                "{}/rest/v1/{}",
                credentials.url.trim_end_matches('/'),
                table
            ),
        };

        store.probe().await?;
        info!("Connected to store table '{}'", table);
        Ok(store)
    }

    async fn probe(&self) -> Result<()> {
        let response = self
            .client
            .get(&self.table_url)
            .query(&[("select", "id"), ("limit", "1")])
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| ScoutError::Config(format!("store key is not a valid header: {}", e)))
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(ScoutError::Store {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl EventStore for SupabaseStore {
    async fn exists(&self, ticket_url: &str) -> Result<bool> {
        let filter = format!("eq.{}", ticket_url);
        let response = self
            .client
            .get(&self.table_url)
            .query(&[
                ("select", "id"),
                ("ticket_url", filter.as_str()),
                ("limit", "1"),
            ])
            .send()
            .await?;

        let rows: Vec<Value> = ensure_success(response).await?.json().await?;
        debug!("exists({}) -> {}", ticket_url, !rows.is_empty());
        Ok(!rows.is_empty())
    }

    async fn insert(&self, record: &EventRecord) -> Result<()> {
        let response = self
            .client
            .post(&self.table_url)
            .header("Prefer", "return=minimal")
            .json(record)
            .send()
            .await?;

        // Unique constraint on ticket_url
        if response.status() == StatusCode::CONFLICT {
            return Err(ScoutError::Duplicate(record.ticket_url.clone()));
        }
        ensure_success(response).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "supabase"
    }
}
