//! Supabase (PostgREST) backed investment table.

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::models::{InvestmentId, InvestmentPatch, InvestmentRecord, NewInvestment};

use super::InvestmentStore;

/// Talks to `{url}/rest/v1/{table}` with the project key.
///
/// Built once at startup and shared; the inner `reqwest::Client` pools connections.
pub struct SupabaseStore {
    client: Client,
    base_url: String,
    table: String,
    key: SecretString,
}

impl SupabaseStore {
    pub fn with_client(
        client: Client,
        base_url: impl Into<String>,
        table: impl Into<String>,
        key: SecretString,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            table: table.into(),
            key,
        }
    }

    /// Build from `[store]` config (after env overrides). Fails when url or key is missing.
    pub fn from_config(config: &Config) -> Result<Self> {
        let (url, key) = config.store_credentials()?;
        let client = Client::builder()
            .timeout(config.store.timeout)
            .build()
            .context("Failed to build store HTTP client")?;
        info!(url = %url, table = %config.store.table, "store client initialized");
        Ok(Self::with_client(
            client,
            url,
            config.store.table.clone(),
            SecretString::from(key.expose_secret().to_string()),
        ))
    }

    fn table_url(&self) -> String {
        format!(
            "{}/rest/v1/{}",
            self.base_url,
            urlencoding::encode(&self.table)
        )
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        let key = self.key.expose_secret();
        request
            .header("apikey", key)
            .header("Authorization", format!("Bearer {key}"))
    }

    /// Send a write and return the first row of the representation, if any.
    async fn write(&self, request: RequestBuilder) -> Result<Option<InvestmentRecord>> {
        let response = self
            .authed(request)
            .header("Prefer", "return=representation")
            .send()
            .await?;
        let rows: Vec<InvestmentRecord> = decode(response).await?;
        Ok(rows.into_iter().next())
    }
}

async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("store returned {status}: {body}");
    }
    response
        .json::<T>()
        .await
        .context("Failed to decode store response")
}

#[async_trait::async_trait]
impl InvestmentStore for SupabaseStore {
    async fn list_all(&self) -> Result<Vec<InvestmentRecord>> {
        let request = self
            .client
            .get(self.table_url())
            .query(&[("select", "*"), ("order", "id.asc")]);
        let response = self
            .authed(request)
            .send()
            .await
            .context("Failed to fetch investments")?;
        let rows: Vec<InvestmentRecord> = decode(response).await?;
        debug!(count = rows.len(), "fetched investments");
        Ok(rows)
    }

    async fn insert(&self, investment: &NewInvestment) -> Result<Option<InvestmentRecord>> {
        let request = self.client.post(self.table_url()).json(investment);
        match self.write(request).await {
            Ok(row) => {
                if row.is_some() {
                    info!(asset = %investment.asset_name, "investment added");
                }
                Ok(row)
            }
            Err(e) => {
                warn!(asset = %investment.asset_name, error = %e, "insert failed");
                Ok(None)
            }
        }
    }

    async fn update(
        &self,
        id: InvestmentId,
        patch: &InvestmentPatch,
    ) -> Result<Option<InvestmentRecord>> {
        let request = self
            .client
            .patch(self.table_url())
            .query(&[("id", format!("eq.{id}"))])
            .json(patch);
        match self.write(request).await {
            Ok(row) => {
                if row.is_some() {
                    info!(id = %id, "investment updated");
                }
                Ok(row)
            }
            Err(e) => {
                warn!(id = %id, error = %e, "update failed");
                Ok(None)
            }
        }
    }
}
