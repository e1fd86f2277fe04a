//! Remote endpoint access.
//!
//! The sync agent only needs two operations: fetch the list of remote records
//! and submit one record. [`Transport`] captures that contract so tests can
//! substitute an in-memory implementation for [`HttpTransport`].

use crate::error::QuoteError;
use crate::quote::Quote;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

/// User id attached to pushed records
pub const PUSH_USER_ID: u64 = 1;

/// A record as returned by the remote endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRecord {
    #[serde(default)]
    pub id: Option<u64>,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(rename = "userId", default)]
    pub user_id: Option<u64>,
}

/// Payload submitted when pushing a local quote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingRecord {
    pub title: String,
    pub body: String,
    #[serde(rename = "userId")]
    pub user_id: u64,
}

impl From<&Quote> for OutgoingRecord {
    fn from(quote: &Quote) -> Self {
        Self {
            title: quote.text.clone(),
            body: quote.category.clone(),
            user_id: PUSH_USER_ID,
        }
    }
}

/// Fetch/submit contract of the remote endpoint
pub trait Transport: Send + Sync + 'static {
    fn fetch_records(&self) -> impl Future<Output = Result<Vec<RemoteRecord>, QuoteError>> + Send;

    fn submit_record(
        &self,
        record: &OutgoingRecord,
    ) -> impl Future<Output = Result<(), QuoteError>> + Send;
}

/// JSON-over-HTTP transport backed by `reqwest`
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("quotebook/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Transport for HttpTransport {
    fn fetch_records(&self) -> impl Future<Output = Result<Vec<RemoteRecord>, QuoteError>> + Send {
        let request = self.client.get(&self.endpoint);
        async move {
            let response = request.send().await?.error_for_status()?;
            let records = response.json::<Vec<RemoteRecord>>().await?;
            Ok::<_, QuoteError>(records)
        }
    }

    fn submit_record(
        &self,
        record: &OutgoingRecord,
    ) -> impl Future<Output = Result<(), QuoteError>> + Send {
        let request = self.client.post(&self.endpoint).json(record);
        async move {
            request.send().await?.error_for_status()?;
            Ok::<_, QuoteError>(())
        }
    }
}
