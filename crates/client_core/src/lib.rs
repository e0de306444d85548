//! HTTP client for the quotes service.

use async_trait::async_trait;
use reqwest::{header::CONTENT_DISPOSITION, Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::QuoteId,
    error::ApiError,
    protocol::{ExportFormat, QuoteRecord, QuoteUpdate},
};
use tracing::{debug, warn};
use url::Url;

pub mod error;

pub use error::ClientError;

/// Operations the admin page performs against `/api/quotes`.
#[async_trait]
pub trait QuotesApi: Send + Sync {
    async fn list_quotes(&self, shorts_only: bool) -> Result<Vec<QuoteRecord>, ClientError>;
    async fn delete_quote(&self, id: QuoteId) -> Result<(), ClientError>;
    /// Returns the stored record when the service echoes it back.
    async fn update_quote(
        &self,
        id: QuoteId,
        update: &QuoteUpdate,
    ) -> Result<Option<QuoteRecord>, ClientError>;
    fn export_url(&self, format: ExportFormat) -> Result<Url, ClientError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub filename: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct QuotesClient {
    http: Client,
    server_url: String,
}

impl QuotesClient {
    pub fn new(server_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_http(Client::new(), server_url)
    }

    pub fn with_http(http: Client, server_url: impl Into<String>) -> Result<Self, ClientError> {
        let server_url = server_url.into().trim().trim_end_matches('/').to_string();
        Url::parse(&server_url).map_err(|source| ClientError::InvalidUrl {
            url: server_url.clone(),
            source,
        })?;
        Ok(Self { http, server_url })
    }

    fn quote_url(&self, id: QuoteId) -> String {
        format!("{}/api/quotes/{}", self.server_url, id.0)
    }

    /// Fetches any URL (normally an export link) and returns the body together with the
    /// filename from `Content-Disposition`, if present.
    pub async fn download(&self, url: &Url) -> Result<Download, ClientError> {
        let url_text = url.to_string();
        let response = send(self.http.get(url.clone()), &url_text).await?;
        let filename = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .and_then(attachment_filename);
        let bytes = response
            .bytes()
            .await
            .map_err(|source| ClientError::Transport {
                url: url_text,
                source,
            })?;
        Ok(Download {
            filename,
            bytes: bytes.to_vec(),
        })
    }
}

#[async_trait]
impl QuotesApi for QuotesClient {
    async fn list_quotes(&self, shorts_only: bool) -> Result<Vec<QuoteRecord>, ClientError> {
        let url = format!("{}/api/quotes", self.server_url);
        debug!(%url, shorts_only, "fetching quotes");
        let response = send(
            self.http
                .get(&url)
                .query(&[("shorts_only", shorts_only.to_string())]),
            &url,
        )
        .await?;
        decode_json(response, &url).await
    }

    async fn delete_quote(&self, id: QuoteId) -> Result<(), ClientError> {
        let url = self.quote_url(id);
        debug!(%url, quote_id = id.0, "deleting quote");
        send(self.http.delete(&url), &url).await?;
        Ok(())
    }

    async fn update_quote(
        &self,
        id: QuoteId,
        update: &QuoteUpdate,
    ) -> Result<Option<QuoteRecord>, ClientError> {
        let url = self.quote_url(id);
        debug!(%url, quote_id = id.0, "updating quote");
        let response = send(self.http.put(&url).json(update), &url).await?;
        match decode_json::<QuoteRecord>(response, &url).await {
            Ok(record) => Ok(Some(record)),
            Err(ClientError::Decode { source, .. }) => {
                warn!(%url, error = %source, "update succeeded without a readable record");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn export_url(&self, format: ExportFormat) -> Result<Url, ClientError> {
        let url = format!("{}/api/quotes/export/{}", self.server_url, format.as_str());
        Url::parse(&url).map_err(|source| ClientError::InvalidUrl { url, source })
    }
}

async fn send(request: RequestBuilder, url: &str) -> Result<Response, ClientError> {
    let response = request
        .send()
        .await
        .map_err(|source| ClientError::Transport {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Status {
        url: url.to_string(),
        status: status.as_u16(),
        error: ApiError::from_response(status.as_u16(), &body),
    })
}

async fn decode_json<T: DeserializeOwned>(response: Response, url: &str) -> Result<T, ClientError> {
    let bytes = response
        .bytes()
        .await
        .map_err(|source| ClientError::Transport {
            url: url.to_string(),
            source,
        })?;
    serde_json::from_slice(&bytes).map_err(|source| ClientError::Decode {
        url: url.to_string(),
        source,
    })
}

fn attachment_filename(header: &str) -> Option<String> {
    header.split(';').find_map(|part| {
        let value = part.trim().strip_prefix("filename=")?;
        let value = value.trim().trim_matches('"');
        (!value.is_empty()).then(|| value.to_string())
    })
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
