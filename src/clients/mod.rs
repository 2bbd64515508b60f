//! Outbound calls to the third-party data providers.
//!
//! Each provider module owns its response shapes and a request builder. All of
//! them go through the [`Upstream`] seam so the cache core can be driven by a
//! canned upstream in tests.

pub mod darksky;
pub mod eventbrite;
pub mod geocode;
pub mod tmdb;
pub mod yelp;

use async_trait::async_trait;
use reqwest::Client;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid provider URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("provider responded with status {0}")]
    Status(u16),

    #[error("provider URL cannot carry path segments: {0}")]
    NotABase(String),
}

/// A single GET against a provider endpoint.
#[derive(Clone)]
pub struct ProviderRequest {
    pub url: Url,
    /// Sent as `Authorization: Bearer ..` when present.
    pub bearer: Option<String>,
}

impl ProviderRequest {
    #[must_use]
    pub const fn new(url: Url) -> Self {
        Self { url, bearer: None }
    }

    #[must_use]
    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }
}

// Keys travel in query strings and paths, so only the host is printed.
impl fmt::Debug for ProviderRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRequest")
            .field("host", &self.url.host_str())
            .field("bearer", &self.bearer.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[async_trait]
pub trait Upstream: Send + Sync {
    /// Issues the request and returns the decoded JSON body.
    ///
    /// Any transport failure or non-2xx status is an error.
    async fn get_json(&self, request: &ProviderRequest) -> Result<serde_json::Value, ClientError>;
}

/// [`Upstream`] backed by a shared `reqwest` client.
#[derive(Clone)]
pub struct HttpUpstream {
    client: Client,
}

impl HttpUpstream {
    /// `timeout_seconds == 0` leaves requests unbounded.
    pub fn new(timeout_seconds: u64) -> Result<Self, ClientError> {
        let mut builder = Client::builder().user_agent(concat!(
            "city-explorer/",
            env!("CARGO_PKG_VERSION")
        ));

        if timeout_seconds > 0 {
            builder = builder.timeout(Duration::from_secs(timeout_seconds));
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn get_json(&self, request: &ProviderRequest) -> Result<serde_json::Value, ClientError> {
        let mut builder = self.client.get(request.url.clone());

        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }

        Ok(response.json().await?)
    }
}

/// Appends path segments to a configured base URL, percent-encoding each.
pub(crate) fn endpoint(base: &str, segments: &[&str]) -> Result<Url, ClientError> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|()| ClientError::NotABase(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
