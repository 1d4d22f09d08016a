use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::error::{FetchError, truncate_body};

use super::HttpSource;

/// [`HttpSource`] over a shared reqwest connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    http: Client,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("smhi-core/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { http })
    }
}

#[async_trait]
impl HttpSource for HttpClient {
    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        debug!(url, "GET");

        let res = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Transport { url: url.to_string(), source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| FetchError::Transport { url: url.to_string(), source })?;

        if status != StatusCode::OK {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
                body: truncate_body(&body),
            });
        }

        debug!(url, bytes = body.len(), "response received");
        Ok(body)
    }
}
