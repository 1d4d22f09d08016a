use crate::{Config, FetchError, source::http::HttpClient};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod http;

/// Where response bodies come from.
///
/// A body is only returned for a `200 OK`; every other status is a
/// [`FetchError::Status`].
#[async_trait]
pub trait HttpSource: Send + Sync + Debug {
    async fn get_text(&self, url: &str) -> Result<String, FetchError>;
}

/// Construct the reqwest-backed source described by `config`.
pub fn source_from_config(config: &Config) -> Result<Box<dyn HttpSource>, FetchError> {
    let client = HttpClient::new(config.timeout)?;
    Ok(Box::new(client))
}


#[cfg(test)]
mod tests {
    use super::fake::FakeSource;
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn source_from_default_config_builds() {
        assert!(source_from_config(&Config::default()).is_ok());
    }

    #[tokio::test]
    async fn fake_source_serves_routes_and_404s_the_rest() {
        let source = FakeSource::new()
            .ok("http://host/a", "body")
            .status("http://host/b", StatusCode::INTERNAL_SERVER_ERROR);

        assert_eq!(source.get_text("http://host/a").await.unwrap(), "body");

        let err = source.get_text("http://host/b").await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));

        let err = source.get_text("http://host/c").await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));

        assert_eq!(source.hits().len(), 3);
    }
}
