use crate::{
    Config, FetchError,
    source::{HttpSource, source_from_config},
};

/// Entry point for both pipelines: the parameter catalogue and the daily
/// temperature extremes.
///
/// The operations live next to their parsing code in [`crate::catalogue`] and
/// [`crate::temperature`].
#[derive(Debug)]
pub struct SmhiApi {
    pub(crate) config: Config,
    pub(crate) source: Box<dyn HttpSource>,
}

impl SmhiApi {
    /// Build a client talking to the real API.
    pub fn new(config: Config) -> Result<Self, FetchError> {
        let source = source_from_config(&config)?;
        Ok(Self { config, source })
    }

    /// Build a client on top of any [`HttpSource`].
    pub fn with_source(config: Config, source: Box<dyn HttpSource>) -> Self {
        Self { config, source }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
