use std::time::Duration;

/// Root of the SMHI meteorological observations API.
pub const DEFAULT_BASE_URL: &str = "https://opendata-download-metobs.smhi.se/api/version/latest";

/// Parameter id of "Lufttemperatur" (air temperature, latest hourly value).
pub const AIR_TEMPERATURE: u32 = 2;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_CONCURRENCY: usize = 16;

/// Runtime settings for talking to the API.
///
/// There is no file or environment layer; the CLI fills this in from flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL, stored without a trailing slash.
    pub base_url: String,

    /// Parameter aggregated by the temperature pipeline.
    pub parameter_id: u32,

    /// Per-request timeout.
    pub timeout: Duration,

    /// Upper bound on in-flight per-station requests. Never zero.
    pub concurrency: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            parameter_id: AIR_TEMPERATURE,
            timeout: DEFAULT_TIMEOUT,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl Config {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// `{base}/parameter/`, the Atom feed listing every parameter.
    pub fn parameters_url(&self) -> String {
        format!("{}/parameter/", self.base_url)
    }

    /// `{base}/parameter/{id}.json`, the stations reporting the parameter.
    pub fn stations_url(&self) -> String {
        format!("{}/parameter/{}.json", self.base_url, self.parameter_id)
    }

    /// Latest-day data for one station.
    pub fn latest_day_url(&self, station_id: u32) -> String {
        format!(
            "{}/parameter/{}/station/{}/period/latest-day/data.json",
            self.base_url, self.parameter_id, station_id
        )
    }
}
