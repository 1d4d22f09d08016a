use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One entry of the parameter catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub id: u32,
    /// `"<title> (<summary>)"`
    pub label: String,
}

/// A weather station as listed by the parameter's station endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Station {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StationReading {
    pub station_name: String,
    pub temperature: f64,
    pub observed_at: Option<DateTime<Utc>>,
}

/// Stations holding the highest and lowest reading of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureExtremes {
    pub highest: (String, f64),
    pub lowest: (String, f64),
}
