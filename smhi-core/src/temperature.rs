use std::collections::BTreeMap;
use std::io::{self, Write};

use chrono::{DateTime, Utc};
use futures_util::{StreamExt, stream};
use serde::Deserialize;
use tracing::{debug, error, info, warn};

use crate::{
    FetchError, SmhiApi,
    model::{Station, StationReading, TemperatureExtremes},
};

#[derive(Debug, Deserialize)]
struct StationList {
    station: Vec<Station>,
}

#[derive(Debug, Deserialize)]
struct LatestDay {
    /// Only the first element is decoded; later ones may have any shape.
    #[serde(default)]
    value: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct LatestValue {
    date: Option<i64>,
    value: RawValue,
}

/// The API sends values as strings; accept bare numbers too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawValue {
    Text(String),
    Number(f64),
}

impl RawValue {
    fn as_f64(&self) -> Option<f64> {
        let value = match self {
            RawValue::Text(text) => text.trim().parse().ok()?,
            RawValue::Number(n) => *n,
        };
        value.is_finite().then_some(value)
    }
}

pub fn parse_stations(url: &str, body: &str) -> Result<Vec<Station>, FetchError> {
    let list: StationList = serde_json::from_str(body)
        .map_err(|source| FetchError::Json { url: url.to_string(), source })?;
    Ok(list.station)
}

/// The first latest-day value of a station, if it reported one.
pub fn parse_latest_day(
    station_name: &str,
    url: &str,
    body: &str,
) -> Result<Option<StationReading>, FetchError> {
    let json_error = |source| FetchError::Json { url: url.to_string(), source };

    let latest: LatestDay = serde_json::from_str(body).map_err(json_error)?;

    let Some(first) = latest.value.and_then(|values| values.into_iter().next()) else {
        return Ok(None);
    };
    let first: LatestValue = serde_json::from_value(first).map_err(json_error)?;

    let Some(temperature) = first.value.as_f64() else {
        warn!(station = station_name, value = ?first.value, "ignoring non-numeric reading");
        return Ok(None);
    };

    Ok(Some(StationReading {
        station_name: station_name.to_string(),
        temperature,
        observed_at: first.date.and_then(DateTime::<Utc>::from_timestamp_millis),
    }))
}

/// Collapse readings into `name -> temperature`. A repeated name keeps the
/// reading that came last.
pub fn collect_temperatures<I>(readings: I) -> BTreeMap<String, f64>
where
    I: IntoIterator<Item = StationReading>,
{
    readings
        .into_iter()
        .map(|reading| (reading.station_name, reading.temperature))
        .collect()
}

/// Highest and lowest station, or `None` for an empty map.
///
/// Ties go to the station whose name sorts first.
pub fn extremes(temperatures: &BTreeMap<String, f64>) -> Option<TemperatureExtremes> {
    let mut iter = temperatures.iter();
    let (name, &value) = iter.next()?;

    let mut highest = (name, value);
    let mut lowest = (name, value);
    for (name, &value) in iter {
        if value > highest.1 {
            highest = (name, value);
        }
        if value < lowest.1 {
            lowest = (name, value);
        }
    }

    Some(TemperatureExtremes {
        highest: (highest.0.clone(), highest.1),
        lowest: (lowest.0.clone(), lowest.1),
    })
}

/// Readings carry one decimal; keep it even when it is zero.
fn format_degrees(value: f64) -> String {
    if value.fract() == 0.0 { format!("{value:.1}") } else { value.to_string() }
}

pub fn write_extremes<W: Write>(out: &mut W, extremes: Option<&TemperatureExtremes>) -> io::Result<()> {
    match extremes {
        Some(TemperatureExtremes { highest, lowest }) => {
            writeln!(out, "Highest temperature: {}, {} degrees", highest.0, format_degrees(highest.1))?;
            writeln!(out, "Lowest temperature: {}, {} degrees", lowest.0, format_degrees(lowest.1))
        }
        None => writeln!(out, "No temperature data available."),
    }
}

impl SmhiApi {
    pub async fn try_fetch_stations(&self) -> Result<Vec<Station>, FetchError> {
        let url = self.config.stations_url();
        let body = self.source.get_text(&url).await?;
        parse_stations(&url, &body)
    }

    /// Every station reporting the configured parameter; empty on failure.
    pub async fn fetch_stations(&self) -> Vec<Station> {
        match self.try_fetch_stations().await {
            Ok(stations) => {
                info!(count = stations.len(), "discovered stations");
                stations
            }
            Err(err) => {
                error!(error = %err.report(), "failed to fetch station data");
                Vec::new()
            }
        }
    }

    pub async fn try_fetch_station_reading(
        &self,
        station: &Station,
    ) -> Result<Option<StationReading>, FetchError> {
        let url = self.config.latest_day_url(station.id);
        let body = self.source.get_text(&url).await?;
        parse_latest_day(&station.name, &url, &body)
    }

    /// `None` when the station has nothing for the latest day or the request
    /// failed; neither is retried.
    pub async fn fetch_station_reading(&self, station: &Station) -> Option<StationReading> {
        match self.try_fetch_station_reading(station).await {
            Ok(Some(reading)) => {
                debug!(
                    station = %station.name,
                    temperature = reading.temperature,
                    observed_at = ?reading.observed_at,
                    "latest-day reading"
                );
                Some(reading)
            }
            Ok(None) => {
                debug!(station = %station.name, "no latest-day value");
                None
            }
            Err(err) => {
                warn!(station = %station.name, error = %err.report(), "failed to fetch latest-day data");
                None
            }
        }
    }

    /// Latest-day temperature of every station, keyed by station name.
    ///
    /// Per-station requests run concurrently, at most `config.concurrency` at
    /// a time, and all of them settle before the map is built.
    pub async fn fetch_daily_temperatures(&self) -> BTreeMap<String, f64> {
        let stations = self.fetch_stations().await;
        if stations.is_empty() {
            return BTreeMap::new();
        }

        let readings: Vec<Option<StationReading>> = stream::iter(&stations)
            .map(|station| self.fetch_station_reading(station))
            .buffered(self.config.concurrency)
            .collect()
            .await;

        let temperatures = collect_temperatures(readings.into_iter().flatten());
        info!(stations = stations.len(), readings = temperatures.len(), "aggregated temperatures");
        temperatures
    }

    pub async fn temperature_extremes(&self) -> Option<TemperatureExtremes> {
        extremes(&self.fetch_daily_temperatures().await)
    }

    pub async fn display_temperature_info<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let extremes = self.temperature_extremes().await;
        write_extremes(out, extremes.as_ref())
    }
}
