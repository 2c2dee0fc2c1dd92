//! met.no Locationforecast client

use super::{conditions, WeatherError, WeatherProvider};
use crate::config::WeatherConfig;
use crate::status::WeatherReport;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const FORECAST_URL: &str = "https://api.met.no/weatherapi/locationforecast/2.0/compact";

pub struct MetNoClient {
    client: Client,
    lat: f64,
    lon: f64,
}

impl MetNoClient {
    /// met.no rejects requests without an identifying `User-Agent`
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            lat: config.lat,
            lon: config.lon,
        })
    }
}

#[async_trait]
impl WeatherProvider for MetNoClient {
    async fn current(&self) -> Result<WeatherReport, WeatherError> {
        let response = self
            .client
            .get(FORECAST_URL)
            .query(&[("lat", format!("{:.4}", self.lat)), ("lon", format!("{:.4}", self.lon))])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Status(status.as_u16()));
        }

        let forecast: Forecast = response.json().await?;
        report_from(forecast)
    }
}

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct Forecast {
    properties: Properties,
}

#[derive(Debug, Deserialize)]
struct Properties {
    timeseries: Vec<TimeStep>,
}

#[derive(Debug, Deserialize)]
struct TimeStep {
    data: StepData,
}

#[derive(Debug, Deserialize)]
struct StepData {
    instant: Instant,
    #[serde(default)]
    next_1_hours: Option<NextHour>,
}

#[derive(Debug, Deserialize)]
struct Instant {
    details: InstantDetails,
}

#[derive(Debug, Deserialize)]
struct InstantDetails {
    air_temperature: f64,
}

#[derive(Debug, Deserialize)]
struct NextHour {
    #[serde(default)]
    summary: Option<Summary>,
    #[serde(default)]
    details: Option<NextHourDetails>,
}

#[derive(Debug, Deserialize)]
struct Summary {
    symbol_code: String,
}

#[derive(Debug, Deserialize)]
struct NextHourDetails {
    #[serde(default)]
    precipitation_amount: Option<f64>,
}

/// Whole degrees Fahrenheit, rounded down
#[allow(clippy::cast_possible_truncation)] // air temperatures are far inside i32
pub fn fahrenheit(celsius: f64) -> i32 {
    (celsius * 1.8 + 32.0).floor() as i32
}

/// Reduce a forecast to the first time step
fn report_from(forecast: Forecast) -> Result<WeatherReport, WeatherError> {
    let step = forecast
        .properties
        .timeseries
        .into_iter()
        .next()
        .ok_or(WeatherError::EmptyForecast)?;

    let next_hour = step.data.next_1_hours;
    let precipitation = next_hour
        .as_ref()
        .and_then(|n| n.details.as_ref())
        .and_then(|d| d.precipitation_amount)
        .unwrap_or(0.0);
    let symbol = next_hour
        .as_ref()
        .and_then(|n| n.summary.as_ref())
        .map_or("unknown", |s| s.symbol_code.as_str());

    Ok(WeatherReport {
        temperature: Some(fahrenheit(step.data.instant.details.air_temperature)),
        precipitation: Some(precipitation),
        conditions: conditions::label(symbol).to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<WeatherReport, WeatherError> {
        report_from(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn fahrenheit_rounds_down() {
        assert_eq!(fahrenheit(0.0), 32);
        assert_eq!(fahrenheit(21.3), 70); // 70.34
        assert_eq!(fahrenheit(-0.5), 31); // 31.1
        assert_eq!(fahrenheit(-20.0), -4);
    }

    #[test]
    fn reads_first_time_step() {
        let report = parse(
            r#"{
                "type": "Feature",
                "properties": {
                    "meta": {"updated_at": "2025-08-18T10:00:00Z"},
                    "timeseries": [
                        {
                            "time": "2025-08-18T14:00:00Z",
                            "data": {
                                "instant": {"details": {"air_temperature": 25.0, "wind_speed": 3.1}},
                                "next_1_hours": {
                                    "summary": {"symbol_code": "lightrain_day"},
                                    "details": {"precipitation_amount": 0.6}
                                }
                            }
                        },
                        {
                            "time": "2025-08-18T15:00:00Z",
                            "data": {"instant": {"details": {"air_temperature": 30.0}}}
                        }
                    ]
                }
            }"#,
        )
        .unwrap();

        assert_eq!(report.temperature, Some(77));
        assert_eq!(report.precipitation, Some(0.6));
        assert_eq!(report.conditions, "Light rain");
    }

    #[test]
    fn missing_next_hour_defaults() {
        let report = parse(
            r#"{"properties": {"timeseries": [
                {"data": {"instant": {"details": {"air_temperature": 10.0}}}}
            ]}}"#,
        )
        .unwrap();

        assert_eq!(report.temperature, Some(50));
        assert_eq!(report.precipitation, Some(0.0));
        assert_eq!(report.conditions, "unknown");
    }

    #[test]
    fn empty_timeseries_is_an_error() {
        let result = parse(r#"{"properties": {"timeseries": []}}"#);
        assert!(matches!(result, Err(WeatherError::EmptyForecast)));
    }
}
