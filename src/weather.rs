//! Weather lookups for the status record
//!
//! Weather is advisory. The refresher runs in the background so a slow or
//! failing upstream never delays a status read; any failure is stored as
//! the "unavailable" placeholder report.

mod conditions;
mod met;

pub use met::MetNoClient;

use crate::status::{StatusStore, WeatherReport};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("weather request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("weather API returned status {0}")]
    Status(u16),
    #[error("weather API returned no forecast")]
    EmptyForecast,
}

/// Source of current conditions at the courts
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current(&self) -> Result<WeatherReport, WeatherError>;
}

/// Fetch once and store the result, or the placeholder on failure
pub async fn refresh_once(provider: &dyn WeatherProvider, store: &StatusStore, timeout: Duration) {
    let start = std::time::Instant::now();
    let report = match tokio::time::timeout(timeout, provider.current()).await {
        Ok(Ok(report)) => {
            tracing::debug!(
                duration_ms = %start.elapsed().as_millis(),
                temperature = ?report.temperature,
                conditions = %report.conditions,
                "Weather refreshed"
            );
            report
        }
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Weather fetch failed");
            WeatherReport::unavailable()
        }
        Err(_) => {
            tracing::warn!(timeout_ms = %timeout.as_millis(), "Weather fetch timed out");
            WeatherReport::unavailable()
        }
    };
    store.set_weather(report).await;
}

/// Refresh immediately, then every `interval` until cancelled
pub fn spawn_refresher(
    provider: Arc<dyn WeatherProvider>,
    store: Arc<StatusStore>,
    interval: Duration,
    timeout: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                () = cancel.cancelled() => break,
                _ = ticker.tick() => refresh_once(provider.as_ref(), &store, timeout).await,
            }
        }
        tracing::info!("Weather refresher stopped");
    })
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Provider that replays a fixed behavior
    pub enum MockWeather {
        Report(WeatherReport),
        Fail,
        Hang,
    }

    pub struct MockWeatherProvider {
        pub behavior: Mutex<MockWeather>,
    }

    impl MockWeatherProvider {
        pub fn new(behavior: MockWeather) -> Self {
            Self {
                behavior: Mutex::new(behavior),
            }
        }
    }

    #[async_trait]
    impl WeatherProvider for MockWeatherProvider {
        async fn current(&self) -> Result<WeatherReport, WeatherError> {
            let outcome = match &*self.behavior.lock().unwrap() {
                MockWeather::Report(report) => Some(Ok(report.clone())),
                MockWeather::Fail => Some(Err(WeatherError::Status(503))),
                MockWeather::Hang => None,
            };
            match outcome {
                Some(result) => result,
                None => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Err(WeatherError::EmptyForecast)
                }
            }
        }
    }
}
