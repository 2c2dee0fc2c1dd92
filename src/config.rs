//! Process configuration loaded from the environment
//!
//! A `.env` file in the working directory is honored before the process
//! environment is read. Missing variables fall back to defaults; malformed
//! values are startup errors.

use crate::status::Hours;
use chrono_tz::Tz;
use std::collections::HashSet;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_PORT: u16 = 5001;
const DEFAULT_TIMEZONE: Tz = chrono_tz::America::New_York;
const DEFAULT_LAT: f64 = 40.7128;
const DEFAULT_LON: f64 = -74.0060;
const DEFAULT_OPEN_HOUR: u8 = 6;
const DEFAULT_CLOSE_HOUR: u8 = 20;
const DEFAULT_WEATHER_TIMEOUT_SECS: u64 = 5;
const DEFAULT_WEATHER_REFRESH_SECS: u64 = 300;
const DEFAULT_USER_AGENT: &str = concat!(
    "court-status/",
    env!("CARGO_PKG_VERSION"),
    " github.com/court-status"
);

/// Placeholder token shipped in sample `.env` files
const PLACEHOLDER_TOKENS: &[&str] = &["YOUR_BOT_TOKEN_HERE", "your_bot_token_here"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} has an invalid value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(var: &'static str, value: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            var,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Static allow-list of chat user ids
///
/// An empty list admits everyone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList(HashSet<i64>);

impl AllowList {
    pub fn new(ids: impl IntoIterator<Item = i64>) -> Self {
        Self(ids.into_iter().collect())
    }

    pub fn permits(&self, user_id: i64) -> bool {
        self.0.is_empty() || self.0.contains(&user_id)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl FromStr for AllowList {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<i64>()
                    .map_err(|_| format!("{part:?} is not a numeric user id"))
            })
            .collect::<Result<HashSet<_>, _>>()
            .map(Self)
    }
}

/// Weather lookup settings
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    pub lat: f64,
    pub lon: f64,
    pub timeout: Duration,
    pub refresh_interval: Duration,
    pub user_agent: String,
}

/// Full service configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// `None` disables the chat bot
    pub bot_token: Option<String>,
    pub authorized_users: AllowList,
    pub timezone: Tz,
    pub default_hours: Hours,
    pub weather: WeatherConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host: IpAddr = parse_or("COURT_HOST", &lookup, IpAddr::V4(Ipv4Addr::UNSPECIFIED))?;
        let port: u16 = parse_or("COURT_PORT", &lookup, DEFAULT_PORT)?;

        let bot_token = lookup("TELEGRAM_BOT_TOKEN")
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty() && !PLACEHOLDER_TOKENS.contains(&t.as_str()));

        let authorized_users = match lookup("AUTHORIZED_USERS") {
            Some(raw) => raw
                .parse::<AllowList>()
                .map_err(|reason| ConfigError::invalid("AUTHORIZED_USERS", &raw, reason))?,
            None => AllowList::default(),
        };

        let timezone = match lookup("COURT_TIMEZONE") {
            Some(raw) => raw
                .trim()
                .parse::<Tz>()
                .map_err(|e| ConfigError::invalid("COURT_TIMEZONE", &raw, e.to_string()))?,
            None => DEFAULT_TIMEZONE,
        };

        let open: u8 = parse_or("DEFAULT_OPEN_HOUR", &lookup, DEFAULT_OPEN_HOUR)?;
        let close: u8 = parse_or("DEFAULT_CLOSE_HOUR", &lookup, DEFAULT_CLOSE_HOUR)?;
        let default_hours = Hours::new(open, close).map_err(|e| {
            ConfigError::invalid("DEFAULT_OPEN_HOUR", &format!("{open}-{close}"), e.to_string())
        })?;

        let weather = WeatherConfig {
            lat: parse_or("WEATHER_LAT", &lookup, DEFAULT_LAT)?,
            lon: parse_or("WEATHER_LON", &lookup, DEFAULT_LON)?,
            timeout: Duration::from_secs(parse_or(
                "WEATHER_TIMEOUT_SECS",
                &lookup,
                DEFAULT_WEATHER_TIMEOUT_SECS,
            )?),
            refresh_interval: Duration::from_secs(
                parse_or("WEATHER_REFRESH_SECS", &lookup, DEFAULT_WEATHER_REFRESH_SECS)?.max(1),
            ),
            user_agent: lookup("WEATHER_USER_AGENT")
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        };

        Ok(Self {
            bind_addr: SocketAddr::new(host, port),
            bot_token,
            authorized_users,
            timezone,
            default_hours,
            weather,
        })
    }
}

fn parse_or<T>(
    var: &'static str,
    lookup: &impl Fn(&str) -> Option<String>,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::invalid(var, &raw, e.to_string())),
        None => Ok(default),
    }
}
