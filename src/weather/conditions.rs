//! met.no symbol code labels
//!
//! Symbol codes carry an optional `_day`, `_night` or `_polartwilight`
//! suffix; the label depends only on the base code.

const UNKNOWN: &str = "unknown";

const LABELS: &[(&str, &str)] = &[
    ("clearsky", "Clear sky"),
    ("fair", "Fair"),
    ("partlycloudy", "Partly cloudy"),
    ("cloudy", "Cloudy"),
    ("fog", "Fog"),
    ("lightrain", "Light rain"),
    ("rain", "Rain"),
    ("heavyrain", "Heavy rain"),
    ("lightrainshowers", "Light rain showers"),
    ("rainshowers", "Rain showers"),
    ("heavyrainshowers", "Heavy rain showers"),
    ("lightrainandthunder", "Light rain and thunder"),
    ("rainandthunder", "Rain and thunder"),
    ("heavyrainandthunder", "Heavy rain and thunder"),
    ("lightrainshowersandthunder", "Light rain showers and thunder"),
    ("rainshowersandthunder", "Rain showers and thunder"),
    ("heavyrainshowersandthunder", "Heavy rain showers and thunder"),
    ("lightsleet", "Light sleet"),
    ("sleet", "Sleet"),
    ("heavysleet", "Heavy sleet"),
    ("lightsleetshowers", "Light sleet showers"),
    ("sleetshowers", "Sleet showers"),
    ("heavysleetshowers", "Heavy sleet showers"),
    ("lightsleetandthunder", "Light sleet and thunder"),
    ("sleetandthunder", "Sleet and thunder"),
    ("heavysleetandthunder", "Heavy sleet and thunder"),
    ("lightssleetshowersandthunder", "Light sleet showers and thunder"),
    ("sleetshowersandthunder", "Sleet showers and thunder"),
    ("heavysleetshowersandthunder", "Heavy sleet showers and thunder"),
    ("lightsnow", "Light snow"),
    ("snow", "Snow"),
    ("heavysnow", "Heavy snow"),
    ("lightsnowshowers", "Light snow showers"),
    ("snowshowers", "Snow showers"),
    ("heavysnowshowers", "Heavy snow showers"),
    ("lightsnowandthunder", "Light snow and thunder"),
    ("snowandthunder", "Snow and thunder"),
    ("heavysnowandthunder", "Heavy snow and thunder"),
    ("lightssnowshowersandthunder", "Light snow showers and thunder"),
    ("snowshowersandthunder", "Snow showers and thunder"),
    ("heavysnowshowersandthunder", "Heavy snow showers and thunder"),
];

/// Human label for a symbol code, `"unknown"` when unmapped
pub fn label(symbol_code: &str) -> &'static str {
    let base = ["_day", "_night", "_polartwilight"]
        .iter()
        .find_map(|suffix| symbol_code.strip_suffix(suffix))
        .unwrap_or(symbol_code);

    LABELS
        .iter()
        .find(|(code, _)| *code == base)
        .map_or(UNKNOWN, |(_, text)| *text)
}
