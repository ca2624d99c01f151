//! Runtime configuration.
//!
//! Configuration is read from environment variables, any of which may be
//! overridden by command-line flags:
//! - `FERROBOARD_ENDPOINT` - Upstream departures page (default: the Ferrovías page)
//! - `FERROBOARD_TIMEOUT_SECS` - Upstream request timeout (default: 15)
//! - `FERROBOARD_INBOUND_KEYWORD` - Destination text marking inbound trains (default: `RETIRO`)
//! - `FERROBOARD_INBOUND_LABEL` / `FERROBOARD_OUTBOUND_LABEL` - Bucket headings
//! - `FERROBOARD_STATION` - Station a board starts on (default: Retiro)
//! - `FERROBOARD_REFRESH_SECS` - Board auto-refresh period (default: 60)
//! - `FERROBOARD_WIDGET_REFRESH_SECS` - Widget refresh period (default: 300)

use std::str::FromStr;
use std::time::Duration;

use crate::models::Station;
use crate::pipeline::DEFAULT_INBOUND_KEYWORD;

/// Upstream page listing the next trains for a station.
pub const DEFAULT_ENDPOINT: &str = "http://proximostrenes.ferrovias.com.ar/estaciones.asp";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    pub endpoint: String,
    pub timeout: Duration,
    pub inbound_keyword: String,
    pub inbound_label: String,
    pub outbound_label: String,
    pub station: Station,
    pub refresh_interval: Duration,
    pub widget_refresh_interval: Duration,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(15),
            inbound_keyword: DEFAULT_INBOUND_KEYWORD.to_string(),
            inbound_label: "Retiro".to_string(),
            outbound_label: "Villa Rosa".to_string(),
            station: Station::Retiro,
            refresh_interval: Duration::from_secs(60),
            widget_refresh_interval: Duration::from_secs(300),
        }
    }
}

impl BoardConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// Unparseable values are logged and replaced by their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            endpoint: lookup("FERROBOARD_ENDPOINT").unwrap_or(defaults.endpoint),
            timeout: secs(&lookup, "FERROBOARD_TIMEOUT_SECS").unwrap_or(defaults.timeout),
            inbound_keyword: lookup("FERROBOARD_INBOUND_KEYWORD")
                .filter(|k| !k.is_empty())
                .unwrap_or(defaults.inbound_keyword),
            inbound_label: lookup("FERROBOARD_INBOUND_LABEL").unwrap_or(defaults.inbound_label),
            outbound_label: lookup("FERROBOARD_OUTBOUND_LABEL").unwrap_or(defaults.outbound_label),
            station: parsed(&lookup, "FERROBOARD_STATION").unwrap_or(defaults.station),
            refresh_interval: secs(&lookup, "FERROBOARD_REFRESH_SECS")
                .unwrap_or(defaults.refresh_interval),
            widget_refresh_interval: secs(&lookup, "FERROBOARD_WIDGET_REFRESH_SECS")
                .unwrap_or(defaults.widget_refresh_interval),
        }
    }
}

fn parsed<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = lookup(key)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Ignoring {}={:?}: {}", key, raw, e);
            None
        }
    }
}

/// Positive whole seconds.
fn secs(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<Duration> {
    let n: u64 = parsed(lookup, key)?;
    match n {
        0 => {
            tracing::warn!("Ignoring {}=0: must be positive", key);
            None
        }
        n => Some(Duration::from_secs(n)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> BoardConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        BoardConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);
        assert_eq!(config, BoardConfig::default());
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.inbound_keyword, "RETIRO");
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("FERROBOARD_ENDPOINT", "http://localhost:9000/estaciones.asp"),
            ("FERROBOARD_TIMEOUT_SECS", "3"),
            ("FERROBOARD_STATION", "villa-adelina"),
            ("FERROBOARD_REFRESH_SECS", "30"),
        ]);
        assert_eq!(config.endpoint, "http://localhost:9000/estaciones.asp");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.station, Station::VillaAdelina);
        assert_eq!(config.refresh_interval, Duration::from_secs(30));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config(&[
            ("FERROBOARD_TIMEOUT_SECS", "soon"),
            ("FERROBOARD_STATION", "Atlantis"),
            ("FERROBOARD_REFRESH_SECS", "0"),
            ("FERROBOARD_INBOUND_KEYWORD", ""),
        ]);
        assert_eq!(config, BoardConfig::default());
    }
}
