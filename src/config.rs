use std::env;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_CURRENT_URL: &str = "https://servicebus2.caixa.gov.br/portaldeloterias/api/megasena";
pub const DEFAULT_HISTORY_URL: &str =
    "https://servicebus2.caixa.gov.br/portaldeloterias/api/resultados/download?modalidade=Mega-Sena";

/// Where to fetch from, how long to wait, and how long a fetched result stays fresh.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    pub url: String,
    pub timeout: Duration,
    pub ttl: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub current_draw: Endpoint,
    pub history: Endpoint,
}

pub fn load() -> Result<Config, ConfigError> {
    from_lookup(|key| env::var(key).ok())
}

pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let seconds = |var: &str, default: u64| -> Result<Duration, ConfigError> {
        match lookup(var) {
            None => Ok(Duration::from_secs(default)),
            Some(value) => value
                .trim()
                .parse()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidNumber {
                    var: var.to_string(),
                    value,
                }),
        }
    };

    Ok(Config {
        current_draw: Endpoint {
            url: lookup("MEGASENA_CURRENT_URL").unwrap_or_else(|| DEFAULT_CURRENT_URL.to_string()),
            timeout: seconds("MEGASENA_CURRENT_TIMEOUT_SECS", 10)?,
            ttl: seconds("MEGASENA_CURRENT_TTL_SECS", 600)?,
        },
        history: Endpoint {
            url: lookup("MEGASENA_HISTORY_URL").unwrap_or_else(|| DEFAULT_HISTORY_URL.to_string()),
            timeout: seconds("MEGASENA_HISTORY_TIMEOUT_SECS", 30)?,
            ttl: seconds("MEGASENA_HISTORY_TTL_SECS", 3600)?,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_without_environment() {
        let config = from_lookup(|_| None).unwrap();
        assert_eq!(config.current_draw.url, DEFAULT_CURRENT_URL);
        assert_eq!(config.current_draw.timeout, Duration::from_secs(10));
        assert_eq!(config.current_draw.ttl, Duration::from_secs(600));
        assert_eq!(config.history.timeout, Duration::from_secs(30));
        assert_eq!(config.history.ttl, Duration::from_secs(3600));
    }

    #[test]
    fn overrides_are_applied() {
        let vars: HashMap<&str, &str> = [
            ("MEGASENA_HISTORY_URL", "http://localhost:8080/history.xlsx"),
            ("MEGASENA_HISTORY_TIMEOUT_SECS", " 20 "),
        ]
        .into_iter()
        .collect();
        let config = from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap();
        assert_eq!(config.history.url, "http://localhost:8080/history.xlsx");
        assert_eq!(config.history.timeout, Duration::from_secs(20));
    }

    #[test]
    fn bad_numbers_are_errors() {
        let err = from_lookup(|key| {
            (key == "MEGASENA_CURRENT_TTL_SECS").then(|| "ten minutes".to_string())
        })
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidNumber {
                var: "MEGASENA_CURRENT_TTL_SECS".into(),
                value: "ten minutes".into(),
            }
        );
    }
}
