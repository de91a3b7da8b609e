use std::env;
use std::fmt;

use crate::sponsorship::allocation::GrantPolicy;
use crate::sponsorship::scoring::MatchPolicy;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for an embedding application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub matching: MatchPolicy,
    pub grants: GrantPolicy,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );
        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let defaults = MatchPolicy::default();
        let affinity_country = alpha_code(
            "SPONSOR_AFFINITY_COUNTRY",
            &defaults.affinity_country,
            2,
            ConfigError::InvalidAffinityCountry,
        )?;
        let candidate_limit = positive_number(
            "SPONSOR_CANDIDATE_LIMIT",
            defaults.candidate_limit,
            ConfigError::InvalidCandidateLimit,
        )?;
        let request_ttl_hours = positive_number(
            "SPONSOR_REQUEST_TTL_HOURS",
            defaults.request_ttl_hours,
            ConfigError::InvalidRequestTtl,
        )?;

        let grant_defaults = GrantPolicy::default();
        let amount_minor = positive_number(
            "SPONSOR_GRANT_AMOUNT",
            grant_defaults.amount_minor,
            ConfigError::InvalidGrantAmount,
        )?;
        let currency = alpha_code(
            "SPONSOR_GRANT_CURRENCY",
            &grant_defaults.currency,
            3,
            ConfigError::InvalidGrantCurrency,
        )?;
        let duration_months = positive_number(
            "SPONSOR_GRANT_MONTHS",
            grant_defaults.duration_months,
            ConfigError::InvalidGrantDuration,
        )?;

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            matching: MatchPolicy {
                affinity_country,
                candidate_limit,
                request_ttl_hours,
            },
            grants: GrantPolicy {
                amount_minor,
                currency,
                duration_months,
            },
        })
    }
}

fn alpha_code(
    var: &str,
    default: &str,
    len: usize,
    err: fn(String) -> ConfigError,
) -> Result<String, ConfigError> {
    let value = env::var(var).unwrap_or_else(|_| default.to_string());
    let value = value.trim().to_ascii_uppercase();
    if value.len() != len || !value.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(err(value));
    }
    Ok(value)
}

fn positive_number<T: TryFrom<u64>>(
    var: &str,
    default: T,
    err: fn(String) -> ConfigError,
) -> Result<T, ConfigError> {
    let value = match env::var(var) {
        Ok(raw) => raw,
        Err(_) => return Ok(default),
    };
    // Reject out-of-range values instead of truncating them into the target.
    match value.trim().parse::<u64>() {
        Ok(parsed) if parsed > 0 => T::try_from(parsed).map_err(|_| err(value)),
        _ => Err(err(value)),
    }
}

/// Tracing controls for the embedding application.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidAffinityCountry(String),
    InvalidCandidateLimit(String),
    InvalidRequestTtl(String),
    InvalidGrantAmount(String),
    InvalidGrantCurrency(String),
    InvalidGrantDuration(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidAffinityCountry(value) => write!(
                f,
                "SPONSOR_AFFINITY_COUNTRY must be an ISO-3166 alpha-2 code, got '{value}'"
            ),
            ConfigError::InvalidCandidateLimit(value) => {
                write!(f, "SPONSOR_CANDIDATE_LIMIT must be a positive integer, got '{value}'")
            }
            ConfigError::InvalidRequestTtl(value) => {
                write!(f, "SPONSOR_REQUEST_TTL_HOURS must be a positive integer, got '{value}'")
            }
            ConfigError::InvalidGrantAmount(value) => {
                write!(f, "SPONSOR_GRANT_AMOUNT must be a positive integer, got '{value}'")
            }
            ConfigError::InvalidGrantCurrency(value) => {
                write!(f, "SPONSOR_GRANT_CURRENCY must be a three-letter code, got '{value}'")
            }
            ConfigError::InvalidGrantDuration(value) => {
                write!(f, "SPONSOR_GRANT_MONTHS must be a positive integer, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for var in [
            "APP_ENV",
            "APP_LOG_LEVEL",
            "SPONSOR_AFFINITY_COUNTRY",
            "SPONSOR_CANDIDATE_LIMIT",
            "SPONSOR_REQUEST_TTL_HOURS",
            "SPONSOR_GRANT_AMOUNT",
            "SPONSOR_GRANT_CURRENCY",
            "SPONSOR_GRANT_MONTHS",
        ] {
            env::remove_var(var);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.matching, MatchPolicy::default());
        assert_eq!(config.grants, GrantPolicy::default());
    }

    #[test]
    fn affinity_country_is_normalized() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SPONSOR_AFFINITY_COUNTRY", " ca ");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.matching.affinity_country, "CA");
    }

    #[test]
    fn rejects_malformed_candidate_limit() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SPONSOR_CANDIDATE_LIMIT", "0");
        match AppConfig::load() {
            Err(ConfigError::InvalidCandidateLimit(value)) => assert_eq!(value, "0"),
            other => panic!("expected invalid candidate limit, got {other:?}"),
        }
    }

    #[test]
    fn rejects_grant_amount_exceeding_u32() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SPONSOR_GRANT_AMOUNT", "4294967296");
        match AppConfig::load() {
            Err(ConfigError::InvalidGrantAmount(value)) => assert_eq!(value, "4294967296"),
            other => panic!("expected invalid grant amount, got {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_affinity_country() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SPONSOR_AFFINITY_COUNTRY", "CAN");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidAffinityCountry(_))
        ));
    }
}
