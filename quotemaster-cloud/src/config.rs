//! Cloud server configuration

use shared::period::DEFAULT_LOOKBACK_MONTHS;

use crate::db::BoxError;

const MAX_LOOKBACK_MONTHS: u32 = 36;

/// Cloud server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// HTTP port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// Pool size
    pub db_max_connections: u32,
    /// Months searched backwards for the previous approved period
    pub price_lookback_months: u32,
    /// Allowed CORS origin (`*` for any). Unset disables CORS headers.
    pub cors_allow_origin: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, BoxError> {
        let database_url = get("DATABASE_URL")
            .filter(|s| !s.is_empty())
            .ok_or("DATABASE_URL must be set")?;

        let price_lookback_months = match get("PRICE_LOOKBACK_MONTHS") {
            Some(raw) => {
                let months: u32 = raw
                    .parse()
                    .map_err(|_| format!("PRICE_LOOKBACK_MONTHS is not a number: {raw}"))?;
                if !(1..=MAX_LOOKBACK_MONTHS).contains(&months) {
                    return Err(format!(
                        "PRICE_LOOKBACK_MONTHS must be between 1 and {MAX_LOOKBACK_MONTHS}, got {months}"
                    )
                    .into());
                }
                months
            }
            None => DEFAULT_LOOKBACK_MONTHS,
        };

        Ok(Self {
            database_url,
            http_port: get("HTTP_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: get("ENVIRONMENT").unwrap_or_else(|| "development".into()),
            db_max_connections: get("DB_MAX_CONNECTIONS")
                .and_then(|n| n.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(10),
            price_lookback_months,
            cors_allow_origin: get("CORS_ALLOW_ORIGIN").filter(|s| !s.is_empty()),
        })
    }
}
