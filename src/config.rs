use anyhow::Context;
use serde::Deserialize;
use time::{macros::format_description, UtcOffset};

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

/// Knobs of the ledger core that used to be hardcoded.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Weight loss (kg) that counts as 100% goal progress when the user set none.
    pub weight_loss_goal_kg: f64,
    pub default_calorie_goal: u32,
    /// Offset used to decide which calendar day "today" is.
    #[serde(skip, default = "utc")]
    pub utc_offset: UtcOffset,
}

fn utc() -> UtcOffset {
    UtcOffset::UTC
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            weight_loss_goal_kg: 10.0,
            default_calorie_goal: 2000,
            utc_offset: UtcOffset::UTC,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub jwt: JwtConfig,
    pub cookie_secure: bool,
    pub ledger: LedgerConfig,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

pub fn parse_utc_offset(raw: &str) -> anyhow::Result<UtcOffset> {
    UtcOffset::parse(
        raw.trim(),
        format_description!("[offset_hour sign:mandatory]:[offset_minute]"),
    )
    .with_context(|| format!("invalid APP_UTC_OFFSET '{}', expected +HH:MM", raw))
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET is not set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "syncfit".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "syncfit-users".into()),
            ttl_minutes: env_or("JWT_TTL_MINUTES", 60),
            refresh_ttl_minutes: env_or("JWT_REFRESH_TTL_MINUTES", 60 * 24 * 14),
        };

        let utc_offset = match std::env::var("APP_UTC_OFFSET") {
            Ok(raw) => parse_utc_offset(&raw)?,
            Err(_) => UtcOffset::UTC,
        };
        let ledger = LedgerConfig {
            weight_loss_goal_kg: env_or("WEIGHT_LOSS_GOAL_KG", 10.0),
            default_calorie_goal: env_or("DEFAULT_CALORIE_GOAL", 2000),
            utc_offset,
        };
        anyhow::ensure!(
            ledger.weight_loss_goal_kg.is_finite() && ledger.weight_loss_goal_kg > 0.0,
            "WEIGHT_LOSS_GOAL_KG must be positive"
        );
        anyhow::ensure!(ledger.default_calorie_goal > 0, "DEFAULT_CALORIE_GOAL must be positive");

        Ok(Self {
            database_url,
            max_connections: env_or("DATABASE_MAX_CONNECTIONS", 10),
            jwt,
            cookie_secure: env_or("COOKIE_SECURE", false),
            ledger,
        })
    }
}
