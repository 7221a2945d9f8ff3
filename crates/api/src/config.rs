use fundra_core::policy::EnginePolicy;
use fundra_core::tier::TierSchedule;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the secrets have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (shared secret, expiry).
    pub jwt: JwtConfig,
    /// Approval routing and donor tier policy.
    pub policy: EnginePolicy,
    /// Shared secret for verifying payment gateway callback signatures.
    pub payment_webhook_secret: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                    |
    /// |--------------------------|----------------------------|
    /// | `HOST`                   | `0.0.0.0`                  |
    /// | `PORT`                   | `3000`                     |
    /// | `CORS_ORIGINS`           | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                       |
    /// | `PAYMENT_WEBHOOK_SECRET` | **required**               |
    ///
    /// JWT settings come from [`JwtConfig::from_env`], policy values from
    /// [`policy_from_env`].
    ///
    /// # Panics
    ///
    /// Panics if a required variable is missing or a value does not parse.
    /// Configuration errors should stop the process before it serves traffic.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let payment_webhook_secret = std::env::var("PAYMENT_WEBHOOK_SECRET")
            .expect("PAYMENT_WEBHOOK_SECRET must be set in the environment");
        assert!(
            !payment_webhook_secret.is_empty(),
            "PAYMENT_WEBHOOK_SECRET must not be empty"
        );

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            policy: policy_from_env(),
            payment_webhook_secret,
        }
    }
}

/// Load the engine policy from environment variables.
///
/// | Env Var              | Default  |
/// |----------------------|----------|
/// | `APPROVAL_THRESHOLD` | `50000`  |
/// | `TIER_BRONZE_AMOUNT` | `20000`  |
/// | `TIER_SILVER_AMOUNT` | `40000`  |
/// | `TIER_GOLD_AMOUNT`   | `80000`  |
/// | `TIER_BRONZE_ITEMS`  | `100`    |
/// | `TIER_SILVER_ITEMS`  | `200`    |
/// | `TIER_GOLD_ITEMS`    | `400`    |
/// | `CURRENCY`           | `IDR`    |
pub fn policy_from_env() -> EnginePolicy {
    let defaults = EnginePolicy::default();
    EnginePolicy {
        approval_threshold: env_i64("APPROVAL_THRESHOLD", defaults.approval_threshold),
        amount_tiers: TierSchedule {
            bronze: env_i64("TIER_BRONZE_AMOUNT", defaults.amount_tiers.bronze),
            silver: env_i64("TIER_SILVER_AMOUNT", defaults.amount_tiers.silver),
            gold: env_i64("TIER_GOLD_AMOUNT", defaults.amount_tiers.gold),
        },
        item_tiers: TierSchedule {
            bronze: env_i64("TIER_BRONZE_ITEMS", defaults.item_tiers.bronze),
            silver: env_i64("TIER_SILVER_ITEMS", defaults.item_tiers.silver),
            gold: env_i64("TIER_GOLD_ITEMS", defaults.item_tiers.gold),
        },
        currency: std::env::var("CURRENCY").unwrap_or(defaults.currency),
    }
}

fn env_i64(name: &str, default: i64) -> i64 {
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .unwrap_or_else(|_| panic!("{name} must be a valid integer")),
        Err(_) => default,
    }
}
