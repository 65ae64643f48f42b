use std::env;
use std::time::Duration;

use crate::services::retry::RetryPolicy;

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub store: StoreBackend,
    pub db: DbConfig,
    pub redis: RedisConfig,
    pub jwt: JwtConfig,
    pub rate_limit: RateLimitConfig,
    pub retry: RetryPolicy,
    pub connectivity: ConnectivityConfig,
    pub geocoder: GeocoderConfig,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Clone, Debug)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
    pub pool_min: u32,
    pub pool_max: u32,
}

#[derive(Clone, Debug)]
pub struct RedisConfig {
    pub enabled: bool,
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
    pub db: u8,
    pub key_prefix: String,
    pub games_ttl_secs: u64,
}

#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    pub access_expiry_secs: i64,
    pub refresh_expiry_secs: i64,
    pub bcrypt_cost: u32,
}

#[derive(Clone, Debug)]
pub struct RateLimitConfig {
    pub window_secs: u64,
    pub max_requests: u32,
    pub topup_max: u32,
}

#[derive(Clone, Debug)]
pub struct ConnectivityConfig {
    pub poll_interval: Duration,
    pub ping_timeout: Duration,
}

#[derive(Clone, Debug)]
pub struct GeocoderConfig {
    /// Base URL of a Nominatim-compatible service; unset disables geocoding.
    pub url: Option<String>,
    pub timeout: Duration,
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_or_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: env_or_parse("PORT", 3000),
            cors_origins: env_or("CORS_ORIGINS", "*")
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            store: match env_or("STORE_BACKEND", "postgres").to_lowercase().as_str() {
                "memory" => StoreBackend::Memory,
                _ => StoreBackend::Postgres,
            },
            db: DbConfig {
                host: env_or("DB_HOST", "localhost"),
                port: env_or_parse("DB_PORT", 5432),
                database: env_or("DB_NAME", "game_store"),
                user: env_or("DB_USER", "game_store"),
                password: env_or("DB_PASSWORD", ""),
                pool_min: env_or_parse("DB_POOL_MIN", 2),
                pool_max: env_or_parse("DB_POOL_MAX", 20),
            },
            redis: RedisConfig {
                enabled: env_or_parse("REDIS_ENABLED", false),
                host: env_or("REDIS_HOST", "localhost"),
                port: env_or_parse("REDIS_PORT", 6379),
                password: env::var("REDIS_PASSWORD").ok().filter(|s| !s.is_empty()),
                db: env_or_parse("REDIS_DB", 0),
                key_prefix: "store:".to_string(),
                games_ttl_secs: env_or_parse("GAMES_CACHE_SECS", 30),
            },
            jwt: JwtConfig {
                secret: env_or("JWT_SECRET", "change-me-to-a-secure-random-string"),
                access_expiry_secs: env_duration("JWT_ACCESS_EXPIRY", Duration::from_secs(3600)).as_secs() as i64,
                refresh_expiry_secs: env_duration("JWT_REFRESH_EXPIRY", Duration::from_secs(30 * 86400)).as_secs() as i64,
                bcrypt_cost: env_or_parse("BCRYPT_COST", bcrypt::DEFAULT_COST),
            },
            rate_limit: RateLimitConfig {
                window_secs: 60,
                max_requests: env_or_parse("RATE_LIMIT_MAX", 100),
                topup_max: env_or_parse("RATE_LIMIT_TOPUP", 10),
            },
            retry: RetryPolicy {
                max_attempts: env_or_parse("RETRY_MAX_ATTEMPTS", 3),
                timeout: env_duration("RETRY_TIMEOUT", Duration::from_secs(15)),
                backoff: Duration::from_millis(env_or_parse("RETRY_BACKOFF_MS", 2000)),
            },
            connectivity: ConnectivityConfig {
                poll_interval: env_duration("CONNECTIVITY_POLL", Duration::from_secs(30))
                    .max(Duration::from_millis(100)),
                ping_timeout: env_duration("CONNECTIVITY_TIMEOUT", Duration::from_secs(5)),
            },
            geocoder: GeocoderConfig {
                url: env::var("GEOCODER_URL").ok().filter(|s| !s.is_empty()),
                timeout: Duration::from_secs(env_or_parse("GEOCODER_TIMEOUT_SECS", 5)),
            },
        }
    }

    pub fn database_url(&self) -> String {
        if let Ok(url) = env::var("DATABASE_URL") {
            return url;
        }
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.db.user, self.db.password, self.db.host, self.db.port, self.db.database
        )
    }

    pub fn redis_url(&self) -> String {
        if let Ok(url) = env::var("REDIS_URL") {
            return url;
        }
        match &self.redis.password {
            Some(pw) if !pw.is_empty() => format!(
                "redis://:{}@{}:{}/{}",
                pw, self.redis.host, self.redis.port, self.redis.db
            ),
            _ => format!(
                "redis://{}:{}/{}",
                self.redis.host, self.redis.port, self.redis.db
            ),
        }
    }
}

/// Parses `500ms`, `15s`, `5m`, `1h`, `30d` or a bare number of seconds.
fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    // "ms" must be tried before "m" and "s".
    const UNITS: [(&str, u64); 5] = [
        ("ms", 1),
        ("s", 1_000),
        ("m", 60_000),
        ("h", 3_600_000),
        ("d", 86_400_000),
    ];
    for (suffix, millis) in UNITS {
        if let Some(num) = s.strip_suffix(suffix) {
            let num: u64 = num.trim().parse().ok()?;
            return num.checked_mul(millis).map(Duration::from_millis);
        }
    }
    s.parse::<u64>().ok().map(Duration::from_secs)
}

fn env_duration(key: &str, default: Duration) -> Duration {
    match env::var(key) {
        Ok(raw) => parse_duration(&raw).unwrap_or_else(|| {
            tracing::warn!(key, value = %raw, "Invalid duration, using default");
            default
        }),
        Err(_) => default,
    }
}
