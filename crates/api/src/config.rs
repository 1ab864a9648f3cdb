use craftbook_core::admin::DEFAULT_ADMIN_CONFIRM_CODE;
use craftbook_core::cleanup::PermanentTieBreak;
use craftbook_core::enrichment::DEFAULT_CONCURRENCY;
use craftbook_wowhead::cache::DEFAULT_XREF_TTL_SECS;
use craftbook_wowhead::WowheadConfig;

/// Default lifetime of a non-permanent character: 7 days.
pub const DEFAULT_CHARACTER_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
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
    /// Graceful shutdown timeout in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Store URL; `memory://` selects the in-process store.
    pub redis_url: String,
    /// Lifetime of characters created without the `permanent` flag.
    pub character_ttl_secs: u64,
    /// Token required by destructive admin operations.
    pub admin_confirm_code: String,
    /// Records resolved concurrently per enrichment batch.
    pub enrich_concurrency: usize,
    /// Survivor rule between two permanent duplicates.
    pub cleanup_tie_break: PermanentTieBreak,
    /// Lifetime of cached cross-references.
    pub xref_cache_ttl_secs: u64,
    /// Wowhead client settings.
    pub wowhead: WowheadConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default                    |
    /// |-------------------------------|----------------------------|
    /// | `HOST`                        | `0.0.0.0`                  |
    /// | `PORT`                        | `3000`                     |
    /// | `CORS_ORIGINS`                | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`        | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`       | `30`                       |
    /// | `REDIS_URL`                   | `redis://127.0.0.1:6379`   |
    /// | `CHARACTER_TTL_SECS`          | `604800`                   |
    /// | `ADMIN_CONFIRM_CODE`          | `SUPPRIMER`                |
    /// | `ENRICH_CONCURRENCY`          | `8`                        |
    /// | `CLEANUP_PERMANENT_TIE_BREAK` | `latest`                   |
    /// | `XREF_CACHE_TTL_SECS`         | `2592000`                  |
    ///
    /// Wowhead settings are read by [`WowheadConfig::from_env`].
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

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let redis_url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".into());

        let character_ttl_secs: u64 = std::env::var("CHARACTER_TTL_SECS")
            .map(|v| v.parse().expect("CHARACTER_TTL_SECS must be a valid u64"))
            .unwrap_or(DEFAULT_CHARACTER_TTL_SECS);

        let admin_confirm_code = std::env::var("ADMIN_CONFIRM_CODE")
            .ok()
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_ADMIN_CONFIRM_CODE.into());

        let enrich_concurrency: usize = std::env::var("ENRICH_CONCURRENCY")
            .map(|v| v.parse().expect("ENRICH_CONCURRENCY must be a valid usize"))
            .unwrap_or(DEFAULT_CONCURRENCY);

        let cleanup_tie_break: PermanentTieBreak = std::env::var("CLEANUP_PERMANENT_TIE_BREAK")
            .map(|v| {
                v.parse()
                    .unwrap_or_else(|e| panic!("CLEANUP_PERMANENT_TIE_BREAK: {e}"))
            })
            .unwrap_or_default();

        let xref_cache_ttl_secs: u64 = std::env::var("XREF_CACHE_TTL_SECS")
            .map(|v| v.parse().expect("XREF_CACHE_TTL_SECS must be a valid u64"))
            .unwrap_or(DEFAULT_XREF_TTL_SECS);

        let wowhead = WowheadConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            redis_url,
            character_ttl_secs,
            admin_confirm_code,
            enrich_concurrency,
            cleanup_tie_break,
            xref_cache_ttl_secs,
            wowhead,
        }
    }
}
