use craftbook_core::identifier::{UrlDefaults, DEFAULT_EDITION, DEFAULT_HOST, DEFAULT_LOCALE};

/// Default tooltip JSON endpoint.
pub const DEFAULT_TOOLTIP_BASE: &str = "https://nether.wowhead.com/tooltip";

/// Default user agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("craftbook/", env!("CARGO_PKG_VERSION"));

/// Wowhead client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct WowheadConfig {
    /// Host / edition / locale used to canonicalize URLs.
    pub defaults: UrlDefaults,
    /// Base URL of the JSON tooltip endpoint.
    pub tooltip_base: String,
    /// Per-request timeout in seconds (default: `10`).
    pub timeout_secs: u64,
    /// Maximum redirects followed per request (default: `10`).
    pub max_redirects: usize,
    pub user_agent: String,
}

impl Default for WowheadConfig {
    fn default() -> Self {
        Self {
            defaults: UrlDefaults::default(),
            tooltip_base: DEFAULT_TOOLTIP_BASE.to_string(),
            timeout_secs: 10,
            max_redirects: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl WowheadConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                               |
    /// |-------------------------|---------------------------------------|
    /// | `WOWHEAD_HOST`          | `www.wowhead.com`                     |
    /// | `WOWHEAD_EDITION`       | `classic`                             |
    /// | `WOWHEAD_LOCALE`        | `fr`                                  |
    /// | `WOWHEAD_TOOLTIP_BASE`  | `https://nether.wowhead.com/tooltip`  |
    /// | `WOWHEAD_TIMEOUT_SECS`  | `10`                                  |
    /// | `WOWHEAD_MAX_REDIRECTS` | `10`                                  |
    /// | `WOWHEAD_USER_AGENT`    | `craftbook/<version>`                 |
    pub fn from_env() -> Self {
        let defaults = UrlDefaults {
            host: std::env::var("WOWHEAD_HOST").unwrap_or_else(|_| DEFAULT_HOST.into()),
            edition: std::env::var("WOWHEAD_EDITION").unwrap_or_else(|_| DEFAULT_EDITION.into()),
            locale: std::env::var("WOWHEAD_LOCALE").unwrap_or_else(|_| DEFAULT_LOCALE.into()),
        };

        let tooltip_base = std::env::var("WOWHEAD_TOOLTIP_BASE")
            .unwrap_or_else(|_| DEFAULT_TOOLTIP_BASE.into())
            .trim_end_matches('/')
            .to_string();

        let timeout_secs: u64 = std::env::var("WOWHEAD_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("WOWHEAD_TIMEOUT_SECS must be a valid u64");

        let max_redirects: usize = std::env::var("WOWHEAD_MAX_REDIRECTS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("WOWHEAD_MAX_REDIRECTS must be a valid usize");

        let user_agent =
            std::env::var("WOWHEAD_USER_AGENT").unwrap_or_else(|_| DEFAULT_USER_AGENT.into());

        Self {
            defaults,
            tooltip_base,
            timeout_secs,
            max_redirects,
            user_agent,
        }
    }
}
