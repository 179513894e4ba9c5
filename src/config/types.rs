use serde::Deserialize;

/// CAS gateway used by the production portal
pub const DEFAULT_SSO_BASE_URL: &str = "https://login.gatech.edu/cas/";

/// Sakai login container that redeems service tickets
pub const DEFAULT_SERVICE_URL: &str = "https://t-square.gatech.edu/sakai-login-tool/container";

/// Sakai "direct" REST base used for JSON listings
pub const DEFAULT_DIRECT_URL: &str = "https://t-square.gatech.edu/direct/";

/// Main configuration structure for TSquare
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sso: SsoConfig,
    #[serde(default)]
    pub portal: PortalConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub scraper: ScraperConfig,
}

/// Single-sign-on gateway configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SsoConfig {
    /// Base URL of the CAS server (tickets live under `rest/tickets`)
    #[serde(rename = "base-url", default = "default_sso_base_url")]
    pub base_url: String,

    /// Service identifier the service ticket is minted for
    #[serde(rename = "service-url", default = "default_service_url")]
    pub service_url: String,
}

impl Default for SsoConfig {
    fn default() -> Self {
        Self {
            base_url: default_sso_base_url(),
            service_url: default_service_url(),
        }
    }
}

/// Portal endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct PortalConfig {
    /// Base of the JSON REST API (`site.json`, `user/current.json`, ...)
    #[serde(rename = "direct-url", default = "default_direct_url")]
    pub direct_url: String,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            direct_url: default_direct_url(),
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Total request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    #[serde(
        rename = "connect-timeout-secs",
        default = "default_connect_timeout_secs"
    )]
    pub connect_timeout_secs: u64,

    /// Refuse plain-http URLs
    #[serde(rename = "https-only", default = "default_https_only")]
    pub https_only: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            https_only: default_https_only(),
        }
    }
}

/// Extraction backend selection
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperConfig {
    /// Registry name of the backend; unknown names fall back to the default backend
    #[serde(default = "default_backend")]
    pub backend: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
        }
    }
}

fn default_sso_base_url() -> String {
    DEFAULT_SSO_BASE_URL.to_string()
}

fn default_service_url() -> String {
    DEFAULT_SERVICE_URL.to_string()
}

fn default_direct_url() -> String {
    DEFAULT_DIRECT_URL.to_string()
}

fn default_user_agent() -> String {
    format!("tsquare/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_https_only() -> bool {
    true
}

fn default_backend() -> String {
    "tree".to_string()
}
