#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Treat non-2xx responses as transport failures instead of handing the
    /// body to the extractor.
    pub strict_http_status: bool,
    /// Search-results URL template; `{offset}` is replaced with the record offset.
    pub autotrader_search_url: String,
    /// Dealer page prefix; the owner id is appended verbatim.
    pub autotrader_owner_url: String,
    /// Search-results URL template; `{page}` is replaced with the page number.
    pub cars_search_url: String,
    pub slack_webhook_url: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("strict_http_status", &self.strict_http_status)
            .field("autotrader_search_url", &self.autotrader_search_url)
            .field("autotrader_owner_url", &self.autotrader_owner_url)
            .field("cars_search_url", &self.cars_search_url)
            .field(
                "slack_webhook_url",
                &self.slack_webhook_url.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}
