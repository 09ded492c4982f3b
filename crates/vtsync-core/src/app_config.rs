/// Which Shopify Admin API surface the sync talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncApi {
    /// Three-step GraphQL flow: skeleton, variant, media.
    #[default]
    GraphQl,
    /// Single-call REST flow keyed by product handle.
    Rest,
}

impl std::fmt::Display for SyncApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncApi::GraphQl => write!(f, "graphql"),
            SyncApi::Rest => write!(f, "rest"),
        }
    }
}

impl std::str::FromStr for SyncApi {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "graphql" | "gql" => Ok(SyncApi::GraphQl),
            "rest" => Ok(SyncApi::Rest),
            other => Err(format!("unknown sync api '{other}'; expected 'graphql' or 'rest'")),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub shopify_store: Option<String>,
    pub shopify_access_token: Option<String>,
    pub shopify_location_id: Option<String>,
    pub shopify_api_version: String,
    pub sync_api: SyncApi,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub request_delay_ms: u64,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub approved_brands_only: bool,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("shopify_store", &self.shopify_store)
            .field(
                "shopify_access_token",
                &self.shopify_access_token.as_ref().map(|_| "[redacted]"),
            )
            .field("shopify_location_id", &self.shopify_location_id)
            .field("shopify_api_version", &self.shopify_api_version)
            .field("sync_api", &self.sync_api)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("request_delay_ms", &self.request_delay_ms)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("approved_brands_only", &self.approved_brands_only)
            .finish()
    }
}
