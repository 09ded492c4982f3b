use crate::app_config::{AppConfig, SyncApi};
use crate::ConfigError;

const DEFAULT_API_VERSION: &str = "2025-07";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Shopify credentials are optional here; commands that talk to Shopify
/// validate them through [`ShopifyConfig::from_app_config`].
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        optional(var).unwrap_or_else(|| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_bool = |var: &str, default: bool| -> Result<bool, ConfigError> {
        match optional(var) {
            None => Ok(default),
            Some(raw) => parse_flag(&raw).ok_or_else(|| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("expected a boolean, got '{raw}'"),
            }),
        }
    };

    let sync_api = or_default("SHOPIFY_SYNC_API", "graphql")
        .parse::<SyncApi>()
        .map_err(|reason| ConfigError::InvalidEnvVar {
            var: "SHOPIFY_SYNC_API".to_string(),
            reason,
        })?;

    Ok(AppConfig {
        shopify_store: optional("SHOPIFY_STORE"),
        shopify_access_token: optional("SHOPIFY_ACCESS_TOKEN"),
        shopify_location_id: optional("SHOPIFY_LOCATION_ID"),
        shopify_api_version: or_default("SHOPIFY_API_VERSION", DEFAULT_API_VERSION),
        sync_api,
        log_level: or_default("VTSYNC_LOG_LEVEL", "info"),
        request_timeout_secs: parse_u64("VTSYNC_REQUEST_TIMEOUT_SECS", "30")?,
        user_agent: or_default("VTSYNC_USER_AGENT", "vtsync/0.1 (catalog-sync)"),
        request_delay_ms: parse_u64("VTSYNC_REQUEST_DELAY_MS", "500")?,
        max_retries: parse_u32("VTSYNC_MAX_RETRIES", "3")?,
        retry_backoff_base_ms: parse_u64("VTSYNC_RETRY_BACKOFF_BASE_MS", "1000")?,
        approved_brands_only: parse_bool("VTSYNC_APPROVED_BRANDS_ONLY", false)?,
    })
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Everything the Shopify client needs, with credentials guaranteed present.
#[derive(Clone)]
pub struct ShopifyConfig {
    /// Store origin including scheme, e.g. `https://acme.myshopify.com`.
    pub store_url: String,
    pub access_token: String,
    /// Location as a GraphQL global id (`gid://shopify/Location/123`).
    pub location_id: Option<String>,
    pub api_version: String,
    pub sync_api: SyncApi,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub request_delay_ms: u64,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
}

impl ShopifyConfig {
    /// Extract and validate the Shopify section of the app config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when the store or token is not
    /// set, and [`ConfigError::InvalidEnvVar`] for a malformed location id.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, ConfigError> {
        let store = config
            .shopify_store
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("SHOPIFY_STORE".to_string()))?;
        let access_token = config
            .shopify_access_token
            .clone()
            .ok_or_else(|| ConfigError::MissingEnvVar("SHOPIFY_ACCESS_TOKEN".to_string()))?;

        let location_id = config
            .shopify_location_id
            .as_deref()
            .map(normalize_location_id)
            .transpose()?;

        Ok(Self {
            store_url: normalize_store_url(store),
            access_token,
            location_id,
            api_version: config.shopify_api_version.clone(),
            sync_api: config.sync_api,
            request_timeout_secs: config.request_timeout_secs,
            user_agent: config.user_agent.clone(),
            request_delay_ms: config.request_delay_ms,
            max_retries: config.max_retries,
            retry_backoff_base_ms: config.retry_backoff_base_ms,
        })
    }
}

impl std::fmt::Debug for ShopifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyConfig")
            .field("store_url", &self.store_url)
            .field("access_token", &"[redacted]")
            .field("location_id", &self.location_id)
            .field("api_version", &self.api_version)
            .field("sync_api", &self.sync_api)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("request_delay_ms", &self.request_delay_ms)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .finish()
    }
}

/// `acme.myshopify.com`, `https://acme.myshopify.com/` and
/// `http://localhost:1234` all become a scheme-qualified origin without a
/// trailing slash.
fn normalize_store_url(store: &str) -> String {
    let trimmed = store.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

fn normalize_location_id(raw: &str) -> Result<String, ConfigError> {
    let raw = raw.trim();
    if raw.starts_with("gid://shopify/Location/") {
        return Ok(raw.to_string());
    }
    if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(format!("gid://shopify/Location/{raw}"));
    }
    Err(ConfigError::InvalidEnvVar {
        var: "SHOPIFY_LOCATION_ID".to_string(),
        reason: format!("expected a numeric id or gid://shopify/Location/<id>, got '{raw}'"),
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
