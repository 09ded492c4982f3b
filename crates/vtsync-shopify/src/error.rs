use thiserror::Error;

use crate::types::UserError;

#[derive(Debug, Error)]
pub enum ShopifyError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by Shopify (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    /// GraphQL cost limit hit; reported as a top-level error with code `THROTTLED`.
    #[error("GraphQL query cost throttled by Shopify")]
    Throttled,

    #[error("unexpected HTTP status {status} from {url}: {body}")]
    UnexpectedStatus { status: u16, url: String, body: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("GraphQL error: {0}")]
    GraphQl(String),

    #[error("{operation} rejected: {}", format_user_errors(.errors))]
    UserErrors {
        operation: &'static str,
        errors: Vec<UserError>,
    },

    #[error("{operation} response is missing {field}")]
    MissingField {
        operation: &'static str,
        field: &'static str,
    },

    #[error("pagination limit reached: exceeded {max_pages} pages")]
    PaginationLimit { max_pages: usize },

    #[error("invalid base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl ShopifyError {
    /// `true` when the store rejected a product because its handle is already
    /// in use.
    #[must_use]
    pub fn is_handle_taken(&self) -> bool {
        match self {
            ShopifyError::UserErrors { errors, .. } => {
                errors.iter().any(UserError::is_handle_taken)
            }
            _ => false,
        }
    }
}

fn format_user_errors(errors: &[UserError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
