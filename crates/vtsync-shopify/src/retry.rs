//! Retry with exponential back-off and jitter for Admin API calls.

use std::future::Future;
use std::time::Duration;

use crate::error::ShopifyError;

const MAX_DELAY_MS: u64 = 60_000;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// Retriable: HTTP 429, GraphQL `THROTTLED`, timeouts, connection failures
/// and 5xx responses. Everything else (user errors, 4xx, malformed bodies)
/// fails immediately.
pub(crate) fn is_retriable(err: &ShopifyError) -> bool {
    match err {
        ShopifyError::RateLimited { .. } | ShopifyError::Throttled => true,
        ShopifyError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        ShopifyError::UnexpectedStatus { status, .. } => *status >= 500,
        ShopifyError::Deserialize { .. }
        | ShopifyError::GraphQl(_)
        | ShopifyError::UserErrors { .. }
        | ShopifyError::MissingField { .. }
        | ShopifyError::PaginationLimit { .. }
        | ShopifyError::InvalidBaseUrl { .. } => false,
    }
}

/// Delay before retry number `attempt` (1-based): `base × 2^(attempt-1)`
/// with ±25 % jitter, never shorter than a server-provided `Retry-After`,
/// capped at 60 s.
fn backoff_delay_ms(attempt: u32, backoff_base_ms: u64, err: &ShopifyError) -> u64 {
    let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let jittered =
        (computed.min(MAX_DELAY_MS) as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
    let floor = match err {
        ShopifyError::RateLimited { retry_after_secs } => retry_after_secs.saturating_mul(1000),
        _ => 0,
    };
    jittered.max(floor).min(MAX_DELAY_MS)
}

/// Runs `operation` with up to `max_retries` additional attempts on transient
/// errors. The last error is returned once retries are exhausted.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, ShopifyError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ShopifyError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let delay_ms = backoff_delay_ms(attempt, backoff_base_ms, &err);
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "transient Shopify error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
