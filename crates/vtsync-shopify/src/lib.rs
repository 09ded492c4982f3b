//! Shopify Admin API client and product sync.

pub mod client;
pub mod error;
mod graphql;
pub mod index;
pub mod products;
mod rest;
mod retry;
pub mod sync;
pub mod types;

pub use client::AdminClient;
pub use error::ShopifyError;
pub use index::SkuIndex;
pub use sync::{SyncAction, SyncOptions, SyncOutcome, SyncReport, SyncStep, Syncer};
pub use types::{RestProduct, SkuEntry, UserError};
