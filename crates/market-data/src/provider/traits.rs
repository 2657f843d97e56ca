//! Source adapter trait definitions.
//!
//! This module defines the `SourceAdapter` trait that both upstream adapters
//! implement and the boundary layer consumes.

use std::collections::BTreeMap;

use async_trait::async_trait;

/// Trait for upstream data source adapters.
///
/// Every method is infallible by contract: transport, decode, and parse
/// failures are logged inside the adapter and turn into a degraded result
/// (cached or empty). Callers never need to handle an error from an adapter.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use findash_market_data::{CbrRateAdapter, SourceAdapter};
///
/// let adapter = Arc::new(CbrRateAdapter::new(Default::default()));
/// let rates = adapter.fetch_all().await;
/// let usd = adapter.fetch_one("usd").await;
/// ```
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Normalized record produced for each tracked key.
    type Record: Clone + Send + Sync + 'static;

    /// Unique identifier for this adapter, e.g. "CBR" or "MOEX".
    ///
    /// Used for logging and error attribution.
    fn id(&self) -> &'static str;

    /// Fetch the current batch for every tracked key.
    ///
    /// Issues exactly one upstream request. Keys are uppercase; untracked
    /// keys never appear in the result.
    async fn fetch_all(&self) -> BTreeMap<String, Self::Record>;

    /// Fetch the record for a single key.
    ///
    /// The key is uppercased before lookup. Every call performs a full
    /// [`fetch_all`](Self::fetch_all); there is no per-call short-circuit.
    /// Returns `None` when the key is not tracked or not in the latest batch.
    async fn fetch_one(&self, key: &str) -> Option<Self::Record> {
        let mut batch = self.fetch_all().await;
        batch.remove(&key.to_uppercase())
    }

    /// Keys this adapter reports on, in their configured order.
    ///
    /// Returns a fresh copy; mutating it has no effect on the adapter.
    fn list_supported_keys(&self) -> Vec<String>;
}
