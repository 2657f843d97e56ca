//! Source adapter abstractions and implementations.
//!
//! This module contains:
//! - The `SourceAdapter` trait that both adapters implement
//! - The `HttpTransport` seam the adapters fetch through
//! - Concrete adapters for the central bank (rates) and the exchange (quotes)
//!
//! # Failure policy
//!
//! Adapters never return errors. Each one fetches a single document per
//! `fetch_all`, parses it defensively, and on failure logs and degrades:
//! - `CbrRateAdapter` serves its last good batch (or nothing)
//! - `MoexQuoteAdapter` serves nothing
//!
//! No retries happen here; retrying belongs to the caller.

mod traits;
mod transport;

pub mod cbr;
pub mod moex;

#[cfg(test)]
pub(crate) mod mock;

// Re-exports
pub use traits::SourceAdapter;
pub use transport::{FetchRequest, FetchResponse, HttpTransport, ReqwestTransport};
