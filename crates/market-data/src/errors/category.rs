/// Classification of a fetch failure.
///
/// Used by the adapters to log what went wrong before degrading.
///
/// # Behavior Summary
///
/// | Category | `CbrRateAdapter` | `MoexQuoteAdapter` |
/// |----------|------------------|--------------------|
/// | `Transport` | Last cached batch, else empty | Empty |
/// | `Decode` | Last cached batch, else empty | Empty |
/// | `Schema` | Empty, and the cache is replaced with the empty batch | Empty if a required column is missing, else row skipped |
/// | `Value` | Empty, and the cache is replaced with the empty batch | Row skipped |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorCategory {
    /// Connection failure, timeout, or a non-200 status.
    Transport,

    /// The body could not be decoded as JSON.
    Decode,

    /// A required field or column is absent.
    Schema,

    /// A field that must be numeric is not.
    Value,
}

impl ErrorCategory {
    /// Returns true when a cached batch may be served in place of this failure.
    ///
    /// Schema and value failures come from a response that was received and
    /// decoded; they invalidate the cached batch instead of falling back to it.
    pub fn allows_cache_fallback(self) -> bool {
        matches!(self, Self::Transport | Self::Decode)
    }
}
