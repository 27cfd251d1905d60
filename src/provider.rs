//! Provider trait for byte sources

use crate::Result;
use crate::types::ByteEvent;

/// Trait for sources of timestamped bus bytes.
///
/// Providers abstract over where capture bytes come from (file replay
/// today; a live capture bridge would slot in here) and handle their own
/// timing internally. Delivery must be in stream order with no gaps; the
/// decode core depends on it.
#[async_trait::async_trait]
pub trait ByteProvider: Send + 'static {
    /// Get the next byte event
    ///
    /// Returns:
    /// - `Ok(Some(event))` - Next byte available
    /// - `Ok(None)` - Stream ended (normal termination)
    /// - `Err(e)` - Error occurred
    async fn next_byte(&mut self) -> Result<Option<ByteEvent>>;

    /// Mean byte rate of the source in bytes per second
    ///
    /// Used to normalize subscriber update rates; zero when unknown.
    fn byte_rate(&self) -> f64;
}
