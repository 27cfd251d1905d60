//! Timestamped byte events from a bus capture

use serde::{Deserialize, Serialize};

/// A single byte observed on the bus, tagged with its capture timestamps.
///
/// This is the fundamental input unit of the decoder. Byte events are
/// ephemeral: the decoder consumes them one at a time and retains nothing
/// beyond the bytes of the packet currently being assembled.
///
/// Timestamps are seconds from the start of the capture, the native
/// representation of logic-analyzer exports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ByteEvent {
    /// The decoded bus byte
    pub value: u8,

    /// Capture time at which the byte began, in seconds
    pub start_time: f64,

    /// Capture time at which the byte ended, in seconds
    pub end_time: f64,
}

impl ByteEvent {
    /// Create a new byte event
    pub fn new(value: u8, start_time: f64, end_time: f64) -> Self {
        Self { value, start_time, end_time }
    }
}
