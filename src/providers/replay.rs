//! Replay provider for capture files

use tokio::time::{Duration, Interval, interval};
use tracing::{debug, trace};

use crate::capture::CsvCaptureReader;
use crate::provider::ByteProvider;
use crate::types::ByteEvent;
use crate::Result;

/// Replay provider that feeds bytes from a recorded capture.
///
/// By default bytes are delivered as fast as the consumer pulls them,
/// which is what offline analysis wants. Pacing can be enabled to replay
/// at the capture's own byte rate (scaled by a speed multiplier) for
/// live-view consumers.
pub struct ReplayProvider {
    /// Capture reader
    reader: CsvCaptureReader,

    /// Byte pacing interval; None delivers unpaced
    interval: Option<Interval>,

    /// Native byte rate from the capture
    byte_rate: f64,
}

impl ReplayProvider {
    /// Create an unpaced replay provider from an opened capture.
    pub fn new(reader: CsvCaptureReader) -> Self {
        let byte_rate = reader.byte_rate();
        debug!("Replaying {} bytes at {:.0} bytes/s (unpaced)", reader.total_bytes(), byte_rate);
        Self { reader, interval: None, byte_rate }
    }

    /// Enable pacing at the capture's own rate times `speed`.
    ///
    /// Speed is clamped to a sane range; pacing stays off for captures
    /// whose rate is unknown (empty or single-byte exports).
    pub fn set_speed(&mut self, speed: f64) {
        let speed = speed.clamp(0.1, 10.0);
        if self.byte_rate > 0.0 {
            let byte_interval = Duration::from_secs_f64(1.0 / (self.byte_rate * speed));
            self.interval = Some(interval(byte_interval));
            debug!("Replay pacing set to {}x ({:?} per byte)", speed, byte_interval);
        }
    }

    /// Deliver as fast as the consumer pulls.
    pub fn set_unpaced(&mut self) {
        self.interval = None;
    }

    /// Current playback position in capture seconds.
    pub fn current_time(&self) -> f64 {
        if self.byte_rate > 0.0 { self.reader.position() as f64 / self.byte_rate } else { 0.0 }
    }

    /// Total capture duration in seconds.
    pub fn duration(&self) -> f64 {
        self.reader.duration()
    }
}

#[async_trait::async_trait]
impl ByteProvider for ReplayProvider {
    async fn next_byte(&mut self) -> Result<Option<ByteEvent>> {
        if let Some(interval) = self.interval.as_mut() {
            interval.tick().await;
        }

        let event = self.reader.read_next();
        if let Some(event) = &event {
            trace!("byte {:#04x} at {:.6}s", event.value, event.start_time);
        } else {
            debug!("Reached end of capture after {} bytes", self.reader.position());
        }

        Ok(event)
    }

    fn byte_rate(&self) -> f64 {
        self.byte_rate
    }
}
