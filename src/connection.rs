//! Capture connection wiring the replay pipeline together

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::{Stream, StreamExt};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::capture::CsvCaptureReader;
use crate::config::DecoderConfig;
use crate::decoder::RhspDecoder;
use crate::driver::Driver;
use crate::providers::ReplayProvider;
use crate::stream::ThrottleExt;
use crate::types::{DecodedPacket, UpdateRate};
use crate::Result;

/// Connection to a recorded bus capture.
///
/// Opening a connection spawns the decode task immediately; decoded
/// packets buffer on a broadcast channel until consumed.
pub struct CaptureConnection {
    /// Receiver attached before the decode task started; the first
    /// subscriber takes it and sees the capture from the beginning
    primary: Mutex<Option<broadcast::Receiver<Arc<DecodedPacket>>>>,

    /// Template receiver for attaching later subscribers at the live tail
    live: broadcast::Receiver<Arc<DecodedPacket>>,

    /// Mean byte rate of the capture
    byte_rate: f64,

    /// Capture duration in seconds
    duration: f64,

    /// Total bytes in the capture
    total_bytes: usize,

    /// Cancellation token for stopping the decode task
    cancel: CancellationToken,
}

impl CaptureConnection {
    /// Open a capture export with the default decoder configuration.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_config(path, DecoderConfig::default()).await
    }

    /// Open a capture export with an explicit decoder configuration.
    pub async fn open_with_config<P: AsRef<Path>>(path: P, config: DecoderConfig) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening capture: {}", path.display());

        let reader = CsvCaptureReader::open(path)?;
        let byte_rate = reader.byte_rate();
        let duration = reader.duration();
        let total_bytes = reader.total_bytes();

        let provider = ReplayProvider::new(reader);
        let decoder = RhspDecoder::new(config);
        let channels = Driver::spawn(provider, decoder);
        let live = channels.packets.resubscribe();

        info!("Capture connection opened ({} bytes, {:.3}s)", total_bytes, duration);

        Ok(Self {
            primary: Mutex::new(Some(channels.packets)),
            live,
            byte_rate,
            duration,
            total_bytes,
            cancel: channels.cancel,
        })
    }

    /// Subscribe to decoded packets.
    ///
    /// The first subscription takes the receiver that was attached before
    /// decoding began and therefore sees every packet of the capture (up
    /// to the channel capacity). Later subscriptions attach at the live
    /// position. `UpdateRate::Max` applies latest-wins throttling for
    /// display consumers; the capture's byte rate serves as the upper
    /// bound on packet rate when normalizing.
    pub fn subscribe(&self, rate: UpdateRate) -> impl Stream<Item = Arc<DecodedPacket>> + 'static {
        let receiver = self
            .primary
            .lock()
            .expect("primary receiver mutex")
            .take()
            .unwrap_or_else(|| self.live.resubscribe());

        let packets = BroadcastStream::new(receiver).filter_map(|result| async move {
            match result {
                Ok(packet) => Some(packet),
                Err(BroadcastStreamRecvError::Lagged(missed)) => {
                    warn!("subscriber lagged, {} packets missed", missed);
                    None
                }
            }
        });

        match rate.normalize(self.byte_rate) {
            UpdateRate::Native => packets.boxed(),
            UpdateRate::Max(hz) => {
                let interval = Duration::from_secs_f64(1.0 / hz as f64);
                packets.throttle(interval).boxed()
            }
        }
    }

    /// Mean byte rate of the capture in bytes per second.
    pub fn byte_rate(&self) -> f64 {
        self.byte_rate
    }

    /// Capture duration in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Total number of bytes in the capture.
    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }
}

impl Drop for CaptureConnection {
    fn drop(&mut self) {
        debug!("Dropping capture connection");
        // Cancel the decode task on drop for clean shutdown
        self.cancel.cancel();
    }
}
