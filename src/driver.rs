//! Driver spawns and manages the decode task

use std::sync::Arc;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace};

use crate::decoder::RhspDecoder;
use crate::provider::ByteProvider;
use crate::types::DecodedPacket;

/// Buffered packets per subscriber before a slow consumer starts lagging.
const CHANNEL_CAPACITY: usize = 1024;

/// Result of spawning the decode task
pub struct DriverChannels {
    /// Receiver for decoded packets; resubscribe for additional consumers
    pub packets: broadcast::Receiver<Arc<DecodedPacket>>,
    /// Cancellation token for graceful shutdown
    pub cancel: CancellationToken,
}

/// Driver spawns and manages the decode task
///
/// The task owns both the byte provider and the decoder; packets fan out
/// on a broadcast channel so every subscriber sees every packet. When the
/// provider ends, the task exits and drops the sender, which terminates
/// all subscriber streams.
pub struct Driver;

impl Driver {
    /// Spawn the decode task for the given provider and decoder
    ///
    /// Returns a packet receiver plus a cancellation token for graceful
    /// shutdown.
    pub fn spawn<P>(provider: P, decoder: RhspDecoder) -> DriverChannels
    where
        P: ByteProvider,
    {
        let (packet_tx, packet_rx) = broadcast::channel(CHANNEL_CAPACITY);
        let cancel = CancellationToken::new();
        let cancel_task = cancel.clone();

        tokio::spawn(async move {
            Self::decode_task(provider, decoder, packet_tx, cancel_task).await;
        });

        DriverChannels { packets: packet_rx, cancel }
    }

    /// Decode task - pulls bytes, feeds the decoder, publishes packets
    async fn decode_task<P>(
        mut provider: P,
        mut decoder: RhspDecoder,
        packet_tx: broadcast::Sender<Arc<DecodedPacket>>,
        cancel: CancellationToken,
    ) where
        P: ByteProvider,
    {
        info!("Decode task started");
        let mut byte_count = 0u64;
        let mut error_count = 0u32;
        const MAX_ERRORS: u32 = 10;

        loop {
            // Use select to allow cancellation during provider.next_byte()
            let result = tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Decode task cancelled");
                    break;
                }
                result = provider.next_byte() => result,
            };

            match result {
                Ok(Some(event)) => {
                    byte_count += 1;
                    error_count = 0; // Reset error count on success

                    if let Some(packet) = decoder.consume_byte(event) {
                        // A send error only means no subscriber is
                        // currently attached; decoding continues
                        if packet_tx.send(Arc::new(packet)).is_err() {
                            trace!("no subscribers for packet");
                        }
                    }
                }
                Ok(None) => {
                    info!(
                        "Capture ended: {} bytes, {} packets",
                        byte_count,
                        decoder.packets_emitted()
                    );
                    break;
                }
                Err(e) => {
                    // Provider error - don't crash on transient failures
                    error_count += 1;
                    error!("Provider error ({}/{}): {}", error_count, MAX_ERRORS, e);

                    if error_count >= MAX_ERRORS {
                        error!("Too many provider errors, shutting down");
                        break;
                    }

                    // Exponential backoff: 50ms, 100ms, 200ms, ...
                    let backoff = std::time::Duration::from_millis(50 * (1 << error_count.min(5)));
                    tokio::time::sleep(backoff).await;
                }
            }
        }

        if decoder.in_progress() {
            debug!("Capture ended mid-packet; partial bytes discarded");
        }
        info!("Decode task ended (processed {} bytes)", byte_count);
    }
}
