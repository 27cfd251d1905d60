//! Framing state machine
//!
//! Converts an unbounded byte stream into packet boundaries using the
//! two-byte sync preamble and the little-endian length field. All mutable
//! decoder state lives here, in the single pending-packet accumulator, and
//! is cleared atomically on emission or on any framing failure.
//!
//! Progress through a packet is keyed purely by how many bytes have been
//! buffered: one byte means the sync marker is unconfirmed, three means the
//! low length byte has arrived, four fixes the declared length, and from
//! there every append is followed by a completion check. A `0x44` arriving
//! mid-packet is ordinary payload; the machine never resynchronizes inside
//! a packet.

use tracing::trace;

use super::fields::{LENGTH_OFFSET, SYNC_FIRST, SYNC_SECOND};
use crate::types::ByteEvent;

/// A fully-framed packet handed to field extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedFrame {
    /// All packet bytes, preamble through trailer
    pub bytes: Vec<u8>,
    /// Capture time of the start of the sync byte
    pub start_time: f64,
    /// Capture time of the end of the completing byte
    pub end_time: f64,
}

/// Accumulator for the packet currently being assembled.
#[derive(Debug)]
struct PendingPacket {
    bytes: Vec<u8>,
    start_time: f64,
    length_low: Option<u8>,
    declared_length: Option<u16>,
}

/// Byte-at-a-time packet framer.
#[derive(Debug, Default)]
pub struct Framer {
    pending: Option<PendingPacket>,
}

impl Framer {
    pub fn new() -> Self {
        Self { pending: None }
    }

    /// True while a partial packet is buffered.
    pub fn in_progress(&self) -> bool {
        self.pending.is_some()
    }

    /// Consume one byte, returning a frame when it completes a packet.
    ///
    /// Framing failures (a bad second sync byte, a declared length shorter
    /// than the preamble) silently discard the pending bytes and return the
    /// machine to idle; they are expected noise on a live bus, not errors.
    pub fn push(&mut self, byte: ByteEvent) -> Option<CompletedFrame> {
        let Some(pending) = self.pending.as_mut() else {
            if byte.value == SYNC_FIRST {
                self.pending = Some(PendingPacket {
                    bytes: vec![byte.value],
                    start_time: byte.start_time,
                    length_low: None,
                    declared_length: None,
                });
            } else {
                trace!("discarding {:#04x} while idle", byte.value);
            }
            return None;
        };

        pending.bytes.push(byte.value);

        match pending.bytes.len() {
            2 => {
                if byte.value != SYNC_SECOND {
                    trace!("sync mismatch, second byte {:#04x}", byte.value);
                    self.pending = None;
                }
                None
            }
            3 => {
                pending.length_low = Some(byte.value);
                None
            }
            4 => {
                let low = pending.length_low.take().expect("length low byte buffered");
                let declared = u16::from_le_bytes([low, byte.value]);

                if (declared as usize) < pending.bytes.len() {
                    trace!("declared length {} shorter than preamble, resetting", declared);
                    self.pending = None;
                    return None;
                }

                pending.declared_length = Some(declared);
                self.try_complete(byte.end_time)
            }
            len => {
                debug_assert!(len > LENGTH_OFFSET + 2);
                self.try_complete(byte.end_time)
            }
        }
    }

    /// Emit the pending packet if it has reached its declared length.
    ///
    /// Called after every append once the length is known, so the buffer
    /// can never exceed the declared length.
    fn try_complete(&mut self, end_time: f64) -> Option<CompletedFrame> {
        let pending = self.pending.as_ref()?;
        let declared = pending.declared_length? as usize;

        if pending.bytes.len() < declared {
            return None;
        }

        let pending = self.pending.take().expect("pending packet checked above");
        Some(CompletedFrame { bytes: pending.bytes, start_time: pending.start_time, end_time })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(bytes: &[u8]) -> Vec<ByteEvent> {
        bytes
            .iter()
            .enumerate()
            .map(|(i, b)| ByteEvent::new(*b, i as f64 * 1e-5, (i + 1) as f64 * 1e-5))
            .collect()
    }

    fn push_all(framer: &mut Framer, bytes: &[u8]) -> Vec<CompletedFrame> {
        events(bytes).into_iter().filter_map(|e| framer.push(e)).collect()
    }

    #[test]
    fn idle_bytes_are_discarded_until_sync() {
        let mut framer = Framer::new();
        let frames = push_all(&mut framer, &[0x00, 0xFF, 0x4B, 0x12]);
        assert!(frames.is_empty());
        assert!(!framer.in_progress());
    }

    #[test]
    fn false_sync_resets_and_allows_a_fresh_start() {
        let mut framer = Framer::new();

        assert!(framer.push(ByteEvent::new(0x44, 0.0, 0.1)).is_none());
        assert!(framer.in_progress());

        // Second byte is not the marker: the one-byte prefix is discarded
        assert!(framer.push(ByteEvent::new(0x00, 0.1, 0.2)).is_none());
        assert!(!framer.in_progress());

        // The next 0x44 starts a fresh packet
        assert!(framer.push(ByteEvent::new(0x44, 0.2, 0.3)).is_none());
        assert!(framer.in_progress());
    }

    #[test]
    fn completes_exactly_at_declared_length() {
        let mut framer = Framer::new();
        let packet = [0x44, 0x4B, 0x0B, 0x00, 0x02, 0x01, 0x07, 0x00, 0x04, 0x7F, 0x1C];

        let frames = push_all(&mut framer, &packet);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].bytes, packet);
        assert!(!framer.in_progress());
    }

    #[test]
    fn frame_spans_sync_byte_to_completing_byte() {
        let mut framer = Framer::new();
        let packet = [0x44, 0x4B, 0x0B, 0x00, 0x02, 0x01, 0x07, 0x00, 0x04, 0x7F, 0x1C];

        let frame = events(&packet).into_iter().find_map(|e| framer.push(e)).unwrap();
        assert_eq!(frame.start_time, 0.0);
        assert_eq!(frame.end_time, 11.0 * 1e-5);
    }

    #[test]
    fn leading_noise_does_not_shift_the_start_time() {
        let mut framer = Framer::new();
        let mut stream = vec![0xAA, 0x55];
        stream.extend([0x44, 0x4B, 0x0B, 0x00, 0x02, 0x01, 0x07, 0x00, 0x04, 0x7F, 0x1C]);

        let frame = events(&stream).into_iter().find_map(|e| framer.push(e)).unwrap();
        // Sync byte was the third event
        assert_eq!(frame.start_time, 2.0 * 1e-5);
    }

    #[test]
    fn mid_packet_sync_byte_is_ordinary_payload() {
        let mut framer = Framer::new();
        let packet = [0x44, 0x4B, 0x0C, 0x00, 0x02, 0x01, 0x07, 0x00, 0x04, 0x7F, 0x44, 0x1C];

        let frames = push_all(&mut framer, &packet);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].bytes[10], 0x44);
    }

    #[test]
    fn declared_length_below_preamble_is_a_framing_failure() {
        let mut framer = Framer::new();
        let frames = push_all(&mut framer, &[0x44, 0x4B, 0x03, 0x00]);
        assert!(frames.is_empty());
        assert!(!framer.in_progress());

        // The machine recovers on the next sync byte
        let packet = [0x44, 0x4B, 0x0B, 0x00, 0x02, 0x01, 0x07, 0x00, 0x04, 0x7F, 0x1C];
        let frames = push_all(&mut framer, &packet);
        assert_eq!(frames.len(), 1);
    }

    #[test]
    fn declared_length_of_exactly_four_completes_immediately() {
        let mut framer = Framer::new();
        let frames = push_all(&mut framer, &[0x44, 0x4B, 0x04, 0x00]);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].bytes, vec![0x44, 0x4B, 0x04, 0x00]);
        assert!(!framer.in_progress());
    }

    #[test]
    fn back_to_back_packets_frame_independently() {
        let mut framer = Framer::new();
        let packet = [0x44, 0x4B, 0x0B, 0x00, 0x02, 0x01, 0x07, 0x00, 0x04, 0x7F, 0x1C];
        let mut stream = packet.to_vec();
        stream.extend(packet);

        let frames = push_all(&mut framer, &stream);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].bytes, frames[1].bytes);
        // Second frame's span starts where the second packet's sync byte sat
        assert_eq!(frames[1].start_time, 11.0 * 1e-5);
    }
}
