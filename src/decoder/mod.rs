//! The RHSP decode core.
//!
//! [`RhspDecoder`] is the synchronous, push-driven heart of the crate:
//! feed it one timestamped byte at a time and it returns one
//! [`DecodedPacket`] per fully-framed packet, and nothing otherwise. It
//! never fails — framing noise is filtered as normal control flow — and it
//! holds no state across emitted packets beyond the accumulator for the
//! packet currently being assembled.
//!
//! One decoder instance serves one byte stream. Decoding multiple buses
//! means one instance per bus; instances share nothing.
//!
//! A packet whose length field overstates the bytes that will ever arrive
//! simply never completes; no timeout exists, which is the right trade for
//! replayed captures where the stream just ends.

mod fields;
mod framing;

use tracing::debug;

pub use fields::{
    LENGTH_OFFSET, MESSAGE_NUMBER_OFFSET, MIN_CLASSIFIABLE_LENGTH, PAYLOAD_OFFSET, PacketFields,
    REFERENCE_NUMBER_OFFSET, SYNC_FIRST, SYNC_SECOND, TYPE_ID_OFFSET,
};
pub use framing::{CompletedFrame, Framer};

use crate::commands::CommandTable;
use crate::config::DecoderConfig;
use crate::types::{ByteEvent, DecodedPacket};

/// Push-driven RHSP packet decoder.
pub struct RhspDecoder {
    framer: Framer,
    table: CommandTable,
    packets_emitted: u64,
}

impl RhspDecoder {
    /// Create a decoder with the given configuration.
    ///
    /// The command table is built once here; per-byte processing does no
    /// allocation beyond growing the pending packet.
    pub fn new(config: DecoderConfig) -> Self {
        Self {
            framer: Framer::new(),
            table: CommandTable::new(config.interface_first_id),
            packets_emitted: 0,
        }
    }

    /// Consume the next byte of the stream.
    ///
    /// Returns a decoded packet exactly when this byte completes one.
    /// Bytes must arrive in stream order; the caller guarantees ordering
    /// and losslessness.
    pub fn consume_byte(&mut self, byte: ByteEvent) -> Option<DecodedPacket> {
        let frame = self.framer.push(byte)?;
        let fields = PacketFields::extract(&frame.bytes);
        let classification =
            self.table.classify(fields.type_id, fields.reference_number, fields.payload);

        self.packets_emitted += 1;
        debug!(
            "packet {}: {} ({:#06x}) msg={} ref={} [{:.6}s..{:.6}s]",
            self.packets_emitted,
            classification.type_name,
            fields.type_id,
            fields.message_number,
            fields.reference_number,
            frame.start_time,
            frame.end_time,
        );

        Some(DecodedPacket {
            start_time: frame.start_time,
            end_time: frame.end_time,
            message_number: fields.message_number,
            reference_number: fields.reference_number,
            type_id: fields.type_id,
            category: classification.category,
            type_name: classification.type_name,
            i2c: classification.i2c,
            nack_code: classification.nack_code,
        })
    }

    /// Number of packets emitted since construction.
    pub fn packets_emitted(&self) -> u64 {
        self.packets_emitted
    }

    /// True while a partial packet is buffered.
    pub fn in_progress(&self) -> bool {
        self.framer.in_progress()
    }
}
