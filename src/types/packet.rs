//! Decoded packet records

use serde::Serialize;

use super::PacketCategory;

/// Sub-fields of an I2C-family command payload.
///
/// Each field is optional because records are emitted best-effort: a
/// truncated payload yields a record with whatever sub-fields were in
/// range. The address is stored as a plain integer; hex formatting is a
/// presentation concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct I2cTransaction {
    /// I2C bus index on the hub
    pub bus: Option<u8>,
    /// Target device address
    pub address: Option<u8>,
    /// Target register, for the register-addressed variants
    pub register: Option<u8>,
    /// Number of data bytes transferred, excluding the register byte
    pub length: Option<u16>,
}

/// One fully-framed, classified RHSP packet.
///
/// This is the single output unit of the decoder: immutable, emitted once
/// per completed packet, spanning the capture interval from the sync byte
/// to the final trailer byte. The decoder retains no reference to it after
/// emission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedPacket {
    /// Capture time of the start of the sync byte, in seconds
    pub start_time: f64,

    /// Capture time of the end of the last packet byte, in seconds
    pub end_time: f64,

    /// Sender-assigned identifier correlating a command with its response
    pub message_number: u8,

    /// Zero for commands; the originating message number for responses
    pub reference_number: u8,

    /// 16-bit command/response type identifier
    pub type_id: u16,

    /// Coarse classification of the packet
    pub category: PacketCategory,

    /// Resolved command name; "Command"/"Response" when unresolved
    pub type_name: &'static str,

    /// I2C sub-fields, present only for the I2C command family
    pub i2c: Option<I2cTransaction>,

    /// NACK error code, present only for NACK responses
    pub nack_code: Option<u8>,
}

impl DecodedPacket {
    /// Duration of the packet on the bus, in seconds.
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// Returns true if this packet is a response correlated to an earlier
    /// command.
    pub fn is_response(&self) -> bool {
        self.reference_number != 0
    }
}
