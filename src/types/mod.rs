//! Core types for RHSP capture decoding.
//!
//! This module provides the foundational data structures flowing through the
//! decoder:
//! - [`ByteEvent`] is the input unit: one bus byte with capture timestamps
//! - [`DecodedPacket`] is the output unit: one framed, classified packet
//! - [`PacketCategory`] partitions packets for downstream rendering
//! - [`I2cTransaction`] carries the sub-fields of I2C-family commands
//! - [`UpdateRate`] controls delivery frequency on packet streams
//!
//! ## Usage Example
//!
//! ```rust
//! use hubtrace::{ByteEvent, DecoderConfig, RhspDecoder};
//!
//! let mut decoder = RhspDecoder::new(DecoderConfig::new(0x1000));
//!
//! // A KeepAlive command, fed one byte at a time
//! let bytes = [0x44, 0x4B, 0x0B, 0x00, 0x02, 0x01, 0x07, 0x00, 0x04, 0x7F, 0x1C];
//! let mut emitted = None;
//! for (i, b) in bytes.iter().enumerate() {
//!     let t = i as f64 * 1e-5;
//!     emitted = decoder.consume_byte(ByteEvent::new(*b, t, t + 1e-5));
//! }
//!
//! let packet = emitted.expect("packet completes on its final byte");
//! assert_eq!(packet.type_name, "KeepAlive");
//! ```

mod byte_event;
mod category;
mod packet;
mod update_rate;

// Re-export all public types
pub use byte_event::ByteEvent;
pub use category::PacketCategory;
pub use packet::{DecodedPacket, I2cTransaction};
pub use update_rate::UpdateRate;
