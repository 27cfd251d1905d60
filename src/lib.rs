//! Type-safe Rust library for decoding REV Hub Serial Protocol bus captures.
//!
//! Hubtrace reconstructs and classifies RHSP packets from byte-at-a-time
//! bus traces, such as serial or I2C captures exported by a logic
//! analyzer.
//!
//! # Features
//!
//! - **Push-driven core**: feed bytes one at a time, get one decoded
//!   packet per framed packet, no internal buffering beyond the packet in
//!   flight
//! - **Full command classification**: the fixed system command range plus
//!   the configurable interface-relative range, including I2C sub-field
//!   and NACK code extraction
//! - **Capture replay**: stream decoded packets out of recorded CSV
//!   exports with optional native-speed pacing
//! - **Noise tolerant**: framing mismatches are filtered silently, the
//!   way a bus analyzer has to
//!
//! # Quick Start
//!
//! ## Streaming a capture file
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use hubtrace::{Hubtrace, UpdateRate};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let connection = Hubtrace::open("capture.csv").await?;
//!     let mut packets = connection.subscribe(UpdateRate::Native);
//!
//!     while let Some(packet) = packets.next().await {
//!         println!(
//!             "{:.6}s {} ({}) msg={}",
//!             packet.start_time, packet.type_name, packet.category, packet.message_number
//!         );
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Driving the decoder directly
//!
//! ```rust
//! use hubtrace::{ByteEvent, DecoderConfig, RhspDecoder};
//!
//! let mut decoder = RhspDecoder::new(DecoderConfig::new(0x1000));
//! let bytes = [0x44u8, 0x4B, 0x0B, 0x00, 0x02, 0x01, 0x2A, 0x00, 0x04, 0x7F, 0x00];
//!
//! for (i, value) in bytes.iter().enumerate() {
//!     let start = i as f64 * 1e-5;
//!     if let Some(packet) = decoder.consume_byte(ByteEvent::new(*value, start, start + 1e-5)) {
//!         assert_eq!(packet.type_name, "KeepAlive");
//!     }
//! }
//! ```

// Core decode pipeline
pub mod commands;
mod config;
pub mod decoder;
mod error;
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod types;

// Capture replay architecture
pub mod capture;
pub mod connection;
pub mod driver;
pub mod provider;
pub mod providers;
pub mod stream;

// Core exports
pub use config::{DEFAULT_INTERFACE_FIRST_ID, DecoderConfig};
pub use decoder::RhspDecoder;
pub use error::*;
pub use types::*;

// Capture replay exports
pub use capture::CsvCaptureReader;
pub use commands::{Classification, CommandTable};
pub use connection::CaptureConnection;
pub use provider::ByteProvider;
pub use providers::ReplayProvider;

/// Unified entry point for capture connections.
///
/// # Example
///
/// ```rust,no_run
/// use hubtrace::{DecoderConfig, Hubtrace};
///
/// #[tokio::main]
/// async fn main() -> hubtrace::Result<()> {
///     // Default DEKA interface base
///     let _connection = Hubtrace::open("capture.csv").await?;
///
///     // Or with the base the hub reported in its QueryInterface response
///     let connection = Hubtrace::open_with_config(
///         "capture.csv",
///         DecoderConfig::new(0x2000),
///     )
///     .await?;
///     # drop(connection);
///     Ok(())
/// }
/// ```
pub struct Hubtrace;

impl Hubtrace {
    /// Open a capture export for decoding with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist, is not readable, or
    /// is not a valid capture export.
    pub async fn open<P: AsRef<std::path::Path>>(path: P) -> Result<CaptureConnection> {
        CaptureConnection::open(path).await
    }

    /// Open a capture export with an explicit decoder configuration.
    pub async fn open_with_config<P: AsRef<std::path::Path>>(
        path: P,
        config: DecoderConfig,
    ) -> Result<CaptureConnection> {
        CaptureConnection::open_with_config(path, config).await
    }
}
