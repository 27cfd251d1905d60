//! Test utilities for synthesizing packets and captures
//!
//! Shared by unit tests and the throughput benchmark. Integration tests
//! build their own captures from the public API.

#![cfg(any(test, feature = "benchmark"))]

use crate::types::ByteEvent;

/// Nominal byte time on a 1 Mbaud bus, in seconds.
pub const BYTE_TIME: f64 = 1e-5;

/// Build a well-formed packet with the given header fields and payload.
///
/// The length field is computed from the payload; destination and source
/// addresses are fixed placeholders and the trailer is zero (the decoder
/// does not validate it).
pub fn build_packet(
    message_number: u8,
    reference_number: u8,
    type_id: u16,
    payload: &[u8],
) -> Vec<u8> {
    let total = 11 + payload.len();
    let mut bytes = Vec::with_capacity(total);

    bytes.extend([0x44, 0x4B]);
    bytes.extend((total as u16).to_le_bytes());
    bytes.push(0x02); // destination
    bytes.push(0x01); // source
    bytes.push(message_number);
    bytes.push(reference_number);
    bytes.extend(type_id.to_le_bytes());
    bytes.extend_from_slice(payload);
    bytes.push(0x00); // trailer

    bytes
}

/// Wrap raw bytes in consecutive byte events starting at `start_time`.
pub fn byte_events(bytes: &[u8], start_time: f64) -> Vec<ByteEvent> {
    bytes
        .iter()
        .enumerate()
        .map(|(i, b)| {
            let start = start_time + i as f64 * BYTE_TIME;
            ByteEvent::new(*b, start, start + BYTE_TIME)
        })
        .collect()
}

/// Render byte events as a logic-analyzer CSV export.
pub fn csv_capture(events: &[ByteEvent]) -> String {
    let mut out = String::from("Time [s],Value\n");
    for event in events {
        out.push_str(&format!("{:.9},{:#04x}\n", event.start_time, event.value));
    }
    out
}
