//! RHSP wire layout and header field extraction
//!
//! Every packet on the bus follows one fixed layout:
//!
//! ```text
//! offset 0      0x44                first sync byte
//! offset 1      0x4B                second sync byte
//! offset 2..4   u16 LE              total packet length, preamble included
//! offset 4      destination address
//! offset 5      source address
//! offset 6      message number
//! offset 7      reference number    0 = command, else originating message
//! offset 8..10  u16 LE              command/type identifier
//! offset 10..   payload
//! last byte     trailer             checksum, not validated here
//! ```

/// First sync byte ("D")
pub const SYNC_FIRST: u8 = 0x44;
/// Second sync byte ("K")
pub const SYNC_SECOND: u8 = 0x4B;

/// Offset of the little-endian length field
pub const LENGTH_OFFSET: usize = 2;
/// Offset of the message number
pub const MESSAGE_NUMBER_OFFSET: usize = 6;
/// Offset of the reference number
pub const REFERENCE_NUMBER_OFFSET: usize = 7;
/// Offset of the little-endian type identifier
pub const TYPE_ID_OFFSET: usize = 8;
/// Offset of the first payload byte
pub const PAYLOAD_OFFSET: usize = 10;

/// Smallest declared length whose header fields are all in range.
pub const MIN_CLASSIFIABLE_LENGTH: usize = PAYLOAD_OFFSET;

/// Header fields sliced out of a completed packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketFields<'a> {
    pub message_number: u8,
    pub reference_number: u8,
    pub type_id: u16,
    pub payload: &'a [u8],
}

impl<'a> PacketFields<'a> {
    /// Extract header fields from a completed packet.
    ///
    /// Extraction is best-effort: packets declared shorter than
    /// [`MIN_CLASSIFIABLE_LENGTH`] yield zeroed fields and an empty
    /// payload rather than failing the stream.
    pub fn extract(bytes: &'a [u8]) -> Self {
        let message_number = bytes.get(MESSAGE_NUMBER_OFFSET).copied().unwrap_or(0);
        let reference_number = bytes.get(REFERENCE_NUMBER_OFFSET).copied().unwrap_or(0);
        let type_id = u16::from_le_bytes([
            bytes.get(TYPE_ID_OFFSET).copied().unwrap_or(0),
            bytes.get(TYPE_ID_OFFSET + 1).copied().unwrap_or(0),
        ]);

        // The trailer byte is excluded; it is never part of the payload.
        let payload_end = bytes.len().saturating_sub(1);
        let payload =
            if payload_end > PAYLOAD_OFFSET { &bytes[PAYLOAD_OFFSET..payload_end] } else { &[] };

        Self { message_number, reference_number, type_id, payload }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn extracts_header_fields_from_well_formed_packet() {
        // KeepAlive command: declared length 11, empty payload
        let bytes = [0x44, 0x4B, 0x0B, 0x00, 0x02, 0x01, 0x07, 0x00, 0x04, 0x7F, 0x1C];
        let fields = PacketFields::extract(&bytes);

        assert_eq!(fields.message_number, 0x07);
        assert_eq!(fields.reference_number, 0x00);
        assert_eq!(fields.type_id, 0x7F04);
        assert!(fields.payload.is_empty());
    }

    #[test]
    fn payload_excludes_the_trailer_byte() {
        let bytes =
            [0x44, 0x4B, 0x0E, 0x00, 0x02, 0x01, 0x11, 0x00, 0x28, 0x10, 0xAA, 0xBB, 0xCC, 0x99];
        let fields = PacketFields::extract(&bytes);

        assert_eq!(fields.type_id, 0x1028);
        assert_eq!(fields.payload, &[0xAA, 0xBB, 0xCC]);
    }

    #[test]
    fn under_length_packet_yields_zeroed_fields() {
        let bytes = [0x44, 0x4B, 0x05, 0x00, 0x02];
        let fields = PacketFields::extract(&bytes);

        assert_eq!(fields.message_number, 0);
        assert_eq!(fields.reference_number, 0);
        assert_eq!(fields.type_id, 0);
        assert!(fields.payload.is_empty());
    }

    #[test]
    fn header_only_packet_has_empty_payload() {
        // Length exactly 10: type id in range, nothing after it but no trailer slot
        let bytes = [0x44, 0x4B, 0x0A, 0x00, 0x02, 0x01, 0x03, 0x00, 0x01, 0x7F];
        let fields = PacketFields::extract(&bytes);

        assert_eq!(fields.type_id, 0x7F01);
        assert!(fields.payload.is_empty());
    }

    proptest! {
        #[test]
        fn prop_extraction_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
            let fields = PacketFields::extract(&bytes);
            prop_assert!(fields.payload.len() <= bytes.len());
        }

        #[test]
        fn prop_payload_length_tracks_declared_length(extra in 0usize..32) {
            // A packet of total length 11 + extra carries `extra` payload bytes
            let mut bytes = vec![0x44, 0x4B, 0, 0, 0x02, 0x01, 0x01, 0x00, 0x00, 0x60];
            bytes.extend(std::iter::repeat_n(0x55, extra));
            bytes.push(0x00);
            let total = bytes.len() as u16;
            bytes[LENGTH_OFFSET..LENGTH_OFFSET + 2].copy_from_slice(&total.to_le_bytes());

            let fields = PacketFields::extract(&bytes);
            prop_assert_eq!(fields.payload.len(), extra);
        }
    }
}
