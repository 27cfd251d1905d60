//! I2C sub-field decoding
//!
//! Five interface commands carry I2C transactions, and each lays its
//! payload out differently. The layouts are small enough that the variants
//! are enumerated directly; decoding is best-effort so a truncated payload
//! still yields a record with whatever sub-fields were in range.

use crate::types::I2cTransaction;

/// Payload layout of an I2C-family command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum I2cLayout {
    /// Single write: bus, address, one data byte
    WriteSingle,
    /// Register write: bus, address, count (register byte included), register
    WriteMultiple,
    /// Single read: bus, address
    ReadSingle,
    /// Plain read: bus, address, count
    ReadMultiple,
    /// Register read: bus, address, count, register
    WriteReadMultiple,
}

impl I2cLayout {
    /// Decode the sub-fields this layout defines from a command payload.
    ///
    /// The transfer length reported excludes the register byte, so
    /// `WriteMultiple` subtracts it from the on-wire count.
    pub fn decode(&self, payload: &[u8]) -> I2cTransaction {
        let bus = payload.first().copied();
        let address = payload.get(1).copied();

        match self {
            I2cLayout::WriteSingle => {
                I2cTransaction { bus, address, register: None, length: Some(0) }
            }
            I2cLayout::WriteMultiple => I2cTransaction {
                bus,
                address,
                register: payload.get(3).copied(),
                length: payload.get(2).map(|count| u16::from(count.saturating_sub(1))),
            },
            I2cLayout::ReadSingle => {
                I2cTransaction { bus, address, register: None, length: Some(1) }
            }
            I2cLayout::ReadMultiple => I2cTransaction {
                bus,
                address,
                register: None,
                length: payload.get(2).map(|count| u16::from(*count)),
            },
            I2cLayout::WriteReadMultiple => I2cTransaction {
                bus,
                address,
                register: payload.get(3).copied(),
                length: payload.get(2).map(|count| u16::from(*count)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_single_has_fixed_zero_length() {
        let transaction = I2cLayout::WriteSingle.decode(&[0x01, 0x52, 0xAA]);
        assert_eq!(transaction.bus, Some(1));
        assert_eq!(transaction.address, Some(0x52));
        assert_eq!(transaction.register, None);
        assert_eq!(transaction.length, Some(0));
    }

    #[test]
    fn write_multiple_excludes_register_byte_from_length() {
        // count 0x04 on the wire = register byte + 3 data bytes
        let transaction = I2cLayout::WriteMultiple.decode(&[0x00, 0x29, 0x04, 0x1C, 1, 2, 3]);
        assert_eq!(transaction.bus, Some(0));
        assert_eq!(transaction.address, Some(0x29));
        assert_eq!(transaction.register, Some(0x1C));
        assert_eq!(transaction.length, Some(3));
    }

    #[test]
    fn write_multiple_zero_count_saturates() {
        let transaction = I2cLayout::WriteMultiple.decode(&[0x00, 0x29, 0x00, 0x1C]);
        assert_eq!(transaction.length, Some(0));
    }

    #[test]
    fn read_single_has_fixed_unit_length() {
        let transaction = I2cLayout::ReadSingle.decode(&[0x03, 0x68]);
        assert_eq!(transaction.bus, Some(3));
        assert_eq!(transaction.address, Some(0x68));
        assert_eq!(transaction.length, Some(1));
    }

    #[test]
    fn read_multiple_takes_count_verbatim() {
        let transaction = I2cLayout::ReadMultiple.decode(&[0x02, 0x34, 0x05]);
        assert_eq!(transaction.bus, Some(2));
        assert_eq!(transaction.address, Some(0x34));
        assert_eq!(transaction.register, None);
        assert_eq!(transaction.length, Some(5));
    }

    #[test]
    fn write_read_multiple_carries_register_and_count() {
        let transaction = I2cLayout::WriteReadMultiple.decode(&[0x01, 0x48, 0x06, 0x00]);
        assert_eq!(transaction.register, Some(0x00));
        assert_eq!(transaction.length, Some(6));
    }

    #[test]
    fn truncated_payload_decodes_best_effort() {
        let transaction = I2cLayout::ReadMultiple.decode(&[0x02]);
        assert_eq!(transaction.bus, Some(2));
        assert_eq!(transaction.address, None);
        assert_eq!(transaction.length, None);

        let empty = I2cLayout::WriteReadMultiple.decode(&[]);
        assert_eq!(empty, I2cTransaction::default());
    }
}
