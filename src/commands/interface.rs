//! Interface-relative command table
//!
//! The hub's add-on command interface lives at a runtime-assigned base id;
//! commands are identified by their offset from that base. This table
//! enumerates every implemented offset. Offsets absent from the table
//! (12–13, 25–30 PWM slots, 43–47, 50) are unimplemented on the hub and
//! classify as generic traffic.

use super::i2c::I2cLayout;

/// How a matched command is classified beyond its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Named command with no extra sub-fields
    Known,
    /// I2C-family command with per-layout payload sub-fields
    I2c(I2cLayout),
}

/// One entry of the interface-relative command table.
#[derive(Debug)]
pub struct InterfaceCommand {
    /// Offset from the configured interface base
    pub offset: u16,
    /// Resolved command name
    pub name: &'static str,
    /// Classification kind
    pub kind: CommandKind,
}

const fn known(offset: u16, name: &'static str) -> InterfaceCommand {
    InterfaceCommand { offset, name, kind: CommandKind::Known }
}

const fn i2c(offset: u16, name: &'static str, layout: I2cLayout) -> InterfaceCommand {
    InterfaceCommand { offset, name, kind: CommandKind::I2c(layout) }
}

/// Every implemented interface-relative command, in offset order.
pub static INTERFACE_COMMANDS: &[InterfaceCommand] = &[
    known(0, "GetBulkInputData"),
    known(1, "SetSingleDioOutput"),
    known(2, "SetAllDioOutputs"),
    known(3, "SetDioDirection"),
    known(4, "GetDioDirection"),
    known(5, "GetSingleDioInput"),
    known(6, "GetAllDioInputs"),
    known(7, "GetADC"),
    known(8, "SetMotorChannelMode"),
    known(9, "GetMotorChannelMode"),
    known(10, "SetMotorChannelEnable"),
    known(11, "GetMotorChannelEnable"),
    known(14, "ResetMotorEncoder"),
    known(15, "SetMotorConstantPower"),
    known(16, "GetMotorConstantPower"),
    known(17, "SetMotorTargetVelocity"),
    known(18, "GetMotorTargetVelocity"),
    known(19, "SetMotorTargetPosition"),
    known(20, "GetMotorTargetPosition"),
    known(21, "IsMotorAtTarget"),
    known(22, "GetMotorEncoderPosition"),
    known(23, "SetMotorPIDControlLoopCoefficients"),
    known(24, "GetMotorPIDControlLoopCoefficients"),
    known(31, "SetServoConfiguration"),
    known(32, "GetServoConfiguration"),
    known(33, "SetServoPulseWidth"),
    known(34, "GetServoPulseWidth"),
    known(35, "SetServoEnable"),
    known(36, "GetServoEnable"),
    i2c(37, "I2cWriteSingleByte", I2cLayout::WriteSingle),
    i2c(38, "I2cWriteMultipleBytes", I2cLayout::WriteMultiple),
    i2c(39, "I2cReadSingleByte", I2cLayout::ReadSingle),
    i2c(40, "I2cReadMultipleBytes", I2cLayout::ReadMultiple),
    known(41, "I2cReadStatusQuery"),
    known(42, "I2cWriteStatusQuery"),
    known(48, "ReadVersionString"),
    known(49, "FtdiResetControl"),
    known(51, "SetMotorPIDFControlLoopCoefficients"),
    i2c(52, "I2cWriteReadMultipleBytes", I2cLayout::WriteReadMultiple),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_are_strictly_increasing() {
        for pair in INTERFACE_COMMANDS.windows(2) {
            assert!(pair[0].offset < pair[1].offset, "{} before {}", pair[0].name, pair[1].name);
        }
    }

    #[test]
    fn names_are_unique() {
        let mut names: Vec<&str> = INTERFACE_COMMANDS.iter().map(|c| c.name).collect();
        names.sort_unstable();
        let len = names.len();
        names.dedup();
        assert_eq!(names.len(), len);
    }

    #[test]
    fn i2c_family_covers_the_five_transfer_shapes() {
        let i2c_offsets: Vec<u16> = INTERFACE_COMMANDS
            .iter()
            .filter(|c| matches!(c.kind, CommandKind::I2c(_)))
            .map(|c| c.offset)
            .collect();
        assert_eq!(i2c_offsets, vec![37, 38, 39, 40, 52]);
    }

    #[test]
    fn unimplemented_slots_stay_unlisted() {
        for gap in [12u16, 13, 25, 26, 27, 28, 29, 30, 43, 44, 45, 46, 47, 50] {
            assert!(!INTERFACE_COMMANDS.iter().any(|c| c.offset == gap), "offset {gap} listed");
        }
    }
}
