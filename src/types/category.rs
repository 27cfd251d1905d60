//! Packet category classification

use serde::{Deserialize, Serialize};

/// Coarse classification of a decoded RHSP packet.
///
/// Categories partition packets by how much the classifier could resolve:
/// packets whose type id matches the fixed system table or the
/// interface-relative table are "known", packets carrying I2C transactions
/// or NACK codes get their own categories so renderers can surface the
/// extra sub-fields, and everything else falls back to a generic
/// command/response split keyed on the reference number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PacketCategory {
    /// A command whose type id matched no table
    GenericCommand,
    /// A command with a resolved name
    KnownCommand,
    /// A response whose type id matched no table
    GenericResponse,
    /// A response with a resolved name
    KnownResponse,
    /// An I2C command carrying bus/address/register/length sub-fields
    I2cCommand,
    /// A NACK response carrying an error code
    Nack,
}

impl PacketCategory {
    /// Stable frame-type identifier for downstream renderers.
    ///
    /// These labels are part of the output contract; display templates
    /// key on them.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PacketCategory::GenericCommand => "rhsp_generic_cmd",
            PacketCategory::KnownCommand => "rhsp_known_cmd",
            PacketCategory::GenericResponse => "rhsp_generic_resp",
            PacketCategory::KnownResponse => "rhsp_known_resp",
            PacketCategory::I2cCommand => "rhsp_i2c_cmd",
            PacketCategory::Nack => "rhsp_nack",
        }
    }

    /// Returns true for the response-side categories.
    pub const fn is_response(&self) -> bool {
        matches!(
            self,
            PacketCategory::GenericResponse | PacketCategory::KnownResponse | PacketCategory::Nack
        )
    }
}

impl std::fmt::Display for PacketCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
