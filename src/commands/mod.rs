//! Command classification for framed RHSP packets.
//!
//! The 16-bit type id space is split in two: a fixed system range
//! (`0x7F01..=0x7F0F`, with gaps) shared by every hub, and an
//! interface-relative range whose base the hub assigns at runtime
//! ([`DecoderConfig::interface_first_id`](crate::DecoderConfig)). The
//! [`CommandTable`] resolves both to names and categories with O(1)
//! lookups, built once at decoder construction.
//!
//! Dispatch priority: fixed table, then interface table, then the
//! reference-number fallback. The two tables are disjoint by construction
//! as long as the configured base keeps the interface range clear of the
//! system range; a colliding base is tolerated (fixed ids win) but logged.

mod i2c;
mod interface;

use std::collections::HashMap;

use tracing::{trace, warn};

use crate::types::{I2cTransaction, PacketCategory};

pub use i2c::I2cLayout;
pub use interface::{CommandKind, INTERFACE_COMMANDS, InterfaceCommand};

/// First id of the fixed system command range.
const SYSTEM_ID_FIRST: u16 = 0x7F01;
/// Last id of the fixed system command range.
const SYSTEM_ID_LAST: u16 = 0x7F0F;

/// Fixed system commands common to every hub.
///
/// ACK and NACK are responses; everything else in the range is a command.
static SYSTEM_COMMANDS: &[(u16, &str)] = &[
    (0x7F03, "GetModuleStatus"),
    (0x7F04, "KeepAlive"),
    (0x7F05, "FailSafe"),
    (0x7F06, "SetNewModuleAddress"),
    (0x7F07, "QueryInterface"),
    (0x7F0C, "SetModuleLEDPattern"),
    (0x7F0D, "GetModuleLEDPattern"),
    (0x7F0E, "DebugLogLevel"),
    (0x7F0F, "Discovery"),
];

const ACK_ID: u16 = 0x7F01;
const NACK_ID: u16 = 0x7F02;

/// Result of classifying one packet's type id against its payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Coarse category for downstream rendering
    pub category: PacketCategory,
    /// Resolved name; "Command"/"Response" when unresolved
    pub type_name: &'static str,
    /// I2C sub-fields for the I2C command family
    pub i2c: Option<I2cTransaction>,
    /// NACK error code for NACK responses
    pub nack_code: Option<u8>,
}

impl Classification {
    fn named(category: PacketCategory, type_name: &'static str) -> Self {
        Self { category, type_name, i2c: None, nack_code: None }
    }
}

enum ResolvedCommand {
    Ack,
    Nack,
    System(&'static str),
    Interface(&'static InterfaceCommand),
}

/// Lookup table mapping type ids to command semantics.
///
/// Built once per decoder from the fixed system entries plus the
/// interface-relative entries rebased onto the configured
/// `interface_first_id`.
pub struct CommandTable {
    by_id: HashMap<u16, ResolvedCommand>,
}

impl CommandTable {
    /// Build the table for a given interface base.
    pub fn new(interface_first_id: u16) -> Self {
        let mut by_id = HashMap::with_capacity(SYSTEM_COMMANDS.len() + 2 + INTERFACE_COMMANDS.len());

        by_id.insert(ACK_ID, ResolvedCommand::Ack);
        by_id.insert(NACK_ID, ResolvedCommand::Nack);
        for &(id, name) in SYSTEM_COMMANDS {
            by_id.insert(id, ResolvedCommand::System(name));
        }

        for command in INTERFACE_COMMANDS {
            let Some(id) = interface_first_id.checked_add(command.offset) else {
                warn!(
                    "interface command {} (base {:#06x} + {}) overflows the id space, skipping",
                    command.name, interface_first_id, command.offset
                );
                continue;
            };

            // Fixed ids take priority; a colliding base shadows part of
            // the interface table rather than the system range.
            if (SYSTEM_ID_FIRST..=SYSTEM_ID_LAST).contains(&id) {
                warn!(
                    "interface command {} at {:#06x} collides with the system id range, skipping",
                    command.name, id
                );
                continue;
            }

            by_id.insert(id, ResolvedCommand::Interface(command));
        }

        Self { by_id }
    }

    /// Classify one packet.
    ///
    /// Total over all inputs: ids matching neither table fall back to a
    /// generic command/response split keyed on the reference number.
    pub fn classify(&self, type_id: u16, reference_number: u8, payload: &[u8]) -> Classification {
        match self.by_id.get(&type_id) {
            Some(ResolvedCommand::Ack) => {
                Classification::named(PacketCategory::KnownResponse, "ACK")
            }
            Some(ResolvedCommand::Nack) => Classification {
                category: PacketCategory::Nack,
                type_name: "NACK",
                i2c: None,
                nack_code: payload.first().copied(),
            },
            Some(ResolvedCommand::System(name)) => {
                Classification::named(PacketCategory::KnownCommand, *name)
            }
            Some(ResolvedCommand::Interface(command)) => match command.kind {
                CommandKind::Known => {
                    Classification::named(PacketCategory::KnownCommand, command.name)
                }
                CommandKind::I2c(layout) => Classification {
                    category: PacketCategory::I2cCommand,
                    type_name: command.name,
                    i2c: Some(layout.decode(payload)),
                    nack_code: None,
                },
            },
            None => {
                trace!("unresolved type id {:#06x} (ref {})", type_id, reference_number);
                if reference_number == 0 {
                    Classification::named(PacketCategory::GenericCommand, "Command")
                } else {
                    Classification::named(PacketCategory::GenericResponse, "Response")
                }
            }
        }
    }
}
