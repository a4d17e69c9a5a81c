use crate::datatypes::{CommandId, CommandStatus};
use crate::macros::impl_header_only_pdu;

/// Negative acknowledgement for a PDU the receiver could not process, e.g.
/// an unknown command_id (SMPP v3.4 Section 4.3). Header only.
#[derive(Clone, Debug, PartialEq)]
pub struct GenericNack {
    /// Reason for the rejection
    pub command_status: CommandStatus,
    /// Sequence number of the offending PDU, or 0 if it could not be read
    pub sequence_number: u32,
}

impl GenericNack {
    pub fn new(command_status: CommandStatus, sequence_number: u32) -> Self {
        Self {
            command_status,
            sequence_number,
        }
    }

    pub fn invalid_command_id(sequence_number: u32) -> Self {
        Self::new(CommandStatus::InvalidCommandId, sequence_number)
    }

    pub fn invalid_command_length(sequence_number: u32) -> Self {
        Self::new(CommandStatus::InvalidCommandLength, sequence_number)
    }

    pub fn system_error(sequence_number: u32) -> Self {
        Self::new(CommandStatus::SystemError, sequence_number)
    }
}

impl_header_only_pdu!(GenericNack, CommandId::GenericNack);
