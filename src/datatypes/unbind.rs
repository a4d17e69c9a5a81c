use crate::datatypes::{CommandId, CommandStatus};
use crate::macros::impl_complete_header_only_pdu;

/// Deregisters the ESME from the SMSC ahead of closing the connection
/// (SMPP v3.4 Section 4.2). Either side may send it.
#[derive(Clone, Debug, PartialEq)]
pub struct Unbind {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UnbindResponse {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
}

impl_complete_header_only_pdu!(Unbind, CommandId::Unbind);
impl_complete_header_only_pdu!(UnbindResponse, CommandId::UnbindResp);
