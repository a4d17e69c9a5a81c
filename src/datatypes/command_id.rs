// ABOUTME: SMPP v3.4 command_id values for every PDU the protocol defines
// ABOUTME: Bit 31 distinguishes responses from requests

use num_enum::TryFromPrimitive;

/// Identifies the SMPP operation carried by a PDU (SMPP v3.4 Section 5.1.2.1).
///
/// Reserved and vendor ranges are not represented; a header carrying one of
/// them fails to decode with `CodecError::InvalidCommandId`.
#[derive(TryFromPrimitive)]
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CommandId {
    GenericNack = 0x8000_0000,
    BindReceiver = 0x0000_0001,
    BindReceiverResp = 0x8000_0001,
    BindTransmitter = 0x0000_0002,
    BindTransmitterResp = 0x8000_0002,
    QuerySm = 0x0000_0003,
    QuerySmResp = 0x8000_0003,
    SubmitSm = 0x0000_0004,
    SubmitSmResp = 0x8000_0004,
    DeliverSm = 0x0000_0005,
    DeliverSmResp = 0x8000_0005,
    Unbind = 0x0000_0006,
    UnbindResp = 0x8000_0006,
    ReplaceSm = 0x0000_0007,
    ReplaceSmResp = 0x8000_0007,
    CancelSm = 0x0000_0008,
    CancelSmResp = 0x8000_0008,
    BindTransceiver = 0x0000_0009,
    BindTransceiverResp = 0x8000_0009,
    Outbind = 0x0000_000B,
    EnquireLink = 0x0000_0015,
    EnquireLinkResp = 0x8000_0015,
    SubmitMulti = 0x0000_0021,
    SubmitMultiResp = 0x8000_0021,
    AlertNotification = 0x0000_0102,
    DataSm = 0x0000_0103,
    DataSmResp = 0x8000_0103,
}

impl CommandId {
    /// The response command_id paired with this request, if it has one.
    ///
    /// outbind and alert_notification are unacknowledged.
    pub fn response(&self) -> Option<CommandId> {
        if self.is_response() {
            return None;
        }
        CommandId::try_from(*self as u32 | 0x8000_0000).ok()
    }
}
