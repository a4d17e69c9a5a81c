// ABOUTME: replace_sm and replace_sm_resp PDUs (SMPP v3.4 Section 4.10)
// ABOUTME: Replaces a previously submitted message that is still pending delivery

use crate::codec::{
    CodecError, Decodable, Encodable, PduHeader, decode_cstring, decode_u8, encode_cstring,
    encode_header,
};
use crate::datatypes::{
    CommandId, CommandStatus, MAX_MESSAGE_ID_LENGTH, MAX_TIME_LENGTH, SmeAddress,
    decode_short_message, encode_short_message,
};
use crate::macros::impl_complete_header_only_pdu;
use bytes::{BufMut, Bytes, BytesMut};
use std::io::Cursor;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReplaceSm {
    pub sequence_number: u32,

    pub message_id: String,
    pub source: SmeAddress,
    pub schedule_delivery_time: String,
    pub validity_period: String,
    pub registered_delivery: u8,
    pub sm_default_msg_id: u8,
    /// Replacement user data, up to 254 octets
    pub short_message: Bytes,
}

impl ReplaceSm {
    pub fn new(message_id: impl Into<String>, source: SmeAddress, short_message: impl Into<Bytes>) -> Self {
        Self {
            message_id: message_id.into(),
            source,
            short_message: short_message.into(),
            ..Default::default()
        }
    }
}

impl Encodable for ReplaceSm {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        encode_header(buf, CommandId::ReplaceSm, CommandStatus::Ok, self.sequence_number);

        encode_cstring(buf, &self.message_id, MAX_MESSAGE_ID_LENGTH, "message_id")?;
        self.source.encode(buf, "source_addr")?;
        encode_cstring(buf, &self.schedule_delivery_time, MAX_TIME_LENGTH, "schedule_delivery_time")?;
        encode_cstring(buf, &self.validity_period, MAX_TIME_LENGTH, "validity_period")?;
        buf.put_u8(self.registered_delivery);
        buf.put_u8(self.sm_default_msg_id);
        encode_short_message(buf, &self.short_message)
    }
}

impl Decodable for ReplaceSm {
    fn command_ids() -> &'static [CommandId] {
        &[CommandId::ReplaceSm]
    }

    fn decode(header: PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        Self::validate_header(&header)?;

        Ok(Self {
            sequence_number: header.sequence_number,
            message_id: decode_cstring(buf, MAX_MESSAGE_ID_LENGTH, "message_id")?,
            source: SmeAddress::decode(buf, "source_addr")?,
            schedule_delivery_time: decode_cstring(buf, MAX_TIME_LENGTH, "schedule_delivery_time")?,
            validity_period: decode_cstring(buf, MAX_TIME_LENGTH, "validity_period")?,
            registered_delivery: decode_u8(buf)?,
            sm_default_msg_id: decode_u8(buf)?,
            short_message: decode_short_message(buf)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReplaceSmResponse {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
}

impl_complete_header_only_pdu!(ReplaceSmResponse, CommandId::ReplaceSmResp);
