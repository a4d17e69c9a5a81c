// ABOUTME: cancel_sm and cancel_sm_resp PDUs (SMPP v3.4 Section 4.9)
// ABOUTME: Cancels one pending message, or all matching messages when message_id is empty

use crate::codec::{
    CodecError, Decodable, Encodable, PduHeader, decode_cstring, encode_cstring, encode_header,
};
use crate::datatypes::{
    CommandId, CommandStatus, MAX_MESSAGE_ID_LENGTH, MAX_SERVICE_TYPE_LENGTH, SmeAddress,
};
use crate::macros::impl_complete_header_only_pdu;
use bytes::BytesMut;
use std::io::Cursor;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CancelSm {
    pub sequence_number: u32,

    pub service_type: String,
    pub message_id: String,
    pub source: SmeAddress,
    pub destination: SmeAddress,
}

impl CancelSm {
    pub fn new(message_id: impl Into<String>, source: SmeAddress, destination: SmeAddress) -> Self {
        Self {
            message_id: message_id.into(),
            source,
            destination,
            ..Default::default()
        }
    }
}

impl Encodable for CancelSm {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        encode_header(buf, CommandId::CancelSm, CommandStatus::Ok, self.sequence_number);

        encode_cstring(buf, &self.service_type, MAX_SERVICE_TYPE_LENGTH, "service_type")?;
        encode_cstring(buf, &self.message_id, MAX_MESSAGE_ID_LENGTH, "message_id")?;
        self.source.encode(buf, "source_addr")?;
        self.destination.encode(buf, "destination_addr")
    }
}

impl Decodable for CancelSm {
    fn command_ids() -> &'static [CommandId] {
        &[CommandId::CancelSm]
    }

    fn decode(header: PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        Self::validate_header(&header)?;

        Ok(Self {
            sequence_number: header.sequence_number,
            service_type: decode_cstring(buf, MAX_SERVICE_TYPE_LENGTH, "service_type")?,
            message_id: decode_cstring(buf, MAX_MESSAGE_ID_LENGTH, "message_id")?,
            source: SmeAddress::decode(buf, "source_addr")?,
            destination: SmeAddress::decode(buf, "destination_addr")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CancelSmResponse {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
}

impl_complete_header_only_pdu!(CancelSmResponse, CommandId::CancelSmResp);
