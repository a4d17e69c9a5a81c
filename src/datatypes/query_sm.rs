// ABOUTME: query_sm and query_sm_resp PDUs (SMPP v3.4 Section 4.8)
// ABOUTME: Queries the delivery state of a previously submitted message

use crate::codec::{
    CodecError, Decodable, Encodable, PduHeader, decode_cstring, decode_u8, encode_cstring,
    encode_header,
};
use crate::datatypes::{CommandId, CommandStatus, MAX_MESSAGE_ID_LENGTH, MAX_TIME_LENGTH, SmeAddress};
use bytes::{Buf, BufMut, BytesMut};
use std::io::Cursor;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuerySm {
    pub sequence_number: u32,

    /// Identifier returned by the SMSC when the message was submitted
    pub message_id: String,
    /// Must match the source address of the original submission
    pub source: SmeAddress,
}

impl QuerySm {
    pub fn new(message_id: impl Into<String>, source: SmeAddress) -> Self {
        Self {
            sequence_number: 0,
            message_id: message_id.into(),
            source,
        }
    }
}

impl Encodable for QuerySm {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        encode_header(buf, CommandId::QuerySm, CommandStatus::Ok, self.sequence_number);
        encode_cstring(buf, &self.message_id, MAX_MESSAGE_ID_LENGTH, "message_id")?;
        self.source.encode(buf, "source_addr")
    }
}

impl Decodable for QuerySm {
    fn command_ids() -> &'static [CommandId] {
        &[CommandId::QuerySm]
    }

    fn decode(header: PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        Self::validate_header(&header)?;

        Ok(Self {
            sequence_number: header.sequence_number,
            message_id: decode_cstring(buf, MAX_MESSAGE_ID_LENGTH, "message_id")?,
            source: SmeAddress::decode(buf, "source_addr")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct QuerySmResponse {
    pub command_status: CommandStatus,
    pub sequence_number: u32,

    pub message_id: String,
    /// When the message reached its final state; empty while still pending
    pub final_date: String,
    /// ENROUTE=1, DELIVERED=2, EXPIRED=3, DELETED=4, UNDELIVERABLE=5,
    /// ACCEPTED=6, UNKNOWN=7, REJECTED=8
    pub message_state: u8,
    /// Network error code for the final state, 0 if none
    pub error_code: u8,
}

impl QuerySmResponse {
    pub fn new(sequence_number: u32, message_id: impl Into<String>, message_state: u8) -> Self {
        Self {
            command_status: CommandStatus::Ok,
            sequence_number,
            message_id: message_id.into(),
            final_date: String::new(),
            message_state,
            error_code: 0,
        }
    }
}

impl Encodable for QuerySmResponse {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        encode_header(buf, CommandId::QuerySmResp, self.command_status, self.sequence_number);
        encode_cstring(buf, &self.message_id, MAX_MESSAGE_ID_LENGTH, "message_id")?;
        encode_cstring(buf, &self.final_date, MAX_TIME_LENGTH, "final_date")?;
        buf.put_u8(self.message_state);
        buf.put_u8(self.error_code);
        Ok(())
    }
}

impl Decodable for QuerySmResponse {
    fn command_ids() -> &'static [CommandId] {
        &[CommandId::QuerySmResp]
    }

    fn decode(header: PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        Self::validate_header(&header)?;

        if !buf.has_remaining() {
            return Ok(Self {
                command_status: header.command_status,
                ..Self::new(header.sequence_number, "", 0)
            });
        }

        Ok(Self {
            command_status: header.command_status,
            sequence_number: header.sequence_number,
            message_id: decode_cstring(buf, MAX_MESSAGE_ID_LENGTH, "message_id")?,
            final_date: decode_cstring(buf, MAX_TIME_LENGTH, "final_date")?,
            message_state: decode_u8(buf)?,
            error_code: decode_u8(buf)?,
        })
    }
}
