// ABOUTME: data_sm and data_sm_resp PDUs (SMPP v3.4 Section 4.7)
// ABOUTME: Carries user data in TLVs, typically message_payload, in either direction

use crate::codec::{
    CodecError, Decodable, Encodable, PduHeader, decode_cstring, decode_tlvs, decode_u8,
    encode_cstring, encode_header,
};
use crate::datatypes::tlv::{Tlv, encode_tlvs, find_tlv, tags};
use crate::datatypes::{
    CommandId, CommandStatus, MAX_MESSAGE_ID_LENGTH, MAX_SERVICE_TYPE_LENGTH, SmeAddress,
};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::io::Cursor;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataSm {
    pub sequence_number: u32,

    pub service_type: String,
    pub source: SmeAddress,
    pub destination: SmeAddress,
    pub esm_class: u8,
    pub registered_delivery: u8,
    pub data_coding: u8,

    pub tlvs: Vec<Tlv>,
}

impl DataSm {
    pub fn new(source: SmeAddress, destination: SmeAddress) -> Self {
        Self {
            source,
            destination,
            ..Default::default()
        }
    }

    pub fn with_payload(mut self, payload: impl Into<Bytes>) -> Self {
        self.tlvs.push(Tlv::message_payload(payload));
        self
    }

    pub fn with_alert_on_delivery(mut self) -> Self {
        self.tlvs.push(Tlv::flag(tags::ALERT_ON_MESSAGE_DELIVERY));
        self
    }

    pub fn message_payload(&self) -> Option<&Bytes> {
        find_tlv(&self.tlvs, tags::MESSAGE_PAYLOAD).map(|tlv| &tlv.value)
    }
}

impl Encodable for DataSm {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        encode_header(buf, CommandId::DataSm, CommandStatus::Ok, self.sequence_number);

        encode_cstring(buf, &self.service_type, MAX_SERVICE_TYPE_LENGTH, "service_type")?;
        self.source.encode(buf, "source_addr")?;
        self.destination.encode(buf, "destination_addr")?;
        buf.put_u8(self.esm_class);
        buf.put_u8(self.registered_delivery);
        buf.put_u8(self.data_coding);

        encode_tlvs(&self.tlvs, buf)
    }
}

impl Decodable for DataSm {
    fn command_ids() -> &'static [CommandId] {
        &[CommandId::DataSm]
    }

    fn decode(header: PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        Self::validate_header(&header)?;

        Ok(Self {
            sequence_number: header.sequence_number,
            service_type: decode_cstring(buf, MAX_SERVICE_TYPE_LENGTH, "service_type")?,
            source: SmeAddress::decode(buf, "source_addr")?,
            destination: SmeAddress::decode(buf, "destination_addr")?,
            esm_class: decode_u8(buf)?,
            registered_delivery: decode_u8(buf)?,
            data_coding: decode_u8(buf)?,
            tlvs: decode_tlvs(buf)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DataSmResponse {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
    pub message_id: String,
    pub tlvs: Vec<Tlv>,
}

impl DataSmResponse {
    pub fn new(sequence_number: u32, message_id: impl Into<String>) -> Self {
        Self {
            command_status: CommandStatus::Ok,
            sequence_number,
            message_id: message_id.into(),
            tlvs: Vec::new(),
        }
    }
}

impl Encodable for DataSmResponse {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        encode_header(buf, CommandId::DataSmResp, self.command_status, self.sequence_number);
        encode_cstring(buf, &self.message_id, MAX_MESSAGE_ID_LENGTH, "message_id")?;
        encode_tlvs(&self.tlvs, buf)
    }
}

impl Decodable for DataSmResponse {
    fn command_ids() -> &'static [CommandId] {
        &[CommandId::DataSmResp]
    }

    fn decode(header: PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        Self::validate_header(&header)?;

        let message_id = if buf.has_remaining() {
            decode_cstring(buf, MAX_MESSAGE_ID_LENGTH, "message_id")?
        } else {
            String::new()
        };

        Ok(Self {
            command_status: header.command_status,
            sequence_number: header.sequence_number,
            message_id,
            tlvs: decode_tlvs(buf)?,
        })
    }
}
