// ABOUTME: submit_sm and submit_sm_resp PDUs (SMPP v3.4 Section 4.4)
// ABOUTME: Submits a short message to the SMSC for onward delivery to one SME

use crate::codec::{
    CodecError, Decodable, Encodable, PduHeader, decode_cstring, decode_tlvs, decode_u8,
    encode_cstring, encode_header,
};
use crate::datatypes::tlv::{Tlv, encode_tlvs};
use crate::datatypes::{
    CommandId, CommandStatus, MAX_SERVICE_TYPE_LENGTH, MAX_TIME_LENGTH, PriorityFlag, SmeAddress,
    decode_priority, decode_short_message, encode_short_message,
};
use crate::macros::impl_message_id_response;
use bytes::{BufMut, Bytes, BytesMut};
use std::io::Cursor;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SubmitSm {
    pub sequence_number: u32,

    /// SMS application service, e.g. "CMT". Empty for the SMSC default.
    pub service_type: String,
    pub source: SmeAddress,
    pub destination: SmeAddress,

    /// Message mode and type bits
    pub esm_class: u8,
    pub protocol_id: u8,
    pub priority_flag: PriorityFlag,

    /// Absolute or relative time format; empty for immediate delivery
    pub schedule_delivery_time: String,
    /// Empty requests the SMSC default validity period
    pub validity_period: String,

    /// Delivery receipt and acknowledgement request bits
    pub registered_delivery: u8,
    pub replace_if_present_flag: u8,
    pub data_coding: u8,
    pub sm_default_msg_id: u8,

    /// Up to 254 octets of user data
    pub short_message: Bytes,

    pub tlvs: Vec<Tlv>,
}

impl SubmitSm {
    pub fn new(source: SmeAddress, destination: SmeAddress, short_message: impl Into<Bytes>) -> Self {
        Self {
            source,
            destination,
            short_message: short_message.into(),
            ..Default::default()
        }
    }
}

impl Encodable for SubmitSm {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        encode_header(buf, CommandId::SubmitSm, CommandStatus::Ok, self.sequence_number);

        encode_cstring(buf, &self.service_type, MAX_SERVICE_TYPE_LENGTH, "service_type")?;
        self.source.encode(buf, "source_addr")?;
        self.destination.encode(buf, "destination_addr")?;
        buf.put_u8(self.esm_class);
        buf.put_u8(self.protocol_id);
        buf.put_u8(self.priority_flag as u8);
        encode_cstring(buf, &self.schedule_delivery_time, MAX_TIME_LENGTH, "schedule_delivery_time")?;
        encode_cstring(buf, &self.validity_period, MAX_TIME_LENGTH, "validity_period")?;
        buf.put_u8(self.registered_delivery);
        buf.put_u8(self.replace_if_present_flag);
        buf.put_u8(self.data_coding);
        buf.put_u8(self.sm_default_msg_id);
        encode_short_message(buf, &self.short_message)?;

        encode_tlvs(&self.tlvs, buf)
    }
}

impl Decodable for SubmitSm {
    fn command_ids() -> &'static [CommandId] {
        &[CommandId::SubmitSm]
    }

    fn decode(header: PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        Self::validate_header(&header)?;

        Ok(Self {
            sequence_number: header.sequence_number,
            service_type: decode_cstring(buf, MAX_SERVICE_TYPE_LENGTH, "service_type")?,
            source: SmeAddress::decode(buf, "source_addr")?,
            destination: SmeAddress::decode(buf, "destination_addr")?,
            esm_class: decode_u8(buf)?,
            protocol_id: decode_u8(buf)?,
            priority_flag: decode_priority(buf)?,
            schedule_delivery_time: decode_cstring(buf, MAX_TIME_LENGTH, "schedule_delivery_time")?,
            validity_period: decode_cstring(buf, MAX_TIME_LENGTH, "validity_period")?,
            registered_delivery: decode_u8(buf)?,
            replace_if_present_flag: decode_u8(buf)?,
            data_coding: decode_u8(buf)?,
            sm_default_msg_id: decode_u8(buf)?,
            short_message: decode_short_message(buf)?,
            tlvs: decode_tlvs(buf)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SubmitSmResponse {
    pub command_status: CommandStatus,
    pub sequence_number: u32,

    /// SMSC assigned identifier for the submitted message
    pub message_id: String,
}

impl SubmitSmResponse {
    pub fn new(sequence_number: u32, message_id: impl Into<String>) -> Self {
        Self {
            command_status: CommandStatus::Ok,
            sequence_number,
            message_id: message_id.into(),
        }
    }
}

impl_message_id_response!(SubmitSmResponse, CommandId::SubmitSmResp);
