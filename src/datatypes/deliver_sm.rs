// ABOUTME: deliver_sm and deliver_sm_resp PDUs (SMPP v3.4 Section 4.6)
// ABOUTME: Sent by the SMSC to route mobile originated messages and delivery receipts

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

/// esm_class bits 2-5 set to 0b0001 mark an SMSC delivery receipt
const ESM_CLASS_DELIVERY_RECEIPT: u8 = 0x04;

/// Same body layout as submit_sm. schedule_delivery_time and
/// validity_period are always empty on the wire.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeliverSm {
    pub sequence_number: u32,

    pub service_type: String,
    pub source: SmeAddress,
    pub destination: SmeAddress,
    pub esm_class: u8,
    pub protocol_id: u8,
    pub priority_flag: PriorityFlag,
    pub registered_delivery: u8,
    pub data_coding: u8,
    pub short_message: Bytes,
    pub tlvs: Vec<Tlv>,
}

impl DeliverSm {
    pub fn new(source: SmeAddress, destination: SmeAddress, short_message: impl Into<Bytes>) -> Self {
        Self {
            source,
            destination,
            short_message: short_message.into(),
            ..Default::default()
        }
    }

    pub fn is_delivery_receipt(&self) -> bool {
        self.esm_class & 0x3C == ESM_CLASS_DELIVERY_RECEIPT
    }
}

impl Encodable for DeliverSm {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        encode_header(buf, CommandId::DeliverSm, CommandStatus::Ok, self.sequence_number);

        encode_cstring(buf, &self.service_type, MAX_SERVICE_TYPE_LENGTH, "service_type")?;
        self.source.encode(buf, "source_addr")?;
        self.destination.encode(buf, "destination_addr")?;
        buf.put_u8(self.esm_class);
        buf.put_u8(self.protocol_id);
        buf.put_u8(self.priority_flag as u8);
        buf.put_u8(0); // schedule_delivery_time
        buf.put_u8(0); // validity_period
        buf.put_u8(self.registered_delivery);
        buf.put_u8(0); // replace_if_present_flag
        buf.put_u8(self.data_coding);
        buf.put_u8(0); // sm_default_msg_id
        encode_short_message(buf, &self.short_message)?;

        encode_tlvs(&self.tlvs, buf)
    }
}

impl Decodable for DeliverSm {
    fn command_ids() -> &'static [CommandId] {
        &[CommandId::DeliverSm]
    }

    fn decode(header: PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        Self::validate_header(&header)?;

        let service_type = decode_cstring(buf, MAX_SERVICE_TYPE_LENGTH, "service_type")?;
        let source = SmeAddress::decode(buf, "source_addr")?;
        let destination = SmeAddress::decode(buf, "destination_addr")?;
        let esm_class = decode_u8(buf)?;
        let protocol_id = decode_u8(buf)?;
        let priority_flag = decode_priority(buf)?;
        // Unused by deliver_sm but tolerated if an SMSC fills them in
        decode_cstring(buf, MAX_TIME_LENGTH, "schedule_delivery_time")?;
        decode_cstring(buf, MAX_TIME_LENGTH, "validity_period")?;
        let registered_delivery = decode_u8(buf)?;
        decode_u8(buf)?;
        let data_coding = decode_u8(buf)?;
        decode_u8(buf)?;
        let short_message = decode_short_message(buf)?;

        Ok(Self {
            sequence_number: header.sequence_number,
            service_type,
            source,
            destination,
            esm_class,
            protocol_id,
            priority_flag,
            registered_delivery,
            data_coding,
            short_message,
            tlvs: decode_tlvs(buf)?,
        })
    }
}

/// message_id is unused and always sent empty.
#[derive(Clone, Debug, PartialEq)]
pub struct DeliverSmResponse {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
    pub message_id: String,
}

impl DeliverSmResponse {
    pub fn new(sequence_number: u32) -> Self {
        Self {
            command_status: CommandStatus::Ok,
            sequence_number,
            message_id: String::new(),
        }
    }
}

impl_message_id_response!(DeliverSmResponse, CommandId::DeliverSmResp);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receipt_detection_uses_message_type_bits() {
        let mut deliver = DeliverSm::default();
        assert!(!deliver.is_delivery_receipt());

        deliver.esm_class = 0x04;
        assert!(deliver.is_delivery_receipt());

        // UDHI bit does not change the message type
        deliver.esm_class = 0x44;
        assert!(deliver.is_delivery_receipt());
    }

    #[test]
    fn deliver_sm_resp_carries_empty_message_id() {
        let bytes = DeliverSmResponse::new(77).to_bytes().unwrap();
        assert_eq!(bytes.len(), 17);
        assert_eq!(bytes[16], 0);
    }
}
