// ABOUTME: submit_multi and submit_multi_resp PDUs (SMPP v3.4 Section 4.5)
// ABOUTME: Submits one message to up to 254 SME addresses or distribution lists

use crate::codec::{
    CodecError, Decodable, Encodable, PduHeader, decode_cstring, decode_tlvs, decode_u8,
    encode_cstring, encode_header,
};
use crate::datatypes::tlv::{Tlv, encode_tlvs};
use crate::datatypes::{
    CommandId, CommandStatus, MAX_DL_NAME_LENGTH, MAX_MESSAGE_ID_LENGTH, MAX_SERVICE_TYPE_LENGTH,
    MAX_TIME_LENGTH, PriorityFlag, SmeAddress, decode_priority, decode_short_message,
    encode_short_message,
};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::io::Cursor;

/// Upper bound on number_of_dests
pub const MAX_DESTINATIONS: usize = 254;

const DEST_FLAG_SME_ADDRESS: u8 = 0x01;
const DEST_FLAG_DISTRIBUTION_LIST: u8 = 0x02;

#[derive(Clone, Debug, PartialEq)]
pub enum DestinationAddress {
    Sme(SmeAddress),
    DistributionList(String),
}

impl DestinationAddress {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        match self {
            DestinationAddress::Sme(address) => {
                buf.put_u8(DEST_FLAG_SME_ADDRESS);
                address.encode(buf, "destination_addr")
            }
            DestinationAddress::DistributionList(name) => {
                buf.put_u8(DEST_FLAG_DISTRIBUTION_LIST);
                encode_cstring(buf, name, MAX_DL_NAME_LENGTH, "dl_name")
            }
        }
    }

    fn decode(buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        match decode_u8(buf)? {
            DEST_FLAG_SME_ADDRESS => Ok(DestinationAddress::Sme(SmeAddress::decode(
                buf,
                "destination_addr",
            )?)),
            DEST_FLAG_DISTRIBUTION_LIST => Ok(DestinationAddress::DistributionList(
                decode_cstring(buf, MAX_DL_NAME_LENGTH, "dl_name")?,
            )),
            flag => Err(CodecError::FieldValidation {
                field: "dest_flag",
                reason: format!("unknown destination flag {flag}"),
            }),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SubmitMulti {
    pub sequence_number: u32,

    pub service_type: String,
    pub source: SmeAddress,
    pub destinations: Vec<DestinationAddress>,
    pub esm_class: u8,
    pub protocol_id: u8,
    pub priority_flag: PriorityFlag,
    pub schedule_delivery_time: String,
    pub validity_period: String,
    pub registered_delivery: u8,
    pub replace_if_present_flag: u8,
    pub data_coding: u8,
    pub sm_default_msg_id: u8,
    pub short_message: Bytes,
    pub tlvs: Vec<Tlv>,
}

impl SubmitMulti {
    pub fn new(
        source: SmeAddress,
        destinations: impl IntoIterator<Item = SmeAddress>,
        short_message: impl Into<Bytes>,
    ) -> Self {
        Self {
            source,
            destinations: destinations.into_iter().map(DestinationAddress::Sme).collect(),
            short_message: short_message.into(),
            ..Default::default()
        }
    }
}

impl Encodable for SubmitMulti {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        if self.destinations.is_empty() || self.destinations.len() > MAX_DESTINATIONS {
            return Err(CodecError::FieldValidation {
                field: "number_of_dests",
                reason: format!(
                    "{} destinations, expected 1 to {MAX_DESTINATIONS}",
                    self.destinations.len()
                ),
            });
        }

        encode_header(buf, CommandId::SubmitMulti, CommandStatus::Ok, self.sequence_number);

        encode_cstring(buf, &self.service_type, MAX_SERVICE_TYPE_LENGTH, "service_type")?;
        self.source.encode(buf, "source_addr")?;
        buf.put_u8(self.destinations.len() as u8);
        for destination in &self.destinations {
            destination.encode(buf)?;
        }
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

impl Decodable for SubmitMulti {
    fn command_ids() -> &'static [CommandId] {
        &[CommandId::SubmitMulti]
    }

    fn decode(header: PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        Self::validate_header(&header)?;

        let service_type = decode_cstring(buf, MAX_SERVICE_TYPE_LENGTH, "service_type")?;
        let source = SmeAddress::decode(buf, "source_addr")?;
        let number_of_dests = decode_u8(buf)?;
        let destinations = (0..number_of_dests)
            .map(|_| DestinationAddress::decode(buf))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            sequence_number: header.sequence_number,
            service_type,
            source,
            destinations,
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

/// A destination the SMSC refused, with the reason.
#[derive(Clone, Debug, PartialEq)]
pub struct UnsuccessfulDelivery {
    pub address: SmeAddress,
    pub error_status_code: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SubmitMultiResponse {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
    pub message_id: String,
    pub unsuccessful: Vec<UnsuccessfulDelivery>,
}

impl SubmitMultiResponse {
    pub fn new(sequence_number: u32, message_id: impl Into<String>) -> Self {
        Self {
            command_status: CommandStatus::Ok,
            sequence_number,
            message_id: message_id.into(),
            unsuccessful: Vec::new(),
        }
    }
}

impl Encodable for SubmitMultiResponse {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        encode_header(buf, CommandId::SubmitMultiResp, self.command_status, self.sequence_number);
        encode_cstring(buf, &self.message_id, MAX_MESSAGE_ID_LENGTH, "message_id")?;

        let no_unsuccess = u8::try_from(self.unsuccessful.len()).map_err(|_| {
            CodecError::FieldValidation {
                field: "no_unsuccess",
                reason: format!("{} entries exceeds 255", self.unsuccessful.len()),
            }
        })?;
        buf.put_u8(no_unsuccess);
        for entry in &self.unsuccessful {
            entry.address.encode(buf, "destination_addr")?;
            buf.put_u32(entry.error_status_code);
        }
        Ok(())
    }
}

impl Decodable for SubmitMultiResponse {
    fn command_ids() -> &'static [CommandId] {
        &[CommandId::SubmitMultiResp]
    }

    fn decode(header: PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        Self::validate_header(&header)?;

        let mut response = Self {
            command_status: header.command_status,
            ..Self::new(header.sequence_number, "")
        };
        if !buf.has_remaining() {
            return Ok(response);
        }

        response.message_id = decode_cstring(buf, MAX_MESSAGE_ID_LENGTH, "message_id")?;
        let no_unsuccess = decode_u8(buf)?;
        for _ in 0..no_unsuccess {
            let address = SmeAddress::decode(buf, "destination_addr")?;
            if buf.remaining() < 4 {
                return Err(CodecError::Incomplete);
            }
            response.unsuccessful.push(UnsuccessfulDelivery {
                address,
                error_status_code: buf.get_u32(),
            });
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Frame;
    use crate::datatypes::{NumericPlanIndicator, TypeOfNumber};

    fn address(digits: &str) -> SmeAddress {
        SmeAddress::new(TypeOfNumber::National, NumericPlanIndicator::Isdn, digits)
    }

    #[test]
    fn mixed_destination_kinds_decode() {
        let mut submit = SubmitMulti::new(address("100"), [address("200"), address("300")], "hi");
        submit
            .destinations
            .push(DestinationAddress::DistributionList("staff".to_string()));
        submit.sequence_number = 8;

        let bytes = submit.to_bytes().unwrap();
        let mut cursor = Cursor::new(bytes.as_ref());
        let Frame::SubmitMulti(decoded) = Frame::parse(&mut cursor).unwrap() else {
            panic!("Expected SubmitMulti");
        };
        assert_eq!(decoded.destinations.len(), 3);
        assert_eq!(
            decoded.destinations[2],
            DestinationAddress::DistributionList("staff".to_string())
        );
    }

    #[test]
    fn empty_destination_list_is_rejected() {
        let submit = SubmitMulti::new(address("100"), Vec::new(), "hi");
        assert!(matches!(
            submit.to_bytes(),
            Err(CodecError::FieldValidation { field: "number_of_dests", .. })
        ));
    }

    #[test]
    fn response_lists_failed_destinations() {
        let mut resp = SubmitMultiResponse::new(4, "msg-9");
        resp.unsuccessful.push(UnsuccessfulDelivery {
            address: address("300"),
            error_status_code: CommandStatus::InvalidDestinationAddress.into(),
        });

        let bytes = resp.to_bytes().unwrap();
        let mut cursor = Cursor::new(bytes.as_ref());
        assert_eq!(Frame::parse(&mut cursor).unwrap(), Frame::SubmitMultiResp(resp));
    }
}
