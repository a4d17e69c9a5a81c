// ABOUTME: bind_transmitter, bind_receiver and bind_transceiver PDUs and their responses
// ABOUTME: All three share one body layout, selected by BindType

use crate::codec::{
    CodecError, Decodable, Encodable, PduHeader, decode_cstring, decode_tlvs, decode_u8,
    encode_cstring, encode_header,
};
use crate::datatypes::tlv::{Tlv, encode_tlvs};
use crate::datatypes::{
    CommandId, CommandStatus, InterfaceVersion, MAX_ADDRESS_RANGE_LENGTH, MAX_PASSWORD_LENGTH,
    MAX_SYSTEM_ID_LENGTH, MAX_SYSTEM_TYPE_LENGTH, NumericPlanIndicator, TypeOfNumber,
};
use bytes::{BufMut, BytesMut};
use num_enum::TryFromPrimitive;
use std::io::Cursor;

/// Role requested from the SMSC when binding.
#[derive(TryFromPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum BindType {
    /// Submit only
    Transmitter = 1,
    /// Receive only
    Receiver = 2,
    /// Submit and receive over one session
    #[default]
    Transceiver = 3,
}

impl BindType {
    pub fn description(&self) -> &'static str {
        match self {
            BindType::Transmitter => "may submit short messages to the SMSC",
            BindType::Receiver => "may receive short messages from the SMSC",
            BindType::Transceiver => "may both submit and receive short messages",
        }
    }

    pub fn command_id(&self) -> CommandId {
        match self {
            BindType::Transmitter => CommandId::BindTransmitter,
            BindType::Receiver => CommandId::BindReceiver,
            BindType::Transceiver => CommandId::BindTransceiver,
        }
    }

    pub fn response_command_id(&self) -> CommandId {
        match self {
            BindType::Transmitter => CommandId::BindTransmitterResp,
            BindType::Receiver => CommandId::BindReceiverResp,
            BindType::Transceiver => CommandId::BindTransceiverResp,
        }
    }

    fn from_command_id(command_id: CommandId) -> Option<BindType> {
        match command_id {
            CommandId::BindTransmitter | CommandId::BindTransmitterResp => Some(BindType::Transmitter),
            CommandId::BindReceiver | CommandId::BindReceiverResp => Some(BindType::Receiver),
            CommandId::BindTransceiver | CommandId::BindTransceiverResp => Some(BindType::Transceiver),
            _ => None,
        }
    }
}

/// Bind request (SMPP v3.4 Sections 4.1.1, 4.1.3 and 4.1.5).
#[derive(Clone, Debug, PartialEq)]
pub struct BindRequest {
    pub bind_type: BindType,
    pub sequence_number: u32,

    /// Identifies the ESME to the SMSC. Up to 15 octets.
    pub system_id: String,
    /// Up to 8 octets. Empty when the SMSC requires no password.
    pub password: String,
    /// Category of ESME, e.g. "VMS" or "OTA". Up to 12 octets.
    pub system_type: String,
    pub interface_version: InterfaceVersion,
    pub addr_ton: TypeOfNumber,
    pub addr_npi: NumericPlanIndicator,
    /// Range of SME addresses served by this ESME. Up to 40 octets.
    pub address_range: String,
}

impl BindRequest {
    pub fn new(
        bind_type: BindType,
        system_id: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            bind_type,
            sequence_number: 1,
            system_id: system_id.into(),
            password: password.into(),
            system_type: String::new(),
            interface_version: InterfaceVersion::SmppV34,
            addr_ton: TypeOfNumber::Unknown,
            addr_npi: NumericPlanIndicator::Unknown,
            address_range: String::new(),
        }
    }
}

impl Encodable for BindRequest {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        encode_header(buf, self.bind_type.command_id(), CommandStatus::Ok, self.sequence_number);

        encode_cstring(buf, &self.system_id, MAX_SYSTEM_ID_LENGTH, "system_id")?;
        encode_cstring(buf, &self.password, MAX_PASSWORD_LENGTH, "password")?;
        encode_cstring(buf, &self.system_type, MAX_SYSTEM_TYPE_LENGTH, "system_type")?;
        buf.put_u8(self.interface_version as u8);
        buf.put_u8(self.addr_ton as u8);
        buf.put_u8(self.addr_npi as u8);
        encode_cstring(buf, &self.address_range, MAX_ADDRESS_RANGE_LENGTH, "address_range")?;

        Ok(())
    }
}

impl Decodable for BindRequest {
    fn command_ids() -> &'static [CommandId] {
        &[
            CommandId::BindTransmitter,
            CommandId::BindReceiver,
            CommandId::BindTransceiver,
        ]
    }

    fn decode(header: PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        Self::validate_header(&header)?;
        let bind_type = BindType::from_command_id(header.command_id)
            .ok_or(CodecError::InvalidCommandId(header.command_id as u32))?;

        let system_id = decode_cstring(buf, MAX_SYSTEM_ID_LENGTH, "system_id")?;
        let password = decode_cstring(buf, MAX_PASSWORD_LENGTH, "password")?;
        let system_type = decode_cstring(buf, MAX_SYSTEM_TYPE_LENGTH, "system_type")?;
        let interface_version = InterfaceVersion::try_from(decode_u8(buf)?).map_err(|e| {
            CodecError::FieldValidation {
                field: "interface_version",
                reason: e.to_string(),
            }
        })?;
        let addr_ton = TypeOfNumber::try_from(decode_u8(buf)?).unwrap_or_default();
        let addr_npi = NumericPlanIndicator::try_from(decode_u8(buf)?).unwrap_or_default();
        let address_range = decode_cstring(buf, MAX_ADDRESS_RANGE_LENGTH, "address_range")?;

        Ok(Self {
            bind_type,
            sequence_number: header.sequence_number,
            system_id,
            password,
            system_type,
            interface_version,
            addr_ton,
            addr_npi,
            address_range,
        })
    }
}

/// Bind response. Error responses may omit the body entirely.
#[derive(Clone, Debug, PartialEq)]
pub struct BindResponse {
    pub bind_type: BindType,
    pub command_status: CommandStatus,
    pub sequence_number: u32,

    /// Identifies the SMSC to the ESME.
    pub system_id: String,
    /// Optional parameters, typically sc_interface_version.
    pub tlvs: Vec<Tlv>,
}

impl BindResponse {
    pub fn new(bind_type: BindType, sequence_number: u32, system_id: impl Into<String>) -> Self {
        Self {
            bind_type,
            command_status: CommandStatus::Ok,
            sequence_number,
            system_id: system_id.into(),
            tlvs: Vec::new(),
        }
    }

    pub fn error(bind_type: BindType, sequence_number: u32, status: CommandStatus) -> Self {
        Self {
            command_status: status,
            ..Self::new(bind_type, sequence_number, "")
        }
    }
}

impl Encodable for BindResponse {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        encode_header(
            buf,
            self.bind_type.response_command_id(),
            self.command_status,
            self.sequence_number,
        );

        encode_cstring(buf, &self.system_id, MAX_SYSTEM_ID_LENGTH, "system_id")?;
        encode_tlvs(&self.tlvs, buf)
    }
}

impl Decodable for BindResponse {
    fn command_ids() -> &'static [CommandId] {
        &[
            CommandId::BindTransmitterResp,
            CommandId::BindReceiverResp,
            CommandId::BindTransceiverResp,
        ]
    }

    fn decode(header: PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        use bytes::Buf;

        Self::validate_header(&header)?;
        let bind_type = BindType::from_command_id(header.command_id)
            .ok_or(CodecError::InvalidCommandId(header.command_id as u32))?;

        let system_id = if buf.has_remaining() {
            decode_cstring(buf, MAX_SYSTEM_ID_LENGTH, "system_id")?
        } else {
            String::new()
        };

        Ok(Self {
            bind_type,
            command_status: header.command_status,
            sequence_number: header.sequence_number,
            system_id,
            tlvs: decode_tlvs(buf)?,
        })
    }
}
