// SMPP v3.4 Codec - Separates parsing/encoding logic from domain models
//
// Each PDU implements the Encodable/Decodable traits; this module owns the
// shared header layout, the C-octet string helpers and the `Frame` enum that
// the session layer moves around.

use crate::datatypes::{
    BindRequest, BindResponse, CancelSm, CancelSmResponse, CommandId, CommandStatus, DataSm,
    DataSmResponse, DeliverSm, DeliverSmResponse, EnquireLink, EnquireLinkResponse, GenericNack,
    QuerySm, QuerySmResponse, ReplaceSm, ReplaceSmResponse, SubmitMulti, SubmitMultiResponse,
    SubmitSm, SubmitSmResponse, Tlv, Unbind, UnbindResponse,
};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::OnceLock;
use thiserror::Error;

/// Maximum allowed PDU size to prevent memory exhaustion attacks
pub const MAX_PDU_SIZE: u32 = 65536; // 64KB

/// SMPP v3.4 PDU Header (16 bytes, common to all PDUs)
#[derive(Debug, Clone, PartialEq)]
pub struct PduHeader {
    pub command_length: u32,
    pub command_id: CommandId,
    pub command_status: CommandStatus,
    pub sequence_number: u32,
}

impl PduHeader {
    pub const SIZE: usize = 16;

    /// Decode PDU header from buffer with validation
    pub fn decode(buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        if buf.remaining() < Self::SIZE {
            return Err(CodecError::Incomplete);
        }

        let command_length = buf.get_u32();
        let command_id_raw = buf.get_u32();
        let command_id = CommandId::try_from(command_id_raw)
            .map_err(|_| CodecError::InvalidCommandId(command_id_raw))?;
        let command_status = CommandStatus::from(buf.get_u32());
        let sequence_number = buf.get_u32();

        if !(Self::SIZE as u32..=MAX_PDU_SIZE).contains(&command_length) {
            return Err(CodecError::InvalidPduLength {
                length: command_length,
                min: Self::SIZE as u32,
                max: MAX_PDU_SIZE,
            });
        }

        // SMPP v3.4: requests must carry command_status = 0
        if !command_id.is_response() && command_status != CommandStatus::Ok {
            return Err(CodecError::InvalidRequestStatus {
                command_id,
                command_status,
            });
        }

        if sequence_number == 0 || sequence_number == 0xFFFF_FFFF {
            return Err(CodecError::ReservedSequenceNumber(sequence_number));
        }

        Ok(PduHeader {
            command_length,
            command_id,
            command_status,
            sequence_number,
        })
    }

    /// Encode PDU header to buffer
    pub fn encode(&self, buf: &mut BytesMut) {
        buf.put_u32(self.command_length);
        buf.put_u32(self.command_id as u32);
        buf.put_u32(self.command_status.into());
        buf.put_u32(self.sequence_number);
    }

    /// Number of body octets that follow this header.
    pub fn body_len(&self) -> usize {
        self.command_length as usize - Self::SIZE
    }
}

/// Trait for types that can be encoded to bytes
pub trait Encodable {
    /// Encode this PDU to the buffer. The command_length written by
    /// implementations is a placeholder; `to_bytes` patches it.
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError>;

    /// Encode into a standalone buffer and fix up the command_length field.
    fn to_bytes(&self) -> Result<Bytes, CodecError> {
        let mut buf = BytesMut::with_capacity(64);
        self.encode(&mut buf)?;

        let length = buf.len() as u32;
        if length > MAX_PDU_SIZE {
            return Err(CodecError::InvalidPduLength {
                length,
                min: PduHeader::SIZE as u32,
                max: MAX_PDU_SIZE,
            });
        }
        buf[0..4].copy_from_slice(&length.to_be_bytes());

        Ok(buf.freeze())
    }
}

/// Trait for types that can be decoded from bytes
pub trait Decodable: Sized {
    /// Decode this PDU from the buffer positioned just after the header
    fn decode(header: PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError>;

    /// The command_ids this PDU type is decoded from
    fn command_ids() -> &'static [CommandId];

    /// Validate the header is appropriate for this PDU type
    fn validate_header(header: &PduHeader) -> Result<(), CodecError> {
        if !Self::command_ids().contains(&header.command_id) {
            return Err(CodecError::UnexpectedCommandId {
                expected: Self::command_ids()[0],
                actual: header.command_id,
            });
        }
        Ok(())
    }
}

/// Codec errors with detailed context for debugging
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Incomplete PDU: need more data")]
    Incomplete,

    #[error("Invalid command_id: {0:#x}")]
    InvalidCommandId(u32),

    #[error("Invalid PDU length: {length}, must be {min}-{max}")]
    InvalidPduLength { length: u32, min: u32, max: u32 },

    #[error("Request PDU {command_id:?} has non-zero status: {command_status:?}")]
    InvalidRequestStatus {
        command_id: CommandId,
        command_status: CommandStatus,
    },

    #[error("Reserved sequence number: {0} (0 and 0xFFFFFFFF are reserved)")]
    ReservedSequenceNumber(u32),

    #[error("Unexpected command_id: expected {expected:?}, got {actual:?}")]
    UnexpectedCommandId {
        expected: CommandId,
        actual: CommandId,
    },

    #[error("Field '{field}' validation failed: {reason}")]
    FieldValidation { field: &'static str, reason: String },

    #[error("TLV parsing error: {0}")]
    TlvError(String),

    #[error("UTF-8 decoding error in field '{field}': {source}")]
    Utf8Error {
        field: &'static str,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CommandId {
    /// Check if this command_id represents a response PDU
    pub fn is_response(&self) -> bool {
        (*self as u32) & 0x8000_0000 != 0
    }
}

/// Convert codec errors to appropriate SMPP command_status codes
impl CodecError {
    /// Status carried by the generic_nack sent back for an undecodable PDU.
    pub fn to_command_status(&self) -> CommandStatus {
        match self {
            CodecError::InvalidPduLength { .. } => CommandStatus::InvalidCommandLength,
            CodecError::InvalidCommandId(_) => CommandStatus::InvalidCommandId,
            CodecError::Incomplete => CommandStatus::InvalidCommandLength,
            CodecError::FieldValidation { field, .. } => match *field {
                "source_addr" => CommandStatus::InvalidSourceAddress,
                "destination_addr" => CommandStatus::InvalidDestinationAddress,
                "short_message" => CommandStatus::InvalidMsgLength,
                "message_id" => CommandStatus::InvalidMessageId,
                _ => CommandStatus::SystemError,
            },
            _ => CommandStatus::SystemError,
        }
    }
}

/// Write a request/response header with a placeholder command_length.
pub fn encode_header(
    buf: &mut BytesMut,
    command_id: CommandId,
    command_status: CommandStatus,
    sequence_number: u32,
) {
    PduHeader {
        command_length: 0,
        command_id,
        command_status,
        sequence_number,
    }
    .encode(buf);
}

/// Decode a variable length C-Octet String.
///
/// `max_len` includes the null terminator, as in the SMPP field tables.
pub fn decode_cstring(
    buf: &mut Cursor<&[u8]>,
    max_len: usize,
    field_name: &'static str,
) -> Result<String, CodecError> {
    let chunk = buf.chunk();
    let end = match chunk.iter().take(max_len).position(|&b| b == 0) {
        Some(end) => end,
        None if chunk.len() < max_len => return Err(CodecError::Incomplete),
        None => {
            return Err(CodecError::FieldValidation {
                field: field_name,
                reason: format!("missing null terminator within {max_len} octets"),
            });
        }
    };

    let value = chunk[..end].to_vec();
    buf.advance(end + 1);

    String::from_utf8(value).map_err(|e| CodecError::Utf8Error {
        field: field_name,
        source: e,
    })
}

/// Encode a variable length C-Octet String, rejecting values that do not fit.
pub fn encode_cstring(
    buf: &mut BytesMut,
    value: &str,
    max_len: usize,
    field_name: &'static str,
) -> Result<(), CodecError> {
    let bytes = value.as_bytes();
    if bytes.len() >= max_len {
        return Err(CodecError::FieldValidation {
            field: field_name,
            reason: format!("{} octets exceeds maximum of {}", bytes.len(), max_len - 1),
        });
    }
    if bytes.contains(&0) {
        return Err(CodecError::FieldValidation {
            field: field_name,
            reason: "embedded null octet".to_string(),
        });
    }

    buf.put_slice(bytes);
    buf.put_u8(0);
    Ok(())
}

/// Decode a single byte
pub fn decode_u8(buf: &mut Cursor<&[u8]>) -> Result<u8, CodecError> {
    if buf.remaining() < 1 {
        return Err(CodecError::Incomplete);
    }
    Ok(buf.get_u8())
}

/// Decode a 16-bit big-endian integer
pub fn decode_u16(buf: &mut Cursor<&[u8]>) -> Result<u16, CodecError> {
    if buf.remaining() < 2 {
        return Err(CodecError::Incomplete);
    }
    Ok(buf.get_u16())
}

/// Decode exactly `len` raw octets
pub fn decode_bytes(buf: &mut Cursor<&[u8]>, len: usize) -> Result<Bytes, CodecError> {
    if buf.remaining() < len {
        return Err(CodecError::Incomplete);
    }
    Ok(buf.copy_to_bytes(len))
}

/// Decode every TLV left in the PDU body.
pub fn decode_tlvs(buf: &mut Cursor<&[u8]>) -> Result<Vec<Tlv>, CodecError> {
    let mut tlvs = Vec::new();
    while buf.has_remaining() {
        tlvs.push(Tlv::decode(buf)?);
    }
    Ok(tlvs)
}

/// Generic frame type that can hold any PDU this crate speaks
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    // Session management PDUs
    Bind(BindRequest),
    BindResp(BindResponse),
    Unbind(Unbind),
    UnbindResp(UnbindResponse),
    EnquireLink(EnquireLink),
    EnquireLinkResp(EnquireLinkResponse),

    // Message PDUs
    SubmitSm(Box<SubmitSm>),
    SubmitSmResp(SubmitSmResponse),
    SubmitMulti(Box<SubmitMulti>),
    SubmitMultiResp(SubmitMultiResponse),
    DataSm(Box<DataSm>),
    DataSmResp(DataSmResponse),
    QuerySm(QuerySm),
    QuerySmResp(QuerySmResponse),
    ReplaceSm(Box<ReplaceSm>),
    ReplaceSmResp(ReplaceSmResponse),
    CancelSm(CancelSm),
    CancelSmResp(CancelSmResponse),
    DeliverSm(Box<DeliverSm>),
    DeliverSmResp(DeliverSmResponse),

    GenericNack(GenericNack),

    // Known command_id without a registered decoder (outbind, alert_notification, ...)
    Unknown { header: PduHeader, body: Bytes },
}

/// Registry of PDU decoders for extensible parsing
type DecoderFn =
    Box<dyn Fn(PduHeader, &mut Cursor<&[u8]>) -> Result<Frame, CodecError> + Send + Sync>;

pub struct PduRegistry {
    decoders: HashMap<CommandId, DecoderFn>,
}

impl PduRegistry {
    /// Create a new registry with every PDU this crate decodes registered
    pub fn new() -> Self {
        let mut registry = Self {
            decoders: HashMap::new(),
        };

        registry.register_pdu::<BindRequest, _>(Frame::Bind);
        registry.register_pdu::<BindResponse, _>(Frame::BindResp);
        registry.register_pdu::<Unbind, _>(Frame::Unbind);
        registry.register_pdu::<UnbindResponse, _>(Frame::UnbindResp);
        registry.register_pdu::<EnquireLink, _>(Frame::EnquireLink);
        registry.register_pdu::<EnquireLinkResponse, _>(Frame::EnquireLinkResp);
        registry.register_pdu::<GenericNack, _>(Frame::GenericNack);

        // Boxed for large structs
        registry.register_pdu::<SubmitSm, _>(|pdu| Frame::SubmitSm(Box::new(pdu)));
        registry.register_pdu::<SubmitSmResponse, _>(Frame::SubmitSmResp);
        registry.register_pdu::<SubmitMulti, _>(|pdu| Frame::SubmitMulti(Box::new(pdu)));
        registry.register_pdu::<SubmitMultiResponse, _>(Frame::SubmitMultiResp);
        registry.register_pdu::<DataSm, _>(|pdu| Frame::DataSm(Box::new(pdu)));
        registry.register_pdu::<DataSmResponse, _>(Frame::DataSmResp);
        registry.register_pdu::<QuerySm, _>(Frame::QuerySm);
        registry.register_pdu::<QuerySmResponse, _>(Frame::QuerySmResp);
        registry.register_pdu::<ReplaceSm, _>(|pdu| Frame::ReplaceSm(Box::new(pdu)));
        registry.register_pdu::<ReplaceSmResponse, _>(Frame::ReplaceSmResp);
        registry.register_pdu::<CancelSm, _>(Frame::CancelSm);
        registry.register_pdu::<CancelSmResponse, _>(Frame::CancelSmResp);
        registry.register_pdu::<DeliverSm, _>(|pdu| Frame::DeliverSm(Box::new(pdu)));
        registry.register_pdu::<DeliverSmResponse, _>(Frame::DeliverSmResp);

        registry
    }

    /// Shared registry, built on first use.
    pub fn global() -> &'static PduRegistry {
        static REGISTRY: OnceLock<PduRegistry> = OnceLock::new();
        REGISTRY.get_or_init(PduRegistry::new)
    }

    fn register_pdu<T, F>(&mut self, frame_constructor: F)
    where
        T: Decodable + 'static,
        F: Fn(T) -> Frame + Clone + Send + Sync + 'static,
    {
        for command_id in T::command_ids() {
            let constructor = frame_constructor.clone();
            let decoder = Box::new(move |header: PduHeader, buf: &mut Cursor<&[u8]>| {
                let pdu = T::decode(header, buf)?;
                Ok(constructor(pdu))
            });
            self.decoders.insert(*command_id, decoder);
        }
    }

    /// Decode a PDU body given its header. `buf` must hold exactly the body.
    pub fn decode_pdu(
        &self,
        header: PduHeader,
        buf: &mut Cursor<&[u8]>,
    ) -> Result<Frame, CodecError> {
        match self.decoders.get(&header.command_id) {
            Some(decoder) => decoder(header, buf),
            None => {
                let body = decode_bytes(buf, header.body_len())?;
                tracing::warn!(
                    command_id = ?header.command_id,
                    "no decoder registered, treating PDU as opaque data"
                );
                Ok(Frame::Unknown { header, body })
            }
        }
    }

    /// Check if a command_id is registered
    pub fn is_registered(&self, command_id: CommandId) -> bool {
        self.decoders.contains_key(&command_id)
    }

}

impl Default for PduRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Frame {
    /// Get the command_id for this frame
    pub fn command_id(&self) -> CommandId {
        match self {
            Frame::Bind(pdu) => pdu.bind_type.command_id(),
            Frame::BindResp(pdu) => pdu.bind_type.response_command_id(),
            Frame::Unbind(_) => CommandId::Unbind,
            Frame::UnbindResp(_) => CommandId::UnbindResp,
            Frame::EnquireLink(_) => CommandId::EnquireLink,
            Frame::EnquireLinkResp(_) => CommandId::EnquireLinkResp,
            Frame::SubmitSm(_) => CommandId::SubmitSm,
            Frame::SubmitSmResp(_) => CommandId::SubmitSmResp,
            Frame::SubmitMulti(_) => CommandId::SubmitMulti,
            Frame::SubmitMultiResp(_) => CommandId::SubmitMultiResp,
            Frame::DataSm(_) => CommandId::DataSm,
            Frame::DataSmResp(_) => CommandId::DataSmResp,
            Frame::QuerySm(_) => CommandId::QuerySm,
            Frame::QuerySmResp(_) => CommandId::QuerySmResp,
            Frame::ReplaceSm(_) => CommandId::ReplaceSm,
            Frame::ReplaceSmResp(_) => CommandId::ReplaceSmResp,
            Frame::CancelSm(_) => CommandId::CancelSm,
            Frame::CancelSmResp(_) => CommandId::CancelSmResp,
            Frame::DeliverSm(_) => CommandId::DeliverSm,
            Frame::DeliverSmResp(_) => CommandId::DeliverSmResp,
            Frame::GenericNack(_) => CommandId::GenericNack,
            Frame::Unknown { header, .. } => header.command_id,
        }
    }

    /// Get the sequence number for this frame
    pub fn sequence_number(&self) -> u32 {
        match self {
            Frame::Bind(pdu) => pdu.sequence_number,
            Frame::BindResp(pdu) => pdu.sequence_number,
            Frame::Unbind(pdu) => pdu.sequence_number,
            Frame::UnbindResp(pdu) => pdu.sequence_number,
            Frame::EnquireLink(pdu) => pdu.sequence_number,
            Frame::EnquireLinkResp(pdu) => pdu.sequence_number,
            Frame::SubmitSm(pdu) => pdu.sequence_number,
            Frame::SubmitSmResp(pdu) => pdu.sequence_number,
            Frame::SubmitMulti(pdu) => pdu.sequence_number,
            Frame::SubmitMultiResp(pdu) => pdu.sequence_number,
            Frame::DataSm(pdu) => pdu.sequence_number,
            Frame::DataSmResp(pdu) => pdu.sequence_number,
            Frame::QuerySm(pdu) => pdu.sequence_number,
            Frame::QuerySmResp(pdu) => pdu.sequence_number,
            Frame::ReplaceSm(pdu) => pdu.sequence_number,
            Frame::ReplaceSmResp(pdu) => pdu.sequence_number,
            Frame::CancelSm(pdu) => pdu.sequence_number,
            Frame::CancelSmResp(pdu) => pdu.sequence_number,
            Frame::DeliverSm(pdu) => pdu.sequence_number,
            Frame::DeliverSmResp(pdu) => pdu.sequence_number,
            Frame::GenericNack(pdu) => pdu.sequence_number,
            Frame::Unknown { header, .. } => header.sequence_number,
        }
    }

    /// Overwrite the sequence number; used by the session when it assigns one.
    pub fn set_sequence_number(&mut self, sequence_number: u32) {
        match self {
            Frame::Bind(pdu) => pdu.sequence_number = sequence_number,
            Frame::BindResp(pdu) => pdu.sequence_number = sequence_number,
            Frame::Unbind(pdu) => pdu.sequence_number = sequence_number,
            Frame::UnbindResp(pdu) => pdu.sequence_number = sequence_number,
            Frame::EnquireLink(pdu) => pdu.sequence_number = sequence_number,
            Frame::EnquireLinkResp(pdu) => pdu.sequence_number = sequence_number,
            Frame::SubmitSm(pdu) => pdu.sequence_number = sequence_number,
            Frame::SubmitSmResp(pdu) => pdu.sequence_number = sequence_number,
            Frame::SubmitMulti(pdu) => pdu.sequence_number = sequence_number,
            Frame::SubmitMultiResp(pdu) => pdu.sequence_number = sequence_number,
            Frame::DataSm(pdu) => pdu.sequence_number = sequence_number,
            Frame::DataSmResp(pdu) => pdu.sequence_number = sequence_number,
            Frame::QuerySm(pdu) => pdu.sequence_number = sequence_number,
            Frame::QuerySmResp(pdu) => pdu.sequence_number = sequence_number,
            Frame::ReplaceSm(pdu) => pdu.sequence_number = sequence_number,
            Frame::ReplaceSmResp(pdu) => pdu.sequence_number = sequence_number,
            Frame::CancelSm(pdu) => pdu.sequence_number = sequence_number,
            Frame::CancelSmResp(pdu) => pdu.sequence_number = sequence_number,
            Frame::DeliverSm(pdu) => pdu.sequence_number = sequence_number,
            Frame::DeliverSmResp(pdu) => pdu.sequence_number = sequence_number,
            Frame::GenericNack(pdu) => pdu.sequence_number = sequence_number,
            Frame::Unknown { header, .. } => header.sequence_number = sequence_number,
        }
    }

    /// command_status of the frame; always `Ok` for requests
    pub fn command_status(&self) -> CommandStatus {
        match self {
            Frame::BindResp(pdu) => pdu.command_status,
            Frame::UnbindResp(pdu) => pdu.command_status,
            Frame::EnquireLinkResp(pdu) => pdu.command_status,
            Frame::SubmitSmResp(pdu) => pdu.command_status,
            Frame::SubmitMultiResp(pdu) => pdu.command_status,
            Frame::DataSmResp(pdu) => pdu.command_status,
            Frame::QuerySmResp(pdu) => pdu.command_status,
            Frame::ReplaceSmResp(pdu) => pdu.command_status,
            Frame::CancelSmResp(pdu) => pdu.command_status,
            Frame::DeliverSmResp(pdu) => pdu.command_status,
            Frame::GenericNack(pdu) => pdu.command_status,
            Frame::Unknown { header, .. } => header.command_status,
            _ => CommandStatus::Ok,
        }
    }

    /// Check if this frame is a response PDU
    pub fn is_response(&self) -> bool {
        self.command_id().is_response()
    }

    /// The acknowledgement an ESME sends back for a request received from
    /// the SMSC. `None` for response frames.
    pub fn default_response(&self) -> Option<Frame> {
        let sequence_number = self.sequence_number();
        let response = match self {
            Frame::DeliverSm(_) => Frame::DeliverSmResp(DeliverSmResponse::new(sequence_number)),
            Frame::DataSm(_) => Frame::DataSmResp(DataSmResponse::new(sequence_number, "")),
            Frame::EnquireLink(_) => Frame::EnquireLinkResp(EnquireLinkResponse::new(sequence_number)),
            Frame::Unbind(_) => Frame::UnbindResp(UnbindResponse::new(sequence_number)),
            frame if frame.is_response() => return None,
            _ => Frame::GenericNack(GenericNack::invalid_command_id(sequence_number)),
        };
        Some(response)
    }

    /// Encode the frame to wire bytes.
    pub fn to_bytes(&self) -> Result<Bytes, CodecError> {
        match self {
            Frame::Bind(pdu) => pdu.to_bytes(),
            Frame::BindResp(pdu) => pdu.to_bytes(),
            Frame::Unbind(pdu) => pdu.to_bytes(),
            Frame::UnbindResp(pdu) => pdu.to_bytes(),
            Frame::EnquireLink(pdu) => pdu.to_bytes(),
            Frame::EnquireLinkResp(pdu) => pdu.to_bytes(),
            Frame::SubmitSm(pdu) => pdu.to_bytes(),
            Frame::SubmitSmResp(pdu) => pdu.to_bytes(),
            Frame::SubmitMulti(pdu) => pdu.to_bytes(),
            Frame::SubmitMultiResp(pdu) => pdu.to_bytes(),
            Frame::DataSm(pdu) => pdu.to_bytes(),
            Frame::DataSmResp(pdu) => pdu.to_bytes(),
            Frame::QuerySm(pdu) => pdu.to_bytes(),
            Frame::QuerySmResp(pdu) => pdu.to_bytes(),
            Frame::ReplaceSm(pdu) => pdu.to_bytes(),
            Frame::ReplaceSmResp(pdu) => pdu.to_bytes(),
            Frame::CancelSm(pdu) => pdu.to_bytes(),
            Frame::CancelSmResp(pdu) => pdu.to_bytes(),
            Frame::DeliverSm(pdu) => pdu.to_bytes(),
            Frame::DeliverSmResp(pdu) => pdu.to_bytes(),
            Frame::GenericNack(pdu) => pdu.to_bytes(),
            Frame::Unknown { header, body } => {
                let mut buf = BytesMut::with_capacity(PduHeader::SIZE + body.len());
                PduHeader {
                    command_length: (PduHeader::SIZE + body.len()) as u32,
                    ..header.clone()
                }
                .encode(&mut buf);
                buf.put_slice(body);
                Ok(buf.freeze())
            }
        }
    }

    /// Check whether `buf` holds a complete PDU.
    ///
    /// Returns the PDU length when it does, `Err(Incomplete)` when more data
    /// is needed.
    pub fn check(buf: &mut Cursor<&[u8]>) -> Result<usize, CodecError> {
        if buf.remaining() < PduHeader::SIZE {
            return Err(CodecError::Incomplete);
        }

        // Peek at command_length without advancing cursor
        let pos = buf.position();
        let command_length = buf.get_u32();
        buf.set_position(pos);

        if !(PduHeader::SIZE as u32..=MAX_PDU_SIZE).contains(&command_length) {
            return Err(CodecError::InvalidPduLength {
                length: command_length,
                min: PduHeader::SIZE as u32,
                max: MAX_PDU_SIZE,
            });
        }

        if buf.remaining() < command_length as usize {
            return Err(CodecError::Incomplete);
        }

        Ok(command_length as usize)
    }

    /// Parse one complete PDU. Callers run `check` first.
    pub fn parse(buf: &mut Cursor<&[u8]>) -> Result<Frame, CodecError> {
        let header = PduHeader::decode(buf)?;

        let start = buf.position() as usize;
        let end = start + header.body_len();
        let data = *buf.get_ref();
        if data.len() < end {
            return Err(CodecError::Incomplete);
        }

        // Decoders see only this PDU's body so trailing TLV parsing stops at
        // the PDU boundary.
        let mut body = Cursor::new(&data[start..end]);
        let frame = PduRegistry::global().decode_pdu(header, &mut body)?;
        buf.set_position(end as u64);

        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatypes::{BindType, Unbind};

    #[test]
    fn pdu_header_encode_decode() {
        let header = PduHeader {
            command_length: 16,
            command_id: CommandId::EnquireLink,
            command_status: CommandStatus::Ok,
            sequence_number: 42,
        };

        let mut buf = BytesMut::new();
        header.encode(&mut buf);

        let mut cursor = Cursor::new(buf.as_ref());
        let decoded = PduHeader::decode(&mut cursor).unwrap();

        assert_eq!(header, decoded);
    }

    #[test]
    fn decode_cstring_stops_at_terminator() {
        let data = b"hello\0rest";
        let mut cursor = Cursor::new(&data[..]);
        let result = decode_cstring(&mut cursor, 10, "test").unwrap();
        assert_eq!(result, "hello");
        assert_eq!(cursor.position(), 6);
    }

    #[test]
    fn decode_cstring_without_terminator_in_range() {
        let data = b"0123456789abc\0";
        let mut cursor = Cursor::new(&data[..]);
        let result = decode_cstring(&mut cursor, 6, "service_type");
        assert!(matches!(
            result,
            Err(CodecError::FieldValidation {
                field: "service_type",
                ..
            })
        ));
    }

    #[test]
    fn encode_cstring_rejects_oversized_value() {
        let mut buf = BytesMut::new();
        let result = encode_cstring(&mut buf, "123456", 6, "service_type");
        assert!(matches!(result, Err(CodecError::FieldValidation { .. })));
        assert!(buf.is_empty());

        encode_cstring(&mut buf, "12345", 6, "service_type").unwrap();
        assert_eq!(buf.as_ref(), b"12345\0");
    }

    #[test]
    fn to_bytes_patches_command_length() {
        let bytes = Unbind::new(7).to_bytes().unwrap();
        assert_eq!(bytes.len(), 16);
        assert_eq!(&bytes[0..4], &16u32.to_be_bytes());
    }

    #[test]
    fn pdu_header_validation() {
        let data: &[u8] = &[
            0x00, 0x00, 0x00, 0x08, // command_length too small
            0x00, 0x00, 0x00, 0x15, // command_id
            0x00, 0x00, 0x00, 0x00, // command_status
            0x00, 0x00, 0x00, 0x01, // sequence_number
        ];
        let mut cursor = Cursor::new(data);
        let result = PduHeader::decode(&mut cursor);
        assert!(matches!(result, Err(CodecError::InvalidPduLength { .. })));

        let data: &[u8] = &[
            0x00, 0x00, 0x00, 0x10, // command_length
            0x00, 0x00, 0x00, 0x15, // command_id
            0x00, 0x00, 0x00, 0x00, // command_status
            0x00, 0x00, 0x00, 0x00, // sequence_number (reserved)
        ];
        let mut cursor = Cursor::new(data);
        let result = PduHeader::decode(&mut cursor);
        assert!(matches!(result, Err(CodecError::ReservedSequenceNumber(0))));
    }

    #[test]
    fn check_reports_incomplete_until_whole_pdu_buffered() {
        let bytes = EnquireLink::new(3).to_bytes().unwrap();

        let mut partial = Cursor::new(&bytes[..10]);
        assert!(matches!(Frame::check(&mut partial), Err(CodecError::Incomplete)));

        let mut full = Cursor::new(bytes.as_ref());
        assert_eq!(Frame::check(&mut full).unwrap(), bytes.len());
    }

    #[test]
    fn parse_leaves_following_pdu_in_buffer() {
        let mut wire = BytesMut::new();
        wire.extend_from_slice(&EnquireLink::new(1).to_bytes().unwrap());
        wire.extend_from_slice(&Unbind::new(2).to_bytes().unwrap());

        let mut cursor = Cursor::new(wire.as_ref());
        let first = Frame::parse(&mut cursor).unwrap();
        let second = Frame::parse(&mut cursor).unwrap();

        assert!(matches!(first, Frame::EnquireLink(ref pdu) if pdu.sequence_number == 1));
        assert!(matches!(second, Frame::Unbind(ref pdu) if pdu.sequence_number == 2));
    }

    #[test]
    fn registry_decodes_unregistered_command_as_unknown() {
        let mut pdu = Vec::new();
        pdu.extend_from_slice(&20u32.to_be_bytes());
        pdu.extend_from_slice(&(CommandId::Outbind as u32).to_be_bytes());
        pdu.extend_from_slice(&0u32.to_be_bytes());
        pdu.extend_from_slice(&1u32.to_be_bytes());
        pdu.extend_from_slice(&[0x01, 0x02, 0x03, 0x04]);

        let mut cursor = Cursor::new(pdu.as_slice());
        match Frame::parse(&mut cursor).unwrap() {
            Frame::Unknown { header, body } => {
                assert_eq!(header.command_id, CommandId::Outbind);
                assert_eq!(body.as_ref(), &[0x01, 0x02, 0x03, 0x04]);
            }
            other => panic!("Expected Unknown frame, got {other:?}"),
        }
    }

    #[test]
    fn vendor_status_in_response_header_is_decoded() {
        let mut pdu = Vec::new();
        pdu.extend_from_slice(&16u32.to_be_bytes());
        pdu.extend_from_slice(&(CommandId::SubmitSmResp as u32).to_be_bytes());
        pdu.extend_from_slice(&0x0000_0400u32.to_be_bytes());
        pdu.extend_from_slice(&9u32.to_be_bytes());

        let mut cursor = Cursor::new(pdu.as_slice());
        let frame = Frame::parse(&mut cursor).unwrap();
        assert_eq!(frame.command_status(), CommandStatus::Other(0x400));
        assert_eq!(frame.sequence_number(), 9);

        // Re-encoding keeps the raw code
        assert_eq!(frame.to_bytes().unwrap().as_ref(), pdu.as_slice());
    }

    #[test]
    fn codec_errors_map_to_nack_status() {
        assert_eq!(
            CodecError::InvalidCommandId(0x99).to_command_status(),
            CommandStatus::InvalidCommandId
        );
        assert_eq!(
            CodecError::Incomplete.to_command_status(),
            CommandStatus::InvalidCommandLength
        );
        assert_eq!(
            CodecError::FieldValidation {
                field: "destination_addr",
                reason: "too long".to_string(),
            }
            .to_command_status(),
            CommandStatus::InvalidDestinationAddress
        );
        assert_eq!(
            CodecError::TlvError("truncated".to_string()).to_command_status(),
            CommandStatus::SystemError
        );
    }

    #[test]
    fn registry_has_all_bind_variants() {
        let registry = PduRegistry::new();
        for bind_type in [BindType::Transmitter, BindType::Receiver, BindType::Transceiver] {
            assert!(registry.is_registered(bind_type.command_id()));
            assert!(registry.is_registered(bind_type.response_command_id()));
        }
        assert!(!registry.is_registered(CommandId::Outbind));
    }

    #[test]
    fn default_response_for_inbound_requests() {
        let enquire = Frame::EnquireLink(EnquireLink::new(9));
        assert!(matches!(
            enquire.default_response(),
            Some(Frame::EnquireLinkResp(ref resp)) if resp.sequence_number == 9
        ));

        let unknown = Frame::Unknown {
            header: PduHeader {
                command_length: 16,
                command_id: CommandId::Outbind,
                command_status: CommandStatus::Ok,
                sequence_number: 4,
            },
            body: Bytes::new(),
        };
        assert!(matches!(
            unknown.default_response(),
            Some(Frame::GenericNack(ref nack)) if nack.command_status == CommandStatus::InvalidCommandId
        ));

        let response = Frame::UnbindResp(UnbindResponse::new(1));
        assert!(response.default_response().is_none());
    }
}
