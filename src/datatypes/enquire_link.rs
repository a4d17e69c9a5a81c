use crate::codec::{CodecError, Decodable, Encodable, PduHeader, decode_bytes, encode_header};
use crate::datatypes::{CommandId, CommandStatus};
use crate::macros::impl_complete_header_only_pdu;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::io::Cursor;

/// Link confidence check between ESME and SMSC (SMPP v3.4 Section 4.11).
///
/// Normally header only. A non-empty `payload` is appended after the header
/// as opaque liveness data. SMSCs that are strict about the PDU length may
/// reject it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnquireLink {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
    pub payload: Bytes,
}

impl EnquireLink {
    pub fn new(sequence_number: u32) -> Self {
        Self {
            command_status: CommandStatus::Ok,
            sequence_number,
            payload: Bytes::new(),
        }
    }

    pub fn with_payload(mut self, payload: impl Into<Bytes>) -> Self {
        self.payload = payload.into();
        self
    }
}

impl Encodable for EnquireLink {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        encode_header(buf, CommandId::EnquireLink, self.command_status, self.sequence_number);
        buf.put_slice(&self.payload);
        Ok(())
    }
}

impl Decodable for EnquireLink {
    fn command_ids() -> &'static [CommandId] {
        &[CommandId::EnquireLink]
    }

    fn decode(header: PduHeader, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        Self::validate_header(&header)?;
        let remaining = buf.remaining();
        let payload = decode_bytes(buf, remaining)?;

        Ok(Self {
            command_status: header.command_status,
            sequence_number: header.sequence_number,
            payload,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnquireLinkResponse {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
}

impl_complete_header_only_pdu!(EnquireLinkResponse, CommandId::EnquireLinkResp);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Frame;

    #[test]
    fn enquire_link_is_header_only_by_default() {
        let bytes = EnquireLink::new(0x10).to_bytes().unwrap();
        assert_eq!(
            bytes.as_ref(),
            &[0, 0, 0, 16, 0, 0, 0, 0x15, 0, 0, 0, 0, 0, 0, 0, 0x10]
        );
    }

    #[test]
    fn payload_follows_header() {
        let bytes = EnquireLink::new(2).with_payload("ping").to_bytes().unwrap();
        assert_eq!(bytes.len(), 20);

        let mut cursor = Cursor::new(bytes.as_ref());
        match Frame::parse(&mut cursor).unwrap() {
            Frame::EnquireLink(pdu) => assert_eq!(pdu.payload.as_ref(), b"ping"),
            other => panic!("Expected EnquireLink, got {other:?}"),
        }
    }

    #[test]
    fn body_on_header_only_response_is_rejected() {
        let header = PduHeader {
            command_length: 17,
            command_id: CommandId::EnquireLinkResp,
            command_status: CommandStatus::Ok,
            sequence_number: 1,
        };
        let body = [0u8];
        let mut cursor = Cursor::new(&body[..]);
        assert!(matches!(
            EnquireLinkResponse::decode(header, &mut cursor),
            Err(CodecError::FieldValidation { .. })
        ));
    }
}
