// ABOUTME: Tag-Length-Value optional parameters appended to SMPP PDU bodies
// ABOUTME: Provides the well-known tags used by message PDUs and TLV encoding

use crate::codec::{CodecError, decode_bytes, decode_u16};
use bytes::{BufMut, Bytes, BytesMut};
use std::io::Cursor;

/// Optional parameter tags (SMPP v3.4 Section 5.3.2) used by this crate.
pub mod tags {
    pub const DEST_ADDR_SUBUNIT: u16 = 0x0005;
    pub const SOURCE_ADDR_SUBUNIT: u16 = 0x000D;
    pub const RECEIPTED_MESSAGE_ID: u16 = 0x001E;
    pub const USER_MESSAGE_REFERENCE: u16 = 0x0204;
    pub const SOURCE_PORT: u16 = 0x020A;
    pub const DESTINATION_PORT: u16 = 0x020B;
    pub const SAR_MSG_REF_NUM: u16 = 0x020C;
    pub const SAR_TOTAL_SEGMENTS: u16 = 0x020E;
    pub const SAR_SEGMENT_SEQNUM: u16 = 0x020F;
    pub const PAYLOAD_TYPE: u16 = 0x0019;
    pub const MESSAGE_PAYLOAD: u16 = 0x0424;
    pub const MESSAGE_STATE: u16 = 0x0427;
    pub const ALERT_ON_MESSAGE_DELIVERY: u16 = 0x130C;
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tlv {
    /// The Tag field is used to uniquely identify the particular optional parameter in question.
    pub tag: u16,

    /// The Value field contains the actual data for the optional parameter in question.
    /// Its length is written as the TLV Length field.
    pub value: Bytes,
}

impl Tlv {
    pub fn new(tag: u16, value: impl Into<Bytes>) -> Self {
        Self {
            tag,
            value: value.into(),
        }
    }

    /// A TLV with no value, used for flag parameters such as
    /// alert_on_message_delivery.
    pub fn flag(tag: u16) -> Self {
        Self::new(tag, Bytes::new())
    }

    pub fn message_payload(payload: impl Into<Bytes>) -> Self {
        Self::new(tags::MESSAGE_PAYLOAD, payload)
    }

    pub fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        let length = u16::try_from(self.value.len()).map_err(|_| {
            CodecError::TlvError(format!(
                "value of tag {:#06x} is {} octets, limit is {}",
                self.tag,
                self.value.len(),
                u16::MAX
            ))
        })?;

        buf.put_u16(self.tag);
        buf.put_u16(length);
        buf.put_slice(&self.value);
        Ok(())
    }

    pub fn decode(buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        let tag = decode_u16(buf).map_err(|_| CodecError::TlvError("truncated tag".into()))?;
        let length =
            decode_u16(buf).map_err(|_| CodecError::TlvError(format!("truncated length for tag {tag:#06x}")))?;
        let value = decode_bytes(buf, length as usize).map_err(|_| {
            CodecError::TlvError(format!("value of tag {tag:#06x} shorter than {length} octets"))
        })?;

        Ok(Self { tag, value })
    }
}

/// Find the first TLV with the given tag.
pub fn find_tlv(tlvs: &[Tlv], tag: u16) -> Option<&Tlv> {
    tlvs.iter().find(|tlv| tlv.tag == tag)
}

pub(crate) fn encode_tlvs(tlvs: &[Tlv], buf: &mut BytesMut) -> Result<(), CodecError> {
    for tlv in tlvs {
        tlv.encode(buf)?;
    }
    Ok(())
}
