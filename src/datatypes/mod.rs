// ABOUTME: SMPP v3.4 PDU definitions and the field types shared between them
// ABOUTME: Each PDU module implements the Encodable/Decodable codec traits

mod bind;
mod cancel_sm;
mod command_id;
mod command_status;
mod data_sm;
mod deliver_sm;
mod enquire_link;
mod generic_nack;
mod interface_version;
mod numeric_plan_indicator;
mod priority_flag;
mod query_sm;
mod replace_sm;
mod submit_multi;
mod submit_sm;
pub mod tlv;
mod type_of_number;
mod unbind;

pub use bind::{BindRequest, BindResponse, BindType};
pub use cancel_sm::{CancelSm, CancelSmResponse};
pub use command_id::CommandId;
pub use command_status::CommandStatus;
pub use data_sm::{DataSm, DataSmResponse};
pub use deliver_sm::{DeliverSm, DeliverSmResponse};
pub use enquire_link::{EnquireLink, EnquireLinkResponse};
pub use generic_nack::GenericNack;
pub use interface_version::InterfaceVersion;
pub use numeric_plan_indicator::NumericPlanIndicator;
pub use priority_flag::PriorityFlag;
pub use query_sm::{QuerySm, QuerySmResponse};
pub use replace_sm::{ReplaceSm, ReplaceSmResponse};
pub use submit_multi::{DestinationAddress, SubmitMulti, SubmitMultiResponse, UnsuccessfulDelivery};
pub use submit_sm::{SubmitSm, SubmitSmResponse};
pub use tlv::Tlv;
pub use type_of_number::TypeOfNumber;
pub use unbind::{Unbind, UnbindResponse};

use crate::codec::{CodecError, decode_cstring, decode_u8, encode_cstring};
use bytes::{BufMut, BytesMut};
use std::io::Cursor;

// SMPP v3.4 C-Octet String limits, including the null terminator
pub const MAX_SYSTEM_ID_LENGTH: usize = 16;
pub const MAX_PASSWORD_LENGTH: usize = 9;
pub const MAX_SYSTEM_TYPE_LENGTH: usize = 13;
pub const MAX_ADDRESS_RANGE_LENGTH: usize = 41;
pub const MAX_SERVICE_TYPE_LENGTH: usize = 6;
pub const MAX_ADDRESS_LENGTH: usize = 21;
pub const MAX_TIME_LENGTH: usize = 17;
pub const MAX_MESSAGE_ID_LENGTH: usize = 65;
pub const MAX_DL_NAME_LENGTH: usize = 21;

/// Maximum short_message octets; longer content goes in message_payload.
pub const MAX_SHORT_MESSAGE_LENGTH: usize = 254;

/// A TON/NPI/address triple as laid out on the wire.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SmeAddress {
    pub ton: TypeOfNumber,
    pub npi: NumericPlanIndicator,
    pub addr: String,
}

impl SmeAddress {
    pub fn new(ton: TypeOfNumber, npi: NumericPlanIndicator, addr: impl Into<String>) -> Self {
        Self {
            ton,
            npi,
            addr: addr.into(),
        }
    }

    pub(crate) fn encode(&self, buf: &mut BytesMut, field: &'static str) -> Result<(), CodecError> {
        buf.put_u8(self.ton as u8);
        buf.put_u8(self.npi as u8);
        encode_cstring(buf, &self.addr, MAX_ADDRESS_LENGTH, field)
    }

    // Unassigned TON/NPI values decode as Unknown rather than failing the PDU
    pub(crate) fn decode(buf: &mut Cursor<&[u8]>, field: &'static str) -> Result<Self, CodecError> {
        let ton = TypeOfNumber::try_from(decode_u8(buf)?).unwrap_or_default();
        let npi = NumericPlanIndicator::try_from(decode_u8(buf)?).unwrap_or_default();
        let addr = decode_cstring(buf, MAX_ADDRESS_LENGTH, field)?;
        Ok(Self { ton, npi, addr })
    }
}

pub(crate) fn decode_priority(buf: &mut Cursor<&[u8]>) -> Result<PriorityFlag, CodecError> {
    let raw = decode_u8(buf)?;
    PriorityFlag::try_from(raw).map_err(|_| CodecError::FieldValidation {
        field: "priority_flag",
        reason: format!("reserved priority level {raw}"),
    })
}

/// Write sm_length followed by the short_message octets.
pub(crate) fn encode_short_message(buf: &mut BytesMut, short_message: &[u8]) -> Result<(), CodecError> {
    if short_message.len() > MAX_SHORT_MESSAGE_LENGTH {
        return Err(CodecError::FieldValidation {
            field: "short_message",
            reason: format!(
                "{} octets exceeds maximum of {MAX_SHORT_MESSAGE_LENGTH}, use message_payload",
                short_message.len()
            ),
        });
    }
    buf.put_u8(short_message.len() as u8);
    buf.put_slice(short_message);
    Ok(())
}

pub(crate) fn decode_short_message(buf: &mut Cursor<&[u8]>) -> Result<bytes::Bytes, CodecError> {
    let sm_length = decode_u8(buf)? as usize;
    crate::codec::decode_bytes(buf, sm_length)
}
