// ABOUTME: Maps a validated Operation onto the SMPP request PDU for its kind
// ABOUTME: Sequence numbers are left at zero for the session to assign

use super::kind::OperationKind;
use super::message::Message;
use super::model::Operation;
use super::properties::{Address, OperationProperties};
use crate::datatypes::{
    CancelSm, DataSm, EnquireLink, MAX_SHORT_MESSAGE_LENGTH, QuerySm, ReplaceSm, SmeAddress,
    SubmitMulti, SubmitSm, Tlv,
};
use crate::error::{WrapperError, WrapperResult};
use bytes::Bytes;

/// Request PDU built for one operation, ready for the session.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationRequest {
    Submit(SubmitSm),
    SubmitMulti(SubmitMulti),
    Data(DataSm),
    Query(QuerySm),
    Replace(ReplaceSm),
    Cancel(CancelSm),
    Enquire(EnquireLink),
}

impl OperationRequest {
    pub fn kind(&self) -> OperationKind {
        match self {
            OperationRequest::Submit(_) => OperationKind::Submit,
            OperationRequest::SubmitMulti(_) => OperationKind::SubmitMulti,
            OperationRequest::Data(_) => OperationKind::Data,
            OperationRequest::Query(_) => OperationKind::Query,
            OperationRequest::Replace(_) => OperationKind::Replace,
            OperationRequest::Cancel(_) => OperationKind::Cancel,
            OperationRequest::Enquire(_) => OperationKind::Enquire,
        }
    }
}

/// Build the request PDU for `operation`.
///
/// Expects an operation that passed `validate_complete`; anything still
/// missing is reported as `InvalidOperation`. Receive has no request PDU and
/// is reported as unsupported.
pub fn build_request(operation: &Operation) -> WrapperResult<OperationRequest> {
    let kind = operation.kind().ok_or_else(|| missing("kind"))?;
    let properties = operation.properties().ok_or_else(|| missing("properties"))?;
    let message = operation.message().unwrap_or_default();

    let request = match kind {
        OperationKind::Submit => {
            let mut pdu = SubmitSm::new(source(properties)?, destination(properties)?, Bytes::new());
            pdu.service_type = properties.service_type.clone();
            pdu.esm_class = properties.esm_class;
            pdu.protocol_id = properties.protocol_id;
            pdu.priority_flag = properties.priority_flag;
            pdu.schedule_delivery_time = properties.schedule_delivery_time.clone();
            pdu.validity_period = properties.validity_period.clone();
            pdu.registered_delivery = properties.registered_delivery;
            pdu.replace_if_present_flag = properties.replace_if_present_flag;
            pdu.data_coding = properties.data_coding;
            pdu.sm_default_msg_id = properties.sm_default_msg_id;
            place_user_data(body(&message), &mut pdu.short_message, &mut pdu.tlvs);
            OperationRequest::Submit(pdu)
        }
        OperationKind::SubmitMulti => {
            let destinations = properties.destination_addresses.iter().map(Address::to_sme);
            let mut pdu = SubmitMulti::new(source(properties)?, destinations, Bytes::new());
            pdu.service_type = properties.service_type.clone();
            pdu.esm_class = properties.esm_class;
            pdu.protocol_id = properties.protocol_id;
            pdu.priority_flag = properties.priority_flag;
            pdu.schedule_delivery_time = properties.schedule_delivery_time.clone();
            pdu.validity_period = properties.validity_period.clone();
            pdu.registered_delivery = properties.registered_delivery;
            pdu.replace_if_present_flag = properties.replace_if_present_flag;
            pdu.data_coding = properties.data_coding;
            pdu.sm_default_msg_id = properties.sm_default_msg_id;
            place_user_data(body(&message), &mut pdu.short_message, &mut pdu.tlvs);
            OperationRequest::SubmitMulti(pdu)
        }
        OperationKind::Data => {
            let mut pdu = DataSm::new(source(properties)?, destination(properties)?)
                .with_payload(body(&message))
                .with_alert_on_delivery();
            pdu.service_type = properties.service_type.clone();
            pdu.esm_class = properties.esm_class;
            pdu.registered_delivery = properties.registered_delivery;
            pdu.data_coding = properties.data_coding;
            OperationRequest::Data(pdu)
        }
        OperationKind::Query => {
            OperationRequest::Query(QuerySm::new(message_id(&message)?, source(properties)?))
        }
        OperationKind::Replace => {
            let mut pdu = ReplaceSm::new(message_id(&message)?, source(properties)?, body(&message));
            pdu.schedule_delivery_time = properties.schedule_delivery_time.clone();
            pdu.validity_period = properties.validity_period.clone();
            pdu.registered_delivery = properties.registered_delivery;
            pdu.sm_default_msg_id = properties.sm_default_msg_id;
            OperationRequest::Replace(pdu)
        }
        OperationKind::Cancel => {
            let mut pdu = CancelSm::new(
                message_id(&message)?,
                source(properties)?,
                destination(properties)?,
            );
            pdu.service_type = properties.service_type.clone();
            OperationRequest::Cancel(pdu)
        }
        OperationKind::Enquire => OperationRequest::Enquire(EnquireLink::new(0).with_payload(body(&message))),
        OperationKind::Receive => {
            return Err(WrapperError::UnsupportedOperation {
                kind,
                entry_point: "execute",
            });
        }
    };

    Ok(request)
}

/// Short bodies travel in short_message; longer ones in message_payload.
fn place_user_data(data: Bytes, short_message: &mut Bytes, tlvs: &mut Vec<Tlv>) {
    if data.len() > MAX_SHORT_MESSAGE_LENGTH {
        tlvs.push(Tlv::message_payload(data));
    } else {
        *short_message = data;
    }
}

fn body(message: &Message) -> Bytes {
    Bytes::copy_from_slice(message.body().unwrap_or_default().as_bytes())
}

fn message_id(message: &Message) -> WrapperResult<String> {
    message
        .id()
        .filter(|id| !id.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| missing("message.id"))
}

fn source(properties: &OperationProperties) -> WrapperResult<SmeAddress> {
    properties
        .source_address
        .as_ref()
        .map(Address::to_sme)
        .ok_or_else(|| missing("properties.source_address"))
}

fn destination(properties: &OperationProperties) -> WrapperResult<SmeAddress> {
    properties
        .destination_address()
        .map(Address::to_sme)
        .ok_or_else(|| missing("properties.destination_addresses"))
}

fn missing(field: &'static str) -> WrapperError {
    WrapperError::InvalidOperation {
        fields: vec![field],
    }
}
