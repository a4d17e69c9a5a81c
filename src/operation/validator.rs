// ABOUTME: Checks an Operation against the fields its kind requires before dispatch
// ABOUTME: Driven by a static rule table; reports every missing field in one error

use super::kind::OperationKind;
use super::model::Operation;
use crate::error::{WrapperError, WrapperResult};

/// A checkable part of an `Operation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationField {
    Kind,
    Properties,
    BindType,
    Message,
    Listener,
    MessageBody,
    MessageId,
    SourceAddress,
    DestinationAddresses,
}

impl OperationField {
    /// Fields in the order they are checked and reported
    pub const ALL: [OperationField; 9] = [
        OperationField::Kind,
        OperationField::Properties,
        OperationField::BindType,
        OperationField::Message,
        OperationField::Listener,
        OperationField::MessageBody,
        OperationField::MessageId,
        OperationField::SourceAddress,
        OperationField::DestinationAddresses,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            OperationField::Kind => "kind",
            OperationField::Properties => "properties",
            OperationField::BindType => "bind_type",
            OperationField::Message => "message",
            OperationField::Listener => "listener",
            OperationField::MessageBody => "message.body",
            OperationField::MessageId => "message.id",
            OperationField::SourceAddress => "properties.source_address",
            OperationField::DestinationAddresses => "properties.destination_addresses",
        }
    }

    /// The field this one lives in. Sub-fields are only checked when their
    /// parent is present.
    pub fn parent(&self) -> Option<OperationField> {
        match self {
            OperationField::MessageBody | OperationField::MessageId => {
                Some(OperationField::Message)
            }
            OperationField::SourceAddress | OperationField::DestinationAddresses => {
                Some(OperationField::Properties)
            }
            _ => None,
        }
    }

    /// Whether an operation of `kind` must carry this field. Kind-specific
    /// rules do not apply while the kind itself is missing.
    pub fn is_required(&self, kind: Option<OperationKind>) -> bool {
        use OperationKind::*;

        match self {
            OperationField::Kind | OperationField::Properties | OperationField::BindType => true,
            OperationField::Message => kind != Some(Receive),
            OperationField::Listener => false,
            OperationField::MessageBody => matches!(
                kind,
                Some(Submit | SubmitMulti | Data | Enquire | Replace)
            ),
            OperationField::MessageId => matches!(kind, Some(Query | Replace | Cancel)),
            OperationField::SourceAddress => matches!(
                kind,
                Some(Submit | SubmitMulti | Data | Query | Replace | Cancel)
            ),
            OperationField::DestinationAddresses => {
                matches!(kind, Some(Submit | SubmitMulti | Data | Cancel))
            }
        }
    }

    fn is_present(&self, operation: &Operation) -> bool {
        match self {
            OperationField::Kind => operation.kind().is_some(),
            OperationField::Properties => operation.properties().is_some(),
            OperationField::BindType => operation.bind_type().is_some(),
            OperationField::Message => operation.has_message(),
            OperationField::Listener => operation.listener().is_some(),
            OperationField::MessageBody => operation
                .message()
                .is_some_and(|message| message.has_body()),
            OperationField::MessageId => operation
                .message()
                .is_some_and(|message| message.has_id()),
            OperationField::SourceAddress => operation
                .properties()
                .is_some_and(|properties| properties.has_source_address()),
            OperationField::DestinationAddresses => operation
                .properties()
                .is_some_and(|properties| properties.has_destination_addresses()),
        }
    }
}

/// Fail when no operation was supplied.
pub fn validate_not_null(operation: Option<&Operation>) -> WrapperResult<&Operation> {
    operation.ok_or_else(|| WrapperError::InvalidOperation {
        fields: vec!["operation"],
    })
}

/// Check every field the operation's kind requires.
pub fn validate_complete(operation: &Operation) -> WrapperResult<()> {
    let kind = operation.kind();

    let missing: Vec<&'static str> = OperationField::ALL
        .iter()
        .filter(|field| field.is_required(kind))
        .filter(|field| field.parent().is_none_or(|parent| parent.is_present(operation)))
        .filter(|field| !field.is_present(operation))
        .map(OperationField::name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(WrapperError::InvalidOperation { fields: missing })
    }
}

/// Asynchronous operations need a listener to deliver their responses to.
pub fn validate_listener(operation: &Operation) -> WrapperResult<()> {
    if operation.is_asynchronous() && operation.listener().is_none() {
        return Err(WrapperError::InvalidOperation {
            fields: vec![OperationField::Listener.name()],
        });
    }
    Ok(())
}
