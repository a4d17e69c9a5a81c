// ABOUTME: Error type returned by the binding manager and the operation facade
// ABOUTME: Wraps session transport failures with the step that produced them

use crate::client::SmppError;
use crate::operation::OperationKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WrapperError {
    /// The operation is missing parts its kind requires. Every offending
    /// field is listed.
    #[error("Invalid operation, missing: {}", .fields.join(", "))]
    InvalidOperation { fields: Vec<&'static str> },

    #[error("Bind failed: {0}")]
    Bind(#[source] SmppError),

    #[error("Unbind failed: {0}")]
    Unbind(#[source] SmppError),

    /// The session rejected or failed a dispatched operation
    #[error("{kind} operation failed: {source}")]
    Operation {
        kind: OperationKind,
        #[source]
        source: SmppError,
    },

    /// The operation kind is handled by the other facade entry point
    #[error("{kind} operations are not accepted by {entry_point}")]
    UnsupportedOperation {
        kind: OperationKind,
        entry_point: &'static str,
    },
}

pub type WrapperResult<T> = Result<T, WrapperError>;

impl WrapperError {
    /// Fields reported by a validation failure, empty for other errors.
    pub fn invalid_fields(&self) -> &[&'static str] {
        match self {
            WrapperError::InvalidOperation { fields } => fields,
            _ => &[],
        }
    }

    /// The underlying session error, if any
    pub fn session_error(&self) -> Option<&SmppError> {
        match self {
            WrapperError::Bind(e) | WrapperError::Unbind(e) => Some(e),
            WrapperError::Operation { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatypes::CommandStatus;

    #[test]
    fn invalid_operation_lists_every_field() {
        let err = WrapperError::InvalidOperation {
            fields: vec!["message.id", "properties.source_address"],
        };
        assert_eq!(
            err.to_string(),
            "Invalid operation, missing: message.id, properties.source_address"
        );
        assert_eq!(err.invalid_fields().len(), 2);
    }

    #[test]
    fn operation_error_keeps_the_session_cause() {
        let err = WrapperError::Operation {
            kind: OperationKind::Cancel,
            source: SmppError::Protocol(CommandStatus::CancelSmFailed),
        };
        assert_eq!(
            err.session_error().and_then(SmppError::command_status),
            Some(CommandStatus::CancelSmFailed)
        );
        assert!(err.to_string().starts_with("Cancel operation failed"));
    }
}
