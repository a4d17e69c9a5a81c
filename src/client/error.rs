// ABOUTME: Session transport error types shared by every SmppSession implementation
// ABOUTME: Converts socket, codec and protocol failures into one SmppError

use crate::codec::CodecError;
use crate::connection::ConnectionError;
use crate::datatypes::{CommandId, CommandStatus};
use std::io;
use thiserror::Error;

/// Failure of a single session transport call
#[derive(Debug, Error)]
pub enum SmppError {
    /// I/O error during network operations (connection, read, write)
    #[error("Connection error: {0}")]
    Connection(#[from] io::Error),

    /// A PDU could not be encoded or a received one could not be decoded
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// SMSC answered with a non-zero command_status or a generic_nack
    #[error("Protocol error: {0}")]
    Protocol(CommandStatus),

    /// No response within the session's response timeout
    #[error("Operation timeout")]
    Timeout,

    /// Unexpected PDU received (wrong response type for request)
    #[error("Unexpected PDU: expected {expected:?}, got {actual:?}")]
    UnexpectedPdu {
        expected: CommandId,
        actual: CommandId,
    },

    /// Connection closed while a call was outstanding
    #[error("Connection closed unexpectedly")]
    ConnectionClosed,

    /// Data validation error (missing fields, malformed arguments)
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type alias for SMPP operations
pub type SmppResult<T> = Result<T, SmppError>;

impl From<ConnectionError> for SmppError {
    fn from(err: ConnectionError) -> Self {
        match err {
            ConnectionError::Io(e) => SmppError::Connection(e),
            ConnectionError::Codec(e) => SmppError::Codec(e),
            ConnectionError::Malformed { source, .. } => SmppError::Codec(source),
            ConnectionError::Reset => SmppError::ConnectionClosed,
        }
    }
}

impl SmppError {
    /// The SMSC status behind this error, if the SMSC reported one.
    pub fn command_status(&self) -> Option<CommandStatus> {
        match self {
            SmppError::Protocol(status) => Some(*status),
            _ => None,
        }
    }
}
