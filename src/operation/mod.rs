// ABOUTME: Declarative description of an SMPP operation and the checks run before dispatch
// ABOUTME: Builds the request PDU that the facade hands to the session

mod kind;
mod message;
mod model;
mod properties;
pub mod request;
pub mod validator;

pub use kind::OperationKind;
pub use message::Message;
pub use model::{Operation, OperationBuilder};
pub use properties::{Address, OperationProperties, OperationPropertiesBuilder};
pub use request::{OperationRequest, build_request};
pub use validator::{OperationField, validate_complete, validate_listener, validate_not_null};
