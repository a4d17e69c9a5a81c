//! Operation orchestration for SMPP v3.4 clients.
//!
//! An [`Operation`] describes what to do (submit, query, cancel, ...), how to
//! address it and whether to wait for the SMSC's answer. The
//! [`OperationFacade`] validates it, has the [`BindingManager`] bind the
//! session on first use, and dispatches the matching request PDU.
//! Asynchronous answers and SMSC-initiated requests are queued on an
//! [`EventListener`] for application tasks to pick up.
//!
//! ## Sending and following up
//!
//! ```rust,no_run
//! use smpp_wrapper::datatypes::BindType;
//! use smpp_wrapper::{
//!     BindCredentials, BindingManager, Message, Operation, OperationFacade, OperationKind,
//!     OperationProperties, SessionOptions, TcpSession,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = TcpSession::connect("localhost:2775", SessionOptions::default()).await?;
//!     let credentials = BindCredentials::new("system_id", "password");
//!     let binding = Arc::new(BindingManager::new(credentials, session));
//!     let facade = OperationFacade::new(Arc::clone(&binding));
//!
//!     let submit = Operation::builder()
//!         .kind(OperationKind::Submit)
//!         .bind_type(BindType::Transmitter)
//!         .properties(
//!             OperationProperties::builder()
//!                 .source_address("5529094190")
//!                 .destination_address("5529094191")
//!                 .registered_delivery(1u8)
//!                 .build(),
//!         )
//!         .message(Message::new("Hello, World!"))
//!         .build();
//!
//!     let response = facade.execute(&submit).await?;
//!     if let Some(id) = response.as_ref().and_then(|r| r.message_id()) {
//!         // The query shares the submit's message, so it sees the id
//!         submit.set_message_id(id);
//!         let query = Operation::builder_from(&submit)
//!             .kind(OperationKind::Query)
//!             .build();
//!         facade.execute(&query).await?;
//!     }
//!
//!     binding.unbind().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Receiving with a listener
//!
//! ```rust,no_run
//! use smpp_wrapper::datatypes::BindType;
//! use smpp_wrapper::{
//!     BindCredentials, BindingManager, EventListener, Operation, OperationFacade,
//!     OperationKind, OperationProperties, SessionOptions, TcpSession,
//! };
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = TcpSession::connect("localhost:2775", SessionOptions::default()).await?;
//!     let binding = Arc::new(BindingManager::new(
//!         BindCredentials::new("system_id", "password"),
//!         session,
//!     ));
//!     let facade = OperationFacade::new(binding);
//!
//!     let listener = Arc::new(EventListener::with_poll_interval(Duration::from_secs(1)));
//!     let receive = Operation::builder()
//!         .kind(OperationKind::Receive)
//!         .bind_type(BindType::Receiver)
//!         .properties(OperationProperties::default())
//!         .asynchronous(true)
//!         .listener(listener)
//!         .build();
//!
//!     while let Some(event) = facade.receive(&receive).await? {
//!         println!("received {:?}", event.frame().command_id());
//!     }
//!     Ok(())
//! }
//! ```

mod macros;

pub mod binding;
pub mod client;
pub mod codec;
pub mod connection;
pub mod datatypes;
pub mod error;
pub mod facade;
pub mod listener;
pub mod operation;

// Re-export codec types for direct access
pub use codec::{CodecError, Decodable, Encodable, Frame, PduHeader, PduRegistry};

// Session layer
pub use client::{BindCredentials, SessionOptions, SmppError, SmppResult, SmppSession, TcpSession};

// Orchestration core
pub use binding::{BindState, BindingManager};
pub use error::{WrapperError, WrapperResult};
pub use facade::{OperationFacade, Response};
pub use listener::{Event, EventClass, EventListener};
pub use operation::{
    Address, Message, Operation, OperationBuilder, OperationKind, OperationProperties,
    OperationPropertiesBuilder,
};
