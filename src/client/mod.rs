// ABOUTME: SMPP session layer: transport contract, TCP implementation and their supporting types
// ABOUTME: The orchestration core only depends on the SmppSession trait exported here

//! SMPP Session Module
//!
//! * `SmppSession` - the transport contract used by the binding manager and
//!   operation facade. Native async trait methods, one synchronous and one
//!   listener-driven variant per request PDU.
//! * `TcpSession` - tokio TCP implementation with a reader task that
//!   correlates responses and routes unsolicited PDUs.
//! * `BindCredentials` / `SessionOptions` - builder-style configuration.
//!
//! ```rust,no_run
//! use smpp_wrapper::client::{BindCredentials, SessionOptions, SmppSession, TcpSession};
//! use smpp_wrapper::datatypes::BindType;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let session = TcpSession::connect("localhost:2775", SessionOptions::default()).await?;
//! let credentials = BindCredentials::new("system_id", "password");
//! session.bind(credentials.bind_request(BindType::Transmitter)).await?;
//! session.unbind().await?;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod error;
pub mod session;
pub mod traits;
pub mod types;

pub use builder::SessionOptions;
pub use error::{SmppError, SmppResult};
pub use session::TcpSession;
pub use traits::SmppSession;
pub use types::BindCredentials;
