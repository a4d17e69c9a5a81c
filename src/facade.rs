// ABOUTME: Single entry point that validates operations, binds on demand and dispatches them
// ABOUTME: execute handles every outbound kind; receive handles inbound PDUs from the SMSC

use crate::binding::BindingManager;
use crate::client::{SmppResult, SmppSession};
use crate::codec::Frame;
use crate::datatypes::{
    CancelSmResponse, CommandStatus, DataSmResponse, EnquireLinkResponse, QuerySmResponse,
    ReplaceSmResponse, SubmitMultiResponse, SubmitSmResponse,
};
use crate::error::{WrapperError, WrapperResult};
use crate::listener::{Event, EventListener};
use crate::operation::{
    Operation, OperationKind, OperationRequest, build_request, validate_complete,
    validate_listener, validate_not_null,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Response PDU returned by a synchronous `execute`
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Submit(SubmitSmResponse),
    SubmitMulti(SubmitMultiResponse),
    Data(DataSmResponse),
    Query(QuerySmResponse),
    Replace(ReplaceSmResponse),
    Cancel(CancelSmResponse),
    Enquire(EnquireLinkResponse),
}

impl Response {
    pub fn kind(&self) -> OperationKind {
        match self {
            Response::Submit(_) => OperationKind::Submit,
            Response::SubmitMulti(_) => OperationKind::SubmitMulti,
            Response::Data(_) => OperationKind::Data,
            Response::Query(_) => OperationKind::Query,
            Response::Replace(_) => OperationKind::Replace,
            Response::Cancel(_) => OperationKind::Cancel,
            Response::Enquire(_) => OperationKind::Enquire,
        }
    }

    /// SMSC message id, for the kinds whose response carries one
    pub fn message_id(&self) -> Option<&str> {
        match self {
            Response::Submit(r) => Some(&r.message_id),
            Response::SubmitMulti(r) => Some(&r.message_id),
            Response::Data(r) => Some(&r.message_id),
            Response::Query(r) => Some(&r.message_id),
            Response::Replace(_) | Response::Cancel(_) | Response::Enquire(_) => None,
        }
    }

    pub fn command_status(&self) -> CommandStatus {
        match self {
            Response::Submit(r) => r.command_status,
            Response::SubmitMulti(r) => r.command_status,
            Response::Data(r) => r.command_status,
            Response::Query(r) => r.command_status,
            Response::Replace(r) => r.command_status,
            Response::Cancel(r) => r.command_status,
            Response::Enquire(r) => r.command_status,
        }
    }

    pub fn sequence_number(&self) -> u32 {
        match self {
            Response::Submit(r) => r.sequence_number,
            Response::SubmitMulti(r) => r.sequence_number,
            Response::Data(r) => r.sequence_number,
            Response::Query(r) => r.sequence_number,
            Response::Replace(r) => r.sequence_number,
            Response::Cancel(r) => r.sequence_number,
            Response::Enquire(r) => r.sequence_number,
        }
    }
}

/// Runs operations against the session owned by a `BindingManager`.
///
/// Every call validates the operation, binds the session if needed, then
/// talks to the SMSC. Nothing is retried.
///
/// ```no_run
/// use smpp_wrapper::{
///     BindCredentials, BindingManager, Message, Operation, OperationFacade, OperationKind,
///     OperationProperties, SessionOptions, TcpSession,
/// };
/// use smpp_wrapper::datatypes::BindType;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let session = TcpSession::connect("localhost:2775", SessionOptions::default()).await?;
/// let binding = Arc::new(BindingManager::new(BindCredentials::new("esme", "secret"), session));
/// let facade = OperationFacade::new(binding);
///
/// let operation = Operation::builder()
///     .kind(OperationKind::Submit)
///     .bind_type(BindType::Transmitter)
///     .properties(
///         OperationProperties::builder()
///             .source_address("5529094190")
///             .destination_address("5529094191")
///             .build(),
///     )
///     .message(Message::new("hello"))
///     .build();
///
/// if let Some(response) = facade.execute(&operation).await? {
///     println!("message id: {:?}", response.message_id());
/// }
/// # Ok(())
/// # }
/// ```
pub struct OperationFacade<S> {
    binding: Arc<BindingManager<S>>,
}

impl<S: SmppSession> OperationFacade<S> {
    pub fn new(binding: Arc<BindingManager<S>>) -> Self {
        Self { binding }
    }

    pub fn binding(&self) -> &Arc<BindingManager<S>> {
        &self.binding
    }

    /// Carry out any operation except Receive.
    ///
    /// Synchronous operations resolve with the SMSC response. Asynchronous
    /// ones resolve with `None` once the request is written; the response is
    /// queued on the operation's listener.
    pub async fn execute<'a>(
        &self,
        operation: impl Into<Option<&'a Operation>>,
    ) -> WrapperResult<Option<Response>> {
        let operation = validate(operation.into())?;
        let kind = kind_of(operation)?;
        if kind == OperationKind::Receive {
            return Err(WrapperError::UnsupportedOperation {
                kind,
                entry_point: "execute",
            });
        }

        let request = build_request(operation)?;
        let session = self.binding.bind(operation).await?;

        let listener = operation
            .listener()
            .filter(|_| operation.is_asynchronous())
            .cloned();
        debug!(%kind, asynchronous = listener.is_some(), "dispatching operation");

        let outcome = match listener {
            Some(listener) => dispatch_async(session.as_ref(), request, listener)
                .await
                .map(|()| None),
            None => dispatch(session.as_ref(), request).await.map(Some),
        };

        outcome.map_err(|source| {
            error!(%kind, error = %source, "operation failed");
            WrapperError::Operation { kind, source }
        })
    }

    /// Take the next request PDU the SMSC sent and acknowledge it.
    ///
    /// Waits up to the listener's poll interval when it is positive, else up
    /// to the operation's receive timeout, else until something arrives.
    /// `Ok(None)` means nothing arrived in time.
    pub async fn receive<'a>(
        &self,
        operation: impl Into<Option<&'a Operation>>,
    ) -> WrapperResult<Option<Event>> {
        let operation = validate(operation.into())?;
        let kind = kind_of(operation)?;
        if kind != OperationKind::Receive {
            return Err(WrapperError::UnsupportedOperation {
                kind,
                entry_point: "receive",
            });
        }

        let session = self.binding.bind(operation).await?;
        let timeout = receive_timeout(operation);

        let event = match operation.listener().filter(|_| operation.is_asynchronous()) {
            Some(listener) => {
                if !self.binding.routes_to(listener).await {
                    warn!("listener was not registered at bind, SMSC requests will not reach it");
                }
                dequeue_request(listener, timeout).await
            }
            None => {
                if timeout.is_none() {
                    warn!("receive will wait until the SMSC sends a request");
                }
                session
                    .receive(timeout)
                    .await
                    .map_err(|source| WrapperError::Operation { kind, source })?
                    .map(Event::new)
            }
        };

        let Some(event) = event else {
            debug!(?timeout, "nothing received");
            return Ok(None);
        };

        if let Some(ack) = event.frame().default_response() {
            debug!(
                command_id = ?event.frame().command_id(),
                sequence_number = event.frame().sequence_number(),
                "acknowledging request"
            );
            let acknowledged = session.respond(ack).await;
            // The SMSC considers the session unbound once it has sent unbind
            if let Frame::Unbind(_) = event.frame() {
                self.binding.release().await;
            }
            acknowledged.map_err(|source| {
                error!(error = %source, "failed to acknowledge request");
                WrapperError::Operation { kind, source }
            })?;
        }

        Ok(Some(event))
    }
}

impl<S> std::fmt::Debug for OperationFacade<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationFacade")
            .field("binding", &self.binding)
            .finish()
    }
}

fn validate(operation: Option<&Operation>) -> WrapperResult<&Operation> {
    let operation = validate_not_null(operation)?;
    validate_complete(operation)?;
    validate_listener(operation)?;
    Ok(operation)
}

fn kind_of(operation: &Operation) -> WrapperResult<OperationKind> {
    operation
        .kind()
        .ok_or_else(|| WrapperError::InvalidOperation {
            fields: vec!["kind"],
        })
}

fn receive_timeout(operation: &Operation) -> Option<Duration> {
    operation
        .listener()
        .map(|listener| listener.poll_interval())
        .filter(|interval| !interval.is_zero())
        .or_else(|| operation.properties().and_then(|p| p.receive_timeout))
}

async fn dequeue_request(listener: &EventListener, timeout: Option<Duration>) -> Option<Event> {
    match timeout {
        Some(limit) if limit != listener.poll_interval() => {
            tokio::time::timeout(limit, listener.dequeue_request_event())
                .await
                .ok()
                .flatten()
        }
        _ => listener.dequeue_request_event().await,
    }
}

async fn dispatch<S: SmppSession>(session: &S, request: OperationRequest) -> SmppResult<Response> {
    let response = match request {
        OperationRequest::Submit(pdu) => Response::Submit(session.submit(pdu).await?),
        OperationRequest::SubmitMulti(pdu) => {
            Response::SubmitMulti(session.submit_multi(pdu).await?)
        }
        OperationRequest::Data(pdu) => Response::Data(session.data(pdu).await?),
        OperationRequest::Query(pdu) => Response::Query(session.query(pdu).await?),
        OperationRequest::Replace(pdu) => Response::Replace(session.replace(pdu).await?),
        OperationRequest::Cancel(pdu) => Response::Cancel(session.cancel(pdu).await?),
        OperationRequest::Enquire(pdu) => Response::Enquire(session.enquire_link(pdu).await?),
    };
    Ok(response)
}

async fn dispatch_async<S: SmppSession>(
    session: &S,
    request: OperationRequest,
    listener: Arc<EventListener>,
) -> SmppResult<()> {
    match request {
        OperationRequest::Submit(pdu) => session.submit_async(pdu, listener).await,
        OperationRequest::SubmitMulti(pdu) => session.submit_multi_async(pdu, listener).await,
        OperationRequest::Data(pdu) => session.data_async(pdu, listener).await,
        OperationRequest::Query(pdu) => session.query_async(pdu, listener).await,
        OperationRequest::Replace(pdu) => session.replace_async(pdu, listener).await,
        OperationRequest::Cancel(pdu) => session.cancel_async(pdu, listener).await,
        OperationRequest::Enquire(pdu) => session.enquire_link_async(pdu, listener).await,
    }
}
