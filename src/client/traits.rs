// ABOUTME: Session transport contract consumed by the binding manager and operation facade
// ABOUTME: One synchronous and one listener-driven asynchronous call per request PDU

use crate::client::error::SmppResult;
use crate::codec::Frame;
use crate::datatypes::{
    BindRequest, BindResponse, CancelSm, CancelSmResponse, DataSm, DataSmResponse, EnquireLink,
    EnquireLinkResponse, QuerySm, QuerySmResponse, ReplaceSm, ReplaceSmResponse, SubmitMulti,
    SubmitMultiResponse, SubmitSm, SubmitSmResponse, UnbindResponse,
};
use crate::listener::EventListener;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// An established connection to an SMSC.
///
/// Synchronous calls resolve with the matching response PDU. A response with
/// a non-zero command_status resolves to `SmppError::Protocol`.
///
/// `_async` calls resolve as soon as the request is written; the response is
/// later queued on the given listener as a response event. Sequence numbers
/// are assigned by the session; the value carried by the request is ignored.
pub trait SmppSession: Send + Sync {
    /// Bind and wait for the bind response.
    fn bind(&self, request: BindRequest) -> impl Future<Output = SmppResult<BindResponse>> + Send;

    /// Bind and register `listener` to receive every unsolicited request and
    /// unmatched response from then on.
    fn bind_async(
        &self,
        request: BindRequest,
        listener: Option<Arc<EventListener>>,
    ) -> impl Future<Output = SmppResult<BindResponse>> + Send;

    fn unbind(&self) -> impl Future<Output = SmppResult<UnbindResponse>> + Send;

    fn submit(&self, request: SubmitSm) -> impl Future<Output = SmppResult<SubmitSmResponse>> + Send;

    fn submit_async(
        &self,
        request: SubmitSm,
        listener: Arc<EventListener>,
    ) -> impl Future<Output = SmppResult<()>> + Send;

    fn submit_multi(
        &self,
        request: SubmitMulti,
    ) -> impl Future<Output = SmppResult<SubmitMultiResponse>> + Send;

    fn submit_multi_async(
        &self,
        request: SubmitMulti,
        listener: Arc<EventListener>,
    ) -> impl Future<Output = SmppResult<()>> + Send;

    fn data(&self, request: DataSm) -> impl Future<Output = SmppResult<DataSmResponse>> + Send;

    fn data_async(
        &self,
        request: DataSm,
        listener: Arc<EventListener>,
    ) -> impl Future<Output = SmppResult<()>> + Send;

    fn query(&self, request: QuerySm) -> impl Future<Output = SmppResult<QuerySmResponse>> + Send;

    fn query_async(
        &self,
        request: QuerySm,
        listener: Arc<EventListener>,
    ) -> impl Future<Output = SmppResult<()>> + Send;

    fn replace(
        &self,
        request: ReplaceSm,
    ) -> impl Future<Output = SmppResult<ReplaceSmResponse>> + Send;

    fn replace_async(
        &self,
        request: ReplaceSm,
        listener: Arc<EventListener>,
    ) -> impl Future<Output = SmppResult<()>> + Send;

    fn cancel(&self, request: CancelSm) -> impl Future<Output = SmppResult<CancelSmResponse>> + Send;

    fn cancel_async(
        &self,
        request: CancelSm,
        listener: Arc<EventListener>,
    ) -> impl Future<Output = SmppResult<()>> + Send;

    fn enquire_link(
        &self,
        request: EnquireLink,
    ) -> impl Future<Output = SmppResult<EnquireLinkResponse>> + Send;

    fn enquire_link_async(
        &self,
        request: EnquireLink,
        listener: Arc<EventListener>,
    ) -> impl Future<Output = SmppResult<()>> + Send;

    /// Next unsolicited request from the SMSC. `None` timeout waits
    /// indefinitely; `Ok(None)` means nothing arrived in time.
    fn receive(
        &self,
        timeout: Option<Duration>,
    ) -> impl Future<Output = SmppResult<Option<Frame>>> + Send;

    /// Send a response to a request received from the SMSC. The frame keeps
    /// its own sequence number.
    fn respond(&self, response: Frame) -> impl Future<Output = SmppResult<()>> + Send;
}
