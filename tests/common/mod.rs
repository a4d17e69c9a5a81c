// ABOUTME: Shared fixtures for integration tests: a scripted in-memory session and a TCP SMSC simulator
// ABOUTME: The simulator speaks real SMPP over the crate's own frame reader and writer

#![allow(dead_code)]

use smpp_wrapper::connection::{FrameReader, FrameWriter};
use smpp_wrapper::datatypes::{
    BindRequest, BindResponse, BindType, CancelSm, CancelSmResponse, CommandStatus, DataSm,
    DataSmResponse, EnquireLink, EnquireLinkResponse, QuerySm, QuerySmResponse, ReplaceSm,
    ReplaceSmResponse, SubmitMulti, SubmitMultiResponse, SubmitSm, SubmitSmResponse,
    UnbindResponse,
};
use smpp_wrapper::{
    Address, EventListener, Frame, Message, Operation, OperationKind, OperationProperties,
    SmppError, SmppResult, SmppSession,
};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub const ADDRESS: &str = "5529094190";
pub const BODY: &str = "test";
pub const POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Install a test subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

pub fn properties() -> OperationProperties {
    OperationProperties::builder()
        .source_address(ADDRESS)
        .destination_addresses([Address::new(ADDRESS)])
        .build()
}

pub fn operation(kind: OperationKind, bind_type: BindType) -> Operation {
    Operation::builder()
        .kind(kind)
        .bind_type(bind_type)
        .properties(properties())
        .message(Message::new(BODY))
        .build()
}

pub fn async_operation(kind: OperationKind, listener: &Arc<EventListener>) -> Operation {
    Operation::builder_from(&operation(kind, BindType::Transceiver))
        .asynchronous(true)
        .listener(Arc::clone(listener))
        .build()
}

/// In-memory session with call counters and scripted failures.
///
/// Synchronous calls answer immediately. Asynchronous calls answer on a
/// spawned task by queueing the response on the listener.
#[derive(Default, Debug)]
pub struct MockSession {
    pub bind_calls: AtomicUsize,
    pub bind_async_calls: AtomicUsize,
    pub unbind_calls: AtomicUsize,
    pub operation_calls: AtomicUsize,
    sequence: AtomicU32,
    bind_status: Mutex<Option<CommandStatus>>,
    bind_delay: Mutex<Option<Duration>>,
    fail_unbind: Mutex<bool>,
    fail_operations: Mutex<Option<CommandStatus>>,
    registered_listener: Mutex<Option<Arc<EventListener>>>,
    inbound: Mutex<Vec<Frame>>,
    pub sent: Mutex<Vec<Frame>>,
    pub responded: Mutex<Vec<Frame>>,
}

impl MockSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every bind with `status`
    pub fn reject_binds(&self, status: CommandStatus) {
        *self.bind_status.lock().unwrap() = Some(status);
    }

    pub fn delay_binds(&self, delay: Duration) {
        *self.bind_delay.lock().unwrap() = Some(delay);
    }

    pub fn fail_unbinds(&self) {
        *self.fail_unbind.lock().unwrap() = true;
    }

    pub fn fail_operations(&self, status: CommandStatus) {
        *self.fail_operations.lock().unwrap() = Some(status);
    }

    /// Queue a request for `receive` to return
    pub fn push_inbound(&self, frame: Frame) {
        self.inbound.lock().unwrap().push(frame);
    }

    pub fn registered_listener(&self) -> Option<Arc<EventListener>> {
        self.registered_listener.lock().unwrap().clone()
    }

    fn next_sequence_number(&self) -> u32 {
        self.sequence.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn record(&self, frame: Frame) -> SmppResult<u32> {
        self.operation_calls.fetch_add(1, Ordering::Relaxed);
        if let Some(status) = *self.fail_operations.lock().unwrap() {
            return Err(SmppError::Protocol(status));
        }
        self.sent.lock().unwrap().push(frame);
        Ok(self.next_sequence_number())
    }

    fn deliver_later(&self, listener: Arc<EventListener>, response: Frame) {
        tokio::spawn(async move {
            tokio::task::yield_now().await;
            listener.enqueue_event(response.into());
        });
    }

    async fn answer_bind(&self, request: BindRequest) -> SmppResult<BindResponse> {
        let delay = *self.bind_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let sequence_number = self.next_sequence_number();
        let status = *self.bind_status.lock().unwrap();
        Ok(match status {
            Some(status) => BindResponse::error(request.bind_type, sequence_number, status),
            None => BindResponse::new(request.bind_type, sequence_number, "MOCK"),
        })
    }
}

fn message_id(sequence_number: u32) -> String {
    format!("mock-{sequence_number}")
}

impl SmppSession for MockSession {
    async fn bind(&self, request: BindRequest) -> SmppResult<BindResponse> {
        self.bind_calls.fetch_add(1, Ordering::Relaxed);
        self.answer_bind(request).await
    }

    async fn bind_async(
        &self,
        request: BindRequest,
        listener: Option<Arc<EventListener>>,
    ) -> SmppResult<BindResponse> {
        self.bind_async_calls.fetch_add(1, Ordering::Relaxed);
        *self.registered_listener.lock().unwrap() = listener;
        self.answer_bind(request).await
    }

    async fn unbind(&self) -> SmppResult<UnbindResponse> {
        self.unbind_calls.fetch_add(1, Ordering::Relaxed);
        if *self.fail_unbind.lock().unwrap() {
            return Err(SmppError::ConnectionClosed);
        }
        Ok(UnbindResponse::new(self.next_sequence_number()))
    }

    async fn submit(&self, request: SubmitSm) -> SmppResult<SubmitSmResponse> {
        let seq = self.record(Frame::SubmitSm(Box::new(request)))?;
        Ok(SubmitSmResponse::new(seq, message_id(seq)))
    }

    async fn submit_async(&self, request: SubmitSm, listener: Arc<EventListener>) -> SmppResult<()> {
        let seq = self.record(Frame::SubmitSm(Box::new(request)))?;
        self.deliver_later(
            listener,
            Frame::SubmitSmResp(SubmitSmResponse::new(seq, message_id(seq))),
        );
        Ok(())
    }

    async fn submit_multi(&self, request: SubmitMulti) -> SmppResult<SubmitMultiResponse> {
        let seq = self.record(Frame::SubmitMulti(Box::new(request)))?;
        Ok(SubmitMultiResponse::new(seq, message_id(seq)))
    }

    async fn submit_multi_async(
        &self,
        request: SubmitMulti,
        listener: Arc<EventListener>,
    ) -> SmppResult<()> {
        let seq = self.record(Frame::SubmitMulti(Box::new(request)))?;
        self.deliver_later(
            listener,
            Frame::SubmitMultiResp(SubmitMultiResponse::new(seq, message_id(seq))),
        );
        Ok(())
    }

    async fn data(&self, request: DataSm) -> SmppResult<DataSmResponse> {
        let seq = self.record(Frame::DataSm(Box::new(request)))?;
        Ok(DataSmResponse::new(seq, message_id(seq)))
    }

    async fn data_async(&self, request: DataSm, listener: Arc<EventListener>) -> SmppResult<()> {
        let seq = self.record(Frame::DataSm(Box::new(request)))?;
        self.deliver_later(
            listener,
            Frame::DataSmResp(DataSmResponse::new(seq, message_id(seq))),
        );
        Ok(())
    }

    async fn query(&self, request: QuerySm) -> SmppResult<QuerySmResponse> {
        let id = request.message_id.clone();
        let seq = self.record(Frame::QuerySm(request))?;
        Ok(QuerySmResponse::new(seq, id, 2))
    }

    async fn query_async(&self, request: QuerySm, listener: Arc<EventListener>) -> SmppResult<()> {
        let id = request.message_id.clone();
        let seq = self.record(Frame::QuerySm(request))?;
        self.deliver_later(listener, Frame::QuerySmResp(QuerySmResponse::new(seq, id, 2)));
        Ok(())
    }

    async fn replace(&self, request: ReplaceSm) -> SmppResult<ReplaceSmResponse> {
        let seq = self.record(Frame::ReplaceSm(Box::new(request)))?;
        Ok(ReplaceSmResponse::new(seq))
    }

    async fn replace_async(&self, request: ReplaceSm, listener: Arc<EventListener>) -> SmppResult<()> {
        let seq = self.record(Frame::ReplaceSm(Box::new(request)))?;
        self.deliver_later(listener, Frame::ReplaceSmResp(ReplaceSmResponse::new(seq)));
        Ok(())
    }

    async fn cancel(&self, request: CancelSm) -> SmppResult<CancelSmResponse> {
        let seq = self.record(Frame::CancelSm(request))?;
        Ok(CancelSmResponse::new(seq))
    }

    async fn cancel_async(&self, request: CancelSm, listener: Arc<EventListener>) -> SmppResult<()> {
        let seq = self.record(Frame::CancelSm(request))?;
        self.deliver_later(listener, Frame::CancelSmResp(CancelSmResponse::new(seq)));
        Ok(())
    }

    async fn enquire_link(&self, request: EnquireLink) -> SmppResult<EnquireLinkResponse> {
        let seq = self.record(Frame::EnquireLink(request))?;
        Ok(EnquireLinkResponse::new(seq))
    }

    async fn enquire_link_async(
        &self,
        request: EnquireLink,
        listener: Arc<EventListener>,
    ) -> SmppResult<()> {
        let seq = self.record(Frame::EnquireLink(request))?;
        self.deliver_later(listener, Frame::EnquireLinkResp(EnquireLinkResponse::new(seq)));
        Ok(())
    }

    async fn receive(&self, timeout: Option<Duration>) -> SmppResult<Option<Frame>> {
        let next = {
            let mut inbound = self.inbound.lock().unwrap();
            (!inbound.is_empty()).then(|| inbound.remove(0))
        };
        if next.is_none() {
            match timeout {
                Some(limit) => tokio::time::sleep(limit).await,
                None => std::future::pending::<()>().await,
            }
        }
        Ok(next)
    }

    async fn respond(&self, response: Frame) -> SmppResult<()> {
        self.responded.lock().unwrap().push(response);
        Ok(())
    }
}

/// A single-connection SMSC that answers every request with success.
///
/// Message ids are `smsc-<sequence_number>`. Frames pushed through `inject`
/// are written to the client; responses the client sends back are collected
/// in `acknowledged`.
pub struct Smsc {
    pub addr: SocketAddr,
    inject: mpsc::UnboundedSender<Frame>,
    pub acknowledged: Arc<Mutex<Vec<Frame>>>,
    pub binds: Arc<AtomicUsize>,
    task: JoinHandle<()>,
}

impl Smsc {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (inject, mut injected) = mpsc::unbounded_channel::<Frame>();
        let acknowledged = Arc::new(Mutex::new(Vec::new()));
        let binds = Arc::new(AtomicUsize::new(0));

        let acks = Arc::clone(&acknowledged);
        let bind_count = Arc::clone(&binds);
        let task = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let (read, write) = socket.into_split();
            let mut reader = FrameReader::new(read);
            let mut writer = FrameWriter::new(write);

            loop {
                tokio::select! {
                    frame = reader.read_frame() => {
                        let Ok(Some(frame)) = frame else { break };
                        if frame.is_response() {
                            acks.lock().unwrap().push(frame);
                            continue;
                        }
                        if let Frame::Bind(_) = frame {
                            bind_count.fetch_add(1, Ordering::Relaxed);
                        }
                        let response = answer(&frame);
                        if writer.write_frame(&response).await.is_err() {
                            break;
                        }
                    }
                    Some(frame) = injected.recv() => {
                        if writer.write_frame(&frame).await.is_err() {
                            break;
                        }
                    }
                }
            }
        });

        Self {
            addr,
            inject,
            acknowledged,
            binds,
            task,
        }
    }

    /// Send an SMSC-initiated request to the client
    pub fn inject(&self, frame: Frame) {
        self.inject.send(frame).unwrap();
    }

    pub fn acknowledged(&self) -> Vec<Frame> {
        self.acknowledged.lock().unwrap().clone()
    }
}

impl Drop for Smsc {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn answer(request: &Frame) -> Frame {
    let seq = request.sequence_number();
    let id = format!("smsc-{seq}");
    match request {
        Frame::Bind(bind) => Frame::BindResp(BindResponse::new(bind.bind_type, seq, "SIM")),
        Frame::Unbind(_) => Frame::UnbindResp(UnbindResponse::new(seq)),
        Frame::EnquireLink(_) => Frame::EnquireLinkResp(EnquireLinkResponse::new(seq)),
        Frame::SubmitSm(_) => Frame::SubmitSmResp(SubmitSmResponse::new(seq, id)),
        Frame::SubmitMulti(_) => Frame::SubmitMultiResp(SubmitMultiResponse::new(seq, id)),
        Frame::DataSm(_) => Frame::DataSmResp(DataSmResponse::new(seq, id)),
        Frame::QuerySm(query) => {
            Frame::QuerySmResp(QuerySmResponse::new(seq, query.message_id.clone(), 2))
        }
        Frame::ReplaceSm(_) => Frame::ReplaceSmResp(ReplaceSmResponse::new(seq)),
        Frame::CancelSm(_) => Frame::CancelSmResp(CancelSmResponse::new(seq)),
        other => other
            .default_response()
            .unwrap_or_else(|| Frame::EnquireLinkResp(EnquireLinkResponse::new(seq))),
    }
}
