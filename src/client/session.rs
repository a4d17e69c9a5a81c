// ABOUTME: Tokio TCP implementation of SmppSession with a dedicated frame reader task
// ABOUTME: Correlates responses by sequence number and routes unsolicited PDUs to listeners

use crate::client::builder::SessionOptions;
use crate::client::error::{SmppError, SmppResult};
use crate::client::traits::SmppSession;
use crate::codec::Frame;
use crate::connection::{self, ConnectionError, FrameReader, FrameWriter};
use crate::datatypes::{
    BindRequest, BindResponse, CancelSm, CancelSmResponse, CommandId, CommandStatus, DataSm,
    DataSmResponse, EnquireLink, EnquireLinkResponse, GenericNack, QuerySm, QuerySmResponse, ReplaceSm,
    ReplaceSmResponse, SubmitMulti, SubmitMultiResponse, SubmitSm, SubmitSmResponse, Unbind,
    UnbindResponse,
};
use crate::listener::{Event, EventListener};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex as StdMutex, MutexGuard};
use std::time::Duration;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::sync::{Mutex, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

type Writer = Arc<Mutex<FrameWriter<OwnedWriteHalf>>>;

/// Who is waiting for the response to an outstanding request
enum Pending {
    Sync(oneshot::Sender<Frame>),
    Async(Arc<EventListener>),
}

/// Outstanding requests; `open` turns false once the reader stops
struct PendingTable {
    open: bool,
    calls: HashMap<u32, Pending>,
}

/// State shared between the session handle and its reader task
struct Shared {
    pending: StdMutex<PendingTable>,
    listener: StdMutex<Option<Arc<EventListener>>>,
    // Taken on close so blocked `receive` calls observe the shutdown
    inbound: StdMutex<Option<mpsc::UnboundedSender<Frame>>>,
}

// Poisoning is ignored: every critical section is a single map or slot update
fn lock<T>(mutex: &StdMutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Shared {
    fn register(&self, sequence_number: u32, pending: Pending) -> SmppResult<()> {
        let mut table = lock(&self.pending);
        if !table.open {
            return Err(SmppError::ConnectionClosed);
        }
        table.calls.insert(sequence_number, pending);
        Ok(())
    }

    fn forget(&self, sequence_number: u32) {
        lock(&self.pending).calls.remove(&sequence_number);
    }

    fn take(&self, sequence_number: u32) -> Option<Pending> {
        lock(&self.pending).calls.remove(&sequence_number)
    }

    /// Drop an asynchronous entry the SMSC never answered. Returns whether
    /// it was still outstanding.
    fn expire(&self, sequence_number: u32, listener: &Arc<EventListener>) -> bool {
        let mut table = lock(&self.pending);
        let unanswered = matches!(
            table.calls.get(&sequence_number),
            Some(Pending::Async(waiting)) if Arc::ptr_eq(waiting, listener)
        );
        if unanswered {
            table.calls.remove(&sequence_number);
        }
        unanswered
    }

    fn outstanding(&self) -> usize {
        lock(&self.pending).calls.len()
    }

    fn listener(&self) -> Option<Arc<EventListener>> {
        lock(&self.listener).clone()
    }

    /// Fail every outstanding call and wake blocked receivers.
    fn close(&self) {
        lock(&self.inbound).take();
        let dropped = {
            let mut table = lock(&self.pending);
            table.open = false;
            table.calls.drain().count()
        };
        if dropped > 0 {
            warn!(outstanding = dropped, "session closed with requests in flight");
        }
    }

    /// Handle a PDU that could not be decoded. A response fails the call
    /// that is waiting for it; a request is answered with `nack`.
    async fn reject(&self, command_id: u32, nack: Frame, writer: &Writer) {
        let sequence_number = nack.sequence_number();
        if command_id & 0x8000_0000 != 0 {
            match self.take(sequence_number) {
                Some(Pending::Sync(sender)) => {
                    let _ = sender.send(nack);
                }
                Some(Pending::Async(listener)) => listener.enqueue_event(Event::new(nack)),
                None => debug!(sequence_number, "undecodable response matched no request"),
            }
            return;
        }

        if let Err(e) = writer.lock().await.write_frame(&nack).await {
            warn!(error = %e, "failed to send generic_nack");
        }
    }

    async fn route(&self, frame: Frame, writer: &Writer) {
        let sequence_number = frame.sequence_number();

        if frame.is_response() {
            match self.take(sequence_number) {
                Some(Pending::Sync(sender)) => {
                    // The caller may have timed out and gone away
                    let _ = sender.send(frame);
                }
                Some(Pending::Async(listener)) => listener.enqueue_event(Event::new(frame)),
                None => match self.listener() {
                    Some(listener) => listener.enqueue_event(Event::new(frame)),
                    None => warn!(
                        command_id = ?frame.command_id(),
                        sequence_number,
                        "dropping response with no outstanding request"
                    ),
                },
            }
            return;
        }

        if let Some(listener) = self.listener() {
            listener.enqueue_event(Event::new(frame));
            return;
        }

        if let Frame::EnquireLink(_) = frame {
            debug!(sequence_number, "answering enquire_link from SMSC");
            let response = Frame::EnquireLinkResp(EnquireLinkResponse::new(sequence_number));
            if let Err(e) = writer.lock().await.write_frame(&response).await {
                warn!(error = %e, "failed to answer enquire_link");
            }
            return;
        }

        match lock(&self.inbound).as_ref() {
            Some(inbound) => {
                let _ = inbound.send(frame);
            }
            None => warn!(sequence_number, "session closed, dropping inbound request"),
        }
    }
}

/// SMPP session over a single TCP connection.
///
/// Requests may be issued from many tasks at once; writes are serialized and
/// responses are matched back to callers by sequence number. Dropping the
/// session stops its reader task.
pub struct TcpSession {
    shared: Arc<Shared>,
    writer: Writer,
    inbound: Mutex<mpsc::UnboundedReceiver<Frame>>,
    sequence: AtomicU32,
    options: SessionOptions,
    reader_task: JoinHandle<()>,
}

impl TcpSession {
    /// Connect to an SMSC and start the reader task. No bind is performed.
    pub async fn connect<A: ToSocketAddrs>(addr: A, options: SessionOptions) -> SmppResult<Self> {
        let socket = TcpStream::connect(addr).await?;
        socket.set_nodelay(true)?;
        if let Ok(peer) = socket.peer_addr() {
            info!(%peer, "connected to SMSC");
        }

        let (reader, writer) = connection::split(socket, options.read_buffer_capacity);
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();

        let shared = Arc::new(Shared {
            pending: StdMutex::new(PendingTable {
                open: true,
                calls: HashMap::new(),
            }),
            listener: StdMutex::new(None),
            inbound: StdMutex::new(Some(inbound_tx)),
        });
        let writer = Arc::new(Mutex::new(writer));

        let reader_task = tokio::spawn(read_loop(reader, Arc::clone(&shared), Arc::clone(&writer)));

        Ok(Self {
            shared,
            writer,
            inbound: Mutex::new(inbound_rx),
            sequence: AtomicU32::new(1),
            options,
            reader_task,
        })
    }

    /// Next sequence number, skipping the reserved values 0 and 0xFFFFFFFF.
    pub fn next_sequence_number(&self) -> u32 {
        loop {
            let candidate = self.sequence.fetch_add(1, Ordering::Relaxed);
            if candidate != 0 && candidate != u32::MAX {
                return candidate;
            }
        }
    }

    /// Whether the reader task is still running.
    pub fn is_connected(&self) -> bool {
        !self.reader_task.is_finished()
    }

    /// Shut down the write side; the reader task ends once the SMSC closes.
    pub async fn close(&self) -> SmppResult<()> {
        self.writer.lock().await.shutdown().await?;
        Ok(())
    }

    async fn write(&self, frame: &Frame) -> SmppResult<()> {
        debug!(
            command_id = ?frame.command_id(),
            sequence_number = frame.sequence_number(),
            "sending PDU"
        );
        self.writer.lock().await.write_frame(frame).await?;
        Ok(())
    }

    /// Send a request and wait for its response.
    async fn call(&self, mut frame: Frame) -> SmppResult<Frame> {
        let sequence_number = self.next_sequence_number();
        frame.set_sequence_number(sequence_number);

        let (sender, receiver) = oneshot::channel();
        self.shared.register(sequence_number, Pending::Sync(sender))?;

        if let Err(e) = self.write(&frame).await {
            self.shared.forget(sequence_number);
            return Err(e);
        }

        let response = match tokio::time::timeout(self.options.response_timeout, receiver).await {
            Ok(Ok(response)) => response,
            Ok(Err(_)) => return Err(SmppError::ConnectionClosed),
            Err(_) => {
                self.shared.forget(sequence_number);
                warn!(
                    command_id = ?frame.command_id(),
                    sequence_number,
                    timeout = ?self.options.response_timeout,
                    "no response from SMSC"
                );
                return Err(SmppError::Timeout);
            }
        };

        let status = response.command_status();
        if status != CommandStatus::Ok {
            return Err(SmppError::Protocol(status));
        }
        if let Frame::GenericNack(_) = response {
            return Err(SmppError::Protocol(CommandStatus::UnknownError));
        }
        Ok(response)
    }

    /// Send a request whose response goes to `listener`.
    async fn call_async(&self, mut frame: Frame, listener: Arc<EventListener>) -> SmppResult<()> {
        let sequence_number = self.next_sequence_number();
        frame.set_sequence_number(sequence_number);

        self.shared
            .register(sequence_number, Pending::Async(Arc::clone(&listener)))?;

        if let Err(e) = self.write(&frame).await {
            self.shared.forget(sequence_number);
            return Err(e);
        }

        let shared = Arc::clone(&self.shared);
        let limit = self.options.response_timeout;
        let command_id = frame.command_id();
        tokio::spawn(async move {
            tokio::time::sleep(limit).await;
            if shared.expire(sequence_number, &listener) {
                warn!(
                    ?command_id,
                    sequence_number,
                    timeout = ?limit,
                    "no response from SMSC, asynchronous request expired"
                );
            }
        });
        Ok(())
    }

    /// Requests written and still waiting for a response.
    pub fn outstanding_requests(&self) -> usize {
        self.shared.outstanding()
    }
}

impl Drop for TcpSession {
    fn drop(&mut self) {
        self.reader_task.abort();
    }
}

async fn read_loop(
    mut reader: FrameReader<OwnedReadHalf>,
    shared: Arc<Shared>,
    writer: Writer,
) {
    loop {
        match reader.read_frame().await {
            Ok(Some(frame)) => shared.route(frame, &writer).await,
            Ok(None) => {
                info!("SMSC closed the connection");
                break;
            }
            Err(ConnectionError::Malformed {
                command_id,
                sequence_number,
                source,
            }) => {
                warn!(
                    command_id = format_args!("{command_id:#010x}"),
                    sequence_number,
                    error = %source,
                    "undecodable PDU from SMSC"
                );
                let nack = Frame::GenericNack(GenericNack::new(
                    source.to_command_status(),
                    sequence_number,
                ));
                shared.reject(command_id, nack, &writer).await;
            }
            Err(e) => {
                warn!(error = %e, "reader stopped");
                break;
            }
        }
    }
    shared.close();
}

/// Extract the expected response variant or report what arrived instead.
macro_rules! expect_response {
    ($frame:expr, $variant:path, $command_id:expr) => {
        match $frame {
            $variant(response) => Ok(response),
            other => Err(SmppError::UnexpectedPdu {
                expected: $command_id,
                actual: other.command_id(),
            }),
        }
    };
}

impl SmppSession for TcpSession {
    async fn bind(&self, request: BindRequest) -> SmppResult<BindResponse> {
        let expected = request.bind_type.response_command_id();
        let response = self.call(Frame::Bind(request)).await?;
        expect_response!(response, Frame::BindResp, expected)
    }

    async fn bind_async(
        &self,
        request: BindRequest,
        listener: Option<Arc<EventListener>>,
    ) -> SmppResult<BindResponse> {
        if let Some(listener) = listener {
            *lock(&self.shared.listener) = Some(listener);
        }
        self.bind(request).await
    }

    async fn unbind(&self) -> SmppResult<UnbindResponse> {
        let response = self.call(Frame::Unbind(Unbind::new(0))).await?;
        expect_response!(response, Frame::UnbindResp, CommandId::UnbindResp)
    }

    async fn submit(&self, request: SubmitSm) -> SmppResult<SubmitSmResponse> {
        let response = self.call(Frame::SubmitSm(Box::new(request))).await?;
        expect_response!(response, Frame::SubmitSmResp, CommandId::SubmitSmResp)
    }

    async fn submit_async(&self, request: SubmitSm, listener: Arc<EventListener>) -> SmppResult<()> {
        self.call_async(Frame::SubmitSm(Box::new(request)), listener)
            .await
    }

    async fn submit_multi(&self, request: SubmitMulti) -> SmppResult<SubmitMultiResponse> {
        let response = self.call(Frame::SubmitMulti(Box::new(request))).await?;
        expect_response!(response, Frame::SubmitMultiResp, CommandId::SubmitMultiResp)
    }

    async fn submit_multi_async(
        &self,
        request: SubmitMulti,
        listener: Arc<EventListener>,
    ) -> SmppResult<()> {
        self.call_async(Frame::SubmitMulti(Box::new(request)), listener)
            .await
    }

    async fn data(&self, request: DataSm) -> SmppResult<DataSmResponse> {
        let response = self.call(Frame::DataSm(Box::new(request))).await?;
        expect_response!(response, Frame::DataSmResp, CommandId::DataSmResp)
    }

    async fn data_async(&self, request: DataSm, listener: Arc<EventListener>) -> SmppResult<()> {
        self.call_async(Frame::DataSm(Box::new(request)), listener)
            .await
    }

    async fn query(&self, request: QuerySm) -> SmppResult<QuerySmResponse> {
        let response = self.call(Frame::QuerySm(request)).await?;
        expect_response!(response, Frame::QuerySmResp, CommandId::QuerySmResp)
    }

    async fn query_async(&self, request: QuerySm, listener: Arc<EventListener>) -> SmppResult<()> {
        self.call_async(Frame::QuerySm(request), listener).await
    }

    async fn replace(&self, request: ReplaceSm) -> SmppResult<ReplaceSmResponse> {
        let response = self.call(Frame::ReplaceSm(Box::new(request))).await?;
        expect_response!(response, Frame::ReplaceSmResp, CommandId::ReplaceSmResp)
    }

    async fn replace_async(&self, request: ReplaceSm, listener: Arc<EventListener>) -> SmppResult<()> {
        self.call_async(Frame::ReplaceSm(Box::new(request)), listener)
            .await
    }

    async fn cancel(&self, request: CancelSm) -> SmppResult<CancelSmResponse> {
        let response = self.call(Frame::CancelSm(request)).await?;
        expect_response!(response, Frame::CancelSmResp, CommandId::CancelSmResp)
    }

    async fn cancel_async(&self, request: CancelSm, listener: Arc<EventListener>) -> SmppResult<()> {
        self.call_async(Frame::CancelSm(request), listener).await
    }

    async fn enquire_link(&self, request: EnquireLink) -> SmppResult<EnquireLinkResponse> {
        let response = self.call(Frame::EnquireLink(request)).await?;
        expect_response!(response, Frame::EnquireLinkResp, CommandId::EnquireLinkResp)
    }

    async fn enquire_link_async(
        &self,
        request: EnquireLink,
        listener: Arc<EventListener>,
    ) -> SmppResult<()> {
        self.call_async(Frame::EnquireLink(request), listener).await
    }

    async fn receive(&self, timeout: Option<Duration>) -> SmppResult<Option<Frame>> {
        let mut inbound = self.inbound.lock().await;

        let frame = match timeout {
            Some(limit) => match tokio::time::timeout(limit, inbound.recv()).await {
                Ok(frame) => frame,
                Err(_) => return Ok(None),
            },
            None => inbound.recv().await,
        };

        frame.map(Some).ok_or(SmppError::ConnectionClosed)
    }

    async fn respond(&self, response: Frame) -> SmppResult<()> {
        self.write(&response).await
    }
}
