// ABOUTME: Task-safe event queue that hands inbound SMSC frames to application tasks
// ABOUTME: Requests and responses are queued separately and dequeued with a bounded wait

use crate::codec::Frame;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time::Instant;
use tracing::{debug, warn};

/// Protocol class of an inbound frame, derived from the command_id response bit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventClass {
    /// Initiated by the SMSC (deliver_sm, data_sm, enquire_link, unbind, ...)
    Request,
    /// Answer to a request this side sent asynchronously
    Response,
}

/// A frame received from the SMSC, ready for a consumer task.
#[derive(Debug, Clone)]
pub struct Event {
    frame: Frame,
    class: EventClass,
    received_at: Instant,
}

impl Event {
    pub fn new(frame: Frame) -> Self {
        let class = if frame.is_response() {
            EventClass::Response
        } else {
            EventClass::Request
        };
        Self {
            frame,
            class,
            received_at: Instant::now(),
        }
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn into_frame(self) -> Frame {
        self.frame
    }

    pub fn class(&self) -> EventClass {
        self.class
    }

    pub fn is_request(&self) -> bool {
        self.class == EventClass::Request
    }

    pub fn received_at(&self) -> Instant {
        self.received_at
    }
}

impl From<Frame> for Event {
    fn from(frame: Frame) -> Self {
        Event::new(frame)
    }
}

// Saturates at roughly 584 years
fn as_nanos(interval: Duration) -> u64 {
    u64::try_from(interval.as_nanos()).unwrap_or(u64::MAX)
}

struct EventQueue {
    sender: UnboundedSender<Event>,
    receiver: Mutex<UnboundedReceiver<Event>>,
    pending: AtomicUsize,
}

impl EventQueue {
    fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            sender,
            receiver: Mutex::new(receiver),
            pending: AtomicUsize::new(0),
        }
    }

    fn push(&self, event: Event) {
        self.pending.fetch_add(1, Ordering::Relaxed);
        if self.sender.send(event).is_err() {
            // The receiver lives as long as the queue, so this only happens
            // while the listener is being torn down.
            self.pending.fetch_sub(1, Ordering::Relaxed);
            warn!("event queue closed, dropping event");
        }
    }

    async fn pop(&self, wait: Option<Duration>) -> Option<Event> {
        let next = async { self.receiver.lock().await.recv().await };

        let event = match wait {
            Some(limit) => tokio::time::timeout(limit, next).await.ok().flatten(),
            None => next.await,
        };

        if event.is_some() {
            self.pending.fetch_sub(1, Ordering::Relaxed);
        }
        event
    }

    fn len(&self) -> usize {
        self.pending.load(Ordering::Relaxed)
    }
}

/// Receives asynchronous events from a session and queues them for
/// application tasks.
///
/// Each queued event is handed to exactly one dequeuer. A poll interval of
/// zero makes the dequeue calls wait until an event arrives.
pub struct EventListener {
    poll_interval_nanos: AtomicU64,
    requests: EventQueue,
    responses: EventQueue,
}

impl EventListener {
    pub fn new() -> Self {
        Self::with_poll_interval(Duration::ZERO)
    }

    pub fn with_poll_interval(interval: Duration) -> Self {
        Self {
            poll_interval_nanos: AtomicU64::new(as_nanos(interval)),
            requests: EventQueue::new(),
            responses: EventQueue::new(),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_nanos(self.poll_interval_nanos.load(Ordering::Relaxed))
    }

    pub fn set_poll_interval(&self, interval: Duration) {
        self.poll_interval_nanos
            .store(as_nanos(interval), Ordering::Relaxed);
    }

    /// Queue an event on the request or response side according to its class.
    pub fn enqueue_event(&self, event: Event) {
        debug!(
            class = ?event.class(),
            command_id = ?event.frame().command_id(),
            sequence_number = event.frame().sequence_number(),
            "event received"
        );

        match event.class() {
            EventClass::Request => self.requests.push(event),
            EventClass::Response => self.responses.push(event),
        }
    }

    /// Oldest queued request, waiting up to the poll interval.
    pub async fn dequeue_request_event(&self) -> Option<Event> {
        self.requests.pop(self.wait_limit()).await
    }

    /// Oldest queued response, waiting up to the poll interval.
    pub async fn dequeue_response_event(&self) -> Option<Event> {
        self.responses.pop(self.wait_limit()).await
    }

    /// Requests queued and not yet dequeued. Approximate under contention.
    pub fn pending_requests(&self) -> usize {
        self.requests.len()
    }

    /// Responses queued and not yet dequeued. Approximate under contention.
    pub fn pending_responses(&self) -> usize {
        self.responses.len()
    }

    fn wait_limit(&self) -> Option<Duration> {
        let interval = self.poll_interval();
        (!interval.is_zero()).then_some(interval)
    }
}

impl Default for EventListener {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventListener")
            .field("poll_interval", &self.poll_interval())
            .field("pending_requests", &self.pending_requests())
            .field("pending_responses", &self.pending_responses())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatypes::{DeliverSm, EnquireLink, SubmitSmResponse};
    use std::sync::Arc;

    #[test]
    fn event_class_follows_response_bit() {
        let request = Event::new(Frame::EnquireLink(EnquireLink::new(1)));
        let response = Event::new(Frame::SubmitSmResp(SubmitSmResponse::new(2, "id")));

        assert_eq!(request.class(), EventClass::Request);
        assert_eq!(response.class(), EventClass::Response);
    }

    #[tokio::test]
    async fn queues_are_independent() {
        let listener = EventListener::with_poll_interval(Duration::from_millis(10));
        listener.enqueue_event(Frame::SubmitSmResp(SubmitSmResponse::new(2, "id")).into());

        assert_eq!(listener.pending_responses(), 1);
        assert!(listener.dequeue_request_event().await.is_none());

        let response = listener.dequeue_response_event().await.unwrap();
        assert_eq!(response.frame().sequence_number(), 2);
        assert_eq!(listener.pending_responses(), 0);
    }

    #[tokio::test]
    async fn preserves_arrival_order() {
        let listener = EventListener::new();
        for seq in 1..=3 {
            let mut deliver = DeliverSm::default();
            deliver.sequence_number = seq;
            listener.enqueue_event(Frame::DeliverSm(Box::new(deliver)).into());
        }

        for seq in 1..=3 {
            let event = listener.dequeue_request_event().await.unwrap();
            assert_eq!(event.frame().sequence_number(), seq);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn empty_dequeue_waits_for_poll_interval() {
        let listener = EventListener::with_poll_interval(Duration::from_millis(1000));

        let started = Instant::now();
        assert!(listener.dequeue_response_event().await.is_none());
        assert!(started.elapsed() >= Duration::from_millis(1000));
        assert!(started.elapsed() < Duration::from_millis(1100));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_interval_waits_for_producer() {
        let listener = Arc::new(EventListener::new());

        let producer = Arc::clone(&listener);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(60)).await;
            producer.enqueue_event(Frame::EnquireLink(EnquireLink::new(9)).into());
        });

        let event = listener.dequeue_request_event().await.unwrap();
        assert_eq!(event.frame().sequence_number(), 9);
    }

    #[test]
    fn poll_interval_can_be_changed() {
        let listener = EventListener::new();
        assert_eq!(listener.poll_interval(), Duration::ZERO);

        listener.set_poll_interval(Duration::from_millis(250));
        assert_eq!(listener.poll_interval(), Duration::from_millis(250));
    }
}
