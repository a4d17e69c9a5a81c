use smpp_wrapper::codec::Frame;
use smpp_wrapper::datatypes::{DeliverSm, EnquireLink, SubmitSmResponse};
use smpp_wrapper::{Event, EventListener};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

fn deliver(sequence_number: u32) -> Event {
    let mut deliver = DeliverSm::default();
    deliver.sequence_number = sequence_number;
    Frame::DeliverSm(Box::new(deliver)).into()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn each_event_goes_to_exactly_one_consumer() {
    let listener = Arc::new(EventListener::with_poll_interval(Duration::from_millis(200)));

    let consumers: Vec<_> = (0..4)
        .map(|_| {
            let listener = Arc::clone(&listener);
            tokio::spawn(async move {
                let mut seen = Vec::new();
                while let Some(event) = listener.dequeue_request_event().await {
                    seen.push(event.frame().sequence_number());
                }
                seen
            })
        })
        .collect();

    for seq in 1..=200 {
        listener.enqueue_event(deliver(seq));
    }

    let mut all = Vec::new();
    for consumer in consumers {
        all.extend(consumer.await.unwrap());
    }

    let unique: HashSet<_> = all.iter().copied().collect();
    assert_eq!(all.len(), 200);
    assert_eq!(unique.len(), 200);
    assert_eq!(listener.pending_requests(), 0);
}

#[tokio::test]
async fn single_consumer_sees_fifo_order() {
    let listener = Arc::new(EventListener::with_poll_interval(Duration::from_millis(100)));

    let producer = Arc::clone(&listener);
    tokio::spawn(async move {
        for seq in 1..=20 {
            producer.enqueue_event(deliver(seq));
            tokio::task::yield_now().await;
        }
    });

    for expected in 1..=20 {
        let event = listener.dequeue_request_event().await.unwrap();
        assert_eq!(event.frame().sequence_number(), expected);
    }
}

#[tokio::test(start_paused = true)]
async fn response_queue_ignores_requests() {
    let listener = EventListener::with_poll_interval(Duration::from_millis(1000));
    listener.enqueue_event(Frame::EnquireLink(EnquireLink::new(1)).into());

    let started = Instant::now();
    assert!(listener.dequeue_response_event().await.is_none());
    let waited = started.elapsed();
    assert!(waited >= Duration::from_millis(1000));
    assert!(waited < Duration::from_millis(1100));

    assert_eq!(listener.pending_requests(), 1);
}

#[tokio::test(start_paused = true)]
async fn waiting_consumer_wakes_on_arrival() {
    let listener = Arc::new(EventListener::with_poll_interval(Duration::from_millis(1000)));

    let producer = Arc::clone(&listener);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        producer.enqueue_event(Frame::SubmitSmResp(SubmitSmResponse::new(3, "abc")).into());
    });

    let started = Instant::now();
    let event = listener.dequeue_response_event().await.unwrap();

    assert_eq!(event.frame().sequence_number(), 3);
    assert!(started.elapsed() < Duration::from_millis(1000));
}

#[tokio::test(start_paused = true)]
async fn interval_change_applies_to_next_dequeue() {
    let listener = EventListener::with_poll_interval(Duration::from_millis(1000));
    listener.set_poll_interval(Duration::from_millis(50));

    let started = Instant::now();
    assert!(listener.dequeue_request_event().await.is_none());
    assert!(started.elapsed() < Duration::from_millis(1000));
}

#[tokio::test(start_paused = true)]
async fn sub_millisecond_interval_still_bounds_the_wait() {
    let listener = EventListener::with_poll_interval(Duration::from_micros(500));
    assert_eq!(listener.poll_interval(), Duration::from_micros(500));

    let started = Instant::now();
    assert!(listener.dequeue_request_event().await.is_none());
    assert!(started.elapsed() < Duration::from_millis(10));

    listener.set_poll_interval(Duration::from_nanos(1));
    assert_eq!(listener.poll_interval(), Duration::from_nanos(1));
    assert!(listener.dequeue_response_event().await.is_none());
}
