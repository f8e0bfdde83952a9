use super::{Broker, Delivery};
use crate::client::Consumer;
use crate::topology::{Binding, Queue, TopicExchange, Topology};
use crate::utils::error::BrokerError;
use tokio::sync::mpsc;

fn delivery(body: &str) -> Delivery {
    Delivery::new("text/plain", body.as_bytes().to_vec())
}

fn declared() -> Broker {
    let mut broker = Broker::default();
    broker.declare(&Topology::default()).unwrap();
    broker
}

#[test]
fn test_broker_new() {
    let broker = Broker::default();
    assert!(!broker.has_exchange("spring-ex"));
    assert!(!broker.has_queue("spring"));
    assert!(broker.bindings().is_empty());
    assert_eq!(broker.queue_depth("spring"), None);
}

#[test]
fn test_declare_topology() {
    let broker = declared();
    assert!(broker.has_queue("spring"));
    assert!(broker.has_exchange("spring-ex"));
    assert_eq!(
        broker.bindings(),
        &[Binding {
            queue: "spring".into(),
            exchange: "spring-ex".into(),
            pattern: "foo.bar.#".into(),
        }]
    );
}

#[test]
fn test_redeclare_is_idempotent() {
    let mut broker = declared();
    broker.declare(&Topology::default()).unwrap();
    assert_eq!(broker.bindings().len(), 1);
    assert_eq!(broker.queue_depth("spring"), Some(0));
}

#[test]
fn test_redeclare_queue_with_other_durability_fails() {
    let mut broker = declared();
    let err = broker
        .declare_queue(Queue::new("spring", true))
        .unwrap_err();
    match err {
        BrokerError::PreconditionFailed { name, existing } => {
            assert_eq!(name, "spring");
            assert!(!existing);
        }
        other => panic!("expected PreconditionFailed, got {other:?}"),
    }
}

#[test]
fn test_binding_requires_declared_ends() {
    let mut broker = Broker::default();
    let queue = Queue::new("q", false);
    let exchange = TopicExchange::new("ex");
    let binding = Binding::bind(&queue).to(&exchange).with("#");

    assert!(matches!(
        broker.declare_binding(binding.clone()),
        Err(BrokerError::ExchangeNotFound { .. })
    ));

    broker.declare_exchange(exchange);
    assert!(matches!(
        broker.declare_binding(binding.clone()),
        Err(BrokerError::QueueNotFound { .. })
    ));

    broker.declare_queue(queue).unwrap();
    broker.declare_binding(binding).unwrap();
}

#[test]
fn test_publish_matching_key_delivers_once() {
    let mut broker = declared();
    let (tx, mut rx) = mpsc::unbounded_channel::<Delivery>();
    broker.register_consumer(Consumer::new("spring", tx)).unwrap();

    let routed = broker
        .publish("spring-ex", "foo.bar.baz", delivery("hello"))
        .unwrap();
    assert_eq!(routed, 1);

    let received = rx.try_recv().unwrap();
    assert_eq!(received.exchange, "spring-ex");
    assert_eq!(received.routing_key, "foo.bar.baz");
    assert_eq!(received.body, b"hello".to_vec());
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_publish_mismatched_key_is_dropped() {
    let mut broker = declared();
    let (tx, mut rx) = mpsc::unbounded_channel::<Delivery>();
    broker.register_consumer(Consumer::new("spring", tx)).unwrap();

    let routed = broker
        .publish("spring-ex", "other.key", delivery("hello"))
        .unwrap();
    assert_eq!(routed, 0);
    assert!(rx.try_recv().is_err());
    assert_eq!(broker.queue_depth("spring"), Some(0));
}

#[test]
fn test_publish_to_unknown_exchange_fails() {
    let mut broker = declared();
    let err = broker
        .publish("nonexistent", "foo.bar.baz", delivery("hello"))
        .unwrap_err();
    assert!(matches!(err, BrokerError::ExchangeNotFound { name } if name == "nonexistent"));
}

#[test]
fn test_overlapping_bindings_deliver_once_per_queue() {
    let mut broker = declared();
    let queue = Queue::new("spring", false);
    let exchange = TopicExchange::new("spring-ex");
    broker
        .declare_binding(Binding::bind(&queue).to(&exchange).with("*.bar.baz"))
        .unwrap();

    let other = Queue::new("audit", false);
    broker.declare_queue(other.clone()).unwrap();
    broker
        .declare_binding(Binding::bind(&other).to(&exchange).with("#"))
        .unwrap();

    let routed = broker
        .publish("spring-ex", "foo.bar.baz", delivery("hello"))
        .unwrap();
    assert_eq!(routed, 2);
    assert_eq!(broker.queue_depth("spring"), Some(1));
    assert_eq!(broker.queue_depth("audit"), Some(1));
}

#[test]
fn test_backlog_flushes_to_late_consumer() {
    let mut broker = declared();
    broker
        .publish("spring-ex", "foo.bar.baz", delivery("first"))
        .unwrap();
    broker
        .publish("spring-ex", "foo.bar.baz", delivery("second"))
        .unwrap();
    assert_eq!(broker.queue_depth("spring"), Some(2));

    let (tx, mut rx) = mpsc::unbounded_channel::<Delivery>();
    broker.register_consumer(Consumer::new("spring", tx)).unwrap();

    assert_eq!(broker.queue_depth("spring"), Some(0));
    assert_eq!(rx.try_recv().unwrap().body, b"first".to_vec());
    assert_eq!(rx.try_recv().unwrap().body, b"second".to_vec());
}

#[test]
fn test_consumers_share_a_queue_round_robin() {
    let mut broker = declared();
    let (tx_a, mut rx_a) = mpsc::unbounded_channel::<Delivery>();
    let (tx_b, mut rx_b) = mpsc::unbounded_channel::<Delivery>();
    broker.register_consumer(Consumer::new("spring", tx_a)).unwrap();
    broker.register_consumer(Consumer::new("spring", tx_b)).unwrap();

    for body in ["1", "2", "3", "4"] {
        broker
            .publish("spring-ex", "foo.bar.baz", delivery(body))
            .unwrap();
    }

    let mut a = Vec::new();
    while let Ok(d) = rx_a.try_recv() {
        a.push(d.body);
    }
    let mut b = Vec::new();
    while let Ok(d) = rx_b.try_recv() {
        b.push(d.body);
    }
    assert_eq!(a, vec![b"1".to_vec(), b"3".to_vec()]);
    assert_eq!(b, vec![b"2".to_vec(), b"4".to_vec()]);
}

#[test]
fn test_closed_consumer_is_skipped() {
    let mut broker = declared();
    let (tx_dead, rx_dead) = mpsc::unbounded_channel::<Delivery>();
    let (tx_live, mut rx_live) = mpsc::unbounded_channel::<Delivery>();
    broker
        .register_consumer(Consumer::new("spring", tx_dead))
        .unwrap();
    broker
        .register_consumer(Consumer::new("spring", tx_live))
        .unwrap();

    // Drop the receiver to close the channel
    drop(rx_dead);

    broker
        .publish("spring-ex", "foo.bar.baz", delivery("hello"))
        .unwrap();

    assert_eq!(rx_live.try_recv().unwrap().body, b"hello".to_vec());
    assert_eq!(broker.consumer_count("spring"), Some(1));
}

#[test]
fn test_message_kept_when_only_consumer_is_closed() {
    let mut broker = declared();
    let (tx, rx) = mpsc::unbounded_channel::<Delivery>();
    broker.register_consumer(Consumer::new("spring", tx)).unwrap();
    drop(rx);

    broker
        .publish("spring-ex", "foo.bar.baz", delivery("hello"))
        .unwrap();

    assert_eq!(broker.consumer_count("spring"), Some(0));
    assert_eq!(broker.queue_depth("spring"), Some(1));
}

#[test]
fn test_cancel_consumer() {
    let mut broker = declared();
    let (tx, _rx) = mpsc::unbounded_channel::<Delivery>();
    let consumer = Consumer::new("spring", tx);
    let tag = consumer.tag.clone();
    broker.register_consumer(consumer).unwrap();

    broker.cancel_consumer(&tag).unwrap();
    assert_eq!(broker.consumer_count("spring"), Some(0));

    assert!(matches!(
        broker.cancel_consumer(&tag),
        Err(BrokerError::ConsumerNotFound { .. })
    ));
}

#[test]
fn test_register_consumer_on_unknown_queue_fails() {
    let mut broker = declared();
    let (tx, _rx) = mpsc::unbounded_channel::<Delivery>();
    let err = broker
        .register_consumer(Consumer::new("nowhere", tx))
        .unwrap_err();
    assert!(matches!(err, BrokerError::QueueNotFound { name } if name == "nowhere"));
}
