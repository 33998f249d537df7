mod support;

use std::sync::Arc;

use eventband::dispatch::{BandDispatcher, DispatchError, EventDispatcher};
use eventband::transport::amqp::{
    AmqpPublisher, InMemoryDriver, JsonEventConverter, MessageEventConverter, PublisherConfig,
};
use eventband::{BandEvent, EventNameRouter, PatternRouter, PublishError, PublishEventSubscription};
use support::orders::{OrderEvent, OrderPlaced};

#[test]
fn dispatched_events_reach_the_broker() {
    let driver = InMemoryDriver::new();
    let publisher = AmqpPublisher::new(
        driver.clone(),
        JsonEventConverter::<OrderPlaced>::new(),
        PublisherConfig::exchange("orders").with_mandatory(true),
    )
    .with_router(PatternRouter::new("orders.{region}.placed"));

    let dispatcher: BandDispatcher<OrderPlaced> = BandDispatcher::new();
    dispatcher
        .subscribe(Arc::new(PublishEventSubscription::<OrderPlaced, _>::new(
            "order.placed",
            publisher,
        )))
        .unwrap();

    let event = OrderPlaced::new("o-1", "eu", 4200);
    assert_eq!(dispatcher.dispatch(&event).unwrap(), vec![true]);

    let published = driver.find_by_routing_key("orders.eu.placed");
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].exchange, "orders");
    assert!(published[0].publication.is_mandatory());

    let message = published[0].publication.message();
    assert_eq!(message.message_type(), Some("order.placed"));
    assert_eq!(message.content_type(), Some("application/json"));

    let consumed = JsonEventConverter::<OrderPlaced>::new()
        .message_to_event(message)
        .unwrap();
    assert_eq!(consumed, event);
}

#[test]
fn enum_events_route_by_variant_name() {
    let driver = InMemoryDriver::new();
    let publisher = Arc::new(
        AmqpPublisher::new(
            driver.clone(),
            JsonEventConverter::<OrderEvent>::new(),
            PublisherConfig::exchange("orders"),
        )
        .with_router(EventNameRouter),
    );

    let dispatcher: BandDispatcher<OrderEvent> = BandDispatcher::new();
    for name in ["order.placed", "order.shipped"] {
        dispatcher
            .subscribe(Arc::new(PublishEventSubscription::<OrderEvent, _>::new(
                name,
                Arc::clone(&publisher),
            )))
            .unwrap();
    }

    dispatcher
        .dispatch(&OrderEvent::Placed(OrderPlaced::new("o-1", "us", 10)))
        .unwrap();
    dispatcher
        .dispatch(&OrderEvent::Shipped {
            order_id: "o-1".into(),
            carrier: "ups".into(),
        })
        .unwrap();
    let unrouted = dispatcher
        .dispatch(&OrderEvent::Cancelled {
            order_id: "o-1".into(),
        })
        .unwrap();

    assert!(unrouted.is_empty());
    let keys: Vec<String> = driver
        .published()
        .into_iter()
        .map(|p| p.routing_key)
        .collect();
    assert_eq!(keys, vec!["order.placed", "order.shipped"]);
}

#[test]
fn publish_failures_surface_through_dispatch() {
    let driver = InMemoryDriver::new();
    let publisher = AmqpPublisher::new(
        driver.clone(),
        JsonEventConverter::<BandEvent>::new(),
        PublisherConfig::default(),
    );

    let dispatcher: BandDispatcher<BandEvent> = BandDispatcher::new();
    dispatcher
        .subscribe(Arc::new(PublishEventSubscription::<BandEvent, _>::new(
            "user.registered",
            publisher,
        )))
        .unwrap();

    let err = dispatcher
        .dispatch(&BandEvent::new("user.registered"))
        .unwrap_err();

    match err {
        DispatchError::Publish(PublishError::Configuration(_)) => {}
        other => panic!("expected configuration error, got {other:?}"),
    }
    assert!(driver.is_empty());
}

#[test]
fn banded_publishing_only_fires_for_its_band() {
    let driver = InMemoryDriver::new();
    let publisher = AmqpPublisher::new(
        driver.clone(),
        JsonEventConverter::<BandEvent>::new(),
        PublisherConfig::queue("audit-log"),
    )
    .with_router(PatternRouter::new("audit.{payload.user_id}"));

    let dispatcher: BandDispatcher<BandEvent> = BandDispatcher::new();
    dispatcher
        .subscribe(Arc::new(
            PublishEventSubscription::<BandEvent, _>::new("user.deleted", publisher)
                .in_band("audit"),
        ))
        .unwrap();

    let event = BandEvent::with_payload(
        "user.deleted",
        &serde_json::json!({ "user_id": "u-9" }),
    )
    .unwrap();

    assert!(dispatcher.dispatch(&event).unwrap().is_empty());
    assert!(driver.is_empty());

    assert_eq!(dispatcher.dispatch_to(&event, "audit").unwrap(), vec![true]);
    let published = driver.published();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].exchange, "audit-log");
    assert_eq!(published[0].routing_key, "audit.u-9");

    let consumed = JsonEventConverter::<BandEvent>::new()
        .message_to_event(published[0].publication.message())
        .unwrap();
    assert_eq!(consumed, event);
}

#[cfg(feature = "bitcode")]
#[test]
fn bitcode_messages_round_trip_through_the_driver() {
    use eventband::transport::amqp::BitcodeEventConverter;
    use eventband::EventPublisher;

    let driver = InMemoryDriver::new();
    let publisher = AmqpPublisher::new(
        driver.clone(),
        BitcodeEventConverter::<OrderPlaced>::new(),
        PublisherConfig::exchange("orders"),
    );

    let event = OrderPlaced::new("o-7", "apac", 99);
    publisher.publish_event(&event).unwrap();

    let published = driver.published();
    let message = published[0].publication.message();
    assert_eq!(message.content_type(), Some("application/x-bitcode"));

    let consumed = BitcodeEventConverter::<OrderPlaced>::new()
        .message_to_event(message)
        .unwrap();
    assert_eq!(consumed, event);
}
