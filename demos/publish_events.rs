use std::sync::Arc;

use eventband::dispatch::{BandDispatcher, EventDispatcher};
use eventband::transport::amqp::{
    AmqpPublisher, InMemoryDriver, JsonEventConverter, MessageEventConverter, PublisherConfig,
};
use eventband::{Event, PatternRouter, PublishEventSubscription};
use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Serialize, Deserialize, Event)]
enum ShopEvent {
    #[event(name = "order.placed")]
    OrderPlaced { order_id: String, region: String },
    #[event(name = "order.cancelled")]
    OrderCancelled { order_id: String, region: String },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eventband=debug,publish_events=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Stand-in for a broker client.
    let driver = InMemoryDriver::new();

    let publisher = Arc::new(
        AmqpPublisher::new(
            driver.clone(),
            JsonEventConverter::<ShopEvent>::new(),
            PublisherConfig::exchange("shop").with_mandatory(true),
        )
        .with_router(PatternRouter::new("shop.{name}")),
    );

    let dispatcher: BandDispatcher<ShopEvent> = BandDispatcher::new();
    for name in ["order.placed", "order.cancelled"] {
        dispatcher.subscribe(Arc::new(PublishEventSubscription::<ShopEvent, _>::new(
            name,
            Arc::clone(&publisher),
        )))?;
    }

    // Local reaction alongside the broker publish.
    dispatcher.on("order.placed", |event, _| {
        info!(event = event.name(), "Reserving stock");
        Ok(true)
    })?;

    let events = [
        ShopEvent::OrderPlaced {
            order_id: "o-1".into(),
            region: "eu".into(),
        },
        ShopEvent::OrderCancelled {
            order_id: "o-1".into(),
            region: "eu".into(),
        },
    ];
    for event in &events {
        let results = dispatcher.dispatch(event)?;
        info!(event = event.name(), ?results, "Dispatched");
    }

    let converter = JsonEventConverter::<ShopEvent>::new();
    for published in driver.published() {
        let event = converter.message_to_event(published.publication.message())?;
        println!(
            "{} -> exchange={:?} routing_key={:?} event={:?}",
            published.publication.message().message_type().unwrap_or("?"),
            published.exchange,
            published.routing_key,
            event
        );
    }

    Ok(())
}
