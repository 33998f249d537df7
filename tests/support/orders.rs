use eventband::Event;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Event)]
#[event(name = "order.placed")]
pub struct OrderPlaced {
    pub order_id: String,
    pub region: String,
    pub cents: u64,
}

impl OrderPlaced {
    pub fn new(order_id: &str, region: &str, cents: u64) -> Self {
        Self {
            order_id: order_id.to_string(),
            region: region.to_string(),
            cents,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Event)]
pub enum OrderEvent {
    #[event(name = "order.placed")]
    Placed(OrderPlaced),
    #[event(name = "order.shipped")]
    Shipped { order_id: String, carrier: String },
    Cancelled { order_id: String },
}
