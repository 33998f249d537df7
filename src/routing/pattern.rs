use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::EventRouter;
use crate::event::Event;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// Builds routing keys from a pattern such as `"orders.{name}.{payload.region}"`.
///
/// `{name}` is replaced with the event name. Any other placeholder is a
/// dot-separated path into the event's JSON form (via `serde`). Strings are
/// inserted as-is, numbers and booleans via their display form; a missing,
/// `null` or non-scalar value yields an empty segment. A `{` without a
/// closing `}` is kept literally.
///
/// ```
/// use eventband::routing::{EventRouter, PatternRouter};
/// use eventband::BandEvent;
/// use serde_json::json;
///
/// let router = PatternRouter::new("orders.{name}.{payload.region}");
/// let event = BandEvent::with_payload("placed", &json!({ "region": "eu" })).unwrap();
///
/// assert_eq!(router.route_event(&event), "orders.placed.eu");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternRouter {
    pattern: String,
    segments: Vec<Segment>,
}

impl PatternRouter {
    pub fn new(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let segments = parse(&pattern);
        Self { pattern, segments }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    fn needs_fields(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Placeholder(p) if p != "name"))
    }
}

fn parse(pattern: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut rest = pattern;

    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}').map(|i| open + i) else {
            break;
        };

        if open > 0 {
            segments.push(Segment::Literal(rest[..open].to_string()));
        }
        segments.push(Segment::Placeholder(rest[open + 1..close].trim().to_string()));
        rest = &rest[close + 1..];
    }

    if !rest.is_empty() {
        segments.push(Segment::Literal(rest.to_string()));
    }
    segments
}

fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, key| match current {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

fn render(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

impl<E: Event + Serialize> EventRouter<E> for PatternRouter {
    fn route_event(&self, event: &E) -> String {
        let fields = if self.needs_fields() {
            match serde_json::to_value(event) {
                Ok(value) => Some(value),
                Err(err) => {
                    debug!(
                        event = event.name(),
                        error = %err,
                        "Event not serializable for routing pattern"
                    );
                    None
                }
            }
        } else {
            None
        };

        let mut key = String::with_capacity(self.pattern.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => key.push_str(text),
                Segment::Placeholder(p) if p == "name" => key.push_str(event.name()),
                Segment::Placeholder(path) => {
                    match fields.as_ref().and_then(|f| lookup(f, path)).and_then(render) {
                        Some(value) => key.push_str(&value),
                        None => debug!(
                            event = event.name(),
                            placeholder = %path,
                            pattern = %self.pattern,
                            "Unresolved routing placeholder"
                        ),
                    }
                }
            }
        }
        key
    }
}
