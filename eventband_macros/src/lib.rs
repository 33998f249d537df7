mod event;

use proc_macro::TokenStream;

// ============================================================================
// #[derive(Event)]
// ============================================================================

/// Derive macro implementing `eventband::Event`.
///
/// The event name is what dispatchers look subscriptions up by and what
/// converters stamp into the message `type` property.
///
/// # Usage
///
/// Structs use the type name unless `#[event(name = "...")]` is given:
/// ```ignore
/// #[derive(Event, Serialize, Deserialize)]
/// #[event(name = "user.registered")]
/// struct UserRegistered {
///     user_id: String,
/// }
/// ```
///
/// Enums name each variant separately, defaulting to the variant name:
/// ```ignore
/// #[derive(Event)]
/// enum OrderEvent {
///     #[event(name = "order.placed")]
///     Placed { id: String },
///     Cancelled(String),          // name: "Cancelled"
/// }
/// ```
#[proc_macro_derive(Event, attributes(event))]
pub fn derive_event(input: TokenStream) -> TokenStream {
    event::derive_event(input)
}
