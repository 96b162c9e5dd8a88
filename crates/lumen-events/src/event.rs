//! The event contract consumed by the dispatcher.
//!
//! The dispatcher is payload-agnostic: it only needs a type key for
//! registry lookup and the two propagation flags it reads during
//! delivery. Concrete event types live with their producers.

/// An event deliverable through an [`EventDispatcher`].
///
/// Implementors that want cancellation semantics override the flag
/// accessors and the corresponding mutators; the defaults describe an
/// event that can be neither stopped nor cancelled.
///
/// [`EventDispatcher`]: crate::EventDispatcher
pub trait Event {
    /// The type key this event is dispatched under.
    fn event_type(&self) -> &str;

    /// True once a listener has halted delivery to the remaining
    /// listeners of the current dispatch.
    fn propagation_stopped(&self) -> bool {
        false
    }

    /// True once a listener has cancelled the event's default behavior.
    fn default_prevented(&self) -> bool {
        false
    }

    /// Halt delivery to the remaining listeners of the current dispatch.
    fn stop_propagation(&mut self) {}

    /// Cancel the event's default behavior.
    fn prevent_default(&mut self) {}
}
