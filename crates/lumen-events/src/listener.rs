//! Listener trait, registration options, and the registry's record type.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::dispatcher::EventDispatcher;
use crate::event::Event;

/// A callback registered with an [`EventDispatcher`].
///
/// Listeners receive the dispatching dispatcher alongside the event so
/// they can register or remove listeners reentrantly without holding a
/// separate handle.
///
/// Listener identity is `Arc` identity: registering the same `Arc`
/// twice for the same phase replaces the earlier registration, while
/// two separately allocated listeners are always distinct, even when
/// they wrap the same closure.
pub trait Listener: Send + Sync {
    /// Handle one delivered event.
    fn handle(&self, event: &mut dyn Event, dispatcher: &EventDispatcher);
}

/// Adapter turning a closure into a [`Listener`].
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use lumen_events::{EventDispatcher, FnListener};
///
/// let dispatcher = EventDispatcher::new();
/// let listener = Arc::new(FnListener::new(|_event| {
///     // react to the event
/// }));
/// dispatcher.add_event_listener("resize", listener, false).unwrap();
/// ```
pub struct FnListener<F> {
    callback: F,
}

impl<F> FnListener<F>
where
    F: Fn(&mut dyn Event) + Send + Sync,
{
    /// Wrap a closure as a listener.
    #[must_use]
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> Listener for FnListener<F>
where
    F: Fn(&mut dyn Event) + Send + Sync,
{
    fn handle(&self, event: &mut dyn Event, _dispatcher: &EventDispatcher) {
        (self.callback)(event);
    }
}

/// Options controlling how a listener is registered.
///
/// A bare `bool` converts into options with only `capture` set, so
/// call sites can pass `true`/`false` as a phase shorthand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenerOptions {
    /// Deliver during the capture phase instead of the bubble phase.
    pub capture: bool,
    /// Delivery ordering key; higher priorities fire earlier.
    pub priority: i32,
    /// Remove the listener after its first invocation.
    pub once: bool,
}

impl ListenerOptions {
    /// Options for a bubble-phase listener at default priority.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the delivery phase.
    #[must_use]
    pub fn with_capture(mut self, capture: bool) -> Self {
        self.capture = capture;
        self
    }

    /// Set the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Remove the listener after its first invocation.
    #[must_use]
    pub fn once(mut self) -> Self {
        self.once = true;
        self
    }
}

impl From<bool> for ListenerOptions {
    fn from(capture: bool) -> Self {
        Self::default().with_capture(capture)
    }
}

/// One registered subscription in a type's ordered sequence.
#[derive(Clone)]
pub(crate) struct ListenerRecord {
    pub(crate) listener: Arc<dyn Listener>,
    pub(crate) options: ListenerOptions,
}

impl ListenerRecord {
    pub(crate) fn new(listener: Arc<dyn Listener>, options: ListenerOptions) -> Self {
        Self { listener, options }
    }

    /// True iff this record was registered for `listener` in the given
    /// phase. Both sides must match exactly; a capture registration is
    /// invisible to bubble-phase lookups and vice versa.
    pub(crate) fn matches(&self, listener: &Arc<dyn Listener>, capture: bool) -> bool {
        self.options.capture == capture
            && std::ptr::addr_eq(Arc::as_ptr(&self.listener), Arc::as_ptr(listener))
    }
}
