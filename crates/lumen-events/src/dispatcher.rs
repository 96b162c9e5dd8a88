//! Listener registry and the two-phase event dispatcher.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use uuid::Uuid;

use crate::error::{EventsError, EventsResult};
use crate::event::Event;
use crate::listener::{Listener, ListenerOptions, ListenerRecord};

/// Identity a dispatcher reports as the target of its events.
///
/// Components that embed a dispatcher can swap in their own identity so
/// downstream code attributes events to the owning object rather than
/// to the embedded dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DispatcherId(Uuid);

impl DispatcherId {
    /// Create a fresh, unique identity.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DispatcherId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DispatcherId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Per-type registry state: the ordered record sequence plus the
/// in-iteration mark driving copy-on-write isolation.
#[derive(Default)]
struct TypeEntry {
    records: Arc<Vec<ListenerRecord>>,
    /// True while a dispatch is iterating a snapshot of `records`.
    locked: bool,
}

impl TypeEntry {
    /// Mutable access to the record sequence.
    ///
    /// If a dispatch is iterating this sequence, it is detached onto a
    /// fresh allocation first so the in-flight snapshot stays stable;
    /// later mutations during the same dispatch reuse the detached
    /// sequence.
    fn records_mut(&mut self) -> &mut Vec<ListenerRecord> {
        if self.locked {
            self.records = Arc::new(self.records.as_ref().clone());
            self.locked = false;
        }
        // A nested dispatch of the same type can still hold a snapshot
        // after its guard released the mark; make_mut clones then too.
        Arc::make_mut(&mut self.records)
    }
}

/// Clears a type's in-iteration mark when its dispatch ends, including
/// by panic unwind out of a listener.
struct DispatchGuard<'a> {
    listeners: &'a DashMap<String, TypeEntry>,
    event_type: &'a str,
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        if let Some(mut entry) = self.listeners.get_mut(self.event_type) {
            entry.locked = false;
        }
    }
}

/// Registry of event listeners and the engine that delivers events to
/// them.
///
/// Listeners are kept per event type in descending priority order;
/// equal priorities fire in registration order. Delivery runs in two
/// passes: capture-phase listeners first, then bubble-phase listeners.
///
/// The registry is safe to mutate from inside a listener: a dispatch
/// iterates a snapshot taken when it started, so reentrant additions
/// take effect on the next dispatch and reentrant removals cannot
/// starve listeners the snapshot already contains.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use lumen_events::{Event, EventDispatcher, FnListener, ListenerOptions};
///
/// struct Resize;
/// impl Event for Resize {
///     fn event_type(&self) -> &str {
///         "resize"
///     }
/// }
///
/// let dispatcher = EventDispatcher::new();
/// dispatcher
///     .add_event_listener(
///         "resize",
///         Arc::new(FnListener::new(|_event| { /* relayout */ })),
///         ListenerOptions::new().with_priority(10),
///     )
///     .unwrap();
///
/// assert!(dispatcher.dispatch_event(&mut Resize));
/// ```
pub struct EventDispatcher {
    listeners: DashMap<String, TypeEntry>,
    target: RwLock<DispatcherId>,
}

impl EventDispatcher {
    /// Create a dispatcher reporting a fresh identity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_target(DispatcherId::new())
    }

    /// Create a dispatcher that reports `target` as its identity, for
    /// components that embed a dispatcher but want events attributed to
    /// themselves.
    #[must_use]
    pub fn with_target(target: DispatcherId) -> Self {
        Self {
            listeners: DashMap::new(),
            target: RwLock::new(target),
        }
    }

    /// The identity this dispatcher currently reports.
    #[must_use]
    pub fn target_id(&self) -> DispatcherId {
        *self
            .target
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Swap the reported identity. Registered listeners are unaffected.
    pub fn set_target(&self, target: DispatcherId) {
        *self
            .target
            .write()
            .unwrap_or_else(PoisonError::into_inner) = target;
    }

    /// Register a listener for an event type.
    ///
    /// `options` is either full [`ListenerOptions`] or a bare `bool`
    /// used as a capture-phase shorthand. Registering the same
    /// `(listener, phase)` pair again replaces the earlier
    /// registration instead of duplicating it.
    ///
    /// # Errors
    ///
    /// Returns [`EventsError::EmptyEventType`] if `event_type` is
    /// empty; the registry is left unchanged.
    pub fn add_event_listener(
        &self,
        event_type: impl Into<String>,
        listener: Arc<dyn Listener>,
        options: impl Into<ListenerOptions>,
    ) -> EventsResult<()> {
        let event_type = event_type.into();
        if event_type.is_empty() {
            return Err(EventsError::EmptyEventType);
        }
        let options = options.into();

        let mut entry = self.listeners.entry(event_type.clone()).or_default();
        let records = entry.records_mut();

        if let Some(existing) = records
            .iter()
            .position(|r| r.matches(&listener, options.capture))
        {
            records.remove(existing);
        }

        let record = ListenerRecord::new(listener, options);
        match records.last() {
            // Common case: default-priority listeners append in order.
            Some(last) if record.options.priority <= last.options.priority => {
                records.push(record);
            }
            Some(_) => {
                // Insert right after the trailing run of records whose
                // priority is >= the new one, keeping descending order
                // stable among equals.
                match records
                    .iter()
                    .rposition(|r| r.options.priority >= record.options.priority)
                {
                    Some(index) => records.insert(index.saturating_add(1), record),
                    None => records.insert(0, record),
                }
            }
            None => records.push(record),
        }

        trace!(
            event_type = %event_type,
            count = records.len(),
            "Listener registered"
        );
        Ok(())
    }

    /// Remove the listener registered for `(listener, phase)` on an
    /// event type.
    ///
    /// The phase is taken from `options` (a bare `bool` works as the
    /// capture shorthand) and must match the registration exactly: a
    /// capture-phase registration is never removed by a bubble-phase
    /// request, and vice versa. Unknown types and unmatched pairs are
    /// silently ignored.
    pub fn remove_event_listener(
        &self,
        event_type: &str,
        listener: &Arc<dyn Listener>,
        options: impl Into<ListenerOptions>,
    ) {
        let capture = options.into().capture;
        let Some(mut entry) = self.listeners.get_mut(event_type) else {
            return;
        };

        let index = entry
            .records
            .iter()
            .position(|r| r.matches(listener, capture));
        let Some(index) = index else {
            return;
        };

        entry.records_mut().remove(index);
        let now_empty = entry.records.is_empty();
        drop(entry);

        trace!(event_type, capture, "Listener removed");

        if now_empty {
            self.listeners
                .remove_if(event_type, |_, entry| entry.records.is_empty());
        }
    }

    /// True iff at least one listener is registered for the type.
    #[must_use]
    pub fn has_event_listener(&self, event_type: &str) -> bool {
        self.listeners
            .get(event_type)
            .is_some_and(|entry| !entry.records.is_empty())
    }

    /// Number of listeners registered for the type, both phases.
    #[must_use]
    pub fn listener_count(&self, event_type: &str) -> usize {
        self.listeners
            .get(event_type)
            .map_or(0, |entry| entry.records.len())
    }

    /// Deliver an event to the listeners registered for its type.
    ///
    /// Capture-phase listeners run first, then bubble-phase listeners,
    /// each pass in registry order. Delivery iterates a snapshot taken
    /// now: listeners added reentrantly are not invoked until the next
    /// dispatch, and listeners removed reentrantly still receive this
    /// one. Once a listener stops the event's propagation, the
    /// remaining listeners are skipped.
    ///
    /// Returns true iff the event's default behavior was not cancelled.
    pub fn dispatch_event(&self, event: &mut dyn Event) -> bool {
        let snapshot = {
            let Some(mut entry) = self.listeners.get_mut(event.event_type()) else {
                trace!(event_type = event.event_type(), "No listeners for event");
                return !event.default_prevented();
            };
            entry.locked = true;
            Arc::clone(&entry.records)
        };

        let event_type = event.event_type().to_owned();
        debug!(
            event_type = %event_type,
            count = snapshot.len(),
            "Dispatching event"
        );

        let _guard = DispatchGuard {
            listeners: &self.listeners,
            event_type: &event_type,
        };

        self.run_phase(&event_type, &snapshot, event, true);
        self.run_phase(&event_type, &snapshot, event, false);

        !event.default_prevented()
    }

    /// Run one delivery pass over the listeners of a single phase.
    fn run_phase(
        &self,
        event_type: &str,
        snapshot: &[ListenerRecord],
        event: &mut dyn Event,
        capture: bool,
    ) {
        for record in snapshot.iter().filter(|r| r.options.capture == capture) {
            if event.propagation_stopped() {
                return;
            }
            if record.options.once {
                // Drop the registration before the callback runs so a
                // reentrant dispatch cannot deliver to it twice.
                self.remove_event_listener(event_type, &record.listener, record.options);
            }
            record.listener.handle(event, self);
        }
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("target", &self.target_id())
            .field("event_types", &self.listeners.len())
            .finish_non_exhaustive()
    }
}
