//! Lumen Events - listener registry and event dispatcher for the Lumen
//! display runtime.
//!
//! This crate provides:
//! - A per-type listener registry with priority-ordered delivery
//! - A two-phase (capture, then bubble) synchronous dispatcher
//! - Copy-on-write isolation so listeners can mutate the registry
//!   mid-dispatch
//!
//! # Architecture
//!
//! An [`EventDispatcher`] owns, per event type, an ordered sequence of
//! registered listeners: descending priority first, registration order
//! among equals. Dispatching delivers the event to capture-phase
//! listeners and then to bubble-phase listeners, each pass in registry
//! order, over a snapshot taken when the dispatch starts. A listener
//! that registers or removes listeners for the type being dispatched
//! mutates a detached copy, so the in-flight dispatch is never
//! affected and the next dispatch sees the updated registry.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use lumen_events::{Event, EventDispatcher, FnListener, ListenerOptions};
//!
//! struct Clicked;
//!
//! impl Event for Clicked {
//!     fn event_type(&self) -> &str {
//!         "clicked"
//!     }
//! }
//!
//! let dispatcher = EventDispatcher::new();
//!
//! // Bare `bool` options are a capture-phase shorthand.
//! dispatcher
//!     .add_event_listener(
//!         "clicked",
//!         Arc::new(FnListener::new(|_event| println!("clicked!"))),
//!         false,
//!     )
//!     .unwrap();
//!
//! // Higher priorities fire earlier within their phase.
//! dispatcher
//!     .add_event_listener(
//!         "clicked",
//!         Arc::new(FnListener::new(|_event| println!("first!"))),
//!         ListenerOptions::new().with_priority(10),
//!     )
//!     .unwrap();
//!
//! assert!(dispatcher.dispatch_event(&mut Clicked));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod dispatcher;
mod error;
mod event;
mod listener;

pub use dispatcher::{DispatcherId, EventDispatcher};
pub use error::{EventsError, EventsResult};
pub use event::Event;
pub use listener::{FnListener, Listener, ListenerOptions};
