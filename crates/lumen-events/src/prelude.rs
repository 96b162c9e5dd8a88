//! Prelude module - commonly used types for convenient import.
//!
//! Use `use lumen_events::prelude::*;` to import all essential types.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use lumen_events::prelude::*;
//!
//! struct Opened;
//!
//! impl Event for Opened {
//!     fn event_type(&self) -> &str {
//!         "opened"
//!     }
//! }
//!
//! let dispatcher = EventDispatcher::new();
//! dispatcher
//!     .add_event_listener("opened", Arc::new(FnListener::new(|_| {})), false)
//!     .unwrap();
//! assert!(dispatcher.has_event_listener("opened"));
//! ```

// Dispatcher
pub use crate::{DispatcherId, EventDispatcher};

// Event contract
pub use crate::Event;

// Listeners
pub use crate::{FnListener, Listener, ListenerOptions};

// Errors
pub use crate::{EventsError, EventsResult};
