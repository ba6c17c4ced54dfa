//! # Event Bus Module
//!
//! Publish/subscribe channel for signing workflow events. The controller
//! publishes stage changes, capture results and submission steps; UI layers
//! and loggers subscribe with category filters.
//!
//! ```rust,ignore
//! use contractsign_core::event_bus::{event_bus, EventCategory, EventFilter, WorkflowEvent};
//!
//! let subscription = event_bus().subscribe(
//!     EventFilter::Categories(vec![EventCategory::Stage]),
//!     |event| println!("{}", event.description()),
//! );
//! event_bus().unsubscribe(subscription);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
