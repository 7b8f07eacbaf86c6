//! Domain events module.
//!
//! Provides domain event types and the sink trait for emitting events after
//! successful ledger mutations. Runtime adapters implement the sink to bridge
//! events to the concrete delivery transport.

mod domain_event;
mod sink;

pub use domain_event::*;
pub use sink::*;
