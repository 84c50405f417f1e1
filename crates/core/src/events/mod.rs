//! Domain events module.
//!
//! Provides domain event types and the sink trait for emitting events
//! after successful domain mutations. Runtime adapters (the realtime
//! WebSocket hub in the server) implement the sink to fan committed
//! state changes out to connected clients.

mod domain_event;
mod sink;

pub use domain_event::*;
pub use sink::*;
