//! Realtime fan-out of committed domain events to connected clients.

mod hub;
mod sink;
mod ws;

pub use hub::{ConnectionId, RealtimeHub};
pub use sink::RealtimeEventSink;
pub use ws::handler_ws;
