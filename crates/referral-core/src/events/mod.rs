//! Inbound platform events consumed by the dispatcher

mod gateway_event;

pub use gateway_event::{GatewayEvent, IncomingMessage, NavDirection};
