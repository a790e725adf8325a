//! Event dispatch
//!
//! Routes inbound platform events to the services, owns the per-guild
//! invite cache, and drives the coalescing refresh scheduler.

mod dispatcher;
mod guide;
mod refresh;

pub use dispatcher::Dispatcher;
pub use refresh::{RefreshHandle, RefreshScheduler};
