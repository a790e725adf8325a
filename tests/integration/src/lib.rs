//! Integration test support
//!
//! An in-memory SQLite pool behind the real repositories plus a scripted
//! in-memory `ChatGateway` fake, so end-to-end scenarios run without a
//! platform connection.

pub mod fixtures;
pub mod helpers;

pub use fixtures::{invite, member, test_config, TestHarness};
pub use helpers::{FakeGateway, FakeMessage};
