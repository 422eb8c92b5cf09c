//! Session engine - wall-clock orchestration around the pure core.
//!
//! The core session only knows discrete `tick()` calls and the two-step
//! answer flow. [`SessionDriver`] turns elapsed milliseconds into those calls:
//! it fires one tick per full second of play and resolves a submitted answer
//! once the reveal delay has passed.

pub mod driver;

pub use planet_repair_core as core;
pub use planet_repair_types as types;

pub use driver::{DriverEvents, SessionDriver};
