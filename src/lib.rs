//! Planet Repair (workspace facade crate).
//!
//! Re-exports the member crates under `planet_repair::{core,adapter,term,input,engine,types}`
//! and adds the environment-driven [`config`] used by the binary.

pub use planet_repair_adapter as adapter;
pub use planet_repair_core as core;
pub use planet_repair_engine as engine;
pub use planet_repair_input as input;
pub use planet_repair_term as term;
pub use planet_repair_types as types;

pub mod config;
