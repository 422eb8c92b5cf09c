//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`KeyIntent`]s, then resolves an intent
//! against the current [`SessionSnapshot`](crate::core::SessionSnapshot) into a
//! [`SessionAction`](crate::types::SessionAction). Digits mean "building N" on
//! the scene and "option N" inside the question dialog, so the snapshot is
//! needed to tell them apart.

pub mod intent;
pub mod map;

pub use planet_repair_core as core;
pub use planet_repair_types as types;

pub use intent::intent_to_action;
pub use map::{handle_key_event, should_quit, KeyIntent};
