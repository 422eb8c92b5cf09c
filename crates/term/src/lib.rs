//! Terminal renderer for the repair scene.
//!
//! A small game-oriented rendering layer: the session snapshot is drawn into
//! a framebuffer (pure, testable), and the framebuffer is flushed to the
//! terminal with row-level diffing.
//!
//! Layout:
//! - HUD row with title, `Repaired: r/N`, and the `MM:SS` clock
//! - The scene, with buildings placed by their normalized coordinates
//! - Repair progress bar with percentage
//! - Modal dialogs for start, questions, and completion

pub mod fb;
pub mod renderer;
pub mod scene_view;

pub use planet_repair_core as core;
pub use planet_repair_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use renderer::{changed_rows, encode_full_into, encode_rows_into, TerminalRenderer};
pub use scene_view::{SceneView, Viewport};
