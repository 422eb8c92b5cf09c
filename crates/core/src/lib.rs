//! Core game logic - pure, deterministic, and testable
//!
//! This crate holds the rules of the planet-repair game: the question bank and
//! its sampler, the building scene, and the session state machine. It has no
//! dependencies on terminals, sockets, or wall-clock time:
//!
//! - **Deterministic**: the same seed draws the same questions
//! - **Event-driven**: state changes only through explicit transitions
//! - **Renderer-agnostic**: renderers read a [`SessionSnapshot`] after each change
//!
//! # Module Structure
//!
//! - [`bank`]: validated question catalog and no-repeat sampling with round wrapping
//! - [`scene`]: the fixed building catalog
//! - [`session`]: phases, challenges, repairs, and the two-step answer flow
//! - [`clock`]: whole-second play clock and `MM:SS` formatting
//! - [`snapshot`]: render-ready copies of session state
//! - [`rng`]: small seeded generator used by the sampler
//!
//! # Game Rules
//!
//! - Clicking an unrepaired building opens a challenge of 3 questions that were
//!   not shown earlier in the current round
//! - A wrong answer (or closing the dialog) ends the attempt; the building stays damaged
//! - Three correct answers in one attempt repair the building
//! - Repairing every building completes the session and stops the clock
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use planet_repair_core::{GameSession, QuestionBank, Scene};
//! use planet_repair_types::{BuildingId, Resolution, SessionPhase};
//!
//! let bank = Arc::new(QuestionBank::builtin().unwrap());
//! let scene = Arc::new(Scene::reference());
//! let mut session = GameSession::new(bank, scene, 7);
//!
//! session.select_building(BuildingId(1)).unwrap();
//! assert_eq!(session.phase(), SessionPhase::InProgress);
//!
//! for _ in 0..3 {
//!     let answer = session.challenge().unwrap().current_question().correct_option.clone();
//!     session.submit_answer(&answer).unwrap();
//!     session.resolve_answer().unwrap();
//! }
//! assert!(session.is_repaired(BuildingId(1)));
//! ```

pub mod bank;
pub mod clock;
pub mod error;
pub mod rng;
pub mod scene;
pub mod session;
pub mod snapshot;

pub use planet_repair_types as types;

// Re-export commonly used types for convenience
pub use bank::{Draw, QuestionBank, UsedQuestions};
pub use clock::{format_clock, SessionClock};
pub use error::ConfigError;
pub use rng::SimpleRng;
pub use scene::Scene;
pub use session::{ActionOutcome, ActiveChallenge, ChallengeIndices, GameSession};
pub use snapshot::{percent, BuildingSnapshot, ChallengeSnapshot, SessionSnapshot};
