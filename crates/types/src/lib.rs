//! Shared types - plain data used by every crate in the workspace
//!
//! Everything here is pure data with no game logic, so it can be used by the
//! core session, the terminal renderer, and the JSON bridge alike.
//!
//! # Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 1000 | One session clock tick (one real-time second) |
//! | `REVEAL_DELAY_MS` | 1000 | Pause between answering and resolving a question |
//! | `QUESTIONS_PER_CHALLENGE` | 3 | Questions drawn for every building attempt |
//!
//! # Examples
//!
//! ```
//! use planet_repair_types::{BuildingId, SessionAction, SessionPhase};
//!
//! let action = SessionAction::SelectBuilding(BuildingId(3));
//! assert_eq!(action.as_str(), "selectBuilding");
//!
//! assert_eq!(SessionPhase::from_str("inProgress"), Some(SessionPhase::InProgress));
//! assert!(SessionPhase::Complete.is_terminal());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of questions drawn for a single building attempt
pub const QUESTIONS_PER_CHALLENGE: usize = 3;

/// Smallest question catalog the sampler accepts
pub const MIN_QUESTION_COUNT: usize = QUESTIONS_PER_CHALLENGE;

/// Most buildings a scene may hold, one per keyboard digit 1..=9
pub const MAX_BUILDINGS: usize = 9;

/// One clock tick in milliseconds
pub const TICK_MS: u32 = 1000;

/// Default pause between answer submission and resolution
pub const REVEAL_DELAY_MS: u32 = 1000;

/// Stable identifier of a building in the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildingId(pub u32);

impl fmt::Display for BuildingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position in normalized scene coordinates (both axes in `[0, 1]`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenePosition {
    pub x: f32,
    pub y: f32,
}

impl ScenePosition {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_normalized(&self) -> bool {
        (0.0..=1.0).contains(&self.x) && (0.0..=1.0).contains(&self.y)
    }
}

/// A repairable building
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub id: BuildingId,
    #[serde(flatten)]
    pub position: ScenePosition,
}

impl Building {
    pub const fn new(id: u32, x: f32, y: f32) -> Self {
        Self {
            id: BuildingId(id),
            position: ScenePosition::new(x, y),
        }
    }
}

/// A multiple-choice quiz item
///
/// The wire names follow the question files the game ships with
/// (`question` / `correctAnswer`); `prompt` / `correctOption` are accepted too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionItem {
    #[serde(rename = "question", alias = "prompt")]
    pub prompt: String,
    pub options: Vec<String>,
    #[serde(rename = "correctAnswer", alias = "correctOption")]
    pub correct_option: String,
}

impl QuestionItem {
    pub fn new(prompt: &str, options: &[&str], correct_option: &str) -> Self {
        Self {
            prompt: prompt.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            correct_option: correct_option.to_string(),
        }
    }

    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct_option == answer
    }
}

/// Coarse lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionPhase {
    #[default]
    NotStarted,
    InProgress,
    Complete,
}

impl SessionPhase {
    /// Parse phase from its camelCase wire name
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "notStarted" => Some(SessionPhase::NotStarted),
            "inProgress" => Some(SessionPhase::InProgress),
            "complete" => Some(SessionPhase::Complete),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::NotStarted => "notStarted",
            SessionPhase::InProgress => "inProgress",
            SessionPhase::Complete => "complete",
        }
    }

    /// Only a reset leaves this phase.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionPhase::Complete)
    }
}

/// Intents a renderer can send into a session
///
/// Human input and the JSON bridge both funnel through these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Leave the start dialog
    Start,
    /// Click on a building
    SelectBuilding(BuildingId),
    /// Pick an answer for the current question
    SubmitAnswer(String),
    /// Apply the recorded answer (after the reveal pause)
    ResolveAnswer,
    /// Close the question dialog without answering
    AbandonChallenge,
    /// One second of play time
    Tick,
    /// Play again
    Reset,
}

impl SessionAction {
    /// camelCase name used by the bridge protocol
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionAction::Start => "start",
            SessionAction::SelectBuilding(_) => "selectBuilding",
            SessionAction::SubmitAnswer(_) => "submitAnswer",
            SessionAction::ResolveAnswer => "resolveAnswer",
            SessionAction::AbandonChallenge => "abandonChallenge",
            SessionAction::Tick => "tick",
            SessionAction::Reset => "reset",
        }
    }
}

/// What `resolveAnswer` did with the recorded answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Resolution {
    /// Wrong answer: the attempt is over and the building stays damaged
    Failed { building: BuildingId },
    /// Correct answer: the challenge moved on to question `index`
    Advanced { building: BuildingId, index: usize },
    /// Third correct answer: the building is repaired
    Repaired { building: BuildingId, complete: bool },
}

/// A transition the session refused
///
/// A rejected transition never changes session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("building {0} does not exist")]
    UnknownBuilding(BuildingId),
    #[error("building {0} is already repaired")]
    AlreadyRepaired(BuildingId),
    #[error("a challenge is already open")]
    ChallengeOpen,
    #[error("no challenge is open")]
    NoChallenge,
    #[error("the current question is already answered")]
    AlreadyAnswered,
    #[error("the current question has not been answered")]
    NotAnswered,
    #[error("the session is complete")]
    SessionComplete,
}

impl TransitionError {
    /// snake_case reason code for the bridge protocol
    pub fn code(&self) -> &'static str {
        match self {
            TransitionError::UnknownBuilding(_) => "unknown_building",
            TransitionError::AlreadyRepaired(_) => "already_repaired",
            TransitionError::ChallengeOpen => "challenge_open",
            TransitionError::NoChallenge => "no_challenge",
            TransitionError::AlreadyAnswered => "already_answered",
            TransitionError::NotAnswered => "not_answered",
            TransitionError::SessionComplete => "session_complete",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timing_defaults_match_reference_game() {
        assert_eq!(TICK_MS, 1000);
        assert_eq!(REVEAL_DELAY_MS, 1000);
        assert_eq!(QUESTIONS_PER_CHALLENGE, 3);
        assert_eq!(MIN_QUESTION_COUNT, 3);
    }

    #[test]
    fn question_item_reads_reference_field_names() {
        let raw = r#"{"question":"Q?","options":["a","b"],"correctAnswer":"b"}"#;
        let item: QuestionItem = serde_json::from_str(raw).unwrap();
        assert_eq!(item.prompt, "Q?");
        assert!(item.is_correct("b"));
        assert!(!item.is_correct("a"));

        let raw = r#"{"prompt":"Q?","options":["a","b"],"correctOption":"a"}"#;
        let item: QuestionItem = serde_json::from_str(raw).unwrap();
        assert_eq!(item.correct_option, "a");
    }

    #[test]
    fn building_flattens_position() {
        let b: Building = serde_json::from_str(r#"{"id":4,"x":0.6,"y":0.45}"#).unwrap();
        assert_eq!(b.id, BuildingId(4));
        assert!(b.position.is_normalized());
    }

    #[test]
    fn phase_round_trips_through_wire_names() {
        for phase in [
            SessionPhase::NotStarted,
            SessionPhase::InProgress,
            SessionPhase::Complete,
        ] {
            assert_eq!(SessionPhase::from_str(phase.as_str()), Some(phase));
        }
        assert_eq!(SessionPhase::from_str("paused"), None);
    }

    #[test]
    fn transition_error_codes_are_distinct() {
        let errors = [
            TransitionError::UnknownBuilding(BuildingId(1)),
            TransitionError::AlreadyRepaired(BuildingId(1)),
            TransitionError::ChallengeOpen,
            TransitionError::NoChallenge,
            TransitionError::AlreadyAnswered,
            TransitionError::NotAnswered,
            TransitionError::SessionComplete,
        ];
        let mut codes: Vec<_> = errors.iter().map(|e| e.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }
}
