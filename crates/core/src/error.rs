use thiserror::Error;

use crate::types::BuildingId;

/// Startup configuration problems in the question catalog or the scene.
///
/// These are fatal: a session is never built from an invalid catalog.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("question catalog has {found} items, at least {required} are required")]
    TooFewQuestions { found: usize, required: usize },

    #[error("question {index} has an empty prompt")]
    EmptyPrompt { index: usize },

    #[error("question {index} has no options")]
    EmptyOptions { index: usize },

    #[error("question {index} lists option {option:?} more than once")]
    DuplicateOption { index: usize, option: String },

    #[error("question {index} declares a correct answer that is not one of its options")]
    MissingCorrectOption { index: usize },

    #[error("scene has no buildings")]
    NoBuildings,

    #[error("scene has {found} buildings, at most {max} can be selected")]
    TooManyBuildings { found: usize, max: usize },

    #[error("building id {0} is used more than once")]
    DuplicateBuildingId(BuildingId),

    #[error("building {id} is positioned outside the scene")]
    PositionOutOfRange { id: BuildingId },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
