use serde::{Deserialize, Serialize};

use crate::clock::format_clock;
use crate::types::{BuildingId, SessionPhase};

/// Rounded percentage, halves rounding up (`1/8` is 13%).
pub fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part * 200 + whole) / (2 * whole)) as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BuildingSnapshot {
    pub id: BuildingId,
    pub x: f32,
    pub y: f32,
    pub repaired: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeSnapshot {
    pub building: BuildingId,
    pub question_indices: Vec<usize>,
    pub current_index: usize,
    pub question_count: usize,
    pub prompt: String,
    pub options: Vec<String>,
    pub selected_answer: Option<String>,
    pub answer_correct: Option<bool>,
}

impl ChallengeSnapshot {
    /// "Question i/n" progress, counting the question on screen.
    pub fn progress_percent(&self) -> u32 {
        percent(self.current_index + 1, self.question_count)
    }

    pub fn awaiting_answer(&self) -> bool {
        self.selected_answer.is_none()
    }
}

/// Everything a renderer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub buildings: Vec<BuildingSnapshot>,
    pub repaired: Vec<BuildingId>,
    pub building_count: usize,
    pub used_questions: Vec<usize>,
    pub challenge: Option<ChallengeSnapshot>,
    pub elapsed_seconds: u32,
    pub clock_running: bool,
    pub episode_id: u32,
}

impl SessionSnapshot {
    pub fn clear(&mut self) {
        self.phase = SessionPhase::NotStarted;
        self.buildings.clear();
        self.repaired.clear();
        self.building_count = 0;
        self.used_questions.clear();
        self.challenge = None;
        self.elapsed_seconds = 0;
        self.clock_running = false;
        self.episode_id = 0;
    }

    pub fn repaired_count(&self) -> usize {
        self.repaired.len()
    }

    pub fn is_repaired(&self, id: BuildingId) -> bool {
        self.repaired.binary_search(&id).is_ok()
    }

    pub fn progress_percent(&self) -> u32 {
        percent(self.repaired.len(), self.building_count)
    }

    pub fn formatted_clock(&self) -> String {
        format_clock(self.elapsed_seconds)
    }

    /// Buildings that accept a click right now.
    pub fn selectable(&self) -> bool {
        self.challenge.is_none() && self.phase != SessionPhase::Complete
    }
}
