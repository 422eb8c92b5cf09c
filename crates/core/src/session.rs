//! Game session - the single source of truth for a game
//!
//! A session owns the repair set, the used-question set of the current round,
//! the open challenge (if any), the clock, and the phase. Every change goes
//! through one of the transition methods below; a rejected transition returns
//! a [`TransitionError`] and leaves the session untouched.
//!
//! Answering is split in two steps: [`GameSession::submit_answer`] records and
//! grades the answer, [`GameSession::resolve_answer`] acts on it. The renderer
//! decides how long to show the graded answer in between.

use std::collections::BTreeSet;
use std::sync::Arc;

use arrayvec::ArrayVec;
use tracing::{debug, info};

use crate::bank::{QuestionBank, UsedQuestions};
use crate::clock::SessionClock;
use crate::rng::SimpleRng;
use crate::scene::Scene;
use crate::snapshot::{percent, BuildingSnapshot, ChallengeSnapshot, SessionSnapshot};
use crate::types::*;

/// Drawn catalog indices of one challenge, in draw order
pub type ChallengeIndices = ArrayVec<usize, QUESTIONS_PER_CHALLENGE>;

/// The question dialog of one building attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveChallenge {
    building: BuildingId,
    indices: ChallengeIndices,
    questions: ArrayVec<QuestionItem, QUESTIONS_PER_CHALLENGE>,
    current_index: usize,
    selected_answer: Option<String>,
    answer_correct: Option<bool>,
}

impl ActiveChallenge {
    pub fn building(&self) -> BuildingId {
        self.building
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn questions(&self) -> &[QuestionItem] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> &QuestionItem {
        &self.questions[self.current_index]
    }

    pub fn selected_answer(&self) -> Option<&str> {
        self.selected_answer.as_deref()
    }

    pub fn answer_correct(&self) -> Option<bool> {
        self.answer_correct
    }

    fn is_last_question(&self) -> bool {
        self.current_index + 1 >= self.questions.len()
    }

    fn snapshot(&self) -> ChallengeSnapshot {
        let question = self.current_question();
        ChallengeSnapshot {
            building: self.building,
            question_indices: self.indices.to_vec(),
            current_index: self.current_index,
            question_count: self.questions.len(),
            prompt: question.prompt.clone(),
            options: question.options.clone(),
            selected_answer: self.selected_answer.clone(),
            answer_correct: self.answer_correct,
        }
    }
}

/// What a dispatched [`SessionAction`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// `true` when the session actually left `NotStarted`
    Started(bool),
    ChallengeOpened {
        building: BuildingId,
        indices: ChallengeIndices,
    },
    Answered { correct: bool },
    Resolved(Resolution),
    Abandoned(BuildingId),
    /// `true` when the clock advanced
    Ticked(bool),
    Reset,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameSession {
    bank: Arc<QuestionBank>,
    scene: Arc<Scene>,
    rng: SimpleRng,
    repaired: BTreeSet<BuildingId>,
    used: UsedQuestions,
    challenge: Option<ActiveChallenge>,
    clock: SessionClock,
    phase: SessionPhase,
    /// Monotonic reset counter; ticks carry it so stale ones can be dropped.
    episode_id: u32,
}

impl GameSession {
    /// Create a session over a validated bank and scene.
    pub fn new(bank: Arc<QuestionBank>, scene: Arc<Scene>, seed: u32) -> Self {
        Self {
            bank,
            scene,
            rng: SimpleRng::new(seed),
            repaired: BTreeSet::new(),
            used: UsedQuestions::new(),
            challenge: None,
            clock: SessionClock::new(),
            phase: SessionPhase::NotStarted,
            episode_id: 0,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn building_count(&self) -> usize {
        self.scene.len()
    }

    pub fn repaired(&self) -> impl Iterator<Item = BuildingId> + '_ {
        self.repaired.iter().copied()
    }

    pub fn repaired_count(&self) -> usize {
        self.repaired.len()
    }

    pub fn is_repaired(&self, id: BuildingId) -> bool {
        self.repaired.contains(&id)
    }

    pub fn used_questions(&self) -> &UsedQuestions {
        &self.used
    }

    pub fn challenge(&self) -> Option<&ActiveChallenge> {
        self.challenge.as_ref()
    }

    pub fn clock(&self) -> &SessionClock {
        &self.clock
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.clock.elapsed_seconds()
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn progress_percent(&self) -> u32 {
        percent(self.repaired.len(), self.scene.len())
    }

    /// Leave `NotStarted` and start the clock.
    ///
    /// Returns `false` (and does nothing) in any other phase.
    pub fn start_session(&mut self) -> bool {
        if self.phase != SessionPhase::NotStarted {
            return false;
        }
        self.phase = SessionPhase::InProgress;
        self.clock.start();
        info!(episode = self.episode_id, "session started");
        true
    }

    /// Open a challenge for an unrepaired building.
    ///
    /// The first click of a fresh session also starts it.
    pub fn select_building(&mut self, id: BuildingId) -> Result<ChallengeIndices, TransitionError> {
        if self.phase == SessionPhase::Complete {
            return Err(TransitionError::SessionComplete);
        }
        if self.challenge.is_some() {
            return Err(TransitionError::ChallengeOpen);
        }
        if !self.scene.contains(id) {
            return Err(TransitionError::UnknownBuilding(id));
        }
        if self.repaired.contains(&id) {
            return Err(TransitionError::AlreadyRepaired(id));
        }

        self.start_session();

        let draw = self
            .bank
            .sample_unused(QUESTIONS_PER_CHALLENGE, &self.used, &mut self.rng);
        let indices: ChallengeIndices = draw.indices.iter().copied().collect();
        let questions = indices
            .iter()
            .filter_map(|&i| self.bank.get(i).cloned())
            .collect();

        debug!(
            building = id.0,
            indices = ?draw.indices,
            wrapped = draw.wrapped,
            "challenge opened"
        );

        self.used = draw.used;
        self.challenge = Some(ActiveChallenge {
            building: id,
            indices: indices.clone(),
            questions,
            current_index: 0,
            selected_answer: None,
            answer_correct: None,
        });
        Ok(indices)
    }

    /// Record and grade an answer for the current question.
    pub fn submit_answer(&mut self, answer: &str) -> Result<bool, TransitionError> {
        let challenge = self.challenge.as_mut().ok_or(TransitionError::NoChallenge)?;
        if challenge.selected_answer.is_some() {
            return Err(TransitionError::AlreadyAnswered);
        }

        let correct = challenge.current_question().is_correct(answer);
        challenge.selected_answer = Some(answer.to_string());
        challenge.answer_correct = Some(correct);

        debug!(
            building = challenge.building.0,
            question = challenge.current_index,
            correct,
            "answer submitted"
        );
        Ok(correct)
    }

    /// Act on the graded answer: fail the attempt, move to the next
    /// question, or repair the building.
    pub fn resolve_answer(&mut self) -> Result<Resolution, TransitionError> {
        let challenge = self.challenge.as_mut().ok_or(TransitionError::NoChallenge)?;
        let correct = challenge.answer_correct.ok_or(TransitionError::NotAnswered)?;
        let building = challenge.building;

        if !correct {
            self.challenge = None;
            debug!(building = building.0, "attempt failed");
            return Ok(Resolution::Failed { building });
        }

        if !challenge.is_last_question() {
            challenge.current_index += 1;
            challenge.selected_answer = None;
            challenge.answer_correct = None;
            return Ok(Resolution::Advanced {
                building,
                index: challenge.current_index,
            });
        }

        self.challenge = None;
        self.repaired.insert(building);
        debug!(
            building = building.0,
            repaired = self.repaired.len(),
            "building repaired"
        );

        let complete = self.repaired.len() == self.scene.len();
        if complete {
            self.phase = SessionPhase::Complete;
            self.clock.stop();
            info!(
                elapsed_seconds = self.clock.elapsed_seconds(),
                "all buildings repaired"
            );
        }
        Ok(Resolution::Repaired { building, complete })
    }

    /// Close the question dialog, discarding the attempt.
    pub fn abandon_challenge(&mut self) -> Result<BuildingId, TransitionError> {
        let challenge = self.challenge.take().ok_or(TransitionError::NoChallenge)?;
        debug!(building = challenge.building.0, "attempt abandoned");
        Ok(challenge.building)
    }

    /// One second of play time. Ignored outside `InProgress`.
    pub fn tick(&mut self) -> bool {
        if self.phase != SessionPhase::InProgress {
            return false;
        }
        self.clock.tick()
    }

    /// Tick scheduled during `episode`; dropped if a reset happened since.
    pub fn tick_for_episode(&mut self, episode: u32) -> bool {
        if episode != self.episode_id {
            return false;
        }
        self.tick()
    }

    /// Back to the creation-time state. The RNG keeps advancing so a new
    /// game draws new questions.
    pub fn reset_session(&mut self) {
        self.repaired.clear();
        self.used = UsedQuestions::new();
        self.challenge = None;
        self.clock = SessionClock::new();
        self.phase = SessionPhase::NotStarted;
        self.episode_id = self.episode_id.wrapping_add(1);
        info!(episode = self.episode_id, "session reset");
    }

    /// Dispatch an action to the matching transition.
    pub fn apply_action(&mut self, action: SessionAction) -> Result<ActionOutcome, TransitionError> {
        match action {
            SessionAction::Start => Ok(ActionOutcome::Started(self.start_session())),
            SessionAction::SelectBuilding(building) => {
                let indices = self.select_building(building)?;
                Ok(ActionOutcome::ChallengeOpened { building, indices })
            }
            SessionAction::SubmitAnswer(answer) => {
                let correct = self.submit_answer(&answer)?;
                Ok(ActionOutcome::Answered { correct })
            }
            SessionAction::ResolveAnswer => self.resolve_answer().map(ActionOutcome::Resolved),
            SessionAction::AbandonChallenge => self.abandon_challenge().map(ActionOutcome::Abandoned),
            SessionAction::Tick => Ok(ActionOutcome::Ticked(self.tick())),
            SessionAction::Reset => {
                self.reset_session();
                Ok(ActionOutcome::Reset)
            }
        }
    }

    pub fn snapshot_into(&self, out: &mut SessionSnapshot) {
        out.clear();
        out.phase = self.phase;
        out.buildings.extend(self.scene.buildings().iter().map(|b| BuildingSnapshot {
            id: b.id,
            x: b.position.x,
            y: b.position.y,
            repaired: self.repaired.contains(&b.id),
        }));
        out.repaired.extend(self.repaired.iter().copied());
        out.building_count = self.scene.len();
        out.used_questions.extend(self.used.iter());
        out.challenge = self.challenge.as_ref().map(ActiveChallenge::snapshot);
        out.elapsed_seconds = self.clock.elapsed_seconds();
        out.clock_running = self.clock.running();
        out.episode_id = self.episode_id;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let mut s = SessionSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}
