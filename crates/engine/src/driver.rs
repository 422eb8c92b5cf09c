//! Session driver: fixed one-second ticks and the answer reveal delay.

use tracing::warn;

use crate::core::{ActionOutcome, GameSession, SessionSnapshot};
use crate::types::{Resolution, SessionAction, SessionPhase, TransitionError, TICK_MS};

/// What one [`SessionDriver::advance`] call changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverEvents {
    /// Clock ticks that landed
    pub ticks: u32,
    /// Answer resolved because its reveal delay ran out
    pub resolution: Option<Resolution>,
}

impl DriverEvents {
    pub fn changed(&self) -> bool {
        self.ticks > 0 || self.resolution.is_some()
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingResolve {
    remaining_ms: u32,
}

/// Owns a session and feeds it time.
///
/// Accumulated tick time is tagged with the session episode and is dropped
/// whenever the session leaves `InProgress` or is reset, so a second that
/// started before a completion or reset never lands after it.
#[derive(Debug, Clone)]
pub struct SessionDriver {
    session: GameSession,
    reveal_delay_ms: u32,
    tick_accum_ms: u32,
    tick_episode: u32,
    pending_resolve: Option<PendingResolve>,
}

impl SessionDriver {
    pub fn new(session: GameSession, reveal_delay_ms: u32) -> Self {
        let tick_episode = session.episode_id();
        Self {
            session,
            reveal_delay_ms,
            tick_accum_ms: 0,
            tick_episode,
            pending_resolve: None,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    pub fn snapshot_into(&self, out: &mut SessionSnapshot) {
        self.session.snapshot_into(out);
    }

    pub fn reveal_delay_ms(&self) -> u32 {
        self.reveal_delay_ms
    }

    /// Remaining reveal time of a submitted answer, if one is pending.
    pub fn pending_resolve_ms(&self) -> Option<u32> {
        self.pending_resolve.map(|p| p.remaining_ms)
    }

    /// Apply a player action.
    ///
    /// A successful `SubmitAnswer` schedules its resolution; resolving,
    /// abandoning, or resetting cancels a scheduled one.
    pub fn apply(&mut self, action: SessionAction) -> Result<ActionOutcome, TransitionError> {
        let outcome = self.session.apply_action(action)?;
        match outcome {
            ActionOutcome::Answered { .. } => {
                self.pending_resolve = Some(PendingResolve {
                    remaining_ms: self.reveal_delay_ms,
                });
            }
            ActionOutcome::Resolved(_) | ActionOutcome::Abandoned(_) | ActionOutcome::Reset => {
                self.pending_resolve = None;
            }
            _ => {}
        }
        self.sync_tick_guard();
        Ok(outcome)
    }

    /// Feed `elapsed_ms` of wall time.
    ///
    /// A resolve that falls due inside the window splits it: only the time
    /// before the resolve can tick, and the rest ticks only if the session
    /// is still in progress afterwards.
    pub fn advance(&mut self, elapsed_ms: u32) -> DriverEvents {
        let mut events = DriverEvents::default();
        self.sync_tick_guard();

        let mut rest_ms = elapsed_ms;
        if let Some(pending) = self.pending_resolve.as_mut() {
            if pending.remaining_ms > elapsed_ms {
                pending.remaining_ms -= elapsed_ms;
            } else {
                let due_ms = pending.remaining_ms;
                self.pending_resolve = None;
                events.ticks += self.run_clock(due_ms);
                rest_ms -= due_ms;

                match self.session.resolve_answer() {
                    Ok(resolution) => events.resolution = Some(resolution),
                    Err(e) => warn!(error = %e, "scheduled resolve was refused"),
                }
                self.sync_tick_guard();
            }
        }

        events.ticks += self.run_clock(rest_ms);
        self.sync_tick_guard();
        events
    }

    /// Accumulate play time and fire the ticks it completes.
    fn run_clock(&mut self, elapsed_ms: u32) -> u32 {
        if self.session.phase() != SessionPhase::InProgress {
            return 0;
        }
        let mut ticks = 0;
        self.tick_accum_ms = self.tick_accum_ms.saturating_add(elapsed_ms);
        while self.tick_accum_ms >= TICK_MS {
            self.tick_accum_ms -= TICK_MS;
            if self.session.tick_for_episode(self.tick_episode) {
                ticks += 1;
            }
        }
        ticks
    }

    fn sync_tick_guard(&mut self) {
        let episode = self.session.episode_id();
        if self.session.phase() != SessionPhase::InProgress || episode != self.tick_episode {
            self.tick_accum_ms = 0;
            self.tick_episode = episode;
        }
    }
}
