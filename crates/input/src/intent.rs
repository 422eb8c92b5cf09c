//! Resolve intents against what is on screen.

use crate::core::SessionSnapshot;
use crate::map::KeyIntent;
use crate::types::{SessionAction, SessionPhase};

/// Turn an intent into the action the current screen offers, if any.
///
/// Intents with no counterpart on screen (a digit past the last building, a
/// second answer while the first is being revealed, a repaired building)
/// produce nothing, so the session never sees them.
pub fn intent_to_action(intent: KeyIntent, snap: &SessionSnapshot) -> Option<SessionAction> {
    match intent {
        KeyIntent::Confirm => match snap.phase {
            SessionPhase::NotStarted => Some(SessionAction::Start),
            SessionPhase::Complete => Some(SessionAction::Reset),
            SessionPhase::InProgress => None,
        },
        KeyIntent::Choose(n) => {
            let slot = n.checked_sub(1)?;
            if let Some(challenge) = &snap.challenge {
                if !challenge.awaiting_answer() {
                    return None;
                }
                let option = challenge.options.get(slot)?;
                return Some(SessionAction::SubmitAnswer(option.clone()));
            }
            if snap.phase == SessionPhase::Complete {
                return None;
            }
            let building = snap.buildings.get(slot)?;
            if building.repaired {
                return None;
            }
            Some(SessionAction::SelectBuilding(building.id))
        }
        KeyIntent::Dismiss => snap
            .challenge
            .as_ref()
            .map(|_| SessionAction::AbandonChallenge),
        KeyIntent::Reset => Some(SessionAction::Reset),
    }
}
