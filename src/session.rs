//! Session counters and difficulty scaling across rounds.

use rand::Rng;

use crate::actor::ActorKind;

/// Why a round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoundOverReason {
    PrizeFound,
    PrizeDestroyed,
    SeekerCaught,
}

impl RoundOverReason {
    pub fn keeps_progress(&self) -> bool {
        matches!(self, RoundOverReason::PrizeFound)
    }

    pub fn prompt(&self) -> &'static str {
        if self.keeps_progress() {
            "Press Enter to continue"
        } else {
            "Press Enter to restart"
        }
    }
}

/// Progress counters. Survive a found prize, not a loss.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Session {
    pub turns: u64,
    pub prizes_found: u32,
    /// Boxes searched over the whole session.
    pub boxes_searched: u32,
    /// `boxes_searched` when the current round started.
    pub boxes_baseline: u32,
}

impl Session {
    /// Apply the end of a round ending for `reason`.
    pub fn conclude_round(&mut self, reason: RoundOverReason) {
        if reason.keeps_progress() {
            self.boxes_baseline = self.boxes_searched;
        } else {
            *self = Session::default();
        }
    }

    /// Boxes searched since the current round started.
    pub fn boxes_searched_this_round(&self) -> u32 {
        self.boxes_searched - self.boxes_baseline
    }

    pub fn pursuer_count(&self) -> usize {
        1 + (self.prizes_found / 3) as usize
    }

    /// Pursuer kinds for the next round, in spawn order. The first is always
    /// direct; once a prize has been found each extra one is a coin flip.
    pub fn pursuer_lineup(&self, rng: &mut (impl Rng + ?Sized)) -> Vec<ActorKind> {
        (0..self.pursuer_count())
            .map(|i| {
                if i > 0 && self.prizes_found >= 1 && rng.gen_bool(0.5) {
                    ActorKind::IndirectPursuer
                } else {
                    ActorKind::DirectPursuer
                }
            })
            .collect()
    }
}
