//! Pursuer AI. Each pursuer kind has its own per-turn decision procedure;
//! both share the occupancy rule and report what happened via [`PursuitOutcome`].

pub mod direct;
pub mod indirect;

use crate::components::Cell;
use crate::grid::DestroyOutcome;

/// What a pursuer's turn did to the round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PursuitOutcome {
    pub caught_seeker: bool,
    pub destroyed: Option<DestroyOutcome>,
}

impl PursuitOutcome {
    pub fn caught() -> Self {
        PursuitOutcome {
            caught_seeker: true,
            destroyed: None,
        }
    }

    pub fn destroyed_prize(&self) -> bool {
        matches!(self.destroyed, Some(DestroyOutcome::Destroyed { prize: true }))
    }
}

/// Step to `next` unless another pursuer already stands there.
/// Returns whether the pursuer moved.
pub fn step_if_free(position: &mut Cell, next: Cell, other_pursuers: &[Cell]) -> bool {
    if other_pursuers.contains(&next) {
        return false;
    }
    *position = next;
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn occupied_step_is_rejected() {
        let mut at = Cell::new(0, 0);
        assert!(!step_if_free(&mut at, Cell::new(1, 0), &[Cell::new(1, 0)]));
        assert_eq!(at, Cell::new(0, 0));
        assert!(step_if_free(&mut at, Cell::new(0, 1), &[Cell::new(1, 0)]));
        assert_eq!(at, Cell::new(0, 1));
    }
}
