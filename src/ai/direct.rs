//! Direct pursuer: 4-connected shortest path straight at the seeker.

use micromegas_tracing::prelude::*;

use super::{PursuitOutcome, step_if_free};
use crate::components::{Cell, Connectivity};
use crate::grid::TileGrid;
use crate::pathing::route;

/// One turn. Capture is checked before moving (already adjacent or on top of
/// the seeker) and again after the step.
#[span_fn]
pub fn take_turn(
    position: &mut Cell,
    seeker: Cell,
    grid: &TileGrid,
    other_pursuers: &[Cell],
) -> PursuitOutcome {
    let Some(plan) = route(*position, seeker, |c| grid.is_passable(c), Connectivity::Four) else {
        debug!("direct pursuer at {} has no route to {}", position, seeker);
        return PursuitOutcome::default();
    };

    if plan.len() <= 1 {
        return PursuitOutcome::caught();
    }

    if let Some(next) = plan.next_step() {
        step_if_free(position, next, other_pursuers);
    }

    if *position == seeker {
        return PursuitOutcome::caught();
    }
    PursuitOutcome::default()
}
