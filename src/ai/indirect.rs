//! Indirect pursuer: wanders from box to box smashing them, and catches the
//! seeker if their paths cross. Moves diagonally.

use micromegas_tracing::prelude::*;
use rand::RngCore;

use super::{PursuitOutcome, step_if_free};
use crate::components::{Cell, Connectivity};
use crate::grid::{Tile, TileGrid};
use crate::pathing::route;

/// One turn. A capture at turn start does not cut the turn short; the pursuer
/// still moves and may smash its box. Capture after the step wins over
/// destroying the box underfoot.
#[span_fn]
pub fn take_turn(
    position: &mut Cell,
    target: &mut Option<Cell>,
    seeker: Cell,
    grid: &mut TileGrid,
    other_pursuers: &[Cell],
    rng: &mut dyn RngCore,
) -> PursuitOutcome {
    let mut outcome = PursuitOutcome {
        caught_seeker: *position == seeker,
        destroyed: None,
    };

    let still_a_box = target.is_some_and(|t| grid.tile_at(t) == Ok(Tile::Box));
    if !still_a_box {
        *target = grid.random_cells_of_type(Tile::Box, 1, rng).first().copied();
    }
    let Some(goal) = *target else {
        return outcome;
    };

    match route(*position, goal, |c| grid.is_passable(c), Connectivity::Eight) {
        Some(plan) => {
            if let Some(next) = plan.next_step() {
                step_if_free(position, next, other_pursuers);
            }
        }
        None => {
            debug!("indirect pursuer at {} cannot reach box {}", position, goal);
            *target = None;
            return outcome;
        }
    }

    if *position == seeker {
        outcome.caught_seeker = true;
    } else if *position == goal {
        *target = None;
        outcome.destroyed = Some(grid.destroy_box(goal));
    }
    outcome
}
