//! Shortest-path adapter over `pathfinding::astar`.

use pathfinding::prelude::astar;

use crate::components::{Cell, Connectivity};

/// A move plan. `steps` excludes the mover's own cell, so `steps[0]` is the
/// next cell to enter and the last step is the goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub steps: Vec<Cell>,
}

impl Route {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn next_step(&self) -> Option<Cell> {
        self.steps.first().copied()
    }
}

/// Route from `from` to `to` through cells accepted by `passable`.
///
/// The goal itself is always enterable, so a route can end on an occupied or
/// otherwise filtered target. Returns `None` if no route exists.
pub fn route(
    from: Cell,
    to: Cell,
    passable: impl Fn(Cell) -> bool,
    connectivity: Connectivity,
) -> Option<Route> {
    let (path, _cost) = astar(
        &from,
        |cell| {
            cell.neighbors(connectivity)
                .filter(|n| *n == to || passable(*n))
                .map(|n| (n, 1u32))
                .collect::<Vec<_>>()
        },
        |cell| connectivity.distance(cell, &to),
        |cell| *cell == to,
    )?;

    Some(Route {
        steps: path.into_iter().skip(1).collect(),
    })
}
