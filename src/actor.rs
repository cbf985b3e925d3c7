//! Actors: the seeker and the pursuers sharing the grid.

use bevy::color::Color;

use crate::components::Cell;
use crate::render::Glyph;

/// Closed set of actor kinds. Everything that branches on kind matches this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorKind {
    Seeker,
    DirectPursuer,
    IndirectPursuer,
}

impl ActorKind {
    /// Name used in narrative messages.
    pub fn name(&self) -> &'static str {
        match self {
            ActorKind::Seeker => "you",
            ActorKind::DirectPursuer => "Pedro",
            ActorKind::IndirectPursuer => "tiny Pedro",
        }
    }

    pub fn glyph(&self) -> Glyph {
        match self {
            ActorKind::Seeker => Glyph::new('@').with_foreground(Color::srgb_u8(0xff, 0xff, 0x00)),
            ActorKind::DirectPursuer => {
                Glyph::new('P').with_foreground(Color::srgb_u8(0xff, 0x00, 0x00))
            }
            ActorKind::IndirectPursuer => {
                Glyph::new('p').with_foreground(Color::srgb_u8(0x00, 0x00, 0xff))
            }
        }
    }

    pub fn is_pursuer(&self) -> bool {
        !matches!(self, ActorKind::Seeker)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub kind: ActorKind,
    pub position: Cell,
    /// Box the actor is heading for. Only indirect pursuers set it.
    pub target: Option<Cell>,
}

impl Actor {
    pub fn glyph(&self) -> Glyph {
        self.kind.glyph()
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}

/// Build a fresh actor of `kind` standing on `cell`.
pub fn spawn_actor(kind: ActorKind, cell: Cell) -> Actor {
    Actor {
        kind,
        position: cell,
        target: None,
    }
}
