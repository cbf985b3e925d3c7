//! Round lifecycle events triggered by the round plugin and observed by telemetry.

use bevy::prelude::*;

use crate::session::RoundOverReason;

#[derive(Event, Debug, Clone, Copy)]
pub struct RoundStarted {
    pub round: u32,
    pub pursuers: usize,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct RoundEnded {
    pub round: u32,
    pub reason: RoundOverReason,
    pub turns: u64,
    pub prizes_found: u32,
}
