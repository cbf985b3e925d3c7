//! Frame-level telemetry and gameplay metrics, plus the per-frame system ordering.

use bevy::prelude::*;
use micromegas_tracing::prelude::{fmetric, imetric, info, span_scope};

use crate::events::{RoundEnded, RoundStarted};

/// Ordering of the per-frame gameplay systems.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum GameSet {
    Input,
    Simulation,
    Presentation,
}

pub struct TelemetryPlugin;

impl Plugin for TelemetryPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (GameSet::Input, GameSet::Simulation, GameSet::Presentation).chain(),
        );
        app.add_systems(Last, frame_telemetry);
        app.add_observer(on_round_started);
        app.add_observer(on_round_ended);
    }
}

fn frame_telemetry(time: Res<Time>) {
    span_scope!("frame");
    let dt_ms = time.delta_secs_f64() * 1000.0;
    fmetric!("frame_time_ms", "ms", dt_ms);
}

fn on_round_started(trigger: On<RoundStarted>) {
    let event = trigger.event();
    imetric!("pursuers", "count", event.pursuers as u64);
    info!("round_started: round={} pursuers={}", event.round, event.pursuers);
}

fn on_round_ended(trigger: On<RoundEnded>) {
    let event = trigger.event();
    imetric!("round_turns", "count", event.turns);
    info!(
        "round_ended: round={} reason={:?} turns={} prizes={}",
        event.round, event.reason, event.turns, event.prizes_found
    );
}
