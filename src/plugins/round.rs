//! Round state sync: mirrors the core round status into [`RoundState`] and
//! shows the round-over banner.

use bevy::prelude::*;
use micromegas_tracing::prelude::{debug, span_fn, span_scope};

use crate::app_state::{AppState, RoundState};
use crate::events::{RoundEnded, RoundStarted};
use crate::game::{Game, RoundStatus};
use crate::plugins::telemetry::GameSet;
use crate::session::RoundOverReason;

pub struct RoundPlugin;

impl Plugin for RoundPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            sync_round_state
                .in_set(GameSet::Simulation)
                .run_if(in_state(AppState::InGame))
                .run_if(resource_exists::<Game>),
        );
        app.add_systems(OnEnter(RoundState::RoundOver), spawn_round_over_banner);
        app.add_systems(OnExit(RoundState::RoundOver), despawn_round_over_banner);
    }
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

#[derive(Component)]
pub struct RoundOverBanner;

/// Round the presentation layer last saw. Detects reinitialisation even when
/// the status goes Playing to Playing between two frames.
#[derive(Resource, Debug, Default)]
pub struct ObservedRound(pub u32);

pub fn banner_title(reason: RoundOverReason) -> &'static str {
    match reason {
        RoundOverReason::PrizeFound => "You found the pineapple!",
        RoundOverReason::PrizeDestroyed => "The pineapple was destroyed!",
        RoundOverReason::SeekerCaught => "You were caught!",
    }
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

#[span_fn]
fn sync_round_state(
    mut commands: Commands,
    game: Res<Game>,
    observed: Option<ResMut<ObservedRound>>,
    state: Res<State<RoundState>>,
    mut next_state: ResMut<NextState<RoundState>>,
) {
    if !game.is_changed() {
        return;
    }

    let new_round = observed.as_ref().is_none_or(|o| o.0 != game.round());
    if new_round {
        match observed {
            Some(mut observed) => observed.0 = game.round(),
            None => {
                commands.insert_resource(ObservedRound(game.round()));
            }
        }
        commands.trigger(RoundStarted {
            round: game.round(),
            pursuers: game.pursuers().count(),
        });
    }

    match (game.status(), state.get()) {
        // A round can start and end between two frames; re-entering
        // RoundOver rebuilds the banner for the new reason.
        (RoundStatus::RoundOver(reason), current)
            if new_round || *current == RoundState::Playing =>
        {
            let session = game.session();
            commands.trigger(RoundEnded {
                round: game.round(),
                reason,
                turns: session.turns,
                prizes_found: session.prizes_found,
            });
            next_state.set(RoundState::RoundOver);
        }
        (RoundStatus::Playing, RoundState::RoundOver) => {
            next_state.set(RoundState::Playing);
        }
        _ => {}
    }
}

fn spawn_round_over_banner(mut commands: Commands, game: Option<Res<Game>>) {
    let Some(game) = game else { return };
    let RoundStatus::RoundOver(reason) = game.status() else {
        return;
    };
    debug!("round over banner: {:?}", reason);

    commands
        .spawn((
            RoundOverBanner,
            Node {
                width: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                top: Val::Percent(40.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                row_gap: Val::Px(12.0),
                padding: UiRect::all(Val::Px(16.0)),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.8)),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(banner_title(reason)),
                TextColor(Color::srgb(1.0, 1.0, 0.0)),
                TextFont {
                    font_size: 40.0,
                    ..default()
                },
            ));
            parent.spawn((
                Text::new(reason.prompt()),
                TextColor(Color::WHITE),
                TextFont {
                    font_size: 22.0,
                    ..default()
                },
            ));
        });
}

fn despawn_round_over_banner(mut commands: Commands, query: Query<Entity, With<RoundOverBanner>>) {
    for entity in &query {
        commands.entity(entity).despawn();
    }
}
