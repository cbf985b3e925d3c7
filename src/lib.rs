pub mod actor;
pub mod ai;
pub mod app_state;
pub mod components;
pub mod config;
pub mod events;
pub mod game;
pub mod grid;
pub mod intent;
pub mod mapgen;
pub mod pathing;
pub mod plugins;
pub mod render;
pub mod session;

use bevy::prelude::*;
use micromegas_tracing::prelude::*;

use app_state::{AppState, RoundState};
use config::GameConfig;
use game::Game;
use plugins::camera::CameraPlugin;
use plugins::display::DisplayPlugin;
use plugins::input::GameInputPlugin;
use plugins::menu::MenuPlugin;
use plugins::round::{ObservedRound, RoundPlugin};
use plugins::telemetry::TelemetryPlugin;

pub struct AnanasPlugin;

impl Plugin for AnanasPlugin {
    fn build(&self, app: &mut App) {
        // State machine (StatesPlugin comes from DefaultPlugins)
        app.init_state::<AppState>();
        app.add_sub_state::<RoundState>();

        // Keeps a config inserted by the binary
        app.init_resource::<GameConfig>();

        app.add_plugins(TelemetryPlugin);
        app.add_plugins(CameraPlugin);
        app.add_plugins(DisplayPlugin);
        app.add_plugins(GameInputPlugin);
        app.add_plugins(RoundPlugin);
        app.add_plugins(MenuPlugin);

        // The game lives exactly as long as the InGame state.
        app.add_systems(OnEnter(AppState::InGame), init_game_session);
        app.add_systems(OnExit(AppState::InGame), cleanup_game_session);
    }
}

/// Build a fresh game from the current config. Runs on each
/// `OnEnter(AppState::InGame)`, so a new session always starts clean.
#[span_fn]
fn init_game_session(mut commands: Commands, config: Res<GameConfig>) {
    commands.insert_resource(Game::new(config.clone()));
}

#[span_fn]
fn cleanup_game_session(mut commands: Commands) {
    commands.remove_resource::<Game>();
    commands.remove_resource::<ObservedRound>();
}
