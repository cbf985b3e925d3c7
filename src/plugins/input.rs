//! Keyboard decoding: raw key presses become [`Intent`]s offered to the game.

use bevy::prelude::*;
use micromegas_tracing::prelude::{debug, span_fn, span_scope};

use crate::app_state::AppState;
use crate::components::Direction;
use crate::game::Game;
use crate::intent::Intent;
use crate::plugins::telemetry::GameSet;

pub struct GameInputPlugin;

impl Plugin for GameInputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (read_intents, leave_game)
                .in_set(GameSet::Input)
                .run_if(in_state(AppState::InGame)),
        );
    }
}

/// Key bindings. Numpad and the Home/PageUp/End/PageDown block give diagonals.
pub fn intent_for_key(key: KeyCode) -> Option<Intent> {
    let intent = match key {
        KeyCode::ArrowUp | KeyCode::KeyW | KeyCode::Numpad8 => Intent::Move(Direction::Up),
        KeyCode::ArrowDown | KeyCode::KeyS | KeyCode::Numpad2 => Intent::Move(Direction::Down),
        KeyCode::ArrowLeft | KeyCode::KeyA | KeyCode::Numpad4 => Intent::Move(Direction::Left),
        KeyCode::ArrowRight | KeyCode::KeyD | KeyCode::Numpad6 => Intent::Move(Direction::Right),
        KeyCode::Numpad7 | KeyCode::Home => Intent::Move(Direction::UpLeft),
        KeyCode::Numpad9 | KeyCode::PageUp => Intent::Move(Direction::UpRight),
        KeyCode::Numpad1 | KeyCode::End => Intent::Move(Direction::DownLeft),
        KeyCode::Numpad3 | KeyCode::PageDown => Intent::Move(Direction::DownRight),
        KeyCode::Space => Intent::Search,
        KeyCode::Numpad5 | KeyCode::Period => Intent::Wait,
        KeyCode::Enter | KeyCode::NumpadEnter => Intent::Continue,
        _ => return None,
    };
    Some(intent)
}

#[span_fn]
fn read_intents(keyboard: Res<ButtonInput<KeyCode>>, game: Option<ResMut<Game>>) {
    let Some(mut game) = game else { return };
    for key in keyboard.get_just_pressed() {
        let Some(intent) = intent_for_key(*key) else {
            continue;
        };
        if !game.bypass_change_detection().offer(intent) {
            debug!("intent {:?} ignored", intent);
            continue;
        }
        game.set_changed();
    }
}

fn leave_game(keyboard: Res<ButtonInput<KeyCode>>, mut next_state: ResMut<NextState<AppState>>) {
    if keyboard.just_pressed(KeyCode::Escape) {
        next_state.set(AppState::MainMenu);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_eight_directions_are_bound() {
        let dirs: Vec<Direction> = [
            KeyCode::Numpad8,
            KeyCode::Numpad9,
            KeyCode::Numpad6,
            KeyCode::Numpad3,
            KeyCode::Numpad2,
            KeyCode::Numpad1,
            KeyCode::Numpad4,
            KeyCode::Numpad7,
        ]
        .iter()
        .filter_map(|k| match intent_for_key(*k) {
            Some(Intent::Move(d)) => Some(d),
            _ => None,
        })
        .collect();
        assert_eq!(dirs, Direction::ALL.to_vec());
    }

    #[test]
    fn action_keys() {
        assert_eq!(intent_for_key(KeyCode::Space), Some(Intent::Search));
        assert_eq!(intent_for_key(KeyCode::Period), Some(Intent::Wait));
        assert_eq!(intent_for_key(KeyCode::Enter), Some(Intent::Continue));
        assert_eq!(intent_for_key(KeyCode::KeyQ), None);
    }
}
