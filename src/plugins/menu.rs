//! Title screen: glyph legend, session settings and controls. Enter starts a
//! session built from the loaded [`GameConfig`].

use bevy::prelude::*;
use micromegas_tracing::prelude::info;

use crate::actor::ActorKind;
use crate::app_state::AppState;
use crate::config::GameConfig;
use crate::grid::Tile;
use crate::intent::Intent;
use crate::plugins::input::intent_for_key;
use crate::render::Glyph;

pub struct MenuPlugin;

impl Plugin for MenuPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(AppState::MainMenu), spawn_menu);
        app.add_systems(OnExit(AppState::MainMenu), despawn_menu);
        app.add_systems(Update, menu_input.run_if(in_state(AppState::MainMenu)));
    }
}

#[derive(Component)]
pub struct MenuRoot;

/// One legend entry; `glyph` is the character drawn on the map.
#[derive(Component, Debug, Clone, Copy)]
pub struct LegendEntry {
    pub glyph: char,
}

const CONTROLS: [(&str, &str); 4] = [
    ("arrows / wasd / numpad", "move"),
    ("space", "search a box"),
    ("5 / .", "wait"),
    ("esc", "back to this screen"),
];

/// What each map glyph stands for, in legend order.
pub fn legend() -> [(Glyph, &'static str); 4] {
    [
        (ActorKind::Seeker.glyph(), ActorKind::Seeker.name()),
        (ActorKind::DirectPursuer.glyph(), ActorKind::DirectPursuer.name()),
        (ActorKind::IndirectPursuer.glyph(), ActorKind::IndirectPursuer.name()),
        (Tile::Box.glyph(), "a box, maybe hiding the pineapple"),
    ]
}

pub fn settings_line(config: &GameConfig) -> String {
    let seed = match config.seed {
        Some(seed) => format!("seed {seed}"),
        None => "random seed".to_string(),
    };
    format!(
        "{}x{} map, {} boxes, {}",
        config.map_width, config.map_height, config.max_boxes, seed
    )
}

fn label(text: impl Into<String>, size: f32, color: Color) -> impl Bundle {
    (
        Text::new(text),
        TextColor(color),
        TextFont {
            font_size: size,
            ..default()
        },
    )
}

fn spawn_menu(mut commands: Commands, config: Res<GameConfig>) {
    let muted = Color::srgb(0.6, 0.6, 0.6);
    commands
        .spawn((
            MenuRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(10.0),
                ..default()
            },
            BackgroundColor(Color::BLACK),
        ))
        .with_children(|menu| {
            menu.spawn(label("ANANAS", 64.0, Color::srgb(1.0, 1.0, 0.0)));
            menu.spawn(label(
                "Find the pineapple before Pedro finds you",
                18.0,
                muted,
            ));

            for (glyph, meaning) in legend() {
                menu.spawn(Node {
                    column_gap: Val::Px(12.0),
                    ..default()
                })
                .with_children(|row| {
                    row.spawn((
                        LegendEntry { glyph: glyph.ch },
                        label(glyph.ch.to_string(), 20.0, glyph.foreground),
                    ));
                    row.spawn(label(meaning, 16.0, muted));
                });
            }

            for (keys, action) in CONTROLS {
                menu.spawn(label(format!("{keys}: {action}"), 14.0, muted));
            }
            menu.spawn(label(settings_line(&config), 14.0, muted));
            menu.spawn(label("Press Enter to Start", 24.0, Color::WHITE));
        });
}

fn despawn_menu(mut commands: Commands, query: Query<Entity, With<MenuRoot>>) {
    for entity in &query {
        commands.entity(entity).despawn();
    }
}

/// The same key that confirms a finished round starts a session.
fn menu_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    config: Res<GameConfig>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    let starts = keyboard
        .get_just_pressed()
        .any(|key| intent_for_key(*key) == Some(Intent::Continue));
    if starts {
        info!("starting session: {}", settings_line(&config));
        next_state.set(AppState::InGame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::state::app::StatesPlugin;

    fn setup_app(config: GameConfig) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(StatesPlugin);
        app.init_state::<AppState>();
        app.init_resource::<ButtonInput<KeyCode>>();
        app.insert_resource(config);
        app.add_plugins(MenuPlugin);
        for _ in 0..3 {
            app.update();
        }
        app
    }

    fn press(app: &mut App, key: KeyCode) {
        let mut input = ButtonInput::<KeyCode>::default();
        input.press(key);
        app.insert_resource(input);
        for _ in 0..3 {
            app.update();
        }
    }

    fn state(app: &App) -> AppState {
        *app.world().resource::<State<AppState>>().get()
    }

    #[test]
    fn settings_line_names_seed() {
        let seeded = GameConfig {
            map_width: 40,
            map_height: 12,
            max_boxes: 5,
            seed: Some(9),
            ..Default::default()
        };
        assert_eq!(settings_line(&seeded), "40x12 map, 5 boxes, seed 9");
        assert_eq!(
            settings_line(&GameConfig::default()),
            "80x22 map, 10 boxes, random seed"
        );
    }

    #[test]
    fn legend_uses_map_glyphs() {
        let mut app = setup_app(GameConfig::default());
        let mut shown: Vec<char> = app
            .world_mut()
            .query::<&LegendEntry>()
            .iter(app.world())
            .map(|entry| entry.glyph)
            .collect();
        shown.sort();
        assert_eq!(shown, vec!['#', '@', 'P', 'p']);
    }

    #[test]
    fn numpad_enter_starts_and_clears_menu() {
        let mut app = setup_app(GameConfig::default());
        press(&mut app, KeyCode::NumpadEnter);

        assert_eq!(state(&app), AppState::InGame);
        let roots = app
            .world_mut()
            .query::<&MenuRoot>()
            .iter(app.world())
            .count();
        assert_eq!(roots, 0);
    }

    #[test]
    fn game_keys_do_not_start() {
        let mut app = setup_app(GameConfig::default());
        for key in [KeyCode::Space, KeyCode::ArrowUp, KeyCode::Period] {
            press(&mut app, key);
        }
        assert_eq!(state(&app), AppState::MainMenu);
    }
}
