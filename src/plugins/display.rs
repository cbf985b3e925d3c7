//! Glyph display: a grid of UI text cells mirroring the game's [`GlyphFrame`].
//!
//! [`GlyphFrame`]: crate::render::GlyphFrame

use bevy::prelude::*;
use micromegas_tracing::prelude::{info, span_fn, span_scope};

use crate::app_state::AppState;
use crate::components::GlyphCell;
use crate::config::GameConfig;
use crate::game::Game;
use crate::plugins::telemetry::GameSet;

pub struct DisplayPlugin;

impl Plugin for DisplayPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(AppState::InGame), spawn_display);
        app.add_systems(OnExit(AppState::InGame), despawn_display);
        app.add_systems(
            Update,
            sync_glyphs
                .in_set(GameSet::Presentation)
                .run_if(in_state(AppState::InGame))
                .run_if(resource_exists_and_changed::<Game>),
        );
    }
}

/// Glyph cell width relative to its height (monospace font).
const GLYPH_ASPECT: f32 = 0.6;

#[derive(Component)]
pub struct DisplayRoot;

/// Pixel size of the whole panel for `config`.
pub fn panel_size(config: &GameConfig) -> Vec2 {
    Vec2::new(
        config.display_width() as f32 * config.cell_size * GLYPH_ASPECT,
        config.display_height() as f32 * config.cell_size,
    )
}

#[span_fn]
fn spawn_display(mut commands: Commands, config: Res<GameConfig>) {
    let (columns, rows) = (config.display_width(), config.display_height());
    let cell_width = config.cell_size * GLYPH_ASPECT;
    let size = panel_size(&config);

    commands
        .spawn((
            DisplayRoot,
            Node {
                width: Val::Px(size.x),
                height: Val::Px(size.y),
                position_type: PositionType::Absolute,
                top: Val::Px(0.0),
                left: Val::Px(0.0),
                ..default()
            },
            BackgroundColor(Color::BLACK),
        ))
        .with_children(|parent| {
            for row in 0..rows {
                for column in 0..columns {
                    parent.spawn((
                        GlyphCell { column, row },
                        Node {
                            position_type: PositionType::Absolute,
                            left: Val::Px(column as f32 * cell_width),
                            top: Val::Px(row as f32 * config.cell_size),
                            width: Val::Px(cell_width),
                            height: Val::Px(config.cell_size),
                            ..default()
                        },
                        Text::new(" "),
                        TextColor(Color::WHITE),
                        TextFont {
                            font_size: config.cell_size * 0.9,
                            ..default()
                        },
                        BackgroundColor(Color::BLACK),
                    ));
                }
            }
        });
    info!("display spawned: {}x{} cells", columns, rows);
}

fn despawn_display(mut commands: Commands, query: Query<Entity, With<DisplayRoot>>) {
    for entity in &query {
        commands.entity(entity).despawn();
    }
}

/// Copy changed cells from the game's frame onto the text nodes.
#[span_fn]
fn sync_glyphs(
    game: Res<Game>,
    mut cells: Query<(&GlyphCell, &mut Text, &mut TextColor, &mut BackgroundColor)>,
) {
    let frame = game.frame();
    for (cell, mut text, mut color, mut background) in &mut cells {
        let Some(glyph) = frame.get(cell.column, cell.row) else {
            continue;
        };
        if text.0.chars().eq(std::iter::once(glyph.ch)) && color.0 == glyph.foreground {
            continue;
        }
        text.0 = glyph.ch.to_string();
        color.0 = glyph.foreground;
        background.0 = glyph.background;
    }
}
