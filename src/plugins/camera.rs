use bevy::prelude::*;
use micromegas_tracing::prelude::{info, span_fn, span_scope};

use super::display::panel_size;
use crate::config::GameConfig;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (spawn_camera, fit_window_to_panel));
    }
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

/// Size the primary window to the glyph panel.
#[span_fn]
fn fit_window_to_panel(config: Option<Res<GameConfig>>, mut windows: Query<&mut Window>) {
    let Some(config) = config else { return };
    let Ok(mut window) = windows.single_mut() else {
        return;
    };
    let size = panel_size(&config);
    window.resolution.set(size.x, size.y);
    info!("window sized to {}x{}", size.x, size.y);
}
