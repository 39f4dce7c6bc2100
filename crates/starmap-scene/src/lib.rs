//! Starmap Scene - Bevy rendering, input and HUD for the mission galaxy
//!
//! All navigation logic lives in `starmap-core`. This crate applies the
//! navigator's state to Bevy entities every frame, feeds pointer and keyboard
//! input back into it, and draws the egui HUD overlay.

pub mod camera;
pub mod data;
pub mod input;
pub mod scene;
pub mod ui;

use bevy::prelude::*;
use starmap_core::ship::FALLBACK_NAME;
use starmap_core::{glam, Navigator, StarmapConfig};

pub use data::{CatalogReady, CatalogStatus, ExternalCommands, PendingData, StarmapData};

/// The navigation core, owned by the ECS world
#[derive(Resource, Deref, DerefMut)]
pub struct Starmap(pub Navigator);

/// Per-frame ordering: load data, read input, advance animations, then sync visuals
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StarmapSet {
    Data,
    Input,
    Advance,
    Sync,
}

/// Plugin that sets up the scene, input handling and HUD
pub struct StarmapScenePlugin {
    pub config: StarmapConfig,
}

impl Plugin for StarmapScenePlugin {
    fn build(&self, app: &mut App) {
        let navigator = Navigator::new(self.config.clone(), FALLBACK_NAME.to_string(), 0.0);
        app.insert_resource(Starmap(navigator))
            .configure_sets(
                Update,
                (
                    StarmapSet::Data,
                    StarmapSet::Input,
                    StarmapSet::Advance,
                    StarmapSet::Sync,
                )
                    .chain(),
            )
            .add_plugins(data::DataPlugin)
            .add_plugins(camera::CameraPlugin)
            .add_plugins(scene::SceneSetupPlugin)
            .add_plugins(input::InputPlugin)
            .add_plugins(ui::HudPlugin);
    }
}

/// Current animation time in milliseconds
pub(crate) fn now_ms(time: &Time) -> f64 {
    time.elapsed_secs_f64() * 1000.0
}

pub(crate) fn to_vec3(v: glam::Vec3) -> Vec3 {
    Vec3::from_array(v.to_array())
}

pub(crate) fn to_quat(q: glam::Quat) -> Quat {
    Quat::from_array(q.to_array())
}
