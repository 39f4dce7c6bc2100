//! Bevy application setup

use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use bevy_picking::{prelude::MeshPickingPlugin, DefaultPickingPlugins};
use starmap_core::StarmapConfig;
use starmap_scene::{ExternalCommands, StarmapScenePlugin};

use crate::loader::LoaderPlugin;

/// Build and run the app. `data_base` is where the data files live.
pub fn run(config: StarmapConfig, commands: ExternalCommands, data_base: String) {
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Mission Control".to_string(),
                        canvas: Some("#starmap-canvas".to_string()),
                        fit_canvas_to_parent: true,
                        prevent_default_event_handling: false,
                        ..default()
                    }),
                    ..default()
                })
                .set(AssetPlugin {
                    file_path: "".to_string(),
                    // Static hosting has no .meta files
                    meta_check: bevy::asset::AssetMetaCheck::Never,
                    ..default()
                }),
        )
        // Picking plugins must be added BEFORE EguiPlugin so it can detect PickingPlugin
        .add_plugins(DefaultPickingPlugins)
        .add_plugins(MeshPickingPlugin)
        .add_plugins(EguiPlugin::default())
        // Shared queue must exist before the scene plugin initialises its own
        .insert_resource(commands)
        .add_plugins(StarmapScenePlugin {
            config: config.clone(),
        })
        .add_plugins(LoaderPlugin {
            config,
            base: data_base,
        })
        .run();
}
