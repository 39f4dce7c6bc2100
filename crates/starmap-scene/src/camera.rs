//! Camera entity, orbit drag input and pose sync

use bevy::input::mouse::AccumulatedMouseMotion;
use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::{now_ms, to_vec3, Starmap, StarmapSet};

/// Pixels a press may travel before it counts as a drag instead of a click
pub const DRAG_THRESHOLD: f32 = 6.0;

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Pointer press tracking shared by orbit and click handling
#[derive(Debug, Clone, Resource, Default)]
pub struct PointerState {
    pub press_position: Option<Vec2>,
    pub dragging: bool,
    /// Press began over an egui area
    pub over_ui: bool,
}

/// Plugin for camera controls
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PointerState>()
            .add_systems(Update, orbit_input.in_set(StarmapSet::Input))
            .add_systems(Update, advance_navigator.in_set(StarmapSet::Advance))
            .add_systems(Update, sync_camera.in_set(StarmapSet::Sync));
    }
}

fn orbit_input(
    mut starmap: ResMut<Starmap>,
    mut pointer: ResMut<PointerState>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mouse_motion: Res<AccumulatedMouseMotion>,
    touch_input: Res<Touches>,
    windows: Query<&Window>,
    mut contexts: EguiContexts,
) {
    let egui_wants_pointer = contexts
        .ctx_mut()
        .map(|ctx| ctx.wants_pointer_input())
        .unwrap_or(false);
    let cursor = windows.single().ok().and_then(|w| w.cursor_position());

    if mouse_button.just_pressed(MouseButton::Left) {
        pointer.press_position = cursor;
        pointer.dragging = false;
        pointer.over_ui = egui_wants_pointer;
    }

    if mouse_button.pressed(MouseButton::Left) && !pointer.over_ui {
        if let (Some(start), Some(current)) = (pointer.press_position, cursor) {
            if current.distance(start) > DRAG_THRESHOLD {
                pointer.dragging = true;
            }
        }
        if pointer.dragging {
            let delta = mouse_motion.delta;
            starmap.drag(delta.x, delta.y);
        }
    }

    // Single-finger touch orbits, like the mouse
    if touch_input.iter().count() == 1 && !egui_wants_pointer {
        for touch in touch_input.iter() {
            if touch.position().distance(touch.start_position()) > DRAG_THRESHOLD {
                pointer.dragging = true;
                let delta = touch.delta();
                starmap.drag(delta.x, delta.y);
            }
        }
    }
}

fn advance_navigator(
    mut starmap: ResMut<Starmap>,
    pointer: Res<PointerState>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    touch_input: Res<Touches>,
    time: Res<Time>,
) {
    let dragging = pointer.dragging
        && (mouse_button.pressed(MouseButton::Left) || touch_input.iter().next().is_some());
    starmap.frame(now_ms(&time), time.delta_secs(), dragging);
}

fn sync_camera(starmap: Res<Starmap>, mut camera_query: Query<&mut Transform, With<MainCamera>>) {
    let pose = starmap.camera().pose();
    if let Ok(mut transform) = camera_query.single_mut() {
        *transform = Transform::from_translation(to_vec3(pose.position))
            .looking_at(to_vec3(pose.target), Vec3::Y);
    }
}
