//! Pointer picking, hover tracking, keyboard navigation and resize

use bevy::prelude::*;
use bevy_egui::EguiContexts;
use starmap_core::navigation::PickTarget;
use starmap_core::NavEvent;

use crate::camera::{PointerState, DRAG_THRESHOLD};
use crate::{now_ms, Starmap, StarmapSet};

/// What the pointer is currently over, used for the cursor shape
#[derive(Debug, Clone, Resource, Default)]
pub struct HoverState {
    pub target: Option<PickTarget>,
}

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HoverState>().add_systems(
            Update,
            (track_window_size, handle_keyboard, handle_pointer)
                .chain()
                .in_set(StarmapSet::Input),
        );
    }
}

/// Keep projection and panel layout in step with the window without
/// restarting any animation
fn track_window_size(windows: Query<&Window>, mut starmap: ResMut<Starmap>) {
    if let Ok(window) = windows.single() {
        let width = window.width();
        let height = window.height();
        let layout = starmap.layout();
        if (layout.screen_width - width).abs() > 1.0 || (layout.screen_height - height).abs() > 1.0 {
            starmap.resize(width, height);
        }
    }
}

fn handle_keyboard(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut starmap: ResMut<Starmap>,
    time: Res<Time>,
    mut contexts: EguiContexts,
) {
    let egui_wants_keyboard = contexts
        .ctx_mut()
        .map(|ctx| ctx.wants_keyboard_input())
        .unwrap_or(false);
    if egui_wants_keyboard {
        return;
    }

    let now = now_ms(&time);
    if keyboard.just_pressed(KeyCode::Escape) {
        starmap.dispatch(NavEvent::Escape, now);
    }
    if keyboard.just_pressed(KeyCode::ArrowRight) {
        starmap.dispatch(NavEvent::NextMission, now);
    }
    if keyboard.just_pressed(KeyCode::ArrowLeft) {
        starmap.dispatch(NavEvent::PreviousMission, now);
    }
}

fn handle_pointer(
    mut starmap: ResMut<Starmap>,
    mut pointer: ResMut<PointerState>,
    mut hover: ResMut<HoverState>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    touch_input: Res<Touches>,
    windows: Query<&Window>,
    time: Res<Time>,
    mut contexts: EguiContexts,
) {
    let egui_wants_pointer = contexts
        .ctx_mut()
        .map(|ctx| ctx.wants_pointer_input())
        .unwrap_or(false);
    let cursor = windows.single().ok().and_then(|w| w.cursor_position());

    let mut click_position: Option<Vec2> = None;

    // Mouse: a release close to the press point is a click, anything else was a drag
    if mouse_button.just_released(MouseButton::Left) {
        if !pointer.dragging && !pointer.over_ui {
            click_position = pointer.press_position;
        }
        pointer.press_position = None;
        pointer.dragging = false;
        pointer.over_ui = false;
    }

    // Touch: tap detection
    for touch in touch_input.iter_just_released() {
        if !egui_wants_pointer && touch.position().distance(touch.start_position()) <= DRAG_THRESHOLD {
            click_position = Some(touch.start_position());
        }
        pointer.dragging = false;
    }

    if let Some(position) = click_position {
        starmap.click(position.x, position.y, now_ms(&time));
    }

    hover.target = match cursor {
        Some(position) if !egui_wants_pointer && !mouse_button.pressed(MouseButton::Left) => {
            starmap.pick(position.x, position.y)
        }
        _ => None,
    };
}
