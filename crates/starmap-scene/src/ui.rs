//! HUD overlay using bevy_egui: projected labels, top bar, detail panel,
//! quick-select list and onboarding hint

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};
use starmap_core::hud::date_line;
use starmap_core::navigation::{DetailPayload, FieldValue, PickTarget};
use starmap_core::{NavEvent, Navigator, OverlayKey};

use crate::camera::PointerState;
use crate::data::CatalogStatus;
use crate::input::HoverState;
use crate::{now_ms, Starmap};

const ACCENT: egui::Color32 = egui::Color32::from_rgb(0, 240, 255);
const SELECTED: egui::Color32 = egui::Color32::from_rgb(255, 107, 53);
const MUTED: egui::Color32 = egui::Color32::from_rgb(120, 150, 170);
const PANEL_FILL: egui::Color32 = egui::Color32::from_rgba_premultiplied(4, 12, 20, 220);

/// HUD date line, computed once at startup
#[derive(Debug, Clone, Resource)]
pub struct HudDate(pub String);

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(HudDate(date_line(chrono::Utc::now())))
            // HUD runs in EguiPrimaryContextPass for proper input handling (bevy_egui 0.38+)
            .add_systems(EguiPrimaryContextPass, hud_system);
    }
}

fn panel_frame() -> egui::Frame {
    egui::Frame::new().fill(PANEL_FILL).inner_margin(10.0)
}

fn hud_system(
    mut contexts: EguiContexts,
    mut starmap: ResMut<Starmap>,
    hover: Res<HoverState>,
    pointer: Res<PointerState>,
    status: Res<CatalogStatus>,
    date: Res<HudDate>,
    time: Res<Time>,
) {
    let Ok(ctx) = contexts.ctx_mut() else { return };
    let now = now_ms(&time);
    let mut events: Vec<NavEvent> = Vec::new();
    let nav: &Navigator = &starmap;
    let is_mobile = nav.layout().is_mobile;

    render_top_bar(ctx, nav, &status, &date.0);
    render_overlay_labels(ctx, nav, &mut events);

    if let Some(detail) = nav.detail() {
        if is_mobile {
            egui::TopBottomPanel::bottom("detail_panel_mobile")
                .frame(panel_frame())
                .max_height(nav.layout().screen_height * 0.5)
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical().show(ui, |ui| render_detail(ui, detail, &mut events));
                });
        } else {
            egui::SidePanel::right("detail_panel")
                .frame(panel_frame())
                .exact_width(nav.layout().panel_width())
                .resizable(false)
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical().show(ui, |ui| render_detail(ui, detail, &mut events));
                });
        }
    }

    render_quick_select(ctx, nav, is_mobile, &mut events);

    if nav.hint_visible(now) && status.loaded && !nav.catalog().is_empty() {
        egui::Area::new(egui::Id::new("onboarding_hint"))
            .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -90.0))
            .interactable(false)
            .show(ctx, |ui| {
                ui.label(
                    egui::RichText::new("CLICK A POINT TO EXPLORE")
                        .monospace()
                        .color(ACCENT),
                );
            });
    }

    if !ctx.wants_pointer_input() {
        let cursor = if pointer.dragging {
            egui::CursorIcon::Grabbing
        } else if hover.target.is_some() {
            egui::CursorIcon::PointingHand
        } else {
            egui::CursorIcon::Grab
        };
        ctx.set_cursor_icon(cursor);
    }

    for event in events {
        starmap.dispatch(event, now);
    }
}

fn render_top_bar(ctx: &egui::Context, nav: &Navigator, status: &CatalogStatus, date: &str) {
    egui::TopBottomPanel::top("hud_top")
        .frame(panel_frame())
        .show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.label(egui::RichText::new("MISSION CONTROL").strong().color(ACCENT));
                ui.separator();
                let label = if !status.loaded {
                    "ESTABLISHING UPLINK..."
                } else if nav.catalog().is_empty() {
                    "NO MISSION DATA"
                } else {
                    nav.hud_label()
                };
                ui.label(egui::RichText::new(label).monospace());

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(egui::RichText::new(date).monospace().color(MUTED));
                    ui.separator();
                    ui.label(egui::RichText::new(nav.readout().text()).monospace().color(ACCENT));
                    ui.separator();
                    ui.label(
                        egui::RichText::new(format!("SHIP // {}", nav.ship().name()))
                            .monospace()
                            .color(MUTED),
                    );
                });
            });
        });
}

/// Floating labels at the projected position of each marker, sector and the ship
fn render_overlay_labels(ctx: &egui::Context, nav: &Navigator, events: &mut Vec<NavEvent>) {
    let active = nav.state().active_mission.as_ref();
    for placement in nav.overlays() {
        if placement.hidden {
            continue;
        }
        let (text, color, target) = match &placement.key {
            OverlayKey::Mission(id) => {
                let Some(mission) = nav.catalog().mission(id) else { continue };
                let color = if active == Some(id) { SELECTED } else { ACCENT };
                (
                    mission.mission.name.to_uppercase(),
                    color,
                    Some(PickTarget::Mission(id.clone())),
                )
            }
            OverlayKey::Sector(id) => {
                let Some(sector) = nav.catalog().sector(id) else { continue };
                (
                    format!("{} [{}]", sector.name.to_uppercase(), sector.missions.len()),
                    ACCENT,
                    Some(PickTarget::Sector(id.clone())),
                )
            }
            OverlayKey::Ship => (nav.ship().name().to_uppercase(), MUTED, None),
        };

        egui::Area::new(egui::Id::new(("overlay", &placement.key)))
            .fixed_pos(egui::pos2(placement.x + 10.0, placement.y - 8.0))
            .order(egui::Order::Background)
            .interactable(target.is_some())
            .show(ctx, |ui| {
                let response = ui.add(
                    egui::Label::new(egui::RichText::new(text).small().monospace().color(color))
                        .sense(egui::Sense::click()),
                );
                if response.clicked() {
                    match target {
                        Some(PickTarget::Mission(id)) => events.push(NavEvent::SelectMission(id)),
                        Some(PickTarget::Sector(id)) => events.push(NavEvent::FocusSector(id)),
                        None => {}
                    }
                }
            });
    }
}

fn render_detail(ui: &mut egui::Ui, detail: &DetailPayload, events: &mut Vec<NavEvent>) {
    ui.horizontal(|ui| {
        if !detail.icon.is_empty() {
            ui.label(egui::RichText::new(&detail.icon).size(20.0));
        }
        ui.heading(egui::RichText::new(&detail.title).color(ACCENT));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("✕").clicked() {
                events.push(NavEvent::CloseMission);
            }
        });
    });
    ui.label(egui::RichText::new(detail.type_name.to_uppercase()).color(SELECTED));
    if !detail.type_desc.is_empty() {
        ui.label(egui::RichText::new(&detail.type_desc).small().color(MUTED));
    }

    ui.separator();

    egui::Grid::new("detail_fields")
        .num_columns(2)
        .spacing([12.0, 6.0])
        .show(ui, |ui| {
            for field in &detail.fields {
                ui.label(egui::RichText::new(&field.label).small().monospace().color(MUTED));
                match &field.value {
                    FieldValue::Text(text) => {
                        ui.label(text);
                    }
                    FieldValue::Link { href, text } => {
                        ui.hyperlink_to(text, href);
                    }
                }
                ui.end_row();
            }
        });

    if !detail.action_link.is_empty() {
        ui.add_space(8.0);
        ui.hyperlink_to(
            egui::RichText::new(format!("▶ {}", detail.action_label))
                .strong()
                .color(SELECTED),
            &detail.action_link,
        );
    }

    ui.separator();

    ui.horizontal(|ui| {
        if ui.button("◀ PREV").clicked() {
            events.push(NavEvent::PreviousMission);
        }
        ui.label(egui::RichText::new(&detail.counter).monospace());
        if ui.button("NEXT ▶").clicked() {
            events.push(NavEvent::NextMission);
        }
    });
}

/// Ordered mission list with two-digit indices
fn render_quick_select(ctx: &egui::Context, nav: &Navigator, is_mobile: bool, events: &mut Vec<NavEvent>) {
    let missions = nav.catalog().missions();
    if missions.is_empty() {
        return;
    }
    let active = nav.state().active_mission.as_ref();

    egui::Area::new(egui::Id::new("quick_select"))
        .anchor(egui::Align2::LEFT_BOTTOM, egui::vec2(12.0, -12.0))
        .show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                egui::CollapsingHeader::new(egui::RichText::new("QUICK SELECT").monospace().color(ACCENT))
                    .default_open(!is_mobile)
                    .show(ui, |ui| {
                        for (i, mission) in missions.iter().enumerate() {
                            let is_active = active == Some(mission.id());
                            let text = egui::RichText::new(format!(
                                "{:02}  {}",
                                i + 1,
                                mission.mission.name.to_uppercase()
                            ))
                            .monospace()
                            .color(if is_active { SELECTED } else { ACCENT });
                            let mut response = ui.selectable_label(is_active, text);
                            if let Some(description) = &mission.mission.description {
                                response = response.on_hover_text(description);
                            }
                            if response.clicked() {
                                events.push(NavEvent::SelectMission(mission.id().clone()));
                            }
                        }
                    });
            });
        });
}
