//! Navigation state machine
//!
//! Input is turned into a [`Transition`] by [`NavigationState::decide`], which
//! is pure: it reads the catalog and config and returns the next state plus a
//! list of [`Effect`]s. [`Navigator`] owns the state and every collaborator
//! (camera, ship, markers, HUD readout) and applies those effects.
//!
//! Layout variants:
//! - galaxy: `Overview -> Focus(sector) -> Focus(sector) + open mission`,
//!   unwound one level at a time by Escape.
//! - globe: a single level with the open mission as the only sub-state.

use glam::Vec3;
use tracing::{debug, info};

use crate::camera::{mission_pose, overview_pose, sector_pose, CameraDirector, CameraPose};
use crate::catalog::Catalog;
use crate::config::{LayoutMode, StarmapConfig};
use crate::hud::{
    project_overlays, CoordinateReadout, HudLayout, OverlayKey, OverlayPlacement,
    ProjectionContext, TrackedAnchor,
};
use crate::marker::MarkerSet;
use crate::projection::pick_nearest;
use crate::ship::{home_position, park_position, ShipAnimator};
use crate::types::{CatalogMission, MissionId, SectorId};

/// Delay before the configured initial mission is opened
const INITIAL_SELECT_DELAY_MS: f64 = 300.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Overview,
    Focus,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NavigationState {
    pub view_mode: ViewMode,
    pub focused_sector: Option<SectorId>,
    pub active_mission: Option<MissionId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEvent {
    SelectMission(MissionId),
    CloseMission,
    FocusSector(SectorId),
    ReturnToOverview,
    Escape,
    BackgroundClick,
    NextMission,
    PreviousMission,
}

/// Side effects for the navigator to apply, in order
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Marker, label and list highlight for exactly this mission (or none)
    Highlight(Option<MissionId>),
    OpenDetail(DetailPayload),
    CloseDetail,
    FlyCamera { pose: CameraPose, duration_ms: f64 },
    FlyShip { target: Vec3, duration_ms: f64 },
    SetHudLabel(String),
    AnimateCoordinates { lat: f32, lon: f32 },
    DimSectors { focused: SectorId },
    RestoreSectors,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub next: NavigationState,
    pub effects: Vec<Effect>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Link { href: String, text: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailField {
    pub label: String,
    pub value: FieldValue,
}

/// Content of the mission detail panel
#[derive(Debug, Clone, PartialEq)]
pub struct DetailPayload {
    pub mission: MissionId,
    pub title: String,
    pub type_name: String,
    pub type_desc: String,
    pub icon: String,
    pub fields: Vec<DetailField>,
    pub action_link: String,
    pub action_label: String,
    /// "n / N" position in catalog order
    pub counter: String,
}

impl DetailPayload {
    pub fn from_mission(mission: &CatalogMission, catalog: &Catalog) -> Self {
        let record = &mission.mission;
        let mut fields = vec![
            DetailField {
                label: "DESIGNATION".to_string(),
                value: FieldValue::Text(record.name.clone()),
            },
            DetailField {
                label: "SECTOR".to_string(),
                value: FieldValue::Text(mission.type_name.clone()),
            },
            DetailField {
                label: "COORDINATES".to_string(),
                value: FieldValue::Text(format!("{:.2}, {:.2}", record.lat, record.lon)),
            },
        ];
        if let Some(description) = record.description.as_ref().filter(|d| !d.is_empty()) {
            fields.push(DetailField {
                label: "BRIEFING".to_string(),
                value: FieldValue::Text(description.clone()),
            });
        }
        if !record.link.is_empty() {
            fields.push(DetailField {
                label: "UPLINK".to_string(),
                value: FieldValue::Link {
                    href: record.link.clone(),
                    text: record.link.clone(),
                },
            });
        }

        let position = catalog.position_of(&record.id).map_or(0, |i| i + 1);
        Self {
            mission: record.id.clone(),
            title: record.title.clone(),
            type_name: mission.type_name.clone(),
            type_desc: mission.type_desc.clone(),
            icon: mission.icon.clone(),
            fields,
            action_link: record.link.clone(),
            action_label: record.link_label().to_string(),
            counter: format!("{} / {}", position, catalog.len()),
        }
    }
}

impl NavigationState {
    /// Compute the transition for `event` without touching any collaborator
    pub fn decide(&self, catalog: &Catalog, config: &StarmapConfig, event: &NavEvent) -> Transition {
        match event {
            NavEvent::SelectMission(id) => self.select(catalog, config, id),
            NavEvent::CloseMission => self.close(catalog, config),
            NavEvent::FocusSector(id) => self.focus(catalog, config, id),
            NavEvent::ReturnToOverview => self.overview(config),
            NavEvent::Escape => {
                if self.active_mission.is_some() {
                    self.close(catalog, config)
                } else if self.focused_sector.is_some() {
                    self.overview(config)
                } else {
                    self.unchanged()
                }
            }
            NavEvent::BackgroundClick => self.unchanged(),
            NavEvent::NextMission => self.step(catalog, config, 1),
            NavEvent::PreviousMission => self.step(catalog, config, -1),
        }
    }

    /// An open mission must belong to the focused sector
    pub fn is_consistent(&self, catalog: &Catalog) -> bool {
        match (&self.view_mode, &self.active_mission) {
            (ViewMode::Focus, Some(id)) => catalog
                .mission(id)
                .is_some_and(|m| self.focused_sector.as_ref() == Some(m.sector())),
            (ViewMode::Overview, _) => self.focused_sector.is_none(),
            (ViewMode::Focus, None) => self.focused_sector.is_some(),
        }
    }

    fn unchanged(&self) -> Transition {
        Transition {
            next: self.clone(),
            effects: Vec::new(),
        }
    }

    fn select(&self, catalog: &Catalog, config: &StarmapConfig, id: &MissionId) -> Transition {
        let Some(mission) = catalog.mission(id) else {
            debug!(mission = %id, "Ignoring selection of unknown mission");
            return self.unchanged();
        };
        if self.active_mission.as_ref() == Some(id) {
            return self.close(catalog, config);
        }

        let mode = config.layout.mode;
        let mut next = self.clone();
        let mut effects = Vec::new();

        // From overview the mission opens in place; inside a focus it drags the focus along
        let switch_sector = self.view_mode == ViewMode::Focus
            && self.focused_sector.as_ref() != Some(mission.sector());
        if mode == LayoutMode::Galaxy && switch_sector {
            next.view_mode = ViewMode::Focus;
            next.focused_sector = Some(mission.sector().clone());
            effects.push(Effect::DimSectors {
                focused: mission.sector().clone(),
            });
        }
        next.active_mission = Some(id.clone());

        effects.push(Effect::Highlight(Some(id.clone())));
        effects.push(Effect::OpenDetail(DetailPayload::from_mission(mission, catalog)));
        effects.push(Effect::FlyCamera {
            pose: mission_pose(mission.position, mode, &config.camera),
            duration_ms: config.camera.fly_duration_ms,
        });
        effects.push(Effect::FlyShip {
            target: park_position(mode, mission.position, &config.ship),
            duration_ms: config.ship.fly_duration_ms,
        });
        effects.push(Effect::AnimateCoordinates {
            lat: mission.mission.lat,
            lon: mission.mission.lon,
        });
        effects.push(Effect::SetHudLabel(format!(
            "{} // {}",
            mission.type_name.to_uppercase(),
            mission.mission.name.to_uppercase()
        )));

        Transition { next, effects }
    }

    fn close(&self, catalog: &Catalog, config: &StarmapConfig) -> Transition {
        if self.active_mission.is_none() {
            return self.unchanged();
        }
        let mode = config.layout.mode;
        let mut next = self.clone();
        next.active_mission = None;

        let mut effects = vec![Effect::Highlight(None), Effect::CloseDetail];
        match self.focused_sector.as_ref().and_then(|id| catalog.sector(id)) {
            Some(sector) => {
                effects.push(Effect::SetHudLabel(sector.name.to_uppercase()));
                effects.push(Effect::FlyShip {
                    target: park_position(mode, sector.center, &config.ship),
                    duration_ms: config.ship.fly_duration_ms,
                });
            }
            None => {
                effects.push(Effect::SetHudLabel(config.hud.standby_label.clone()));
                effects.push(Effect::FlyShip {
                    target: home_position(mode, &config.ship, config.globe.radius),
                    duration_ms: config.ship.fly_duration_ms,
                });
            }
        }
        if mode == LayoutMode::Globe {
            if let Some(default) = default_mission(catalog, config) {
                effects.push(Effect::AnimateCoordinates {
                    lat: default.mission.lat,
                    lon: default.mission.lon,
                });
            }
        }

        Transition { next, effects }
    }

    fn focus(&self, catalog: &Catalog, config: &StarmapConfig, id: &SectorId) -> Transition {
        if config.layout.mode == LayoutMode::Globe {
            return self.unchanged();
        }
        let Some(sector) = catalog.sector(id) else {
            debug!(sector = %id, "Ignoring focus of unknown sector");
            return self.unchanged();
        };
        if self.focused_sector.as_ref() == Some(id) {
            return self.unchanged();
        }

        let mut effects = Vec::new();
        if self.active_mission.is_some() {
            effects.push(Effect::Highlight(None));
            effects.push(Effect::CloseDetail);
        }
        effects.push(Effect::DimSectors {
            focused: id.clone(),
        });
        effects.push(Effect::FlyCamera {
            pose: sector_pose(sector.center, &config.camera),
            duration_ms: config.camera.fly_duration_ms,
        });
        effects.push(Effect::FlyShip {
            target: park_position(LayoutMode::Galaxy, sector.center, &config.ship),
            duration_ms: config.ship.fly_duration_ms,
        });
        effects.push(Effect::SetHudLabel(sector.name.to_uppercase()));

        Transition {
            next: NavigationState {
                view_mode: ViewMode::Focus,
                focused_sector: Some(id.clone()),
                active_mission: None,
            },
            effects,
        }
    }

    fn overview(&self, config: &StarmapConfig) -> Transition {
        let mode = config.layout.mode;
        if mode == LayoutMode::Globe || *self == NavigationState::default() {
            return self.unchanged();
        }

        let mut effects = Vec::new();
        if self.active_mission.is_some() {
            effects.push(Effect::Highlight(None));
            effects.push(Effect::CloseDetail);
        }
        effects.push(Effect::RestoreSectors);
        effects.push(Effect::FlyCamera {
            pose: overview_pose(&config.camera),
            duration_ms: config.camera.fly_duration_ms,
        });
        effects.push(Effect::SetHudLabel(config.hud.standby_label.clone()));
        effects.push(Effect::FlyShip {
            target: home_position(mode, &config.ship, config.globe.radius),
            duration_ms: config.ship.fly_duration_ms,
        });

        Transition {
            next: NavigationState::default(),
            effects,
        }
    }

    fn step(&self, catalog: &Catalog, config: &StarmapConfig, offset: isize) -> Transition {
        let Some(active) = self.active_mission.as_ref() else {
            return self.unchanged();
        };
        match catalog.neighbor(active, offset) {
            Some(next) if next.id() != active => self.select(catalog, config, next.id()),
            _ => self.unchanged(),
        }
    }
}

/// Mission the coordinate readout rests on when nothing is open (globe layout)
fn default_mission<'a>(catalog: &'a Catalog, config: &StarmapConfig) -> Option<&'a CatalogMission> {
    config
        .hud
        .initial_mission
        .as_deref()
        .and_then(|id| catalog.mission(&MissionId::from(id)))
        .or_else(|| catalog.missions().first())
}

/// Starting camera pose for a layout
pub fn home_pose(mode: LayoutMode, config: &StarmapConfig) -> CameraPose {
    match mode {
        LayoutMode::Galaxy => overview_pose(&config.camera),
        LayoutMode::Globe => CameraPose::new(Vec3::new(0.0, 0.0, config.camera.distance), Vec3::ZERO),
    }
}

/// What a pointer hit resolved to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickTarget {
    Mission(MissionId),
    Sector(SectorId),
}

/// Owns the navigation state and applies transitions to every collaborator
#[derive(Debug, Clone)]
pub struct Navigator {
    config: StarmapConfig,
    catalog: Catalog,
    state: NavigationState,
    camera: CameraDirector,
    ship: ShipAnimator,
    markers: MarkerSet,
    readout: CoordinateReadout,
    layout: HudLayout,
    detail: Option<DetailPayload>,
    hud_label: String,
    /// Shared animation clock in seconds, advanced only by `frame`
    clock: f32,
    started_ms: f64,
    hint_dismissed: bool,
    pending_initial: Option<(MissionId, f64)>,
}

impl Navigator {
    pub fn new(config: StarmapConfig, ship_name: String, now_ms: f64) -> Self {
        let mode = config.layout.mode;
        let camera = CameraDirector::new(home_pose(mode, &config), &config.camera);
        let ship = ShipAnimator::new(
            ship_name,
            home_position(mode, &config.ship, config.globe.radius),
            mode,
            &config.ship,
        );
        Self {
            camera,
            ship,
            catalog: Catalog::empty(),
            state: NavigationState::default(),
            markers: MarkerSet::default(),
            readout: CoordinateReadout::new(config.hud.coord_duration_ms),
            layout: HudLayout::new(&config.hud),
            detail: None,
            hud_label: config.hud.standby_label.clone(),
            clock: 0.0,
            started_ms: now_ms,
            hint_dismissed: false,
            pending_initial: None,
            config,
        }
    }

    /// Install a freshly built catalog, resetting navigation to the initial state
    pub fn load_catalog(&mut self, catalog: Catalog, now_ms: f64) {
        self.markers = MarkerSet::new(
            catalog
                .missions()
                .iter()
                .map(|m| (m.id().clone(), m.position)),
        );
        self.state = NavigationState::default();
        self.detail = None;
        self.hud_label = self.config.hud.standby_label.clone();

        self.pending_initial = self
            .config
            .hud
            .initial_mission
            .as_deref()
            .map(MissionId::from)
            .filter(|id| catalog.mission(id).is_some())
            .map(|id| (id, now_ms + INITIAL_SELECT_DELAY_MS));

        if let Some(default) = default_mission(&catalog, &self.config) {
            self.readout
                .animate_to(default.mission.lat, default.mission.lon, now_ms);
        }

        info!(missions = catalog.len(), "Navigator catalog loaded");
        self.catalog = catalog;
    }

    pub fn set_ship_name(&mut self, name: String) {
        self.ship.rename(name);
    }

    /// Decide and apply one event. Returns the applied effects.
    pub fn dispatch(&mut self, event: NavEvent, now_ms: f64) -> Vec<Effect> {
        let transition = self.state.decide(&self.catalog, &self.config, &event);
        if !transition.effects.is_empty() {
            debug!(event = ?event, effects = transition.effects.len(), "Navigation transition");
        }
        for effect in &transition.effects {
            self.apply(effect, now_ms);
        }
        self.state = transition.next;
        transition.effects
    }

    fn apply(&mut self, effect: &Effect, now_ms: f64) {
        match effect {
            Effect::Highlight(id) => self.markers.select_exclusive(id.as_ref()),
            Effect::OpenDetail(payload) => {
                self.detail = Some(payload.clone());
                self.hint_dismissed = true;
            }
            Effect::CloseDetail => self.detail = None,
            Effect::FlyCamera { pose, duration_ms } => {
                self.camera.fly_to(*pose, *duration_ms, now_ms)
            }
            Effect::FlyShip {
                target,
                duration_ms,
            } => self.ship.fly_to(*target, *duration_ms, now_ms),
            Effect::SetHudLabel(label) => self.hud_label = label.clone(),
            Effect::AnimateCoordinates { lat, lon } => self.readout.animate_to(*lat, *lon, now_ms),
            Effect::DimSectors { focused } => {
                let dim = self.config.galaxy.dim_fraction;
                for sector in self.catalog.sectors_mut() {
                    let recorded = *sector.recorded_opacity.get_or_insert(sector.opacity);
                    sector.opacity = if &sector.id == focused {
                        recorded
                    } else {
                        recorded * dim
                    };
                }
            }
            Effect::RestoreSectors => {
                for sector in self.catalog.sectors_mut() {
                    if let Some(recorded) = sector.recorded_opacity {
                        sector.opacity = recorded;
                    }
                }
            }
        }
    }

    /// Advance every animation by one frame
    pub fn frame(&mut self, now_ms: f64, dt_secs: f32, dragging: bool) {
        self.clock += dt_secs.max(0.0);

        if !dragging
            && !self.camera.is_flying()
            && self.state.active_mission.is_none()
            && self.state.focused_sector.is_none()
        {
            self.camera
                .idle_rotate(self.config.camera.auto_rotate_speed * dt_secs);
        }

        self.camera.tick(now_ms);
        self.ship.tick(now_ms, self.clock);
        self.readout.tick(now_ms);

        let due = matches!(&self.pending_initial, Some((_, due)) if now_ms >= *due);
        if due {
            if let Some((id, _)) = self.pending_initial.take() {
                self.dispatch(NavEvent::SelectMission(id), now_ms);
            }
        }
    }

    /// Apply a user drag. Ignored while a programmatic fly is running.
    pub fn drag(&mut self, dx: f32, dy: f32) {
        let sensitivity = self.config.camera.sensitivity;
        self.camera.orbit(-dx * sensitivity, -dy * sensitivity);
    }

    /// Viewport changed: update projection and layout, leave animations running
    pub fn resize(&mut self, width: f32, height: f32) {
        self.camera.resize(width, height);
        self.layout.update_for_screen(width, height);
    }

    /// Screen placement of every overlay label for the current frame
    pub fn overlays(&self) -> Vec<OverlayPlacement> {
        let mode = self.config.layout.mode;
        let mut anchors = Vec::new();

        if mode == LayoutMode::Galaxy {
            let any_focused = self.state.focused_sector.is_some();
            anchors.extend(self.catalog.sectors().iter().map(|sector| TrackedAnchor {
                key: OverlayKey::Sector(sector.id.clone()),
                position: sector.center + Vec3::Y * self.config.galaxy.sector_radius * 0.5,
                suppressed: any_focused,
            }));
        }

        for mission in self.catalog.missions() {
            let shown = match mode {
                LayoutMode::Globe => true,
                LayoutMode::Galaxy => {
                    self.state.focused_sector.as_ref() == Some(mission.sector())
                        || self.state.active_mission.as_ref() == Some(mission.id())
                }
            };
            let position = match mode {
                LayoutMode::Globe => {
                    mission.position.normalize_or_zero()
                        * (self.config.globe.radius + self.config.globe.label_altitude)
                }
                LayoutMode::Galaxy => mission.position,
            };
            anchors.push(TrackedAnchor {
                key: OverlayKey::Mission(mission.id().clone()),
                position,
                suppressed: !shown,
            });
        }

        anchors.push(TrackedAnchor {
            key: OverlayKey::Ship,
            position: self.ship.position(),
            suppressed: false,
        });

        let view = self.camera.view();
        project_overlays(
            &anchors,
            ProjectionContext {
                camera: &view,
                layout: &self.layout,
                occlude_back_faces: mode == LayoutMode::Globe,
                occlusion_threshold: self.config.hud.occlusion_threshold,
                panel_open: self.detail.is_some(),
            },
        )
    }

    /// Resolve a pointer position to a mission marker or sector disk
    pub fn pick(&self, x: f32, y: f32) -> Option<PickTarget> {
        let view = self.camera.view();
        let ray = view.screen_to_ray(x, y, self.layout.screen_width, self.layout.screen_height);
        let mode = self.config.layout.mode;

        let radius = match mode {
            LayoutMode::Globe => self.config.globe.marker_size * 2.0,
            LayoutMode::Galaxy => self.config.galaxy.planet_size * 2.0,
        };
        let threshold = self.config.hud.occlusion_threshold;
        let candidates = self
            .catalog
            .missions()
            .iter()
            .filter(|m| {
                mode == LayoutMode::Galaxy
                    || !view
                        .world_to_screen(m.position, self.layout.screen_width, self.layout.screen_height)
                        .facing_away(threshold)
            })
            .map(|m| (m.id().clone(), m.position));
        if let Some(id) = pick_nearest(&ray, candidates, radius) {
            return Some(PickTarget::Mission(id));
        }

        if mode == LayoutMode::Galaxy {
            let sectors = self
                .catalog
                .sectors()
                .iter()
                .map(|s| (s.id.clone(), s.center));
            return pick_nearest(&ray, sectors, self.config.galaxy.sector_radius)
                .map(PickTarget::Sector);
        }
        None
    }

    /// Pointer click at pixel coordinates
    pub fn click(&mut self, x: f32, y: f32, now_ms: f64) -> Vec<Effect> {
        let event = match self.pick(x, y) {
            Some(PickTarget::Mission(id)) => NavEvent::SelectMission(id),
            Some(PickTarget::Sector(id)) => NavEvent::FocusSector(id),
            None => NavEvent::BackgroundClick,
        };
        self.dispatch(event, now_ms)
    }

    pub fn hint_visible(&self, now_ms: f64) -> bool {
        !self.hint_dismissed
            && now_ms - self.started_ms < f64::from(self.config.hud.hint_duration_secs) * 1000.0
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &StarmapConfig {
        &self.config
    }

    pub fn camera(&self) -> &CameraDirector {
        &self.camera
    }

    pub fn ship(&self) -> &ShipAnimator {
        &self.ship
    }

    pub fn markers(&self) -> &MarkerSet {
        &self.markers
    }

    pub fn readout(&self) -> &CoordinateReadout {
        &self.readout
    }

    pub fn layout(&self) -> &HudLayout {
        &self.layout
    }

    pub fn detail(&self) -> Option<&DetailPayload> {
        self.detail.as_ref()
    }

    pub fn hud_label(&self) -> &str {
        &self.hud_label
    }

    pub fn clock(&self) -> f32 {
        self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{parse_mission_types, parse_missions, CatalogError};

    fn scenario_catalog(config: &StarmapConfig) -> Catalog {
        let types = parse_mission_types(r#"[{"id":"ops","name":"Operations"}]"#).unwrap();
        let missions = parse_missions(
            r#"[{"id":"m1","type":"ops","lat":10,"lon":20,"name":"Alpha","title":"Op Alpha","link":"https://x"}]"#,
        )
        .unwrap();
        Catalog::build(missions, types, config)
    }

    fn wide_catalog(config: &StarmapConfig) -> Catalog {
        let types = parse_mission_types(
            r#"[{"id":"ops","name":"Operations"},{"id":"intel","name":"Intel"}]"#,
        )
        .unwrap();
        let missions = parse_missions(
            r#"[
                {"id":"m1","type":"ops","lat":10,"lon":20,"name":"Alpha","title":"Op Alpha","link":"https://x"},
                {"id":"m2","type":"intel","lat":-30,"lon":135,"name":"Bravo","title":"Op Bravo","link":"https://y","description":"Recon"},
                {"id":"m3","type":"ops","lat":50,"lon":-60,"name":"Charlie","title":"Op Charlie","link":""}
            ]"#,
        )
        .unwrap();
        Catalog::build(missions, types, config)
    }

    fn navigator(config: StarmapConfig, build: fn(&StarmapConfig) -> Catalog) -> Navigator {
        let catalog = build(&config);
        let mut nav = Navigator::new(config, "Rocinante".to_string(), 0.0);
        nav.load_catalog(catalog, 0.0);
        nav
    }

    fn globe_config() -> StarmapConfig {
        let mut config = StarmapConfig::default();
        config.layout.mode = LayoutMode::Globe;
        config
    }

    fn select(id: &str) -> NavEvent {
        NavEvent::SelectMission(MissionId::from(id))
    }

    #[test]
    fn test_focus_then_select_scenario() {
        let mut nav = navigator(StarmapConfig::default(), scenario_catalog);
        nav.dispatch(NavEvent::FocusSector("ops".into()), 0.0);
        nav.dispatch(select("m1"), 10.0);

        assert_eq!(nav.state().active_mission, Some(MissionId::from("m1")));
        assert!(nav.markers().is_selected(&"m1".into()));
        let detail = nav.detail().unwrap();
        assert_eq!(detail.title, "Op Alpha");
        assert_eq!(detail.type_name, "Operations");
        assert_eq!(detail.action_link, "https://x");
        assert_eq!(detail.action_label, "INITIATE PROTOCOL");
        assert_eq!(detail.counter, "1 / 1");
        assert!(nav.state().is_consistent(nav.catalog()));
    }

    #[test]
    fn test_double_select_returns_to_closed() {
        let mut nav = navigator(StarmapConfig::default(), scenario_catalog);
        nav.dispatch(NavEvent::FocusSector("ops".into()), 0.0);
        nav.dispatch(select("m1"), 0.0);
        nav.dispatch(select("m1"), 5.0);

        assert_eq!(nav.state().active_mission, None);
        assert!(nav.detail().is_none());
        assert_eq!(nav.markers().selected_count(), 0);
    }

    #[test]
    fn test_double_select_from_overview_restores_everything() {
        let mut nav = navigator(StarmapConfig::default(), wide_catalog);
        let base = StarmapConfig::default().galaxy.sector_opacity;
        let before = nav.state().clone();
        nav.dispatch(select("m1"), 0.0);
        assert_eq!(nav.state().view_mode, ViewMode::Overview);
        assert_eq!(nav.state().focused_sector, None);
        assert!(nav.state().is_consistent(nav.catalog()));

        nav.dispatch(select("m1"), 5.0);
        assert_eq!(nav.state(), &before);
        assert_eq!(nav.hud_label(), "SYSTEM STANDBY");
        assert_eq!(nav.markers().selected_count(), 0);
        assert!(nav.detail().is_none());
        for sector in nav.catalog().sectors() {
            assert!((sector.opacity - base).abs() < 1e-6);
        }
    }

    #[test]
    fn test_double_select_globe() {
        let mut nav = navigator(globe_config(), scenario_catalog);
        let before = nav.state().clone();
        nav.dispatch(select("m1"), 0.0);
        nav.dispatch(select("m1"), 0.0);
        assert_eq!(nav.state(), &before);
        assert_eq!(nav.markers().selected_count(), 0);
        assert!(nav.detail().is_none());
    }

    #[test]
    fn test_selection_exclusive() {
        let mut nav = navigator(StarmapConfig::default(), wide_catalog);
        for id in ["m1", "m2", "m3", "m3", "m1", "nope", "m2"] {
            nav.dispatch(select(id), 0.0);
            assert!(nav.markers().selected_count() <= 1);
            assert!(nav.state().is_consistent(nav.catalog()));
            assert_eq!(nav.markers().selected(), nav.state().active_mission.as_ref());
        }
    }

    #[test]
    fn test_unknown_mission_is_noop() {
        let mut nav = navigator(StarmapConfig::default(), wide_catalog);
        nav.dispatch(select("m2"), 0.0);
        let effects = nav.dispatch(select("unknown"), 0.0);
        assert!(effects.is_empty());
        assert_eq!(nav.state().active_mission, Some(MissionId::from("m2")));

        let effects = nav.dispatch(NavEvent::FocusSector("nowhere".into()), 0.0);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_empty_catalog_is_inert() {
        let config = StarmapConfig::default();
        let catalog = Catalog::load_or_empty(
            Err(CatalogError::FetchError("offline".to_string())),
            Err(CatalogError::FetchError("offline".to_string())),
            &config,
        );
        let mut nav = Navigator::new(config, "X".to_string(), 0.0);
        nav.load_catalog(catalog, 0.0);

        assert!(nav.dispatch(select("m1"), 0.0).is_empty());
        assert!(nav.dispatch(NavEvent::Escape, 0.0).is_empty());
        assert!(nav.dispatch(NavEvent::NextMission, 0.0).is_empty());
        nav.frame(16.0, 0.016, false);
        // Only the ship label remains
        assert_eq!(nav.overlays().len(), 1);
        assert_eq!(nav.pick(960.0, 540.0), None);
    }

    #[test]
    fn test_select_outside_focus_switches_sector() {
        let mut nav = navigator(StarmapConfig::default(), wide_catalog);
        nav.dispatch(NavEvent::FocusSector("ops".into()), 0.0);
        nav.dispatch(select("m2"), 0.0);
        assert_eq!(nav.state().focused_sector, Some(SectorId::from("intel")));
        assert_eq!(nav.state().view_mode, ViewMode::Focus);
        assert!(nav.state().is_consistent(nav.catalog()));
    }

    #[test]
    fn test_focus_other_sector_closes_mission() {
        let mut nav = navigator(StarmapConfig::default(), wide_catalog);
        nav.dispatch(select("m1"), 0.0);
        nav.dispatch(NavEvent::FocusSector("intel".into()), 0.0);
        assert_eq!(nav.state().active_mission, None);
        assert!(nav.detail().is_none());
        assert_eq!(nav.markers().selected_count(), 0);
        assert_eq!(nav.hud_label(), "INTEL");
    }

    #[test]
    fn test_focus_same_sector_is_noop() {
        let mut nav = navigator(StarmapConfig::default(), wide_catalog);
        nav.dispatch(NavEvent::FocusSector("ops".into()), 0.0);
        assert!(nav
            .dispatch(NavEvent::FocusSector("ops".into()), 100.0)
            .is_empty());
    }

    #[test]
    fn test_escape_unwinds_one_level() {
        let mut nav = navigator(StarmapConfig::default(), wide_catalog);
        nav.dispatch(NavEvent::FocusSector("ops".into()), 0.0);
        nav.dispatch(select("m1"), 0.0);

        nav.dispatch(NavEvent::Escape, 0.0);
        assert_eq!(nav.state().active_mission, None);
        assert_eq!(nav.state().focused_sector, Some(SectorId::from("ops")));
        assert_eq!(nav.hud_label(), "OPERATIONS");

        nav.dispatch(NavEvent::Escape, 0.0);
        assert_eq!(nav.state(), &NavigationState::default());
        assert_eq!(nav.hud_label(), "SYSTEM STANDBY");

        assert!(nav.dispatch(NavEvent::Escape, 0.0).is_empty());
    }

    #[test]
    fn test_background_click_is_noop() {
        let mut nav = navigator(StarmapConfig::default(), wide_catalog);
        nav.dispatch(select("m1"), 0.0);
        assert!(nav.dispatch(NavEvent::BackgroundClick, 0.0).is_empty());
        assert_eq!(nav.state().active_mission, Some(MissionId::from("m1")));
    }

    #[test]
    fn test_sector_dimming_records_once_and_restores() {
        let mut nav = navigator(StarmapConfig::default(), wide_catalog);
        let base = StarmapConfig::default().galaxy.sector_opacity;
        nav.dispatch(NavEvent::FocusSector("ops".into()), 0.0);
        let opacity = |nav: &Navigator, id: &str| nav.catalog().sector(&id.into()).unwrap().opacity;
        assert!((opacity(&nav, "ops") - base).abs() < 1e-6);
        assert!((opacity(&nav, "intel") - base * 0.12).abs() < 1e-6);

        // Switching focus must not record the dimmed value
        nav.dispatch(NavEvent::FocusSector("intel".into()), 0.0);
        assert!((opacity(&nav, "intel") - base).abs() < 1e-6);
        assert!((opacity(&nav, "ops") - base * 0.12).abs() < 1e-6);

        nav.dispatch(NavEvent::ReturnToOverview, 0.0);
        assert!((opacity(&nav, "ops") - base).abs() < 1e-6);
        assert!((opacity(&nav, "intel") - base).abs() < 1e-6);
    }

    #[test]
    fn test_camera_converges_to_latest_target() {
        let config = StarmapConfig::default();
        let mut nav = navigator(config.clone(), wide_catalog);
        nav.dispatch(NavEvent::FocusSector("ops".into()), 0.0);
        nav.frame(100.0, 0.1, false);
        nav.dispatch(select("m2"), 100.0);

        let m2 = nav.catalog().mission(&"m2".into()).unwrap().position;
        let expected = mission_pose(m2, LayoutMode::Galaxy, &config.camera);
        let mut now = 100.0;
        while nav.camera().is_flying() {
            now += 16.0;
            nav.frame(now, 0.016, false);
        }
        assert_eq!(nav.camera().pose(), expected);
        assert!(nav.camera().orbit_enabled());
    }

    #[test]
    fn test_next_and_previous_wrap() {
        let mut nav = navigator(globe_config(), wide_catalog);
        assert!(nav.dispatch(NavEvent::NextMission, 0.0).is_empty());

        nav.dispatch(select("m3"), 0.0);
        nav.dispatch(NavEvent::NextMission, 0.0);
        assert_eq!(nav.state().active_mission, Some(MissionId::from("m1")));
        assert_eq!(nav.detail().unwrap().counter, "1 / 3");

        nav.dispatch(NavEvent::PreviousMission, 0.0);
        assert_eq!(nav.state().active_mission, Some(MissionId::from("m3")));
        assert_eq!(nav.markers().selected_count(), 1);
    }

    #[test]
    fn test_globe_ignores_sector_events() {
        let mut nav = navigator(globe_config(), wide_catalog);
        assert!(nav
            .dispatch(NavEvent::FocusSector("ops".into()), 0.0)
            .is_empty());
        assert!(nav.dispatch(NavEvent::ReturnToOverview, 0.0).is_empty());
        nav.dispatch(select("m2"), 0.0);
        assert_eq!(nav.state().focused_sector, None);
    }

    #[test]
    fn test_globe_close_returns_readout_to_default() {
        let mut nav = navigator(globe_config(), wide_catalog);
        nav.dispatch(select("m2"), 0.0);
        nav.frame(2000.0, 0.0, false);
        assert_eq!(nav.readout().text(), "LAT -30.00 / LON 135.00");

        nav.dispatch(NavEvent::CloseMission, 2000.0);
        nav.frame(4000.0, 0.0, false);
        assert_eq!(nav.readout().text(), "LAT 10.00 / LON 20.00");
    }

    #[test]
    fn test_idle_rotation_only_when_idle() {
        let mut nav = navigator(StarmapConfig::default(), wide_catalog);
        let start = nav.camera().pose();
        nav.frame(16.0, 1.0, true);
        assert_eq!(nav.camera().pose(), start);
        nav.frame(32.0, 1.0, false);
        assert_ne!(nav.camera().pose(), start);

        nav.dispatch(NavEvent::FocusSector("ops".into()), 32.0);
        let mut now = 32.0;
        while nav.camera().is_flying() {
            now += 16.0;
            nav.frame(now, 0.016, false);
        }
        let settled = nav.camera().pose();
        nav.frame(now + 16.0, 1.0, false);
        assert_eq!(nav.camera().pose(), settled);
    }

    #[test]
    fn test_mission_labels_follow_focus() {
        let mut nav = navigator(StarmapConfig::default(), wide_catalog);
        let hidden = |nav: &Navigator, key: &OverlayKey| {
            nav.overlays()
                .into_iter()
                .find(|p| &p.key == key)
                .map(|p| p.hidden)
        };
        let m1 = OverlayKey::Mission("m1".into());
        let ops = OverlayKey::Sector("ops".into());
        assert_eq!(hidden(&nav, &m1), Some(true));

        nav.dispatch(NavEvent::FocusSector("ops".into()), 0.0);
        assert_eq!(hidden(&nav, &ops), Some(true));
        assert_eq!(hidden(&nav, &OverlayKey::Mission("m2".into())), Some(true));
    }

    #[test]
    fn test_active_mission_label_shown_without_focus() {
        let mut nav = navigator(StarmapConfig::default(), wide_catalog);
        let hidden = |nav: &Navigator, id: &str| {
            nav.overlays()
                .into_iter()
                .find(|p| p.key == OverlayKey::Mission(id.into()))
                .map(|p| p.hidden)
        };
        nav.dispatch(select("m1"), 0.0);
        let mut now = 0.0;
        while nav.camera().is_flying() {
            now += 16.0;
            nav.frame(now, 0.016, false);
        }
        assert_eq!(nav.state().focused_sector, None);
        assert_eq!(hidden(&nav, "m1"), Some(false));
        assert_eq!(hidden(&nav, "m3"), Some(true));
    }

    #[test]
    fn test_initial_mission_opens_after_delay() {
        let mut config = globe_config();
        config.hud.initial_mission = Some("m2".to_string());
        let mut nav = navigator(config, wide_catalog);
        assert!(nav.hint_visible(100.0));
        nav.frame(100.0, 0.1, false);
        assert_eq!(nav.state().active_mission, None);
        nav.frame(350.0, 0.25, false);
        assert_eq!(nav.state().active_mission, Some(MissionId::from("m2")));
        assert!(!nav.hint_visible(400.0));
    }

    #[test]
    fn test_hint_expires() {
        let nav = navigator(StarmapConfig::default(), wide_catalog);
        assert!(nav.hint_visible(5_000.0));
        assert!(!nav.hint_visible(6_500.0));
    }

    #[test]
    fn test_resize_keeps_fly() {
        let mut nav = navigator(StarmapConfig::default(), wide_catalog);
        nav.dispatch(select("m1"), 0.0);
        nav.resize(700.0, 900.0);
        assert!(nav.camera().is_flying());
        assert!(nav.layout().is_mobile);
    }

    #[test]
    fn test_detail_fields() {
        let config = StarmapConfig::default();
        let catalog = wide_catalog(&config);
        let m2 = catalog.mission(&"m2".into()).unwrap();
        let detail = DetailPayload::from_mission(m2, &catalog);
        assert_eq!(detail.counter, "2 / 3");
        assert!(detail
            .fields
            .iter()
            .any(|f| f.value == FieldValue::Text("Recon".to_string())));
        assert!(detail.fields.iter().any(|f| matches!(
            &f.value,
            FieldValue::Link { href, .. } if href == "https://y"
        )));

        let m3 = catalog.mission(&"m3".into()).unwrap();
        let detail = DetailPayload::from_mission(m3, &catalog);
        assert!(!detail
            .fields
            .iter()
            .any(|f| matches!(f.value, FieldValue::Link { .. })));
    }

    #[test]
    fn test_decide_is_pure() {
        let config = StarmapConfig::default();
        let catalog = wide_catalog(&config);
        let state = NavigationState::default();
        let a = state.decide(&catalog, &config, &select("m1"));
        let b = state.decide(&catalog, &config, &select("m1"));
        assert_eq!(a, b);
        assert_eq!(state, NavigationState::default());
        assert!(matches!(a.effects.first(), Some(Effect::Highlight(Some(_)))));
        assert!(!a
            .effects
            .iter()
            .any(|e| matches!(e, Effect::DimSectors { .. })));
    }
}
