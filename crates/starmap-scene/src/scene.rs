//! Scene assembly - camera, lights, globe or galaxy backdrop, star field,
//! and per-mission markers, sector disks and the mascot ship

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use starmap_core::{LayoutMode, MissionId, SectorId, StarmapConfig};
use std::f32::consts::{FRAC_PI_2, TAU};

use crate::camera::MainCamera;
use crate::data::CatalogReady;
use crate::{to_quat, to_vec3, Starmap, StarmapSet};

const STAR_COUNT: usize = 900;
const STAR_SEED: u64 = 0x5747_4d41;
const NEBULA_COUNT: usize = 6;
const BACKGROUND: Color = Color::srgb(0.01, 0.02, 0.04);
const GRID_COLOR: Color = Color::srgba(0.0, 0.94, 1.0, 0.18);
const SHIP_COLOR: Color = Color::srgb(1.0, 0.85, 0.4);

/// Marker component for mission markers (planets in the galaxy layout)
#[derive(Component)]
pub struct MarkerEntity {
    pub mission: MissionId,
}

/// Marker component for sector disks
#[derive(Component)]
pub struct SectorEntity {
    pub sector: SectorId,
}

/// Marker component for the mascot ship
#[derive(Component)]
pub struct ShipEntity;

/// Marker component for static backdrop geometry
#[derive(Component)]
pub struct Backdrop;

/// Plugin for scene setup
pub struct SceneSetupPlugin;

impl Plugin for SceneSetupPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(BACKGROUND))
            .add_systems(Startup, setup_scene)
            .add_systems(Update, spawn_catalog_visuals.in_set(StarmapSet::Advance))
            .add_systems(
                Update,
                (sync_markers, sync_sectors, sync_ship).in_set(StarmapSet::Sync),
            );
    }
}

fn unlit(color: Color) -> StandardMaterial {
    StandardMaterial {
        base_color: color,
        unlit: true,
        alpha_mode: AlphaMode::Blend,
        ..default()
    }
}

fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    starmap: Res<Starmap>,
) {
    let config = starmap.config();
    let pose = starmap.camera().pose();

    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: config.camera.fov_degrees.to_radians(),
            near: config.camera.near,
            far: config.camera.far,
            ..default()
        }),
        Transform::from_translation(to_vec3(pose.position))
            .looking_at(to_vec3(pose.target), Vec3::Y),
        MainCamera,
    ));

    commands.spawn((
        PointLight {
            intensity: 200_000.0,
            shadows_enabled: false,
            color: Color::srgb(0.8, 0.95, 1.0),
            ..default()
        },
        Transform::from_xyz(4.0, 8.0, 6.0),
    ));

    match config.layout.mode {
        LayoutMode::Globe => spawn_globe(&mut commands, &mut meshes, &mut materials, config),
        LayoutMode::Galaxy => spawn_galaxy_core(&mut commands, &mut meshes, &mut materials, config),
    }
    spawn_star_field(&mut commands, &mut meshes, &mut materials);
    spawn_nebulae(&mut commands, &mut meshes, &mut materials);

    // Ship: cone tip points along local -Z so the parent rotation is the facing
    let ship_material = materials.add(StandardMaterial {
        base_color: SHIP_COLOR,
        emissive: LinearRgba::rgb(0.6, 0.45, 0.15),
        ..default()
    });
    let ship = starmap.ship();
    commands
        .spawn((
            Transform::from_translation(to_vec3(ship.position()))
                .with_rotation(to_quat(ship.orientation())),
            Visibility::default(),
            ShipEntity,
        ))
        .with_children(|parent| {
            parent.spawn((
                Mesh3d(meshes.add(Cone::new(0.05, 0.16))),
                MeshMaterial3d(ship_material),
                Transform::from_rotation(Quat::from_rotation_x(-FRAC_PI_2)),
            ));
        });
}

fn spawn_globe(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    config: &StarmapConfig,
) {
    let radius = config.globe.radius;

    commands.spawn((
        Mesh3d(meshes.add(Sphere::new(radius * 0.995).mesh().uv(64, 32))),
        MeshMaterial3d(materials.add(unlit(Color::srgba(0.0, 0.08, 0.12, 0.85)))),
        Transform::default(),
        Backdrop,
    ));

    // Latitude rings every 30 degrees, longitude meridians every 30 degrees
    let grid_material = materials.add(unlit(GRID_COLOR));
    for lat in (-60..=60).step_by(30) {
        let phi = (lat as f32).to_radians();
        let ring = Torus {
            minor_radius: 0.003,
            major_radius: radius * phi.cos(),
        };
        commands.spawn((
            Mesh3d(meshes.add(ring)),
            MeshMaterial3d(grid_material.clone()),
            Transform::from_xyz(0.0, radius * phi.sin(), 0.0),
            Backdrop,
        ));
    }
    let meridian = meshes.add(Torus {
        minor_radius: 0.003,
        major_radius: radius,
    });
    for lon in (0..180).step_by(30) {
        let rotation =
            Quat::from_rotation_y((lon as f32).to_radians()) * Quat::from_rotation_x(FRAC_PI_2);
        commands.spawn((
            Mesh3d(meridian.clone()),
            MeshMaterial3d(grid_material.clone()),
            Transform::from_rotation(rotation),
            Backdrop,
        ));
    }

    // Atmosphere halo
    commands.spawn((
        Mesh3d(meshes.add(Sphere::new(radius * 1.08).mesh().uv(48, 24))),
        MeshMaterial3d(materials.add(unlit(Color::srgba(0.0, 0.6, 0.8, 0.06)))),
        Transform::default(),
        Backdrop,
    ));
}

fn spawn_galaxy_core(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    config: &StarmapConfig,
) {
    commands.spawn((
        Mesh3d(meshes.add(Sphere::new(0.5).mesh().uv(32, 16))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(1.0, 0.75, 0.45),
            emissive: LinearRgba::rgb(2.0, 1.2, 0.5),
            ..default()
        })),
        Transform::default(),
        Backdrop,
    ));

    // Orbit guide through every sector centre
    commands.spawn((
        Mesh3d(meshes.add(Torus {
            minor_radius: 0.01,
            major_radius: config.galaxy.ring_radius,
        })),
        MeshMaterial3d(materials.add(unlit(GRID_COLOR))),
        Transform::default(),
        Backdrop,
    ));
}

fn spawn_star_field(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    let mut rng = StdRng::seed_from_u64(STAR_SEED);
    let star_mesh = meshes.add(Sphere::new(0.05).mesh().uv(6, 4));
    let bright = materials.add(unlit(Color::srgba(0.85, 0.95, 1.0, 0.9)));
    let dim = materials.add(unlit(Color::srgba(0.5, 0.7, 0.9, 0.5)));

    for i in 0..STAR_COUNT {
        // Uniform direction on the sphere, radius in a far shell
        let y: f32 = rng.gen_range(-1.0..1.0);
        let theta: f32 = rng.gen_range(0.0..TAU);
        let r = (1.0 - y * y).sqrt();
        let distance: f32 = rng.gen_range(40.0..90.0);
        let position = Vec3::new(r * theta.cos(), y, r * theta.sin()) * distance;
        let scale: f32 = rng.gen_range(0.4..1.6);
        commands.spawn((
            Mesh3d(star_mesh.clone()),
            MeshMaterial3d(if i % 3 == 0 { bright.clone() } else { dim.clone() }),
            Transform::from_translation(position).with_scale(Vec3::splat(scale)),
            Backdrop,
        ));
    }
}

/// A few large faint clouds behind the star field
fn spawn_nebulae(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    let mut rng = StdRng::seed_from_u64(STAR_SEED ^ 0xbeef);
    let cloud = meshes.add(Sphere::new(1.0).mesh().uv(24, 12));
    let tints = [
        Color::srgba(0.35, 0.1, 0.6, 0.05),
        Color::srgba(0.0, 0.45, 0.6, 0.05),
        Color::srgba(0.6, 0.2, 0.35, 0.04),
    ];

    for i in 0..NEBULA_COUNT {
        let theta: f32 = rng.gen_range(0.0..TAU);
        let y: f32 = rng.gen_range(-0.4..0.4);
        let distance: f32 = rng.gen_range(60.0..80.0);
        let position = Vec3::new(theta.cos(), y, theta.sin()) * distance;
        let scale = Vec3::new(
            rng.gen_range(12.0..22.0),
            rng.gen_range(5.0..10.0),
            rng.gen_range(12.0..22.0),
        );
        commands.spawn((
            Mesh3d(cloud.clone()),
            MeshMaterial3d(materials.add(unlit(tints[i % tints.len()]))),
            Transform::from_translation(position).with_scale(scale),
            Backdrop,
        ));
    }
}

/// Rebuild markers and sector disks whenever a catalog is installed
fn spawn_catalog_visuals(
    mut commands: Commands,
    mut ready: MessageReader<CatalogReady>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    starmap: Res<Starmap>,
    existing: Query<Entity, Or<(With<MarkerEntity>, With<SectorEntity>)>>,
) {
    if ready.read().count() == 0 {
        return;
    }
    for entity in existing.iter() {
        commands.entity(entity).despawn();
    }

    let config = starmap.config();
    let catalog = starmap.catalog();
    let marker_radius = match config.layout.mode {
        LayoutMode::Globe => config.globe.marker_size,
        LayoutMode::Galaxy => config.galaxy.planet_size,
    };
    let marker_mesh = meshes.add(Sphere::new(marker_radius).mesh().uv(16, 12));

    for mission in catalog.missions() {
        // One material per marker so colour and intensity animate independently
        let material = materials.add(unlit(Color::srgb(0.0, 0.94, 1.0)));
        commands.spawn((
            Mesh3d(marker_mesh.clone()),
            MeshMaterial3d(material),
            Transform::from_translation(to_vec3(mission.position)),
            MarkerEntity {
                mission: mission.id().clone(),
            },
        ));
    }

    if config.layout.mode == LayoutMode::Galaxy {
        let disk = meshes.add(Circle::new(config.galaxy.sector_radius));
        for sector in catalog.sectors() {
            let material = materials.add(StandardMaterial {
                base_color: Color::srgba(0.0, 0.55, 0.75, sector.opacity),
                unlit: true,
                alpha_mode: AlphaMode::Blend,
                double_sided: true,
                cull_mode: None,
                ..default()
            });
            commands.spawn((
                Mesh3d(disk.clone()),
                MeshMaterial3d(material),
                Transform::from_translation(to_vec3(sector.center))
                    .with_rotation(Quat::from_rotation_x(-FRAC_PI_2)),
                SectorEntity {
                    sector: sector.id.clone(),
                },
            ));
        }
    }

    tracing::info!(
        markers = catalog.len(),
        sectors = catalog.sectors().len(),
        "Catalog visuals spawned"
    );
}

fn sync_markers(
    starmap: Res<Starmap>,
    mut markers: Query<(&MarkerEntity, &mut Transform, &MeshMaterial3d<StandardMaterial>)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let clock = starmap.clock();
    for (marker, mut transform, material) in &mut markers {
        let Some(sample) = starmap.markers().sample(&marker.mission, clock) else {
            continue;
        };
        transform.scale = Vec3::splat(sample.scale);
        if let Some(material) = materials.get_mut(&material.0) {
            let [r, g, b] = sample.color;
            let i = sample.intensity;
            material.base_color = Color::srgb(r * i, g * i, b * i);
        }
    }
}

fn sync_sectors(
    starmap: Res<Starmap>,
    sectors: Query<(&SectorEntity, &MeshMaterial3d<StandardMaterial>)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (entity, material) in &sectors {
        let Some(sector) = starmap.catalog().sector(&entity.sector) else {
            continue;
        };
        if let Some(material) = materials.get_mut(&material.0) {
            if (material.base_color.alpha() - sector.opacity).abs() > f32::EPSILON {
                material.base_color.set_alpha(sector.opacity);
            }
        }
    }
}

fn sync_ship(starmap: Res<Starmap>, mut ship_query: Query<&mut Transform, With<ShipEntity>>) {
    let ship = starmap.ship();
    if let Ok(mut transform) = ship_query.single_mut() {
        transform.translation = to_vec3(ship.position());
        transform.rotation = to_quat(ship.orientation());
    }
}
