//! # Simulation Driver
//!
//! One [`Simulation::tick`]:
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │ 1. clamp dt, advance play time                             │
//! │ 2. systems: player input -> movement -> camera             │
//! │ 3. regions.update(player position)                         │
//! │ 4. ease presented visuals toward the region target         │
//! │ 5. chunks.update(player position), rebuild terrain if dirty│
//! │ 6. periodic status line                                    │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! The renderer reads [`Simulation::terrain`], [`Simulation::static_meshes`],
//! entity transforms and [`Simulation::visuals`] between ticks.

use myth_core::{systems, EntityId, InputState, MeshId, World};
use myth_procedural::{chunk_random, ChunkStreamer, StaticMeshes, TerrainMesh};
use myth_region::{RegionCoord, RegionSimulator, RegionState, RegionVisuals, StateChange};
use myth_shared::{Mat4, Vec3};
use tracing::{error, info, warn};

use crate::config::SimConfig;
use crate::save::{CameraSave, PlayerSave, RegionSave, SaveData, SaveManager, SAVE_VERSION};

/// Landmark grid coordinates on each axis (world units).
const LANDMARK_GRID: [i32; 5] = [-50, -25, 0, 25, 50];
/// Hash channel for landmark heights.
const CHANNEL_LANDMARK_HEIGHT: i32 = 99;
/// Hash channel for landmark yaw.
const CHANNEL_LANDMARK_YAW: i32 = 100;

/// What happened during one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickReport {
    /// Step actually simulated, after clamping.
    pub dt: f32,
    /// Player position after movement.
    pub player_position: Vec3,
    /// Region the player occupies.
    pub region: RegionCoord,
    /// That region's state.
    pub state: RegionState,
    /// Transition of the occupied region this tick.
    pub region_change: Option<StateChange>,
    /// Whether the terrain buffer was rebuilt.
    pub terrain_rebuilt: bool,
}

/// The live simulation: world, terrain window, region field and presentation state.
#[derive(Debug)]
pub struct Simulation {
    config: SimConfig,
    world: World,
    chunks: ChunkStreamer,
    regions: RegionSimulator,
    terrain: TerrainMesh,
    meshes: StaticMeshes,
    visuals: RegionVisuals,
    landmarks: Vec<EntityId>,
    saves: SaveManager,
    play_time: f32,
    status_timer: f32,
    last_logged_state: RegionState,
}

impl Simulation {
    /// Builds the starting scene: player at the origin, follow camera,
    /// landmark grid and the first terrain window.
    ///
    /// # Panics
    ///
    /// Panics if `config` has a non-positive chunk or region size, a negative
    /// region rate or an oversized load radius; use [`SimConfig::validate`]
    /// on untrusted input first.
    #[must_use]
    pub fn new(config: SimConfig) -> Self {
        let meshes = StaticMeshes::build();
        let mut world = World::new();

        let player = world.create_player(Vec3::ZERO);
        if let Some(r) = world.renderables.try_get_mut(player) {
            *r = meshes.renderable(MeshId::Player);
        }
        world.create_camera(player);

        let landmarks = spawn_landmarks(&mut world, &meshes, config.streaming.salt);

        let mut chunks = ChunkStreamer::new(config.streamer_config());
        let mut terrain = TerrainMesh::new();
        chunks.update(Vec3::ZERO);
        chunks.build_mesh_into(&mut terrain);
        chunks.clear_dirty();

        info!(
            landmarks = landmarks.len(),
            chunks = chunks.len(),
            terrain_vertices = terrain.vertices.len(),
            "Simulation ready"
        );

        Self {
            regions: RegionSimulator::new(config.region_config()),
            saves: SaveManager::new(config.save.path.clone()),
            config,
            world,
            chunks,
            terrain,
            meshes,
            visuals: RegionVisuals::default(),
            landmarks,
            play_time: 0.0,
            status_timer: 0.0,
            last_logged_state: RegionState::Stable,
        }
    }

    /// Advances the simulation by `dt` seconds (clamped to `[0, max_dt]`).
    ///
    /// `input` is read only; the caller clears its per-tick state afterwards.
    pub fn tick(&mut self, input: &InputState, dt: f32) -> TickReport {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, self.config.timing.max_dt)
        } else {
            warn!(dt, "Non-finite frame time, simulating zero");
            0.0
        };
        self.play_time += dt;

        systems::update_player_input(&mut self.world, input);
        systems::update_movement(&mut self.world, dt);
        systems::update_camera(&mut self.world, input, dt);

        let position = self.player_position();
        let region_change = self.regions.update(position, dt);
        if let Some(change) = region_change {
            info!(region = %change.coord, from = %change.from, to = %change.to, "Region state changed");
            self.last_logged_state = change.to;
        }

        let target = self.regions.current_visuals();
        let t = 1.0 - (-self.config.timing.visual_smoothing * dt).exp();
        self.visuals = self.visuals.lerp(&target, t);

        self.chunks.update(position);
        let terrain_rebuilt = self.rebuild_terrain_if_dirty();

        self.status_timer += dt;
        if self.status_timer >= self.config.timing.status_interval {
            self.status_timer = 0.0;
            self.log_status(position);
        }

        TickReport {
            dt,
            player_position: position,
            region: self.regions.current_region(),
            state: self.regions.current_region_data().state,
            region_change,
            terrain_rebuilt,
        }
    }

    fn rebuild_terrain_if_dirty(&mut self) -> bool {
        if !self.chunks.is_dirty() {
            return false;
        }
        self.chunks.build_mesh_into(&mut self.terrain);
        self.chunks.clear_dirty();
        true
    }

    fn log_status(&mut self, position: Vec3) {
        let data = self.regions.current_region_data();
        if data.state != self.last_logged_state {
            info!(from = %self.last_logged_state, to = %data.state, "Region state changed");
            self.last_logged_state = data.state;
        }
        info!(
            x = position.x,
            y = position.y,
            z = position.z,
            region = %self.regions.current_region(),
            state = %data.state,
            pressure_pct = data.pressure * 100.0,
            play_time = self.play_time,
            "Status"
        );
    }

    /// Player position, or the origin if the player is gone.
    #[must_use]
    pub fn player_position(&self) -> Vec3 {
        self.world
            .transform(self.world.player())
            .map_or(Vec3::ZERO, |t| t.position)
    }

    /// Camera view matrix for the renderer.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        systems::camera_view_matrix(&self.world)
    }

    /// Snapshot of everything the quick-save persists.
    #[must_use]
    pub fn capture_save(&self) -> SaveData {
        let player = self
            .world
            .transform(self.world.player())
            .map(|t| PlayerSave {
                position: t.position.to_array(),
                yaw: t.rotation.y,
            })
            .unwrap_or_default();

        let camera = self
            .world
            .camera_controllers
            .try_get(self.world.camera())
            .map(|c| CameraSave {
                yaw: c.yaw,
                pitch: c.pitch,
                distance: c.distance,
            })
            .unwrap_or_default();

        let regions = self
            .regions
            .regions()
            .into_iter()
            .map(|(coord, data)| RegionSave {
                x: coord.x,
                z: coord.z,
                state: data.state,
                pressure: data.pressure,
            })
            .collect();

        SaveData {
            version: SAVE_VERSION,
            play_time: self.play_time,
            player,
            camera,
            regions,
        }
    }

    /// Replaces the live state with `data`.
    ///
    /// The region field is rebuilt from the saved pressures; a saved state
    /// that disagrees with its pressure is reported and ignored. Visuals snap
    /// to the target and the terrain window is rebuilt around the player.
    pub fn apply_save(&mut self, data: &SaveData) {
        self.play_time = data.play_time.max(0.0);

        let player = self.world.player();
        let position = Vec3::from_array(data.player.position);
        if let Some(t) = self.world.transforms.try_get_mut(player) {
            t.position = position;
            t.rotation.y = data.player.yaw;
        }
        if let Some(c) = self.world.player_controllers.try_get_mut(player) {
            c.target_yaw = data.player.yaw;
        }
        if let Some(v) = self.world.velocities.try_get_mut(player) {
            v.linear = Vec3::ZERO;
        }

        let camera = self.world.camera();
        if let Some(c) = self.world.camera_controllers.try_get_mut(camera) {
            c.yaw = data.camera.yaw;
            c.pitch = data.camera.pitch.clamp(c.min_pitch, c.max_pitch);
            c.distance = data.camera.distance.clamp(c.min_distance, c.max_distance);
            c.current_position = systems::orbit_position(c, position);
        }

        self.regions.clear();
        for saved in &data.regions {
            let coord = RegionCoord::new(saved.x, saved.z);
            let state = self.regions.restore_region(coord, saved.pressure);
            if state != saved.state {
                warn!(
                    region = %coord,
                    saved = %saved.state,
                    derived = %state,
                    "Saved region state disagrees with its pressure"
                );
            }
        }
        self.regions.set_current_region(self.regions.region_coord(position));

        self.visuals = self.regions.current_visuals();
        self.last_logged_state = self.regions.current_region_data().state;
        self.status_timer = 0.0;

        self.chunks.update(position);
        self.chunks.force_rebuild();
        self.rebuild_terrain_if_dirty();
    }

    /// Writes the quick-save. Failures are logged, never fatal.
    pub fn quick_save(&self) -> bool {
        match self.saves.save(&self.capture_save()) {
            Ok(()) => true,
            Err(err) => {
                error!(error = %err, "Quick-save failed");
                false
            }
        }
    }

    /// Restores the quick-save. On any failure the live state is untouched.
    pub fn quick_load(&mut self) -> bool {
        if !self.saves.save_exists() {
            warn!(path = %self.saves.path().display(), "No quick-save to load");
            return false;
        }
        match self.saves.load() {
            Ok(data) => {
                self.apply_save(&data);
                true
            }
            Err(err) => {
                error!(error = %err, "Quick-load failed");
                false
            }
        }
    }

    /// Configuration in effect.
    #[must_use]
    pub const fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Entity store.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Mutable entity store.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Terrain window.
    #[must_use]
    pub const fn chunks(&self) -> &ChunkStreamer {
        &self.chunks
    }

    /// Region field.
    #[must_use]
    pub const fn regions(&self) -> &RegionSimulator {
        &self.regions
    }

    /// Current terrain buffer.
    #[must_use]
    pub const fn terrain(&self) -> &TerrainMesh {
        &self.terrain
    }

    /// Prop meshes referenced by entity renderables.
    #[must_use]
    pub const fn static_meshes(&self) -> &StaticMeshes {
        &self.meshes
    }

    /// Smoothed visuals for this frame.
    #[must_use]
    pub const fn visuals(&self) -> &RegionVisuals {
        &self.visuals
    }

    /// Landmark entities spawned at startup.
    #[must_use]
    pub fn landmarks(&self) -> &[EntityId] {
        &self.landmarks
    }

    /// Seconds simulated (restored by loads).
    #[must_use]
    pub const fn play_time(&self) -> f32 {
        self.play_time
    }

    /// Quick-save file handler.
    #[must_use]
    pub const fn save_manager(&self) -> &SaveManager {
        &self.saves
    }
}

/// Pillars on a 25-unit grid around the origin, leaving the spawn point free.
#[allow(clippy::cast_precision_loss)]
fn spawn_landmarks(world: &mut World, meshes: &StaticMeshes, salt: i32) -> Vec<EntityId> {
    let mut out = Vec::with_capacity(LANDMARK_GRID.len() * LANDMARK_GRID.len() - 1);
    for &x in &LANDMARK_GRID {
        for &z in &LANDMARK_GRID {
            if x == 0 && z == 0 {
                continue;
            }
            let height = 1.0 + chunk_random(x, z, CHANNEL_LANDMARK_HEIGHT, salt) * 1.5;
            let yaw = chunk_random(x, z, CHANNEL_LANDMARK_YAW, salt) * 360.0;
            let e = world.create_landmark(
                Vec3::new(x as f32, height / 2.0, z as f32),
                Vec3::new(1.5, height, 1.5),
                yaw,
            );
            if let Some(r) = world.renderables.try_get_mut(e) {
                *r = meshes.renderable(MeshId::Cube);
            }
            out.push(e);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use myth_core::Key;

    fn small_config() -> SimConfig {
        let mut config = SimConfig::default();
        config.streaming.load_radius = 1;
        config
    }

    #[test]
    fn test_startup_scene() {
        let sim = Simulation::new(small_config());
        assert_eq!(sim.landmarks().len(), 24);
        assert_eq!(sim.chunks().len(), 9);
        assert_eq!(sim.terrain().indices.len(), 54);
        assert!(!sim.chunks().is_dirty());
        assert_eq!(sim.player_position(), Vec3::ZERO);
        assert_eq!(*sim.visuals(), RegionVisuals::for_state(RegionState::Stable));

        let world = sim.world();
        let body = world.renderables.get(world.player());
        assert_eq!(body.index_start, 36);
        assert_eq!(body.vertex_offset, 24);
    }

    #[test]
    fn test_landmarks_are_grounded_pillars() {
        let sim = Simulation::new(small_config());
        for &e in sim.landmarks() {
            let t = sim.world().transforms.get(e);
            assert!((t.position.y - t.scale.y / 2.0).abs() < 1e-6);
            assert!((-0.5..=2.5).contains(&t.scale.y));
            assert!(t.position.x != 0.0 || t.position.z != 0.0);
        }
    }

    #[test]
    fn test_tick_clamps_dt() {
        let mut sim = Simulation::new(small_config());
        let input = InputState::new();
        assert_eq!(sim.tick(&input, 5.0).dt, 0.1);
        assert_eq!(sim.tick(&input, -1.0).dt, 0.0);
        assert_eq!(sim.tick(&input, f32::NAN).dt, 0.0);
        assert!((sim.play_time() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_walking_streams_terrain() {
        let mut sim = Simulation::new(small_config());
        let input = InputState::holding(&[Key::Forward]);
        let mut rebuilt = 0;
        for _ in 0..120 {
            if sim.tick(&input, 1.0 / 60.0).terrain_rebuilt {
                rebuilt += 1;
            }
        }
        // ~20 units forward: crosses cells z = 1 and z = 2
        assert!(rebuilt >= 1);
        assert!(sim.player_position().z > 19.0);
        let cell = sim.chunks().cell_of(sim.player_position());
        assert!(sim.chunks().contains(cell));
        assert_eq!(sim.terrain().vertices.len(), sim.chunks().len() * 4);
    }

    #[test]
    fn test_visuals_ease_toward_target() {
        let mut sim = Simulation::new(small_config());
        let input = InputState::new();
        for _ in 0..40 {
            sim.tick(&input, 0.1);
        }
        // 4 s at the origin: Awakening
        assert_eq!(sim.regions().current_region_data().state, RegionState::Awakening);
        let target = sim.regions().current_visuals();
        let shown = sim.visuals().color_intensity;
        assert!(shown > 1.0);
        assert!(shown < target.color_intensity);
    }

    #[test]
    fn test_state_change_is_reported_on_its_tick() {
        let mut config = small_config();
        config.timing.status_interval = 100.0;
        let mut sim = Simulation::new(config);
        let input = InputState::new();

        let mut changed_at = None;
        for tick in 0..40 {
            if let Some(change) = sim.tick(&input, 0.1).region_change {
                assert_eq!(change.to, RegionState::Awakening);
                changed_at = Some(tick);
                break;
            }
        }
        // 0.1 pressure per second: threshold 0.3 lands on the 30th tick
        assert!(matches!(changed_at, Some(28..=30)), "changed at {changed_at:?}");
        assert_eq!(sim.last_logged_state, RegionState::Awakening);
    }

    #[test]
    fn test_capture_apply_round_trip() {
        let mut sim = Simulation::new(small_config());
        let input = InputState::holding(&[Key::Right]);
        for _ in 0..30 {
            sim.tick(&input, 0.1);
        }
        let saved = sim.capture_save();

        let mut fresh = Simulation::new(small_config());
        fresh.apply_save(&saved);

        assert_eq!(fresh.capture_save(), saved);
        assert_eq!(fresh.player_position(), sim.player_position());
        assert_eq!(fresh.regions().current_region(), sim.regions().current_region());
        assert_eq!(*fresh.visuals(), fresh.regions().current_visuals());
        assert!(fresh.chunks().contains(fresh.chunks().cell_of(fresh.player_position())));
    }
}
