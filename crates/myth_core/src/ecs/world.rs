//! # ECS World
//!
//! The central container for all entities and components.

use myth_shared::Vec3;
use tracing::debug;

use super::component::{
    CameraController, CameraTag, LandmarkTag, MeshId, PlayerController, PlayerTag, Renderable,
    Transform, Velocity,
};
use super::entity::{EntityId, EntityTable};
use super::storage::{ComponentArray, ComponentStore};
use crate::error::EcsError;

/// Number of component arrays owned by the world.
const STORE_COUNT: usize = 8;

/// The ECS World - container for all simulation state.
///
/// Component arrays are public so systems can borrow several of them at
/// once. Entity lifetime goes through [`World::create_entity`] and
/// [`World::destroy`], which keep the arrays consistent with the table.
///
/// # Example
///
/// ```rust,ignore
/// let mut world = World::new();
/// let player = world.create_player(Vec3::ZERO);
/// world.velocities.get_mut(player).linear.x = 1.0;
/// world.destroy(player)?;
/// ```
#[derive(Debug, Default)]
pub struct World {
    /// Entity registry.
    pub entities: EntityTable,

    // =========================================================================
    // Component arrays - add new component types here AND in `stores_mut`
    // =========================================================================
    /// Transform components.
    pub transforms: ComponentArray<Transform>,
    /// Velocity components.
    pub velocities: ComponentArray<Velocity>,
    /// Renderable components.
    pub renderables: ComponentArray<Renderable>,
    /// Player controllers.
    pub player_controllers: ComponentArray<PlayerController>,
    /// Camera controllers.
    pub camera_controllers: ComponentArray<CameraController>,
    /// Player tags.
    pub player_tags: ComponentArray<PlayerTag>,
    /// Camera tags.
    pub camera_tags: ComponentArray<CameraTag>,
    /// Landmark tags.
    pub landmark_tags: ComponentArray<LandmarkTag>,

    player: EntityId,
    camera: EntityId,
}

impl World {
    /// Creates an empty world.
    #[must_use]
    pub fn new() -> Self {
        Self {
            player: EntityId::NULL,
            camera: EntityId::NULL,
            ..Self::default()
        }
    }

    /// Every component array, type-erased.
    pub fn stores_mut(&mut self) -> [&mut dyn ComponentStore; STORE_COUNT] {
        [
            &mut self.transforms,
            &mut self.velocities,
            &mut self.renderables,
            &mut self.player_controllers,
            &mut self.camera_controllers,
            &mut self.player_tags,
            &mut self.camera_tags,
            &mut self.landmark_tags,
        ]
    }

    /// Every component array, type-erased and read-only.
    #[must_use]
    pub fn stores(&self) -> [&dyn ComponentStore; STORE_COUNT] {
        [
            &self.transforms,
            &self.velocities,
            &self.renderables,
            &self.player_controllers,
            &self.camera_controllers,
            &self.player_tags,
            &self.camera_tags,
            &self.landmark_tags,
        ]
    }

    /// Creates an entity carrying only `transform`.
    pub fn create_entity(&mut self, transform: Transform) -> EntityId {
        let e = self.entities.create();
        self.transforms.add(e, transform);
        e
    }

    /// Creates the player: transform, velocity, controller, tag and body mesh.
    ///
    /// The new entity becomes [`World::player`].
    pub fn create_player(&mut self, position: Vec3) -> EntityId {
        let e = self.create_entity(Transform::from_position(position));
        self.velocities.add(e, Velocity::default());
        self.player_controllers.add(e, PlayerController::default());
        self.player_tags.add(e, PlayerTag);
        self.renderables.add(e, Renderable::for_mesh(MeshId::Player));
        self.player = e;
        e
    }

    /// Creates a follow camera orbiting `target`.
    ///
    /// Cameras carry no transform; their eye position lives in the controller.
    /// The new entity becomes [`World::camera`].
    pub fn create_camera(&mut self, target: EntityId) -> EntityId {
        let e = self.entities.create();
        self.camera_controllers.add(
            e,
            CameraController {
                target,
                ..CameraController::default()
            },
        );
        self.camera_tags.add(e, CameraTag);
        self.camera = e;
        e
    }

    /// Creates a static cube landmark yawed by `yaw_degrees`.
    pub fn create_landmark(&mut self, position: Vec3, scale: Vec3, yaw_degrees: f32) -> EntityId {
        let e = self.create_entity(Transform {
            position,
            rotation: Vec3::new(0.0, yaw_degrees, 0.0),
            scale,
        });
        self.landmark_tags.add(e, LandmarkTag);
        self.renderables.add(e, Renderable::for_mesh(MeshId::Cube));
        e
    }

    /// Destroys `e`, removing it from every component array first.
    ///
    /// Clears the player/camera shortcut if it pointed at `e`.
    ///
    /// # Errors
    ///
    /// [`EcsError::NullEntity`] or [`EcsError::Expired`] if `e` is not alive;
    /// nothing is touched in that case.
    pub fn destroy(&mut self, e: EntityId) -> Result<(), EcsError> {
        if e.is_null() {
            return Err(EcsError::NullEntity);
        }
        if !self.entities.is_alive(e) {
            return Err(EcsError::Expired(e));
        }

        let removed = self
            .stores_mut()
            .into_iter()
            .map(|store| store.remove_entity(e))
            .filter(|&removed| removed)
            .count();
        self.entities.destroy(e)?;

        if e == self.player {
            self.player = EntityId::NULL;
        }
        if e == self.camera {
            self.camera = EntityId::NULL;
        }

        debug!(entity = ?e, components = removed, "Entity destroyed");
        Ok(())
    }

    /// Checks if an entity is alive.
    #[inline]
    #[must_use]
    pub fn is_alive(&self, e: EntityId) -> bool {
        self.entities.is_alive(e)
    }

    /// Transform of a live entity.
    ///
    /// # Errors
    ///
    /// [`EcsError::Expired`] for a dead handle, [`EcsError::MissingComponent`]
    /// when the entity has no transform (cameras, for instance).
    pub fn transform(&self, e: EntityId) -> Result<&Transform, EcsError> {
        if e.is_null() {
            return Err(EcsError::NullEntity);
        }
        if !self.entities.is_alive(e) {
            return Err(EcsError::Expired(e));
        }
        self.transforms
            .try_get(e)
            .ok_or(EcsError::MissingComponent {
                entity: e,
                component: self.transforms.component_name(),
            })
    }

    /// The player entity, or `NULL`.
    #[inline]
    #[must_use]
    pub const fn player(&self) -> EntityId {
        self.player
    }

    /// The camera entity, or `NULL`.
    #[inline]
    #[must_use]
    pub const fn camera(&self) -> EntityId {
        self.camera
    }
}
