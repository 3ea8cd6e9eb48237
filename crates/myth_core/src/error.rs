//! Entity store errors.

use thiserror::Error;

use crate::ecs::EntityId;

/// Errors returned by the entity table and the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EcsError {
    /// The `NULL` handle was passed where a live entity was required.
    #[error("null entity handle")]
    NullEntity,
    /// The handle's generation no longer matches its slot (destroyed or never issued).
    #[error("entity {0:?} is no longer alive")]
    Expired(EntityId),
    /// The entity is alive but lacks a required component.
    #[error("entity {entity:?} has no {component} component")]
    MissingComponent {
        /// Entity that was queried.
        entity: EntityId,
        /// Component type name.
        component: &'static str,
    },
}
