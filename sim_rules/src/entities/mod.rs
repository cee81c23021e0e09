//! Entity definitions for the simulation.

mod character;
mod components;

pub use character::*;
pub use components::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for all entities in the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    /// Create a new random entity ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an entity ID from a specific UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Create a nil/empty entity ID (useful for defaults).
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The minimal view of a simulation entity that downstream crates may depend on.
///
/// Engine handles are dynamic and short-lived; consumers only ever see the id,
/// the position at the time of the query and the owning faction tag.
pub trait EntityRef {
    fn entity_id(&self) -> EntityId;

    /// World position in metres, if the entity still has one.
    fn position(&self) -> Option<Vector3>;

    fn owner_faction_tag(&self) -> Option<&str>;
}

/// An owned, serializable copy of an [`EntityRef`] taken at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub position: Option<Vector3>,
    pub faction_tag: Option<String>,
}

impl EntitySnapshot {
    /// Snapshot an entity reference.
    pub fn of(entity: &dyn EntityRef) -> Self {
        Self {
            id: entity.entity_id(),
            position: entity.position(),
            faction_tag: entity.owner_faction_tag().map(str::to_string),
        }
    }

    /// Create a snapshot with only an id.
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            position: None,
            faction_tag: None,
        }
    }

    /// Set the position.
    pub fn with_position(mut self, position: Vector3) -> Self {
        self.position = Some(position);
        self
    }

    /// Set the owning faction tag.
    pub fn with_faction_tag(mut self, tag: impl Into<String>) -> Self {
        self.faction_tag = Some(tag.into());
        self
    }
}

impl EntityRef for EntitySnapshot {
    fn entity_id(&self) -> EntityId {
        self.id
    }

    fn position(&self) -> Option<Vector3> {
        self.position
    }

    fn owner_faction_tag(&self) -> Option<&str> {
        self.faction_tag.as_deref()
    }
}
