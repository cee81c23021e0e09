//! Character definitions.

use serde::{Deserialize, Serialize};

use super::{EntityId, EntityRef, HealthComponent, Vector3};

/// A character (player or NPC) in the simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub id: EntityId,
    /// Display name as reported by the engine, not sanitized.
    pub name: String,
    pub faction_tag: Option<String>,
    pub is_npc: bool,
    pub position: Option<Vector3>,
    pub health: HealthComponent,
}

impl Character {
    /// Create a new player character with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            faction_tag: None,
            is_npc: false,
            position: None,
            health: HealthComponent::default(),
        }
    }

    /// Create a new NPC character.
    pub fn npc(name: impl Into<String>, faction_tag: impl Into<String>) -> Self {
        Self {
            is_npc: true,
            ..Self::new(name).with_faction_tag(faction_tag)
        }
    }

    pub fn with_faction_tag(mut self, tag: impl Into<String>) -> Self {
        self.faction_tag = Some(tag.into());
        self
    }

    pub fn with_position(mut self, position: Vector3) -> Self {
        self.position = Some(position);
        self
    }

    /// Check if the character is alive.
    pub fn is_alive(&self) -> bool {
        self.health.current > 0.0
    }
}

impl EntityRef for Character {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_character() {
        let character = Character::new("Test Pilot");
        assert_eq!(character.name, "Test Pilot");
        assert!(character.is_alive());
        assert!(!character.is_npc);
        assert!(character.faction_tag.is_none());
    }

    #[test]
    fn test_character_death() {
        let mut character = Character::new("Doomed");
        character.health.apply_damage(1000.0);
        assert!(!character.is_alive());
    }

    #[test]
    fn test_npc_character() {
        let npc = Character::npc("Drone Pilot", "RAID");
        assert!(npc.is_npc);
        assert_eq!(npc.owner_faction_tag(), Some("RAID"));
    }
}
