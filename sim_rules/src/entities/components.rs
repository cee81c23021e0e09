//! Component definitions for entities.

use serde::{Deserialize, Serialize};

/// A point or direction in world space, in metres.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Distance from the world origin.
    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Distance between two points.
    pub fn distance(&self, other: &Vector3) -> f64 {
        Vector3::new(self.x - other.x, self.y - other.y, self.z - other.z).length()
    }

    /// False if any coordinate is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Health component for characters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HealthComponent {
    pub current: f32,
    pub max: f32,
}

impl Default for HealthComponent {
    fn default() -> Self {
        Self {
            current: 100.0,
            max: 100.0,
        }
    }
}

impl HealthComponent {
    /// Apply damage, never going below zero. Returns the damage actually taken.
    pub fn apply_damage(&mut self, amount: f32) -> f32 {
        let taken = amount.max(0.0).min(self.current);
        self.current -= taken;
        taken
    }
}

/// Who controls an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OwnerKind {
    Player,
    NpcFaction,
}

/// Ownership of an attacking entity (turret, grid or character).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub kind: OwnerKind,
    /// Player display name or NPC faction name.
    pub name: String,
    pub faction_tag: Option<String>,
}

impl Owner {
    pub fn player(name: impl Into<String>) -> Self {
        Self {
            kind: OwnerKind::Player,
            name: name.into(),
            faction_tag: None,
        }
    }

    pub fn npc_faction(name: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            kind: OwnerKind::NpcFaction,
            name: name.into(),
            faction_tag: Some(tag.into()),
        }
    }

    pub fn is_npc(&self) -> bool {
        self.kind == OwnerKind::NpcFaction
    }
}
