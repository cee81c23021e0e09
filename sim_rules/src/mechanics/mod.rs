//! Damage mechanics: what hurt an entity, who was behind it and when.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::entities::{EntityId, Owner};

/// What kind of damage was dealt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DamageKind {
    /// Bullets, missiles, explosions, tools.
    Weapon,
    /// Impact with a grid or voxel terrain.
    Collision,
    Fall,
    /// Ran out of oxygen.
    Asphyxia,
    /// Hull breach or pressure loss.
    Decompression,
    /// Radiation, temperature, hazards without an attacker.
    Environment,
    #[default]
    Unknown,
}

/// What kind of entity dealt the damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AttackerKind {
    #[default]
    None,
    Character,
    WeaponPlatform,
    Grid,
    Voxel,
}

/// A single damage event recorded against a victim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DamageRecord {
    pub attacker_id: Option<EntityId>,
    pub attacker_kind: AttackerKind,
    /// Character, turret or grid display name, not sanitized.
    pub attacker_name: Option<String>,
    pub owner: Option<Owner>,
    pub damage_kind: DamageKind,
    pub weapon_name: Option<String>,
    /// Simulation tick. `None` until the world stamps it on record.
    pub timestamp: Option<u64>,
    pub amount: f32,
}

impl DamageRecord {
    /// Create a record with no attacker.
    pub fn new(damage_kind: DamageKind, amount: f32) -> Self {
        Self {
            damage_kind,
            amount,
            ..Default::default()
        }
    }

    /// Damage dealt by a character.
    pub fn by_character(attacker: EntityId, name: impl Into<String>, amount: f32) -> Self {
        Self {
            attacker_id: Some(attacker),
            attacker_kind: AttackerKind::Character,
            attacker_name: Some(name.into()),
            damage_kind: DamageKind::Weapon,
            amount,
            ..Default::default()
        }
    }

    /// Damage dealt by a turret or other weapon platform.
    pub fn by_weapon_platform(
        attacker: EntityId,
        name: impl Into<String>,
        owner: Option<Owner>,
        amount: f32,
    ) -> Self {
        Self {
            attacker_id: Some(attacker),
            attacker_kind: AttackerKind::WeaponPlatform,
            attacker_name: Some(name.into()),
            owner,
            damage_kind: DamageKind::Weapon,
            amount,
            ..Default::default()
        }
    }

    pub fn with_owner(mut self, owner: Owner) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn with_weapon(mut self, weapon: impl Into<String>) -> Self {
        self.weapon_name = Some(weapon.into());
        self
    }

    pub fn with_attacker_kind(mut self, kind: AttackerKind) -> Self {
        self.attacker_kind = kind;
        self
    }

    pub fn with_attacker(mut self, id: EntityId, name: impl Into<String>) -> Self {
        self.attacker_id = Some(id);
        self.attacker_name = Some(name.into());
        self
    }

    pub fn at(mut self, timestamp: u64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// True if some entity is recorded as the source of this damage. Self-inflicted
    /// damage counts.
    pub fn has_attacker(&self) -> bool {
        self.attacker_id.is_some() || self.attacker_kind != AttackerKind::None
    }
}

/// Pick the most recent record. Equal timestamps go to the larger amount.
pub fn latest_record<'a, I>(records: I) -> Option<&'a DamageRecord>
where
    I: IntoIterator<Item = &'a DamageRecord>,
{
    records.into_iter().max_by(|a, b| {
        a.timestamp.cmp(&b.timestamp).then_with(|| {
            a.amount
                .partial_cmp(&b.amount)
                .unwrap_or(Ordering::Equal)
        })
    })
}
