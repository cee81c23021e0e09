//! Killer attribution: who or what caused a death, and with which weapon.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

use sim_rules::{
    latest_record, AttackerKind, DamageKind, DamageRecord, EntityId, EntityRef, OwnerKind,
    WorldState,
};

use crate::error::{Degradation, Outcome};

/// The attributed cause of a death.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DeathCause {
    #[default]
    Unknown,
    Player,
    Turret,
    NpcFaction,
    Collision,
    Fall,
    Oxygen,
    Pressure,
    Suicide,
    Environment,
}

impl DeathCause {
    pub const ALL: [DeathCause; 10] = [
        DeathCause::Unknown,
        DeathCause::Player,
        DeathCause::Turret,
        DeathCause::NpcFaction,
        DeathCause::Collision,
        DeathCause::Fall,
        DeathCause::Oxygen,
        DeathCause::Pressure,
        DeathCause::Suicide,
        DeathCause::Environment,
    ];
}

impl FromStr for DeathCause {
    type Err = String;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeathCause::ALL
            .into_iter()
            .find(|cause| format!("{:?}", cause).eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown death cause {:?}", s))
    }
}

/// Result of attributing a death. The default is "no signal".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AttributionResult {
    pub cause: DeathCause,
    /// Raw, unsanitized.
    pub killer_name: Option<String>,
    /// Raw, unsanitized.
    pub weapon_name: Option<String>,
    pub is_npc_faction: bool,
    pub npc_faction_tag: Option<String>,
}

impl AttributionResult {
    pub fn with_cause(cause: DeathCause) -> Self {
        Self {
            cause,
            ..Default::default()
        }
    }
}

/// Read-only access to recorded damage.
pub trait DamageHistory: Send + Sync {
    /// All damage recorded against `victim`, in any order.
    fn damage_events(&self, victim: EntityId) -> Vec<DamageRecord>;

    /// The latest damage event; equal timestamps go to the larger amount.
    fn last_damage_event(&self, victim: EntityId) -> Option<DamageRecord> {
        latest_record(&self.damage_events(victim)).cloned()
    }
}

impl DamageHistory for WorldState {
    fn damage_events(&self, victim: EntityId) -> Vec<DamageRecord> {
        self.damage_against(victim).to_vec()
    }
}

/// Determines cause, killer and weapon from the last damage against a victim.
pub struct AttributionResolver {
    history: Arc<dyn DamageHistory>,
}

impl AttributionResolver {
    pub fn new(history: Arc<dyn DamageHistory>) -> Self {
        Self { history }
    }

    /// Attribute the death of `victim`. Never fails; no signal means `Unknown`.
    pub fn resolve(&self, victim: Option<&dyn EntityRef>) -> Outcome<AttributionResult> {
        let Some(victim) = victim else {
            log::debug!("no victim reference, attribution skipped");
            return Outcome::degraded(
                AttributionResult::default(),
                Degradation::VictimUnavailable,
            );
        };

        let victim_id = victim.entity_id();
        match self.history.last_damage_event(victim_id) {
            Some(record) => {
                let result = attribute(victim_id, &record);
                log::debug!(
                    "attributed death of {} to {:?} (killer {:?})",
                    victim_id,
                    result.cause,
                    result.killer_name
                );
                Outcome::ok(result)
            }
            None => {
                log::debug!("no damage recorded against {}", victim_id);
                Outcome::degraded(
                    AttributionResult::default(),
                    Degradation::AttributionUnavailable,
                )
            }
        }
    }
}

/// Classify a single damage record against the victim it hit.
pub fn attribute(victim: EntityId, record: &DamageRecord) -> AttributionResult {
    if record.attacker_id == Some(victim) {
        return AttributionResult::with_cause(DeathCause::Suicide);
    }

    let environmental = match record.damage_kind {
        DamageKind::Fall => Some(DeathCause::Fall),
        DamageKind::Asphyxia => Some(DeathCause::Oxygen),
        DamageKind::Decompression => Some(DeathCause::Pressure),
        _ => None,
    };
    if let Some(cause) = environmental {
        return AttributionResult::with_cause(cause);
    }

    if record.damage_kind == DamageKind::Collision
        || matches!(record.attacker_kind, AttackerKind::Grid | AttackerKind::Voxel)
    {
        return AttributionResult {
            cause: DeathCause::Collision,
            killer_name: record.attacker_name.clone(),
            ..Default::default()
        };
    }

    let npc_owner = record
        .owner
        .as_ref()
        .filter(|owner| owner.kind == OwnerKind::NpcFaction);

    match record.attacker_kind {
        AttackerKind::Character | AttackerKind::WeaponPlatform if npc_owner.is_some() => {
            let owner = npc_owner.cloned();
            AttributionResult {
                cause: DeathCause::NpcFaction,
                killer_name: record
                    .attacker_name
                    .clone()
                    .or_else(|| owner.as_ref().map(|o| o.name.clone())),
                weapon_name: record.weapon_name.clone().or_else(|| {
                    (record.attacker_kind == AttackerKind::WeaponPlatform)
                        .then(|| record.attacker_name.clone())
                        .flatten()
                }),
                is_npc_faction: true,
                npc_faction_tag: owner.and_then(|o| o.faction_tag),
            }
        }
        AttackerKind::Character => AttributionResult {
            cause: DeathCause::Player,
            killer_name: record.attacker_name.clone(),
            weapon_name: record.weapon_name.clone(),
            ..Default::default()
        },
        AttackerKind::WeaponPlatform => AttributionResult {
            cause: DeathCause::Turret,
            // A player's turret is credited to the player.
            killer_name: record
                .owner
                .as_ref()
                .map(|o| o.name.clone())
                .or_else(|| record.attacker_name.clone()),
            weapon_name: record
                .weapon_name
                .clone()
                .or_else(|| record.attacker_name.clone()),
            ..Default::default()
        },
        _ if !record.has_attacker() && record.amount > 0.0 => {
            AttributionResult::with_cause(DeathCause::Environment)
        }
        _ => AttributionResult::default(),
    }
}
