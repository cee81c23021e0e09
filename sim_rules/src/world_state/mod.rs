//! World state management - the central structure holding all simulation data.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::entities::{Character, EntityId, Vector3};
use crate::mechanics::DamageRecord;

/// A planet with a spherical surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Planet {
    pub name: String,
    pub center: Vector3,
    /// Surface radius in metres.
    pub radius: f64,
}

impl Planet {
    pub fn new(name: impl Into<String>, center: Vector3, radius: f64) -> Self {
        Self {
            name: name.into(),
            center,
            radius,
        }
    }

    /// Distance from `position` to the planet surface in metres. Negative below ground.
    pub fn altitude(&self, position: &Vector3) -> f64 {
        position.distance(&self.center) - self.radius
    }
}

/// A named structure (ship, station, base) that characters can occupy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub id: EntityId,
    pub name: String,
}

impl Grid {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
        }
    }
}

/// The complete state of the simulation at any point in time.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WorldState {
    /// Current simulation tick.
    pub tick: u64,

    /// All characters in the world (players and NPCs).
    pub characters: HashMap<EntityId, Character>,

    pub planets: Vec<Planet>,

    pub grids: HashMap<EntityId, Grid>,

    /// Character -> grid currently occupied.
    pub occupancy: HashMap<EntityId, EntityId>,

    /// Victim -> damage taken, in insertion order.
    pub damage_log: HashMap<EntityId, Vec<DamageRecord>>,
}

impl WorldState {
    /// Create a new empty world state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a character to the world.
    pub fn add_character(&mut self, character: Character) -> EntityId {
        let id = character.id;
        self.characters.insert(id, character);
        id
    }

    /// Get character by ID.
    pub fn get_character(&self, id: EntityId) -> Option<&Character> {
        self.characters.get(&id)
    }

    pub fn add_planet(&mut self, planet: Planet) {
        self.planets.push(planet);
    }

    pub fn add_grid(&mut self, grid: Grid) -> EntityId {
        let id = grid.id;
        self.grids.insert(id, grid);
        id
    }

    /// Seat an entity inside a grid. Returns false if the grid is unknown.
    pub fn board_grid(&mut self, entity: EntityId, grid: EntityId) -> bool {
        if !self.grids.contains_key(&grid) {
            return false;
        }
        self.occupancy.insert(entity, grid);
        true
    }

    pub fn leave_grid(&mut self, entity: EntityId) {
        self.occupancy.remove(&entity);
    }

    /// The grid an entity currently occupies.
    pub fn grid_of(&self, entity: EntityId) -> Option<&Grid> {
        self.occupancy
            .get(&entity)
            .and_then(|grid_id| self.grids.get(grid_id))
    }

    /// Record damage against a victim. Records without a timestamp get the current tick.
    pub fn record_damage(&mut self, victim: EntityId, mut record: DamageRecord) {
        record.timestamp.get_or_insert(self.tick);
        if let Some(character) = self.characters.get_mut(&victim) {
            character.health.apply_damage(record.amount);
        }
        self.damage_log.entry(victim).or_default().push(record);
    }

    /// All damage recorded against a victim.
    pub fn damage_against(&self, victim: EntityId) -> &[DamageRecord] {
        self.damage_log
            .get(&victim)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// The planet whose surface is closest to `position`.
    pub fn nearest_planet(&self, position: &Vector3) -> Option<&Planet> {
        self.planets.iter().min_by(|a, b| {
            a.altitude(position)
                .partial_cmp(&b.altitude(position))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }

    /// Advance the simulation clock.
    pub fn advance_ticks(&mut self, ticks: u64) {
        self.tick += ticks;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mechanics::{latest_record, DamageKind};

    #[test]
    fn test_add_character() {
        let mut state = WorldState::new();
        let character = Character::new("Test Pilot");
        let id = character.id;

        state.add_character(character);

        assert!(state.get_character(id).is_some());
        assert_eq!(state.get_character(id).unwrap().name, "Test Pilot");
    }

    #[test]
    fn test_nearest_planet_uses_surface_distance() {
        let mut state = WorldState::new();
        // Big planet whose surface is closer than the small planet's centre.
        state.add_planet(Planet::new("Giant", Vector3::new(100_000.0, 0.0, 0.0), 90_000.0));
        state.add_planet(Planet::new("Moon", Vector3::new(-30_000.0, 0.0, 0.0), 1_000.0));

        let nearest = state.nearest_planet(&Vector3::ZERO).unwrap();
        assert_eq!(nearest.name, "Giant");
    }

    #[test]
    fn test_nearest_planet_empty() {
        let state = WorldState::new();
        assert!(state.nearest_planet(&Vector3::ZERO).is_none());
    }

    #[test]
    fn test_grid_occupancy() {
        let mut state = WorldState::new();
        let pilot = state.add_character(Character::new("Pilot"));
        let grid = state.add_grid(Grid::new("Red Ship"));

        assert!(state.grid_of(pilot).is_none());
        assert!(state.board_grid(pilot, grid));
        assert_eq!(state.grid_of(pilot).unwrap().name, "Red Ship");

        state.leave_grid(pilot);
        assert!(state.grid_of(pilot).is_none());

        assert!(!state.board_grid(pilot, EntityId::new()));
    }

    #[test]
    fn test_record_damage_stamps_tick_and_hurts() {
        let mut state = WorldState::new();
        let victim = state.add_character(Character::new("Victim"));
        state.advance_ticks(42);

        state.record_damage(victim, DamageRecord::new(DamageKind::Fall, 60.0));
        state.record_damage(victim, DamageRecord::new(DamageKind::Fall, 60.0).at(7));

        let log = state.damage_against(victim);
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].timestamp, Some(42));
        assert_eq!(log[1].timestamp, Some(7));
        assert!(!state.get_character(victim).unwrap().is_alive());
    }

    #[test]
    fn test_record_damage_keeps_explicit_tick_zero() {
        let mut state = WorldState::new();
        let victim = state.add_character(Character::new("Victim"));
        state.advance_ticks(5);

        state.record_damage(victim, DamageRecord::new(DamageKind::Fall, 1.0).at(0));
        state.record_damage(victim, DamageRecord::new(DamageKind::Asphyxia, 1.0).at(3));

        let log = state.damage_against(victim);
        assert_eq!(log[0].timestamp, Some(0));
        assert_eq!(
            latest_record(log).unwrap().damage_kind,
            DamageKind::Asphyxia
        );
    }

    #[test]
    fn test_planet_altitude() {
        let planet = Planet::new("Earth", Vector3::ZERO, 60_000.0);
        assert_eq!(planet.altitude(&Vector3::new(0.0, 61_000.0, 0.0)), 1_000.0);
        assert!(planet.altitude(&Vector3::new(0.0, 59_000.0, 0.0)) < 0.0);
    }
}
