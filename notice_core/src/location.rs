//! Coarse spatial classification of where a death happened.
//!
//! Near a planet the zone comes from the ratio of distance-to-centre over the planet
//! radius; away from planets it comes from the distance to the world origin. Each
//! band includes its upper bound, so a ratio of exactly 1.15 is still on the surface.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use sim_rules::{EntityId, Vector3, WorldState};

use crate::error::{Degradation, Outcome};

/// Ratio bands around a planet.
pub const SURFACE_RATIO: f64 = 1.15;
pub const LOW_ORBIT_RATIO: f64 = 1.5;
/// Edge of a planet's influence sphere.
pub const HIGH_ORBIT_RATIO: f64 = 3.0;

/// Distance bands from the origin, in km.
pub const INNER_SYSTEM_KM: f64 = 5_000.0;
pub const OUTER_SPACE_KM: f64 = 10_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Zone {
    OnSurface,
    LowOrbit,
    HighOrbit,
    InnerSystem,
    OuterSpace,
    DeepSpace,
    #[default]
    Unknown,
}

/// Planet data as seen by the classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanetInfo {
    pub name: String,
    /// Metres.
    pub radius: f64,
    pub center: Vector3,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridInfo {
    pub name: String,
}

/// Read-only world queries needed for zone classification.
pub trait WorldQuery: Send + Sync {
    fn nearest_planet(&self, position: &Vector3) -> Option<PlanetInfo>;

    fn grid_occupancy(&self, entity: EntityId) -> Option<GridInfo>;
}

impl WorldQuery for WorldState {
    fn nearest_planet(&self, position: &Vector3) -> Option<PlanetInfo> {
        WorldState::nearest_planet(self, position).map(|planet| PlanetInfo {
            name: planet.name.clone(),
            radius: planet.radius,
            center: planet.center,
        })
    }

    fn grid_occupancy(&self, entity: EntityId) -> Option<GridInfo> {
        self.grid_of(entity).map(|grid| GridInfo {
            name: grid.name.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LocationZoneResult {
    pub zone: Zone,
    /// Empty when no planet is involved.
    pub planet_name: String,
    pub distance_from_origin: f64,
    /// Altitude above the planet surface, clamped at zero.
    pub distance_to_planet: f64,
    pub is_on_surface: bool,
    pub grid_name: Option<String>,
    pub is_inside_grid: bool,
}

impl LocationZoneResult {
    /// Location suffix for a death message, e.g. `(in low orbit around Earth)`.
    /// Empty when there is nothing to say.
    pub fn describe(&self, show_grid_name: bool) -> String {
        let place = match self.zone {
            Zone::OnSurface => Some(format!("on the surface of {}", self.planet_name)),
            Zone::LowOrbit => Some(format!("in low orbit around {}", self.planet_name)),
            Zone::HighOrbit => Some(format!("in high orbit above {}", self.planet_name)),
            Zone::InnerSystem => Some("in the inner system".to_string()),
            Zone::OuterSpace => Some("in outer space".to_string()),
            Zone::DeepSpace => Some("in deep space".to_string()),
            Zone::Unknown => None,
        };
        let grid = self
            .grid_name
            .as_ref()
            .filter(|_| show_grid_name && self.is_inside_grid)
            .map(|name| format!("aboard {}", name));

        match (grid, place) {
            (Some(grid), Some(place)) => format!("({}, {})", grid, place),
            (Some(grid), None) => format!("({})", grid),
            (None, Some(place)) => format!("({})", place),
            (None, None) => String::new(),
        }
    }
}

/// Zone for a position near a planet, or `None` outside its influence sphere.
pub fn zone_for_ratio(ratio: f64) -> Option<Zone> {
    if ratio <= SURFACE_RATIO {
        Some(Zone::OnSurface)
    } else if ratio <= LOW_ORBIT_RATIO {
        Some(Zone::LowOrbit)
    } else if ratio <= HIGH_ORBIT_RATIO {
        Some(Zone::HighOrbit)
    } else {
        None
    }
}

/// Zone for a position away from planets.
pub fn zone_for_distance(distance_km: f64) -> Zone {
    if distance_km < INNER_SYSTEM_KM {
        Zone::InnerSystem
    } else if distance_km < OUTER_SPACE_KM {
        Zone::OuterSpace
    } else {
        Zone::DeepSpace
    }
}

pub struct LocationZoneClassifier {
    world: Arc<dyn WorldQuery>,
}

impl LocationZoneClassifier {
    pub fn new(world: Arc<dyn WorldQuery>) -> Self {
        Self { world }
    }

    /// Classify a death position. Never fails; no position means `Unknown`.
    ///
    /// Grid occupancy is looked up for `entity` whether or not a position is known.
    pub fn classify(
        &self,
        position: Option<Vector3>,
        entity: Option<EntityId>,
    ) -> Outcome<LocationZoneResult> {
        let grid = entity.and_then(|id| self.world.grid_occupancy(id));
        let mut result = LocationZoneResult {
            is_inside_grid: grid.is_some(),
            grid_name: grid.map(|g| g.name),
            ..Default::default()
        };

        let Some(position) = position.filter(Vector3::is_finite) else {
            log::debug!("no usable position, zone unknown");
            return Outcome::degraded(result, Degradation::LocationUndeterminable);
        };

        result.distance_from_origin = position.length() / 1000.0;

        let planet_zone = self.world.nearest_planet(&position).and_then(|planet| {
            if planet.radius <= 0.0 {
                return None;
            }
            let to_center = position.distance(&planet.center);
            zone_for_ratio(to_center / planet.radius).map(|zone| (zone, planet, to_center))
        });

        match planet_zone {
            Some((zone, planet, to_center)) => {
                result.zone = zone;
                result.is_on_surface = zone == Zone::OnSurface;
                result.distance_to_planet = ((to_center - planet.radius) / 1000.0).max(0.0);
                result.planet_name = planet.name;
            }
            None => result.zone = zone_for_distance(result.distance_from_origin),
        }

        log::debug!(
            "classified position {:?} as {:?} {}",
            position,
            result.zone,
            result.planet_name
        );
        Outcome::ok(result)
    }
}
