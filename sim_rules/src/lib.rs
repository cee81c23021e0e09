//! # Sim Rules
//!
//! World data for Killfeed - entities, ownership, damage records, planets and grids.
//! This crate is the single source of truth for simulation state and does not contain
//! any notification logic.

pub mod entities;
pub mod mechanics;
pub mod world_state;

pub use entities::*;
pub use mechanics::*;
pub use world_state::*;
