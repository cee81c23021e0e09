//! # Notice Core
//!
//! Turns character deaths into kill-feed notifications. This crate reads damage
//! and world data through `sim_rules`, works out who killed whom and where, and
//! sends one message to the in-game chat and one to an external platform.
//!
//! ## Core Components
//!
//! - **sanitizer**: Name cleaning and per-channel text rules
//! - **attribution**: Cause, killer and weapon from the last damage event
//! - **location**: Zone classification relative to the nearest planet
//! - **death_type**: Cause to notification category
//! - **templates**: Template store, selection and rendering
//! - **dispatch**: Local broadcast plus fire-and-forget external send
//! - **pipeline**: The per-event `DeathNotifier`
//!
//! ## Failure Handling
//!
//! - **Never throws**: Every stage returns a value, degraded results carry a diagnostic
//! - **Independent sinks**: A failing local send never blocks the external one, and vice versa
//! - **Last resort**: A panicking collaborator still yields `"<victim> died"` locally

pub mod attribution;
pub mod config;
pub mod death_type;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod location;
pub mod pipeline;
pub mod sanitizer;
pub mod templates;

#[cfg(test)]
mod test_support;

pub use attribution::*;
pub use config::*;
pub use death_type::*;
pub use dispatch::*;
pub use error::*;
pub use events::*;
pub use location::*;
pub use pipeline::*;
pub use sanitizer::*;
pub use templates::*;
