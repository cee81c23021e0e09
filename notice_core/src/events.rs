//! Death events coming in and notifications going out.

use serde::{Deserialize, Serialize};

use sim_rules::{EntityRef, EntitySnapshot};

use crate::death_type::DeathCategory;

/// A character death as reported by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeathEvent {
    /// Display name as reported by the engine, not sanitized.
    pub victim_name: String,
    /// Missing when the engine no longer has the entity.
    pub victim: Option<EntitySnapshot>,
}

impl DeathEvent {
    pub fn new(victim_name: impl Into<String>, victim: Option<EntitySnapshot>) -> Self {
        Self {
            victim_name: victim_name.into(),
            victim,
        }
    }

    /// Event for a live entity handle.
    pub fn for_entity(victim_name: impl Into<String>, victim: &dyn EntityRef) -> Self {
        Self::new(victim_name, Some(EntitySnapshot::of(victim)))
    }
}

/// The text produced for one death, per channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedNotification {
    pub local_text: String,
    /// Undecorated; the dispatcher adds the glyph. The pipeline sets it to
    /// `local_text`.
    pub external_text: String,
    pub category: DeathCategory,
}

/// What gets handed to an [`EventLog`] after dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub victim: String,
    pub category: DeathCategory,
    pub text: String,
}

impl NotificationRecord {
    /// One JSON object, no trailing newline.
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Optional history of sent notifications. Storage is up to the host.
pub trait EventLog: Send + Sync {
    fn record(&self, record: &NotificationRecord) -> Result<(), String>;
}
