//! Message templates - selection and placeholder substitution.
//!
//! Selection falls back in two steps when a category has nothing configured:
//! first to the `Accident` templates, then to the literal `"{victim} died"`.

mod store;

pub use store::*;

use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;

use crate::attribution::AttributionResult;
use crate::death_type::DeathCategory;
use crate::error::{Degradation, Outcome};
use crate::sanitizer::{sanitize_killer_name, UNKNOWN_KILLER};

/// Used when no category, not even `Accident`, has templates.
pub const LITERAL_TEMPLATE: &str = "{victim} died";

pub struct MessageTemplateEngine {
    store: Arc<TemplateStore>,
}

impl MessageTemplateEngine {
    pub fn new(store: Arc<TemplateStore>) -> Self {
        Self { store }
    }

    /// Create an engine over the built-in templates.
    pub fn with_defaults() -> Self {
        Self::new(Arc::new(TemplateStore::builtin()))
    }

    /// Pick one template for `category` uniformly at random.
    pub fn select_template<R: Rng + ?Sized>(
        &self,
        category: DeathCategory,
        rng: &mut R,
    ) -> Outcome<String> {
        if let Some(template) = self.store.get(category).choose(rng) {
            return Outcome::ok(template.clone());
        }

        if let Some(template) = self.store.get(DeathCategory::Accident).choose(rng) {
            log::debug!("no templates for {}, using Accident", category);
            return Outcome::degraded(template.clone(), Degradation::TemplateMissing(category));
        }

        log::warn!("no templates configured for {} or Accident", category);
        Outcome::degraded(LITERAL_TEMPLATE.to_string(), Degradation::LiteralTemplate)
    }

    /// Substitute placeholders and append the location suffix.
    pub fn render(
        &self,
        template: &str,
        victim: &str,
        killer: &str,
        weapon: &str,
        location_text: &str,
    ) -> String {
        render(template, victim, killer, weapon, location_text)
    }
}

/// Replace `{0}`/`{killer}`, `{1}`/`{victim}` and `{2}`/`{weapon}`.
///
/// Substitution is a single pass, so a name containing `{victim}` is not expanded
/// again. Any other `{...}` is copied verbatim. A non-empty `location_text` is
/// appended after one space.
pub fn render(
    template: &str,
    victim: &str,
    killer: &str,
    weapon: &str,
    location_text: &str,
) -> String {
    let mut out = String::with_capacity(template.len() + victim.len() + killer.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];

        let replacement = tail.find('}').and_then(|close| {
            let value = match &tail[1..close] {
                "0" | "killer" => killer,
                "1" | "victim" => victim,
                "2" | "weapon" => weapon,
                _ => return None,
            };
            Some((value, close))
        });

        match replacement {
            Some((value, close)) => {
                out.push_str(value);
                rest = &tail[close + 1..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);

    if !location_text.is_empty() {
        out.push(' ');
        out.push_str(location_text);
    }
    out
}

/// Name to show for the killer: the NPC faction tag, else the sanitized killer
/// name, else `"Unknown"`.
pub fn killer_display_name(attribution: &AttributionResult) -> String {
    if attribution.is_npc_faction {
        if let Some(tag) = attribution
            .npc_faction_tag
            .as_deref()
            .filter(|t| !t.trim().is_empty())
        {
            return tag.to_string();
        }
    }
    attribution
        .killer_name
        .as_deref()
        .map(sanitize_killer_name)
        .unwrap_or_else(|| UNKNOWN_KILLER.to_string())
}

/// Name to show for the weapon: sanitized, else `"Unknown"`.
pub fn weapon_display_name(attribution: &AttributionResult) -> String {
    attribution
        .weapon_name
        .as_deref()
        .map(sanitize_killer_name)
        .unwrap_or_else(|| UNKNOWN_KILLER.to_string())
}
