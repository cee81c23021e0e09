//! Template store - phrasing templates per death category.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::death_type::DeathCategory;
use crate::error::NoticeError;

/// Read-only mapping from category to its phrasing templates.
///
/// Templates use positional tokens `{0}` (killer), `{1}` (victim), `{2}` (weapon)
/// or the named tokens `{killer}`, `{victim}`, `{weapon}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, Vec<String>>",
    into = "BTreeMap<String, Vec<String>>"
)]
pub struct TemplateStore {
    templates: BTreeMap<DeathCategory, Vec<String>>,
}

impl TryFrom<BTreeMap<String, Vec<String>>> for TemplateStore {
    type Error = String;

    fn try_from(raw: BTreeMap<String, Vec<String>>) -> Result<Self, Self::Error> {
        let mut templates = BTreeMap::new();
        for (key, list) in raw {
            let category = DeathCategory::from_key(&key)
                .ok_or_else(|| format!("unknown death category {:?}", key))?;
            templates.insert(category, list);
        }
        Ok(Self { templates })
    }
}

impl From<TemplateStore> for BTreeMap<String, Vec<String>> {
    fn from(store: TemplateStore) -> Self {
        store
            .templates
            .into_iter()
            .map(|(category, list)| (category.as_str().to_string(), list))
            .collect()
    }
}

impl Default for TemplateStore {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TemplateStore {
    /// A store with no templates at all.
    pub fn empty() -> Self {
        Self {
            templates: BTreeMap::new(),
        }
    }

    /// The templates shipped with the notifier.
    pub fn builtin() -> Self {
        let mut store = Self::empty();
        store.set(
            DeathCategory::PvP,
            [
                "{killer} destroyed {victim} with {weapon}",
                "{victim} was killed by {killer} using {weapon}",
                "{killer} took {victim} out with a {weapon}",
            ],
        );
        store.set(
            DeathCategory::Turret,
            [
                "{victim} was shredded by {killer}'s {weapon}",
                "{victim} wandered into {killer}'s line of fire",
            ],
        );
        store.set(
            DeathCategory::Grid,
            [
                "{victim} was flattened by {killer}",
                "{victim} lost an argument with {killer}",
            ],
        );
        store.set(
            DeathCategory::EnvironmentOxygen,
            [
                "{victim} forgot to breathe",
                "{victim} ran out of oxygen",
            ],
        );
        store.set(
            DeathCategory::EnvironmentPressure,
            [
                "{victim} was decompressed",
                "{victim} found out what a hull breach feels like",
            ],
        );
        store.set(
            DeathCategory::EnvironmentCollision,
            [
                "{victim} hit the ground too hard",
                "{victim} was killed by the environment",
            ],
        );
        store.set(
            DeathCategory::Suicide,
            ["{victim} took the easy way out", "{victim} self-destructed"],
        );
        store.set(
            DeathCategory::Accident,
            ["{victim} died", "{victim} met an unfortunate end"],
        );
        store
    }

    /// Replace the templates for a category.
    pub fn set<I, S>(&mut self, category: DeathCategory, templates: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.templates
            .insert(category, templates.into_iter().map(Into::into).collect());
    }

    /// Overlay `other` on top of this store; categories in `other` win.
    pub fn merged_with(mut self, other: TemplateStore) -> Self {
        self.templates.extend(other.templates);
        self
    }

    /// Templates for a category; empty if none are configured.
    pub fn get(&self, category: DeathCategory) -> &[String] {
        self.templates
            .get(&category)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Reject blank templates.
    pub fn validate(&self) -> Result<(), NoticeError> {
        for (category, templates) in &self.templates {
            if templates.iter().any(|t| t.trim().is_empty()) {
                return Err(NoticeError::InvalidConfig(format!(
                    "blank template for {}",
                    category
                )));
            }
        }
        Ok(())
    }

    /// Number of categories that have at least one template.
    pub fn category_count(&self) -> usize {
        self.templates.values().filter(|v| !v.is_empty()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_covers_all_categories() {
        let store = TemplateStore::builtin();
        for category in DeathCategory::ALL {
            assert!(!store.get(category).is_empty(), "{} has no templates", category);
        }
        assert_eq!(store.category_count(), DeathCategory::ALL.len());
    }

    #[test]
    fn test_merge_overrides_per_category() {
        let mut custom = TemplateStore::empty();
        custom.set(DeathCategory::PvP, ["{0} fragged {1}"]);

        let store = TemplateStore::builtin().merged_with(custom);
        assert_eq!(store.get(DeathCategory::PvP), ["{0} fragged {1}".to_string()]);
        assert_eq!(store.get(DeathCategory::Accident).len(), 2);
    }

    #[test]
    fn test_validate_rejects_blank() {
        let mut store = TemplateStore::empty();
        store.set(DeathCategory::Suicide, ["   "]);
        assert!(matches!(store.validate(), Err(NoticeError::InvalidConfig(_))));
        assert!(TemplateStore::builtin().validate().is_ok());
    }

    #[test]
    fn test_deserialize_from_toml() {
        let store: TemplateStore = toml::from_str(
            r#"
PvP = ["{killer} destroyed {victim}"]
Environment_Oxygen = []
"#,
        )
        .unwrap();

        assert_eq!(store.get(DeathCategory::PvP).len(), 1);
        assert!(store.get(DeathCategory::EnvironmentOxygen).is_empty());
        assert!(store.get(DeathCategory::Turret).is_empty());
    }

    #[test]
    fn test_deserialize_rejects_unknown_category() {
        let result: Result<TemplateStore, _> = toml::from_str(r#"Meteor = ["{victim} was hit"]"#);
        assert!(result.is_err());
    }
}
