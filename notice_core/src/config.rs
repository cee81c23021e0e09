//! Notifier configuration, loaded once from TOML and shared read-only.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::NoticeError;
use crate::templates::TemplateStore;

/// Prefix for external messages when no glyphs are configured.
pub const DEFAULT_GLYPH: &str = "\u{1F480}";

/// Immutable configuration snapshot for the notifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifierConfig {
    /// Append a location suffix to messages.
    pub enable_location_zones: bool,

    /// Mention the grid the victim was aboard.
    pub show_grid_name: bool,

    /// Comma-separated decoration glyphs for external messages.
    pub decoration_glyphs: String,

    /// Sender shown on in-game broadcasts.
    pub local_sender_label: String,

    /// Colour tag for in-game broadcasts.
    pub local_color: String,

    /// 0 broadcasts to everyone.
    pub local_target_id: u64,

    /// Channel or room on the external platform.
    pub external_destination: String,

    /// Per-category overrides; categories not listed keep the built-in templates.
    #[serde(skip_serializing)]
    pub templates: Option<TemplateStore>,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            enable_location_zones: true,
            show_grid_name: true,
            decoration_glyphs: String::new(),
            local_sender_label: "Server".to_string(),
            local_color: "Red".to_string(),
            local_target_id: 0,
            external_destination: "deaths".to_string(),
            templates: None,
        }
    }
}

impl NotifierConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, NoticeError> {
        let config: NotifierConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, NoticeError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| NoticeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        log::info!("loaded notifier config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), NoticeError> {
        if self.local_sender_label.trim().is_empty() {
            return Err(NoticeError::InvalidConfig(
                "local_sender_label must not be empty".to_string(),
            ));
        }
        if let Some(templates) = &self.templates {
            templates.validate()?;
        }
        Ok(())
    }

    /// Configured glyphs, trimmed, without empty entries.
    pub fn glyphs(&self) -> Vec<String> {
        self.decoration_glyphs
            .split(',')
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Built-in templates with the configured overrides applied.
    pub fn template_store(&self) -> TemplateStore {
        match &self.templates {
            Some(overrides) => TemplateStore::builtin().merged_with(overrides.clone()),
            None => TemplateStore::builtin(),
        }
    }
}
