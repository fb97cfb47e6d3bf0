//! Timeline settings
//!
//! Settings are a flat record stored as YAML (camelCase keys). They are
//! loaded once at startup and passed explicitly to everything that needs
//! them; `config set` and `config reset` replace the whole record on disk.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

/// Interface and output language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "zh-CN")]
    ZhCn,
}

/// Which side the panel is drawn on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Left,
    #[default]
    Right,
}

/// How a queried tag is compared with a note's tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TagMatchMode {
    /// Same tag or a sub-tag (`project` matches `project/alpha`), case-sensitive
    #[default]
    Exact,
    /// As `Exact`, ignoring case
    IgnoreCase,
    /// As `IgnoreCase`, plus substring containment in either direction
    Loose,
}

/// How a queried metadata value is compared with a frontmatter value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetadataMatchMode {
    /// Case-insensitive: the value (or an array item) equals or contains the query
    #[default]
    Contains,
    /// Case-insensitive equality with the value or an array item
    Exact,
    /// As `Contains`, plus the query containing the value
    Loose,
}

/// All configurable options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Frontmatter attribute holding the note's date
    pub date_attribute: String,
    /// Frontmatter attribute marking milestones (empty disables milestones)
    pub milestone_attribute: String,
    /// Value the milestone attribute must have (empty: presence is enough)
    pub milestone_value: String,
    pub file_name_prefix: String,
    pub file_name_suffix: String,
    pub language: Language,
    pub default_position: Position,
    pub tag_match: TagMatchMode,
    pub metadata_match: MetadataMatchMode,

    // Panel style
    pub line_width: u32,
    pub line_color: String,
    pub item_spacing: u32,
    pub card_background: String,
    pub card_text_color: String,
    pub card_border_color: String,
    pub milestone_card_background: String,
    pub milestone_card_text_color: String,
    pub milestone_card_border_color: String,
    /// Hover animation duration in milliseconds
    pub animation_duration: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            date_attribute: "created".to_string(),
            milestone_attribute: String::new(),
            milestone_value: String::new(),
            file_name_prefix: String::new(),
            file_name_suffix: String::new(),
            language: Language::default(),
            default_position: Position::default(),
            tag_match: TagMatchMode::default(),
            metadata_match: MetadataMatchMode::default(),
            line_width: 2,
            line_color: "#7c3aed".to_string(),
            item_spacing: 30,
            card_background: "#f5f5f5".to_string(),
            card_text_color: "#222222".to_string(),
            card_border_color: "#dddddd".to_string(),
            milestone_card_background: "#fff4d6".to_string(),
            milestone_card_text_color: "#5a3e00".to_string(),
            milestone_card_border_color: "#e0b040".to_string(),
            animation_duration: 200,
        }
    }
}

impl Settings {
    /// Load settings from a YAML file. A missing file gives the defaults;
    /// missing keys take their default values.
    pub fn load(path: &Path) -> io::Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "settings file not found, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse settings from YAML text
    pub fn from_yaml(content: &str) -> io::Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidData, format!("Invalid settings: {}", e))
        })
    }

    /// Serialize settings to YAML text
    pub fn to_yaml(&self) -> io::Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidData, format!("Cannot serialize settings: {}", e))
        })
    }

    /// Write settings to a YAML file, creating parent directories
    pub fn save(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.to_yaml()?)
    }

    /// Return a copy with one key changed.
    ///
    /// `key` is the camelCase name used in the settings file. The value is
    /// read as YAML, so numbers stay numbers; the result is validated by
    /// deserializing the whole record again.
    pub fn with_value(&self, key: &str, raw: &str) -> io::Result<Self> {
        let mut yaml = serde_yaml::to_value(self).map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidData, format!("Cannot serialize settings: {}", e))
        })?;

        let Value::Mapping(ref mut map) = yaml else {
            return Err(io::Error::new(io::ErrorKind::InvalidData, "Settings are not a mapping"));
        };

        let current = map.get(key).ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, format!("Unknown setting '{}'", key))
        })?;

        // Keep string settings as strings even when they look like numbers
        let value = match current {
            Value::String(_) => Value::String(raw.to_string()),
            _ => serde_yaml::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string())),
        };
        map.insert(Value::String(key.to_string()), value);

        serde_yaml::from_value(yaml).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid value '{}' for '{}': {}", raw, key, e),
            )
        })
    }
}
