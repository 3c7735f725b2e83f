//! Immutable engine configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::{RowIndex, StoreKind};

/// Name and caption of one store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetLayout {
    /// Sheet name.
    pub name: String,
    /// Text written into the caption row.
    pub caption: String,
}

/// Event information handed to the public page.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EventDetails {
    /// Event title.
    pub title: String,
    /// Human-readable date.
    pub date: String,
    /// Human-readable time range.
    pub time: String,
    /// Venue.
    pub location: String,
    /// Map link for the venue.
    pub location_link: String,
    /// Free-form description.
    pub description: String,
    /// Gift guidance.
    pub gift_info: String,
    /// Dress code.
    pub dress_code: String,
    /// Anything else.
    pub additional_info: String,
}

/// Configuration shared by every engine. Built once and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsvpConfig {
    /// Application name.
    pub app_name: String,
    /// Source-of-truth log.
    pub primary_log: SheetLayout,
    /// Derived guest roster.
    pub guest_roster: SheetLayout,
    /// Derived dietary roster.
    pub dietary_roster: SheetLayout,
    /// Row holding column headers.
    pub header_row: RowIndex,
    /// Row holding the caption text.
    pub caption_row: RowIndex,
    /// Event information.
    pub event: EventDetails,
}

impl Default for RsvpConfig {
    fn default() -> Self {
        Self {
            app_name: "RSVP Log".to_string(),
            primary_log: SheetLayout {
                name: "RSVPs".to_string(),
                caption: "RSVP Submissions - Newest First".to_string(),
            },
            guest_roster: SheetLayout {
                name: "Guest List".to_string(),
                caption: "Guest List - Confirmed & Pending RSVPs".to_string(),
            },
            dietary_roster: SheetLayout {
                name: "Dietary Information".to_string(),
                caption: "Dietary Restrictions and Special Requests".to_string(),
            },
            header_row: 0,
            caption_row: 1,
            event: EventDetails::default(),
        }
    }
}

/// Configuration load failure.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read.
    #[error("read {path}: {source}")]
    Io {
        /// Offending path.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },
    /// TOML did not parse.
    #[error("parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// Row layout is inconsistent.
    #[error("invalid layout: {0}")]
    Layout(String),
}

impl RsvpConfig {
    /// Parses a TOML document; missing keys fall back to [`RsvpConfig::default`].
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reads and parses a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// First data row (directly after the caption row).
    pub fn data_start_row(&self) -> RowIndex {
        self.caption_row + 1
    }

    /// Layout of `kind`.
    pub fn layout(&self, kind: StoreKind) -> &SheetLayout {
        match kind {
            StoreKind::PrimaryLog => &self.primary_log,
            StoreKind::GuestRoster => &self.guest_roster,
            StoreKind::DietaryRoster => &self.dietary_roster,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.caption_row <= self.header_row {
            return Err(ConfigError::Layout(format!(
                "caption row {} must follow header row {}",
                self.caption_row, self.header_row
            )));
        }
        for kind in StoreKind::ALL {
            if self.layout(kind).name.trim().is_empty() {
                return Err(ConfigError::Layout(format!("{kind} has an empty sheet name")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = RsvpConfig::from_toml_str(
            r#"
            app_name = "Party"

            [event]
            title = "Birthday"
            location = "Pavilion"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.app_name, "Party");
        assert_eq!(cfg.event.title, "Birthday");
        assert_eq!(cfg.primary_log.name, "RSVPs");
        assert_eq!(cfg.data_start_row(), 2);
    }

    #[test]
    fn caption_before_header_is_rejected() {
        let err = RsvpConfig::from_toml_str("header_row = 3\ncaption_row = 1\n").unwrap_err();
        assert!(matches!(err, ConfigError::Layout(_)));
    }
}
