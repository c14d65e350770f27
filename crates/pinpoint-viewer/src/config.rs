//! Point selection configuration
//!
//! Every field is optional in TOML; missing values fall back to the
//! built-in defaults:
//!
//! ```toml
//! pick_threshold = 0.01
//! decoration_group = 1
//! multi_select_modifier = "ctrl"
//!
//! [hover_marker]
//! point_size = 10.0
//! color = [1.0, 1.0, 0.0]
//!
//! [selection_marker]
//! point_size = 10.0
//! color = [1.0, 0.0, 0.0]
//! ```

use crate::event::ModifierKey;
use crate::host::DecorationGroupId;
use crate::picking::DEFAULT_PICK_THRESHOLD;
use pinpoint_core::{Color, PinpointError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

/// Look of a point marker
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarkerStyle {
    pub point_size: f32,
    pub color: Color,
}

impl MarkerStyle {
    pub fn new(point_size: f32, color: Color) -> Self {
        Self { point_size, color }
    }
}

/// Marker table as written; absent keys keep the marker's own default
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct MarkerOverrides {
    point_size: Option<f32>,
    color: Option<Color>,
}

impl MarkerOverrides {
    fn apply(self, base: MarkerStyle) -> MarkerStyle {
        MarkerStyle {
            point_size: self.point_size.unwrap_or(base.point_size),
            color: self.color.unwrap_or(base.color),
        }
    }
}

fn deserialize_hover_marker<'de, D>(deserializer: D) -> std::result::Result<MarkerStyle, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(MarkerOverrides::deserialize(deserializer)?.apply(default_hover_marker()))
}

fn deserialize_selection_marker<'de, D>(
    deserializer: D,
) -> std::result::Result<MarkerStyle, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(MarkerOverrides::deserialize(deserializer)?.apply(default_selection_marker()))
}

fn default_point_size() -> f32 {
    10.0
}

fn default_hover_marker() -> MarkerStyle {
    MarkerStyle::new(default_point_size(), Color::YELLOW)
}

fn default_selection_marker() -> MarkerStyle {
    MarkerStyle::new(default_point_size(), Color::RED)
}

fn default_pick_threshold() -> f64 {
    DEFAULT_PICK_THRESHOLD
}

fn default_decoration_group() -> DecorationGroupId {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointSelectionConfig {
    /// World-space pick radius
    #[serde(default = "default_pick_threshold")]
    pub pick_threshold: f64,
    #[serde(
        default = "default_hover_marker",
        deserialize_with = "deserialize_hover_marker"
    )]
    pub hover_marker: MarkerStyle,
    #[serde(
        default = "default_selection_marker",
        deserialize_with = "deserialize_selection_marker"
    )]
    pub selection_marker: MarkerStyle,
    /// Group the target highlight decorations are installed under
    #[serde(default = "default_decoration_group")]
    pub decoration_group: DecorationGroupId,
    /// Key that turns a press into a toggle
    #[serde(default)]
    pub multi_select_modifier: ModifierKey,
}

impl Default for PointSelectionConfig {
    fn default() -> Self {
        Self {
            pick_threshold: default_pick_threshold(),
            hover_marker: default_hover_marker(),
            selection_marker: default_selection_marker(),
            decoration_group: default_decoration_group(),
            multi_select_modifier: ModifierKey::default(),
        }
    }
}

impl PointSelectionConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PinpointError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.pick_threshold.is_finite() || self.pick_threshold <= 0.0 {
            return Err(PinpointError::ValueOutOfRange {
                field: "pick_threshold".to_string(),
                expected: "a positive finite length".to_string(),
                value: self.pick_threshold,
            });
        }
        for (field, style) in [
            ("hover_marker.point_size", &self.hover_marker),
            ("selection_marker.point_size", &self.selection_marker),
        ] {
            if !style.point_size.is_finite() || style.point_size <= 0.0 {
                return Err(PinpointError::ValueOutOfRange {
                    field: field.to_string(),
                    expected: "a positive size".to_string(),
                    value: f64::from(style.point_size),
                });
            }
        }
        Ok(())
    }
}
