//! Widget configuration. Every field has a default so partial JSON files load fine.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

use crate::color::Rgb;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EaselConfig {
    /// Maximum number of snapshots kept for undo/redo.
    #[serde(default = "default_history_cap")]
    pub history_cap: usize,

    /// Recent colors remembered per role.
    #[serde(default = "default_recent_colors_cap")]
    pub recent_colors_cap: usize,

    /// Canvas background; also what the eraser and Clear paint.
    #[serde(default = "default_background")]
    pub background: String,

    #[serde(default = "default_brush_size")]
    pub default_brush_size: u32,
    #[serde(default = "default_min_brush_size")]
    pub min_brush_size: u32,
    #[serde(default = "default_max_brush_size")]
    pub max_brush_size: u32,

    #[serde(default = "default_black")]
    pub default_fill_color: String,
    #[serde(default = "default_black")]
    pub default_stroke_color: String,

    /// Key the persisted canvas lives under.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    #[serde(default = "default_min_canvas_height")]
    pub min_canvas_height: u32,
    #[serde(default = "default_layout_padding")]
    pub layout_padding: u32,

    #[serde(default = "default_picker_width")]
    pub picker_width: u32,
    #[serde(default = "default_picker_height")]
    pub picker_height: u32,

    /// Permanent swatches shown in both color sections.
    #[serde(default = "default_palette")]
    pub palette: Vec<String>,
}

fn default_history_cap() -> usize {
    50
}

fn default_recent_colors_cap() -> usize {
    crate::recent::DEFAULT_RECENT_CAPACITY
}

fn default_background() -> String {
    "#ffffff".into()
}

fn default_brush_size() -> u32 {
    10
}

fn default_min_brush_size() -> u32 {
    1
}

fn default_max_brush_size() -> u32 {
    50
}

fn default_black() -> String {
    "#000000".into()
}

fn default_storage_key() -> String {
    "canvas_data".into()
}

fn default_min_canvas_height() -> u32 {
    300
}

fn default_layout_padding() -> u32 {
    40
}

fn default_picker_width() -> u32 {
    200
}

fn default_picker_height() -> u32 {
    150
}

fn default_palette() -> Vec<String> {
    [
        "#000000", "#ffffff", "#ff0000", "#00ff00", "#0000ff", "#ffff00", "#ff00ff", "#00ffff",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for EaselConfig {
    fn default() -> Self {
        Self {
            history_cap: default_history_cap(),
            recent_colors_cap: default_recent_colors_cap(),
            background: default_background(),
            default_brush_size: default_brush_size(),
            min_brush_size: default_min_brush_size(),
            max_brush_size: default_max_brush_size(),
            default_fill_color: default_black(),
            default_stroke_color: default_black(),
            storage_key: default_storage_key(),
            min_canvas_height: default_min_canvas_height(),
            layout_padding: default_layout_padding(),
            picker_width: default_picker_width(),
            picker_height: default_picker_height(),
            palette: default_palette(),
        }
    }
}

impl EaselConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_cap == 0 {
            return Err(ConfigError::Invalid {
                field: "history_cap",
                reason: "must be at least 1".into(),
            });
        }

        if self.recent_colors_cap == 0 {
            return Err(ConfigError::Invalid {
                field: "recent_colors_cap",
                reason: "must be at least 1".into(),
            });
        }

        if self.min_brush_size == 0 || self.min_brush_size > self.max_brush_size {
            return Err(ConfigError::Invalid {
                field: "min_brush_size",
                reason: format!(
                    "brush range {}..={} is empty or starts at zero",
                    self.min_brush_size, self.max_brush_size
                ),
            });
        }

        if self.picker_width == 0 || self.picker_height < 2 {
            return Err(ConfigError::Invalid {
                field: "picker_height",
                reason: "picker needs a non-empty hue band and brightness band".into(),
            });
        }

        let colors = [
            ("background", &self.background),
            ("default_fill_color", &self.default_fill_color),
            ("default_stroke_color", &self.default_stroke_color),
        ];
        for (field, value) in colors {
            if Rgb::from_hex(value).is_err() {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("{value:?} is not a hex color"),
                });
            }
        }

        if let Some(bad) = self.palette.iter().find(|c| Rgb::from_hex(c).is_err()) {
            return Err(ConfigError::Invalid {
                field: "palette",
                reason: format!("{bad:?} is not a hex color"),
            });
        }

        Ok(())
    }

    pub fn background_color(&self) -> Rgb {
        parse_or(&self.background, Rgb::WHITE, "background")
    }

    pub fn fill_color(&self) -> Rgb {
        parse_or(&self.default_fill_color, Rgb::BLACK, "default_fill_color")
    }

    pub fn stroke_color(&self) -> Rgb {
        parse_or(&self.default_stroke_color, Rgb::BLACK, "default_stroke_color")
    }
}

fn parse_or(value: &str, fallback: Rgb, field: &str) -> Rgb {
    Rgb::from_hex(value).unwrap_or_else(|_| {
        warn!(field, value, "unparsable color in config, using {}", fallback);
        fallback
    })
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Load and validate a config file.
pub fn load_config(path: impl AsRef<Path>) -> anyhow::Result<EaselConfig> {
    let path = path.as_ref();
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config file: {}", path.display()))?;
    let config: EaselConfig = serde_json::from_str(&data).context("parse config json")?;
    config.validate()?;
    Ok(config)
}

/// Save a config as pretty JSON.
pub fn save_config(path: impl AsRef<Path>, config: &EaselConfig) -> anyhow::Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create parent dir: {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(config).context("serialize config to json")?;
    fs::write(path, json).with_context(|| format!("write config file: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = EaselConfig::default();
        config.validate().unwrap();
        assert_eq!(config.history_cap, 50);
        assert_eq!(config.background_color(), Rgb::WHITE);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: EaselConfig = serde_json::from_str(r#"{ "history_cap": 5 }"#).unwrap();
        assert_eq!(config.history_cap, 5);
        assert_eq!(config.recent_colors_cap, 5);
        assert_eq!(config.storage_key, "canvas_data");
    }

    #[test]
    fn zero_cap_is_rejected() {
        let config = EaselConfig {
            history_cap: 0,
            ..EaselConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn bad_color_is_rejected() {
        let config = EaselConfig {
            background: "white".into(),
            ..EaselConfig::default()
        };
        assert!(config.validate().is_err());
        assert_eq!(config.background_color(), Rgb::WHITE);
    }
}
