//! Configuration loader plus strongly typed settings structures.
//!
//! Everything the widget needs at construction (item layout, colors, marker,
//! label template, drag slop) is deserialized from a single TOML file. The
//! embedded default is written to the data directory on first run so users
//! have something to edit.

use crate::color::Rgba;
use crate::widgets::TextFormat;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// Embed default configuration at compile time
const DEFAULT_CONFIG: &str = include_str!("../defaults/config.toml");

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "FTL_DIR";

/// Top-level configuration object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub widget: WidgetConfig,
    #[serde(default)]
    pub style: StyleConfig,
    #[serde(default)]
    pub drag: DragConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Item layout and initial values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetConfig {
    #[serde(default = "default_item_count")]
    pub item_count: i32,
    #[serde(default)]
    pub item_spacing: f32,
    #[serde(default)]
    pub progress: i32,
    #[serde(default = "default_max")]
    pub max: i32,
    #[serde(default)]
    pub padding: Padding,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            item_count: default_item_count(),
            item_spacing: 0.0,
            progress: 0,
            max: default_max(),
            padding: Padding::default(),
        }
    }
}

/// Insets applied around the item row, in surface units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Padding {
    #[serde(default)]
    pub left: f32,
    #[serde(default)]
    pub top: f32,
    #[serde(default)]
    pub right: f32,
    #[serde(default)]
    pub bottom: f32,
}

/// Immutable look of the widget. Lengths are in surface units (terminal
/// cells for the TUI frontend).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleConfig {
    #[serde(default = "default_background_color")]
    pub background_color: Rgba,
    #[serde(default = "default_white")]
    pub progress_color: Rgba,
    #[serde(default)]
    pub track_height: f32,
    #[serde(default)]
    pub border_corner: f32,
    #[serde(default)]
    pub border_width: f32,
    #[serde(default = "default_border_color")]
    pub border_color: Rgba,
    #[serde(default)]
    pub text_format: TextFormat,
    #[serde(default = "default_white")]
    pub text_color: Rgba,
    /// Gap between the label and the marker.
    #[serde(default)]
    pub text_bottom: f32,
    #[serde(default)]
    pub marker: MarkerStyle,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background_color: default_background_color(),
            progress_color: default_white(),
            track_height: 0.0,
            border_corner: 0.0,
            border_width: 0.0,
            border_color: default_border_color(),
            text_format: TextFormat::default(),
            text_color: default_white(),
            text_bottom: 0.0,
            marker: MarkerStyle::default(),
        }
    }
}

/// Marker icon drawn above the fill anchor.
///
/// The rect is always computed (the label sits on top of it); the glyph is
/// only drawn when one is configured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerStyle {
    #[serde(default)]
    pub glyph: Option<String>,
    #[serde(default = "default_white")]
    pub color: Rgba,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
    /// Gap between the marker and the top of the track.
    #[serde(default)]
    pub bottom: f32,
    #[serde(default)]
    pub anchor: MarkerAnchor,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            glyph: None,
            color: default_white(),
            width: 0.0,
            height: 0.0,
            bottom: 0.0,
            anchor: MarkerAnchor::default(),
        }
    }
}

/// Where the marker and label are centered horizontally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerAnchor {
    /// Center of the last item touched by the fill (full or partial).
    #[default]
    SegmentCenter,
    /// Right edge of the filled area.
    FillEdge,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DragConfig {
    /// Horizontal travel before a press becomes a drag.
    #[serde(default = "default_slop")]
    pub slop: f32,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            slop: default_slop(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_poll_timeout_ms")]
    pub poll_timeout_ms: u64,
    /// Widget height in rows.
    #[serde(default = "default_widget_height")]
    pub height: u16,
    /// Columns left empty on each side of the widget.
    #[serde(default = "default_margin")]
    pub margin: u16,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            poll_timeout_ms: default_poll_timeout_ms(),
            height: default_widget_height(),
            margin: default_margin(),
        }
    }
}

impl Config {
    /// Parse a config from TOML text. Missing sections and fields take their
    /// defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Failed to parse config")
    }

    /// Built-in config shipped with the binary.
    pub fn embedded() -> Result<Self> {
        Self::from_toml_str(DEFAULT_CONFIG)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config = Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Load `<data dir>/config.toml`, writing the embedded default first if
    /// it does not exist yet.
    pub fn load() -> Result<Self> {
        Self::extract_defaults()?;
        Self::load_from_path(&Self::config_path()?)
    }

    fn extract_defaults() -> Result<()> {
        let path = Self::config_path()?;
        if path.exists() {
            return Ok(());
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory: {:?}", parent))?;
        }
        fs::write(&path, DEFAULT_CONFIG).context("Failed to write default config.toml")?;
        tracing::info!("Created default config at {:?}", path);
        Ok(())
    }

    /// Base data directory (~/.float-text-loading).
    /// Can be overridden with the FTL_DIR environment variable.
    pub fn base_dir() -> Result<PathBuf> {
        if let Ok(custom_dir) = std::env::var(DATA_DIR_ENV) {
            return Ok(PathBuf::from(custom_dir));
        }
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".float-text-loading"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("config.toml"))
    }

    /// Apply command line overrides for the initial values.
    pub fn apply_overrides(&mut self, progress: Option<i32>, max: Option<i32>) {
        if let Some(max) = max {
            self.widget.max = max;
        }
        if let Some(progress) = progress {
            self.widget.progress = progress;
        }
    }
}

fn default_item_count() -> i32 {
    10
}

fn default_max() -> i32 {
    100
}

fn default_white() -> Rgba {
    Rgba::WHITE
}

fn default_background_color() -> Rgba {
    Rgba::BLACK
}

fn default_border_color() -> Rgba {
    Rgba::argb(0x44, 0xff, 0xff, 0xff)
}

fn default_slop() -> f32 {
    2.0
}

fn default_poll_timeout_ms() -> u64 {
    16
}

fn default_widget_height() -> u16 {
    6
}

fn default_margin() -> u16 {
    2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.widget.item_count, 10);
        assert_eq!(config.widget.item_spacing, 0.0);
        assert_eq!(config.widget.progress, 0);
        assert_eq!(config.widget.max, 100);
        assert_eq!(config.style.text_format.template(), "%s");
        assert_eq!(config.style.border_color, Rgba::argb(0x44, 255, 255, 255));
        assert_eq!(config.style.background_color, Rgba::BLACK);
        assert!(config.style.marker.glyph.is_none());
        assert_eq!(config.style.marker.anchor, MarkerAnchor::SegmentCenter);
    }

    #[test]
    fn test_embedded_default_parses() {
        let config = Config::embedded().expect("embedded config must parse");
        assert!(config.widget.item_count >= 1);
        assert!(config.style.track_height > 0.0);
        assert!(config.style.marker.glyph.is_some());
        assert_eq!(config.style.marker.anchor, MarkerAnchor::SegmentCenter);
    }

    #[test]
    fn test_partial_sections_and_colors() {
        let toml_str = r##"
[widget]
item_count = 4
item_spacing = 1.5

[style]
progress_color = "#00ff00"
text_format = "%s%%"

[style.marker]
glyph = "v"
anchor = "fill_edge"
"##;
        let config = Config::from_toml_str(toml_str).unwrap();
        assert_eq!(config.widget.item_count, 4);
        assert_eq!(config.widget.item_spacing, 1.5);
        assert_eq!(config.widget.max, 100);
        assert_eq!(config.style.progress_color, Rgba::rgb(0, 255, 0));
        assert_eq!(config.style.text_format.format(12), "12%");
        assert_eq!(config.style.marker.glyph.as_deref(), Some("v"));
        assert_eq!(config.style.marker.anchor, MarkerAnchor::FillEdge);
    }

    #[test]
    fn test_bad_color_is_rejected() {
        let result = Config::from_toml_str("[style]\nborder_color = \"white\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides() {
        let mut config = Config::default();
        config.apply_overrides(Some(30), Some(60));
        assert_eq!(config.widget.progress, 30);
        assert_eq!(config.widget.max, 60);

        config.apply_overrides(None, None);
        assert_eq!(config.widget.progress, 30);
    }

    #[test]
    fn test_serialize_round_trip() {
        let config = Config::embedded().unwrap();
        let text = toml::to_string_pretty(&config).expect("serialize");
        let again = Config::from_toml_str(&text).unwrap();
        assert_eq!(again.widget.item_count, config.widget.item_count);
        assert_eq!(again.style.border_color, config.style.border_color);
        assert_eq!(
            again.style.text_format.template(),
            config.style.text_format.template()
        );
    }
}
