//! Plot style configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::colormap::{Color, Colormap};
use crate::contour::DEFAULT_LEVEL_COUNT;
use crate::error::{RenderError, RenderResult};
use crate::text::FontSource;

/// Appearance of a rendered temperature field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotStyle {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Label drawn alongside the colour bar.
    pub colorbar_label: String,
    /// Number of filled contour bands.
    pub levels: usize,
    pub colormap: Colormap,
    /// Canvas colour as `#rrggbb`.
    pub background: String,
    /// Plot-area colour where the field has no value.
    pub no_data: String,
    /// Text and frame colour.
    pub foreground: String,
    pub font: FontSource,
    /// Overlay the input samples as markers.
    pub show_samples: bool,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "Temperature Field".to_string(),
            x_label: "X Coordinate".to_string(),
            y_label: "Y Coordinate".to_string(),
            colorbar_label: "Temperature".to_string(),
            levels: DEFAULT_LEVEL_COUNT,
            colormap: Colormap::Coolwarm,
            background: "#ffffff".to_string(),
            no_data: "#ffffff".to_string(),
            foreground: "#000000".to_string(),
            font: FontSource::Embedded,
            show_samples: false,
        }
    }
}

impl PlotStyle {
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_font_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.font = FontSource::File(path.into());
        self
    }

    pub fn with_samples(mut self, show: bool) -> Self {
        self.show_samples = show;
        self
    }

    pub fn background_color(&self) -> RenderResult<Color> {
        parse_color(&self.background)
    }

    pub fn no_data_color(&self) -> RenderResult<Color> {
        parse_color(&self.no_data)
    }

    pub fn foreground_color(&self) -> RenderResult<Color> {
        parse_color(&self.foreground)
    }
}

fn parse_color(hex: &str) -> RenderResult<Color> {
    Color::from_hex(hex).ok_or_else(|| RenderError::InvalidColor(hex.to_string()))
}
