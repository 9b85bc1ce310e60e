//! Text drawing for titles, axis labels and tick labels.

use std::path::PathBuf;

use image::{imageops, Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use rusttype::{Font, Scale};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{RenderError, RenderResult};

/// Embedded font data - DejaVu Sans
const FONT_DATA: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

/// Where the plot font comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSource {
    /// The font compiled into the renderer.
    #[default]
    Embedded,
    /// A TrueType file on disk.
    File(PathBuf),
}

/// Horizontal anchor for [`TextRenderer::draw`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Left,
    Center,
    Right,
}

/// Draws text with a single loaded font.
pub struct TextRenderer {
    font: Font<'static>,
}

impl TextRenderer {
    /// Load the font for `source`.
    ///
    /// A file that cannot be read or parsed falls back to the embedded font
    /// with a warning.
    pub fn load(source: &FontSource) -> RenderResult<Self> {
        if let FontSource::File(path) = source {
            match std::fs::read(path) {
                Ok(bytes) => match Font::try_from_vec(bytes) {
                    Some(font) => {
                        debug!(path = %path.display(), "Loaded font");
                        return Ok(Self { font });
                    }
                    None => warn!(path = %path.display(), "Not a usable TrueType font, using embedded font"),
                },
                Err(e) => warn!(path = %path.display(), error = %e, "Failed to read font, using embedded font"),
            }
        }

        Font::try_from_bytes(FONT_DATA)
            .map(|font| Self { font })
            .ok_or_else(|| RenderError::Font("embedded font data is invalid".to_string()))
    }

    /// Width and height in pixels of `text` at `size`.
    pub fn measure(&self, text: &str, size: f32) -> (i32, i32) {
        text_size(Scale::uniform(size), &self.font, text)
    }

    /// Draw `text` with its top edge at `y`, anchored horizontally at `x`.
    pub fn draw(
        &self,
        img: &mut RgbaImage,
        text: &str,
        x: i32,
        y: i32,
        size: f32,
        anchor: Anchor,
        color: Rgba<u8>,
    ) {
        if text.is_empty() {
            return;
        }
        let (w, _) = self.measure(text, size);
        let left = match anchor {
            Anchor::Left => x,
            Anchor::Center => x - w / 2,
            Anchor::Right => x - w,
        };
        draw_text_mut(img, color, left, y, Scale::uniform(size), &self.font, text);
    }

    /// Draw `text` rotated a quarter turn counter-clockwise, centred on
    /// `(cx, cy)`, reading bottom to top.
    pub fn draw_vertical(
        &self,
        img: &mut RgbaImage,
        text: &str,
        cx: i32,
        cy: i32,
        size: f32,
        color: Rgba<u8>,
    ) {
        let (w, h) = self.measure(text, size);
        if w <= 0 || h <= 0 {
            return;
        }
        let mut label = RgbaImage::new(w as u32, h as u32);
        draw_text_mut(&mut label, color, 0, 0, Scale::uniform(size), &self.font, text);
        let rotated = imageops::rotate270(&label);

        let x = cx as i64 - rotated.width() as i64 / 2;
        let y = cy as i64 - rotated.height() as i64 / 2;
        imageops::overlay(img, &rotated, x, y);
    }
}
