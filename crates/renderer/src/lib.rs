//! Chart rendering for interpolated temperature fields.
//!
//! Produces a filled contour plot with a cool-warm colour scale:
//! - Filled contour bands over the field's value range
//! - Axes with tick labels, title and axis labels
//! - Colour bar with its own label
//! - Optional sample markers
//!
//! Output is encoded as PNG by [`png::encode_png`].

pub mod chart;
pub mod colormap;
pub mod contour;
pub mod error;
pub mod png;
pub mod style;
pub mod text;

pub use chart::{nice_ticks, render_field, PlotLayout};
pub use colormap::{Color, Colormap};
pub use contour::{render_filled_contours, ContourLevels, DEFAULT_LEVEL_COUNT};
pub use error::{RenderError, RenderResult};
pub use png::{encode_png, save_png};
pub use style::PlotStyle;
pub use text::FontSource;
