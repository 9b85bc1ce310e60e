//! Temperature field rendering service library.
//!
//! Reads a sample file, grids it, renders the chart and writes a PNG.
//! The binary in `main.rs` is a thin CLI over [`run`].

pub mod pipeline;
pub mod viewer;

pub use pipeline::{run, RenderRequest, RenderSummary};
