//! PNG encoding for rendered plots.
//!
//! Supports two encoding modes:
//! - **Indexed PNG (color type 3)**: used when the image has ≤256 unique colors.
//!   Filled contour plots with a modest level count usually qualify.
//! - **RGBA PNG (color type 6)**: fallback for images with >256 colors, such as
//!   plots with anti-aliased text over many bands.

use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::path::Path;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::RgbaImage;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::{RenderError, RenderResult};

/// Maximum colors for indexed PNG (PNG8)
const MAX_PALETTE_SIZE: usize = 256;

/// PNG file signature.
const SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

const COLOR_TYPE_INDEXED: u8 = 3;
const COLOR_TYPE_RGBA: u8 = 6;

/// Encode an image, choosing indexed or RGBA output automatically.
pub fn encode_png(img: &RgbaImage) -> RenderResult<Vec<u8>> {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(RenderError::Encode(format!(
            "cannot encode an empty {width}x{height} image"
        )));
    }

    match extract_palette(img.as_raw()) {
        Some((palette, indices)) => {
            debug!(colors = palette.len(), "Encoding indexed PNG");
            create_png_indexed(width, height, &palette, &indices)
        }
        None => {
            debug!("More than {MAX_PALETTE_SIZE} colors, encoding RGBA PNG");
            create_png(img.as_raw(), width, height)
        }
    }
}

/// Encode `img` and write it to `path`.
pub fn save_png(img: &RgbaImage, path: impl AsRef<Path>) -> RenderResult<()> {
    let path = path.as_ref();
    let bytes = encode_png(img)?;
    std::fs::write(path, &bytes).map_err(|source| RenderError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        path = %path.display(),
        bytes = bytes.len(),
        width = img.width(),
        height = img.height(),
        "Wrote PNG"
    );
    Ok(())
}

/// Palette and per-pixel indices, or `None` when there are too many colors.
///
/// Unique colors are gathered per chunk in parallel, then merged in pixel order
/// so the palette is deterministic.
fn extract_palette(pixels: &[u8]) -> Option<(Vec<[u8; 4]>, Vec<u8>)> {
    let as_key = |p: &[u8]| u32::from_le_bytes([p[0], p[1], p[2], p[3]]);
    let chunk_bytes = 4 * 4096;

    let partial: Vec<Vec<u32>> = pixels
        .par_chunks(chunk_bytes)
        .map(|chunk| {
            let mut seen = HashSet::with_capacity(MAX_PALETTE_SIZE);
            let mut ordered = Vec::new();
            for p in chunk.chunks_exact(4) {
                let key = as_key(p);
                if seen.insert(key) {
                    if ordered.len() == MAX_PALETTE_SIZE {
                        return None;
                    }
                    ordered.push(key);
                }
            }
            Some(ordered)
        })
        .collect::<Option<_>>()?;

    let mut lookup: HashMap<u32, u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut palette = Vec::with_capacity(MAX_PALETTE_SIZE);
    for key in partial.into_iter().flatten() {
        if lookup.contains_key(&key) {
            continue;
        }
        if palette.len() == MAX_PALETTE_SIZE {
            return None;
        }
        lookup.insert(key, palette.len() as u8);
        palette.push(key.to_le_bytes());
    }

    let indices = pixels
        .par_chunks_exact(4)
        .map(|p| lookup.get(&as_key(p)).copied().unwrap_or(0))
        .collect();

    Some((palette, indices))
}

/// Create an indexed PNG (color type 3) from palette and indices.
pub fn create_png_indexed(
    width: u32,
    height: u32,
    palette: &[[u8; 4]],
    indices: &[u8],
) -> RenderResult<Vec<u8>> {
    if palette.is_empty() || palette.len() > MAX_PALETTE_SIZE {
        return Err(RenderError::Encode(format!(
            "palette must hold 1..={MAX_PALETTE_SIZE} colors, got {}",
            palette.len()
        )));
    }
    check_len(indices.len(), width, height, 1)?;

    let mut png = Vec::new();
    png.extend_from_slice(&SIGNATURE);
    write_chunk(&mut png, b"IHDR", &ihdr(width, height, COLOR_TYPE_INDEXED));

    let plte: Vec<u8> = palette.iter().flat_map(|c| [c[0], c[1], c[2]]).collect();
    write_chunk(&mut png, b"PLTE", &plte);

    // tRNS only when some entry is not fully opaque.
    if palette.iter().any(|c| c[3] < 255) {
        let trns: Vec<u8> = palette.iter().map(|c| c[3]).collect();
        write_chunk(&mut png, b"tRNS", &trns);
    }

    write_chunk(&mut png, b"IDAT", &deflate_scanlines(indices, width as usize)?);
    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

/// Create an RGBA PNG (color type 6) from raw pixel data.
pub fn create_png(pixels: &[u8], width: u32, height: u32) -> RenderResult<Vec<u8>> {
    check_len(pixels.len(), width, height, 4)?;

    let mut png = Vec::new();
    png.extend_from_slice(&SIGNATURE);
    write_chunk(&mut png, b"IHDR", &ihdr(width, height, COLOR_TYPE_RGBA));
    write_chunk(&mut png, b"IDAT", &deflate_scanlines(pixels, width as usize * 4)?);
    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

fn check_len(len: usize, width: u32, height: u32, bytes_per_pixel: usize) -> RenderResult<()> {
    let expected = width as usize * height as usize * bytes_per_pixel;
    if len != expected {
        return Err(RenderError::Encode(format!(
            "expected {expected} bytes for {width}x{height}, got {len}"
        )));
    }
    Ok(())
}

fn ihdr(width: u32, height: u32, color_type: u8) -> Vec<u8> {
    let mut data = Vec::with_capacity(13);
    data.extend_from_slice(&width.to_be_bytes());
    data.extend_from_slice(&height.to_be_bytes());
    data.push(8); // bit depth
    data.push(color_type);
    data.push(0); // compression method
    data.push(0); // filter method
    data.push(0); // interlace method
    data
}

/// Zlib-compress scanlines, each prefixed with filter type 0 (none).
fn deflate_scanlines(data: &[u8], row_bytes: usize) -> RenderResult<Vec<u8>> {
    let mut raw = Vec::with_capacity(data.len() + data.len() / row_bytes.max(1));
    for row in data.chunks(row_bytes) {
        raw.push(0);
        raw.extend_from_slice(row);
    }

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(&raw)
        .and_then(|_| encoder.finish())
        .map_err(|e| RenderError::Encode(format!("IDAT compression failed: {e}")))
}

/// Append a chunk: length, type, data, CRC over type and data.
fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}
