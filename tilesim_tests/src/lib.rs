// Copyright 2026 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tilesim tests.
//!
//! Synthetic segment scenes, and a straightforward scanline rasterizer used as a
//! reference for the cooperative kernel.

// LINEBENDER LINT SET - lib.rs - v2
// See https://linebender.org/wiki/canonical-lints/
// These lints aren't included in Cargo.toml because they
// shouldn't apply to examples and tests
#![warn(unused_crate_dependencies)]
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![allow(
    missing_debug_implementations,
    unreachable_pub,
    missing_docs,
    clippy::missing_assert_message,
    clippy::allow_attributes_without_reason
)]

use anyhow::{Context, Result};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tilesim::tilesim_encoding::{
    AREA_SCALE, COVER_SCALE, TILE_HEIGHT, TILE_HEIGHT_SHIFT, TILE_WIDTH, TILE_WIDTH_SHIFT,
};
use tilesim::{Framebuffer, PackedSegment, RasterConfig, Renderer};

pub struct TestParams {
    pub width: u32,
    pub height: u32,
    pub name: String,
}

impl TestParams {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            name: name.into(),
        }
    }

    pub fn config(&self) -> RasterConfig {
        RasterConfig::new(self.width, self.height)
    }
}

/// Runs the whole pipeline (little-endian bytes in, framebuffer out) on `segments`.
pub fn render(segments: &[PackedSegment], params: &TestParams) -> Result<Framebuffer> {
    let renderer = Renderer::new(params.config());
    renderer
        .render_bytes(&to_le_bytes(segments))
        .with_context(|| format!("rendering test scene '{}'", params.name))
}

/// Encodes segments as the flat little-endian stream the loader expects.
pub fn to_le_bytes(segments: &[PackedSegment]) -> Vec<u8> {
    segments
        .iter()
        .flat_map(|segment| segment.to_bits().to_le_bytes())
        .collect()
}

/// Full-area segments for every pixel of the first `lines` columns.
///
/// Each column is on its own layer.
pub fn vertical_lines(height: u32, lines: u32) -> Vec<PackedSegment> {
    let mut segments = Vec::new();
    for tile_y in (0..height).step_by(TILE_HEIGHT as usize) {
        for x in 0..lines {
            for y in 0..TILE_HEIGHT {
                let y = tile_y + y;
                segments.push(PackedSegment::from_pixel(x as i32, y as i32, x, 256, 0));
            }
        }
    }
    segments
}

/// One full-cover segment per pixel row, left of the target, so every row is
/// covered from its first pixel on.
pub fn horizontal_lines(height: u32) -> Vec<PackedSegment> {
    let mut segments = Vec::new();
    for tile_y in (0..height).step_by(TILE_HEIGHT as usize) {
        for y in 0..TILE_HEIGHT {
            let y = tile_y + y;
            segments.push(PackedSegment::from_pixel(-100, y as i32, y, 0, 16));
        }
    }
    segments
}

/// The segments of an axis-aligned rectangle covering pixels `x0..x1` by `y0..y1`.
///
/// The left edge fully covers its own pixel and starts the cover; the right edge
/// cancels both.
pub fn filled_rect(x0: i32, y0: i32, x1: i32, y1: i32) -> Vec<PackedSegment> {
    (y0..y1)
        .flat_map(|y| {
            [
                PackedSegment::from_pixel(x0, y, 0, 256, 16),
                PackedSegment::from_pixel(x1, y, 0, -256, -16),
            ]
        })
        .collect()
}

/// Random segments in and around a target of the given size.
///
/// Tile columns range up to 4 tiles left and right of the target, tile rows stay
/// non-negative and may run past the bottom. About one in fifty segments is a
/// terminator.
pub fn random_segments(seed: u64, count: usize, width: u32, height: u32) -> Vec<PackedSegment> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let max_x = width as i32 + 4 * TILE_WIDTH as i32;
    let max_y = height as i32 + 2 * TILE_HEIGHT as i32;
    (0..count)
        .map(|_| {
            if rng.gen_ratio(1, 50) {
                return PackedSegment::terminator();
            }
            PackedSegment::from_pixel(
                rng.gen_range(-4 * TILE_WIDTH as i32..max_x),
                rng.gen_range(0..max_y),
                rng.gen_range(0..8),
                rng.gen_range(-512..512),
                rng.gen_range(-32..32),
            )
        })
        .collect()
}

/// Rasterizes `segments` one pixel row at a time, without tiles or workgroups.
///
/// A pixel's coverage is the cover of every segment left of it in its row plus
/// its own area. Segments must have non-negative tile rows, and tile columns
/// within ±255.
pub fn reference_rasterize(config: &RasterConfig, segments: &[PackedSegment]) -> Framebuffer {
    let width = config.width_in_tiles * TILE_WIDTH;
    let mut areas = vec![0_i32; width as usize];
    let mut covers = vec![0_i32; width as usize + 1];
    let mut framebuffer = Framebuffer::new(config.target_width, config.target_height);
    for y in 0..config.target_height {
        areas.fill(0);
        covers.fill(0);
        let mut carried = 0;
        for segment in segments.iter().filter(|s| !s.is_none()) {
            let row = (segment.tile_y() << TILE_HEIGHT_SHIFT) + segment.local_y() as i32;
            if row != y as i32 {
                continue;
            }
            let x = (segment.tile_x() << TILE_WIDTH_SHIFT) + segment.local_x() as i32;
            if x < 0 {
                carried += segment.cover();
            } else if x < width as i32 {
                areas[x as usize] += segment.area();
                covers[x as usize + 1] += segment.cover();
            }
        }
        let mut cover = carried;
        for x in 0..width {
            cover += covers[x as usize];
            let area = areas[x as usize];
            let coverage = (cover as f32 * COVER_SCALE + area as f32 * AREA_SCALE).clamp(0.0, 1.0);
            framebuffer.set(x, y, (coverage * 255.0).round() as u8);
        }
    }
    framebuffer
}

/// Asserts two framebuffers are identical, reporting the first differing pixel.
pub fn assert_framebuffers_eq(actual: &Framebuffer, expected: &Framebuffer) {
    assert_eq!(
        (actual.width(), actual.height()),
        (expected.width(), expected.height())
    );
    for y in 0..actual.height() {
        for x in 0..actual.width() {
            assert_eq!(
                actual.get(x, y),
                expected.get(x, y),
                "pixel ({x}, {y}) differs"
            );
        }
    }
}
