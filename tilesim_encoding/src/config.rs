// Copyright 2026 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Width of a tile in pixels.
pub const TILE_WIDTH: u32 = 8;
pub const TILE_WIDTH_SHIFT: u32 = TILE_WIDTH.trailing_zeros();
/// Height of a tile in pixels.
pub const TILE_HEIGHT: u32 = 8;
pub const TILE_HEIGHT_SHIFT: u32 = TILE_HEIGHT.trailing_zeros();

/// Scale from the fixed-point cover of a segment to pixel coverage.
pub const COVER_SCALE: f32 = 1.0 / 16.0;
/// Scale from the fixed-point area of a segment to pixel coverage.
pub const AREA_SCALE: f32 = 1.0 / 256.0;

/// Invocations per workgroup of the tile row rasterizer, one per scan row of a tile.
const TILE_RASTER_WG: WorkgroupSize = (TILE_HEIGHT, 1, 1);

pub type WorkgroupSize = (u32, u32, u32);

/// Computed sizes for all dispatches.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct WorkgroupCounts {
    /// One workgroup per row of tiles.
    pub tile_raster: WorkgroupSize,
}

impl WorkgroupCounts {
    pub fn new(height_in_tiles: u32) -> Self {
        Self {
            tile_raster: (height_in_tiles, 1, 1),
        }
    }
}

/// Render configuration derived from the size of the target image.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RasterConfig {
    /// Width of the target in pixels.
    pub target_width: u32,
    /// Height of the target in pixels, rounded up to whole tile rows.
    pub target_height: u32,
    /// Width of the target in tiles.
    pub width_in_tiles: u32,
    /// Height of the target in tiles.
    pub height_in_tiles: u32,
    /// Workgroup counts for all compute dispatches.
    pub workgroup_counts: WorkgroupCounts,
    /// Local size of the tile row rasterizer's workgroups.
    pub workgroup_size: WorkgroupSize,
}

impl RasterConfig {
    /// Creates the configuration for an image of `width` by `height` pixels.
    ///
    /// The target height is padded up to a multiple of [`TILE_HEIGHT`], since every
    /// workgroup writes a full band of tile rows. The width is kept as is; the last
    /// partial tile column is rasterized but clipped on output.
    pub fn new(width: u32, height: u32) -> Self {
        let width_in_tiles = width.next_multiple_of(TILE_WIDTH) / TILE_WIDTH;
        let height_in_tiles = height.next_multiple_of(TILE_HEIGHT) / TILE_HEIGHT;
        Self {
            target_width: width,
            target_height: height_in_tiles * TILE_HEIGHT,
            width_in_tiles,
            height_in_tiles,
            workgroup_counts: WorkgroupCounts::new(height_in_tiles),
            workgroup_size: TILE_RASTER_WG,
        }
    }
}
