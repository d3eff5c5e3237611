// Copyright 2026 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tile row rasterization.
//!
//! One workgroup rasterizes one row of 8x8 tiles, with one invocation per scan
//! row of the tile band. The workgroup walks the row left to right: for every
//! tile, all invocations cooperatively accumulate the area and cover of the
//! tile's segments into workgroup memory, then each invocation resolves its own
//! scan row into pixels and carries the remaining cover into the next tile.

use tilesim_encoding::{
    PackedSegment, RasterConfig, SortedSegments, AREA_SCALE, COVER_SCALE, TILE_HEIGHT,
    TILE_WIDTH, TILE_X_BIAS,
};

use super::dispatch::{dispatch, ComputeKernel, Dim3, DispatchError, DispatchStats, Step};
use super::Framebuffer;

const TILE_W: usize = TILE_WIDTH as usize;
const TILE_H: usize = TILE_HEIGHT as usize;

/// Invocations per workgroup; also the stride of each invocation's segment cursor.
const WG_SIZE: usize = TILE_H;

/// Workgroup memory of the tile row rasterizer.
#[derive(Clone, Debug)]
pub struct TileRowSharedData {
    /// Signed area of each pixel of the current tile.
    pub areas: [[i32; TILE_W]; TILE_H],
    /// Cover deltas of each scan row. Slot `x + 1` holds the cover of segments in
    /// pixel `x`; slot 0 holds the cover carried in from the left and slot
    /// `TILE_W` the cover leaving the tile on the right.
    pub covers: [[i32; TILE_W + 1]; TILE_H],
    /// Index of the first segment of this workgroup's tile row.
    pub group_index: usize,
}

impl Default for TileRowSharedData {
    fn default() -> Self {
        Self {
            areas: [[0; TILE_W]; TILE_H],
            covers: [[0; TILE_W + 1]; TILE_H],
            group_index: 0,
        }
    }
}

/// Where an invocation resumes after a barrier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Resume {
    Entry,
    Start,
    Accumulate { tile_x: u32 },
    Output { tile_x: u32 },
    Done,
}

#[derive(Clone, Debug)]
pub struct TileRowInvocation {
    tile_y: u32,
    local_y: usize,
    /// Next segment this invocation reads.
    index: usize,
    resume: Resume,
}

/// The tile row rasterizer kernel.
///
/// Dispatched with one workgroup of [`TILE_HEIGHT`] invocations per tile row; the
/// framebuffer is the dispatch context.
#[derive(Clone, Copy, Debug)]
pub struct TileRasterizer<'a> {
    segments: &'a [PackedSegment],
    width_in_tiles: u32,
}

impl<'a> TileRasterizer<'a> {
    pub const WORKGROUP_SIZE: Dim3 = Dim3::new(WG_SIZE as u32, 1, 1);

    pub fn new(config: &RasterConfig, segments: &'a SortedSegments) -> Self {
        Self {
            segments: segments.as_slice(),
            width_in_tiles: config.width_in_tiles,
        }
    }

    /// Move on to the tile at `tile_x`, or finish after the last tile.
    fn next_tile(&self, invocation: &mut TileRowInvocation, tile_x: u32) -> Step {
        if tile_x < self.width_in_tiles {
            invocation.resume = Resume::Accumulate { tile_x };
            Step::Barrier
        } else {
            invocation.resume = Resume::Done;
            Step::Done
        }
    }

    fn accumulate(
        &self,
        invocation: &mut TileRowInvocation,
        shared: &mut TileRowSharedData,
        tile_x: u32,
    ) {
        let tile_y = invocation.tile_y as i32;
        let biased_tile_x = tile_x as i32 + TILE_X_BIAS;
        while let Some(&segment) = self.segments.get(invocation.index) {
            if segment.is_none() || segment.tile_x() > biased_tile_x || segment.tile_y() > tile_y {
                break;
            }
            let x = segment.local_x() as usize;
            let y = segment.local_y() as usize;
            // Other invocations may hit the same cells; these would be atomic adds on
            // the GPU.
            if segment.tile_x() == biased_tile_x {
                shared.areas[y][x] += segment.area();
                shared.covers[y][x + 1] += segment.cover();
            } else {
                shared.covers[y][0] += segment.cover();
            }
            invocation.index += WG_SIZE;
        }
    }

    fn output(
        &self,
        invocation: &TileRowInvocation,
        shared: &mut TileRowSharedData,
        framebuffer: &mut Framebuffer,
        tile_x: u32,
    ) {
        let y = invocation.local_y;
        let pixel_y = invocation.tile_y * TILE_HEIGHT + y as u32;
        let mut cover = 0;
        for x in 0..TILE_W {
            let area = shared.areas[y][x];
            shared.areas[y][x] = 0;
            cover += shared.covers[y][x];
            shared.covers[y][x] = 0;

            let coverage = (cover as f32 * COVER_SCALE + area as f32 * AREA_SCALE).clamp(0.0, 1.0);
            let pixel_x = tile_x * TILE_WIDTH + x as u32;
            // Columns past the target width in the last tile are dropped.
            framebuffer.set(pixel_x, pixel_y, (coverage * 255.0).round() as u8);
        }
        shared.covers[y][0] = cover + shared.covers[y][TILE_W];
        shared.covers[y][TILE_W] = 0;
    }
}

impl ComputeKernel for TileRasterizer<'_> {
    type SharedData = TileRowSharedData;
    type Invocation = TileRowInvocation;
    type Context = Framebuffer;

    fn create_shared_data(&self) -> TileRowSharedData {
        TileRowSharedData::default()
    }

    fn invocation(&self, workgroup_id: Dim3, local_id: Dim3) -> TileRowInvocation {
        TileRowInvocation {
            tile_y: workgroup_id.x,
            local_y: local_id.x as usize,
            index: 0,
            resume: Resume::Entry,
        }
    }

    fn step(
        &self,
        invocation: &mut TileRowInvocation,
        shared: &mut TileRowSharedData,
        framebuffer: &mut Framebuffer,
    ) -> Step {
        match invocation.resume {
            Resume::Entry => {
                let y = invocation.local_y;
                shared.areas[y] = [0; TILE_W];
                shared.covers[y] = [0; TILE_W + 1];
                // Only the first invocation needs to locate the row.
                if y == 0 {
                    shared.group_index = tile_row_start(self.segments, invocation.tile_y as i32);
                }
                invocation.resume = Resume::Start;
                Step::Barrier
            }
            Resume::Start => {
                invocation.index = shared.group_index + invocation.local_y;
                self.next_tile(invocation, 0)
            }
            Resume::Accumulate { tile_x } => {
                self.accumulate(invocation, shared, tile_x);
                invocation.resume = Resume::Output { tile_x };
                Step::Barrier
            }
            Resume::Output { tile_x } => {
                self.output(invocation, shared, framebuffer, tile_x);
                self.next_tile(invocation, tile_x + 1)
            }
            Resume::Done => Step::Done,
        }
    }
}

/// Finds the index of the first segment of tile row `tile_y`.
///
/// `segments` must be sorted as by [`SortedSegments`]. Terminators compare
/// greater than every row. Returns `segments.len()` if the row has no segments.
pub fn tile_row_start(segments: &[PackedSegment], tile_y: i32) -> usize {
    let mut start = segments.len();
    let mut low = 0;
    let mut high = segments.len();
    while low < high {
        let mid = low + (high - low) / 2;
        let segment = segments[mid];
        if segment.is_none() || segment.tile_y() > tile_y {
            high = mid;
        } else if segment.tile_y() < tile_y {
            low = mid + 1;
        } else {
            // Keep looking for an earlier match.
            start = mid;
            high = mid;
        }
    }
    start
}

/// Rasterizes `segments` into `framebuffer`, one workgroup per tile row.
pub fn tile_raster(
    config: &RasterConfig,
    segments: &SortedSegments,
    framebuffer: &mut Framebuffer,
) -> Result<DispatchStats, DispatchError> {
    let kernel = TileRasterizer::new(config, segments);
    dispatch(
        config.workgroup_counts.tile_raster.into(),
        TileRasterizer::WORKGROUP_SIZE,
        &kernel,
        framebuffer,
    )
}
