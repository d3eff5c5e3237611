// Copyright 2026 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Packed segment encoding for the tilesim tile rasterizer.
//!
//! A segment is one 64-bit word carrying a signed area/cover contribution for a
//! single pixel of an 8x8 tile. This crate owns the bit layout of that word
//! ([`PackedSegment`]), the preprocessing that turns a raw stream of them into
//! the sorted sequence the rasterizer consumes ([`SortedSegments`]), and the
//! image/tile configuration shared with the kernels ([`RasterConfig`]).

// LINEBENDER LINT SET - lib.rs - v2
// See https://linebender.org/wiki/canonical-lints/
// These lints aren't included in Cargo.toml because they
// shouldn't apply to examples and tests
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![forbid(unsafe_code)]

mod config;
mod preprocess;
mod segment;

pub use config::{
    RasterConfig, WorkgroupCounts, WorkgroupSize, AREA_SCALE, COVER_SCALE, TILE_HEIGHT,
    TILE_HEIGHT_SHIFT, TILE_WIDTH, TILE_WIDTH_SHIFT,
};
pub use preprocess::{bias_segment, SortedSegments, TILE_X_BIAS};
pub use segment::{PackedSegment, SegmentFields};
