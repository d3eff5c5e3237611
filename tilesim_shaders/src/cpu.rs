// Copyright 2026 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Support for CPU implementations of compute shaders.
//!
//! Note that this is a simulation meant for testing and debugging the
//! cooperative algorithms; invocations are interleaved on a single thread rather
//! than run in parallel.

// Allow un-idiomatic Rust to more closely match shaders
#![expect(
    clippy::needless_range_loop,
    reason = "Keeps code easily comparable to GPU shaders"
)]

pub mod dispatch;
mod framebuffer;
mod tile_raster;

pub use dispatch::{dispatch, ComputeKernel, Dim3, DispatchError, DispatchStats, Step};
pub use framebuffer::Framebuffer;
pub use tile_raster::{
    tile_raster, tile_row_start, TileRasterizer, TileRowInvocation, TileRowSharedData,
};
