// Copyright 2026 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tilesim is a CPU simulator of a cooperative tile rasterization compute kernel.
//!
//! The input is a stream of packed pixel segments: 64-bit words, each carrying
//! the signed area and cover a flattened path contributes to one pixel of an
//! 8x8 tile. The segments are biased and sorted (see
//! [`SortedSegments`]), then rasterized by a simulated compute dispatch with one
//! workgroup per row of tiles (see [`tilesim_shaders::cpu`]). The result is a
//! single channel coverage [`Framebuffer`].
//!
//! ```
//! use tilesim::{PackedSegment, RasterConfig, Renderer};
//!
//! let renderer = Renderer::new(RasterConfig::new(16, 8));
//! // Full coverage entering the row left of the image.
//! let framebuffer = renderer
//!     .render(vec![PackedSegment::from_pixel(-1, 3, 0, 0, 16)])
//!     .unwrap();
//! assert_eq!(framebuffer.get(15, 3), Some(255));
//! assert_eq!(framebuffer.get(15, 4), Some(0));
//! ```
//!
//! # Features
//!
//! - `image` (enabled by default): Convert framebuffers into [`image`] buffers.

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

pub mod load;

use std::io::Read;

use thiserror::Error;

pub use tilesim_encoding::{PackedSegment, RasterConfig, SegmentFields, SortedSegments};
pub use tilesim_shaders::cpu::{DispatchError, DispatchStats, Framebuffer};

#[cfg(feature = "image")]
pub use tilesim_shaders::image;

pub use tilesim_encoding;
pub use tilesim_shaders;

/// Errors that can occur in Tilesim.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The segment stream ended in the middle of a 64-bit word.
    #[error("Segment data of {len} bytes is not a whole number of 64-bit words")]
    TruncatedInput { len: usize },
    /// Failed to read the segment stream.
    #[error("Failed to read segment data")]
    Io(#[from] std::io::Error),
    /// The simulated dispatch hit a barrier in non-uniform control flow.
    #[error("Dispatch failed")]
    Dispatch(#[from] DispatchError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Rasterizes segment streams into framebuffers of a fixed size.
#[derive(Clone, Debug)]
pub struct Renderer {
    config: RasterConfig,
}

static_assertions::assert_impl_all!(Renderer: Send, Sync);

impl Renderer {
    pub fn new(config: RasterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RasterConfig {
        &self.config
    }

    /// Biases, sorts and rasterizes `segments`.
    pub fn render(&self, segments: Vec<PackedSegment>) -> Result<Framebuffer> {
        self.render_sorted(&SortedSegments::new(segments))
    }

    /// Rasterizes segments that have already been preprocessed.
    pub fn render_sorted(&self, segments: &SortedSegments) -> Result<Framebuffer> {
        let config = &self.config;
        let mut framebuffer = Framebuffer::new(config.target_width, config.target_height);
        let stats = tilesim_shaders::cpu::tile_raster(config, segments, &mut framebuffer)?;
        log::debug!(
            "Rasterized {} segments into {}x{} pixels: {} workgroups, {} phases",
            segments.len(),
            framebuffer.width(),
            framebuffer.height(),
            stats.workgroups,
            stats.phases
        );
        Ok(framebuffer)
    }

    /// Rasterizes raw segment words.
    pub fn render_words(&self, words: &[u64]) -> Result<Framebuffer> {
        let segments: &[PackedSegment] = bytemuck::cast_slice(words);
        self.render(segments.to_vec())
    }

    /// Rasterizes a flat buffer of little-endian segment words.
    pub fn render_bytes(&self, bytes: &[u8]) -> Result<Framebuffer> {
        self.render(load::segments_from_le_bytes(bytes)?)
    }

    /// Reads a little-endian segment stream to the end and rasterizes it.
    pub fn render_reader(&self, reader: impl Read) -> Result<Framebuffer> {
        self.render(load::read_segments(reader)?)
    }
}
