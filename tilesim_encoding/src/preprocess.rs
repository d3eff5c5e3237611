// Copyright 2026 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Biasing and sorting of the segment stream.

use crate::segment::PackedSegment;

/// Offset added to every `tile_x` before sorting.
///
/// Input is expected to span at most ±255 tiles horizontally, so biased values
/// stay in `1..=511`: non-negative, and far below [`PackedSegment::MAX_TILE_X`].
pub const TILE_X_BIAS: i32 = 256;

/// Shifts `tile_x` by [`TILE_X_BIAS`] and re-encodes the segment.
#[inline]
pub const fn bias_segment(segment: PackedSegment) -> PackedSegment {
    segment.with_tile_x(segment.tile_x() + TILE_X_BIAS)
}

/// A segment sequence ready for rasterization.
///
/// Segments with a negative tile row have been dropped and every other segment
/// biased, then the whole sequence sorted by its raw `u64` value. Terminators end
/// up last, each tile row forms one contiguous run, and inside a row segments are
/// ordered by tile column, then layer, then local row and column. This ordering is the only index the rasterizer has.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SortedSegments {
    segments: Vec<PackedSegment>,
}

impl SortedSegments {
    /// Biases and sorts `segments`, reusing the allocation.
    ///
    /// Segments with a negative tile row are dropped: the sign bit of `tile_y`
    /// would sort them after every other row.
    pub fn new(mut segments: Vec<PackedSegment>) -> Self {
        let len = segments.len();
        segments.retain(|segment| segment.is_none() || segment.tile_y() >= 0);
        let negative_rows = len - segments.len();
        if negative_rows > 0 {
            log::warn!("Dropped {negative_rows} segments with a negative tile row");
        }
        let mut terminators = 0_usize;
        for segment in &mut segments {
            *segment = bias_segment(*segment);
            if segment.is_none() {
                terminators += 1;
            }
        }
        segments.sort_unstable();
        log::debug!(
            "Preprocessed {} segments ({terminators} terminators)",
            segments.len()
        );
        Self { segments }
    }

    #[inline]
    pub fn as_slice(&self) -> &[PackedSegment] {
        &self.segments
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PackedSegment> {
        self.segments.iter()
    }

    pub fn into_inner(self) -> Vec<PackedSegment> {
        self.segments
    }
}

impl From<Vec<PackedSegment>> for SortedSegments {
    fn from(segments: Vec<PackedSegment>) -> Self {
        Self::new(segments)
    }
}

impl FromIterator<PackedSegment> for SortedSegments {
    fn from_iter<I: IntoIterator<Item = PackedSegment>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
