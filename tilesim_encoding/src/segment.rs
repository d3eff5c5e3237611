// Copyright 2026 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The 64-bit packed pixel segment.

use bytemuck::{Pod, Zeroable};
use static_assertions::{assert_eq_size, const_assert_eq};

use crate::config::{TILE_HEIGHT, TILE_HEIGHT_SHIFT, TILE_WIDTH, TILE_WIDTH_SHIFT};

/// Position of one field inside the packed word.
#[derive(Clone, Copy)]
struct Field {
    shift: u32,
    bits: u32,
}

impl Field {
    /// The field placed directly above `self`.
    const fn next(self, bits: u32) -> Self {
        Self {
            shift: self.shift + self.bits,
            bits,
        }
    }

    const fn mask(self) -> u64 {
        (1 << self.bits) - 1
    }

    #[inline(always)]
    const fn get(self, raw: u64) -> u64 {
        (raw >> self.shift) & self.mask()
    }

    #[inline(always)]
    const fn get_signed(self, raw: u64) -> i32 {
        let unused = 64 - self.bits;
        (((self.get(raw) << unused) as i64) >> unused) as i32
    }

    #[inline(always)]
    const fn put(self, raw: u64, value: u64) -> u64 {
        (raw & !(self.mask() << self.shift)) | ((value & self.mask()) << self.shift)
    }
}

// Least significant first. The order is what makes a plain numeric sort of the
// raw words group segments by row, then tile, then layer, then pixel.
const COVER: Field = Field { shift: 0, bits: 6 };
const AREA: Field = COVER.next(10);
const LOCAL_X: Field = AREA.next(TILE_WIDTH_SHIFT);
const LOCAL_Y: Field = LOCAL_X.next(TILE_HEIGHT_SHIFT);
const LAYER: Field = LOCAL_Y.next(16);
const TILE_X: Field = LAYER.next(16 - TILE_WIDTH_SHIFT);
const TILE_Y: Field = TILE_X.next(15 - TILE_HEIGHT_SHIFT);
const IS_NONE: Field = TILE_Y.next(1);

const_assert_eq!(IS_NONE.shift + IS_NONE.bits, 64);
const_assert_eq!(TILE_X.bits, 13);
const_assert_eq!(TILE_Y.bits, 12);

/// A pixel segment packed into a single `u64`.
///
/// Fields from least to most significant bit:
///
/// | field     | bits | signed |
/// |-----------|------|--------|
/// | `cover`   | 6    | yes    |
/// | `area`    | 10   | yes    |
/// | `local_x` | 3    | no     |
/// | `local_y` | 3    | no     |
/// | `layer`   | 16   | no     |
/// | `tile_x`  | 13   | yes    |
/// | `tile_y`  | 12   | yes    |
/// | `is_none` | 1    | no     |
///
/// Ordering compares the raw words. As long as `tile_x` and `tile_y` are
/// non-negative this is the same as ordering by
/// `(is_none, tile_y, tile_x, layer, local_y, local_x, area, cover)`.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Zeroable, Pod)]
#[repr(transparent)]
pub struct PackedSegment(u64);

assert_eq_size!(PackedSegment, u64);

/// The decoded fields of a [`PackedSegment`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SegmentFields {
    pub is_none: bool,
    pub tile_y: i32,
    pub tile_x: i32,
    pub layer: u32,
    pub local_y: u32,
    pub local_x: u32,
    pub area: i32,
    pub cover: i32,
}

impl PackedSegment {
    /// Packs a segment from its fields.
    ///
    /// Every value is truncated to the width of its field; callers are responsible
    /// for keeping values in range.
    #[expect(clippy::too_many_arguments, reason = "One argument per packed field")]
    #[inline]
    pub const fn new(
        is_none: bool,
        tile_y: i32,
        tile_x: i32,
        layer: u32,
        local_y: u32,
        local_x: u32,
        area: i32,
        cover: i32,
    ) -> Self {
        let mut raw = 0;
        raw = IS_NONE.put(raw, is_none as u64);
        raw = TILE_Y.put(raw, tile_y as u64);
        raw = TILE_X.put(raw, tile_x as u64);
        raw = LAYER.put(raw, layer as u64);
        raw = LOCAL_Y.put(raw, local_y as u64);
        raw = LOCAL_X.put(raw, local_x as u64);
        raw = AREA.put(raw, area as u64);
        raw = COVER.put(raw, cover as u64);
        Self(raw)
    }

    /// The terminator record: `is_none` set, every other field zero.
    ///
    /// It sorts after every live segment.
    #[inline]
    pub const fn terminator() -> Self {
        Self(IS_NONE.put(0, 1))
    }

    /// Creates a live segment for the pixel at `(x, y)`.
    ///
    /// Negative coordinates land in negative tiles; the local position is always
    /// within the tile.
    pub const fn from_pixel(x: i32, y: i32, layer: u32, area: i32, cover: i32) -> Self {
        Self::new(
            false,
            y >> TILE_HEIGHT_SHIFT,
            x >> TILE_WIDTH_SHIFT,
            layer,
            y as u32 & (TILE_HEIGHT - 1),
            x as u32 & (TILE_WIDTH - 1),
            area,
            cover,
        )
    }

    pub fn from_fields(fields: SegmentFields) -> Self {
        Self::new(
            fields.is_none,
            fields.tile_y,
            fields.tile_x,
            fields.layer,
            fields.local_y,
            fields.local_x,
            fields.area,
            fields.cover,
        )
    }

    pub fn fields(self) -> SegmentFields {
        SegmentFields {
            is_none: self.is_none(),
            tile_y: self.tile_y(),
            tile_x: self.tile_x(),
            layer: self.layer(),
            local_y: self.local_y(),
            local_x: self.local_x(),
            area: self.area(),
            cover: self.cover(),
        }
    }

    #[inline(always)]
    pub const fn from_bits(raw: u64) -> Self {
        Self(raw)
    }

    #[inline(always)]
    pub const fn to_bits(self) -> u64 {
        self.0
    }

    /// Returns a copy with `tile_x` replaced, all other bits untouched.
    #[inline]
    pub const fn with_tile_x(self, tile_x: i32) -> Self {
        Self(TILE_X.put(self.0, tile_x as u64))
    }

    /// Whether this is a terminator rather than a live segment.
    #[inline(always)]
    pub const fn is_none(self) -> bool {
        IS_NONE.get(self.0) != 0
    }

    #[inline(always)]
    pub const fn tile_y(self) -> i32 {
        TILE_Y.get_signed(self.0)
    }

    #[inline(always)]
    pub const fn tile_x(self) -> i32 {
        TILE_X.get_signed(self.0)
    }

    /// Draw order of the path that produced this segment.
    #[inline(always)]
    pub const fn layer(self) -> u32 {
        LAYER.get(self.0) as u32
    }

    #[inline(always)]
    pub const fn local_y(self) -> u32 {
        LOCAL_Y.get(self.0) as u32
    }

    #[inline(always)]
    pub const fn local_x(self) -> u32 {
        LOCAL_X.get(self.0) as u32
    }

    /// Fixed-point signed area, 256 per fully covered pixel.
    #[inline(always)]
    pub const fn area(self) -> i32 {
        AREA.get_signed(self.0)
    }

    /// Fixed-point cover, 16 per fully covered pixel row.
    #[inline(always)]
    pub const fn cover(self) -> i32 {
        COVER.get_signed(self.0)
    }

    /// Largest `tile_x` the field can hold.
    pub const MAX_TILE_X: i32 = (1 << (TILE_X.bits - 1)) - 1;
    /// Largest `tile_y` the field can hold.
    pub const MAX_TILE_Y: i32 = (1 << (TILE_Y.bits - 1)) - 1;
}

impl From<u64> for PackedSegment {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl From<PackedSegment> for u64 {
    fn from(segment: PackedSegment) -> Self {
        segment.0
    }
}

impl core::fmt::Debug for PackedSegment {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PackedSegment")
            .field("is_none", &self.is_none())
            .field("tile_y", &self.tile_y())
            .field("tile_x", &self.tile_x())
            .field("layer", &self.layer())
            .field("local_y", &self.local_y())
            .field("local_x", &self.local_x())
            .field("area", &self.area())
            .field("cover", &self.cover())
            .finish()
    }
}
