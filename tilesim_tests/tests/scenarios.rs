// Copyright 2026 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End to end rasterization of small hand-made segment streams.

use tilesim::{PackedSegment, RasterConfig, Renderer};
use tilesim_tests::{render, to_le_bytes, TestParams};

#[test]
fn single_full_area_pixel() {
    let segment = PackedSegment::new(false, 0, 0, 0, 0, 0, 256, 0);
    let framebuffer = render(&[segment], &TestParams::new("single_full_area_pixel", 32, 32)).unwrap();
    assert_eq!(framebuffer.get(0, 0), Some(255));
    for y in 0..framebuffer.height() {
        for x in 0..framebuffer.width() {
            if (x, y) != (0, 0) {
                assert_eq!(framebuffer.get(x, y), Some(0), "pixel ({x}, {y})");
            }
        }
    }
}

#[test]
fn single_full_cover_segment() {
    let segment = PackedSegment::new(false, 0, 0, 0, 0, 0, 0, 16);
    let framebuffer =
        render(&[segment], &TestParams::new("single_full_cover_segment", 40, 16)).unwrap();
    // Cover applies to every pixel right of the segment's own, across tiles.
    assert_eq!(framebuffer.get(0, 0), Some(0));
    for x in 1..40 {
        assert_eq!(framebuffer.get(x, 0), Some(255), "pixel ({x}, 0)");
    }
    for y in 1..16 {
        for x in 0..40 {
            assert_eq!(framebuffer.get(x, y), Some(0), "pixel ({x}, {y})");
        }
    }
}

#[test]
fn empty_streams() {
    let params = TestParams::new("empty_streams", 33, 20);
    for segments in [&[][..], &[PackedSegment::terminator()][..]] {
        let framebuffer = render(segments, &params).unwrap();
        assert_eq!(framebuffer.width(), 33);
        assert_eq!(framebuffer.height(), 24);
        assert!(framebuffer.data().iter().all(|&v| v == 0));
    }
}

#[test]
fn terminator_hides_nothing() {
    // A terminator stops scanning only where it sorts, which is after all rows.
    let segments = [
        PackedSegment::terminator(),
        PackedSegment::from_pixel(12, 20, 0, 256, 0),
        PackedSegment::terminator(),
    ];
    let framebuffer = render(&segments, &TestParams::new("terminator_hides_nothing", 24, 24)).unwrap();
    assert_eq!(framebuffer.get(12, 20), Some(255));
}

#[test]
fn negative_rows_do_not_disturb_other_rows() {
    let params = TestParams::new("negative_rows", 16, 8);
    let framebuffer = render(
        &[
            PackedSegment::from_pixel(0, 0, 0, 256, 0),
            PackedSegment::from_pixel(2, -8, 0, 256, 0),
        ],
        &params,
    )
    .unwrap();
    assert_eq!(framebuffer.get(0, 0), Some(255));
    let lit = framebuffer.data().iter().filter(|&&v| v != 0).count();
    assert_eq!(lit, 1);

    // The last populated row does not pick up stray negative rows either.
    let params = TestParams::new("negative_rows_last_row", 16, 16);
    let framebuffer = render(
        &[
            PackedSegment::from_pixel(1, 12, 0, 128, 0),
            PackedSegment::from_pixel(1, -3, 0, 128, 0),
            PackedSegment::from_pixel(5, -20, 0, 0, 16),
        ],
        &params,
    )
    .unwrap();
    assert_eq!(framebuffer.get(1, 12), Some(128));
    let lit = framebuffer.data().iter().filter(|&&v| v != 0).count();
    assert_eq!(lit, 1);
}

#[test]
fn rendering_is_idempotent() {
    let segments = tilesim_tests::random_segments(7, 3_000, 64, 48);
    let bytes = to_le_bytes(&segments);
    let renderer = Renderer::new(RasterConfig::new(64, 48));
    let first = renderer.render_bytes(&bytes).unwrap();
    let second = renderer.render_bytes(&bytes).unwrap();
    assert_eq!(first, second);
}

#[test]
fn rgb_output_replicates_coverage() {
    let segments = [PackedSegment::from_pixel(1, 0, 0, 64, 0)];
    let framebuffer = render(&segments, &TestParams::new("rgb_output", 8, 8)).unwrap();
    let rgb = framebuffer.to_rgb8();
    assert_eq!(rgb.len(), 8 * 8 * 3);
    // 64 / 256 * 255 = 63.75
    assert_eq!(&rgb[3..6], &[64, 64, 64]);
    assert_eq!(&rgb[..3], &[0, 0, 0]);

    let image = framebuffer.to_rgb_image();
    assert_eq!(image.dimensions(), (8, 8));
    assert_eq!(image.get_pixel(1, 0).0, [64, 64, 64]);
}
