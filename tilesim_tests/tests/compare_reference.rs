// Copyright 2026 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compare the cooperative kernel with the scanline reference rasterizer.

use tilesim::{PackedSegment, SortedSegments};
use tilesim_tests::{
    assert_framebuffers_eq, filled_rect, horizontal_lines, random_segments, reference_rasterize,
    render, vertical_lines, TestParams,
};

fn compare(segments: &[PackedSegment], params: &TestParams) {
    let actual = render(segments, params).unwrap();
    let expected = reference_rasterize(&params.config(), segments);
    assert_framebuffers_eq(&actual, &expected);
}

#[test]
fn random_scenes() {
    for (seed, width, height) in [(0, 64, 64), (1, 37, 21), (2, 8, 8), (3, 120, 16), (4, 9, 50)] {
        let segments = random_segments(seed, 4_000, width, height);
        compare(&segments, &TestParams::new(format!("random_{seed}"), width, height));
    }
}

#[test]
fn sparse_random_scene() {
    // Few segments, so most invocations run out of their row early.
    let segments = random_segments(11, 25, 48, 48);
    compare(&segments, &TestParams::new("sparse_random", 48, 48));
}

#[test]
fn vertical_lines_scene() {
    let params = TestParams::new("vertical_lines", 32, 24);
    let segments = vertical_lines(24, 10);
    compare(&segments, &params);

    let framebuffer = render(&segments, &params).unwrap();
    for y in 0..24 {
        for x in 0..32 {
            let expected = if x < 10 { 255 } else { 0 };
            assert_eq!(framebuffer.get(x, y), Some(expected), "pixel ({x}, {y})");
        }
    }
}

#[test]
fn horizontal_lines_scene() {
    let params = TestParams::new("horizontal_lines", 50, 32);
    let segments = horizontal_lines(32);
    compare(&segments, &params);

    let framebuffer = render(&segments, &params).unwrap();
    assert!(framebuffer.data().iter().all(|&v| v == 255));
}

#[test]
fn filled_rect_scene() {
    let params = TestParams::new("filled_rect", 40, 40);
    let segments = filled_rect(5, 3, 29, 30);
    compare(&segments, &params);

    let framebuffer = render(&segments, &params).unwrap();
    for y in 0..40 {
        for x in 0..40 {
            let inside = (5..29).contains(&x) && (3..30).contains(&y);
            let expected = if inside { 255 } else { 0 };
            assert_eq!(framebuffer.get(x, y), Some(expected), "pixel ({x}, {y})");
        }
    }
}

#[test]
fn rect_clipped_by_target() {
    let params = TestParams::new("rect_clipped", 20, 12);
    let segments = filled_rect(-30, 4, 60, 20);
    compare(&segments, &params);

    let framebuffer = render(&segments, &params).unwrap();
    assert_eq!(framebuffer.get(0, 3), Some(0));
    assert_eq!(framebuffer.get(0, 4), Some(255));
    assert_eq!(framebuffer.get(19, 15), Some(255));
}

#[test]
fn sorted_scene_renders_the_same() {
    // Preprocessing is not idempotent (it biases), so render the sorted words
    // through `render_sorted` directly.
    let params = TestParams::new("sorted_scene", 30, 30);
    let segments = random_segments(5, 1_000, 30, 30);
    let sorted = SortedSegments::new(segments.clone());
    let renderer = tilesim::Renderer::new(params.config());
    let from_sorted = renderer.render_sorted(&sorted).unwrap();
    assert_framebuffers_eq(&from_sorted, &render(&segments, &params).unwrap());
}
