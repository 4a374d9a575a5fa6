// Copyright 2025 the Shoal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Closed-interval geometry predicates over Kurbo types.
//!
//! Kurbo's [`Rect::contains`] is half-open. The partition treats every AABB as a
//! closed box, so two boxes that share an edge intersect and a point on an edge
//! is contained.

use kurbo::{Point, Rect};

/// Whether `rect` contains `p`, edges included.
#[inline]
pub fn rect_contains_point(rect: Rect, p: Point) -> bool {
    p.x >= rect.x0 && p.x <= rect.x1 && p.y >= rect.y0 && p.y <= rect.y1
}

/// Whether two rects overlap or touch.
#[inline]
pub fn rects_intersect(a: Rect, b: Rect) -> bool {
    !(b.x1 < a.x0 || b.x0 > a.x1 || b.y1 < a.y0 || a.y1 < b.y0)
}

/// Clip the closed segment `p1`–`p2` against `rect` (Liang–Barsky).
///
/// Returns the clipped endpoints, or `None` when the segment misses the rect.
/// A segment that only grazes an edge or corner yields a degenerate result.
pub fn clip_segment(p1: Point, p2: Point, rect: Rect) -> Option<(Point, Point)> {
    let d = p2 - p1;
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;
    let checks = [
        (-d.x, p1.x - rect.x0),
        (d.x, rect.x1 - p1.x),
        (-d.y, p1.y - rect.y0),
        (d.y, rect.y1 - p1.y),
    ];
    for (p, q) in checks {
        if p == 0.0 {
            // Parallel to this edge: reject only if outside it.
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            if t > t1 {
                return None;
            }
            if t > t0 {
                t0 = t;
            }
        } else {
            if t < t0 {
                return None;
            }
            if t < t1 {
                t1 = t;
            }
        }
    }
    Some((p1 + d * t0, p1 + d * t1))
}

/// Whether the closed segment `p1`–`p2` touches `rect`.
#[inline]
pub fn segment_intersects_rect(p1: Point, p2: Point, rect: Rect) -> bool {
    clip_segment(p1, p2, rect).is_some()
}

/// Whether every coordinate of `rect` is finite.
#[inline]
pub(crate) fn rect_is_finite(rect: Rect) -> bool {
    rect.x0.is_finite() && rect.y0.is_finite() && rect.x1.is_finite() && rect.y1.is_finite()
}
