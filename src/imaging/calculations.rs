//! Pure calculation functions for render geometry.
//!
//! All functions here are pure and testable without any I/O or images.
//!
//! ## Rounding
//!
//! Computed *dimensions* are rounded half-to-even (`f64::round_ties_even`)
//! and never drop below one pixel. Computed *offsets* (crop origin, letterbox
//! placement) truncate, so odd remainders bias content toward the top-left.

use super::params::Anchor;

/// A crop rectangle inside the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Scale one dimension, rounding half-to-even, with a floor of 1 pixel.
pub fn scale_dimension(size: u32, scale: f64) -> u32 {
    ((size as f64 * scale).round_ties_even() as u32).max(1)
}

/// Output dimensions of a resize.
///
/// With `constrain`, a single factor `min(tw / sw, th / sh)` is applied to
/// both axes, capped at `1.0` unless `upscale`. Without it, each axis goes to
/// its target independently, capped at the source size unless `upscale`.
///
/// ```text
/// 400x300 into 200x200, constrained   → 200x150
/// 100x100 into 500x500, no upscale    → 100x100
/// 100x100 into 500x500, upscale       → 500x500
/// 400x300 into 200x200, unconstrained → 200x200
/// ```
pub fn resize_dimensions(
    source: (u32, u32),
    target: (u32, u32),
    constrain: bool,
    upscale: bool,
) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;

    if constrain {
        let mut scale = (tgt_w as f64 / src_w as f64).min(tgt_h as f64 / src_h as f64);
        if !upscale {
            scale = scale.min(1.0);
        }
        (
            scale_dimension(src_w, scale).min(tgt_w),
            scale_dimension(src_h, scale).min(tgt_h),
        )
    } else if upscale {
        (tgt_w, tgt_h)
    } else {
        (tgt_w.min(src_w), tgt_h.min(src_h))
    }
}

/// The region of `source` to crop so that resampling it to `target` fills
/// the target without distortion.
///
/// `bleed` trims that fraction of each dimension from every edge first;
/// the largest box with the target's aspect ratio is then placed inside what
/// remains according to `anchor`.
pub fn crop_box(source: (u32, u32), target: (u32, u32), bleed: f64, anchor: Anchor) -> CropBox {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;

    let (bleed_x, live_w) = live_span(src_w, bleed);
    let (bleed_y, live_h) = live_span(src_h, bleed);

    // live_w / live_h >= tgt_w / tgt_h, without floating point
    let live_is_wider = live_w as u64 * tgt_h as u64 >= tgt_w as u64 * live_h as u64;
    let aspect = tgt_w as f64 / tgt_h as f64;

    let (width, height) = if live_is_wider {
        // Full live height, trim the sides
        (scale_dimension(live_h, aspect).min(live_w), live_h)
    } else {
        // Full live width, trim top and bottom
        (live_w, scale_dimension(live_w, 1.0 / aspect).min(live_h))
    };

    CropBox {
        x: bleed_x + ((live_w - width) as f64 * anchor.x) as u32,
        y: bleed_y + ((live_h - height) as f64 * anchor.y) as u32,
        width,
        height,
    }
}

/// Bleed offset and remaining span along one axis.
fn live_span(size: u32, bleed: f64) -> (u32, u32) {
    let trim = (size as f64 * bleed).round_ties_even() as u32;
    let live = size.saturating_sub(trim.saturating_mul(2)).max(1);
    (trim.min(size - live), live)
}

/// Top-left position that centres `content` on `canvas`.
pub fn letterbox_offset(canvas: (u32, u32), content: (u32, u32)) -> (u32, u32) {
    (
        canvas.0.saturating_sub(content.0) / 2,
        canvas.1.saturating_sub(content.1) / 2,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // resize_dimensions tests
    // =========================================================================

    #[test]
    fn resize_constrained_landscape() {
        assert_eq!(resize_dimensions((400, 300), (200, 200), true, false), (200, 150));
    }

    #[test]
    fn resize_constrained_portrait() {
        assert_eq!(resize_dimensions((300, 400), (200, 200), true, false), (150, 200));
    }

    #[test]
    fn resize_never_upscales_by_default() {
        assert_eq!(resize_dimensions((100, 100), (500, 500), true, false), (100, 100));
    }

    #[test]
    fn resize_upscales_when_allowed() {
        assert_eq!(resize_dimensions((100, 100), (500, 500), true, true), (500, 500));
    }

    #[test]
    fn resize_constrained_upscale_keeps_aspect() {
        assert_eq!(resize_dimensions((100, 50), (500, 500), true, true), (500, 250));
    }

    #[test]
    fn resize_unconstrained_stretches() {
        assert_eq!(resize_dimensions((400, 300), (200, 250), false, false), (200, 250));
    }

    #[test]
    fn resize_unconstrained_caps_each_axis() {
        assert_eq!(resize_dimensions((400, 100), (200, 250), false, false), (200, 100));
    }

    #[test]
    fn resize_unconstrained_upscale_is_exact() {
        assert_eq!(resize_dimensions((40, 10), (200, 250), false, true), (200, 250));
    }

    #[test]
    fn resize_rounds_half_to_even() {
        // 5 * 0.5 = 2.5 → 2; 7 * 0.5 = 3.5 → 4
        assert_eq!(resize_dimensions((10, 5), (5, 5), true, false), (5, 2));
        assert_eq!(resize_dimensions((10, 7), (5, 5), true, false), (5, 4));
    }

    #[test]
    fn resize_never_returns_zero() {
        assert_eq!(resize_dimensions((1000, 1), (10, 10), true, false), (10, 1));
    }

    // =========================================================================
    // crop_box tests
    // =========================================================================

    #[test]
    fn crop_same_aspect_takes_everything() {
        let b = crop_box((100, 100), (50, 50), 0.0, Anchor::CENTER);
        assert_eq!(b, CropBox { x: 0, y: 0, width: 100, height: 100 });
    }

    #[test]
    fn crop_wide_source_trims_sides() {
        let b = crop_box((200, 100), (50, 50), 0.0, Anchor::CENTER);
        assert_eq!(b, CropBox { x: 50, y: 0, width: 100, height: 100 });
    }

    #[test]
    fn crop_tall_source_trims_top_and_bottom() {
        let b = crop_box((100, 200), (40, 20), 0.0, Anchor::CENTER);
        assert_eq!(b, CropBox { x: 0, y: 75, width: 100, height: 50 });
    }

    #[test]
    fn crop_anchor_moves_box() {
        let b = crop_box((200, 100), (50, 50), 0.0, Anchor::new(0.0, 0.0));
        assert_eq!(b.x, 0);
        let b = crop_box((200, 100), (50, 50), 0.0, Anchor::new(1.0, 1.0));
        assert_eq!(b.x, 100);
    }

    #[test]
    fn crop_bleed_trims_edges() {
        let b = crop_box((100, 100), (50, 50), 0.1, Anchor::CENTER);
        assert_eq!(b, CropBox { x: 10, y: 10, width: 80, height: 80 });
    }

    #[test]
    fn crop_odd_remainder_biases_top_left() {
        // 101 wide, 100 tall → 1 spare column, offset truncates to 0
        let b = crop_box((101, 100), (10, 10), 0.0, Anchor::CENTER);
        assert_eq!(b, CropBox { x: 0, y: 0, width: 100, height: 100 });
    }

    #[test]
    fn crop_single_pixel_source() {
        let b = crop_box((1, 1), (300, 20), 0.0, Anchor::CENTER);
        assert_eq!(b, CropBox { x: 0, y: 0, width: 1, height: 1 });
    }

    #[test]
    fn crop_heavy_bleed_on_tiny_source_stays_inside() {
        let b = crop_box((2, 2), (10, 10), 0.49, Anchor::CENTER);
        assert!(b.x + b.width <= 2);
        assert!(b.y + b.height <= 2);
        assert!(b.width >= 1 && b.height >= 1);
    }

    #[test]
    fn crop_box_stays_inside_source() {
        for source in [(1, 1), (3, 7), (640, 480), (480, 640), (1000, 3)] {
            for target in [(1, 1), (50, 50), (160, 90), (9, 16)] {
                for bleed in [0.0, 0.2, 0.45] {
                    let b = crop_box(source, target, bleed, Anchor::CENTER);
                    assert!(b.width >= 1 && b.height >= 1);
                    assert!(b.x + b.width <= source.0, "{source:?} {target:?} {bleed}");
                    assert!(b.y + b.height <= source.1, "{source:?} {target:?} {bleed}");
                }
            }
        }
    }

    // =========================================================================
    // letterbox_offset tests
    // =========================================================================

    #[test]
    fn letterbox_centres_content() {
        assert_eq!(letterbox_offset((200, 200), (200, 150)), (0, 25));
    }

    #[test]
    fn letterbox_odd_padding_truncates() {
        assert_eq!(letterbox_offset((200, 200), (199, 150)), (0, 25));
        assert_eq!(letterbox_offset((200, 201), (200, 150)), (0, 25));
    }
}
