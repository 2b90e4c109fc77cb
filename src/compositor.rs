//! # Trace compositor
//!
//! Clips a star's padded trace template against the output plane and blends
//! it in additively. The windowing computation is expressed as a tagged
//! result so the silent skip of a star whose trace cannot touch the plane is
//! a testable value rather than control flow.
//!
//! The copy window is derived from the star's rounded integer-pixel offset
//! `(intx, inty)` from the sweet spot: the template canvas is sampled at
//! `pad - offset` so a star displaced to the right samples the canvas
//! further to the left, sliding its trace across the subarray.

use ndarray::{s, ArrayView2, ArrayViewMut2};

use crate::constants::Magnitude;

/// Geometry of a padded template canvas.
///
/// `dim_x`/`dim_y` are the full canvas extents; `pad_x`/`pad_y` the offsets
/// of the subarray origin within the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateCanvas {
    pub pad_x: usize,
    pub pad_y: usize,
    pub dim_x: usize,
    pub dim_y: usize,
}

/// A clipped source/destination window pair, pixel-for-pixel aligned.
///
/// Source coordinates index the template canvas, destination coordinates the
/// output plane. Both rectangles have the same extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyRegion {
    pub src_x0: usize,
    pub src_x1: usize,
    pub src_y0: usize,
    pub src_y1: usize,
    pub dst_x0: usize,
    pub dst_y0: usize,
}

impl CopyRegion {
    pub fn width(&self) -> usize {
        self.src_x1 - self.src_x0
    }

    pub fn height(&self) -> usize {
        self.src_y1 - self.src_y0
    }
}

/// Outcome of the windowing computation for one star at one angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceWindow {
    /// The trace overlaps the plane; copy this region.
    Contribution(CopyRegion),
    /// The trace cannot touch the plane; skip the star, not an error.
    OutOfBounds,
}

/// Magnitude-to-flux-ratio conversion; the target itself scales to 1.
pub fn flux_scale(star_mag: Magnitude, target_mag: Magnitude) -> f64 {
    10f64.powf(-0.4 * (star_mag - target_mag))
}

/// Compute the clipped template window for a star offset by `(intx, inty)`
/// pixels from the sweet spot.
///
/// The unclipped window is `pad - offset .. pad - offset + plane extent` on
/// each axis. A window whose low edge lies beyond the canvas extent or whose
/// high edge is negative yields [`TraceWindow::OutOfBounds`]. Otherwise each
/// of the four boundaries is clamped independently against both the canvas
/// and the destination plane, and the destination offset is advanced by the
/// amount clipped off the low side so source and destination stay aligned.
///
/// Arguments
/// ---------
/// * `canvas`: padded template-canvas geometry
/// * `plane_width`, `plane_height`: output-plane extent in pixels
/// * `intx`, `inty`: rounded pixel offset of the star from the sweet spot
pub fn trace_window(
    canvas: &TemplateCanvas,
    plane_width: usize,
    plane_height: usize,
    intx: i64,
    inty: i64,
) -> TraceWindow {
    let mx0 = canvas.pad_x as i64 - intx;
    let mx1 = mx0 + plane_width as i64;
    let my0 = canvas.pad_y as i64 - inty;
    let my1 = my0 + plane_height as i64;

    if mx0 > canvas.dim_x as i64 || my0 > canvas.dim_y as i64 {
        return TraceWindow::OutOfBounds;
    }
    if mx1 < 0 || my1 < 0 {
        return TraceWindow::OutOfBounds;
    }

    let dst_x0 = (-mx0).max(0) as usize;
    let dst_y0 = (-my0).max(0) as usize;
    let src_x0 = mx0.max(0) as usize;
    let src_y0 = my0.max(0) as usize;
    let src_x1 = mx1.min(canvas.dim_x as i64) as usize;
    let src_y1 = my1.min(canvas.dim_y as i64) as usize;

    let width = (src_x1 - src_x0).min(plane_width - dst_x0);
    let height = (src_y1 - src_y0).min(plane_height - dst_y0);
    if width == 0 || height == 0 {
        return TraceWindow::OutOfBounds;
    }

    TraceWindow::Contribution(CopyRegion {
        src_x0,
        src_x1: src_x0 + width,
        src_y0,
        src_y1: src_y0 + height,
        dst_x0,
        dst_y0,
    })
}

/// Additively blend a clipped, flux-scaled template region into a plane.
///
/// Overlapping stars at the same angle sum their contributions; nothing is
/// overwritten.
pub fn accumulate(
    mut plane: ArrayViewMut2<f32>,
    template: ArrayView2<f32>,
    region: &CopyRegion,
    flux_scale: f64,
) {
    let src = template.slice(s![
        region.src_y0..region.src_y1,
        region.src_x0..region.src_x1
    ]);
    let mut dst = plane.slice_mut(s![
        region.dst_y0..region.dst_y0 + region.height(),
        region.dst_x0..region.dst_x0 + region.width()
    ]);
    dst.zip_mut_with(&src, |d, &s| *d += s * flux_scale as f32);
}

#[cfg(test)]
mod compositor_tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::Array2;

    // canvas 9 wide, 11 tall, subarray origin at (3, 4), plane 4x5
    const CANVAS: TemplateCanvas = TemplateCanvas {
        pad_x: 3,
        pad_y: 4,
        dim_x: 9,
        dim_y: 11,
    };
    const PLANE_W: usize = 4;
    const PLANE_H: usize = 5;

    /// Canvas whose pixel (y, x) holds the value 100*y + x, so any copied
    /// pixel identifies its source position.
    fn tagged_canvas() -> Array2<f32> {
        Array2::from_shape_fn((CANVAS.dim_y, CANVAS.dim_x), |(y, x)| {
            (100 * y + x) as f32
        })
    }

    fn window(intx: i64, inty: i64) -> TraceWindow {
        trace_window(&CANVAS, PLANE_W, PLANE_H, intx, inty)
    }

    #[test]
    fn test_flux_scale() {
        assert_relative_eq!(flux_scale(9.0, 9.0), 1.0);
        // five magnitudes fainter is a factor 100 dimmer
        assert_relative_eq!(flux_scale(14.0, 9.0), 0.01, epsilon = 1e-12);
        assert_relative_eq!(flux_scale(4.0, 9.0), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_centered_window_covers_plane() {
        match window(0, 0) {
            TraceWindow::Contribution(r) => {
                assert_eq!((r.src_x0, r.src_x1), (3, 7));
                assert_eq!((r.src_y0, r.src_y1), (4, 9));
                assert_eq!((r.dst_x0, r.dst_y0), (0, 0));
                assert_eq!((r.width(), r.height()), (PLANE_W, PLANE_H));
            }
            TraceWindow::OutOfBounds => panic!("centered window must contribute"),
        }
    }

    #[test]
    fn test_window_entirely_outside() {
        // low edge beyond the canvas extent
        assert_eq!(window(-7, 0), TraceWindow::OutOfBounds);
        assert_eq!(window(0, -8), TraceWindow::OutOfBounds);
        // high edge negative
        assert_eq!(window(8, 0), TraceWindow::OutOfBounds);
        assert_eq!(window(0, 10), TraceWindow::OutOfBounds);
    }

    #[test]
    fn test_window_clips_at_canvas_low_edge() {
        // star shifted so the sampled window starts left of the canvas
        match window(4, 0) {
            TraceWindow::Contribution(r) => {
                // src x: max(3-4, 0)=0 .. 3; dst picks up the clipped column
                assert_eq!((r.src_x0, r.src_x1), (0, 3));
                assert_eq!(r.dst_x0, 1);
                assert_eq!((r.src_y0, r.src_y1), (4, 9));
                assert_eq!(r.dst_y0, 0);
            }
            TraceWindow::OutOfBounds => panic!("partially visible trace must contribute"),
        }
    }

    #[test]
    fn test_window_clips_at_canvas_high_edge() {
        match window(-3, -3) {
            TraceWindow::Contribution(r) => {
                // src x: 6 .. min(10, 9) = 9, width 3 at dst 0
                assert_eq!((r.src_x0, r.src_x1), (6, 9));
                assert_eq!(r.dst_x0, 0);
                // src y: 7 .. min(12, 11) = 11, height 4 at dst 0
                assert_eq!((r.src_y0, r.src_y1), (7, 11));
                assert_eq!(r.dst_y0, 0);
            }
            TraceWindow::OutOfBounds => panic!("partially visible trace must contribute"),
        }
    }

    #[test]
    fn test_clipped_copy_stays_pixel_aligned() {
        let canvas = tagged_canvas();
        let mut plane = Array2::<f32>::zeros((PLANE_H, PLANE_W));

        let TraceWindow::Contribution(region) = window(4, -2) else {
            panic!("expected a contribution");
        };
        accumulate(plane.view_mut(), canvas.view(), &region, 1.0);

        // every written pixel must equal its aligned source pixel
        for y in 0..region.height() {
            for x in 0..region.width() {
                let expected = canvas[[region.src_y0 + y, region.src_x0 + x]];
                assert_relative_eq!(plane[[region.dst_y0 + y, region.dst_x0 + x]], expected);
            }
        }
        // and pixels outside the destination rectangle stay untouched
        let written = (region.width() * region.height()) as f32;
        let nonzero = plane.iter().filter(|&&v| v != 0.0).count() as f32;
        assert!(nonzero <= written);
    }

    #[test]
    fn test_accumulate_is_additive() {
        let canvas = Array2::<f32>::from_elem((CANVAS.dim_y, CANVAS.dim_x), 2.0);
        let mut plane = Array2::<f32>::zeros((PLANE_H, PLANE_W));

        let TraceWindow::Contribution(first) = window(1, 0) else {
            panic!("expected a contribution");
        };
        let TraceWindow::Contribution(second) = window(-1, 1) else {
            panic!("expected a contribution");
        };

        accumulate(plane.view_mut(), canvas.view(), &first, 1.0);
        accumulate(plane.view_mut(), canvas.view(), &second, 0.5);

        // a pixel covered by both stars holds the sum of both contributions
        let mut expected = Array2::<f32>::zeros((PLANE_H, PLANE_W));
        accumulate(expected.view_mut(), canvas.view(), &first, 1.0);
        let mut second_only = Array2::<f32>::zeros((PLANE_H, PLANE_W));
        accumulate(second_only.view_mut(), canvas.view(), &second, 0.5);
        for (p, (e, s)) in plane.iter().zip(expected.iter().zip(second_only.iter())) {
            assert_relative_eq!(*p, *e + *s);
        }
    }

    #[test]
    fn test_every_offset_in_range_is_safe() {
        // sweep offsets well past every boundary; any indexing error in the
        // clip arithmetic would panic inside accumulate
        let canvas = tagged_canvas();
        for intx in -15..15 {
            for inty in -18..18 {
                if let TraceWindow::Contribution(region) =
                    trace_window(&CANVAS, PLANE_W, PLANE_H, intx, inty)
                {
                    let mut plane = Array2::<f32>::zeros((PLANE_H, PLANE_W));
                    accumulate(plane.view_mut(), canvas.view(), &region, 1.0);
                }
            }
        }
    }

    #[test]
    fn test_degenerate_touching_window_is_out_of_bounds() {
        // low edge exactly at the canvas extent gives a zero-width copy
        let intx = CANVAS.pad_x as i64 - CANVAS.dim_x as i64;
        assert_eq!(window(intx, 0), TraceWindow::OutOfBounds);
    }
}
