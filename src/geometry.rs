//! # Sky-to-detector projection
//!
//! Projects catalog positions into the target-centered pixel frame under a
//! given field rotation. The transform is a tangent-plane approximation: the
//! RA axis is scaled by cos(Dec) of the sweet spot and no further spherical
//! correction is applied, which is accurate at the arcminute field scale
//! involved here.

use nalgebra::{Rotation2, Vector2};

use crate::constants::{ArcSec, Degree, Magnitude, Pixel, ARCSEC_PER_DEG, RADEG};

/// The target star's fixed detector position plus its sky position and
/// magnitude, the geometric reference point for all coordinate transforms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweetSpot {
    pub x: Pixel,
    pub y: Pixel,
    pub ra: Degree,
    pub dec: Degree,
    pub j_mag: Magnitude,
}

/// A catalog source projected onto the detector at one roll angle.
///
/// # Fields
///
/// * `x`, `y` - Absolute detector position in pixels, used for the FOV test
/// * `dx`, `dy` - Rotated offset from the sweet spot in pixels, rounded to
///   integers by the compositor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedStar {
    pub x: Pixel,
    pub y: Pixel,
    pub dx: Pixel,
    pub dy: Pixel,
}

impl ProjectedStar {
    /// Rounded integer-pixel offset from the sweet spot.
    pub fn rounded_offset(&self) -> (i64, i64) {
        (self.dx.round() as i64, self.dy.round() as i64)
    }
}

/// Project a catalog position into the target-centered pixel frame.
///
/// The angular offset from the sweet spot is computed in the tangent plane
/// (cos(Dec) scale on the RA axis), rotated counter-clockwise by
/// `rotation_deg`, converted from arcseconds to pixels and translated by the
/// sweet spot's fixed detector position. Pure function.
///
/// Arguments
/// ---------
/// * `ra`, `dec`: catalog position in degrees
/// * `sweet`: the target's reference position
/// * `rotation_deg`: field rotation in degrees, counter-clockwise
/// * `pixel_scale`: plate scale in arcseconds per pixel
pub fn project_to_pixels(
    ra: Degree,
    dec: Degree,
    sweet: &SweetSpot,
    rotation_deg: Degree,
    pixel_scale: ArcSec,
) -> ProjectedStar {
    let cos_dec = (sweet.dec * RADEG).cos();
    let offset = Vector2::new(
        -cos_dec * (ra - sweet.ra) * ARCSEC_PER_DEG / pixel_scale,
        (dec - sweet.dec) * ARCSEC_PER_DEG / pixel_scale,
    );

    let rotated = Rotation2::new(rotation_deg * RADEG) * offset;

    ProjectedStar {
        x: rotated.x + sweet.x,
        y: rotated.y + sweet.y,
        dx: rotated.x,
        dy: rotated.y,
    }
}
