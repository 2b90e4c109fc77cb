//! # Constants and type definitions for sossim
//!
//! This module centralizes the **conversion factors** and **common type
//! definitions** used throughout the `sossim` library.
//!
//! ## Overview
//!
//! - Angular unit conversions (degrees ↔ radians, degrees ↔ arcseconds)
//! - Core type aliases used across the crate
//!
//! These definitions are used by all main modules, including the coordinate
//! transformer, the field-of-view filter and the trace compositor.

// -------------------------------------------------------------------------------------------------
// Unit conversions
// -------------------------------------------------------------------------------------------------

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Arcseconds per degree
pub const ARCSEC_PER_DEG: f64 = 3600.0;

/// Degrees of right ascension per hour of right ascension
pub const DEG_PER_HOUR: f64 = 15.0;

/// Numerical epsilon used for floating-point comparisons
pub const EPS: f64 = 1e-9;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in arcseconds
pub type ArcSec = f64;
/// Detector position in pixels
pub type Pixel = f64;
/// Apparent magnitude
pub type Magnitude = f64;
/// Effective temperature in Kelvin
pub type Kelvin = f64;
