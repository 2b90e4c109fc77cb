//! # Field-star catalog
//!
//! Types for the stars around the science target and the boundary trait the
//! simulator queries them through. The production implementation
//! ([`irsa::IrsaCatalog`]) performs an HTTP cone search; tests substitute an
//! in-memory catalog through the same [`StarCatalog`] trait.

pub mod irsa;

use itertools::Itertools;

use crate::constants::{ArcSec, Degree, Magnitude};
use crate::conversion::arcsec_to_ra_deg;
use crate::sossim_errors::SossimError;

/// One catalog entry: sky position and near-infrared photometry.
///
/// Immutable once fetched. The science target is the entry nearest the
/// requested position; a synthetic binary companion may be appended as an
/// extra entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogSource {
    pub ra: Degree,
    pub dec: Degree,
    pub j_mag: Magnitude,
    pub h_mag: Magnitude,
    pub k_mag: Magnitude,
}

impl CatalogSource {
    /// Observed J−H color index.
    pub fn j_h(&self) -> f64 {
        self.j_mag - self.h_mag
    }

    /// Observed H−K color index.
    pub fn h_k(&self) -> f64 {
        self.h_mag - self.k_mag
    }

    fn is_finite(&self) -> bool {
        self.ra.is_finite()
            && self.dec.is_finite()
            && self.j_mag.is_finite()
            && self.h_mag.is_finite()
            && self.k_mag.is_finite()
    }
}

/// A synthetic binary companion, offset from the target in arcseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryCompanion {
    pub delta_ra: ArcSec,
    pub delta_dec: ArcSec,
    pub j_mag: Magnitude,
    pub h_mag: Magnitude,
    pub k_mag: Magnitude,
}

/// Boundary trait for the catalog query service.
pub trait StarCatalog {
    /// Return all sources within `radius_arcmin` of the given position.
    ///
    /// Implementations surface service failures as errors; an empty result
    /// is handled by the caller.
    fn query_region(
        &self,
        ra: Degree,
        dec: Degree,
        radius_arcmin: f64,
    ) -> Result<Vec<CatalogSource>, SossimError>;
}

/// The stars of one simulation run: all field sources plus the identified
/// target, with an optional appended companion.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldCatalog {
    sources: Vec<CatalogSource>,
    target: usize,
    companion: bool,
}

impl FieldCatalog {
    /// Build a field catalog from query results.
    ///
    /// The target is the entry nearest the requested position (plain
    /// Euclidean distance in degrees). Fails on an empty source list and on
    /// non-finite positions or magnitudes, so downstream indexing can never
    /// miss.
    ///
    /// Arguments
    /// ---------
    /// * `sources`: catalog query results
    /// * `ra`, `dec`: the requested target position in degrees
    pub fn from_sources(
        sources: Vec<CatalogSource>,
        ra: Degree,
        dec: Degree,
    ) -> Result<Self, SossimError> {
        if sources.is_empty() {
            return Err(SossimError::EmptyCatalog { ra, dec });
        }
        for (i, source) in sources.iter().enumerate() {
            if !source.is_finite() {
                return Err(SossimError::MalformedCatalogSource(format!(
                    "source {i} at RA={} DEC={}",
                    source.ra, source.dec
                )));
            }
        }

        let target = sources
            .iter()
            .map(|s| {
                let d_ra = ra - s.ra;
                let d_dec = dec - s.dec;
                d_ra * d_ra + d_dec * d_dec
            })
            .position_min_by(|a, b| a.total_cmp(b))
            .expect("sources is non-empty");

        Ok(FieldCatalog {
            sources,
            target,
            companion: false,
        })
    }

    /// Append a synthetic binary companion next to the target.
    ///
    /// The RA offset is divided by cos(Dec) so the arcsecond separation on
    /// the sky is preserved at the target's declination.
    pub fn inject_companion(&mut self, companion: &BinaryCompanion) {
        let target = self.sources[self.target];
        self.sources.push(CatalogSource {
            ra: target.ra + arcsec_to_ra_deg(companion.delta_ra, target.dec),
            dec: target.dec + companion.delta_dec / 3600.0,
            j_mag: companion.j_mag,
            h_mag: companion.h_mag,
            k_mag: companion.k_mag,
        });
        self.companion = true;
    }

    pub fn sources(&self) -> &[CatalogSource] {
        &self.sources
    }

    /// Index of the target entry.
    pub fn target_index(&self) -> usize {
        self.target
    }

    pub fn target(&self) -> &CatalogSource {
        &self.sources[self.target]
    }

    /// Whether a synthetic companion was appended.
    pub fn has_companion(&self) -> bool {
        self.companion
    }
}
