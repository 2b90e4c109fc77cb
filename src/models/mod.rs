//! # Stellar model grid and trace-template archive
//!
//! A star's near-infrared colors select a precomputed spectral-trace template
//! from a grid of stellar models. [`ModelGrid`] holds the grid axes and the
//! nearest-neighbor color classification; [`archive::ModelArchive`] is the
//! on-disk keyed store the templates are loaded from.

pub mod archive;

use itertools::Itertools;

use crate::constants::Kelvin;
use crate::sossim_errors::SossimError;

/// Lookup table mapping an effective-temperature axis to model color indices.
///
/// The three axes are parallel arrays of equal length; position `k` along the
/// temperature axis is also the key of the matching template in the archive.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelGrid {
    teff: Vec<Kelvin>,
    jh: Vec<f64>,
    hk: Vec<f64>,
}

impl ModelGrid {
    /// Build a grid from its three parallel axes.
    ///
    /// Returns [`SossimError::ModelGridMismatch`] when the axes differ in
    /// length, and [`SossimError::MissingModelData`] when the grid is empty.
    pub fn new(teff: Vec<Kelvin>, jh: Vec<f64>, hk: Vec<f64>) -> Result<Self, SossimError> {
        if teff.len() != jh.len() || teff.len() != hk.len() {
            return Err(SossimError::ModelGridMismatch {
                teff: teff.len(),
                jh: jh.len(),
                hk: hk.len(),
            });
        }
        if teff.is_empty() {
            return Err(SossimError::MissingModelData(
                "model grid has no entries".into(),
            ));
        }
        Ok(ModelGrid { teff, jh, hk })
    }

    pub fn len(&self) -> usize {
        self.teff.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teff.is_empty()
    }

    /// Effective temperature at grid position `index`.
    pub fn teff_at(&self, index: usize) -> Option<Kelvin> {
        self.teff.get(index).copied()
    }

    /// Nearest-neighbor classification of an observed color pair.
    ///
    /// Minimizes the squared Euclidean distance in (J−H, H−K) space over the
    /// whole grid, duplicates included. Ties resolve to the first minimal
    /// index in grid order, so repeated calls with identical inputs always
    /// return the same bucket.
    ///
    /// Arguments
    /// ---------
    /// * `j_h`: observed J−H color index
    /// * `h_k`: observed H−K color index
    ///
    /// Return
    /// ------
    /// * The grid index of the closest model
    pub fn classify(&self, j_h: f64, h_k: f64) -> usize {
        self.jh
            .iter()
            .zip(&self.hk)
            .map(|(&jh_mod, &hk_mod)| {
                let d_jh = j_h - jh_mod;
                let d_hk = h_k - hk_mod;
                d_jh * d_jh + d_hk * d_hk
            })
            .position_min_by(|a, b| a.total_cmp(b))
            .expect("grid is never empty by construction")
    }
}
