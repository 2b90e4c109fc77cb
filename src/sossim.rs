//! # Sossim: environment, model archive, and simulation driver
//!
//! This module defines the [`Sossim`](crate::sossim::Sossim) struct, the central façade that
//! wires together:
//!
//! 1. **Environment state** ([`SossimEnv`](crate::env_state::SossimEnv)) — the shared HTTP client.
//! 2. **Catalog access** — a [`StarCatalog`](crate::catalog::StarCatalog) implementation,
//!    [`IrsaCatalog`](crate::catalog::irsa::IrsaCatalog) by default.
//! 3. **Model archive access** — lazy, cached handle over the trace-template store
//!    ([`ModelArchive`](crate::models::archive::ModelArchive)).
//!
//! The design emphasizes *lazy initialization* and *idempotent caching*:
//! - The archive metadata is opened on first use via [`OnceCell`](once_cell::sync::OnceCell),
//!   then reused.
//! - Trace templates load per temperature bucket, on demand.
//!
//! ## Typical usage
//!
//! ```rust, no_run
//! use sossim::instrument::SimulationConfig;
//! use sossim::sossim::Sossim;
//!
//! let sim = Sossim::new(SimulationConfig::new("/data/soss_models"));
//! let path = sim
//!     .simulate_field("10:00:00", "+20:00:00", "/tmp/cubes".into(), None)
//!     .unwrap();
//! ```

use camino::Utf8PathBuf;
use once_cell::sync::OnceCell;

use crate::catalog::irsa::IrsaCatalog;
use crate::catalog::{BinaryCompanion, FieldCatalog, StarCatalog};
use crate::compositor::{accumulate, flux_scale, trace_window, TemplateCanvas, TraceWindow};
use crate::conversion::{dec_to_dms, parse_dec_to_deg, parse_ra_to_deg, ra_to_hms};
use crate::cube::SimulationCube;
use crate::env_state::SossimEnv;
use crate::geometry::{project_to_pixels, ProjectedStar, SweetSpot};
use crate::instrument::SimulationConfig;
use crate::models::archive::ModelArchive;
use crate::sossim_errors::SossimError;

#[cfg(feature = "progress")]
use crate::iter_timer::{fmt_dur, IterTimer};

pub struct Sossim {
    env_state: SossimEnv,
    config: SimulationConfig,
    catalog: Box<dyn StarCatalog>,
    archive: OnceCell<ModelArchive>,
}

impl Sossim {
    /// Construct a new [`Sossim`] context querying the IRSA 2MASS catalog.
    ///
    /// The model archive is **not** opened yet; it is lazily initialized the
    /// first time [`get_model_archive`](crate::sossim::Sossim::get_model_archive) is called.
    pub fn new(config: SimulationConfig) -> Self {
        let env_state = SossimEnv::new();
        let catalog = Box::new(IrsaCatalog::new(env_state.clone()));
        Sossim {
            env_state,
            config,
            catalog,
            archive: OnceCell::new(),
        }
    }

    /// Construct a context over a caller-provided catalog implementation.
    pub fn with_catalog(config: SimulationConfig, catalog: Box<dyn StarCatalog>) -> Self {
        Sossim {
            env_state: SossimEnv::new(),
            config,
            catalog,
            archive: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn env_state(&self) -> &SossimEnv {
        &self.env_state
    }

    /// Get the lazily-initialized model archive handle.
    ///
    /// If this is the first call, the archive metadata is opened and cached in
    /// an internal [`OnceCell`]. Subsequent calls return the same reference.
    pub fn get_model_archive(&self) -> Result<&ModelArchive, SossimError> {
        self.archive
            .get_or_try_init(|| ModelArchive::open(self.config.archive_dir.clone()))
    }

    /// Simulate the contamination field around a target across one full roll
    /// sweep and persist the resulting cube.
    ///
    /// Queries the field around `(ra, dec)`, identifies the target as the
    /// nearest catalog entry, and for every roll angle composites the trace
    /// templates of all field stars inside the usable footprint into one
    /// plane of the output cube. Planes 0 and 1 receive the target's own
    /// order-1/order-2 traces at the reference angle.
    ///
    /// Arguments
    /// ---------
    /// * `ra`: target right ascension, sexagesimal `hh:mm:ss`
    /// * `dec`: target declination, sexagesimal `±dd:mm:ss`
    /// * `out_dir`: directory receiving the cube file
    /// * `companion`: optional synthetic binary companion to append
    ///
    /// Return
    /// ------
    /// * `Ok(Some(path))` of the written artifact, or `Ok(None)` when a
    ///   companion run found its artifact already on disk and skipped the
    ///   computation. The skip is keyed on the file name alone, so callers
    ///   re-running with *different* companion parameters against the same
    ///   target must remove the stale file first.
    pub fn simulate_field(
        &self,
        ra: &str,
        dec: &str,
        out_dir: Utf8PathBuf,
        companion: Option<BinaryCompanion>,
    ) -> Result<Option<Utf8PathBuf>, SossimError> {
        let ra_deg = parse_ra_to_deg(ra)?;
        let dec_deg = parse_dec_to_deg(dec)?;

        let sources =
            self.catalog
                .query_region(ra_deg, dec_deg, self.config.search_radius_arcmin)?;
        let mut field = FieldCatalog::from_sources(sources, ra_deg, dec_deg)?;
        if let Some(companion) = &companion {
            field.inject_companion(companion);
        }

        let target = *field.target();
        let cube_path = SimulationCube::artifact_path(
            &out_dir,
            target.ra,
            target.dec,
            field.has_companion(),
        );
        log::info!(
            "cube {cube_path} for target at RA {} DEC {}",
            ra_to_hms(target.ra, false),
            dec_to_dms(target.dec, false)
        );

        if cube_path.exists() && companion.is_some() {
            log::info!("companion artifact already present, skipping simulation");
            return Ok(None);
        }

        let archive = self.get_model_archive()?;
        let canvas = TemplateCanvas {
            pad_x: archive.pad_x(),
            pad_y: archive.pad_y(),
            dim_x: archive.dim_x(),
            dim_y: archive.dim_y(),
        };

        // color classification is rotation-invariant: once per star, not per angle
        let buckets: Vec<usize> = field
            .sources()
            .iter()
            .map(|s| archive.grid().classify(s.j_h(), s.h_k()))
            .collect();

        let geometry = &self.config.geometry;
        let sweet = SweetSpot {
            x: geometry.sweet_x,
            y: geometry.sweet_y,
            ra: target.ra,
            dec: target.dec,
            j_mag: target.j_mag,
        };

        let mut cube = SimulationCube::new(geometry);
        let plane_width = geometry.subarray_width;
        let plane_height = geometry.subarray_height;

        #[cfg(feature = "progress")]
        let bar = {
            use indicatif::{ProgressBar, ProgressStyle};
            let bar = ProgressBar::new(cube.n_angles() as u64);
            bar.set_style(
                ProgressStyle::with_template(
                    "{bar:40.cyan/blue} {pos}/{len} angles ({msg})",
                )
                .expect("indicatif template"),
            );
            bar
        };
        #[cfg(feature = "progress")]
        let mut timer = IterTimer::new(0.2);

        for (angle_index, rotation) in geometry.angles().enumerate() {
            let in_fov: Vec<(usize, ProjectedStar)> = field
                .sources()
                .iter()
                .enumerate()
                .map(|(i, star)| {
                    (
                        i,
                        project_to_pixels(
                            star.ra,
                            star.dec,
                            &sweet,
                            rotation,
                            geometry.pixel_scale,
                        ),
                    )
                })
                .filter(|(_, p)| geometry.fov.contains(p.x, p.y))
                .collect();

            for (star_index, projected) in in_fov {
                let star = &field.sources()[star_index];
                let (intx, inty) = projected.rounded_offset();
                let scale = flux_scale(star.j_mag, sweet.j_mag);
                let bucket = buckets[star_index];

                if intx == 0 && inty == 0 {
                    if angle_index == 0 {
                        let trace = archive.target_trace(bucket)?;
                        cube.seed_target(trace.view(), &canvas, scale)?;
                    }
                    continue;
                }

                match trace_window(&canvas, plane_width, plane_height, intx, inty) {
                    TraceWindow::Contribution(region) => {
                        let template = archive.field_template(bucket)?;
                        accumulate(
                            cube.angle_plane_mut(angle_index),
                            template.view(),
                            &region,
                            scale,
                        );
                    }
                    TraceWindow::OutOfBounds => {}
                }
            }

            #[cfg(feature = "progress")]
            {
                timer.tick();
                bar.set_message(format!("{} per angle", fmt_dur(timer.avg())));
                bar.inc(1);
            }
        }

        #[cfg(feature = "progress")]
        bar.finish_and_clear();

        cube.write_to(&cube_path)?;
        log::info!("wrote {} planes to {cube_path}", cube.n_angles() + 2);
        Ok(Some(cube_path))
    }
}
