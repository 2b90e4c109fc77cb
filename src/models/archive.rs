//! On-disk trace-template archive
//!
//! The archive is a directory holding one metadata file plus one template
//! file per temperature bucket:
//!
//! ```text
//! <archive_dir>/
//! ├── models_info.fits     MODPADX/MODPADY/DIMXMOD/DIMYMOD keywords,
//! │                        TEFFMOD/JHMOD/HKMOD grid-axis extensions
//! ├── trace_00.fits        FIELD (dimY × dimX), TARGET (2 × dimY × dimX)
//! ├── trace_01.fits
//! └── ...
//! ```
//!
//! Metadata is validated up front in [`ModelArchive::open`]; the template
//! files themselves are opened lazily, once per requested bucket, and cached
//! for the lifetime of the archive handle.

use camino::{Utf8Path, Utf8PathBuf};
use fitsio::FitsFile;
use ndarray::{Array2, Array3};
use once_cell::sync::OnceCell;

use crate::fits_io::{read_f32_image, read_f32_stack, read_f64_vector, read_key_usize};
use crate::models::ModelGrid;
use crate::sossim_errors::SossimError;

/// Name of the archive metadata file.
pub const INFO_FILE: &str = "models_info.fits";

/// File name of the template for one temperature bucket.
pub fn trace_file_name(index: usize) -> String {
    format!("trace_{index:02}.fits")
}

/// Handle over a model-archive directory.
///
/// Cheap accessors expose the canvas geometry (`pad_x`, `pad_y`, `dim_x`,
/// `dim_y`) and the color grid; [`field_template`](ModelArchive::field_template)
/// and [`target_trace`](ModelArchive::target_trace) load template data on
/// first use via [`OnceCell`].
#[derive(Debug)]
pub struct ModelArchive {
    dir: Utf8PathBuf,
    pad_x: usize,
    pad_y: usize,
    dim_x: usize,
    dim_y: usize,
    grid: ModelGrid,
    field_templates: Vec<OnceCell<Array2<f32>>>,
    target_traces: Vec<OnceCell<Array3<f32>>>,
}

impl ModelArchive {
    /// Open an archive directory and validate its metadata.
    ///
    /// Reads the pad/extent keywords and the three grid axes from
    /// `models_info.fits`. Fails with [`SossimError::MissingModelData`] when
    /// the metadata file is absent or malformed, before any simulation work
    /// has started.
    pub fn open(dir: impl Into<Utf8PathBuf>) -> Result<Self, SossimError> {
        let dir = dir.into();
        let info_path = dir.join(INFO_FILE);
        if !info_path.exists() {
            return Err(SossimError::MissingModelData(format!(
                "archive metadata not found at {info_path}"
            )));
        }

        let mut fptr = FitsFile::open(&info_path)?;
        let pad_x = read_key_usize(&mut fptr, "MODPADX")?;
        let pad_y = read_key_usize(&mut fptr, "MODPADY")?;
        let dim_x = read_key_usize(&mut fptr, "DIMXMOD")?;
        let dim_y = read_key_usize(&mut fptr, "DIMYMOD")?;

        let teff = read_f64_vector(&mut fptr, "TEFFMOD")?;
        let jh = read_f64_vector(&mut fptr, "JHMOD")?;
        let hk = read_f64_vector(&mut fptr, "HKMOD")?;
        let grid = ModelGrid::new(teff, jh, hk)?;

        let n = grid.len();
        log::debug!(
            "opened model archive at {dir}: {n} buckets, canvas {dim_x}x{dim_y}, pad ({pad_x}, {pad_y})"
        );

        Ok(ModelArchive {
            dir,
            pad_x,
            pad_y,
            dim_x,
            dim_y,
            grid,
            field_templates: (0..n).map(|_| OnceCell::new()).collect(),
            target_traces: (0..n).map(|_| OnceCell::new()).collect(),
        })
    }

    pub fn grid(&self) -> &ModelGrid {
        &self.grid
    }

    /// Template-canvas padding on the x axis, in pixels.
    pub fn pad_x(&self) -> usize {
        self.pad_x
    }

    /// Template-canvas padding on the y axis, in pixels.
    pub fn pad_y(&self) -> usize {
        self.pad_y
    }

    /// Template-canvas extent on the x axis.
    pub fn dim_x(&self) -> usize {
        self.dim_x
    }

    /// Template-canvas extent on the y axis.
    pub fn dim_y(&self) -> usize {
        self.dim_y
    }

    fn trace_path(&self, index: usize) -> Utf8PathBuf {
        self.dir.join(trace_file_name(index))
    }

    fn open_trace_file(&self, index: usize) -> Result<FitsFile, SossimError> {
        let path = self.trace_path(index);
        if !path.exists() {
            return Err(SossimError::MissingModelData(format!(
                "trace template not found at {path}"
            )));
        }
        Ok(FitsFile::open(&path)?)
    }

    /// The field-star trace template for one temperature bucket.
    ///
    /// Loaded from `trace_NN.fits` on first use and cached; read-only once
    /// loaded. The template must match the canvas extent declared in the
    /// metadata file.
    pub fn field_template(&self, index: usize) -> Result<&Array2<f32>, SossimError> {
        let cell = self
            .field_templates
            .get(index)
            .ok_or(SossimError::UnknownTemperatureBucket(index))?;
        cell.get_or_try_init(|| {
            let mut fptr = self.open_trace_file(index)?;
            let template = read_f32_image(&mut fptr, "FIELD")?;
            if template.dim() != (self.dim_y, self.dim_x) {
                return Err(SossimError::TemplateShapeMismatch {
                    got: template.dim(),
                    expected: (self.dim_y, self.dim_x),
                });
            }
            Ok(template)
        })
    }

    /// The target's order-1/order-2 trace stack for one temperature bucket.
    ///
    /// Plane 0 is the first spectral order, plane 1 the second, both on the
    /// padded canvas. Loaded and cached like
    /// [`field_template`](ModelArchive::field_template).
    pub fn target_trace(&self, index: usize) -> Result<&Array3<f32>, SossimError> {
        let cell = self
            .target_traces
            .get(index)
            .ok_or(SossimError::UnknownTemperatureBucket(index))?;
        cell.get_or_try_init(|| {
            let mut fptr = self.open_trace_file(index)?;
            let stack = read_f32_stack(&mut fptr, "TARGET")?;
            let (orders, ny, nx) = stack.dim();
            if orders != 2 || (ny, nx) != (self.dim_y, self.dim_x) {
                return Err(SossimError::TemplateShapeMismatch {
                    got: (ny, nx),
                    expected: (self.dim_y, self.dim_x),
                });
            }
            Ok(stack)
        })
    }

    /// Directory this archive was opened from.
    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }
}
