use camino::Utf8Path;
use fitsio::FitsFile;
use ndarray::{Array2, Array3};

use sossim::catalog::{CatalogSource, StarCatalog};
use sossim::constants::Degree;
use sossim::fits_io::{write_f32_image, write_f32_stack, write_f64_vector, write_key_usize};
use sossim::instrument::{FovBounds, InstrumentGeometry};
use sossim::models::archive::{trace_file_name, INFO_FILE};
use sossim::sossim_errors::SossimError;

/// Canvas geometry of the synthetic archive written by [`write_test_archive`].
pub const PAD_X: usize = 3;
pub const PAD_Y: usize = 4;
pub const DIM_X: usize = 10;
pub const DIM_Y: usize = 13;

/// Subarray extent of [`tiny_geometry`].
pub const PLANE_W: usize = 4;
pub const PLANE_H: usize = 5;

pub fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A shrunken instrument: same plate scale as the real one, but a 4×5
/// subarray and a four-angle sweep so end-to-end runs stay fast.
pub fn tiny_geometry() -> InstrumentGeometry {
    InstrumentGeometry {
        pixel_scale: 0.065,
        sweet_x: 2.0,
        sweet_y: 2.0,
        subarray_width: PLANE_W,
        subarray_height: PLANE_H,
        fov: FovBounds {
            x_min: -5.0,
            x_max: 9.0,
            y_min: -6.0,
            y_max: 10.0,
        },
        pa_min: 0.0,
        pa_max: 4.0,
        pa_step: 1.0,
    }
}

/// Grid of the synthetic archive: three buckets. The target test source at
/// J−H = 0.3, H−K = 0.1 classifies into bucket 2.
pub const TEFF: [f64; 3] = [2800.0, 3200.0, 5800.0];
pub const JH: [f64; 3] = [0.85, 0.70, 0.30];
pub const HK: [f64; 3] = [0.30, 0.25, 0.05];

/// Field template value for bucket `k`.
pub fn field_value(k: usize) -> f32 {
    (k + 1) as f32
}

/// Target order-1 / order-2 template values for bucket `k`.
pub fn target_values(k: usize) -> (f32, f32) {
    ((10 + k) as f32, (20 + k) as f32)
}

/// Write a complete synthetic model archive into `dir`.
pub fn write_test_archive(dir: &Utf8Path) -> Result<(), SossimError> {
    let mut info = FitsFile::create(dir.join(INFO_FILE)).open()?;
    write_key_usize(&mut info, "MODPADX", PAD_X)?;
    write_key_usize(&mut info, "MODPADY", PAD_Y)?;
    write_key_usize(&mut info, "DIMXMOD", DIM_X)?;
    write_key_usize(&mut info, "DIMYMOD", DIM_Y)?;
    write_f64_vector(&mut info, "TEFFMOD", &TEFF)?;
    write_f64_vector(&mut info, "JHMOD", &JH)?;
    write_f64_vector(&mut info, "HKMOD", &HK)?;
    drop(info);

    for k in 0..TEFF.len() {
        let mut fptr = FitsFile::create(dir.join(trace_file_name(k))).open()?;
        let field = Array2::<f32>::from_elem((DIM_Y, DIM_X), field_value(k));
        write_f32_image(&mut fptr, "FIELD", field.view())?;

        let (o1, o2) = target_values(k);
        let mut target = Array3::<f32>::zeros((2, DIM_Y, DIM_X));
        target.index_axis_mut(ndarray::Axis(0), 0).fill(o1);
        target.index_axis_mut(ndarray::Axis(0), 1).fill(o2);
        write_f32_stack(&mut fptr, "TARGET", target.view())?;
    }
    Ok(())
}

/// In-memory catalog standing in for the cone-search service.
pub struct MockCatalog {
    pub sources: Vec<CatalogSource>,
}

impl StarCatalog for MockCatalog {
    fn query_region(
        &self,
        _ra: Degree,
        _dec: Degree,
        _radius_arcmin: f64,
    ) -> Result<Vec<CatalogSource>, SossimError> {
        Ok(self.sources.clone())
    }
}

/// The science target used by the end-to-end scenarios: RA 10:00:00,
/// Dec +20:00:00, colors matching grid bucket 2.
pub fn target_source() -> CatalogSource {
    CatalogSource {
        ra: 150.0,
        dec: 20.0,
        j_mag: 9.0,
        h_mag: 8.7,
        k_mag: 8.6,
    }
}

/// A field star `dy_pixels` north of the target with the given J magnitude,
/// same colors as the target.
pub fn field_star(dy_pixels: f64, j_mag: f64) -> CatalogSource {
    let target = target_source();
    CatalogSource {
        ra: target.ra,
        dec: target.dec + dy_pixels * 0.065 / 3600.0,
        j_mag,
        h_mag: j_mag - 0.3,
        k_mag: j_mag - 0.4,
    }
}
