//! # Simulation cube
//!
//! The output artifact of one simulation run: a stack of 2-D planes sized to
//! the subarray. Planes 0 and 1 hold the target's order-1 and order-2 traces,
//! planes 2.. the composited contamination at each roll angle. The cube is
//! exclusively owned by the assembler for the duration of a run and persisted
//! once at the end.

use camino::{Utf8Path, Utf8PathBuf};
use ndarray::{s, Array3, ArrayView2, ArrayView3, ArrayViewMut2};

use crate::compositor::TemplateCanvas;
use crate::constants::Degree;
use crate::conversion::{dec_to_dms, ra_to_hms};
use crate::fits_io;
use crate::instrument::InstrumentGeometry;
use crate::sossim_errors::SossimError;

/// Derive the artifact file name from the target's sky position.
///
/// Seconds are truncated so the name is stable across runs; a synthetic
/// companion adds the `_custom` suffix, keeping companion runs distinct from
/// plain runs on the same target.
pub fn cube_file_name(target_ra: Degree, target_dec: Degree, companion: bool) -> String {
    let suffix = if companion { "_custom" } else { "" };
    format!(
        "cube_RA_{}_DEC_{}{suffix}.fits",
        ra_to_hms(target_ra, true),
        dec_to_dms(target_dec, true),
    )
}

/// Multi-plane output buffer for one simulation run.
#[derive(Debug, Clone)]
pub struct SimulationCube {
    data: Array3<f32>,
    n_angles: usize,
    target_seeded: bool,
}

impl SimulationCube {
    /// Allocate a zeroed cube of `n_angles + 2` planes for the given geometry.
    pub fn new(geometry: &InstrumentGeometry) -> Self {
        let n_angles = geometry.n_angles();
        SimulationCube {
            data: Array3::zeros((
                n_angles + 2,
                geometry.subarray_height,
                geometry.subarray_width,
            )),
            n_angles,
            target_seeded: false,
        }
    }

    pub fn n_angles(&self) -> usize {
        self.n_angles
    }

    /// The contamination plane for one angle of the sweep.
    pub fn angle_plane_mut(&mut self, angle_index: usize) -> ArrayViewMut2<f32> {
        self.data.index_axis_mut(ndarray::Axis(0), angle_index + 2)
    }

    pub fn plane(&self, plane_index: usize) -> ArrayView2<f32> {
        self.data.index_axis(ndarray::Axis(0), plane_index)
    }

    /// Write the target's two spectral orders into planes 0 and 1.
    ///
    /// `trace` is the padded order-1/order-2 stack; the subarray-sized window
    /// at the canvas pad offsets is copied out, scaled by `flux_scale`.
    /// Planes 0 and 1 are written once per run; later calls are no-ops.
    pub fn seed_target(
        &mut self,
        trace: ArrayView3<f32>,
        canvas: &TemplateCanvas,
        flux_scale: f64,
    ) -> Result<(), SossimError> {
        if self.target_seeded {
            return Ok(());
        }

        let (_, height, width) = self.data.dim();
        let (orders, trace_y, trace_x) = trace.dim();
        if orders != 2 || canvas.pad_y + height > trace_y || canvas.pad_x + width > trace_x {
            return Err(SossimError::TemplateShapeMismatch {
                got: (trace_y, trace_x),
                expected: (canvas.pad_y + height, canvas.pad_x + width),
            });
        }

        for order in 0..2 {
            let window = trace.slice(s![
                order,
                canvas.pad_y..canvas.pad_y + height,
                canvas.pad_x..canvas.pad_x + width
            ]);
            let mut plane = self.data.index_axis_mut(ndarray::Axis(0), order);
            plane.zip_mut_with(&window, |d, &s| *d = s * flux_scale as f32);
        }
        self.target_seeded = true;
        Ok(())
    }

    pub fn target_seeded(&self) -> bool {
        self.target_seeded
    }

    pub fn data(&self) -> ArrayView3<f32> {
        self.data.view()
    }

    /// Persist the cube to `path`, overwriting any existing file.
    pub fn write_to(&self, path: &Utf8Path) -> Result<(), SossimError> {
        fits_io::write_f32_cube(path, self.data.view())
    }

    /// Full artifact path for a target inside `out_dir`.
    pub fn artifact_path(
        out_dir: &Utf8Path,
        target_ra: Degree,
        target_dec: Degree,
        companion: bool,
    ) -> Utf8PathBuf {
        out_dir.join(cube_file_name(target_ra, target_dec, companion))
    }
}

#[cfg(test)]
mod cube_tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::Array3;

    fn small_geometry() -> InstrumentGeometry {
        let mut geometry = InstrumentGeometry::niriss_soss();
        geometry.subarray_width = 4;
        geometry.subarray_height = 5;
        geometry.pa_max = 3.0;
        geometry
    }

    fn canvas() -> TemplateCanvas {
        TemplateCanvas {
            pad_x: 3,
            pad_y: 4,
            dim_x: 10,
            dim_y: 13,
        }
    }

    #[test]
    fn test_cube_naming() {
        assert_eq!(
            cube_file_name(150.0, 20.0, false),
            "cube_RA_10:00:00_DEC_+20:00:00.fits"
        );
        assert_eq!(
            cube_file_name(150.0, 20.0, true),
            "cube_RA_10:00:00_DEC_+20:00:00_custom.fits"
        );
        assert_eq!(
            cube_file_name(343.097375, -0.5039444444444444, false),
            "cube_RA_22:52:23_DEC_-00:30:14.fits"
        );
    }

    #[test]
    fn test_plane_layout() {
        let cube = SimulationCube::new(&small_geometry());
        assert_eq!(cube.n_angles(), 3);
        assert_eq!(cube.data().dim(), (5, 5, 4));
    }

    #[test]
    fn test_seed_target_writes_once() {
        let mut cube = SimulationCube::new(&small_geometry());
        let canvas = canvas();

        let mut trace = Array3::<f32>::zeros((2, canvas.dim_y, canvas.dim_x));
        trace[[0, canvas.pad_y, canvas.pad_x]] = 2.0;
        trace[[1, canvas.pad_y + 1, canvas.pad_x + 2]] = 3.0;

        cube.seed_target(trace.view(), &canvas, 1.0).unwrap();
        assert!(cube.target_seeded());
        assert_relative_eq!(cube.plane(0)[[0, 0]], 2.0);
        assert_relative_eq!(cube.plane(1)[[1, 2]], 3.0);

        // a second seed with different data leaves planes 0/1 untouched
        let other = Array3::<f32>::from_elem((2, canvas.dim_y, canvas.dim_x), 9.0);
        cube.seed_target(other.view(), &canvas, 1.0).unwrap();
        assert_relative_eq!(cube.plane(0)[[0, 0]], 2.0);
        assert_relative_eq!(cube.plane(1)[[0, 0]], 0.0);
    }

    #[test]
    fn test_seed_target_rejects_short_canvas() {
        let mut cube = SimulationCube::new(&small_geometry());
        let trace = Array3::<f32>::zeros((2, 6, 5));
        let err = cube.seed_target(trace.view(), &canvas(), 1.0).unwrap_err();
        assert!(matches!(err, SossimError::TemplateShapeMismatch { .. }));
    }

    #[test]
    fn test_angle_plane_offset() {
        let mut cube = SimulationCube::new(&small_geometry());
        cube.angle_plane_mut(0)[[0, 0]] = 7.0;
        assert_relative_eq!(cube.plane(2)[[0, 0]], 7.0);
        assert_relative_eq!(cube.plane(0)[[0, 0]], 0.0);
    }
}
