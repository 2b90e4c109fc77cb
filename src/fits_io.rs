//! FITS helpers for the model archive and the output cube
//!
//! Thin wrappers over `fitsio` that move data between named image HDUs and
//! `ndarray` buffers. Keyword and extension layout conventions live with the
//! callers; this module only guarantees that a value written through one of
//! the `write_*` helpers reads back identically through the matching
//! `read_*` helper.

use camino::Utf8Path;
use fitsio::hdu::HduInfo;
use fitsio::images::{ImageDescription, ImageType};
use fitsio::FitsFile;
use ndarray::{Array2, Array3, ArrayView2, ArrayView3};

use crate::sossim_errors::SossimError;

/// Read an integer keyword from the primary header.
pub fn read_key_usize(fptr: &mut FitsFile, key: &str) -> Result<usize, SossimError> {
    let hdu = fptr.primary_hdu()?;
    let value: i64 = hdu.read_key(fptr, key)?;
    Ok(value as usize)
}

/// Write an integer keyword into the primary header.
pub fn write_key_usize(fptr: &mut FitsFile, key: &str, value: usize) -> Result<(), SossimError> {
    let hdu = fptr.primary_hdu()?;
    hdu.write_key(fptr, key, value as i64)?;
    Ok(())
}

fn image_shape(fptr: &mut FitsFile, ext: &str) -> Result<Vec<usize>, SossimError> {
    let hdu = fptr.hdu(ext)?;
    match &hdu.info {
        HduInfo::ImageInfo { shape, .. } => Ok(shape.clone()),
        _ => Err(SossimError::MissingModelData(format!(
            "extension {ext} is not an image HDU"
        ))),
    }
}

/// Read a 1-D `f64` array from a named image extension.
pub fn read_f64_vector(fptr: &mut FitsFile, ext: &str) -> Result<Vec<f64>, SossimError> {
    let hdu = fptr.hdu(ext)?;
    Ok(hdu.read_image(fptr)?)
}

/// Read a 2-D `f32` image from a named image extension.
pub fn read_f32_image(fptr: &mut FitsFile, ext: &str) -> Result<Array2<f32>, SossimError> {
    let shape = image_shape(fptr, ext)?;
    if shape.len() != 2 {
        return Err(SossimError::MissingModelData(format!(
            "extension {ext} has {} axes, expected 2",
            shape.len()
        )));
    }
    let hdu = fptr.hdu(ext)?;
    let data: Vec<f32> = hdu.read_image(fptr)?;
    Array2::from_shape_vec((shape[0], shape[1]), data)
        .map_err(|e| SossimError::MissingModelData(format!("cannot reshape {ext}: {e}")))
}

/// Read a 3-D `f32` stack from a named image extension.
pub fn read_f32_stack(fptr: &mut FitsFile, ext: &str) -> Result<Array3<f32>, SossimError> {
    let shape = image_shape(fptr, ext)?;
    if shape.len() != 3 {
        return Err(SossimError::MissingModelData(format!(
            "extension {ext} has {} axes, expected 3",
            shape.len()
        )));
    }
    let hdu = fptr.hdu(ext)?;
    let data: Vec<f32> = hdu.read_image(fptr)?;
    Array3::from_shape_vec((shape[0], shape[1], shape[2]), data)
        .map_err(|e| SossimError::MissingModelData(format!("cannot reshape {ext}: {e}")))
}

/// Write a 1-D `f64` array as a named image extension.
pub fn write_f64_vector(fptr: &mut FitsFile, ext: &str, data: &[f64]) -> Result<(), SossimError> {
    let description = ImageDescription {
        data_type: ImageType::Double,
        dimensions: &[data.len()],
    };
    let hdu = fptr.create_image(ext, &description)?;
    hdu.write_image(fptr, data)?;
    Ok(())
}

/// Write a 2-D `f32` image as a named image extension.
pub fn write_f32_image(
    fptr: &mut FitsFile,
    ext: &str,
    data: ArrayView2<f32>,
) -> Result<(), SossimError> {
    let (ny, nx) = data.dim();
    let description = ImageDescription {
        data_type: ImageType::Float,
        dimensions: &[ny, nx],
    };
    let hdu = fptr.create_image(ext, &description)?;
    let flat: Vec<f32> = data.iter().copied().collect();
    hdu.write_image(fptr, &flat)?;
    Ok(())
}

/// Write a 3-D `f32` stack as a named image extension.
pub fn write_f32_stack(
    fptr: &mut FitsFile,
    ext: &str,
    data: ArrayView3<f32>,
) -> Result<(), SossimError> {
    let (nz, ny, nx) = data.dim();
    let description = ImageDescription {
        data_type: ImageType::Float,
        dimensions: &[nz, ny, nx],
    };
    let hdu = fptr.create_image(ext, &description)?;
    let flat: Vec<f32> = data.iter().copied().collect();
    hdu.write_image(fptr, &flat)?;
    Ok(())
}

/// Persist a simulation cube as the primary HDU of `path`, overwriting any
/// existing file.
pub fn write_f32_cube(path: &Utf8Path, cube: ArrayView3<f32>) -> Result<(), SossimError> {
    let (nplanes, ny, nx) = cube.dim();
    let description = ImageDescription {
        data_type: ImageType::Float,
        dimensions: &[nplanes, ny, nx],
    };
    let mut fptr = FitsFile::create(path)
        .with_custom_primary(&description)
        .overwrite()
        .open()?;
    let hdu = fptr.primary_hdu()?;
    let flat: Vec<f32> = cube.iter().copied().collect();
    hdu.write_image(&mut fptr, &flat)?;
    Ok(())
}

/// Read back a cube written by [`write_f32_cube`].
pub fn read_f32_cube(path: &Utf8Path) -> Result<Array3<f32>, SossimError> {
    let mut fptr = FitsFile::open(path)?;
    let hdu = fptr.primary_hdu()?;
    let shape = match &hdu.info {
        HduInfo::ImageInfo { shape, .. } => shape.clone(),
        _ => {
            return Err(SossimError::MissingModelData(
                "primary HDU is not an image".into(),
            ))
        }
    };
    if shape.len() != 3 {
        return Err(SossimError::MissingModelData(format!(
            "primary HDU has {} axes, expected 3",
            shape.len()
        )));
    }
    let data: Vec<f32> = hdu.read_image(&mut fptr)?;
    Array3::from_shape_vec((shape[0], shape[1], shape[2]), data)
        .map_err(|e| SossimError::MissingModelData(format!("cannot reshape cube: {e}")))
}
