//! # Transit kernel wrapper
//!
//! Safe interface over the compiled radiative-transfer library that produces
//! model transit spectra. The native kernel is treated as an opaque numerical
//! engine: this module owns its handle, translates its error codes into
//! [`SossimError`] and exposes plain Rust buffers.
//!
//! Enabled with the `transit-kernel` feature; the native library is located
//! through pkg-config at build time.

mod ffi;

use std::ffi::CString;

use camino::Utf8Path;

use crate::sossim_errors::SossimError;

/// Planet/star system parameters for one forward-model evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SystemParams {
    /// Planetary surface gravity, m/s²
    pub gravity: f64,
    /// Planet radius, m
    pub r_planet: f64,
    /// Star radius, m
    pub r_star: f64,
    /// Isothermal atmosphere temperature, K
    pub t_iso: f64,
}

/// A model transmission spectrum: wavelength in meters, transit depth as a
/// fraction of the stellar flux.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitSpectrum {
    pub wavelength: Vec<f64>,
    pub depth: Vec<f64>,
}

/// Owned handle over one kernel instance.
///
/// The instance holds the opacity tables loaded from the data directory and
/// is freed on drop. Not `Sync`: the kernel mutates internal scratch buffers
/// during compute calls.
#[derive(Debug)]
pub struct TransitKernel {
    handle: *mut libc::c_void,
}

impl TransitKernel {
    /// Load a kernel instance from its opacity-table directory.
    pub fn new(data_dir: &Utf8Path) -> Result<Self, SossimError> {
        let c_dir = CString::new(data_dir.as_str())
            .map_err(|_| SossimError::TransitKernelFailure(-1))?;
        let handle = unsafe { ffi::xtransmit_create(c_dir.as_ptr()) };
        if handle.is_null() {
            return Err(SossimError::TransitKernelFailure(-1));
        }
        Ok(TransitKernel { handle })
    }

    /// Configure the planet/star system for subsequent compute calls.
    pub fn set_system(&mut self, params: &SystemParams) -> Result<(), SossimError> {
        let code = unsafe {
            ffi::xtransmit_set_system(
                self.handle,
                params.gravity,
                params.r_planet,
                params.r_star,
                params.t_iso,
            )
        };
        if code != ffi::XT_OK {
            return Err(SossimError::TransitKernelFailure(code));
        }
        Ok(())
    }

    /// Run the forward model and return the sampled transmission spectrum.
    pub fn compute_spectrum(&mut self) -> Result<TransitSpectrum, SossimError> {
        let len = unsafe { ffi::xtransmit_n_samples(self.handle) };
        let mut wavelength = vec![0.0f64; len];
        let mut depth = vec![0.0f64; len];
        let code = unsafe {
            ffi::xtransmit_compute(
                self.handle,
                wavelength.as_mut_ptr(),
                depth.as_mut_ptr(),
                len,
            )
        };
        if code != ffi::XT_OK {
            return Err(SossimError::TransitKernelFailure(code));
        }
        Ok(TransitSpectrum { wavelength, depth })
    }
}

impl Drop for TransitKernel {
    fn drop(&mut self) {
        unsafe { ffi::xtransmit_destroy(self.handle) };
    }
}

// The handle is not tied to the creating thread; the kernel keeps no
// thread-local state.
unsafe impl Send for TransitKernel {}
