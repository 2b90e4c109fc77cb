//! Raw bindings to the compiled radiative-transfer kernel.
//!
//! The kernel is an opaque native library; these declarations mirror its C
//! header. All functions returning `c_int` use 0 for success and a negative
//! code on failure.

use libc::{c_char, c_double, c_int, c_void, size_t};

pub const XT_OK: c_int = 0;

extern "C" {
    /// Create a kernel instance backed by the opacity tables in `data_dir`.
    /// Returns NULL on failure.
    pub fn xtransmit_create(data_dir: *const c_char) -> *mut c_void;

    /// Configure the planet/star system: surface gravity (m/s²), planet and
    /// star radii (m), isothermal temperature (K).
    pub fn xtransmit_set_system(
        handle: *mut c_void,
        gravity: c_double,
        r_planet: c_double,
        r_star: c_double,
        t_iso: c_double,
    ) -> c_int;

    /// Number of wavelength samples the next compute call will produce.
    pub fn xtransmit_n_samples(handle: *mut c_void) -> size_t;

    /// Run the radiative transfer and fill the caller-allocated wavelength
    /// (m) and transit-depth (fraction) buffers, each of length `len`.
    pub fn xtransmit_compute(
        handle: *mut c_void,
        wavelength: *mut c_double,
        depth: *mut c_double,
        len: size_t,
    ) -> c_int;

    pub fn xtransmit_destroy(handle: *mut c_void);
}
