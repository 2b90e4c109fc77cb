pub mod catalog;
pub mod compositor;
pub mod constants;
pub mod conversion;
pub mod cube;
pub mod env_state;
pub mod fits_io;
pub mod geometry;
pub mod instrument;
#[cfg(feature = "progress")]
pub mod iter_timer;
pub mod models;
pub mod sossim;
pub mod sossim_errors;
#[cfg(feature = "transit-kernel")]
pub mod transit;
