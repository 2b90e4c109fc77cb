use thiserror::Error;

#[derive(Error, Debug)]
pub enum SossimError {
    #[error("Invalid sexagesimal coordinate: {0}")]
    InvalidCoordinateFormat(String),

    #[error("HTTP ureq error: {0}")]
    UreqHttpError(#[from] Box<ureq::Error>),

    #[error("Catalog response parsing error: {0}")]
    CatalogParseError(#[from] csv::Error),

    #[error("Catalog returned no sources around RA={ra} DEC={dec}")]
    EmptyCatalog { ra: f64, dec: f64 },

    #[error("Catalog source has non-finite fields: {0}")]
    MalformedCatalogSource(String),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("FITS I/O error: {0}")]
    FitsError(#[from] fitsio::errors::Error),

    #[error("Model archive is missing or unreadable: {0}")]
    MissingModelData(String),

    #[error("Model grid axes are not parallel (teff: {teff}, J-H: {jh}, H-K: {hk})")]
    ModelGridMismatch { teff: usize, jh: usize, hk: usize },

    #[error("Temperature bucket {0} is outside the model grid")]
    UnknownTemperatureBucket(usize),

    #[error("Trace template has shape {got:?}, expected {expected:?}")]
    TemplateShapeMismatch {
        got: (usize, usize),
        expected: (usize, usize),
    },

    #[cfg(feature = "transit-kernel")]
    #[error("Transit kernel call failed with code {0}")]
    TransitKernelFailure(i32),
}

impl From<ureq::Error> for SossimError {
    fn from(err: ureq::Error) -> Self {
        SossimError::UreqHttpError(Box::new(err))
    }
}
