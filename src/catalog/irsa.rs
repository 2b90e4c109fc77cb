//! IRSA cone-search client
//!
//! Queries the 2MASS point-source catalog through IRSA's TAP service and
//! deserializes the CSV response into [`CatalogSource`] records.

use serde::Deserialize;

use crate::catalog::{CatalogSource, StarCatalog};
use crate::constants::Degree;
use crate::env_state::SossimEnv;
use crate::sossim_errors::SossimError;

const IRSA_TAP_URL: &str = "https://irsa.ipac.caltech.edu/TAP/sync";

/// 2MASS point-source catalog served by IRSA.
#[derive(Debug, Clone)]
pub struct IrsaCatalog {
    env: SossimEnv,
    table: String,
}

/// One row of the TAP CSV response. Field names follow the 2MASS column
/// names so the header row maps directly.
#[derive(Debug, Deserialize, PartialEq)]
struct IrsaRecord {
    ra: f64,
    dec: f64,
    j_m: Option<f64>,
    h_m: Option<f64>,
    k_m: Option<f64>,
}

impl IrsaCatalog {
    /// Client over the default 2MASS point-source table (`fp_psc`).
    pub fn new(env: SossimEnv) -> Self {
        IrsaCatalog {
            env,
            table: "fp_psc".to_string(),
        }
    }

    fn query_url(&self, ra: Degree, dec: Degree, radius_arcmin: f64) -> String {
        let radius_deg = radius_arcmin / 60.0;
        let query = format!(
            "SELECT ra,dec,j_m,h_m,k_m FROM {} \
             WHERE CONTAINS(POINT('ICRS',ra,dec),CIRCLE('ICRS',{ra},{dec},{radius_deg}))=1",
            self.table
        );
        format!(
            "{IRSA_TAP_URL}?QUERY={}&FORMAT=CSV",
            query.replace(' ', "+")
        )
    }
}

impl StarCatalog for IrsaCatalog {
    fn query_region(
        &self,
        ra: Degree,
        dec: Degree,
        radius_arcmin: f64,
    ) -> Result<Vec<CatalogSource>, SossimError> {
        let url = self.query_url(ra, dec, radius_arcmin);
        log::debug!("catalog cone search: {url}");
        let body = self.env.get_from_url(url.as_str())?;
        deserialize_cone_search(&body)
    }
}

/// Parse a TAP CSV response into catalog sources.
///
/// Rows with missing photometry (blank magnitude columns) cannot be
/// classified and are dropped; the count is logged.
fn deserialize_cone_search(body: &str) -> Result<Vec<CatalogSource>, SossimError> {
    let mut reader = csv::Reader::from_reader(body.as_bytes());
    let mut sources = Vec::new();
    let mut dropped = 0usize;

    for record in reader.deserialize::<IrsaRecord>() {
        let record = record?;
        match (record.j_m, record.h_m, record.k_m) {
            (Some(j_mag), Some(h_mag), Some(k_mag)) => sources.push(CatalogSource {
                ra: record.ra,
                dec: record.dec,
                j_mag,
                h_mag,
                k_mag,
            }),
            _ => dropped += 1,
        }
    }

    if dropped > 0 {
        log::debug!("dropped {dropped} catalog rows with missing photometry");
    }
    Ok(sources)
}
