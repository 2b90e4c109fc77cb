use crate::constants::{Degree, ARCSEC_PER_DEG, DEG_PER_HOUR};
use crate::sossim_errors::SossimError;

/// Split a sexagesimal string into its three numeric fields.
///
/// Accepts colon- or whitespace-separated input (`"10:00:00"`, `"10 00 00"`).
fn sexagesimal_fields(value: &str) -> Option<[&str; 3]> {
    let parts: Vec<&str> = value
        .split(|c: char| c == ':' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect();
    if parts.len() != 3 {
        return None;
    }
    Some([parts[0], parts[1], parts[2]])
}

/// Parse a right ascension string to degrees
///
/// Arguments
/// ---------
/// * `ra`: a string representing the right ascension in the format `HH:MM:SS.SS`
///   (whitespace separators are also accepted)
///
/// Returns
/// -------
/// * The right ascension in degrees, or [`SossimError::InvalidCoordinateFormat`]
///   if the input does not decompose into three numeric fields.
pub fn parse_ra_to_deg(ra: &str) -> Result<Degree, SossimError> {
    let invalid = || SossimError::InvalidCoordinateFormat(ra.to_string());
    let [h, m, s] = sexagesimal_fields(ra).ok_or_else(invalid)?;

    let h: f64 = h.parse().map_err(|_| invalid())?;
    let m: f64 = m.parse().map_err(|_| invalid())?;
    let s: f64 = s.parse().map_err(|_| invalid())?;

    Ok((h + m / 60.0 + s / 3600.0) * DEG_PER_HOUR)
}

/// Parse a declination string to degrees
///
/// Arguments
/// ---------
/// * `dec`: a string representing the declination in the format `±DD:MM:SS.SS`
///   (whitespace separators are also accepted)
///
/// Returns
/// -------
/// * The declination in degrees, or [`SossimError::InvalidCoordinateFormat`]
///   if the input does not decompose into three numeric fields.
pub fn parse_dec_to_deg(dec: &str) -> Result<Degree, SossimError> {
    let invalid = || SossimError::InvalidCoordinateFormat(dec.to_string());
    let [d_raw, m, s] = sexagesimal_fields(dec).ok_or_else(invalid)?;

    let sign = if d_raw.starts_with('-') { -1.0 } else { 1.0 };
    let d: f64 = d_raw
        .trim_start_matches(&['-', '+'][..])
        .parse()
        .map_err(|_| invalid())?;
    let m: f64 = m.parse().map_err(|_| invalid())?;
    let s: f64 = s.parse().map_err(|_| invalid())?;

    Ok(sign * (d + m / 60.0 + s / 3600.0))
}

/// Format a right ascension in degrees as an `hh:mm:ss` string.
///
/// The value is decomposed in hours of right ascension. When `round_seconds`
/// is set the seconds field is truncated to an integer, otherwise it is kept
/// as a real number.
///
/// Arguments
/// ---------
/// * `ra`: right ascension in degrees, finite
/// * `round_seconds`: truncate the seconds field to an integer
pub fn ra_to_hms(ra: Degree, round_seconds: bool) -> String {
    let (sign, ra) = if ra < 0.0 { ("-", -ra) } else { ("", ra) };
    let hours = ra / DEG_PER_HOUR;
    let h = hours as u32;
    let m = ((hours - h as f64) * 60.0) as u32;
    let s = ((hours - h as f64) * 60.0 - m as f64) * 60.0;
    if round_seconds {
        format!("{sign}{h:02}:{m:02}:{:02}", s as u32)
    } else {
        format!("{sign}{h:02}:{m:02}:{s}")
    }
}

/// Format a declination in degrees as a `±dd:mm:ss` string.
///
/// The sign is extracted before the magnitude is decomposed, so values in
/// (-1, 0) keep their sign. When `round_seconds` is set the seconds field is
/// truncated to an integer, otherwise it is kept as a real number.
///
/// Arguments
/// ---------
/// * `dec`: declination in degrees, finite
/// * `round_seconds`: truncate the seconds field to an integer
pub fn dec_to_dms(dec: Degree, round_seconds: bool) -> String {
    let (sign, dec) = if dec < 0.0 { ("-", -dec) } else { ("+", dec) };
    let d = dec as u32;
    let m = ((dec - d as f64) * 60.0) as u32;
    let s = ((dec - d as f64) * 60.0 - m as f64) * 60.0;
    if round_seconds {
        format!("{sign}{d:02}:{m:02}:{:02}", s as u32)
    } else {
        format!("{sign}{d:02}:{m:02}:{s}")
    }
}

/// Convert an arcsecond separation on the sky to degrees of right ascension
/// at a given declination.
pub fn arcsec_to_ra_deg(offset: f64, dec: Degree) -> Degree {
    offset / ARCSEC_PER_DEG / (dec * crate::constants::RADEG).cos()
}
