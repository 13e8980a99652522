//! Point-geometry text parsing.
//!
//! Hospital rosters carry locations as WKT point strings such as
//! `POINT (-74.8063 10.9878)`. Note the WKT token order is
//! longitude first; the parsed pair is returned as (latitude, longitude).

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinateError {
    pub text: String,
}

impl std::fmt::Display for CoordinateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "malformed coordinate text: {:?}", self.text)
    }
}

impl std::error::Error for CoordinateError {}

/// Extracts a (latitude, longitude) pair from a WKT point string.
///
/// Tolerates extra whitespace and missing parentheses: the `POINT`
/// marker and parentheses are stripped, and the first two remaining
/// numeric tokens are read as longitude then latitude. Anything with
/// fewer than two numeric tokens is malformed.
pub fn parse_point(text: &str) -> Result<(f64, f64), CoordinateError> {
    let stripped = text
        .trim()
        .replace("POINT", "")
        .replace(['(', ')'], " ");

    let mut tokens = stripped
        .split_whitespace()
        .filter_map(|token| token.parse::<f64>().ok());

    match (tokens.next(), tokens.next()) {
        (Some(lon), Some(lat)) => Ok((lat, lon)),
        _ => Err(CoordinateError { text: text.to_string() }),
    }
}
