//! Provider seam for travel-cost matrices.
//!
//! Concrete adapters (Google Distance Matrix, haversine fallback, test
//! doubles with fixed matrices) implement [`CostMatrixProvider`]; the
//! planner only ever sees this trait.

use crate::matrix::CostMatrix;

/// Produces a pairwise travel-cost matrix for a set of locations.
///
/// Locations are (latitude, longitude) pairs; the matrix is indexed by
/// the provided location order. A provider that can only resolve some
/// pairs must still return a full matrix, filling the gaps with the
/// [`crate::matrix::UNREACHABLE`] sentinel and recording them as missing
/// pairs. Only a whole-provider failure is an error.
pub trait CostMatrixProvider {
    fn matrix_for(&self, locations: &[(f64, f64)]) -> Result<CostMatrix, ProviderError>;
}

#[derive(Debug)]
pub enum ProviderError {
    /// The provider could not be reached or returned no usable payload.
    Unavailable(String),
    /// The provider answered but the response did not match the request.
    Malformed(String),
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderError::Unavailable(detail) => write!(f, "matrix provider unavailable: {}", detail),
            ProviderError::Malformed(detail) => write!(f, "matrix provider response malformed: {}", detail),
        }
    }
}

impl std::error::Error for ProviderError {}
