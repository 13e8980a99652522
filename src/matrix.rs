//! Pairwise travel-cost matrix.
//!
//! Costs are travel-time seconds. The matrix is not assumed symmetric
//! (traffic is direction-dependent). Pairs a provider could not resolve
//! carry the [`UNREACHABLE`] sentinel and are recorded as missing so
//! callers can report a partial result instead of silently routing
//! through an effectively infinite arc.

/// Sentinel cost for pairs with no known route.
///
/// Any arc at or above this value is unusable for routing.
pub const UNREACHABLE: i64 = 1_000_000_000;

#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix {
    costs: Vec<Vec<i64>>,
    missing: Vec<(usize, usize)>,
}

#[derive(Debug)]
pub enum MatrixError {
    /// Row count and column counts do not form an N x N matrix.
    NotSquare { rows: usize, row: usize, cols: usize },
    /// A cost was negative.
    NegativeCost { from: usize, to: usize, cost: i64 },
}

impl std::fmt::Display for MatrixError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatrixError::NotSquare { rows, row, cols } => {
                write!(f, "matrix is not square: {} rows but row {} has {} columns", rows, row, cols)
            }
            MatrixError::NegativeCost { from, to, cost } => {
                write!(f, "negative cost {} for pair ({}, {})", cost, from, to)
            }
        }
    }
}

impl std::error::Error for MatrixError {}

impl CostMatrix {
    /// Builds a matrix from full rows, validating shape and non-negativity.
    ///
    /// Entries at or above [`UNREACHABLE`] are normalized to the sentinel
    /// and recorded as missing pairs.
    pub fn from_rows(rows: Vec<Vec<i64>>) -> Result<Self, MatrixError> {
        let n = rows.len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(MatrixError::NotSquare { rows: n, row: i, cols: row.len() });
            }
            for (j, &cost) in row.iter().enumerate() {
                if cost < 0 {
                    return Err(MatrixError::NegativeCost { from: i, to: j, cost });
                }
            }
        }

        let mut missing = Vec::new();
        let mut costs = rows;
        for (i, row) in costs.iter_mut().enumerate() {
            for (j, cost) in row.iter_mut().enumerate() {
                if i != j && *cost >= UNREACHABLE {
                    *cost = UNREACHABLE;
                    missing.push((i, j));
                }
            }
        }

        Ok(Self { costs, missing })
    }

    /// Number of waypoints (matrix dimension).
    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }

    pub fn cost(&self, from: usize, to: usize) -> i64 {
        self.costs[from][to]
    }

    pub fn is_unreachable(&self, from: usize, to: usize) -> bool {
        self.costs[from][to] >= UNREACHABLE
    }

    /// Pairs the provider filled with the sentinel instead of a real cost.
    pub fn missing_pairs(&self) -> &[(usize, usize)] {
        &self.missing
    }

    /// Sum of arc costs along a node sequence.
    ///
    /// Returns `None` when any arc on the walk is unreachable.
    pub fn walk_cost(&self, route: &[usize]) -> Option<i64> {
        let mut total = 0;
        for pair in route.windows(2) {
            if self.is_unreachable(pair[0], pair[1]) {
                return None;
            }
            total += self.cost(pair[0], pair[1]);
        }
        Some(total)
    }
}
