//! End-to-end trip planning over selected hospitals.
//!
//! Builds the waypoint list with the depot first, fetches the cost
//! matrix once from the injected provider, solves the visiting order
//! once, and maps the solved indices back to waypoints. Nothing is
//! persisted across runs.

use serde::Serialize;
use tracing::{info, warn};

use crate::matrix::CostMatrix;
use crate::solver::{self, SolveError, SolveOptions};
use crate::traits::{CostMatrixProvider, ProviderError};

/// A place to visit: a hospital, or the depot the trip starts and ends at.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Waypoint {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl Waypoint {
    pub fn new(id: impl Into<String>, name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self { id: id.into(), name: name.into(), lat, lon }
    }

    pub fn location(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }
}

/// A computed visiting order.
///
/// `stops` is the closed walk: it begins and ends with the depot and
/// contains every selected hospital exactly once. `total_cost` is the
/// sum of travel-time seconds along the walk, exactly as the matrix
/// reported them.
#[derive(Debug, Clone, Serialize)]
pub struct RoutePlan {
    pub stops: Vec<Waypoint>,
    pub total_cost: i64,
    /// False when the order came from the heuristic and may be suboptimal.
    pub exact: bool,
    /// Waypoint pairs the provider could not price (partial result).
    pub missing_pairs: usize,
}

impl RoutePlan {
    /// Directions link for the computed order, one `lat,lon` per stop.
    pub fn maps_url(&self) -> String {
        let legs: Vec<String> = self
            .stops
            .iter()
            .map(|stop| format!("{},{}", stop.lat, stop.lon))
            .collect();
        format!("https://www.google.com/maps/dir/{}", legs.join("/"))
    }
}

#[derive(Debug)]
pub enum PlanError {
    /// No hospitals were selected; there is no trip to plan.
    NoStops,
    Provider(ProviderError),
    NoFeasibleRoute,
    Solver(SolveError),
}

impl From<ProviderError> for PlanError {
    fn from(err: ProviderError) -> Self {
        PlanError::Provider(err)
    }
}

impl From<SolveError> for PlanError {
    fn from(err: SolveError) -> Self {
        match err {
            SolveError::NoFeasibleRoute => PlanError::NoFeasibleRoute,
            other => PlanError::Solver(other),
        }
    }
}

impl std::fmt::Display for PlanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanError::NoStops => write!(f, "no hospitals selected"),
            PlanError::Provider(err) => write!(f, "{}", err),
            PlanError::NoFeasibleRoute => write!(f, "could not find a feasible visiting order"),
            PlanError::Solver(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for PlanError {}

/// Plans the visiting order for `stops`, starting and ending at `depot`.
pub fn plan_route<P: CostMatrixProvider>(
    depot: &Waypoint,
    stops: &[Waypoint],
    provider: &P,
    options: &SolveOptions,
) -> Result<RoutePlan, PlanError> {
    if stops.is_empty() {
        return Err(PlanError::NoStops);
    }

    let mut locations = Vec::with_capacity(stops.len() + 1);
    locations.push(depot.location());
    locations.extend(stops.iter().map(Waypoint::location));

    let matrix = provider.matrix_for(&locations)?;
    if !matrix.missing_pairs().is_empty() {
        warn!(
            missing = matrix.missing_pairs().len(),
            "planning on a partial matrix"
        );
    }

    plan_route_with_matrix(depot, stops, &matrix, options)
}

/// Plans from a pre-built matrix, for callers that already hold one.
///
/// The matrix must be indexed with the depot at 0 followed by `stops`
/// in order.
pub fn plan_route_with_matrix(
    depot: &Waypoint,
    stops: &[Waypoint],
    matrix: &CostMatrix,
    options: &SolveOptions,
) -> Result<RoutePlan, PlanError> {
    if stops.is_empty() {
        return Err(PlanError::NoStops);
    }

    // A wrong-size matrix would either drop stops or index past them.
    let expected = stops.len() + 1;
    if matrix.len() != expected {
        return Err(PlanError::Provider(ProviderError::Malformed(format!(
            "matrix is {}x{}, expected {}x{} for depot plus {} stops",
            matrix.len(),
            matrix.len(),
            expected,
            expected,
            stops.len()
        ))));
    }

    let solution = solver::solve(matrix, 0, options)?;
    let ordered = solution
        .route
        .iter()
        .map(|&index| {
            if index == 0 {
                depot.clone()
            } else {
                stops[index - 1].clone()
            }
        })
        .collect();

    info!(
        stops = stops.len(),
        total_cost = solution.total_cost,
        exact = solution.exact,
        "route planned"
    );

    Ok(RoutePlan {
        stops: ordered,
        total_cost: solution.total_cost,
        exact: solution.exact,
        missing_pairs: matrix.missing_pairs().len(),
    })
}
