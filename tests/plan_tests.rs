//! End-to-end planning tests using fixed-matrix test doubles and the
//! haversine provider with real Barranquilla hospital coordinates.

mod fixtures;

use hospital_planner::matrix::{CostMatrix, UNREACHABLE};
use hospital_planner::haversine::HaversineMatrix;
use hospital_planner::plan::{plan_route, PlanError, Waypoint};
use hospital_planner::solver::SolveOptions;
use hospital_planner::traits::{CostMatrixProvider, ProviderError};

use fixtures::barranquilla_hospitals::{depot, stops};

// ============================================================================
// Test doubles
// ============================================================================

/// Provider returning a canned matrix regardless of the locations.
struct FixedMatrix(Vec<Vec<i64>>);

impl CostMatrixProvider for FixedMatrix {
    fn matrix_for(&self, _locations: &[(f64, f64)]) -> Result<CostMatrix, ProviderError> {
        CostMatrix::from_rows(self.0.clone())
            .map_err(|err| ProviderError::Malformed(err.to_string()))
    }
}

/// Provider that is always down.
struct DownProvider;

impl CostMatrixProvider for DownProvider {
    fn matrix_for(&self, _locations: &[(f64, f64)]) -> Result<CostMatrix, ProviderError> {
        Err(ProviderError::Unavailable("connection refused".to_string()))
    }
}

fn ids(plan_stops: &[Waypoint]) -> Vec<&str> {
    plan_stops.iter().map(|stop| stop.id.as_str()).collect()
}

// ============================================================================
// Planning against fixed matrices
// ============================================================================

#[test]
fn plans_the_known_optimal_order() {
    let provider = FixedMatrix(vec![
        vec![0, 10, 15, 20],
        vec![10, 0, 35, 25],
        vec![15, 35, 0, 30],
        vec![20, 25, 30, 0],
    ]);

    let plan = plan_route(&depot(), &stops(3), &provider, &SolveOptions::default()).unwrap();

    assert_eq!(plan.total_cost, 80);
    assert!(plan.exact);
    assert_eq!(plan.missing_pairs, 0);
    assert_eq!(plan.stops.len(), 5);
    assert_eq!(plan.stops[0].id, "UPCA");
    assert_eq!(plan.stops[4].id, "UPCA");
    assert!(
        ids(&plan.stops) == vec!["UPCA", "H01", "H03", "H02", "UPCA"]
            || ids(&plan.stops) == vec!["UPCA", "H02", "H03", "H01", "UPCA"],
        "unexpected order {:?}",
        ids(&plan.stops)
    );
}

#[test]
fn partial_matrix_is_reported_but_still_planned() {
    // The 1 -> 2 arc is missing; the optimum avoids it anyway.
    let provider = FixedMatrix(vec![
        vec![0, 10, 10],
        vec![10, 0, UNREACHABLE],
        vec![10, 10, 0],
    ]);

    let plan = plan_route(&depot(), &stops(2), &provider, &SolveOptions::default()).unwrap();

    assert_eq!(plan.missing_pairs, 1);
    assert_eq!(plan.total_cost, 30);
    assert_eq!(ids(&plan.stops), vec!["UPCA", "H02", "H01", "UPCA"]);
}

#[test]
fn infeasible_matrix_surfaces_no_feasible_route() {
    let provider = FixedMatrix(vec![
        vec![0, 5, UNREACHABLE],
        vec![5, 0, UNREACHABLE],
        vec![5, 5, 0],
    ]);

    let err = plan_route(&depot(), &stops(2), &provider, &SolveOptions::default()).unwrap_err();
    assert!(matches!(err, PlanError::NoFeasibleRoute));
}

#[test]
fn empty_selection_is_rejected() {
    let provider = FixedMatrix(vec![vec![0]]);
    let err = plan_route(&depot(), &[], &provider, &SolveOptions::default()).unwrap_err();
    assert!(matches!(err, PlanError::NoStops));
}

#[test]
fn undersized_matrix_is_rejected_instead_of_dropping_stops() {
    // 3x3 matrix for depot + 3 stops: one hospital would silently vanish.
    let provider = FixedMatrix(vec![
        vec![0, 10, 15],
        vec![10, 0, 35],
        vec![15, 35, 0],
    ]);

    let err = plan_route(&depot(), &stops(3), &provider, &SolveOptions::default()).unwrap_err();
    assert!(matches!(err, PlanError::Provider(ProviderError::Malformed(_))));
}

#[test]
fn oversized_matrix_is_rejected_instead_of_panicking() {
    // 4x4 matrix for depot + 1 stop: solved indices would run past `stops`.
    let provider = FixedMatrix(vec![
        vec![0, 10, 15, 20],
        vec![10, 0, 35, 25],
        vec![15, 35, 0, 30],
        vec![20, 25, 30, 0],
    ]);

    let err = plan_route(&depot(), &stops(1), &provider, &SolveOptions::default()).unwrap_err();
    assert!(matches!(err, PlanError::Provider(ProviderError::Malformed(_))));
}

#[test]
fn provider_outage_propagates_as_typed_error() {
    let err = plan_route(&depot(), &stops(3), &DownProvider, &SolveOptions::default()).unwrap_err();
    assert!(matches!(err, PlanError::Provider(ProviderError::Unavailable(_))));
}

// ============================================================================
// Realistic planning over Barranquilla hospitals
// ============================================================================

#[test]
fn plans_a_full_hospital_round_trip() {
    let selected = stops(8);
    let plan = plan_route(
        &depot(),
        &selected,
        &HaversineMatrix::default(),
        &SolveOptions::default(),
    )
    .unwrap();

    assert_eq!(plan.stops.len(), selected.len() + 2);
    assert_eq!(plan.stops.first().map(|s| s.id.as_str()), Some("UPCA"));
    assert_eq!(plan.stops.last().map(|s| s.id.as_str()), Some("UPCA"));
    assert!(plan.exact, "9 waypoints should be solved exactly");
    assert!(plan.total_cost > 0);

    // Every selected hospital appears exactly once in the interior.
    let mut interior: Vec<&str> = ids(&plan.stops)[1..=selected.len()].to_vec();
    interior.sort_unstable();
    let mut expected: Vec<&str> = selected.iter().map(|s| s.id.as_str()).collect();
    expected.sort_unstable();
    assert_eq!(interior, expected);
}

#[test]
fn round_trip_is_no_worse_than_the_roster_order() {
    let selected = stops(6);
    let provider = HaversineMatrix::default();
    let options = SolveOptions::default();

    let plan = plan_route(&depot(), &selected, &provider, &options).unwrap();

    // Cost of visiting in roster order, for comparison.
    let mut locations = vec![depot().location()];
    locations.extend(selected.iter().map(Waypoint::location));
    let matrix = provider.matrix_for(&locations).unwrap();
    let roster_walk: Vec<usize> = (0..=selected.len()).chain([0]).collect();
    let roster_cost = matrix.walk_cost(&roster_walk).unwrap();

    assert!(plan.total_cost <= roster_cost);
}

// ============================================================================
// Directions link
// ============================================================================

#[test]
fn maps_url_lists_every_stop_in_order() {
    let provider = FixedMatrix(vec![
        vec![0, 10, 15, 20],
        vec![10, 0, 35, 25],
        vec![15, 35, 0, 30],
        vec![20, 25, 30, 0],
    ]);

    let plan = plan_route(&depot(), &stops(3), &provider, &SolveOptions::default()).unwrap();
    let url = plan.maps_url();

    assert!(url.starts_with("https://www.google.com/maps/dir/"));
    let legs: Vec<&str> = url["https://www.google.com/maps/dir/".len()..]
        .split('/')
        .collect();
    assert_eq!(legs.len(), plan.stops.len());
    assert_eq!(legs.first(), legs.last(), "route must close at the depot");

    let upca = depot();
    assert_eq!(legs[0], format!("{},{}", upca.lat, upca.lon));
}
