//! Route optimizer: single-vehicle asymmetric TSP with a fixed depot.
//!
//! Two strategies, selected by problem size: exact Held-Karp dynamic
//! programming for small instances, and a cheapest-arc construction with
//! 2-opt / or-opt local search above the exact threshold. Both return a
//! closed walk that starts and ends at the depot and visits every other
//! node exactly once, with the exact arc-cost sum as the objective.

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::matrix::CostMatrix;

#[derive(Debug, Clone)]
pub struct SolveOptions {
    /// Largest instance solved exactly; above this the heuristic is used.
    pub exact_threshold: usize,
    /// Improving-move budget for the heuristic's local search.
    pub local_search_iterations: usize,
    /// Number of greedy construction starts tried by the heuristic.
    pub max_starts: usize,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            exact_threshold: 13,
            local_search_iterations: 1000,
            max_starts: 8,
        }
    }
}

/// A solved visiting order.
///
/// `route` has length N+1: it starts and ends at the depot and contains
/// every other node exactly once. `exact` is false when the route came
/// from the heuristic (or an exhausted search budget) and so carries no
/// optimality guarantee.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub route: Vec<usize>,
    pub total_cost: i64,
    pub exact: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub enum SolveError {
    /// No closed walk over reachable arcs covers all nodes.
    NoFeasibleRoute,
    /// Fewer than two waypoints; there is nothing to order.
    TooFewWaypoints { len: usize },
    DepotOutOfBounds { depot: usize, len: usize },
}

impl std::fmt::Display for SolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveError::NoFeasibleRoute => write!(f, "no feasible route visits every waypoint"),
            SolveError::TooFewWaypoints { len } => {
                write!(f, "need at least 2 waypoints, got {}", len)
            }
            SolveError::DepotOutOfBounds { depot, len } => {
                write!(f, "depot index {} out of bounds for {} waypoints", depot, len)
            }
        }
    }
}

impl std::error::Error for SolveError {}

/// Solves the visiting order for `matrix`, choosing the strategy by size.
pub fn solve(
    matrix: &CostMatrix,
    depot: usize,
    options: &SolveOptions,
) -> Result<Solution, SolveError> {
    validate(matrix, depot)?;

    if matrix.len() <= options.exact_threshold {
        debug!(n = matrix.len(), "solving exactly with Held-Karp");
        solve_exact(matrix, depot)
    } else {
        debug!(n = matrix.len(), "instance above exact threshold, using heuristic");
        solve_heuristic(matrix, depot, options)
    }
}

/// Exact Held-Karp dynamic program, O(N^2 * 2^N).
///
/// Optimal but exponential in memory and time; callers should route
/// through [`solve`] unless they know the instance is small.
pub fn solve_exact(matrix: &CostMatrix, depot: usize) -> Result<Solution, SolveError> {
    validate(matrix, depot)?;

    let n = matrix.len();
    let others: Vec<usize> = (0..n).filter(|&node| node != depot).collect();
    let m = others.len();
    let full = 1usize << m;

    const INF: i64 = i64::MAX;

    // dp[mask][k]: cheapest path depot -> (set mask) ending at others[k].
    let mut dp = vec![vec![INF; m]; full];
    let mut parent = vec![vec![usize::MAX; m]; full];

    for (k, &node) in others.iter().enumerate() {
        if !matrix.is_unreachable(depot, node) {
            dp[1 << k][k] = matrix.cost(depot, node);
        }
    }

    for mask in 1..full {
        for last in 0..m {
            if mask & (1 << last) == 0 || dp[mask][last] == INF {
                continue;
            }
            let base = dp[mask][last];
            for next in 0..m {
                if mask & (1 << next) != 0 || matrix.is_unreachable(others[last], others[next]) {
                    continue;
                }
                let candidate = base + matrix.cost(others[last], others[next]);
                let extended = mask | (1 << next);
                if candidate < dp[extended][next] {
                    dp[extended][next] = candidate;
                    parent[extended][next] = last;
                }
            }
        }
    }

    let mut best: Option<(i64, usize)> = None;
    for last in 0..m {
        if dp[full - 1][last] == INF || matrix.is_unreachable(others[last], depot) {
            continue;
        }
        let total = dp[full - 1][last] + matrix.cost(others[last], depot);
        if best.is_none_or(|(cost, _)| total < cost) {
            best = Some((total, last));
        }
    }

    let (total_cost, mut last) = best.ok_or(SolveError::NoFeasibleRoute)?;

    let mut interior = Vec::with_capacity(m);
    let mut mask = full - 1;
    loop {
        interior.push(others[last]);
        let prev = parent[mask][last];
        mask &= !(1 << last);
        if prev == usize::MAX {
            break;
        }
        last = prev;
    }
    interior.reverse();

    let mut route = Vec::with_capacity(n + 1);
    route.push(depot);
    route.extend(interior);
    route.push(depot);

    Ok(Solution { route, total_cost, exact: true })
}

/// Heuristic solver: multi-start cheapest-arc construction improved by
/// 2-opt and or-opt local search.
pub fn solve_heuristic(
    matrix: &CostMatrix,
    depot: usize,
    options: &SolveOptions,
) -> Result<Solution, SolveError> {
    validate(matrix, depot)?;

    let n = matrix.len();
    let mut starts: Vec<usize> = (0..n)
        .filter(|&node| node != depot && !matrix.is_unreachable(depot, node))
        .collect();
    starts.sort_by_key(|&node| (matrix.cost(depot, node), node));

    let split = options.max_starts.max(1).min(starts.len());
    let fallback = starts.split_off(split);

    // A cheap first hop can lead into a dead end; if every preferred
    // start ends up infeasible, the pricier first hops remain candidates.
    let mut best = try_starts(matrix, depot, &starts, options);
    if best.is_none() && !fallback.is_empty() {
        debug!("preferred starts all infeasible, trying remaining starts");
        best = try_starts(matrix, depot, &fallback, options);
    }

    match best {
        Some((total_cost, route)) => Ok(Solution { route, total_cost, exact: false }),
        None => Err(SolveError::NoFeasibleRoute),
    }
}

fn try_starts(
    matrix: &CostMatrix,
    depot: usize,
    starts: &[usize],
    options: &SolveOptions,
) -> Option<(i64, Vec<usize>)> {
    let mut best: Option<(i64, Vec<usize>)> = None;
    for &first in starts {
        let mut route = greedy_route(matrix, depot, first);
        local_search(matrix, &mut route, options.local_search_iterations);

        if let Some(cost) = matrix.walk_cost(&route) {
            if best.as_ref().is_none_or(|(best_cost, _)| cost < *best_cost) {
                best = Some((cost, route));
            }
        }
    }
    best
}

fn validate(matrix: &CostMatrix, depot: usize) -> Result<(), SolveError> {
    let n = matrix.len();
    if n < 2 {
        return Err(SolveError::TooFewWaypoints { len: n });
    }
    if depot >= n {
        return Err(SolveError::DepotOutOfBounds { depot, len: n });
    }
    Ok(())
}

/// Builds a route greedily: from the current node, always take the
/// cheapest arc to an unvisited node. Unreachable arcs sort last, so the
/// construction only crosses one when no reachable choice remains; the
/// final feasibility check in the caller rejects such routes.
fn greedy_route(matrix: &CostMatrix, depot: usize, first: usize) -> Vec<usize> {
    let n = matrix.len();
    let mut route = Vec::with_capacity(n + 1);
    let mut visited = vec![false; n];

    route.push(depot);
    route.push(first);
    visited[depot] = true;
    visited[first] = true;

    let mut current = first;
    for _ in 2..n {
        let next = (0..n)
            .filter(|&node| !visited[node])
            .min_by_key(|&node| (matrix.cost(current, node), node))
            .unwrap();
        route.push(next);
        visited[next] = true;
        current = next;
    }

    route.push(depot);
    route
}

#[derive(Debug, Clone, Copy)]
enum LocalMove {
    /// Reverse the interior segment `[i..=j]`.
    TwoOpt { i: usize, j: usize },
    /// Remove `len` nodes at `start` and reinsert them at `dest`
    /// (an index in the shortened route).
    OrOpt { start: usize, len: usize, dest: usize },
    /// Exchange the interior nodes at `a` and `b`.
    Swap { a: usize, b: usize },
}

fn apply_move(route: &[usize], local_move: LocalMove) -> Vec<usize> {
    let mut candidate = route.to_vec();
    match local_move {
        LocalMove::TwoOpt { i, j } => candidate[i..=j].reverse(),
        LocalMove::OrOpt { start, len, dest } => {
            let segment: Vec<usize> = candidate.drain(start..start + len).collect();
            candidate.splice(dest..dest, segment);
        }
        LocalMove::Swap { a, b } => candidate.swap(a, b),
    }
    candidate
}

fn candidate_moves(route_len: usize) -> Vec<LocalMove> {
    // Interior indices are 1..=n-1 for a closed route of length n+1.
    let n = route_len - 1;
    let mut moves = Vec::new();

    for i in 1..n - 1 {
        for j in i + 1..n {
            moves.push(LocalMove::TwoOpt { i, j });
        }
    }

    for start in 1..n {
        for len in 1..=3.min(n - start) {
            for dest in 1..=n - len {
                if dest == start {
                    continue;
                }
                moves.push(LocalMove::OrOpt { start, len, dest });
            }
        }
    }

    for a in 1..n {
        for b in a + 1..n {
            moves.push(LocalMove::Swap { a, b });
        }
    }

    moves
}

/// Best-improvement local search over 2-opt and or-opt moves.
///
/// Each applied move consumes one unit of the iteration budget; on
/// exhaustion the route improved so far is kept and flagged by the
/// caller as non-optimal.
fn local_search(matrix: &CostMatrix, route: &mut Vec<usize>, iterations: usize) {
    if route.len() < 4 || iterations == 0 {
        return;
    }

    let moves = candidate_moves(route.len());
    let mut current_cost = matrix.walk_cost(route);

    for _ in 0..iterations {
        let current: &[usize] = route;
        let best = moves
            .par_iter()
            .enumerate()
            .filter_map(|(index, &local_move)| {
                let candidate = apply_move(current, local_move);
                matrix.walk_cost(&candidate).map(|cost| (cost, index, candidate))
            })
            .min_by_key(|&(cost, index, _)| (cost, index));

        match best {
            Some((cost, _, candidate))
                if current_cost.is_none_or(|current_best| cost < current_best) =>
            {
                *route = candidate;
                current_cost = Some(cost);
            }
            _ => return,
        }
    }

    warn!(iterations, "local search budget exhausted before convergence");
}
