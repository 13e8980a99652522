//! hospital-planner core
//!
//! Plans a single-vehicle visiting order over selected hospitals,
//! starting and ending at a fixed depot, using a traffic-aware
//! travel-time matrix from an injectable provider.

pub mod traits;
pub mod matrix;
pub mod solver;
pub mod plan;
pub mod wkt;
pub mod spreadsheet;
pub mod gmaps;
pub mod haversine;
