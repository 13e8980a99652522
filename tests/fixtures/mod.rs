//! Test fixtures for hospital-planner.
//!
//! Provides realistic test data: real Barranquilla-area hospital
//! locations plus the UPCA depot.

pub mod barranquilla_hospitals;

#[allow(unused_imports)]
pub use barranquilla_hospitals::*;
