//! dlsat is a DPLL SAT solver that branches using the dynamic largest sum (DLS) heuristic.
//!
//! The solver keeps live occurrence counts for every literal up to date during the search, so
//! that each decision can pick the variable occurring in the most not yet satisfied clauses.
//! There is no clause learning and backtracking is chronological.
#![warn(missing_docs)]

pub mod context;
pub mod decision;
pub mod error;
pub mod formula;
pub mod lit;
pub mod log;
pub mod model;
pub mod partial_assignment;
pub mod prop;
pub mod report;
pub mod search;
pub mod solver;
pub mod stats;
pub mod tracking;
pub mod trail;
pub mod vec_map;
