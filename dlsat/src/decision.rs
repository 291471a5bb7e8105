//! Decision heuristics.
pub mod dls;
