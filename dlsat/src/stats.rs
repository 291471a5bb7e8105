//! Solver statistics

use crate::{formula::FormulaStats, prop::PropStats, search::SearchStats};

/// Solver statistics
///
/// Reset at the start of every solve.
#[allow(missing_docs)]
#[derive(Default, Debug)]
pub struct Stats {
    pub prop: PropStats,
    pub search: SearchStats,
    pub formula: FormulaStats,
}
