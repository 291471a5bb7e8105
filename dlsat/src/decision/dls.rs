//! DLS decision heuristic.
//!
//! This implements the Dynamic Largest Sum heuristic. Every unassigned variable `v` is scored by
//! the number of live (not yet satisfied) clauses it occurs in, `posOcc(v) + negOcc(v)`, and the
//! variable with the highest score is selected. Ties go to the variable with the lowest index, so
//! that the search is deterministic.
//!
//! The variable is tried with the polarity that occurs in more live clauses first (`true` when
//! both occur equally often), which satisfies as many clauses as possible with a single decision.
//!
//! The occurrence counts are maintained incrementally by the [`Formula`], so selecting a branch
//! is a single scan over the variables without touching any clause.
use crate::{error::NoUnassignedVariableError, formula::Formula, lit::Lit};

/// Selects the next branching literal.
///
/// The returned literal is the variable to branch on with its first value, i.e. a positive literal
/// for trying `true` first.
pub fn select_branch(formula: &Formula) -> Result<Lit, NoUnassignedVariableError> {
    let mut best = None;
    let mut best_score = 0;

    for var in formula.values().unassigned_vars() {
        let score = formula.occurrences(var).total();
        // Strictly greater, so the lowest index wins ties.
        if best.is_none() || score > best_score {
            best = Some(var);
            best_score = score;
        }
    }

    let var = best.ok_or(NoUnassignedVariableError)?;
    let occurrences = formula.occurrences(var);
    Ok(var.lit(occurrences.positive >= occurrences.negative))
}
