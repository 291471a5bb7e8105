//! Unit propagation over a work-set of unit clauses.
//!
//! Unit propagation repeatedly takes a clause that is unit under the current partial assignment
//! and assigns its only unassigned literal, until no unit clause is left (a fixpoint) or a clause
//! has all of its literals false (a conflict).
//!
//! Instead of rescanning the formula, the work-set only receives the clauses that the
//! [`Formula`] reports as having become unit or conflicting by an assignment. At a fixpoint no
//! clause is unit, so seeding the work-set with the clauses reported for a single new decision
//! again covers all unit clauses.
use std::collections::VecDeque;

use crate::{
    context::Ctx,
    formula::{ClauseIdx, ClauseStatus, Formula},
    lit::Lit,
    log::trace,
    trail::{DecisionLevel, Reason, Step, Trail},
};

/// State of the propagation engine.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum PropState {
    /// No pass has run since the last reset.
    #[default]
    Idle,
    /// A pass is in progress.
    Propagating,
    /// The last pass ended without conflict.
    Fixpoint,
    /// The last pass ended in a conflict.
    Conflict,
}

/// A falsified clause found during propagation.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Conflict {
    /// The clause with all literals false.
    pub clause: ClauseIdx,
    /// Trail length when the pass started.
    ///
    /// The steps from this position on were assigned by the pass that found the conflict.
    pub pass_start: usize,
}

/// Propagation statistics.
#[derive(Default, Debug)]
pub struct PropStats {
    /// Total number of literals assigned by propagation.
    pub propagations: u64,
    /// Number of propagation passes.
    pub passes: u64,
}

/// Work-set and state of the propagation engine.
#[derive(Default)]
pub struct Prop {
    /// Clauses that were unit or conflicting when they were added.
    work: VecDeque<ClauseIdx>,
    /// Buffer for the clauses reported by a single assignment.
    became_unit: Vec<ClauseIdx>,
    state: PropState,
}

impl Prop {
    /// Current engine state.
    pub fn state(&self) -> PropState {
        self.state
    }

    /// Number of pending clauses in the work-set.
    pub fn pending(&self) -> usize {
        self.work.len()
    }

    /// Adds clauses to the work-set.
    pub fn seed(&mut self, clauses: impl IntoIterator<Item = ClauseIdx>) {
        self.work.extend(clauses);
    }

    /// Empties the work-set and returns to the idle state.
    pub fn reset(&mut self) {
        self.work.clear();
        self.state = PropState::Idle;
    }
}

/// Assigns a literal in the formula, records the step and queues the affected clauses.
pub fn assign(prop: &mut Prop, formula: &mut Formula, trail: &mut Trail, step: Step) {
    prop.became_unit.clear();
    formula.assign(step.assigned_lit, &mut prop.became_unit);
    trail.push(step);
    prop.work.extend(prop.became_unit.drain(..));
}

/// Propagates until a fixpoint or a conflict.
///
/// Every literal assigned here gets `decision_level`. On conflict the work-set is cleared, the
/// assignments of this pass stay in place and the caller undoes them by truncating the trail.
pub fn propagate(
    ctx: &mut Ctx,
    prop: &mut Prop,
    formula: &mut Formula,
    trail: &mut Trail,
    decision_level: DecisionLevel,
) -> Result<(), Conflict> {
    let pass_start = trail.len();
    prop.state = PropState::Propagating;
    ctx.stats.prop.passes += 1;

    while let Some(clause) = prop.work.pop_front() {
        match formula.status(clause) {
            // Satisfied by an assignment made after the clause was queued.
            ClauseStatus::Satisfied => continue,
            ClauseStatus::Conflicting => {
                trace!(ctx, "conflict", = clause, lits = formula.lits(clause));
                prop.reset();
                prop.state = PropState::Conflict;
                return Err(Conflict { clause, pass_start });
            }
            ClauseStatus::Unit => {
                let lit = implied_lit(formula, clause);
                trace!(ctx, "propagate", = lit, = clause);
                ctx.stats.prop.propagations += 1;
                assign(
                    prop,
                    formula,
                    trail,
                    Step {
                        assigned_lit: lit,
                        decision_level,
                        reason: Reason::Implied(clause),
                    },
                );
            }
            ClauseStatus::Unresolved => {
                unreachable!("{clause:?} queued for propagation but has two unassigned literals")
            }
        }
    }

    prop.state = PropState::Fixpoint;
    Ok(())
}

/// The literal forced by a unit clause.
fn implied_lit(formula: &Formula, clause: ClauseIdx) -> Lit {
    formula
        .unit_lit(clause)
        .unwrap_or_else(|| panic!("{clause:?} is unit but has no unassigned literal"))
}
