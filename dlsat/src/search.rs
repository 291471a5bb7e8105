//! DPLL search.
//!
//! The search is a state machine driven by [`search_step`]:
//!
//! * `Deciding`: if every clause is satisfied, the formula is satisfiable. Otherwise the DLS
//!   heuristic picks a branching literal, which opens a new [`DecisionFrame`] and is assigned.
//! * `Propagating`: unit propagation runs to a fixpoint (back to `Deciding`) or to a conflict
//!   (`Backtrack`).
//! * `Backtrack`: the assignments of the innermost decision are undone. If its second value was
//!   not tried yet, that value is assigned at the same decision level and propagated. Otherwise
//!   the frame is dropped and backtracking continues one level up. Without any frame left, the
//!   formula is unsatisfiable.
//!
//! Decision frames live on an explicit stack, so the search depth is not limited by the call
//! stack. No clauses are learned and backtracking is strictly chronological.
use crate::{
    context::Ctx,
    decision::dls::select_branch,
    formula::Formula,
    lit::{LitIdx, Var},
    log::{debug, trace, verbose},
    model::Model,
    prop::{self, propagate, Prop},
    report::report,
    tracking::Resize,
    trail::{DecisionLevel, Reason, Step, Trail},
};

/// Number of conflicts between two progress reports.
const REPORT_INTERVAL: u64 = 1 << 14;

/// A branching decision that can still be revised.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct DecisionFrame {
    /// The branching variable.
    pub var: Var,
    /// The value tried first.
    pub first_value: bool,
    /// Whether the second value is being tried.
    pub flipped: bool,
    /// Trail length before the branching variable was assigned.
    pub trail_len: usize,
}

/// State of the search controller.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SearchState {
    /// Checking for a model or making a decision.
    Deciding,
    /// Running unit propagation.
    Propagating,
    /// Undoing assignments after a conflict.
    Backtrack,
    /// Found a satisfying assignment.
    Success,
    /// Proved that no satisfying assignment exists.
    Failure,
}

/// DPLL search data structures.
pub struct Search {
    /// The formula with the current assignment.
    pub formula: Formula,
    /// All current assignments in chronological order.
    pub trail: Trail,
    /// Propagation work-set.
    pub prop: Prop,
    frames: Vec<DecisionFrame>,
    state: SearchState,
}

impl Search {
    /// Prepares a search for the given formula.
    ///
    /// The search starts by propagating the formula's unit clauses before the first decision.
    pub fn new(formula: Formula) -> Self {
        let mut trail = Trail::default();
        trail.resize(formula.var_count());

        let mut prop = Prop::default();
        prop.seed(formula.unit_clauses());

        Search {
            formula,
            trail,
            prop,
            frames: vec![],
            state: SearchState::Propagating,
        }
    }

    /// Current state.
    pub fn state(&self) -> SearchState {
        self.state
    }

    /// Open decision frames, outermost first.
    pub fn frames(&self) -> &[DecisionFrame] {
        &self.frames
    }

    /// Number of open decision frames.
    pub fn decision_level(&self) -> DecisionLevel {
        DecisionLevel(self.frames.len() as LitIdx)
    }

    /// The satisfying assignment found by a successful search.
    ///
    /// Variables left unassigned occur in no live clause and are reported as `true`.
    pub fn model(&self) -> Option<Model> {
        (self.state == SearchState::Success).then(|| {
            let values = self.formula.values();
            Model::from_fn(self.formula.var_count(), |var| {
                values.value(var.lit(true)).unwrap_or(true)
            })
        })
    }
}

/// Performs one step of DPLL search.
///
/// Returns `Some(true)` once the formula is known to be satisfiable and `Some(false)` once it is
/// known to be unsatisfiable.
pub fn search_step(ctx: &mut Ctx, search: &mut Search) -> Option<bool> {
    let Search {
        formula,
        trail,
        prop,
        frames,
        state,
    } = search;
    let decision_level = DecisionLevel(frames.len() as LitIdx);

    match *state {
        SearchState::Deciding => {
            if formula.all_satisfied() {
                verbose!(ctx, "satisfiable", decisions = ctx.stats.search.decisions);
                *state = SearchState::Success;
                return Some(true);
            }

            // Propagation reached a fixpoint, so with every variable assigned no clause could
            // be unit or unresolved and thus all would be satisfied.
            let lit = match select_branch(formula) {
                Ok(lit) => lit,
                Err(err) => panic!(
                    "{err}: {} of {} clauses unsatisfied at a propagation fixpoint",
                    formula.clause_count() - formula.satisfied_count(),
                    formula.clause_count(),
                ),
            };

            ctx.stats.search.decisions += 1;
            frames.push(DecisionFrame {
                var: lit.var(),
                first_value: lit.is_positive(),
                flipped: false,
                trail_len: trail.len(),
            });
            let decision_level = DecisionLevel(frames.len() as LitIdx);
            ctx.stats.search.max_depth = ctx.stats.search.max_depth.max(frames.len());

            trace!(ctx, decision = lit, level = decision_level);
            prop::assign(
                prop,
                formula,
                trail,
                Step {
                    assigned_lit: lit,
                    decision_level,
                    reason: Reason::Decision,
                },
            );
            *state = SearchState::Propagating;
        }
        SearchState::Propagating => {
            match propagate(ctx, prop, formula, trail, decision_level) {
                Ok(()) => *state = SearchState::Deciding,
                Err(conflict) => {
                    ctx.stats.search.conflicts += 1;
                    trace!(ctx, "conflict", clause = conflict.clause, level = decision_level);
                    *state = SearchState::Backtrack;
                }
            }
        }
        SearchState::Backtrack => {
            let Some(frame) = frames.last_mut() else {
                // Conflict without any decision, no assignment can satisfy the formula.
                verbose!(ctx, "unsatisfiable", conflicts = ctx.stats.search.conflicts);
                *state = SearchState::Failure;
                return Some(false);
            };

            trail.backtrack_to(frame.trail_len, &mut *formula);

            if frame.flipped {
                debug!(ctx, "backtrack", var = frame.var, level = decision_level);
                ctx.stats.search.backtracks += 1;
                frames.pop();
            } else {
                frame.flipped = true;
                ctx.stats.search.flips += 1;

                let lit = frame.var.lit(!frame.first_value);
                debug!(ctx, "flip", = lit, level = decision_level);
                prop::assign(
                    prop,
                    formula,
                    trail,
                    Step {
                        assigned_lit: lit,
                        decision_level,
                        reason: Reason::Flip,
                    },
                );
                *state = SearchState::Propagating;
            }
        }
        SearchState::Success => return Some(true),
        SearchState::Failure => return Some(false),
    }

    if search.state == SearchState::Backtrack && ctx.stats.search.conflicts % REPORT_INTERVAL == 0
    {
        report(ctx, search);
    }

    None
}

/// Statistics for the DPLL search.
#[derive(Default, Debug)]
pub struct SearchStats {
    /// Total number of decisions.
    pub decisions: u64,
    /// Total number of conflicts.
    pub conflicts: u64,
    /// Decisions whose second value was tried.
    pub flips: u64,
    /// Decisions abandoned after both values failed.
    pub backtracks: u64,
    /// Largest number of simultaneously open decisions.
    pub max_depth: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{formula::ClauseStatus, lit::Lit};

    macro_rules! formula {
        ($var_count:literal vars $($($lit:literal),+);* $(;)?) => {{
            let clauses: Vec<Vec<Lit>> = vec![$(vec![$(Lit::from_dimacs($lit)),+]),*];
            Formula::load(&mut Ctx::default(), $var_count, clauses).unwrap()
        }};
    }

    /// Runs the search to completion, checking invariants after every step.
    fn run(ctx: &mut Ctx, search: &mut Search) -> bool {
        loop {
            if let Some(verdict) = search_step(ctx, search) {
                return verdict;
            }
            if search.state() == SearchState::Deciding {
                // At a fixpoint no clause is unit or conflicting.
                for clause in search.formula.clause_indices() {
                    assert!(matches!(
                        search.formula.status(clause),
                        ClauseStatus::Satisfied | ClauseStatus::Unresolved
                    ));
                }
            }
            assert_eq!(search.trail.len(), search.formula.values().assigned_count());
            assert_eq!(search.trail.len(), search.formula.assignment_depth());
        }
    }

    #[test]
    fn single_unit() {
        let mut ctx = Ctx::default();
        let mut search = Search::new(formula![1 vars 1]);

        assert!(run(&mut ctx, &mut search));
        assert_eq!(search.state(), SearchState::Success);
        assert_eq!(ctx.stats.search.decisions, 0);
        assert!(search.model().unwrap().value(Lit::from_dimacs(1)));
    }

    #[test]
    fn contradicting_units() {
        let mut ctx = Ctx::default();
        let mut search = Search::new(formula![1 vars 1; -1]);

        assert!(!run(&mut ctx, &mut search));
        assert_eq!(search.state(), SearchState::Failure);
        assert!(search.model().is_none());
        assert_eq!(ctx.stats.search.decisions, 0);
    }

    #[test]
    fn decision_then_propagation() {
        let mut ctx = Ctx::default();
        let mut search = Search::new(formula![2 vars
            1, 2;
            -1, 2;
            1, -2;
        ]);

        assert!(run(&mut ctx, &mut search));
        let model = search.model().unwrap();
        assert!(model.value(Lit::from_dimacs(1)));
        assert!(model.value(Lit::from_dimacs(2)));
        assert_eq!(ctx.stats.search.decisions, 1);
        assert_eq!(search.frames().len(), 1);
        assert_eq!(
            search.trail.step_for_var(Var::from_dimacs(2)).reason,
            Reason::Implied(crate::formula::ClauseIdx(1))
        );
    }

    #[test]
    fn flip_after_conflict() {
        let mut ctx = Ctx::default();
        // `1` has the most occurrences, but trying it first leads to a conflict.
        let mut search = Search::new(formula![3 vars
            1, 2;
            1, 3;
            1, 2, 3;
            -1, 2;
            -1, 3;
            -1, -2, -3;
        ]);

        assert!(run(&mut ctx, &mut search));
        let model = search.model().unwrap();
        assert!(!model.value(Lit::from_dimacs(1)));
        assert_eq!(ctx.stats.search.flips, 1);
        assert_eq!(ctx.stats.search.conflicts, 1);
        assert_eq!(search.frames()[0].var, Var::from_dimacs(1));
        assert!(search.frames()[0].flipped);
        assert_eq!(
            search.trail.step_for_var(Var::from_dimacs(1)).reason,
            Reason::Flip
        );
    }

    #[test]
    fn exhausts_both_values() {
        let mut ctx = Ctx::default();
        // Every assignment to the two variables falsifies one clause.
        let mut search = Search::new(formula![2 vars
            1, 2;
            1, -2;
            -1, 2;
            -1, -2;
        ]);

        assert!(!run(&mut ctx, &mut search));
        assert_eq!(ctx.stats.search.decisions, 1);
        assert_eq!(ctx.stats.search.flips, 1);
        assert_eq!(ctx.stats.search.backtracks, 1);
        assert_eq!(ctx.stats.search.conflicts, 2);
        assert!(search.trail.is_empty());
        assert_eq!(search.decision_level(), DecisionLevel::TOP);
        // Terminal states are sticky.
        assert_eq!(search_step(&mut ctx, &mut search), Some(false));
    }

    #[test]
    fn unassigned_variables_default_to_true() {
        let mut ctx = Ctx::default();
        let mut search = Search::new(formula![3 vars -1]);

        assert!(run(&mut ctx, &mut search));
        let model = search.model().unwrap();
        assert!(!model.value(Lit::from_dimacs(1)));
        assert!(model.value(Lit::from_dimacs(2)));
        assert!(model.value(Lit::from_dimacs(3)));
    }
}
