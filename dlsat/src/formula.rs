//! Formula store with live occurrence bookkeeping.
//!
//! The formula store owns the clauses of the formula together with the current partial
//! assignment. For every clause it tracks how many of its literals are true and false, which
//! determines the clause's [`ClauseStatus`]. A clause is *live* while it is not satisfied.
//!
//! For every literal the store maintains the number of live clauses containing it. The DLS
//! decision heuristic uses these counts to pick the branch that satisfies the most live clauses.
//! When a clause becomes satisfied, the counts of all its other literals are decremented and each
//! decrement is recorded in an [`UndoLedger`], so that [`Formula::unassign`] restores the counts
//! exactly, without rescanning any clause.
//!
//! For every unassigned variable `v` this maintains the invariant that the live occurrence count
//! of `v` (`!v`) equals the number of non-satisfied clauses containing `v` (`!v`). Counts of
//! assigned variables are not meaningful.
use crate::{
    context::Ctx,
    error::MalformedFormulaError,
    lit::{Lit, LitIdx, Var},
    log::{debug, verbose},
    partial_assignment::{PartialAssignment, VarState},
    tracking::Resize,
    trail::BacktrackCallbacks,
    vec_map::VecMap,
};

use self::ledger::UndoLedger;

pub use self::clause::{ClauseCounters, ClauseIdx, ClauseStatus};

pub mod clause;
mod ledger;

/// Number of live clauses containing the positive and the negative literal of a variable.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct Occurrences {
    /// Live clauses containing the positive literal (`posOcc`).
    pub positive: LitIdx,
    /// Live clauses containing the negative literal (`negOcc`).
    pub negative: LitIdx,
}

impl Occurrences {
    /// Combined number of live occurrences.
    #[inline(always)]
    pub fn total(self) -> u64 {
        self.positive as u64 + self.negative as u64
    }
}

/// Formula statistics, collected while loading.
#[derive(Default, Debug, Clone)]
pub struct FormulaStats {
    /// Number of variables.
    pub vars: usize,
    /// Number of stored clauses.
    pub clauses: usize,
    /// Number of stored literals.
    pub lits: usize,
    /// Number of input clauses dropped for containing a literal and its negation.
    pub tautologies: usize,
    /// Number of repeated literals removed from input clauses.
    pub duplicate_lits: usize,
}

/// Clauses, variable assignment and live occurrence counts of a formula.
pub struct Formula {
    values: PartialAssignment,

    /// Literals of all clauses, stored back to back.
    lits: Vec<Lit>,
    /// Offsets into `lits`, clause `i` spans `clause_starts[i]..clause_starts[i + 1]`.
    clause_starts: Vec<LitIdx>,

    counters: VecMap<ClauseIdx, ClauseCounters>,
    /// Clauses containing a given literal.
    occurs: VecMap<Lit, Vec<ClauseIdx>>,
    /// Live occurrence count per literal.
    live: VecMap<Lit, LitIdx>,

    satisfied_count: usize,
    ledger: UndoLedger,
}

impl Resize for Formula {
    fn resize(&mut self, var_count: usize) {
        self.values.resize(var_count);
        self.occurs.resize(var_count * 2, vec![]);
        self.live.resize(var_count * 2, 0);
    }
}

impl Formula {
    /// Loads a formula over `var_count` variables.
    ///
    /// Repeated literals are merged and clauses containing a literal together with its negation
    /// are dropped, as they are satisfied by every assignment. Computes the initial live
    /// occurrence counts in a single pass over all clauses.
    ///
    /// Fails if a literal refers to a variable beyond `var_count` or, when all literals are in
    /// range, if any clause is empty.
    pub fn load<C: AsRef<[Lit]>>(
        ctx: &mut Ctx,
        var_count: usize,
        clauses: impl IntoIterator<Item = C>,
    ) -> Result<Formula, MalformedFormulaError> {
        let mut formula = Formula {
            values: PartialAssignment::default(),
            lits: vec![],
            clause_starts: vec![0],
            counters: VecMap::default(),
            occurs: VecMap::default(),
            live: VecMap::default(),
            satisfied_count: 0,
            ledger: UndoLedger::default(),
        };
        formula.resize(var_count);

        let mut stats = FormulaStats {
            vars: var_count,
            ..FormulaStats::default()
        };

        let mut first_empty = None;
        let mut buf: Vec<Lit> = vec![];

        for (position, clause) in clauses.into_iter().enumerate() {
            let input = clause.as_ref();

            if let Some(&lit) = input.iter().find(|lit| lit.index() >= var_count) {
                return Err(MalformedFormulaError::VarOutOfRange {
                    clause: position,
                    lit,
                    var_count,
                });
            }
            if input.is_empty() {
                first_empty.get_or_insert(position);
                continue;
            }

            buf.clear();
            buf.extend_from_slice(input);
            // Sorting by code places both literals of a variable next to each other.
            buf.sort_unstable();
            buf.dedup();
            stats.duplicate_lits += input.len() - buf.len();

            if buf.windows(2).any(|pair| pair[0].var() == pair[1].var()) {
                debug!(ctx, "dropping tautology", clause = position + 1);
                stats.tautologies += 1;
                continue;
            }

            formula.push_clause(&buf);
        }

        if let Some(clause) = first_empty {
            return Err(MalformedFormulaError::EmptyClause { clause });
        }

        stats.clauses = formula.clause_count();
        stats.lits = formula.lits.len();

        verbose!(
            ctx,
            "loaded",
            vars = stats.vars,
            clauses = stats.clauses,
            lits = stats.lits,
            tautologies = stats.tautologies,
        );

        ctx.stats.formula = stats;

        Ok(formula)
    }

    /// Appends a normalized, non-empty clause and counts its literals as live.
    fn push_clause(&mut self, lits: &[Lit]) {
        let clause = ClauseIdx(self.counters.len() as LitIdx);
        for &lit in lits {
            self.occurs[lit].push(clause);
            self.live[lit] += 1;
        }
        self.lits.extend_from_slice(lits);
        self.clause_starts.push(self.lits.len() as LitIdx);
        self.counters.push(ClauseCounters::default());
    }

    /// Number of variables.
    pub fn var_count(&self) -> usize {
        self.live.len() / 2
    }

    /// Number of stored clauses.
    pub fn clause_count(&self) -> usize {
        self.counters.len()
    }

    /// Iterates over all clause indices.
    pub fn clause_indices(&self) -> impl Iterator<Item = ClauseIdx> {
        self.counters.keys()
    }

    /// Literals of a clause.
    #[inline(always)]
    pub fn lits(&self, clause: ClauseIdx) -> &[Lit] {
        let start = self.clause_starts[clause.index()] as usize;
        let end = self.clause_starts[clause.index() + 1] as usize;
        &self.lits[start..end]
    }

    /// The current partial assignment.
    pub fn values(&self) -> &PartialAssignment {
        &self.values
    }

    /// Current value of a literal.
    #[inline(always)]
    pub fn value(&self, lit: Lit) -> Option<bool> {
        self.values.value(lit)
    }

    /// Assignment state of a variable.
    #[inline(always)]
    pub fn state(&self, var: Var) -> VarState {
        self.values.state(var)
    }

    /// Status of a clause under the current assignment.
    #[inline(always)]
    pub fn status(&self, clause: ClauseIdx) -> ClauseStatus {
        self.counters[clause].status(self.lits(clause).len() as LitIdx)
    }

    /// The only unassigned literal of a unit clause.
    ///
    /// Returns `None` if the clause is not unit.
    pub fn unit_lit(&self, clause: ClauseIdx) -> Option<Lit> {
        if self.status(clause) != ClauseStatus::Unit {
            return None;
        }
        self.lits(clause)
            .iter()
            .copied()
            .find(|&lit| !self.values.is_assigned(lit.var()))
    }

    /// Live occurrence counts of a variable.
    #[inline(always)]
    pub fn occurrences(&self, var: Var) -> Occurrences {
        Occurrences {
            positive: self.live[var.lit(true)],
            negative: self.live[var.lit(false)],
        }
    }

    /// Number of satisfied clauses.
    pub fn satisfied_count(&self) -> usize {
        self.satisfied_count
    }

    /// Whether every clause is satisfied by the current assignment.
    #[inline(always)]
    pub fn all_satisfied(&self) -> bool {
        self.satisfied_count == self.clause_count()
    }

    /// Clauses that are currently unit or conflicting.
    ///
    /// This scans all clauses, it is only used to seed propagation before the first decision.
    pub fn unit_clauses(&self) -> Vec<ClauseIdx> {
        self.clause_indices()
            .filter(|&clause| {
                matches!(
                    self.status(clause),
                    ClauseStatus::Unit | ClauseStatus::Conflicting
                )
            })
            .collect()
    }

    /// Number of assignments that can still be undone.
    pub fn assignment_depth(&self) -> usize {
        self.ledger.depth()
    }

    /// Makes `lit` true.
    ///
    /// Updates the counters of every clause containing the variable. Clauses that become
    /// satisfied stop being live, so the occurrence counts of their other literals are decremented
    /// and recorded for [`unassign`][Self::unassign]. Clauses that become unit or conflicting are
    /// appended to `became_unit`.
    ///
    /// The variable of `lit` must be unassigned.
    pub fn assign(&mut self, lit: Lit, became_unit: &mut Vec<ClauseIdx>) {
        self.values.assign(lit);
        self.ledger.open(lit);

        for &clause in &self.occurs[lit] {
            let counters = &mut self.counters[clause];
            counters.true_lits += 1;
            if counters.true_lits == 1 {
                self.satisfied_count += 1;

                let start = self.clause_starts[clause.index()] as usize;
                let end = self.clause_starts[clause.index() + 1] as usize;
                for &other in &self.lits[start..end] {
                    if other != lit {
                        self.live[other] -= 1;
                        self.ledger.record(other);
                    }
                }
            }
        }

        for &clause in &self.occurs[!lit] {
            let counters = &mut self.counters[clause];
            counters.false_lits += 1;
            if counters.true_lits == 0 {
                let len = self.clause_starts[clause.index() + 1] - self.clause_starts[clause.index()];
                if counters.false_lits + 1 >= len {
                    became_unit.push(clause);
                }
            }
        }
    }

    /// Undoes the most recent assignment, which must be an assignment of `var`.
    ///
    /// Restores the variable's state, the counters of the clauses containing it and every live
    /// occurrence count decremented by the assignment.
    ///
    /// Panics if there is no assignment to undo.
    pub fn unassign(&mut self, var: Var) {
        let (lit, decremented) = self
            .ledger
            .close_last()
            .unwrap_or_else(|| panic!("unassigning {var:?} without a matching assignment"));
        assert_eq!(lit.var(), var, "assignments must be undone in reverse order");

        for other in decremented {
            self.live[other] += 1;
        }

        for &clause in &self.occurs[lit] {
            let counters = &mut self.counters[clause];
            counters.true_lits -= 1;
            if counters.true_lits == 0 {
                self.satisfied_count -= 1;
            }
        }

        for &clause in &self.occurs[!lit] {
            self.counters[clause].false_lits -= 1;
        }

        self.values.unassign(var);
    }

    /// Checks whether a full assignment satisfies every stored clause.
    pub fn is_satisfied_by(&self, value: impl Fn(Lit) -> bool) -> bool {
        self.clause_indices()
            .all(|clause| self.lits(clause).iter().any(|&lit| value(lit)))
    }
}

impl BacktrackCallbacks for Formula {
    fn unassign(&mut self, lit: Lit) {
        Formula::unassign(self, lit.var())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! formula {
        ($var_count:literal vars $($($lit:literal),+);* $(;)?) => {{
            let clauses: Vec<Vec<Lit>> = vec![$(vec![$(Lit::from_dimacs($lit)),*]),*];
            Formula::load(&mut Ctx::default(), $var_count, clauses)
        }};
    }

    fn lit(number: isize) -> Lit {
        Lit::from_dimacs(number)
    }

    fn occurrences(formula: &Formula, number: isize) -> (LitIdx, LitIdx) {
        let occ = formula.occurrences(Var::from_dimacs(number));
        (occ.positive, occ.negative)
    }

    /// Everything `assign` and `unassign` may touch.
    #[derive(PartialEq, Eq, Debug)]
    struct Snapshot {
        values: PartialAssignment,
        counters: Vec<ClauseCounters>,
        live: Vec<LitIdx>,
        satisfied_count: usize,
    }

    fn snapshot(formula: &Formula) -> Snapshot {
        Snapshot {
            values: formula.values.clone(),
            counters: formula.counters.to_vec(),
            live: formula.live.to_vec(),
            satisfied_count: formula.satisfied_count,
        }
    }

    #[test]
    fn initial_counts() -> anyhow::Result<()> {
        let formula = formula![3 vars
            1, 2;
            -1, 2, 3;
            -1, -2;
        ]?;
        assert_eq!(occurrences(&formula, 1), (1, 2));
        assert_eq!(occurrences(&formula, 2), (2, 1));
        assert_eq!(occurrences(&formula, 3), (1, 0));
        assert_eq!(formula.clause_count(), 3);
        assert!(formula.unit_clauses().is_empty());
        Ok(())
    }

    #[test]
    fn normalizes_clauses() -> anyhow::Result<()> {
        let mut ctx = Ctx::default();
        let clauses = vec![
            vec![lit(1), lit(2), lit(1)],
            vec![lit(2), lit(-3), lit(3)],
            vec![lit(-2)],
        ];
        let formula = Formula::load(&mut ctx, 3, clauses)?;

        assert_eq!(formula.clause_count(), 2);
        assert_eq!(formula.lits(ClauseIdx(0)), &[lit(1), lit(2)]);
        assert_eq!(occurrences(&formula, 3), (0, 0));
        assert_eq!(ctx.stats.formula.tautologies, 1);
        assert_eq!(ctx.stats.formula.duplicate_lits, 1);
        assert_eq!(formula.unit_clauses(), vec![ClauseIdx(1)]);
        assert_eq!(formula.unit_lit(ClauseIdx(1)), Some(lit(-2)));
        Ok(())
    }

    #[test]
    fn malformed_input() {
        assert_eq!(
            formula![2 vars 1, 2; 1, -3].err(),
            Some(MalformedFormulaError::VarOutOfRange {
                clause: 1,
                lit: lit(-3),
                var_count: 2
            })
        );
        let clauses = vec![vec![lit(1), lit(2)], vec![], vec![lit(-1)]];
        assert_eq!(
            Formula::load(&mut Ctx::default(), 2, clauses).err(),
            Some(MalformedFormulaError::EmptyClause { clause: 1 })
        );
    }

    #[test]
    fn empty_formula() -> anyhow::Result<()> {
        let formula = formula![0 vars]?;
        assert!(formula.all_satisfied());
        assert_eq!(formula.var_count(), 0);
        Ok(())
    }

    #[test]
    fn satisfied_clauses_stop_counting() -> anyhow::Result<()> {
        let mut formula = formula![3 vars
            1, 2;
            -1, 2, 3;
            -1, -2;
        ]?;
        let mut became_unit = vec![];

        formula.assign(lit(1), &mut became_unit);

        assert_eq!(formula.status(ClauseIdx(0)), ClauseStatus::Satisfied);
        assert_eq!(formula.status(ClauseIdx(1)), ClauseStatus::Unresolved);
        assert_eq!(formula.status(ClauseIdx(2)), ClauseStatus::Unit);
        assert_eq!(became_unit, vec![ClauseIdx(2)]);
        assert_eq!(formula.unit_lit(ClauseIdx(2)), Some(lit(-2)));
        // Only the satisfied clause `1 2` stops counting for `2`.
        assert_eq!(occurrences(&formula, 2), (1, 1));
        assert_eq!(occurrences(&formula, 3), (1, 0));
        assert_eq!(formula.satisfied_count(), 1);

        became_unit.clear();
        formula.assign(lit(-2), &mut became_unit);

        assert_eq!(formula.status(ClauseIdx(1)), ClauseStatus::Unit);
        assert_eq!(formula.status(ClauseIdx(2)), ClauseStatus::Satisfied);
        assert_eq!(became_unit, vec![ClauseIdx(1)]);
        assert_eq!(formula.unit_lit(ClauseIdx(1)), Some(lit(3)));
        assert!(!formula.all_satisfied());

        became_unit.clear();
        formula.assign(lit(3), &mut became_unit);
        assert!(became_unit.is_empty());
        assert!(formula.all_satisfied());
        Ok(())
    }

    #[test]
    fn conflicting_clause_is_reported() -> anyhow::Result<()> {
        let mut formula = formula![2 vars 1, 2]?;
        let mut became_unit = vec![];

        formula.assign(lit(-1), &mut became_unit);
        formula.assign(lit(-2), &mut became_unit);

        assert_eq!(became_unit, vec![ClauseIdx(0), ClauseIdx(0)]);
        assert_eq!(formula.status(ClauseIdx(0)), ClauseStatus::Conflicting);
        assert_eq!(formula.unit_lit(ClauseIdx(0)), None);
        Ok(())
    }

    #[test]
    fn unassign_restores_everything() -> anyhow::Result<()> {
        let mut formula = formula![5 vars
            1, 2, -3;
            -1, 3, 4;
            2, -4, 5;
            -2, -5;
            1, 3, 5;
            -1, -2, -3, -4, -5;
        ]?;
        let mut became_unit = vec![];
        let assignments = [lit(3), lit(-2), lit(1), lit(5), lit(-4)];

        let mut snapshots = vec![];
        for &assigned in &assignments {
            snapshots.push(snapshot(&formula));
            formula.assign(assigned, &mut became_unit);
        }
        assert_eq!(formula.assignment_depth(), assignments.len());

        for &assigned in assignments.iter().rev() {
            formula.unassign(assigned.var());
            assert_eq!(snapshot(&formula), snapshots.pop().unwrap());
        }
        assert_eq!(formula.assignment_depth(), 0);
        Ok(())
    }

    #[test]
    #[should_panic]
    fn unassign_out_of_order() {
        let mut formula = formula![2 vars 1, 2].unwrap();
        let mut became_unit = vec![];
        formula.assign(lit(1), &mut became_unit);
        formula.assign(lit(2), &mut became_unit);
        formula.unassign(Var::from_dimacs(1));
    }
}
