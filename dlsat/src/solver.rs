//! Complete SAT solver interface.
//!
//! Groups all components necessary for the solver.
use crate::{
    context::Ctx,
    error::MalformedFormulaError,
    formula::Formula,
    lit::Lit,
    log::{info, verbose, HasLogger, Logger},
    model::Model,
    report::report,
    search::{search_step, Search},
    stats::Stats,
};

/// Result of a completed solve.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Verdict {
    /// The formula is satisfied by the contained model.
    Satisfiable(Model),
    /// No assignment satisfies the formula.
    Unsatisfiable,
}

impl Verdict {
    /// Whether the formula was found to be satisfiable.
    pub fn is_satisfiable(&self) -> bool {
        matches!(self, Verdict::Satisfiable(_))
    }

    /// The satisfying assignment, if any.
    pub fn model(&self) -> Option<&Model> {
        match self {
            Verdict::Satisfiable(model) => Some(model),
            Verdict::Unsatisfiable => None,
        }
    }
}

/// Contains all components of a SAT solver.
///
/// Clauses are buffered as added. Every solve loads them into a fresh formula store and search,
/// so solving twice gives the same result.
#[derive(Default)]
pub struct Solver {
    /// Logging and statistics of the most recent solve.
    pub ctx: Ctx,
    var_count: usize,
    clauses: Vec<Vec<Lit>>,
}

impl HasLogger for Solver {
    #[inline(always)]
    fn logger(&self) -> &Logger {
        &self.ctx.logger
    }
}

impl Solver {
    /// Creates a solver for a formula over `var_count` variables.
    pub fn new(var_count: usize) -> Self {
        Solver {
            var_count,
            ..Solver::default()
        }
    }

    /// Number of variables of the formula.
    pub fn var_count(&self) -> usize {
        self.var_count
    }

    /// Sets the number of variables of the formula.
    ///
    /// Clauses may only use variables below this count.
    pub fn set_var_count(&mut self, var_count: usize) {
        self.var_count = var_count;
    }

    /// Number of added clauses.
    pub fn clause_count(&self) -> usize {
        self.clauses.len()
    }

    /// Adds a clause to the formula.
    pub fn add_clause(&mut self, clause: &[Lit]) {
        self.clauses.push(clause.to_vec());
    }

    /// Determines whether the current formula is satisfiable.
    ///
    /// An empty clause makes the formula unsatisfiable without any search. Fails if a clause
    /// uses a variable beyond [`var_count`](Self::var_count).
    pub fn solve(&mut self) -> Result<Verdict, MalformedFormulaError> {
        let Some(mut search) = self.prepare()? else {
            return Ok(Verdict::Unsatisfiable);
        };

        while search_step(&mut self.ctx, &mut search).is_none() {}

        Ok(self.finish(&search))
    }

    /// Like [`solve`](Self::solve), but gives up after `max_steps` search steps.
    ///
    /// Returns `Ok(None)` if the search did not reach a verdict in time.
    pub fn solve_with_step_limit(
        &mut self,
        max_steps: u64,
    ) -> Result<Option<Verdict>, MalformedFormulaError> {
        let Some(mut search) = self.prepare()? else {
            return Ok(Some(Verdict::Unsatisfiable));
        };

        for _ in 0..max_steps {
            if search_step(&mut self.ctx, &mut search).is_some() {
                return Ok(Some(self.finish(&search)));
            }
        }

        verbose!(self, "step limit reached", steps = max_steps);
        report(&self.ctx, &search);
        Ok(None)
    }

    /// Checks whether `model` satisfies every added clause.
    pub fn is_model(&self, model: &Model) -> bool {
        self.clauses.iter().all(|clause| {
            clause
                .iter()
                .any(|&lit| lit.index() < model.var_count() && model.value(lit))
        })
    }

    /// Loads the buffered clauses for a new search.
    ///
    /// Returns `None` when the formula contains an empty clause.
    fn prepare(&mut self) -> Result<Option<Search>, MalformedFormulaError> {
        self.ctx.stats = Stats::default();

        match Formula::load(&mut self.ctx, self.var_count, &self.clauses) {
            Ok(formula) => Ok(Some(Search::new(formula))),
            Err(MalformedFormulaError::EmptyClause { clause }) => {
                info!(self, "empty clause", clause = clause + 1);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn finish(&self, search: &Search) -> Verdict {
        report(&self.ctx, search);

        match search.model() {
            Some(model) => {
                debug_assert!(self.is_model(&model), "search produced a non-model");
                Verdict::Satisfiable(model)
            }
            None => Verdict::Unsatisfiable,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, seq::index::sample, Rng, SeedableRng};

    use super::*;

    macro_rules! clause {
        ($($lit:literal),* $(,)?) => {
            [$(Lit::from_dimacs($lit)),*]
        };
    }

    fn solver_for(var_count: usize, clauses: &[Vec<Lit>]) -> Solver {
        let mut solver = Solver::new(var_count);
        for clause in clauses {
            solver.add_clause(clause);
        }
        solver
    }

    /// Tries every assignment.
    fn brute_force(var_count: usize, clauses: &[Vec<Lit>]) -> bool {
        assert!(var_count <= 20);
        (0u32..1 << var_count).any(|bits| {
            clauses.iter().all(|clause| {
                clause
                    .iter()
                    .any(|lit| ((bits >> lit.index()) & 1 == 1) == lit.is_positive())
            })
        })
    }

    fn random_3cnf(rng: &mut StdRng, var_count: usize, clause_count: usize) -> Vec<Vec<Lit>> {
        (0..clause_count)
            .map(|_| {
                sample(rng, var_count, 3)
                    .into_iter()
                    .map(|index| Lit::from_index(index, rng.gen()))
                    .collect()
            })
            .collect()
    }

    fn check_against_brute_force(var_count: usize, clauses: &[Vec<Lit>]) -> anyhow::Result<()> {
        let mut solver = solver_for(var_count, clauses);
        let verdict = solver.solve()?;

        assert_eq!(
            verdict.is_satisfiable(),
            brute_force(var_count, clauses),
            "{clauses:?}"
        );
        if let Some(model) = verdict.model() {
            assert_eq!(model.var_count(), var_count);
            assert!(solver.is_model(model), "{clauses:?}");
        }
        Ok(())
    }

    #[test]
    fn single_unit() -> anyhow::Result<()> {
        let mut solver = Solver::new(1);
        solver.add_clause(&clause![1]);

        let verdict = solver.solve()?;
        let model = verdict.model().unwrap();
        assert!(model.value(Lit::from_dimacs(1)));
        Ok(())
    }

    #[test]
    fn contradicting_units() -> anyhow::Result<()> {
        let mut solver = Solver::new(1);
        solver.add_clause(&clause![1]);
        solver.add_clause(&clause![-1]);

        assert_eq!(solver.solve()?, Verdict::Unsatisfiable);
        Ok(())
    }

    #[test]
    fn heuristic_picks_positive_first() -> anyhow::Result<()> {
        let mut solver = Solver::new(2);
        solver.add_clause(&clause![1, 2]);
        solver.add_clause(&clause![-1, 2]);
        solver.add_clause(&clause![1, -2]);

        let verdict = solver.solve()?;
        let model = verdict.model().unwrap();
        assert_eq!(model.lits().map(Lit::dimacs).collect::<Vec<_>>(), vec![1, 2]);
        Ok(())
    }

    #[test]
    fn empty_clause_skips_search() -> anyhow::Result<()> {
        let mut solver = Solver::new(3);
        solver.add_clause(&clause![1, 2]);
        solver.add_clause(&clause![]);
        solver.add_clause(&clause![-3]);

        assert_eq!(solver.solve()?, Verdict::Unsatisfiable);
        assert_eq!(solver.ctx.stats.search.decisions, 0);
        assert_eq!(solver.ctx.stats.prop.passes, 0);
        Ok(())
    }

    #[test]
    fn no_clauses() -> anyhow::Result<()> {
        let mut solver = Solver::new(2);

        let verdict = solver.solve()?;
        assert_eq!(
            verdict.model().unwrap().lits().map(Lit::dimacs).collect::<Vec<_>>(),
            vec![1, 2]
        );
        Ok(())
    }

    #[test]
    fn var_out_of_range() {
        let mut solver = Solver::new(2);
        solver.add_clause(&clause![1, -2]);
        solver.add_clause(&clause![2, 3]);

        assert_eq!(
            solver.solve(),
            Err(MalformedFormulaError::VarOutOfRange {
                clause: 1,
                lit: Lit::from_dimacs(3),
                var_count: 2,
            })
        );

        solver.set_var_count(3);
        assert!(solver.solve().unwrap().is_satisfiable());
    }

    #[test]
    fn tautologies_and_duplicates() -> anyhow::Result<()> {
        let mut solver = Solver::new(2);
        solver.add_clause(&clause![1, -1]);
        solver.add_clause(&clause![-2, -2]);

        let verdict = solver.solve()?;
        assert!(!verdict.model().unwrap().value(Lit::from_dimacs(2)));
        assert_eq!(solver.ctx.stats.formula.tautologies, 1);
        assert_eq!(solver.ctx.stats.formula.duplicate_lits, 1);
        Ok(())
    }

    #[test]
    fn resolve_is_idempotent() -> anyhow::Result<()> {
        let mut rng = StdRng::seed_from_u64(7);
        let clauses = random_3cnf(&mut rng, 12, 40);
        let mut solver = solver_for(12, &clauses);

        let first = solver.solve()?;
        let first_decisions = solver.ctx.stats.search.decisions;
        let second = solver.solve()?;

        assert_eq!(first, second);
        assert_eq!(solver.ctx.stats.search.decisions, first_decisions);
        Ok(())
    }

    #[test]
    fn step_limit() -> anyhow::Result<()> {
        let mut solver = Solver::new(2);
        solver.add_clause(&clause![1, 2]);
        solver.add_clause(&clause![1, -2]);
        solver.add_clause(&clause![-1, 2]);
        solver.add_clause(&clause![-1, -2]);

        assert_eq!(solver.solve_with_step_limit(0)?, None);
        assert_eq!(solver.solve_with_step_limit(2)?, None);
        assert_eq!(
            solver.solve_with_step_limit(100)?,
            Some(Verdict::Unsatisfiable)
        );
        Ok(())
    }

    #[test]
    fn small_random_formulas() -> anyhow::Result<()> {
        let mut rng = StdRng::seed_from_u64(0);

        for _ in 0..300 {
            let var_count = rng.gen_range(1..=12);
            let clause_count = rng.gen_range(1..=5 * var_count);
            // Clauses of mixed length, possibly with repeated literals and tautologies.
            let clauses: Vec<Vec<Lit>> = (0..clause_count)
                .map(|_| {
                    let len = rng.gen_range(1..=3);
                    (0..len)
                        .map(|_| Lit::from_index(rng.gen_range(0..var_count), rng.gen()))
                        .collect()
                })
                .collect();

            check_against_brute_force(var_count, &clauses)?;
        }
        Ok(())
    }

    #[test]
    fn random_3cnf_at_threshold() -> anyhow::Result<()> {
        let mut rng = StdRng::seed_from_u64(20);

        for _ in 0..4 {
            let clauses = random_3cnf(&mut rng, 20, 91);
            check_against_brute_force(20, &clauses)?;
        }
        Ok(())
    }
}
