//! Errors reported by the solver core.
use std::fmt;

use crate::lit::Lit;

/// The input formula cannot be loaded as given.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum MalformedFormulaError {
    /// The clause with the given (0-based, input order) position has no literals.
    ///
    /// This is a valid CNF construct that makes the formula trivially unsatisfiable. The solver
    /// turns it into an unsatisfiable verdict instead of reporting it.
    EmptyClause {
        /// Position of the clause in the input.
        clause: usize,
    },
    /// A literal refers to a variable outside of the declared range.
    VarOutOfRange {
        /// Position of the clause in the input.
        clause: usize,
        /// The offending literal.
        lit: Lit,
        /// The declared number of variables.
        var_count: usize,
    },
}

impl fmt::Display for MalformedFormulaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedFormulaError::EmptyClause { clause } => {
                write!(f, "clause {} is empty", clause + 1)
            }
            MalformedFormulaError::VarOutOfRange {
                clause,
                lit,
                var_count,
            } => write!(
                f,
                "literal {lit} in clause {} exceeds the variable count {var_count}",
                clause + 1
            ),
        }
    }
}

impl std::error::Error for MalformedFormulaError {}

/// The decision heuristic was asked for a branch while every variable is assigned.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct NoUnassignedVariableError;

impl fmt::Display for NoUnassignedVariableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("no unassigned variable left to branch on")
    }
}

impl std::error::Error for NoUnassignedVariableError {}
