//! Clause references and clause status.
use crate::{
    lit::LitIdx,
    vec_map::{VecMapIndex, VecMapKey},
};

/// Index of a clause in the [`Formula`][super::Formula].
///
/// Clauses are numbered in load order, skipping clauses dropped while loading.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ClauseIdx(pub LitIdx);

impl ClauseIdx {
    /// Index as `usize`.
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Debug for ClauseIdx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl VecMapIndex for ClauseIdx {
    #[inline(always)]
    fn vec_map_index(&self) -> usize {
        self.index()
    }
}

impl VecMapKey for ClauseIdx {
    #[inline(always)]
    fn vec_map_key_from_index(index: usize) -> Self {
        Self(index as _)
    }
}

/// Status of a clause under the current partial assignment.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ClauseStatus {
    /// At least one literal is true.
    Satisfied,
    /// All literals are false.
    Conflicting,
    /// No literal is true and all but one literal are false.
    Unit,
    /// No literal is true and at least two literals are unassigned.
    Unresolved,
}

/// Number of true and false literals of a clause.
///
/// The status of a clause is derived from these and its length. Both are updated on every
/// assignment of a contained variable and exactly restored when that assignment is undone.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct ClauseCounters {
    /// Number of true literals.
    pub true_lits: LitIdx,
    /// Number of false literals.
    pub false_lits: LitIdx,
}

impl ClauseCounters {
    /// Status of a clause of the given length with these counters.
    #[inline(always)]
    pub fn status(self, len: LitIdx) -> ClauseStatus {
        if self.true_lits > 0 {
            ClauseStatus::Satisfied
        } else if self.false_lits == len {
            ClauseStatus::Conflicting
        } else if self.false_lits + 1 == len {
            ClauseStatus::Unit
        } else {
            ClauseStatus::Unresolved
        }
    }
}
