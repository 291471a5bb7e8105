//! Stores a history of assignments performed during the search to enable backtracking.
use crate::{
    formula::ClauseIdx,
    lit::{Lit, LitIdx, Var},
    tracking::Resize,
    vec_map::{VecMap, VecMapIndex, VecMapKey},
};

/// A decision level.
///
/// Wrapper around `LitIdx` for better type safety.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct DecisionLevel(pub LitIdx);

impl DecisionLevel {
    /// The top decision level that contains unconditional assignments.
    pub const TOP: DecisionLevel = DecisionLevel(0);
}

impl std::fmt::Debug for DecisionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self.0, f)
    }
}

/// A position on the trail.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TrailIndex(pub LitIdx);

impl TrailIndex {
    /// Marker for variables that are unassigned.
    ///
    /// Note that `Trail::trail_index` is only valid for assigned variables and is not guaranteed to
    /// return this for unassigned variables.
    pub const UNASSIGNED: TrailIndex = TrailIndex(LitIdx::MAX);
}

impl std::fmt::Debug for TrailIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self.0, f)
    }
}

impl VecMapIndex for TrailIndex {
    #[inline(always)]
    fn vec_map_index(&self) -> usize {
        self.0 as usize
    }
}

impl VecMapKey for TrailIndex {
    #[inline(always)]
    fn vec_map_key_from_index(index: usize) -> Self {
        Self(index as _)
    }
}

/// The reason for an assignment.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum Reason {
    /// First value tried for a branching variable.
    Decision,
    /// Second value tried for a branching variable, after the first one led to a conflict.
    Flip,
    /// Forced by a clause that was unit.
    Implied(ClauseIdx),
}

impl Reason {
    /// Whether the assignment was a branching choice rather than a forced consequence.
    pub fn is_decision(self) -> bool {
        matches!(self, Reason::Decision | Reason::Flip)
    }
}

/// A step of the trail.
#[derive(Clone, Debug)]
pub struct Step {
    /// The literal assigned true.
    pub assigned_lit: Lit,
    /// The decision level of this step.
    ///
    /// The `n`-th branching variable and everything propagated from it have decision level `n`.
    pub decision_level: DecisionLevel,
    /// Why this literal was assigned.
    pub reason: Reason,
}

/// Stores the chronological sequence of assignments.
///
/// Undoing is always done by truncating the trail to an earlier length, which undoes the removed
/// steps in reverse order.
#[derive(Default)]
pub struct Trail {
    /// The step on which a variable was assigned.
    trail_index: VecMap<Var, TrailIndex>,

    /// Sequence of performed steps.
    steps: VecMap<TrailIndex, Step>,
}

impl Resize for Trail {
    fn resize(&mut self, var_count: usize) {
        debug_assert!(self.steps.is_empty());
        self.trail_index.resize(var_count, TrailIndex::UNASSIGNED)
    }
}

/// Callbacks to synchronize state with backtracking on the trail.
pub trait BacktrackCallbacks {
    /// Called to undo the assignment of `lit`.
    fn unassign(&mut self, _lit: Lit) {}
}

impl BacktrackCallbacks for () {}

impl Trail {
    /// Number of steps on the trail.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the trail is empty.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Returns the history of performed assignment steps.
    pub fn steps(&self) -> &VecMap<TrailIndex, Step> {
        &self.steps
    }

    /// Returns the index of the step that assigned a given variable.
    ///
    /// With debug assertions enabled, this will panic if the variable is not assigned by a step on
    /// the trail.
    pub fn trail_index(&self, var: Var) -> TrailIndex {
        let index = self.trail_index[var];
        debug_assert_ne!(index, TrailIndex::UNASSIGNED);
        index
    }

    /// Returns the step that assigned a given variable.
    pub fn step_for_var(&self, var: Var) -> &Step {
        &self.steps[self.trail_index(var)]
    }

    /// Records a step.
    ///
    /// This only updates the trail, the caller assigns the literal in the formula.
    pub fn push(&mut self, step: Step) {
        self.trail_index[step.assigned_lit] = TrailIndex(self.steps.len() as LitIdx);
        self.steps.push(step);
    }

    /// Undoes all steps at positions `len` and beyond, most recent first.
    ///
    /// Panics if `len` is larger than the trail.
    pub fn backtrack_to(&mut self, len: usize, callbacks: &mut impl BacktrackCallbacks) {
        assert!(len <= self.steps.len());

        for step in self.steps.drain(len..).rev() {
            let lit = step.assigned_lit;
            callbacks.unassign(lit);
            #[cfg(debug_assertions)]
            {
                // In debug builds we mark unassigned literals in `trail_index` so that on invalid
                // accesses we get a panic right away.
                self.trail_index[lit] = TrailIndex::UNASSIGNED;
            }
        }
    }
}
