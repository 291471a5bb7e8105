//! A partial assignment to Boolean variables.
use crate::{
    lit::{Lit, Var},
    tracking::Resize,
    vec_map::VecMap,
};

/// Assignment state of a single variable.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum VarState {
    /// Not assigned yet.
    Unassigned,
    /// Assigned `true`.
    True,
    /// Assigned `false`.
    False,
}

impl VarState {
    /// The state of a variable assigned the given value.
    #[inline(always)]
    pub fn from_value(value: bool) -> Self {
        if value {
            VarState::True
        } else {
            VarState::False
        }
    }
}

/// A partial assignment to Boolean variables.
///
/// Each variable can be unassigned or assigned to a Boolean value. Assigning is phrased in terms
/// of literals: assigning a literal makes that literal true.
#[derive(Default, Clone, PartialEq, Eq, Debug)]
pub struct PartialAssignment {
    states: VecMap<Var, VarState>,
    assigned_count: usize,
}

impl PartialAssignment {
    /// Assigns `true` to the given literal.
    ///
    /// A variable can be assigned `false` by assigning `true` to the negated literal.
    #[inline(always)]
    pub fn assign(&mut self, lit: Lit) {
        debug_assert!(!self.is_assigned(lit.var()), "{lit:?} already assigned");
        self.states[lit] = VarState::from_value(lit.is_positive());
        self.assigned_count += 1;
    }

    /// Removes any assigned value from a variable.
    #[inline(always)]
    pub fn unassign(&mut self, var: Var) {
        debug_assert!(self.is_assigned(var), "{var:?} not assigned");
        self.states[var] = VarState::Unassigned;
        self.assigned_count -= 1;
    }

    /// Returns the assignment state of a variable.
    #[inline(always)]
    pub fn state(&self, var: Var) -> VarState {
        self.states[var]
    }

    /// Returns `true` if the literal is assigned `true`.
    #[inline(always)]
    pub fn is_true(&self, lit: Lit) -> bool {
        self.value(lit) == Some(true)
    }

    /// Returns `true` if the literal is assigned `false`.
    #[inline(always)]
    pub fn is_false(&self, lit: Lit) -> bool {
        self.value(lit) == Some(false)
    }

    /// Returns `true` if the variable is assigned.
    #[inline(always)]
    pub fn is_assigned(&self, var: Var) -> bool {
        self.states[var] != VarState::Unassigned
    }

    /// Returns the value of a literal.
    #[inline(always)]
    pub fn value(&self, lit: Lit) -> Option<bool> {
        match self.states[lit] {
            VarState::Unassigned => None,
            VarState::True => Some(lit.is_positive()),
            VarState::False => Some(lit.is_negative()),
        }
    }

    /// Number of assigned variables.
    pub fn assigned_count(&self) -> usize {
        self.assigned_count
    }

    /// Whether every variable is assigned.
    pub fn is_complete(&self) -> bool {
        self.assigned_count == self.states.len()
    }

    /// Iterates over all variables that are currently unassigned, in index order.
    pub fn unassigned_vars(&self) -> impl Iterator<Item = Var> + '_ {
        self.states
            .iter_with_keys()
            .filter(|(_, state)| **state == VarState::Unassigned)
            .map(|(var, _)| var)
    }
}

impl Resize for PartialAssignment {
    fn resize(&mut self, var_count: usize) {
        debug_assert_eq!(self.assigned_count, 0);
        self.states.resize(var_count, VarState::Unassigned);
    }
}
