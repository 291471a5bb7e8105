//! Satisfying assignments.
use crate::{
    lit::{Lit, Var},
    vec_map::VecMap,
};

/// A total assignment of Boolean values to variables.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Model {
    values: VecMap<Var, bool>,
}

impl Model {
    /// Creates a model over `var_count` variables, taking the value of each from `value`.
    pub fn from_fn(var_count: usize, value: impl Fn(Var) -> bool) -> Self {
        Model {
            values: (0..var_count)
                .map(|index| value(Var::from_index(index)))
                .collect::<Vec<_>>()
                .into(),
        }
    }

    /// Number of variables covered by the model.
    pub fn var_count(&self) -> usize {
        self.values.len()
    }

    /// Value of a literal under the model.
    ///
    /// Panics if the literal's variable is not covered by the model.
    #[inline(always)]
    pub fn value(&self, lit: Lit) -> bool {
        self.values[lit] ^ lit.is_negative()
    }

    /// The literals that are true under the model, one per variable, in variable order.
    pub fn lits(&self) -> impl Iterator<Item = Lit> + '_ {
        self.values
            .iter_with_keys()
            .map(|(var, &value)| var.lit(value))
    }
}
