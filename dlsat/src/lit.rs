//! Literals and variables.

use std::{fmt, ops};

use crate::vec_map::{VecMapIndex, VecMapKey};

/// The backing type used to represent literals, variables and clause indices.
pub type LitIdx = u32;

/// A Boolean variable.
///
/// Internally variables are numbered starting from 0. This number is called the variable's index.
///
/// For user I/O (including `Debug`) variables are numbered in the same order, but starting from 1,
/// as in the DIMACS CNF format. A formula over `N` variables uses the DIMACS numbers `1..=N`.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Var {
    index: LitIdx,
}

impl Var {
    /// The largest supported index of a variable.
    ///
    /// Leaves room for the polarity bit of a `Lit` in a single `LitIdx`.
    pub const MAX_INDEX: usize = (LitIdx::MAX >> 2) as usize;

    /// The number of representable variables.
    pub const MAX_VAR_COUNT: usize = Var::MAX_INDEX + 1;

    /// The largest 1-based DIMACS number of a variable.
    pub const MAX_DIMACS: isize = Var::MAX_INDEX as isize + 1;

    /// Variable given in the representation used by the DIMACS CNF format.
    ///
    /// Panics if the parameter is not strictly positive or larger than `Var::MAX_DIMACS`.
    #[inline]
    pub fn from_dimacs(number: isize) -> Var {
        assert!(number > 0);
        Var::from_index((number - 1) as usize)
    }

    /// Variable of a given index.
    ///
    /// Panics when the index is larger than `Var::MAX_INDEX`.
    #[inline]
    pub fn from_index(index: usize) -> Var {
        assert!(index <= Var::MAX_INDEX);
        Var {
            index: index as LitIdx,
        }
    }

    /// Index of this variable.
    #[inline]
    pub const fn index(self) -> usize {
        self.index as usize
    }

    /// Representation used in the DIMACS CNF format.
    #[inline]
    pub fn dimacs(self) -> isize {
        (self.index + 1) as isize
    }

    /// The literal of this variable with the given polarity.
    #[inline]
    pub fn lit(self, positive: bool) -> Lit {
        Lit::from_var(self, positive)
    }
}

impl VecMapKey for Var {
    #[inline(always)]
    fn vec_map_key_from_index(index: usize) -> Self {
        Self::from_index(index)
    }
}

impl VecMapIndex for Var {
    #[inline(always)]
    fn vec_map_index(&self) -> usize {
        self.index()
    }
}

/// As in the DIMACS CNF format.
impl fmt::Debug for Var {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.dimacs(), f)
    }
}

/// As in the DIMACS CNF format.
impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl flussab_cnf::Dimacs for Var {
    const MAX_DIMACS: isize = Var::MAX_DIMACS;

    fn from_dimacs(value: isize) -> Self {
        Var::from_dimacs(value)
    }

    fn dimacs(self) -> isize {
        Var::dimacs(self)
    }
}

/// A Boolean literal, i.e. a variable together with a polarity.
///
/// A positive literal is true when its variable is assigned `true`, a negative literal is true
/// when its variable is assigned `false`.
///
/// Internally a literal is represented as an integer that is two times the index of its variable
/// when it is negative or one more when it is positive. This integer is called the `code` of the
/// literal and is used to index per-literal tables.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Lit {
    code: LitIdx,
}

impl Lit {
    /// The largest supported code of a literal.
    pub const MAX_CODE: usize = 2 * Var::MAX_INDEX + 1;

    /// A literal for a given variable.
    ///
    /// A positive literal if the second parameter is `true`, a negative literal otherwise.
    #[inline]
    pub fn from_var(var: Var, positive: bool) -> Lit {
        Lit {
            code: (var.index << 1) | (positive as LitIdx),
        }
    }

    /// A literal for the variable of a given index.
    #[inline]
    pub fn from_index(index: usize, positive: bool) -> Lit {
        Lit::from_var(Var::from_index(index), positive)
    }

    /// A literal with a given encoding.
    ///
    /// Panics when the code is larger than `Lit::MAX_CODE`.
    #[inline]
    pub fn from_code(code: usize) -> Lit {
        assert!(code <= Lit::MAX_CODE);
        Lit {
            code: code as LitIdx,
        }
    }

    /// Literal given in the representation used by the DIMACS CNF format.
    ///
    /// Panics if the parameter is zero or has an absolute value larger than `Var::MAX_DIMACS`.
    #[inline]
    pub fn from_dimacs(number: isize) -> Lit {
        Lit::from_var(Var::from_dimacs(number.abs()), number > 0)
    }

    /// Encoding of this literal.
    #[inline]
    pub const fn code(self) -> usize {
        self.code as usize
    }

    /// The variable of this literal.
    #[inline]
    pub const fn var(self) -> Var {
        Var {
            index: self.code >> 1,
        }
    }

    /// Index of this literal's variable.
    #[inline]
    pub const fn index(self) -> usize {
        self.var().index()
    }

    /// Whether this is a positive literal.
    #[inline]
    pub const fn is_positive(self) -> bool {
        self.code & 1 != 0
    }

    /// Whether this is a negative literal.
    #[inline]
    pub const fn is_negative(self) -> bool {
        self.code & 1 == 0
    }

    /// Representation used in the DIMACS CNF format.
    #[inline]
    pub fn dimacs(self) -> isize {
        self.var().dimacs() * if self.is_positive() { 1 } else { -1 }
    }
}

impl VecMapKey for Lit {
    #[inline(always)]
    fn vec_map_key_from_index(index: usize) -> Self {
        Self::from_code(index)
    }
}

impl VecMapIndex for Lit {
    #[inline(always)]
    fn vec_map_index(&self) -> usize {
        self.code()
    }
}

impl VecMapIndex<Var> for Lit {
    #[inline(always)]
    fn vec_map_index(&self) -> usize {
        self.index()
    }
}

impl flussab_cnf::Dimacs for Lit {
    const MAX_DIMACS: isize = Var::MAX_DIMACS;

    fn from_dimacs(value: isize) -> Self {
        Lit::from_dimacs(value)
    }

    fn dimacs(self) -> isize {
        Lit::dimacs(self)
    }
}

impl ops::Not for Lit {
    type Output = Lit;

    #[inline(always)]
    fn not(self) -> Self::Output {
        Lit {
            code: self.code ^ 1,
        }
    }
}

/// Flips the polarity when the right hand side is `true`.
impl ops::BitXor<bool> for Lit {
    type Output = Lit;

    #[inline(always)]
    fn bitxor(self, rhs: bool) -> Self::Output {
        Lit {
            code: self.code ^ (rhs as LitIdx),
        }
    }
}

/// As in the DIMACS CNF format.
impl fmt::Debug for Lit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.dimacs(), f)
    }
}

/// As in the DIMACS CNF format.
impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimacs_conversion() {
        for number in [1, -1, 7, -7, 1000, -1000] {
            let lit = Lit::from_dimacs(number);
            assert_eq!(lit.dimacs(), number);
            assert_eq!(lit.var().dimacs(), number.abs());
            assert_eq!(lit.is_positive(), number > 0);
            assert_eq!((!lit).dimacs(), -number);
        }
    }

    #[test]
    fn codes_are_dense() {
        let var = Var::from_dimacs(3);
        assert_eq!(var.index(), 2);
        assert_eq!(var.lit(false).code(), 4);
        assert_eq!(var.lit(true).code(), 5);
        assert_eq!(var.lit(true) ^ true, var.lit(false));
        assert_eq!(var.lit(true) ^ false, var.lit(true));
        assert_eq!(format!("{:?}", var.lit(false)), "-3");
    }
}
