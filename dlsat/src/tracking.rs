//! Traits for synchronizing updates that affect multiple solver components.

/// Solver component with per-variable data that needs to follow the formula's variable count.
pub trait Resize {
    /// Change the number of variables.
    ///
    /// Only called while no variable is assigned, new variables start out unassigned.
    fn resize(&mut self, var_count: usize);
}
