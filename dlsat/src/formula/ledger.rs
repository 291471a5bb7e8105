//! Reversible record of occurrence count adjustments.
use crate::lit::{Lit, LitIdx};

/// Start of the records belonging to one assignment.
#[derive(Clone, Copy, Debug)]
struct UndoMark {
    /// The literal that was assigned true.
    assigned: Lit,
    /// Length of `decremented` before the assignment.
    start: LitIdx,
}

/// Stack of occurrence count decrements, grouped by the assignment that caused them.
///
/// Every literal whose live occurrence count was decremented is recorded here, so that undoing
/// an assignment restores exactly those counts. Assignments are undone in LIFO order.
#[derive(Default, Debug)]
pub struct UndoLedger {
    marks: Vec<UndoMark>,
    decremented: Vec<Lit>,
}

impl UndoLedger {
    /// Starts the group of records for a new assignment.
    pub fn open(&mut self, assigned: Lit) {
        self.marks.push(UndoMark {
            assigned,
            start: self.decremented.len() as LitIdx,
        });
    }

    /// Records that the live occurrence count of `lit` was decremented.
    #[inline(always)]
    pub fn record(&mut self, lit: Lit) {
        debug_assert!(!self.marks.is_empty());
        self.decremented.push(lit);
    }

    /// The most recent assignment that has not been undone.
    pub fn last_assigned(&self) -> Option<Lit> {
        self.marks.last().map(|mark| mark.assigned)
    }

    /// Removes the group of the most recent assignment.
    ///
    /// Returns the assigned literal and the recorded decrements, most recent first.
    pub fn close_last(&mut self) -> Option<(Lit, impl Iterator<Item = Lit> + '_)> {
        let mark = self.marks.pop()?;
        Some((
            mark.assigned,
            self.decremented.drain(mark.start as usize..).rev(),
        ))
    }

    /// Number of open assignment groups.
    pub fn depth(&self) -> usize {
        self.marks.len()
    }
}
