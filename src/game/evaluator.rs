//! The win-verification kernel.
//!
//! A pure membership check: a required cell is covered if it is the free
//! cell or its number appears in the round's called-number ledger. The
//! check runs from scratch against the full ledger snapshot on every claim;
//! because the ledger only ever grows by appending, a `true` verdict can
//! never later turn `false` for the same card and mask.

use crate::game::card::{CardLayout, Cell, GRID_SIZE};
use crate::game::ledger::CalledNumberLedger;
use crate::game::pattern::PatternMask;

/// Decide whether `card` satisfies `pattern` given the numbers called so
/// far. Short-circuits on the first uncovered required cell.
///
/// Well-formedness of the inputs is guaranteed by their constructors, so
/// there is no failure mode here; `false` is a verdict, not an error.
pub fn verify(card: &CardLayout, pattern: &PatternMask, called: &CalledNumberLedger) -> bool {
    for row in 0..GRID_SIZE {
        for col in 0..GRID_SIZE {
            if !pattern.requires(row, col) {
                continue;
            }
            match card.cell(row, col) {
                // The free space is always covered.
                Cell::Free => continue,
                Cell::Number(number) => {
                    if !called.contains(number) {
                        return false;
                    }
                }
            }
        }
    }
    true
}

/// Required positions not yet covered, for progress display.
pub fn uncovered(
    card: &CardLayout,
    pattern: &PatternMask,
    called: &CalledNumberLedger,
) -> Vec<(usize, usize)> {
    pattern
        .positions()
        .into_iter()
        .filter(|&(row, col)| match card.cell(row, col) {
            Cell::Free => false,
            Cell::Number(number) => !called.contains(number),
        })
        .collect()
}
