//! `givens`/`filled` encoder: unit clauses pinning pre-filled cells.
//!
//! `filled` is treated identically to `givens` — the distinction between
//! a puzzle's original clue and a cell the editor has since filled in is
//! an editor-level concept, invisible to the solver (spec §4.3).

use crate::board::BoardElement;
use crate::error::CoreError;
use crate::literal::{VarAllocator, lit};

pub fn encode(
    alloc: &mut VarAllocator,
    clauses: &mut Vec<Vec<i64>>,
    n: usize,
    element: &BoardElement,
) -> Result<(), CoreError> {
    let _ = alloc; // no aux vars needed for unit clauses
    let cells = element.as_cell_digit_map()?;
    for (cell_idx, digit) in cells {
        let row = cell_idx / n;
        let col = cell_idx % n;
        let v = (digit as usize).saturating_sub(1);
        clauses.push(vec![lit(row, col, v, n)]);
    }
    Ok(())
}
