//! `littleKiller` encoder: a weighted PB equality over a diagonal's
//! digits (spec §4.3).
//!
//! For each `(diagonalIdx -> sum)` pair with a numeric `sum`, the
//! diagonal's cells `(x_i, y_i)` contribute literals `lit(y_i, x_i, v)`
//! weighted by `v + 1` (the actual digit value); the PB encoder enforces
//! the sum equals the target exactly. Non-numeric payload entries are
//! ignored, matching the source's behavior.

use crate::board::{BoardElement, resolve_diagonal};
use crate::error::CoreError;
use crate::literal::{VarAllocator, lit};
use crate::pb::encode_pb;

pub fn encode(
    alloc: &mut VarAllocator,
    clauses: &mut Vec<Vec<i64>>,
    n: usize,
    element: &BoardElement,
) -> Result<(), CoreError> {
    let sums = element.as_diagonal_sum_map();
    for (diag_id, sum) in sums {
        let Some(cells) = resolve_diagonal(&diag_id, n) else {
            return Err(CoreError::UnresolvableLine {
                id: element.id.clone(),
                kind: element.kind.clone(),
                line_id: diag_id,
            });
        };

        let mut weights = Vec::with_capacity(cells.len() * n);
        let mut lits = Vec::with_capacity(cells.len() * n);
        for &(row, col) in &cells {
            for v in 0..n {
                weights.push((v + 1) as u64);
                lits.push(lit(row, col, v, n));
            }
        }

        let mut next_var = alloc.next_var();
        encode_pb(&weights, &lits, sum, sum, clauses, &mut next_var);
        alloc.set_next_var(next_var);
    }
    Ok(())
}
