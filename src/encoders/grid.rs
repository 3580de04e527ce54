//! `grid` encoder: cell/row/column exactly-one constraints (spec §4.3).
//!
//! Every constraint here is an exactly-one over `N` literals, expressed
//! through [`crate::pb::encode_pb`] with unit weights and `lo = hi = 1`,
//! per spec §4.1's description that the source funnels exactly-one
//! through the PB encoder rather than a separate pairwise routine.

use crate::literal::{VarAllocator, lit};
use crate::pb::encode_pb;

fn exactly_one(alloc: &mut VarAllocator, clauses: &mut Vec<Vec<i64>>, lits: Vec<i64>) {
    let weights = vec![1u64; lits.len()];
    let mut next_var = alloc.next_var();
    encode_pb(&weights, &lits, 1, 1, clauses, &mut next_var);
    alloc.set_next_var(next_var);
}

/// Appends the three exactly-one families for an `n x n` Latin square:
/// - cell(a,b): digit held by cell (a,b) is unique.
/// - row(a,b): digit b+1 appears exactly once in row a.
/// - col(a,b): digit b+1 appears exactly once in column a.
pub fn encode(alloc: &mut VarAllocator, clauses: &mut Vec<Vec<i64>>, n: usize) {
    for a in 0..n {
        for b in 0..n {
            // cell: fix row=a, col=b, vary digit v.
            let cell_lits: Vec<i64> = (0..n).map(|v| lit(a, b, v, n)).collect();
            exactly_one(alloc, clauses, cell_lits);

            // row: fix row=a, digit=b, vary column v.
            let row_lits: Vec<i64> = (0..n).map(|v| lit(a, v, b, n)).collect();
            exactly_one(alloc, clauses, row_lits);

            // col: fix col=a, digit=b, vary row v.
            let col_lits: Vec<i64> = (0..n).map(|v| lit(v, a, b, n)).collect();
            exactly_one(alloc, clauses, col_lits);
        }
    }
}
