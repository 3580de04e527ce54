//! `box` and `disjointGroups` encoders, generalized box geometry
//! (SPEC_FULL.md §3, resolving spec §9's hard-coded-3x3 flag).
//!
//! The teacher's box encoding (and the original source it's modeled on)
//! hard-codes a 3x3 sub-box, correct only for `N = 9`. This crate instead
//! factors `N` into box dimensions `(bw, bh)` with `bw * bh = N`, so `box`
//! and `disjointGroups` work on any grid size that has a non-trivial
//! factorization (6x6 with 3x2 boxes, 16x16 with 4x4 boxes, ...), and
//! [`crate::feasibility::cant_attempt`] rejects the request outright on
//! sizes that don't (e.g. prime `N`) instead of silently encoding
//! something undefined.

use crate::literal::{VarAllocator, lit};
use crate::pb::encode_pb;

/// Factors `n` into `(box_width, box_height)` with `box_width *
/// box_height == n` and `box_width` the smallest divisor of `n` not less
/// than `ceil(sqrt(n))` (so the wider dimension comes first: `n=6 ->
/// (3,2)`, `n=9 -> (3,3)`, `n=16 -> (4,4)`). Returns `None` when no such
/// factorization has `1 < box_width < n` (e.g. `n` is prime or 1) —
/// there is no sensible box partition in that case.
pub fn box_dims(n: usize) -> Option<(usize, usize)> {
    if n < 4 {
        return None;
    }
    let ceil_sqrt = (n as f64).sqrt().ceil() as usize;
    for bw in ceil_sqrt..n {
        if n % bw == 0 {
            return Some((bw, n / bw));
        }
    }
    None
}

fn exactly_one(alloc: &mut VarAllocator, clauses: &mut Vec<Vec<i64>>, lits: Vec<i64>) {
    let weights = vec![1u64; lits.len()];
    let mut next_var = alloc.next_var();
    encode_pb(&weights, &lits, 1, 1, clauses, &mut next_var);
    alloc.set_next_var(next_var);
}

/// Maps `(box_index, position_within_box)` to `(row, col)`, for boxes
/// of width `bw` and height `bh` tiling an `n x n` grid (`bw * bh == n`).
/// Boxes are numbered row-major by block, left to right, top to bottom.
fn box_cell(box_idx: usize, pos: usize, bw: usize, bh: usize) -> (usize, usize) {
    let n = bw * bh;
    let boxes_across = n / bw;
    let box_row = box_idx / boxes_across;
    let box_col = box_idx % boxes_across;
    let row = box_row * bh + pos / bw;
    let col = box_col * bw + pos % bw;
    (row, col)
}

/// `box`: each 3x3-equivalent region contains each digit exactly once.
pub fn encode_box(alloc: &mut VarAllocator, clauses: &mut Vec<Vec<i64>>, n: usize) {
    let Some((bw, bh)) = box_dims(n) else {
        // Feasibility gate should already have rejected this board; be
        // defensive and simply skip rather than panicking.
        tracing::warn!(n, "box requested on a grid size with no valid box factorization; skipping");
        return;
    };
    for val in 0..n {
        for box_idx in 0..n {
            let lits: Vec<i64> = (0..n)
                .map(|pos| {
                    let (r, c) = box_cell(box_idx, pos, bw, bh);
                    lit(r, c, val, n)
                })
                .collect();
            exactly_one(alloc, clauses, lits);
        }
    }
}

/// `disjointGroups`: for each digit and each position-within-a-box, the
/// cells sharing that position across every box contain the digit
/// exactly once.
pub fn encode_disjoint_groups(alloc: &mut VarAllocator, clauses: &mut Vec<Vec<i64>>, n: usize) {
    let Some((bw, bh)) = box_dims(n) else {
        tracing::warn!(n, "disjointGroups requested on a grid size with no valid box factorization; skipping");
        return;
    };
    for val in 0..n {
        for pos in 0..n {
            let lits: Vec<i64> = (0..n)
                .map(|box_idx| {
                    let (r, c) = box_cell(box_idx, pos, bw, bh);
                    lit(r, c, val, n)
                })
                .collect();
            exactly_one(alloc, clauses, lits);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nine_by_nine_uses_three_by_three_boxes() {
        assert_eq!(box_dims(9), Some((3, 3)));
    }

    #[test]
    fn six_by_six_uses_three_by_two_boxes() {
        assert_eq!(box_dims(6), Some((3, 2)));
    }

    #[test]
    fn sixteen_by_sixteen_uses_four_by_four_boxes() {
        assert_eq!(box_dims(16), Some((4, 4)));
    }

    #[test]
    fn prime_sizes_have_no_box_factorization() {
        assert_eq!(box_dims(7), None);
        assert_eq!(box_dims(11), None);
    }

    #[test]
    fn box_cells_partition_the_grid_exactly_once() {
        let n = 9;
        let (bw, bh) = box_dims(n).unwrap();
        let mut seen = std::collections::HashSet::new();
        for box_idx in 0..n {
            for pos in 0..n {
                let cell = box_cell(box_idx, pos, bw, bh);
                assert!(seen.insert(cell), "cell {cell:?} visited twice");
            }
        }
        assert_eq!(seen.len(), n * n);
    }

    #[test]
    fn box_encoding_runs_on_a_non_square_box_size() {
        let n = 6;
        let mut alloc = VarAllocator::new(n);
        let mut clauses = Vec::new();
        encode_box(&mut alloc, &mut clauses, n);
        assert!(!clauses.is_empty());
    }
}
