//! Variable allocator: the bijection between `(row, col, digit)` and the
//! base CNF literal space, plus a counter for auxiliary variables.
//!
//! `lit(r, c, v) = 1 + r*N^2 + c*N + v` for `0 <= r,c,v < N`. Variable `0`
//! is never used (the negation convention needs a nonzero magnitude), so
//! the base range is `[1, N^3]` and auxiliary variables start at `N^3 + 1`.

/// Maps a 0-indexed `(row, col, digit)` triple to its base CNF variable.
///
/// `digit` is 0-indexed here (`0..N`); the actual sudoku digit is `v + 1`.
pub fn lit(r: usize, c: usize, v: usize, n: usize) -> i64 {
    debug_assert!(r < n && c < n && v < n);
    1 + (r * n * n + c * n + v) as i64
}

/// Inverse of [`lit`]: recovers `(row, col, digit)` from a positive base
/// variable number. `var` must be in `[1, n^3]`.
pub fn coords_of(var: i64, n: usize) -> (usize, usize, usize) {
    debug_assert!(var >= 1);
    let idx = (var - 1) as usize;
    let v = idx % n;
    let c = (idx / n) % n;
    let r = idx / (n * n);
    (r, c, v)
}

/// Allocates fresh auxiliary variables above a grid's base variable range.
///
/// Stateless except for the next-free-variable high-water mark. Every
/// constraint encoder and the PB encoder thread a `&mut VarAllocator`
/// through their clause-building so aux variables never collide, whether
/// they come from the same encoder call or two different ones.
#[derive(Debug, Clone)]
pub struct VarAllocator {
    n: usize,
    next: i64,
}

impl VarAllocator {
    /// Creates an allocator for an `n x n` grid; the next free variable
    /// starts right after the base range `[1, n^3]`.
    pub fn new(n: usize) -> Self {
        Self {
            n,
            next: (n as i64).pow(3) + 1,
        }
    }

    pub fn n(&self) -> usize {
        self.n
    }

    /// Hands out one fresh auxiliary variable.
    pub fn fresh(&mut self) -> i64 {
        let v = self.next;
        self.next += 1;
        v
    }

    /// The current next-free-variable counter (mutated in place by
    /// callers that want to track it externally, e.g. the PB encoder's
    /// `next_var` contract).
    pub fn next_var(&self) -> i64 {
        self.next
    }

    pub fn set_next_var(&mut self, next: i64) {
        debug_assert!(next >= self.next);
        self.next = next;
    }

    /// The highest variable number allocated so far (inclusive); the
    /// solver must be told to declare at least this many variables.
    pub fn high_water(&self) -> i64 {
        self.next - 1
    }
}
