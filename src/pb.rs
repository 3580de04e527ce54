//! Pseudo-Boolean encoder: appends CNF clauses satisfiable iff
//! `lo <= sum(w_i * x_i) <= hi`, where `x_i` is the truth value of
//! `lits[i]`.
//!
//! This is a generalized sequential weighted counter, extending the
//! unweighted Sinz sequential-counter cardinality encoding (as used for
//! "exactly k of n" in the teacher pack's minesweeper solver) to
//! arbitrary positive integer weights and a `[lo, hi]` window instead of
//! a single exact count. Every constraint in this crate funnels through
//! this one function — including plain exactly-one, which is just
//! `lo = hi = 1` over unit weights.
//!
//! Register `reg[i][t]` means "the weighted sum of the first `i`
//! literals is at least threshold `t`", for `t` in `1..=cap` where
//! `cap = min(hi + 1, total_weight)`. We only need registers up to
//! `hi + 1` (to detect "exceeds hi") or up to the literals' own maximum
//! reachable sum, whichever is smaller.
//!
//! See also: Carsten Sinz, "Towards an Optimal CNF Encoding of Boolean
//! Cardinality Constraints" (2005).

/// Appends clauses enforcing `lo <= sum(weights[i] * lits[i]) <= hi`.
///
/// `weights.len() == lits.len()`, all weights strictly positive. `lits`
/// are already-allocated CNF literals (may themselves be negative, i.e.
/// a negated base variable). Returns nothing; clauses are appended to
/// `clauses` and any auxiliary variables are drawn from `next_var`, which
/// is advanced in place — the caller must not reuse a `next_var` value
/// handed to a prior call.
pub fn encode_pb(
    weights: &[u64],
    lits: &[i64],
    lo: i64,
    hi: i64,
    clauses: &mut Vec<Vec<i64>>,
    next_var: &mut i64,
) {
    assert_eq!(weights.len(), lits.len(), "weights/lits length mismatch");
    assert!(weights.iter().all(|&w| w > 0), "PB weights must be positive");

    let n = lits.len();
    let total: i64 = weights.iter().map(|&w| w as i64).sum();

    // Degenerate bounds: unsatisfiable no matter the assignment.
    if lo > total || hi < 0 || lo > hi {
        clauses.push(Vec::new());
        return;
    }
    if n == 0 {
        // Sum is always 0; only lo<=0<=hi can hold, already checked above.
        return;
    }

    let cap = hi.saturating_add(1).min(total) as usize;
    if cap == 0 {
        // hi >= total always holds (no upper bound can bind) and lo <= 0:
        // nothing to enforce.
        if lo > 0 {
            clauses.push(Vec::new());
        }
        return;
    }

    // reg[i][t] (1-indexed i, 1-indexed t) as a flat Vec<Option<i64>>;
    // None means "not reachable / not tracked" (treated as constant false).
    // reachable[i] = the highest threshold actually tracked at step i.
    let mut reg: Vec<Vec<Option<i64>>> = Vec::with_capacity(n + 1);
    reg.push(Vec::new()); // reg[0] is unused (i is 1-indexed below)
    let mut reachable = vec![0usize; n + 1];

    for i in 1..=n {
        let w = weights[i - 1] as i64;
        // cumulative max reachable sum after i items, capped at `cap`.
        let prev_cum = total_weight_prefix(weights, i - 1).min(cap as i64);
        let cap_i = (prev_cum + w).min(cap as i64).max(0) as usize;

        let mut row: Vec<Option<i64>> = vec![None; cap_i + 1]; // index 0 unused
        for t in 1..=cap_i {
            row[t] = Some(*next_var);
            *next_var += 1;
        }
        reachable[i] = cap_i;
        reg.push(row);
    }

    let x = |i: usize| lits[i - 1]; // 1-indexed accessor

    for i in 1..=n {
        let w = weights[i - 1] as i64;
        let cap_i = reachable[i];
        let cap_prev = reachable[i - 1];
        for t in 1..=cap_i {
            let this_reg = reg[i][t].expect("allocated above");
            let prev_here = if t <= cap_prev { reg[i - 1][t] } else { None };

            if (t as i64) <= w {
                // this_reg <=> prev_here OR x(i)
                match prev_here {
                    Some(p) => {
                        clauses.push(vec![-this_reg, p, x(i)]);
                        clauses.push(vec![this_reg, -p]);
                        clauses.push(vec![this_reg, -x(i)]);
                    }
                    None => {
                        clauses.push(vec![-this_reg, x(i)]);
                        clauses.push(vec![this_reg, -x(i)]);
                    }
                }
            } else {
                // this_reg <=> prev_here OR (x(i) AND prev_at(t - w))
                let carry_t = (t as i64 - w) as usize;
                let carry = if carry_t <= cap_prev { reg[i - 1][carry_t] } else { None };
                match (prev_here, carry) {
                    (Some(p), Some(c)) => {
                        clauses.push(vec![-this_reg, p, x(i)]);
                        clauses.push(vec![-this_reg, p, c]);
                        clauses.push(vec![this_reg, -p]);
                        clauses.push(vec![this_reg, -x(i), -c]);
                    }
                    (Some(p), None) => {
                        // carry term impossible: this_reg <=> prev_here
                        clauses.push(vec![-this_reg, p]);
                        clauses.push(vec![this_reg, -p]);
                    }
                    (None, Some(c)) => {
                        // no carry-forward term: this_reg <=> x(i) AND c
                        clauses.push(vec![-this_reg, x(i)]);
                        clauses.push(vec![-this_reg, c]);
                        clauses.push(vec![this_reg, -x(i), -c]);
                    }
                    (None, None) => {
                        // threshold t unreachable at all; shouldn't happen
                        // given cap_i's construction, but stay safe.
                        clauses.push(vec![-this_reg]);
                    }
                }
            }
        }
    }

    let top_cap = reachable[n];

    if lo > 0 {
        if (lo as usize) > top_cap {
            clauses.push(Vec::new());
        } else {
            let v = reg[n][lo as usize].expect("lo within tracked range");
            clauses.push(vec![v]);
        }
    }

    let hi_plus_one = hi + 1;
    if hi_plus_one <= top_cap as i64 {
        let v = reg[n][hi_plus_one as usize].expect("hi+1 within tracked range");
        clauses.push(vec![-v]);
    }
    // else: hi+1 exceeds every reachable sum, so "at most hi" holds
    // automatically and needs no clause.
}

/// Sum of the first `count` weights, used to bound how many threshold
/// registers are worth tracking at each step.
fn total_weight_prefix(weights: &[u64], count: usize) -> i64 {
    weights[..count].iter().map(|&w| w as i64).sum()
}
