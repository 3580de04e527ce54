//! The solver driver (spec §4.5): preflight, encode, then repeatedly
//! solve-decode-block until the solver says unsat, `max_solutions` is
//! reached, or the caller cancels.

use std::collections::HashMap;
use std::time::Duration;

use crate::backend::{SatBackend, SolveOutcome, VarisatBackend};
use crate::board::{Board, cell_idx};
use crate::cancel::CancelToken;
use crate::encoders::encode_board;
use crate::error::CoreError;
use crate::feasibility::cant_attempt;
use crate::literal::{VarAllocator, coords_of};

pub type Solution = HashMap<usize, u8>;

/// Driver tunables (spec §4.5's "per-call solve time slice" and
/// "default max solutions"), constructible from CLI flags.
#[derive(Debug, Clone, Copy)]
pub struct SolveConfig {
    /// How long a single `solve_within` poll is allowed to run before
    /// the driver checks cancellation again.
    pub time_slice: Duration,
    /// Solutions are reported up to (and including) this count, then
    /// the driver stops even if more exist.
    pub max_solutions: usize,
}

impl Default for SolveConfig {
    fn default() -> Self {
        Self {
            time_slice: Duration::from_millis(100),
            max_solutions: 2,
        }
    }
}

/// Compiles `board` to CNF and enumerates solutions, reporting each one
/// through `on_event(Some(solution))` and, on a normal (non-cancelled)
/// finish, a final `on_event(None)` sentinel.
///
/// Returns `Ok(true)` if enumeration ran to completion (solver exhausted
/// or `max_solutions` reached), `Ok(false)` if the caller cancelled
/// before any solution was found (including a cancellation observed
/// mid-encode, before a backend ever existed), and `Err` for preflight
/// rejection, a genuine solver-adapter failure, or an internal invariant
/// violation. The backend is always dropped on return, on every path.
pub fn solve(
    board: &Board,
    config: SolveConfig,
    mut on_event: impl FnMut(Option<Solution>),
    cancel: &CancelToken,
) -> Result<bool, CoreError> {
    if let Some(reason) = cant_attempt(board) {
        return Err(CoreError::Preflight(reason));
    }

    let n = board.n();
    let mut alloc = VarAllocator::new(n);
    let mut clauses: Vec<Vec<i64>> = Vec::new();
    if !encode_board(&mut alloc, &mut clauses, board, cancel)? {
        return Ok(false);
    }

    let mut backend = VarisatBackend::new();
    run_with_backend(&mut backend, &mut alloc, &mut clauses, n, config, &mut on_event, cancel)
}

/// Same protocol as [`solve`], parameterized over the backend so tests
/// can substitute a deterministic [`crate::backend::mock::MockBackend`].
pub fn run_with_backend(
    backend: &mut dyn SatBackend,
    alloc: &mut VarAllocator,
    clauses: &mut Vec<Vec<i64>>,
    n: usize,
    config: SolveConfig,
    on_event: &mut dyn FnMut(Option<Solution>),
    cancel: &CancelToken,
) -> Result<bool, CoreError> {
    backend.declare_vars(alloc.high_water() as usize);
    for clause in clauses.iter() {
        backend.add_clause(clause);
    }

    let mut found = 0usize;
    while found < config.max_solutions {
        if cancel.is_cancelled() {
            return Ok(false);
        }

        let outcome = loop {
            if cancel.is_cancelled() {
                return Ok(false);
            }
            match backend.solve_within(config.time_slice) {
                Ok(SolveOutcome::Undef) => {
                    tracing::debug!("solver slice undetermined, continuing to poll");
                    continue;
                }
                Ok(decided) => break decided,
                Err(msg) => return Err(CoreError::Backend(msg)),
            }
        };

        match outcome {
            SolveOutcome::Unsat => break,
            SolveOutcome::Sat => {
                let model = backend.model();
                let solution = decode_model(&model, n)?;
                found += 1;
                on_event(Some(solution.clone()));

                let blocking: Vec<i64> = solution
                    .iter()
                    .map(|(&idx, &digit)| {
                        let (row, col) = crate::board::cell_rc(idx, n);
                        let v = (digit as usize).saturating_sub(1);
                        -crate::literal::lit(row, col, v, n)
                    })
                    .collect();
                backend.add_clause(&blocking);
            }
            SolveOutcome::Undef => unreachable!("inner loop only breaks on a decided outcome"),
        }
    }

    on_event(None);
    Ok(true)
}

/// Decodes a flat model (indexed by `var - 1`, as returned by
/// [`SatBackend::model`]) into a cellIdx -> digit map, erroring if the
/// model ever assigns two digits to the same cell (spec §7's internal
/// invariant violation).
fn decode_model(model: &[bool], n: usize) -> Result<Solution, CoreError> {
    let base_vars = n * n * n;
    let mut solution = Solution::new();
    for var in 1..=base_vars as i64 {
        let idx = (var - 1) as usize;
        if idx >= model.len() || !model[idx] {
            continue;
        }
        let (row, col, v) = coords_of(var, n);
        let cell = cell_idx(row, col, n);
        let digit = (v + 1) as u8;
        if let Some(&existing) = solution.get(&cell) {
            return Err(CoreError::InvalidModel {
                cell,
                d1: existing,
                d2: digit,
            });
        }
        solution.insert(cell, digit);
    }
    Ok(solution)
}
