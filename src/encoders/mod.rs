//! Constraint encoder dispatch (spec §4.3).
//!
//! Each encoder is a pure function `(alloc, clauses, n, element) ->
//! ()` appending clauses for one board element. `encode_element`
//! dispatches on `element.kind`:
//!
//! - `grid`/`box`/`disjointGroups`/`givens`/`filled`/`littleKiller` get a
//!   real SAT encoding.
//! - `corner`/`center`/`colors` are pure annotations: no-op.
//! - Every other known-but-unencoded kind (`thermo`, `slowThermo`,
//!   `between`, `doubleArrow`, `lockout`, `palindrome`, `whisper`,
//!   `dutchWhisper`, `renban`, `arrow`, `killer`, `clone`, `quadruple`)
//!   logs a warning and is skipped, preserving the source's existing
//!   behavior (spec §9) rather than silently producing spurious
//!   "solutions".
//! - A kind outside [`crate::board::KNOWN_KINDS`] (reachable only if it
//!   slipped past preflight, e.g. added concurrently) is also logged and
//!   skipped — spec §7's "encoder no-op" error kind.

mod boxes;
mod givens;
mod grid;
mod little_killer;

pub use boxes::box_dims;

use crate::board::{Board, BoardElement, KNOWN_KINDS};
use crate::cancel::CancelToken;
use crate::error::CoreError;
use crate::literal::VarAllocator;

/// Appends clauses for every element on the board, in order. `cancel` is
/// checked before each element is encoded; a cancellation observed mid-
/// encode stops immediately and returns `Ok(false)` with whatever
/// clauses were already appended left in place (the caller discards
/// them, per spec §5 — no solver is ever started). Returns an error only
/// for the "invalid payload" case (spec §7 kind 1 belongs to the
/// feasibility gate, not here); unknown/unencoded kinds are logged and
/// skipped rather than erroring, per spec §7 kind 2.
pub fn encode_board(
    alloc: &mut VarAllocator,
    clauses: &mut Vec<Vec<i64>>,
    board: &Board,
    cancel: &CancelToken,
) -> Result<bool, CoreError> {
    let n = board.n();
    for element in &board.elements {
        if cancel.is_cancelled() {
            return Ok(false);
        }
        encode_element(alloc, clauses, n, element)?;
    }
    Ok(true)
}

fn encode_element(
    alloc: &mut VarAllocator,
    clauses: &mut Vec<Vec<i64>>,
    n: usize,
    element: &BoardElement,
) -> Result<(), CoreError> {
    match element.kind.as_str() {
        "grid" => grid::encode(alloc, clauses, n),
        "box" => boxes::encode_box(alloc, clauses, n),
        "disjointGroups" => {
            if element.as_bool() {
                boxes::encode_disjoint_groups(alloc, clauses, n);
            }
        }
        "givens" | "filled" => givens::encode(alloc, clauses, n, element)?,
        "littleKiller" => little_killer::encode(alloc, clauses, n, element)?,
        "corner" | "center" | "colors" => {
            // Pure rendering annotations; contribute nothing.
        }
        kind if KNOWN_KINDS.contains(&kind) => {
            tracing::warn!(
                element_id = %element.id,
                kind,
                "no SAT encoder for this constraint kind; skipping (warning evaluator still checks it)"
            );
        }
        kind => {
            tracing::warn!(
                element_id = %element.id,
                kind,
                "unknown element kind encountered during encoding; skipping"
            );
        }
    }
    Ok(())
}
