//! Library-facing error type. See spec §7 for the error taxonomy: most
//! conditions here are *not* recoverable locally (those are logged with
//! `tracing` instead and handled inline) — these variants are the ones
//! that must surface to the caller.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// The board failed the feasibility gate; carries the same message
    /// `cant_attempt` would have returned.
    #[error("preflight rejected: {0}")]
    Preflight(String),

    /// An element's `value` payload didn't match the shape its `kind`
    /// requires.
    #[error("invalid payload for element '{id}' (kind '{kind}'): {source}")]
    InvalidPayload {
        id: String,
        kind: String,
        #[source]
        source: serde_json::Error,
    },

    /// A constraint referenced a diagonal/line id this crate couldn't
    /// resolve to cell coordinates.
    #[error("element '{id}' (kind '{kind}') references an unresolvable line id '{line_id}'")]
    UnresolvableLine {
        id: String,
        kind: String,
        line_id: String,
    },

    /// The solver reported a model assigning two digits to one cell.
    /// Internal invariant violation — the encoding is supposed to make
    /// this impossible.
    #[error("invalid model: cell {cell} was assigned both digit {d1} and digit {d2}")]
    InvalidModel { cell: usize, d1: u8, d2: u8 },

    /// The solver backend itself failed (not UNSAT/UNDEF — an actual
    /// adapter-level error).
    #[error("solver backend error: {0}")]
    Backend(String),
}
