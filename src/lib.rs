//! A library for compiling variant-sudoku boards into CNF and enumerating
//! their solutions using a SAT solver.
//!
//! A board is a square grid plus an unordered collection of typed
//! elements (`grid`, `box`, `givens`, `littleKiller`, ...); [`solve`]
//! compiles the board's elements to clauses, drives a SAT backend to
//! enumerate solutions up to a configurable cap, and reports each one
//! (plus a completion sentinel) through a caller-supplied callback.
//! [`cant_attempt`] runs first and rejects boards this core cannot
//! handle. [`evaluate_warnings`] is a separate, SAT-independent scan
//! that flags locally-invalid cells in a partial digit assignment.

pub mod backend;
pub mod board;
pub mod cancel;
pub mod driver;
pub mod encoders;
pub mod error;
pub mod feasibility;
pub mod literal;
pub mod pb;
pub mod warnings;

pub use board::{Board, BoardElement, GridDims};
pub use cancel::CancelToken;
pub use driver::{Solution, SolveConfig, solve};
pub use error::CoreError;
pub use feasibility::cant_attempt;
pub use warnings::evaluate_warnings;
