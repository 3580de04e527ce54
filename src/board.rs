//! Board snapshot data model (spec §3, §6.4).
//!
//! A board is a square grid plus an unordered collection of elements,
//! each tagged with a `kind` string and carrying a `value` payload whose
//! shape depends on the kind. The tag is kept as a raw string rather
//! than a closed enum: several canonical kinds (`arrow`, `killer`,
//! `clone`, `quadruple`) are acknowledged by this core without being
//! fully interpreted, and purely cosmetic kinds (`corner`, `center`,
//! `colors`) carry no semantics at all. One canonical list
//! ([`KNOWN_KINDS`]) is the single source of truth both the feasibility
//! gate and the encoder dispatch table match against.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Every constraint tag this core recognizes, whether or not it has a
/// SAT encoding. A tag outside this list fails the feasibility gate.
pub const KNOWN_KINDS: &[&str] = &[
    "grid",
    "box",
    "disjointGroups",
    "givens",
    "filled",
    "littleKiller",
    "thermo",
    "slowThermo",
    "between",
    "doubleArrow",
    "lockout",
    "palindrome",
    "whisper",
    "dutchWhisper",
    "renban",
    "arrow",
    "killer",
    "clone",
    "quadruple",
    "corner",
    "center",
    "colors",
];

/// Constraint kinds this core can actually turn into CNF clauses.
pub const SAT_ENCODED_KINDS: &[&str] = &["grid", "box", "disjointGroups", "givens", "filled", "littleKiller"];

/// Constraint kinds that are pure rendering annotations and contribute
/// nothing to either the SAT encoding or the warning evaluator.
pub const ANNOTATION_ONLY_KINDS: &[&str] = &["corner", "center", "colors"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDims {
    pub width: usize,
    pub height: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardElement {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pub grid: GridDims,
    pub elements: Vec<BoardElement>,
}

impl Board {
    pub fn n(&self) -> usize {
        self.grid.width
    }

    pub fn elements_of_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a BoardElement> {
        self.elements.iter().filter(move |e| e.kind == kind)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

impl BoardElement {
    fn payload_error(&self, source: serde_json::Error) -> CoreError {
        CoreError::InvalidPayload {
            id: self.id.clone(),
            kind: self.kind.clone(),
            source,
        }
    }

    /// `givens` / `filled` payload: `cellIdx -> digit`. JSON object keys
    /// are strings; parsed here into `usize` cell indices.
    pub fn as_cell_digit_map(&self) -> Result<HashMap<usize, u8>, CoreError> {
        let raw: HashMap<String, u8> =
            serde_json::from_value(self.value.clone()).map_err(|e| self.payload_error(e))?;
        Ok(raw
            .into_iter()
            .filter_map(|(k, v)| k.parse::<usize>().ok().map(|k| (k, v)))
            .collect())
    }

    /// `thermo`/`between`/`whisper`/... payload: `lineId -> ordered cell
    /// sequence` (cellIdx values, bulb/head first).
    pub fn as_line_map(&self) -> Result<HashMap<String, Vec<usize>>, CoreError> {
        serde_json::from_value(self.value.clone()).map_err(|e| self.payload_error(e))
    }

    /// `littleKiller` payload: `diagonalIdx -> sum`. Non-numeric payloads
    /// are ignored by the caller (spec §4.3), so this returns an empty
    /// map rather than erroring when the shape doesn't match.
    pub fn as_diagonal_sum_map(&self) -> HashMap<String, i64> {
        serde_json::from_value(self.value.clone()).unwrap_or_default()
    }

    /// `disjointGroups` payload: a single boolean.
    pub fn as_bool(&self) -> bool {
        self.value.as_bool().unwrap_or(false)
    }
}

/// Resolves a little-killer diagonal id of the form `"row,col,dr,dc"`
/// (the first in-grid cell of the diagonal, plus a unit step direction)
/// into the ordered sequence of `(row, col)` cells it passes through.
///
/// This id scheme is this crate's own convention (spec leaves
/// "diagonalIdx" opaque) — see DESIGN.md.
pub fn resolve_diagonal(diag_id: &str, n: usize) -> Option<Vec<(usize, usize)>> {
    let parts: Vec<&str> = diag_id.split(',').collect();
    if parts.len() != 4 {
        return None;
    }
    let row: i64 = parts[0].parse().ok()?;
    let col: i64 = parts[1].parse().ok()?;
    let dr: i64 = parts[2].parse().ok()?;
    let dc: i64 = parts[3].parse().ok()?;
    if !matches!(dr, -1 | 1) || !matches!(dc, -1 | 1) {
        return None;
    }
    if row < 0 || col < 0 || row as usize >= n || col as usize >= n {
        return None;
    }

    let mut cells = Vec::new();
    let (mut r, mut c) = (row, col);
    while r >= 0 && c >= 0 && (r as usize) < n && (c as usize) < n {
        cells.push((r as usize, c as usize));
        r += dr;
        c += dc;
    }
    Some(cells)
}

/// cellIdx <-> (row, col) conversion, consistent with `cellIdx = row *
/// width + col` (spec §3).
pub fn cell_idx(row: usize, col: usize, width: usize) -> usize {
    row * width + col
}

pub fn cell_rc(idx: usize, width: usize) -> (usize, usize) {
    (idx / width, idx % width)
}
