//! Feasibility gate (spec §4.4): rejects boards this core cannot handle
//! before any encoding work is done.

use crate::board::{Board, KNOWN_KINDS};
use crate::encoders::box_dims;

/// Returns a human-readable rejection message, or `None` if the board
/// may proceed to encoding. Does not mutate or consume the board.
pub fn cant_attempt(board: &Board) -> Option<String> {
    if board.grid.width != board.grid.height {
        return Some("Grid is not square.".to_string());
    }

    for element in &board.elements {
        if !KNOWN_KINDS.contains(&element.kind.as_str()) {
            return Some(format!("Unknown element type: {}", element.kind));
        }
    }

    let wants_boxes = board
        .elements
        .iter()
        .any(|e| e.kind == "box" || (e.kind == "disjointGroups" && e.as_bool()));
    if wants_boxes && box_dims(board.n()).is_none() {
        return Some(format!(
            "Grid size {} does not support box regions.",
            board.n()
        ));
    }

    None
}
