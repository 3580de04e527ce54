//! Warning evaluator (spec §4.6): independent of the SAT path entirely.
//! Given a board and the digits currently filled in (possibly a partial
//! assignment, straight from an editor, not a solved grid), flags cells
//! that locally violate a constraint's rule. Unfilled cells never
//! trigger a rule; a rule only fires once every cell it needs is known.
//!
//! Every rule here is a pure scan over `digits`, entirely independent of
//! [`crate::driver`] and the SAT path — this is the "does this look
//! wrong right now" check a live editor calls on every keystroke, not a
//! solver invocation.

use std::collections::HashMap;

use crate::board::{Board, BoardElement};
use fixedbitset::FixedBitSet;

/// Re-scans the whole board and returns a fresh bitset of flagged cell
/// indices (bit index == cellIdx); never accumulated across calls, per
/// spec §5's stateless resource policy for this component.
pub fn evaluate_warnings(board: &Board, digits: &HashMap<usize, u8>) -> FixedBitSet {
    let n = board.n();
    let mut flagged = FixedBitSet::with_capacity(board.grid.width * board.grid.height);
    for element in &board.elements {
        match element.kind.as_str() {
            "thermo" => check_thermo(element, digits, n, false, &mut flagged),
            "slowThermo" => check_thermo(element, digits, n, true, &mut flagged),
            "between" => check_between(element, digits, n, &mut flagged),
            "doubleArrow" => check_double_arrow(element, digits, n, &mut flagged),
            "lockout" => check_lockout(element, digits, n, &mut flagged),
            "palindrome" => check_palindrome(element, digits, &mut flagged),
            "whisper" => check_whisper(element, digits, n, false, &mut flagged),
            "dutchWhisper" => check_whisper(element, digits, n, true, &mut flagged),
            "renban" => check_renban(element, digits, &mut flagged),
            _ => {}
        }
    }
    flagged
}

fn line_cells(element: &BoardElement) -> Vec<Vec<usize>> {
    element
        .as_line_map()
        .map(|m| m.into_values().collect())
        .unwrap_or_default()
}

fn flag(flagged: &mut FixedBitSet, cell: usize) {
    if cell < flagged.len() {
        flagged.insert(cell);
    }
}

/// Thermometers: strictly increasing from the bulb; `slow` allows ties
/// (non-decreasing). Unfilled cells don't break the walk — a running
/// max (bulb to tip) and running min (tip to bulb) are carried across
/// gaps, so a filled cell is checked against every filled cell before
/// it, not just an immediate neighbor.
fn check_thermo(element: &BoardElement, digits: &HashMap<usize, u8>, _n: usize, slow: bool, flagged: &mut FixedBitSet) {
    for cells in line_cells(element) {
        let filled: Vec<(usize, u8)> = cells.iter().filter_map(|&c| digits.get(&c).map(|&d| (c, d))).collect();

        let mut running_max: Option<u8> = None;
        for &(cell, d) in &filled {
            if let Some(max) = running_max {
                let violated = if slow { d < max } else { d <= max };
                if violated {
                    flag(flagged, cell);
                }
            }
            running_max = Some(running_max.map_or(d, |max| max.max(d)));
        }

        let mut running_min: Option<u8> = None;
        for &(cell, d) in filled.iter().rev() {
            if let Some(min) = running_min {
                let violated = if slow { d > min } else { d >= min };
                if violated {
                    flag(flagged, cell);
                }
            }
            running_min = Some(running_min.map_or(d, |min| min.min(d)));
        }
    }
}

/// Between lines: every interior cell must sit strictly between the two
/// endpoint digits. Only checkable once both endpoints are filled.
fn check_between(element: &BoardElement, digits: &HashMap<usize, u8>, _n: usize, flagged: &mut FixedBitSet) {
    for cells in line_cells(element) {
        if cells.len() < 2 {
            continue;
        }
        let (head, tail) = (cells[0], *cells.last().unwrap());
        let (Some(&dh), Some(&dt)) = (digits.get(&head), digits.get(&tail)) else {
            continue;
        };
        let (lo, hi) = (dh.min(dt), dh.max(dt));
        for &mid in &cells[1..cells.len() - 1] {
            if let Some(&dm) = digits.get(&mid) {
                if !(dm > lo && dm < hi) {
                    flag(flagged, head);
                    flag(flagged, mid);
                    flag(flagged, tail);
                }
            }
        }
    }
}

/// Double arrows: the two circled end cells must sum to the total of the
/// arrow shaft's interior cells. Partial sums are checked against what
/// would still be reachable; once every cell is filled, the sums must
/// match exactly.
fn check_double_arrow(element: &BoardElement, digits: &HashMap<usize, u8>, n: usize, flagged: &mut FixedBitSet) {
    for cells in line_cells(element) {
        if cells.len() < 3 {
            continue;
        }
        let ends = [cells[0], *cells.last().unwrap()];
        let interior = &cells[1..cells.len() - 1];

        let end_digits: Vec<u8> = ends.iter().filter_map(|c| digits.get(c).copied()).collect();
        let interior_digits: Vec<u8> = interior.iter().filter_map(|c| digits.get(c).copied()).collect();
        if end_digits.is_empty() && interior_digits.is_empty() {
            continue;
        }

        let end_sum: u32 = end_digits.iter().map(|&d| d as u32).sum();
        let interior_sum: u32 = interior_digits.iter().map(|&d| d as u32).sum();

        let all_filled = end_digits.len() == ends.len() && interior_digits.len() == interior.len();
        if all_filled {
            if end_sum != interior_sum {
                for &c in cells.iter() {
                    flag(flagged, c);
                }
            }
            continue;
        }

        // Even partially filled, the known interior sum can't already
        // exceed what the (still unknown) ends could possibly reach.
        if end_digits.len() == ends.len() && interior_sum > end_sum {
            for &c in cells.iter() {
                flag(flagged, c);
            }
        }
        let max_possible_interior = (n as u32) * (interior.len() - interior_digits.len()) as u32 + interior_sum;
        if interior_digits.len() == interior.len() && end_sum > max_possible_interior {
            for &c in cells.iter() {
                flag(flagged, c);
            }
        }
    }
}

/// Lockout lines: the two circled "diamond" ends must differ by at
/// least the board's lockout delta, and no interior digit may fall in
/// the closed interval between them (an interior digit equal to either
/// end is a violation too, and flags both circles along with it). Delta
/// is derived from `n`, never hard-coded:
/// `((n+1)>>1) - 1` (resolving spec §9's lockout-delta flag).
fn check_lockout(element: &BoardElement, digits: &HashMap<usize, u8>, n: usize, flagged: &mut FixedBitSet) {
    let delta = (((n + 1) >> 1) as i64 - 1).max(0);
    for cells in line_cells(element) {
        if cells.len() < 2 {
            continue;
        }
        let (a, b) = (cells[0], *cells.last().unwrap());
        let (Some(&da), Some(&db)) = (digits.get(&a), digits.get(&b)) else {
            continue;
        };
        let (da, db) = (da as i64, db as i64);
        if (da - db).abs() < delta {
            flag(flagged, a);
            flag(flagged, b);
        }
        let (lo, hi) = (da.min(db), da.max(db));
        for &mid in &cells[1..cells.len() - 1] {
            if let Some(&dm) = digits.get(&mid) {
                let dm = dm as i64;
                if dm >= lo && dm <= hi {
                    flag(flagged, mid);
                    flag(flagged, a);
                    flag(flagged, b);
                }
            }
        }
    }
}

/// Palindrome lines: digit at position `i` from the start must equal
/// the digit at position `i` from the end.
fn check_palindrome(element: &BoardElement, digits: &HashMap<usize, u8>, flagged: &mut FixedBitSet) {
    for cells in line_cells(element) {
        let len = cells.len();
        for i in 0..len / 2 {
            let (a, b) = (cells[i], cells[len - 1 - i]);
            if let (Some(&da), Some(&db)) = (digits.get(&a), digits.get(&b)) {
                if da != db {
                    flag(flagged, a);
                    flag(flagged, b);
                }
            }
        }
    }
}

/// Whisper/Dutch-whisper lines: adjacent digits must differ by at least
/// the line's delta (German whisper: `(n+1)>>1`; Dutch: one less).
fn check_whisper(element: &BoardElement, digits: &HashMap<usize, u8>, n: usize, dutch: bool, flagged: &mut FixedBitSet) {
    let base = ((n + 1) >> 1) as i64;
    let delta = if dutch { (base - 1).max(0) } else { base };
    for cells in line_cells(element) {
        for pair in cells.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if let (Some(&da), Some(&db)) = (digits.get(&a), digits.get(&b)) {
                if (da as i64 - db as i64).abs() < delta {
                    flag(flagged, a);
                    flag(flagged, b);
                }
            }
        }
    }
}

/// Renban lines: a consecutive run of digits in any order. Only
/// checkable once the whole line is filled (a partial renban can always
/// still be completed into a valid run).
fn check_renban(element: &BoardElement, digits: &HashMap<usize, u8>, flagged: &mut FixedBitSet) {
    for cells in line_cells(element) {
        let filled: Vec<(usize, u8)> = cells
            .iter()
            .filter_map(|&c| digits.get(&c).map(|&d| (c, d)))
            .collect();
        if filled.len() != cells.len() {
            continue;
        }
        let mut sorted: Vec<u8> = filled.iter().map(|&(_, d)| d).collect();
        sorted.sort_unstable();
        let consecutive = sorted.windows(2).all(|w| w[1] == w[0] + 1);
        let distinct = {
            let mut s = sorted.clone();
            s.dedup();
            s.len() == sorted.len()
        };
        if !consecutive || !distinct {
            for &(c, _) in &filled {
                flag(flagged, c);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::GridDims;
    use serde_json::json;

    fn board_with(element: BoardElement, n: usize) -> Board {
        Board {
            grid: GridDims { width: n, height: n },
            elements: vec![element],
        }
    }

    #[test]
    fn thermo_flags_a_non_increasing_adjacent_pair() {
        let element = BoardElement {
            id: "t".into(),
            kind: "thermo".into(),
            value: json!({"line1": [0, 1, 2]}),
        };
        let board = board_with(element, 9);
        let mut digits = HashMap::new();
        digits.insert(0, 5);
        digits.insert(1, 3); // decrease: violation
        let flagged = evaluate_warnings(&board, &digits);
        assert!(flagged.contains(0));
        assert!(flagged.contains(1));
    }

    #[test]
    fn thermo_is_silent_when_strictly_increasing() {
        let element = BoardElement {
            id: "t".into(),
            kind: "thermo".into(),
            value: json!({"line1": [0, 1, 2]}),
        };
        let board = board_with(element, 9);
        let mut digits = HashMap::new();
        digits.insert(0, 1);
        digits.insert(1, 2);
        let flagged = evaluate_warnings(&board, &digits);
        assert_eq!(flagged.count_ones(..), 0);
    }

    #[test]
    fn slow_thermo_tolerates_equal_adjacent_digits() {
        let element = BoardElement {
            id: "t".into(),
            kind: "slowThermo".into(),
            value: json!({"line1": [0, 1]}),
        };
        let board = board_with(element, 9);
        let mut digits = HashMap::new();
        digits.insert(0, 4);
        digits.insert(1, 4);
        let flagged = evaluate_warnings(&board, &digits);
        assert_eq!(flagged.count_ones(..), 0);
    }

    #[test]
    fn between_flags_an_interior_digit_outside_the_endpoint_range() {
        let element = BoardElement {
            id: "b".into(),
            kind: "between".into(),
            value: json!({"line1": [0, 1, 2]}),
        };
        let board = board_with(element, 9);
        let mut digits = HashMap::new();
        digits.insert(0, 2);
        digits.insert(1, 8); // outside (2,6)
        digits.insert(2, 6);
        let flagged = evaluate_warnings(&board, &digits);
        assert!(flagged.contains(1));
    }

    #[test]
    fn palindrome_flags_a_mismatched_mirror_pair() {
        let element = BoardElement {
            id: "p".into(),
            kind: "palindrome".into(),
            value: json!({"line1": [0, 1, 2, 3]}),
        };
        let board = board_with(element, 9);
        let mut digits = HashMap::new();
        digits.insert(0, 5);
        digits.insert(3, 7);
        let flagged = evaluate_warnings(&board, &digits);
        assert!(flagged.contains(0));
        assert!(flagged.contains(3));
    }

    #[test]
    fn whisper_requires_the_german_delta_on_a_nine_wide_grid() {
        let element = BoardElement {
            id: "w".into(),
            kind: "whisper".into(),
            value: json!({"line1": [0, 1]}),
        };
        let board = board_with(element, 9);
        let mut digits = HashMap::new();
        digits.insert(0, 5);
        digits.insert(1, 6); // delta 1 < required 5
        let flagged = evaluate_warnings(&board, &digits);
        assert!(flagged.contains(0));
        assert!(flagged.contains(1));
    }

    #[test]
    fn dutch_whisper_accepts_a_smaller_delta_than_german_whisper() {
        let element = BoardElement {
            id: "w".into(),
            kind: "dutchWhisper".into(),
            value: json!({"line1": [0, 1]}),
        };
        let board = board_with(element, 9);
        let mut digits = HashMap::new();
        digits.insert(0, 1);
        digits.insert(1, 5); // delta 4, meets dutch (4) but not german (5)
        let flagged = evaluate_warnings(&board, &digits);
        assert_eq!(flagged.count_ones(..), 0);
    }

    #[test]
    fn renban_rejects_a_non_consecutive_fully_filled_line() {
        let element = BoardElement {
            id: "r".into(),
            kind: "renban".into(),
            value: json!({"line1": [0, 1, 2]}),
        };
        let board = board_with(element, 9);
        let mut digits = HashMap::new();
        digits.insert(0, 1);
        digits.insert(1, 2);
        digits.insert(2, 9);
        let flagged = evaluate_warnings(&board, &digits);
        assert!(flagged.contains(0));
        assert!(flagged.contains(1));
        assert!(flagged.contains(2));
    }

    #[test]
    fn renban_is_silent_while_still_partially_filled() {
        let element = BoardElement {
            id: "r".into(),
            kind: "renban".into(),
            value: json!({"line1": [0, 1, 2]}),
        };
        let board = board_with(element, 9);
        let mut digits = HashMap::new();
        digits.insert(0, 1);
        digits.insert(1, 9); // would be invalid, but line isn't full yet
        let flagged = evaluate_warnings(&board, &digits);
        assert_eq!(flagged.count_ones(..), 0);
    }

    #[test]
    fn lockout_flags_ends_too_close_together() {
        let element = BoardElement {
            id: "lo".into(),
            kind: "lockout".into(),
            value: json!({"line1": [0, 1]}),
        };
        let board = board_with(element, 9);
        let mut digits = HashMap::new();
        digits.insert(0, 5);
        digits.insert(1, 5); // delta 0, required ((9+1)>>1)-1 = 4
        let flagged = evaluate_warnings(&board, &digits);
        assert!(flagged.contains(0));
        assert!(flagged.contains(1));
    }

    #[test]
    fn lockout_flags_an_interior_digit_equal_to_a_circle_and_the_circles_too() {
        let element = BoardElement {
            id: "lo".into(),
            kind: "lockout".into(),
            value: json!({"line1": [0, 1, 2]}),
        };
        let board = board_with(element, 9);
        let mut digits = HashMap::new();
        digits.insert(0, 2);
        digits.insert(1, 2); // interior equals the low circle: closed interval violation
        digits.insert(2, 9);
        let flagged = evaluate_warnings(&board, &digits);
        assert!(flagged.contains(0));
        assert!(flagged.contains(1));
        assert!(flagged.contains(2));
    }

    #[test]
    fn thermo_flags_across_a_gap_in_the_running_max_and_min_walk() {
        let element = BoardElement {
            id: "t".into(),
            kind: "thermo".into(),
            value: json!({"line1": [0, 1, 2, 3]}),
        };
        let board = board_with(element, 9);
        let mut digits = HashMap::new();
        digits.insert(0, 7);
        digits.insert(2, 3); // cell1 and cell3 left unfilled
        let flagged = evaluate_warnings(&board, &digits);
        assert!(flagged.contains(0));
        assert!(flagged.contains(2));
        assert!(!flagged.contains(1));
        assert!(!flagged.contains(3));
    }
}
