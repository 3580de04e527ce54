//! End-to-end scenarios against the public API, one per spec §8 concrete
//! scenario.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use proptest::prelude::*;
use rand::seq::SliceRandom;
use serde_json::json;
use variant_sudoku::board::{Board, BoardElement, GridDims};
use variant_sudoku::driver::SolveConfig;
use variant_sudoku::encoders::box_dims;
use variant_sudoku::{CancelToken, cant_attempt, evaluate_warnings, solve};

fn element(id: &str, kind: &str, value: serde_json::Value) -> BoardElement {
    BoardElement {
        id: id.into(),
        kind: kind.into(),
        value,
    }
}

fn empty_board(n: usize) -> Board {
    Board {
        grid: GridDims { width: n, height: n },
        elements: vec![element("g", "grid", json!(null)), element("b", "box", json!(null))],
    }
}

/// Scenario 1: an empty 9x9 grid has many solutions; asking for 2 must
/// return exactly 2 distinct ones and report completion.
#[test]
fn empty_nine_by_nine_yields_at_least_two_distinct_solutions() {
    let board = empty_board(9);
    let cancel = CancelToken::new();
    let mut solutions = Vec::new();
    let completed = solve(
        &board,
        SolveConfig { time_slice: Duration::from_millis(50), max_solutions: 2 },
        |event| {
            if let Some(solution) = event {
                solutions.push(solution);
            }
        },
        &cancel,
    )
    .unwrap();

    assert!(completed);
    assert_eq!(solutions.len(), 2);
    assert_ne!(solutions[0], solutions[1]);
}

/// Scenario 2: a fully-constrained board (a complete valid grid given as
/// `givens`) has exactly one solution.
#[test]
fn fully_given_valid_grid_has_exactly_one_solution() {
    let n = 4;
    // A valid 4x4 Latin square respecting 2x2 boxes.
    let grid = [[1, 2, 3, 4], [3, 4, 1, 2], [2, 1, 4, 3], [4, 3, 2, 1]];
    let mut givens = serde_json::Map::new();
    for row in 0..n {
        for col in 0..n {
            givens.insert((row * n + col).to_string(), json!(grid[row][col]));
        }
    }
    let board = Board {
        grid: GridDims { width: n, height: n },
        elements: vec![
            element("g", "grid", json!(null)),
            element("b", "box", json!(null)),
            element("gv", "givens", serde_json::Value::Object(givens)),
        ],
    };

    let cancel = CancelToken::new();
    let mut solutions = Vec::new();
    let completed = solve(
        &board,
        SolveConfig { time_slice: Duration::from_millis(50), max_solutions: 2 },
        |event| {
            if let Some(solution) = event {
                solutions.push(solution);
            }
        },
        &cancel,
    )
    .unwrap();

    assert!(completed);
    assert_eq!(solutions.len(), 1);
}

/// Scenario 3: contradictory givens (two different digits in one cell
/// via the grid rules: same row, same digit, different cells) make the
/// board unsatisfiable - zero solutions, but still a completed run.
#[test]
fn contradictory_givens_yield_zero_solutions() {
    let n = 4;
    let mut givens = serde_json::Map::new();
    givens.insert("0".to_string(), json!(1)); // row 0, col 0 = 1
    givens.insert("1".to_string(), json!(1)); // row 0, col 1 = 1 (same row, same digit)
    let board = Board {
        grid: GridDims { width: n, height: n },
        elements: vec![
            element("g", "grid", json!(null)),
            element("gv", "givens", serde_json::Value::Object(givens)),
        ],
    };

    let cancel = CancelToken::new();
    let mut solutions = Vec::new();
    let completed = solve(
        &board,
        SolveConfig::default(),
        |event| {
            if let Some(solution) = event {
                solutions.push(solution);
            }
        },
        &cancel,
    )
    .unwrap();

    assert!(completed);
    assert!(solutions.is_empty());
}

/// Scenario 4: a little-killer sum constraint holds over every reported
/// solution's decoded digits.
#[test]
fn little_killer_sum_holds_in_every_solution() {
    let n = 4;
    let board = Board {
        grid: GridDims { width: n, height: n },
        elements: vec![
            element("g", "grid", json!(null)),
            element("b", "box", json!(null)),
            element("lk", "littleKiller", json!({"0,0,1,1": 10})),
        ],
    };

    assert!(cant_attempt(&board).is_none());

    let cancel = CancelToken::new();
    let mut solutions = Vec::new();
    solve(
        &board,
        SolveConfig { time_slice: Duration::from_millis(50), max_solutions: 1 },
        |event| {
            if let Some(solution) = event {
                solutions.push(solution);
            }
        },
        &cancel,
    )
    .unwrap();

    assert_eq!(solutions.len(), 1);
    let diag_sum: u32 = (0..n)
        .map(|i| *solutions[0].get(&(i * n + i)).unwrap() as u32)
        .sum();
    assert_eq!(diag_sum, 10);
}

/// Scenario 5: a non-square grid is rejected by the feasibility gate
/// with a human-readable message, before any encoding is attempted.
#[test]
fn non_square_grid_is_rejected_with_a_message() {
    let board = Board {
        grid: GridDims { width: 9, height: 8 },
        elements: vec![],
    };
    assert_eq!(cant_attempt(&board), Some("Grid is not square.".to_string()));

    let cancel = CancelToken::new();
    let result = solve(&board, SolveConfig::default(), |_| {}, &cancel);
    assert!(result.is_err());
}

/// Scenario 6: cancelling before the first solve call returns without
/// reporting any solution, and the underlying solver backend is always
/// released (here: the driver never blocks forever and returns promptly).
#[test]
fn cancellation_before_solving_reports_nothing_and_returns_promptly() {
    let board = empty_board(9);
    let cancel = CancelToken::new();
    cancel.cancel();

    let events = Arc::new(AtomicUsize::new(0));
    let events_clone = events.clone();
    let completed = solve(
        &board,
        SolveConfig::default(),
        move |_| {
            events_clone.fetch_add(1, Ordering::SeqCst);
        },
        &cancel,
    )
    .unwrap();

    assert!(!completed);
    assert_eq!(events.load(Ordering::SeqCst), 0);
}

/// A random full valid Latin-square assignment, fed back in as `givens`
/// for every cell, must yield exactly one solution: itself. Exercises
/// the grid-constraint encoder and model decoding on varied inputs
/// rather than one fixed fixture.
#[test]
fn any_random_full_valid_grid_as_givens_has_exactly_one_solution() {
    let n = 6;
    let mut rng = rand::rng();

    for _ in 0..5 {
        let mut row_perm: Vec<usize> = (0..n).collect();
        let mut col_perm: Vec<usize> = (0..n).collect();
        let mut digit_perm: Vec<u8> = (1..=n as u8).collect();
        row_perm.shuffle(&mut rng);
        col_perm.shuffle(&mut rng);
        digit_perm.shuffle(&mut rng);

        let mut givens = serde_json::Map::new();
        let mut expected = HashMap::new();
        for row in 0..n {
            for col in 0..n {
                let base = (row_perm[row] + col_perm[col]) % n;
                let digit = digit_perm[base];
                let cell = row * n + col;
                givens.insert(cell.to_string(), json!(digit));
                expected.insert(cell, digit);
            }
        }

        let board = Board {
            grid: GridDims { width: n, height: n },
            elements: vec![
                element("g", "grid", json!(null)),
                element("gv", "givens", serde_json::Value::Object(givens)),
            ],
        };

        let cancel = CancelToken::new();
        let mut solutions = Vec::new();
        let completed = solve(
            &board,
            SolveConfig { time_slice: Duration::from_millis(50), max_solutions: 2 },
            |event| {
                if let Some(solution) = event {
                    solutions.push(solution);
                }
            },
            &cancel,
        )
        .unwrap();

        assert!(completed);
        assert_eq!(solutions.len(), 1);
        assert_eq!(solutions[0], expected);
    }
}

/// The warning evaluator runs independently of the SAT path: a thermo
/// line violated by a partial fill is flagged without ever invoking the
/// solver.
#[test]
fn warning_evaluator_flags_a_violated_thermo_without_solving() {
    let board = Board {
        grid: GridDims { width: 9, height: 9 },
        elements: vec![element("t", "thermo", json!({"line1": [0, 1, 2]}))],
    };
    let mut digits = HashMap::new();
    digits.insert(0, 7);
    digits.insert(1, 3); // decrease: violates the thermometer
    let flagged = evaluate_warnings(&board, &digits);
    assert!(flagged.contains(0));
    assert!(flagged.contains(1));
}

fn all_distinct(digits: impl Iterator<Item = u8>) -> bool {
    let mut seen = HashSet::new();
    digits.into_iter().all(|d| seen.insert(d))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    /// Every digit-solved grid (for any box-factorable size) is a valid
    /// Latin square respecting its box partition: every row, column, and
    /// box holds each digit exactly once. This is the "every reported
    /// solution satisfies every encoded constraint" invariant, checked
    /// directly against the decoded digits rather than through the
    /// warning evaluator (which never looks at grid/box kinds at all).
    #[test]
    fn every_solved_grid_is_a_valid_latin_square_with_valid_boxes(
        n in prop_oneof![Just(4usize), Just(6usize), Just(9usize)],
    ) {
        let board = empty_board(n);
        let cancel = CancelToken::new();
        let mut solutions = Vec::new();
        let completed = solve(
            &board,
            SolveConfig { time_slice: Duration::from_millis(200), max_solutions: 1 },
            |event| {
                if let Some(solution) = event {
                    solutions.push(solution);
                }
            },
            &cancel,
        )
        .unwrap();
        prop_assert!(completed);
        prop_assert_eq!(solutions.len(), 1);
        let solution = &solutions[0];

        for row in 0..n {
            let cell = |col: usize| *solution.get(&(row * n + col)).unwrap();
            prop_assert!(all_distinct((0..n).map(cell)));
        }
        for col in 0..n {
            let cell = |row: usize| *solution.get(&(row * n + col)).unwrap();
            prop_assert!(all_distinct((0..n).map(cell)));
        }

        let (bw, bh) = box_dims(n).unwrap();
        let boxes_across = n / bw;
        for box_idx in 0..n {
            let box_row = box_idx / boxes_across;
            let box_col = box_idx % boxes_across;
            let cell = |pos: usize| {
                let row = box_row * bh + pos / bw;
                let col = box_col * bw + pos % bw;
                *solution.get(&(row * n + col)).unwrap()
            };
            prop_assert!(all_distinct((0..n).map(cell)));
        }
    }
}
