//! The SAT solver adapter boundary (spec §6.1): a narrow trait the
//! driver talks to, plus the `varisat`-backed production implementation.
//!
//! `varisat::Solver::solve()` has no native preemption or timeout; per
//! spec §9's design note ("running the solver on a dedicated worker
//! with bounded slice durations... is the portable requirement"),
//! [`VarisatBackend`] runs the actual solver on a dedicated worker
//! thread it owns exclusively. `solve_within` sends a single `Solve`
//! command the first time it's asked, then polls the response channel
//! with a timeout on every subsequent call — returning `Undef` (without
//! re-issuing `Solve`) until the one in-flight solve answers. This gives
//! the driver genuine time-sliced, cooperatively-cancellable polling
//! without requiring `varisat` itself to support cancellation.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use varisat::{ExtendFormula, Lit, Solver};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveOutcome {
    Sat,
    Unsat,
    Undef,
}

/// The narrow interface the solver driver needs from a SAT backend.
/// Mirrors spec §6.1's `new`/`declareVars`/`addClause`/`setMaxTime`/
/// `solve`/`getModel`/`free` exactly, except `free` is implicit: Rust
/// drops the backend (and whatever it owns) on every exit path once it
/// goes out of scope, satisfying spec §4.5 step 5's "release must run
/// on every exit path" without a separate call.
pub trait SatBackend {
    fn declare_vars(&mut self, n: usize);
    fn add_clause(&mut self, lits: &[i64]);
    /// Runs (or continues running) the current solve, returning within
    /// roughly `budget` if no verdict is reached yet. `Err` carries a
    /// genuine solver-adapter failure (spec §7 error kind 6) — distinct
    /// from `Ok(SolveOutcome::Unsat)`, which means the solver ran to
    /// completion and found no model.
    fn solve_within(&mut self, budget: Duration) -> Result<SolveOutcome, String>;
    /// The last model, indexed by `var - 1`. Only meaningful right after
    /// `solve_within` returned `Ok(Sat)`.
    fn model(&mut self) -> Vec<bool>;
}

enum Command {
    DeclareVars(usize),
    AddClause(Vec<i64>),
    Solve,
    Model,
    Shutdown,
}

enum Response {
    Solved(SolveOutcome),
    SolveFailed(String),
    Model(Vec<bool>),
}

pub struct VarisatBackend {
    cmd_tx: Sender<Command>,
    resp_rx: Receiver<Response>,
    worker: Option<JoinHandle<()>>,
    solve_in_flight: bool,
}

impl VarisatBackend {
    pub fn new() -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
        let (resp_tx, resp_rx) = mpsc::channel::<Response>();
        let worker = std::thread::spawn(move || Self::run_actor(cmd_rx, resp_tx));
        Self {
            cmd_tx,
            resp_rx,
            worker: Some(worker),
            solve_in_flight: false,
        }
    }

    fn run_actor(cmd_rx: Receiver<Command>, resp_tx: Sender<Response>) {
        let mut solver: Solver = Solver::new();
        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                Command::DeclareVars(n) => {
                    for _ in 0..n {
                        solver.new_var();
                    }
                }
                Command::AddClause(lits) => {
                    let translated: Vec<Lit> =
                        lits.iter().map(|&l| Lit::from_dimacs(l as isize)).collect();
                    solver.add_clause(&translated);
                }
                Command::Solve => {
                    let response = match solver.solve() {
                        Ok(true) => Response::Solved(SolveOutcome::Sat),
                        Ok(false) => Response::Solved(SolveOutcome::Unsat),
                        Err(e) => Response::SolveFailed(e.to_string()),
                    };
                    if resp_tx.send(response).is_err() {
                        break;
                    }
                }
                Command::Model => {
                    let model = solver.model().unwrap_or_default();
                    let mut bits = vec![false; model.len()];
                    for l in &model {
                        let idx = (l.var().to_dimacs() as usize).saturating_sub(1);
                        if idx < bits.len() {
                            bits[idx] = l.is_positive();
                        }
                    }
                    if resp_tx.send(Response::Model(bits)).is_err() {
                        break;
                    }
                }
                Command::Shutdown => break,
            }
        }
    }
}

impl Default for VarisatBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SatBackend for VarisatBackend {
    fn declare_vars(&mut self, n: usize) {
        let _ = self.cmd_tx.send(Command::DeclareVars(n));
    }

    fn add_clause(&mut self, lits: &[i64]) {
        let _ = self.cmd_tx.send(Command::AddClause(lits.to_vec()));
    }

    fn solve_within(&mut self, budget: Duration) -> Result<SolveOutcome, String> {
        if !self.solve_in_flight {
            if self.cmd_tx.send(Command::Solve).is_err() {
                return Err("solver worker thread is gone".to_string());
            }
            self.solve_in_flight = true;
        }
        match self.resp_rx.recv_timeout(budget) {
            Ok(Response::Solved(outcome)) => {
                self.solve_in_flight = false;
                Ok(outcome)
            }
            Ok(Response::SolveFailed(msg)) => {
                self.solve_in_flight = false;
                Err(msg)
            }
            Ok(Response::Model(_)) => {
                self.solve_in_flight = false;
                Err("solver worker sent a model before a solve verdict".to_string())
            }
            Err(RecvTimeoutError::Timeout) => Ok(SolveOutcome::Undef),
            Err(RecvTimeoutError::Disconnected) => {
                self.solve_in_flight = false;
                Err("solver worker thread disconnected unexpectedly".to_string())
            }
        }
    }

    fn model(&mut self) -> Vec<bool> {
        if self.cmd_tx.send(Command::Model).is_err() {
            return Vec::new();
        }
        match self.resp_rx.recv() {
            Ok(Response::Model(bits)) => bits,
            _ => Vec::new(),
        }
    }
}

impl Drop for VarisatBackend {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(Command::Shutdown);
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}
