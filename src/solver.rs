use std::collections::HashMap;
use std::ops::Not;
use std::sync::mpsc;
use std::sync::mpsc::RecvTimeoutError;
use std::thread;
use std::time::Duration;

use itertools::Itertools;
use thiserror::Error;
use tracing::{debug, trace, warn};
use varisat::{CnfFormula, Lit, Solver, Var};

use crate::logic::{at_most_one, equals_all, equals_any, exactly_one};

/// Reasons a [`SatSolver`] check may fail outright, as opposed to finding no solution.
#[derive(Debug, Error)]
pub enum SolverFailure {
    /// The worker thread running the check could not be started.
    #[error("could not start the satisfiability worker: {0}")]
    Spawn(#[from] std::io::Error),
    /// The worker thread stopped without reporting a result.
    #[error("the satisfiability worker stopped without reporting")]
    WorkerLost,
    /// The SAT backend itself reported an error.
    #[error("SAT backend failed: {0}")]
    Backend(String),
}

/// The result of a bounded satisfiability check.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SolveOutcome {
    Sat,
    Unsat,
    /// The check ran out of time. Says nothing about satisfiability.
    Unknown,
}

/// A literal, or a truth value known while building constraints.
///
/// Constants let integer bounds outside a variable's domain drop out of clauses instead of allocating variables for them.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Term {
    Const(bool),
    Lit(Lit),
}

impl From<Lit> for Term {
    fn from(value: Lit) -> Self {
        Self::Lit(value)
    }
}

impl From<bool> for Term {
    fn from(value: bool) -> Self {
        Self::Const(value)
    }
}

impl Not for Term {
    type Output = Term;

    fn not(self) -> Self::Output {
        match self {
            Term::Const(value) => Term::Const(!value),
            Term::Lit(lit) => Term::Lit(!lit),
        }
    }
}

/// A bounded integer, order encoded: one literal per value `k` in `lo + 1..=hi` stating `value >= k`.
#[derive(Clone, Debug)]
pub struct IntVar {
    id: usize,
    lo: i64,
    hi: i64,
    at_least: Vec<Lit>,
}

impl IntVar {
    /// `self >= k`
    pub fn at_least(&self, k: i64) -> Term {
        if k <= self.lo {
            Term::Const(true)
        } else if k > self.hi {
            Term::Const(false)
        } else {
            Term::Lit(self.at_least[(k - self.lo - 1) as usize])
        }
    }

    /// `self <= k`
    pub fn at_most(&self, k: i64) -> Term {
        !self.at_least(k + 1)
    }
}

/// A satisfying assignment, indexed by variable.
#[derive(Clone, Debug)]
pub struct Model {
    values: Vec<bool>,
}

impl Model {
    fn from_lits(var_count: usize, lits: Vec<Lit>) -> Self {
        let mut values = vec![false; var_count];
        for lit in lits {
            if let Some(slot) = values.get_mut(lit.var().index()) {
                *slot = lit.is_positive();
            }
        }
        Self { values }
    }

    pub fn lit(&self, lit: Lit) -> bool {
        self.values.get(lit.var().index()).copied().unwrap_or(false) == lit.is_positive()
    }

    pub fn term(&self, term: Term) -> bool {
        match term {
            Term::Const(value) => value,
            Term::Lit(lit) => self.lit(lit),
        }
    }

    pub fn int(&self, var: &IntVar) -> i64 {
        var.lo + var.at_least.iter().filter(|lit| self.lit(**lit)).count() as i64
    }
}

enum Verdict {
    Found(Vec<Lit>),
    Refuted,
    Failed(String),
}

/// The constraint store handed to every constrainer and genre, backed by [`varisat`].
///
/// Clauses only accumulate; nothing is ever retracted. Variables from [`Self::alloc_bool`] are *primary*: they make up the
/// visible answer and are the only ones [`Self::block_current_model`] excludes. Everything else, integer bits and
/// definitions included, is auxiliary bookkeeping whose values may differ between equivalent answers.
pub struct SatSolver {
    var_count: usize,
    names: HashMap<Var, String>,
    primary: Vec<Var>,
    clauses: Vec<Vec<Lit>>,
    // an empty clause was asserted
    inconsistent: bool,
    int_count: usize,
    equals_cache: HashMap<(usize, i64), Term>,
    model: Option<Model>,
    // workers abandoned on timeout, still searching
    stale: Vec<thread::JoinHandle<()>>,
}

impl Default for SatSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SatSolver {
    pub fn new() -> Self {
        Self {
            var_count: 0,
            names: Default::default(),
            primary: Default::default(),
            clauses: Default::default(),
            inconsistent: false,
            int_count: 0,
            equals_cache: Default::default(),
            model: None,
            stale: Vec::new(),
        }
    }

    pub fn var_count(&self) -> usize {
        self.var_count
    }

    pub fn clause_count(&self) -> usize {
        self.clauses.len()
    }

    /// Workers from timed out checks that are still searching. Each holds a copy of the clauses and a CPU until it ends.
    pub fn stale_workers(&mut self) -> usize {
        self.stale.retain(|worker| !worker.is_finished());
        self.stale.len()
    }

    /// The name given to a primary variable.
    pub fn name_of(&self, var: Var) -> Option<&str> {
        self.names.get(&var).map(String::as_str)
    }

    /// Allocate a named primary boolean.
    pub fn alloc_bool(&mut self, name: &str) -> Var {
        let var = self.alloc_aux();
        self.names.insert(var, name.to_owned());
        self.primary.push(var);
        var
    }

    /// Allocate an anonymous auxiliary boolean.
    pub fn alloc_aux(&mut self) -> Var {
        let var = Var::from_index(self.var_count);
        self.var_count += 1;
        var
    }

    /// Allocate an integer ranging over `lo..=hi`.
    pub fn alloc_int(&mut self, name: &str, lo: i64, hi: i64) -> IntVar {
        let hi = hi.max(lo);
        let at_least = (lo + 1..=hi).map(|_| self.alloc_aux().positive()).collect_vec();
        // value >= k + 1 implies value >= k
        for (higher, lower) in at_least.iter().skip(1).zip(at_least.iter()) {
            self.clauses.push(vec![!*higher, *lower]);
        }

        let id = self.int_count;
        self.int_count += 1;
        trace!(name, lo, hi, "allocated integer");
        IntVar { id, lo, hi, at_least }
    }

    /// Assert a disjunction. Constant `true` terms satisfy the clause outright, constant `false` terms drop out.
    pub fn add_clause(&mut self, terms: impl IntoIterator<Item = Term>) {
        let mut clause = Vec::new();
        for term in terms {
            match term {
                Term::Const(true) => return,
                Term::Const(false) => {}
                Term::Lit(lit) => clause.push(lit),
            }
        }

        if clause.is_empty() {
            self.inconsistent = true;
        } else {
            self.clauses.push(clause);
        }
    }

    /// Assert a formula in conjunctive normal form.
    pub fn add_formula(&mut self, clauses: Vec<Vec<Lit>>) {
        for clause in clauses {
            self.add_clause(clause.into_iter().map(Term::Lit));
        }
    }

    /// Assert a single term.
    pub fn require(&mut self, term: impl Into<Term>) {
        self.add_clause([term.into()]);
    }

    /// All of `guards` together imply `consequent`.
    pub fn implies(&mut self, guards: &[Term], consequent: Term) {
        self.add_clause(guards.iter().map(|guard| !*guard).chain([consequent]));
    }

    pub fn require_at_most_one(&mut self, lits: &[Lit]) {
        self.add_formula(at_most_one(lits));
    }

    pub fn require_exactly_one(&mut self, lits: Vec<Lit>) {
        self.add_formula(exactly_one(lits));
    }

    /// A term equivalent to the conjunction of `terms`.
    pub fn define_and(&mut self, terms: &[Term]) -> Term {
        let mut lits = Vec::with_capacity(terms.len());
        for term in terms {
            match term {
                Term::Const(false) => return Term::Const(false),
                Term::Const(true) => {}
                Term::Lit(lit) => lits.push(*lit),
            }
        }

        match lits.len() {
            0 => Term::Const(true),
            1 => Term::Lit(lits[0]),
            _ => {
                let x = self.alloc_aux().positive();
                self.add_formula(equals_all(x, &lits));
                Term::Lit(x)
            }
        }
    }

    /// A term equivalent to the disjunction of `terms`.
    pub fn define_or(&mut self, terms: &[Term]) -> Term {
        let mut lits = Vec::with_capacity(terms.len());
        for term in terms {
            match term {
                Term::Const(true) => return Term::Const(true),
                Term::Const(false) => {}
                Term::Lit(lit) => lits.push(*lit),
            }
        }

        match lits.len() {
            0 => Term::Const(false),
            1 => Term::Lit(lits[0]),
            _ => {
                let x = self.alloc_aux().positive();
                self.add_formula(equals_any(x, &lits));
                Term::Lit(x)
            }
        }
    }

    /// A term equivalent to `var == k`. Repeated requests share one definition.
    pub fn int_equals(&mut self, var: &IntVar, k: i64) -> Term {
        if let Some(term) = self.equals_cache.get(&(var.id, k)) {
            return *term;
        }

        let term = self.define_and(&[var.at_least(k), !var.at_least(k + 1)]);
        self.equals_cache.insert((var.id, k), term);
        term
    }

    /// `guards` imply `var == k`.
    pub fn require_int_constant(&mut self, guards: &[Term], var: &IntVar, k: i64) {
        self.implies(guards, var.at_least(k));
        self.implies(guards, !var.at_least(k + 1));
    }

    /// `guards` imply `var != k`.
    pub fn forbid_int_constant(&mut self, guards: &[Term], var: &IntVar, k: i64) {
        // var >= k => var >= k + 1
        let mut clause = guards.iter().map(|guard| !*guard).collect_vec();
        clause.push(!var.at_least(k));
        clause.push(var.at_least(k + 1));
        self.add_clause(clause);
    }

    /// `guards` imply `a == b + offset`.
    pub fn require_int_offset(&mut self, guards: &[Term], a: &IntVar, b: &IntVar, offset: i64) {
        // b >= k <=> a >= k + offset, for every k where either side is not already constant
        for k in (a.lo - offset).min(b.lo) - 1..=(a.hi - offset).max(b.hi) + 1 {
            let (lhs, rhs) = (b.at_least(k), a.at_least(k + offset));
            self.implies(&guards.iter().copied().chain([lhs]).collect_vec(), rhs);
            self.implies(&guards.iter().copied().chain([rhs]).collect_vec(), lhs);
        }
    }

    /// `guards` imply `a == b`.
    pub fn require_int_equal(&mut self, guards: &[Term], a: &IntVar, b: &IntVar) {
        self.require_int_offset(guards, a, b, 0);
    }

    /// `guards` imply `a > b`.
    pub fn require_int_greater(&mut self, guards: &[Term], a: &IntVar, b: &IntVar) {
        // b >= k => a >= k + 1
        for k in (a.lo - 1).min(b.lo) - 1..=(a.hi - 1).max(b.hi) + 1 {
            let lhs = b.at_least(k);
            self.implies(&guards.iter().copied().chain([lhs]).collect_vec(), a.at_least(k + 1));
        }
    }

    /// Exactly `count` of `terms` hold.
    ///
    /// Uses a sequential counter: after each term, one definition per threshold `j` states "at least `j` so far".
    pub fn require_count(&mut self, terms: &[Term], count: usize) {
        let fixed = terms.iter().filter(|term| **term == Term::Const(true)).count();
        let open = terms.iter()
            .filter(|term| matches!(term, Term::Lit(_)))
            .copied()
            .collect_vec();
        if fixed > count || count - fixed > open.len() {
            self.inconsistent = true;
            return;
        }

        let needed = count - fixed;
        // so_far[j] <=> at least j of the terms seen so far hold, for j in 0..=needed + 1
        let mut so_far = (0..=needed + 1).map(|j| Term::Const(j == 0)).collect_vec();
        for term in open {
            let mut next = Vec::with_capacity(so_far.len());
            next.push(Term::Const(true));
            for j in 1..=needed + 1 {
                let carried = self.define_and(&[so_far[j - 1], term]);
                next.push(self.define_or(&[so_far[j], carried]));
            }
            so_far = next;
        }

        self.require(so_far[needed]);
        self.require(!so_far[needed + 1]);
    }

    /// Check satisfiability of everything asserted so far, giving up after `timeout`.
    ///
    /// The backend has no interruption hook, so the check runs on a worker thread over a snapshot of the clauses. On
    /// timeout the worker is abandoned and finishes on its own; its result is discarded. See [`Self::stale_workers`].
    pub fn solve(&mut self, timeout: Duration) -> Result<SolveOutcome, SolverFailure> {
        self.model = None;
        if self.inconsistent {
            debug!("constraint set contains an empty clause");
            return Ok(SolveOutcome::Unsat);
        }

        debug!(vars = self.var_count, clauses = self.clauses.len(), ?timeout, "checking satisfiability");

        let stale = self.stale_workers();
        if stale > 0 {
            debug!(stale, "earlier timed out checks are still running");
        }

        let snapshot = self.clauses.clone();
        let (tx, rx) = mpsc::channel();
        let worker = thread::Builder::new()
            .name("griddy-sat".to_owned())
            .spawn(move || {
                let mut solver = Solver::new();
                solver.add_formula(&CnfFormula::from(snapshot));
                let verdict = match solver.solve() {
                    Ok(true) => Verdict::Found(solver.model().unwrap_or_default()),
                    Ok(false) => Verdict::Refuted,
                    Err(err) => Verdict::Failed(format!("{:?}", err)),
                };
                if tx.send(verdict).is_err() {
                    debug!("timed out satisfiability check finished");
                }
            })?;

        match rx.recv_timeout(timeout) {
            Ok(Verdict::Found(lits)) => {
                self.model = Some(Model::from_lits(self.var_count, lits));
                Ok(SolveOutcome::Sat)
            }
            Ok(Verdict::Refuted) => Ok(SolveOutcome::Unsat),
            Ok(Verdict::Failed(reason)) => Err(SolverFailure::Backend(reason)),
            Err(RecvTimeoutError::Timeout) => {
                warn!(?timeout, "satisfiability check timed out");
                self.stale.push(worker);
                Ok(SolveOutcome::Unknown)
            }
            Err(RecvTimeoutError::Disconnected) => Err(SolverFailure::WorkerLost),
        }
    }

    /// The assignment found by the last [`Self::solve`].
    ///
    /// # Panics
    /// If the last check did not return [`SolveOutcome::Sat`].
    pub fn model(&self) -> &Model {
        self.model.as_ref().expect("model() requires a preceding satisfiable check")
    }

    /// Exclude the current model's assignment to the primary variables, so that the next check finds a different answer or
    /// none.
    ///
    /// # Panics
    /// If the last check did not return [`SolveOutcome::Sat`].
    pub fn block_current_model(&mut self) {
        let model = self.model();
        let clause = self.primary.iter()
            .map(|var| {
                let lit = var.positive();
                Term::Lit(if model.lit(lit) { !lit } else { lit })
            })
            .collect_vec();
        self.add_clause(clause);
    }
}
