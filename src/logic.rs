use std::ops::Index;

use itertools::Itertools;
use varisat::Lit;

pub(crate) fn at_most_one(vars: &[Lit]) -> Vec<Vec<Lit>> {
    // no two are true; (!A + !B) * (!A + !C) * ...
    vars.iter()
        .combinations(2)
        .map(|pair| vec![!**pair.index(0), !**pair.index(1)])
        .collect_vec()
}

pub(crate) fn exactly_one(vars: Vec<Lit>) -> Vec<Vec<Lit>> {
    let mut clauses = Vec::with_capacity(vars.len() * (vars.len() + 1) / 2 + 1);

    clauses.extend(at_most_one(&vars));
    // at least one var is true; A + B + C + ...
    clauses.push(vars);

    clauses
}

/// `antecedents` together imply at least one of `consequents`.
/// (A * B) => (C + D) = !A + !B + C + D
pub(crate) fn implies_any(antecedents: &[Lit], consequents: &[Lit]) -> Vec<Lit> {
    antecedents.iter()
        .map(|lit| !*lit)
        .chain(consequents.iter().copied())
        .collect_vec()
}

/// Clauses for `x <=> (A * B * ...)`.
pub(crate) fn equals_all(x: Lit, vars: &[Lit]) -> Vec<Vec<Lit>> {
    // x => A, x => B, ...
    let mut clauses = vars.iter().map(|var| vec![!x, *var]).collect_vec();
    // A * B * ... => x
    clauses.push(implies_any(vars, &[x]));
    clauses
}

/// Clauses for `x <=> (A + B + ...)`.
pub(crate) fn equals_any(x: Lit, vars: &[Lit]) -> Vec<Vec<Lit>> {
    // A => x, B => x, ...
    let mut clauses = vars.iter().map(|var| vec![!*var, x]).collect_vec();
    // x => A + B + ...
    clauses.push(implies_any(&[x], vars));
    clauses
}
