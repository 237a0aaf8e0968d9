#![allow(dead_code)]

use stoich_checker::{
    Compound, Expression, Formula, Fraction, Particle, Relation, Statement, Term,
};

pub fn el(symbol: &str, count: u32) -> Formula {
    Formula::element(symbol, count).unwrap()
}

/// A bracket-less compound of elements, e.g. `compound(&[("H", 2), ("O", 1)])`.
pub fn compound(parts: &[(&str, u32)]) -> Formula {
    Compound::new(parts.iter().map(|&(s, n)| el(s, n)).collect()).into()
}

pub fn term(coefficient: i64, formula: Formula) -> Term {
    Term::new(Fraction::from_integer(coefficient), formula)
}

pub fn chemical(reactants: Vec<Term>, products: Vec<Term>) -> Statement {
    Statement::Chemical(Expression::new(reactants, Relation::OneWay, products))
}

pub fn nuclear(reactants: Vec<Term>, products: Vec<Term>) -> Statement {
    Statement::Nuclear(Expression::new(reactants, Relation::OneWay, products))
}

pub fn water() -> Formula {
    compound(&[("H", 2), ("O", 1)])
}

/// `aH2 + bO2 -> cH2O`
pub fn combustion(a: i64, b: i64, c: i64) -> Statement {
    chemical(
        vec![term(a, el("H", 2)), term(b, el("O", 2))],
        vec![term(c, water())],
    )
}

/// Carbon-14 beta decay with the beta particle written as (mass, atomic).
pub fn carbon_decay(beta_mass: i64, beta_atomic: i64) -> Statement {
    nuclear(
        vec![term(1, Formula::isotope("C", 14, 6))],
        vec![
            term(1, Formula::isotope("N", 14, 7)),
            term(1, Formula::particle(Particle::Beta, beta_mass, beta_atomic)),
        ],
    )
}
