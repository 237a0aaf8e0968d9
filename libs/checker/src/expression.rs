//! Terms and two-sided reaction expressions.
//!
//! Accounting over an expression is always coefficient-weighted: a side's atom
//! count is the element-wise sum of `coefficient * atoms(formula)` over its
//! terms, and likewise for charge, mass number and atomic number.

use crate::error::Result;
use crate::formula::{accumulate, AtomCount, Formula};
use crate::fraction::Fraction;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Physical state annotation. Display only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum State {
    Solid,
    Liquid,
    Gas,
    Aqueous,
    Metal,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            State::Solid => "(s)",
            State::Liquid => "(l)",
            State::Gas => "(g)",
            State::Aqueous => "(aq)",
            State::Metal => "(m)",
        };
        f.write_str(symbol)
    }
}

/// A formula with a positive coefficient, e.g. `2H2O (l)`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Term {
    #[serde(default = "Fraction::one")]
    coefficient: Fraction,
    formula: Formula,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    state: Option<State>,
}

impl Term {
    pub fn new(coefficient: Fraction, formula: Formula) -> Self {
        Self {
            coefficient,
            formula,
            state: None,
        }
    }

    pub fn with_state(mut self, state: State) -> Self {
        self.state = Some(state);
        self
    }

    pub fn coefficient(&self) -> &Fraction {
        &self.coefficient
    }

    pub fn formula(&self) -> &Formula {
        &self.formula
    }

    pub fn state(&self) -> Option<State> {
        self.state
    }

    pub fn atom_count(&self) -> AtomCount {
        let mut counts = AtomCount::new();
        accumulate(&mut counts, &self.formula.atom_count(), &self.coefficient);
        counts
    }

    pub fn charge(&self) -> Fraction {
        self.formula.charge().multiply(&self.coefficient)
    }

    pub fn mass_number(&self) -> Result<Fraction> {
        let mass = self.formula.mass_number()?;
        Ok(self.coefficient.scale(mass))
    }

    pub fn atomic_number(&self) -> Result<Fraction> {
        let atomic = self.formula.atomic_number()?;
        Ok(self.coefficient.scale(atomic))
    }
}

/// Coefficient and formula must match; the state tag is ignored.
impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        self.coefficient == other.coefficient && self.formula == other.formula
    }
}

impl Eq for Term {}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.coefficient.is_one() {
            if self.coefficient.is_integer() {
                write!(f, "{}", self.coefficient)?;
            } else {
                write!(f, "{} ", self.coefficient)?;
            }
        }
        write!(f, "{}", self.formula)?;
        if let Some(state) = self.state {
            write!(f, " {}", state)?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    OneWay,
    Reversible,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relation::OneWay => f.write_str("->"),
            Relation::Reversible => f.write_str("<=>"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Reactants,
    Products,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Reactants, Side::Products];
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Reactants => f.write_str("reactants"),
            Side::Products => f.write_str("products"),
        }
    }
}

/// One entry of a term-level diff between a reference and a candidate.
///
/// `expected` is the reference's total coefficient for `formula` on `side`,
/// `actual` the candidate's. `None` means the formula is absent from that
/// expression's side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrongTerm {
    pub side: Side,
    pub formula: Formula,
    pub expected: Option<Fraction>,
    pub actual: Option<Fraction>,
}

impl WrongTerm {
    pub fn is_missing(&self) -> bool {
        self.actual.is_none()
    }

    pub fn is_extra(&self) -> bool {
        self.expected.is_none()
    }
}

impl fmt::Display for WrongTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.expected, &self.actual) {
            (Some(expected), Some(actual)) => write!(
                f,
                "{} ({}): expected coefficient {}, found {}",
                self.formula, self.side, expected, actual
            ),
            (Some(_), None) => write!(f, "{} ({}): missing", self.formula, self.side),
            (None, Some(_)) => write!(f, "{} ({}): unexpected", self.formula, self.side),
            (None, None) => write!(f, "{} ({})", self.formula, self.side),
        }
    }
}

/// Reactants and products joined by a relation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Expression {
    reactants: Vec<Term>,
    relation: Relation,
    products: Vec<Term>,
}

impl Expression {
    pub fn new(reactants: Vec<Term>, relation: Relation, products: Vec<Term>) -> Self {
        Self {
            reactants,
            relation,
            products,
        }
    }

    pub fn reactants(&self) -> &[Term] {
        &self.reactants
    }

    pub fn products(&self) -> &[Term] {
        &self.products
    }

    pub fn relation(&self) -> Relation {
        self.relation
    }

    pub fn side(&self, side: Side) -> &[Term] {
        match side {
            Side::Reactants => &self.reactants,
            Side::Products => &self.products,
        }
    }

    /// Every term, reactants first.
    pub fn terms(&self) -> impl Iterator<Item = (Side, &Term)> {
        self.reactants
            .iter()
            .map(|t| (Side::Reactants, t))
            .chain(self.products.iter().map(|t| (Side::Products, t)))
    }

    pub fn contains_error(&self) -> bool {
        self.terms().any(|(_, t)| t.formula.contains_error())
    }

    pub fn atom_count(&self, side: Side) -> AtomCount {
        let mut counts = AtomCount::new();
        for term in self.side(side) {
            accumulate(&mut counts, &term.formula.atom_count(), &term.coefficient);
        }
        counts
    }

    pub fn charge(&self, side: Side) -> Fraction {
        self.side(side).iter().map(Term::charge).sum()
    }

    /// Coefficient-weighted sum of written mass numbers on one side.
    ///
    /// Fails if any term's formula has no mass number.
    pub fn mass_number(&self, side: Side) -> Result<Fraction> {
        self.side(side).iter().map(Term::mass_number).sum()
    }

    /// Coefficient-weighted sum of written atomic numbers on one side.
    pub fn atomic_number(&self, side: Side) -> Result<Fraction> {
        self.side(side).iter().map(Term::atomic_number).sum()
    }

    pub fn is_atom_balanced(&self) -> bool {
        self.atom_count(Side::Reactants) == self.atom_count(Side::Products)
    }

    pub fn is_charge_balanced(&self) -> bool {
        self.charge(Side::Reactants) == self.charge(Side::Products)
    }

    /// Whether mass and atomic numbers conserve across the relation.
    pub fn is_nucleon_conserved(&self) -> Result<bool> {
        Ok(
            self.mass_number(Side::Reactants)? == self.mass_number(Side::Products)?
                && self.atomic_number(Side::Reactants)? == self.atomic_number(Side::Products)?,
        )
    }

    /// Whether every nuclide's written numbers match its species.
    pub fn nuclides_physically_valid(&self) -> bool {
        self.terms().all(|(_, t)| t.formula.is_physically_valid())
    }

    /// Nuclear validity: every nuclide physically valid and nucleons conserved.
    /// Any formula without nuclide numbers makes the expression invalid.
    pub fn is_valid_nuclear(&self) -> bool {
        self.nuclides_physically_valid() && self.is_nucleon_conserved().unwrap_or(false)
    }

    /// Same set of distinct formulas on each side, ignoring coefficients,
    /// state tags and the relation.
    pub fn weakly_equivalent(&self, other: &Expression) -> bool {
        Side::BOTH
            .iter()
            .all(|&side| formula_set(self.side(side)) == formula_set(other.side(side)))
    }

    /// Term-level diff of `candidate` against `self` as the reference.
    ///
    /// Terms are paired by formula identity within a side, with repeated
    /// formulas on one side summed first. Shared formulas whose totals differ
    /// are always reported; formulas present on only one side are reported
    /// when `include_unmatched` is set.
    pub fn wrong_terms(&self, candidate: &Expression, include_unmatched: bool) -> Vec<WrongTerm> {
        let mut wrong = Vec::new();
        for side in Side::BOTH {
            let expected = Totals::of(self.side(side));
            let actual = Totals::of(candidate.side(side));

            for (formula, expected_coefficient) in expected.iter() {
                match actual.get(formula) {
                    Some(actual_coefficient) if actual_coefficient == expected_coefficient => {}
                    Some(actual_coefficient) => wrong.push(WrongTerm {
                        side,
                        formula: (*formula).clone(),
                        expected: Some(expected_coefficient.clone()),
                        actual: Some(actual_coefficient.clone()),
                    }),
                    None if include_unmatched => wrong.push(WrongTerm {
                        side,
                        formula: (*formula).clone(),
                        expected: Some(expected_coefficient.clone()),
                        actual: None,
                    }),
                    None => {}
                }
            }

            if include_unmatched {
                for (formula, actual_coefficient) in actual.iter() {
                    if expected.get(formula).is_none() {
                        wrong.push(WrongTerm {
                            side,
                            formula: (*formula).clone(),
                            expected: None,
                            actual: Some(actual_coefficient.clone()),
                        });
                    }
                }
            }
        }
        wrong
    }
}

fn formula_set(terms: &[Term]) -> HashSet<&Formula> {
    terms.iter().map(Term::formula).collect()
}

/// Total coefficient per distinct formula on one side, in order of first
/// appearance, with a hash index for pairing.
struct Totals<'a> {
    entries: Vec<(&'a Formula, Fraction)>,
    index: HashMap<&'a Formula, usize>,
}

impl<'a> Totals<'a> {
    fn of(terms: &'a [Term]) -> Self {
        let mut totals = Totals {
            entries: Vec::with_capacity(terms.len()),
            index: HashMap::with_capacity(terms.len()),
        };
        for term in terms {
            match totals.index.get(term.formula()) {
                Some(&i) => {
                    let total = &mut totals.entries[i].1;
                    *total = &*total + term.coefficient();
                }
                None => {
                    totals.index.insert(term.formula(), totals.entries.len());
                    totals
                        .entries
                        .push((term.formula(), term.coefficient().clone()));
                }
            }
        }
        totals
    }

    fn get(&self, formula: &Formula) -> Option<&Fraction> {
        self.index.get(formula).map(|&i| &self.entries[i].1)
    }

    fn iter(&self) -> impl Iterator<Item = &(&'a Formula, Fraction)> {
        self.entries.iter()
    }
}

fn term_multiset(terms: &[Term]) -> HashMap<(&Formula, &Fraction), usize> {
    let mut counts = HashMap::new();
    for term in terms {
        *counts.entry((term.formula(), term.coefficient())).or_insert(0) += 1;
    }
    counts
}

/// Structural equality: same relation, and each side holds the same multiset
/// of (coefficient, formula) terms. Term order and state tags are ignored.
impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        self.relation == other.relation
            && Side::BOTH.iter().all(|&side| {
                term_multiset(self.side(side)) == term_multiset(other.side(side))
            })
    }
}

impl Eq for Expression {}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_side(f, &self.reactants)?;
        write!(f, " {} ", self.relation)?;
        write_side(f, &self.products)
    }
}

fn write_side(f: &mut fmt::Formatter<'_>, terms: &[Term]) -> fmt::Result {
    for (i, term) in terms.iter().enumerate() {
        if i > 0 {
            f.write_str(" + ")?;
        }
        write!(f, "{}", term)?;
    }
    Ok(())
}
