//! Top-level parsed answers.

use crate::expression::{Expression, WrongTerm};
use crate::marking::{Marker, Verdict};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A complete answer. The variant decides which validity rules apply.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "expression", rename_all = "snake_case")]
pub enum Statement {
    /// Ordinary chemical equation: atoms and charge must balance.
    Chemical(Expression),
    /// Nuclear equation: nuclides must be physically valid and nucleons conserved.
    Nuclear(Expression),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    Chemical,
    Nuclear,
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatementKind::Chemical => f.write_str("chemical"),
            StatementKind::Nuclear => f.write_str("nuclear"),
        }
    }
}

impl Statement {
    pub fn kind(&self) -> StatementKind {
        match self {
            Statement::Chemical(_) => StatementKind::Chemical,
            Statement::Nuclear(_) => StatementKind::Nuclear,
        }
    }

    pub fn expression(&self) -> &Expression {
        match self {
            Statement::Chemical(e) | Statement::Nuclear(e) => e,
        }
    }

    pub fn contains_error(&self) -> bool {
        self.expression().contains_error()
    }

    /// Validity under the default rules: atoms and charge balanced for chemical
    /// statements, nuclide numbers correct and conserved for nuclear ones.
    pub fn is_valid(&self) -> bool {
        match self {
            Statement::Chemical(e) => e.is_atom_balanced() && e.is_charge_balanced(),
            Statement::Nuclear(e) => e.is_valid_nuclear(),
        }
    }

    /// Weak equivalence of the expressions; statements of different kinds are
    /// never weakly equivalent.
    pub fn weakly_equivalent(&self, other: &Statement) -> bool {
        self.kind() == other.kind() && self.expression().weakly_equivalent(other.expression())
    }

    /// Terms of `candidate` whose coefficients differ from this reference.
    ///
    /// With `include_unmatched`, formulas present on only one side of the pair
    /// are listed too, as the default [`Marker`] does.
    pub fn wrong_terms(&self, candidate: &Statement, include_unmatched: bool) -> Vec<WrongTerm> {
        self.expression()
            .wrong_terms(candidate.expression(), include_unmatched)
    }

    /// Marks `candidate` against this statement as the reference answer, using
    /// the default marking rules.
    pub fn check(&self, candidate: &Statement) -> Verdict {
        Marker::default().mark(self, candidate)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expression())
    }
}
