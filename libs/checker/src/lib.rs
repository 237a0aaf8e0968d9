//! Automatic marking of chemical and nuclear equations.
//!
//! Given a learner's answer and a model answer, both already parsed into
//! [`Statement`] trees, the checker decides whether the answer is correct and,
//! if not, why.
//!
//! # Architecture Overview
//!
//! ```text
//! Fraction (exact arithmetic)
//!      |
//! Formula (element, compound, ion, electron, particle, isotope)
//!      |
//! Term -> Expression (reactants, relation, products)
//!      |
//! Statement (chemical | nuclear)
//!      |
//! Marker + MarkingPlan -> Verdict
//! ```
//!
//! Marking runs these stages in order; the first one that decides wins:
//! 1. wrong statement kind → [`Outcome::TypeMismatch`]
//! 2. parser-error nodes present → [`Outcome::ContainsParserError`]
//! 3. structurally equal → [`Outcome::Pass`]
//! 4. fails its kind's validity rules → [`Outcome::InvalidQuantities`]
//! 5. not weakly equivalent → [`Outcome::IrrelevantTerms`]
//! 6. otherwise → [`Outcome::WrongCoefficients`]

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod expression;
pub mod formula;
pub mod fraction;
pub mod marking;
pub mod nuclide;
pub mod periodic;
pub mod statement;
pub mod visualize;

// Re-export main types
pub use config::{ConfigError, DiagnosticsConfig, MarkingConfig, ValidityConfig};
pub use error::{Error, NuclideProperty, Quantity, Result};
pub use expression::{Expression, Relation, Side, State, Term, WrongTerm};
pub use formula::{AtomCount, Bracket, Compound, Element, ErrorNode, Formula, Ion};
pub use fraction::Fraction;
pub use marking::{Marker, MarkingPlan, Outcome, Stage, Verdict};
pub use nuclide::{Isotope, Nuclide, Particle};
pub use statement::{Statement, StatementKind};
pub use visualize::{GraphNode, ToGraph, VisualizationFormat, Visualize};
