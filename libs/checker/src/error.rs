//! Error types for the checker

use std::fmt;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Contract violations raised while building or querying an equation tree.
///
/// Marking outcomes are never reported through this type; see [`crate::Verdict`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("{property} is undefined for formula '{formula}'")]
    PropertyUndefinedForFormula {
        property: NuclideProperty,
        formula: String,
    },

    #[error("invalid fraction: {numerator}/0 has a zero denominator")]
    InvalidFraction { numerator: i64 },

    #[error("invalid fraction literal '{0}'")]
    InvalidFractionLiteral(String),

    #[error("{quantity} must be at least 1")]
    ZeroQuantity { quantity: Quantity },
}

/// Nuclide parameters that only particles and isotopes define.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NuclideProperty {
    MassNumber,
    AtomicNumber,
}

impl fmt::Display for NuclideProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NuclideProperty::MassNumber => f.write_str("mass number"),
            NuclideProperty::AtomicNumber => f.write_str("atomic number"),
        }
    }
}

/// Integer quantities inside a formula that must be positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantity {
    Subscript,
    Multiplier,
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Subscript => f.write_str("element subscript"),
            Quantity::Multiplier => f.write_str("compound multiplier"),
        }
    }
}
