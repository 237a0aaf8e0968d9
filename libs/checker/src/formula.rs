//! Chemical and nuclear formulas.
//!
//! [`Formula`] is a closed set of variants sharing one capability set: canonical
//! rendering (`Display`), atom accounting, charge, nuclide parameters and
//! structural equality.
//!
//! Equality rules:
//! - chemical forms (element, compound, ion) are equal iff their canonical
//!   renderings are identical, so `H2O` and `HOH` differ even though they hold
//!   the same atoms;
//! - particles and isotopes are equal iff species and *written* numbers match;
//! - electrons are all equal to each other.

use crate::error::{Error, NuclideProperty, Quantity, Result};
use crate::fraction::Fraction;
use crate::nuclide::{Isotope, Nuclide, Particle};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::num::NonZeroU32;
use std::sync::OnceLock;

/// Element symbol -> quantity. Iteration order is alphabetical by symbol.
pub type AtomCount = BTreeMap<String, Fraction>;

/// Adds `factor * source` into `target`, element-wise.
pub(crate) fn accumulate(target: &mut AtomCount, source: &AtomCount, factor: &Fraction) {
    for (element, quantity) in source {
        let scaled = quantity * factor;
        match target.get_mut(element) {
            Some(existing) => *existing = &*existing + &scaled,
            None => {
                target.insert(element.clone(), scaled);
            }
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Formula {
    Element(Element),
    Compound(Compound),
    Ion(Ion),
    /// A free electron in a chemical equation, `e^{-}`.
    Electron,
    Particle(Nuclide),
    Isotope(Isotope),
    /// A fragment the upstream parser could not resolve.
    Error(ErrorNode),
}

impl Formula {
    /// Fails if `count` is zero.
    pub fn element(symbol: impl Into<String>, count: u32) -> Result<Self> {
        Element::new(symbol, count).map(Formula::Element)
    }

    pub fn particle(species: Particle, mass: i64, atomic: i64) -> Self {
        Formula::Particle(Nuclide::new(species, mass, atomic))
    }

    pub fn isotope(symbol: impl Into<String>, mass: i64, atomic: i64) -> Self {
        Formula::Isotope(Isotope::new(symbol, mass, atomic))
    }

    pub fn error(fragment: impl Into<String>) -> Self {
        Formula::Error(ErrorNode {
            fragment: fragment.into(),
        })
    }

    /// Atoms contained in one unit of this formula.
    ///
    /// Compounds compute their count once and keep it for the instance's
    /// lifetime; every other variant builds it on demand.
    pub fn atom_count(&self) -> Cow<'_, AtomCount> {
        match self {
            Formula::Element(e) => Cow::Owned(e.atom_count()),
            Formula::Compound(c) => Cow::Borrowed(c.atom_count()),
            Formula::Ion(ion) => ion.molecule.atom_count(),
            Formula::Electron
            | Formula::Particle(_)
            | Formula::Isotope(_)
            | Formula::Error(_) => Cow::Owned(AtomCount::new()),
        }
    }

    pub fn charge(&self) -> Fraction {
        match self {
            Formula::Ion(ion) => Fraction::from_integer(ion.charge),
            Formula::Electron => Fraction::from_integer(-1),
            Formula::Particle(p) => Fraction::from_integer(p.charge()),
            Formula::Element(_) | Formula::Compound(_) | Formula::Isotope(_) | Formula::Error(_) => {
                Fraction::zero()
            }
        }
    }

    /// Written mass number. Only particles and isotopes define one.
    pub fn mass_number(&self) -> Result<i64> {
        match self {
            Formula::Particle(p) => Ok(p.mass_number()),
            Formula::Isotope(i) => Ok(i.mass_number()),
            _ => Err(self.undefined(NuclideProperty::MassNumber)),
        }
    }

    /// Written atomic number. Only particles and isotopes define one.
    pub fn atomic_number(&self) -> Result<i64> {
        match self {
            Formula::Particle(p) => Ok(p.atomic_number()),
            Formula::Isotope(i) => Ok(i.atomic_number()),
            _ => Err(self.undefined(NuclideProperty::AtomicNumber)),
        }
    }

    fn undefined(&self, property: NuclideProperty) -> Error {
        Error::PropertyUndefinedForFormula {
            property,
            formula: self.to_string(),
        }
    }

    pub fn is_nuclide(&self) -> bool {
        matches!(self, Formula::Particle(_) | Formula::Isotope(_))
    }

    /// Whether written nuclide numbers match the species. Formulas without
    /// nuclide parameters have nothing to get wrong and report `true`.
    pub fn is_physically_valid(&self) -> bool {
        match self {
            Formula::Particle(p) => p.is_physically_valid(),
            Formula::Isotope(i) => i.is_physically_valid(),
            _ => true,
        }
    }

    pub fn contains_error(&self) -> bool {
        match self {
            Formula::Error(_) => true,
            Formula::Compound(c) => c.groups.iter().any(Formula::contains_error),
            Formula::Ion(ion) => ion.molecule.contains_error(),
            _ => false,
        }
    }

    /// Node label used by graph renderings.
    pub fn type_name(&self) -> &'static str {
        match self {
            Formula::Element(_) => "Element",
            Formula::Compound(_) => "Compound",
            Formula::Ion(_) => "Ion",
            Formula::Electron => "Electron",
            Formula::Particle(p) => p.species().name(),
            Formula::Isotope(_) => "Isotope",
            Formula::Error(_) => "Error",
        }
    }

    /// Directly nested formulas, in rendering order.
    pub fn children(&self) -> Vec<&Formula> {
        match self {
            Formula::Compound(c) => c.groups.iter().collect(),
            Formula::Ion(ion) => vec![ion.molecule.as_ref()],
            _ => Vec::new(),
        }
    }

    fn identity(&self) -> Identity<'_> {
        match self {
            Formula::Element(_) | Formula::Compound(_) | Formula::Ion(_) => {
                Identity::Chemical(self.to_string())
            }
            Formula::Electron => Identity::Electron,
            Formula::Particle(p) => {
                Identity::Particle(p.species(), p.mass_number(), p.atomic_number())
            }
            Formula::Isotope(i) => {
                Identity::Isotope(i.symbol(), i.mass_number(), i.atomic_number())
            }
            Formula::Error(e) => Identity::Error(&e.fragment),
        }
    }
}

/// What two formulas must share to be structurally equal.
#[derive(PartialEq, Eq, Hash)]
enum Identity<'a> {
    Chemical(String),
    Electron,
    Particle(Particle, i64, i64),
    Isotope(&'a str, i64, i64),
    Error(&'a str),
}

impl PartialEq for Formula {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for Formula {}

impl Hash for Formula {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::Element(e) => fmt::Display::fmt(e, f),
            Formula::Compound(c) => fmt::Display::fmt(c, f),
            Formula::Ion(ion) => fmt::Display::fmt(ion, f),
            Formula::Electron => f.write_str("e^{-}"),
            Formula::Particle(p) => fmt::Display::fmt(p, f),
            Formula::Isotope(i) => fmt::Display::fmt(i, f),
            Formula::Error(e) => write!(f, "ERROR({})", e.fragment),
        }
    }
}

/// An element symbol with its subscript, e.g. `O2`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    symbol: String,
    #[serde(default = "one")]
    count: NonZeroU32,
}

fn one() -> NonZeroU32 {
    NonZeroU32::MIN
}

/// Subscripts and multipliers are at least 1.
fn non_zero(value: u32, quantity: Quantity) -> Result<NonZeroU32> {
    NonZeroU32::new(value).ok_or(Error::ZeroQuantity { quantity })
}

impl Element {
    pub fn new(symbol: impl Into<String>, count: u32) -> Result<Self> {
        Ok(Self {
            symbol: symbol.into(),
            count: non_zero(count, Quantity::Subscript)?,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn count(&self) -> u32 {
        self.count.get()
    }

    fn atom_count(&self) -> AtomCount {
        AtomCount::from([(self.symbol.clone(), Fraction::from(self.count.get()))])
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbol)?;
        if self.count.get() > 1 {
            write!(f, "{}", self.count)?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bracket {
    Round,
    Square,
}

impl Bracket {
    fn delimiters(self) -> (char, char) {
        match self {
            Bracket::Round => ('(', ')'),
            Bracket::Square => ('[', ']'),
        }
    }
}

/// A group of sub-molecules repeated `multiplier` times, e.g. `(HCO3)2`.
///
/// The upstream parser guarantees `groups` is non-empty. Brackets only affect
/// rendering.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Compound {
    groups: Vec<Formula>,
    #[serde(default = "one")]
    multiplier: NonZeroU32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bracket: Option<Bracket>,
    #[serde(skip)]
    atom_cache: OnceLock<AtomCount>,
}

impl Compound {
    pub fn new(groups: Vec<Formula>) -> Self {
        Self {
            groups,
            multiplier: NonZeroU32::MIN,
            bracket: None,
            atom_cache: OnceLock::new(),
        }
    }

    /// Fails if `multiplier` is zero.
    pub fn with_multiplier(mut self, multiplier: u32) -> Result<Self> {
        self.multiplier = non_zero(multiplier, Quantity::Multiplier)?;
        self.atom_cache = OnceLock::new();
        Ok(self)
    }

    pub fn with_bracket(mut self, bracket: Bracket) -> Self {
        self.bracket = Some(bracket);
        self
    }

    pub fn groups(&self) -> &[Formula] {
        &self.groups
    }

    pub fn multiplier(&self) -> u32 {
        self.multiplier.get()
    }

    pub fn bracket(&self) -> Option<Bracket> {
        self.bracket
    }

    /// Sum over groups of `multiplier * count(group)`. Computed on first call.
    pub fn atom_count(&self) -> &AtomCount {
        self.atom_cache.get_or_init(|| {
            let factor = Fraction::from(self.multiplier.get());
            let mut counts = AtomCount::new();
            for group in &self.groups {
                accumulate(&mut counts, &group.atom_count(), &factor);
            }
            counts
        })
    }
}

impl From<Compound> for Formula {
    fn from(compound: Compound) -> Self {
        Formula::Compound(compound)
    }
}

impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let delimiters = self.bracket.map(Bracket::delimiters);
        if let Some((open, _)) = delimiters {
            write!(f, "{}", open)?;
        }
        for group in &self.groups {
            write!(f, "{}", group)?;
        }
        if let Some((_, close)) = delimiters {
            write!(f, "{}", close)?;
        }
        if self.multiplier.get() > 1 {
            write!(f, "{}", self.multiplier)?;
        }
        Ok(())
    }
}

/// A charged molecule, e.g. `SO4^{2-}`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Ion {
    molecule: Box<Formula>,
    charge: i64,
}

impl Ion {
    pub fn new(molecule: Formula, charge: i64) -> Self {
        Self {
            molecule: Box::new(molecule),
            charge,
        }
    }

    pub fn molecule(&self) -> &Formula {
        &self.molecule
    }

    pub fn charge(&self) -> i64 {
        self.charge
    }
}

impl From<Ion> for Formula {
    fn from(ion: Ion) -> Self {
        Formula::Ion(ion)
    }
}

impl fmt::Display for Ion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.molecule)?;
        let sign = if self.charge < 0 { '-' } else { '+' };
        match self.charge.unsigned_abs() {
            0 => Ok(()),
            1 => write!(f, "^{{{}}}", sign),
            n => write!(f, "^{{{}{}}}", n, sign),
        }
    }
}

/// Explicit parser-error node carrying the text it failed to resolve.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorNode {
    pub fragment: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frac(n: i64) -> Fraction {
        Fraction::from_integer(n)
    }

    fn el(symbol: &str, count: u32) -> Formula {
        Formula::element(symbol, count).unwrap()
    }

    fn hydroxide() -> Compound {
        Compound::new(vec![el("O", 1), el("H", 1)])
    }

    #[test]
    fn element_counts_its_subscript() {
        let o2 = el("O", 2);
        assert_eq!(o2.atom_count().get("O"), Some(&frac(2)));
        assert_eq!(o2.charge(), Fraction::zero());
        assert_eq!(o2.to_string(), "O2");
    }

    #[test]
    fn compound_multiplies_and_sums() {
        // Ca(OH)2
        let calcium_hydroxide = Compound::new(vec![
            el("Ca", 1),
            hydroxide().with_bracket(Bracket::Round).with_multiplier(2).unwrap().into(),
        ]);
        let counts = calcium_hydroxide.atom_count();
        assert_eq!(counts.get("Ca"), Some(&frac(1)));
        assert_eq!(counts.get("O"), Some(&frac(2)));
        assert_eq!(counts.get("H"), Some(&frac(2)));
        assert_eq!(calcium_hydroxide.to_string(), "Ca(OH)2");
    }

    #[test]
    fn repeated_elements_are_grouped() {
        // CH3COOH
        let acetic = Compound::new(vec![
            el("C", 1),
            el("H", 3),
            el("C", 1),
            el("O", 1),
            el("O", 1),
            el("H", 1),
        ]);
        let counts = acetic.atom_count();
        assert_eq!(counts.len(), 3);
        assert_eq!(counts["C"], frac(2));
        assert_eq!(counts["H"], frac(4));
        assert_eq!(counts["O"], frac(2));
    }

    #[test]
    fn atom_count_is_cached_per_instance() {
        let a = hydroxide().with_multiplier(3).unwrap();
        let b = hydroxide();
        let first: *const AtomCount = a.atom_count();
        let second: *const AtomCount = a.atom_count();
        assert_eq!(first, second);
        assert_eq!(a.atom_count()["O"], frac(3));
        assert_eq!(b.atom_count()["O"], frac(1));
    }

    #[test]
    fn square_brackets_render() {
        let complex = Compound::new(vec![el("Fe", 1)])
            .with_bracket(Bracket::Square)
            .with_multiplier(2)
            .unwrap();
        assert_eq!(complex.to_string(), "[Fe]2");
    }

    #[test]
    fn equality_by_rendering() {
        let a: Formula = hydroxide().into();
        let b: Formula = hydroxide().into();
        assert_eq!(a, b);
        assert_eq!(b, a);
        assert_ne!(a, el("O", 1));
        let bracketed: Formula = hydroxide().with_bracket(Bracket::Round).into();
        assert_ne!(a, bracketed);
    }

    #[test]
    fn ion_equality_is_reflexive_and_symmetric() {
        let a: Formula = Ion::new(el("Fe", 1), 3).into();
        let b: Formula = Ion::new(el("Fe", 1), 3).into();
        assert_eq!(a, a);
        assert_eq!(a, b);
        assert_eq!(b, a);
        let ferrous: Formula = Ion::new(el("Fe", 1), 2).into();
        assert_ne!(a, ferrous);
        assert_ne!(ferrous, a);
        assert_ne!(a, el("Fe", 1));
    }

    #[test]
    fn isotope_equality_is_reflexive_and_symmetric() {
        let a = Formula::isotope("C", 14, 6);
        let b = Formula::isotope("C", 14, 6);
        assert_eq!(a, a);
        assert_eq!(a, b);
        assert_eq!(b, a);
        for other in [
            Formula::isotope("C", 12, 6),
            Formula::isotope("C", 14, 7),
            Formula::isotope("N", 14, 6),
        ] {
            assert_ne!(a, other);
            assert_ne!(other, a);
        }
    }

    #[test]
    fn error_equality_is_reflexive_and_symmetric() {
        let a = Formula::error("0_2");
        let b = Formula::error("0_2");
        assert_eq!(a, a);
        assert_eq!(a, b);
        assert_eq!(b, a);
        assert_ne!(a, Formula::error("Q"));
        assert_ne!(Formula::error("Q"), a);
    }

    #[test]
    fn equal_formulas_hash_alike() {
        use std::collections::HashSet;

        let set: HashSet<Formula> = [
            Ion::new(el("Fe", 1), 3).into(),
            Ion::new(el("Fe", 1), 3).into(),
            Formula::isotope("C", 14, 6),
            Formula::isotope("C", 14, 6),
            Formula::error("??"),
            Formula::error("??"),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn ion_charge_and_rendering() {
        let sulfate = Ion::new(
            Compound::new(vec![el("S", 1), el("O", 4)]).into(),
            -2,
        );
        let proton = Ion::new(el("H", 1), 1);
        assert_eq!(sulfate.to_string(), "SO4^{2-}");
        assert_eq!(proton.to_string(), "H^{+}");
        let formula: Formula = sulfate.into();
        assert_eq!(formula.charge(), frac(-2));
        assert_eq!(formula.atom_count()["O"], frac(4));
    }

    #[test]
    fn electron_has_no_atoms_or_nuclide_numbers() {
        let e = Formula::Electron;
        assert!(e.atom_count().is_empty());
        assert_eq!(e.charge(), frac(-1));
        assert_eq!(e, Formula::Electron);
        assert!(matches!(
            e.mass_number(),
            Err(Error::PropertyUndefinedForFormula {
                property: NuclideProperty::MassNumber,
                ..
            })
        ));
        assert!(e.atomic_number().is_err());
    }

    #[test]
    fn compound_has_no_mass_number() {
        let water: Formula =
            Compound::new(vec![el("H", 2), el("O", 1)]).into();
        assert_eq!(
            water.mass_number(),
            Err(Error::PropertyUndefinedForFormula {
                property: NuclideProperty::MassNumber,
                formula: "H2O".into(),
            })
        );
    }

    #[test]
    fn nuclides_report_written_numbers() {
        let alpha = Formula::particle(Particle::Alpha, 3, 2);
        assert_eq!(alpha.mass_number(), Ok(3));
        assert_eq!(alpha.atomic_number(), Ok(2));
        assert_eq!(alpha.charge(), frac(2));
        assert!(alpha.atom_count().is_empty());
        assert!(!alpha.is_physically_valid());
    }

    #[test]
    fn error_nodes_are_found_anywhere() {
        let nested: Formula = Compound::new(vec![
            el("Na", 1),
            Formula::error("%%"),
        ])
        .into();
        assert!(nested.contains_error());
        assert!(Formula::Ion(Ion::new(nested, 1)).contains_error());
        assert!(!el("Na", 1).contains_error());
    }

    #[test]
    fn deserialized_compounds_recompute_counts() {
        let json = r#"{
            "kind": "compound",
            "groups": [
                {"kind": "element", "symbol": "N"},
                {"kind": "element", "symbol": "H", "count": 3}
            ]
        }"#;
        let ammonia: Formula = serde_json::from_str(json).unwrap();
        assert_eq!(ammonia.to_string(), "NH3");
        assert_eq!(ammonia.atom_count()["H"], frac(3));
    }

    #[test]
    fn zero_subscripts_and_multipliers_are_rejected() {
        assert_eq!(
            Formula::element("H", 0),
            Err(Error::ZeroQuantity {
                quantity: Quantity::Subscript
            })
        );
        assert!(matches!(
            hydroxide().with_multiplier(0),
            Err(Error::ZeroQuantity {
                quantity: Quantity::Multiplier
            })
        ));
    }

    #[test]
    fn zero_quantities_do_not_deserialize() {
        let zero_count = r#"{"kind": "element", "symbol": "H", "count": 0}"#;
        assert!(serde_json::from_str::<Formula>(zero_count).is_err());

        let zero_multiplier = r#"{
            "kind": "compound",
            "groups": [{"kind": "element", "symbol": "O"}, {"kind": "element", "symbol": "H"}],
            "multiplier": 0
        }"#;
        assert!(serde_json::from_str::<Formula>(zero_multiplier).is_err());
    }
}
