//! Nuclide leaves: named particles and element isotopes.
//!
//! Every nuclide carries the (mass, atomic) numbers the learner *wrote*. Those
//! written numbers drive equality and conservation sums; whether they match the
//! physically correct values is a separate [`Nuclide::is_physically_valid`] check.

use crate::periodic;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Particle species that may appear in a nuclear equation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Particle {
    Alpha,
    Beta,
    Gamma,
    Positron,
    Proton,
    Neutron,
}

impl Particle {
    pub const ALL: [Particle; 6] = [
        Particle::Alpha,
        Particle::Beta,
        Particle::Gamma,
        Particle::Positron,
        Particle::Proton,
        Particle::Neutron,
    ];

    pub const fn true_mass_number(self) -> i64 {
        match self {
            Particle::Alpha => 4,
            Particle::Beta | Particle::Gamma | Particle::Positron => 0,
            Particle::Proton | Particle::Neutron => 1,
        }
    }

    pub const fn true_atomic_number(self) -> i64 {
        match self {
            Particle::Alpha => 2,
            Particle::Beta => -1,
            Particle::Gamma | Particle::Neutron => 0,
            Particle::Positron | Particle::Proton => 1,
        }
    }

    /// Inherent electric charge, in units of the elementary charge.
    pub const fn charge(self) -> i64 {
        match self {
            Particle::Alpha => 2,
            Particle::Beta => -1,
            Particle::Gamma | Particle::Neutron => 0,
            Particle::Positron | Particle::Proton => 1,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Particle::Alpha => "Alpha particle",
            Particle::Beta => "Beta particle",
            Particle::Gamma => "Gamma ray",
            Particle::Positron => "Positron",
            Particle::Proton => "Proton",
            Particle::Neutron => "Neutron",
        }
    }

    /// Token used in canonical renderings, e.g. `\alphaparticle`.
    pub const fn token(self) -> &'static str {
        match self {
            Particle::Alpha => "\\alphaparticle",
            Particle::Beta => "\\betaparticle",
            Particle::Gamma => "\\gammaray",
            Particle::Positron => "\\positron",
            Particle::Proton => "\\proton",
            Particle::Neutron => "\\neutron",
        }
    }
}

/// A particle as written by the learner.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Nuclide {
    species: Particle,
    mass: i64,
    atomic: i64,
}

impl Nuclide {
    pub fn new(species: Particle, mass: i64, atomic: i64) -> Self {
        Self {
            species,
            mass,
            atomic,
        }
    }

    /// The particle written with its physically correct numbers.
    pub fn canonical(species: Particle) -> Self {
        Self::new(
            species,
            species.true_mass_number(),
            species.true_atomic_number(),
        )
    }

    pub fn species(&self) -> Particle {
        self.species
    }

    pub fn mass_number(&self) -> i64 {
        self.mass
    }

    pub fn atomic_number(&self) -> i64 {
        self.atomic
    }

    pub fn charge(&self) -> i64 {
        self.species.charge()
    }

    pub fn is_physically_valid(&self) -> bool {
        self.mass == self.species.true_mass_number()
            && self.atomic == self.species.true_atomic_number()
    }
}

impl fmt::Display for Nuclide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "^{{{}}}_{{{}}}{}",
            self.mass,
            self.atomic,
            self.species.token()
        )
    }
}

/// An element isotope such as carbon-14, written `^{14}_{6}C`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Isotope {
    symbol: String,
    mass: i64,
    atomic: i64,
}

impl Isotope {
    pub fn new(symbol: impl Into<String>, mass: i64, atomic: i64) -> Self {
        Self {
            symbol: symbol.into(),
            mass,
            atomic,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn mass_number(&self) -> i64 {
        self.mass
    }

    pub fn atomic_number(&self) -> i64 {
        self.atomic
    }

    /// Atomic number the periodic table assigns to the written symbol.
    pub fn true_atomic_number(&self) -> Option<u32> {
        periodic::atomic_number(&self.symbol)
    }

    /// Valid iff the written atomic number matches the element and the nucleus
    /// holds at least as many nucleons as protons.
    pub fn is_physically_valid(&self) -> bool {
        match self.true_atomic_number() {
            Some(z) => self.atomic == i64::from(z) && self.mass >= self.atomic,
            None => false,
        }
    }
}

impl fmt::Display for Isotope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "^{{{}}}_{{{}}}{}", self.mass, self.atomic, self.symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alpha_validity_depends_on_written_numbers() {
        assert!(Nuclide::new(Particle::Alpha, 4, 2).is_physically_valid());
        assert!(!Nuclide::new(Particle::Alpha, 3, 2).is_physically_valid());
    }

    #[test]
    fn canonical_particles_are_valid() {
        for species in Particle::ALL {
            assert!(Nuclide::canonical(species).is_physically_valid(), "{species:?}");
        }
    }

    #[test]
    fn equality_uses_written_numbers() {
        // Two identically mis-written particles still compare equal.
        assert_eq!(
            Nuclide::new(Particle::Beta, 1, -1),
            Nuclide::new(Particle::Beta, 1, -1)
        );
        assert_ne!(
            Nuclide::new(Particle::Beta, 0, -1),
            Nuclide::new(Particle::Positron, 0, -1)
        );
    }

    #[test]
    fn charges() {
        assert_eq!(Particle::Alpha.charge(), 2);
        assert_eq!(Particle::Beta.charge(), -1);
        assert_eq!(Particle::Gamma.charge(), 0);
        assert_eq!(Particle::Positron.charge(), 1);
        assert_eq!(Particle::Proton.charge(), 1);
    }

    #[test]
    fn isotope_validity() {
        assert!(Isotope::new("C", 14, 6).is_physically_valid());
        assert!(!Isotope::new("C", 14, 7).is_physically_valid());
        assert!(!Isotope::new("H", 0, 1).is_physically_valid());
        assert!(!Isotope::new("Zz", 3, 1).is_physically_valid());
    }

    #[test]
    fn rendering() {
        assert_eq!(
            Nuclide::canonical(Particle::Alpha).to_string(),
            "^{4}_{2}\\alphaparticle"
        );
        assert_eq!(Isotope::new("U", 238, 92).to_string(), "^{238}_{92}U");
    }
}
