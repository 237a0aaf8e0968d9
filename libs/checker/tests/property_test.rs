//! Property-based tests using QuickCheck

use quickcheck::{QuickCheck, TestResult};
use stoich_checker::{
    Compound, Expression, Formula, Fraction, Ion, Outcome, Relation, State, Statement, Term,
};

mod test_support;
use test_support::*;

fn fraction(n: i32, d: i32) -> Option<Fraction> {
    Fraction::new(n as i64, d as i64).ok()
}

/// Property: scaling numerator and denominator by the same factor leaves the value unchanged
#[test]
fn prop_fraction_reduction_invariant() {
    fn prop(n: i32, d: i32, k: i16) -> TestResult {
        if d == 0 || k == 0 {
            return TestResult::discard();
        }
        let k = k as i64;
        let plain = Fraction::new(n as i64, d as i64).unwrap();
        let scaled = Fraction::new(n as i64 * k, d as i64 * k).unwrap();
        TestResult::from_bool(plain == scaled && plain.to_string() == scaled.to_string())
    }

    QuickCheck::new()
        .tests(200)
        .quickcheck(prop as fn(i32, i32, i16) -> TestResult);
}

/// Property: the stored denominator is always positive
#[test]
fn prop_fraction_denominator_positive() {
    fn prop(n: i32, d: i32) -> TestResult {
        match fraction(n, d) {
            Some(f) => {
                let rendered = f.to_string();
                let reparsed = rendered.parse::<Fraction>();
                TestResult::from_bool(!rendered.contains("/-") && reparsed == Ok(f))
            }
            None => TestResult::from_bool(d == 0),
        }
    }

    QuickCheck::new()
        .tests(200)
        .quickcheck(prop as fn(i32, i32) -> TestResult);
}

/// Property: addition is commutative and associative
#[test]
fn prop_fraction_addition_laws() {
    fn prop(a: (i32, i32), b: (i32, i32), c: (i32, i32)) -> TestResult {
        let (Some(a), Some(b), Some(c)) = (fraction(a.0, a.1), fraction(b.0, b.1), fraction(c.0, c.1))
        else {
            return TestResult::discard();
        };
        let commutative = a.add(&b) == b.add(&a);
        let associative = a.add(&b).add(&c) == a.add(&b.add(&c));
        TestResult::from_bool(commutative && associative)
    }

    QuickCheck::new()
        .tests(200)
        .quickcheck(prop as fn((i32, i32), (i32, i32), (i32, i32)) -> TestResult);
}

/// Property: multiplication is commutative and associative
#[test]
fn prop_fraction_multiplication_laws() {
    fn prop(a: (i32, i32), b: (i32, i32), c: (i32, i32)) -> TestResult {
        let (Some(a), Some(b), Some(c)) = (fraction(a.0, a.1), fraction(b.0, b.1), fraction(c.0, c.1))
        else {
            return TestResult::discard();
        };
        let commutative = a.multiply(&b) == b.multiply(&a);
        let associative = a.multiply(&b).multiply(&c) == a.multiply(&b.multiply(&c));
        TestResult::from_bool(commutative && associative)
    }

    QuickCheck::new()
        .tests(200)
        .quickcheck(prop as fn((i32, i32), (i32, i32), (i32, i32)) -> TestResult);
}

/// Property: compound atom counts scale with the multiplier and sum across groups
#[test]
fn prop_compound_accounting() {
    fn prop(h: u8, o: u8, k: u8) -> TestResult {
        if h == 0 || o == 0 || k == 0 {
            return TestResult::discard();
        }
        let groups = vec![el("H", h as u32), el("O", o as u32), el("H", 1)];
        let compound = Compound::new(groups).with_multiplier(k as u32).unwrap();
        let counts = compound.atom_count();
        let k = k as i64;
        TestResult::from_bool(
            counts.get("H") == Some(&Fraction::from_integer(k * (h as i64 + 1)))
                && counts.get("O") == Some(&Fraction::from_integer(k * o as i64))
                && counts.len() == 2,
        )
    }

    QuickCheck::new()
        .tests(100)
        .quickcheck(prop as fn(u8, u8, u8) -> TestResult);
}

/// Property: a statement compared with itself always passes
#[test]
fn prop_self_marking_passes() {
    fn prop(a: u8, b: u8, c: u8) -> TestResult {
        if a == 0 || b == 0 || c == 0 {
            return TestResult::discard();
        }
        let statement = combustion(a as i64, b as i64, c as i64);
        TestResult::from_bool(statement.check(&statement).outcome == Outcome::Pass)
    }

    QuickCheck::new()
        .tests(100)
        .quickcheck(prop as fn(u8, u8, u8) -> TestResult);
}

/// Distinct formulas used to build arbitrary statements, selected by bit mask.
fn formula_pool() -> Vec<Formula> {
    vec![
        el("H", 2),
        el("O", 2),
        water(),
        el("Na", 1),
        Ion::new(el("Cl", 1), -1).into(),
        Formula::isotope("C", 14, 6),
    ]
}

fn side(mask: u8, coefficients: &[u8], states: u8) -> Vec<Term> {
    formula_pool()
        .into_iter()
        .enumerate()
        .filter(|(i, _)| mask & (1 << i) != 0)
        .map(|(i, formula)| {
            let coefficient = coefficients.get(i).map_or(1, |&c| i64::from(c.max(1)));
            let term = term(coefficient, formula);
            match (states >> i) & 1 {
                1 => term.with_state(State::Gas),
                _ => term,
            }
        })
        .collect()
}

fn arbitrary_statement(
    reactants: u8,
    products: u8,
    coefficients: &[u8],
    states: u8,
    reversible: bool,
) -> Statement {
    let relation = if reversible {
        Relation::Reversible
    } else {
        Relation::OneWay
    };
    Statement::Chemical(Expression::new(
        side(reactants, coefficients, states),
        relation,
        side(products, coefficients, states.rotate_left(3)),
    ))
}

/// Property: weak equivalence is reflexive and symmetric, holds exactly when
/// each side uses the same formulas, and is implied by equality
#[test]
fn prop_weak_equivalence() {
    fn prop(
        (r1, p1): (u8, u8),
        (r2, p2): (u8, u8),
        coefficients: Vec<u8>,
        states: u8,
        reversible: bool,
    ) -> TestResult {
        const MASK: u8 = 0b11_1111;
        let (r1, p1, r2, p2) = (r1 & MASK, p1 & MASK, r2 & MASK, p2 & MASK);

        let first = arbitrary_statement(r1, p1, &coefficients, states, reversible);
        let second = arbitrary_statement(r2, p2, &[], 0, false);
        // Same formulas, but other coefficients, state tags and arrow.
        let restated = arbitrary_statement(r1, p1, &[3, 2, 5, 7, 2, 4], !states, !reversible);

        let reflexive = first.weakly_equivalent(&first) && second.weakly_equivalent(&second);
        let symmetric = first.weakly_equivalent(&second) == second.weakly_equivalent(&first)
            && first.weakly_equivalent(&restated) == restated.weakly_equivalent(&first);
        let by_formula_sets = first.weakly_equivalent(&second) == (r1 == r2 && p1 == p2);
        let ignores_details = first.weakly_equivalent(&restated);
        let implied_by_equality = (first != second || first.weakly_equivalent(&second))
            && (first != restated || first.weakly_equivalent(&restated));

        TestResult::from_bool(
            reflexive && symmetric && by_formula_sets && ignores_details && implied_by_equality,
        )
    }

    QuickCheck::new().tests(300).quickcheck(
        prop as fn((u8, u8), (u8, u8), Vec<u8>, u8, bool) -> TestResult,
    );
}

/// Property: statements of different kinds are never weakly equivalent
#[test]
fn prop_weak_equivalence_respects_kind() {
    fn prop(reactants: u8, products: u8) -> TestResult {
        let chemical =
            arbitrary_statement(reactants & 0b11_1111, products & 0b11_1111, &[], 0, false);
        let nuclear = Statement::Nuclear(chemical.expression().clone());
        TestResult::from_bool(
            !chemical.weakly_equivalent(&nuclear) && nuclear.weakly_equivalent(&nuclear),
        )
    }

    QuickCheck::new()
        .tests(100)
        .quickcheck(prop as fn(u8, u8) -> TestResult);
}

/// Property: a balanced reference never reports its own scaled copy as invalid
#[test]
fn prop_scaled_reference_is_wrong_coefficients() {
    fn prop(k: u8) -> TestResult {
        if k < 2 {
            return TestResult::discard();
        }
        let k = k as i64;
        let verdict = combustion(2, 1, 2).check(&combustion(2 * k, k, 2 * k));
        TestResult::from_bool(
            verdict.outcome == Outcome::WrongCoefficients && verdict.wrong_terms.len() == 3,
        )
    }

    QuickCheck::new()
        .tests(100)
        .quickcheck(prop as fn(u8) -> TestResult);
}
