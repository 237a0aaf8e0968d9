//! Staged marking of a candidate answer against a reference answer.
//!
//! A [`MarkingPlan`] lists the stages in severity order; the first stage that
//! reaches a decision produces the [`Verdict`]. Marking is a pure function of
//! the two statements and never fails: every problem with the candidate is an
//! [`Outcome`], not an error.

use crate::config::{ConfigError, DiagnosticsConfig, MarkingConfig, ValidityConfig};
use crate::expression::{Expression, WrongTerm};
use crate::statement::Statement;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Compiled marking plan - ordered list of stages to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkingPlan {
    pub stages: Vec<Stage>,
    pub diagnostics: DiagnosticsPlan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    /// Candidate must be the same statement kind as the reference.
    Kind,
    /// Candidate must not contain parser-error nodes.
    ParserErrors,
    /// Structural equality with the reference passes immediately.
    Exact,
    /// Candidate must satisfy its kind's validity rules.
    Validity(ValidityPlan),
    /// Candidate must use the same distinct formulas on each side.
    Relevance,
    /// Whatever is left is a coefficient problem.
    Coefficients,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Kind => "kind",
            Stage::ParserErrors => "parser_errors",
            Stage::Exact => "exact",
            Stage::Validity(_) => "validity",
            Stage::Relevance => "relevance",
            Stage::Coefficients => "coefficients",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidityPlan {
    pub charge_balance: bool,
    pub nuclide_parameters: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticsPlan {
    pub report_unmatched_terms: bool,
    pub max_wrong_terms: Option<usize>,
}

impl MarkingPlan {
    /// The standard stage sequence with the given stage settings.
    pub fn standard(validity: ValidityPlan, diagnostics: DiagnosticsPlan) -> Self {
        Self {
            stages: vec![
                Stage::Kind,
                Stage::ParserErrors,
                Stage::Exact,
                Stage::Validity(validity),
                Stage::Relevance,
                Stage::Coefficients,
            ],
            diagnostics,
        }
    }
}

impl Default for MarkingPlan {
    fn default() -> Self {
        Self::standard(
            ValidityPlan::from(&ValidityConfig::default()),
            DiagnosticsPlan::from(&DiagnosticsConfig::default()),
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Pass,
    TypeMismatch,
    ContainsParserError,
    InvalidQuantities,
    IrrelevantTerms,
    WrongCoefficients,
}

impl Outcome {
    /// Default learner-facing feedback for this outcome.
    pub fn message(self) -> &'static str {
        match self {
            Outcome::Pass => "Correct.",
            Outcome::TypeMismatch => "This is not the kind of equation the question asks for.",
            Outcome::ContainsParserError => {
                "Part of your answer could not be understood. Please check it and resubmit."
            }
            Outcome::InvalidQuantities => {
                "The quantities in your equation are invalid or do not balance."
            }
            Outcome::IrrelevantTerms => "Your equation is missing terms or contains unrelated ones.",
            Outcome::WrongCoefficients => "Some terms have incorrect coefficients.",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Outcome::Pass => "pass",
            Outcome::TypeMismatch => "type_mismatch",
            Outcome::ContainsParserError => "contains_parser_error",
            Outcome::InvalidQuantities => "invalid_quantities",
            Outcome::IrrelevantTerms => "irrelevant_terms",
            Outcome::WrongCoefficients => "wrong_coefficients",
        };
        f.write_str(name)
    }
}

/// Result of marking one candidate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub outcome: Outcome,
    pub wrong_terms: Vec<WrongTerm>,
}

impl Verdict {
    pub fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            wrong_terms: Vec::new(),
        }
    }

    pub fn with_terms(outcome: Outcome, wrong_terms: Vec<WrongTerm>) -> Self {
        Self {
            outcome,
            wrong_terms,
        }
    }

    pub fn is_pass(&self) -> bool {
        self.outcome == Outcome::Pass
    }

    pub fn message(&self) -> &'static str {
        self.outcome.message()
    }
}

/// Reusable marker - owns a compiled plan
#[derive(Debug, Clone, Default)]
pub struct Marker {
    plan: MarkingPlan,
}

impl Marker {
    pub fn new(plan: MarkingPlan) -> Self {
        Self { plan }
    }

    pub fn from_config(config: &MarkingConfig) -> Result<Self, ConfigError> {
        let plan = config.compile()?;
        Ok(Self::new(plan))
    }

    /// Marks `candidate` against `reference`.
    pub fn mark(&self, reference: &Statement, candidate: &Statement) -> Verdict {
        let _span = tracing::debug_span!("mark", kind = %reference.kind()).entered();
        MarkingRun::new(&self.plan, reference, candidate).execute()
    }

    pub fn mark_batch(&self, reference: &Statement, candidates: &[Statement]) -> Vec<Verdict> {
        candidates
            .iter()
            .map(|candidate| self.mark(reference, candidate))
            .collect()
    }

    pub fn plan(&self) -> &MarkingPlan {
        &self.plan
    }
}

/// Short-lived marking execution
struct MarkingRun<'a> {
    plan: &'a MarkingPlan,
    reference: &'a Statement,
    candidate: &'a Statement,
}

impl<'a> MarkingRun<'a> {
    fn new(plan: &'a MarkingPlan, reference: &'a Statement, candidate: &'a Statement) -> Self {
        Self {
            plan,
            reference,
            candidate,
        }
    }

    fn execute(self) -> Verdict {
        for stage in &self.plan.stages {
            if let Some(verdict) = self.execute_stage(stage) {
                tracing::debug!(
                    stage = stage.name(),
                    outcome = %verdict.outcome,
                    wrong_terms = verdict.wrong_terms.len(),
                    "verdict decided"
                );
                return verdict;
            }
        }

        // Plans built by hand may omit the final stage.
        self.coefficients()
    }

    fn execute_stage(&self, stage: &Stage) -> Option<Verdict> {
        match stage {
            Stage::Kind => (self.reference.kind() != self.candidate.kind())
                .then(|| Verdict::new(Outcome::TypeMismatch)),
            Stage::ParserErrors => self
                .candidate
                .contains_error()
                .then(|| Verdict::new(Outcome::ContainsParserError)),
            Stage::Exact => {
                (self.reference == self.candidate).then(|| Verdict::new(Outcome::Pass))
            }
            Stage::Validity(plan) => {
                (!self.candidate_is_valid(plan)).then(|| Verdict::new(Outcome::InvalidQuantities))
            }
            Stage::Relevance => (!self.reference.weakly_equivalent(self.candidate))
                .then(|| Verdict::with_terms(Outcome::IrrelevantTerms, self.diff())),
            Stage::Coefficients => Some(self.coefficients()),
        }
    }

    fn coefficients(&self) -> Verdict {
        Verdict::with_terms(Outcome::WrongCoefficients, self.diff())
    }

    fn candidate_is_valid(&self, plan: &ValidityPlan) -> bool {
        match self.candidate {
            Statement::Chemical(expr) => chemical_is_valid(expr, plan),
            Statement::Nuclear(expr) => nuclear_is_valid(expr, plan),
        }
    }

    fn diff(&self) -> Vec<WrongTerm> {
        let mut terms = self.reference.expression().wrong_terms(
            self.candidate.expression(),
            self.plan.diagnostics.report_unmatched_terms,
        );
        if let Some(max) = self.plan.diagnostics.max_wrong_terms {
            terms.truncate(max);
        }
        terms
    }
}

fn chemical_is_valid(expr: &Expression, plan: &ValidityPlan) -> bool {
    if !expr.is_atom_balanced() {
        tracing::trace!("atoms do not balance");
        return false;
    }
    if plan.charge_balance && !expr.is_charge_balanced() {
        tracing::trace!("charge does not balance");
        return false;
    }
    true
}

fn nuclear_is_valid(expr: &Expression, plan: &ValidityPlan) -> bool {
    if plan.nuclide_parameters && !expr.nuclides_physically_valid() {
        tracing::trace!("nuclide written with incorrect mass or atomic number");
        return false;
    }
    match expr.is_nucleon_conserved() {
        Ok(conserved) => {
            if !conserved {
                tracing::trace!("mass or atomic number not conserved");
            }
            conserved
        }
        Err(err) => {
            tracing::trace!(error = %err, "nuclear statement holds a non-nuclide formula");
            false
        }
    }
}
