//! crates/justificante_core/src/eligibility.rs
//!
//! The eligibility checker: given the selected students and the current
//! justificante data, produces a per-student pass/fail verdict and the subset
//! that passed. Attendance-history lookups go through the [`AbsenceRecords`]
//! port; everything else is evaluated locally.

use chrono::{DateTime, Utc};

use crate::domain::{JustificanteData, Student, ValidationResult};
use crate::ports::{AbsenceRecords, PortError};

/// Reason string reported for students that pass every predicate.
pub const ELIGIBLE_REASON: &str = "Estudiante elegible para justificante";

/// The checker's lifecycle. Re-enterable: `Resolved -> Validating` on a
/// re-run, with the new outcome overwriting the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckerState {
    #[default]
    Idle,
    Validating,
    Resolved,
}

/// Why a validation run refused to start or failed midway.
#[derive(Debug, thiserror::Error)]
pub enum CheckerError {
    #[error("No hay estudiantes seleccionados")]
    EmptySelection,
    #[error("Falta el motivo del justificante")]
    MissingReason,
    #[error(transparent)]
    Port(#[from] PortError),
}

/// The full result of one validation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    /// One verdict per input student, in input order.
    pub results: Vec<ValidationResult>,
    /// The students whose verdict was valid, in the same relative order as
    /// the input selection.
    pub eligible: Vec<Student>,
}

/// Evaluates a fixed, ordered set of disqualifying predicates per student and
/// reports the first one that fails. The order is a tie-break rule: a student
/// flagged for several problems gets the highest-priority reason only.
#[derive(Debug, Default)]
pub struct EligibilityChecker {
    state: CheckerState,
    outcome: Option<ValidationOutcome>,
}

impl EligibilityChecker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CheckerState {
        self.state
    }

    pub fn outcome(&self) -> Option<&ValidationOutcome> {
        self.outcome.as_ref()
    }

    /// Runs the predicates for every selected student, in order:
    ///
    /// 1. excessive prior absences
    /// 2. a pending unresolved justification
    /// 3. start or end date strictly in the future relative to `now`
    /// 4. `start_date > end_date`
    /// 5. `start_hour >= end_hour`
    ///
    /// Refuses to run (no state change, no lookups) when the selection is
    /// empty or the reason is blank.
    pub async fn run(
        &mut self,
        records: &dyn AbsenceRecords,
        selected: &[Student],
        data: &JustificanteData,
        now: DateTime<Utc>,
    ) -> Result<&ValidationOutcome, CheckerError> {
        if selected.is_empty() {
            return Err(CheckerError::EmptySelection);
        }
        if data.reason.trim().is_empty() {
            return Err(CheckerError::MissingReason);
        }

        self.state = CheckerState::Validating;
        let today = now.date_naive();

        let mut results = Vec::with_capacity(selected.len());
        let mut eligible = Vec::new();

        for student in selected {
            let verdict = match self.disqualify(records, student, data, today).await {
                Ok(verdict) => verdict,
                Err(e) => {
                    // A failed lookup aborts the whole run; partial results
                    // are discarded.
                    self.state = CheckerState::Idle;
                    self.outcome = None;
                    return Err(e.into());
                }
            };

            let (is_valid, reason) = match verdict {
                Some(reason) => (false, reason),
                None => (true, ELIGIBLE_REASON.to_string()),
            };
            if is_valid {
                eligible.push(student.clone());
            }
            results.push(ValidationResult {
                student_id: student.id.clone(),
                is_valid,
                reason,
            });
        }

        self.state = CheckerState::Resolved;
        Ok(self.outcome.insert(ValidationOutcome { results, eligible }))
    }

    /// Returns the first failing predicate's reason, or `None` when the
    /// student is eligible.
    async fn disqualify(
        &self,
        records: &dyn AbsenceRecords,
        student: &Student,
        data: &JustificanteData,
        today: chrono::NaiveDate,
    ) -> Result<Option<String>, PortError> {
        if records.has_excessive_absences(&student.id).await? {
            return Ok(Some("Exceso de ausencias previas".to_string()));
        }
        if records.has_pending_justification(&student.id).await? {
            return Ok(Some("Justificante pendiente de resolver".to_string()));
        }
        if data.start_date > today || data.end_date > today {
            return Ok(Some("Fecha de ausencia inválida (futura)".to_string()));
        }
        if data.start_date > data.end_date {
            return Ok(Some("Rango de fechas inválido".to_string()));
        }
        if data.start_hour >= data.end_hour {
            return Ok(Some("Rango de horas inválido".to_string()));
        }
        Ok(None)
    }
}
