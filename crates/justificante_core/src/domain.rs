//! crates/justificante_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any transport or serialization format.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// A student on the engineering roster.
///
/// Immutable reference data: the pipeline filters and selects students but
/// never mutates them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    /// Zero-padded numeric-like identifier, unique within the roster.
    pub id: String,
    /// "Last, First" format.
    pub name: String,
    pub career: String,
}

/// The absence metadata captured by the justificante form.
///
/// Invariants enforced on form submit: `start_date <= end_date` and
/// `start_hour < end_hour`. Read-only once passed downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JustificanteData {
    pub reason: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_hour: NaiveTime,
    pub end_hour: NaiveTime,
    pub description: String,
}

/// The per-student verdict of one eligibility run.
///
/// One per selected student per run; every run recomputes these wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    /// References `Student::id`.
    pub student_id: String,
    pub is_valid: bool,
    pub reason: String,
}

/// Everything needed for one send attempt.
///
/// Constructed fresh per attempt; never persisted, never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailPayload {
    pub recipient_email: String,
    pub cc_emails: Vec<String>,
    pub subject: String,
    pub additional_message: String,
    pub justificante: JustificanteData,
    pub students: Vec<Student>,
    pub timestamp: DateTime<Utc>,
}
