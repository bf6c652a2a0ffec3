//! crates/justificante_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the
//! core to be independent of specific external implementations like a document
//! store or an SMTP relay.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::Student;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services
/// (e.g., database, mail relay, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Rejected by the remote service: {0}")]
    Rejected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Repository Ports (Traits)
//=========================================================================================

/// Read/create access to the student roster.
///
/// The current implementations are in-memory stubs; this trait is the seam
/// where a durable document store attaches later without changing callers.
#[async_trait]
pub trait StudentRepository: Send + Sync {
    async fn list_all(&self) -> PortResult<Vec<Student>>;

    /// Accepts an arbitrary student-like record and acknowledges it.
    /// Returns a human-readable acknowledgement message.
    async fn create(&self, record: Value) -> PortResult<String>;
}

/// Read/create access to stored justificante records.
#[async_trait]
pub trait JustificanteRepository: Send + Sync {
    async fn list_all(&self) -> PortResult<Vec<Value>>;

    /// Accepts an arbitrary justificante-like record and acknowledges it.
    async fn create(&self, record: Value) -> PortResult<String>;
}

//=========================================================================================
// Eligibility Lookup Port
//=========================================================================================

/// Lookups against attendance and justification history, used by the
/// eligibility checker's first two disqualifying predicates.
#[async_trait]
pub trait AbsenceRecords: Send + Sync {
    /// Whether the student has accumulated too many prior absences.
    async fn has_excessive_absences(&self, student_id: &str) -> PortResult<bool>;

    /// Whether the student has a justification still pending resolution.
    async fn has_pending_justification(&self, student_id: &str) -> PortResult<bool>;
}

//=========================================================================================
// Mail Port
//=========================================================================================

/// A single outbound message, shaped for the mail transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub cc: Vec<String>,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

/// Dispatches exactly one message per call. At-most-once: no retry,
/// no queueing, no delivery confirmation tracking.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> PortResult<()>;
}
