//! crates/justificante_core/src/wizard.rs
//!
//! The session-scoped coordinator for one pass through the pipeline:
//! form entry, student selection, eligibility check, email send. Each stage
//! is gated on the previous stage's output; all state lives in this one
//! object and dies with it.

use chrono::{DateTime, Duration, Utc};

use crate::compose::{default_subject, parse_cc_list};
use crate::domain::{EmailPayload, JustificanteData, Student};
use crate::eligibility::{CheckerError, CheckerState, EligibilityChecker, ValidationOutcome};
use crate::form::{FormError, JustificanteForm};
use crate::ports::AbsenceRecords;
use crate::selection::RosterSelection;

/// How long the "sent" confirmation stays up before reverting to the form.
pub const SENT_DISPLAY_SECONDS: i64 = 5;

/// The send stage's state. `Sent` carries the deadline at which it reverts
/// to `Editing`; the deadline is checked by [`WizardSession::tick`] rather
/// than a detached timer, so teardown can simply drop the session (or call
/// [`WizardSession::cancel_revert`]) without a stale callback firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendState {
    Editing,
    Sending,
    Sent { revert_at: Option<DateTime<Utc>> },
}

/// A gating violation or a propagated stage error.
#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Checker(#[from] CheckerError),
    #[error("Completa la información del justificante primero")]
    FormNotSubmitted,
    #[error("No hay estudiantes validados para enviar")]
    NoEligibleStudents,
    #[error("Hay un envío en curso")]
    SendInProgress,
}

/// One wizard pass. Nothing here survives the session.
#[derive(Debug)]
pub struct WizardSession {
    form: JustificanteForm,
    selection: RosterSelection,
    checker: EligibilityChecker,
    accepted: Option<JustificanteData>,
    send_state: SendState,
}

impl WizardSession {
    pub fn new(roster: Vec<Student>) -> Self {
        Self {
            form: JustificanteForm::new(),
            selection: RosterSelection::new(roster),
            checker: EligibilityChecker::new(),
            accepted: None,
            send_state: SendState::Editing,
        }
    }

    pub fn form(&self) -> &JustificanteForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut JustificanteForm {
        &mut self.form
    }

    pub fn selection(&self) -> &RosterSelection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut RosterSelection {
        &mut self.selection
    }

    /// Validates and freezes the form data for the downstream stages.
    pub fn submit_form(&mut self) -> Result<JustificanteData, WizardError> {
        let data = self.form.submit()?;
        self.accepted = Some(data.clone());
        Ok(data)
    }

    pub fn accepted(&self) -> Option<&JustificanteData> {
        self.accepted.as_ref()
    }

    pub fn checker_state(&self) -> CheckerState {
        self.checker.state()
    }

    pub fn validation_outcome(&self) -> Option<&ValidationOutcome> {
        self.checker.outcome()
    }

    /// The validated students from the latest run, empty before any run.
    pub fn eligible_students(&self) -> &[Student] {
        self.checker
            .outcome()
            .map(|o| o.eligible.as_slice())
            .unwrap_or(&[])
    }

    /// Runs the eligibility check over the current selection. Requires a
    /// submitted form; the checker itself refuses an empty selection.
    pub async fn validate(
        &mut self,
        records: &dyn AbsenceRecords,
        now: DateTime<Utc>,
    ) -> Result<&ValidationOutcome, WizardError> {
        let data = self
            .accepted
            .clone()
            .ok_or(WizardError::FormNotSubmitted)?;
        let selected = self.selection.selected_students();
        Ok(self.checker.run(records, &selected, &data, now).await?)
    }

    pub fn send_state(&self) -> SendState {
        self.send_state
    }

    /// Builds the payload for one send attempt and marks the send in flight.
    /// An empty subject falls back to the prefilled one.
    pub fn begin_send(
        &mut self,
        recipient_email: impl Into<String>,
        cc_emails: &str,
        subject: &str,
        additional_message: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<EmailPayload, WizardError> {
        if self.send_state == SendState::Sending {
            return Err(WizardError::SendInProgress);
        }
        let justificante = self
            .accepted
            .clone()
            .ok_or(WizardError::FormNotSubmitted)?;
        let students = self.eligible_students().to_vec();
        if students.is_empty() {
            return Err(WizardError::NoEligibleStudents);
        }

        self.send_state = SendState::Sending;
        let subject = if subject.trim().is_empty() {
            default_subject(&justificante.reason)
        } else {
            subject.to_string()
        };
        Ok(EmailPayload {
            recipient_email: recipient_email.into(),
            cc_emails: parse_cc_list(cc_emails),
            subject,
            additional_message: additional_message.into(),
            justificante,
            students,
            timestamp: now,
        })
    }

    /// Moves to the `Sent` confirmation, which auto-reverts after the
    /// display window.
    pub fn send_succeeded(&mut self, now: DateTime<Utc>) {
        self.send_state = SendState::Sent {
            revert_at: Some(now + Duration::seconds(SENT_DISPLAY_SECONDS)),
        };
    }

    /// Returns to the pre-send state so the user can retry with corrected
    /// input.
    pub fn send_failed(&mut self) {
        self.send_state = SendState::Editing;
    }

    /// Applies the pending auto-revert once its deadline has passed.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        if let SendState::Sent { revert_at: Some(deadline) } = self.send_state {
            if now >= deadline {
                self.send_state = SendState::Editing;
            }
        }
    }

    /// Cancels the pending auto-revert, e.g. when the owning view is torn
    /// down mid-window.
    pub fn cancel_revert(&mut self) {
        if let SendState::Sent { revert_at } = &mut self.send_state {
            *revert_at = None;
        }
    }
}
