//! crates/justificante_core/src/form.rs
//!
//! State for the justificante entry form. The form pushes its full draft to
//! the owning session on every field change, and only checks the ordering
//! invariants on an explicit submit.

use chrono::{NaiveDate, NaiveTime};

use crate::domain::JustificanteData;

/// The form's working copy of the six justificante fields.
///
/// Dates and hours stay unset (`None`) until the user fills them in, mirroring
/// empty date/time inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormDraft {
    pub reason: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub start_hour: Option<NaiveTime>,
    pub end_hour: Option<NaiveTime>,
    pub description: String,
}

/// A user-visible rejection of a form submit. The draft is left untouched so
/// the user can correct it and resubmit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("La fecha de inicio no puede ser posterior a la fecha de fin")]
    DateOrder,
    #[error("La hora de inicio debe ser anterior a la hora de fin")]
    HourOrder,
    #[error("Falta el campo obligatorio: {0}")]
    Incomplete(&'static str),
}

/// Captures user edits to the justificante fields.
///
/// Every setter returns the full current draft so the owning session always
/// holds the latest snapshot (push-on-change, not push-on-submit).
#[derive(Debug, Clone, Default)]
pub struct JustificanteForm {
    draft: FormDraft,
}

impl JustificanteForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &FormDraft {
        &self.draft
    }

    pub fn set_reason(&mut self, reason: impl Into<String>) -> FormDraft {
        self.draft.reason = reason.into();
        self.draft.clone()
    }

    pub fn set_start_date(&mut self, date: NaiveDate) -> FormDraft {
        self.draft.start_date = Some(date);
        self.draft.clone()
    }

    pub fn set_end_date(&mut self, date: NaiveDate) -> FormDraft {
        self.draft.end_date = Some(date);
        self.draft.clone()
    }

    pub fn set_start_hour(&mut self, hour: NaiveTime) -> FormDraft {
        self.draft.start_hour = Some(hour);
        self.draft.clone()
    }

    pub fn set_end_hour(&mut self, hour: NaiveTime) -> FormDraft {
        self.draft.end_hour = Some(hour);
        self.draft.clone()
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> FormDraft {
        self.draft.description = description.into();
        self.draft.clone()
    }

    /// Resets all six fields to their initial empty state.
    pub fn clear(&mut self) -> FormDraft {
        self.draft = FormDraft::default();
        self.draft.clone()
    }

    /// Validates the ordering invariants and returns the accepted snapshot.
    ///
    /// Rejects when `start_date > end_date` or `start_hour >= end_hour`;
    /// rejection has no side effect on the draft. The description is optional,
    /// everything else is required.
    pub fn submit(&self) -> Result<JustificanteData, FormError> {
        // Ordering checks run on whatever is filled in, before completeness.
        if let (Some(start), Some(end)) = (self.draft.start_date, self.draft.end_date) {
            if start > end {
                return Err(FormError::DateOrder);
            }
        }
        if let (Some(start), Some(end)) = (self.draft.start_hour, self.draft.end_hour) {
            if start >= end {
                return Err(FormError::HourOrder);
            }
        }

        if self.draft.reason.trim().is_empty() {
            return Err(FormError::Incomplete("motivo"));
        }
        let start_date = self.draft.start_date.ok_or(FormError::Incomplete("fecha de inicio"))?;
        let end_date = self.draft.end_date.ok_or(FormError::Incomplete("fecha de fin"))?;
        let start_hour = self.draft.start_hour.ok_or(FormError::Incomplete("hora de inicio"))?;
        let end_hour = self.draft.end_hour.ok_or(FormError::Incomplete("hora de fin"))?;

        Ok(JustificanteData {
            reason: self.draft.reason.clone(),
            start_date,
            end_date,
            start_hour,
            end_hour,
            description: self.draft.description.clone(),
        })
    }
}
