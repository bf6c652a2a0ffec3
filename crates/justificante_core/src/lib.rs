pub mod compose;
pub mod domain;
pub mod eligibility;
pub mod form;
pub mod ports;
pub mod selection;
pub mod wizard;

pub use domain::{EmailPayload, JustificanteData, Student, ValidationResult};
pub use eligibility::{CheckerError, CheckerState, EligibilityChecker, ValidationOutcome};
pub use form::{FormDraft, FormError, JustificanteForm};
pub use ports::{
    AbsenceRecords, JustificanteRepository, Mailer, OutgoingEmail, PortError, PortResult,
    StudentRepository,
};
pub use selection::RosterSelection;
pub use wizard::{SendState, WizardError, WizardSession};
