pub mod memory;
pub mod records;
pub mod smtp;

pub use memory::{MemoryJustificanteRepo, MemoryStudentRepo};
pub use records::MemoryAbsenceRecords;
pub use smtp::SmtpMailer;
