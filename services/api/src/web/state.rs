//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use std::sync::Arc;

use justificante_core::ports::{
    AbsenceRecords, JustificanteRepository, Mailer, StudentRepository,
};

use crate::config::Config;

/// The shared application state, created once at startup and passed to all
/// handlers.
#[derive(Clone)]
pub struct AppState {
    pub students: Arc<dyn StudentRepository>,
    pub justificantes: Arc<dyn JustificanteRepository>,
    pub records: Arc<dyn AbsenceRecords>,
    pub mailer: Arc<dyn Mailer>,
    pub config: Arc<Config>,
}
