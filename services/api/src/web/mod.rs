pub mod rest;
pub mod state;

// Re-export the handlers to make them easily accessible to the binary that
// builds the web server router.
pub use rest::{
    create_justificante_handler, create_student_handler, list_justificantes_handler,
    list_students_handler, send_email_handler, validate_handler,
};
