//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification. The wire types here are the
//! "impure" serde-facing counterparts of the pure domain structs in
//! `justificante_core`.

use axum::extract::rejection::JsonRejection;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::error;
use utoipa::{OpenApi, ToSchema};

use justificante_core::compose::{default_subject, parse_cc_list, render_document};
use justificante_core::domain::{JustificanteData, Student};
use justificante_core::eligibility::{CheckerError, EligibilityChecker};
use justificante_core::ports::OutgoingEmail;

use crate::web::state::AppState;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        list_students_handler,
        create_student_handler,
        list_justificantes_handler,
        create_justificante_handler,
        validate_handler,
        send_email_handler,
    ),
    components(
        schemas(
            StudentDto,
            JustificanteDto,
            StudentListResponse,
            JustificanteListResponse,
            AckResponse,
            ValidateRequest,
            ValidationResultDto,
            ValidateResponse,
            SendEmailRequest,
        )
    ),
    tags(
        (name = "Justificante API", description = "API endpoints for the absence-justification pipeline.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Wire Formats for Hours ("HH:MM", the HTML time-input format)
//=========================================================================================

mod hhmm {
    use chrono::NaiveTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map_err(serde::de::Error::custom)
    }
}

//=========================================================================================
// API Payload and Response Structs
//=========================================================================================

/// A roster entry as it travels over the wire.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudentDto {
    pub id: String,
    pub name: String,
    pub career: String,
}

impl StudentDto {
    fn to_domain(&self) -> Student {
        Student {
            id: self.id.clone(),
            name: self.name.clone(),
            career: self.career.clone(),
        }
    }

    fn from_domain(student: Student) -> Self {
        Self {
            id: student.id,
            name: student.name,
            career: student.career,
        }
    }
}

/// The justificante fields as submitted by the form.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JustificanteDto {
    pub reason: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(with = "hhmm")]
    #[schema(value_type = String, example = "08:00")]
    pub start_hour: chrono::NaiveTime,
    #[serde(with = "hhmm")]
    #[schema(value_type = String, example = "09:00")]
    pub end_hour: chrono::NaiveTime,
    #[serde(default)]
    pub description: String,
}

impl JustificanteDto {
    fn to_domain(&self) -> JustificanteData {
        JustificanteData {
            reason: self.reason.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            start_hour: self.start_hour,
            end_hour: self.end_hour,
            description: self.description.clone(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StudentListResponse {
    pub students: Vec<StudentDto>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct JustificanteListResponse {
    #[schema(value_type = Vec<Object>)]
    pub justificantes: Vec<Value>,
}

/// The generic acknowledgement/failure payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AckResponse {
    pub success: bool,
    pub message: String,
}

/// The request body for a server-side eligibility run.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ValidateRequest {
    pub justificante: JustificanteDto,
    pub students: Vec<StudentDto>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResultDto {
    pub student_id: String,
    pub is_valid: bool,
    pub reason: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResponse {
    pub results: Vec<ValidationResultDto>,
    /// The subset of the input selection that passed, in input order.
    pub validated_students: Vec<StudentDto>,
}

/// The request body for one email send attempt.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailRequest {
    pub recipient_email: String,
    /// Comma-separated; whitespace is trimmed and empty entries dropped.
    #[serde(default)]
    pub cc_emails: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub additional_message: String,
    pub justificante: JustificanteDto,
    pub students: Vec<StudentDto>,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

type Failure = (StatusCode, Json<AckResponse>);

fn failure(status: StatusCode, message: impl Into<String>) -> Failure {
    (
        status,
        Json(AckResponse {
            success: false,
            message: message.into(),
        }),
    )
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// List the full student roster.
#[utoipa::path(
    get,
    path = "/students",
    responses(
        (status = 200, description = "The seed roster", body = StudentListResponse),
        (status = 500, description = "Repository failure", body = AckResponse)
    )
)]
pub async fn list_students_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<StudentListResponse>, Failure> {
    match app_state.students.list_all().await {
        Ok(students) => Ok(Json(StudentListResponse {
            students: students.into_iter().map(StudentDto::from_domain).collect(),
        })),
        Err(e) => {
            error!("Failed to fetch students: {e}");
            Err(failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch students",
            ))
        }
    }
}

/// Accept a student-like record. Logged and acknowledged, not persisted.
#[utoipa::path(
    post,
    path = "/students",
    request_body(content = Object, description = "An arbitrary student-like record"),
    responses(
        (status = 200, description = "Acknowledged", body = AckResponse),
        (status = 500, description = "Malformed body or repository failure", body = AckResponse)
    )
)]
pub async fn create_student_handler(
    State(app_state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<AckResponse>, Failure> {
    let Json(record) = body.map_err(|e| {
        error!("Rejected student record: {e}");
        failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create student")
    })?;

    match app_state.students.create(record).await {
        Ok(message) => Ok(Json(AckResponse {
            success: true,
            message,
        })),
        Err(e) => {
            error!("Failed to create student: {e}");
            Err(failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to create student",
            ))
        }
    }
}

/// List stored justificantes (always empty until a real store is connected).
#[utoipa::path(
    get,
    path = "/justificantes",
    responses(
        (status = 200, description = "Stored justificantes", body = JustificanteListResponse),
        (status = 500, description = "Repository failure", body = AckResponse)
    )
)]
pub async fn list_justificantes_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<JustificanteListResponse>, Failure> {
    match app_state.justificantes.list_all().await {
        Ok(justificantes) => Ok(Json(JustificanteListResponse { justificantes })),
        Err(e) => {
            error!("Failed to fetch justificantes: {e}");
            Err(failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch justificantes",
            ))
        }
    }
}

/// Accept a justificante-like record. Logged and acknowledged, not persisted.
#[utoipa::path(
    post,
    path = "/justificantes",
    request_body(content = Object, description = "An arbitrary justificante-like record"),
    responses(
        (status = 200, description = "Acknowledged", body = AckResponse),
        (status = 500, description = "Malformed body or repository failure", body = AckResponse)
    )
)]
pub async fn create_justificante_handler(
    State(app_state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<AckResponse>, Failure> {
    let Json(record) = body.map_err(|e| {
        error!("Rejected justificante record: {e}");
        failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to create justificante",
        )
    })?;

    match app_state.justificantes.create(record).await {
        Ok(message) => Ok(Json(AckResponse {
            success: true,
            message,
        })),
        Err(e) => {
            error!("Failed to create justificante: {e}");
            Err(failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to create justificante",
            ))
        }
    }
}

/// Run the eligibility check over a selection of students.
#[utoipa::path(
    post,
    path = "/validate",
    request_body = ValidateRequest,
    responses(
        (status = 200, description = "Per-student verdicts plus the eligible subset", body = ValidateResponse),
        (status = 400, description = "Empty selection or blank reason", body = AckResponse),
        (status = 500, description = "History lookup failure", body = AckResponse)
    )
)]
pub async fn validate_handler(
    State(app_state): State<Arc<AppState>>,
    body: Result<Json<ValidateRequest>, JsonRejection>,
) -> Result<Json<ValidateResponse>, Failure> {
    let Json(request) = body.map_err(|e| {
        error!("Rejected validate request: {e}");
        failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to validate students")
    })?;

    let data = request.justificante.to_domain();
    let students: Vec<Student> = request.students.iter().map(StudentDto::to_domain).collect();

    let mut checker = EligibilityChecker::new();
    match checker
        .run(app_state.records.as_ref(), &students, &data, Utc::now())
        .await
    {
        Ok(outcome) => Ok(Json(ValidateResponse {
            results: outcome
                .results
                .iter()
                .map(|r| ValidationResultDto {
                    student_id: r.student_id.clone(),
                    is_valid: r.is_valid,
                    reason: r.reason.clone(),
                })
                .collect(),
            validated_students: outcome
                .eligible
                .iter()
                .cloned()
                .map(StudentDto::from_domain)
                .collect(),
        })),
        Err(e @ (CheckerError::EmptySelection | CheckerError::MissingReason)) => {
            Err(failure(StatusCode::BAD_REQUEST, e.to_string()))
        }
        Err(e) => {
            error!("Eligibility run failed: {e}");
            Err(failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to validate students",
            ))
        }
    }
}

/// Render the justificante document and send it by email.
#[utoipa::path(
    post,
    path = "/send-email",
    request_body = SendEmailRequest,
    responses(
        (status = 200, description = "Email dispatched", body = AckResponse),
        (status = 500, description = "Transport failure; the message embeds the cause", body = AckResponse)
    )
)]
pub async fn send_email_handler(
    State(app_state): State<Arc<AppState>>,
    body: Result<Json<SendEmailRequest>, JsonRejection>,
) -> Result<Json<AckResponse>, Failure> {
    let Json(request) = body.map_err(|e| {
        failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Error al enviar el email: {e}"),
        )
    })?;

    let justificante = request.justificante.to_domain();
    let students: Vec<Student> = request.students.iter().map(StudentDto::to_domain).collect();
    let document = render_document(
        &justificante,
        &students,
        &request.additional_message,
        request.timestamp,
    );

    let subject = if request.subject.trim().is_empty() {
        default_subject(&justificante.reason)
    } else {
        request.subject.clone()
    };
    let email = OutgoingEmail {
        to: request.recipient_email.clone(),
        cc: parse_cc_list(&request.cc_emails),
        subject,
        html_body: format!(
            "<pre style=\"font-family: monospace; white-space: pre-wrap;\">{document}</pre>"
        ),
        text_body: document,
    };

    match app_state.mailer.send(&email).await {
        Ok(()) => Ok(Json(AckResponse {
            success: true,
            message: "Email enviado exitosamente".to_string(),
        })),
        Err(e) => {
            error!("Error sending email: {e}");
            Err(failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error al enviar el email: {e}"),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::extract::FromRequest;
    use chrono::TimeZone;

    use justificante_core::ports::{Mailer, PortError, PortResult};

    use crate::adapters::{MemoryAbsenceRecords, MemoryJustificanteRepo, MemoryStudentRepo};
    use crate::config::Config;

    /// Accepts every message.
    struct OkMailer;

    #[async_trait]
    impl Mailer for OkMailer {
        async fn send(&self, _email: &OutgoingEmail) -> PortResult<()> {
            Ok(())
        }
    }

    /// Fails every send the way a broken relay would.
    struct FailingMailer;

    #[async_trait]
    impl Mailer for FailingMailer {
        async fn send(&self, _email: &OutgoingEmail) -> PortResult<()> {
            Err(PortError::Rejected("relay connection refused".to_string()))
        }
    }

    fn app_state(mailer: Arc<dyn Mailer>) -> Arc<AppState> {
        Arc::new(AppState {
            students: Arc::new(MemoryStudentRepo::new()),
            justificantes: Arc::new(MemoryJustificanteRepo::new()),
            records: Arc::new(MemoryAbsenceRecords::new()),
            mailer,
            config: Arc::new(Config::test_default()),
        })
    }

    fn send_request() -> SendEmailRequest {
        SendEmailRequest {
            recipient_email: "coordinador@cetys.mx".to_string(),
            cc_emails: "a@x.com".to_string(),
            subject: String::new(),
            additional_message: String::new(),
            justificante: JustificanteDto {
                reason: "Cita médica".to_string(),
                start_date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
                start_hour: chrono::NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
                end_hour: chrono::NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                description: String::new(),
            },
            students: vec![StudentDto {
                id: "001234".to_string(),
                name: "García Martínez, Juan Carlos".to_string(),
                career: "Ing. Civil".to_string(),
            }],
            timestamp: Utc.with_ymd_and_hms(2025, 3, 12, 9, 30, 0).unwrap(),
        }
    }

    /// Produces the rejection axum hands a handler for an unparseable body.
    async fn json_rejection() -> JsonRejection {
        let request = axum::http::Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from("{ not json"))
            .unwrap();
        Json::<Value>::from_request(request, &())
            .await
            .expect_err("body must be rejected")
    }

    #[tokio::test]
    async fn send_email_success_acknowledges_in_spanish() {
        let state = app_state(Arc::new(OkMailer));
        let Json(ack) = send_email_handler(State(state), Ok(Json(send_request())))
            .await
            .unwrap();
        assert!(ack.success);
        assert_eq!(ack.message, "Email enviado exitosamente");
    }

    #[tokio::test]
    async fn send_email_failure_embeds_the_transport_cause() {
        let state = app_state(Arc::new(FailingMailer));
        let (status, Json(ack)) = send_email_handler(State(state), Ok(Json(send_request())))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!ack.success);
        assert!(ack.message.starts_with("Error al enviar el email:"));
        assert!(ack.message.contains("relay connection refused"));
    }

    #[tokio::test]
    async fn malformed_student_record_yields_the_generic_failure_payload() {
        let state = app_state(Arc::new(OkMailer));
        let (status, Json(ack)) =
            create_student_handler(State(state), Err(json_rejection().await))
                .await
                .unwrap_err();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!ack.success);
        assert_eq!(ack.message, "Failed to create student");
    }

    #[tokio::test]
    async fn malformed_justificante_record_yields_the_generic_failure_payload() {
        let state = app_state(Arc::new(OkMailer));
        let (status, Json(ack)) =
            create_justificante_handler(State(state), Err(json_rejection().await))
                .await
                .unwrap_err();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!ack.success);
        assert_eq!(ack.message, "Failed to create justificante");
    }

    #[test]
    fn send_email_request_accepts_the_wire_json() {
        let raw = r#"{
            "recipientEmail": "coordinador@cetys.mx",
            "ccEmails": "a@x.com, b@x.com",
            "subject": "Justificante de Ausencia - Cita médica",
            "additionalMessage": "",
            "justificante": {
                "reason": "Cita médica",
                "startDate": "2025-03-10",
                "endDate": "2025-03-11",
                "startHour": "08:00",
                "endHour": "09:30",
                "description": "Consulta"
            },
            "students": [
                { "id": "001234", "name": "García Martínez, Juan Carlos", "career": "Ing. Civil" }
            ],
            "timestamp": "2025-03-12T09:30:00Z"
        }"#;

        let request: SendEmailRequest = serde_json::from_str(raw).unwrap();
        assert_eq!(request.recipient_email, "coordinador@cetys.mx");
        assert_eq!(
            request.justificante.start_hour.format("%H:%M").to_string(),
            "08:00"
        );
        assert_eq!(request.students.len(), 1);
    }

    #[test]
    fn optional_send_fields_default_when_absent() {
        let raw = r#"{
            "recipientEmail": "coordinador@cetys.mx",
            "justificante": {
                "reason": "Evento familiar",
                "startDate": "2025-03-10",
                "endDate": "2025-03-10",
                "startHour": "10:00",
                "endHour": "12:00"
            },
            "students": []
        }"#;

        let request: SendEmailRequest = serde_json::from_str(raw).unwrap();
        assert!(request.cc_emails.is_empty());
        assert!(request.subject.is_empty());
        assert!(request.additional_message.is_empty());
    }

    #[test]
    fn hours_accept_seconds_as_well() {
        let raw = r#"{
            "reason": "Cita médica",
            "startDate": "2025-03-10",
            "endDate": "2025-03-10",
            "startHour": "08:00:00",
            "endHour": "09:00:00",
            "description": ""
        }"#;
        let dto: JustificanteDto = serde_json::from_str(raw).unwrap();
        assert_eq!(dto.start_hour.format("%H:%M").to_string(), "08:00");
    }

    #[test]
    fn hours_serialize_without_seconds() {
        let dto = JustificanteDto {
            reason: "Cita médica".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            start_hour: chrono::NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            end_hour: chrono::NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            description: String::new(),
        };
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["startHour"], "08:00");
        assert_eq!(json["startDate"], "2025-03-10");
    }
}
