//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{MemoryAbsenceRecords, MemoryJustificanteRepo, MemoryStudentRepo, SmtpMailer},
    config::Config,
    error::ApiError,
    web::{
        create_justificante_handler, create_student_handler, list_justificantes_handler,
        list_students_handler, rest::ApiDoc, send_email_handler, state::AppState,
        validate_handler,
    },
};
use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Initialize Adapters ---
    // In-memory stand-ins for the future document store.
    let students = Arc::new(MemoryStudentRepo::new());
    let justificantes = Arc::new(MemoryJustificanteRepo::new());
    let records = Arc::new(MemoryAbsenceRecords::new());
    let mailer = Arc::new(SmtpMailer::from_config(&config.smtp)?);
    info!(
        host = %config.smtp.host,
        port = config.smtp.port,
        secure = config.smtp.secure,
        "SMTP transport configured"
    );

    // --- 3. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        students,
        justificantes,
        records,
        mailer,
        config: config.clone(),
    });

    let cors = CorsLayer::new()
        .allow_origin(
            config
                .cors_origin
                .parse::<HeaderValue>()
                .map_err(|e| ApiError::Internal(format!("invalid CORS_ORIGIN: {e}")))?,
        )
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // --- 4. Create the Web Router ---
    let api_router = Router::new()
        .route(
            "/students",
            get(list_students_handler).post(create_student_handler),
        )
        .route(
            "/justificantes",
            get(list_justificantes_handler).post(create_justificante_handler),
        )
        .route("/validate", post(validate_handler))
        .route("/send-email", post(send_email_handler))
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete
    // application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
