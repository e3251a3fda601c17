//! # API REST
//!
//! REST API for the discovery document generator.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON bodies, status codes, attachment headers, CORS)
//!
//! Uses `api-shared` for wire types and `discovery-core` for everything else.

#![warn(rust_2018_idioms)]

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use std::any::Any;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::{
    CaseMetadataData, DiscoveryFormData, ErrorRes, ExportDocxReq, GenerateDiscoveryReq,
    GenerateDiscoveryRes, HealthRes, HealthService, PreviewParagraph, PreviewRes,
};
use discovery_core::{
    CaseMetadata, CoreConfig, DiscoveryError, DiscoveryRequest, DiscoveryResult, ExportService,
    GenerationService, DOCX_CONTENT_TYPE,
};

/// Application state shared across REST API handlers.
///
/// Everything here is read-only after startup; requests share no mutable state.
#[derive(Clone)]
pub struct AppState {
    export: ExportService,
    generation: GenerationService,
}

impl AppState {
    /// Builds the state from the startup configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the AI client cannot be constructed. A missing API key is not an
    /// error here; generation requests report it instead.
    pub fn new(cfg: &CoreConfig) -> DiscoveryResult<Self> {
        let generation = GenerationService::from_config(cfg)?;
        Ok(Self::with_generation(cfg, generation))
    }

    /// Builds the state around an explicit generation service.
    pub fn with_generation(cfg: &CoreConfig, generation: GenerationService) -> Self {
        Self {
            export: ExportService::from_config(cfg),
            generation,
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(health, generate_discovery, generate_docx, preview),
    components(schemas(
        HealthRes,
        DiscoveryFormData,
        GenerateDiscoveryReq,
        GenerateDiscoveryRes,
        CaseMetadataData,
        ExportDocxReq,
        PreviewParagraph,
        PreviewRes,
        ErrorRes,
    ))
)]
pub struct ApiDoc;

/// The full REST application: API routes, Swagger UI, CORS and request tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/generate-discovery", post(generate_discovery))
        .route("/api/generate-docx", post(generate_docx))
        .route("/api/preview", post(preview))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

type ApiError = (StatusCode, Json<ErrorRes>);

/// A body that is not valid JSON for the endpoint, or not JSON at all.
fn json_rejection(rejection: JsonRejection) -> ApiError {
    tracing::warn!("Request body rejected: {}", rejection.body_text());
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorRes::with_details(
            "Invalid request body",
            rejection.body_text(),
        )),
    )
}

/// Last-resort response for a handler that panicked.
fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(message) = err.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = err.downcast_ref::<&str>() {
        (*message).to_string()
    } else {
        "handler panicked".to_string()
    };
    tracing::error!("Request handler panicked: {}", details);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorRes::with_details(
            "Failed to generate DOCX document",
            details,
        )),
    )
        .into_response()
}

/// Status and body for a failed generation request.
fn generation_error(err: &DiscoveryError) -> ApiError {
    match err {
        DiscoveryError::MissingApiKey => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorRes::new("OpenAI API key not configured")),
        ),
        e if e.is_input_error() => (StatusCode::BAD_REQUEST, Json(ErrorRes::new(e.to_string()))),
        e => (
            StatusCode::BAD_GATEWAY,
            Json(ErrorRes::with_details(
                "Failed to generate discovery document",
                e.to_string(),
            )),
        ),
    }
}

/// Status and body for a failed export or preview request.
fn export_error(err: &DiscoveryError) -> ApiError {
    match err {
        DiscoveryError::NoContent => (
            StatusCode::BAD_REQUEST,
            Json(ErrorRes::new("No content provided")),
        ),
        e if e.is_input_error() => (StatusCode::BAD_REQUEST, Json(ErrorRes::new(e.to_string()))),
        e => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorRes::with_details(
                "Failed to generate DOCX document",
                e.to_string(),
            )),
        ),
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Reports liveness and whether an AI credential is configured.
#[axum::debug_handler]
async fn health(State(state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health(state.generation.is_available()))
}

#[utoipa::path(
    post,
    path = "/api/generate-discovery",
    request_body = GenerateDiscoveryReq,
    responses(
        (status = 200, description = "Generated discovery text", body = GenerateDiscoveryRes),
        (status = 400, description = "Missing or invalid form fields", body = ErrorRes),
        (status = 500, description = "AI credential not configured", body = ErrorRes),
        (status = 502, description = "AI provider failed or returned nothing", body = ErrorRes)
    )
)]
/// Generate a discovery document from case details
///
/// Builds the prompt from the form and the uploaded file names and forwards it to the
/// configured AI provider. The text comes back unchanged.
///
/// # Errors
/// - `400 Bad Request` if the body is not a valid request, a required form field is missing or
///   the discovery type is unknown.
/// - `500 Internal Server Error` if no AI credential is configured.
/// - `502 Bad Gateway` if the provider call fails or yields no content.
#[axum::debug_handler]
async fn generate_discovery(
    State(state): State<AppState>,
    payload: Result<Json<GenerateDiscoveryReq>, JsonRejection>,
) -> Result<Json<GenerateDiscoveryRes>, ApiError> {
    let Json(req) = payload.map_err(json_rejection)?;
    let request = DiscoveryRequest::try_from(req).map_err(|e| {
        tracing::warn!("Generate discovery rejected: {}", e);
        generation_error(&e)
    })?;

    match state.generation.generate(&request).await {
        Ok(document) => Ok(Json(GenerateDiscoveryRes {
            content: document.text,
        })),
        Err(e) => {
            tracing::error!("Generate discovery error: {:?}", e);
            Err(generation_error(&e))
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/generate-docx",
    request_body = ExportDocxReq,
    responses(
        (status = 200, description = "DOCX attachment (application/vnd.openxmlformats-officedocument.wordprocessingml.document)"),
        (status = 400, description = "Invalid body or no content provided", body = ErrorRes),
        (status = 500, description = "Document could not be built", body = ErrorRes)
    )
)]
/// Export discovery text as a Word document
///
/// Lays the content out under the optional case header and returns the `.docx` package as
/// an attachment named after the case number.
///
/// # Errors
/// - `400 Bad Request` if the body is not a valid request or `content` is absent or blank.
/// - `500 Internal Server Error` if the package cannot be written.
#[axum::debug_handler]
async fn generate_docx(
    State(state): State<AppState>,
    payload: Result<Json<ExportDocxReq>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = payload.map_err(json_rejection)?;
    let metadata = req
        .discovery_data
        .as_ref()
        .map(CaseMetadata::from)
        .unwrap_or_default();

    let exported = state
        .export
        .export(req.content.as_deref(), &metadata)
        .map_err(|e| {
            if e.is_input_error() {
                tracing::warn!("Generate DOCX rejected: {}", e);
            } else {
                tracing::error!("Generate DOCX error: {:?}", e);
            }
            export_error(&e)
        })?;

    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        exported.filename
    ))
    .map_err(|e| {
        tracing::error!("Invalid Content-Disposition header: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorRes::with_details(
                "Failed to generate DOCX document",
                e.to_string(),
            )),
        )
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(DOCX_CONTENT_TYPE)),
            (header::CONTENT_DISPOSITION, disposition),
            (header::CONTENT_LENGTH, HeaderValue::from(exported.bytes.len())),
        ],
        exported.bytes,
    )
        .into_response())
}

#[utoipa::path(
    post,
    path = "/api/preview",
    request_body = ExportDocxReq,
    responses(
        (status = 200, description = "Paragraphs as they would be exported", body = PreviewRes),
        (status = 400, description = "Invalid body or no content provided", body = ErrorRes)
    )
)]
/// Preview the export layout
///
/// Returns each paragraph the export would emit, with its classification, without building
/// the package.
#[axum::debug_handler]
async fn preview(
    State(state): State<AppState>,
    payload: Result<Json<ExportDocxReq>, JsonRejection>,
) -> Result<Json<PreviewRes>, ApiError> {
    let Json(req) = payload.map_err(json_rejection)?;
    let metadata = req
        .discovery_data
        .as_ref()
        .map(CaseMetadata::from)
        .unwrap_or_default();

    let paragraphs = state
        .export
        .preview(req.content.as_deref(), &metadata)
        .map_err(|e| export_error(&e))?;

    let paragraphs = paragraphs
        .iter()
        .map(|paragraph| PreviewParagraph {
            kind: paragraph.kind.as_str().to_string(),
            text: paragraph.text(),
        })
        .collect();
    Ok(Json(PreviewRes { paragraphs }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use discovery_core::{Prompt, TextGenerator};
    use http_body_util::BodyExt;
    use std::io::Cursor;
    use std::sync::Arc;
    use tower::ServiceExt;

    struct FixedGenerator(&'static str);

    #[async_trait]
    impl TextGenerator for FixedGenerator {
        async fn generate(&self, _prompt: &Prompt) -> DiscoveryResult<String> {
            Ok(self.0.to_string())
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl TextGenerator for FailingGenerator {
        async fn generate(&self, _prompt: &Prompt) -> DiscoveryResult<String> {
            Err(DiscoveryError::Upstream {
                status: 500,
                message: "boom".into(),
            })
        }
    }

    fn app(generation: GenerationService) -> Router {
        router(AppState::with_generation(&CoreConfig::default(), generation))
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        response
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    fn form() -> serde_json::Value {
        serde_json::json!({
            "formData": {
                "caseTitle": "Smith v. Jones",
                "caseNumber": "CV-2024-001",
                "requestingParty": "Plaintiff",
                "respondingParty": "Defendant",
                "discoveryType": "interrogatories",
                "subject": "Breach of contract"
            },
            "fileCount": 0,
            "fileNames": []
        })
    }

    #[tokio::test]
    async fn test_health_reports_generation_availability() {
        let response = app(GenerationService::default())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["ok"], true);
        assert_eq!(json["generationAvailable"], false);
    }

    #[tokio::test]
    async fn test_generate_docx_returns_attachment() {
        let response = app(GenerationService::default())
            .oneshot(post_json(
                "/api/generate-docx",
                serde_json::json!({
                    "content": "INTERROGATORIES\n\n1. State your full name.",
                    "discoveryData": {"caseTitle": "Smith v. Jones", "caseNumber": "CV/2024:007*"}
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], DOCX_CONTENT_TYPE);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Discovery_Request_CV_2024_007_.docx\""
        );
        let length: usize = response.headers()[header::CONTENT_LENGTH]
            .to_str()
            .unwrap()
            .parse()
            .unwrap();

        let bytes = body_bytes(response).await;
        assert_eq!(bytes.len(), length);
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert!(archive.by_name("word/document.xml").is_ok());
    }

    #[tokio::test]
    async fn test_generate_docx_without_metadata_uses_fallback_name() {
        let response = app(GenerationService::default())
            .oneshot(post_json(
                "/api/generate-docx",
                serde_json::json!({"content": "Some body text."}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Discovery_Request_Document.docx\""
        );
    }

    #[tokio::test]
    async fn test_generate_docx_rejects_missing_content() {
        for body in [
            serde_json::json!({}),
            serde_json::json!({"content": ""}),
            serde_json::json!({"content": "  \n\n "}),
        ] {
            let response = app(GenerationService::default())
                .oneshot(post_json("/api/generate-docx", body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(body_json(response).await["error"], "No content provided");
        }
    }

    #[tokio::test]
    async fn test_generate_discovery_returns_generated_text() {
        let generation =
            GenerationService::with_generator(Arc::new(FixedGenerator("DEFINITIONS\n\nText.")));
        let response = app(generation)
            .oneshot(post_json("/api/generate-discovery", form()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["content"], "DEFINITIONS\n\nText.");
    }

    #[tokio::test]
    async fn test_generate_discovery_without_key_is_server_error() {
        let response = app(GenerationService::default())
            .oneshot(post_json("/api/generate-discovery", form()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await["error"],
            "OpenAI API key not configured"
        );
    }

    #[tokio::test]
    async fn test_generate_discovery_maps_provider_failures_to_bad_gateway() {
        let empty = GenerationService::with_generator(Arc::new(FixedGenerator("   ")));
        let failing = GenerationService::with_generator(Arc::new(FailingGenerator));

        for generation in [empty, failing] {
            let response = app(generation)
                .oneshot(post_json("/api/generate-discovery", form()))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
            let json = body_json(response).await;
            assert_eq!(json["error"], "Failed to generate discovery document");
            assert!(json["details"].is_string());
        }
    }

    #[tokio::test]
    async fn test_generate_discovery_rejects_missing_required_fields() {
        let generation = GenerationService::with_generator(Arc::new(FixedGenerator("x")));
        let response = app(generation)
            .oneshot(post_json(
                "/api/generate-discovery",
                serde_json::json!({"formData": {"caseTitle": "Smith v. Jones"}}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_preview_lists_classified_paragraphs() {
        let response = app(GenerationService::default())
            .oneshot(post_json(
                "/api/preview",
                serde_json::json!({
                    "content": "DEFINITIONS\n\nThe term document means any writing.",
                    "discoveryData": {"caseTitle": "Smith v. Jones"}
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let kinds: Vec<&str> = json["paragraphs"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["kind"].as_str().unwrap())
            .collect();
        assert_eq!(kinds, ["title", "spacing", "heading", "body"]);
        assert_eq!(json["paragraphs"][2]["text"], "DEFINITIONS");
    }

    #[test]
    fn test_openapi_lists_all_routes() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/api/generate-discovery",
            "/api/generate-docx",
            "/api/preview",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[tokio::test]
    async fn test_mistyped_body_is_json_bad_request() {
        for uri in ["/api/generate-docx", "/api/preview"] {
            let response = app(GenerationService::default())
                .oneshot(post_json(uri, serde_json::json!({"content": 42})))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let json = body_json(response).await;
            assert_eq!(json["error"], "Invalid request body");
            assert!(json["details"].is_string());
        }

        let response = app(GenerationService::default())
            .oneshot(post_json(
                "/api/generate-discovery",
                serde_json::json!({"formData": {"caseNumber": 7}}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Invalid request body");
    }

    #[tokio::test]
    async fn test_missing_content_type_is_json_bad_request() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/generate-docx")
            .body(Body::from(r#"{"content": "text"}"#))
            .unwrap();
        let response = app(GenerationService::default())
            .oneshot(request)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Invalid request body");
    }

    #[test]
    fn test_export_failures_map_to_server_error_with_details() {
        for err in [
            DiscoveryError::InvalidPackage("missing part".into()),
            DiscoveryError::Io(std::io::Error::other("disk full")),
        ] {
            let (status, Json(body)) = export_error(&err);
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body.error, "Failed to generate DOCX document");
            assert_eq!(body.details, Some(err.to_string()));
        }
    }

    #[test]
    fn test_transport_failure_maps_to_bad_gateway() {
        let err = DiscoveryError::Http("connection reset".into());
        let (status, Json(body)) = generation_error(&err);
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body.error, "Failed to generate discovery document");
        assert!(body.details.unwrap().contains("connection reset"));
    }

    #[tokio::test]
    async fn test_panicking_handler_returns_json_error() {
        let app = Router::new()
            .route(
                "/boom",
                get(|| async {
                    panic!("layout exploded");
                    #[allow(unreachable_code)]
                    ()
                }),
            )
            .layer(CatchPanicLayer::custom(panic_response));

        let response = app
            .oneshot(Request::get("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Failed to generate DOCX document");
        assert_eq!(json["details"], "layout exploded");
    }
}
