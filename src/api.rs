// Club Directory - REST API
// Student browsing, admin CRUD and registration relay over JSON

use crate::auth::{login, CredentialVerifier};
use crate::browse::{BrowseView, CollegeSummary, RegistryStats};
use crate::entities::{Club, ClubFields, College};
use crate::error::{MutationError, ParseEnumError, SubmissionError};
use crate::mutator::RegistryMutator;
use crate::registration::{RegistrationForm, RegistrationSubmitter, SubmissionReceipt};
use axum::{
    extract::{Path, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::path::Path as FsPath;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Shared application state
#[derive(Clone)]
pub struct ApiState {
    pub browse: BrowseView,
    pub mutator: RegistryMutator,
    pub credentials: Arc<dyn CredentialVerifier>,
    pub submitter: RegistrationSubmitter,
}

impl ApiState {
    /// Browsing reads the same registry the mutator writes
    pub fn new(
        mutator: RegistryMutator,
        credentials: Arc<dyn CredentialVerifier>,
        submitter: RegistrationSubmitter,
    ) -> Self {
        ApiState {
            browse: BrowseView::new(mutator.registry().clone()),
            mutator,
            credentials,
            submitter,
        }
    }
}

/// API Response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

/// Error half of the envelope, with its status code
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        ApiError {
            status,
            message: message.into(),
        }
    }

    fn unauthorized() -> Self {
        ApiError::new(StatusCode::UNAUTHORIZED, "Invalid email or password")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(self.message),
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<MutationError> for ApiError {
    fn from(err: MutationError) -> Self {
        let status = match &err {
            MutationError::Busy => StatusCode::CONFLICT,
            MutationError::NotFound(_) => StatusCode::NOT_FOUND,
            MutationError::Invalid(_) => StatusCode::BAD_REQUEST,
        };
        ApiError::new(status, err.to_string())
    }
}

impl From<SubmissionError> for ApiError {
    fn from(err: SubmissionError) -> Self {
        let status = if err.is_validation() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::BAD_GATEWAY
        };
        ApiError::new(status, err.user_message())
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

// ============================================================================
// Request types
// ============================================================================

#[derive(Deserialize)]
pub struct ClubQuery {
    pub college: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub email: String,
}

/// Admin routes carry HTTP Basic credentials on every call
fn require_admin(state: &ApiState, headers: &HeaderMap) -> Result<String, ApiError> {
    let encoded = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Basic "))
        .ok_or_else(ApiError::unauthorized)?;

    let decoded = STANDARD
        .decode(encoded.trim())
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .ok_or_else(ApiError::unauthorized)?;

    let (email, password) = decoded.split_once(':').ok_or_else(ApiError::unauthorized)?;
    let password = SecretString::from(password.to_string());

    if state.credentials.authenticate(email, &password) {
        Ok(email.to_string())
    } else {
        warn!(email = %email, "admin request with bad credentials");
        Err(ApiError::unauthorized())
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/colleges - Colleges with image and club count
async fn list_colleges(State(state): State<ApiState>) -> ApiResult<Vec<CollegeSummary>> {
    Ok(Json(ApiResponse::ok(state.browse.college_summaries())))
}

/// GET /api/clubs[?college=GGITS] - All clubs, or one college's
async fn list_clubs(
    State(state): State<ApiState>,
    Query(query): Query<ClubQuery>,
) -> ApiResult<Vec<Club>> {
    let clubs = match query.college {
        Some(college) => {
            let college: College = college.parse().map_err(|e: ParseEnumError| {
                ApiError::new(StatusCode::BAD_REQUEST, e.to_string())
            })?;
            state.browse.clubs_for(college).collect()
        }
        None => state.mutator.registry().list(),
    };
    Ok(Json(ApiResponse::ok(clubs)))
}

/// GET /api/clubs/:id - One club with its past events
async fn get_club(State(state): State<ApiState>, Path(id): Path<String>) -> ApiResult<Club> {
    state
        .browse
        .select(Some(id.as_str()))
        .club()
        .cloned()
        .map(|club| Json(ApiResponse::ok(club)))
        .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, format!("club not found: {}", id)))
}

/// GET /api/stats - Dashboard totals
async fn get_stats(State(state): State<ApiState>) -> ApiResult<RegistryStats> {
    Ok(Json(ApiResponse::ok(state.browse.stats())))
}

/// POST /api/login - Check admin credentials
async fn post_login(
    State(state): State<ApiState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let password = SecretString::from(request.password);
    let session = login(state.credentials.as_ref(), &request.email, &password)
        .map_err(|e| ApiError::new(StatusCode::UNAUTHORIZED, e.to_string()))?;
    Ok(Json(ApiResponse::ok(LoginResponse {
        email: session.email,
    })))
}

/// POST /api/clubs - Create club (admin)
async fn create_club(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(fields): Json<ClubFields>,
) -> Result<(StatusCode, Json<ApiResponse<Club>>), ApiError> {
    require_admin(&state, &headers)?;
    let club = state.mutator.create(fields).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(club))))
}

/// PUT /api/clubs/:id - Replace club fields (admin)
async fn update_club(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(fields): Json<ClubFields>,
) -> ApiResult<Club> {
    require_admin(&state, &headers)?;
    let club = state.mutator.update(&id, fields).await?;
    Ok(Json(ApiResponse::ok(club)))
}

/// DELETE /api/clubs/:id - Remove club (admin); absent id is not an error
async fn delete_club(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Option<Club>> {
    require_admin(&state, &headers)?;
    let removed = state.mutator.delete(&id).await?;
    Ok(Json(ApiResponse::ok(removed)))
}

/// POST /api/registrations - Relay a student registration
async fn post_registration(
    State(state): State<ApiState>,
    Json(mut form): Json<RegistrationForm>,
) -> ApiResult<SubmissionReceipt> {
    let receipt = form.submit(&state.submitter).await?;
    Ok(Json(ApiResponse::ok(receipt)))
}

// ============================================================================
// Router
// ============================================================================

/// JSON routes only, without static files or layers
pub fn api_routes(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/colleges", get(list_colleges))
        .route("/clubs", get(list_clubs).post(create_club))
        .route(
            "/clubs/:id",
            get(get_club).put(update_club).delete(delete_club),
        )
        .route("/stats", get(get_stats))
        .route("/login", post(post_login))
        .route("/registrations", post(post_registration))
        .with_state(state)
}

/// Full application: API under /api, college images under /static
pub fn app(state: ApiState, assets_dir: &FsPath) -> Router {
    Router::new()
        .nest("/api", api_routes(state))
        .nest_service("/static", ServeDir::new(assets_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticCredentials;
    use crate::entities::ClubRegistry;
    use crate::mutator::MutationLatency;
    use crate::registration::{IntakeClient, IntakePayload, IntakeResponse};
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct FixedIntake(&'static str, Option<&'static str>);

    #[async_trait]
    impl IntakeClient for FixedIntake {
        async fn send(&self, _payload: &IntakePayload) -> Result<IntakeResponse, SubmissionError> {
            Ok(IntakeResponse {
                status: self.0.to_string(),
                message: self.1.map(str::to_string),
            })
        }
    }

    fn router_with(intake: FixedIntake) -> (Router, ClubRegistry) {
        let registry = ClubRegistry::new();
        let state = ApiState::new(
            RegistryMutator::new(registry.clone(), MutationLatency::none()),
            Arc::new(StaticCredentials::new()),
            RegistrationSubmitter::new(registry.clone(), Arc::new(intake)),
        );
        (api_routes(state), registry)
    }

    fn router() -> (Router, ClubRegistry) {
        router_with(FixedIntake("success", None))
    }

    fn basic(email: &str, password: &str) -> String {
        format!("Basic {}", STANDARD.encode(format!("{}:{}", email, password)))
    }

    fn admin() -> Option<String> {
        Some(basic("admin@ggct.org", "admin123"))
    }

    async fn call(
        router: Router,
        method: Method,
        uri: &str,
        auth: Option<String>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(auth) = auth {
            builder = builder.header(AUTHORIZATION, auth);
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
        call(router, Method::GET, uri, None, None).await
    }

    fn new_club() -> Value {
        json!({
            "college": "GGCT",
            "name": "Music Club",
            "description": "Bands and open mics",
            "registration_link": "https://forms.gle/music",
            "founding_year": 2014,
            "member_count": 60,
        })
    }

    #[tokio::test]
    async fn test_health() {
        let (router, _) = router();
        let (status, body) = get_json(router, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], "OK");
    }

    #[tokio::test]
    async fn test_list_and_filter_clubs() {
        let (router, _) = router();

        let (status, body) = get_json(router.clone(), "/clubs").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 6);

        let (_, body) = get_json(router.clone(), "/clubs?college=ggce").await;
        let names: Vec<&str> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Web Development Club", "Environmental Club"]);

        let (status, body) = get_json(router, "/clubs?college=XYZ").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_get_club() {
        let (router, _) = router();

        let (status, body) = get_json(router.clone(), "/clubs/1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["past_events"].as_array().unwrap().len(), 2);

        let (status, _) = get_json(router, "/clubs/999").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_colleges_and_stats() {
        let (router, _) = router();

        let (_, body) = get_json(router.clone(), "/colleges").await;
        assert_eq!(body["data"][1]["college"], "GGCT");
        assert_eq!(body["data"][1]["image_path"], "/ggct.png");
        assert_eq!(body["data"][1]["club_count"], 2);

        let (_, body) = get_json(router, "/stats").await;
        assert_eq!(body["data"]["total_clubs"], 6);
        assert_eq!(body["data"]["total_members"], 760);
        assert_eq!(body["data"]["total_events"], 7);
    }

    #[tokio::test]
    async fn test_login() {
        let (router, _) = router();

        let (status, body) = call(
            router.clone(),
            Method::POST,
            "/login",
            None,
            Some(json!({ "email": "admin@ggits.org", "password": "admin123" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["email"], "admin@ggits.org");

        let (status, body) = call(
            router,
            Method::POST,
            "/login",
            None,
            Some(json!({ "email": "admin@ggits.org", "password": "wrong" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid email or password");
    }

    #[tokio::test]
    async fn test_mutations_require_admin() {
        let (router, registry) = router();

        let (status, _) =
            call(router.clone(), Method::POST, "/clubs", None, Some(new_club())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = call(
            router.clone(),
            Method::DELETE,
            "/clubs/1",
            Some(basic("admin@ggits.org", "wrong")),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = call(
            router,
            Method::DELETE,
            "/clubs/1",
            Some("Basic !!!not-base64".to_string()),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        assert_eq!(registry.count(), 6);
    }

    #[tokio::test]
    async fn test_admin_crud() {
        let (router, registry) = router();

        let (status, body) =
            call(router.clone(), Method::POST, "/clubs", admin(), Some(new_club())).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = body["data"]["id"].as_str().unwrap().to_string();
        let uri = format!("/clubs/{}", id);
        assert_eq!(registry.count(), 7);

        let mut edited = new_club();
        edited["member_count"] = json!(75);
        let (status, body) =
            call(router.clone(), Method::PUT, &uri, admin(), Some(edited.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["member_count"], 75);
        assert_eq!(body["data"]["id"], id.as_str());

        let (status, _) =
            call(router.clone(), Method::PUT, "/clubs/ghost", admin(), Some(edited)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let mut invalid = new_club();
        invalid["founding_year"] = json!(1990);
        let (status, body) =
            call(router.clone(), Method::POST, "/clubs", admin(), Some(invalid)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("founding_year"));

        let (status, body) = call(router.clone(), Method::DELETE, &uri, admin(), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["name"], "Music Club");

        let (status, body) = call(router, Method::DELETE, &uri, admin(), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], Value::Null);
        assert_eq!(registry.count(), 6);
    }

    #[tokio::test]
    async fn test_created_club_is_trimmed() {
        let (router, registry) = router();
        let mut padded = new_club();
        padded["name"] = json!("  Music Club ");
        padded["registration_link"] = json!(" https://forms.gle/music\n");

        let (status, body) = call(router, Method::POST, "/clubs", admin(), Some(padded)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["name"], "Music Club");

        let id = body["data"]["id"].as_str().unwrap();
        let stored = registry.find_by_id(id).unwrap();
        assert_eq!(stored.registration_link, "https://forms.gle/music");
    }

    #[tokio::test(start_paused = true)]
    async fn test_mutation_in_flight_elsewhere_is_conflict() {
        let (router, registry) = router();
        let other = RegistryMutator::new(registry.clone(), MutationLatency::default());

        let pending = {
            let other = other.clone();
            tokio::spawn(async move { other.delete("1").await })
        };
        tokio::task::yield_now().await;

        let (status, body) = call(router, Method::DELETE, "/clubs/2", admin(), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["success"], false);
        assert!(registry.contains("2"));

        assert!(pending.await.unwrap().unwrap().is_some());
    }

    fn registration(club: Option<&str>) -> Value {
        json!({
            "selectedCollege": "GGITS",
            "fullName": "Asha Verma",
            "email": "asha@example.com",
            "phoneNumber": "9876543210",
            "branch": "Computer Science",
            "selectedClub": club,
        })
    }

    async fn register(router: Router, club: Option<&str>) -> (StatusCode, Value) {
        call(router, Method::POST, "/registrations", None, Some(registration(club))).await
    }

    #[tokio::test]
    async fn test_registration_success() {
        let (router, _) = router();

        let (status, body) = register(router, Some("1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["openUrl"], "https://forms.gle/abcd123");
        assert_eq!(body["data"]["clubName"], "AI & ML Club");
    }

    #[tokio::test]
    async fn test_registration_without_club() {
        let (router, _) = router();

        let (status, body) = register(router, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Please select a valid club before submitting.");
    }

    #[tokio::test]
    async fn test_registration_rejected() {
        let (router, _) = router_with(FixedIntake("error", Some("duplicate")));

        let (status, body) = register(router, Some("1")).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "Submission failed: duplicate");
    }
}
