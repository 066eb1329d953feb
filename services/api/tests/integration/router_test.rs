use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use axum::response::Response;
use axum::routing::get;
use axum::{Extension, Router, middleware};
use sea_orm::DatabaseConnection;
use tower::ServiceExt;
use uuid::Uuid;

use dietcare_api::auth::{PrincipalSource, resolve_principal};
use dietcare_api::router::build_router;
use dietcare_api::state::AppState;
use dietcare_api::usecase::session::{ResolvePrincipalUseCase, ValidatePatientCodeUseCase};
use dietcare_auth_types::principal::{OAuthUser, PatientPrincipal, Principal, ProfessionalPrincipal};
use dietcare_domain::id::{PatientId, ProfessionalId};
use dietcare_testing::auth::{MockCredentials, TEST_JWT_SECRET};

use crate::helpers::{MemoryDb, MemorySessions, TTL_SECS, test_patient, test_professional};

// ── Deployed router ──────────────────────────────────────────────────────────

/// Application state whose stores are never reached: every request below is
/// rejected before a handler touches the database or redis.
fn offline_state() -> AppState {
    let redis = deadpool_redis::Config::from_url("redis://127.0.0.1:1/")
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .unwrap();
    AppState {
        db: DatabaseConnection::default(),
        redis,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
        session_ttl_secs: TTL_SECS,
        cookie_secure: false,
        rotate_code_on_weight: false,
    }
}

/// The deployed router with `principal` already attached, as if resolved upstream.
/// Requests carry no credentials, so the resolver leaves it in place.
fn app_as(principal: Principal) -> Router {
    build_router(offline_state()).layer(Extension(principal))
}

async fn send(app: Router, method: Method, uri: &str, body: Option<&str>) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
    }
    let req = builder
        .body(body.map(|b| Body::from(b.to_owned())).unwrap_or_else(Body::empty))
        .unwrap();
    app.oneshot(req).await.unwrap()
}

async fn json_body(resp: Response) -> serde_json::Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn should_answer_healthz_with_request_id() {
    let resp = send(build_router(offline_state()), Method::GET, "/healthz", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn should_reject_anonymous_callers_on_protected_routes() {
    let patient = Uuid::new_v4();
    let routes = [
        (Method::GET, "/api/patient/current".to_owned()),
        (Method::GET, "/api/patient/weight".to_owned()),
        (Method::GET, "/api/patient/mood".to_owned()),
        (Method::POST, "/api/patient/mood".to_owned()),
        (Method::GET, "/api/patient/meal-plans".to_owned()),
        (Method::POST, "/api/professional/register".to_owned()),
        (Method::GET, "/api/professional/profile".to_owned()),
        (Method::POST, "/api/professional/access-code".to_owned()),
        (Method::GET, "/api/professional/patients".to_owned()),
        (Method::POST, "/api/professional/patients".to_owned()),
        (Method::GET, format!("/api/professional/patients/{patient}")),
        (Method::GET, format!("/api/professional/patients/{patient}/weight")),
        (Method::GET, "/api/diet-levels".to_owned()),
        (Method::GET, "/api/recipes".to_owned()),
    ];
    for (method, uri) in routes {
        let body = (method == Method::POST).then_some("{}");
        let resp = send(build_router(offline_state()), method.clone(), &uri, body).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
        assert_eq!(json_body(resp).await["kind"], "UNAUTHENTICATED", "{method} {uri}");
    }
}

#[tokio::test]
async fn should_forbid_patient_on_professional_routes() {
    let app = app_as(Principal::Patient(PatientId(Uuid::new_v4())));
    let resp = send(app, Method::GET, "/api/professional/patients", None).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(json_body(resp).await["kind"], "FORBIDDEN");
}

#[tokio::test]
async fn should_forbid_professional_on_patient_routes() {
    let app = app_as(Principal::Professional(ProfessionalId(Uuid::new_v4())));
    let resp = send(app, Method::GET, "/api/patient/current", None).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(json_body(resp).await["kind"], "FORBIDDEN");
}

#[tokio::test]
async fn should_reject_mistyped_patient_body_as_bad_request() {
    let app = app_as(Principal::Professional(ProfessionalId(Uuid::new_v4())));
    let resp = send(
        app,
        Method::POST,
        "/api/professional/patients",
        Some(r#"{"firstName":"A","lastName":"B","dietLevel":2,"weight":"heavy"}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = json_body(resp).await;
    assert_eq!(json["kind"], "INVALID_BODY");
    assert!(json["message"].as_str().unwrap().contains("weight"));
}

#[tokio::test]
async fn should_reject_malformed_json_as_bad_request() {
    let resp = send(
        build_router(offline_state()),
        Method::POST,
        "/api/patient/validate",
        Some(r#"{"accessCode":"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["kind"], "INVALID_BODY");

    let resp = send(
        build_router(offline_state()),
        Method::POST,
        "/api/professional/validate",
        Some(r#"{"accessCode":5}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["kind"], "INVALID_BODY");
}

#[tokio::test]
async fn should_reject_bad_path_and_query_as_bad_request() {
    let professional = Principal::Professional(ProfessionalId(Uuid::new_v4()));

    let resp = send(
        app_as(professional),
        Method::GET,
        "/api/professional/patients/not-a-uuid",
        None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["kind"], "INVALID_BODY");

    let resp = send(
        app_as(professional),
        Method::GET,
        "/api/recipes?diet-level=abc",
        None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["kind"], "INVALID_BODY");
}

// ── Credential resolution through the middleware ─────────────────────────────

#[derive(Clone)]
struct MemoryState {
    db: MemoryDb,
    sessions: MemorySessions,
}

impl PrincipalSource for MemoryState {
    type Patients = MemoryDb;
    type Professionals = MemoryDb;
    type Sessions = MemorySessions;

    fn principal_resolver(
        &self,
    ) -> ResolvePrincipalUseCase<'_, MemoryDb, MemoryDb, MemorySessions> {
        ResolvePrincipalUseCase {
            patients: self.db.clone(),
            professionals: self.db.clone(),
            sessions: self.sessions.clone(),
            jwt_secret: TEST_JWT_SECRET,
        }
    }
}

async fn current_patient(PatientPrincipal(id): PatientPrincipal) -> String {
    id.0.to_string()
}

async fn list_patients(ProfessionalPrincipal(id): ProfessionalPrincipal) -> String {
    id.0.to_string()
}

async fn register(OAuthUser(identity): OAuthUser) -> String {
    identity.user_id.0.to_string()
}

/// Route shapes of the deployed router, guarded the same way but served from memory.
fn guarded(state: MemoryState) -> Router {
    Router::new()
        .route("/api/patient/current", get(current_patient))
        .route("/api/professional/patients", get(list_patients))
        .route("/api/professional/register", get(register))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            resolve_principal::<MemoryState>,
        ))
        .with_state(state)
}

async fn call(state: &MemoryState, uri: &str, creds: MockCredentials) -> (StatusCode, String) {
    let mut req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    *req.headers_mut() = creds.headers();
    let resp = guarded(state.clone()).oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn memory_state() -> MemoryState {
    MemoryState {
        db: MemoryDb::new(),
        sessions: MemorySessions::new(),
    }
}

#[tokio::test]
async fn should_reject_request_without_credentials() {
    let state = memory_state();
    let (status, _) = call(&state, "/api/patient/current", MockCredentials::new()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_route_patient_session_cookie() {
    let state = memory_state();
    let pro = test_professional("PRO00001");
    let patient = test_patient(pro.id, "AB12CD34");
    state.db.insert_professional(pro);
    state.db.insert_patient(patient.clone());
    let validated = ValidatePatientCodeUseCase {
        patients: state.db.clone(),
        sessions: state.sessions.clone(),
        session_ttl_secs: TTL_SECS,
    }
    .execute("AB12CD34", None)
    .await
    .unwrap();

    let creds = || MockCredentials::new().session(&validated.session_id);
    let (status, body) = call(&state, "/api/patient/current", creds()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, patient.id.0.to_string());

    let (status, _) = call(&state, "/api/professional/patients", creds()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn should_forbid_professional_code_on_patient_route() {
    let state = memory_state();
    let pro = test_professional("PRO00001");
    state.db.insert_professional(pro.clone());

    let creds = || MockCredentials::new().professional_code("PRO00001");
    let (status, _) = call(&state, "/api/patient/current", creds()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call(&state, "/api/professional/patients", creds()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, pro.id.0.to_string());
}

#[tokio::test]
async fn should_treat_unknown_code_as_anonymous() {
    let state = memory_state();
    let creds = MockCredentials::new().professional_code("ZZZZ9999");
    let (status, _) = call(&state, "/api/professional/patients", creds).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_expose_oauth_identity_to_registration() {
    let state = memory_state();
    let user = Uuid::new_v4();
    let creds = MockCredentials::new().oauth(user, TEST_JWT_SECRET);
    let (status, body) = call(&state, "/api/professional/register", creds).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, user.to_string());
}
