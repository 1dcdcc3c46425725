//! Router-level tests for the proxy endpoints.
//!
//! The upstream is a wiremock server and time comes from a manual clock, so
//! the full login -> authenticated request -> cached upstream path runs
//! without network access or sleeping.

use std::io::Read;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use flate2::read::GzDecoder;
use jiff::SignedDuration;
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pokedex_api::AppState;
use pokedex_api::api::routes::create_router;
use pokedex_api::config::{Settings, TokenConfig, UpstreamConfig};
use pokedex_api::utils::clock::ManualClock;

const SECRET: &str = "integration_test_secret_0123456789abcdef";

struct TestApp {
    router: Router,
    clock: ManualClock,
    upstream: MockServer,
}

impl TestApp {
    async fn start() -> Self {
        let upstream = MockServer::start().await;
        let clock = ManualClock::at_second(1_700_000_000);

        let settings = Settings {
            token: TokenConfig {
                secret: SECRET.to_string(),
                ..Default::default()
            },
            upstream: UpstreamConfig {
                base_url: format!("{}/api/v2", upstream.uri()),
                connect_timeout: 1,
                read_timeout: 1,
                ..Default::default()
            },
            ..Default::default()
        };

        let state = AppState::from_settings(&settings, Arc::new(clock.clone()))
            .await
            .unwrap();

        Self {
            router: create_router(state),
            clock,
            upstream,
        }
    }

    async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn login(&self) -> String {
        let response = self
            .send(login_request(json!({"username": "admin", "password": "admin"})))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        body_json(response).await["token"]
            .as_str()
            .unwrap()
            .to_string()
    }

    async fn get(&self, uri: &str, token: Option<&str>) -> Response {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }
}

fn login_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn assert_error(response: Response, status: StatusCode, code: &str) -> Value {
    assert_eq!(response.status(), status);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], code, "body: {}", body);
    body
}

fn pikachu() -> Value {
    json!({
        "id": 25,
        "name": "pikachu",
        "height": 4,
        "weight": 60,
        "base_experience": 112,
        "types": [{"slot": 1, "type": {"name": "electric"}}],
        "abilities": [{"ability": {"name": "static"}, "is_hidden": false}],
        "sprites": {
            "front_default": "https://example.test/25.png",
            "other": {"official-artwork": {"front_default": "https://example.test/art/25.png"}}
        },
        "stats": [{"base_stat": 35, "stat": {"name": "hp"}}]
    })
}

// ============================================================================
// Health and login
// ============================================================================

#[tokio::test]
async fn liveness_is_public() {
    let app = TestApp::start().await;
    let response = app.get("/up", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn login_issues_bearer_token() {
    let app = TestApp::start().await;
    let response = app
        .send(login_request(json!({"username": "admin", "password": "admin"})))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 86_400);
    assert!(!body["token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn login_rejects_wrong_or_missing_credentials() {
    let app = TestApp::start().await;

    for body in [
        json!({"username": "admin", "password": "wrong"}),
        json!({"username": "ash"}),
        json!({}),
    ] {
        let body = assert_error(
            app.send(login_request(body)).await,
            StatusCode::UNAUTHORIZED,
            "INVALID_CREDENTIALS",
        )
        .await;
        assert_eq!(body["error"]["message"], "Invalid username or password");
    }
}

#[tokio::test]
async fn login_rejects_malformed_json() {
    let app = TestApp::start().await;
    let request = Request::builder()
        .method("POST")
        .uri("/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    assert_error(app.send(request).await, StatusCode::BAD_REQUEST, "INVALID_REQUEST").await;
}

// ============================================================================
// Authentication on protected routes
// ============================================================================

#[tokio::test]
async fn missing_header_is_missing_token() {
    let app = TestApp::start().await;
    let body = assert_error(
        app.get("/pokemons", None).await,
        StatusCode::UNAUTHORIZED,
        "MISSING_TOKEN",
    )
    .await;
    assert_eq!(body["error"]["message"], "Authorization header is required");
}

#[tokio::test]
async fn non_bearer_header_is_missing_token() {
    let app = TestApp::start().await;
    let request = Request::builder()
        .uri("/pokemons")
        .header(header::AUTHORIZATION, "Basic YWRtaW46YWRtaW4=")
        .body(Body::empty())
        .unwrap();

    assert_error(app.send(request).await, StatusCode::UNAUTHORIZED, "MISSING_TOKEN").await;
}

#[tokio::test]
async fn forged_token_is_invalid() {
    let app = TestApp::start().await;
    let body = assert_error(
        app.get("/pokemons", Some("not.a.token")).await,
        StatusCode::UNAUTHORIZED,
        "INVALID_TOKEN",
    )
    .await;
    assert_eq!(body["error"]["message"], "Token is invalid");
}

#[tokio::test]
async fn expired_token_is_reported_as_expired() {
    let app = TestApp::start().await;
    let token = app.login().await;

    app.clock.advance(SignedDuration::from_hours(24) + SignedDuration::from_secs(1));

    let body = assert_error(
        app.get("/pokemons/25", Some(&token)).await,
        StatusCode::UNAUTHORIZED,
        "EXPIRED_TOKEN",
    )
    .await;
    assert_eq!(body["error"]["message"], "Token has expired");
}

#[tokio::test]
async fn scheme_is_case_insensitive() {
    let app = TestApp::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/pokemon/25"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pikachu()))
        .mount(&app.upstream)
        .await;

    let token = app.login().await;
    let request = Request::builder()
        .uri("/pokemons/25")
        .header(header::AUTHORIZATION, format!("bearer {}", token))
        .body(Body::empty())
        .unwrap();

    assert_eq!(app.send(request).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn error_body_carries_request_id() {
    let app = TestApp::start().await;
    let request = Request::builder()
        .uri("/pokemons")
        .header("x-request-id", "trace-me-123")
        .body(Body::empty())
        .unwrap();

    let response = app.send(request).await;
    assert_eq!(response.headers()["x-request-id"], "trace-me-123");
    let body = assert_error(response, StatusCode::UNAUTHORIZED, "MISSING_TOKEN").await;
    assert_eq!(body["error"]["request_id"], "trace-me-123");
}

#[tokio::test]
async fn error_envelope_decodes_when_gzip_is_accepted() {
    let app = TestApp::start().await;
    let request = Request::builder()
        .uri("/pokemons")
        .header(header::ACCEPT_ENCODING, "gzip")
        .header("x-request-id", "gzip-client")
        .body(Body::empty())
        .unwrap();

    let response = app.send(request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let encoding = response
        .headers()
        .get(header::CONTENT_ENCODING)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let raw = match encoding.as_deref() {
        Some("gzip") => {
            let mut decoded = Vec::new();
            GzDecoder::new(&bytes[..]).read_to_end(&mut decoded).unwrap();
            decoded
        }
        None => bytes.to_vec(),
        Some(other) => panic!("unexpected content-encoding {}", other),
    };

    let body: Value = serde_json::from_slice(&raw).unwrap();
    assert_eq!(body["error"]["code"], "MISSING_TOKEN");
    assert_eq!(body["error"]["request_id"], "gzip-client");
}

// ============================================================================
// Resource endpoints
// ============================================================================

#[tokio::test]
async fn list_is_reshaped_with_ids() {
    let app = TestApp::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/pokemon"))
        .and(query_param("offset", "20"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1302,
            "next": "https://pokeapi.co/api/v2/pokemon?offset=30&limit=10",
            "previous": "https://pokeapi.co/api/v2/pokemon?offset=10&limit=10",
            "results": [
                {"name": "spearow", "url": "https://pokeapi.co/api/v2/pokemon/21/"},
                {"name": "fearow", "url": "https://pokeapi.co/api/v2/pokemon/22/"}
            ]
        })))
        .expect(1)
        .mount(&app.upstream)
        .await;

    let token = app.login().await;
    let response = app.get("/pokemons?offset=20&limit=10", Some(&token)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["count"], 1302);
    assert!(body["results"].as_array().unwrap().len() <= 10);
    assert_eq!(
        body["results"][0],
        json!({"id": 21, "name": "spearow", "url": "https://pokeapi.co/api/v2/pokemon/21/"})
    );
}

#[tokio::test]
async fn list_uses_default_pagination() {
    let app = TestApp::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/pokemon"))
        .and(query_param("offset", "0"))
        .and(query_param("limit", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 0, "next": null, "previous": null, "results": []
        })))
        .expect(1)
        .mount(&app.upstream)
        .await;

    let token = app.login().await;
    assert_eq!(
        app.get("/pokemons", Some(&token)).await.status(),
        StatusCode::OK
    );
}

#[tokio::test]
async fn large_offset_is_forwarded_upstream() {
    let app = TestApp::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/pokemon"))
        .and(query_param("offset", "99999999999"))
        .and(query_param("limit", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1302, "next": null, "previous": null, "results": []
        })))
        .expect(1)
        .mount(&app.upstream)
        .await;

    let token = app.login().await;
    let response = app
        .get("/pokemons?offset=99999999999", Some(&token))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["results"], json!([]));
}

#[tokio::test]
async fn invalid_pagination_is_rejected_before_upstream() {
    let app = TestApp::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.upstream)
        .await;

    let token = app.login().await;

    for uri in ["/pokemons?offset=-1", "/pokemons?offset=abc", "/pokemons?offset=1.5"] {
        let body = assert_error(
            app.get(uri, Some(&token)).await,
            StatusCode::BAD_REQUEST,
            "INVALID_OFFSET",
        )
        .await;
        assert_eq!(body["error"]["message"], "Offset must be a non-negative integer");
    }

    for uri in ["/pokemons?limit=0", "/pokemons?limit=101", "/pokemons?limit=abc"] {
        let body = assert_error(
            app.get(uri, Some(&token)).await,
            StatusCode::BAD_REQUEST,
            "INVALID_LIMIT",
        )
        .await;
        assert_eq!(
            body["error"]["message"],
            "Limit must be an integer between 1 and 100"
        );
    }
}

#[tokio::test]
async fn detail_is_reshaped_and_cached_case_insensitively() {
    let app = TestApp::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/pokemon/pikachu"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pikachu()))
        .expect(1)
        .mount(&app.upstream)
        .await;

    let token = app.login().await;

    let first = app.get("/pokemons/pikachu", Some(&token)).await;
    assert_eq!(first.status(), StatusCode::OK);
    let body = body_json(first).await;
    assert_eq!(
        body,
        json!({
            "id": 25,
            "name": "pikachu",
            "height": 4,
            "weight": 60,
            "base_experience": 112,
            "types": ["electric"],
            "abilities": [{"name": "static", "is_hidden": false}],
            "sprites": {
                "front_default": "https://example.test/25.png",
                "official_artwork": "https://example.test/art/25.png"
            },
            "stats": {"hp": 35}
        })
    );

    let second = app.get("/pokemons/PIKACHU", Some(&token)).await;
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(body_json(second).await["id"], 25);
}

#[tokio::test]
async fn unknown_resource_is_not_found() {
    let app = TestApp::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/pokemon/missingno"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .expect(2)
        .mount(&app.upstream)
        .await;

    let token = app.login().await;
    for _ in 0..2 {
        let body = assert_error(
            app.get("/pokemons/missingno", Some(&token)).await,
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
        )
        .await;
        assert_eq!(body["error"]["message"], "Pokemon not found");
    }
}

#[tokio::test]
async fn upstream_failure_is_bad_gateway() {
    let app = TestApp::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/pokemon/25"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.upstream)
        .await;

    let token = app.login().await;
    let body = assert_error(
        app.get("/pokemons/25", Some(&token)).await,
        StatusCode::BAD_GATEWAY,
        "UPSTREAM_ERROR",
    )
    .await;
    assert_eq!(body["error"]["message"], "Failed to fetch data from PokeAPI");
}

#[tokio::test]
async fn upstream_recovery_is_not_masked_by_cache() {
    let app = TestApp::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/pokemon/25"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&app.upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/pokemon/25"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pikachu()))
        .mount(&app.upstream)
        .await;

    let token = app.login().await;
    assert_eq!(
        app.get("/pokemons/25", Some(&token)).await.status(),
        StatusCode::BAD_GATEWAY
    );
    assert_eq!(
        app.get("/pokemons/25", Some(&token)).await.status(),
        StatusCode::OK
    );
}

#[tokio::test]
async fn unknown_route_uses_error_envelope() {
    let app = TestApp::start().await;
    assert_error(app.get("/nowhere", None).await, StatusCode::NOT_FOUND, "NOT_FOUND").await;
}
