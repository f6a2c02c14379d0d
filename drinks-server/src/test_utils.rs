use crate::config::Settings;
use crate::create_app;
use crate::state::AppState;
use axum::body::Body;
use axum::Router;
use http::{HeaderMap, Method, Request, StatusCode};
use http_body_util::BodyExt;
use jsonwebtoken::{encode, get_current_timestamp, Algorithm, EncodingKey, Header};
use log::LevelFilter;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;

/// Key id under which the test signing key is published
pub const TEST_KEY_ID: &str = "drinks-test-key";

/// Subject of tokens issued by [`TestFixture::token`]
pub const TEST_SUBJECT: &str = "auth0|test-barista";

const SIGNING_KEY_PEM: &str = include_str!("../testdata/jwt_signing_key.pem");
const SIGNING_KEY_MODULUS: &str = "2vjP1xj86HnD14BTsBvHIX56zMqIPM0tXpHGre9sqHBTZMyg_pvB_A-ci3Tq8j-xCj_sBra1G55n6e8sW-06Rc7abY6S0aTbwsxhjXV_bsHAONK6qFys_Thx2QdBqVE0s46hU_pMNsjGIJfaEdoHhQqvHtg0ufA_XI8n63RCWsTiSxbjhLDYLtmwCuXCNlEmLjpZeY4m5Mj2s0nHCCjwkjnlj5IJ3C0zk7EsVdOw4rpsHfnz02pAyZXK3Q3iAZgKSEHioTiN-Lu6j2WVuw0Xyrhla_IZQlF_WRqxCM6_6sB0lkiaCMrQ5Ydl5PkfILAA5CwJDoXebzJyBHbcX3LKAw";
const SIGNING_KEY_EXPONENT: &str = "AQAB";

/// Key set publishing the public half of the test signing key
pub fn jwks_document() -> Value {
    json!({
        "keys": [{
            "kty": "RSA",
            "use": "sig",
            "alg": "RS256",
            "kid": TEST_KEY_ID,
            "n": SIGNING_KEY_MODULUS,
            "e": SIGNING_KEY_EXPONENT,
        }]
    })
}

/// Test fixture for exercising the full application.
///
/// Serves the test key set from a mock identity provider, opens an in-memory
/// SQLite store and signs tokens the application accepts.
///
/// ```rust
/// #[tokio::test]
/// async fn test_endpoint() {
///     let fixture = TestFixture::new().await;
///     let token = fixture.token(&["get:drinks-detail"]);
///
///     let response = fixture.get("/drinks-detail", Some(&token)).await;
///     response.assert_ok();
/// }
/// ```
pub struct TestFixture {
    /// The application router
    pub app: Router,
    /// Shared application state, for reaching into the store directly
    pub state: AppState,
    /// Configuration settings
    pub settings: Settings,
    /// Mock identity provider publishing the key set
    pub jwks_mock: MockServer,
}

impl TestFixture {
    pub async fn new() -> Self {
        let _ = env_logger::builder()
            .filter_level(LevelFilter::Debug)
            .is_test(true)
            .try_init();

        let jwks_mock = MockServer::start().await;
        Mock::given(matchers::method("GET"))
            .and(matchers::path("/.well-known/jwks.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(jwks_document()))
            .mount(&jwks_mock)
            .await;

        let settings = Settings::for_test_with_mocks(&jwks_mock);
        let state = AppState::new(settings.clone())
            .await
            .expect("Failed to create test state");
        let app = create_app(state.clone());

        Self {
            app,
            state,
            settings,
            jwks_mock,
        }
    }

    /// Valid claims for the configured issuer and audience, expiring in an hour
    pub fn claims(&self, permissions: &[&str]) -> Value {
        json!({
            "sub": TEST_SUBJECT,
            "iss": self.settings.auth.issuer(),
            "aud": self.settings.auth.audience,
            "iat": get_current_timestamp(),
            "exp": get_current_timestamp() + 3600,
            "permissions": permissions,
        })
    }

    /// Sign arbitrary claims with the test key, advertising `kid`
    pub fn sign(&self, claims: &Value, kid: &str) -> String {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(kid.to_string());
        let key = EncodingKey::from_rsa_pem(SIGNING_KEY_PEM.as_bytes())
            .expect("Failed to load test signing key");
        encode(&header, claims, &key).expect("Failed to sign test token")
    }

    /// A valid token granting `permissions`
    pub fn token(&self, permissions: &[&str]) -> String {
        self.sign(&self.claims(permissions), TEST_KEY_ID)
    }

    /// Creates a request builder with an optional bearer token and a JSON content type
    pub fn request_builder(
        &self,
        method: Method,
        uri: impl AsRef<str>,
        token: Option<&str>,
    ) -> http::request::Builder {
        let mut builder = Request::builder().method(method).uri(uri.as_ref());
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        builder.header("Content-Type", "application/json")
    }

    pub async fn get(&self, uri: impl AsRef<str>, token: Option<&str>) -> TestResponse {
        let request = self
            .request_builder(Method::GET, uri, token)
            .body(Body::empty())
            .expect("Failed to build request");
        self.send(request).await
    }

    pub async fn post<T: Serialize>(
        &self,
        uri: impl AsRef<str>,
        token: Option<&str>,
        body: &T,
    ) -> TestResponse {
        self.send_json(Method::POST, uri, token, body).await
    }

    pub async fn patch<T: Serialize>(
        &self,
        uri: impl AsRef<str>,
        token: Option<&str>,
        body: &T,
    ) -> TestResponse {
        self.send_json(Method::PATCH, uri, token, body).await
    }

    pub async fn delete(&self, uri: impl AsRef<str>, token: Option<&str>) -> TestResponse {
        let request = self
            .request_builder(Method::DELETE, uri, token)
            .body(Body::empty())
            .expect("Failed to build request");
        self.send(request).await
    }

    pub async fn send_json<T: Serialize>(
        &self,
        method: Method,
        uri: impl AsRef<str>,
        token: Option<&str>,
        body: &T,
    ) -> TestResponse {
        let json_body = serde_json::to_vec(body).expect("Failed to serialize body to JSON");
        let request = self
            .request_builder(method, uri, token)
            .body(Body::from(json_body))
            .expect("Failed to build request");
        self.send(request).await
    }

    /// Sends a request through the router and collects the response
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes();

        // Try to parse as JSON, defaulting to empty object if parsing fails or empty body
        let json = if !body.is_empty() {
            serde_json::from_slice(&body).unwrap_or_else(|_| json!({}))
        } else {
            json!({})
        };

        TestResponse {
            status,
            headers,
            json,
        }
    }
}

/// Response from a test request with its status and JSON body
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub json: Value,
}

impl TestResponse {
    /// Asserts that the response has the expected status code.
    ///
    /// # Panics
    ///
    /// Panics if the status code doesn't match the expected value.
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status,
            expected,
            "Expected status {} but got {} with body: {}",
            expected,
            self.status,
            serde_json::to_string_pretty(&self.json).unwrap_or_default()
        );
        self
    }

    pub fn assert_ok(&self) -> &Self {
        self.assert_status(StatusCode::OK)
    }

    /// Asserts the uniform error envelope with the given status
    pub fn assert_error(&self, expected: StatusCode) -> &Self {
        self.assert_status(expected);
        assert_eq!(self.json["success"], false);
        assert_eq!(self.json["error"], expected.as_u16());
        assert!(self.json["message"].is_string());
        self
    }

    /// Converts the response body to the specified type.
    ///
    /// # Panics
    ///
    /// Panics if deserialization fails.
    pub fn json_as<T: DeserializeOwned>(&self) -> T {
        serde_json::from_value(self.json.clone()).expect("Failed to deserialize response JSON")
    }
}
