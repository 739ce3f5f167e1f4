//! # Authentication Middleware
//!
//! Resolves the acting user of a request from its bearer token.
//!
//! ## Token Format
//!
//! ```text
//! Bearer {actor_id}:{secret}   — when AUTH_TOKEN is configured
//! Bearer {actor_id}            — when no secret is configured (development)
//! ```
//!
//! Requests without an `Authorization` header proceed anonymously. Command
//! handlers then answer with the interpreter's login-required responses,
//! and mutating REST handlers reject with 401.

use axum::extract::Request;
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use subtle::ConstantTimeEq;

use nebula_core::ActorId;

use crate::error::{AppError, ErrorBody, ErrorDetail};

// ── CallerIdentity ──────────────────────────────────────────────────────────

/// The acting user of a request, injected into request extensions by
/// [`auth_middleware`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CallerIdentity {
    /// `None` for anonymous requests.
    pub actor: Option<ActorId>,
}

impl CallerIdentity {
    pub fn anonymous() -> Self {
        Self { actor: None }
    }

    /// The actor, or 401 for anonymous callers.
    pub fn require_actor(&self) -> Result<&ActorId, AppError> {
        self.actor
            .as_ref()
            .ok_or_else(|| AppError::Unauthorized("a logged-in actor is required".into()))
    }
}

impl<S: Send + Sync> axum::extract::FromRequestParts<S> for CallerIdentity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CallerIdentity>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("no caller identity in request context".into()))
    }
}

// ── Auth Configuration ──────────────────────────────────────────────────────

/// Auth configuration injected into request extensions.
///
/// Custom `Debug` redacts the secret.
#[derive(Clone, Default)]
pub struct AuthConfig {
    pub secret: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

// ── Token Validation ────────────────────────────────────────────────────────

/// Constant-time comparison of secrets.
fn constant_time_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        // Dummy comparison to keep timing independent of the length match.
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

/// Parse a bearer token into the caller's identity.
pub fn parse_bearer_token(provided: &str, secret: Option<&str>) -> Result<CallerIdentity, String> {
    let (actor, presented) = match provided.split_once(':') {
        Some((actor, presented)) => (actor, Some(presented)),
        None => (provided, None),
    };

    if let Some(expected) = secret {
        match presented {
            Some(presented) if constant_time_eq(presented, expected) => {}
            Some(_) => return Err("invalid bearer token".into()),
            None => return Err("invalid token format, expected {actor_id}:{secret}".into()),
        }
    }

    let actor = ActorId::new(actor).map_err(|e| format!("invalid actor: {e}"))?;
    Ok(CallerIdentity { actor: Some(actor) })
}

// ── Middleware ───────────────────────────────────────────────────────────────

/// Resolve the caller from the `Authorization` header and inject a
/// [`CallerIdentity`] into request extensions.
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let config = request
        .extensions()
        .get::<AuthConfig>()
        .cloned()
        .unwrap_or_default();

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let identity = match auth_header {
        None => CallerIdentity::anonymous(),
        Some(value) => match value.strip_prefix("Bearer ") {
            Some(token) => match parse_bearer_token(token.trim(), config.secret.as_deref()) {
                Ok(identity) => identity,
                Err(msg) => {
                    tracing::warn!(reason = %msg, "authentication failed: invalid bearer token");
                    return unauthorized_response(&msg);
                }
            },
            None => {
                tracing::warn!("authentication failed: non-Bearer authorization scheme");
                return unauthorized_response("authorization header must use Bearer scheme");
            }
        },
    };

    request.extensions_mut().insert(identity);
    next.run(request).await
}

fn unauthorized_response(message: &str) -> Response {
    let body = ErrorBody {
        error: ErrorDetail {
            code: "UNAUTHORIZED".to_string(),
            message: message.to_string(),
            details: None,
        },
    };
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::middleware::from_fn;
    use axum::routing::get;
    use axum::Router;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_app(secret: Option<&str>) -> Router {
        let auth_config = AuthConfig {
            secret: secret.map(str::to_string),
        };
        Router::new()
            .route(
                "/whoami",
                get(|caller: CallerIdentity| async move {
                    caller
                        .actor
                        .map(|a| a.to_string())
                        .unwrap_or_else(|| "anonymous".into())
                }),
            )
            .layer(from_fn(auth_middleware))
            .layer(axum::Extension(auth_config))
    }

    async fn whoami(app: Router, header: Option<&str>) -> (StatusCode, String) {
        let mut builder = Request::builder().uri("/whoami");
        if let Some(value) = header {
            builder = builder.header("authorization", value);
        }
        let response = app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[test]
    fn token_with_secret() {
        let identity = parse_bearer_token("user1:s3cret", Some("s3cret")).unwrap();
        assert_eq!(identity.actor.unwrap().as_str(), "user1");
        assert!(parse_bearer_token("user1:wrong", Some("s3cret")).is_err());
        assert!(parse_bearer_token("user1", Some("s3cret")).is_err());
    }

    #[test]
    fn token_without_secret_is_the_actor() {
        let identity = parse_bearer_token("user4", None).unwrap();
        assert_eq!(identity.actor.unwrap().as_str(), "user4");
        assert!(parse_bearer_token("", None).is_err());
    }

    #[test]
    fn debug_redacts_secret() {
        let config = AuthConfig {
            secret: Some("s3cret".into()),
        };
        assert!(!format!("{config:?}").contains("s3cret"));
    }

    #[tokio::test]
    async fn missing_header_is_anonymous() {
        let (status, body) = whoami(test_app(Some("s3cret")), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "anonymous");
    }

    #[tokio::test]
    async fn valid_token_resolves_actor() {
        let (status, body) = whoami(test_app(Some("s3cret")), Some("Bearer user2:s3cret")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "user2");
    }

    #[tokio::test]
    async fn wrong_secret_is_rejected() {
        let (status, body) = whoami(test_app(Some("s3cret")), Some("Bearer user2:nope")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("UNAUTHORIZED"));
    }

    #[tokio::test]
    async fn basic_scheme_is_rejected() {
        let (status, _) = whoami(test_app(None), Some("Basic dXNlcjE6cHc=")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
