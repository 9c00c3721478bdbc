use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, Request, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};
use medlab_api::ApiError;
use medlab_auth::{AccessDecision, AuthState, Principal, parse_basic_auth};

// =============================================================================
// Security Middleware
// =============================================================================

/// HTTP Basic authentication and per-route access checks.
///
/// This middleware:
/// 1. Lets everything through when security is disabled
/// 2. Authenticates the `Authorization: Basic` header when one is present;
///    bad credentials are rejected with 401 on every route
/// 3. Asks the [`SecurityPolicy`](medlab_auth::SecurityPolicy) for a decision
/// 4. Stores the [`Principal`] in request extensions for downstream use
pub async fn security_middleware(
    State(state): State<AuthState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if !state.enabled {
        return next.run(req).await;
    }

    let header = req.headers().get(AUTHORIZATION).cloned();
    let principal = match authenticate(&state, header.as_ref()).await {
        Ok(principal) => principal,
        Err(response) => return response,
    };

    let decision = state
        .policy
        .decide(req.method(), req.uri().path(), principal.as_ref());

    match decision {
        AccessDecision::Permit => {
            if let Some(principal) = principal {
                req.extensions_mut().insert(principal);
            }
            next.run(req).await
        }
        AccessDecision::Unauthenticated => {
            tracing::debug!(path = %req.uri().path(), "No Authorization header");
            ApiError::unauthorized_with_challenge("Full authentication is required", state.challenge())
                .into_response()
        }
        AccessDecision::Forbidden { required } => {
            tracing::info!(
                path = %req.uri().path(),
                required = %required,
                "Access denied"
            );
            ApiError::forbidden(format!("Authority {required} is required")).into_response()
        }
    }
}

/// Checks the Basic credentials of a request, if it carries any.
async fn authenticate(
    state: &AuthState,
    header: Option<&HeaderValue>,
) -> Result<Option<Principal>, Response> {
    let Some(header) = header else {
        return Ok(None);
    };

    let unauthorized = |message: &str| {
        ApiError::unauthorized_with_challenge(message, state.challenge()).into_response()
    };

    let header = header
        .to_str()
        .map_err(|_| unauthorized("Invalid Authorization header"))?;
    let credentials = parse_basic_auth(header).map_err(|e| {
        tracing::debug!(error = %e, "Unparseable Authorization header");
        unauthorized("Invalid Authorization header")
    })?;

    match state.authenticate(&credentials).await {
        Ok(principal) => {
            tracing::debug!(username = %principal.username, "Authenticated");
            Ok(Some(principal))
        }
        Err(e) => {
            tracing::info!(error = %e, "Authentication failed");
            Err(unauthorized("Bad credentials"))
        }
    }
}
