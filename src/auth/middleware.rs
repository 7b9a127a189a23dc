//! Session Middleware
//!
//! Axum middleware wrapping [`SessionAuth::authorize`].

use axum::{
    extract::{Request, State},
    http::header::SET_COOKIE,
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::session::{Authorization, SessionAuth};

/// Rejects requests without a live session and refreshes the session cookie
/// on those that pass.
///
/// Mount with `axum::middleware::from_fn_with_state(auth, require_session)`.
pub async fn require_session(
    State(auth): State<SessionAuth>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let outcome = auth.authorize(&path, request.headers()).await;

    match outcome {
        Ok(Authorization::Bypassed) => next.run(request).await,
        Ok(Authorization::Session(token)) => {
            let mut response = next.run(request).await;
            if let Some(cookie) = auth.session_cookie(&token) {
                response.headers_mut().append(SET_COOKIE, cookie);
            }
            response
        }
        Err(err) => err.into_response(),
    }
}
