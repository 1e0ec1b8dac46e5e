use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use cookie::{Cookie, SameSite};
use tracing::debug;

use super::SharedState;

pub const SESSION_COOKIE: &str = "checkpoint_session";

/// Sends requests without a live admin session to the login form.
pub async fn require_admin(
    State(state): State<SharedState>,
    request: Request,
    next: Next,
) -> Response {
    match session_id(request.headers()) {
        Some(id) if state.sessions.is_authenticated(&id) => next.run(request).await,
        _ => {
            debug!(path = %request.uri().path(), "no admin session, redirecting to login");
            Redirect::to("/admin").into_response()
        }
    }
}

pub fn session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|c| c.name() == SESSION_COOKIE)
        .map(|c| c.value().to_string())
}

pub fn session_cookie(id: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    cookie.make_removal();
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn session_id_is_read_from_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; checkpoint_session=abc; other=1"),
        );
        assert_eq!(session_id(&headers).as_deref(), Some("abc"));
    }

    #[test]
    fn missing_cookie_yields_none() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark"));
        assert_eq!(session_id(&headers), None);
        assert_eq!(session_id(&HeaderMap::new()), None);
    }

    #[test]
    fn session_cookie_is_http_only() {
        let rendered = session_cookie("abc".into()).to_string();
        assert!(rendered.starts_with("checkpoint_session=abc"));
        assert!(rendered.contains("HttpOnly"));
        assert!(rendered.contains("SameSite=Lax"));
    }

    #[test]
    fn removal_cookie_expires_immediately() {
        let rendered = removal_cookie().to_string();
        assert!(rendered.contains("Max-Age=0"));
    }
}
