use axum::{
    Form, Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::SharedState;
use super::error::AppError;
use super::middleware::{removal_cookie, session_cookie, session_id};
use super::pages;
use crate::checkin::{Attendee, Presence, RosterSummary, ScanOutcome, ScanReply};
use crate::error::Rejection;
use crate::issuance::{entry_image_href, lunch_image_href};

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[derive(Deserialize)]
pub struct TokenQuery {
    token: Option<String>,
}

#[derive(Serialize)]
pub struct Dashboard {
    summary: RosterSummary,
    attendees: Vec<Attendee>,
}

#[derive(Serialize)]
pub struct TicketView {
    id: u32,
    name: String,
    email: String,
    token: String,
    status: Presence,
    paid: bool,
    qr_image: String,
}

impl From<Attendee> for TicketView {
    fn from(a: Attendee) -> Self {
        Self {
            qr_image: entry_image_href(&a.token),
            id: a.id,
            name: a.name,
            email: a.email,
            token: a.token,
            status: a.status,
            paid: a.paid,
        }
    }
}

#[derive(Serialize)]
pub struct LunchTicketView {
    id: u32,
    name: String,
    lunch_token: String,
    lunch_scanned: bool,
    qr_image: String,
}

impl LunchTicketView {
    fn new(a: Attendee, lunch_token: String) -> Self {
        Self {
            qr_image: lunch_image_href(&lunch_token),
            lunch_scanned: a.lunch_claimed(),
            id: a.id,
            name: a.name,
            lunch_token,
        }
    }
}

pub async fn login_page() -> Html<String> {
    Html(pages::login_page(None))
}

pub async fn login(State(state): State<SharedState>, Form(form): Form<LoginForm>) -> Response {
    match state.credentials.authenticate(&form.username, &form.password) {
        Ok(()) => {
            let id = state.sessions.open();
            info!(username = %form.username, "admin logged in");
            (
                [(header::SET_COOKIE, session_cookie(id).to_string())],
                Redirect::to("/"),
            )
                .into_response()
        }
        Err(err) => {
            warn!(username = %form.username, "admin login rejected");
            (
                StatusCode::UNAUTHORIZED,
                Html(pages::login_page(Some(&err.to_string()))),
            )
                .into_response()
        }
    }
}

pub async fn logout(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    if let Some(id) = session_id(&headers) {
        state.sessions.close(&id);
    }
    info!("admin logged out");
    (
        [(header::SET_COOKIE, removal_cookie().to_string())],
        Redirect::to("/admin"),
    )
        .into_response()
}

pub async fn dashboard(State(state): State<SharedState>) -> Result<Json<Dashboard>, AppError> {
    let attendees = state.checkin.roster().await?;
    Ok(Json(Dashboard {
        summary: RosterSummary::from_attendees(&attendees),
        attendees,
    }))
}

pub async fn generate_qr(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<String, AppError> {
    let base_url = request_base_url(&state, &headers);
    let count = state.checkin.issue_entry_qrs(&base_url).await?;
    Ok(format!("QR codes generated for {count} paid attendees."))
}

pub async fn generate_lunch_qr(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<String, AppError> {
    let base_url = request_base_url(&state, &headers);
    let count = state.checkin.issue_lunch_qrs(&base_url).await?;
    Ok(format!("Lunch QR codes generated for {count} attendees."))
}

pub async fn ticket(
    State(state): State<SharedState>,
    Path(token): Path<String>,
) -> Result<Response, AppError> {
    Ok(match state.checkin.ticket(&token).await? {
        Some(attendee) => Json(TicketView::from(attendee)).into_response(),
        None => (StatusCode::NOT_FOUND, "Invalid ticket").into_response(),
    })
}

pub async fn lunch_ticket(
    State(state): State<SharedState>,
    Path(lunch_token): Path<String>,
) -> Result<Response, AppError> {
    Ok(match state.checkin.lunch_ticket(&lunch_token).await? {
        Some(attendee) => Json(LunchTicketView::new(attendee, lunch_token)).into_response(),
        None => (StatusCode::NOT_FOUND, "Invalid lunch ticket").into_response(),
    })
}

pub async fn verify(
    State(state): State<SharedState>,
    Query(query): Query<TokenQuery>,
) -> Result<Json<ScanReply>, AppError> {
    let outcome = match query.token {
        Some(token) => state.checkin.verify_entry(&token).await?,
        None => ScanOutcome::Rejected(Rejection::InvalidEntryToken),
    };
    Ok(Json(outcome.into()))
}

pub async fn verify_lunch(
    State(state): State<SharedState>,
    Query(query): Query<TokenQuery>,
) -> Result<Json<ScanReply>, AppError> {
    let outcome = match query.token {
        Some(token) => state.checkin.claim_lunch(&token).await?,
        None => ScanOutcome::Rejected(Rejection::InvalidLunchToken),
    };
    Ok(Json(outcome.into()))
}

pub async fn scanner() -> Html<&'static str> {
    Html(pages::SCANNER_PAGE)
}

fn request_base_url(state: &SharedState, headers: &HeaderMap) -> String {
    if let Some(url) = &state.config.base_url {
        return url.trim_end_matches('/').to_string();
    }
    host_base_url(headers).unwrap_or_else(|| state.config.local_base_url())
}

/// Base URL as the client saw it. A TLS-terminating proxy reports the
/// original scheme in `X-Forwarded-Proto`.
fn host_base_url(headers: &HeaderMap) -> Option<String> {
    let host = headers.get(header::HOST)?.to_str().ok()?;
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|proto| matches!(*proto, "http" | "https"))
        .unwrap_or("http");
    Some(format!("{scheme}://{host}"))
}
