use axum::Json;
use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use formrelay_core::{Credentials, Submission};
use tracing::{error, info, instrument, warn};

use super::AppState;
use super::schemas::SubmitResponse;
use crate::error::SubmitError;
use crate::form::{FormParseError, decode_submission};
use crate::relay::relay_submission;

/// `ANY /api/submit` -- relay one form submission to Telegram.
///
/// Checks run in a fixed order: method, secrets, body. Only after all three
/// pass is anything sent to Telegram.
#[instrument(name = "submit", skip_all, fields(method = %request.method()))]
pub async fn submit(State(state): State<AppState>, request: Request) -> Response {
    match handle(&state, request).await {
        Ok((status, body)) => {
            info!(status = status.as_u16(), "submission relayed");
            (status, Json(body)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

async fn handle(
    state: &AppState,
    request: Request,
) -> Result<(StatusCode, SubmitResponse), SubmitError> {
    if request.method() != Method::POST {
        warn!("rejecting non-POST submission");
        return Err(SubmitError::MethodNotAllowed);
    }

    let credentials = Credentials::load(state.secrets.as_ref()).inspect_err(|e| {
        error!(error = %e, "missing Telegram credentials");
    })?;

    let submission = parse_form(state, request)
        .await
        .inspect_err(|e| error!(error = %e, "error parsing form data"))?;

    let client = state.telegram_client(&credentials);
    let report = relay_submission(&client, &submission).await?;

    Ok(SubmitResponse::from_report(&report))
}

async fn parse_form(
    state: &AppState,
    request: Request,
) -> Result<Submission, FormParseError> {
    let multipart = Multipart::from_request(request, state).await?;
    decode_submission(multipart, &state.limits).await
}
