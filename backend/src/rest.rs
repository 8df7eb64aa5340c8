//! Axum handlers and the application state.
//!
//! Thin glue only: DTOs from `shared` come in, domain commands go down,
//! domain results are mapped back to DTOs. The per-session interaction
//! state (pending estimate, last query) lives here as an explicit struct
//! behind a mutex, threaded into the two handlers that touch it.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

use shared::{
    ConfirmEntryRequest, ConfirmEntryResponse, EntryListRequest, EntryListResponse,
    EstimatePreview, EstimateRequest, LedgerRow, ProfileResponse, WeeklySummary,
};

use crate::domain::commands::entries::{ConfirmEntryCommand, EntryListQuery};
use crate::domain::errors::TrackerError;
use crate::domain::estimation_service::{EstimateCommand, EstimateInput};
use crate::domain::models::entry::NutritionEntry;
use crate::domain::target_service;
use crate::domain::{EntryService, EstimationService, ProfileService, SessionState, SummaryService};

/// Default page size for the entry list history view.
const DEFAULT_LIST_LIMIT: usize = 10;

#[derive(Clone)]
pub struct AppState {
    pub entry_service: EntryService,
    pub estimation_service: EstimationService,
    pub profile_service: ProfileService,
    pub summary_service: SummaryService,
    pub session: Arc<Mutex<SessionState>>,
}

impl AppState {
    pub fn new(
        entry_service: EntryService,
        estimation_service: EstimationService,
        profile_service: ProfileService,
    ) -> Self {
        Self {
            entry_service,
            estimation_service,
            profile_service,
            summary_service: SummaryService::new(),
            session: Arc::new(Mutex::new(SessionState::default())),
        }
    }
}

/// Map a domain error to its REST status and log it.
fn error_response(err: &TrackerError) -> (StatusCode, String) {
    let status = match err {
        TrackerError::MalformedEstimate(_) => StatusCode::UNPROCESSABLE_ENTITY,
        TrackerError::EstimationFailed(_) => StatusCode::BAD_GATEWAY,
        TrackerError::LedgerUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        TrackerError::ConcurrentModification => StatusCode::CONFLICT,
        TrackerError::EntryNotFound(_) => StatusCode::NOT_FOUND,
        TrackerError::NoPendingEstimate
        | TrackerError::InvalidProfile(_)
        | TrackerError::InvalidSatiety(_)
        | TrackerError::InvalidDate(_)
        | TrackerError::EmptyEstimateInput
        | TrackerError::AmbiguousEstimateInput => StatusCode::BAD_REQUEST,
    };
    if status.is_server_error() {
        error!("{err}");
    } else {
        info!("rejected request: {err}");
    }
    (status, err.to_string())
}

fn decode_input(request: &EstimateRequest) -> Result<EstimateInput, TrackerError> {
    match (&request.text, &request.image_base64) {
        (Some(text), None) if !text.trim().is_empty() => {
            Ok(EstimateInput::Text(text.trim().to_string()))
        }
        (None, Some(image)) => {
            let bytes = BASE64
                .decode(image)
                .map_err(|e| TrackerError::EstimationFailed(format!("invalid image data: {e}")))?;
            let mime_type = request
                .image_mime
                .clone()
                .unwrap_or_else(|| "image/jpeg".to_string());
            Ok(EstimateInput::Image { bytes, mime_type })
        }
        (Some(_), Some(_)) => Err(TrackerError::AmbiguousEstimateInput),
        _ => Err(TrackerError::EmptyEstimateInput),
    }
}

/// `POST /api/estimate` — run the model, park the parsed estimate in the
/// session, return a preview for the user to confirm.
pub async fn estimate(
    State(state): State<AppState>,
    Json(request): Json<EstimateRequest>,
) -> impl IntoResponse {
    info!("POST /api/estimate - schema: {:?}", request.schema);

    let input = match decode_input(&request) {
        Ok(input) => input,
        Err(e) => return error_response(&e).into_response(),
    };
    let command = EstimateCommand { input: input.clone(), schema: request.schema };

    match state.estimation_service.request_estimate(command).await {
        Ok(pending) => {
            let preview = EstimatePreview {
                entry: pending.entry.clone().into(),
                raw_reply: pending.raw_reply.clone(),
                schema: pending.schema,
            };
            let mut session = state.session.lock().await;
            session.last_query = Some(input.describe());
            session.pending_estimate = Some(pending);
            (StatusCode::OK, Json(preview)).into_response()
        }
        Err(e) => error_response(&e).into_response(),
    }
}

/// `POST /api/entries/confirm` — commit the pending estimate. The pending
/// slot is only cleared on success, so a rejected satiety or date leaves it
/// available for a corrected confirm.
pub async fn confirm_entry(
    State(state): State<AppState>,
    Json(request): Json<ConfirmEntryRequest>,
) -> impl IntoResponse {
    info!("POST /api/entries/confirm - satiety: {:?}", request.satiety);

    // Take the pending estimate out before touching the ledger so the
    // session lock is never held across storage I/O.
    let pending = match state.session.lock().await.pending_estimate.take() {
        Some(p) => p,
        None => return error_response(&TrackerError::NoPendingEstimate).into_response(),
    };

    let command = ConfirmEntryCommand { satiety: request.satiety, date: request.date };
    match state.entry_service.confirm_pending(pending.clone(), command) {
        Ok((position, entry)) => {
            let summary = match state.entry_service.read_ledger() {
                Ok(ledger) => state.summary_service.daily_summary(&ledger, &entry.date),
                Err(e) => return error_response(&e).into_response(),
            };
            let response = ConfirmEntryResponse {
                position,
                entry: entry.into(),
                summary: summary.into(),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => {
            // Put the estimate back so a corrected confirm can retry it.
            state.session.lock().await.pending_estimate.get_or_insert(pending);
            error_response(&e).into_response()
        }
    }
}

/// `GET /api/entries`
pub async fn list_entries(
    State(state): State<AppState>,
    Query(params): Query<EntryListRequest>,
) -> impl IntoResponse {
    info!("GET /api/entries - date: {:?}, limit: {:?}", params.date, params.limit);

    let query = EntryListQuery {
        date: params.date,
        limit: Some(params.limit.unwrap_or(DEFAULT_LIST_LIMIT)),
    };
    match state.entry_service.list_entries(query) {
        Ok(result) => {
            let response = EntryListResponse {
                rows: result
                    .rows
                    .into_iter()
                    .map(|(position, entry)| LedgerRow { position, entry: entry.into() })
                    .collect(),
                ledger_len: result.ledger_len,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response(&e).into_response(),
    }
}

/// `PUT /api/entries/:position` — full-field overwrite of one row.
pub async fn update_entry(
    State(state): State<AppState>,
    Path(position): Path<usize>,
    Json(entry): Json<shared::NutritionEntry>,
) -> impl IntoResponse {
    info!("PUT /api/entries/{position}");

    match state.entry_service.update_entry(position, NutritionEntry::from(entry)) {
        Ok(entry) => (StatusCode::OK, Json(shared::NutritionEntry::from(entry))).into_response(),
        Err(e) => error_response(&e).into_response(),
    }
}

/// `DELETE /api/entries/:position`
pub async fn delete_entry(
    State(state): State<AppState>,
    Path(position): Path<usize>,
) -> impl IntoResponse {
    info!("DELETE /api/entries/{position}");

    match state.entry_service.delete_entry(position) {
        Ok(removed) => {
            (StatusCode::OK, Json(shared::NutritionEntry::from(removed))).into_response()
        }
        Err(e) => error_response(&e).into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct DailySummaryParams {
    pub date: Option<String>,
}

/// `GET /api/summary/daily` — totals for one date, defaulting to today.
pub async fn daily_summary(
    State(state): State<AppState>,
    Query(params): Query<DailySummaryParams>,
) -> impl IntoResponse {
    let date = params.date.unwrap_or_else(NutritionEntry::today);
    info!("GET /api/summary/daily - date: {date}");

    match state.entry_service.read_ledger() {
        Ok(ledger) => {
            let summary = state.summary_service.daily_summary(&ledger, &date);
            (StatusCode::OK, Json(shared::DailySummary::from(summary))).into_response()
        }
        Err(e) => error_response(&e).into_response(),
    }
}

/// `GET /api/summary/weekly` — the most recent 7 distinct dates logged.
pub async fn weekly_summary(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/summary/weekly");

    match state.entry_service.read_ledger() {
        Ok(ledger) => {
            let days = state
                .summary_service
                .weekly_summary(&ledger)
                .into_iter()
                .map(Into::into)
                .collect();
            (StatusCode::OK, Json(WeeklySummary { days })).into_response()
        }
        Err(e) => error_response(&e).into_response(),
    }
}

fn profile_response(profile: crate::domain::models::profile::UserProfile) -> impl IntoResponse {
    match target_service::daily_targets(&profile) {
        Ok(targets) => {
            let response = ProfileResponse {
                profile: profile.into(),
                targets: targets.into(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response(&e).into_response(),
    }
}

/// `GET /api/profile`
pub async fn get_profile(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/profile");

    match state.profile_service.load_or_default() {
        Ok(profile) => profile_response(profile).into_response(),
        Err(e) => error_response(&e).into_response(),
    }
}

/// `PUT /api/profile` — overwrite the singleton profile and return the
/// targets it implies.
pub async fn put_profile(
    State(state): State<AppState>,
    Json(profile): Json<shared::UserProfile>,
) -> impl IntoResponse {
    info!("PUT /api/profile");

    match state.profile_service.save(profile.into()) {
        Ok(profile) => profile_response(profile).into_response(),
        Err(e) => error_response(&e).into_response(),
    }
}

/// `GET /api/targets` — daily targets from the stored profile.
pub async fn get_targets(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/targets");

    let profile = match state.profile_service.load_or_default() {
        Ok(profile) => profile,
        Err(e) => return error_response(&e).into_response(),
    };
    match target_service::daily_targets(&profile) {
        Ok(targets) => (StatusCode::OK, Json(shared::DailyTargets::from(targets))).into_response(),
        Err(e) => error_response(&e).into_response(),
    }
}
