use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::info;

use cadence_engine::{DateWindow, generate_schedule_dates, window::parse_instant};
use cadence_types::api::{SkipSlotRequest, SlotPreviewResponse};

use crate::error::ApiError;
use crate::state::{AppState, with_db};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotWindowParams {
    pub from_date: String,
    pub to_date: String,
}

#[derive(Debug, Deserialize)]
pub struct SlotDateParams {
    pub date: String,
}

/// Raw generated slots for one schedule, before posts and skips are applied.
pub async fn preview_slots(
    State(state): State<AppState>,
    Path(schedule_id): Path<String>,
    params: Result<Query<SlotWindowParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(params) = params?;
    let window = DateWindow::parse(&params.from_date, &params.to_date)?;

    let id = schedule_id.clone();
    let schedule = with_db(&state, move |db| Ok(db.get_schedule(&id)?))
        .await?
        .ok_or_else(|| schedule_not_found(&schedule_id))?;

    let slots = generate_schedule_dates(&schedule, window.from, window.to);
    Ok(Json(SlotPreviewResponse { schedule_id, slots }))
}

pub async fn skip_slot(
    State(state): State<AppState>,
    Path(schedule_id): Path<String>,
    req: Result<Json<SkipSlotRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = req?;
    let date = parse_instant("date", &req.date)?;

    let id = schedule_id.clone();
    let outcome = with_db(&state, move |db| {
        if db.get_schedule(&id)?.is_none() {
            return Ok(None);
        }
        Ok(Some(db.skip_slot(&id, date)?))
    })
    .await?;

    let (created, slot) = outcome.ok_or_else(|| schedule_not_found(&schedule_id))?;
    if created {
        info!(schedule_id = %schedule_id, date = %slot.date, "Slot skipped");
    }

    let status = if created { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(slot)))
}

pub async fn unskip_slot(
    State(state): State<AppState>,
    Path(schedule_id): Path<String>,
    params: Result<Query<SlotDateParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(params) = params?;
    let date = parse_instant("date", &params.date)?;

    let id = schedule_id.clone();
    let removed = with_db(&state, move |db| Ok(db.unskip_slot(&id, date)?)).await?;
    if !removed {
        return Err(ApiError::NotFound(format!(
            "no skipped slot at {} for schedule {}",
            date.to_rfc3339(),
            schedule_id
        )));
    }

    info!(schedule_id = %schedule_id, date = %date, "Slot restored");
    Ok(StatusCode::NO_CONTENT)
}

fn schedule_not_found(id: &str) -> ApiError {
    ApiError::NotFound(format!("schedule {} not found", id))
}
