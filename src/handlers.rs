use crate::errors::AppError;
use crate::gesture::{PRIMARY_BUTTON, PointerEvent, PointerKind};
use crate::models::{DeltaRequest, QuantityResponse, ResetRequest, RowKey, SaveDayResponse};
use crate::state::AppState;
use crate::timers;
use crate::views::{DetailView, HomeView, RowView, WeekView, build_detail, build_home, build_row, build_week};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use std::time::Instant;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerAction {
    Down,
    Up,
    Cancel,
    Leave,
    ContextMenu,
}

#[derive(Debug, Deserialize)]
pub struct PointerRequest {
    pub event: PointerAction,
    pub pointer_type: Option<PointerKind>,
    pub button: Option<i16>,
}

impl PointerRequest {
    fn into_event(self) -> Result<PointerEvent, AppError> {
        Ok(match self.event {
            PointerAction::Down => PointerEvent::Down {
                kind: self
                    .pointer_type
                    .ok_or_else(|| AppError::bad_request("pointer_type is required for down"))?,
                button: self.button.unwrap_or(PRIMARY_BUTTON),
            },
            PointerAction::Up => PointerEvent::Up,
            PointerAction::Cancel => PointerEvent::Cancel,
            PointerAction::Leave => PointerEvent::Leave,
            PointerAction::ContextMenu => PointerEvent::ContextMenu,
        })
    }
}

pub async fn home(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Json<HomeView>, AppError> {
    let date = resolve_date(query.date)?;
    let workspace = state.workspace.lock().await;
    Ok(Json(build_home(&state.catalog, &workspace.ledger, &date)))
}

pub async fn detail(
    State(state): State<AppState>,
    Path(cafeteria): Path<String>,
    Query(query): Query<DateQuery>,
) -> Result<Json<DetailView>, AppError> {
    let date = resolve_date(query.date)?;
    let workspace = state.workspace.lock().await;
    build_detail(&state.catalog, &workspace.ledger, &cafeteria, &date)
        .map(Json)
        .ok_or_else(|| unknown_cafeteria(&cafeteria))
}

pub async fn week(
    State(state): State<AppState>,
    Path(cafeteria): Path<String>,
) -> Result<Json<WeekView>, AppError> {
    if !state.catalog.contains_cafeteria(&cafeteria) {
        return Err(unknown_cafeteria(&cafeteria));
    }
    let workspace = state.workspace.lock().await;
    Ok(Json(build_week(&workspace.ledger, &cafeteria)))
}

pub async fn save_day(
    State(state): State<AppState>,
    Path(cafeteria): Path<String>,
    Query(query): Query<DateQuery>,
) -> Result<Json<SaveDayResponse>, AppError> {
    let date = resolve_date(query.date)?;
    if !state.catalog.contains_cafeteria(&cafeteria) {
        return Err(unknown_cafeteria(&cafeteria));
    }

    // every tap is already on disk; this only confirms it
    let total = state.workspace.lock().await.ledger.day_total(&date, &cafeteria);
    info!(cafeteria = %cafeteria, date = %date, total, "day saved");

    Ok(Json(SaveDayResponse {
        message: format!("Pedido guardado para {cafeteria}"),
        cafeteria,
        date,
    }))
}

pub async fn pointer(
    State(state): State<AppState>,
    Path((cafeteria, product)): Path<(String, String)>,
    Query(query): Query<DateQuery>,
    Json(payload): Json<PointerRequest>,
) -> Result<Json<RowView>, AppError> {
    let date = resolve_date(query.date)?;
    if !state.catalog.contains_product(&cafeteria, &product) {
        return Err(AppError::not_found(format!(
            "'{product}' is not on the '{cafeteria}' catalog"
        )));
    }
    let event = payload.into_event()?;
    let row = RowKey::new(date, cafeteria, product);

    let mut guard = state.workspace.lock().await;
    let workspace = &mut *guard;
    let now = Instant::now();
    let dispatch = workspace
        .gestures
        .dispatch(&row, event, &mut workspace.ledger, now);
    let render_requested = dispatch.render_requested;
    timers::schedule(&state, workspace, dispatch.timers);

    Ok(Json(build_row(
        &workspace.gestures,
        &workspace.ledger,
        &row,
        render_requested,
        now,
    )))
}

pub async fn get_quantity(
    State(state): State<AppState>,
    Path((date, cafeteria, product)): Path<(String, String, String)>,
) -> Result<Json<QuantityResponse>, AppError> {
    let date = resolve_date(Some(date))?;
    let quantity = state.workspace.lock().await.ledger.quantity(&date, &cafeteria, &product);
    Ok(Json(QuantityResponse {
        date,
        cafeteria,
        product,
        quantity,
    }))
}

pub async fn apply_delta(
    State(state): State<AppState>,
    Json(payload): Json<DeltaRequest>,
) -> Result<Json<QuantityResponse>, AppError> {
    let date = resolve_date(Some(payload.date))?;
    let quantity = state.workspace.lock().await.ledger.apply_delta(
        &date,
        &payload.cafeteria,
        &payload.product,
        payload.delta,
    );
    Ok(Json(QuantityResponse {
        date,
        cafeteria: payload.cafeteria,
        product: payload.product,
        quantity,
    }))
}

pub async fn reset_product(
    State(state): State<AppState>,
    Json(payload): Json<ResetRequest>,
) -> Result<Json<QuantityResponse>, AppError> {
    let date = resolve_date(Some(payload.date))?;
    let quantity = state
        .workspace
        .lock()
        .await
        .ledger
        .reset_product(&date, &payload.cafeteria, &payload.product);
    Ok(Json(QuantityResponse {
        date,
        cafeteria: payload.cafeteria,
        product: payload.product,
        quantity,
    }))
}

fn resolve_date(date: Option<String>) -> Result<String, AppError> {
    match date {
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map(|date| date.to_string())
            .map_err(|_| AppError::bad_request("date must be YYYY-MM-DD")),
        None => Ok(today_string()),
    }
}

fn unknown_cafeteria(cafeteria: &str) -> AppError {
    AppError::not_found(format!("unknown cafeteria '{cafeteria}'"))
}

fn today_string() -> String {
    Local::now().date_naive().to_string()
}
