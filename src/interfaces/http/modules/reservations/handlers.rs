//! Reservation HTTP handlers

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::application::ReservationService;
use crate::domain::reservation::ReservationStore;
use crate::domain::DomainError;
use crate::interfaces::http::common::{ApiPath, ApiQuery, ErrorResponse, ValidatedJson};

use super::dto::*;

/// Application state for reservation handlers.
#[derive(Clone)]
pub struct ReservationAppState {
    pub service: Arc<ReservationService<dyn ReservationStore>>,
}

/// Routes for `/api/v1/reservations/*` and `/api/v1/rooms/{room_id}/availability`.
pub fn reservation_routes(state: ReservationAppState) -> Router {
    Router::new()
        .route(
            "/api/v1/reservations",
            get(search_reservations).post(create_reservation),
        )
        .route(
            "/api/v1/reservations/{id}",
            get(get_reservation).put(update_reservation),
        )
        .route("/api/v1/reservations/{id}/cancel", post(cancel_reservation))
        .route("/api/v1/reservations/{id}/approve", post(approve_reservation))
        .route(
            "/api/v1/rooms/{room_id}/availability",
            get(check_availability),
        )
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations",
    tag = "Reservations",
    params(SearchParams),
    responses(
        (status = 200, description = "One page of reservations", body = Vec<ReservationDto>),
        (status = 400, description = "Invalid paging", body = ErrorResponse)
    )
)]
pub async fn search_reservations(
    State(state): State<ReservationAppState>,
    ApiQuery(params): ApiQuery<SearchParams>,
) -> Result<Json<Vec<ReservationDto>>, DomainError> {
    let page = state.service.search(params.into()).await?;
    Ok(Json(page.into_iter().map(ReservationDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/{id}",
    tag = "Reservations",
    params(("id" = i64, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation details", body = ReservationDto),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn get_reservation(
    State(state): State<ReservationAppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ReservationDto>, DomainError> {
    let reservation = state.service.get_by_id(id).await?;
    Ok(Json(reservation.into()))
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations",
    tag = "Reservations",
    request_body = ReservationRequest,
    responses(
        (status = 201, description = "Reservation created as PENDING", body = ReservationDto),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
pub async fn create_reservation(
    State(state): State<ReservationAppState>,
    ValidatedJson(request): ValidatedJson<ReservationRequest>,
) -> Result<(StatusCode, Json<ReservationDto>), DomainError> {
    let created = state.service.create(request.into_draft()?).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/reservations/{id}",
    tag = "Reservations",
    params(("id" = i64, Path, description = "Reservation ID")),
    request_body = ReservationRequest,
    responses(
        (status = 200, description = "Updated reservation", body = ReservationDto),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse),
        (status = 409, description = "Reservation is not PENDING", body = ErrorResponse)
    )
)]
pub async fn update_reservation(
    State(state): State<ReservationAppState>,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(request): ValidatedJson<ReservationRequest>,
) -> Result<Json<ReservationDto>, DomainError> {
    let updated = state.service.update(id, request.into_draft()?).await?;
    Ok(Json(updated.into()))
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations/{id}/cancel",
    tag = "Reservations",
    params(("id" = i64, Path, description = "Reservation ID")),
    responses(
        (status = 204, description = "Reservation cancelled"),
        (status = 404, description = "Not found", body = ErrorResponse),
        (status = 409, description = "Already approved or cancelled", body = ErrorResponse)
    )
)]
pub async fn cancel_reservation(
    State(state): State<ReservationAppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, DomainError> {
    state.service.cancel(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations/{id}/approve",
    tag = "Reservations",
    params(("id" = i64, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Approved reservation", body = ReservationDto),
        (status = 404, description = "Not found", body = ErrorResponse),
        (status = 409, description = "Not PENDING or room already booked", body = ErrorResponse)
    )
)]
pub async fn approve_reservation(
    State(state): State<ReservationAppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ReservationDto>, DomainError> {
    let approved = state.service.approve(id).await?;
    Ok(Json(approved.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/rooms/{room_id}/availability",
    tag = "Reservations",
    params(
        ("room_id" = i64, Path, description = "Room ID"),
        AvailabilityParams
    ),
    responses(
        (status = 200, description = "Availability of the room", body = AvailabilityResponse),
        (status = 400, description = "Missing or malformed dates, or end date not after start date", body = ErrorResponse)
    )
)]
pub async fn check_availability(
    State(state): State<ReservationAppState>,
    ApiPath(room_id): ApiPath<i64>,
    ApiQuery(params): ApiQuery<AvailabilityParams>,
) -> Result<Json<AvailabilityResponse>, DomainError> {
    let available = state
        .service
        .check_availability(room_id, params.start_date, params.end_date)
        .await?;
    Ok(Json(AvailabilityResponse {
        room_id,
        start_date: params.start_date,
        end_date: params.end_date,
        available,
    }))
}

// ── Tests ──────────────────────────────────────────────────────
