//! Tape catalog endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;

use crate::{
    error::{AppError, AppResult},
    models::tape::{CreateTape, Tape, UpdateTape},
    AppState,
};

/// List all tapes
#[utoipa::path(
    get,
    path = "/tapes",
    tag = "tapes",
    responses(
        (status = 200, description = "Tape catalog", body = Vec<Tape>)
    )
)]
pub async fn list_tapes(State(state): State<AppState>) -> AppResult<Json<Vec<Tape>>> {
    let tapes = state.services.tapes.list_tapes().await?;
    Ok(Json(tapes))
}

/// Get a tape by public ID
#[utoipa::path(
    get,
    path = "/tapes/{id}",
    tag = "tapes",
    params(("id" = String, Path, description = "Tape public ID")),
    responses(
        (status = 200, description = "Tape details", body = Tape),
        (status = 400, description = "Malformed identifier"),
        (status = 404, description = "Tape not found")
    )
)]
pub async fn get_tape(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Tape>> {
    let tape = state.services.tapes.get_tape(&id).await?;
    Ok(Json(tape))
}

/// Add a tape to the catalog
#[utoipa::path(
    post,
    path = "/tapes",
    tag = "tapes",
    request_body = CreateTape,
    responses(
        (status = 201, description = "Tape created", body = Tape),
        (status = 400, description = "Invalid tape fields", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_tape(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<CreateTape>, AppError>,
) -> AppResult<(StatusCode, Json<Tape>)> {
    let tape = state.services.tapes.create_tape(request).await?;
    Ok((StatusCode::CREATED, Json(tape)))
}

/// Update some fields of a tape
#[utoipa::path(
    patch,
    path = "/tapes/{id}",
    tag = "tapes",
    params(("id" = String, Path, description = "Tape public ID")),
    request_body = UpdateTape,
    responses(
        (status = 200, description = "Tape updated", body = Tape),
        (status = 400, description = "Empty or invalid update", body = crate::error::ErrorResponse),
        (status = 404, description = "Tape not found"),
        (status = 409, description = "Quantity below copies rented out")
    )
)]
pub async fn update_tape(
    State(state): State<AppState>,
    Path(id): Path<String>,
    WithRejection(Json(request), _): WithRejection<Json<UpdateTape>, AppError>,
) -> AppResult<Json<Tape>> {
    let tape = state.services.tapes.update_tape(&id, request).await?;
    Ok(Json(tape))
}

/// Delete a tape
#[utoipa::path(
    delete,
    path = "/tapes/{id}",
    tag = "tapes",
    params(("id" = String, Path, description = "Tape public ID")),
    responses(
        (status = 204, description = "Tape deleted"),
        (status = 404, description = "Tape not found"),
        (status = 409, description = "Tape has rental records")
    )
)]
pub async fn delete_tape(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.services.tapes.delete_tape(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete every tape
#[utoipa::path(
    delete,
    path = "/tapes",
    tag = "tapes",
    responses(
        (status = 204, description = "All tapes deleted"),
        (status = 409, description = "Rental records still reference tapes")
    )
)]
pub async fn delete_all_tapes(State(state): State<AppState>) -> AppResult<StatusCode> {
    state.services.tapes.delete_all_tapes().await?;
    Ok(StatusCode::NO_CONTENT)
}
