//! Rental endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::rental::Rental,
    AppState,
};

/// Rent request; the tape comes from the path
#[derive(Deserialize, ToSchema)]
pub struct CreateRentalRequest {
    /// User public ID
    pub user_id: String,
}

/// Return request
#[derive(Deserialize, ToSchema)]
pub struct ReturnRentalRequest {
    /// Tape public ID
    pub tape_id: String,
    /// User public ID
    pub user_id: String,
}

/// Rent a copy of a tape
#[utoipa::path(
    post,
    path = "/rentals/{tape_id}",
    tag = "rentals",
    params(("tape_id" = String, Path, description = "Tape public ID")),
    request_body = CreateRentalRequest,
    responses(
        (status = 201, description = "Rental created", body = Rental),
        (status = 400, description = "Malformed identifier", body = crate::error::ErrorResponse),
        (status = 404, description = "Tape or user not found", body = crate::error::ErrorResponse),
        (status = 409, description = "User rental limit reached or no copy available", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_rental(
    State(state): State<AppState>,
    Path(tape_id): Path<String>,
    WithRejection(Json(request), _): WithRejection<Json<CreateRentalRequest>, AppError>,
) -> AppResult<(StatusCode, Json<Rental>)> {
    let rental = state
        .services
        .rentals
        .rent_tape(&tape_id, &request.user_id)
        .await?;
    Ok((StatusCode::CREATED, Json(rental)))
}

/// Return a rented tape
#[utoipa::path(
    post,
    path = "/rentals/return",
    tag = "rentals",
    request_body = ReturnRentalRequest,
    responses(
        (status = 200, description = "Tape returned", body = Rental),
        (status = 400, description = "Malformed identifier", body = crate::error::ErrorResponse),
        (status = 404, description = "Tape, user or active rental not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn return_rental(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<ReturnRentalRequest>, AppError>,
) -> AppResult<Json<Rental>> {
    let rental = state
        .services
        .rentals
        .return_tape(&request.tape_id, &request.user_id)
        .await?;
    Ok(Json(rental))
}

/// List active rentals
#[utoipa::path(
    get,
    path = "/rentals",
    tag = "rentals",
    responses(
        (status = 200, description = "Rentals not yet returned", body = Vec<Rental>)
    )
)]
pub async fn list_active_rentals(State(state): State<AppState>) -> AppResult<Json<Vec<Rental>>> {
    let rentals = state.services.rentals.list_active_rentals().await?;
    Ok(Json(rentals))
}

/// Delete every rental
#[utoipa::path(
    delete,
    path = "/rentals",
    tag = "rentals",
    responses(
        (status = 204, description = "All rentals deleted")
    )
)]
pub async fn delete_all_rentals(State(state): State<AppState>) -> AppResult<StatusCode> {
    state.services.rentals.delete_all_rentals().await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request},
        routing::post,
        Router,
    };
    use serde_json::Value;
    use sqlx::postgres::PgPoolOptions;
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::{config::AppConfig, repository::Repository, services::Services};

    /// Router over a pool that never connects; body rejections happen before any query
    fn router() -> Router {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://vhs_club@localhost/vhs_club")
            .unwrap();
        let state = AppState {
            config: Arc::new(AppConfig::default()),
            services: Arc::new(Services::new(Repository::new(pool))),
        };
        Router::new()
            .route("/rentals/return", post(return_rental))
            .route("/rentals/:tape_id", post(create_rental))
            .with_state(state)
    }

    async fn post_json(uri: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_create_rental_missing_user_id_is_bad_request() {
        let (status, body) = post_json(
            "/rentals/6f1c2a4e-8d0b-4c59-9a53-2f3b9a7d1e10",
            r#"{"userid": "chomsky"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "BadValue");
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn test_return_rental_malformed_body_is_bad_request() {
        let (status, body) = post_json("/rentals/return", r#"{"tape_id": 8,"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "BadValue");
    }
}
