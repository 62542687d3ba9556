//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{health, rentals, tapes, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "VHS Club API",
        version = "1.0.0",
        description = "Video tape rental club REST API",
        license(name = "MIT")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Tapes
        tapes::list_tapes,
        tapes::get_tape,
        tapes::create_tape,
        tapes::update_tape,
        tapes::delete_tape,
        tapes::delete_all_tapes,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
        users::create_users_batch,
        users::delete_all_users,
        // Rentals
        rentals::create_rental,
        rentals::return_rental,
        rentals::list_active_rentals,
        rentals::delete_all_rentals,
    ),
    components(
        schemas(
            // Tapes
            crate::models::tape::Tape,
            crate::models::tape::CreateTape,
            crate::models::tape::UpdateTape,
            // Users
            crate::models::user::User,
            crate::models::user::CreateUser,
            crate::models::user::CreateUserBatch,
            crate::models::user::UserBatchResult,
            // Rentals
            rentals::CreateRentalRequest,
            rentals::ReturnRentalRequest,
            crate::models::rental::Rental,
            crate::models::rental::RentalStatus,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "tapes", description = "Tape catalog"),
        (name = "users", description = "Club members"),
        (name = "rentals", description = "Renting and returning tapes")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
