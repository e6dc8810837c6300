//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, health, loans, logs};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Libris API",
        version = "1.0.0",
        description = "Library Management System REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::register,
        auth::login,
        auth::me,
        auth::list_users,
        auth::create_member,
        // Books
        books::list_books,
        books::search_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Loans
        loans::borrow_book,
        loans::return_book,
        loans::my_loans,
        loans::all_loans,
        // Logs
        logs::list_logs,
    ),
    components(
        schemas(
            // Auth
            auth::AuthResponse,
            crate::models::user::User,
            crate::models::user::Role,
            crate::models::user::RegisterRequest,
            crate::models::user::LoginRequest,
            crate::models::user::CreateMemberRequest,
            // Books
            crate::models::book::Book,
            crate::models::book::CreateBookRequest,
            crate::models::book::UpdateBookRequest,
            crate::models::book::BookSearchQuery,
            // Loans
            crate::models::loan::Loan,
            crate::models::loan::LoanDetails,
            crate::models::loan::LoanStatus,
            crate::models::loan::BorrowRequest,
            // Logs
            crate::models::activity_log::ActivityAction,
            crate::models::activity_log::ActivityLogEntry,
            crate::models::activity_log::ActivityLogDetails,
            crate::models::activity_log::LogQuery,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication and user administration"),
        (name = "books", description = "Book catalog management"),
        (name = "loans", description = "Loan workflow"),
        (name = "logs", description = "Activity audit trail")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
