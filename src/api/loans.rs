//! Loan workflow endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::loan::{BorrowRequest, Loan, LoanDetails},
};

use super::AuthenticatedUser;

/// Borrow a book
#[utoipa::path(
    post,
    path = "/api/loans",
    tag = "loans",
    security(("bearer_auth" = [])),
    request_body = BorrowRequest,
    responses(
        (status = 201, description = "Loan created", body = Loan),
        (status = 400, description = "No copies available or invalid due date"),
        (status = 404, description = "Book or account not found"),
        (status = 409, description = "Already borrowed and not yet returned")
    )
)]
pub async fn borrow_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(payload): Json<BorrowRequest>,
) -> AppResult<(StatusCode, Json<Loan>)> {
    let loan = state.services.loans.borrow_book(&claims, payload).await?;
    Ok((StatusCode::CREATED, Json(loan)))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/api/loans/{id}/return",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Loan ID")
    ),
    responses(
        (status = 200, description = "Loan closed", body = Loan),
        (status = 400, description = "Loan already closed"),
        (status = 403, description = "Not the borrower and not an administrator"),
        (status = 404, description = "Loan not found")
    )
)]
pub async fn return_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(loan_id): Path<Uuid>,
) -> AppResult<Json<Loan>> {
    let loan = state.services.loans.return_book(&claims, loan_id).await?;
    Ok(Json(loan))
}

/// List the current user's loans, newest borrowed first
#[utoipa::path(
    get,
    path = "/api/loans/me",
    tag = "loans",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user's loans", body = Vec<LoanDetails>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn my_loans(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<LoanDetails>>> {
    let loans = state.services.loans.list_my_loans(&claims).await?;
    Ok(Json(loans))
}

/// List every loan in the system
#[utoipa::path(
    get,
    path = "/api/loans",
    tag = "loans",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All loans", body = Vec<LoanDetails>),
        (status = 403, description = "Administrator privileges required")
    )
)]
pub async fn all_loans(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<LoanDetails>>> {
    let loans = state.services.loans.list_all_loans(&claims).await?;
    Ok(Json(loans))
}
