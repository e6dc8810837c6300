//! Audit trail service

use crate::{
    error::AppResult,
    models::{activity_log::ActivityLogDetails, user::UserClaims},
    repository::Repository,
};

/// Entries returned when the caller does not pick a limit
const DEFAULT_LOG_LIMIT: i64 = 200;

#[derive(Clone)]
pub struct LogsService {
    repository: Repository,
}

impl LogsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Newest audit entries, admin only
    pub async fn list_logs(
        &self,
        actor: &UserClaims,
        limit: Option<i64>,
    ) -> AppResult<Vec<ActivityLogDetails>> {
        actor.require_admin()?;
        self.repository
            .activity_logs
            .list(limit.unwrap_or(DEFAULT_LOG_LIMIT))
            .await
    }
}
