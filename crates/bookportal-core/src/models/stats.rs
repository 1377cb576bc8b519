use serde::{Deserialize, Serialize};

/// Counts shown on the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_books: u64,
    pub total_users: u64,
    pub total_feedback: u64,
}
