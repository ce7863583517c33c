use serde::Serialize;
use serde_json::Value;

/// Kinds of recorded user actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Login,
    Logout,
    PageView,
    SearchObservations,
    ViewObservationDetails,
    ChatbotQuery,
    GetSuggestions,
    SaveObservation,
    CreateUser,
    UpdateUser,
    DeleteUser,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Login => "login",
            ActivityKind::Logout => "logout",
            ActivityKind::PageView => "page_view",
            ActivityKind::SearchObservations => "search_observations",
            ActivityKind::ViewObservationDetails => "view_observation_details",
            ActivityKind::ChatbotQuery => "chatbot_query",
            ActivityKind::GetSuggestions => "get_suggestions",
            ActivityKind::SaveObservation => "save_observation",
            ActivityKind::CreateUser => "create_user",
            ActivityKind::UpdateUser => "update_user",
            ActivityKind::DeleteUser => "delete_user",
        }
    }
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One logged action. `details` is the JSON recorded with it, if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Activity {
    pub id: i64,
    pub user_id: Option<i64>,
    pub user_name: Option<String>,
    pub activity_type: String,
    pub details: Option<Value>,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeCount {
    pub activity_type: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    pub day: String,
    pub count: i64,
}

/// Aggregates shown on the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityDashboard {
    /// Counts of `chatbot_query` and `get_suggestions` only.
    pub conversation_stats: Vec<TypeCount>,
    pub activity_stats: Vec<TypeCount>,
    pub recent_activities: Vec<Activity>,
    /// Most recent days first.
    pub daily_activities: Vec<DailyCount>,
}
