use std::sync::Arc;

use crate::accounts::UserStore;
use crate::activity::ActivityLog;
use crate::assistant::ChatAssistant;
use crate::catalogue::DescriptorCatalogue;
use crate::matching::RelevanceMatcher;
use crate::observations::ObservationStore;
use crate::session::{SessionStore, SessionUser};

/// Shared state for every handler. All members are cheap to clone.
#[derive(Clone, Debug)]
pub struct AppState {
    pub matcher: Arc<RelevanceMatcher>,

    pub assistant: Arc<ChatAssistant>,

    pub observations: ObservationStore,

    pub users: UserStore,

    pub activity: ActivityLog,

    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(
        matcher: RelevanceMatcher,
        assistant: ChatAssistant,
        observations: ObservationStore,
        users: UserStore,
        activity: ActivityLog,
        sessions: SessionStore,
    ) -> Self {
        Self {
            matcher: Arc::new(matcher),
            assistant: Arc::new(assistant),
            observations,
            users,
            activity,
            sessions,
        }
    }

    pub fn catalogue(&self) -> &Arc<dyn DescriptorCatalogue> {
        self.matcher.catalogue()
    }

    /// Records an activity for `user`. Never fails.
    pub async fn record(
        &self,
        user: &SessionUser,
        kind: crate::activity::ActivityKind,
        details: Option<serde_json::Value>,
    ) {
        self.activity
            .record(Some(user.user_id), &user.name, kind, details)
            .await;
    }
}
