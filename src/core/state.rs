use std::sync::Arc;

use sqlx::PgPool;

use crate::core::config::Settings;
use crate::services::ai_feedback::FeedbackService;
use crate::services::identity::IdentityService;

#[derive(Clone)]
pub(crate) struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    settings: Settings,
    db: PgPool,
    identity: IdentityService,
    feedback: FeedbackService,
}

impl AppState {
    pub(crate) fn new(
        settings: Settings,
        db: PgPool,
        identity: IdentityService,
        feedback: FeedbackService,
    ) -> Self {
        Self { inner: Arc::new(InnerState { settings, db, identity, feedback }) }
    }

    pub(crate) fn settings(&self) -> &Settings {
        &self.inner.settings
    }

    pub(crate) fn db(&self) -> &PgPool {
        &self.inner.db
    }

    pub(crate) fn identity(&self) -> &IdentityService {
        &self.inner.identity
    }

    pub(crate) fn feedback(&self) -> &FeedbackService {
        &self.inner.feedback
    }
}
