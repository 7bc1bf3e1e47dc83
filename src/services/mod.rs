pub(crate) mod ai_feedback;
pub(crate) mod analytics;
pub(crate) mod grading;
pub(crate) mod identity;
pub(crate) mod submissions;
