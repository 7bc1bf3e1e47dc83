pub(crate) mod essay_submissions;
pub(crate) mod essays;
pub(crate) mod quiz_submissions;
pub(crate) mod quizzes;
pub(crate) mod users;
