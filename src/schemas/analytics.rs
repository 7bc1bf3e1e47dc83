use serde::{Serialize, Serializer};

use crate::schemas::essay::EssayResponse;
use crate::schemas::quiz::QuizResponse;

/// One student's score inside a per-assignment view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct StudentScore {
    pub(crate) student_id: String,
    pub(crate) score: i32,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuizAnalytics {
    pub(crate) quiz_id: String,
    pub(crate) average_score: f64,
    pub(crate) student_performance: Vec<StudentScore>,
}

#[derive(Debug, Serialize)]
pub(crate) struct EssayAnalytics {
    pub(crate) essay_id: String,
    pub(crate) average_score: f64,
    pub(crate) common_strengths: Vec<String>,
    pub(crate) common_weaknesses: Vec<String>,
    pub(crate) student_performance: Vec<StudentScore>,
}

#[derive(Debug, Serialize)]
pub(crate) struct StudentAnalytics {
    pub(crate) student_id: String,
    pub(crate) average_quiz_score: f64,
    pub(crate) average_essay_score: f64,
    pub(crate) recent_submissions: Vec<ActivityEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct QuizPerformance {
    pub(crate) question: String,
    pub(crate) correct: f64,
    pub(crate) incorrect: f64,
    pub(crate) difficulty: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct ClassProgressPoint {
    pub(crate) name: String,
    pub(crate) average: f64,
}

#[derive(Debug, Serialize)]
pub(crate) struct TeacherOverview {
    pub(crate) total_students: usize,
    pub(crate) average_score: f64,
    pub(crate) completion_rate: f64,
    pub(crate) at_risk_students: usize,
    pub(crate) quiz_performance: Vec<QuizPerformance>,
    pub(crate) class_progress: Vec<ClassProgressPoint>,
}

#[derive(Debug, Serialize)]
pub(crate) struct StudentSummary {
    pub(crate) student_id: String,
    pub(crate) student_name: String,
    pub(crate) overall_score: f64,
    pub(crate) quiz_count: usize,
    pub(crate) essay_count: usize,
    pub(crate) strengths: Vec<String>,
    pub(crate) weaknesses: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuizDetailedAnalytics {
    pub(crate) quiz_id: String,
    pub(crate) total_submissions: usize,
    pub(crate) average_score: f64,
}

#[derive(Debug, Serialize)]
pub(crate) struct Dashboard {
    pub(crate) pending_quizzes: usize,
    pub(crate) pending_essays: usize,
    pub(crate) completed_assignments: usize,
    pub(crate) pending_quizzes_list: Vec<QuizResponse>,
    pub(crate) pending_essays_list: Vec<EssayResponse>,
    pub(crate) recent_activity: Vec<ActivityEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ActivityKind {
    Quiz,
    Essay,
}

/// Graded activity carries points; an essay still waiting on feedback shows
/// the pending marker instead. Serialized as a bare number or `"Pending"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ActivityScore {
    Points(i32),
    Pending,
}

impl Serialize for ActivityScore {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ActivityScore::Points(points) => serializer.serialize_i32(*points),
            ActivityScore::Pending => serializer.serialize_str("Pending"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct ActivityEntry {
    #[serde(rename = "type")]
    pub(crate) kind: ActivityKind,
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) score: ActivityScore,
    pub(crate) submitted_at: String,
    pub(crate) status: &'static str,
}
