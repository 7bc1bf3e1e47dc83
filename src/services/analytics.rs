//! Read-time aggregation over raw submission rows. Every view is recomputed
//! per request from the records passed in; nothing here touches the database.

use std::collections::{BTreeMap, HashMap, HashSet};

use time::PrimitiveDateTime;

use crate::core::time::{format_primitive, weeks_back};
use crate::db::models::{Essay, EssaySubmission, Quiz, QuizSubmission, User};
use crate::db::types::{AiFeedback, FeedbackReport};
use crate::schemas::analytics::{
    ActivityEntry, ActivityKind, ActivityScore, ClassProgressPoint, Dashboard, EssayAnalytics,
    QuizAnalytics, QuizDetailedAnalytics, QuizPerformance, StudentAnalytics, StudentScore,
    StudentSummary, TeacherOverview,
};
use crate::schemas::essay::EssayResponse;
use crate::schemas::quiz::QuizResponse;

/// Substituted for an essay submission whose feedback carries no overall score.
const DEFAULT_ESSAY_SCORE: i32 = 70;

/// A blended average strictly below this marks a student as at risk.
const AT_RISK_THRESHOLD: f64 = 70.0;

/// Recent-activity feeds never grow past this many entries.
const ACTIVITY_FEED_LIMIT: usize = 10;

/// How many ranked strengths/weaknesses a per-essay view reports.
const TOP_PHRASES: usize = 3;

/// Trailing class-progress windows, widest first ("Week 6" .. "Week 1").
const PROGRESS_WINDOW_WEEKS: i64 = 6;

pub(crate) fn quiz_analytics(quiz_id: &str, submissions: &[QuizSubmission]) -> QuizAnalytics {
    let scores: Vec<i32> = submissions.iter().map(|sub| sub.score).collect();
    let student_performance = submissions
        .iter()
        .map(|sub| StudentScore { student_id: sub.student_id.clone(), score: sub.score })
        .collect();

    QuizAnalytics {
        quiz_id: quiz_id.to_string(),
        average_score: mean(&scores),
        student_performance,
    }
}

pub(crate) fn essay_analytics(essay_id: &str, submissions: &[EssaySubmission]) -> EssayAnalytics {
    let scores: Vec<i32> = submissions.iter().map(essay_score_or_default).collect();
    let student_performance = submissions
        .iter()
        .zip(&scores)
        .map(|(sub, &score)| StudentScore { student_id: sub.student_id.clone(), score })
        .collect();

    let reports: Vec<&FeedbackReport> =
        submissions.iter().filter_map(|sub| sub.feedback().and_then(AiFeedback::report)).collect();

    EssayAnalytics {
        essay_id: essay_id.to_string(),
        average_score: mean(&scores),
        common_strengths: top_phrases(reports.iter().map(|report| report.strengths.as_slice())),
        common_weaknesses: top_phrases(reports.iter().map(|report| report.weaknesses.as_slice())),
        student_performance,
    }
}

pub(crate) fn student_analytics(
    student_id: &str,
    quizzes: &[Quiz],
    essays: &[Essay],
    quiz_submissions: &[QuizSubmission],
    essay_submissions: &[EssaySubmission],
) -> StudentAnalytics {
    let quiz_scores: Vec<i32> = quiz_submissions.iter().map(|sub| sub.score).collect();
    let essay_scores: Vec<i32> = essay_submissions.iter().map(essay_score_or_default).collect();

    StudentAnalytics {
        student_id: student_id.to_string(),
        average_quiz_score: mean(&quiz_scores),
        average_essay_score: mean(&essay_scores),
        recent_submissions: activity_feed(quizzes, essays, quiz_submissions, essay_submissions),
    }
}

pub(crate) fn teacher_overview(
    now: PrimitiveDateTime,
    quizzes: &[Quiz],
    essays: &[Essay],
    quiz_submissions: &[QuizSubmission],
    essay_submissions: &[EssaySubmission],
) -> TeacherOverview {
    let students: HashSet<&str> = quiz_submissions
        .iter()
        .map(|sub| sub.student_id.as_str())
        .chain(essay_submissions.iter().map(|sub| sub.student_id.as_str()))
        .collect();
    let total_students = students.len();

    let mut blended: Vec<i32> = quiz_submissions.iter().map(|sub| sub.score).collect();
    blended.extend(essay_submissions.iter().map(essay_score_or_default));
    let average_score = round1(mean(&blended));

    let total_assignments = quizzes.len() + essays.len();
    let actual_submissions = quiz_submissions.len() + essay_submissions.len();
    let expected_submissions = total_assignments * total_students;
    let completion_rate = if expected_submissions > 0 {
        round1(actual_submissions as f64 / expected_submissions as f64 * 100.0)
    } else {
        0.0
    };

    let mut per_student: BTreeMap<&str, Vec<i32>> = BTreeMap::new();
    for sub in quiz_submissions {
        per_student.entry(sub.student_id.as_str()).or_default().push(sub.score);
    }
    for sub in essay_submissions {
        per_student.entry(sub.student_id.as_str()).or_default().push(essay_score_or_default(sub));
    }
    let at_risk_students =
        per_student.values().filter(|scores| mean(scores) < AT_RISK_THRESHOLD).count();

    TeacherOverview {
        total_students,
        average_score,
        completion_rate,
        at_risk_students,
        quiz_performance: quiz_performance(quizzes, quiz_submissions),
        class_progress: class_progress(now, quiz_submissions),
    }
}

pub(crate) fn student_summaries(
    students: &[User],
    quiz_submissions: &[QuizSubmission],
    essay_submissions: &[EssaySubmission],
) -> Vec<StudentSummary> {
    let by_id: HashMap<&str, &User> =
        students.iter().map(|student| (student.id.as_str(), student)).collect();

    let mut grouped: BTreeMap<&str, (Vec<i32>, Vec<i32>)> = BTreeMap::new();
    for sub in quiz_submissions {
        grouped.entry(sub.student_id.as_str()).or_default().0.push(sub.score);
    }
    for sub in essay_submissions {
        grouped.entry(sub.student_id.as_str()).or_default().1.push(essay_score_or_default(sub));
    }

    let mut summaries = Vec::new();
    for (student_id, (quiz_scores, essay_scores)) in &grouped {
        // Submissions can reference an account row that no longer resolves.
        let Some(student) = by_id.get(student_id) else {
            continue;
        };

        let mut all_scores = quiz_scores.clone();
        all_scores.extend_from_slice(essay_scores);

        let mut strengths = Vec::new();
        let mut weaknesses = Vec::new();
        if !quiz_scores.is_empty() {
            let average = mean(quiz_scores);
            if average > 80.0 {
                strengths.push("Quiz Performance".to_string());
            } else if average < 60.0 {
                weaknesses.push("Quiz Performance".to_string());
            }
        }
        if !essay_scores.is_empty() {
            let average = mean(essay_scores);
            if average > 80.0 {
                strengths.push("Writing Skills".to_string());
            } else if average < 60.0 {
                weaknesses.push("Writing Skills".to_string());
            }
        }

        summaries.push(StudentSummary {
            student_id: (*student_id).to_string(),
            student_name: student.full_name.clone(),
            overall_score: round1(mean(&all_scores)),
            quiz_count: quiz_scores.len(),
            essay_count: essay_scores.len(),
            strengths,
            weaknesses,
        });
    }
    summaries
}

pub(crate) fn quiz_detailed_analytics(
    quiz_id: &str,
    submissions: &[QuizSubmission],
) -> QuizDetailedAnalytics {
    let scores: Vec<i32> = submissions.iter().map(|sub| sub.score).collect();
    QuizDetailedAnalytics {
        quiz_id: quiz_id.to_string(),
        total_submissions: submissions.len(),
        average_score: mean(&scores),
    }
}

pub(crate) fn dashboard(
    quizzes: Vec<Quiz>,
    essays: Vec<Essay>,
    quiz_submissions: &[QuizSubmission],
    essay_submissions: &[EssaySubmission],
) -> Dashboard {
    let recent_activity = activity_feed(&quizzes, &essays, quiz_submissions, essay_submissions);

    let submitted_quiz_ids: HashSet<&str> =
        quiz_submissions.iter().map(|sub| sub.quiz_id.as_str()).collect();
    let submitted_essay_ids: HashSet<&str> =
        essay_submissions.iter().map(|sub| sub.essay_id.as_str()).collect();

    let pending_quizzes_list: Vec<QuizResponse> = quizzes
        .into_iter()
        .filter(|quiz| !submitted_quiz_ids.contains(quiz.id.as_str()))
        .map(QuizResponse::from_db)
        .collect();
    let pending_essays_list: Vec<EssayResponse> = essays
        .into_iter()
        .filter(|essay| !submitted_essay_ids.contains(essay.id.as_str()))
        .map(EssayResponse::from_db)
        .collect();

    Dashboard {
        pending_quizzes: pending_quizzes_list.len(),
        pending_essays: pending_essays_list.len(),
        completed_assignments: quiz_submissions.len() + essay_submissions.len(),
        pending_quizzes_list,
        pending_essays_list,
        recent_activity,
    }
}

fn activity_feed(
    quizzes: &[Quiz],
    essays: &[Essay],
    quiz_submissions: &[QuizSubmission],
    essay_submissions: &[EssaySubmission],
) -> Vec<ActivityEntry> {
    let quiz_titles: HashMap<&str, &str> =
        quizzes.iter().map(|quiz| (quiz.id.as_str(), quiz.title.as_str())).collect();
    let essay_prompts: HashMap<&str, &str> =
        essays.iter().map(|essay| (essay.id.as_str(), essay.prompt.as_str())).collect();

    let mut entries: Vec<(PrimitiveDateTime, ActivityEntry)> = Vec::new();
    for sub in quiz_submissions {
        let title = quiz_titles.get(sub.quiz_id.as_str()).copied().unwrap_or(&sub.quiz_id);
        entries.push((
            sub.submitted_at,
            ActivityEntry {
                kind: ActivityKind::Quiz,
                id: sub.id.clone(),
                title: format!("Quiz: {title}"),
                score: ActivityScore::Points(sub.score),
                submitted_at: format_primitive(sub.submitted_at),
                status: "completed",
            },
        ));
    }
    for sub in essay_submissions {
        let prompt = essay_prompts.get(sub.essay_id.as_str()).copied().unwrap_or(&sub.essay_id);
        let score = sub
            .feedback()
            .and_then(AiFeedback::overall_score)
            .map(ActivityScore::Points)
            .unwrap_or(ActivityScore::Pending);
        entries.push((
            sub.submitted_at,
            ActivityEntry {
                kind: ActivityKind::Essay,
                id: sub.id.clone(),
                title: format!("Essay: {}...", truncate_chars(prompt, 50)),
                score,
                submitted_at: format_primitive(sub.submitted_at),
                status: "completed",
            },
        ));
    }

    entries.sort_by(|a, b| b.0.cmp(&a.0));
    entries.truncate(ACTIVITY_FEED_LIMIT);
    entries.into_iter().map(|(_, entry)| entry).collect()
}

fn quiz_performance(quizzes: &[Quiz], submissions: &[QuizSubmission]) -> Vec<QuizPerformance> {
    let mut points = Vec::new();
    for quiz in quizzes {
        let scores: Vec<i32> = submissions
            .iter()
            .filter(|sub| sub.quiz_id == quiz.id)
            .map(|sub| sub.score)
            .collect();
        if scores.is_empty() {
            continue;
        }
        let average = mean(&scores);
        points.push(QuizPerformance {
            question: format!("{}...", truncate_chars(&quiz.title, 20)),
            correct: average,
            incorrect: 100.0 - average,
            difficulty: difficulty_label(average),
        });
    }
    points
}

fn class_progress(
    now: PrimitiveDateTime,
    submissions: &[QuizSubmission],
) -> Vec<ClassProgressPoint> {
    let mut points = Vec::new();
    for weeks in (1..=PROGRESS_WINDOW_WEEKS).rev() {
        let boundary = weeks_back(now, weeks);
        let scores: Vec<i32> = submissions
            .iter()
            .filter(|sub| sub.submitted_at >= boundary)
            .map(|sub| sub.score)
            .collect();
        if scores.is_empty() {
            continue;
        }
        points.push(ClassProgressPoint { name: format!("Week {weeks}"), average: mean(&scores) });
    }
    points
}

fn difficulty_label(average: f64) -> &'static str {
    if average > 80.0 {
        "Easy"
    } else if average > 60.0 {
        "Medium"
    } else {
        "Hard"
    }
}

fn top_phrases<'a>(lists: impl Iterator<Item = &'a [String]>) -> Vec<String> {
    let mut counts: BTreeMap<&'a str, usize> = BTreeMap::new();
    for list in lists {
        for phrase in list {
            *counts.entry(phrase.as_str()).or_insert(0) += 1;
        }
    }

    // BTreeMap ordering makes ties resolve alphabetically under the stable sort.
    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.into_iter().take(TOP_PHRASES).map(|(phrase, _)| phrase.to_string()).collect()
}

fn essay_score_or_default(submission: &EssaySubmission) -> i32 {
    submission.feedback().and_then(AiFeedback::overall_score).unwrap_or(DEFAULT_ESSAY_SCORE)
}

fn mean(scores: &[i32]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().map(|&score| f64::from(score)).sum::<f64>() / scores.len() as f64
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::types::Json;
    use time::macros::datetime;
    use time::Duration;

    use crate::db::types::{Question, UserRole};

    fn quiz(id: &str, title: &str) -> Quiz {
        Quiz {
            id: id.to_string(),
            teacher_id: "teacher-1".to_string(),
            title: title.to_string(),
            questions: Json(Vec::<Question>::new()),
            created_at: datetime!(2025-01-01 08:00),
        }
    }

    fn essay(id: &str, prompt: &str) -> Essay {
        Essay {
            id: id.to_string(),
            teacher_id: "teacher-1".to_string(),
            prompt: prompt.to_string(),
            rubric: Json(BTreeMap::new()),
            created_at: datetime!(2025-01-01 08:00),
        }
    }

    fn quiz_sub(
        id: &str,
        quiz_id: &str,
        student_id: &str,
        score: i32,
        at: PrimitiveDateTime,
    ) -> QuizSubmission {
        QuizSubmission {
            id: id.to_string(),
            quiz_id: quiz_id.to_string(),
            student_id: student_id.to_string(),
            answers: Json(BTreeMap::new()),
            score,
            submitted_at: at,
        }
    }

    fn essay_sub(
        id: &str,
        essay_id: &str,
        student_id: &str,
        feedback: Option<AiFeedback>,
        at: PrimitiveDateTime,
    ) -> EssaySubmission {
        EssaySubmission {
            id: id.to_string(),
            essay_id: essay_id.to_string(),
            student_id: student_id.to_string(),
            content: "My essay".to_string(),
            ai_feedback: feedback.map(Json),
            rubric_scores: None,
            submitted_at: at,
        }
    }

    fn ready(overall: Option<i32>, strengths: &[&str], weaknesses: &[&str]) -> AiFeedback {
        AiFeedback::Ready {
            report: FeedbackReport {
                grammar_score: 80,
                clarity_score: 75,
                keyword_usage_score: 70,
                overall_feedback: "Nice work".to_string(),
                strengths: strengths.iter().map(|s| s.to_string()).collect(),
                weaknesses: weaknesses.iter().map(|s| s.to_string()).collect(),
                suggestions: Vec::new(),
                overall_score: overall,
            },
        }
    }

    fn student(id: &str, name: &str) -> User {
        User {
            id: id.to_string(),
            firebase_uid: format!("fb-{id}"),
            email: format!("{id}@school.test"),
            full_name: name.to_string(),
            role: UserRole::Student,
            created_at: datetime!(2025-01-01 08:00),
        }
    }

    #[test]
    fn quiz_analytics_over_zero_submissions_is_zero() {
        let view = quiz_analytics("q1", &[]);
        assert_eq!(view.average_score, 0.0);
        assert!(view.student_performance.is_empty());
    }

    #[test]
    fn quiz_analytics_averages_and_lists_scores() {
        let subs = vec![
            quiz_sub("qs1", "q1", "alice", 100, datetime!(2025-02-01 10:00)),
            quiz_sub("qs2", "q1", "bob", 50, datetime!(2025-02-01 11:00)),
        ];
        let view = quiz_analytics("q1", &subs);
        assert_eq!(view.average_score, 75.0);
        assert_eq!(
            view.student_performance,
            vec![
                StudentScore { student_id: "alice".to_string(), score: 100 },
                StudentScore { student_id: "bob".to_string(), score: 50 },
            ]
        );
    }

    #[test]
    fn essay_analytics_defaults_scoreless_submissions() {
        let subs = vec![
            essay_sub(
                "es1",
                "e1",
                "alice",
                Some(ready(Some(90), &[], &[])),
                datetime!(2025-02-01 10:00),
            ),
            essay_sub("es2", "e1", "bob", None, datetime!(2025-02-01 11:00)),
        ];
        let view = essay_analytics("e1", &subs);
        assert_eq!(view.average_score, 80.0);
        assert_eq!(view.student_performance[0].score, 90);
        assert_eq!(view.student_performance[1].score, 70);
    }

    #[test]
    fn essay_analytics_ranks_phrases_by_frequency_then_name() {
        let subs = vec![
            essay_sub(
                "es1",
                "e1",
                "a",
                Some(ready(
                    None,
                    &["Clear thesis", "Strong vocabulary", "Vivid examples"],
                    &["Run-on sentences"],
                )),
                datetime!(2025-02-01 10:00),
            ),
            essay_sub(
                "es2",
                "e1",
                "b",
                Some(ready(None, &["Clear thesis"], &["Run-on sentences", "Weak conclusion"])),
                datetime!(2025-02-01 11:00),
            ),
            essay_sub(
                "es3",
                "e1",
                "c",
                Some(ready(
                    None,
                    &["Good pacing", "Clear thesis", "Strong vocabulary"],
                    &["Comma splices", "Weak conclusion"],
                )),
                datetime!(2025-02-01 12:00),
            ),
        ];
        let view = essay_analytics("e1", &subs);
        assert_eq!(view.common_strengths, ["Clear thesis", "Strong vocabulary", "Good pacing"]);
        assert_eq!(
            view.common_weaknesses,
            ["Run-on sentences", "Weak conclusion", "Comma splices"]
        );
    }

    #[test]
    fn essay_analytics_over_zero_submissions_is_zero() {
        let view = essay_analytics("e1", &[]);
        assert_eq!(view.average_score, 0.0);
        assert!(view.common_strengths.is_empty());
        assert!(view.student_performance.is_empty());
    }

    #[test]
    fn student_analytics_over_zero_submissions_is_zero() {
        let view = student_analytics("alice", &[], &[], &[], &[]);
        assert_eq!(view.average_quiz_score, 0.0);
        assert_eq!(view.average_essay_score, 0.0);
        assert!(view.recent_submissions.is_empty());
    }

    #[test]
    fn student_analytics_blends_real_and_default_essay_scores() {
        let quizzes = vec![quiz("q1", "Fractions")];
        let essays = vec![essay("e1", "Describe your hometown")];
        let quiz_subs = vec![quiz_sub("qs1", "q1", "alice", 80, datetime!(2025-02-01 10:00))];
        let essay_subs = vec![
            essay_sub(
                "es1",
                "e1",
                "alice",
                Some(ready(Some(90), &[], &[])),
                datetime!(2025-02-02 10:00),
            ),
            essay_sub("es2", "e1", "alice", None, datetime!(2025-02-03 10:00)),
        ];
        let view = student_analytics("alice", &quizzes, &essays, &quiz_subs, &essay_subs);
        assert_eq!(view.average_quiz_score, 80.0);
        assert_eq!(view.average_essay_score, 80.0);
        assert_eq!(view.recent_submissions.len(), 3);
        assert_eq!(view.recent_submissions[0].id, "es2");
    }

    #[test]
    fn overview_counts_distinct_students_and_completion() {
        let now = datetime!(2025-03-01 12:00);
        let quizzes = vec![quiz("q1", "Fractions"), quiz("q2", "Decimals")];
        let essays = vec![essay("e1", "Describe your hometown")];
        let quiz_subs = vec![
            quiz_sub("qs1", "q1", "alice", 80, datetime!(2025-02-27 10:00)),
            quiz_sub("qs2", "q1", "bob", 70, datetime!(2025-02-27 11:00)),
            quiz_sub("qs3", "q2", "cara", 60, datetime!(2025-02-27 12:00)),
        ];
        let essay_subs = vec![
            essay_sub(
                "es1",
                "e1",
                "alice",
                Some(ready(Some(90), &[], &[])),
                datetime!(2025-02-28 10:00),
            ),
            essay_sub("es2", "e1", "bob", None, datetime!(2025-02-28 11:00)),
        ];

        let view = teacher_overview(now, &quizzes, &essays, &quiz_subs, &essay_subs);
        assert_eq!(view.total_students, 3);
        // 5 submissions out of 3 assignments x 3 students.
        assert_eq!(view.completion_rate, 55.6);
        assert_eq!(view.average_score, 74.0);
        assert_eq!(view.at_risk_students, 1);
    }

    #[test]
    fn overview_over_no_data_is_all_zero() {
        let view = teacher_overview(datetime!(2025-03-01 12:00), &[], &[], &[], &[]);
        assert_eq!(view.total_students, 0);
        assert_eq!(view.average_score, 0.0);
        assert_eq!(view.completion_rate, 0.0);
        assert_eq!(view.at_risk_students, 0);
        assert!(view.quiz_performance.is_empty());
        assert!(view.class_progress.is_empty());
    }

    #[test]
    fn overview_labels_quiz_difficulty_bands() {
        let now = datetime!(2025-03-01 12:00);
        let quizzes = vec![
            quiz("q1", "Introductory fractions practice"),
            quiz("q2", "Decimals"),
            quiz("q3", "Ratios"),
            quiz("q4", "Untaken"),
        ];
        let subs = vec![
            quiz_sub("qs1", "q1", "a", 85, datetime!(2025-02-27 10:00)),
            quiz_sub("qs2", "q2", "a", 70, datetime!(2025-02-27 11:00)),
            quiz_sub("qs3", "q3", "a", 50, datetime!(2025-02-27 12:00)),
        ];
        let view = teacher_overview(now, &quizzes, &[], &subs, &[]);
        assert_eq!(view.quiz_performance.len(), 3);
        assert_eq!(view.quiz_performance[0].question, "Introductory fractio...");
        assert_eq!(view.quiz_performance[0].correct, 85.0);
        assert_eq!(view.quiz_performance[0].incorrect, 15.0);
        assert_eq!(view.quiz_performance[0].difficulty, "Easy");
        assert_eq!(view.quiz_performance[1].difficulty, "Medium");
        assert_eq!(view.quiz_performance[2].difficulty, "Hard");
    }

    #[test]
    fn difficulty_bands_are_strict() {
        assert_eq!(difficulty_label(80.0), "Medium");
        assert_eq!(difficulty_label(60.0), "Hard");
    }

    #[test]
    fn class_progress_builds_trailing_windows_and_skips_empty() {
        let now = datetime!(2025-03-01 12:00);
        let quizzes = vec![quiz("q1", "Fractions")];
        let subs = vec![
            quiz_sub("qs1", "q1", "a", 80, datetime!(2025-02-19 12:00)),
            quiz_sub("qs2", "q1", "a", 60, datetime!(2025-01-01 12:00)),
        ];
        let view = teacher_overview(now, &quizzes, &[], &subs, &[]);
        let names: Vec<&str> =
            view.class_progress.iter().map(|point| point.name.as_str()).collect();
        assert_eq!(names, ["Week 6", "Week 5", "Week 4", "Week 3", "Week 2"]);
        assert!(view.class_progress.iter().all(|point| point.average == 80.0));
    }

    #[test]
    fn student_summaries_label_bands_and_skip_unknown_accounts() {
        let students = vec![student("alice", "Alice Park"), student("bob", "Bob Lane")];
        let quiz_subs = vec![
            quiz_sub("qs1", "q1", "alice", 90, datetime!(2025-02-01 10:00)),
            quiz_sub("qs2", "q2", "alice", 85, datetime!(2025-02-01 11:00)),
            quiz_sub("qs3", "q1", "bob", 55, datetime!(2025-02-01 12:00)),
            quiz_sub("qs4", "q1", "ghost", 100, datetime!(2025-02-01 13:00)),
        ];
        let essay_subs = vec![essay_sub(
            "es1",
            "e1",
            "alice",
            Some(ready(Some(50), &[], &[])),
            datetime!(2025-02-02 10:00),
        )];

        let summaries = student_summaries(&students, &quiz_subs, &essay_subs);
        assert_eq!(summaries.len(), 2);

        let alice = &summaries[0];
        assert_eq!(alice.student_id, "alice");
        assert_eq!(alice.student_name, "Alice Park");
        assert_eq!(alice.overall_score, 75.0);
        assert_eq!(alice.quiz_count, 2);
        assert_eq!(alice.essay_count, 1);
        assert_eq!(alice.strengths, ["Quiz Performance"]);
        assert_eq!(alice.weaknesses, ["Writing Skills"]);

        let bob = &summaries[1];
        assert_eq!(bob.overall_score, 55.0);
        assert!(bob.strengths.is_empty());
        assert_eq!(bob.weaknesses, ["Quiz Performance"]);
    }

    #[test]
    fn detailed_quiz_analytics_counts_and_averages() {
        let subs = vec![
            quiz_sub("qs1", "q1", "alice", 90, datetime!(2025-02-01 10:00)),
            quiz_sub("qs2", "q1", "bob", 60, datetime!(2025-02-01 11:00)),
        ];
        let view = quiz_detailed_analytics("q1", &subs);
        assert_eq!(view.total_submissions, 2);
        assert_eq!(view.average_score, 75.0);

        let empty = quiz_detailed_analytics("q1", &[]);
        assert_eq!(empty.total_submissions, 0);
        assert_eq!(empty.average_score, 0.0);
    }

    #[test]
    fn dashboard_partitions_pending_from_submitted() {
        let quizzes = vec![quiz("q1", "Fractions"), quiz("q2", "Decimals")];
        let essays = vec![essay("e1", "Describe your hometown")];
        let quiz_subs = vec![quiz_sub("qs1", "q1", "alice", 80, datetime!(2025-02-01 10:00))];

        let view = dashboard(quizzes, essays, &quiz_subs, &[]);
        assert_eq!(view.pending_quizzes, 1);
        assert_eq!(view.pending_quizzes_list[0].id, "q2");
        assert_eq!(view.pending_essays, 1);
        assert_eq!(view.completed_assignments, 1);
    }

    #[test]
    fn dashboard_activity_is_newest_first_and_capped() {
        let quizzes = vec![quiz("q1", "Fractions")];
        let mut quiz_subs = Vec::new();
        for hour in 0..12i64 {
            quiz_subs.push(quiz_sub(
                &format!("qs{hour}"),
                "q1",
                "alice",
                80,
                datetime!(2025-02-01 00:00) + Duration::hours(hour),
            ));
        }

        let view = dashboard(quizzes, Vec::new(), &quiz_subs, &[]);
        assert_eq!(view.recent_activity.len(), 10);
        assert_eq!(view.recent_activity[0].id, "qs11");
        assert_eq!(view.recent_activity[9].id, "qs2");
        assert_eq!(view.recent_activity[0].title, "Quiz: Fractions");
        assert_eq!(view.recent_activity[0].score, ActivityScore::Points(80));
    }

    #[test]
    fn essay_activity_truncates_prompt_and_marks_pending() {
        let essays = vec![essay(
            "e1",
            "Write about a person who changed the way you think about the world",
        )];
        let essay_subs = vec![essay_sub("es1", "e1", "alice", None, datetime!(2025-02-01 10:00))];

        let view = dashboard(Vec::new(), essays, &[], &essay_subs);
        let entry = &view.recent_activity[0];
        assert_eq!(entry.kind, ActivityKind::Essay);
        assert_eq!(entry.title, "Essay: Write about a person who changed the way you think...");
        assert_eq!(entry.score, ActivityScore::Pending);
        assert_eq!(entry.status, "completed");
    }

    #[test]
    fn truncate_chars_respects_utf8_boundaries() {
        assert_eq!(truncate_chars("héllo wörld", 6), "héllo ");
        assert_eq!(truncate_chars("short", 20), "short");
    }
}
