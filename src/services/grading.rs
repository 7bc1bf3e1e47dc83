use crate::db::types::{AnswerMap, Question};

/// Score a submission against the quiz answer key.
///
/// Answers are keyed by stringified question position; a missing key counts
/// as incorrect. Returns an integer in [0, 100], 0 for a quiz with no
/// questions.
pub(crate) fn grade(questions: &[Question], answers: &AnswerMap) -> i32 {
    if questions.is_empty() {
        return 0;
    }

    let correct = questions
        .iter()
        .enumerate()
        .filter(|(position, question)| {
            answers.get(&position.to_string()) == Some(&question.correct_answer)
        })
        .count();

    ((correct as f64 / questions.len() as f64) * 100.0).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(correct_answer: i32) -> Question {
        Question {
            text: "Pick one".to_string(),
            options: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            correct_answer,
        }
    }

    fn answers(pairs: &[(&str, i32)]) -> AnswerMap {
        pairs.iter().map(|(key, value)| (key.to_string(), *value)).collect()
    }

    #[test]
    fn all_correct_scores_100() {
        let questions = vec![question(2), question(1)];
        assert_eq!(grade(&questions, &answers(&[("0", 2), ("1", 1)])), 100);
    }

    #[test]
    fn half_correct_scores_50() {
        let questions = vec![question(2), question(1)];
        assert_eq!(grade(&questions, &answers(&[("0", 2), ("1", 0)])), 50);
    }

    #[test]
    fn no_answers_scores_0() {
        let questions = vec![question(0), question(1), question(2)];
        assert_eq!(grade(&questions, &AnswerMap::new()), 0);
    }

    #[test]
    fn empty_quiz_scores_0() {
        assert_eq!(grade(&[], &answers(&[("0", 1)])), 0);
    }

    #[test]
    fn missing_position_counts_as_incorrect() {
        let questions = vec![question(1), question(1)];
        assert_eq!(grade(&questions, &answers(&[("1", 1)])), 50);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let questions = vec![question(1)];
        assert_eq!(grade(&questions, &answers(&[("0", 1), ("7", 1), ("x", 1)])), 100);
    }

    #[test]
    fn score_rounds_to_nearest_integer() {
        let questions = vec![question(0), question(0), question(0)];
        assert_eq!(grade(&questions, &answers(&[("0", 0)])), 33);
        assert_eq!(grade(&questions, &answers(&[("0", 0), ("1", 0)])), 67);
    }

    #[test]
    fn grade_is_deterministic_and_bounded() {
        let questions: Vec<Question> = (0..7).map(|i| question(i % 3)).collect();
        let submitted = answers(&[("0", 0), ("1", 1), ("2", 2), ("3", 0), ("4", 1)]);

        let first = grade(&questions, &submitted);
        let second = grade(&questions, &submitted);
        assert_eq!(first, second);
        assert!((0..=100).contains(&first));
    }
}
