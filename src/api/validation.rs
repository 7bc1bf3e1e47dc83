use crate::api::errors::ApiError;
use crate::db::types::Question;

pub(crate) const MIN_OPTIONS: usize = 2;

pub(crate) fn validate_questions(questions: &[Question]) -> Result<(), ApiError> {
    for (position, question) in questions.iter().enumerate() {
        if question.text.trim().is_empty() {
            return Err(ApiError::BadRequest(format!(
                "Question {position} must have non-empty text"
            )));
        }
        if question.options.len() < MIN_OPTIONS {
            return Err(ApiError::BadRequest(format!(
                "Question {position} must offer at least {MIN_OPTIONS} options"
            )));
        }
        if question.options.iter().any(|option| option.trim().is_empty()) {
            return Err(ApiError::BadRequest(format!(
                "Question {position} has an empty option"
            )));
        }
        let in_range =
            question.correct_answer >= 0 && (question.correct_answer as usize) < question.options.len();
        if !in_range {
            return Err(ApiError::BadRequest(format!(
                "Question {position} correct_answer is out of range"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(text: &str, options: &[&str], correct_answer: i32) -> Question {
        Question {
            text: text.to_string(),
            options: options.iter().map(|s| s.to_string()).collect(),
            correct_answer,
        }
    }

    #[test]
    fn accepts_well_formed_questions() {
        let questions = vec![
            question("2 + 2 = ?", &["3", "4"], 1),
            question("Capital of France?", &["Paris", "Rome", "Berlin"], 0),
        ];
        assert!(validate_questions(&questions).is_ok());
    }

    #[test]
    fn rejects_single_option() {
        let questions = vec![question("Pick one", &["only"], 0)];
        assert!(matches!(validate_questions(&questions), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn rejects_out_of_range_answer_key() {
        let questions = vec![question("Pick one", &["a", "b"], 2)];
        assert!(matches!(validate_questions(&questions), Err(ApiError::BadRequest(_))));

        let negative = vec![question("Pick one", &["a", "b"], -1)];
        assert!(matches!(validate_questions(&negative), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn rejects_blank_text() {
        let questions = vec![question("   ", &["a", "b"], 0)];
        assert!(matches!(validate_questions(&questions), Err(ApiError::BadRequest(_))));
    }
}
