use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::json;
use thiserror::Error;

use crate::core::config::Settings;
use crate::db::types::{AiFeedback, FeedbackReport, Rubric};

const FEEDBACK_SYSTEM_PROMPT: &str =
    "You are an experienced English teacher providing detailed essay feedback.";

const PARSE_ERROR: &str = "Could not parse AI feedback";

#[derive(Debug, Error)]
enum ProviderError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("missing response content")]
    MissingContent,
}

/// Client for the chat-completion provider that turns essays into structured
/// feedback. Constructed once at startup and shared through application
/// state; `generate_feedback` never fails, it degrades.
#[derive(Debug, Clone)]
pub(crate) struct FeedbackService {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f64,
}

impl FeedbackService {
    pub(crate) fn from_settings(settings: &Settings) -> Result<Self> {
        let timeout = Duration::from_secs(settings.ai().ai_request_timeout);
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_key: settings.ai().openai_api_key.clone(),
            base_url: settings.ai().openai_base_url.trim_end_matches('/').to_string(),
            model: settings.ai().ai_model.clone(),
            max_tokens: settings.ai().ai_max_tokens,
            temperature: settings.ai().ai_temperature,
        })
    }

    /// Produce feedback for one essay submission.
    ///
    /// Every provider problem is absorbed here: transport and provider
    /// errors become the neutral fallback record, unstructured output
    /// becomes the unparsable record. The caller always gets a value.
    pub(crate) async fn generate_feedback(
        &self,
        submission_id: &str,
        essay_text: &str,
        rubric: &Rubric,
    ) -> AiFeedback {
        let feedback = match self.request_completion(essay_text, rubric).await {
            Ok(content) => parse_feedback(&content),
            Err(err) => {
                tracing::warn!(
                    submission_id = %submission_id,
                    error = %err,
                    "Essay feedback provider failed, using neutral fallback"
                );
                fallback_feedback(err.to_string())
            }
        };

        let outcome = match &feedback {
            AiFeedback::Ready { .. } => "ready",
            AiFeedback::Fallback { .. } => "fallback",
            AiFeedback::Unparsable { .. } => "unparsable",
        };
        metrics::counter!("essay_feedback_total", "outcome" => outcome).increment(1);

        match &feedback {
            AiFeedback::Ready { .. } => {
                tracing::info!(submission_id = %submission_id, "Essay feedback generated");
            }
            AiFeedback::Unparsable { .. } => {
                tracing::warn!(
                    submission_id = %submission_id,
                    "Essay feedback response could not be structured"
                );
            }
            AiFeedback::Fallback { .. } => {}
        }

        feedback
    }

    async fn request_completion(
        &self,
        essay_text: &str,
        rubric: &Rubric,
    ) -> Result<String, ProviderError> {
        let rubric_text = serde_json::to_string_pretty(rubric).unwrap_or_default();
        let user_prompt = format!(
            "Analyze this essay and provide feedback based on the following rubric:\n\
             {rubric_text}\n\n\
             Essay:\n{essay_text}\n\n\
             Provide feedback in JSON format with:\n\
             - grammar_score (0-100)\n\
             - clarity_score (0-100)\n\
             - keyword_usage_score (0-100)\n\
             - overall_feedback (string)\n\
             - strengths (list of strings)\n\
             - weaknesses (list of strings)\n\
             - suggestions (list of strings)"
        );

        let payload = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": FEEDBACK_SYSTEM_PROMPT},
                {"role": "user", "content": user_prompt}
            ],
            "max_completion_tokens": self.max_tokens,
            "temperature": self.temperature,
            "response_format": {"type": "json_object"}
        });

        let url = format!("{}/chat/completions", self.base_url);
        let response =
            self.client.post(&url).bearer_auth(&self.api_key).json(&payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status { status: status.as_u16(), body });
        }

        let body: serde_json::Value = response.json().await?;
        body.get("choices")
            .and_then(|choices| choices.get(0))
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(|value| value.as_str())
            .map(|content| content.to_string())
            .ok_or(ProviderError::MissingContent)
    }
}

/// Parse provider output into a report, tolerating a markdown fence or
/// surrounding prose. Anything that does not yield a complete report becomes
/// the unparsable record carrying the raw text.
fn parse_feedback(content: &str) -> AiFeedback {
    let candidate = extract_json(content);
    match serde_json::from_str::<FeedbackReport>(candidate) {
        Ok(report) => AiFeedback::Ready { report: report.clamped() },
        Err(_) => AiFeedback::Unparsable {
            error: PARSE_ERROR.to_string(),
            raw: content.to_string(),
        },
    }
}

/// Fixed mid-range feedback used when the provider is unreachable or errors.
fn fallback_feedback(error: String) -> AiFeedback {
    AiFeedback::Fallback {
        report: FeedbackReport {
            grammar_score: 75,
            clarity_score: 70,
            keyword_usage_score: 65,
            overall_feedback: "Basic feedback generated".to_string(),
            strengths: vec!["Good structure".to_string(), "Clear introduction".to_string()],
            weaknesses: vec![
                "Need more examples".to_string(),
                "Grammar needs improvement".to_string(),
            ],
            suggestions: vec![
                "Add more supporting evidence".to_string(),
                "Review grammar rules".to_string(),
            ],
            overall_score: None,
        },
        error,
    }
}

/// Best-effort extraction of the JSON object inside a completion. Tries a
/// ```json fence, then a plain fence, then the outermost brace pair.
fn extract_json(content: &str) -> &str {
    let trimmed = content.trim();

    if let Some(start) = trimmed.find("```json") {
        let rest = &trimmed[start + 7..];
        if let Some(end) = rest.find("```") {
            return rest[..end].trim();
        }
    }

    if let Some(rest) = trimmed.strip_prefix("```") {
        if let Some(end) = rest.find("```") {
            return rest[..end].trim();
        }
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            return &trimmed[start..=end];
        }
    }

    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_FEEDBACK: &str = r#"{
        "grammar_score": 82,
        "clarity_score": 78,
        "keyword_usage_score": 64,
        "overall_feedback": "A well organised essay.",
        "strengths": ["Strong thesis"],
        "weaknesses": ["Repetitive phrasing"],
        "suggestions": ["Vary sentence openings"]
    }"#;

    #[test]
    fn parse_feedback_accepts_plain_json() {
        match parse_feedback(VALID_FEEDBACK) {
            AiFeedback::Ready { report } => {
                assert_eq!(report.grammar_score, 82);
                assert_eq!(report.strengths, vec!["Strong thesis".to_string()]);
                assert_eq!(report.overall_score, None);
            }
            other => panic!("expected ready feedback, got {other:?}"),
        }
    }

    #[test]
    fn parse_feedback_accepts_fenced_json() {
        let fenced = format!("Here is my assessment:\n```json\n{VALID_FEEDBACK}\n```\nDone.");
        assert!(matches!(parse_feedback(&fenced), AiFeedback::Ready { .. }));
    }

    #[test]
    fn parse_feedback_accepts_json_inside_prose() {
        let wrapped = format!("Sure! {VALID_FEEDBACK} Hope this helps.");
        assert!(matches!(parse_feedback(&wrapped), AiFeedback::Ready { .. }));
    }

    #[test]
    fn parse_feedback_clamps_out_of_range_scores() {
        let raw = r#"{
            "grammar_score": 240,
            "clarity_score": -10,
            "keyword_usage_score": 64,
            "overall_feedback": "ok",
            "strengths": [],
            "weaknesses": [],
            "suggestions": []
        }"#;
        match parse_feedback(raw) {
            AiFeedback::Ready { report } => {
                assert_eq!(report.grammar_score, 100);
                assert_eq!(report.clarity_score, 0);
            }
            other => panic!("expected ready feedback, got {other:?}"),
        }
    }

    #[test]
    fn parse_feedback_keeps_raw_text_when_not_json() {
        let raw = "I think the essay was quite good overall.";
        match parse_feedback(raw) {
            AiFeedback::Unparsable { error, raw: kept } => {
                assert_eq!(error, PARSE_ERROR);
                assert_eq!(kept, raw);
            }
            other => panic!("expected unparsable feedback, got {other:?}"),
        }
    }

    #[test]
    fn parse_feedback_rejects_incomplete_report() {
        let missing_fields = r#"{"grammar_score": 80}"#;
        assert!(matches!(parse_feedback(missing_fields), AiFeedback::Unparsable { .. }));
    }

    #[test]
    fn fallback_feedback_uses_neutral_scores() {
        match fallback_feedback("connection refused".to_string()) {
            AiFeedback::Fallback { report, error } => {
                assert_eq!(report.grammar_score, 75);
                assert_eq!(report.clarity_score, 70);
                assert_eq!(report.keyword_usage_score, 65);
                assert_eq!(error, "connection refused");
            }
            other => panic!("expected fallback feedback, got {other:?}"),
        }
    }

    #[test]
    fn extract_json_prefers_fenced_block() {
        let content = "```json\n{\"a\": 1}\n```";
        assert_eq!(extract_json(content), "{\"a\": 1}");

        let plain_fence = "```\n{\"a\": 1}\n```";
        assert_eq!(extract_json(plain_fence), "{\"a\": 1}");
    }

    #[tokio::test]
    async fn generate_feedback_degrades_when_provider_unreachable() {
        let service = FeedbackService {
            client: Client::builder()
                .connect_timeout(Duration::from_millis(250))
                .timeout(Duration::from_secs(1))
                .build()
                .unwrap(),
            api_key: "test-key".to_string(),
            // nothing listens on this port; the call must degrade, not fail
            base_url: "http://127.0.0.1:9".to_string(),
            model: "test-model".to_string(),
            max_tokens: 100,
            temperature: 0.7,
        };

        let feedback =
            service.generate_feedback("submission-1", "An essay.", &Rubric::new()).await;

        match feedback {
            AiFeedback::Fallback { report, error } => {
                assert_eq!(report.grammar_score, 75);
                assert!(!error.is_empty());
            }
            other => panic!("expected fallback feedback, got {other:?}"),
        }
    }
}
