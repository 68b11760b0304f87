use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use quiz_core::model::{Difficulty, Question};

use crate::error::QuestionSourceError;

/// Contract for anything that can produce quiz questions.
///
/// The all-or-nothing rule applies to every implementation: either exactly
/// `count` well-formed questions come back, or the call fails. No caching,
/// no retry; each invocation is a fresh request.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Generate `count` questions for the given difficulty.
    ///
    /// # Errors
    ///
    /// Returns `QuestionSourceError` when the source is unavailable or the
    /// response cannot be turned into exactly `count` valid questions.
    async fn generate(
        &self,
        difficulty: Difficulty,
        count: usize,
    ) -> Result<Vec<Question>, QuestionSourceError>;
}

#[derive(Clone, Debug)]
pub struct QuestionSourceConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl QuestionSourceConfig {
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("QUIZ_AI_API_KEY").ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        let base_url =
            env::var("QUIZ_AI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());
        let model = env::var("QUIZ_AI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());
        Some(Self {
            base_url,
            api_key,
            model,
        })
    }
}

/// Question source backed by an OpenAI-style chat-completions endpoint.
#[derive(Clone)]
pub struct OpenAiQuestionService {
    client: Client,
    config: Option<QuestionSourceConfig>,
}

impl OpenAiQuestionService {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(QuestionSourceConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<QuestionSourceConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Whether an API key is configured. Without one the quiz cannot start.
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }
}

#[async_trait]
impl QuestionSource for OpenAiQuestionService {
    async fn generate(
        &self,
        difficulty: Difficulty,
        count: usize,
    ) -> Result<Vec<Question>, QuestionSourceError> {
        let config = self
            .config
            .as_ref()
            .ok_or(QuestionSourceError::Disabled)?;

        let url = format!(
            "{}/chat/completions",
            config.base_url.trim_end_matches('/')
        );
        let payload = ChatRequest {
            model: config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: generation_prompt(difficulty.prompt_hint(), count),
                },
            ],
            temperature: 0.7,
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(&config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(QuestionSourceError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(QuestionSourceError::EmptyResponse)?;

        parse_questions(&content, difficulty, count)
    }
}

const SYSTEM_PROMPT: &str = "You are an education expert who writes high-quality \
    quiz questions. Always produce exactly the requested number of questions.";

fn generation_prompt(hint: &str, count: usize) -> String {
    format!(
        r#"Write {count} {hint} multiple-choice questions.
Each question must have exactly 4 options. Reply with only this JSON object:

{{
    "questions": [
        {{
            "question": "question text",
            "options": ["option 1", "option 2", "option 3", "option 4"],
            "correct_answer": 0,
            "explanation": "short explanation of the answer"
        }}
    ]
}}

Requirements:
- correct_answer is the zero-based index of the right option (0-3)
- cover a variety of topics (history, science, geography, culture, sport)
- every question has one clear, factually correct answer
- keep explanations short and precise
- produce exactly {count} questions"#
    )
}

/// Turns raw model output into exactly `count` validated questions.
///
/// Partial or malformed batches are rejected whole; a surplus is truncated.
fn parse_questions(
    content: &str,
    difficulty: Difficulty,
    count: usize,
) -> Result<Vec<Question>, QuestionSourceError> {
    let batch: QuestionBatch = serde_json::from_str(content.trim())
        .map_err(|e| QuestionSourceError::Malformed(e.to_string()))?;

    if batch.questions.len() < count {
        return Err(QuestionSourceError::NotEnough {
            requested: count,
            generated: batch.questions.len(),
        });
    }

    batch
        .questions
        .into_iter()
        .take(count)
        .map(|wire| {
            Question::new(
                wire.question,
                wire.options,
                wire.correct_answer,
                wire.explanation,
                difficulty,
            )
            .map_err(|e| QuestionSourceError::Malformed(e.to_string()))
        })
        .collect()
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QuestionBatch {
    #[serde(default)]
    questions: Vec<WireQuestion>,
}

#[derive(Debug, Deserialize)]
struct WireQuestion {
    question: String,
    options: Vec<String>,
    correct_answer: usize,
    #[serde(default)]
    explanation: String,
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn wire_question(n: usize) -> String {
        format!(
            r#"{{"question": "Q{n}", "options": ["a", "b", "c", "d"], "correct_answer": 1, "explanation": "E{n}"}}"#
        )
    }

    fn batch(n: usize) -> String {
        let questions: Vec<String> = (0..n).map(wire_question).collect();
        format!(r#"{{"questions": [{}]}}"#, questions.join(", "))
    }

    #[test]
    fn parses_a_full_batch() {
        let questions = parse_questions(&batch(5), Difficulty::Easy, 5).unwrap();
        assert_eq!(questions.len(), 5);
        assert_eq!(questions[0].prompt(), "Q0");
        assert_eq!(questions[0].correct_index(), 1);
        assert_eq!(questions[0].difficulty(), Difficulty::Easy);
    }

    #[test]
    fn truncates_surplus_questions() {
        let questions = parse_questions(&batch(7), Difficulty::Normal, 5).unwrap();
        assert_eq!(questions.len(), 5);
    }

    #[test]
    fn rejects_short_batches_whole() {
        let err = parse_questions(&batch(3), Difficulty::Normal, 5).unwrap_err();
        assert!(matches!(
            err,
            QuestionSourceError::NotEnough {
                requested: 5,
                generated: 3
            }
        ));
    }

    #[test]
    fn rejects_unparseable_content() {
        let err = parse_questions("the dog ate my JSON", Difficulty::Hard, 5).unwrap_err();
        assert!(matches!(err, QuestionSourceError::Malformed(_)));
    }

    #[test]
    fn rejects_batch_with_bad_correct_index() {
        let bad = r#"{"questions": [{"question": "Q", "options": ["a", "b", "c", "d"], "correct_answer": 9, "explanation": ""}]}"#;
        let err = parse_questions(bad, Difficulty::Easy, 1).unwrap_err();
        assert!(matches!(err, QuestionSourceError::Malformed(_)));
    }

    #[test]
    fn rejects_batch_with_wrong_option_count() {
        let bad = r#"{"questions": [{"question": "Q", "options": ["a", "b"], "correct_answer": 0, "explanation": ""}]}"#;
        let err = parse_questions(bad, Difficulty::Easy, 1).unwrap_err();
        assert!(matches!(err, QuestionSourceError::Malformed(_)));
    }

    #[test]
    fn prompt_names_the_count_and_framing() {
        let prompt = generation_prompt(Difficulty::Hard.prompt_hint(), 5);
        assert!(prompt.contains("Write 5"));
        assert!(prompt.contains("university"));
    }
}
