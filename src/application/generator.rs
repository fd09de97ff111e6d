//! Item generation pipeline.
//!
//! One request walks a short state machine: build context, build prompt,
//! invoke the completion capability, parse the response. The completion call
//! is the single point of external non-determinism, so failure handling is
//! isolated at that boundary: invocation errors yield a deterministic
//! fallback item, parse errors degrade to the raw model output, and only a
//! context-build failure (store unreachable) propagates as a hard error.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, instrument, warn};

use crate::application::retriever::{RetrievedContext, Retriever};
use crate::domain::models::{FallbackItem, GeneratedItem, GenerationOutcome};
use crate::domain::ports::CompletionClient;

/// The system/user prompt pair for one generation request.
#[derive(Debug, Clone)]
pub struct ItemPrompt {
    pub system: String,
    pub user: String,
}

impl ItemPrompt {
    /// Compose the generation prompt from retrieved context.
    ///
    /// The output schema is stated as a prose example; it is enforced only
    /// when the response is parsed.
    pub fn build(exam: &str, difficulty: &str, context: &RetrievedContext) -> Self {
        let system = format!(
            "You are an expert assessment specialist for the {} exam. \
             Your goal is to create high-quality, valid multiple-choice questions \
             that measure specific competencies.",
            exam
        );

        let user = format!(
            "TASK: Generate a multiple-choice question (4 options: A, B, C, D) for the '{exam}' exam.\n\
             \n\
             COMPETENCY/SKILL TARGET:\n\
             {skill_card}\n\
             \n\
             DIFFICULTY: {difficulty}\n\
             \n\
             GUIDELINES FOR DISTRACTORS:\n\
             Use the following patterns to create plausible but incorrect answers:\n\
             {distractors}\n\
             \n\
             OUTPUT FORMAT (JSON):\n\
             {{\n\
                 \"stimulus\": \"The context text or situation...\",\n\
                 \"question_stem\": \"The specific question...\",\n\
                 \"options\": {{\n\
                     \"A\": \"...\",\n\
                     \"B\": \"...\",\n\
                     \"C\": \"...\",\n\
                     \"D\": \"...\"\n\
                 }},\n\
                 \"correct_option\": \"A|B|C|D\",\n\
                 \"rationale\": \"Explanation of why the correct answer is correct...\",\n\
                 \"distractor_rationales\": {{\n\
                     \"wrong_option_1\": \"Why it is wrong...\",\n\
                     \"wrong_option_2\": \"...\"\n\
                 }}\n\
             }}",
            exam = exam,
            skill_card = context.skill_card,
            difficulty = difficulty,
            distractors = context.distractor_guidance,
        );

        Self { system, user }
    }
}

/// Generates multiple-choice exam items grounded in retrieved knowledge.
pub struct ItemGenerator<R: Retriever, C: CompletionClient> {
    retriever: Arc<R>,
    completions: Arc<C>,
}

impl<R: Retriever, C: CompletionClient> ItemGenerator<R, C> {
    pub fn new(retriever: Arc<R>, completions: Arc<C>) -> Self {
        Self {
            retriever,
            completions,
        }
    }

    /// Generate one item for the given exam, skill, and difficulty.
    ///
    /// A retrieval miss is not a failure: generation proceeds with a
    /// placeholder skill description. A store failure during context build
    /// is a hard error, since no context means no valid prompt. Completion
    /// failures never escape: they become the fallback item.
    #[instrument(skip(self), fields(exam = exam, skill = skill, difficulty = difficulty))]
    pub async fn generate_item(
        &self,
        exam: &str,
        skill: &str,
        difficulty: &str,
    ) -> Result<GenerationOutcome> {
        let context = self
            .retriever
            .retrieve(exam, skill, None)
            .await
            .context("failed to build generation context")?;

        let prompt = ItemPrompt::build(exam, difficulty, &context);

        match self.completions.complete(&prompt.system, &prompt.user).await {
            Ok(text) => {
                let outcome = parse_response(text);
                if outcome.is_success() {
                    info!("generation succeeded");
                } else {
                    warn!("model output did not match the item schema; returning raw output");
                }
                Ok(outcome)
            }
            Err(err) => {
                warn!(error = %err, "completion invocation failed; returning fallback item");
                Ok(GenerationOutcome::Fallback(FallbackItem::new(
                    format!("{:#}", err),
                    prompt.system,
                    prompt.user,
                )))
            }
        }
    }
}

/// Parse raw model output into the item schema.
///
/// The model did respond here, so a mismatch degrades to the raw text
/// instead of falling back: partial success over total failure.
fn parse_response(text: String) -> GenerationOutcome {
    match serde_json::from_str::<GeneratedItem>(&text) {
        Ok(item) if item.validate().is_ok() => GenerationOutcome::Success(item),
        _ => GenerationOutcome::Degraded { raw_output: text },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> RetrievedContext {
        RetrievedContext {
            skill_card: "Skill: Algebra\n\nTopics: equations".to_string(),
            distractor_guidance: "Distractor Pattern: Sign Error".to_string(),
        }
    }

    #[test]
    fn test_prompt_embeds_all_sections() {
        let prompt = ItemPrompt::build("ICFES", "hard", &context());

        assert!(prompt.system.contains("assessment specialist for the ICFES exam"));
        assert!(prompt.user.contains("'ICFES' exam"));
        assert!(prompt.user.contains("Skill: Algebra"));
        assert!(prompt.user.contains("DIFFICULTY: hard"));
        assert!(prompt.user.contains("Distractor Pattern: Sign Error"));
        assert!(prompt.user.contains("OUTPUT FORMAT (JSON)"));
        assert!(prompt.user.contains("\"correct_option\": \"A|B|C|D\""));
    }

    #[test]
    fn test_parse_valid_item() {
        let text = r#"{
            "stimulus": "s",
            "question_stem": "q",
            "options": {"A": "1", "B": "2", "C": "3", "D": "4"},
            "correct_option": "A",
            "rationale": "because",
            "distractor_rationales": {"B": "off by one"}
        }"#;

        let outcome = parse_response(text.to_string());
        assert!(outcome.is_success());
    }

    #[test]
    fn test_parse_non_json_degrades() {
        let outcome = parse_response("Here is your question: ...".to_string());
        match outcome {
            GenerationOutcome::Degraded { raw_output } => {
                assert_eq!(raw_output, "Here is your question: ...");
            }
            other => panic!("expected degraded outcome, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_wrong_shape_degrades() {
        // Valid JSON, but only three options and a stray correct label.
        let text = r#"{
            "stimulus": "s",
            "question_stem": "q",
            "options": {"A": "1", "B": "2", "C": "3"},
            "correct_option": "D",
            "rationale": "because"
        }"#;

        let outcome = parse_response(text.to_string());
        assert!(!outcome.is_success());
        assert!(!outcome.is_fallback());
    }
}
