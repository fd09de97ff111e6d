//! Generated exam item models.
//!
//! A generation request always yields one of three shapes: a fully parsed
//! item, a degraded wrapper around unparseable model output, or a
//! deterministic fallback when the completion capability was unreachable.
//! All three are plain serializable values so the caller never needs a
//! special-case branch.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The option labels every item must carry.
pub const OPTION_LABELS: [&str; 4] = ["A", "B", "C", "D"];

/// A multiple-choice exam item as returned by the generation model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedItem {
    /// Context text or situation preceding the question
    pub stimulus: String,
    /// The specific question
    pub question_stem: String,
    /// Option label (A-D) to option text, exactly four entries
    pub options: BTreeMap<String, String>,
    /// Label of the correct option; must be a key of `options`
    pub correct_option: String,
    /// Why the correct answer is correct
    pub rationale: String,
    /// Wrong-option label to explanation of why it is wrong
    #[serde(default)]
    pub distractor_rationales: BTreeMap<String, String>,
}

impl GeneratedItem {
    /// Validate the structural invariants of a parsed item.
    pub fn validate(&self) -> Result<(), String> {
        if self.options.len() != OPTION_LABELS.len() {
            return Err(format!(
                "expected exactly {} options, got {}",
                OPTION_LABELS.len(),
                self.options.len()
            ));
        }
        for label in OPTION_LABELS {
            if !self.options.contains_key(label) {
                return Err(format!("missing option {}", label));
            }
        }
        if !self.options.contains_key(&self.correct_option) {
            return Err(format!(
                "correct_option {:?} is not an option label",
                self.correct_option
            ));
        }
        Ok(())
    }
}

/// The exact prompt pair attempted against the completion capability,
/// attached to fallback items for debugging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugInfo {
    pub system_prompt: String,
    pub user_prompt: String,
}

/// Deterministic placeholder item returned when the completion capability
/// cannot be reached. Structurally a valid item (four options, correct
/// option among them) with diagnostic fields attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackItem {
    /// Causal error message from the failed invocation
    pub error: String,
    pub mock_fallback: bool,
    pub stimulus: String,
    pub question_stem: String,
    pub options: BTreeMap<String, String>,
    pub correct_option: String,
    pub debug_info: DebugInfo,
}

impl FallbackItem {
    /// Build the fixed fallback item carrying the causal error and the
    /// prompt that was attempted.
    pub fn new(error: impl Into<String>, system_prompt: String, user_prompt: String) -> Self {
        let options = BTreeMap::from([
            ("A".to_string(), "Check the service logs".to_string()),
            ("B".to_string(), "Retry the request".to_string()),
            ("C".to_string(), "Check the API key configuration".to_string()),
            ("D".to_string(), "Contact support".to_string()),
        ]);
        Self {
            error: error.into(),
            mock_fallback: true,
            stimulus: "The generation service could not be reached.".to_string(),
            question_stem: "Please check your API key configuration.".to_string(),
            options,
            correct_option: "C".to_string(),
            debug_info: DebugInfo {
                system_prompt,
                user_prompt,
            },
        }
    }
}

/// Outcome of one generation request.
///
/// Serializes untagged so the caller receives the original response shapes
/// verbatim: a parsed item, `{"raw_output": ...}`, or the fallback object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GenerationOutcome {
    /// Model responded with a parseable, structurally valid item
    Success(GeneratedItem),
    /// Model responded, but the output did not match the expected schema
    Degraded { raw_output: String },
    /// The completion capability could not be invoked
    Fallback(FallbackItem),
}

impl GenerationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}
