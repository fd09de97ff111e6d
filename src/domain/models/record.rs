//! Raw corpus row model.
//!
//! A `RawRecord` is one row of the historical exam-question CSV. It exists
//! only for the duration of an aggregation run; nothing persists it.

use serde::{Deserialize, Serialize};

/// The four distractor slot labels present on every corpus row.
pub const DISTRACTOR_SLOTS: [char; 4] = ['a', 'b', 'c', 'd'];

/// One exam-question row from the corpus.
///
/// Every field is optional: the corpus is hand-curated and sparse, and an
/// empty CSV cell deserializes to `None`. Aggregation decides per field
/// whether a missing value excludes the row (skill) or is simply skipped
/// (steps, misconceptions, distractor slots).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRecord {
    pub exam: Option<String>,
    pub skill: Option<String>,
    pub topic: Option<String>,
    pub difficulty: Option<String>,
    pub required_steps: Option<String>,
    pub common_misconception: Option<String>,
    pub item_id: Option<String>,
    pub stimulus: Option<String>,
    pub question_stem: Option<String>,
    pub option_a: Option<String>,
    pub option_b: Option<String>,
    pub option_c: Option<String>,
    pub option_d: Option<String>,
    pub distractor_pattern_a: Option<String>,
    pub distractor_rationale_a: Option<String>,
    pub distractor_pattern_b: Option<String>,
    pub distractor_rationale_b: Option<String>,
    pub distractor_pattern_c: Option<String>,
    pub distractor_rationale_c: Option<String>,
    pub distractor_pattern_d: Option<String>,
    pub distractor_rationale_d: Option<String>,
}

impl RawRecord {
    /// The (pattern, rationale) pair for a distractor slot.
    ///
    /// Returns `Some` only when *both* halves of the slot are present; a
    /// pattern without a rationale (or vice versa) does not participate in
    /// aggregation.
    pub fn distractor_slot(&self, slot: char) -> Option<(&str, &str)> {
        let (pattern, rationale) = match slot {
            'a' => (&self.distractor_pattern_a, &self.distractor_rationale_a),
            'b' => (&self.distractor_pattern_b, &self.distractor_rationale_b),
            'c' => (&self.distractor_pattern_c, &self.distractor_rationale_c),
            'd' => (&self.distractor_pattern_d, &self.distractor_rationale_d),
            _ => return None,
        };
        match (pattern, rationale) {
            (Some(p), Some(r)) => Some((p.as_str(), r.as_str())),
            _ => None,
        }
    }

    /// Concatenate stimulus, question stem, and the four option texts into
    /// the single string used for the similarity corpus. Missing fields are
    /// treated as empty strings, so the separator spaces are always present.
    pub fn similarity_text(&self) -> String {
        let field = |f: &Option<String>| f.clone().unwrap_or_default();
        format!(
            "{} {} {} {} {} {}",
            field(&self.stimulus),
            field(&self.question_stem),
            field(&self.option_a),
            field(&self.option_b),
            field(&self.option_c),
            field(&self.option_d),
        )
    }
}
