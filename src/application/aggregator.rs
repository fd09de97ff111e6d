//! Corpus aggregation pipeline.
//!
//! Turns raw exam-question rows into three knowledge-document families:
//! one skill card per distinct skill, one distractor-pattern catalog per
//! pattern name across the whole corpus, and one similarity snippet per row.
//! All documents of one run are inserted in a single transaction; a failure
//! anywhere rolls the entire run back.
//!
//! Re-running aggregation over the same corpus creates duplicate documents.
//! There is deliberately no existence check here; duplicate cleanup is a
//! separate administrative operation.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, instrument};

use crate::domain::models::{DocType, NewDocument, RawRecord, DISTRACTOR_SLOTS};
use crate::domain::ports::{DocumentRepository, EmbeddingProvider};

/// Maximum number of example rationales kept per distractor pattern.
pub const MAX_PATTERN_EXAMPLES: usize = 10;

/// Maximum length, in characters, of a stored similarity snippet.
pub const SIMILARITY_SNIPPET_LEN: usize = 500;

/// Number of sample item ids recorded in skill-card metadata.
const SAMPLE_ITEM_IDS: usize = 5;

/// Fixed source label applied to every similarity item.
const SIMILARITY_SOURCE: &str = "historical_restricted";

/// Counts reported by one aggregation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregateSummary {
    pub rows_processed: usize,
    pub skill_cards_created: usize,
    pub patterns_created: usize,
    pub similarity_items_created: usize,
}

/// Aggregates a raw corpus into knowledge documents.
pub struct CorpusAggregator<S: DocumentRepository, E: EmbeddingProvider> {
    store: Arc<S>,
    embedder: Arc<E>,
}

impl<S: DocumentRepository, E: EmbeddingProvider> CorpusAggregator<S, E> {
    pub fn new(store: Arc<S>, embedder: Arc<E>) -> Self {
        Self { store, embedder }
    }

    /// Run the full aggregation pipeline over `records`.
    ///
    /// Builds every document first, then persists them in one transaction,
    /// so readers never observe a partially aggregated corpus.
    #[instrument(skip(self, records), fields(rows = records.len(), source = source_label))]
    pub async fn aggregate(
        &self,
        records: &[RawRecord],
        source_label: &str,
    ) -> Result<AggregateSummary> {
        let skill_cards = build_skill_cards(records);
        let patterns = build_distractor_patterns(records);
        let similarity = build_similarity_entries(records);

        let summary = AggregateSummary {
            rows_processed: records.len(),
            skill_cards_created: skill_cards.len(),
            patterns_created: patterns.len(),
            similarity_items_created: similarity.len(),
        };

        let mut docs = Vec::with_capacity(
            skill_cards.len() + patterns.len() + similarity.len(),
        );

        for card in skill_cards {
            let embedding = self
                .embedder
                .embed(&card.content)
                .await
                .context("failed to embed skill card")?;
            docs.push(
                NewDocument::new(DocType::SkillCard, card.content)
                    .with_skill(card.skill)
                    .with_metadata(card.metadata)
                    .with_source_file(source_label)
                    .with_embedding(embedding),
            );
        }

        for content in patterns {
            let embedding = self
                .embedder
                .embed(&content)
                .await
                .context("failed to embed distractor pattern")?;
            docs.push(
                NewDocument::new(DocType::DistractorPattern, content)
                    .with_source_file(source_label)
                    .with_embedding(embedding),
            );
        }

        for entry in similarity {
            // The embedding covers the full text; only the snippet is stored.
            let embedding = self
                .embedder
                .embed(&entry.full_text)
                .await
                .context("failed to embed similarity item")?;
            docs.push(
                NewDocument::new(DocType::SimilarityItem, entry.snippet)
                    .with_source_file(SIMILARITY_SOURCE)
                    .with_embedding(embedding),
            );
        }

        self.store
            .insert_all(docs)
            .await
            .context("failed to persist aggregated documents")?;

        info!(
            skill_cards = summary.skill_cards_created,
            patterns = summary.patterns_created,
            similarity_items = summary.similarity_items_created,
            "aggregation run committed"
        );
        Ok(summary)
    }
}

/// One skill card before embedding.
#[derive(Debug, Clone)]
pub struct SkillCardDraft {
    pub skill: String,
    pub content: String,
    pub metadata: serde_json::Value,
}

/// Partition records by exact skill value and synthesize one card per group.
///
/// Records without a skill are dropped, not an error. Groups keep first-seen
/// order so output is deterministic for a given corpus.
pub fn build_skill_cards(records: &[RawRecord]) -> Vec<SkillCardDraft> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<&RawRecord>> = HashMap::new();

    for record in records {
        let Some(skill) = record.skill.as_deref() else {
            continue;
        };
        if !groups.contains_key(skill) {
            order.push(skill.to_string());
        }
        groups.entry(skill.to_string()).or_default().push(record);
    }

    order
        .into_iter()
        .map(|skill| {
            let group = &groups[&skill];
            let topics = distinct(group.iter().map(|r| r.topic.as_deref()));
            let difficulties = distinct(group.iter().map(|r| r.difficulty.as_deref()));
            let steps = distinct(group.iter().map(|r| r.required_steps.as_deref()));
            let misconceptions =
                distinct(group.iter().map(|r| r.common_misconception.as_deref()));
            let sample_item_ids: Vec<Option<String>> = group
                .iter()
                .take(SAMPLE_ITEM_IDS)
                .map(|r| r.item_id.clone())
                .collect();

            let content = format!(
                "Skill: {}\n\nTopics: {}\n\nCommon Misconceptions:\n{}\n\nRequired Steps:\n{}",
                skill,
                topics.join(", "),
                bullet_list(&misconceptions),
                bullet_list(&steps),
            );

            let metadata = json!({
                "topics": topics,
                "difficulties": difficulties,
                "sample_item_ids": sample_item_ids,
            });

            SkillCardDraft {
                skill,
                content,
                metadata,
            }
        })
        .collect()
}

/// Group distractor rationales by pattern name across the entire corpus and
/// synthesize one catalog document per pattern.
///
/// A slot participates only when both its pattern and rationale are present.
/// Rationales are deduplicated within a pattern and capped at
/// `MAX_PATTERN_EXAMPLES`, first occurrence winning.
pub fn build_distractor_patterns(records: &[RawRecord]) -> Vec<String> {
    let mut order: Vec<String> = Vec::new();
    let mut rationales: HashMap<String, Vec<String>> = HashMap::new();

    for record in records {
        for slot in DISTRACTOR_SLOTS {
            let Some((pattern, rationale)) = record.distractor_slot(slot) else {
                continue;
            };
            if !rationales.contains_key(pattern) {
                order.push(pattern.to_string());
            }
            rationales
                .entry(pattern.to_string())
                .or_default()
                .push(rationale.to_string());
        }
    }

    order
        .into_iter()
        .map(|pattern| {
            let mut seen = HashSet::new();
            let examples: Vec<String> = rationales[&pattern]
                .iter()
                .filter(|r| seen.insert(r.as_str()))
                .take(MAX_PATTERN_EXAMPLES)
                .cloned()
                .collect();

            format!(
                "Distractor Pattern: {}\n\nExamples of Logic:\n{}",
                pattern,
                examples
                    .iter()
                    .map(|ex| format!("- {}", ex))
                    .collect::<Vec<_>>()
                    .join("\n"),
            )
        })
        .collect()
}

/// One similarity-corpus entry before embedding.
#[derive(Debug, Clone)]
pub struct SimilarityEntry {
    /// Full concatenated item text; this is what gets embedded
    pub full_text: String,
    /// First `SIMILARITY_SNIPPET_LEN` characters; this is what gets stored
    pub snippet: String,
}

/// Build one similarity entry per record, no grouping.
pub fn build_similarity_entries(records: &[RawRecord]) -> Vec<SimilarityEntry> {
    records
        .iter()
        .map(|record| {
            let full_text = record.similarity_text();
            let snippet: String = full_text.chars().take(SIMILARITY_SNIPPET_LEN).collect();
            SimilarityEntry { full_text, snippet }
        })
        .collect()
}

/// Distinct present values, first-seen order.
fn distinct<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .flatten()
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(skill: &str, topic: &str, misconception: &str) -> RawRecord {
        RawRecord {
            skill: Some(skill.to_string()),
            topic: Some(topic.to_string()),
            difficulty: Some("medium".to_string()),
            common_misconception: Some(misconception.to_string()),
            item_id: Some(format!("item-{}", topic)),
            ..Default::default()
        }
    }

    #[test]
    fn test_skill_grouping_merges_rows_by_skill() {
        let records = vec![
            record("Algebra", "equations", "M1"),
            record("Algebra", "inequalities", "M2"),
            record("Geometry", "angles", "M3"),
        ];

        let cards = build_skill_cards(&records);
        assert_eq!(cards.len(), 2);

        let algebra = &cards[0];
        assert_eq!(algebra.skill, "Algebra");
        assert!(algebra.content.contains("M1"));
        assert!(algebra.content.contains("M2"));
        assert!(algebra.content.contains("Topics: equations, inequalities"));
    }

    #[test]
    fn test_records_without_skill_are_dropped() {
        let records = vec![
            record("Algebra", "equations", "M1"),
            RawRecord::default(),
            RawRecord {
                topic: Some("orphan topic".to_string()),
                ..Default::default()
            },
        ];

        let cards = build_skill_cards(&records);
        assert_eq!(cards.len(), 1);
    }

    #[test]
    fn test_skill_card_content_template() {
        let records = vec![RawRecord {
            skill: Some("Algebra".to_string()),
            topic: Some("equations".to_string()),
            required_steps: Some("isolate the variable".to_string()),
            common_misconception: Some("sign flips are optional".to_string()),
            ..Default::default()
        }];

        let cards = build_skill_cards(&records);
        assert_eq!(
            cards[0].content,
            "Skill: Algebra\n\nTopics: equations\n\nCommon Misconceptions:\n\
             - sign flips are optional\n\nRequired Steps:\n- isolate the variable"
        );
    }

    #[test]
    fn test_skill_card_metadata_samples_first_five_item_ids() {
        let records: Vec<RawRecord> = (0..8)
            .map(|i| RawRecord {
                skill: Some("Algebra".to_string()),
                item_id: Some(format!("item-{}", i)),
                ..Default::default()
            })
            .collect();

        let cards = build_skill_cards(&records);
        let ids = cards[0].metadata["sample_item_ids"].as_array().unwrap();
        assert_eq!(ids.len(), 5);
        assert_eq!(ids[0], "item-0");
    }

    #[test]
    fn test_distractor_patterns_group_across_whole_corpus() {
        let records = vec![
            RawRecord {
                skill: Some("Algebra".to_string()),
                distractor_pattern_a: Some("Sign Error".to_string()),
                distractor_rationale_a: Some("Forgot negative".to_string()),
                ..Default::default()
            },
            RawRecord {
                skill: Some("Geometry".to_string()),
                distractor_pattern_b: Some("Sign Error".to_string()),
                distractor_rationale_b: Some("Dropped the minus".to_string()),
                ..Default::default()
            },
        ];

        let patterns = build_distractor_patterns(&records);
        assert_eq!(patterns.len(), 1);
        assert!(patterns[0].starts_with("Distractor Pattern: Sign Error"));
        assert!(patterns[0].contains("- Forgot negative"));
        assert!(patterns[0].contains("- Dropped the minus"));
    }

    #[test]
    fn test_distractor_slot_needs_both_pattern_and_rationale() {
        let records = vec![RawRecord {
            distractor_pattern_a: Some("Sign Error".to_string()),
            // rationale missing: slot excluded
            distractor_pattern_b: Some("Off By One".to_string()),
            distractor_rationale_b: Some("Counted the fence posts".to_string()),
            ..Default::default()
        }];

        let patterns = build_distractor_patterns(&records);
        assert_eq!(patterns.len(), 1);
        assert!(patterns[0].contains("Off By One"));
    }

    #[test]
    fn test_pattern_examples_deduplicated_and_capped() {
        let records: Vec<RawRecord> = (0..30)
            .map(|i| RawRecord {
                distractor_pattern_a: Some("Sign Error".to_string()),
                // 15 distinct rationales, each appearing twice
                distractor_rationale_a: Some(format!("rationale-{}", i % 15)),
                ..Default::default()
            })
            .collect();

        let patterns = build_distractor_patterns(&records);
        let examples: Vec<&str> = patterns[0]
            .lines()
            .filter(|l| l.starts_with("- "))
            .collect();
        assert_eq!(examples.len(), MAX_PATTERN_EXAMPLES);
        let unique: HashSet<&&str> = examples.iter().collect();
        assert_eq!(unique.len(), examples.len());
    }

    #[test]
    fn test_similarity_snippet_truncated_to_limit() {
        let records = vec![RawRecord {
            stimulus: Some("x".repeat(1000)),
            ..Default::default()
        }];

        let entries = build_similarity_entries(&records);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].snippet.chars().count(), SIMILARITY_SNIPPET_LEN);
        assert!(entries[0].full_text.chars().count() > SIMILARITY_SNIPPET_LEN);
    }

    #[test]
    fn test_one_similarity_entry_per_record() {
        let records = vec![RawRecord::default(), RawRecord::default()];
        assert_eq!(build_similarity_entries(&records).len(), 2);
    }

    proptest! {
        #[test]
        fn prop_snippet_never_exceeds_limit(texts in proptest::collection::vec(".{0,600}", 0..20)) {
            let records: Vec<RawRecord> = texts
                .into_iter()
                .map(|t| RawRecord { stimulus: Some(t), ..Default::default() })
                .collect();
            for entry in build_similarity_entries(&records) {
                prop_assert!(entry.snippet.chars().count() <= SIMILARITY_SNIPPET_LEN);
            }
        }

        #[test]
        fn prop_skill_card_count_equals_distinct_skills(
            skills in proptest::collection::vec(proptest::option::of("[a-d]{1,2}"), 0..40)
        ) {
            let records: Vec<RawRecord> = skills
                .iter()
                .map(|s| RawRecord { skill: s.clone(), ..Default::default() })
                .collect();
            let distinct_skills: HashSet<&String> = skills.iter().flatten().collect();
            prop_assert_eq!(build_skill_cards(&records).len(), distinct_skills.len());
        }
    }
}
