//! End-to-end ETL test: CSV bytes through the reader into the aggregator.

mod common;

use std::sync::Arc;

use itemforge::infrastructure::corpus;
use itemforge::infrastructure::database::DocumentRepositoryImpl;
use itemforge::{CorpusAggregator, DocType, DocumentRepository, MockEmbeddingProvider};

const HEADER: &str = "exam,skill,topic,difficulty,required_steps,common_misconception,\
                      item_id,stimulus,question_stem,option_a,option_b,option_c,option_d,\
                      distractor_pattern_a,distractor_rationale_a,distractor_pattern_b,\
                      distractor_rationale_b,distractor_pattern_c,distractor_rationale_c,\
                      distractor_pattern_d,distractor_rationale_d";

#[tokio::test]
async fn test_csv_corpus_flows_into_knowledge_base() {
    let csv_data = format!(
        "{header}\n\
         ICFES,Algebra,equations,medium,isolate the variable,M1,item-1,Stim one,Q one,1,2,3,4,\
         Sign Error,Forgot negative,,,,,,\n\
         ICFES,Algebra,inequalities,hard,flip the sign,M2,item-2,Stim two,Q two,5,6,7,8,\
         ,,,,,,,\n",
        header = HEADER
    );

    let records = corpus::read_records_from(csv_data.as_bytes()).expect("failed to parse CSV");
    assert_eq!(records.len(), 2);

    let pool = common::setup_test_db().await;
    let repo = Arc::new(DocumentRepositoryImpl::new(pool.clone()));
    let aggregator = CorpusAggregator::new(repo.clone(), Arc::new(MockEmbeddingProvider::new(8)));

    let summary = aggregator
        .aggregate(&records, "upload.csv")
        .await
        .expect("aggregation failed");

    assert_eq!(summary.rows_processed, 2);
    assert_eq!(summary.skill_cards_created, 1);
    assert_eq!(summary.patterns_created, 1);
    assert_eq!(summary.similarity_items_created, 2);

    // One card for Algebra carrying both misconceptions.
    let cards = repo.query_by_type(DocType::SkillCard, None).await.unwrap();
    assert_eq!(cards.len(), 1);
    assert!(cards[0].content.contains("M1"));
    assert!(cards[0].content.contains("M2"));
    assert_eq!(cards[0].source_file.as_deref(), Some("upload.csv"));

    // The Sign Error pattern carries its rationale.
    let patterns = repo
        .query_by_type(DocType::DistractorPattern, None)
        .await
        .unwrap();
    assert_eq!(patterns.len(), 1);
    assert!(patterns[0].content.contains("Sign Error"));
    assert!(patterns[0].content.contains("Forgot negative"));

    // Similarity snippets hold the concatenated item text.
    let similarity = repo
        .query_by_type(DocType::SimilarityItem, None)
        .await
        .unwrap();
    assert_eq!(similarity.len(), 2);
    assert!(similarity[0].content.contains("Stim one"));

    pool.close().await;
}
