mod common;

use itemforge::infrastructure::database::DocumentRepositoryImpl;
use itemforge::{DocType, DocumentRepository, NewDocument};

fn skill_card(skill: &str, content: &str) -> NewDocument {
    NewDocument::new(DocType::SkillCard, content)
        .with_skill(skill)
        .with_source_file("test.csv")
        .with_embedding(vec![0.1, 0.2, 0.3])
}

#[tokio::test]
async fn test_insert_and_get_round_trip() {
    let pool = common::setup_test_db().await;
    let repo = DocumentRepositoryImpl::new(pool.clone());

    let doc = skill_card("Algebra", "Skill: Algebra\n\nTopics: equations")
        .with_metadata(serde_json::json!({"topics": ["equations"]}));

    let id = repo.insert(doc).await.expect("failed to insert document");

    let retrieved = repo
        .get(id)
        .await
        .expect("failed to get document")
        .expect("document not found");

    assert_eq!(retrieved.id, id);
    assert_eq!(retrieved.doc_type, DocType::SkillCard);
    assert_eq!(retrieved.skill.as_deref(), Some("Algebra"));
    assert_eq!(retrieved.content, "Skill: Algebra\n\nTopics: equations");
    assert_eq!(
        retrieved.metadata,
        Some(serde_json::json!({"topics": ["equations"]}))
    );
    assert_eq!(retrieved.embedding, vec![0.1, 0.2, 0.3]);

    pool.close().await;
}

#[tokio::test]
async fn test_insert_rejects_empty_content() {
    let pool = common::setup_test_db().await;
    let repo = DocumentRepositoryImpl::new(pool.clone());

    let doc = NewDocument::new(DocType::SimilarityItem, "");
    assert!(repo.insert(doc).await.is_err());

    pool.close().await;
}

#[tokio::test]
async fn test_insert_all_is_atomic() {
    let pool = common::setup_test_db().await;
    let repo = DocumentRepositoryImpl::new(pool.clone());

    let docs = vec![
        skill_card("Algebra", "card one"),
        skill_card("Geometry", "card two"),
        // Invalid document: empty content fails validation mid-batch.
        NewDocument::new(DocType::SimilarityItem, ""),
    ];

    let result = repo.insert_all(docs).await;
    assert!(result.is_err());

    // The failing batch must leave nothing behind.
    let remaining = repo
        .query_by_type(DocType::SkillCard, None)
        .await
        .expect("failed to query");
    assert!(remaining.is_empty(), "rollback should remove partial writes");

    pool.close().await;
}

#[tokio::test]
async fn test_find_skill_card_substring_case_insensitive() {
    let pool = common::setup_test_db().await;
    let repo = DocumentRepositoryImpl::new(pool.clone());

    repo.insert(skill_card(
        "Interpretación de Mapas",
        "Skill: Interpretación de Mapas",
    ))
    .await
    .unwrap();

    let hit = repo
        .find_skill_card("mapas")
        .await
        .expect("query failed")
        .expect("expected a match");
    assert_eq!(hit.skill.as_deref(), Some("Interpretación de Mapas"));

    let miss = repo.find_skill_card("Trigonometry").await.expect("query failed");
    assert!(miss.is_none());

    pool.close().await;
}

#[tokio::test]
async fn test_find_skill_card_returns_first_in_store_order() {
    let pool = common::setup_test_db().await;
    let repo = DocumentRepositoryImpl::new(pool.clone());

    repo.insert(skill_card("Algebra Basics", "first card"))
        .await
        .unwrap();
    repo.insert(skill_card("Algebra Advanced", "second card"))
        .await
        .unwrap();

    let hit = repo
        .find_skill_card("algebra")
        .await
        .unwrap()
        .expect("expected a match");
    assert_eq!(hit.content, "first card");

    pool.close().await;
}

#[tokio::test]
async fn test_query_by_type_respects_limit() {
    let pool = common::setup_test_db().await;
    let repo = DocumentRepositoryImpl::new(pool.clone());

    for i in 0..5 {
        repo.insert(
            NewDocument::new(DocType::DistractorPattern, format!("pattern {}", i))
                .with_embedding(vec![0.0]),
        )
        .await
        .unwrap();
    }

    let limited = repo
        .query_by_type(DocType::DistractorPattern, Some(3))
        .await
        .unwrap();
    assert_eq!(limited.len(), 3);
    assert_eq!(limited[0].content, "pattern 0");

    let all = repo
        .query_by_type(DocType::DistractorPattern, None)
        .await
        .unwrap();
    assert_eq!(all.len(), 5);

    pool.close().await;
}

#[tokio::test]
async fn test_list_clips_content_to_snippet() {
    let pool = common::setup_test_db().await;
    let repo = DocumentRepositoryImpl::new(pool.clone());

    let long_content = "y".repeat(400);
    repo.insert(skill_card("Algebra", &long_content)).await.unwrap();

    let summaries = repo.list(Some(DocType::SkillCard)).await.unwrap();
    assert_eq!(summaries.len(), 1);
    assert!(summaries[0].snippet.chars().count() < 400);
    assert!(summaries[0].snippet.ends_with("..."));

    pool.close().await;
}

#[tokio::test]
async fn test_find_duplicates_and_delete() {
    let pool = common::setup_test_db().await;
    let repo = DocumentRepositoryImpl::new(pool.clone());

    repo.insert(skill_card("Algebra", "same content")).await.unwrap();
    repo.insert(skill_card("Algebra", "same content")).await.unwrap();
    repo.insert(skill_card("Geometry", "unique content")).await.unwrap();

    let groups = repo.find_duplicates().await.unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].count, 2);

    // Delete everything but the first of the group.
    let to_delete: Vec<_> = groups[0].ids.iter().skip(1).copied().collect();
    let deleted = repo.delete(&to_delete).await.unwrap();
    assert_eq!(deleted, 1);

    assert!(repo.find_duplicates().await.unwrap().is_empty());

    let remaining = repo.query_by_type(DocType::SkillCard, None).await.unwrap();
    assert_eq!(remaining.len(), 2);

    pool.close().await;
}

#[tokio::test]
async fn test_delete_with_no_ids_is_a_noop() {
    let pool = common::setup_test_db().await;
    let repo = DocumentRepositoryImpl::new(pool.clone());

    let deleted = repo.delete(&[]).await.unwrap();
    assert_eq!(deleted, 0);

    pool.close().await;
}
