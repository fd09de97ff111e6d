//! Common test utilities for integration tests
//!
//! Provides shared fixtures and helpers used across multiple integration
//! test files.

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use itemforge::RawRecord;

/// Create an in-memory test database with migrations applied.
///
/// A single pooled connection keeps every query on the same in-memory
/// database.
pub async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("failed to create test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("failed to run migrations");

    pool
}

/// Build a corpus row with the fields most tests care about.
#[allow(dead_code)]
pub fn corpus_row(skill: &str, topic: &str, misconception: &str) -> RawRecord {
    RawRecord {
        exam: Some("ICFES".to_string()),
        skill: Some(skill.to_string()),
        topic: Some(topic.to_string()),
        difficulty: Some("medium".to_string()),
        common_misconception: Some(misconception.to_string()),
        item_id: Some(format!("item-{}-{}", skill, topic)),
        stimulus: Some(format!("Stimulus about {}", topic)),
        question_stem: Some(format!("Question about {}", topic)),
        option_a: Some("first".to_string()),
        option_b: Some("second".to_string()),
        option_c: Some("third".to_string()),
        option_d: Some("fourth".to_string()),
        ..Default::default()
    }
}
