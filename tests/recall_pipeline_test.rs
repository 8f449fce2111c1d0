// tests/recall_pipeline_test.rs


use std::sync::Arc;

use test_helpers::StubClassifier;
use vigil::memory::core::traits::MemoryStore;
use vigil::memory::core::types::MemoryKind;
use vigil::memory::recall::RecallPipeline;

#[tokio::test]
async fn no_recall_when_gate_says_no() {
    let store = test_helpers::create_test_store().await;
    store
        .append_long_term(1, None, MemoryKind::Fact, "User stated: I ski", 5)
        .await
        .unwrap();

    let classifier = Arc::new(StubClassifier {
        recall: false,
        default_score: 1.0,
        ..Default::default()
    });
    let pipeline = RecallPipeline::new(store, classifier);

    let recalled = pipeline.recall(1, None, "do I ski?").await.unwrap();
    assert!(recalled.is_empty());
}

#[tokio::test]
async fn scores_below_the_floor_never_surface() {
    let store = test_helpers::create_test_store().await;
    // Maximum importance cannot rescue a sub-floor raw score.
    store
        .append_long_term(1, None, MemoryKind::Fact, "User stated: I ski", 5)
        .await
        .unwrap();

    let classifier = Arc::new(StubClassifier {
        default_score: 0.4,
        ..Default::default()
    });
    let pipeline = RecallPipeline::new(store, classifier);

    let recalled = pipeline.recall(1, None, "do I ski?").await.unwrap();
    assert!(recalled.is_empty());
}

#[tokio::test]
async fn importance_weights_the_ranking() {
    let store = test_helpers::create_test_store().await;
    // Raw scores alone would rank A first; importance flips the order.
    store
        .append_long_term(1, None, MemoryKind::Fact, "User stated: A", 1)
        .await
        .unwrap();
    store
        .append_long_term(1, None, MemoryKind::Fact, "User stated: B", 5)
        .await
        .unwrap();

    let classifier = Arc::new(
        StubClassifier::default()
            .scoring("User stated: A", 0.9)
            .scoring("User stated: B", 0.6),
    );
    let pipeline = RecallPipeline::new(store, classifier);

    let recalled = pipeline.recall(1, None, "?").await.unwrap();
    // key(A) = 0.9, key(B) = 3.0
    assert_eq!(recalled, vec!["User stated: B", "User stated: A"]);
}

#[tokio::test]
async fn only_top_two_survive_ranking() {
    let store = test_helpers::create_test_store().await;
    for (content, importance) in [("alpha", 1), ("beta", 3), ("gamma", 5)] {
        store
            .append_long_term(1, None, MemoryKind::Fact, content, importance)
            .await
            .unwrap();
    }

    let classifier = Arc::new(StubClassifier {
        default_score: 0.8,
        ..Default::default()
    });
    let pipeline = RecallPipeline::new(store, classifier);

    let recalled = pipeline.recall(1, None, "?").await.unwrap();
    assert_eq!(recalled.len(), 2);
    assert_eq!(recalled[0], "gamma");
    assert_eq!(recalled[1], "beta");
}

#[tokio::test]
async fn bot_interpretations_are_ineligible() {
    let store = test_helpers::create_test_store().await;
    store
        .append_long_term(1, None, MemoryKind::Fact, "You said you like tea", 5)
        .await
        .unwrap();
    store
        .append_long_term(1, None, MemoryKind::Fact, "You mentioned a cat", 5)
        .await
        .unwrap();

    let classifier = Arc::new(StubClassifier {
        default_score: 1.0,
        ..Default::default()
    });
    let pipeline = RecallPipeline::new(store, classifier);

    let recalled = pipeline.recall(1, None, "tea?").await.unwrap();
    assert!(recalled.is_empty());
}

#[tokio::test]
async fn pairwise_confirmation_drops_survivors() {
    let store = test_helpers::create_test_store().await;
    store
        .append_long_term(1, None, MemoryKind::Fact, "User stated: I ski", 5)
        .await
        .unwrap();

    let classifier = Arc::new(StubClassifier {
        confirm: false,
        default_score: 0.9,
        ..Default::default()
    });
    let pipeline = RecallPipeline::new(store, classifier);

    let recalled = pipeline.recall(1, None, "do I ski?").await.unwrap();
    assert!(recalled.is_empty());
}

#[tokio::test]
async fn summary_replaces_raw_contents() {
    let store = test_helpers::create_test_store().await;
    store
        .append_long_term(1, None, MemoryKind::Fact, "User stated: I ski", 3)
        .await
        .unwrap();
    store
        .append_long_term(1, None, MemoryKind::Fact, "User stated: I skate", 3)
        .await
        .unwrap();

    let classifier = Arc::new(StubClassifier {
        default_score: 0.9,
        summary: "The user skis and skates.".to_string(),
        ..Default::default()
    });
    let pipeline = RecallPipeline::new(store, classifier);

    let recalled = pipeline.recall(1, None, "hobbies?").await.unwrap();
    assert_eq!(recalled, vec!["The user skis and skates."]);
}

#[tokio::test]
async fn empty_summary_falls_back_to_raw_contents() {
    let store = test_helpers::create_test_store().await;
    store
        .append_long_term(1, None, MemoryKind::Fact, "User stated: I ski", 3)
        .await
        .unwrap();

    let classifier = Arc::new(StubClassifier {
        default_score: 0.9,
        ..Default::default()
    });
    let pipeline = RecallPipeline::new(store, classifier);

    let recalled = pipeline.recall(1, None, "hobbies?").await.unwrap();
    assert_eq!(recalled, vec!["User stated: I ski"]);
}
