//! End-to-end tests for the persona second pass over the core pipeline
//!
//! Each test drives `process_turn` the way a chat host would and checks the
//! outcome a response generator actually consumes: the final score/delta,
//! the affection update, and the LLM context bag.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use serde_json::json;

use kokoro_core::{
    AffectionSession, AffectionTracker, KokoroError, MemorySessionStore, RelationshipStage,
    Result, SessionStore, TrackerConfig,
};
use kokoro_plugin_tsundere::{Intervention, TsundereSentimentService};

fn service() -> TsundereSentimentService {
    let tracker = Arc::new(AffectionTracker::new(
        TrackerConfig::default(),
        Arc::new(MemorySessionStore::new()),
    ));
    TsundereSentimentService::new(tracker)
}

/// Plain gratitude flows through the persona layer untouched
#[tokio::test]
async fn test_gratitude_records_an_update() {
    let svc = service();
    let outcome = svc.process_turn("s1", "ありがとう", &[]).await;

    assert!(!outcome.review.assessment.is_tsundere);
    assert!(outcome.review.final_delta > 0);
    assert_eq!(outcome.review.final_delta, outcome.analysis.final_delta);

    let update = outcome.update.expect("store is healthy");
    assert_eq!(update.previous_level, 15);
    assert!(update.new_level > update.previous_level);
    assert!(outcome.degraded.is_none());
}

/// A habitual interjection softens the hostile surface reading
#[tokio::test]
async fn test_interjection_rescues_a_hostile_reading() {
    let svc = service();
    let outcome = svc.process_turn("s2", "うっせー、バカ", &[]).await;

    let review = &outcome.review;
    assert!(review.assessment.is_tsundere);
    assert!(review.assessment.confidence > 0.6);
    assert!(review.final_score > outcome.analysis.adjusted_score);

    let map = review.llm_context.to_context_map();
    assert_eq!(map["tsundere_detected"], json!(true));
    assert_eq!(
        map["suggested_interpretation"],
        json!("character_consistent_expression")
    );
}

/// Sexual content at low trust floors the turn and drops the level
#[tokio::test]
async fn test_sexual_content_at_low_trust_floors_the_turn() {
    let svc = service();
    let outcome = svc.process_turn("s3", "nude", &[]).await;

    assert_eq!(outcome.review.sexual_severity, Some(3));
    assert_eq!(outcome.review.final_delta, -10);
    assert!(outcome.review.final_score < 0.0);

    let update = outcome.update.expect("store is healthy");
    assert_eq!(update.previous_level, 15);
    assert_eq!(update.new_level, 11);
    assert!(update.deferred < 0);

    let map = outcome.review.llm_context.to_context_map();
    assert_eq!(map["sexual_content_severity"], json!(3));
}

/// A close relationship tolerates the content but still reports it
#[tokio::test]
async fn test_close_relationship_tolerates_but_reports() {
    let svc = service();
    svc.tracker().set_level("s4", 90).await.unwrap();
    assert_eq!(
        svc.tracker().get_stage("s4").await.unwrap(),
        RelationshipStage::Close
    );

    let outcome = svc.process_turn("s4", "nude", &[]).await;
    assert_eq!(outcome.review.sexual_severity, Some(0));
    assert_eq!(
        outcome.review.final_delta,
        outcome.analysis.final_delta.clamp(-10, 10)
    );
    // Still negative at full trust, just not floored.
    assert!(outcome.review.final_delta < 0);
    assert!(outcome.review.final_delta > -10);
    assert!(outcome.review.llm_context.sexual_content_detected);
    assert_eq!(outcome.review.llm_context.sexual_content_severity, 0);
}

/// A second goodbye in a row proposes resetting the farewell context
#[tokio::test]
async fn test_repeated_farewells_trigger_the_breaker() {
    let svc = service();
    let first = svc.process_turn("s5", "じゃあな", &[]).await;
    let first_loop = first.review.loop_assessment.as_ref().unwrap();
    assert!(!first_loop.detected);
    assert!(first.review.llm_context.is_farewell);

    let second = svc.process_turn("s5", "じゃあな", &[]).await;
    let second_loop = second.review.loop_assessment.as_ref().unwrap();
    assert!(second_loop.detected);
    assert_eq!(
        second_loop.intervention,
        Some(Intervention::ResetFarewellContext)
    );
    assert!(second.review.final_delta >= 0);

    let map = second.review.llm_context.to_context_map();
    assert_eq!(map["suggested_intervention"], json!("reset_farewell_context"));
    assert_eq!(map["is_conversation_ending"], json!(true));
}

/// The third identical phrase injects topic-change recovery
#[tokio::test]
async fn test_phrase_loop_injects_recovery() {
    let svc = service();
    svc.process_turn("s6", "同じ話をしよう", &[]).await;
    svc.process_turn("s6", "同じ話をしよう", &[]).await;
    let third = svc.process_turn("s6", "同じ話をしよう", &[]).await;

    let detected = third.review.loop_assessment.as_ref().unwrap();
    assert!(detected.detected);
    assert_eq!(detected.intervention, Some(Intervention::IntroduceTopicChange));
    assert_eq!(detected.recovery, 8);
    assert_eq!(
        third.review.final_delta,
        (third.analysis.final_delta + 8).max(-1).clamp(-10, 10)
    );
}

struct FailingStore;

#[async_trait]
impl SessionStore for FailingStore {
    async fn get(&self, _id: &str) -> Result<Option<AffectionSession>> {
        Err(KokoroError::storage("store offline"))
    }

    async fn put(&self, _session: &AffectionSession) -> Result<bool> {
        Err(KokoroError::storage("store offline"))
    }

    async fn list_ids(&self) -> Result<Vec<String>> {
        Err(KokoroError::storage("store offline"))
    }

    async fn delete(&self, _id: &str) -> Result<bool> {
        Err(KokoroError::storage("store offline"))
    }

    async fn delete_expired(&self, _max_age: Duration) -> Result<usize> {
        Err(KokoroError::storage("store offline"))
    }
}

/// A dead store degrades the turn instead of failing it
#[tokio::test]
async fn test_store_outage_keeps_the_reading() {
    let tracker = Arc::new(AffectionTracker::new(
        TrackerConfig::default(),
        Arc::new(FailingStore),
    ));
    let svc = TsundereSentimentService::new(tracker);

    let outcome = svc.process_turn("s7", "ありがとう", &[]).await;
    assert!(outcome.update.is_none());

    let degraded = outcome.degraded.expect("outage should be accounted");
    assert!(degraded.recovered);
    assert_eq!(degraded.strategy, "partial_sentiment");

    // The sentiment reading itself survives the outage.
    assert!(outcome.review.final_delta > 0);

    let stats = svc.fallback_stats();
    assert_eq!(stats.total_fallbacks, 1);
    assert_eq!(stats.partial_recoveries, 1);
    assert_eq!(stats.error_counts.get("storage"), Some(&1));
}
