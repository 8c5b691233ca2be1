//! End-to-end turn processing with the persona second pass.

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info, warn};

use kokoro_core::pipeline::{FallbackOutcome, FallbackStats, PartialAnalysis};
use kokoro_core::types::{SentimentTag, TurnRecord};
use kokoro_core::{
    AffectionTracker, AffectionUpdate, FallbackHandler, RelationshipStage, Result, SentimentPipeline,
    Service, ServiceHealth, TurnAnalysis,
};

use crate::context::LlmContext;
use crate::detector::TsundereDetector;
use crate::loops::{LoopAssessment, SentimentLoopDetector};
use crate::policy::{apply_sexual_rejection, sexual_severity};

/// What the persona layer decided for one turn.
#[derive(Debug, Clone, Serialize)]
pub struct OverrideOutcome {
    /// Persona assessment of the utterance.
    pub assessment: crate::detector::TsundereAssessment,
    /// Loop reading, when a session was supplied.
    pub loop_assessment: Option<LoopAssessment>,
    /// Rejection severity, when sexual content was tagged.
    pub sexual_severity: Option<u8>,
    /// Final sentiment score in [-1, 1].
    pub final_score: f32,
    /// Final affection delta in [-10, 10].
    pub final_delta: i32,
    /// Structured guidance for the response generator.
    pub llm_context: LlmContext,
}

/// Full result of one processed turn.
#[derive(Debug)]
pub struct TurnOutcome {
    /// First-pass pipeline analysis.
    pub analysis: TurnAnalysis,
    /// Second-pass persona review.
    pub review: OverrideOutcome,
    /// Affection update, when the store accepted it.
    pub update: Option<AffectionUpdate>,
    /// Recovery taken when the store was unavailable.
    pub degraded: Option<FallbackOutcome>,
}

/// Persona layer over the core pipeline.
///
/// Runs the whole turn: first-pass analysis, persona reinterpretation,
/// loop tracking, and the affection update. A storage failure downgrades
/// the turn instead of failing it, so the caller always gets a usable
/// reading.
pub struct TsundereSentimentService {
    pipeline: SentimentPipeline,
    detector: TsundereDetector,
    loops: SentimentLoopDetector,
    fallback: FallbackHandler,
    tracker: Arc<AffectionTracker>,
    running: bool,
}

impl TsundereSentimentService {
    /// Creates the service over a shared affection tracker.
    pub fn new(tracker: Arc<AffectionTracker>) -> Self {
        Self {
            pipeline: SentimentPipeline::new(),
            detector: TsundereDetector::new(),
            loops: SentimentLoopDetector::new(),
            fallback: FallbackHandler::new(),
            tracker,
            running: false,
        }
    }

    /// The tracker this service records turns against.
    pub fn tracker(&self) -> &Arc<AffectionTracker> {
        &self.tracker
    }

    /// Degradation counters accumulated by this service.
    pub fn fallback_stats(&self) -> FallbackStats {
        self.fallback.stats()
    }

    /// Reviews a first-pass analysis through the persona.
    ///
    /// A sexual-content tag overrides and disables both the persona
    /// nudges and the loop circuit breaker. Final values are clamped to
    /// score [-1, 1] and delta [-10, 10].
    pub fn review(
        &self,
        text: &str,
        analysis: &TurnAnalysis,
        stage: Option<RelationshipStage>,
        session_id: Option<&str>,
    ) -> OverrideOutcome {
        let assessment = self.detector.detect(text);
        let loop_assessment = session_id.map(|id| {
            self.loops
                .observe(id, text, assessment.farewell.is_some(), analysis.adjusted_score)
        });

        let mut score = analysis.adjusted_score;
        let mut delta = analysis.final_delta;

        let severity = analysis
            .raw
            .has_tag(SentimentTag::Sexual)
            .then(|| sexual_severity(stage));
        if let Some(severity) = severity {
            let (rejected_score, rejected_delta) = apply_sexual_rejection(severity, score, delta);
            if severity > 0 {
                info!(
                    severity,
                    from = delta,
                    to = rejected_delta,
                    "sexual content rejection applied"
                );
            }
            score = rejected_score;
            delta = rejected_delta;
        } else {
            if assessment.is_tsundere && assessment.confidence > 0.6 {
                score += assessment.score_nudge;
                delta += assessment.affection_nudge;
                debug!(
                    interpretation = assessment.interpretation,
                    "persona reinterpretation applied"
                );
            }
            if let Some(detected) = loop_assessment.as_ref().filter(|l| l.detected) {
                let (broken_score, broken_delta) = detected.apply_circuit_breaker(score, delta);
                info!(
                    severity = detected.severity,
                    from = delta,
                    to = broken_delta,
                    "loop circuit breaker applied"
                );
                score = broken_score;
                delta = broken_delta;
            }
        }

        let final_score = score.clamp(-1.0, 1.0);
        let final_delta = delta.clamp(-10, 10);
        let llm_context = LlmContext::assemble(&assessment, loop_assessment.as_ref(), severity);

        OverrideOutcome {
            assessment,
            loop_assessment,
            sexual_severity: severity,
            final_score,
            final_delta,
            llm_context,
        }
    }

    /// Processes one user turn end to end.
    ///
    /// The turn itself never fails: when the store is unavailable the
    /// affection update is skipped, the degradation is accounted through
    /// the fallback handler, and the sentiment reading survives.
    pub async fn process_turn(
        &self,
        session_id: &str,
        text: &str,
        history: &[TurnRecord],
    ) -> TurnOutcome {
        let analysis = self.pipeline.analyze(text, history);
        let mut degraded = None;

        let stage = match self.tracker.get_stage(session_id).await {
            Ok(stage) => Some(stage),
            Err(err) => {
                let recovery = self.fallback.recover(
                    text,
                    &err,
                    PartialAnalysis {
                        raw: Some(&analysis.raw),
                        contextual: Some(&analysis.contextual),
                    },
                );
                warn!(
                    session_id,
                    strategy = recovery.strategy,
                    "stage lookup failed, continuing without session context"
                );
                degraded = Some(recovery);
                None
            }
        };

        let review = self.review(text, &analysis, stage, Some(session_id));

        // Skip the write when the read already showed the store is down.
        let update = if degraded.is_none() {
            match self
                .tracker
                .record_turn(
                    session_id,
                    review.final_score,
                    review.final_delta,
                    analysis.interaction_type,
                )
                .await
            {
                Ok(update) => Some(update),
                Err(err) => {
                    let recovery = self.fallback.recover(
                        text,
                        &err,
                        PartialAnalysis {
                            raw: Some(&analysis.raw),
                            contextual: Some(&analysis.contextual),
                        },
                    );
                    warn!(
                        session_id,
                        strategy = recovery.strategy,
                        "affection update lost, keeping the turn reading"
                    );
                    degraded = Some(recovery);
                    None
                }
            }
        } else {
            None
        };

        TurnOutcome {
            analysis,
            review,
            update,
            degraded,
        }
    }
}

impl std::fmt::Debug for TsundereSentimentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TsundereSentimentService")
            .field("running", &self.running)
            .field("tracked_sessions", &self.loops.tracked_sessions())
            .finish()
    }
}

#[async_trait]
impl Service for TsundereSentimentService {
    fn service_type(&self) -> &str {
        "tsundere-override"
    }

    async fn initialize(&mut self) -> Result<()> {
        info!("tsundere override service initialized");
        Ok(())
    }

    async fn start(&mut self) -> Result<()> {
        self.running = true;
        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        self.running = false;
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.running
    }

    async fn health_check(&self) -> Result<ServiceHealth> {
        Ok(if self.running {
            ServiceHealth::Healthy
        } else {
            ServiceHealth::Degraded
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
