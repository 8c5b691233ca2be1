//! Rejection policy for sexually tagged content, scaled by trust.

use kokoro_core::RelationshipStage;

/// Rejection severity for the session's current stage, 0 to 3.
///
/// Lower trust earns a stronger rejection; an unknown session defaults to
/// a strong one. Severity 0 means the content is tolerated, though still
/// reported.
pub fn sexual_severity(stage: Option<RelationshipStage>) -> u8 {
    match stage {
        Some(RelationshipStage::Hostile) | Some(RelationshipStage::Distant) => 3,
        Some(RelationshipStage::Cautious) | Some(RelationshipStage::Friendly) => 2,
        Some(RelationshipStage::Warm) => 1,
        Some(RelationshipStage::Close) => 0,
        None => 2,
    }
}

/// Applies the rejection to a score/delta pair.
///
/// A positive reading inverts, a negative one amplifies, and the delta is
/// pushed at least as low as `-5 × severity`. Severity 0 is a no-op.
pub fn apply_sexual_rejection(severity: u8, score: f32, delta: i32) -> (f32, i32) {
    if severity == 0 {
        return (score, delta);
    }
    let multiplier = 1.0 + 0.5 * f32::from(severity);
    let score = if score > 0.0 {
        -score * multiplier
    } else {
        score * multiplier
    };
    let delta = if delta > 0 {
        (-(delta as f32) * multiplier) as i32
    } else {
        (delta as f32 * multiplier) as i32
    };
    (score, delta.min(-5 * i32::from(severity)))
}
