//! Per-session affection state

use crate::affection::stage::RelationshipStage;
use crate::types::InteractionType;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A deferred affection increment from a gradual change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingChange {
    /// Increment to apply, within the configured step size
    pub delta: i32,
    /// Earliest time the increment may be applied
    pub scheduled_time: DateTime<Utc>,
}

/// One turn's sentiment outcome as recorded on the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentRecord {
    /// Final sentiment score for the turn
    pub score: f32,
    /// Affection delta proposed by the turn
    pub delta: i32,
    /// Interaction classification for the turn
    pub interaction_type: InteractionType,
    /// When the turn happened
    pub timestamp: DateTime<Utc>,
}

/// Affection state owned by one logical session
///
/// Created on first contact and mutated on every turn. The level is always
/// within [0, 100]; every mutation path goes through
/// [`apply_clamped`](AffectionSession::apply_clamped) so the invariant cannot
/// be bypassed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffectionSession {
    /// Session identifier
    pub id: String,
    /// Current affection level in [0, 100]
    pub affection_level: u8,
    /// When the session was created
    pub created_at: DateTime<Utc>,
    /// Last time the session was touched by a turn or admin action
    pub last_interaction_time: DateTime<Utc>,
    /// Deferred increments from gradual changes, drained lazily
    #[serde(default)]
    pub pending_gradual_changes: Vec<PendingChange>,
    /// Bounded log of per-turn sentiment outcomes, newest last
    #[serde(default)]
    pub sentiment_history: Vec<SentimentRecord>,
}

impl AffectionSession {
    /// Create a fresh session at the given starting level
    pub fn new(id: impl Into<String>, initial_level: u8, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            affection_level: initial_level.min(100),
            created_at: now,
            last_interaction_time: now,
            pending_gradual_changes: Vec::new(),
            sentiment_history: Vec::new(),
        }
    }

    /// Relationship stage for the current level
    pub fn stage(&self) -> RelationshipStage {
        RelationshipStage::from_level(self.affection_level)
    }

    /// Apply a delta, clamping the level to [0, 100] and recording the
    /// interaction time. Returns the new level.
    pub fn apply_clamped(&mut self, delta: i32, now: DateTime<Utc>) -> u8 {
        let next = (self.affection_level as i32 + delta).clamp(0, 100) as u8;
        self.affection_level = next;
        self.last_interaction_time = now;
        next
    }

    /// Queue increments for a gradual change, spaced one interval apart
    /// starting one interval from now
    pub fn schedule_increments(
        &mut self,
        increments: &[i32],
        spacing: Duration,
        now: DateTime<Utc>,
    ) {
        for (i, delta) in increments.iter().enumerate() {
            self.pending_gradual_changes.push(PendingChange {
                delta: *delta,
                scheduled_time: now + spacing * (i as i32 + 1),
            });
        }
    }

    /// Apply every pending increment whose scheduled time has arrived
    ///
    /// Returns the summed nominal delta of the applied increments. There is
    /// no background timer; callers invoke this at the start of each
    /// interaction.
    pub fn drain_due(&mut self, now: DateTime<Utc>) -> i32 {
        let mut applied = 0;
        let mut remaining = Vec::with_capacity(self.pending_gradual_changes.len());
        for change in self.pending_gradual_changes.drain(..) {
            if change.scheduled_time <= now {
                applied += change.delta;
            } else {
                remaining.push(change);
            }
        }
        self.pending_gradual_changes = remaining;
        if applied != 0 {
            self.apply_clamped(applied, now);
        }
        applied
    }

    /// Append a turn record, dropping the oldest entries beyond the cap
    pub fn record_sentiment(&mut self, record: SentimentRecord, cap: usize) {
        self.sentiment_history.push(record);
        if self.sentiment_history.len() > cap {
            let excess = self.sentiment_history.len() - cap;
            self.sentiment_history.drain(..excess);
        }
    }

    /// The most recent `limit` turn records, oldest first
    pub fn recent_history(&self, limit: usize) -> &[SentimentRecord] {
        let start = self.sentiment_history.len().saturating_sub(limit);
        &self.sentiment_history[start..]
    }

    /// Number of recorded turns
    pub fn turn_count(&self) -> usize {
        self.sentiment_history.len()
    }

    /// Age of the session
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.created_at
    }

    /// Time since the last interaction
    pub fn idle_for(&self, now: DateTime<Utc>) -> Duration {
        now - self.last_interaction_time
    }
}
