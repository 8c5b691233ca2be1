//! Session administration for the Kokoro affection store
//!
//! Inspects and adjusts persisted affection sessions, and runs the full
//! analysis stack over a single utterance for tuning. Works directly on the
//! same file-backed store the chat host uses, so changes made here are
//! visible to the next conversation turn.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::bail;
use chrono::Duration;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use kokoro_core::{
    get_env_or, load_env, AffectionTracker, AffectionUpdate, RelationshipStage, SentimentPipeline,
    TrackerConfig, TurnAnalysis,
};
use kokoro_plugin_tsundere::{OverrideOutcome, TsundereSentimentService};
use kokoro_storage_file::FileSessionStore;

#[derive(Parser)]
#[command(name = "affection-admin")]
#[command(version)]
#[command(about = "Inspect and adjust Kokoro affection sessions")]
struct Cli {
    /// Directory of session files (default: $KOKORO_SESSIONS_DIR or ./data/sessions)
    #[arg(short = 'd', long)]
    sessions_dir: Option<PathBuf>,

    /// Verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every stored session
    List,
    /// Show one session in detail
    Show {
        /// Session identifier
        id: String,
    },
    /// Set a session's affection level directly
    Set {
        /// Session identifier
        id: String,
        /// New level, 0 to 100
        level: u8,
    },
    /// Apply a delta through the normal gradual-change path
    Adjust {
        /// Session identifier
        id: String,
        /// Signed change, e.g. 5 or -3
        #[arg(allow_hyphen_values = true)]
        delta: i32,
    },
    /// Aggregate statistics over the whole store
    Stats,
    /// Delete sessions idle longer than the retention window
    Cleanup {
        /// Retention window in days (default: KOKORO_RETENTION_DAYS or 30)
        #[arg(long)]
        days: Option<i64>,
    },
    /// Run the full analysis stack over one utterance
    Analyze {
        /// Utterance to analyze
        text: String,
        /// Record the turn against this session instead of a dry run
        #[arg(short, long)]
        session: Option<String>,
    },
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn default_sessions_dir() -> PathBuf {
    PathBuf::from(get_env_or("KOKORO_SESSIONS_DIR", "./data/sessions"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    load_env().ok();

    let dir = cli.sessions_dir.clone().unwrap_or_else(default_sessions_dir);
    tracing::debug!(dir = %dir.display(), "opening session store");
    let store = Arc::new(FileSessionStore::new(dir).await?);
    let tracker = Arc::new(AffectionTracker::new(
        TrackerConfig::from_env(),
        store.clone(),
    ));

    match cli.command {
        Commands::List => cmd_list(&tracker).await,
        Commands::Show { id } => cmd_show(&tracker, &id).await,
        Commands::Set { id, level } => cmd_set(&tracker, &id, level).await,
        Commands::Adjust { id, delta } => cmd_adjust(&tracker, &id, delta).await,
        Commands::Stats => cmd_stats(&tracker, &store).await,
        Commands::Cleanup { days } => cmd_cleanup(&tracker, days).await,
        Commands::Analyze { text, session } => {
            let service = TsundereSentimentService::new(Arc::clone(&tracker));
            cmd_analyze(&service, &text, session.as_deref()).await
        }
    }
}

async fn cmd_list(tracker: &AffectionTracker) -> anyhow::Result<()> {
    let ids = tracker.list_sessions().await?;
    if ids.is_empty() {
        println!("No sessions stored.");
        return Ok(());
    }
    println!(
        "{:<28} {:>5}  {:<9} {:>5}  {}",
        "ID", "LEVEL", "STAGE", "TURNS", "LAST INTERACTION"
    );
    for id in ids {
        let Some(session) = tracker.get_session(&id).await? else {
            continue;
        };
        println!(
            "{:<28} {:>5}  {:<9} {:>5}  {}",
            session.id,
            session.affection_level,
            session.stage(),
            session.turn_count(),
            session.last_interaction_time.format("%Y-%m-%d %H:%M:%S"),
        );
    }
    Ok(())
}

async fn cmd_show(tracker: &AffectionTracker, id: &str) -> anyhow::Result<()> {
    let Some(session) = tracker.get_session(id).await? else {
        bail!("no session {id:?} in the store");
    };
    let stage = session.stage();
    let profile = stage.profile();
    let (lo, hi) = stage.bounds();

    println!("Session {}", session.id);
    println!(
        "  level:       {} ({}, band {}-{})",
        session.affection_level, stage, lo, hi
    );
    println!("  description: {}", profile.description);
    println!("  traits:      {}", profile.behavior_traits.join(", "));
    println!(
        "  created:     {}",
        session.created_at.format("%Y-%m-%d %H:%M:%S")
    );
    println!(
        "  last seen:   {}",
        session.last_interaction_time.format("%Y-%m-%d %H:%M:%S")
    );
    println!("  turns:       {}", session.turn_count());
    if !session.pending_gradual_changes.is_empty() {
        let pending: i32 = session
            .pending_gradual_changes
            .iter()
            .map(|change| change.delta)
            .sum();
        println!(
            "  pending:     {:+} over {} increment(s)",
            pending,
            session.pending_gradual_changes.len()
        );
    }
    let recent = session.recent_history(5);
    if !recent.is_empty() {
        println!("  recent turns:");
        for record in recent {
            println!(
                "    {}  score {:+.2}  delta {:+}  {}",
                record.timestamp.format("%Y-%m-%d %H:%M"),
                record.score,
                record.delta,
                record.interaction_type,
            );
        }
    }
    Ok(())
}

async fn cmd_set(tracker: &AffectionTracker, id: &str, level: u8) -> anyhow::Result<()> {
    if level > 100 {
        bail!("level must be within 0-100, got {level}");
    }
    let update = tracker.set_level(id, level).await?;
    print_update(&update);
    Ok(())
}

async fn cmd_adjust(tracker: &AffectionTracker, id: &str, delta: i32) -> anyhow::Result<()> {
    let update = tracker.apply_delta(id, delta).await?;
    print_update(&update);
    Ok(())
}

async fn cmd_stats(tracker: &AffectionTracker, store: &FileSessionStore) -> anyhow::Result<()> {
    let tracker_stats = tracker.stats().await?;
    let store_stats = store.stats().await?;

    println!("Store {}", store.dir().display());
    println!(
        "  sessions:  {} ({} active)",
        store_stats.total_sessions, store_stats.active_sessions
    );
    if tracker_stats.total_sessions == 0 {
        return Ok(());
    }
    println!("  average:   {:.1}", tracker_stats.average_level);
    if let Some(oldest) = store_stats.oldest_interaction {
        println!("  oldest:    {}", oldest.format("%Y-%m-%d %H:%M:%S"));
    }
    if let Some(newest) = store_stats.newest_interaction {
        println!("  newest:    {}", newest.format("%Y-%m-%d %H:%M:%S"));
    }
    println!("  stages:");
    for stage in RelationshipStage::ALL {
        let count = tracker_stats.stage_counts.get(&stage).copied().unwrap_or(0);
        if count > 0 {
            println!("    {:<9} {}", stage, count);
        }
    }
    Ok(())
}

async fn cmd_cleanup(tracker: &AffectionTracker, days: Option<i64>) -> anyhow::Result<()> {
    let days = days.unwrap_or(tracker.config().retention_days);
    if days <= 0 {
        bail!("retention must be at least one day, got {days}");
    }
    let removed = tracker.cleanup(Duration::days(days)).await?;
    println!("✓ Removed {removed} session(s) idle longer than {days} day(s)");
    Ok(())
}

async fn cmd_analyze(
    service: &TsundereSentimentService,
    text: &str,
    session: Option<&str>,
) -> anyhow::Result<()> {
    match session {
        Some(id) => {
            let outcome = service.process_turn(id, text, &[]).await;
            print_analysis(text, &outcome.analysis, &outcome.review);
            match (&outcome.update, &outcome.degraded) {
                (Some(update), _) => {
                    println!("Recorded against {id:?}");
                    print_update(update);
                }
                (None, Some(degraded)) => {
                    println!(
                        "Store unavailable, turn not recorded (recovered via {})",
                        degraded.strategy
                    );
                }
                (None, None) => {}
            }
        }
        None => {
            let analysis = SentimentPipeline::new().analyze(text, &[]);
            let review = service.review(text, &analysis, None, None);
            print_analysis(text, &analysis, &review);
            println!("Dry run, nothing recorded. Pass --session <id> to record the turn.");
        }
    }
    Ok(())
}

fn print_update(update: &AffectionUpdate) {
    println!(
        "✓ {}: level {} -> {} ({})",
        update.session_id, update.previous_level, update.new_level, update.stage
    );
    if update.stage_changed {
        println!("  crossed a stage boundary");
    }
    if update.drained != 0 {
        println!(
            "  applied {:+} from earlier gradual changes",
            update.drained
        );
    }
    if update.deferred != 0 {
        println!("  deferred {:+} to scheduled increments", update.deferred);
    }
}

fn print_analysis(text: &str, analysis: &TurnAnalysis, review: &OverrideOutcome) {
    println!("Utterance: {text:?}");
    println!("First pass");
    if !analysis.raw.matched_keywords.is_empty() {
        println!("  keywords:    {}", analysis.raw.matched_keywords.join(", "));
    }
    println!("  tags:        {:?}", analysis.raw.tags);
    println!(
        "  raw:         score {:+.2}, delta {:+}",
        analysis.raw.score, analysis.raw.raw_delta
    );
    println!(
        "  adjusted:    score {:+.2}, delta {:+}",
        analysis.adjusted_score, analysis.final_delta
    );
    println!("  type:        {}", analysis.interaction_type);
    println!(
        "  confidence:  {:.2} (ambiguity {:.2})",
        analysis.assessment.overall_confidence, analysis.assessment.ambiguity_score
    );
    println!(
        "  emotion:     {} ({:.2})",
        analysis.contextual.dominant_emotion.as_str(),
        analysis.contextual.emotion_confidence
    );
    if analysis.contextual.sarcasm_probability > 0.0 || analysis.contextual.irony_probability > 0.0
    {
        println!(
            "  non-literal: sarcasm {:.2}, irony {:.2}",
            analysis.contextual.sarcasm_probability, analysis.contextual.irony_probability
        );
    }
    if !analysis.contradictions.is_empty() {
        println!("  contradicts: {}", analysis.contradictions.join(", "));
    }

    println!("Persona review");
    let assessment = &review.assessment;
    if assessment.is_tsundere {
        println!(
            "  tsundere:    yes, confidence {:.2}, read as {}",
            assessment.confidence, assessment.interpretation
        );
    } else {
        println!("  tsundere:    no");
    }
    if let Some(farewell) = &assessment.farewell {
        println!(
            "  farewell:    {} ({})",
            farewell.kind.as_str(),
            farewell.register.as_str()
        );
    }
    if let Some(severity) = review.sexual_severity {
        println!("  sexual:      severity {severity}");
    }
    if let Some(looped) = review.loop_assessment.as_ref().filter(|l| l.detected) {
        println!(
            "  loop:        {} (severity {:.1}, recovery {:+})",
            looped.patterns.join(", "),
            looped.severity,
            looped.recovery
        );
        if let Some(intervention) = looped.intervention {
            println!("  intervene:   {}", intervention.as_str());
        }
    }
    println!(
        "  final:       score {:+.2}, delta {:+}",
        review.final_score, review.final_delta
    );

    println!("LLM context");
    let map = review.llm_context.to_context_map();
    match serde_json::to_string_pretty(&map) {
        Ok(rendered) => println!("{rendered}"),
        Err(err) => println!("  (failed to render: {err})"),
    }
}
