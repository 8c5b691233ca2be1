//! File-per-session store
//!
//! Each session lives at `<dir>/<id>.json`, written atomically through a
//! temp file. A file that no longer parses is renamed aside as
//! `<name>.json.corrupted.<timestamp>` and reported as not found, so one
//! bad write never wedges a session permanently.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio::fs;
use tracing::{debug, info, warn};

use kokoro_core::{AffectionSession, KokoroError, Result, SessionStore};

/// Idle window, in days, inside which a session counts as active.
const ACTIVE_WINDOW_DAYS: i64 = 30;

/// Summary of everything on disk, for the admin surface.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StoreStats {
    /// Sessions that parsed.
    pub total_sessions: usize,
    /// Sessions touched within the active window.
    pub active_sessions: usize,
    /// Earliest last-interaction timestamp on disk.
    pub oldest_interaction: Option<DateTime<Utc>>,
    /// Latest last-interaction timestamp on disk.
    pub newest_interaction: Option<DateTime<Utc>>,
    /// Mean affection level across parsed sessions.
    pub average_affection: f64,
}

/// JSON-file session store rooted at one directory.
#[derive(Debug)]
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    /// Opens a store rooted at `dir`, creating the directory if needed.
    pub async fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;
        info!(dir = %dir.display(), "file session store opened");
        Ok(Self { dir })
    }

    /// Directory the store reads and writes.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Summary numbers over every stored session.
    ///
    /// Corrupted files are quarantined on the way through and excluded,
    /// exactly as a direct `get` would treat them.
    pub async fn stats(&self) -> Result<StoreStats> {
        let now = Utc::now();
        let mut stats = StoreStats::default();
        let mut affection_total = 0u64;

        for id in self.list_ids().await? {
            let Some(session) = self.load(&self.session_path(&id)?).await? else {
                continue;
            };
            stats.total_sessions += 1;
            if session.idle_for(now) <= Duration::days(ACTIVE_WINDOW_DAYS) {
                stats.active_sessions += 1;
            }
            let last = session.last_interaction_time;
            if stats.oldest_interaction.map_or(true, |oldest| last < oldest) {
                stats.oldest_interaction = Some(last);
            }
            if stats.newest_interaction.map_or(true, |newest| last > newest) {
                stats.newest_interaction = Some(last);
            }
            affection_total += u64::from(session.affection_level);
        }

        if stats.total_sessions > 0 {
            stats.average_affection = affection_total as f64 / stats.total_sessions as f64;
        }
        Ok(stats)
    }

    // Session ids become file names directly, so anything that would leave
    // the storage directory is rejected up front.
    fn session_path(&self, id: &str) -> Result<PathBuf> {
        if !valid_id(id) {
            return Err(KokoroError::validation(format!(
                "session id {id:?} is not usable as a file name"
            )));
        }
        Ok(self.dir.join(format!("{id}.json")))
    }

    async fn load(&self, path: &Path) -> Result<Option<AffectionSession>> {
        let bytes = match fs::read(path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        match serde_json::from_slice(&bytes) {
            Ok(session) => Ok(Some(session)),
            Err(err) => {
                self.quarantine(path, &err.to_string()).await;
                Ok(None)
            }
        }
    }

    /// Renames an unreadable session file aside for later diagnosis.
    async fn quarantine(&self, path: &Path, detail: &str) {
        let stamp = Utc::now().format("%Y%m%d%H%M%S");
        let target = PathBuf::from(format!("{}.corrupted.{stamp}", path.display()));
        match fs::rename(path, &target).await {
            Ok(()) => warn!(
                from = %path.display(),
                to = %target.display(),
                detail,
                "corrupted session file quarantined"
            ),
            Err(err) => warn!(
                path = %path.display(),
                %err,
                "failed to quarantine corrupted session file"
            ),
        }
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn get(&self, id: &str) -> Result<Option<AffectionSession>> {
        self.load(&self.session_path(id)?).await
    }

    async fn put(&self, session: &AffectionSession) -> Result<bool> {
        let path = self.session_path(&session.id)?;
        let created = fs::metadata(&path).await.is_err();

        // Write-then-rename keeps a crash from leaving a half-written file
        // under the session's real name.
        let tmp = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(session)?;
        fs::write(&tmp, &bytes).await?;
        fs::rename(&tmp, &path).await?;

        debug!(id = %session.id, created, "session persisted");
        Ok(created)
    }

    async fn list_ids(&self) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        let mut entries = fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if let Some(id) = entry
                .file_name()
                .to_str()
                .and_then(|name| name.strip_suffix(".json"))
                .filter(|id| valid_id(id))
            {
                ids.push(id.to_string());
            }
        }
        Ok(ids)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let path = self.session_path(id)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                info!(id, "session file deleted");
                Ok(true)
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    async fn delete_expired(&self, max_age: Duration) -> Result<usize> {
        let now = Utc::now();
        let mut removed = 0;
        for id in self.list_ids().await? {
            let Some(session) = self.load(&self.session_path(&id)?).await? else {
                continue;
            };
            if session.idle_for(now) > max_age {
                if self.delete(&id).await? {
                    removed += 1;
                }
            }
        }
        if removed > 0 {
            info!(removed, "expired sessions deleted");
        }
        Ok(removed)
    }
}

fn valid_id(id: &str) -> bool {
    !id.is_empty() && !id.contains(['/', '\\']) && id != "." && id != ".."
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_session_path_rejects_escapes() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path()).await.unwrap();
        for bad in ["", "a/b", r"a\b", ".", ".."] {
            assert!(store.session_path(bad).is_err(), "{bad:?} should be rejected");
        }
        let path = store.session_path("user-42").unwrap();
        assert!(path.ends_with("user-42.json"));
    }
}
