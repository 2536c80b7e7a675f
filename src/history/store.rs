use super::state::Event;
use anyhow::{Context, Result};
use chrono::Utc;
use glob::glob;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashSet,
    fs,
    path::PathBuf,
};

/// On-disk record of one pipeline event.
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub file_name: String,
    pub event: String,
    pub recorded_at: String,
}

/// `History` manages a directory of per-event JSON files named
/// `<file>---<Event>---<ts>.json`. Creating it scans the directory and
/// populates a seen-set so re-runs can skip work already done.
pub struct History {
    history_dir: PathBuf,
    seen: HashSet<(String, Event)>,
}

impl History {
    /// Create a `History` at `history_dir`, creating the directory if
    /// needed and scanning any existing event files.
    pub fn new(history_dir: impl Into<PathBuf>) -> Result<Self> {
        let history_dir: PathBuf = history_dir.into();
        fs::create_dir_all(&history_dir)
            .with_context(|| format!("creating history directory {}", history_dir.display()))?;

        let mut seen = HashSet::new();
        let pattern = format!("{}/*.json", history_dir.display());
        for entry in glob(&pattern).context("invalid glob pattern for History::new")? {
            let path = match entry {
                Ok(p) => p,
                Err(e) => {
                    tracing::warn!("cannot read glob entry: {:?}", e);
                    continue;
                }
            };
            let stem = match path.file_stem().and_then(|f| f.to_str()) {
                Some(n) => n,
                None => continue,
            };

            // Expect "<file>---<Event>---<ts>"
            let parts: Vec<&str> = stem.split("---").collect();
            if parts.len() != 3 {
                continue;
            }
            let event = match Event::from_str(parts[1]) {
                Some(e) => e,
                None => continue,
            };
            seen.insert((parts[0].to_string(), event));
        }

        Ok(History { history_dir, seen })
    }

    /// Record `event` for `file_name`. A repeat of an already-seen pair is
    /// a no-op. The record is written to a temp file and renamed into
    /// place.
    pub fn add(&mut self, file_name: &str, event: Event) -> Result<()> {
        if self.seen.contains(&(file_name.to_string(), event)) {
            return Ok(());
        }

        let now = Utc::now();
        let record = HistoryRecord {
            file_name: file_name.to_string(),
            event: event.as_str().to_string(),
            recorded_at: now.to_rfc3339(),
        };

        let final_name = format!(
            "{}---{}---{}.json",
            file_name,
            event.as_str(),
            now.timestamp_micros()
        );
        let tmp_path = self.history_dir.join(format!("{}.tmp", final_name));
        let final_path = self.history_dir.join(&final_name);

        let body = serde_json::to_vec_pretty(&record).context("serializing history record")?;
        fs::write(&tmp_path, body)
            .with_context(|| format!("writing history file {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &final_path).with_context(|| {
            format!(
                "renaming {} to {}",
                tmp_path.display(),
                final_path.display()
            )
        })?;

        self.seen.insert((file_name.to_string(), event));
        Ok(())
    }

    /// Returns `true` if `(file_name, event)` is already recorded.
    pub fn get(&self, file_name: &str, event: Event) -> bool {
        self.seen.contains(&(file_name.to_string(), event))
    }
}
