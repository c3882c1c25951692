//! In-memory event buffer and file-backed event logger

use bevy::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use super::format::serialize_event;
use super::types::{ActionConfig, ActionEvent};

/// Simple in-memory event buffer (no file I/O).
#[derive(Default)]
pub struct EventBuffer {
    events: Vec<(u32, ActionEvent)>,
    session_id: String,
}

impl EventBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new session with a fresh UUID
    pub fn start_session(&mut self, timestamp: &str) {
        self.clear();
        self.session_id = Uuid::new_v4().to_string();
        self.log(0, ActionEvent::SessionStart {
            session_id: self.session_id.clone(),
            timestamp: timestamp.to_string(),
        });
    }

    /// Log the engine configuration
    pub fn log_config(&mut self, config: ActionConfig) {
        self.log(0, ActionEvent::Config(config));
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.session_id.clear();
    }

    pub fn log(&mut self, time_ms: u32, event: ActionEvent) {
        self.events.push((time_ms, event));
    }

    pub fn events(&self) -> &[(u32, ActionEvent)] {
        &self.events
    }

    /// Import events from an external source (like the EventBus)
    pub fn import_events(&mut self, events: impl IntoIterator<Item = (u32, ActionEvent)>) {
        self.events.extend(events);
    }

    /// Serialize all events to a log string
    pub fn serialize(&self) -> String {
        self.events
            .iter()
            .map(|(ts, e)| serialize_event(*ts, e))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Writes an EventBuffer to a timestamped .evlog file
#[derive(Resource)]
pub struct EventLogger {
    pub log_dir: PathBuf,
    pub enabled: bool,
}

impl Default for EventLogger {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            enabled: false,
        }
    }
}

impl EventLogger {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
            enabled: true,
        }
    }

    /// Write the buffer to `<log_dir>/<utc timestamp>.evlog`.
    /// Returns the written path.
    pub fn write(&self, buffer: &EventBuffer) -> Result<PathBuf, std::io::Error> {
        fs::create_dir_all(&self.log_dir)?;
        let name = format!("{}.evlog", chrono::Utc::now().format("%Y%m%d_%H%M%S"));
        let path = Path::new(&self.log_dir).join(name);
        fs::write(&path, buffer.serialize())?;
        info!("Wrote {} events to {}", buffer.events().len(), path.display());
        Ok(path)
    }
}
