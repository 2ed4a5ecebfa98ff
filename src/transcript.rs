//! Chat transcript sink.
//!
//! Cards are appended to a shared, append-only transcript as `ChatMessage`s.
//! The bundled sink writes one JSON object per line to any writer.

use std::io::Write;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::CardError;

/// One posted card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: uuid::Uuid,
    pub timestamp_ms: i64,
    pub speaker: String,
    pub content: String,
    /// Style tags the host applies to the message container.
    pub class_names: Vec<String>,
}

impl ChatMessage {
    pub fn new(speaker: &str, content: String, class_names: &[&str]) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
            speaker: speaker.to_string(),
            content,
            class_names: class_names.iter().map(|c| c.to_string()).collect(),
        }
    }
}

pub trait TranscriptSink: Send + Sync {
    fn post(&self, message: &ChatMessage) -> Result<(), CardError>;
}

/// Appends messages as JSON lines.
pub struct JsonLinesTranscript<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesTranscript<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl JsonLinesTranscript<std::fs::File> {
    /// Open (or create) a transcript file in append mode.
    pub fn append_to(path: &std::path::Path) -> Result<Self, CardError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                CardError::Transcript(format!("Failed to create {}: {e}", parent.display()))
            })?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| CardError::Transcript(format!("Failed to open {}: {e}", path.display())))?;
        Ok(Self::new(file))
    }
}

impl<W: Write + Send> TranscriptSink for JsonLinesTranscript<W> {
    fn post(&self, message: &ChatMessage) -> Result<(), CardError> {
        let mut line = serde_json::to_string(message)
            .map_err(|e| CardError::Transcript(format!("Failed to serialize message: {e}")))?;
        line.push('\n');

        let mut writer = self.writer.lock();
        writer
            .write_all(line.as_bytes())
            .and_then(|_| writer.flush())
            .map_err(|e| CardError::Transcript(e.to_string()))
    }
}

/// Keeps posted messages in memory.
#[derive(Default)]
pub struct MemoryTranscript {
    messages: Mutex<Vec<ChatMessage>>,
}

impl MemoryTranscript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.messages.lock().clone()
    }
}

impl TranscriptSink for MemoryTranscript {
    fn post(&self, message: &ChatMessage) -> Result<(), CardError> {
        self.messages.lock().push(message.clone());
        Ok(())
    }
}
