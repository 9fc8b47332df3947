use crate::error::{Error, Result};

use serde::{Deserialize, Serialize};

/// Unique message identifier within a stream
pub type MessageId = String;

/// Closed set of message kinds.
///
/// Unknown kinds on the wire deserialize to `Other` instead of failing the
/// whole snapshot; matches over this enum stay exhaustive so a new variant
/// fails to compile rather than silently falling through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Ordinary chat text
    Text,
    /// Someone entered the stream
    #[serde(alias = "back")]
    Join,
    /// Someone left the stream
    #[serde(alias = "away")]
    Leave,
    /// Anything the viewport does not interpret
    #[default]
    #[serde(other)]
    Other,
}

impl MessageKind {
    /// Join/Leave notices fade out shortly after render
    pub fn is_transient(&self) -> bool {
        matches!(self, MessageKind::Join | MessageKind::Leave)
    }
}

/// One message as consumed from the stream source.
///
/// `time` and `from` may be absent on the wire; they default to `0` and the
/// empty string, and downstream rendering treats those as "unknown" (no
/// timestamp label, neutral nick color) rather than aborting the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    #[serde(default)]
    pub time: i64,
    #[serde(rename = "type", default)]
    pub kind: MessageKind,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub text: String,
}

impl Message {
    pub fn text(id: impl Into<String>, time: i64, from: impl Into<String>, text: impl Into<String>) -> Self {
        Self { id: id.into(), time, kind: MessageKind::Text, from: from.into(), text: text.into() }
    }

    pub fn join(id: impl Into<String>, time: i64, from: impl Into<String>) -> Self {
        Self { id: id.into(), time, kind: MessageKind::Join, from: from.into(), text: String::new() }
    }

    /// A leave notice; `reason` becomes the notice suffix when non-empty
    pub fn leave(id: impl Into<String>, time: i64, from: impl Into<String>, reason: impl Into<String>) -> Self {
        Self { id: id.into(), time, kind: MessageKind::Leave, from: from.into(), text: reason.into() }
    }
}

/// The full ordered message sequence currently held by a viewport.
///
/// Replaced wholesale on every subscription delivery; never diffed. Within a
/// snapshot ids are unique and times ascend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    messages: Vec<Message>,
}

impl Snapshot {
    pub fn new(messages: Vec<Message>) -> Self {
        debug_assert!(
            messages.windows(2).all(|w| w[0].time <= w[1].time),
            "snapshot must ascend by time"
        );
        Self { messages }
    }

    /// Parse a snapshot from a JSON array of messages, tolerating missing
    /// `time`/`from` fields and unknown kinds.
    pub fn from_json(json: &str) -> Result<Self> {
        let messages: Vec<Message> = serde_json::from_str(json).map_err(|e| Error::Parse(e.to_string()))?;
        Ok(Self::new(messages))
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Message> {
        self.messages.get(index)
    }

    pub fn time_at(&self, index: usize) -> Option<i64> {
        self.messages.get(index).map(|m| m.time)
    }

    pub fn first_time(&self) -> Option<i64> {
        self.messages.first().map(|m| m.time)
    }

    pub fn last_time(&self) -> Option<i64> {
        self.messages.last().map(|m| m.time)
    }

    /// Index of the message with the given id, if still present
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.messages.iter().position(|m| m.id == id)
    }

    /// Index of the message closest in time to `time`.
    ///
    /// Fallback for anchors whose message was evicted by the server-side
    /// window; `None` only when the snapshot is empty.
    pub fn nearest_by_time(&self, time: i64) -> Option<usize> {
        if self.messages.is_empty() {
            return None;
        }
        let after = self.messages.partition_point(|m| m.time < time);
        if after == 0 {
            return Some(0);
        }
        if after == self.messages.len() {
            return Some(self.messages.len() - 1);
        }
        let before = after - 1;
        let d_before = time - self.messages[before].time;
        let d_after = self.messages[after].time - time;
        Some(if d_after < d_before { after } else { before })
    }
}

impl From<Vec<Message>> for Snapshot {
    fn from(messages: Vec<Message>) -> Self {
        Self::new(messages)
    }
}
