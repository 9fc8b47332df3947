//! Message render contract.
//!
//! Maps messages (plus run-grouping context) to structural render data:
//! timestamp visibility, link segmentation, nick colors, transient notices.
//! Drawing is left to whatever sink consumes [`RenderedMessage`]; the ratatui
//! adapter in backscroll-view is one such sink.

use crate::color::{NickColor, color_for, normalize};
use crate::config::ViewConfig;
use crate::message::{Message, MessageId, MessageKind};

use regex::Regex;
use std::sync::OnceLock;

static LINK_RE: OnceLock<Regex> = OnceLock::new();

/// Tolerant scheme-optional domain matcher
fn link_re() -> &'static Regex {
    LINK_RE.get_or_init(|| {
        Regex::new(r"\b(https?://)?([a-z0-9-]+\.)+[a-z]{2,4}\b((/|\?)\S*)?").unwrap()
    })
}

/// One piece of a segmented message body, in original order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    /// A link, intended to open in a new viewing context. `href` gains an
    /// `http://` prefix when the text carried no scheme.
    Link { text: String, href: String },
}

/// Split free text into alternating literal and link segments.
///
/// Literal segments may be empty (text that starts or ends with a link keeps
/// its empty prefix/suffix); concatenating all segment texts reproduces the
/// input exactly.
pub fn segment_links(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut last = 0;
    for caps in link_re().captures_iter(text) {
        let m = caps.get(0).expect("capture 0 always present");
        segments.push(Segment::Literal(text[last..m.start()].to_string()));
        let href = if caps.get(1).is_some() {
            m.as_str().to_string()
        } else {
            format!("http://{}", m.as_str())
        };
        segments.push(Segment::Link { text: m.as_str().to_string(), href });
        last = m.end();
    }
    segments.push(Segment::Literal(text[last..].to_string()));
    segments
}

/// Timestamp visibility per message: a message is the last of its run when
/// the gap to the next message exceeds `run_gap_ms`; the final message always
/// shows a timestamp.
pub fn timestamp_flags(messages: &[Message], run_gap_ms: i64) -> Vec<bool> {
    let n = messages.len();
    (0..n)
        .map(|i| i + 1 == n || messages[i + 1].time - messages[i].time > run_gap_ms)
        .collect()
}

/// Human "sent N ago" label
pub fn relative_label(time_ms: i64, now_ms: i64) -> String {
    let delta = (now_ms - time_ms).max(0);
    let seconds = delta / 1000;
    if seconds < 10 {
        "sent just now".to_string()
    } else if seconds < 60 {
        format!("sent {}s ago", seconds)
    } else if seconds < 3600 {
        format!("sent {}m ago", seconds / 60)
    } else if seconds < 86_400 {
        format!("sent {}h ago", seconds / 3600)
    } else {
        format!("sent {}d ago", seconds / 86_400)
    }
}

/// Body of a rendered message
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedBody {
    /// Chat text, link-segmented
    Text { segments: Vec<Segment> },
    /// One-line join/leave notice; fades out shortly after render
    Notice { text: String },
    /// Uninterpreted message text, passed through
    Plain { text: String },
}

/// Render contract for a single message
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedMessage {
    pub id: MessageId,
    pub kind: MessageKind,
    pub from: String,
    /// Normalized sender key, for hover-highlighting density buckets
    pub sender_key: String,
    pub color: NickColor,
    pub body: RenderedBody,
    /// Present only on the last message of a run with a known send time
    pub timestamp: Option<String>,
}

/// Maps messages to their render contracts
#[derive(Debug, Clone)]
pub struct MessageRenderer {
    run_gap_ms: i64,
}

impl MessageRenderer {
    pub fn new(config: &ViewConfig) -> Self {
        Self { run_gap_ms: config.run_gap_ms }
    }

    /// Render a whole snapshot's messages with run-grouped timestamps
    pub fn render_all(&self, messages: &[Message], now_ms: i64) -> Vec<RenderedMessage> {
        let flags = timestamp_flags(messages, self.run_gap_ms);
        messages
            .iter()
            .zip(flags)
            .map(|(msg, show_timestamp)| self.render_one(msg, show_timestamp, now_ms))
            .collect()
    }

    /// Render one message. Malformed input degrades instead of failing: an
    /// unknown sender gets the neutral color, an unknown send time (0) gets
    /// no timestamp label.
    pub fn render_one(&self, msg: &Message, show_timestamp: bool, now_ms: i64) -> RenderedMessage {
        let body = match msg.kind {
            MessageKind::Text => RenderedBody::Text { segments: segment_links(&msg.text) },
            MessageKind::Join => RenderedBody::Notice { text: format!("{} entered.", msg.from) },
            MessageKind::Leave => {
                let text = if msg.text.is_empty() {
                    format!("{} left.", msg.from)
                } else {
                    format!("{} left ({})", msg.from, msg.text)
                };
                RenderedBody::Notice { text }
            }
            MessageKind::Other => RenderedBody::Plain { text: msg.text.clone() },
        };

        let timestamp = (show_timestamp && msg.time != 0).then(|| relative_label(msg.time, now_ms));

        RenderedMessage {
            id: msg.id.clone(),
            kind: msg.kind,
            from: msg.from.clone(),
            sender_key: normalize(&msg.from),
            color: color_for(&msg.from),
            body,
            timestamp,
        }
    }
}
