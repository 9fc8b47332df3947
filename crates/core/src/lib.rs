//! backscroll-core: data model and pure viewport algorithms.
//!
//! Holds everything the viewport computes without touching geometry or a
//! subscription service: the message/snapshot model, configuration, the
//! nickname color function, timeline density buckets, and the per-message
//! render contract. backscroll-view layers the stateful viewport session on
//! top of this crate.

pub mod clock;
pub mod color;
pub mod config;
pub mod density;
pub mod error;
pub mod logging;
pub mod message;
pub mod render;

pub use clock::{Clock, SystemClock};
pub use color::{NEUTRAL, NickColor, color_for, normalize};
pub use config::ViewConfig;
pub use density::{DensityBucket, DensityMap, DensityRow};
pub use error::{Error, Result};
pub use message::{Message, MessageId, MessageKind, Snapshot};
pub use render::{
    MessageRenderer, RenderedBody, RenderedMessage, Segment, relative_label, segment_links, timestamp_flags,
};
