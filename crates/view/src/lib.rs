//! backscroll-view: the stateful viewport session.
//!
//! Tracks the visible window over a bounded message buffer, decides when to
//! hold a live tail versus a paged historical subscription, and keeps the
//! scroll position anchored across wholesale snapshot replacement. One
//! [`StreamSession`] per rendered transcript; everything mutates on a single
//! control loop.

pub mod anchor;
pub mod fade;
pub mod geometry;
pub mod session;
pub mod strip;
pub mod subscription;
pub mod tracker;

pub use anchor::AnchorPoint;
pub use fade::FadeSchedule;
pub use geometry::{FixedRowGeometry, ViewportGeometry};
pub use session::StreamSession;
pub use strip::{DensityStrip, TranscriptView, transcript_lines};
pub use subscription::{
    Delivery, DeliveryReceiver, DeliverySender, StreamId, SubscriptionManager, SubscriptionMode, SubscriptionService,
    WatchHandle, WatchRequest, delivery_channel,
};
pub use tracker::{ScrollDirection, ViewportState, ViewportTracker};
