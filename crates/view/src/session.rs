//! Per-stream viewport session.
//!
//! One `StreamSession` owns all mutable viewport state for one transcript:
//! the current snapshot, the last viewport observation, the pending anchor,
//! the subscription, and the transient fade schedule. All of it mutates on a
//! single control loop, driven by scroll events and subscription deliveries;
//! multiple transcripts rendering concurrently each get their own session.

use crate::anchor::AnchorPoint;
use crate::fade::FadeSchedule;
use crate::geometry::ViewportGeometry;
use crate::subscription::{Delivery, StreamId, SubscriptionManager, SubscriptionService};
use crate::tracker::{ViewportState, ViewportTracker};
use backscroll_core::{Clock, MessageId, MessageRenderer, RenderedMessage, Snapshot, SystemClock, ViewConfig};

/// Viewport session for one stream
pub struct StreamSession<S: SubscriptionService, C: Clock = SystemClock> {
    stream: StreamId,
    config: ViewConfig,
    clock: C,
    service: S,
    snapshot: Snapshot,
    tracker: ViewportTracker,
    manager: SubscriptionManager,
    renderer: MessageRenderer,
    fades: FadeSchedule,
    anchor: Option<AnchorPoint>,
    view: Option<ViewportState>,
    /// Scroll events before this instant make no fetch decisions; set after
    /// a programmatic scroll so its own scroll event can't re-trigger a fetch
    cooldown_until: i64,
}

impl<S: SubscriptionService, C: Clock> StreamSession<S, C> {
    pub fn new(stream: impl Into<StreamId>, config: ViewConfig, service: S, clock: C) -> Self {
        let tracker = ViewportTracker::new(&config);
        let manager = SubscriptionManager::new(&config);
        let renderer = MessageRenderer::new(&config);
        Self {
            stream: stream.into(),
            config,
            clock,
            service,
            snapshot: Snapshot::default(),
            tracker,
            manager,
            renderer,
            fades: FadeSchedule::new(),
            anchor: None,
            view: None,
            cooldown_until: 0,
        }
    }

    pub fn stream(&self) -> &str {
        &self.stream
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn view(&self) -> Option<&ViewportState> {
        self.view.as_ref()
    }

    pub fn manager(&self) -> &SubscriptionManager {
        &self.manager
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Handle one scroll event: recompute the viewport and evaluate the
    /// subscription decision table. During the post-restore cooldown the
    /// viewport is still recomputed (re-render is never suppressed) but no
    /// fetch decision is made.
    pub fn on_scroll(&mut self, geo: &impl ViewportGeometry) -> ViewportState {
        let view = self.tracker.observe(geo);

        if self.clock.now_ms() < self.cooldown_until {
            tracing::trace!(stream = %self.stream, "scroll within cooldown, fetch decision skipped");
        } else {
            self.manager.evaluate(&view, &self.snapshot, &self.stream, &mut self.service);
        }

        self.view = Some(view);
        view
    }

    /// Handle one subscription delivery. Stale deliveries (sequence id not
    /// matching the active request) are discarded; failures keep the previous
    /// snapshot displayed unchanged. On success the anchor is captured from
    /// `geo` (the geometry of the outgoing render) and the snapshot replaced
    /// atomically. Returns whether the snapshot changed.
    pub fn on_delivery(&mut self, delivery: Delivery, geo: &impl ViewportGeometry) -> bool {
        if !self.manager.accepts(&delivery) {
            tracing::debug!(stream = %self.stream, seq = delivery.seq, "stale delivery discarded");
            return false;
        }

        let messages = match delivery.result {
            Ok(messages) => messages,
            Err(reason) => {
                tracing::warn!(stream = %self.stream, %reason, "subscription failure, snapshot unchanged");
                return false;
            }
        };

        if let Some(view) = &self.view {
            self.anchor = AnchorPoint::capture(view, &self.snapshot, geo);
        }
        self.snapshot = Snapshot::new(messages);
        self.fades.reset(&self.snapshot, self.clock.now_ms() + self.config.fade_delay_ms);
        true
    }

    /// Consume the pending anchor against the re-rendered geometry and
    /// return the scroll position to apply. Starts the cooldown window, since
    /// applying the position will itself generate a scroll event.
    pub fn restore_scroll(&mut self, geo: &impl ViewportGeometry) -> Option<i64> {
        let anchor = self.anchor.take()?;
        let target = anchor.restore(&self.snapshot, geo);
        self.cooldown_until = self.clock.now_ms() + self.config.cooldown_ms;
        Some(target)
    }

    /// Fire due transient-hide deadlines; returns newly hidden message ids
    pub fn poll_fades(&mut self) -> Vec<MessageId> {
        self.fades.poll(self.clock.now_ms())
    }

    /// Whether a join/leave notice has faded out
    pub fn is_faded(&self, id: &str) -> bool {
        self.fades.is_hidden(id)
    }

    /// Render contracts for the current snapshot, run-grouped timestamps
    /// included
    pub fn rendered(&self) -> Vec<RenderedMessage> {
        self.renderer.render_all(self.snapshot.messages(), self.clock.now_ms())
    }

    /// Drop the active subscription, if any
    pub fn shutdown(&mut self) {
        let stream = self.stream.clone();
        self.manager.shutdown(&stream, &mut self.service);
    }
}
