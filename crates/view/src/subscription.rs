//! Exclusive stream subscription management.
//!
//! At most one subscription is ever active: a live tail while the viewport
//! sits at the bottom, or a paged historical window while prefetching near a
//! buffer edge. Every request carries a fresh sequence id; deliveries are
//! asynchronous, may arrive out of issuance order, and stale ones are
//! discarded.

use crate::tracker::{ScrollDirection, ViewportState};
use backscroll_core::{Message, Snapshot, ViewConfig};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Identifies one upstream message stream
pub type StreamId = String;

/// Which subscription, if any, is currently held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubscriptionMode {
    #[default]
    None,
    /// Continuously deliver the newest page of messages
    Tail,
    /// A bounded historical window anchored near a timestamp
    Paged,
}

/// One watch request issued to the subscription service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchRequest {
    pub stream: StreamId,
    /// Anchor timestamp for paged requests; `None` tails the newest messages
    pub since: Option<i64>,
    pub page_size: u32,
    /// Extra context messages bridging a paged window into the loaded buffer
    pub overlap: u32,
    /// Tags this request's deliveries for staleness detection
    pub seq: u64,
}

/// Cancelable handle to an issued watch
#[derive(Debug, Clone)]
pub struct WatchHandle {
    pub seq: u64,
    cancel: CancellationToken,
}

impl WatchHandle {
    pub fn new(seq: u64) -> Self {
        Self { seq, cancel: CancellationToken::new() }
    }

    /// Token a service implementation can watch to stop delivering
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// One asynchronous delivery from the subscription service
#[derive(Debug, Clone)]
pub struct Delivery {
    /// Sequence id of the request this delivery answers
    pub seq: u64,
    /// An ordered message sequence, or the upstream failure
    pub result: std::result::Result<Vec<Message>, String>,
}

pub type DeliverySender = mpsc::UnboundedSender<Delivery>;
pub type DeliveryReceiver = mpsc::UnboundedReceiver<Delivery>;

/// Channel carrying deliveries into the single owning control loop
pub fn delivery_channel() -> (DeliverySender, DeliveryReceiver) {
    mpsc::unbounded_channel()
}

/// The stream source consumed by the viewport. `watch` delivers one or more
/// snapshots for the request (through the delivery channel the service was
/// built with); `unwatch` cancels the prior watch for the stream.
pub trait SubscriptionService {
    fn watch(&mut self, request: WatchRequest) -> WatchHandle;
    fn unwatch(&mut self, stream: &str);
}

/// Decides, from viewport state, whether to hold a tail or paged
/// subscription, and issues the watch/unwatch calls.
#[derive(Debug)]
pub struct SubscriptionManager {
    mode: SubscriptionMode,
    seq: u64,
    active: Option<WatchHandle>,
    page_size: u32,
    overlap: u32,
    edge_threshold: usize,
}

impl SubscriptionManager {
    pub fn new(config: &ViewConfig) -> Self {
        Self {
            mode: SubscriptionMode::None,
            seq: 0,
            active: None,
            page_size: config.page_size,
            overlap: config.overlap,
            edge_threshold: config.edge_threshold,
        }
    }

    pub fn mode(&self) -> SubscriptionMode {
        self.mode
    }

    /// Sequence id of the most recently issued request
    pub fn current_seq(&self) -> u64 {
        self.seq
    }

    /// Whether a delivery answers the currently active request. Supersession
    /// rule: deliveries tagged with any other sequence id are stale.
    pub fn accepts(&self, delivery: &Delivery) -> bool {
        self.active.as_ref().is_some_and(|handle| handle.seq == delivery.seq)
    }

    /// Evaluate the decision table against a fresh viewport observation.
    ///
    /// Returns the request issued, if any. Every mode switch unwatches the
    /// previous subscription before watching the new one, so zero or one
    /// subscription is active at all times.
    pub fn evaluate(
        &mut self, view: &ViewportState, snapshot: &Snapshot, stream: &str, service: &mut impl SubscriptionService,
    ) -> Option<WatchRequest> {
        if view.at_bottom {
            if self.mode == SubscriptionMode::Tail {
                return None; // already tailing; reissuing would only churn in-flight pages
            }
            self.unwatch_active(stream, service);
            let request = self.issue(stream, None, 0, service);
            self.mode = SubscriptionMode::Tail;
            tracing::debug!(stream, seq = request.seq, "tail subscription");
            return Some(request);
        }

        if self.mode == SubscriptionMode::Tail {
            self.unwatch_active(stream, service);
        }

        let (start, end) = view.visible?;
        let near_top = view.direction == ScrollDirection::Up && start < self.edge_threshold;
        let near_bottom =
            view.direction == ScrollDirection::Down && snapshot.len().saturating_sub(end) < self.edge_threshold;
        if !near_top && !near_bottom {
            return None; // deep middle of a stable buffer
        }

        let since = snapshot.time_at(start)?;
        self.unwatch_active(stream, service);
        let request = self.issue(stream, Some(since), self.overlap, service);
        self.mode = SubscriptionMode::Paged;
        tracing::debug!(stream, seq = request.seq, since, "paged subscription");
        Some(request)
    }

    /// Drop any active subscription
    pub fn shutdown(&mut self, stream: &str, service: &mut impl SubscriptionService) {
        self.unwatch_active(stream, service);
    }

    fn issue(&mut self, stream: &str, since: Option<i64>, overlap: u32, service: &mut impl SubscriptionService) -> WatchRequest {
        self.seq += 1;
        let request =
            WatchRequest { stream: stream.to_string(), since, page_size: self.page_size, overlap, seq: self.seq };
        self.active = Some(service.watch(request.clone()));
        request
    }

    fn unwatch_active(&mut self, stream: &str, service: &mut impl SubscriptionService) {
        if let Some(handle) = self.active.take() {
            handle.cancel();
            service.unwatch(stream);
            self.mode = SubscriptionMode::None;
        }
    }
}
