//! End-to-end session behavior: scroll-driven fetches, snapshot replacement,
//! anchor restoration, and supersession of out-of-order deliveries, driven
//! through a scripted subscription service.

use backscroll_core::{Clock, Message, RenderedBody, Segment, ViewConfig, color_for};
use backscroll_view::{
    Delivery, DeliveryReceiver, DeliverySender, FixedRowGeometry, ScrollDirection, StreamSession, SubscriptionMode,
    SubscriptionService, ViewportGeometry, WatchHandle, WatchRequest, delivery_channel,
};

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Answers each watch with the next scripted snapshot, pushed through the
/// delivery channel the way a real transport would.
struct ScriptedService {
    sender: DeliverySender,
    script: VecDeque<Vec<Message>>,
    requests: Vec<WatchRequest>,
    unwatch_count: usize,
}

impl ScriptedService {
    fn new(sender: DeliverySender, script: Vec<Vec<Message>>) -> Self {
        Self { sender, script: script.into(), requests: Vec::new(), unwatch_count: 0 }
    }
}

impl SubscriptionService for ScriptedService {
    fn watch(&mut self, request: WatchRequest) -> WatchHandle {
        if let Some(messages) = self.script.pop_front() {
            let _ = self.sender.send(Delivery { seq: request.seq, result: Ok(messages) });
        }
        self.requests.push(request.clone());
        WatchHandle::new(request.seq)
    }

    fn unwatch(&mut self, _stream: &str) {
        self.unwatch_count += 1;
    }
}

#[derive(Debug, Clone, Default)]
struct FixedClock(Rc<Cell<i64>>);

impl FixedClock {
    fn advance(&self, ms: i64) {
        self.0.set(self.0.get() + ms);
    }
}

impl Clock for FixedClock {
    fn now_ms(&self) -> i64 {
        self.0.get()
    }
}

fn drain(receiver: &mut DeliveryReceiver) -> Vec<Delivery> {
    let mut deliveries = Vec::new();
    while let Ok(delivery) = receiver.try_recv() {
        deliveries.push(delivery);
    }
    deliveries
}

#[test]
fn test_tail_fetch_renders_shared_colors_and_links() {
    let (sender, mut receiver) = delivery_channel();
    let script = vec![vec![
        Message::text("1", 0, "Alice", "hi"),
        Message::text("2", 30_000, "alice", "http://example.com"),
    ]];
    let clock = FixedClock::default();
    clock.advance(40_000);
    let mut session =
        StreamSession::new("room", ViewConfig::default(), ScriptedService::new(sender, script), clock);

    // empty viewport counts as at-bottom and starts the tail
    let empty = FixedRowGeometry::new(1, 0, 10);
    session.on_scroll(&empty);
    assert_eq!(session.manager().mode(), SubscriptionMode::Tail);

    for delivery in drain(&mut receiver) {
        assert!(session.on_delivery(delivery, &empty));
    }
    assert_eq!(session.snapshot().len(), 2);

    let rendered = session.rendered();
    // "Alice" and "alice" normalize to the same person, same color
    assert_eq!(rendered[0].color, rendered[1].color);
    assert_eq!(rendered[0].color, color_for("alice"));

    // the whole second message is one link with empty literal edges
    let RenderedBody::Text { segments } = &rendered[1].body else {
        panic!("expected text body");
    };
    assert_eq!(
        segments,
        &vec![
            Segment::Literal(String::new()),
            Segment::Link { text: "http://example.com".to_string(), href: "http://example.com".to_string() },
            Segment::Literal(String::new()),
        ]
    );

    // 30s gap does not end a run: only the final message is stamped
    assert!(rendered[0].timestamp.is_none());
    assert!(rendered[1].timestamp.is_some());
}

#[test]
fn test_paged_fetch_preserves_anchor_position() {
    let (sender, mut receiver) = delivery_channel();
    // m16..m27; deep enough that a downward scroll stays clear of the edge
    let snapshot_a: Vec<Message> =
        (16..28).map(|i| Message::text(format!("m{}", i), i * 10_000, "a", "x")).collect();
    // the paged response widens the window; m17 moves to index 3
    let snapshot_b = vec![
        Message::text("m14", 140_000, "a", "x"),
        Message::text("m15", 150_000, "a", "x"),
        Message::text("m16", 160_000, "a", "x"),
        Message::text("m17", 170_000, "a", "x"),
        Message::text("m18", 180_000, "a", "x"),
    ];
    let mut session = StreamSession::new(
        "room",
        ViewConfig::default(),
        ScriptedService::new(sender, vec![snapshot_a, snapshot_b]),
        FixedClock::default(),
    );

    // seed snapshot A through an initial tail
    session.on_scroll(&FixedRowGeometry::new(1, 0, 10));
    for delivery in drain(&mut receiver) {
        session.on_delivery(delivery, &FixedRowGeometry::new(1, 0, 10));
    }
    assert_eq!(session.snapshot().len(), 12);

    // rows 60px tall, 80px viewport; at scroll 20 only m17 (offset 60) is
    // visible, 40px below the viewport top
    let geo_a = FixedRowGeometry::new(60, 12, 80);
    session.on_scroll(&geo_a.with_scroll(30));
    let view = session.on_scroll(&geo_a.with_scroll(20));
    assert_eq!(view.direction, ScrollDirection::Up);
    assert_eq!(view.visible_start(), Some(1));
    assert_eq!(session.manager().mode(), SubscriptionMode::Paged);
    // anchored near the visible start's timestamp, with bridging overlap
    let request = session.service().requests.last().unwrap();
    assert_eq!(request.since, Some(170_000));
    assert_eq!(request.overlap, 48);

    for delivery in drain(&mut receiver) {
        assert!(session.on_delivery(delivery, &geo_a.with_scroll(20)));
    }

    // after re-render m17 sits at pixel 120; keeping it 40px below the top
    // puts the viewport at 80
    let geo_b = FixedRowGeometry::new(40, 5, 80);
    assert_eq!(session.restore_scroll(&geo_b), Some(80));
    // the anchor is consumed exactly once
    assert_eq!(session.restore_scroll(&geo_b), None);
}

#[test]
fn test_superseded_delivery_is_discarded() {
    let (sender, mut receiver) = delivery_channel();
    let seed: Vec<Message> = (0..20).map(|i| Message::text(format!("m{}", i), i * 1000, "a", "x")).collect();
    let stale_page = vec![Message::text("stale", 0, "a", "x")];
    let fresh_page: Vec<Message> = (0..30).map(|i| Message::text(format!("f{}", i), i * 1000, "a", "x")).collect();
    let mut session = StreamSession::new(
        "room",
        ViewConfig::default(),
        ScriptedService::new(sender, vec![seed, stale_page, fresh_page]),
        FixedClock::default(),
    );

    session.on_scroll(&FixedRowGeometry::new(1, 0, 10));
    for delivery in drain(&mut receiver) {
        session.on_delivery(delivery, &FixedRowGeometry::new(1, 0, 10));
    }

    // two successive edge scrolls issue two paged requests; the second
    // supersedes the first before either delivery is consumed
    let geo = FixedRowGeometry::new(20, 20, 60);
    session.on_scroll(&geo.with_scroll(100));
    session.on_scroll(&geo.with_scroll(60));
    session.on_scroll(&geo.with_scroll(40));
    let mut deliveries = drain(&mut receiver);
    assert_eq!(deliveries.len(), 2);

    // consume them out of issuance order: newest first, stale one after
    let stale = deliveries.remove(0);
    let fresh = deliveries.remove(0);
    assert!(session.on_delivery(fresh, &geo.with_scroll(40)));
    assert_eq!(session.snapshot().len(), 30);
    assert!(!session.on_delivery(stale, &geo.with_scroll(40)));
    assert_eq!(session.snapshot().len(), 30);
}

#[test]
fn test_tail_delivery_sticks_to_bottom() {
    let (sender, mut receiver) = delivery_channel();
    let first: Vec<Message> = (0..10).map(|i| Message::text(format!("m{}", i), i * 1000, "a", "x")).collect();
    let second: Vec<Message> = (0..11).map(|i| Message::text(format!("m{}", i), i * 1000, "a", "x")).collect();
    let clock = FixedClock::default();
    let mut session = StreamSession::new(
        "room",
        ViewConfig::default(),
        ScriptedService::new(sender.clone(), vec![first]),
        clock.clone(),
    );

    session.on_scroll(&FixedRowGeometry::new(1, 0, 10));
    for delivery in drain(&mut receiver) {
        session.on_delivery(delivery, &FixedRowGeometry::new(1, 0, 10));
    }

    // sitting at the bottom of the rendered buffer
    let geo = FixedRowGeometry::new(1, 10, 5).with_scroll(5);
    let view = session.on_scroll(&geo);
    assert!(view.at_bottom);

    // a new tail page arrives while at the bottom
    let seq = session.manager().current_seq();
    sender.send(Delivery { seq, result: Ok(second) }).unwrap();
    for delivery in drain(&mut receiver) {
        assert!(session.on_delivery(delivery, &geo));
    }

    let geo_after = FixedRowGeometry::new(1, 11, 5);
    assert_eq!(session.restore_scroll(&geo_after), Some(geo_after.scroll_height()));
}
