// Copyright 2026 the Scanroute Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end routing scenarios: capture → dedup → resolution → injection.

use kurbo::{Point, Rect};
use scanroute::{
    DropReason, Key, Modifiers, RawMeta, RawPoint, Router, Routing, ScanOutcome, SinkEntry,
    SinkFlags, SinkKind, SinkSpace, TextSink, ValueNotice, apply,
};

#[derive(Default)]
struct FakeSink {
    text: String,
    notices: Vec<ValueNotice>,
    caret: Option<usize>,
}

impl TextSink for FakeSink {
    fn set_text(&mut self, text: &str) {
        self.text = text.to_owned();
    }

    fn notify(&mut self, notice: ValueNotice) {
        self.notices.push(notice);
    }

    fn set_caret(&mut self, pos: usize) -> Result<(), scanroute::CaretUnsupported> {
        self.caret = Some(pos);
        Ok(())
    }
}

fn field(id: u32, cx: f64, cy: f64) -> SinkEntry<u32> {
    SinkEntry::new(
        id,
        Rect::new(cx - 60.0, cy - 15.0, cx + 60.0, cy + 15.0),
        SinkKind::Text,
    )
}

fn routed(outcome: ScanOutcome<u32>) -> Routing<u32> {
    match outcome {
        ScanOutcome::Routed(r) => r,
        ScanOutcome::Dropped(reason) => panic!("unexpected drop: {reason:?}"),
    }
}

#[test]
fn keyboard_wedge_scan_lands_in_nearest_field() {
    let entries = [field(1, 100.0, 100.0), field(2, 100.0, 400.0)];
    let space = SinkSpace { nodes: &entries };
    let mut router: Router<u32> = Router::new();
    router.on_pointer_down(Point::new(95.0, 102.0), None);

    // "A1B2C3D4" at 60 ms per key, Enter at 480 ms total.
    let mut now = 0;
    for c in "A1B2C3D4".chars() {
        let resp = router.on_key(Key::Char(c), Modifiers::empty(), now, &space, &(), None);
        assert!(!resp.suppress_default);
        now += 60;
    }
    let resp = router.on_key(Key::Ack, Modifiers::empty(), now, &space, &(), None);
    assert!(resp.suppress_default);
    let routing = routed(resp.outcome.expect("burst should route"));
    assert_eq!(routing.target, 1);

    // The host applies the plan; the sink observes the write as user input.
    let mut sink = FakeSink::default();
    apply(&mut sink, &routing.value, &routing.steps);
    assert_eq!(sink.text, "A1B2C3D4");
    assert_eq!(sink.notices, &[ValueNotice::Input, ValueNotice::Change]);
    assert_eq!(sink.caret, Some(8));
}

#[test]
fn same_scan_through_both_paths_injects_once() {
    let entries = [field(1, 100.0, 100.0)];
    let space = SinkSpace { nodes: &entries };
    let mut router: Router<u32> = Router::new();
    router.on_pointer_down(Point::new(100.0, 100.0), Some(1));

    // Keyboard path at t=0..280.
    let mut now = 0;
    for c in "XYZ-99".chars() {
        router.on_key(Key::Char(c), Modifiers::empty(), now, &space, &(), None);
        now += 40;
    }
    let resp = router.on_key(Key::Ack, Modifiers::empty(), now, &space, &(), None);
    assert!(matches!(resp.outcome, Some(ScanOutcome::Routed(_))));

    // The decoder reports the same physical scan 100 ms later.
    let echo = router.on_scan("XYZ-99\n", &RawMeta::default(), now + 100, &space, &(), Some(1));
    assert_eq!(echo, ScanOutcome::Dropped(DropReason::Duplicate));

    // A genuine re-scan after the window routes again.
    let rescan = router.on_scan("XYZ-99", &RawMeta::default(), now + 400, &space, &(), Some(1));
    assert!(matches!(rescan, ScanOutcome::Routed(_)));
}

#[test]
fn decode_with_no_eligible_sink_mutates_nothing() {
    // The only fields on screen are disabled; nothing can receive a scan.
    let mut a = field(1, 60.0, 60.0);
    a.flags = SinkFlags::VISIBLE;
    let mut b = field(2, 420.0, 420.0);
    b.flags = SinkFlags::VISIBLE;
    let entries = [a, b];
    let space = SinkSpace { nodes: &entries };
    let mut router: Router<u32> = Router::new();

    let meta = RawMeta {
        pointer: Some(RawPoint { x: 50.0, y: 50.0 }),
        ..RawMeta::default()
    };
    let outcome = router.on_scan("XYZ-99\n", &meta, 0, &space, &(), None);
    assert_eq!(outcome, ScanOutcome::Dropped(DropReason::NoTarget));

    // The dropped candidate does not occupy the dedup window either.
    let entries = [field(3, 50.0, 50.0)];
    let space = SinkSpace { nodes: &entries };
    let retry = router.on_scan("XYZ-99", &meta, 50, &space, &(), None);
    assert_eq!(routed(retry).target, 3);
}

#[test]
fn disabled_selector_target_falls_through_to_pointer() {
    let mut named = field(1, 300.0, 300.0);
    named.flags = SinkFlags::VISIBLE; // disabled
    let entries = [named, field(2, 60.0, 60.0)];
    let space = SinkSpace { nodes: &entries };

    let mut router: Router<u32> = Router::new();
    router.selectors_mut().register_selector("isbn-field", 1);

    let meta = RawMeta {
        target_selector: Some("isbn-field".into()),
        pointer: Some(RawPoint { x: 55.0, y: 55.0 }),
        ..RawMeta::default()
    };
    let routing = routed(router.on_scan("XYZ-99", &meta, 0, &space, &(), None));
    assert_eq!(routing.target, 2);
}

#[test]
fn override_sink_captures_scans_ahead_of_hints() {
    let entries = [field(1, 100.0, 30.0), field(2, 300.0, 300.0)];
    let space = SinkSpace { nodes: &entries };

    let mut router: Router<u32> = Router::new();
    router.selectors_mut().register_selector("detail-field", 2);
    router.set_override_sink(Some(1));
    router.set_search_sink(Some(1));

    let meta = RawMeta {
        target_selector: Some("detail-field".into()),
        ..RawMeta::default()
    };
    let routing = routed(router.on_scan("QRY-17", &meta, 0, &space, &(), None));
    assert_eq!(routing.target, 1);
    assert!(routing.to_search, "search field routing should be flagged");
}

#[test]
fn choice_sink_gets_change_notification_only() {
    let entries = [SinkEntry::new(
        5_u32,
        Rect::new(0.0, 0.0, 120.0, 30.0),
        SinkKind::Choice,
    )];
    let space = SinkSpace { nodes: &entries };
    let mut router: Router<u32> = Router::new();

    let routing = routed(router.on_scan("OPT-2", &RawMeta::default(), 0, &space, &(), Some(5)));
    assert_eq!(routing.kind, SinkKind::Choice);

    let mut sink = FakeSink::default();
    apply(&mut sink, &routing.value, &routing.steps);
    assert_eq!(sink.text, "OPT-2");
    assert_eq!(sink.notices, &[ValueNotice::Change]);
    assert_eq!(sink.caret, None, "choice sinks have no caret contract");
}
