// Copyright 2026 the Scanroute Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scanroute: route scanner input to the most plausible text sink.
//!
//! Point-of-service views take scanned codes from two independent sources:
//! HID keyboard-emulation scanners (rapid keystroke bursts ending in Enter)
//! and camera-based decoders (explicit decode events with positional
//! metadata). Neither source can say which logical field owns the scan.
//! This workspace classifies the input, picks the destination by explicit
//! hints and spatial proximity, and plans a value write that reactive
//! bindings observe exactly as if the user had typed it.
//!
//! The pipeline, one crate per stage:
//!
//! - `scanroute_capture`: keystroke bursts → scan values, by timing
//!   heuristics (sub-80 ms inter-key gaps, ≥4 characters, ≤1.5 s total).
//! - `scanroute_sink`: candidate sinks, the shared eligibility predicate,
//!   nearest-by-anchor search, and the resolution fallback ladder.
//! - `scanroute_inject`: per-kind injection plans and the runner with the
//!   local error policy (caret failures swallowed, focus retried once).
//! - This crate: decode-event normalization, the selector/element-id name
//!   registry, the dedup window, and the [`Router`] that ties it together.
//!
//! Everything is host-agnostic: no DOM, no toolkit, no timers, no threads.
//! The host maps its key events onto [`Key`]/[`Modifiers`], snapshots its
//! editable widgets into a [`SinkSpace`] per event, passes wall-clock
//! millisecond timestamps in, and executes returned [`Routing`] plans
//! through its own [`TextSink`] handles. Dropping the router with the view
//! is the whole teardown story.
//!
//! ## Example: a keyboard-wedge scan end to end
//!
//! ```
//! use kurbo::{Point, Rect};
//! use scanroute::{Key, Modifiers, Router, ScanOutcome, SinkEntry, SinkKind, SinkSpace};
//!
//! // The view has one text field; the operator's pointer rests on it.
//! let entries = [SinkEntry::new(1_u32, Rect::new(40.0, 40.0, 240.0, 70.0), SinkKind::Text)];
//! let space = SinkSpace { nodes: &entries };
//!
//! let mut router: Router<u32> = Router::new();
//! router.on_pointer_down(Point::new(50.0, 55.0), Some(1));
//!
//! // The scanner types an ISBN at 30 ms per key, then sends Enter.
//! let mut now = 0;
//! for c in "9781861972712".chars() {
//!     router.on_key(Key::Char(c), Modifiers::empty(), now, &space, &(), None);
//!     now += 30;
//! }
//! let resp = router.on_key(Key::Ack, Modifiers::empty(), now, &space, &(), None);
//!
//! assert!(resp.suppress_default);
//! match resp.outcome {
//!     Some(ScanOutcome::Routed(routing)) => {
//!         assert_eq!(routing.target, 1);
//!         assert_eq!(routing.value, "9781861972712");
//!         // Now execute the plan against the widget handle for `target`:
//!         // scanroute::apply(&mut sink, &routing.value, &routing.steps);
//!     }
//!     other => panic!("expected a routed scan, got {other:?}"),
//! }
//! ```
//!
//! ## Concurrency model
//!
//! Single-threaded and cooperative: every entry point runs synchronously
//! inside one host event delivery, and the router's caches are read and
//! written only there. Hosts must not await between feeding an event and
//! using its result; the ordering guarantee is simply the host's own event
//! order.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod event;
pub mod router;

pub use event::{
    RawMeta, RawPoint, RawRect, ScanCandidate, ScanSource, SelectorIndex, normalize, sanitize,
};
pub use router::{
    DropReason, KeyResponse, Router, RouterConfig, Routing, ScanOutcome,
};

pub use scanroute_capture::{
    CaptureConfig, Key, KeyOutcome, KeystrokeCapture, Modifiers, ScanBurst,
};
pub use scanroute_inject::{
    CaretUnsupported, FocusOptions, InjectPlan, InjectStep, TextSink, ValueNotice, apply, inject,
    plan,
};
pub use scanroute_sink::{
    ResolveContext, ScanHints, SinkEntry, SinkFlags, SinkKind, SinkSpace, SpaceProbe, resolve,
};
