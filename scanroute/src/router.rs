// Copyright 2026 the Scanroute Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The router: orchestrates capture, dedup, resolution, and planning.
//!
//! [`Router`] owns the shared mutable state of the subsystem: the keystroke
//! buffer, the last-pointer and last-focused caches, and the dedup window.
//! One instance belongs to one view; construct it when the view mounts,
//! feed it events, and drop it on teardown. All entry points are
//! synchronous and must be called from the host's UI thread in delivery
//! order; nothing here suspends mid-resolution, so the caches can never be
//! observed half-updated.
//!
//! The router decides but does not touch widgets. A successful routing
//! returns a [`Routing`] carrying the target key, the sanitized value, and
//! a ready injection plan; the host executes the plan against its own sink
//! handle (see `scanroute_inject::apply`). This keeps the single-writer
//! invariant trivially true: at most one sink per accepted scan, and only
//! ever by the host's hand.
//!
//! ## Dedup
//!
//! The same physical scan can arrive twice, once through the keyboard
//! emulation path and once through a decoder event. The router remembers
//! the last accepted `(value, timestamp)` pair and discards an identical
//! value inside a short window (250 ms by default). Distinct values are
//! never deduplicated, even inside the window; they route in arrival
//! order.

use alloc::string::String;
use kurbo::Point;
use scanroute_capture::{Key, KeyOutcome, KeystrokeCapture, Modifiers};
use scanroute_inject::{InjectPlan, plan};
use scanroute_sink::{ResolveContext, ScanHints, SinkKind, SinkSpace, SpaceProbe, resolve};

use crate::event::{RawMeta, ScanCandidate, ScanSource, SelectorIndex, normalize, sanitize};

pub use scanroute_capture::CaptureConfig;

/// Router tunables.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RouterConfig {
    /// Keystroke-burst thresholds.
    pub capture: CaptureConfig,
    /// Identical values within this many milliseconds of the last accepted
    /// scan are discarded.
    pub dedup_window_ms: u64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            capture: CaptureConfig::default(),
            dedup_window_ms: 250,
        }
    }
}

/// Why a candidate was dropped. Dropping is expected and local; none of
/// these surface to the user.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DropReason {
    /// Empty or whitespace-only after sanitization.
    Blank,
    /// Identical to the last accepted value, inside the dedup window.
    Duplicate,
    /// Every resolution step came up empty.
    NoTarget,
}

/// A routed scan: everything the host needs to perform the injection.
#[derive(Clone, Debug, PartialEq)]
pub struct Routing<K> {
    /// The single sink to mutate.
    pub target: K,
    /// The target's widget kind.
    pub kind: SinkKind,
    /// Sanitized value to inject.
    pub value: String,
    /// Ready-made injection plan for `kind` and `value`.
    pub steps: InjectPlan,
    /// The target is the designated page-level search sink; the host should
    /// also push `value` into its search state and open the results
    /// affordance.
    pub to_search: bool,
}

/// Result of offering one candidate to the router.
#[derive(Clone, Debug, PartialEq)]
pub enum ScanOutcome<K> {
    /// Resolved; the host should apply the routing.
    Routed(Routing<K>),
    /// Discarded with no side effect; the dedup state is unchanged.
    Dropped(DropReason),
}

/// Result of feeding one keydown through the router.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyResponse<K> {
    /// The acknowledgement key completed a scan burst; suppress its default
    /// action regardless of whether routing succeeded, so it does not also
    /// submit a form or insert a line break.
    pub suppress_default: bool,
    /// Routing outcome when a burst completed; `None` for ordinary keys.
    pub outcome: Option<ScanOutcome<K>>,
}

#[derive(Clone, Debug, PartialEq)]
enum DedupState {
    Idle,
    Cooldown { value: String, at: u64 },
}

/// Per-view scan router.
///
/// Generic over the host's node key type, like the rest of the workspace.
/// The host wires four event sources into it (`keydown`, `pointerdown`,
/// `focusin`, decode events) and rebuilds a [`SinkSpace`] snapshot per
/// routing call.
#[derive(Clone, Debug)]
pub struct Router<K> {
    cfg: RouterConfig,
    capture: KeystrokeCapture,
    dedup: DedupState,
    selectors: SelectorIndex<K>,
    last_pointer: Point,
    last_focused: Option<K>,
    override_sink: Option<K>,
    search_sink: Option<K>,
}

impl<K: Copy + Eq> Default for Router<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq> Router<K> {
    /// Create a router with default thresholds.
    pub fn new() -> Self {
        Self::with_config(RouterConfig::default())
    }

    /// Create a router with explicit thresholds.
    pub fn with_config(cfg: RouterConfig) -> Self {
        Self {
            cfg,
            capture: KeystrokeCapture::with_config(cfg.capture),
            dedup: DedupState::Idle,
            selectors: SelectorIndex::new(),
            last_pointer: Point::ORIGIN,
            last_focused: None,
            override_sink: None,
            search_sink: None,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &RouterConfig {
        &self.cfg
    }

    /// The name registry for selector and element-id hints.
    pub fn selectors_mut(&mut self) -> &mut SelectorIndex<K> {
        &mut self.selectors
    }

    /// Designate a sink that captures every scan in the current view, ahead
    /// of all hints. `None` clears the override.
    pub fn set_override_sink(&mut self, sink: Option<K>) {
        self.override_sink = sink;
    }

    /// Designate the page-level search sink, used to set
    /// [`Routing::to_search`]. `None` clears it.
    pub fn set_search_sink(&mut self, sink: Option<K>) {
        self.search_sink = sink;
    }

    /// The last pointer position the router observed.
    pub fn last_pointer(&self) -> Point {
        self.last_pointer
    }

    /// Record a pointer-down. `sink` names the candidate sink under the
    /// pointer when the press landed on one; it refreshes the last-focused
    /// cache just as a focus event would.
    pub fn on_pointer_down(&mut self, at: Point, sink: Option<K>) {
        self.last_pointer = at;
        if sink.is_some() {
            self.last_focused = sink;
        }
    }

    /// Record a focus change onto a candidate sink.
    pub fn on_focus_in(&mut self, sink: K) {
        self.last_focused = Some(sink);
    }

    /// Feed one keydown through burst capture and, when a burst completes,
    /// through routing.
    ///
    /// `focused` is the sink currently holding focus, if any; `space` is
    /// the host's current candidate snapshot.
    pub fn on_key(
        &mut self,
        key: Key,
        modifiers: Modifiers,
        now_ms: u64,
        space: &SinkSpace<'_, K>,
        probe: &impl SpaceProbe<K>,
        focused: Option<K>,
    ) -> KeyResponse<K> {
        match self.capture.on_key(key, modifiers, now_ms) {
            KeyOutcome::Buffered => KeyResponse {
                suppress_default: false,
                outcome: None,
            },
            KeyOutcome::Scan(burst) => {
                let candidate = ScanCandidate {
                    value: burst.value,
                    source: ScanSource::Keyboard,
                    hints: ScanHints {
                        pointer: Some(self.last_pointer),
                        ..ScanHints::default()
                    },
                };
                let outcome = self.accept(candidate, now_ms, space, probe, focused);
                KeyResponse {
                    suppress_default: true,
                    outcome: Some(outcome),
                }
            }
        }
    }

    /// Route an explicit decode event.
    pub fn on_scan(
        &mut self,
        value: &str,
        meta: &RawMeta,
        now_ms: u64,
        space: &SinkSpace<'_, K>,
        probe: &impl SpaceProbe<K>,
        focused: Option<K>,
    ) -> ScanOutcome<K> {
        match normalize(value, meta, &self.selectors) {
            Some(candidate) => self.accept(candidate, now_ms, space, probe, focused),
            None => ScanOutcome::Dropped(DropReason::Blank),
        }
    }

    /// Offer an already-normalized candidate to the dedup/resolve/plan
    /// pipeline.
    pub fn accept(
        &mut self,
        candidate: ScanCandidate<K>,
        now_ms: u64,
        space: &SinkSpace<'_, K>,
        probe: &impl SpaceProbe<K>,
        focused: Option<K>,
    ) -> ScanOutcome<K> {
        // Keyboard bursts arrive unsanitized; a burst of spaces must drop
        // here just like a blank decode.
        let Some(value) = sanitize(&candidate.value) else {
            return ScanOutcome::Dropped(DropReason::Blank);
        };

        if self.is_duplicate(&value, now_ms) {
            return ScanOutcome::Dropped(DropReason::Duplicate);
        }

        let ctx = ResolveContext {
            override_sink: self.override_sink,
            focused,
            last_focused: self.last_focused,
            last_pointer: self.last_pointer,
        };
        let Some(target) = resolve(space, probe, &candidate.hints, &ctx) else {
            return ScanOutcome::Dropped(DropReason::NoTarget);
        };
        // Resolution only ever returns ids present in the space.
        let Some(entry) = space.get(target) else {
            return ScanOutcome::Dropped(DropReason::NoTarget);
        };

        let steps = plan(entry.kind, &value);
        self.dedup = DedupState::Cooldown {
            value: value.clone(),
            at: now_ms,
        };
        ScanOutcome::Routed(Routing {
            target,
            kind: entry.kind,
            value,
            steps,
            to_search: self.search_sink == Some(target),
        })
    }

    fn is_duplicate(&self, value: &str, now_ms: u64) -> bool {
        match &self.dedup {
            DedupState::Idle => false,
            DedupState::Cooldown { value: last, at } => {
                last == value && now_ms.saturating_sub(*at) < self.cfg.dedup_window_ms
            }
        }
    }
}
