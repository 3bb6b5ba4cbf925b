// Copyright 2026 the Scanroute Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scanroute Sink: candidate text sinks and spatial target resolution.
//!
//! Scanner hardware cannot say which logical field owns a scan, so the
//! router has to infer a destination from where the user's attention was:
//! explicit hints first, then spatial proximity to the pointer or prior
//! focus, with increasingly coarse fallbacks so a scan is almost never
//! silently lost.
//!
//! This crate supplies the pieces of that inference:
//!
//! - [`SinkEntry`] / [`SinkSpace`]: a borrowed slice of candidate sinks with
//!   world-space rects, rebuilt by the host from its widget tree per query.
//! - A single shared eligibility predicate ([`SinkEntry::is_eligible`]) used
//!   identically by every resolution step.
//! - [`SinkSpace::nearest`]: hit-test-preferring nearest-by-anchor search.
//! - [`resolve`]: the full fallback ladder from explicit hints down to a
//!   last-resort search at the last observed pointer position.
//!
//! The crate does not assume any particular UI toolkit. Hosts describe
//! their editable widgets as entries keyed by their own node identifier
//! type and answer the queries a flat candidate slice cannot (topmost
//! element under a point, rect of an arbitrary element) through the
//! [`SpaceProbe`] trait.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::{Point, Rect};
//! use scanroute_sink::{SinkEntry, SinkFlags, SinkKind, SinkSpace};
//!
//! let entries = [
//!     SinkEntry::new(1_u32, Rect::new(100.0, 100.0, 110.0, 110.0), SinkKind::Text),
//!     SinkEntry::new(2_u32, Rect::new(495.0, 495.0, 505.0, 505.0), SinkKind::Text),
//! ];
//! let space = SinkSpace { nodes: &entries };
//! assert_eq!(space.nearest(Point::new(100.0, 100.0), &()), Some(1));
//! # let _ = SinkFlags::default();
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod resolve;

pub use resolve::{ResolveContext, ScanHints, resolve};

use kurbo::{Point, Rect};

bitflags::bitflags! {
    /// Per-sink state gating eligibility.
    ///
    /// The host computes these when it collects candidates: `VISIBLE` means
    /// the widget is actually rendered (not display-hidden or collapsed),
    /// `ENABLED` means it accepts user edits right now.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct SinkFlags: u8 {
        /// Sink is rendered and not explicitly hidden.
        const VISIBLE = 0b0000_0001;
        /// Sink is not disabled or read-only.
        const ENABLED = 0b0000_0010;
    }
}

impl Default for SinkFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::ENABLED
    }
}

/// What kind of editable widget a sink is.
///
/// The kind decides the injection contract: which notifications a
/// programmatic write must raise and whether caret placement applies.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SinkKind {
    /// Single-line text field.
    Text,
    /// Multi-line text area.
    Multiline,
    /// Editable selection list (value set + change notification only).
    Choice,
    /// Free-form editable region (text content replaced, input notification
    /// only, no caret contract).
    RichText,
}

/// One candidate sink in the host's widget tree.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SinkEntry<K> {
    /// Host node identifier.
    pub id: K,
    /// World-space bounding rect at collection time.
    pub rect: Rect,
    /// Widget kind, used later to plan the injection.
    pub kind: SinkKind,
    /// Visibility/enabled state at collection time.
    pub flags: SinkFlags,
}

impl<K> SinkEntry<K> {
    /// Convenience constructor with default (visible, enabled) flags.
    pub fn new(id: K, rect: Rect, kind: SinkKind) -> Self {
        Self {
            id,
            rect,
            kind,
            flags: SinkFlags::default(),
        }
    }

    /// The shared eligibility predicate.
    ///
    /// A sink can receive a scan when it is visible, enabled, and has a
    /// non-zero rendered width or height. Every resolution step applies
    /// exactly this check.
    pub fn is_eligible(&self) -> bool {
        self.flags.contains(SinkFlags::VISIBLE | SinkFlags::ENABLED)
            && (self.rect.width() > 0.0 || self.rect.height() > 0.0)
    }
}

/// A borrowed view over the candidate sinks currently on screen.
///
/// The host rebuilds this per event from its widget tree; entries are
/// snapshots, and the space never outlives the event that produced it.
#[derive(Copy, Clone, Debug)]
pub struct SinkSpace<'a, K> {
    /// Candidate entries, in the host's document order.
    pub nodes: &'a [SinkEntry<K>],
}

/// Host-side geometry oracle for queries a flat candidate slice cannot
/// answer.
///
/// Both methods default to "don't know"; `()` implements the trait for
/// hosts (and tests) without hit-testing support, in which case the nearest
/// search falls back to pure center-distance ranking.
pub trait SpaceProbe<K> {
    /// Topmost element directly under `at`, if the host can hit-test.
    fn top_hit(&self, at: Point) -> Option<K> {
        let _ = at;
        None
    }

    /// World rect of an arbitrary element (not necessarily a sink), used to
    /// anchor container-relative searches.
    fn region_of(&self, id: &K) -> Option<Rect> {
        let _ = id;
        None
    }
}

impl<K> SpaceProbe<K> for () {}

impl<'a, K: Copy + Eq> SinkSpace<'a, K> {
    /// Look up an entry by id.
    pub fn get(&self, id: K) -> Option<&'a SinkEntry<K>> {
        self.nodes.iter().find(|e| e.id == id)
    }

    /// Look up an entry by id, returning it only when eligible.
    pub fn eligible(&self, id: K) -> Option<&'a SinkEntry<K>> {
        self.get(id).filter(|e| e.is_eligible())
    }

    /// Nearest-by-anchor search.
    ///
    /// Prefers the topmost eligible sink directly under the anchor when the
    /// probe can hit-test; otherwise ranks eligible candidates by squared
    /// Euclidean distance from the anchor to their rect centers. Ties keep
    /// the first candidate in document order.
    pub fn nearest(&self, anchor: Point, probe: &impl SpaceProbe<K>) -> Option<K> {
        self.nearest_where(anchor, probe, |_| true)
    }

    /// Nearest-by-anchor search restricted by an extra predicate on top of
    /// the eligibility filter.
    pub(crate) fn nearest_where(
        &self,
        anchor: Point,
        probe: &impl SpaceProbe<K>,
        accept: impl Fn(&SinkEntry<K>) -> bool,
    ) -> Option<K> {
        if let Some(id) = probe.top_hit(anchor) {
            if let Some(entry) = self.eligible(id) {
                if accept(entry) {
                    return Some(id);
                }
            }
        }

        let mut best: Option<(K, f64)> = None;
        for entry in self.nodes.iter().filter(|e| e.is_eligible() && accept(e)) {
            // Squared distance; ordering is the same and no sqrt is needed.
            let d2 = (entry.rect.center() - anchor).hypot2();
            match best {
                Some((_, best_d2)) if best_d2 <= d2 => {}
                _ => best = Some((entry.id, d2)),
            }
        }
        best.map(|(id, _)| id)
    }
}

/// Edge-inclusive rect overlap test.
pub(crate) fn rects_touch(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}
