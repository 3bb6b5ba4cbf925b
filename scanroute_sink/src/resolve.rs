// Copyright 2026 the Scanroute Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Target resolution: decide which sink receives a scan candidate.
//!
//! Resolution walks a fixed ladder from the most explicit hint to the
//! coarsest spatial guess. First match wins and every step is a total
//! fallback to the next, so a candidate is only dropped when no eligible
//! sink exists anywhere on screen:
//!
//! 1. Context override (a field the view designated to capture all scans).
//! 2. Explicit target hint.
//! 3. Explicit container hint, nearest search anchored inside it.
//! 4. Nearest search at the hint rect's center.
//! 5. Nearest search at the hint pointer.
//! 6. Currently focused sink.
//! 7. Cached last-focused sink.
//! 8. Nearest search at the last observed pointer position.
//!
//! Eligibility is checked with the same predicate at every step; an
//! ineligible match (say, a target hint naming a disabled field) falls
//! through rather than failing the resolution.

use kurbo::{Point, Rect};

use crate::{SinkSpace, SpaceProbe, rects_touch};

/// Normalized positional hints extracted from scan metadata.
///
/// Every field is optional; absent and non-finite inputs never reach this
/// type (normalization drops them). `target` and `container` are host node
/// keys, already resolved from whatever naming scheme the host uses.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScanHints<K> {
    /// Explicitly named destination sink.
    pub target: Option<K>,
    /// Element to search within or near (not necessarily a sink itself).
    pub container: Option<K>,
    /// Bounding rect reported by the decode source.
    pub rect: Option<Rect>,
    /// Pointer position reported by the decode source.
    pub pointer: Option<Point>,
}

impl<K> Default for ScanHints<K> {
    fn default() -> Self {
        Self {
            target: None,
            container: None,
            rect: None,
            pointer: None,
        }
    }
}

/// View-level state the router carries into each resolution.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ResolveContext<K> {
    /// A sink the view designated to capture every scan (for example a
    /// page-level search field). Checked before any hint.
    pub override_sink: Option<K>,
    /// The sink currently holding focus, if any.
    pub focused: Option<K>,
    /// Sink cached from a prior focus or pointer-down observation.
    pub last_focused: Option<K>,
    /// Last observed pointer position; the origin when none was ever seen.
    pub last_pointer: Point,
}

impl<K> Default for ResolveContext<K> {
    fn default() -> Self {
        Self {
            override_sink: None,
            focused: None,
            last_focused: None,
            last_pointer: Point::ORIGIN,
        }
    }
}

/// Resolve a scan candidate to at most one eligible sink.
///
/// Returns `None` only when every step of the ladder comes up empty, in
/// which case the candidate is dropped with no side effect.
pub fn resolve<K: Copy + Eq>(
    space: &SinkSpace<'_, K>,
    probe: &impl SpaceProbe<K>,
    hints: &ScanHints<K>,
    ctx: &ResolveContext<K>,
) -> Option<K> {
    // 1. Context override wins unconditionally when eligible.
    if let Some(id) = ctx.override_sink {
        if space.eligible(id).is_some() {
            return Some(id);
        }
    }

    // 2. Explicit target hint.
    if let Some(id) = hints.target {
        if space.eligible(id).is_some() {
            return Some(id);
        }
    }

    // 3. Container hint: rank by distance to the pointer when one was
    // reported, otherwise to the container's center.
    if let Some(container) = hints.container {
        let region = probe
            .region_of(&container)
            .or_else(|| space.get(container).map(|e| e.rect));
        if let Some(region) = region {
            let anchor = hints.pointer.unwrap_or_else(|| region.center());
            if let Some(id) = nearest_within(space, probe, region, anchor) {
                return Some(id);
            }
        }
    }

    // 4. Rect center.
    if let Some(rect) = hints.rect {
        if let Some(id) = space.nearest(rect.center(), probe) {
            return Some(id);
        }
    }

    // 5. Raw pointer.
    if let Some(pointer) = hints.pointer {
        if let Some(id) = space.nearest(pointer, probe) {
            return Some(id);
        }
    }

    // 6. Current focus.
    if let Some(id) = ctx.focused {
        if space.eligible(id).is_some() {
            return Some(id);
        }
    }

    // 7. Cached focus.
    if let Some(id) = ctx.last_focused {
        if space.eligible(id).is_some() {
            return Some(id);
        }
    }

    // 8. Last resort: the last pointer position the router observed.
    space.nearest(ctx.last_pointer, probe)
}

/// Nearest eligible sink overlapping `region`, falling back to an
/// unrestricted nearest search when nothing overlaps ("within or near").
fn nearest_within<K: Copy + Eq>(
    space: &SinkSpace<'_, K>,
    probe: &impl SpaceProbe<K>,
    region: Rect,
    anchor: Point,
) -> Option<K> {
    space
        .nearest_where(anchor, probe, |e| rects_touch(e.rect, region))
        .or_else(|| space.nearest(anchor, probe))
}
