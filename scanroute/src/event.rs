// Copyright 2026 the Scanroute Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scan events: raw metadata, sanitization, and normalization into
//! candidates.
//!
//! Decode sources (camera widgets, external decoder services) hand the
//! router a raw value plus loosely-typed positional metadata. Normalization
//! turns that into the same candidate shape the keystroke path produces:
//! line breaks stripped, whitespace-only values rejected, every numeric
//! field checked for finiteness, and name-based hints resolved to host node
//! keys through a [`SelectorIndex`].
//!
//! Non-finite and missing numbers are treated as absent, never as zero: a
//! decoder that reports a NaN pointer must not accidentally anchor the
//! nearest search at the origin.

use alloc::string::String;
use hashbrown::HashMap;
use kurbo::{Point, Rect};
use scanroute_sink::ScanHints;

/// Where a scan candidate came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScanSource {
    /// Keystroke burst from a HID keyboard-emulation scanner.
    Keyboard,
    /// Explicit decode event from a camera-based decoder.
    CameraDecoder,
}

/// Raw pointer coordinates as reported by a decode source.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RawPoint {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl RawPoint {
    fn to_point(self) -> Option<Point> {
        (self.x.is_finite() && self.y.is_finite()).then(|| Point::new(self.x, self.y))
    }
}

/// Raw bounding rectangle as reported by a decode source.
///
/// Usable only when all four fields are finite.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RawRect {
    /// Left edge.
    pub left: f64,
    /// Top edge.
    pub top: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl RawRect {
    fn to_rect(self) -> Option<Rect> {
        let finite = self.left.is_finite()
            && self.top.is_finite()
            && self.width.is_finite()
            && self.height.is_finite();
        finite.then(|| {
            Rect::new(
                self.left,
                self.top,
                self.left + self.width,
                self.top + self.height,
            )
        })
    }
}

/// Untyped metadata attached to a decode event. All fields optional.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawMeta {
    /// Source tag; absent defaults to [`ScanSource::CameraDecoder`].
    pub source: Option<ScanSource>,
    /// Identifier of the element the decoder is embedded in or near.
    pub element_id: Option<String>,
    /// Name of an explicit destination sink.
    pub target_selector: Option<String>,
    /// Bounding rect of the decode surface.
    pub rect: Option<RawRect>,
    /// Pointer position at decode time.
    pub pointer: Option<RawPoint>,
}

/// A normalized scan candidate, the common shape both input paths produce.
#[derive(Clone, Debug, PartialEq)]
pub struct ScanCandidate<K> {
    /// Sanitized value (line breaks stripped, known non-blank).
    pub value: String,
    /// Which path produced the candidate.
    pub source: ScanSource,
    /// Typed positional hints for target resolution.
    pub hints: ScanHints<K>,
}

/// Registry mapping the host's name-based hints to node keys.
///
/// Decode metadata names elements by string (a selector, an element id);
/// outside a DOM those names mean nothing, so the host registers whatever
/// naming scheme it uses here and keeps it current as views change. Unknown
/// names simply resolve to no hint.
#[derive(Clone, Debug, Default)]
pub struct SelectorIndex<K> {
    selectors: HashMap<String, K>,
    elements: HashMap<String, K>,
}

impl<K: Copy> SelectorIndex<K> {
    /// Create an empty index.
    pub fn new() -> Self {
        Self {
            selectors: HashMap::new(),
            elements: HashMap::new(),
        }
    }

    /// Register a destination-sink name.
    pub fn register_selector(&mut self, selector: impl Into<String>, id: K) {
        self.selectors.insert(selector.into(), id);
    }

    /// Register a container-element name.
    pub fn register_element(&mut self, element_id: impl Into<String>, id: K) {
        self.elements.insert(element_id.into(), id);
    }

    /// Remove a destination-sink name.
    pub fn unregister_selector(&mut self, selector: &str) {
        self.selectors.remove(selector);
    }

    /// Remove a container-element name.
    pub fn unregister_element(&mut self, element_id: &str) {
        self.elements.remove(element_id);
    }

    /// Resolve a destination-sink name.
    pub fn selector(&self, selector: &str) -> Option<K> {
        self.selectors.get(selector).copied()
    }

    /// Resolve a container-element name.
    pub fn element(&self, element_id: &str) -> Option<K> {
        self.elements.get(element_id).copied()
    }
}

/// Strip line breaks and reject blank values.
///
/// Returns `None` when the value is empty or whitespace-only after carriage
/// returns and line feeds are removed. Interior whitespace is preserved;
/// the sanitized value is what gets injected verbatim.
pub fn sanitize(value: &str) -> Option<String> {
    let stripped: String = value.chars().filter(|c| *c != '\n' && *c != '\r').collect();
    if stripped.trim().is_empty() {
        None
    } else {
        Some(stripped)
    }
}

/// Normalize a decode event into a scan candidate.
///
/// Fails silently (returns `None`) when the sanitized value is blank; a
/// blank decode is indistinguishable from noise and raises nothing further.
pub fn normalize<K: Copy>(
    value: &str,
    meta: &RawMeta,
    index: &SelectorIndex<K>,
) -> Option<ScanCandidate<K>> {
    let value = sanitize(value)?;
    let hints = ScanHints {
        target: meta
            .target_selector
            .as_deref()
            .and_then(|s| index.selector(s)),
        container: meta.element_id.as_deref().and_then(|s| index.element(s)),
        rect: meta.rect.and_then(RawRect::to_rect),
        pointer: meta.pointer.and_then(RawPoint::to_point),
    };
    Some(ScanCandidate {
        value,
        source: meta.source.unwrap_or(ScanSource::CameraDecoder),
        hints,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_line_breaks_only() {
        assert_eq!(sanitize("XYZ-99\n").as_deref(), Some("XYZ-99"));
        assert_eq!(sanitize("AB\r\nCD").as_deref(), Some("ABCD"));
        // Interior spaces survive.
        assert_eq!(sanitize(" AB CD \n").as_deref(), Some(" AB CD "));
    }

    #[test]
    fn sanitize_rejects_blank_values() {
        assert_eq!(sanitize(""), None);
        assert_eq!(sanitize("\n\r\n"), None);
        assert_eq!(sanitize("   \n  "), None);
    }

    #[test]
    fn normalize_fails_silently_on_blank_value() {
        let index: SelectorIndex<u32> = SelectorIndex::new();
        assert_eq!(normalize("\n", &RawMeta::default(), &index), None);
    }

    #[test]
    fn normalize_resolves_registered_names() {
        let mut index: SelectorIndex<u32> = SelectorIndex::new();
        index.register_selector("isbn-field", 7);
        index.register_element("camera-panel", 9);

        let meta = RawMeta {
            target_selector: Some("isbn-field".into()),
            element_id: Some("camera-panel".into()),
            ..RawMeta::default()
        };
        let c = normalize("XYZ-99", &meta, &index).unwrap();
        assert_eq!(c.hints.target, Some(7));
        assert_eq!(c.hints.container, Some(9));
        assert_eq!(c.source, ScanSource::CameraDecoder);
    }

    #[test]
    fn unknown_names_resolve_to_no_hint() {
        let index: SelectorIndex<u32> = SelectorIndex::new();
        let meta = RawMeta {
            target_selector: Some("missing".into()),
            element_id: Some("also-missing".into()),
            ..RawMeta::default()
        };
        let c = normalize("XYZ-99", &meta, &index).unwrap();
        assert_eq!(c.hints.target, None);
        assert_eq!(c.hints.container, None);
    }

    #[test]
    fn non_finite_geometry_is_absent_not_zero() {
        let index: SelectorIndex<u32> = SelectorIndex::new();
        let meta = RawMeta {
            pointer: Some(RawPoint {
                x: f64::NAN,
                y: 10.0,
            }),
            rect: Some(RawRect {
                left: 0.0,
                top: 0.0,
                width: f64::INFINITY,
                height: 20.0,
            }),
            ..RawMeta::default()
        };
        let c = normalize("XYZ-99", &meta, &index).unwrap();
        assert_eq!(c.hints.pointer, None);
        assert_eq!(c.hints.rect, None);
    }

    #[test]
    fn finite_geometry_converts() {
        let index: SelectorIndex<u32> = SelectorIndex::new();
        let meta = RawMeta {
            rect: Some(RawRect {
                left: 10.0,
                top: 20.0,
                width: 30.0,
                height: 40.0,
            }),
            pointer: Some(RawPoint { x: 5.0, y: 6.0 }),
            ..RawMeta::default()
        };
        let c = normalize("XYZ-99", &meta, &index).unwrap();
        assert_eq!(c.hints.rect, Some(Rect::new(10.0, 20.0, 40.0, 60.0)));
        assert_eq!(c.hints.pointer, Some(Point::new(5.0, 6.0)));
    }
}
