// Copyright 2026 the Scanroute Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scanroute Capture: recognize scanner bursts in a keydown stream.
//!
//! Barcode and QR scanners operating in HID keyboard-emulation mode report a
//! scanned code as a rapid sequence of keydown events followed by an
//! acknowledgement key (typically Enter). At the host level those events are
//! indistinguishable from typing, so this crate classifies them by timing:
//! sustained sub-gap inter-key intervals, a minimum burst length, and a
//! bounded total duration are things scanners produce and humans practically
//! never do.
//!
//! [`KeystrokeCapture`] is a small state machine in the spirit of other
//! per-interaction event state managers: it holds just enough state to
//! compute one decision per event, takes host-supplied millisecond
//! timestamps instead of scheduling timers, and assumes all calls arrive on
//! one thread in delivery order.
//!
//! ## Usage
//!
//! 1) Map each keydown to a [`Key`] and [`Modifiers`] value.
//! 2) Call [`KeystrokeCapture::on_key`] with the event timestamp.
//! 3) When the outcome is [`KeyOutcome::Scan`], treat the burst value as a
//!    scan and suppress the acknowledgement key's default action (so it does
//!    not also submit a form or insert a line break).
//!
//! ## Minimal example
//!
//! ```
//! use scanroute_capture::{Key, KeyOutcome, KeystrokeCapture, Modifiers};
//!
//! let mut cap = KeystrokeCapture::new();
//! let mut now = 0;
//! for c in "A1B2C3D4".chars() {
//!     let out = cap.on_key(Key::Char(c), Modifiers::empty(), now);
//!     assert_eq!(out, KeyOutcome::Buffered);
//!     now += 60;
//! }
//! match cap.on_key(Key::Ack, Modifiers::empty(), now) {
//!     KeyOutcome::Scan(burst) => assert_eq!(burst.value, "A1B2C3D4"),
//!     KeyOutcome::Buffered => unreachable!(),
//! }
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::string::String;

bitflags::bitflags! {
    /// Modifier keys held during a keydown.
    ///
    /// Alt/Ctrl/Meta chords are command input, not text, and abort the
    /// current burst. Shift is ordinary text input: scanners emit Shift
    /// chords mid-burst for uppercase letters and shifted symbols.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Alt / Option.
        const ALT   = 0b0000_0001;
        /// Control.
        const CTRL  = 0b0000_0010;
        /// Meta / Command / Windows.
        const META  = 0b0000_0100;
        /// Shift.
        const SHIFT = 0b0000_1000;
    }
}

impl Modifiers {
    /// Returns `true` when the chord disqualifies the key as text input.
    pub fn blocks_text(self) -> bool {
        self.intersects(Self::ALT | Self::CTRL | Self::META)
    }
}

/// Host classification of a single keydown.
///
/// The host maps its toolkit's key events onto these four cases; the capture
/// state machine does not interpret key codes itself.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Key {
    /// A single printable character.
    Char(char),
    /// The acknowledgement key that terminates a scan (typically Enter).
    Ack,
    /// A key on the ignore list: it neither extends nor disturbs the buffer.
    /// Bare modifier keydowns (Shift in particular) belong here, since
    /// scanners press them mid-burst.
    Ignored,
    /// Any other key (navigation, function keys, editing keys). Aborts the
    /// burst: a human is clearly interacting with the keyboard.
    Other,
}

/// Timing and length thresholds for burst recognition.
///
/// The defaults are hand-tuned: they trade false negatives (unusually slow
/// scanners) against false positives (very fast typists). Hosts with known
/// hardware can tighten or relax them.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CaptureConfig {
    /// An inter-key gap of at least this many milliseconds clears the
    /// buffer. Sustained human typing sits well above this; scanners sit
    /// well below.
    pub reset_gap_ms: u64,
    /// Minimum number of buffered characters for a burst to qualify.
    pub min_length: usize,
    /// Maximum elapsed time from the first buffered character to the
    /// acknowledgement key.
    pub max_duration_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            reset_gap_ms: 80,
            min_length: 4,
            max_duration_ms: 1500,
        }
    }
}

/// A recognized scan burst.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanBurst {
    /// The buffered characters, in arrival order.
    pub value: String,
    /// Milliseconds from the first buffered character to the
    /// acknowledgement key.
    pub elapsed_ms: u64,
}

/// Per-keydown decision of the capture state machine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The key was absorbed (buffered, ignored, or it cleared the buffer).
    /// Let the event proceed normally.
    Buffered,
    /// The acknowledgement key completed a qualifying burst. The host should
    /// suppress the key's default action.
    Scan(ScanBurst),
}

/// State machine turning rapid keydown sequences into scan bursts.
///
/// One instance per view; all state is private and mutated only through
/// [`Self::on_key`]. Dropping the instance discards any partial buffer.
#[derive(Clone, Debug, Default)]
pub struct KeystrokeCapture {
    cfg: CaptureConfig,
    buf: String,
    started_at: Option<u64>,
    last_key_at: Option<u64>,
}

impl KeystrokeCapture {
    /// Create a capture state machine with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a capture state machine with explicit thresholds.
    pub fn with_config(cfg: CaptureConfig) -> Self {
        Self {
            cfg,
            ..Self::default()
        }
    }

    /// The active thresholds.
    pub fn config(&self) -> &CaptureConfig {
        &self.cfg
    }

    /// Returns `true` while at least one character is buffered.
    pub fn is_collecting(&self) -> bool {
        !self.buf.is_empty()
    }

    /// Discard any buffered characters.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.started_at = None;
    }

    /// Feed one keydown into the state machine.
    ///
    /// `now_ms` is the host's wall-clock timestamp for the event in
    /// milliseconds; timestamps must be monotonically non-decreasing across
    /// calls. Timestamps captured at event time replace scheduled timers:
    /// gap and duration checks happen lazily on the next key.
    pub fn on_key(&mut self, key: Key, modifiers: Modifiers, now_ms: u64) -> KeyOutcome {
        if let Some(last) = self.last_key_at {
            if now_ms.saturating_sub(last) >= self.cfg.reset_gap_ms {
                self.reset();
            }
        }
        self.last_key_at = Some(now_ms);

        match key {
            Key::Char(c) if !modifiers.blocks_text() => {
                if self.buf.is_empty() {
                    self.started_at = Some(now_ms);
                }
                self.buf.push(c);
                KeyOutcome::Buffered
            }
            // A chorded character is command input; abort the burst.
            Key::Char(_) | Key::Other => {
                self.reset();
                KeyOutcome::Buffered
            }
            Key::Ignored => KeyOutcome::Buffered,
            Key::Ack => {
                let value = core::mem::take(&mut self.buf);
                let started_at = self.started_at.take();
                if value.chars().count() < self.cfg.min_length {
                    return KeyOutcome::Buffered;
                }
                match started_at {
                    Some(start) => {
                        let elapsed_ms = now_ms.saturating_sub(start);
                        if elapsed_ms <= self.cfg.max_duration_ms {
                            KeyOutcome::Scan(ScanBurst { value, elapsed_ms })
                        } else {
                            // Too slow for a scanner; ordinary typed Enter.
                            KeyOutcome::Buffered
                        }
                    }
                    None => KeyOutcome::Buffered,
                }
            }
        }
    }
}
