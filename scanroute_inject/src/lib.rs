// Copyright 2026 the Scanroute Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scanroute Inject: write a resolved value into a sink as if typed.
//!
//! A programmatic write must be indistinguishable from user input to
//! whatever reactive bindings observe the sink: the value goes through the
//! sink's native setter, the same notifications fire that user edits would
//! fire, and the caret lands at the end of the inserted text where the
//! widget kind supports selection ranges.
//!
//! The crate splits this into two layers, a pure planner and a runner:
//!
//! - [`plan`] builds an ordered [`InjectStep`] sequence from the sink kind,
//!   so the exact contract per kind is inspectable and testable without a
//!   host.
//! - [`apply`] walks a plan against a host [`TextSink`], applying the local
//!   error policy: caret placement failures are swallowed, and a focus
//!   refusal is retried once without scroll prevention before injection
//!   proceeds unfocused.
//!
//! Nothing in this crate escalates an error. A half-successful injection
//! (value written, caret not placed) is strictly better than a lost scan,
//! and the operator's recovery path is simply to re-scan.
//!
//! ## Minimal example
//!
//! ```
//! use scanroute_inject::{InjectStep, ValueNotice, plan};
//! use scanroute_sink::SinkKind;
//!
//! let steps = plan(SinkKind::Text, "A1B2");
//! assert_eq!(
//!     steps.as_slice(),
//!     &[
//!         InjectStep::Focus,
//!         InjectStep::SetValue,
//!         InjectStep::Notify(ValueNotice::Input),
//!         InjectStep::Notify(ValueNotice::Change),
//!         InjectStep::Caret(4),
//!     ],
//! );
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use scanroute_sink::SinkKind;
use smallvec::SmallVec;

/// Notification a programmatic write raises on the sink.
///
/// Hosts map these onto whatever their framework uses to observe edits
/// (synthetic events, observable pushes, manual state updates). The
/// contract is only that bound observers see the same notification they
/// would for user-driven input.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ValueNotice {
    /// The value is being edited (per-keystroke granularity).
    Input,
    /// The value was committed.
    Change,
}

/// One step of an injection plan.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InjectStep {
    /// Move focus to the sink (best effort, see [`apply`]).
    Focus,
    /// Write the value through the sink's native setter.
    SetValue,
    /// Raise a change notification for bound observers.
    Notify(ValueNotice),
    /// Place the caret after the given character position.
    Caret(usize),
}

/// Injection plans are short and fixed-shape; five steps is the maximum.
pub type InjectPlan = SmallVec<[InjectStep; 5]>;

/// The sink's widget kind does not support selection ranges.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CaretUnsupported;

/// Options for a focus request.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FocusOptions {
    /// Ask the host not to scroll the sink into view.
    pub prevent_scroll: bool,
}

/// Host-side handle to one editable widget.
///
/// The runner only ever talks to the single resolved sink through this
/// trait; it never creates, destroys, or enumerates widgets.
pub trait TextSink {
    /// Write `text` through the widget's native value mechanism, bypassing
    /// any instrumented property override a reactive framework installed.
    fn set_text(&mut self, text: &str);

    /// Notify bound observers of a programmatic value change.
    fn notify(&mut self, notice: ValueNotice);

    /// Place the caret after `pos` characters.
    ///
    /// The default declines, which is correct for widgets without selection
    /// ranges; the runner ignores the error either way.
    fn set_caret(&mut self, pos: usize) -> Result<(), CaretUnsupported> {
        let _ = pos;
        Err(CaretUnsupported)
    }

    /// Request focus. Returns `false` when the widget cannot accept focus
    /// right now (for example mid-transition). The default accepts.
    fn focus(&mut self, options: FocusOptions) -> bool {
        let _ = options;
        true
    }
}

/// Build the injection plan for a sink kind.
///
/// - Text and multiline sinks: focus, set value, `Input` + `Change`
///   notifications, caret at the end of the inserted text.
/// - Choice sinks: focus, set value, `Change` only; no caret contract.
/// - Rich-text regions: focus, replace text content, `Input` only.
pub fn plan(kind: SinkKind, value: &str) -> InjectPlan {
    let mut steps = InjectPlan::new();
    steps.push(InjectStep::Focus);
    steps.push(InjectStep::SetValue);
    match kind {
        SinkKind::Text | SinkKind::Multiline => {
            steps.push(InjectStep::Notify(ValueNotice::Input));
            steps.push(InjectStep::Notify(ValueNotice::Change));
            steps.push(InjectStep::Caret(value.chars().count()));
        }
        SinkKind::Choice => {
            steps.push(InjectStep::Notify(ValueNotice::Change));
        }
        SinkKind::RichText => {
            steps.push(InjectStep::Notify(ValueNotice::Input));
        }
    }
    steps
}

/// Execute a plan against a sink.
///
/// Error policy, applied locally and never propagated:
/// - A focus refusal is retried once without scroll prevention; if the sink
///   still refuses, injection proceeds without focus.
/// - Caret placement failures are ignored.
pub fn apply<S: TextSink>(sink: &mut S, value: &str, steps: &[InjectStep]) {
    for step in steps {
        match *step {
            InjectStep::Focus => {
                if !sink.focus(FocusOptions {
                    prevent_scroll: true,
                }) {
                    let _ = sink.focus(FocusOptions {
                        prevent_scroll: false,
                    });
                }
            }
            InjectStep::SetValue => sink.set_text(value),
            InjectStep::Notify(notice) => sink.notify(notice),
            InjectStep::Caret(pos) => {
                let _ = sink.set_caret(pos);
            }
        }
    }
}

/// Plan and apply in one call.
pub fn inject<S: TextSink>(sink: &mut S, kind: SinkKind, value: &str) {
    apply(sink, value, &plan(kind, value));
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;
    use alloc::vec::Vec;

    #[derive(Default)]
    struct FakeSink {
        text: String,
        notices: Vec<ValueNotice>,
        caret: Option<usize>,
        caret_supported: bool,
        focus_calls: Vec<FocusOptions>,
        refuse_focus: bool,
    }

    impl TextSink for FakeSink {
        fn set_text(&mut self, text: &str) {
            self.text.clear();
            self.text.push_str(text);
        }

        fn notify(&mut self, notice: ValueNotice) {
            self.notices.push(notice);
        }

        fn set_caret(&mut self, pos: usize) -> Result<(), CaretUnsupported> {
            if self.caret_supported {
                self.caret = Some(pos);
                Ok(())
            } else {
                Err(CaretUnsupported)
            }
        }

        fn focus(&mut self, options: FocusOptions) -> bool {
            self.focus_calls.push(options);
            !self.refuse_focus
        }
    }

    #[test]
    fn text_plan_covers_full_contract() {
        let steps = plan(SinkKind::Text, "XYZ-99");
        assert_eq!(
            steps.as_slice(),
            &[
                InjectStep::Focus,
                InjectStep::SetValue,
                InjectStep::Notify(ValueNotice::Input),
                InjectStep::Notify(ValueNotice::Change),
                InjectStep::Caret(6),
            ],
        );
    }

    #[test]
    fn caret_counts_characters_not_bytes() {
        let steps = plan(SinkKind::Multiline, "éàüö");
        assert_eq!(steps.last(), Some(&InjectStep::Caret(4)));
    }

    #[test]
    fn choice_plan_raises_change_only() {
        let steps = plan(SinkKind::Choice, "OPT-2");
        assert_eq!(
            steps.as_slice(),
            &[
                InjectStep::Focus,
                InjectStep::SetValue,
                InjectStep::Notify(ValueNotice::Change),
            ],
        );
    }

    #[test]
    fn rich_text_plan_raises_input_only() {
        let steps = plan(SinkKind::RichText, "note");
        assert_eq!(
            steps.as_slice(),
            &[
                InjectStep::Focus,
                InjectStep::SetValue,
                InjectStep::Notify(ValueNotice::Input),
            ],
        );
    }

    #[test]
    fn injection_round_trip() {
        let mut sink = FakeSink {
            caret_supported: true,
            ..FakeSink::default()
        };
        inject(&mut sink, SinkKind::Text, "A1B2C3D4");
        assert_eq!(sink.text, "A1B2C3D4");
        assert_eq!(sink.notices, &[ValueNotice::Input, ValueNotice::Change]);
        assert_eq!(sink.caret, Some(8));
    }

    #[test]
    fn caret_failure_does_not_abort_injection() {
        let mut sink = FakeSink::default(); // caret unsupported
        inject(&mut sink, SinkKind::Text, "A1B2");
        assert_eq!(sink.text, "A1B2");
        assert_eq!(sink.notices, &[ValueNotice::Input, ValueNotice::Change]);
        assert_eq!(sink.caret, None);
    }

    #[test]
    fn focus_refusal_retries_without_scroll_prevention() {
        let mut sink = FakeSink {
            refuse_focus: true,
            ..FakeSink::default()
        };
        inject(&mut sink, SinkKind::Text, "A1B2");
        assert_eq!(
            sink.focus_calls,
            &[
                FocusOptions {
                    prevent_scroll: true
                },
                FocusOptions {
                    prevent_scroll: false
                },
            ],
        );
        // Injection proceeded without focus.
        assert_eq!(sink.text, "A1B2");
    }

    #[test]
    fn accepted_focus_is_not_retried() {
        let mut sink = FakeSink::default();
        inject(&mut sink, SinkKind::Text, "A1B2");
        assert_eq!(sink.focus_calls.len(), 1);
        assert!(sink.focus_calls[0].prevent_scroll);
    }
}
