//! Keyboard vocabulary and the per-frame priority rule.
//!
//! The host records which controls are currently held down. Once per frame the
//! held set is resolved to at most one control, checked in the order
//! escape, `2`..`8`, `M`, `J`; the first held control wins and the rest are
//! ignored for that frame. A control that stays held is applied again on the
//! next frame, the same as polling key state.

use std::collections::BTreeSet;

use crate::view::Power;

/// Something the keyboard can ask the host loop to do.
///
/// The derived ordering is the resolution priority: variants compare in
/// declaration order and powers compare by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Control {
    Quit,
    Power(Power),
    Mandelbrot,
    Julia,
}

/// Whether the host loop keeps running after a frame's input was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

#[derive(Debug, Clone, Default)]
pub struct HeldControls {
    held: BTreeSet<Control>,
}

impl HeldControls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a key press. Returns `false` if the control was already held.
    pub fn press(&mut self, control: Control) -> bool {
        self.held.insert(control)
    }

    /// Records a key release. Returns `false` if the control was not held.
    pub fn release(&mut self, control: Control) -> bool {
        self.held.remove(&control)
    }

    /// Forgets every held control, e.g. when the window loses focus and
    /// release events may never arrive.
    pub fn clear(&mut self) {
        self.held.clear();
    }

    /// The single control that takes effect this frame.
    pub fn resolve(&self) -> Option<Control> {
        self.held.first().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{FractalMode, ViewState};

    fn power(value: u8) -> Control {
        Control::Power(Power::new(value).unwrap())
    }

    #[test]
    fn escape_wins_over_everything() {
        let mut held = HeldControls::new();
        held.press(Control::Julia);
        held.press(power(8));
        held.press(Control::Quit);
        assert_eq!(held.resolve(), Some(Control::Quit));
    }

    #[test]
    fn lower_power_key_wins_over_higher() {
        let mut held = HeldControls::new();
        held.press(power(6));
        held.press(power(3));
        assert_eq!(held.resolve(), Some(power(3)));
    }

    #[test]
    fn power_keys_win_over_mode_keys() {
        let mut held = HeldControls::new();
        held.press(Control::Mandelbrot);
        held.press(power(8));
        assert_eq!(held.resolve(), Some(power(8)));
    }

    #[test]
    fn mandelbrot_key_wins_over_julia_key() {
        let mut held = HeldControls::new();
        held.press(Control::Julia);
        held.press(Control::Mandelbrot);
        assert_eq!(held.resolve(), Some(Control::Mandelbrot));
    }

    #[test]
    fn release_and_clear_forget_controls() {
        let mut held = HeldControls::new();
        assert!(held.press(Control::Julia));
        assert!(!held.press(Control::Julia));
        assert!(held.release(Control::Julia));
        assert!(!held.release(Control::Julia));
        assert_eq!(held.resolve(), None);

        held.press(power(4));
        held.clear();
        assert_eq!(held.resolve(), None);
    }

    #[test]
    fn pressing_mode_key_after_power_key_keeps_power() {
        let mut view = ViewState::default();
        let mut held = HeldControls::new();

        held.press(power(5));
        assert_eq!(view.step(&held), Flow::Continue);
        assert_eq!(view.power().get(), 5);
        held.release(power(5));

        held.press(Control::Mandelbrot);
        view.step(&held);
        assert_eq!(view.power().get(), 5);
        assert_eq!(view.mode(), FractalMode::Mandelbrot);

        held.release(Control::Mandelbrot);
        held.press(Control::Julia);
        view.step(&held);
        assert_eq!(view.power().get(), 5);
        assert_eq!(view.mode(), FractalMode::Julia);
    }

    #[test]
    fn held_escape_exits() {
        let mut view = ViewState::default();
        let mut held = HeldControls::new();
        held.press(Control::Quit);
        held.press(power(7));
        assert_eq!(view.step(&held), Flow::Exit);
        assert_eq!(view.power().get(), 2);
    }

    #[test]
    fn idle_frame_changes_nothing() {
        let mut view = ViewState::default();
        let before = view;
        assert_eq!(view.step(&HeldControls::new()), Flow::Continue);
        assert_eq!(view, before);
    }
}
