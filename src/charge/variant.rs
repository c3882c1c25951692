//! Gesture bindings - the per-variant (start, continue, release) triples
//!
//! One parameterized state machine serves every variant; only the
//! mapping from predicates to transitions differs. Each binding answers
//! four questions about the current tick: should a charge start, is the
//! charging gesture still held, should the charge release (launching if
//! fully charged), and should it abort (cancel regardless of charge).

use crate::hand::{GesturePredicates, rising};

/// Maps gesture predicates to charge transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureBinding {
    /// Pinch to charge, release the pinch to launch
    PinchCharge,
    /// Open hand palm-up to charge, flip palm-down to launch;
    /// closing the hand without flipping always cancels
    PalmFlipCharge,
    /// Pinch to charge, open the hand to launch; dropping the pinch
    /// without opening merely pauses accrual
    OpenHandRelease,
}

impl GestureBinding {
    /// Start condition, evaluated as a rising edge
    pub fn start(&self, prev: &GesturePredicates, curr: &GesturePredicates) -> bool {
        match self {
            GestureBinding::PinchCharge => rising(prev.pinching, curr.pinching),
            GestureBinding::PalmFlipCharge => rising(
                prev.open_hand && prev.palm_up,
                curr.open_hand && curr.palm_up,
            ),
            GestureBinding::OpenHandRelease => rising(prev.pinching, curr.pinching),
        }
    }

    /// Continue condition; accrual happens only while this holds
    pub fn held(&self, curr: &GesturePredicates) -> bool {
        match self {
            GestureBinding::PinchCharge => curr.pinching,
            GestureBinding::PalmFlipCharge => curr.open_hand && curr.palm_up,
            GestureBinding::OpenHandRelease => curr.pinching && !curr.open_hand,
        }
    }

    /// Release condition; launches when fully charged, cancels otherwise
    pub fn release(&self, curr: &GesturePredicates) -> bool {
        match self {
            GestureBinding::PinchCharge => !curr.pinching,
            GestureBinding::PalmFlipCharge => curr.palm_down,
            GestureBinding::OpenHandRelease => curr.open_hand,
        }
    }

    /// Abort condition; cancels even when fully charged
    pub fn abort(&self, curr: &GesturePredicates) -> bool {
        match self {
            // Closing the hand without flipping the palm never launches
            GestureBinding::PalmFlipCharge => !curr.open_hand && !curr.palm_down,
            _ => false,
        }
    }
}
