//! The charge action component and its per-tick transition logic
//!
//! `ChargeAction::tick` is a plain method over plain inputs so the whole
//! transition table is unit-testable without an `App`; the Bevy system
//! in `systems.rs` only feeds it and applies its effects.

use bevy::prelude::*;

use crate::charge::variant::GestureBinding;
use crate::hand::{GesturePredicates, GestureSample, HandSide};
use crate::launcher::LaunchRequest;
use crate::tuning::Tuning;

/// Phase of a charge cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChargePhase {
    #[default]
    Idle,
    Charging,
    FullyCharged,
}

/// What to do when tracking drops mid-charge.
/// The source variants disagree on this, so it is explicit per action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrackingLossPolicy {
    /// Untracked tick = no gesture active: accrual pauses, charge survives
    #[default]
    Freeze,
    /// Untracked tick cancels an in-progress charge
    Cancel,
}

/// Effects produced by one tick of the machine, in emission order
#[derive(Debug, Clone, PartialEq)]
pub enum ChargeEffect {
    /// Charge started; anchor captured, proxy wanted
    Started,
    /// Accrual happened this tick
    Progressed { percent: f32 },
    /// Threshold crossed (fires exactly once per cycle)
    FullyCharged,
    /// Released while fully charged
    Launched(LaunchRequest),
    /// Released or aborted before full charge, or cancelled by policy
    Cancelled { elapsed: f32 },
}

/// One independently triggerable charge-and-release action.
///
/// A hand drives at most one in practice, but nothing here assumes it;
/// two actions bound to the same hand simply see the same predicates.
#[derive(Component)]
pub struct ChargeAction {
    pub hand: HandSide,
    pub binding: GestureBinding,
    pub loss_policy: TrackingLossPolicy,
    pub phase: ChargePhase,
    /// Accumulated charge seconds; zero whenever Idle
    pub elapsed: f32,
    /// Charging anchor, re-sampled from the live hand each tick
    pub anchor_point: Vec3,
    pub anchor_direction: Vec3,
    /// The owned visual proxy entity, if feedback is enabled
    pub proxy: Option<Entity>,
    /// Set on release; forces one full Idle tick before the next start
    start_lockout: bool,
}

impl ChargeAction {
    pub fn new(hand: HandSide, binding: GestureBinding) -> Self {
        Self {
            hand,
            binding,
            loss_policy: TrackingLossPolicy::default(),
            phase: ChargePhase::Idle,
            elapsed: 0.0,
            anchor_point: Vec3::ZERO,
            anchor_direction: Vec3::Z,
            proxy: None,
            start_lockout: false,
        }
    }

    pub fn with_loss_policy(mut self, policy: TrackingLossPolicy) -> Self {
        self.loss_policy = policy;
        self
    }

    pub fn is_active(&self) -> bool {
        self.phase != ChargePhase::Idle
    }

    /// Charge completion in 0..=1
    pub fn percent(&self, charge_time: f32) -> f32 {
        if charge_time <= 0.0 {
            1.0
        } else {
            (self.elapsed / charge_time).min(1.0)
        }
    }

    /// Advance the machine by one tick.
    ///
    /// `current`/`sample` are `None` on an untracked tick. Transition
    /// evaluation order enforces the edge-case policy: an active action
    /// checks release before anything else, and a release locks out a
    /// fresh start until a full Idle tick has passed.
    pub fn tick(
        &mut self,
        previous: &GesturePredicates,
        current: Option<&GesturePredicates>,
        sample: Option<&GestureSample>,
        tuning: &Tuning,
        dt: f32,
    ) -> Vec<ChargeEffect> {
        let mut effects = Vec::new();

        let Some(current) = current else {
            match self.loss_policy {
                TrackingLossPolicy::Freeze => {
                    // No gesture active this tick; an Idle action also
                    // burns its lockout since no start can occur anyway.
                    self.start_lockout = false;
                }
                TrackingLossPolicy::Cancel => {
                    if self.is_active() {
                        effects.push(self.cancel());
                    } else {
                        self.start_lockout = false;
                    }
                }
            }
            return effects;
        };

        if self.is_active() {
            let release = self.binding.release(current);
            let abort = self.binding.abort(current);

            if release || abort {
                if self.phase == ChargePhase::FullyCharged && release && !abort {
                    // Launch from the live hand pose, not the frozen anchor
                    let request = match sample {
                        Some(s) => LaunchRequest {
                            position: s.point_ahead(tuning.launch_offset),
                            direction: s.forward,
                            speed: tuning.launch_speed,
                            scale: tuning.max_charge_scale,
                        },
                        None => LaunchRequest {
                            position: self.anchor_point,
                            direction: self.anchor_direction,
                            speed: tuning.launch_speed,
                            scale: tuning.max_charge_scale,
                        },
                    };
                    self.reset_after_release();
                    effects.push(ChargeEffect::Launched(request));
                } else {
                    effects.push(self.cancel());
                }
                return effects;
            }

            if self.binding.held(current) {
                self.elapsed += dt;
                if self.phase == ChargePhase::Charging && self.elapsed >= tuning.charge_time {
                    self.phase = ChargePhase::FullyCharged;
                    effects.push(ChargeEffect::FullyCharged);
                }
                effects.push(ChargeEffect::Progressed {
                    percent: self.percent(tuning.charge_time),
                });
            }
            // Continue condition not held and no release: accrual pauses,
            // the charge survives (holding indefinitely is valid).

            if let Some(s) = sample {
                self.anchor_point = s.point_ahead(tuning.launch_offset);
                self.anchor_direction = s.forward;
            }
        } else if self.start_lockout {
            // The tick after a release is a mandatory full Idle tick
            self.start_lockout = false;
        } else if self.binding.start(previous, current) {
            self.phase = ChargePhase::Charging;
            // The start tick counts toward the charge: the continue
            // condition holds on it by construction
            self.elapsed = dt;
            if let Some(s) = sample {
                self.anchor_point = s.point_ahead(tuning.launch_offset);
                self.anchor_direction = s.forward;
            }
            effects.push(ChargeEffect::Started);
            if self.elapsed >= tuning.charge_time {
                self.phase = ChargePhase::FullyCharged;
                effects.push(ChargeEffect::FullyCharged);
            }
            effects.push(ChargeEffect::Progressed {
                percent: self.percent(tuning.charge_time),
            });
        }

        effects
    }

    fn cancel(&mut self) -> ChargeEffect {
        let elapsed = self.elapsed;
        self.reset_after_release();
        ChargeEffect::Cancelled { elapsed }
    }

    fn reset_after_release(&mut self) {
        self.phase = ChargePhase::Idle;
        self.elapsed = 0.0;
        self.start_lockout = true;
    }
}
