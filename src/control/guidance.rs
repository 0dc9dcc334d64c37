//! Per-rocket stack of guidance phases.
//!
//! Only the phase on top of the stack is evaluated, once per tick. A phase
//! answers with a [`PhaseTransition`] and the stack applies it; phases never
//! touch the stack themselves.

use std::fmt;

use crate::telemetry_system::events::{EventSink, SimEvent};

use super::planet::{Planet, PlanetId};
use super::rocket::Rocket;

/// What the stack should do with the phase that just decided.
pub enum PhaseTransition {
    /// Keep the phase on top for the next tick.
    Continue,
    /// Pop the phase; the one below (if any) takes over next tick.
    Complete,
    /// Keep the phase but run the given sub-maneuver on top of it first.
    Push(Box<dyn Phase>),
    /// Swap the phase for another one.
    Replace(Box<dyn Phase>),
}

impl fmt::Debug for PhaseTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhaseTransition::Continue => f.write_str("Continue"),
            PhaseTransition::Complete => f.write_str("Complete"),
            PhaseTransition::Push(phase) => write!(f, "Push({})", phase.name()),
            PhaseTransition::Replace(phase) => write!(f, "Replace({})", phase.name()),
        }
    }
}

/// Read-only view of the world handed to a deciding phase, plus the event
/// channel it may write commands to.
pub struct PhaseContext<'a> {
    pub planets: &'a [Planet],
    pub time: f64,
    events: &'a mut dyn EventSink,
}

impl<'a> PhaseContext<'a> {
    pub fn new(planets: &'a [Planet], time: f64, events: &'a mut dyn EventSink) -> Self {
        PhaseContext {
            planets,
            time,
            events,
        }
    }

    pub fn planet(&self, id: PlanetId) -> Option<&'a Planet> {
        self.planets.get(id.0)
    }

    pub fn emit(&mut self, event: SimEvent) {
        self.events.emit(self.time, event);
    }
}

/// A guidance behavior. Parameters are fixed at construction; all per-tick
/// state is read from the rocket and the world.
pub trait Phase: fmt::Debug {
    fn name(&self) -> &'static str;

    /// Inspects the rocket and may fire its engine for this tick.
    /// Engine-fire requests can be refused for lack of fuel, so a phase must
    /// not assume its thrust was delivered.
    fn decide(
        &self,
        rocket: &mut Rocket,
        ctx: &mut PhaseContext<'_>,
        delta_time: f64,
    ) -> PhaseTransition;
}

#[derive(Debug)]
struct PhaseSlot {
    phase: Box<dyn Phase>,
    started: bool,
}

#[derive(Debug, Default)]
pub struct GuidanceSystem {
    stack: Vec<PhaseSlot>,
}

impl GuidanceSystem {
    /// Builds the stack so that the first listed phase runs first.
    pub fn new(phases: Vec<Box<dyn Phase>>) -> Self {
        GuidanceSystem {
            stack: phases
                .into_iter()
                .rev()
                .map(|phase| PhaseSlot {
                    phase,
                    started: false,
                })
                .collect(),
        }
    }

    pub fn current(&self) -> Option<&dyn Phase> {
        self.stack.last().map(|slot| slot.phase.as_ref())
    }

    pub fn current_name(&self) -> Option<&'static str> {
        self.current().map(|phase| phase.name())
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn is_idle(&self) -> bool {
        self.stack.is_empty()
    }

    /// Phase names from top to bottom.
    pub fn pending(&self) -> Vec<&'static str> {
        self.stack.iter().rev().map(|slot| slot.phase.name()).collect()
    }

    pub fn push(&mut self, phase: Box<dyn Phase>) {
        self.stack.push(PhaseSlot {
            phase,
            started: false,
        });
    }

    fn take(&mut self) -> Option<PhaseSlot> {
        self.stack.pop()
    }

    fn restore(&mut self, slot: PhaseSlot) {
        self.stack.push(slot);
    }
}

impl Rocket {
    /// Runs the top phase of this rocket's stack for one tick and applies its
    /// transition. A rocket with an empty stack flies under gravity alone.
    pub fn make_decision(&mut self, ctx: &mut PhaseContext<'_>, delta_time: f64) {
        let Some(mut slot) = self.guidance.take() else {
            return;
        };

        if !slot.started {
            slot.started = true;
            ctx.emit(SimEvent::PhaseStarted {
                rocket: self.id,
                phase: slot.phase.name(),
            });
        }

        let transition = slot.phase.decide(self, ctx, delta_time);
        tracing::trace!(rocket = %self.id, phase = slot.phase.name(), ?transition, "guidance decision");

        match transition {
            PhaseTransition::Continue => self.guidance.restore(slot),
            PhaseTransition::Complete => {
                ctx.emit(SimEvent::PhaseCompleted {
                    rocket: self.id,
                    phase: slot.phase.name(),
                });
            }
            PhaseTransition::Push(next) => {
                self.guidance.restore(slot);
                self.guidance.push(next);
            }
            PhaseTransition::Replace(next) => {
                ctx.emit(SimEvent::PhaseCompleted {
                    rocket: self.id,
                    phase: slot.phase.name(),
                });
                self.guidance.push(next);
            }
        }
    }
}
