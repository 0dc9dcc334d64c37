//! Phases that only talk to the host loop. They never touch the rocket.

use crate::control::{
    guidance::{Phase, PhaseContext, PhaseTransition},
    rocket::Rocket,
};
use crate::telemetry_system::events::SimEvent;

/// Asks the host loop for a new time scale, then completes.
#[derive(Debug, Clone, PartialEq)]
pub struct SetTimeScale {
    pub value: f64,
}

impl SetTimeScale {
    pub fn new(value: f64) -> Self {
        SetTimeScale { value }
    }
}

impl Phase for SetTimeScale {
    fn name(&self) -> &'static str {
        "set_time_scale"
    }

    fn decide(
        &self,
        _rocket: &mut Rocket,
        ctx: &mut PhaseContext<'_>,
        _delta_time: f64,
    ) -> PhaseTransition {
        ctx.emit(SimEvent::RequestTimeScale { value: self.value });
        PhaseTransition::Complete
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogMessage {
    pub message: String,
}

impl LogMessage {
    pub fn new(message: impl Into<String>) -> Self {
        LogMessage {
            message: message.into(),
        }
    }
}

impl Phase for LogMessage {
    fn name(&self) -> &'static str {
        "log"
    }

    fn decide(
        &self,
        _rocket: &mut Rocket,
        ctx: &mut PhaseContext<'_>,
        _delta_time: f64,
    ) -> PhaseTransition {
        ctx.emit(SimEvent::RequestLog {
            message: self.message.clone(),
        });
        PhaseTransition::Complete
    }
}
