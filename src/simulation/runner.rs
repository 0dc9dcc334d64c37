//! Host loop helper: turns wall-clock frames into physics ticks.
//!
//! Each frame of `frame_dt` seconds covers `frame_dt · time_scale` simulated
//! seconds, split into `ticks_per_frame` equal ticks. Time-scale requests
//! emitted by guidance take effect from the tick after the one that emitted
//! them.

use tracing::{debug, warn};

use crate::constants::{DEFAULT_TICKS_PER_FRAME, DEFAULT_TIME_SCALE, MAX_TICKS_PER_FRAME};
use crate::errors::SimulationError;
use crate::telemetry_system::events::{EventBus, EventSink, SimEvent, TimedEvent};

use super::world::World;

pub struct Runner {
    world: World,
    time_scale: f64,
    ticks_per_frame: usize,
    bus: EventBus,
}

fn check_time_scale(value: f64) -> Result<f64, SimulationError> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(SimulationError::InvalidTimeScale(value))
    }
}

impl Runner {
    pub fn new(world: World) -> Self {
        Runner {
            world,
            time_scale: DEFAULT_TIME_SCALE,
            ticks_per_frame: DEFAULT_TICKS_PER_FRAME,
            bus: EventBus::new(),
        }
    }

    pub fn with_time_scale(mut self, time_scale: f64) -> Result<Self, SimulationError> {
        self.time_scale = check_time_scale(time_scale)?;
        Ok(self)
    }

    /// Clamped to `1..=MAX_TICKS_PER_FRAME`.
    pub fn with_ticks_per_frame(mut self, ticks_per_frame: usize) -> Self {
        self.ticks_per_frame = ticks_per_frame.clamp(1, MAX_TICKS_PER_FRAME);
        self
    }

    /// Every event the world emits is forwarded to `sink`.
    pub fn subscribe(&mut self, sink: Box<dyn EventSink>) {
        self.bus.subscribe(sink);
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn into_world(self) -> World {
        self.world
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn ticks_per_frame(&self) -> usize {
        self.ticks_per_frame
    }

    pub fn tick_length(&self, frame_dt: f64) -> f64 {
        frame_dt * self.time_scale / self.ticks_per_frame as f64
    }

    /// Runs one frame and returns the events it produced, in order.
    pub fn advance(&mut self, frame_dt: f64) -> Result<Vec<TimedEvent>, SimulationError> {
        if !(frame_dt > 0.0 && frame_dt.is_finite()) {
            return Err(SimulationError::InvalidTimeStep(frame_dt));
        }

        let mut frame_events = Vec::new();
        for _ in 0..self.ticks_per_frame {
            let tick_length = self.tick_length(frame_dt);
            let mut tick_events: Vec<TimedEvent> = Vec::new();
            self.world.step(tick_length, &mut tick_events);

            for entry in tick_events {
                if let SimEvent::RequestTimeScale { value } = entry.event {
                    self.apply_time_scale(value);
                }
                self.bus.emit(entry.time, entry.event.clone());
                frame_events.push(entry);
            }
        }
        Ok(frame_events)
    }

    /// Advances whole frames until at least `duration` simulated seconds have
    /// passed, or no rocket is left flying.
    pub fn run_for(
        &mut self,
        duration: f64,
        frame_dt: f64,
    ) -> Result<Vec<TimedEvent>, SimulationError> {
        let end = self.world.time() + duration;
        let mut events = Vec::new();
        while self.world.time() < end && !self.world.rockets().is_empty() {
            events.extend(self.advance(frame_dt)?);
        }
        Ok(events)
    }

    fn apply_time_scale(&mut self, value: f64) {
        match check_time_scale(value) {
            Ok(value) => {
                debug!(from = self.time_scale, to = value, "time scale changed");
                self.time_scale = value;
            }
            Err(error) => warn!(%error, "ignoring time scale request"),
        }
    }
}
