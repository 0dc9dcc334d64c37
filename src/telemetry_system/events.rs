//! Event and command channel between the simulation core and its observers.
//!
//! The core only ever writes to an [`EventSink`] handed to it by the caller.
//! Sinks are owned by whoever drives the simulation, so two simulations (or two
//! tests) never share subscribers.

use std::fmt;

use tracing::{debug, info, warn};

use crate::control::{planet::PlanetId, rocket::RocketId};

#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    /// A rocket hit a planet's surface and was removed from the world.
    Impact {
        planet: PlanetId,
        rocket: RocketId,
        /// Polar angle of the impact point in the planet's rotating frame.
        impact_angle: f64,
        /// Speed relative to the local (moving) surface.
        impact_speed: f64,
    },
    /// First refused engine burn of a rocket.
    FuelExhausted { rocket: RocketId },
    /// Guidance asks the host loop to change its time scale.
    RequestTimeScale { value: f64 },
    /// Guidance asks the host to record a message.
    RequestLog { message: String },
    PhaseStarted {
        rocket: RocketId,
        phase: &'static str,
    },
    PhaseCompleted {
        rocket: RocketId,
        phase: &'static str,
    },
    PrimaryChanged {
        rocket: RocketId,
        from: PlanetId,
        to: PlanetId,
    },
}

impl fmt::Display for SimEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimEvent::Impact {
                planet,
                rocket,
                impact_angle,
                impact_speed,
            } => write!(
                f,
                "{rocket} has fallen on {planet} at {impact_angle:.3} with speed {impact_speed:.3} m/s"
            ),
            SimEvent::FuelExhausted { rocket } => write!(f, "{rocket} is out of fuel"),
            SimEvent::RequestTimeScale { value } => write!(f, "time scale requested: {value}"),
            SimEvent::RequestLog { message } => write!(f, "{message}"),
            SimEvent::PhaseStarted { rocket, phase } => write!(f, "{rocket} started {phase}"),
            SimEvent::PhaseCompleted { rocket, phase } => write!(f, "{rocket} completed {phase}"),
            SimEvent::PrimaryChanged { rocket, from, to } => {
                write!(f, "{rocket} switched primary from {from} to {to}")
            }
        }
    }
}

/// An event stamped with the simulation time it was emitted at.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedEvent {
    pub time: f64,
    pub event: SimEvent,
}

impl fmt::Display for TimedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", time_prefix(self.time), self.event)
    }
}

/// `[Dd Hh Mm Ss]: ` prefix for a simulation time in seconds.
pub fn time_prefix(time: f64) -> String {
    let total = time.max(0.0) as u64;
    let seconds = total % 60;
    let minutes = total / 60 % 60;
    let hours = total / 3600 % 24;
    let days = total / 86_400;
    format!("[{days}d {hours}h {minutes}m {seconds}s]: ")
}

pub trait EventSink {
    fn emit(&mut self, time: f64, event: SimEvent);
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, time: f64, event: SimEvent) {
        (**self).emit(time, event);
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn emit(&mut self, time: f64, event: SimEvent) {
        (**self).emit(time, event);
    }
}

impl EventSink for Vec<TimedEvent> {
    fn emit(&mut self, time: f64, event: SimEvent) {
        self.push(TimedEvent { time, event });
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _time: f64, _event: SimEvent) {}
}

/// Recorder that keeps every event in emission order.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Vec<TimedEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        EventLog::default()
    }

    pub fn events(&self) -> &[TimedEvent] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<TimedEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn impacts(&self) -> impl Iterator<Item = &TimedEvent> {
        self.events
            .iter()
            .filter(|e| matches!(e.event, SimEvent::Impact { .. }))
    }

    pub fn completed_phases(&self, rocket: RocketId) -> Vec<&'static str> {
        self.events
            .iter()
            .filter_map(|e| match e.event {
                SimEvent::PhaseCompleted { rocket: r, phase } if r == rocket => Some(phase),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for EventLog {
    fn emit(&mut self, time: f64, event: SimEvent) {
        self.events.push(TimedEvent { time, event });
    }
}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&mut self, time: f64, event: SimEvent) {
        let entry = TimedEvent { time, event };
        match entry.event {
            SimEvent::Impact { .. } | SimEvent::RequestLog { .. } => info!("{entry}"),
            SimEvent::FuelExhausted { .. } => warn!("{entry}"),
            _ => debug!("{entry}"),
        }
    }
}

/// Fan-out to any number of subscribers, in subscription order.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Box<dyn EventSink>>,
}

impl EventBus {
    pub fn new() -> Self {
        EventBus::default()
    }

    pub fn subscribe(&mut self, subscriber: Box<dyn EventSink>) {
        self.subscribers.push(subscriber);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl EventSink for EventBus {
    fn emit(&mut self, time: f64, event: SimEvent) {
        for subscriber in &mut self.subscribers {
            subscriber.emit(time, event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_prefix() {
        assert_eq!(time_prefix(0.0), "[0d 0h 0m 0s]: ");
        assert_eq!(time_prefix(90_061.5), "[1d 1h 1m 1s]: ");
    }

    #[test]
    fn test_event_log_keeps_order() {
        let mut log = EventLog::new();
        log.emit(1.0, SimEvent::RequestTimeScale { value: 10.0 });
        log.emit(
            2.0,
            SimEvent::RequestLog {
                message: "hello".to_string(),
            },
        );

        assert_eq!(log.len(), 2);
        assert_eq!(log.events()[0].time, 1.0);
        assert_eq!(log.events()[1].to_string(), "[0d 0h 0m 2s]: hello");
        assert_eq!(log.drain().len(), 2);
        assert!(log.is_empty());
    }

    #[test]
    fn test_bus_fans_out_to_every_subscriber() {
        use std::cell::RefCell;
        use std::rc::Rc;

        struct Shared(Rc<RefCell<Vec<TimedEvent>>>);
        impl EventSink for Shared {
            fn emit(&mut self, time: f64, event: SimEvent) {
                self.0.borrow_mut().push(TimedEvent { time, event });
            }
        }

        let first = Rc::new(RefCell::new(Vec::new()));
        let second = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        bus.subscribe(Box::new(Shared(first.clone())));
        bus.subscribe(Box::new(Shared(second.clone())));

        bus.emit(3.0, SimEvent::FuelExhausted { rocket: RocketId(4) });

        assert_eq!(bus.subscriber_count(), 2);
        assert_eq!(first.borrow().len(), 1);
        assert_eq!(second.borrow()[0].event, SimEvent::FuelExhausted { rocket: RocketId(4) });
    }

    #[test]
    fn test_completed_phases_filters_by_rocket() {
        let mut log = EventLog::new();
        log.emit(
            0.0,
            SimEvent::PhaseCompleted {
                rocket: RocketId(0),
                phase: "takeoff",
            },
        );
        log.emit(
            0.0,
            SimEvent::PhaseCompleted {
                rocket: RocketId(1),
                phase: "landing",
            },
        );
        assert_eq!(log.completed_phases(RocketId(1)), vec!["landing"]);
    }
}
