use std::collections::BTreeMap;

use crate::control::rocket::{RocketId, RocketState};
use crate::simulation::world::World;

use super::events::{EventSink, SimEvent, TimedEvent};

/// Flight extremes of one rocket, relative to whatever primary it had when
/// each sample was taken.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightRecord {
    pub name: String,
    pub max_speed: f64,
    pub max_height: f64,
    pub min_mass: f64,
    pub state_times: Vec<(RocketState, f64)>,
}

impl FlightRecord {
    fn new(name: &str) -> Self {
        FlightRecord {
            name: name.to_string(),
            max_speed: 0.0,
            max_height: f64::MIN,
            min_mass: f64::MAX,
            state_times: Vec::new(),
        }
    }

    fn track_state(&mut self, state: RocketState, time: f64) {
        if self.state_times.last().map(|(last, _)| *last) != Some(state) {
            self.state_times.push((state, time));
        }
    }
}

/// Sampling consumer: keeps per-rocket extremes from world snapshots and a
/// formatted line for every event it receives.
#[derive(Debug, Default)]
pub struct Telemetry {
    pub log: Vec<String>,
    flights: BTreeMap<RocketId, FlightRecord>,
    simulation_time: f64,
}

impl Telemetry {
    pub fn new() -> Self {
        Telemetry::default()
    }

    pub fn format_time(elapsed_time: f64) -> String {
        if elapsed_time >= 3600.0 {
            let hours = (elapsed_time / 3600.0).floor();
            let minutes = ((elapsed_time % 3600.0) / 60.0).floor();
            let seconds = elapsed_time % 60.0;
            format!("{:.0}h {:.0}m {:.2}s", hours, minutes, seconds)
        } else if elapsed_time >= 60.0 {
            let minutes = (elapsed_time / 60.0).floor();
            let seconds = elapsed_time % 60.0;
            format!("{:.0}m {:.2}s", minutes, seconds)
        } else {
            format!("{:.2}s", elapsed_time)
        }
    }

    pub fn format_altitude(altitude: f64) -> String {
        if altitude >= 1000.0 {
            format!("{:.2} km", altitude / 1000.0)
        } else {
            format!("{:.2} m", altitude)
        }
    }

    pub fn flight(&self, rocket: RocketId) -> Option<&FlightRecord> {
        self.flights.get(&rocket)
    }

    /// Samples every flying and crashed rocket in `world`.
    pub fn collect_data(&mut self, world: &World) {
        self.simulation_time = world.time();

        for rocket in world.rockets() {
            let record = self
                .flights
                .entry(rocket.id)
                .or_insert_with(|| FlightRecord::new(&rocket.name));

            if let Some(primary) = world.planet(rocket.primary()) {
                record.max_speed = record.max_speed.max(rocket.relative_velocity(primary).magnitude());
                record.max_height = record.max_height.max(rocket.height(primary));
            }
            record.min_mass = record.min_mass.min(rocket.mass());
            record.track_state(rocket.state, self.simulation_time);
        }

        for rocket in world.crashed() {
            if let Some(record) = self.flights.get_mut(&rocket.id) {
                record.track_state(RocketState::Crashed, self.simulation_time);
            }
        }
    }

    pub fn record(&mut self, entry: &TimedEvent) {
        let line = match &entry.event {
            SimEvent::Impact { rocket, .. } | SimEvent::FuelExhausted { rocket } => {
                match self.flights.get(rocket) {
                    Some(flight) => format!("{entry} ({})", flight.name),
                    None => entry.to_string(),
                }
            }
            _ => entry.to_string(),
        };
        self.log.push(line);
    }

    pub fn summary(&self) -> String {
        let mut out = String::from("--- Simulation Summary ---\n");
        out.push_str(&format!(
            "Simulated time: {}\n",
            Self::format_time(self.simulation_time)
        ));
        for (id, flight) in &self.flights {
            out.push_str(&format!("\n{} ({id})\n", flight.name));
            out.push_str(&format!("  Max speed: {:.2} m/s\n", flight.max_speed));
            out.push_str(&format!(
                "  Max height: {}\n",
                Self::format_altitude(flight.max_height)
            ));
            out.push_str(&format!("  Min mass: {:.2} kg\n", flight.min_mass));
            for (state, time) in &flight.state_times {
                out.push_str(&format!(
                    "  State {:?} reached at: {}\n",
                    state,
                    Self::format_time(*time)
                ));
            }
        }
        out
    }
}

impl EventSink for Telemetry {
    fn emit(&mut self, time: f64, event: SimEvent) {
        self.record(&TimedEvent { time, event });
    }
}
