use crate::utils::vector2d::Vector2D;

/// What happened to a single engine-fire request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FireOutcome {
    /// Thrust applied; `fuel_consumed` kg of propellant burnt.
    Fired { fuel_consumed: f64 },
    /// Zero thrust requested, nothing to do.
    Idle,
    /// The burn would have dropped the mass below the payload floor. No thrust
    /// was applied and the mass is unchanged.
    Exhausted,
}

impl FireOutcome {
    pub fn is_fired(&self) -> bool {
        matches!(self, FireOutcome::Fired { .. })
    }
}

/// Reaction engine characterised only by its effective exhaust speed.
#[derive(Debug, Clone, PartialEq)]
pub struct PropulsionSystem {
    pub fuel_speed: f64,
    pub current_thrust: Vector2D,
    pub total_fuel_consumed: f64,
    exhausted: bool,
}

impl PropulsionSystem {
    pub fn new(fuel_speed: f64) -> Self {
        PropulsionSystem {
            fuel_speed,
            current_thrust: Vector2D::ZERO,
            total_fuel_consumed: 0.0,
            exhausted: false,
        }
    }

    /// Propellant mass needed to sustain `thrust` newtons for `delta_time`.
    pub fn calculate_fuel_consumption(&self, thrust: f64, delta_time: f64) -> f64 {
        thrust * delta_time / self.fuel_speed
    }

    /// Burns propellant from `mass` for `thrust` over `delta_time`, refusing
    /// any burn that would leave less than `payload_mass`. Returns the outcome;
    /// the thrust that was actually delivered is kept in `current_thrust`.
    pub fn fire(
        &mut self,
        mass: &mut f64,
        payload_mass: f64,
        thrust: Vector2D,
        delta_time: f64,
    ) -> FireOutcome {
        let magnitude = thrust.magnitude();
        if magnitude == 0.0 || delta_time <= 0.0 {
            return FireOutcome::Idle;
        }
        if !magnitude.is_finite() {
            return FireOutcome::Idle;
        }

        let fuel_consumed = self.calculate_fuel_consumption(magnitude, delta_time);
        if *mass - fuel_consumed < payload_mass {
            self.exhausted = true;
            return FireOutcome::Exhausted;
        }

        *mass -= fuel_consumed;
        self.current_thrust += thrust;
        self.total_fuel_consumed += fuel_consumed;
        FireOutcome::Fired { fuel_consumed }
    }

    /// Clears the per-tick delivered thrust.
    pub fn reset(&mut self) {
        self.current_thrust = Vector2D::ZERO;
    }

    pub fn get_thrust(&self) -> f64 {
        self.current_thrust.magnitude()
    }

    /// Whether any burn has ever been refused for lack of propellant.
    pub fn is_out_of_fuel(&self) -> bool {
        self.exhausted
    }
}
