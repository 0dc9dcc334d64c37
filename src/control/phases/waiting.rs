//! Coasting phases: no thrust, only a completion predicate.

use crate::control::{
    guidance::{Phase, PhaseContext, PhaseTransition},
    planet::PlanetId,
    rocket::Rocket,
};
use crate::telemetry_system::events::SimEvent;
use crate::utils::vector2d::angular_distance;

use super::primary_of;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeightCondition {
    Above,
    Below,
}

/// Coasts until the height over the primary reaches `threshold`.
#[derive(Debug, Clone, PartialEq)]
pub struct WaitForHeight {
    pub threshold: f64,
    pub condition: HeightCondition,
}

impl WaitForHeight {
    pub fn above(threshold: f64) -> Self {
        WaitForHeight {
            threshold,
            condition: HeightCondition::Above,
        }
    }

    pub fn below(threshold: f64) -> Self {
        WaitForHeight {
            threshold,
            condition: HeightCondition::Below,
        }
    }
}

impl Phase for WaitForHeight {
    fn name(&self) -> &'static str {
        match self.condition {
            HeightCondition::Above => "wait_above_height",
            HeightCondition::Below => "wait_below_height",
        }
    }

    fn decide(
        &self,
        rocket: &mut Rocket,
        ctx: &mut PhaseContext<'_>,
        _delta_time: f64,
    ) -> PhaseTransition {
        let Some(planet) = primary_of(rocket, ctx) else {
            return PhaseTransition::Continue;
        };
        let height = rocket.height(planet);
        let done = match self.condition {
            HeightCondition::Above => height >= self.threshold,
            HeightCondition::Below => height <= self.threshold,
        };
        if done {
            PhaseTransition::Complete
        } else {
            PhaseTransition::Continue
        }
    }
}

/// Coasts until the rocket's polar angle around its primary is within
/// `epsilon` of `target_angle`.
#[derive(Debug, Clone, PartialEq)]
pub struct WaitPolarAngle {
    pub target_angle: f64,
    pub epsilon: f64,
}

impl WaitPolarAngle {
    pub fn new(target_angle: f64, epsilon: f64) -> Self {
        WaitPolarAngle {
            target_angle,
            epsilon,
        }
    }
}

impl Phase for WaitPolarAngle {
    fn name(&self) -> &'static str {
        "wait_polar_angle"
    }

    fn decide(
        &self,
        rocket: &mut Rocket,
        ctx: &mut PhaseContext<'_>,
        _delta_time: f64,
    ) -> PhaseTransition {
        let Some(planet) = primary_of(rocket, ctx) else {
            return PhaseTransition::Continue;
        };
        if angular_distance(rocket.polar_angle(planet), self.target_angle) < self.epsilon {
            PhaseTransition::Complete
        } else {
            PhaseTransition::Continue
        }
    }
}

/// Coasts until the rocket sits at `phase_angle` ahead of the direction from
/// `reference` to the rocket's primary, as seen from the primary.
///
/// With `phase_angle = 0` this is the anti-phase position: the rocket is on
/// the far side of its primary from the reference body. When `reparent` is
/// set the reference becomes the rocket's new primary on completion.
#[derive(Debug, Clone, PartialEq)]
pub struct WaitForAlignment {
    pub reference: PlanetId,
    pub phase_angle: f64,
    pub epsilon: f64,
    pub reparent: bool,
}

impl WaitForAlignment {
    pub fn new(reference: PlanetId, phase_angle: f64, epsilon: f64) -> Self {
        WaitForAlignment {
            reference,
            phase_angle,
            epsilon,
            reparent: false,
        }
    }

    pub fn reparenting(mut self) -> Self {
        self.reparent = true;
        self
    }

    /// Angle still to travel, or `None` if either planet is missing.
    pub fn misalignment(&self, rocket: &Rocket, ctx: &PhaseContext<'_>) -> Option<f64> {
        let primary = ctx.planet(rocket.primary())?;
        let reference = ctx.planet(self.reference)?;
        let baseline = reference.position().vector_to(&primary.position()).angle();
        let rocket_angle = rocket.polar_angle(primary);
        Some(angular_distance(rocket_angle, baseline + self.phase_angle))
    }
}

impl Phase for WaitForAlignment {
    fn name(&self) -> &'static str {
        "wait_alignment"
    }

    fn decide(
        &self,
        rocket: &mut Rocket,
        ctx: &mut PhaseContext<'_>,
        _delta_time: f64,
    ) -> PhaseTransition {
        let Some(misalignment) = self.misalignment(rocket, ctx) else {
            tracing::warn!(rocket = %rocket.id, reference = %self.reference, "alignment reference missing");
            return PhaseTransition::Continue;
        };
        if misalignment >= self.epsilon {
            return PhaseTransition::Continue;
        }

        if self.reparent && rocket.primary() != self.reference {
            let from = rocket.reparent(self.reference);
            ctx.emit(SimEvent::PrimaryChanged {
                rocket: rocket.id,
                from,
                to: self.reference,
            });
        }
        PhaseTransition::Complete
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::guidance::PhaseContext;
    use crate::control::phases::test_support::{decide_once, earth, rocket_at};
    use crate::control::planet::Planet;
    use crate::constants::EARTH_RADIUS;
    use crate::telemetry_system::events::EventLog;
    use crate::utils::{point2d::Point2D, vector2d::Vector2D};
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_height_waits() {
        let planets = vec![earth()];
        let mut log = EventLog::new();
        let mut rocket = rocket_at(
            &planets[0],
            Point2D::new(EARTH_RADIUS + 5_000.0, 0.0),
            Vector2D::ZERO,
        );

        let above = WaitForHeight::above(4_000.0);
        let below = WaitForHeight::below(4_000.0);
        assert!(matches!(
            decide_once(&above, &mut rocket, &planets, &mut log, 1.0),
            PhaseTransition::Complete
        ));
        assert!(matches!(
            decide_once(&below, &mut rocket, &planets, &mut log, 1.0),
            PhaseTransition::Continue
        ));
        assert_eq!(above.name(), "wait_above_height");
        assert_eq!(rocket.body.force, Vector2D::ZERO);
    }

    #[test]
    fn test_height_on_the_threshold_completes_both_ways() {
        let planets = vec![earth()];
        let mut log = EventLog::new();
        let mut rocket = rocket_at(
            &planets[0],
            Point2D::new(EARTH_RADIUS + 5_000.0, 0.0),
            Vector2D::ZERO,
        );

        for wait in [WaitForHeight::above(5_000.0), WaitForHeight::below(5_000.0)] {
            assert!(matches!(
                decide_once(&wait, &mut rocket, &planets, &mut log, 1.0),
                PhaseTransition::Complete
            ));
        }
    }

    #[test]
    fn test_polar_angle_wraps_around_zero() {
        let planets = vec![earth()];
        let mut log = EventLog::new();
        let position = Point2D::ORIGIN + Vector2D::from_polar(-0.01, EARTH_RADIUS + 1e5);
        let mut rocket = rocket_at(&planets[0], position, Vector2D::ZERO);

        let near_zero = WaitPolarAngle::new(0.0, 0.05);
        assert!(matches!(
            decide_once(&near_zero, &mut rocket, &planets, &mut log, 1.0),
            PhaseTransition::Complete
        ));
        let opposite = WaitPolarAngle::new(PI, 0.05);
        assert!(matches!(
            decide_once(&opposite, &mut rocket, &planets, &mut log, 1.0),
            PhaseTransition::Continue
        ));
    }

    fn sun_and_earth() -> Vec<Planet> {
        let sun = Planet::new(
            PlanetId(0),
            "Sun",
            1.989e30,
            6.96e8,
            Point2D::ORIGIN,
            Vector2D::ZERO,
        );
        let mut earth = earth();
        earth.id = PlanetId(1);
        earth.body.position = Point2D::new(1.496e11, 0.0);
        vec![sun, earth]
    }

    #[test]
    fn test_alignment_reparents_once_aligned() {
        let planets = sun_and_earth();
        let mut log = EventLog::new();
        // on the far side of the Earth from the Sun
        let mut rocket = rocket_at(
            &planets[1],
            Point2D::new(1.496e11 + EARTH_RADIUS + 4e5, 0.0),
            Vector2D::ZERO,
        );

        let phase = WaitForAlignment::new(PlanetId(0), 0.0, 1e-3).reparenting();
        let transition = decide_once(&phase, &mut rocket, &planets, &mut log, 1.0);

        assert!(matches!(transition, PhaseTransition::Complete));
        assert_eq!(rocket.primary(), PlanetId(0));
        assert_eq!(
            log.events()[0].event,
            SimEvent::PrimaryChanged {
                rocket: rocket.id,
                from: PlanetId(1),
                to: PlanetId(0),
            }
        );
    }

    #[test]
    fn test_alignment_waits_with_phase_offset() {
        let planets = sun_and_earth();
        let mut log = EventLog::new();
        let mut rocket = rocket_at(
            &planets[1],
            Point2D::new(1.496e11 + EARTH_RADIUS + 4e5, 0.0),
            Vector2D::ZERO,
        );

        let phase = WaitForAlignment::new(PlanetId(0), FRAC_PI_2, 1e-3).reparenting();
        let transition = decide_once(&phase, &mut rocket, &planets, &mut log, 1.0);
        assert!(matches!(transition, PhaseTransition::Continue));
        assert_eq!(rocket.primary(), PlanetId(1));

        let ctx = PhaseContext::new(&planets, 0.0, &mut log);
        let left = phase.misalignment(&rocket, &ctx).expect("both planets exist");
        assert!((left - FRAC_PI_2).abs() < 1e-9);
    }
}
