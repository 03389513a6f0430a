use nalgebra::Point3;

use crate::{
    config::SolverConfig,
    geometry::{project_on_plane, signed_angle},
    hinge::Hinge,
    skeleton::Skeleton,
};

use super::lowpass::{alpha_from_tau, ema_angle, PointSmoothing};
use super::reach;

/// Squared length below which a direction in the hinge plane is undefined.
const DEGENERATE_EPSILON: f32 = 1e-12;

/// Outcome of a solver frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Solve {
    /// Chain is not configured, nothing moved.
    Idle,
    /// End effector is within threshold of the target after the given
    /// number of sweeps.
    Converged { iterations: usize },
    /// Iteration budget ran out, the chain holds its last pose.
    Exhausted,
}

impl Solve {
    #[inline]
    pub fn is_converged(&self) -> bool {
        matches!(self, Solve::Converged { .. })
    }
}

impl std::fmt::Display for Solve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Solve::Idle => write!(f, "idle"),
            Solve::Converged { .. } => write!(f, "converged"),
            Solve::Exhausted => write!(f, "exhausted"),
        }
    }
}

/// Cyclic coordinate descent solver for hinge chains.
///
/// Hinges are corrected one at a time from the end effector towards the
/// root. Each correction is capped per sweep, rate limited per second and
/// smoothed before the joint limits are applied.
#[derive(Clone, Debug)]
pub struct CcdSolver {
    config: SolverConfig,
    /// Smoothed target position.
    target: PointSmoothing,
    /// Target the last frame solved for.
    effective_target: Option<Point3<f32>>,
}

impl CcdSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            target: PointSmoothing::new(),
            effective_target: None,
        }
    }

    #[inline]
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Smoothed target position, if any frame was solved.
    #[inline]
    pub fn smoothed_target(&self) -> Option<Point3<f32>> {
        self.target.estimate()
    }

    /// Smoothed and projected target the last frame solved for.
    #[inline]
    pub fn effective_target(&self) -> Option<Point3<f32>> {
        self.effective_target
    }

    /// Drop the target smoothing state.
    pub fn reset(&mut self) {
        self.target.reset();
        self.effective_target = None;
    }

    /// Reach of the chain in its current pose.
    ///
    /// Hinges are ordered root first.
    pub fn reach<S: Skeleton + ?Sized>(
        skeleton: &S,
        hinges: &[Hinge],
        effector: &str,
    ) -> Option<f32> {
        let points = hinges
            .iter()
            .map(|hinge| skeleton.position(hinge.pivot()))
            .chain(std::iter::once(skeleton.position(effector)))
            .collect::<Option<Vec<_>>>()?;

        Some(reach::chain_reach(&points))
    }

    /// Run one frame of the solver.
    ///
    /// Hinges are ordered root first and are corrected in reverse. All nodes
    /// are expected to be present in the skeleton.
    pub fn solve<S: Skeleton + ?Sized>(
        &mut self,
        skeleton: &mut S,
        hinges: &mut [Hinge],
        effector: &str,
        raw_target: &Point3<f32>,
        dt: f32,
    ) -> Solve {
        let Some(root) = hinges.first().and_then(|hinge| skeleton.position(hinge.pivot())) else {
            return Solve::Idle;
        };

        let alpha = alpha_from_tau(self.config.target_tau, dt);
        let smoothed = self.target.fit(raw_target, alpha);

        let target = if self.config.project_unreachable {
            match Self::reach(skeleton, hinges, effector) {
                Some(reach) => reach::project(&smoothed, &root, reach, self.config.reach_slack),
                None => return Solve::Idle,
            }
        } else {
            smoothed
        };

        self.effective_target = Some(target);

        let threshold_sq = self.config.threshold.powi(2);

        for iteration in 0..self.config.iterations {
            let Some(end) = skeleton.position(effector) else {
                return Solve::Idle;
            };

            if (end - target).norm_squared() < threshold_sq {
                return Solve::Converged {
                    iterations: iteration,
                };
            }

            for hinge in hinges.iter_mut().rev() {
                rotate_hinge_towards(skeleton, hinge, effector, &target, dt, &self.config);
            }
        }

        match skeleton.position(effector) {
            Some(end) if (end - target).norm_squared() < threshold_sq => Solve::Converged {
                iterations: self.config.iterations,
            },
            _ => Solve::Exhausted,
        }
    }
}

/// Rotate a single hinge so the end effector swings towards the target.
///
/// Returns the angle change in degrees, or `None` if the hinge was skipped
/// because the end effector or the target lies on the hinge axis.
pub fn rotate_hinge_towards<S: Skeleton + ?Sized>(
    skeleton: &mut S,
    hinge: &mut Hinge,
    effector: &str,
    target: &Point3<f32>,
    dt: f32,
    config: &SolverConfig,
) -> Option<f32> {
    let pivot = skeleton.position(hinge.pivot())?;
    let orientation = skeleton.orientation(hinge.pivot())?;
    let end = skeleton.position(effector)?;

    let world_axis = orientation * *hinge.axis();

    let to_end = project_on_plane(&(end - pivot), &world_axis);
    let to_target = project_on_plane(&(target - pivot), &world_axis);

    if to_end.norm_squared() < DEGENERATE_EPSILON || to_target.norm_squared() < DEGENERATE_EPSILON
    {
        return None;
    }

    let delta_wanted = signed_angle(&to_end, &to_target, &world_axis);

    let previous = hinge.angle_deg();
    hinge.set_angle_deg(step_angle(hinge, delta_wanted, dt, config));

    skeleton.set_local_rotation(hinge.pivot(), hinge.local_rotation());

    Some(hinge.angle_deg() - previous)
}

/// Next hinge angle for a requested correction.
///
/// The correction is capped per sweep and per second, then the proposed
/// absolute angle is limited to the joint bounds before smoothing. A hinge
/// resting against a limit thus accepts no motion beyond it.
pub fn step_angle(hinge: &Hinge, delta_wanted: f32, dt: f32, config: &SolverConfig) -> f32 {
    let mut delta = delta_wanted.clamp(-config.max_deg_per_iter, config.max_deg_per_iter);

    if config.max_deg_per_second > 0.0 {
        let max_step = (config.max_deg_per_second * dt).max(0.0);
        delta = delta.clamp(-max_step, max_step);
    }

    let proposed = hinge.clamp(hinge.angle_deg() + delta);

    let alpha = alpha_from_tau(config.angle_tau, dt);
    let smoothed = ema_angle(hinge.angle_deg(), proposed, alpha);

    hinge.clamp(smoothed)
}

#[cfg(test)]
mod tests {
    use nalgebra::{UnitQuaternion, Vector3};

    use super::*;
    use crate::rig::{names, Rig};

    fn hinge_at(angle_deg: f32, min_deg: f32, max_deg: f32) -> Hinge {
        let mut hinge = Hinge::new("pivot", Vector3::y(), min_deg, max_deg).unwrap();
        hinge.capture_rest(UnitQuaternion::identity());
        hinge.set_angle_deg(angle_deg);
        hinge
    }

    #[test]
    fn test_step_limit_after_cap() {
        let hinge = hinge_at(40.0, -45.0, 45.0);

        let config = SolverConfig::unfiltered();
        assert_eq!(step_angle(&hinge, 20.0, 1.0 / 60.0, &config), 45.0);
    }

    #[test]
    fn test_step_iteration_cap() {
        let hinge = hinge_at(0.0, -45.0, 45.0);

        let config = SolverConfig::unfiltered();
        assert_eq!(step_angle(&hinge, 20.0, 1.0 / 60.0, &config), 6.0);
        assert_eq!(step_angle(&hinge, -20.0, 1.0 / 60.0, &config), -6.0);
        assert_eq!(step_angle(&hinge, 2.5, 1.0 / 60.0, &config), 2.5);
    }

    #[test]
    fn test_step_rate_limit() {
        let hinge = hinge_at(0.0, -45.0, 45.0);

        let config = SolverConfig {
            max_deg_per_second: 60.0,
            ..SolverConfig::unfiltered()
        };

        let angle = step_angle(&hinge, 20.0, 0.05, &config);
        assert!((angle - 3.0).abs() < 1e-5);

        assert_eq!(step_angle(&hinge, 20.0, 0.0, &config), 0.0);
    }

    #[test]
    fn test_step_pinned_at_limit() {
        let hinge = hinge_at(45.0, -45.0, 45.0);

        let config = SolverConfig::unfiltered();
        assert_eq!(step_angle(&hinge, 5.0, 1.0 / 60.0, &config), 45.0);
        assert_eq!(step_angle(&hinge, -5.0, 1.0 / 60.0, &config), 40.0);
    }

    #[test]
    fn test_step_smoothing() {
        let hinge = hinge_at(0.0, -45.0, 45.0);

        let config = SolverConfig {
            angle_tau: 0.1,
            ..SolverConfig::unfiltered()
        };

        let dt = 0.1;
        let angle = step_angle(&hinge, 6.0, dt, &config);
        let expected = 6.0 * alpha_from_tau(0.1, dt);
        assert!((angle - expected).abs() < 1e-4);
        assert!(angle > 0.0 && angle < 6.0);
    }

    #[test]
    fn test_rotate_towards_target() {
        let mut rig = Rig::finger(0.02, 0.015, 0.01);

        let mut hinge = Hinge::new(names::MIDDLE, Vector3::x(), 0.0, 90.0).unwrap();
        hinge.capture_rest(UnitQuaternion::identity());

        // Target below the finger; positive flexion curls towards -Y.
        let target = Point3::new(0.0, -0.02, 0.03);
        let config = SolverConfig::unfiltered();

        let delta = rotate_hinge_towards(&mut rig, &mut hinge, names::EFFECTOR, &target, 0.01, &config);
        assert_eq!(delta, Some(6.0));
        assert_eq!(hinge.angle_deg(), 6.0);

        let expected = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), 6_f32.to_radians());
        assert!(rig.local_rotation(names::MIDDLE).unwrap().angle_to(&expected) < 1e-5);
    }

    #[test]
    fn test_rotate_skips_degenerate() {
        let mut rig = Rig::finger(0.02, 0.015, 0.01);

        let mut hinge = Hinge::new(names::PROXIMAL, Vector3::y(), -45.0, 45.0).unwrap();
        hinge.capture_rest(UnitQuaternion::identity());

        // Straight above the proximal pivot, on its axis.
        let target = Point3::new(0.0, 0.03, 0.0);
        let config = SolverConfig::unfiltered();

        let delta = rotate_hinge_towards(&mut rig, &mut hinge, names::EFFECTOR, &target, 0.01, &config);
        assert_eq!(delta, None);
        assert_eq!(hinge.angle_deg(), 0.0);
        assert_eq!(rig.local_rotation(names::PROXIMAL), Some(UnitQuaternion::identity()));
    }

    #[test]
    fn test_solve_missing_root() {
        let mut rig = Rig::finger(0.02, 0.015, 0.01);

        let mut hinges = [Hinge::new("thumb", Vector3::y(), -45.0, 45.0).unwrap()];
        let mut solver = CcdSolver::new(SolverConfig::default());

        let outcome = solver.solve(&mut rig, &mut hinges, names::EFFECTOR, &Point3::origin(), 0.01);
        assert_eq!(outcome, Solve::Idle);
        assert!(solver.smoothed_target().is_none());
    }

    #[test]
    fn test_solve_display() {
        assert_eq!(Solve::Idle.to_string(), "idle");
        assert_eq!(Solve::Converged { iterations: 3 }.to_string(), "converged");
        assert_eq!(Solve::Exhausted.to_string(), "exhausted");
        assert!(Solve::Converged { iterations: 0 }.is_converged());
        assert!(!Solve::Exhausted.is_converged());
    }
}
