use nalgebra::Point3;

use crate::{
    algorithm::ccd::{CcdSolver, Solve},
    config::{ChainConfig, SolverConfig},
    hinge::Hinge,
    skeleton::Skeleton,
    Error, Result,
};

/// Three hinge finger driven towards a moving target.
///
/// The chain owns its hinges and the solver state that carries over between
/// frames. Poses are read from, and written back to, the skeleton passed to
/// each call.
#[derive(Clone, Debug)]
pub struct Chain {
    /// Hinges ordered proximal, middle, distal.
    hinges: [Hinge; 3],
    /// Node at the fingertip.
    effector: String,
    solver: CcdSolver,
    initialized: bool,
    /// Whether the current configuration fault was logged.
    fault_reported: bool,
}

impl Chain {
    /// Construct a new chain.
    ///
    /// The chain is idle until [`Chain::initialize`] captured its rest pose.
    pub fn new(hinges: [Hinge; 3], effector: impl ToString, config: SolverConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            hinges,
            effector: effector.to_string(),
            solver: CcdSolver::new(config),
            initialized: false,
            fault_reported: false,
        })
    }

    /// Construct a chain from configuration.
    pub fn from_config(config: &ChainConfig) -> Result<Self> {
        let hinges = [
            Hinge::try_from(&config.proximal)?,
            Hinge::try_from(&config.middle)?,
            Hinge::try_from(&config.distal)?,
        ];

        Self::new(hinges, &config.effector, config.solver.clone())
    }

    /// Capture the rest pose of every hinge.
    ///
    /// Must be called once before the first update. Every hinge starts at the
    /// angle nearest to zero within its limits.
    pub fn initialize<S: Skeleton + ?Sized>(&mut self, skeleton: &mut S) -> Result<()> {
        if self.initialized {
            return Err(Error::AlreadyInitialized);
        }

        if let Some(node) = self.missing_node(skeleton) {
            return Err(Error::MissingNode(node.to_owned()));
        }

        for hinge in self.hinges.iter_mut() {
            let rest = skeleton
                .local_rotation(hinge.pivot())
                .ok_or_else(|| Error::MissingNode(hinge.pivot().to_owned()))?;

            hinge.capture_rest(rest);
            skeleton.set_local_rotation(hinge.pivot(), hinge.local_rotation());

            log::debug!("Captured rest pose of {}", hinge);
        }

        self.initialized = true;
        self.fault_reported = false;

        Ok(())
    }

    /// Advance the chain by one frame.
    ///
    /// Smooths the raw target, projects it into reach and runs the solver.
    /// An uninitialized chain, one whose nodes went missing, or a frame with a
    /// non-finite target or time step does not move.
    pub fn update<S: Skeleton + ?Sized>(
        &mut self,
        skeleton: &mut S,
        raw_target: Point3<f32>,
        dt: f32,
    ) -> Solve {
        if !self.initialized {
            self.report_fault(|| "chain is not initialized".to_owned());
            return Solve::Idle;
        }

        if let Some(node) = self.missing_node(skeleton) {
            let node = node.to_owned();
            self.report_fault(|| format!("node '{}' not found in skeleton", node));
            return Solve::Idle;
        }

        if !raw_target.coords.iter().all(|c| c.is_finite()) || !dt.is_finite() {
            self.report_fault(|| format!("non-finite input {} dt={}", raw_target, dt));
            return Solve::Idle;
        }

        self.fault_reported = false;

        let outcome = self
            .solver
            .solve(skeleton, &mut self.hinges, &self.effector, &raw_target, dt);

        if let Some(target) = self.solver.effective_target() {
            log::trace!(
                "Target [{:.4}, {:.4}, {:.4}] {} {}",
                target.x,
                target.y,
                target.z,
                outcome,
                self
            );
        }

        outcome
    }

    /// Return every hinge to its rest pose and forget the target history.
    pub fn reset<S: Skeleton + ?Sized>(&mut self, skeleton: &mut S) {
        self.solver.reset();

        if !self.initialized {
            return;
        }

        for hinge in self.hinges.iter_mut() {
            let rest = *hinge.rest();
            hinge.capture_rest(rest);
            skeleton.set_local_rotation(hinge.pivot(), hinge.local_rotation());
        }

        log::debug!("Chain reset to rest pose");
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    #[inline]
    pub fn hinges(&self) -> &[Hinge; 3] {
        &self.hinges
    }

    #[inline]
    pub fn effector(&self) -> &str {
        &self.effector
    }

    #[inline]
    pub fn config(&self) -> &SolverConfig {
        self.solver.config()
    }

    /// Hinge angles in degrees, proximal first.
    pub fn angles(&self) -> [f32; 3] {
        [
            self.hinges[0].angle_deg(),
            self.hinges[1].angle_deg(),
            self.hinges[2].angle_deg(),
        ]
    }

    /// Reach of the chain in the current skeleton pose.
    pub fn reach<S: Skeleton + ?Sized>(&self, skeleton: &S) -> Option<f32> {
        CcdSolver::reach(skeleton, &self.hinges, &self.effector)
    }

    /// Smoothed target position.
    #[inline]
    pub fn smoothed_target(&self) -> Option<Point3<f32>> {
        self.solver.smoothed_target()
    }

    /// Target the last frame solved for, after smoothing and projection.
    #[inline]
    pub fn effective_target(&self) -> Option<Point3<f32>> {
        self.solver.effective_target()
    }

    fn missing_node<S: Skeleton + ?Sized>(&self, skeleton: &S) -> Option<&str> {
        self.hinges
            .iter()
            .map(Hinge::pivot)
            .chain(std::iter::once(self.effector.as_str()))
            .find(|node| !skeleton.contains(node))
    }

    fn report_fault(&mut self, reason: impl FnOnce() -> String) {
        if !self.fault_reported {
            log::warn!("Chain idle: {}", reason());
            self.fault_reported = true;
        }
    }
}

impl std::fmt::Display for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.hinges[0], self.hinges[1], self.hinges[2])
    }
}
