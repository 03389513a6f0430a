use std::path::Path;

use crate::{Error, Result};

/// Iteration budget bounds accepted by the solver.
pub const ITERATIONS_RANGE: std::ops::RangeInclusive<usize> = 1..=50;

/// Reach slack bounds accepted by the solver.
pub const REACH_SLACK_RANGE: std::ops::RangeInclusive<f32> = 0.90..=1.00;

/// Solver configuration.
///
/// Every field falls back to its default when left out of a configuration
/// file.
#[derive(Clone, Debug, PartialEq, serde_derive::Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Maximum number of CCD sweeps per frame.
    pub iterations: usize,
    /// End effector distance at which the target counts as reached.
    pub threshold: f32,
    /// Maximum hinge rotation in degrees within a single sweep.
    pub max_deg_per_iter: f32,
    /// Hinge rate limit in degrees per second. Zero disables the limit.
    pub max_deg_per_second: f32,
    /// Hinge angle smoothing time constant in seconds. Zero or less disables smoothing.
    pub angle_tau: f32,
    /// Target position smoothing time constant in seconds. Zero or less disables smoothing.
    pub target_tau: f32,
    /// Whether targets out of reach are pulled back onto the reach sphere.
    pub project_unreachable: bool,
    /// Fraction of the reach an unreachable target is projected to.
    pub reach_slack: f32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            iterations: 12,
            threshold: 0.003,
            max_deg_per_iter: 6.0,
            max_deg_per_second: 360.0,
            angle_tau: 0.12,
            target_tau: 0.08,
            project_unreachable: true,
            reach_slack: crate::algorithm::reach::DEFAULT_REACH_SLACK,
        }
    }
}

impl SolverConfig {
    /// Solver without any smoothing or rate limiting.
    pub fn unfiltered() -> Self {
        Self {
            max_deg_per_second: 0.0,
            angle_tau: 0.0,
            target_tau: 0.0,
            ..Default::default()
        }
    }

    /// Check every value against its accepted range.
    pub fn validate(&self) -> Result<()> {
        if !ITERATIONS_RANGE.contains(&self.iterations) {
            return Err(Error::InvalidConfig(format!(
                "iterations must be within {:?}, got {}",
                ITERATIONS_RANGE, self.iterations
            )));
        }
        if !(self.threshold > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "threshold must be positive, got {}",
                self.threshold
            )));
        }
        if !(self.max_deg_per_iter > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "max_deg_per_iter must be positive, got {}",
                self.max_deg_per_iter
            )));
        }
        if !(self.max_deg_per_second >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "max_deg_per_second must not be negative, got {}",
                self.max_deg_per_second
            )));
        }
        if self.angle_tau.is_nan() || self.target_tau.is_nan() {
            return Err(Error::InvalidConfig("time constants must be numbers".to_owned()));
        }
        if !REACH_SLACK_RANGE.contains(&self.reach_slack) {
            return Err(Error::InvalidConfig(format!(
                "reach_slack must be within {:?}, got {}",
                REACH_SLACK_RANGE, self.reach_slack
            )));
        }

        Ok(())
    }
}

/// Single hinge configuration.
#[derive(Clone, Debug, PartialEq, serde_derive::Deserialize)]
pub struct HingeConfig {
    /// Skeleton node the hinge rotates.
    pub pivot: String,
    /// Rotation axis in the pivot frame.
    #[serde(default = "HingeConfig::default_axis")]
    pub axis: [f32; 3],
    /// Lower joint limit in degrees.
    pub min_deg: f32,
    /// Upper joint limit in degrees.
    pub max_deg: f32,
}

impl HingeConfig {
    fn default_axis() -> [f32; 3] {
        [1.0, 0.0, 0.0]
    }

    /// Side to side hinge at the finger base.
    pub fn abduction(pivot: impl ToString) -> Self {
        Self {
            pivot: pivot.to_string(),
            axis: [0.0, 1.0, 0.0],
            min_deg: -45.0,
            max_deg: 45.0,
        }
    }

    /// Curling hinge.
    pub fn flexion(pivot: impl ToString) -> Self {
        Self {
            pivot: pivot.to_string(),
            axis: Self::default_axis(),
            min_deg: 0.0,
            max_deg: 90.0,
        }
    }
}

/// Three hinge finger chain configuration.
#[derive(Clone, Debug, PartialEq, serde_derive::Deserialize)]
pub struct ChainConfig {
    /// Hinge nearest to the root.
    pub proximal: HingeConfig,
    pub middle: HingeConfig,
    /// Hinge nearest to the end effector.
    pub distal: HingeConfig,
    /// Skeleton node at the fingertip.
    pub effector: String,
    /// Solver settings.
    #[serde(default)]
    pub solver: SolverConfig,
}

impl Default for ChainConfig {
    fn default() -> Self {
        use crate::rig::names;

        Self {
            proximal: HingeConfig::abduction(names::PROXIMAL),
            middle: HingeConfig::flexion(names::MIDDLE),
            distal: HingeConfig::flexion(names::DISTAL),
            effector: names::EFFECTOR.to_owned(),
            solver: SolverConfig::default(),
        }
    }
}

/// Read a configuration from a TOML file.
pub fn from_file<T: serde::de::DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let contents = std::fs::read_to_string(path)?;

    from_str(&contents)
}

/// Parse a configuration from a TOML document.
pub fn from_str<T: serde::de::DeserializeOwned>(contents: &str) -> Result<T> {
    Ok(toml::from_str(contents)?)
}
