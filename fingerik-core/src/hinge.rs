use nalgebra::{Unit, UnitQuaternion, Vector3};

use crate::{config::HingeConfig, Error, Result};

/// Revolute joint with a single rotation axis.
///
/// The hinge keeps one scalar of state, the accumulated angle in degrees
/// around its local axis. The pivot pose is always rebuilt from the rest
/// rotation captured at initialization and this angle.
#[derive(Clone, Debug)]
pub struct Hinge {
    /// Skeleton node the hinge rotates.
    pivot: String,
    /// Rotation axis in the pivot frame.
    axis: Unit<Vector3<f32>>,
    /// Joint limits in degrees, inclusive.
    bounds: (f32, f32),
    /// Local pivot rotation at initialization.
    rest: UnitQuaternion<f32>,
    /// Current rotation from rest in degrees.
    angle_deg: f32,
}

impl Hinge {
    /// Construct a new hinge.
    ///
    /// The axis does not have to be normalized, but must not be zero.
    pub fn new(pivot: impl ToString, axis: Vector3<f32>, min_deg: f32, max_deg: f32) -> Result<Self> {
        let pivot = pivot.to_string();

        if !axis.iter().all(|c| c.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "hinge '{}' has a non-finite rotation axis",
                pivot
            )));
        }

        let axis = Unit::try_new(axis, f32::EPSILON).ok_or_else(|| {
            Error::InvalidConfig(format!("hinge '{}' has a zero rotation axis", pivot))
        })?;

        if !(min_deg <= max_deg) {
            return Err(Error::InvalidConfig(format!(
                "hinge '{}' lower limit {} exceeds upper limit {}",
                pivot, min_deg, max_deg
            )));
        }

        Ok(Self {
            pivot,
            axis,
            bounds: (min_deg, max_deg),
            rest: UnitQuaternion::identity(),
            angle_deg: 0.0,
        })
    }

    #[inline]
    pub fn pivot(&self) -> &str {
        &self.pivot
    }

    #[inline]
    pub fn axis(&self) -> &Unit<Vector3<f32>> {
        &self.axis
    }

    #[inline]
    pub fn bounds(&self) -> (f32, f32) {
        self.bounds
    }

    #[inline]
    pub fn rest(&self) -> &UnitQuaternion<f32> {
        &self.rest
    }

    /// Current hinge angle in degrees.
    #[inline]
    pub fn angle_deg(&self) -> f32 {
        self.angle_deg
    }

    /// Limit an angle to the joint bounds.
    #[inline]
    pub fn clamp(&self, angle_deg: f32) -> f32 {
        angle_deg.clamp(self.bounds.0, self.bounds.1)
    }

    #[inline]
    pub fn is_within_bounds(&self) -> bool {
        self.angle_deg >= self.bounds.0 && self.angle_deg <= self.bounds.1
    }

    /// Pivot rotation relative to its parent for the current angle.
    pub fn local_rotation(&self) -> UnitQuaternion<f32> {
        self.rest * UnitQuaternion::from_axis_angle(&self.axis, self.angle_deg.to_radians())
    }

    /// Take `rest` as the reference pose and move to the angle nearest zero
    /// within the joint limits.
    pub(crate) fn capture_rest(&mut self, rest: UnitQuaternion<f32>) {
        self.rest = rest;
        self.angle_deg = self.clamp(0.0);
    }

    /// Set the angle, limited to the joint bounds.
    ///
    /// A NaN angle is ignored.
    pub(crate) fn set_angle_deg(&mut self, angle_deg: f32) {
        if angle_deg.is_nan() {
            return;
        }
        self.angle_deg = self.clamp(angle_deg);
    }
}

impl TryFrom<&HingeConfig> for Hinge {
    type Error = Error;

    fn try_from(config: &HingeConfig) -> Result<Self> {
        let [x, y, z] = config.axis;

        Self::new(&config.pivot, Vector3::new(x, y, z), config.min_deg, config.max_deg)
    }
}

impl std::fmt::Display for Hinge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}={:5.2}° [{:.1}°, {:.1}°]",
            self.pivot, self.angle_deg, self.bounds.0, self.bounds.1
        )
    }
}
