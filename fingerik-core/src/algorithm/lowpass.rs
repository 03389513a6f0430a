use nalgebra::Point3;

/// Lower bound on the time constant to keep the exponent finite.
const TAU_EPSILON: f32 = 1e-6;

/// Blend factor of a first order lowpass filter over an interval `dt`.
///
/// This is the exact discretization `1 - exp(-dt / tau)`. A time constant of
/// zero or less disables smoothing and yields 1.
pub fn alpha_from_tau(tau: f32, dt: f32) -> f32 {
    if tau <= 0.0 {
        return 1.0;
    }

    1.0 - (-dt / tau.max(TAU_EPSILON)).exp()
}

/// Move `prev` a fraction `alpha` towards `raw`.
pub fn ema_position(prev: &Point3<f32>, raw: &Point3<f32>, alpha: f32) -> Point3<f32> {
    if alpha >= 1.0 {
        return *raw;
    }

    prev + (raw - prev) * alpha
}

/// Move `current` a fraction `alpha` towards `target` along the shortest arc.
///
/// Angles are in degrees. The interpolation never takes the long way around
/// the 360 degree boundary.
pub fn ema_angle(current: f32, target: f32, alpha: f32) -> f32 {
    if alpha >= 1.0 {
        return target;
    }

    current + crate::geometry::delta_angle(current, target) * alpha.clamp(0.0, 1.0)
}

/// Exponential smoothing filter for points in space.
///
/// The first observed point seeds the filter.
#[derive(Clone, Debug, Default)]
pub struct PointSmoothing {
    /// Best estimate for the point.
    s_t: Option<Point3<f32>>,
}

impl PointSmoothing {
    /// Construct the lowpass filter.
    #[inline]
    pub fn new() -> Self {
        Self { s_t: None }
    }

    /// Feed the next point to the filter, then return the best estimate.
    pub fn fit(&mut self, value: &Point3<f32>, alpha: f32) -> Point3<f32> {
        let s0 = match self.s_t {
            Some(s_t) => ema_position(&s_t, value, alpha),
            None => *value,
        };
        self.s_t = Some(s0);
        s0
    }

    /// Current estimate, if any point was observed.
    #[inline]
    pub fn estimate(&self) -> Option<Point3<f32>> {
        self.s_t
    }

    /// Forget all observed points.
    #[inline]
    pub fn reset(&mut self) {
        self.s_t = None;
    }
}
