use nalgebra::Point3;

/// Fraction of the reach a projected target is placed at.
pub const DEFAULT_REACH_SLACK: f32 = 0.995;

/// Maximum extent of a serial chain through the given points.
///
/// This is the sum of the distances between consecutive points, root first
/// and end effector last.
pub fn chain_reach(points: &[Point3<f32>]) -> f32 {
    points
        .windows(2)
        .map(|pair| nalgebra::distance(&pair[0], &pair[1]))
        .sum()
}

/// Pull an unreachable target back inside the reach sphere around `root`.
///
/// Targets within `reach` are returned unchanged. Targets beyond are placed
/// on the ray from the root towards the target at `reach * slack`, keeping
/// the chain out of its fully extended pose.
pub fn project(target: &Point3<f32>, root: &Point3<f32>, reach: f32, slack: f32) -> Point3<f32> {
    let to_target = target - root;

    if to_target.norm() <= reach {
        return *target;
    }

    root + to_target.normalize() * (reach * slack)
}
