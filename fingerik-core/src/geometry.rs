use nalgebra::{Unit, Vector3};

/// Wrap an angle in degrees into the range `(-180, 180]`.
pub fn normalize_angle(angle: f32) -> f32 {
    let dist_normal = angle.rem_euclid(360.0);

    if dist_normal > 180.0 {
        dist_normal - 360.0
    } else {
        dist_normal
    }
}

/// Calculate the shortest rotation in degrees from `current` to `target`.
#[inline]
pub fn delta_angle(current: f32, target: f32) -> f32 {
    normalize_angle(target - current)
}

/// Remove the component of `vector` along `normal`.
#[inline]
pub fn project_on_plane(vector: &Vector3<f32>, normal: &Unit<Vector3<f32>>) -> Vector3<f32> {
    vector - normal.as_ref() * normal.dot(vector)
}

/// Angle in degrees that rotates `from` onto `to`.
///
/// The magnitude is the unsigned angle between both vectors. The sign follows
/// the right hand rule around `axis`; a rotation counter-clockwise when looking
/// down the axis is positive.
pub fn signed_angle(from: &Vector3<f32>, to: &Vector3<f32>, axis: &Unit<Vector3<f32>>) -> f32 {
    let cross = from.cross(to);
    let angle = cross.norm().atan2(from.dot(to)).to_degrees();

    if axis.dot(&cross) < 0.0 {
        -angle
    } else {
        angle
    }
}
