use nalgebra::{Point3, UnitQuaternion};

/// Read and write access to the transform hierarchy a chain is mounted on.
///
/// Nodes are addressed by name. The hierarchy itself is owned elsewhere, the
/// solver only queries world poses and writes back the local rotation of the
/// hinge pivots it drives. Every lookup returns `None` when the node is
/// unknown.
pub trait Skeleton {
    /// World position of the node origin.
    fn position(&self, node: &str) -> Option<Point3<f32>>;

    /// World orientation of the node.
    fn orientation(&self, node: &str) -> Option<UnitQuaternion<f32>>;

    /// Rotation of the node relative to its parent.
    fn local_rotation(&self, node: &str) -> Option<UnitQuaternion<f32>>;

    /// Replace the rotation of the node relative to its parent.
    ///
    /// Returns false if the node is unknown.
    fn set_local_rotation(&mut self, node: &str, rotation: UnitQuaternion<f32>) -> bool;

    /// Whether the node exists.
    #[inline]
    fn contains(&self, node: &str) -> bool {
        self.position(node).is_some()
    }
}
