use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3};

use crate::skeleton::Skeleton;

/// Default node names of a finger rig.
pub mod names {
    pub const PROXIMAL: &str = "proximal";
    pub const MIDDLE: &str = "middle";
    pub const DISTAL: &str = "distal";
    pub const EFFECTOR: &str = "effector";
}

/// Rigid segment of a rig.
///
/// The segment origin is offset from the parent origin, expressed in the
/// parent frame. The rotation turns the segment around its own origin.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    isometry: Isometry3<f32>,
}

impl Segment {
    pub fn new(offset: Vector3<f32>) -> Self {
        Self {
            isometry: Isometry3::from_parts(Translation3::from(offset), UnitQuaternion::identity()),
        }
    }

    pub fn with_rotation(mut self, rotation: UnitQuaternion<f32>) -> Self {
        self.isometry.rotation = rotation;
        self
    }

    #[inline]
    pub fn rotation(&self) -> UnitQuaternion<f32> {
        self.isometry.rotation
    }

    #[inline]
    pub fn set_rotation(&mut self, rotation: UnitQuaternion<f32>) {
        self.isometry.rotation = rotation;
    }

    #[inline]
    pub fn transformation(&self) -> &Isometry3<f32> {
        &self.isometry
    }
}

/// Serial chain of named segments under a root transform.
///
/// Every segment is the child of the segment before it. World poses are
/// recomputed on each query, so a rotation written to a segment is visible
/// to all segments after it immediately.
#[derive(Clone, Debug)]
pub struct Rig {
    root: Isometry3<f32>,
    segments: Vec<(String, Segment)>,
}

impl Rig {
    /// Construct a straight finger along the local Z axis.
    ///
    /// The proximal pivot sits at the origin, the middle and distal pivots
    /// follow at the given bone lengths and the end effector at the tip of
    /// the distal bone.
    pub fn finger(proximal: f32, middle: f32, distal: f32) -> Self {
        RigBuilder::default()
            .attach_segment(names::PROXIMAL, Segment::new(Vector3::zeros()))
            .attach_segment(names::MIDDLE, Segment::new(Vector3::new(0.0, 0.0, proximal)))
            .attach_segment(names::DISTAL, Segment::new(Vector3::new(0.0, 0.0, middle)))
            .attach_segment(names::EFFECTOR, Segment::new(Vector3::new(0.0, 0.0, distal)))
            .build()
    }

    pub fn segment(&self, name: &str) -> Option<&Segment> {
        self.segments
            .iter()
            .find(|(sname, _)| sname == name)
            .map(|(_, segment)| segment)
    }

    pub fn segment_mut(&mut self, name: &str) -> Option<&mut Segment> {
        self.segments
            .iter_mut()
            .find(|(sname, _)| sname == name)
            .map(|(_, segment)| segment)
    }

    /// Accumulated transform from the world frame to the named segment.
    pub fn world_transformation(&self, name: &str) -> Option<Isometry3<f32>> {
        let mut transform = self.root;

        for (sname, segment) in &self.segments {
            transform *= *segment.transformation();

            if sname == name {
                return Some(transform);
            }
        }

        None
    }
}

impl Skeleton for Rig {
    fn position(&self, node: &str) -> Option<Point3<f32>> {
        self.world_transformation(node)
            .map(|transform| transform * Point3::origin())
    }

    fn orientation(&self, node: &str) -> Option<UnitQuaternion<f32>> {
        self.world_transformation(node)
            .map(|transform| transform.rotation)
    }

    fn local_rotation(&self, node: &str) -> Option<UnitQuaternion<f32>> {
        self.segment(node).map(Segment::rotation)
    }

    fn set_local_rotation(&mut self, node: &str, rotation: UnitQuaternion<f32>) -> bool {
        match self.segment_mut(node) {
            Some(segment) => {
                segment.set_rotation(rotation);
                true
            }
            None => false,
        }
    }
}

impl std::fmt::Display for Rig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (name, _) in &self.segments {
            if let Some(point) = self.position(name) {
                write!(f, "{}=[{:.4}, {:.4}, {:.4}] ", name, point.x, point.y, point.z)?;
            }
        }

        Ok(())
    }
}

#[derive(Default)]
pub struct RigBuilder {
    root: Option<Isometry3<f32>>,
    segments: Vec<(String, Segment)>,
}

impl RigBuilder {
    pub fn new(root: Isometry3<f32>) -> Self {
        Self {
            root: Some(root),
            segments: Vec::new(),
        }
    }

    pub fn attach_segment(mut self, name: impl ToString, segment: Segment) -> Self {
        self.segments.push((name.to_string(), segment));
        self
    }

    pub fn build(self) -> Rig {
        Rig {
            root: self.root.unwrap_or_else(Isometry3::identity),
            segments: self.segments,
        }
    }
}
