use fingerik_core::{
    nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3},
    ChainConfig, Rig, RigBuilder, Segment,
};

#[derive(Clone, Debug, serde_derive::Deserialize, PartialEq)]
pub struct SegmentConfig {
    /// Node name.
    pub name: String,
    /// Offset from the parent node in the parent frame.
    #[serde(default)]
    pub offset: [f32; 3],
    /// Initial roll, pitch and yaw in degrees.
    #[serde(default)]
    pub rotation: [f32; 3],
}

impl SegmentConfig {
    fn new(name: impl ToString, offset: [f32; 3]) -> Self {
        Self {
            name: name.to_string(),
            offset,
            rotation: [0.0; 3],
        }
    }
}

#[derive(Clone, Debug, serde_derive::Deserialize, PartialEq)]
pub struct RigConfig {
    /// Root position in the world frame.
    #[serde(default)]
    pub origin: [f32; 3],
    /// Segments, root first.
    pub segment: Vec<SegmentConfig>,
}

impl Default for RigConfig {
    fn default() -> Self {
        use fingerik_core::rig::names;

        Self {
            origin: [0.0; 3],
            segment: vec![
                SegmentConfig::new(names::PROXIMAL, [0.0, 0.0, 0.0]),
                SegmentConfig::new(names::MIDDLE, [0.0, 0.0, 0.02]),
                SegmentConfig::new(names::DISTAL, [0.0, 0.0, 0.015]),
                SegmentConfig::new(names::EFFECTOR, [0.0, 0.0, 0.01]),
            ],
        }
    }
}

impl RigConfig {
    pub fn build(&self) -> Rig {
        let [x, y, z] = self.origin;

        let builder = RigBuilder::new(Isometry3::from_parts(
            Translation3::new(x, y, z),
            UnitQuaternion::identity(),
        ));

        self.segment
            .iter()
            .fold(builder, |builder, segment| {
                let [x, y, z] = segment.offset;
                let [roll, pitch, yaw] = segment.rotation;

                builder.attach_segment(
                    &segment.name,
                    Segment::new(Vector3::new(x, y, z)).with_rotation(
                        UnitQuaternion::from_euler_angles(
                            roll.to_radians(),
                            pitch.to_radians(),
                            yaw.to_radians(),
                        ),
                    ),
                )
            })
            .build()
    }
}

#[derive(Clone, Debug, Default, serde_derive::Deserialize, PartialEq)]
pub struct SimConfig {
    /// Kinematic rig the finger is mounted on.
    #[serde(default)]
    pub rig: RigConfig,
    /// Finger chain.
    #[serde(default)]
    pub chain: ChainConfig,
}

#[cfg(test)]
mod tests {
    use fingerik_core::{nalgebra::Point3, Skeleton};

    use super::*;

    #[test]
    fn test_default_rig() {
        let rig = RigConfig::default().build();

        let effector = rig.position("effector").unwrap();
        assert!((effector - Point3::new(0.0, 0.0, 0.045)).norm() < 1e-6);
    }

    #[test]
    fn test_parse() {
        let config: SimConfig = fingerik_core::config::from_str(
            r#"
            [rig]
            origin = [0.1, 0.0, 0.0]

            [[rig.segment]]
            name = "index1"

            [[rig.segment]]
            name = "index2"
            offset = [0.0, 0.0, 0.03]

            [[rig.segment]]
            name = "index3"
            offset = [0.0, 0.0, 0.02]
            rotation = [10.0, 0.0, 0.0]

            [[rig.segment]]
            name = "index_tip"
            offset = [0.0, 0.0, 0.015]

            [chain]
            effector = "index_tip"
            proximal = { pivot = "index1", axis = [0.0, 1.0, 0.0], min_deg = -20.0, max_deg = 20.0 }
            middle = { pivot = "index2", min_deg = 0.0, max_deg = 90.0 }
            distal = { pivot = "index3", min_deg = 0.0, max_deg = 90.0 }

            [chain.solver]
            iterations = 16
            "#,
        )
        .unwrap();

        assert_eq!(config.rig.segment.len(), 4);
        assert_eq!(config.rig.segment[2].rotation, [10.0, 0.0, 0.0]);
        assert_eq!(config.chain.effector, "index_tip");
        assert_eq!(config.chain.solver.iterations, 16);

        let rig = config.rig.build();
        assert_eq!(rig.position("index1"), Some(Point3::new(0.1, 0.0, 0.0)));
    }
}
