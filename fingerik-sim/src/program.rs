use std::{collections::VecDeque, path::Path};

use fingerik_core::nalgebra::Point3;

/// Sequence of fingertip targets.
pub struct Program(VecDeque<Point3<f32>>);

impl Program {
    pub fn load<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let str = std::fs::read_to_string(path)?;
        let targets: VecDeque<Point3<f32>> = serde_json::from_str::<Vec<[f32; 3]>>(&str)?
            .iter()
            .map(|&[x, y, z]| Point3::new(x, y, z))
            .collect();

        Ok(Self(targets))
    }

    /// Curl the finger in, sweep it sideways and stretch it out of reach.
    pub fn sweep(reach: f32) -> Self {
        [
            [0.0, -0.2, 0.9],
            [0.0, -0.5, 0.6],
            [0.0, -0.7, 0.2],
            [0.3, -0.5, 0.5],
            [-0.3, -0.5, 0.5],
            [0.0, 0.0, 1.3],
            [0.0, -0.6, 0.4],
        ]
        .iter()
        .map(|&[x, y, z]| Point3::new(x, y, z) * reach)
        .collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn next(&mut self) -> Option<Point3<f32>> {
        self.0.pop_front()
    }
}

impl FromIterator<Point3<f32>> for Program {
    fn from_iter<T: IntoIterator<Item = Point3<f32>>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
