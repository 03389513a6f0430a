// Copyright (C) 2024 Laixer Equipment B.V.
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

//! Inverse kinematics for articulated fingers.
//!
//! A finger is a [`Chain`] of three revolute [`Hinge`]s mounted on a
//! [`Skeleton`]. Every frame the host calls [`Chain::update`] with the raw
//! target position and the elapsed time. The chain smooths the target, pulls
//! it back into reach and runs a cyclic coordinate descent solver that turns
//! the hinges from the fingertip towards the root. The resolved hinge angles
//! are read back with [`Chain::angles`].
//!
//! ```
//! use fingerik_core::{nalgebra::Point3, Chain, ChainConfig, Rig};
//!
//! let mut rig = Rig::finger(0.02, 0.015, 0.01);
//!
//! let mut chain = Chain::from_config(&ChainConfig::default()).unwrap();
//! chain.initialize(&mut rig).unwrap();
//!
//! chain.update(&mut rig, Point3::new(0.0, -0.02, 0.03), 1.0 / 90.0);
//!
//! let [proximal, middle, distal] = chain.angles();
//! assert!(middle >= 0.0 && middle <= 90.0);
//! # let _ = (proximal, distal);
//! ```

pub mod algorithm;
pub mod chain;
pub mod config;
pub mod geometry;
pub mod hinge;
pub mod rig;
pub mod skeleton;

mod error;

pub use nalgebra;

pub use self::algorithm::ccd::Solve;
pub use self::chain::Chain;
pub use self::config::{from_file, ChainConfig, HingeConfig, SolverConfig};
pub use self::error::{Error, Result};
pub use self::hinge::Hinge;
pub use self::rig::{Rig, RigBuilder, Segment};
pub use self::skeleton::Skeleton;

/// Fingerik runtime version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
