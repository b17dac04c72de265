#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! Simulator facade for the rope-linked vehicle group.
//!
//! The physics engine that owns rigid-body dynamics, rope constraint solving
//! and scene management lives behind the [`RigView`] trait: the task layer
//! only reads and writes poses, velocities, joint state and masses, addressed
//! by optional instance-index subsets. A deterministic in-memory
//! implementation, [`MockRig`], is available behind the `mock` feature for
//! tests and demos.

pub mod model;
pub mod scene;
pub mod view;

#[cfg(feature = "mock")]
pub mod mock;

pub use model::VehicleModel;
pub use scene::{BodySpec, Shape};
pub use view::{Pose, RigView, Twist, VehicleState};

#[cfg(feature = "mock")]
pub use mock::MockRig;
