//! The view trait the task layer drives the simulator through.

use batch::Tensor;
use glam::{Quat, Vec3};

use crate::model::VehicleModel;
use crate::scene::BodySpec;

/// World-space position and orientation.
#[derive(Copy, Clone, Debug, Default)]
pub struct Pose {
    pub pos: Vec3,
    pub rot: Quat,
}

impl Pose {
    #[must_use]
    pub const fn new(pos: Vec3, rot: Quat) -> Self {
        Self { pos, rot }
    }
}

/// Linear and angular velocity of one body.
#[derive(Copy, Clone, Debug, Default)]
pub struct Twist {
    pub linear: Vec3,
    pub angular: Vec3,
}

impl Twist {
    pub const ZERO: Self = Self {
        linear: Vec3::ZERO,
        angular: Vec3::ZERO,
    };

    /// Flattens into `[linear(3), angular(3)]`.
    pub fn write_to(&self, out: &mut [f32]) {
        out[..3].copy_from_slice(&self.linear.to_array());
        out[3..6].copy_from_slice(&self.angular.to_array());
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.linear.is_finite() && self.angular.is_finite()
    }
}

/// Kinematic state of one vehicle as reported by the simulator.
///
/// Flattened layout: `[pos(3), rot(4), linvel(3), angvel(3), heading(3),
/// up(3), throttle(4)]`, 23 values for the quadrotor presets.
#[derive(Copy, Clone, Debug, Default)]
pub struct VehicleState {
    pub pos: Vec3,
    pub rot: Quat,
    pub linvel: Vec3,
    pub angvel: Vec3,
    pub heading: Vec3,
    pub up: Vec3,
    pub throttle: [f32; 4],
}

impl VehicleState {
    /// Flattened dimension for the quadrotor presets.
    pub const DIM: usize = 23;

    /// Writes the full 23-value layout.
    pub fn write_state(&self, out: &mut [f32]) {
        out[..3].copy_from_slice(&self.pos.to_array());
        self.write_kinematics(&mut out[3..]);
    }

    /// Writes everything except the position (20 values), the slice each
    /// agent observes of itself and of the payload-relative features.
    pub fn write_kinematics(&self, out: &mut [f32]) {
        out[..4].copy_from_slice(&self.rot.to_array());
        out[4..7].copy_from_slice(&self.linvel.to_array());
        out[7..10].copy_from_slice(&self.angvel.to_array());
        out[10..13].copy_from_slice(&self.heading.to_array());
        out[13..16].copy_from_slice(&self.up.to_array());
        out[16..20].copy_from_slice(&self.throttle);
    }

    /// Writes rotation plus linear/angular velocity (10 values), the slice
    /// agents observe of each other.
    pub fn write_rot_vel(&self, out: &mut [f32]) {
        out[..4].copy_from_slice(&self.rot.to_array());
        out[4..7].copy_from_slice(&self.linvel.to_array());
        out[7..10].copy_from_slice(&self.angvel.to_array());
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.pos.is_finite()
            && self.rot.is_finite()
            && self.linvel.is_finite()
            && self.angvel.is_finite()
            && self.heading.is_finite()
            && self.up.is_finite()
            && self.throttle.iter().all(|v| v.is_finite())
    }
}

/// Facade over the simulator-owned vehicle group (vehicles + rope + payload)
/// replicated across parallel instances.
///
/// Every get/set takes an optional subset of instance indices; `None`
/// addresses all instances in order. Invalid indices or mismatched slice
/// lengths are programming errors and panic, as faults from the simulation
/// collaborator are not recoverable here.
pub trait RigView {
    fn instances(&self) -> usize;
    fn vehicle_count(&self) -> usize;
    fn model(&self) -> &VehicleModel;

    /// World pose of the group articulation root, per addressed instance.
    fn group_poses(&self, ids: Option<&[usize]>) -> Vec<Pose>;
    fn set_group_poses(&mut self, poses: &[Pose], ids: Option<&[usize]>);
    fn group_velocities(&self, ids: Option<&[usize]>) -> Vec<Twist>;
    fn set_group_velocities(&mut self, vels: &[Twist], ids: Option<&[usize]>);

    /// Number of articulated rope joints per instance.
    fn joint_count(&self) -> usize;
    /// Per-joint limit magnitudes, length [`Self::joint_count`].
    fn joint_limits(&self) -> &[f32];
    /// Joint positions, shape `[k, joint_count]` over the addressed subset.
    fn joint_positions(&self, ids: Option<&[usize]>) -> Tensor;
    fn set_joint_positions(&mut self, positions: &Tensor, ids: Option<&[usize]>);
    fn set_joint_velocities(&mut self, velocities: &Tensor, ids: Option<&[usize]>);

    /// Kinematic state of every vehicle, `[instance][vehicle]`.
    fn vehicle_states(&self) -> Vec<Vec<VehicleState>>;

    /// Applies per-rotor throttle commands, shape
    /// `[instances, vehicle_count, action_dim]`, and returns the commanded
    /// effort per vehicle, shape `[instances, vehicle_count]`.
    fn apply_action(&mut self, actions: &Tensor) -> Tensor;

    /// Norm of the throttle change caused by the latest action, shape
    /// `[instances, vehicle_count]`.
    fn throttle_difference(&self) -> Tensor;

    fn payload_poses(&self, ids: Option<&[usize]>) -> Vec<Pose>;
    fn payload_velocities(&self, ids: Option<&[usize]>) -> Vec<Twist>;
    fn set_payload_masses(&mut self, masses: &[f32], ids: Option<&[usize]>);

    /// Pose of the target visualization marker.
    fn set_marker_poses(&mut self, poses: &[Pose], ids: Option<&[usize]>);

    /// Places a static or dynamic body in every instance's scene.
    fn place_body(&mut self, spec: &BodySpec);

    /// Advances the owned physics by `dt` seconds.
    fn step(&mut self, dt: f32);
}
