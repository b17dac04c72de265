//! Deterministic in-memory rig backend.
//!
//! Stand-in for the real physics collaborator in tests and demos. State is
//! held in public per-instance vectors so tests can pin any configuration
//! exactly; `step` applies a deliberately crude kinematic update (thrust
//! along the body up axis, gravity, payload trailing the vehicle centroid)
//! and is skipped entirely while `frozen` is set.

use batch::Tensor;
use glam::Vec3;

use crate::model::VehicleModel;
use crate::scene::BodySpec;
use crate::view::{Pose, RigView, Twist, VehicleState};

const VEHICLE_SPACING: f32 = 0.5;
const PAYLOAD_DROP: f32 = 0.5;
const JOINTS_PER_ROPE: usize = 8;
const JOINT_LIMIT: f32 = std::f32::consts::FRAC_PI_3;
const THRUST_ACCEL: f32 = 20.0;
const THROTTLE_TAU: f32 = 0.5;
const PAYLOAD_SPRING: f32 = 4.0;
const LINEAR_DAMPING: f32 = 0.98;

pub struct MockRig {
    model: VehicleModel,
    vehicle_count: usize,
    joint_limit: Vec<f32>,

    pub group: Vec<Pose>,
    pub group_vel: Vec<Twist>,
    pub vehicles: Vec<Vec<VehicleState>>,
    pub payload: Vec<Pose>,
    pub payload_vel: Vec<Twist>,
    pub payload_mass: Vec<f32>,
    pub marker: Vec<Pose>,
    pub joint_pos: Vec<Vec<f32>>,
    pub joint_vel: Vec<Vec<f32>>,
    pub bodies: Vec<BodySpec>,

    /// While set, `step` leaves all state untouched.
    pub frozen: bool,
    pub gravity: f32,

    throttle_diff: Vec<Vec<f32>>,
}

impl MockRig {
    /// Builds `instances` replicas of a rig with `vehicle_count` vehicles.
    ///
    /// # Panics
    /// Panics if the model is not a quadrotor preset or `vehicle_count < 2`.
    #[must_use]
    pub fn new(instances: usize, vehicle_count: usize, model: VehicleModel) -> Self {
        assert_eq!(model.rotor_count, 4, "mock rig supports quadrotor models");
        assert!(vehicle_count >= 2, "a rope rig needs at least two vehicles");
        let joint_count = vehicle_count * JOINTS_PER_ROPE;
        let mut rig = Self {
            model,
            vehicle_count,
            joint_limit: vec![JOINT_LIMIT; joint_count],
            group: vec![
                Pose::new(Vec3::new(0.0, 0.0, PAYLOAD_DROP), glam::Quat::IDENTITY);
                instances
            ],
            group_vel: vec![Twist::ZERO; instances],
            vehicles: vec![vec![VehicleState::default(); vehicle_count]; instances],
            payload: vec![Pose::default(); instances],
            payload_vel: vec![Twist::ZERO; instances],
            payload_mass: vec![0.0; instances],
            marker: vec![Pose::default(); instances],
            joint_pos: vec![vec![0.0; joint_count]; instances],
            joint_vel: vec![vec![0.0; joint_count]; instances],
            bodies: Vec::new(),
            frozen: false,
            gravity: 9.81,
            throttle_diff: vec![vec![0.0; vehicle_count]; instances],
        };
        for i in 0..instances {
            rig.layout_instance(i);
        }
        rig
    }

    /// Local formation offset of vehicle `k` relative to the group root.
    fn formation_offset(&self, k: usize) -> Vec3 {
        let half = (self.vehicle_count as f32 - 1.0) / 2.0;
        Vec3::new(0.0, (k as f32 - half) * VEHICLE_SPACING, 0.0)
    }

    /// Re-places vehicles and payload rigidly from the group root pose.
    /// Velocities are left untouched.
    fn layout_instance(&mut self, i: usize) {
        let root = self.group[i];
        for k in 0..self.vehicle_count {
            let offset = self.formation_offset(k);
            let v = &mut self.vehicles[i][k];
            v.pos = root.pos + root.rot * offset;
            v.rot = root.rot;
            v.heading = root.rot * Vec3::X;
            v.up = root.rot * Vec3::Z;
        }
        self.payload[i].pos = root.pos + root.rot * Vec3::new(0.0, 0.0, -PAYLOAD_DROP);
        self.payload[i].rot = root.rot;
    }

    fn resolve(&self, ids: Option<&[usize]>) -> Vec<usize> {
        match ids {
            Some(ids) => ids.to_vec(),
            None => (0..self.group.len()).collect(),
        }
    }
}

impl RigView for MockRig {
    fn instances(&self) -> usize {
        self.group.len()
    }

    fn vehicle_count(&self) -> usize {
        self.vehicle_count
    }

    fn model(&self) -> &VehicleModel {
        &self.model
    }

    fn group_poses(&self, ids: Option<&[usize]>) -> Vec<Pose> {
        self.resolve(ids).iter().map(|&i| self.group[i]).collect()
    }

    fn set_group_poses(&mut self, poses: &[Pose], ids: Option<&[usize]>) {
        let ids = self.resolve(ids);
        assert_eq!(poses.len(), ids.len());
        for (pose, &i) in poses.iter().zip(&ids) {
            self.group[i] = *pose;
            self.layout_instance(i);
        }
    }

    fn group_velocities(&self, ids: Option<&[usize]>) -> Vec<Twist> {
        self.resolve(ids).iter().map(|&i| self.group_vel[i]).collect()
    }

    fn set_group_velocities(&mut self, vels: &[Twist], ids: Option<&[usize]>) {
        let ids = self.resolve(ids);
        assert_eq!(vels.len(), ids.len());
        for (vel, &i) in vels.iter().zip(&ids) {
            self.group_vel[i] = *vel;
            for v in &mut self.vehicles[i] {
                v.linvel = vel.linear;
                v.angvel = vel.angular;
            }
            self.payload_vel[i] = *vel;
        }
    }

    fn joint_count(&self) -> usize {
        self.joint_limit.len()
    }

    fn joint_limits(&self) -> &[f32] {
        &self.joint_limit
    }

    fn joint_positions(&self, ids: Option<&[usize]>) -> Tensor {
        let ids = self.resolve(ids);
        let mut data = Vec::with_capacity(ids.len() * self.joint_count());
        for &i in &ids {
            data.extend_from_slice(&self.joint_pos[i]);
        }
        Tensor::from_vec(vec![ids.len(), self.joint_count()], data)
    }

    fn set_joint_positions(&mut self, positions: &Tensor, ids: Option<&[usize]>) {
        let ids = self.resolve(ids);
        assert_eq!(positions.shape, vec![ids.len(), self.joint_count()]);
        for (row, &i) in ids.iter().enumerate() {
            self.joint_pos[i].copy_from_slice(positions.row(row));
        }
    }

    fn set_joint_velocities(&mut self, velocities: &Tensor, ids: Option<&[usize]>) {
        let ids = self.resolve(ids);
        assert_eq!(velocities.shape, vec![ids.len(), self.joint_count()]);
        for (row, &i) in ids.iter().enumerate() {
            self.joint_vel[i].copy_from_slice(velocities.row(row));
        }
    }

    fn vehicle_states(&self) -> Vec<Vec<VehicleState>> {
        self.vehicles.clone()
    }

    fn apply_action(&mut self, actions: &Tensor) -> Tensor {
        let action_dim = self.model.action_dim();
        assert_eq!(
            actions.shape,
            vec![self.instances(), self.vehicle_count, action_dim]
        );
        let mut effort = Vec::with_capacity(self.instances() * self.vehicle_count);
        for i in 0..self.instances() {
            let row = actions.row(i);
            for k in 0..self.vehicle_count {
                let cmd = &row[k * action_dim..(k + 1) * action_dim];
                let v = &mut self.vehicles[i][k];
                let mut diff_sq = 0.0;
                for (r, c) in v.throttle.iter_mut().zip(cmd) {
                    let target = (c.clamp(-1.0, 1.0) + 1.0) / 2.0;
                    let next = *r + (target - *r) * THROTTLE_TAU;
                    diff_sq += (next - *r) * (next - *r);
                    *r = next;
                }
                self.throttle_diff[i][k] = diff_sq.sqrt();
                effort.push(v.throttle.iter().sum());
            }
        }
        Tensor::from_vec(vec![self.instances(), self.vehicle_count], effort)
    }

    fn throttle_difference(&self) -> Tensor {
        let mut data = Vec::with_capacity(self.instances() * self.vehicle_count);
        for row in &self.throttle_diff {
            data.extend_from_slice(row);
        }
        Tensor::from_vec(vec![self.instances(), self.vehicle_count], data)
    }

    fn payload_poses(&self, ids: Option<&[usize]>) -> Vec<Pose> {
        self.resolve(ids).iter().map(|&i| self.payload[i]).collect()
    }

    fn payload_velocities(&self, ids: Option<&[usize]>) -> Vec<Twist> {
        self.resolve(ids).iter().map(|&i| self.payload_vel[i]).collect()
    }

    fn set_payload_masses(&mut self, masses: &[f32], ids: Option<&[usize]>) {
        let ids = self.resolve(ids);
        assert_eq!(masses.len(), ids.len());
        for (mass, &i) in masses.iter().zip(&ids) {
            self.payload_mass[i] = *mass;
        }
    }

    fn set_marker_poses(&mut self, poses: &[Pose], ids: Option<&[usize]>) {
        let ids = self.resolve(ids);
        assert_eq!(poses.len(), ids.len());
        for (pose, &i) in poses.iter().zip(&ids) {
            self.marker[i] = *pose;
        }
    }

    fn place_body(&mut self, spec: &BodySpec) {
        self.bodies.push(spec.clone());
    }

    fn step(&mut self, dt: f32) {
        if self.frozen || dt <= 0.0 {
            return;
        }
        for i in 0..self.instances() {
            let mut centroid = Vec3::ZERO;
            let mut mean_vel = Vec3::ZERO;
            for v in &mut self.vehicles[i] {
                let throttle_mean: f32 =
                    v.throttle.iter().sum::<f32>() / v.throttle.len() as f32;
                let accel = v.up * (throttle_mean * THRUST_ACCEL)
                    + Vec3::new(0.0, 0.0, -self.gravity);
                v.linvel = (v.linvel + accel * dt) * LINEAR_DAMPING;
                v.pos += v.linvel * dt;
                centroid += v.pos;
                mean_vel += v.linvel;
            }
            centroid /= self.vehicle_count as f32;
            mean_vel /= self.vehicle_count as f32;

            // The group root tracks the vehicle centroid; the payload trails
            // it on a damped spring standing in for the rope.
            self.group[i].pos = centroid;
            self.group_vel[i].linear = mean_vel;

            let anchor = centroid + Vec3::new(0.0, 0.0, -PAYLOAD_DROP);
            let pull = anchor - self.payload[i].pos;
            self.payload_vel[i].linear =
                (self.payload_vel[i].linear + pull * (PAYLOAD_SPRING * dt)) * LINEAR_DAMPING;
            self.payload_vel[i].angular *= 0.95;
            self.payload[i].pos += self.payload_vel[i].linear * dt;

            for (jp, jv) in self.joint_pos[i].iter_mut().zip(&mut self.joint_vel[i]) {
                *jv *= 0.95;
                *jp = (*jp + *jv * dt).clamp(-JOINT_LIMIT, JOINT_LIMIT);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MockRig;
    use crate::model::VehicleModel;
    use crate::view::{Pose, RigView};
    use batch::Tensor;
    use glam::{Quat, Vec3};

    fn rig() -> MockRig {
        MockRig::new(4, 2, VehicleModel::preset("crazyflie").unwrap())
    }

    #[test]
    fn subset_setters_touch_only_addressed_instances() {
        let mut rig = rig();
        let before = rig.group[0];
        rig.set_group_poses(
            &[Pose::new(Vec3::new(1.0, 1.0, 2.0), Quat::IDENTITY)],
            Some(&[2]),
        );
        assert_eq!(rig.group[0].pos, before.pos);
        assert_eq!(rig.group[2].pos, Vec3::new(1.0, 1.0, 2.0));
    }

    #[test]
    fn group_pose_places_vehicles_and_payload() {
        let mut rig = rig();
        rig.set_group_poses(
            &[Pose::new(Vec3::new(0.0, 0.0, 2.0), Quat::IDENTITY)],
            Some(&[1]),
        );
        let states = &rig.vehicles[1];
        assert!((states[0].pos.y + 0.25).abs() < 1e-6);
        assert!((states[1].pos.y - 0.25).abs() < 1e-6);
        assert!((rig.payload[1].pos.z - 1.5).abs() < 1e-6);
    }

    #[test]
    fn joint_roundtrip_by_subset() {
        let mut rig = rig();
        let jp = Tensor::from_vec(vec![1, rig.joint_count()], vec![0.5; rig.joint_count()]);
        rig.set_joint_positions(&jp, Some(&[3]));
        let back = rig.joint_positions(Some(&[3]));
        assert_eq!(back.row(0), jp.row(0));
        assert!(rig.joint_positions(Some(&[0])).data.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn frozen_step_is_a_no_op() {
        let mut rig = rig();
        rig.frozen = true;
        let before = rig.vehicles[0][0].pos;
        rig.step(0.02);
        assert_eq!(rig.vehicles[0][0].pos, before);
    }

    #[test]
    fn action_moves_throttle_toward_command() {
        let mut rig = rig();
        let actions = Tensor::from_vec(vec![4, 2, 4], vec![1.0; 32]);
        let effort = rig.apply_action(&actions);
        assert_eq!(effort.shape, vec![4, 2]);
        assert!(effort.data.iter().all(|e| *e > 0.0));
        assert!(rig.throttle_difference().data.iter().all(|d| *d > 0.0));
    }
}
