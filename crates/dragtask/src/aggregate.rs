//! Per-step state aggregation.

use glam::Vec3;
use rig::{Pose, RigView, Twist, VehicleState};

use crate::ops;

/// Everything the observation builder and the reward evaluator read in one
/// step, derived once from simulator state. Passing this context explicitly
/// between stages pins their ordering: neither stage can run before
/// aggregation, and neither mutates what the other sees.
pub struct StepContext {
    /// Vehicle kinematic states, `[instance][vehicle]`.
    pub states: Vec<Vec<VehicleState>>,
    /// Ordered pairwise relative vehicle positions, self excluded,
    /// `[instance][vehicle][other]`.
    pub rpos: Vec<Vec<Vec<Vec3>>>,
    /// Distances matching `rpos` element-for-element.
    pub pdist: Vec<Vec<Vec<f32>>>,
    pub payload: Vec<Pose>,
    pub payload_vel: Vec<Twist>,
    /// Payload local X axis in world space.
    pub payload_heading: Vec<Vec3>,
    /// Payload local Z axis in world space.
    pub payload_up: Vec<Vec3>,
    /// Payload position minus each vehicle position, `[instance][vehicle]`.
    pub payload_drone_rpos: Vec<Vec<Vec3>>,
    /// `concat(target_pos - payload_pos, target_heading - payload_heading)`.
    pub target_rpose: Vec<[f32; 6]>,
    /// Norm of the positional half of `target_rpose`.
    pub pos_error: Vec<f32>,
    /// Dot of payload heading with target heading.
    pub heading_alignment: Vec<f32>,
}

/// Reads the rig once and derives every relative quantity for this step.
#[must_use]
pub fn aggregate(rig: &impl RigView, target_pos: Vec3, target_heading: &[Vec3]) -> StepContext {
    let states = rig.vehicle_states();
    let payload = rig.payload_poses(None);
    let payload_vel = rig.payload_velocities(None);
    let instances = rig.instances();

    let mut rpos = Vec::with_capacity(instances);
    let mut pdist = Vec::with_capacity(instances);
    let mut payload_heading = Vec::with_capacity(instances);
    let mut payload_up = Vec::with_capacity(instances);
    let mut payload_drone_rpos = Vec::with_capacity(instances);
    let mut target_rpose = Vec::with_capacity(instances);
    let mut pos_error = Vec::with_capacity(instances);
    let mut heading_alignment = Vec::with_capacity(instances);

    for i in 0..instances {
        let positions: Vec<Vec3> = states[i].iter().map(|s| s.pos).collect();
        let r = ops::pairwise_rpos(&positions);
        pdist.push(ops::pairwise_dist(&r));
        rpos.push(r);

        let heading = ops::quat_axis(payload[i].rot, 0);
        let up = ops::quat_axis(payload[i].rot, 2);
        payload_heading.push(heading);
        payload_up.push(up);

        payload_drone_rpos.push(positions.iter().map(|&p| payload[i].pos - p).collect());

        let dpos = target_pos - payload[i].pos;
        let dheading = target_heading[i] - heading;
        let rpose = [dpos.x, dpos.y, dpos.z, dheading.x, dheading.y, dheading.z];
        pos_error.push(dpos.length());
        heading_alignment.push(heading.dot(target_heading[i]));
        target_rpose.push(rpose);
    }

    StepContext {
        states,
        rpos,
        pdist,
        payload,
        payload_vel,
        payload_heading,
        payload_up,
        payload_drone_rpos,
        target_rpose,
        pos_error,
        heading_alignment,
    }
}

impl StepContext {
    /// Full norm of the target-relative pose of one instance.
    #[must_use]
    pub fn target_distance(&self, instance: usize) -> f32 {
        self.target_rpose[instance]
            .iter()
            .map(|v| v * v)
            .sum::<f32>()
            .sqrt()
    }
}
