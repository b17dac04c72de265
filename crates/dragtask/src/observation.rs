//! Observation assembly.

use batch::{Batch, Tensor};
use rig::{VehicleModel, VehicleState};

use crate::aggregate::StepContext;
use crate::config::TaskConfig;
use crate::ops;
use crate::stats::{self, EpisodeStats};

/// Relative position (3) + distance (1) + rotation and velocities (10) of
/// each other vehicle.
pub const OBS_OTHERS_DIM: usize = 14;
/// Target-relative pose (6) + rotation (4) + velocities (6) + heading (3) +
/// up (3).
pub const PAYLOAD_BASE_DIM: usize = 22;
pub const TIME_ENCODING_DIM: usize = 4;

#[must_use]
pub fn payload_dim(cfg: &TaskConfig) -> usize {
    PAYLOAD_BASE_DIM + if cfg.time_encoding { TIME_ENCODING_DIM } else { 0 }
}

#[must_use]
pub fn obs_self_dim(model: &VehicleModel, vehicle_count: usize) -> usize {
    model.state_dim() + vehicle_count
}

/// Builds the per-agent and centralized observation tensors plus the
/// statistics copy-out for every instance.
///
/// `obs_payload` is written once per instance and broadcast to every agent;
/// it is identical across agents by construction.
#[must_use]
pub fn build(
    cfg: &TaskConfig,
    model: &VehicleModel,
    ctx: &StepContext,
    progress: &[usize],
    stats: &[EpisodeStats],
) -> Batch {
    let instances = ctx.states.len();
    let n = cfg.vehicle_count;
    let self_dim = obs_self_dim(model, n);
    let p_dim = payload_dim(cfg);

    let mut self_data = Vec::with_capacity(instances * n * self_dim);
    let mut others_data = Vec::with_capacity(instances * n * (n - 1) * OBS_OTHERS_DIM);
    let mut payload_data = Vec::with_capacity(instances * n * p_dim);
    let mut payload_central = Vec::with_capacity(instances * p_dim);

    let mut kin = vec![0.0; VehicleState::DIM - 3];
    let mut rot_vel = [0.0; 10];
    for i in 0..instances {
        let other_states = ops::others(&ctx.states[i]);
        for (a, state) in ctx.states[i].iter().enumerate() {
            // Own position is expressed relative to the payload.
            let rel = -ctx.payload_drone_rpos[i][a];
            self_data.extend_from_slice(&rel.to_array());
            state.write_kinematics(&mut kin);
            self_data.extend_from_slice(&kin);
            self_data.extend_from_slice(&ops::one_hot(a, n));

            for (k, other) in other_states[a].iter().enumerate() {
                others_data.extend_from_slice(&ctx.rpos[i][a][k].to_array());
                others_data.push(ctx.pdist[i][a][k]);
                other.write_rot_vel(&mut rot_vel);
                others_data.extend_from_slice(&rot_vel);
            }
        }

        let shared = payload_state(cfg, ctx, progress, i, p_dim);
        for _ in 0..n {
            payload_data.extend_from_slice(&shared);
        }
        payload_central.extend_from_slice(&shared);
    }

    let mut out = Batch::new();
    out.insert(
        "agents.observation.obs_self",
        Tensor::from_vec(vec![instances, n, 1, self_dim], self_data.clone()),
    );
    out.insert(
        "agents.observation.obs_others",
        Tensor::from_vec(vec![instances, n, n - 1, OBS_OTHERS_DIM], others_data),
    );
    out.insert(
        "agents.observation.obs_payload",
        Tensor::from_vec(vec![instances, n, 1, p_dim], payload_data),
    );
    out.insert(
        "agents.observation_central.state_drones",
        Tensor::from_vec(vec![instances, n, self_dim], self_data),
    );
    out.insert(
        "agents.observation_central.state_payload",
        Tensor::from_vec(vec![instances, 1, p_dim], payload_central),
    );
    out.merge(stats::to_batch(stats, n));
    out
}

/// The shared payload feature vector of one instance.
fn payload_state(
    cfg: &TaskConfig,
    ctx: &StepContext,
    progress: &[usize],
    i: usize,
    p_dim: usize,
) -> Vec<f32> {
    let mut shared = Vec::with_capacity(p_dim);
    shared.extend_from_slice(&ctx.target_rpose[i]);
    shared.extend_from_slice(&ctx.payload[i].rot.to_array());
    let mut vel = [0.0; 6];
    ctx.payload_vel[i].write_to(&mut vel);
    shared.extend_from_slice(&vel);
    shared.extend_from_slice(&ctx.payload_heading[i].to_array());
    shared.extend_from_slice(&ctx.payload_up[i].to_array());
    if cfg.time_encoding {
        let t = progress[i] as f32 / cfg.max_episode_length as f32;
        shared.extend_from_slice(&[t; TIME_ENCODING_DIM]);
    }
    shared
}
