//! Composite reward and termination evaluation.

use batch::Tensor;

use crate::aggregate::StepContext;
use crate::config::TaskConfig;
use crate::ops;
use crate::stats::{smooth, EpisodeStats};

/// Altitude below which an instance terminates.
pub const MIN_ALTITUDE: f32 = 0.2;
/// The joint-limit term reads at most this many rope joints.
pub const JOINT_LIMIT_JOINTS: usize = 16;

/// Result of one evaluation. The reward is one scalar per instance,
/// broadcast identically to every agent at assembly.
pub struct StepOutcome {
    pub reward: Vec<f32>,
    pub terminated: Vec<bool>,
    pub truncated: Vec<bool>,
}

impl StepOutcome {
    #[must_use]
    pub fn done(&self, instance: usize) -> bool {
        self.terminated[instance] || self.truncated[instance]
    }
}

/// Separation factor: quadratic ramp from 0 at zero separation to 1 at the
/// safe distance, clamped there. Multiplies the whole reward, so crowding
/// overrides every other incentive.
#[must_use]
pub fn separation_gate(separation: f32, safe_distance: f32) -> f32 {
    let ratio = separation / safe_distance;
    (ratio * ratio).clamp(0.0, 1.0)
}

/// Pose term: 1 at the target, decaying exponentially with distance.
#[must_use]
pub fn pose_reward(distance: f32, scale: f32) -> f32 {
    (-distance * scale).exp()
}

/// Evaluates reward and termination for every instance and applies the
/// statistics side effects.
///
/// `joints` is `[instances, joint_count]`; `effort` and `throttle_diff` are
/// `[instances, vehicle_count]`; `progress` holds the per-instance elapsed
/// step counts after this step.
#[must_use]
#[allow(clippy::too_many_arguments)]
pub fn evaluate(
    cfg: &TaskConfig,
    ctx: &StepContext,
    joints: &Tensor,
    joint_limits: &[f32],
    effort: &Tensor,
    throttle_diff: &Tensor,
    progress: &[usize],
    stats: &mut [EpisodeStats],
) -> StepOutcome {
    let instances = ctx.states.len();
    let n = cfg.vehicle_count;
    let w = &cfg.reward;

    let mut reward = Vec::with_capacity(instances);
    let mut terminated = Vec::with_capacity(instances);
    let mut truncated = Vec::with_capacity(instances);

    for i in 0..instances {
        let distance = ctx.target_distance(i);
        let reward_pose = pose_reward(distance, w.distance_scale);

        let up_z = ctx.payload_up[i].z;
        let reward_up = ((up_z + 1.0) / 2.0).powi(2);

        let spinnage = ctx.payload_vel[i].angular.abs().element_sum();
        let reward_spin = w.spin * (-spinnage * spinnage).exp();

        let swing = ctx.payload_vel[i].linear.abs().element_sum();
        let reward_swing = w.swing * (-swing * swing).exp();

        let effort_row = effort.row(i);
        let reward_effort =
            w.effort * effort_row.iter().map(|e| (-e).exp()).sum::<f32>() / n as f32;

        let separation = ops::min_separation(&ctx.pdist[i]);
        let reward_separation = separation_gate(separation, cfg.safe_distance);

        let joint_row = joints.row(i);
        let m = joint_row.len().min(JOINT_LIMIT_JOINTS);
        let reward_joint_limit = 0.5
            * joint_row[..m]
                .iter()
                .zip(&joint_limits[..m])
                .map(|(jp, limit)| 1.0 - (jp / limit.abs()).powi(2))
                .sum::<f32>()
            / m as f32;

        let diff_row = throttle_diff.row(i);
        let reward_smooth_mean =
            w.action_smoothness * diff_row.iter().map(|d| -d).sum::<f32>() / n as f32;

        let r = reward_separation
            * (reward_pose
                + reward_pose * (reward_up + reward_spin + reward_swing)
                + reward_joint_limit
                + reward_smooth_mean
                + reward_effort);
        reward.push(r);

        let misbehave = ctx.states[i].iter().any(|s| s.pos.z < MIN_ALTITUDE);
        let hasnan = ctx.states[i].iter().any(|s| !s.is_finite());
        terminated.push(misbehave || hasnan);
        truncated.push(progress[i] >= cfg.max_episode_length);

        let s = &mut stats[i];
        for ret in &mut s.ret {
            *ret += r;
        }
        s.episode_len = progress[i] as f32;
        smooth(&mut s.pos_error, ctx.pos_error[i]);
        smooth(&mut s.heading_alignment, ctx.heading_alignment[i]);
        smooth(&mut s.uprightness, up_z);
        for (stat, d) in s.action_smoothness.iter_mut().zip(diff_row) {
            smooth(stat, -d);
        }
    }

    StepOutcome {
        reward,
        terminated,
        truncated,
    }
}
