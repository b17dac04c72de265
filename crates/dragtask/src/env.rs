//! The task environment.

use batch::{Batch, CompositeSpec, Tensor, TensorSpec};
use glam::Vec3;
use rig::{BodySpec, Pose, RigView, Shape, Twist};

use crate::aggregate::{aggregate, StepContext};
use crate::config::TaskConfig;
use crate::observation::{self, obs_self_dim, payload_dim, OBS_OTHERS_DIM};
use crate::ops;
use crate::reward;
use crate::sample::{draw_vec3, Sample};
use crate::stats::EpisodeStats;
use crate::TaskError;

/// Descriptor of the agent population exported to the training harness.
#[derive(Clone, Debug)]
pub struct AgentSpec {
    pub name: String,
    pub count: usize,
    pub observation_key: String,
    pub action_key: String,
    pub reward_key: String,
    pub state_key: String,
}

/// Cooperative payload-dragging environment over `instances` parallel
/// replicas of a rope rig.
pub struct DragEnv<R: RigView> {
    cfg: TaskConfig,
    rig: R,
    rng: fastrand::Rng,

    target_pos: Vec3,
    target_heading: Vec<Vec3>,
    last_distance: Vec<f32>,
    progress: Vec<usize>,
    stats: Vec<EpisodeStats>,
    init_joint_pos: Tensor,

    observation_spec: CompositeSpec,
    action_spec: CompositeSpec,
    reward_spec: CompositeSpec,
    stats_spec: CompositeSpec,
}

impl<R: RigView> DragEnv<R> {
    /// Builds the environment around an already-constructed rig, declares the
    /// exchange specs, places the target marker, and captures the initial
    /// joint configuration for resets.
    ///
    /// # Errors
    /// Fails when the rig population does not match the configuration.
    pub fn new(cfg: TaskConfig, mut rig: R, seed: u64) -> Result<Self, TaskError> {
        if rig.vehicle_count() != cfg.vehicle_count {
            return Err(TaskError::VehicleCount {
                config: cfg.vehicle_count,
                rig: rig.vehicle_count(),
            });
        }
        if rig.model().name != cfg.vehicle {
            return Err(TaskError::UnknownVehicle(cfg.vehicle));
        }

        let instances = rig.instances();
        let n = cfg.vehicle_count;
        let model = rig.model().clone();
        let self_dim = obs_self_dim(&model, n);
        let p_dim = payload_dim(&cfg);

        let observation_spec = CompositeSpec::new()
            .with(
                "agents.observation.obs_self",
                TensorSpec::new(vec![n, 1, self_dim]),
            )
            .with(
                "agents.observation.obs_others",
                TensorSpec::new(vec![n, n - 1, OBS_OTHERS_DIM]),
            )
            .with(
                "agents.observation.obs_payload",
                TensorSpec::new(vec![n, 1, p_dim]),
            )
            .with(
                "agents.observation_central.state_drones",
                TensorSpec::new(vec![n, self_dim]),
            )
            .with(
                "agents.observation_central.state_payload",
                TensorSpec::new(vec![1, p_dim]),
            );
        let action_spec = CompositeSpec::new().with(
            "agents.action",
            TensorSpec::new(vec![n, model.action_dim()]),
        );
        let reward_spec =
            CompositeSpec::new().with("agents.reward", TensorSpec::new(vec![n, 1]));
        let stats_spec = CompositeSpec::new()
            .with("stats.return", TensorSpec::new(vec![n]))
            .with("stats.episode_len", TensorSpec::new(vec![1]))
            .with("stats.pos_error", TensorSpec::new(vec![1]))
            .with("stats.heading_alignment", TensorSpec::new(vec![1]))
            .with("stats.uprightness", TensorSpec::new(vec![1]))
            .with("stats.action_smoothness", TensorSpec::new(vec![n]));

        rig.place_body(&target_marker());
        let init_joint_pos = rig.joint_positions(None);
        let target_pos = Vec3::from_array(cfg.target_pos);

        tracing::info!(
            instances,
            vehicles = n,
            model = %model.name,
            "payload dragging task ready"
        );

        Ok(Self {
            cfg,
            rig,
            rng: fastrand::Rng::with_seed(seed),
            target_pos,
            target_heading: vec![Vec3::X; instances],
            last_distance: vec![0.0; instances],
            progress: vec![0; instances],
            stats: vec![EpisodeStats::zeroed(n); instances],
            init_joint_pos,
            observation_spec,
            action_spec,
            reward_spec,
            stats_spec,
        })
    }

    #[must_use]
    pub fn config(&self) -> &TaskConfig {
        &self.cfg
    }

    #[must_use]
    pub fn rig(&self) -> &R {
        &self.rig
    }

    pub fn rig_mut(&mut self) -> &mut R {
        &mut self.rig
    }

    #[must_use]
    pub fn instances(&self) -> usize {
        self.rig.instances()
    }

    #[must_use]
    pub fn observation_spec(&self) -> &CompositeSpec {
        &self.observation_spec
    }

    #[must_use]
    pub fn action_spec(&self) -> &CompositeSpec {
        &self.action_spec
    }

    #[must_use]
    pub fn reward_spec(&self) -> &CompositeSpec {
        &self.reward_spec
    }

    #[must_use]
    pub fn stats_spec(&self) -> &CompositeSpec {
        &self.stats_spec
    }

    #[must_use]
    pub fn agent_spec(&self) -> AgentSpec {
        AgentSpec {
            name: "drone".to_owned(),
            count: self.cfg.vehicle_count,
            observation_key: "agents.observation".to_owned(),
            action_key: "agents.action".to_owned(),
            reward_key: "agents.reward".to_owned(),
            state_key: "agents.observation_central".to_owned(),
        }
    }

    #[must_use]
    pub fn progress(&self) -> &[usize] {
        &self.progress
    }

    /// Initial target distance cached at the latest reset of each instance.
    #[must_use]
    pub fn last_distance(&self) -> &[f32] {
        &self.last_distance
    }

    #[must_use]
    pub fn stats(&self) -> &[EpisodeStats] {
        &self.stats
    }

    /// Resets the addressed instances (all when `ids` is `None`): samples a
    /// fresh group pose, target orientation and payload mass, restores the
    /// initial joint configuration, zeroes velocities, statistics and
    /// progress, and repositions the target marker.
    pub fn reset(&mut self, ids: Option<&[usize]>) {
        let ids: Vec<usize> = match ids {
            Some(ids) => ids.to_vec(),
            None => (0..self.instances()).collect(),
        };
        let k = ids.len();
        let s = &self.cfg.sampling;

        let mut poses = Vec::with_capacity(k);
        let mut markers = Vec::with_capacity(k);
        let mut masses = Vec::with_capacity(k);
        let total_mass = self.rig.model().mass * self.cfg.vehicle_count as f32;
        let mass_range = Sample::uniform(
            self.cfg.payload_mass_scale[0] * total_mass,
            self.cfg.payload_mass_scale[1] * total_mass,
        );

        for &i in &ids {
            let pos = draw_vec3(&s.init_pos, &mut self.rng);
            let rot = ops::euler_to_quat(draw_vec3(&s.init_rpy, &mut self.rng));
            let heading = ops::quat_axis(rot, 0);
            poses.push(Pose::new(pos, rot));

            let target_rot = ops::euler_to_quat(draw_vec3(&s.target_rpy, &mut self.rng));
            let target_heading = ops::quat_axis(target_rot, 0);
            self.target_heading[i] = target_heading;
            markers.push(Pose::new(Vec3::ZERO, target_rot));
            masses.push(mass_range.draw(&mut self.rng));

            let dpos = self.target_pos - pos;
            let dheading = target_heading - heading;
            self.last_distance[i] =
                (dpos.length_squared() + dheading.length_squared()).sqrt();

            self.progress[i] = 0;
            self.stats[i].reset();
        }

        self.rig.set_group_poses(&poses, Some(&ids));
        self.rig
            .set_group_velocities(&vec![Twist::ZERO; k], Some(&ids));

        let joint_count = self.rig.joint_count();
        let mut joints = Vec::with_capacity(k * joint_count);
        for &i in &ids {
            joints.extend_from_slice(self.init_joint_pos.row(i));
        }
        let joints = Tensor::from_vec(vec![k, joint_count], joints);
        self.rig.set_joint_positions(&joints, Some(&ids));
        self.rig
            .set_joint_velocities(&Tensor::zeros(vec![k, joint_count]), Some(&ids));

        self.rig.set_payload_masses(&masses, Some(&ids));
        self.rig.set_marker_poses(&markers, Some(&ids));

        tracing::debug!(count = k, "reset instances");
    }

    /// Applies the batched action, advances the simulator, and produces the
    /// full transition batch: observations, centralized state, per-agent
    /// reward, `done`/`terminated`/`truncated` flags, and statistics.
    ///
    /// # Errors
    /// Fails when the action batch is missing or mis-shaped.
    pub fn step(&mut self, actions: &Batch) -> Result<Batch, TaskError> {
        self.action_spec.validate(actions, self.instances())?;
        let act = actions.get("agents.action")?;

        let effort = self.rig.apply_action(act);
        self.rig.step(self.cfg.sim_dt);
        for p in &mut self.progress {
            *p += 1;
        }

        let ctx = aggregate(&self.rig, self.target_pos, &self.target_heading);
        let mut out =
            observation::build(&self.cfg, self.rig.model(), &ctx, &self.progress, &self.stats);

        let joints = self.rig.joint_positions(None);
        let throttle_diff = self.rig.throttle_difference();
        let outcome = reward::evaluate(
            &self.cfg,
            &ctx,
            &joints,
            self.rig.joint_limits(),
            &effort,
            &throttle_diff,
            &self.progress,
            &mut self.stats,
        );

        let instances = self.instances();
        let n = self.cfg.vehicle_count;
        let mut reward_data = Vec::with_capacity(instances * n);
        let mut done = Vec::with_capacity(instances);
        let mut terminated = Vec::with_capacity(instances);
        let mut truncated = Vec::with_capacity(instances);
        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        for i in 0..instances {
            for _ in 0..n {
                reward_data.push(outcome.reward[i]);
            }
            terminated.push(flag(outcome.terminated[i]));
            truncated.push(flag(outcome.truncated[i]));
            done.push(flag(outcome.done(i)));
        }
        out.insert(
            "agents.reward",
            Tensor::from_vec(vec![instances, n, 1], reward_data),
        );
        out.insert("done", Tensor::from_vec(vec![instances, 1], done));
        out.insert(
            "terminated",
            Tensor::from_vec(vec![instances, 1], terminated),
        );
        out.insert("truncated", Tensor::from_vec(vec![instances, 1], truncated));
        Ok(out)
    }

    /// Recomputes the observation batch from current simulator state, the
    /// harness-side call that follows a reset.
    #[must_use]
    pub fn observe(&self) -> Batch {
        let ctx = aggregate(&self.rig, self.target_pos, &self.target_heading);
        observation::build(&self.cfg, self.rig.model(), &ctx, &self.progress, &self.stats)
    }

    /// Aggregated step context for the current simulator state.
    #[must_use]
    pub fn context(&self) -> StepContext {
        aggregate(&self.rig, self.target_pos, &self.target_heading)
    }
}

/// The non-colliding, gravity-free visual body displaying the target pose.
#[must_use]
pub fn target_marker() -> BodySpec {
    BodySpec {
        id: "payload_target_marker".to_owned(),
        shape: Shape::Cylinder {
            radius: 0.1,
            height: 0.02,
        },
        translation: [0.0, 0.0, 0.0],
        scale: [1.0, 1.0, 1.0],
        color: [0.1, 0.8, 0.1],
        dynamic: true,
        collision: false,
        gravity: false,
    }
}
