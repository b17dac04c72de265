//! Observation assembly properties.

use batch::{Batch, Tensor};
use dragtask::observation::{payload_dim, TIME_ENCODING_DIM};
use dragtask::{DragEnv, TaskConfig};
use glam::{Quat, Vec3};
use rig::{MockRig, Pose, RigView, VehicleModel};

fn make_env(instances: usize) -> DragEnv<MockRig> {
    let cfg = TaskConfig::default();
    let model = VehicleModel::preset(&cfg.vehicle).unwrap();
    let rig = MockRig::new(instances, cfg.vehicle_count, model);
    DragEnv::new(cfg, rig, 7).unwrap()
}

fn zero_actions(env: &DragEnv<MockRig>) -> Batch {
    let n = env.config().vehicle_count;
    let dim = env.rig().model().action_dim();
    let mut actions = Batch::new();
    actions.insert(
        "agents.action",
        Tensor::zeros(vec![env.instances(), n, dim]),
    );
    actions
}

#[test]
fn observation_matches_the_declared_specs() {
    let mut env = make_env(8);
    env.reset(None);
    let out = env.observe();
    env.observation_spec().validate(&out, 8).unwrap();
    env.stats_spec().validate(&out, 8).unwrap();
}

#[test]
fn step_output_also_carries_reward_and_flags() {
    let mut env = make_env(4);
    env.reset(None);
    let actions = zero_actions(&env);
    let out = env.step(&actions).unwrap();
    env.observation_spec().validate(&out, 4).unwrap();
    env.reward_spec().validate(&out, 4).unwrap();
    assert_eq!(out.get("done").unwrap().shape, vec![4, 1]);
    assert_eq!(out.get("terminated").unwrap().shape, vec![4, 1]);
    assert_eq!(out.get("truncated").unwrap().shape, vec![4, 1]);
}

#[test]
fn payload_observation_is_identical_across_agents() {
    let mut env = make_env(16);
    env.reset(None);
    let out = env.observe();
    let obs = out.get("agents.observation.obs_payload").unwrap();
    let p_dim = payload_dim(env.config());
    for i in 0..16 {
        let row = obs.row(i);
        let first = &row[..p_dim];
        for a in 1..env.config().vehicle_count {
            assert_eq!(&row[a * p_dim..(a + 1) * p_dim], first, "instance {i}");
        }
    }
}

#[test]
fn one_hot_identity_marks_each_agent_once() {
    let mut env = make_env(4);
    env.reset(None);
    let out = env.observe();
    let obs = out.get("agents.observation.obs_self").unwrap();
    let n = env.config().vehicle_count;
    let dim = obs.shape[3];
    for i in 0..4 {
        let row = obs.row(i);
        for a in 0..n {
            let identity = &row[a * dim + dim - n..(a + 1) * dim];
            for (j, v) in identity.iter().enumerate() {
                let expected = if j == a { 1.0 } else { 0.0 };
                assert_eq!(*v, expected, "instance {i} agent {a}");
            }
        }
    }
}

#[test]
fn own_position_is_expressed_relative_to_the_payload() {
    let mut env = make_env(1);
    env.reset(None);
    let rig = env.rig_mut();
    rig.frozen = true;
    rig.vehicles[0][0].pos = Vec3::new(0.5, 0.0, 2.0);
    rig.payload[0] = Pose::new(Vec3::new(0.0, 0.0, 1.0), Quat::IDENTITY);

    let out = env.observe();
    let obs = out.get("agents.observation.obs_self").unwrap();
    assert_eq!(&obs.row(0)[..3], &[0.5, 0.0, 1.0]);
}

#[test]
fn others_pair_relative_position_with_distance() {
    let mut env = make_env(1);
    env.reset(None);
    let rig = env.rig_mut();
    rig.frozen = true;
    rig.vehicles[0][0].pos = Vec3::new(0.0, 0.0, 2.0);
    rig.vehicles[0][1].pos = Vec3::new(1.0, 0.0, 2.0);

    let out = env.observe();
    let obs = out.get("agents.observation.obs_others").unwrap();
    let row = obs.row(0);
    // agent 0 sees agent 1 at p0 - p1
    assert_eq!(&row[..4], &[-1.0, 0.0, 0.0, 1.0]);
    // agent 1 sees agent 0 at p1 - p0
    let dim = obs.shape[3];
    assert_eq!(&row[dim..dim + 4], &[1.0, 0.0, 0.0, 1.0]);
}

#[test]
fn time_encoding_tracks_episode_progress() {
    let mut env = make_env(2);
    env.reset(None);
    let p_dim = payload_dim(env.config());
    let max_len = env.config().max_episode_length;

    let out = env.observe();
    let obs = out.get("agents.observation.obs_payload").unwrap();
    assert_eq!(&obs.row(0)[p_dim - TIME_ENCODING_DIM..p_dim], &[0.0; 4]);

    let actions = zero_actions(&env);
    let out = env.step(&actions).unwrap();
    let obs = out.get("agents.observation.obs_payload").unwrap();
    let t = 1.0 / max_len as f32;
    for v in &obs.row(0)[p_dim - TIME_ENCODING_DIM..p_dim] {
        assert!((v - t).abs() < 1e-7);
    }
}

#[test]
fn centralized_state_mirrors_the_per_agent_view() {
    let mut env = make_env(4);
    env.reset(None);
    let out = env.observe();
    let obs_self = out.get("agents.observation.obs_self").unwrap();
    let state = out.get("agents.observation_central.state_drones").unwrap();
    assert_eq!(obs_self.data, state.data);
    let obs_payload = out.get("agents.observation.obs_payload").unwrap();
    let state_payload = out
        .get("agents.observation_central.state_payload")
        .unwrap();
    let p_dim = payload_dim(env.config());
    assert_eq!(&obs_payload.row(0)[..p_dim], state_payload.row(0));
}
