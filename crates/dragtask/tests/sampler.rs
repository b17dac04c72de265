//! Reset-time sampling properties.

use dragtask::{DragEnv, TaskConfig};
use rig::{MockRig, RigView, VehicleModel};

fn make_env(instances: usize) -> DragEnv<MockRig> {
    let cfg = TaskConfig::default();
    let model = VehicleModel::preset(&cfg.vehicle).unwrap();
    let rig = MockRig::new(instances, cfg.vehicle_count, model);
    DragEnv::new(cfg, rig, 42).unwrap()
}

#[test]
fn initial_positions_stay_inside_the_configured_box() {
    let mut env = make_env(64);
    env.reset(None);
    for pose in env.rig().group_poses(None) {
        assert!((-3.0..=3.0).contains(&pose.pos.x), "x = {}", pose.pos.x);
        assert!((-3.0..=3.0).contains(&pose.pos.y), "y = {}", pose.pos.y);
        assert!((1.0..=2.5).contains(&pose.pos.z), "z = {}", pose.pos.z);
    }
}

#[test]
fn default_orientation_is_yaw_only() {
    let mut env = make_env(64);
    env.reset(None);
    // A yaw-only quaternion has no x/y components; roll and pitch stay 0.
    for pose in env.rig().group_poses(None) {
        assert!(pose.rot.x.abs() < 1e-6);
        assert!(pose.rot.y.abs() < 1e-6);
    }
}

#[test]
fn yaw_samples_spread_over_the_full_circle() {
    let mut env = make_env(256);
    env.reset(None);
    let mut quadrants = [false; 4];
    for pose in env.rig().group_poses(None) {
        let yaw = (2.0 * (pose.rot.w * pose.rot.z)).atan2(1.0 - 2.0 * pose.rot.z * pose.rot.z);
        let yaw = if yaw < 0.0 {
            yaw + std::f32::consts::TAU
        } else {
            yaw
        };
        assert!((0.0..std::f32::consts::TAU + 1e-4).contains(&yaw));
        quadrants[(yaw / std::f32::consts::FRAC_PI_2) as usize % 4] = true;
    }
    assert!(quadrants.iter().all(|q| *q), "yaw never left one quadrant");
}

#[test]
fn payload_mass_scales_with_total_vehicle_mass() {
    let mut env = make_env(128);
    env.reset(None);
    let total = env.rig().model().mass * env.config().vehicle_count as f32;
    for mass in &env.rig().payload_mass {
        assert!(*mass >= 0.5 * total && *mass <= 0.8 * total, "mass = {mass}");
    }
}

#[test]
fn default_target_marker_sits_at_origin_with_identity_rotation() {
    let mut env = make_env(8);
    env.reset(None);
    for i in 0..8 {
        let marker = env.rig().marker[i];
        assert!((marker.rot.w - 1.0).abs() < 1e-6);
        assert_eq!(marker.pos, glam::Vec3::ZERO);
    }
}

#[test]
fn cached_initial_distance_matches_the_sampled_pose() {
    let mut env = make_env(4);
    env.reset(None);
    let poses = env.rig().group_poses(None);
    for (i, pose) in poses.iter().enumerate() {
        let heading = pose.rot * glam::Vec3::X;
        let dpos = glam::Vec3::new(0.0, 0.0, 2.0) - pose.pos;
        let dheading = glam::Vec3::X - heading;
        let expected = (dpos.length_squared() + dheading.length_squared()).sqrt();
        assert!((env.last_distance()[i] - expected).abs() < 1e-5);
    }
}
