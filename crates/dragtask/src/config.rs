//! Task configuration, fixed at environment construction.

use serde::{Deserialize, Serialize};

use crate::sample::Sample;

const TAU: f32 = std::f32::consts::TAU;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TaskConfig {
    /// Vehicle model preset name.
    #[serde(default = "default_vehicle")]
    pub vehicle: String,
    #[serde(default = "default_vehicle_count")]
    pub vehicle_count: usize,
    /// Below this minimum pairwise distance the separation factor starts
    /// penalizing all agents.
    #[serde(default = "default_safe_distance")]
    pub safe_distance: f32,
    /// Payload mass range per episode, as fractions of the summed vehicle
    /// mass.
    #[serde(default = "default_mass_scale")]
    pub payload_mass_scale: [f32; 2],
    #[serde(default)]
    pub reward: RewardWeights,
    /// Appends time-progress features to the payload observation.
    #[serde(default = "enabled")]
    pub time_encoding: bool,
    #[serde(default = "default_max_episode_length")]
    pub max_episode_length: usize,
    #[serde(default = "default_sim_dt")]
    pub sim_dt: f32,
    /// World-space payload target position.
    #[serde(default = "default_target_pos")]
    pub target_pos: [f32; 3],
    #[serde(default)]
    pub sampling: SamplingConfig,
}

impl TaskConfig {
    /// Parses a configuration from JSON, filling omitted fields with the
    /// defaults.
    ///
    /// # Errors
    /// Returns the underlying parse error.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            vehicle: default_vehicle(),
            vehicle_count: default_vehicle_count(),
            safe_distance: default_safe_distance(),
            payload_mass_scale: default_mass_scale(),
            reward: RewardWeights::default(),
            time_encoding: enabled(),
            max_episode_length: default_max_episode_length(),
            sim_dt: default_sim_dt(),
            target_pos: default_target_pos(),
            sampling: SamplingConfig::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct RewardWeights {
    #[serde(default = "default_effort")]
    pub effort: f32,
    #[serde(default = "one")]
    pub spin: f32,
    #[serde(default = "one")]
    pub swing: f32,
    #[serde(default)]
    pub action_smoothness: f32,
    #[serde(default = "default_distance_scale")]
    pub distance_scale: f32,
}

impl Default for RewardWeights {
    fn default() -> Self {
        Self {
            effort: default_effort(),
            spin: one(),
            swing: one(),
            action_smoothness: 0.0,
            distance_scale: default_distance_scale(),
        }
    }
}

/// Per-quantity sampling strategies used at reset.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct SamplingConfig {
    /// Initial group position.
    #[serde(default = "default_init_pos")]
    pub init_pos: [Sample; 3],
    /// Initial group roll/pitch/yaw.
    #[serde(default = "default_init_rpy")]
    pub init_rpy: [Sample; 3],
    /// Payload target roll/pitch/yaw. Fixed at zero by default: the target
    /// heading is the identity heading in the standard task.
    #[serde(default = "default_target_rpy")]
    pub target_rpy: [Sample; 3],
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            init_pos: default_init_pos(),
            init_rpy: default_init_rpy(),
            target_rpy: default_target_rpy(),
        }
    }
}

fn default_vehicle() -> String {
    "crazyflie".to_owned()
}

fn default_vehicle_count() -> usize {
    2
}

fn default_safe_distance() -> f32 {
    0.5
}

fn default_mass_scale() -> [f32; 2] {
    [0.5, 0.8]
}

fn default_max_episode_length() -> usize {
    500
}

fn default_sim_dt() -> f32 {
    0.016
}

fn default_target_pos() -> [f32; 3] {
    [0.0, 0.0, 2.0]
}

fn default_effort() -> f32 {
    0.1
}

fn default_distance_scale() -> f32 {
    1.2
}

fn one() -> f32 {
    1.0
}

fn enabled() -> bool {
    true
}

fn default_init_pos() -> [Sample; 3] {
    [
        Sample::uniform(-3.0, 3.0),
        Sample::uniform(-3.0, 3.0),
        Sample::uniform(1.0, 2.5),
    ]
}

fn default_init_rpy() -> [Sample; 3] {
    [
        Sample::fixed(0.0),
        Sample::fixed(0.0),
        Sample::uniform(0.0, TAU),
    ]
}

fn default_target_rpy() -> [Sample; 3] {
    [Sample::fixed(0.0), Sample::fixed(0.0), Sample::fixed(0.0)]
}

#[cfg(test)]
mod tests {
    use super::TaskConfig;
    use crate::sample::Sample;

    #[test]
    fn empty_json_yields_defaults() {
        let cfg = TaskConfig::from_json("{}").unwrap();
        assert_eq!(cfg.vehicle, "crazyflie");
        assert_eq!(cfg.vehicle_count, 2);
        assert_eq!(cfg.payload_mass_scale, [0.5, 0.8]);
        assert_eq!(cfg.sampling.target_rpy[2], Sample::fixed(0.0));
    }

    #[test]
    fn partial_json_overrides_one_field() {
        let cfg = TaskConfig::from_json(r#"{"safe_distance": 0.75}"#).unwrap();
        assert_eq!(cfg.safe_distance, 0.75);
        assert_eq!(cfg.max_episode_length, 500);
    }
}
