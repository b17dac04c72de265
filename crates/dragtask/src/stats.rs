//! Per-instance running statistics.

use batch::{Batch, Tensor};

/// Decay factor of the exponential smoothing:
/// `stat = stat * SMOOTHING + sample * (1 - SMOOTHING)`.
pub const SMOOTHING: f32 = 0.8;

pub fn smooth(stat: &mut f32, sample: f32) {
    *stat = *stat * SMOOTHING + sample * (1.0 - SMOOTHING);
}

/// Monitoring accumulators for one episode instance. Zeroed on reset,
/// written once per step.
#[derive(Clone, Debug)]
pub struct EpisodeStats {
    /// Accumulated mean-agent reward, tracked per agent.
    pub ret: Vec<f32>,
    pub episode_len: f32,
    pub pos_error: f32,
    pub heading_alignment: f32,
    pub uprightness: f32,
    pub action_smoothness: Vec<f32>,
}

impl EpisodeStats {
    #[must_use]
    pub fn zeroed(agents: usize) -> Self {
        Self {
            ret: vec![0.0; agents],
            episode_len: 0.0,
            pos_error: 0.0,
            heading_alignment: 0.0,
            uprightness: 0.0,
            action_smoothness: vec![0.0; agents],
        }
    }

    pub fn reset(&mut self) {
        self.ret.fill(0.0);
        self.episode_len = 0.0;
        self.pos_error = 0.0;
        self.heading_alignment = 0.0;
        self.uprightness = 0.0;
        self.action_smoothness.fill(0.0);
    }
}

/// Copies the statistics of every instance into `stats.*` tensors.
#[must_use]
pub fn to_batch(stats: &[EpisodeStats], agents: usize) -> Batch {
    let instances = stats.len();
    let mut ret = Vec::with_capacity(instances * agents);
    let mut episode_len = Vec::with_capacity(instances);
    let mut pos_error = Vec::with_capacity(instances);
    let mut heading_alignment = Vec::with_capacity(instances);
    let mut uprightness = Vec::with_capacity(instances);
    let mut action_smoothness = Vec::with_capacity(instances * agents);
    for s in stats {
        ret.extend_from_slice(&s.ret);
        episode_len.push(s.episode_len);
        pos_error.push(s.pos_error);
        heading_alignment.push(s.heading_alignment);
        uprightness.push(s.uprightness);
        action_smoothness.extend_from_slice(&s.action_smoothness);
    }
    let mut out = Batch::new();
    out.insert("stats.return", Tensor::from_vec(vec![instances, agents], ret));
    out.insert(
        "stats.episode_len",
        Tensor::from_vec(vec![instances, 1], episode_len),
    );
    out.insert(
        "stats.pos_error",
        Tensor::from_vec(vec![instances, 1], pos_error),
    );
    out.insert(
        "stats.heading_alignment",
        Tensor::from_vec(vec![instances, 1], heading_alignment),
    );
    out.insert(
        "stats.uprightness",
        Tensor::from_vec(vec![instances, 1], uprightness),
    );
    out.insert(
        "stats.action_smoothness",
        Tensor::from_vec(vec![instances, agents], action_smoothness),
    );
    out
}

#[cfg(test)]
mod tests {
    use super::{smooth, EpisodeStats, SMOOTHING};

    #[test]
    fn smoothing_follows_the_decay_formula() {
        let mut stat = 1.0;
        smooth(&mut stat, 0.0);
        assert!((stat - SMOOTHING).abs() < 1e-6);
        smooth(&mut stat, 1.0);
        assert!((stat - (SMOOTHING * SMOOTHING + (1.0 - SMOOTHING))).abs() < 1e-6);
    }

    #[test]
    fn reset_zeroes_every_field() {
        let mut s = EpisodeStats::zeroed(2);
        s.ret[1] = 3.0;
        s.episode_len = 17.0;
        s.pos_error = 0.4;
        s.action_smoothness[0] = -0.2;
        s.reset();
        assert_eq!(s.ret, vec![0.0, 0.0]);
        assert_eq!(s.episode_len, 0.0);
        assert_eq!(s.pos_error, 0.0);
        assert_eq!(s.action_smoothness, vec![0.0, 0.0]);
    }
}
