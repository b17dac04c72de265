//! Configuration-driven sampling strategies.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// How one scalar quantity is drawn at reset: either a fixed value or a
/// uniform range. Selectable per quantity from configuration, so degenerate
/// distributions (e.g. a fixed target orientation) stay expressible without
/// a code change.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Sample {
    Fixed { value: f32 },
    Uniform { low: f32, high: f32 },
}

impl Sample {
    #[must_use]
    pub const fn fixed(value: f32) -> Self {
        Self::Fixed { value }
    }

    #[must_use]
    pub const fn uniform(low: f32, high: f32) -> Self {
        Self::Uniform { low, high }
    }

    pub fn draw(&self, rng: &mut fastrand::Rng) -> f32 {
        match *self {
            Self::Fixed { value } => value,
            Self::Uniform { low, high } => low + (high - low) * rng.f32(),
        }
    }
}

/// Draws a 3-vector from per-component strategies.
pub fn draw_vec3(samples: &[Sample; 3], rng: &mut fastrand::Rng) -> Vec3 {
    Vec3::new(
        samples[0].draw(rng),
        samples[1].draw(rng),
        samples[2].draw(rng),
    )
}
